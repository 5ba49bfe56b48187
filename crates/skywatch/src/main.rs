use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use skywatch_api::{ApiClient, CredentialStore};
use skywatch_core::Config;
use skywatch_session::SessionManager;
use skywatch_weather::{Geocoder, LocationManager, PositionSource, WeatherOrchestrator};

/// Cities shown in the dashboard summary strip.
const SUMMARY_CITIES: [&str; 3] = ["Hà Nội, VN", "Đà Nẵng, VN", "Hồ Chí Minh, VN"];

#[tokio::main]
async fn main() -> Result<()> {
    skywatch_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    tracing::info!("Skywatch started");

    let credential = CredentialStore::new();
    let api = Arc::new(ApiClient::new(
        &config.api.base_url,
        credential.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )?);

    let session = SessionManager::new(
        api.clone(),
        credential,
        &config.config_dir.join("session"),
        config.session.restore_policy,
    );
    if session.restore().await {
        if let Some(profile) = session.identity() {
            tracing::info!(username = %profile.username, "Session restored");
        }
    }

    let locations = LocationManager::new(&config.location.default_display_name);
    let geocoder = Geocoder::new(&config.location.geocode_base_url);
    match PositionSource::new(&config.location.position_base_url) {
        Ok(device) => {
            locations
                .resolve_with(device.current_position(), &geocoder)
                .await;
        }
        Err(e) => tracing::debug!("Position source unavailable: {}", e),
    }

    let orchestrator = WeatherOrchestrator::new(
        api.clone(),
        Duration::from_secs(config.forecast.cache_ttl_minutes * 60),
    );

    let location = locations.current();
    println!("Skywatch: {}", location.display_name);

    match orchestrator.overview(&location.display_name).await {
        Ok(overview) => {
            let current = &overview.snapshot;
            println!(
                "  {:.1}°C, {} (humidity {:.0}%)",
                current.temperature, current.condition, current.humidity
            );
            for alert in &overview.alerts {
                println!("  ! [{}] {}", alert.severity, alert.message);
            }
            println!("  {} forecast entries", overview.forecasts.len());
        }
        Err(e) => println!("  Weather unavailable: {}", e.user_message()),
    }

    let names: Vec<String> = SUMMARY_CITIES.iter().map(|s| s.to_string()).collect();
    let summaries = orchestrator.city_summaries(&names).await;
    if !summaries.is_empty() {
        println!("\nOther cities:");
        for city in &summaries {
            println!("  {}: {:.1}°C, {}", city.name, city.temperature, city.condition);
        }
    }

    match api.news().await {
        Ok(articles) => {
            if !articles.is_empty() {
                println!("\nHeadlines:");
                for article in articles.iter().take(5) {
                    println!("  {}", article.title);
                }
            }
        }
        Err(e) => tracing::debug!("News unavailable: {}", e),
    }

    Ok(())
}
