//! Picking a provider and its credentials at start-up.

use std::{env, sync::Arc};

use anyhow::{Context, Result};
use inquire::{Password, PasswordDisplayMode, Select};
use weather_core::{
    Config, ConfigStore, ProviderId, WeatherProvider,
    provider::{build_provider, default_provider_from_config},
};

/// Overrides whatever key the config file holds.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Build the provider, asking for credentials once if none are known.
pub fn provider(config: &mut Config, store: &impl ConfigStore) -> Result<Arc<dyn WeatherProvider>> {
    let env_key = env::var(API_KEY_ENV).ok();

    if let Some((id, key)) = known_credentials(config, env_key) {
        tracing::debug!(provider = %id, "using configured credentials");
        return build_provider(id, key, config.request_timeout());
    }

    prompt_credentials(config)?;
    store.save(config).context("Failed to save credentials")?;

    default_provider_from_config(config)
}

/// Environment key first, then the default provider's configured key.
fn known_credentials(config: &Config, env_key: Option<String>) -> Option<(ProviderId, String)> {
    let default = config.default_provider_id().ok();

    if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
        return Some((default.unwrap_or(ProviderId::OpenWeather), key.trim().to_string()));
    }

    let id = default?;
    config.provider_api_key(id).map(|key| (id, key.to_string()))
}

fn prompt_credentials(config: &mut Config) -> Result<()> {
    println!("No API key configured.");

    let id = Select::new("Weather provider:", ProviderId::all().to_vec())
        .prompt()
        .context("Provider selection aborted")?;

    let key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("API key entry aborted")?;

    config.upsert_provider_api_key(id, key.trim().to_string());
    config.set_default_provider(id);
    Ok(())
}
