//! Core library for the interactive `weather` client.
//!
//! This crate defines:
//! - Configuration, favourites and their persistence
//! - Abstraction over weather providers
//! - Background fetch tasks that report one outcome each
//! - Shared domain models and the error taxonomy
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod favourites;
pub mod fetch;
pub mod model;
pub mod provider;

pub use config::{Config, ConfigStore, FileStore, ProviderConfig};
pub use error::WeatherError;
pub use favourites::Favourites;
pub use fetch::{FetchOutcome, FetchRequest, Intent, Target, TaskId, spawn_fetch};
pub use model::{Coordinates, Location, Settings, Units, WeatherResult};
pub use provider::{ProviderId, WeatherProvider};
