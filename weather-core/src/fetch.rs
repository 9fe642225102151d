//! Background weather fetches.
//!
//! Each request runs on its own tokio task and reports exactly one
//! [`FetchOutcome`] on a channel shared by all fetches. A task never
//! touches caller state; the channel send is its only side effect.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    WeatherError,
    model::{Location, Settings, WeatherResult},
    provider::WeatherProvider,
};

pub type TaskId = u64;

/// Why a fetch was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// A direct `w <city>` lookup.
    Lookup,
    /// One member of an `f` fan-out; `batch` groups the members.
    Favourite { batch: u64 },
}

/// What to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Needs resolving first.
    Place { city: String, country: Option<String> },
    /// Coordinates captured when the request was made.
    Known(Location),
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub id: TaskId,
    pub intent: Intent,
    pub target: Target,
    pub settings: Settings,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub id: TaskId,
    pub intent: Intent,
    pub result: Result<WeatherResult, WeatherError>,
}

/// Resolve (if needed) and fetch current weather for one request.
pub async fn run_fetch(provider: &dyn WeatherProvider, request: FetchRequest) -> FetchOutcome {
    let FetchRequest { id, intent, target, settings } = request;

    let result = async {
        let location = match target {
            Target::Known(location) => location,
            Target::Place { city, country } => provider.resolve(&city, country.as_deref()).await?,
        };

        let mut weather = provider.current_weather(location.coordinates, &settings).await?;
        if weather.city.is_empty() {
            weather.city = location.city;
        }
        if weather.country.is_empty() {
            weather.country = location.country;
        }
        Ok::<_, WeatherError>(weather)
    }
    .await;

    FetchOutcome { id, intent, result }
}

/// Spawn a fetch; its outcome is sent to `outcome_tx` exactly once.
///
/// The returned handle may be dropped: nothing joins or cancels fetches.
pub fn spawn_fetch(
    provider: Arc<dyn WeatherProvider>,
    request: FetchRequest,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
) -> JoinHandle<()> {
    let id = request.id;
    let intent = request.intent;

    tokio::spawn(async move {
        let work = tokio::spawn(async move { run_fetch(provider.as_ref(), request).await });

        // A panicking provider still has to answer.
        let outcome = match work.await {
            Ok(outcome) => outcome,
            Err(err) => FetchOutcome {
                id,
                intent,
                result: Err(WeatherError::WeatherUnavailable(format!("fetch task failed: {err}"))),
            },
        };

        tracing::debug!(id, ok = outcome.result.is_ok(), "fetch finished");

        if outcome_tx.send(outcome).is_err() {
            tracing::debug!(id, "outcome receiver gone, dropping result");
        }
    })
}
