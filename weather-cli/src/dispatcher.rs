//! The REPL control loop.
//!
//! One task owns the configuration, the favourites and the bookkeeping
//! of in-flight fetches. It waits for either a typed command or a
//! finished fetch, handles exactly that one event to completion, then
//! waits again. Fetches run elsewhere and only ever talk back through
//! the outcome channel.

use std::{collections::HashMap, io::Write, sync::Arc};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use weather_core::{
    Config, ConfigStore, FetchOutcome, FetchRequest, Intent, Location, Target, TaskId,
    WeatherError, WeatherProvider, spawn_fetch,
};

use crate::{
    command::{Action, Command},
    input::InputEvent,
    render,
};

enum Event {
    Input(Option<InputEvent>),
    Outcome(FetchOutcome),
}

pub struct Dispatcher<S, W> {
    config: Config,
    store: S,
    provider: Arc<dyn WeatherProvider>,
    out: W,
    in_flight: HashMap<TaskId, Intent>,
    next_id: TaskId,
    next_batch: u64,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<S, W> Dispatcher<S, W>
where
    S: ConfigStore,
    W: Write,
{
    pub fn new(config: Config, store: S, provider: Arc<dyn WeatherProvider>, out: W) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            config,
            store,
            provider,
            out,
            in_flight: HashMap::new(),
            next_id: 0,
            next_batch: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Serve commands until the input ends.
    ///
    /// Returns an error only if reading input or writing output fails.
    /// Fetches still running at that point are abandoned.
    pub async fn run(mut self, mut input: mpsc::UnboundedReceiver<InputEvent>) -> anyhow::Result<()> {
        render::prompt(&mut self.out)?;

        loop {
            let event = tokio::select! {
                event = input.recv() => Event::Input(event),
                Some(outcome) = self.outcome_rx.recv() => Event::Outcome(outcome),
            };

            match event {
                Event::Input(Some(InputEvent::Command(cmd))) => self.handle_command(cmd).await?,
                Event::Outcome(outcome) => self.handle_outcome(outcome)?,
                Event::Input(Some(InputEvent::Failed(err))) => {
                    return Err(WeatherError::InputStream(err).into());
                }
                Event::Input(Some(InputEvent::Closed) | None) => {
                    info!(abandoned = self.in_flight.len(), "input closed, leaving");
                    writeln!(self.out)?;
                    return Ok(());
                }
            }

            render::prompt(&mut self.out)?;
        }
    }

    async fn handle_command(&mut self, cmd: Command) -> std::io::Result<()> {
        debug!(verb = cmd.verb(), args = ?cmd.args(), "command");

        match cmd.action() {
            Action::Weather { city, country } => {
                self.spawn(Intent::Lookup, Target::Place { city, country });
                Ok(())
            }
            Action::Favourites => self.fan_out(),
            Action::List => render::favourites(&mut self.out, &self.config.favourites),
            Action::AddFavourite { city, country } => {
                match self.add_favourite(&city, country.as_deref()).await {
                    Ok(loc) => render::line(
                        &mut self.out,
                        format!("New location {}, {} added to favourites", loc.city, loc.country),
                    ),
                    Err(err) => render::error(&mut self.out, &err),
                }
            }
            Action::RemoveFavourite { city } => match self.remove_favourite(&city) {
                Ok(_) => render::line(
                    &mut self.out,
                    format!("City {city} successfully removed from favourites"),
                ),
                Err(err) => render::error(&mut self.out, &err),
            },
            Action::Help => render::help(&mut self.out),
            Action::MissingCity => render::line(&mut self.out, "Missing city parameter"),
            Action::Unknown(verb) => render::line(
                &mut self.out,
                format!("Unknown command '{verb}'. Type `help` to list commands."),
            ),
        }
    }

    fn handle_outcome(&mut self, outcome: FetchOutcome) -> std::io::Result<()> {
        if self.in_flight.remove(&outcome.id).is_none() {
            warn!(id = outcome.id, "outcome for a fetch that is not in flight, ignoring");
            return Ok(());
        }

        writeln!(self.out)?;
        match &outcome.result {
            Ok(weather) => render::weather(&mut self.out, weather)?,
            Err(err) => render::error(&mut self.out, err)?,
        }

        if let Intent::Favourite { batch } = outcome.intent {
            if !self.in_flight.values().any(|intent| *intent == outcome.intent) {
                debug!(batch, "favourites batch complete");
            }
        }

        Ok(())
    }

    /// One fetch per favourite, using the coordinates stored right now.
    fn fan_out(&mut self) -> std::io::Result<()> {
        if self.config.favourites.is_empty() {
            return render::line(&mut self.out, "No favourites added");
        }

        let batch = self.next_batch;
        self.next_batch += 1;

        let targets: Vec<Location> = self.config.favourites.iter().cloned().collect();
        debug!(batch, count = targets.len(), "favourites fan-out");

        for location in targets {
            self.spawn(Intent::Favourite { batch }, Target::Known(location));
        }
        Ok(())
    }

    fn spawn(&mut self, intent: Intent, target: Target) {
        let id = self.next_id;
        self.next_id += 1;

        let request = FetchRequest { id, intent, target, settings: self.config.settings() };
        spawn_fetch(self.provider.clone(), request, self.outcome_tx.clone());

        self.in_flight.insert(id, intent);
        debug!(id, ?intent, in_flight = self.in_flight.len(), "fetch spawned");
    }

    // Resolution happens inline: the loop waits for this single round trip.
    async fn add_favourite(
        &mut self,
        city: &str,
        country: Option<&str>,
    ) -> Result<Location, WeatherError> {
        if self.config.favourites.contains(city) {
            return Err(WeatherError::DuplicateFavourite(city.to_string()));
        }

        let location = self.provider.resolve(city, country).await?;
        self.config.favourites.add(location.clone())?;
        self.persist()?;

        Ok(location)
    }

    fn remove_favourite(&mut self, city: &str) -> Result<Location, WeatherError> {
        let removed = self.config.favourites.remove(city)?;
        self.persist()?;
        Ok(removed)
    }

    fn persist(&self) -> Result<(), WeatherError> {
        self.store.save(&self.config).map_err(|err| {
            warn!(error = %format!("{err:#}"), "saving favourites failed");
            WeatherError::Persistence(err)
        })
    }
}
