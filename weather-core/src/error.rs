use thiserror::Error;

/// Everything that can go wrong while serving a user command.
///
/// The `Display` text is what the user sees in the REPL.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location {0} not found")]
    LocationNotFound(String),

    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("{0} already exists in favourites")]
    DuplicateFavourite(String),

    #[error("City {0} does not exist in favourites")]
    NotFound(String),

    #[error("Failed to save favourites: {0:#}")]
    Persistence(anyhow::Error),

    #[error("Failed to read input: {0}")]
    InputStream(#[source] std::io::Error),
}

impl WeatherError {
    /// Wrap any provider plumbing failure, keeping the whole context chain.
    pub fn unavailable(err: anyhow::Error) -> Self {
        WeatherError::WeatherUnavailable(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn unavailable_keeps_context_chain() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));
        let err = err.context("Failed to send request").unwrap_err();

        let msg = WeatherError::unavailable(err).to_string();
        assert!(msg.contains("Failed to send request"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn persistence_message_includes_cause() {
        let err = WeatherError::Persistence(anyhow::anyhow!("disk full").context("write failed"));
        assert_eq!(err.to_string(), "Failed to save favourites: write failed: disk full");
    }
}
