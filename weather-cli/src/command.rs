/// One line of user input, split on whitespace.
///
/// The first token is the verb, the rest are positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    tokens: Vec<String>,
}

/// What a command asks the dispatcher to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Weather { city: String, country: Option<String> },
    Favourites,
    List,
    AddFavourite { city: String, country: Option<String> },
    RemoveFavourite { city: String },
    Help,
    MissingCity,
    Unknown(String),
}

impl Command {
    /// Tokenize a line; blank lines produce no command.
    pub fn parse(line: &str) -> Option<Self> {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() { None } else { Some(Self { tokens }) }
    }

    pub fn verb(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn action(&self) -> Action {
        let city = self.args().first().cloned();
        let country = self.args().get(1).cloned();

        match (self.verb().to_lowercase().as_str(), city) {
            ("w", Some(city)) => Action::Weather { city, country },
            ("fav", Some(city)) => Action::AddFavourite { city, country },
            ("remove", Some(city)) => Action::RemoveFavourite { city },
            ("w" | "fav" | "remove", None) => Action::MissingCity,
            ("f", _) => Action::Favourites,
            ("list", _) => Action::List,
            ("help", _) => Action::Help,
            _ => Action::Unknown(self.verb().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(line: &str) -> Action {
        Command::parse(line).expect("non-empty line").action()
    }

    #[test]
    fn blank_lines_are_not_commands() {
        assert!(Command::parse("").is_none());
        assert!(Command::parse("   \t  ").is_none());
    }

    #[test]
    fn tokens_split_on_any_whitespace() {
        let cmd = Command::parse("  w\tParis   FR ").expect("command");
        assert_eq!(cmd.verb(), "w");
        assert_eq!(cmd.args(), ["Paris", "FR"]);
    }

    #[test]
    fn weather_with_and_without_country() {
        assert_eq!(
            action("w Paris FR"),
            Action::Weather { city: "Paris".into(), country: Some("FR".into()) }
        );
        assert_eq!(action("W oslo"), Action::Weather { city: "oslo".into(), country: None });
    }

    #[test]
    fn city_verbs_require_a_city() {
        assert_eq!(action("w"), Action::MissingCity);
        assert_eq!(action("fav"), Action::MissingCity);
        assert_eq!(action("remove"), Action::MissingCity);
    }

    #[test]
    fn argument_free_verbs() {
        assert_eq!(action("f"), Action::Favourites);
        assert_eq!(action("LIST"), Action::List);
        assert_eq!(action("help"), Action::Help);
        assert_eq!(
            action("remove Rome extra"),
            Action::RemoveFavourite { city: "Rome".into() }
        );
    }

    #[test]
    fn unknown_verb_is_reported_as_typed() {
        assert_eq!(action("Forecast Paris"), Action::Unknown("Forecast".into()));
    }
}
