use thiserror::Error;

use crate::domain::weather::Units;

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text; may be blank, which the session reports as an error.
    Search(String),
    Here,
    Units(Units),
    Retry,
    ToggleFavorite,
    ListFavorites,
    /// Zero-based index into the favorites list.
    OpenFavorite(usize),
    Unfavorite(String),
    /// Zero-based index into the daily forecast.
    ShowDay(usize),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown units '{0}'. Use metric or imperial.")]
    UnknownUnits(String),
    #[error("Usage: {0}")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a valid number. Numbers start at 1.")]
    InvalidIndex(String),
}

pub const HELP_TEXT: &str = "\
Commands:
  <city>              look up a city (or: search <city>)
  here                use your current location
  units metric|imperial, c, f
                      switch units and refresh
  retry, r            repeat the last lookup
  fav                 add or remove the current city from favorites
  favs                list favorites
  open N              look up favorite N
  unfav NAME          remove a favorite
  day N               show the 3-hour forecast for day N
  help                show this help
  quit, q             exit

A city named like a command (F, Q, Here, ...) needs the search prefix:
  search F";

pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match (head.to_lowercase().as_str(), rest) {
        ("q" | "quit" | "exit", "") => Command::Quit,
        ("help" | "?", "") => Command::Help,
        ("r" | "retry", "") => Command::Retry,
        ("here", "") => Command::Here,
        ("c", "") => Command::Units(Units::Metric),
        ("f", "") => Command::Units(Units::Imperial),
        ("fav", "") => Command::ToggleFavorite,
        ("favs" | "favorites", "") => Command::ListFavorites,
        ("units", "") => return Err(InputError::MissingArgument("units metric|imperial")),
        ("units", value) => Command::Units(parse_units(value)?),
        ("open", "") => return Err(InputError::MissingArgument("open N")),
        ("open", value) => Command::OpenFavorite(parse_index(value)?),
        ("day", "") => return Err(InputError::MissingArgument("day N")),
        ("day", value) => Command::ShowDay(parse_index(value)?),
        ("unfav", "") => return Err(InputError::MissingArgument("unfav NAME")),
        ("unfav", name) => Command::Unfavorite(name.to_string()),
        ("search", name) => Command::Search(name.to_string()),
        _ => Command::Search(line.to_string()),
    };
    Ok(command)
}

fn parse_units(value: &str) -> Result<Units, InputError> {
    match value.to_lowercase().as_str() {
        "metric" | "c" | "celsius" => Ok(Units::Metric),
        "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
        _ => Err(InputError::UnknownUnits(value.to_string())),
    }
}

fn parse_index(value: &str) -> Result<usize, InputError> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(InputError::InvalidIndex(value.to_string())),
    }
}
