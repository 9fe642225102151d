//! Human-friendly output for the REPL.

use std::io::{self, Write};

use chrono::Local;
use weather_core::{Favourites, WeatherError, WeatherResult};

const RULE: &str = "--------------------------------------------------------";

const COMMANDS: &[(&str, &str, &str)] = &[
    ("w", "<City> [<Country>]", "Get weather by city"),
    ("f", "", "Get weather for all of the cities in your favourites"),
    ("list", "", "List favourites"),
    ("fav", "<City> [<Country>]", "Add city to favourites"),
    ("remove", "<City>", "Remove city from favourites"),
    ("help", "", "List available commands"),
];

pub fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "\nCommand: ")?;
    out.flush()
}

pub fn help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n-------Commands-------------------------------------------\n")?;
    for (verb, args, about) in COMMANDS {
        writeln!(out, "{verb:<7} {args:<19} | {about}")?;
    }
    writeln!(out, "\n{RULE}")
}

pub fn weather(out: &mut impl Write, result: &WeatherResult) -> io::Result<()> {
    let symbol = result.units.symbol();
    let observed = result.observed_at.with_timezone(&Local).format("%H:%M");

    writeln!(out, "\nWeather in {}, {}:\n", result.city, result.country)?;
    writeln!(out, "{}", title_case(&result.description))?;
    writeln!(out, "Temperature: {:.1} {symbol}", result.temperature)?;
    writeln!(out, "Feels like: {:.1} {symbol}", result.feels_like)?;
    writeln!(out, "Observed at: {observed}\n")?;
    writeln!(out, "{RULE}")
}

pub fn favourites(out: &mut impl Write, favourites: &Favourites) -> io::Result<()> {
    writeln!(out, "\n------Favourites------\n")?;
    if favourites.is_empty() {
        writeln!(out, "No favourites added")?;
    }
    for loc in favourites {
        writeln!(out, "{}, {}", loc.city, loc.country)?;
    }
    writeln!(out, "\n----------------------")
}

pub fn error(out: &mut impl Write, err: &WeatherError) -> io::Result<()> {
    writeln!(out, "{err}")
}

pub fn line(out: &mut impl Write, text: impl std::fmt::Display) -> io::Result<()> {
    writeln!(out, "{text}")
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
