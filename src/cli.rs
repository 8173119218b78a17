#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::weather::{Query, Units};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum UnitsArg {
    #[value(aliases = ["c", "celsius"])]
    Metric,
    #[value(aliases = ["f", "fahrenheit"])]
    Imperial,
}

impl From<UnitsArg> for Units {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Metric => Units::Metric,
            UnitsArg::Imperial => Units::Imperial,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "weather-now",
    version,
    about = "Current conditions and a five-day forecast in the terminal",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// City to look up (words are joined, so quoting is optional)
    pub city: Vec<String>,

    /// Unit system
    #[arg(long, value_enum, default_value_t = UnitsArg::Metric)]
    pub units: UnitsArg,

    /// Latitude (requires --lon)
    #[arg(long, allow_negative_numbers = true, conflicts_with = "city")]
    pub lat: Option<f64>,

    /// Longitude (requires --lat)
    #[arg(long, allow_negative_numbers = true, conflicts_with = "city")]
    pub lon: Option<f64>,

    /// Look up weather for the current location
    #[arg(long, conflicts_with_all = ["city", "lat", "lon"])]
    pub here: bool,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Weather API base URL
    #[arg(long, default_value = crate::data::weather::WEATHER_API_URL)]
    pub api_url: String,

    /// IP geolocation endpoint used by --here
    #[arg(long, default_value = crate::data::geoip::GEOIP_URL)]
    pub geo_url: String,

    /// Directory holding favorites.json
    #[arg(long, env = "WEATHER_NOW_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Keep favorites in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Color output policy
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, conflicts_with = "no_color")]
    pub color: ColorArg,

    /// Alias for --color never
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Print current conditions and the daily forecast, then exit
    #[arg(long)]
    pub one_shot: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Manage saved favorite cities
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum FavoritesAction {
    /// Print saved favorites in order
    List,
    /// Save a city
    Add {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Remove a city (case-insensitive)
    Remove {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Add the city if missing, otherwise remove it
    Toggle {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Remove every saved city
    Clear,
}

impl FavoritesAction {
    #[must_use]
    pub fn name(&self) -> Option<String> {
        match self {
            Self::Add { name } | Self::Remove { name } | Self::Toggle { name } => {
                Some(name.join(" "))
            }
            Self::List | Self::Clear => None,
        }
    }
}

impl Cli {
    #[must_use]
    pub fn city_name(&self) -> Option<String> {
        let joined = self.city.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// The lookup requested on the command line, if any.
    #[must_use]
    pub fn initial_query(&self) -> Option<Query> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some(Query::coords(lat, lon));
        }
        self.city_name().and_then(|name| Query::city(&name))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    anyhow::bail!("--lat must be between -90 and 90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    anyhow::bail!("--lon must be between -180 and 180");
                }
                Ok(())
            }
            (None, None) => Ok(()),
        }
    }

    #[must_use]
    pub fn effective_color_mode(&self) -> ColorArg {
        if self.no_color {
            ColorArg::Never
        } else {
            self.color
        }
    }
}
