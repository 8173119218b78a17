use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::forecast::{DailyForecast, DayReference};

mod conditions;
mod conversions;

pub use conditions::Condition;
pub use conversions::{local_datetime, round_temp, utc_offset};

/// Unit system requested from the weather service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    #[must_use]
    pub fn temperature_symbol(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    #[must_use]
    pub fn wind_speed_unit(self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// What a lookup is addressed by.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coords(Coordinates),
}

impl Query {
    /// Builds a city query from user input; blank input yields `None`.
    #[must_use]
    pub fn city(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| Self::City(trimmed.to_string()))
    }

    #[must_use]
    pub fn coords(latitude: f64, longitude: f64) -> Self {
        Self::Coords(Coordinates {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::City(name) => name.clone(),
            Self::Coords(coords) => format!("{:.4}, {:.4}", coords.latitude, coords.longitude),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub name: String,
    pub country: Option<String>,
    pub observed_at: i64,
    pub condition: Condition,
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub wind_speed: f64,
    pub cloudiness: Option<f64>,
    pub utc_offset_seconds: Option<i32>,
}

impl CurrentConditions {
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalRecord {
    pub timestamp: i64,
    pub temperature: f64,
    pub condition: Condition,
    pub icon: String,
    pub description: String,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub precipitation_probability: Option<f64>,
}

impl IntervalRecord {
    #[must_use]
    pub fn new(timestamp: i64, temperature: f64, condition: Condition) -> Self {
        let description = condition.as_str().to_lowercase();
        Self {
            timestamp,
            temperature,
            condition,
            icon: String::new(),
            description,
            feels_like: None,
            humidity: None,
            wind_speed: None,
            precipitation_probability: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub city: Option<String>,
    pub country: Option<String>,
    pub utc_offset_seconds: Option<i32>,
    pub records: Vec<IntervalRecord>,
}

impl Forecast {
    /// Days break at the forecast location's local midnight when the
    /// service reports an offset, otherwise at UTC midnight.
    #[must_use]
    pub fn day_reference(&self) -> DayReference {
        self.utc_offset_seconds
            .map_or(DayReference::Utc, DayReference::from_offset_seconds)
    }
}

/// A completed current-conditions + forecast pair.
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub query: Query,
    pub units: Units,
    pub current: CurrentConditions,
    pub forecast: Forecast,
    pub daily: Vec<DailyForecast>,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherBundle {
    #[must_use]
    pub fn city_name(&self) -> &str {
        &self.current.name
    }

    #[must_use]
    pub fn current_temp(&self) -> i64 {
        round_temp(self.current.temperature)
    }

    /// The clock `daily` was bucketed with.
    #[must_use]
    pub fn day_reference(&self) -> DayReference {
        self.forecast.day_reference()
    }

    /// Offset for hourly times, matching the day buckets.
    #[must_use]
    pub fn day_offset(&self) -> FixedOffset {
        self.day_reference().offset()
    }

    /// Offset used to show the observation time of current conditions.
    #[must_use]
    pub fn local_offset(&self) -> FixedOffset {
        utc_offset(self.offset_seconds())
    }

    fn offset_seconds(&self) -> Option<i32> {
        self.current
            .utc_offset_seconds
            .or(self.forecast.utc_offset_seconds)
    }
}
