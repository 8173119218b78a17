use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::forecast::build_daily_forecasts;
use crate::domain::weather::{
    Condition, CurrentConditions, Forecast, IntervalRecord, Query, Units, WeatherBundle,
};

pub const WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";
const ICON_URL: &str = "https://openweathermap.org/img/wn";
const PLACEHOLDER_API_KEY: &str = "your_api_key_here";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a single weather request, carrying the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("City not found. Please check the spelling and try again.")]
    NotFound,
    #[error("Invalid API key. Please check your configuration.")]
    Unauthorized,
    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Weather service is temporarily unavailable. Please try again later.")]
    ServiceUnavailable,
    #[error("Network error. Please check your internet connection and try again.")]
    NetworkError,
    #[error("{}", unknown_message(.status, .message))]
    UnknownError {
        status: Option<u16>,
        message: Option<String>,
    },
    #[error("Weather service returned unexpected data: {0}")]
    InvalidPayload(String),
}

fn unknown_message(status: &Option<u16>, message: &Option<String>) -> String {
    match status {
        Some(_) => format!(
            "Error: {}",
            message
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or("Unable to fetch weather data")
        ),
        None => "An unexpected error occurred. Please try again.".to_string(),
    }
}

/// Maps an HTTP error status (and the body's `message`, if any) to an [`ApiError`].
#[must_use]
pub fn classify_status(status: u16, message: Option<String>) -> ApiError {
    match status {
        404 => ApiError::NotFound,
        401 => ApiError::Unauthorized,
        429 => ApiError::RateLimited,
        500..=599 => ApiError::ServiceUnavailable,
        _ => ApiError::UnknownError {
            status: Some(status),
            message,
        },
    }
}

fn classify_transport(err: &reqwest::Error) -> ApiError {
    if let Some(status) = err.status() {
        return classify_status(status.as_u16(), None);
    }
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ApiError::NetworkError
    } else {
        ApiError::UnknownError {
            status: None,
            message: None,
        }
    }
}

#[must_use]
pub fn icon_url(code: &str, size: &str) -> String {
    format!("{ICON_URL}/{code}@{size}.png")
}

/// False for a missing, blank, or placeholder key.
#[must_use]
pub fn api_key_configured(api_key: Option<&str>) -> bool {
    api_key
        .map(str::trim)
        .is_some_and(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY)
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(WEATHER_API_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build weather http client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub async fn current(&self, query: &Query, units: Units) -> Result<CurrentConditions, ApiError> {
        let payload: CurrentPayload = self.get_json("weather", query, units).await?;
        payload.into_domain()
    }

    pub async fn forecast(&self, query: &Query, units: Units) -> Result<Forecast, ApiError> {
        let payload: ForecastPayload = self.get_json("forecast", query, units).await?;
        payload.into_domain()
    }

    /// Fetches current conditions and the forecast concurrently.
    ///
    /// Both must succeed. When both fail, the current-conditions error is
    /// reported regardless of which response arrived first.
    pub async fn fetch_bundle(&self, query: &Query, units: Units) -> Result<WeatherBundle, ApiError> {
        let (current, forecast) =
            tokio::join!(self.current(query, units), self.forecast(query, units));
        let current = current?;
        let forecast = forecast?;

        let daily = build_daily_forecasts(&forecast.records, forecast.day_reference())
            .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;

        debug!(
            city = %current.name,
            days = daily.len(),
            records = forecast.records.len(),
            "weather bundle assembled"
        );

        Ok(WeatherBundle {
            query: query.clone(),
            units,
            current,
            forecast,
            daily,
            fetched_at: Utc::now(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &Query,
        units: Units,
    ) -> Result<T, ApiError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("units", units.as_query()),
            ("appid", self.api_key.as_str()),
        ]);
        request = match query {
            Query::City(name) => request.query(&[("q", name.as_str())]),
            Query::Coords(coords) => request.query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
            ]),
        };

        debug!(endpoint, query = %query.label(), units = units.as_query(), "weather request");

        let response = request.send().await.map_err(|err| {
            warn!(endpoint, error = %err, "weather request failed without a response");
            classify_transport(&err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            warn!(endpoint, status = status.as_u16(), "weather request rejected");
            return Err(classify_status(status.as_u16(), message));
        }

        response.json::<T>().await.map_err(|err| {
            if err.is_decode() {
                ApiError::InvalidPayload(format!("{endpoint}: {err}"))
            } else {
                classify_transport(&err)
            }
        })
    }
}

async fn error_message(response: reqwest::Response) -> Option<String> {
    if response.status() == StatusCode::NO_CONTENT {
        return None;
    }
    let body = response.text().await.ok()?;
    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConditionPayload {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct SysPayload {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainPayload {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct WindPayload {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct CloudsPayload {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    #[serde(default)]
    name: String,
    sys: Option<SysPayload>,
    dt: i64,
    #[serde(default)]
    weather: Vec<ConditionPayload>,
    main: MainPayload,
    wind: Option<WindPayload>,
    clouds: Option<CloudsPayload>,
    timezone: Option<i32>,
}

impl CurrentPayload {
    fn into_domain(self) -> Result<CurrentConditions, ApiError> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidPayload("current conditions missing weather".into()))?;

        Ok(CurrentConditions {
            name: self.name,
            country: self.sys.and_then(|sys| sys.country),
            observed_at: self.dt,
            condition: Condition::from_api(&weather.main),
            description: weather.description,
            icon: weather.icon,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            wind_speed: self.wind.map_or(0.0, |wind| wind.speed),
            cloudiness: self.clouds.map(|clouds| clouds.all),
            utc_offset_seconds: self.timezone,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForecastMainPayload {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntryPayload {
    dt: i64,
    main: ForecastMainPayload,
    #[serde(default)]
    weather: Vec<ConditionPayload>,
    wind: Option<WindPayload>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CityPayload {
    name: Option<String>,
    country: Option<String>,
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    list: Vec<ForecastEntryPayload>,
    city: Option<CityPayload>,
}

impl ForecastPayload {
    fn into_domain(self) -> Result<Forecast, ApiError> {
        let records = self
            .list
            .into_iter()
            .map(|entry| {
                let weather = entry.weather.into_iter().next().ok_or_else(|| {
                    ApiError::InvalidPayload(format!("forecast entry {} missing weather", entry.dt))
                })?;
                Ok(IntervalRecord {
                    timestamp: entry.dt,
                    temperature: entry.main.temp,
                    condition: Condition::from_api(&weather.main),
                    icon: weather.icon,
                    description: weather.description,
                    feels_like: entry.main.feels_like,
                    humidity: entry.main.humidity,
                    wind_speed: entry.wind.map(|wind| wind.speed),
                    precipitation_probability: entry.pop,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        let (city, country, utc_offset_seconds) = match self.city {
            Some(city) => (city.name, city.country, city.timezone),
            None => (None, None, None),
        };

        Ok(Forecast {
            city,
            country,
            utc_offset_seconds,
            records,
        })
    }
}
