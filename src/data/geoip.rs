use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::weather::Coordinates;

pub const GEOIP_URL: &str = "https://ipapi.co/json/";
const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied. Please enable location access in your settings.")]
    PermissionDenied,
    #[error("Location information is unavailable. Please try again.")]
    PositionUnavailable,
    #[error("Location request timed out. Please try again.")]
    Timeout,
    #[error("An unknown error occurred while getting your location.")]
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLocation {
    pub coordinates: Coordinates,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
}

/// One-shot position lookup against an IP geolocation service.
#[derive(Debug, Clone)]
pub struct GeoLocator {
    client: Client,
    url: String,
}

impl GeoLocator {
    pub fn new() -> Result<Self> {
        Self::with_base_url(GEOIP_URL)
    }

    pub fn with_base_url(url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        let client = Client::builder()
            .timeout(LOCATE_TIMEOUT)
            .default_headers(headers)
            .build()
            .context("failed to build geolocation http client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub async fn locate(&self) -> Result<DetectedLocation, LocationError> {
        let response = self.client.get(&self.url).send().await.map_err(|err| {
            warn!(error = %err, "geolocation request failed");
            transport_error(&err)
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LocationError::PermissionDenied);
            }
            status if !status.is_success() => {
                warn!(status = status.as_u16(), "geolocation service rejected request");
                return Err(LocationError::PositionUnavailable);
            }
            _ => {}
        }

        let payload: IpApiResponse = response.json().await.map_err(|err| {
            if err.is_decode() {
                LocationError::PositionUnavailable
            } else {
                transport_error(&err)
            }
        })?;

        if payload.error {
            return Err(LocationError::PositionUnavailable);
        }
        let (Some(latitude), Some(longitude)) = (payload.latitude, payload.longitude) else {
            return Err(LocationError::PositionUnavailable);
        };

        let city = payload.city.filter(|name| !name.trim().is_empty());
        debug!(latitude, longitude, city = ?city, "location detected");
        Ok(DetectedLocation {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            city,
        })
    }
}

fn transport_error(err: &reqwest::Error) -> LocationError {
    if err.is_timeout() {
        LocationError::Timeout
    } else if err.is_connect() || err.is_request() {
        LocationError::PositionUnavailable
    } else {
        LocationError::Unknown
    }
}
