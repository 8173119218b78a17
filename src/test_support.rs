use chrono::{NaiveDateTime, TimeZone, Utc};

use crate::{
    app::{favorites::FavoritesStore, state::AppState},
    data::{geoip::GeoLocator, weather::WeatherClient},
    domain::{
        forecast::build_daily_forecasts,
        weather::{
            Condition, CurrentConditions, Forecast, IntervalRecord, Query, Units, WeatherBundle,
        },
    },
};

/// Nothing listens here, so spawned lookups fail fast and are ignored.
pub(crate) const OFFLINE_URL: &str = "http://127.0.0.1:9";

pub(crate) fn ts(value: &str) -> i64 {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").expect("valid time fixture");
    Utc.from_utc_datetime(&naive).timestamp()
}

pub(crate) fn record(at: &str, temperature: f64, condition: &str) -> IntervalRecord {
    let mut record = IntervalRecord::new(ts(at), temperature, Condition::from_api(condition));
    record.icon = "01d".to_string();
    record
}

pub(crate) fn sample_current(name: &str) -> CurrentConditions {
    CurrentConditions {
        name: name.to_string(),
        country: Some("GB".to_string()),
        observed_at: ts("2026-03-10T12:00"),
        condition: Condition::Clouds,
        description: "broken clouds".to_string(),
        icon: "04d".to_string(),
        temperature: 11.6,
        feels_like: 10.2,
        humidity: 71.0,
        pressure: 1012.0,
        temp_min: 9.4,
        temp_max: 13.1,
        wind_speed: 4.6,
        cloudiness: Some(75.0),
        utc_offset_seconds: Some(0),
    }
}

pub(crate) fn sample_records() -> Vec<IntervalRecord> {
    vec![
        record("2026-03-10T12:00", 11.0, "Clouds"),
        record("2026-03-10T15:00", 13.4, "Rain"),
        record("2026-03-10T18:00", 9.5, "Rain"),
        record("2026-03-11T00:00", 6.2, "Clear"),
        record("2026-03-11T12:00", 12.8, "Clear"),
        record("2026-03-12T09:00", 8.0, "Snow"),
    ]
}

pub(crate) fn sample_bundle(name: &str) -> WeatherBundle {
    let records = sample_records();
    let daily = build_daily_forecasts(&records, Default::default()).expect("fixture aggregates");
    WeatherBundle {
        query: Query::City(name.to_string()),
        units: Units::Metric,
        current: sample_current(name),
        forecast: Forecast {
            city: Some(name.to_string()),
            country: Some("GB".to_string()),
            utc_offset_seconds: Some(0),
            records,
        },
        daily,
        fetched_at: Utc.with_ymd_and_hms(2026, 3, 10, 12, 5, 0).unwrap(),
    }
}

pub(crate) fn offline_state() -> AppState {
    AppState::with_services(
        WeatherClient::with_base_url(OFFLINE_URL, "test-key").expect("client builds"),
        GeoLocator::with_base_url(OFFLINE_URL).expect("locator builds"),
        FavoritesStore::in_memory(),
        Units::Metric,
    )
}
