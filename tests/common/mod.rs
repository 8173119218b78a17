#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const API_KEY: &str = "test-key";

/// 2026-03-10T12:00:00Z
pub const BASE_TS: i64 = 1_773_144_000;

pub fn current_body(name: &str, temp: f64, condition: &str) -> Value {
    json!({
        "name": name,
        "dt": BASE_TS,
        "timezone": 0,
        "sys": { "country": "GB" },
        "weather": [{
            "main": condition,
            "description": condition.to_lowercase(),
            "icon": "04d"
        }],
        "main": {
            "temp": temp,
            "feels_like": temp - 1.5,
            "humidity": 70,
            "pressure": 1012,
            "temp_min": temp - 2.0,
            "temp_max": temp + 2.0
        },
        "wind": { "speed": 4.1 },
        "clouds": { "all": 60 }
    })
}

pub fn forecast_entry(dt: i64, temp: f64, condition: &str) -> Value {
    json!({
        "dt": dt,
        "main": { "temp": temp, "feels_like": temp, "humidity": 65 },
        "weather": [{
            "main": condition,
            "description": condition.to_lowercase(),
            "icon": "10d"
        }],
        "wind": { "speed": 3.0 },
        "pop": 0.2
    })
}

pub fn forecast_body(name: &str, timezone: i32, entries: Vec<Value>) -> Value {
    json!({
        "cod": "200",
        "list": entries,
        "city": { "name": name, "country": "GB", "timezone": timezone }
    })
}

/// Two calendar days in UTC: three records on the 10th, two on the 11th.
pub fn two_day_forecast(name: &str) -> Value {
    let hour = 3600;
    forecast_body(
        name,
        0,
        vec![
            forecast_entry(BASE_TS, 10.0, "Clouds"),
            forecast_entry(BASE_TS + 3 * hour, 15.0, "Rain"),
            forecast_entry(BASE_TS + 6 * hour, 12.0, "Rain"),
            forecast_entry(BASE_TS + 12 * hour, 6.4, "Clear"),
            forecast_entry(BASE_TS + 15 * hour, 5.5, "Clear"),
        ],
    )
}

pub fn json_response(status: u16, body: &Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

pub async fn mount_city(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(json_response(200, &current_body(name, 11.6, "Clouds")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(json_response(200, &two_day_forecast(name)))
        .mount(server)
        .await;
}
