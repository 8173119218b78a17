pub mod theme;


use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::{
    app::{
        favorites::FavoritesStore,
        input::HELP_TEXT,
        state::{AppMode, AppState, Panel},
    },
    domain::{
        forecast::DailyForecast,
        weather::{CurrentConditions, Units, WeatherBundle, local_datetime, round_temp},
    },
    ui::theme::{Painter, theme_for},
};

const CURRENT_TIME_FORMAT: &str = "%A, %B %d, %Y - %-I:%M %p";
const DAY_DATE_FORMAT: &str = "%b %d";
const HOUR_FORMAT: &str = "%-I %p";

/// Renders the session's current panel.
#[must_use]
pub fn render(state: &AppState, painter: &Painter, now: DateTime<Utc>) -> String {
    match state.panel {
        Panel::Help => HELP_TEXT.to_string(),
        Panel::Favorites => render_favorites(&state.favorites, state.city.as_deref(), painter),
        Panel::Day(_) => match (state.weather.as_ref(), state.selected_day()) {
            (Some(bundle), Some(day)) => {
                render_day(day, bundle.units, bundle.day_offset(), painter)
            }
            _ => render_status(state, painter, now),
        },
        Panel::Weather => render_status(state, painter, now),
    }
}

fn render_status(state: &AppState, painter: &Painter, now: DateTime<Utc>) -> String {
    match state.mode {
        AppMode::Idle => painter.muted("Type a city name, 'here', or 'help'."),
        AppMode::Loading => painter.muted(&state.loading_message),
        AppMode::Error => painter.danger(
            state
                .last_error
                .as_deref()
                .unwrap_or("An unexpected error occurred. Please try again."),
        ),
        AppMode::Ready => match &state.weather {
            Some(bundle) => {
                let mut out = render_bundle(bundle, painter, now);
                if state.is_current_favorite() {
                    out.push_str(&format!("\n{}", painter.muted("★ in favorites")));
                }
                out
            }
            None => painter.muted("No weather loaded."),
        },
        AppMode::Quit => String::new(),
    }
}

/// Current conditions followed by the daily outlook.
#[must_use]
pub fn render_bundle(bundle: &WeatherBundle, painter: &Painter, now: DateTime<Utc>) -> String {
    let offset = bundle.local_offset();
    let today = bundle
        .day_reference()
        .day_of(now.timestamp())
        .unwrap_or_else(|_| now.date_naive());
    format!(
        "{}\n\n{}",
        render_current(&bundle.current, bundle.units, offset, painter),
        render_daily(&bundle.daily, today, painter)
    )
}

#[must_use]
pub fn render_current(
    current: &CurrentConditions,
    units: Units,
    offset: FixedOffset,
    painter: &Painter,
) -> String {
    let theme = theme_for(&current.condition);
    let observed = local_datetime(current.observed_at, offset)
        .map(|time| time.format(CURRENT_TIME_FORMAT).to_string())
        .unwrap_or_default();

    let mut lines = vec![
        painter.bold(&current.display_name()),
        painter.muted(&observed),
        format!(
            "{} {}  {}",
            painter.paint(theme.glyph, theme.accent),
            painter.bold(&format_temp(current.temperature, units)),
            current.description
        ),
        format!("Feels like {}", format_temp(current.feels_like, units)),
        format!(
            "Humidity {:.0}%  |  Wind {} {}  |  Pressure {:.0} hPa  |  Min / Max {}° / {}°",
            current.humidity,
            round_temp(current.wind_speed),
            units.wind_speed_unit(),
            current.pressure,
            round_temp(current.temp_min),
            round_temp(current.temp_max)
        ),
    ];
    if let Some(cloudiness) = current.cloudiness {
        lines.push(format!("Cloudiness {cloudiness:.0}%"));
    }
    lines.join("\n")
}

/// One line per day; `today` is labelled instead of named.
#[must_use]
pub fn render_daily(daily: &[DailyForecast], today: NaiveDate, painter: &Painter) -> String {
    if daily.is_empty() {
        return painter.muted("No forecast available.");
    }

    let mut lines = vec![painter.bold("Forecast")];
    for (index, day) in daily.iter().enumerate() {
        let summary = &day.summary;
        let theme = theme_for(&summary.dominant_condition);
        let label = if summary.date == today {
            "Today".to_string()
        } else {
            summary.date.format("%a").to_string()
        };
        let condition = format!("{:<12}", summary.dominant_condition.as_str());
        lines.push(format!(
            "{:>2}. {:<5} {}  {} {}  {:>4} / {:<4}  {}",
            index + 1,
            label,
            summary.date.format(DAY_DATE_FORMAT),
            painter.paint(theme.glyph, theme.accent),
            painter.paint(&condition, theme.accent),
            format!("{}°", summary.min_temperature),
            format!("{}°", summary.max_temperature),
            summary.description
        ));
    }
    lines.push(painter.muted("Type 'day N' for 3-hour detail."));
    lines.join("\n")
}

#[must_use]
pub fn render_day(
    day: &DailyForecast,
    units: Units,
    offset: FixedOffset,
    painter: &Painter,
) -> String {
    let summary = &day.summary;
    let mut lines = vec![painter.bold(&format!(
        "{}  {} / {}",
        summary.date.format("%A, %B %d"),
        format_degrees(summary.min_temperature, units),
        format_degrees(summary.max_temperature, units)
    ))];

    for record in &day.records {
        let theme = theme_for(&record.condition);
        let hour = local_datetime(record.timestamp, offset)
            .map(|time| time.format(HOUR_FORMAT).to_string())
            .unwrap_or_default();
        let mut line = format!(
            "{:>5}  {:>6}  {} {}",
            hour,
            format_temp(record.temperature, units),
            painter.paint(theme.glyph, theme.accent),
            record.description
        );
        if let Some(pop) = record.precipitation_probability {
            line.push_str(&format!("  precip {:.0}%", pop * 100.0));
        }
        if let Some(wind) = record.wind_speed {
            line.push_str(&format!("  wind {} {}", round_temp(wind), units.wind_speed_unit()));
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[must_use]
pub fn render_favorites(store: &FavoritesStore, current: Option<&str>, painter: &Painter) -> String {
    if store.is_empty() {
        return painter.muted("No favorites yet. Look up a city and type 'fav' to save it.");
    }
    let mut lines = vec![painter.bold("Favorites")];
    for (index, name) in store.iter().enumerate() {
        let marker = if current.is_some_and(|city| city.to_lowercase() == name.to_lowercase()) {
            "*"
        } else {
            " "
        };
        lines.push(format!("{marker}{:>2}. {name}", index + 1));
    }
    lines.push(painter.muted("Type 'open N' to look one up."));
    lines.join("\n")
}

#[must_use]
pub fn format_temp(value: f64, units: Units) -> String {
    format_degrees(round_temp(value), units)
}

fn format_degrees(value: i64, units: Units) -> String {
    format!("{value}{}", units.temperature_symbol())
}
