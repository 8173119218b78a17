use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    app::{
        events::{AppEvent, spawn_fetch, spawn_locate},
        favorites::FavoritesStore,
        input::{Command, parse_command},
        settings::AppConfig,
    },
    data::{
        geoip::GeoLocator,
        weather::{WeatherClient, api_key_configured},
    },
    domain::{
        forecast::DailyForecast,
        weather::{Query, Units, WeatherBundle},
    },
};


pub const EMPTY_SEARCH_MESSAGE: &str = "Please enter a city name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Idle,
    Loading,
    Ready,
    Error,
    Quit,
}

/// What the next redraw shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Weather,
    Day(usize),
    Favorites,
    Help,
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub units: Units,
    pub panel: Panel,
    pub loading_message: String,
    pub last_error: Option<String>,
    pub last_query: Option<Query>,
    /// Name of the city currently shown, as reported by the service.
    pub city: Option<String>,
    pub weather: Option<WeatherBundle>,
    pub favorites: FavoritesStore,
    generation: u64,
    notices: Vec<String>,
    dirty: bool,
    input_closed: bool,
    client: WeatherClient,
    locator: GeoLocator,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = WeatherClient::with_base_url(
            &config.api_url,
            config.api_key.clone().unwrap_or_default(),
        )?;
        let locator = GeoLocator::with_base_url(&config.geo_url)?;
        let mut state = Self::with_services(
            client,
            locator,
            config.favorites_store(),
            config.units,
        );
        if !api_key_configured(config.api_key.as_deref()) {
            state.notify(
                "No API key configured. Set OPENWEATHER_API_KEY or pass --api-key.".to_string(),
            );
        }
        Ok(state)
    }

    pub fn with_services(
        client: WeatherClient,
        locator: GeoLocator,
        favorites: FavoritesStore,
        units: Units,
    ) -> Self {
        Self {
            mode: AppMode::Idle,
            units,
            panel: Panel::Weather,
            loading_message: String::new(),
            last_error: None,
            last_query: None,
            city: None,
            weather: None,
            favorites,
            generation: 0,
            notices: Vec::new(),
            dirty: false,
            input_closed: false,
            client,
            locator,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False after `quit`, or once input has closed and no lookup is pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        match self.mode {
            AppMode::Quit => false,
            AppMode::Loading => true,
            _ => !self.input_closed,
        }
    }

    #[must_use]
    pub fn selected_day(&self) -> Option<&DailyForecast> {
        match self.panel {
            Panel::Day(index) => self.weather.as_ref()?.daily.get(index),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_current_favorite(&self) -> bool {
        self.city
            .as_deref()
            .is_some_and(|city| self.favorites.contains(city))
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Returns whether the view changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn handle_event(&mut self, event: AppEvent, tx: &mpsc::Sender<AppEvent>) {
        match event {
            AppEvent::Input(line) => match parse_command(&line) {
                Ok(command) => self.handle_command(command, tx),
                Err(err) => self.notify(err.to_string()),
            },
            AppEvent::FetchSucceeded { generation, bundle } => {
                if !self.is_current(generation) {
                    return;
                }
                info!(city = %bundle.current.name, days = bundle.daily.len(), "weather updated");
                self.city = Some(bundle.current.name.clone());
                self.weather = Some(*bundle);
                self.last_error = None;
                self.mode = AppMode::Ready;
                self.panel = Panel::Weather;
                self.dirty = true;
            }
            AppEvent::FetchFailed { generation, error } => {
                if !self.is_current(generation) {
                    return;
                }
                warn!(error = ?error, "weather lookup failed");
                self.weather = None;
                self.fail(error.to_string());
            }
            AppEvent::LocationResolved { generation, result } => {
                if !self.is_current(generation) {
                    return;
                }
                match result {
                    Ok(location) => {
                        debug!(city = ?location.city, "location resolved");
                        self.submit(Query::Coords(location.coordinates), tx);
                    }
                    Err(err) => {
                        warn!(error = ?err, "location lookup failed");
                        self.fail(err.to_string());
                    }
                }
            }
            AppEvent::InputClosed => {
                debug!(pending = self.mode == AppMode::Loading, "input closed");
                self.input_closed = true;
            }
            AppEvent::Quit => self.mode = AppMode::Quit,
        }
    }

    /// Starts a lookup for `query`; any response still in flight becomes stale.
    pub fn submit(&mut self, query: Query, tx: &mpsc::Sender<AppEvent>) {
        let generation = self.next_generation();
        self.loading_message = format!("Fetching weather for {}...", query.label());
        self.last_query = Some(query.clone());
        self.last_error = None;
        self.mode = AppMode::Loading;
        self.dirty = true;
        spawn_fetch(tx.clone(), self.client.clone(), query, self.units, generation);
    }

    pub fn request_location(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let generation = self.next_generation();
        self.loading_message = "Detecting your location...".to_string();
        self.last_error = None;
        self.mode = AppMode::Loading;
        self.dirty = true;
        spawn_locate(tx.clone(), self.locator.clone(), generation);
    }

    fn handle_command(&mut self, command: Command, tx: &mpsc::Sender<AppEvent>) {
        match command {
            Command::Search(name) => match Query::city(&name) {
                Some(query) => self.submit(query, tx),
                None => self.fail(EMPTY_SEARCH_MESSAGE.to_string()),
            },
            Command::Here => self.request_location(tx),
            Command::Units(units) => self.set_units(units, tx),
            Command::Retry => match self.last_query.clone() {
                Some(query) => self.submit(query, tx),
                None => self.notify("Nothing to retry yet.".to_string()),
            },
            Command::ToggleFavorite => self.toggle_current_favorite(),
            Command::ListFavorites => self.show(Panel::Favorites),
            Command::OpenFavorite(index) => match self.favorites.get(index) {
                Some(name) => {
                    let query = Query::City(name.to_string());
                    self.submit(query, tx);
                }
                None => self.notify(format!("No favorite #{}. Type 'favs' to list them.", index + 1)),
            },
            Command::Unfavorite(name) => {
                if self.favorites.contains(&name) {
                    self.favorites.remove(&name);
                    self.notify(format!("Removed {} from favorites.", name.trim()));
                } else {
                    self.notify(format!("{} is not a favorite.", name.trim()));
                }
            }
            Command::ShowDay(index) => {
                let days = self.weather.as_ref().map_or(0, |bundle| bundle.daily.len());
                if index < days {
                    self.show(Panel::Day(index));
                } else {
                    self.notify(format!("No forecast for day {}.", index + 1));
                }
            }
            Command::Help => self.show(Panel::Help),
            Command::Quit => self.mode = AppMode::Quit,
        }
    }

    fn set_units(&mut self, units: Units, tx: &mpsc::Sender<AppEvent>) {
        if units == self.units {
            self.notify(format!("Already using {} units.", units.as_query()));
            return;
        }
        self.units = units;
        match self.last_query.clone() {
            Some(query) => self.submit(query, tx),
            None => self.notify(format!("Switched to {} units.", units.as_query())),
        }
    }

    fn toggle_current_favorite(&mut self) {
        let Some(city) = self.city.clone() else {
            self.notify("Look up a city first.".to_string());
            return;
        };
        if self.favorites.toggle(&city) {
            self.notify(format!("Added {city} to favorites."));
        } else {
            self.notify(format!("Removed {city} from favorites."));
        }
    }

    fn show(&mut self, panel: Panel) {
        self.panel = panel;
        self.dirty = true;
    }

    fn fail(&mut self, message: String) {
        self.last_error = Some(message);
        self.mode = AppMode::Error;
        self.panel = Panel::Weather;
        self.dirty = true;
    }

    fn notify(&mut self, message: String) {
        self.notices.push(message);
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation == self.generation {
            return true;
        }
        debug!(
            generation,
            current = self.generation,
            "discarding stale response"
        );
        false
    }
}
