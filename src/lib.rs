pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::io::Write;

use anyhow::{Context, Result, bail};
use app::{
    events::{AppEvent, spawn_input_task},
    settings::AppConfig,
    state::{AppMode, AppState},
};
use chrono::Utc;
use cli::{Cli, Command, FavoritesAction};
use data::{geoip::GeoLocator, weather::WeatherClient};
use domain::weather::Query;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ui::theme::Painter;

const LOG_ENV: &str = "WEATHER_NOW_LOG";
const DEFAULT_LOG_FILTER: &str = "weather_now=warn";

/// Logs go to stderr so stdout only carries weather output.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let config = AppConfig::from_cli(&cli, true);

    if let Some(Command::Favorites { action }) = &cli.command {
        let mut stdout = std::io::stdout().lock();
        return run_favorites(action, &config, &mut stdout);
    }
    if cli.one_shot {
        return run_one_shot(&cli, &config).await;
    }
    run_session(&cli, &config).await
}

/// Applies a favorites subcommand and prints the resulting list.
pub fn run_favorites(
    action: &FavoritesAction,
    config: &AppConfig,
    out: &mut impl Write,
) -> Result<()> {
    let mut store = config.favorites_store();
    let name = action.name().unwrap_or_default();
    match action {
        FavoritesAction::List => {}
        FavoritesAction::Add { .. } => store.add(&name),
        FavoritesAction::Remove { .. } => store.remove(&name),
        FavoritesAction::Toggle { .. } => {
            store.toggle(&name);
        }
        FavoritesAction::Clear => store.clear(),
    }

    let painter = Painter::new(config.color);
    writeln!(out, "{}", ui::render_favorites(&store, None, &painter))
        .context("writing favorites failed")?;
    Ok(())
}

async fn run_one_shot(cli: &Cli, config: &AppConfig) -> Result<()> {
    let query = if cli.here {
        let locator = GeoLocator::with_base_url(&config.geo_url)?;
        let location = locator.locate().await?;
        Query::Coords(location.coordinates)
    } else {
        match cli.initial_query() {
            Some(query) => query,
            None => bail!("--one-shot needs a city, --lat/--lon, or --here"),
        }
    };

    let client = WeatherClient::with_base_url(
        &config.api_url,
        config.api_key.clone().unwrap_or_default(),
    )?;
    let bundle = client.fetch_bundle(&query, config.units).await?;
    let painter = Painter::new(config.color);
    println!("{}", ui::render_bundle(&bundle, &painter, Utc::now()));
    Ok(())
}

async fn run_session(cli: &Cli, config: &AppConfig) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(64);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);

    let painter = Painter::new(config.color);
    let mut app = AppState::new(config)?;
    if cli.here {
        app.request_location(&tx);
    } else if let Some(query) = cli.initial_query() {
        app.submit(query, &tx);
    } else {
        println!("{}", ui::render(&app, &painter, Utc::now()));
    }

    let mut input_open = true;
    while app.is_running() {
        flush_output(&mut app, &painter)?;

        tokio::select! {
            maybe_line = input_stream.next(), if input_open => {
                let event = match maybe_line {
                    Some(line) => AppEvent::Input(line),
                    None => {
                        input_open = false;
                        AppEvent::InputClosed
                    }
                };
                app.handle_event(event, &tx);
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx);
                }
            }
        }
    }

    flush_output(&mut app, &painter)
}

fn flush_output(app: &mut AppState, painter: &Painter) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for notice in app.take_notices() {
        writeln!(stdout, "{notice}")?;
    }
    if app.take_dirty() && app.mode != AppMode::Quit {
        writeln!(stdout, "{}", ui::render(app, painter, Utc::now()))?;
    }
    stdout.flush().context("flushing output failed")
}
