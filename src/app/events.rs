use futures::Stream;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;

use crate::{
    data::{
        geoip::{DetectedLocation, GeoLocator, LocationError},
        weather::{ApiError, WeatherClient},
    },
    domain::weather::{Query, Units, WeatherBundle},
};

#[derive(Debug)]
pub enum AppEvent {
    /// A raw line from the prompt.
    Input(String),
    FetchSucceeded {
        generation: u64,
        bundle: Box<WeatherBundle>,
    },
    FetchFailed {
        generation: u64,
        error: ApiError,
    },
    LocationResolved {
        generation: u64,
        result: Result<DetectedLocation, LocationError>,
    },
    /// Stdin reached EOF; the session ends once nothing is in flight.
    InputClosed,
    Quit,
}

/// Lines from stdin; ends at EOF or on a read error.
pub fn spawn_input_task() -> impl Stream<Item = String> {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    futures::stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(err) => {
                debug!(error = %err, "stdin closed");
                None
            }
        }
    })
}

pub fn spawn_fetch(
    tx: mpsc::Sender<AppEvent>,
    client: WeatherClient,
    query: Query,
    units: Units,
    generation: u64,
) {
    tokio::spawn(async move {
        let event = match client.fetch_bundle(&query, units).await {
            Ok(bundle) => AppEvent::FetchSucceeded {
                generation,
                bundle: Box::new(bundle),
            },
            Err(error) => AppEvent::FetchFailed { generation, error },
        };
        let _ = tx.send(event).await;
    });
}

pub fn spawn_locate(tx: mpsc::Sender<AppEvent>, locator: GeoLocator, generation: u64) {
    tokio::spawn(async move {
        let result = locator.locate().await;
        let _ = tx
            .send(AppEvent::LocationResolved { generation, result })
            .await;
    });
}
