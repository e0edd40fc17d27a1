//! Drives the map against a live backend without a display, pans around a
//! little and prints the resulting drawing as SVG.
//!
//! ```text
//! cargo run --example headless -- "http://localhost:5000/?lat=51.5&lng=-0.12" [options.json]
//! ```

use anyhow::Context;
use busmap::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let start = args
        .next()
        .map(|url| StartPosition::from_url(&url))
        .unwrap_or_default();
    let options = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading options from {}", path))?;
            MapOptions::from_json_str(&text)?
        }
        None => FetchProfile::Balanced.resolve(),
    };

    let map = BusMap::with_http_backend(options, start)?;
    log::info!("starting at {:?}", start.0);

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        let moves = [MapKey::Right, MapKey::Down, MapKey::Left, MapKey::Up];
        for key in moves {
            tokio::time::sleep(Duration::from_secs(2)).await;
            if tx.send(InputEvent::KeyPress { key }).is_err() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
        let _ = tx.send(InputEvent::Shutdown);
    });

    let map = map.run(rx).await;
    let stats = map.tracker().stats();
    log::info!(
        "{} requests, {} merged, {} failed, {} still in flight",
        stats.requests_issued,
        stats.responses_merged,
        stats.failures,
        stats.in_flight
    );

    println!("{}", map.to_svg());
    Ok(())
}
