//! Async loading of the world topology.
//!
//! Uses channel-based communication to bridge the async fetch with egui's
//! synchronous update loop.

use super::{GeoLayerSet, Topology};
use crate::error::WorldLoadError;
use crate::fetch::fetch_bytes;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Channel-based loader for the world topology.
pub struct WorldChannel {
    sender: Sender<Result<GeoLayerSet, WorldLoadError>>,
    receiver: Receiver<Result<GeoLayerSet, WorldLoadError>>,
}

impl Default for WorldChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Fetches and decodes the topology at `url` in the background.
    pub fn load(&self, ctx: egui::Context, url: String) {
        let sender = self.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = load_world(&url).await;
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = pollster::block_on(load_world(&url));
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking check for the loaded world.
    pub fn try_recv(&self) -> Option<Result<GeoLayerSet, WorldLoadError>> {
        self.receiver.try_recv().ok()
    }
}

async fn load_world(url: &str) -> Result<GeoLayerSet, WorldLoadError> {
    let bytes = fetch_bytes(url).await?;
    log::info!("Fetched topology {} ({} bytes)", url, bytes.len());
    let topology = Topology::from_slice(&bytes)?;
    Ok(GeoLayerSet::from_topology(&topology)?)
}
