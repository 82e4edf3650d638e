//! Picture loading for the posts panel.
//!
//! Pictures are fetched and decoded off the UI loop; the decoded RGBA
//! pixels are handed back through a channel and uploaded as a texture there.

use crate::error::PictureError;
use crate::fetch::fetch_bytes;
use eframe::egui::{self, ColorImage};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Longest edge of a decoded picture; larger images are downscaled.
const MAX_PICTURE_EDGE: u32 = 1024;

/// A decoded picture ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedPicture {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

impl DecodedPicture {
    /// Decodes PNG or JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PictureError> {
        let mut img = image::load_from_memory(bytes)?;
        if img.width() > MAX_PICTURE_EDGE || img.height() > MAX_PICTURE_EDGE {
            img = img.thumbnail(MAX_PICTURE_EDGE, MAX_PICTURE_EDGE);
        }
        let rgba = img.to_rgba8();
        Ok(Self {
            size: [rgba.width() as usize, rgba.height() as usize],
            rgba: rgba.into_raw(),
        })
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(self.size, &self.rgba)
    }
}

/// Texture state of a picture URL.
pub enum PictureSlot {
    Loading,
    Ready(egui::TextureHandle),
    Failed,
}

/// Picture textures by URL.
///
/// Holds only the pictures the panel may still show; everything else is
/// dropped by [`PictureCache::retain_only`] so textures do not pile up over a
/// long autoplay session.
#[derive(Default)]
pub struct PictureCache {
    slots: HashMap<String, PictureSlot>,
}

impl PictureCache {
    pub fn get(&self, url: &str) -> Option<&PictureSlot> {
        self.slots.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.slots.contains_key(url)
    }

    /// Marks `url` as loading. Returns false if it is already cached or loading.
    pub fn start(&mut self, url: &str) -> bool {
        if self.slots.contains_key(url) {
            return false;
        }
        self.slots.insert(url.to_string(), PictureSlot::Loading);
        true
    }

    /// Stores a finished load, unless the URL was dropped while loading.
    pub fn finish(&mut self, url: &str, slot: PictureSlot) -> bool {
        match self.slots.get_mut(url) {
            Some(existing) => {
                *existing = slot;
                true
            }
            None => false,
        }
    }

    /// Drops every picture whose URL is not in `keep`.
    pub fn retain_only(&mut self, keep: &[&str]) {
        let before = self.slots.len();
        self.slots.retain(|url, _| keep.contains(&url.as_str()));
        if self.slots.len() < before {
            log::debug!("Released {} picture(s)", before - self.slots.len());
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Outcome of one picture load.
pub struct PictureLoaded {
    pub url: String,
    pub result: Result<DecodedPicture, PictureError>,
}

/// Channel-based picture loader.
pub struct PictureChannel {
    sender: Sender<PictureLoaded>,
    receiver: Receiver<PictureLoaded>,
}

impl Default for PictureChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl PictureChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Fetches and decodes a picture in the background.
    pub fn load(&self, ctx: egui::Context, url: String) {
        let sender = self.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = load_picture(&url).await;
                let _ = sender.send(PictureLoaded { url, result });
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = pollster::block_on(load_picture(&url));
                let _ = sender.send(PictureLoaded { url, result });
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking check for a finished picture load.
    pub fn try_recv(&self) -> Option<PictureLoaded> {
        self.receiver.try_recv().ok()
    }
}

async fn load_picture(url: &str) -> Result<DecodedPicture, PictureError> {
    let bytes = fetch_bytes(url).await?;
    DecodedPicture::from_bytes(&bytes)
}
