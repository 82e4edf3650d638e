//! Geotagged photo feed.

use crate::error::FeedError;
use crate::fetch::fetch_bytes;
use crate::geo::checked_coord;
use eframe::egui;
use geo_types::Coord;
use serde::Deserialize;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Latitude/longitude attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PostLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// A photo post as listed in the feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    pub picture_url: String,
    pub post_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub location: Option<PostLocation>,
    /// Unix timestamp (seconds) the photo was posted.
    #[serde(default)]
    pub created_time: Option<i64>,
}

impl Post {
    /// Globe position as `(lon, lat)`, if the post is geotagged.
    pub fn position(&self) -> Option<Coord<f64>> {
        let loc = self.location?;
        checked_coord(loc.longitude, loc.latitude)
    }

    /// Posting date for display, e.g. `"12 Mar 2015"`.
    pub fn posted_on(&self) -> Option<String> {
        let ts = self.created_time?;
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.format("%-d %b %Y").to_string())
    }
}

/// Ordered set of geotagged posts with a cursor.
#[derive(Debug, Clone, Default)]
pub struct PostFeed {
    posts: Vec<Post>,
    cursor: Option<usize>,
}

impl PostFeed {
    /// Builds a feed, keeping only posts with a usable location.
    pub fn new(posts: Vec<Post>) -> Self {
        let total = posts.len();
        let posts: Vec<Post> = posts.into_iter().filter(|p| p.position().is_some()).collect();
        if posts.len() < total {
            log::info!(
                "Dropped {} post(s) without a usable location",
                total - posts.len()
            );
        }
        Self {
            posts,
            cursor: None,
        }
    }

    /// Parses a JSON array of posts.
    pub fn from_json(bytes: &[u8]) -> Result<Self, FeedError> {
        let posts: Vec<Post> = serde_json::from_slice(bytes)?;
        Ok(Self::new(posts))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Advances to the next post, wrapping around at the end.
    pub fn next_post(&mut self) -> Option<&Post> {
        if self.posts.is_empty() {
            return None;
        }
        let next = self.cursor.map_or(0, |i| (i + 1) % self.posts.len());
        self.cursor = Some(next);
        self.posts.get(next)
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&Post> {
        self.cursor.and_then(|i| self.posts.get(i))
    }

    /// One-based position of the current post, for display.
    pub fn position_label(&self) -> Option<String> {
        self.cursor
            .map(|i| format!("{}/{}", i + 1, self.posts.len()))
    }
}

/// Channel-based loader for the photo feed.
pub struct FeedChannel {
    sender: Sender<Result<PostFeed, FeedError>>,
    receiver: Receiver<Result<PostFeed, FeedError>>,
}

impl Default for FeedChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Fetches and parses the feed in the background.
    pub fn load(&self, ctx: egui::Context, url: String) {
        let sender = self.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = load_feed(&url).await;
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = pollster::block_on(load_feed(&url));
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking check for a loaded feed.
    pub fn try_recv(&self) -> Option<Result<PostFeed, FeedError>> {
        self.receiver.try_recv().ok()
    }
}

async fn load_feed(url: &str) -> Result<PostFeed, FeedError> {
    let bytes = fetch_bytes(url).await?;
    PostFeed::from_json(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"[
        {
            "picture_url": "https://cdn.example.com/1.jpg",
            "post_url": "https://photos.example.com/p/1",
            "caption": "Sunrise over the Seine",
            "location": {"latitude": 48.8566, "longitude": 2.3522},
            "created_time": 1426118400
        },
        {
            "picture_url": "https://cdn.example.com/2.jpg",
            "post_url": "https://photos.example.com/p/2",
            "caption": "No geotag on this one"
        },
        {
            "picture_url": "https://cdn.example.com/3.jpg",
            "post_url": "https://photos.example.com/p/3",
            "location": {"latitude": -33.8688, "longitude": 151.2093}
        },
        {
            "picture_url": "https://cdn.example.com/4.jpg",
            "post_url": "https://photos.example.com/p/4",
            "location": {"latitude": 95.0, "longitude": 10.0}
        }
    ]"#;

    #[test]
    fn test_keeps_only_geotagged_posts() {
        let feed = PostFeed::from_json(FEED.as_bytes()).unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed.current().is_none());
    }

    #[test]
    fn test_next_post_wraps() {
        let mut feed = PostFeed::from_json(FEED.as_bytes()).unwrap();
        let first = feed.next_post().unwrap().post_url.clone();
        let second = feed.next_post().unwrap().post_url.clone();
        let third = feed.next_post().unwrap().post_url.clone();

        assert_eq!(first, "https://photos.example.com/p/1");
        assert_eq!(second, "https://photos.example.com/p/3");
        assert_eq!(third, first);
        assert_eq!(feed.position_label().as_deref(), Some("1/2"));
    }

    #[test]
    fn test_position_is_lon_lat() {
        let mut feed = PostFeed::from_json(FEED.as_bytes()).unwrap();
        let post = feed.next_post().unwrap();
        assert_eq!(
            post.position(),
            Some(Coord {
                x: 2.3522,
                y: 48.8566
            })
        );
        assert_eq!(post.posted_on().as_deref(), Some("12 Mar 2015"));
    }

    #[test]
    fn test_non_finite_location_is_dropped() {
        let json = r#"[{
            "picture_url": "a.jpg",
            "post_url": "p/a",
            "location": {"latitude": 10.0, "longitude": 200.0}
        }]"#;
        assert!(PostFeed::from_json(json.as_bytes()).unwrap().is_empty());

        let post = Post {
            picture_url: "b.jpg".to_string(),
            post_url: "p/b".to_string(),
            caption: String::new(),
            location: Some(PostLocation {
                latitude: f64::NAN,
                longitude: 0.0,
            }),
            created_time: None,
        };
        assert!(post.position().is_none());
    }

    #[test]
    fn test_empty_feed() {
        let mut feed = PostFeed::from_json(b"[]").unwrap();
        assert!(feed.is_empty());
        assert!(feed.next_post().is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            PostFeed::from_json(b"{\"posts\": []}"),
            Err(FeedError::Json(_))
        ));
    }
}
