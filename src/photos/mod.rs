//! Geotagged photo feed and picture loading.

mod feed;
mod picture;

pub use feed::{FeedChannel, Post, PostFeed};
pub use picture::{PictureCache, PictureChannel, PictureSlot};
