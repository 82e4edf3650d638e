//! UI modules for the photo globe.
//!
//! The UI is split into distinct panels:
//! - Top bar: title, photo controls, and status
//! - Central canvas: the globe
//! - Right panel: picture, caption, and location of the current post

mod canvas;
mod right_panel;
mod top_bar;

pub use canvas::render_canvas;
pub use right_panel::render_right_panel;
pub use top_bar::render_top_bar;
