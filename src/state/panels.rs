//! Side panel state: posts container, caption, and location display.

use std::time::Duration;
use web_time::Instant;

/// Duration of each half of the picture swap (fade out, then fade in).
pub const FADE_DURATION: Duration = Duration::from_millis(600);

/// A picture and the post it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureLink {
    pub picture_url: String,
    pub post_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadePhase {
    Idle,
    FadingOut { start: Instant },
    FadingIn { start: Instant },
}

/// Container showing the current post's picture.
///
/// Replacing the picture fades the old one out, swaps the content, and fades
/// the new one in.
#[derive(Debug, Clone)]
pub struct PostsContainer {
    shown: Option<PictureLink>,
    pending: Option<PictureLink>,
    fade: FadePhase,
}

impl Default for PostsContainer {
    fn default() -> Self {
        Self {
            shown: None,
            pending: None,
            fade: FadePhase::Idle,
        }
    }
}

impl PostsContainer {
    /// Replaces the container content with a new picture.
    pub fn add_picture(&mut self, picture_url: &str, post_url: &str, now: Instant) {
        self.pending = Some(PictureLink {
            picture_url: picture_url.to_string(),
            post_url: post_url.to_string(),
        });

        match self.fade {
            FadePhase::FadingOut { .. } => {}
            _ if self.shown.is_none() => {
                self.shown = self.pending.take();
                self.fade = FadePhase::FadingIn { start: now };
            }
            _ => self.fade = FadePhase::FadingOut { start: now },
        }
    }

    /// Advances the fade, swapping content at the midpoint.
    pub fn tick(&mut self, now: Instant) {
        match self.fade {
            FadePhase::FadingOut { start } if now >= start + FADE_DURATION => {
                self.shown = self.pending.take();
                self.fade = FadePhase::FadingIn {
                    start: start + FADE_DURATION,
                };
                self.tick(now);
            }
            FadePhase::FadingIn { start } if now >= start + FADE_DURATION => {
                self.fade = FadePhase::Idle;
            }
            _ => {}
        }
    }

    /// Opacity of the shown content at `now`.
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.fade {
            FadePhase::Idle => 1.0,
            FadePhase::FadingOut { start } => 1.0 - fade_progress(start, now),
            FadePhase::FadingIn { start } => fade_progress(start, now),
        }
    }

    pub fn shown(&self) -> Option<&PictureLink> {
        self.shown.as_ref()
    }

    /// Picture that will replace the shown one once faded out.
    pub fn pending(&self) -> Option<&PictureLink> {
        self.pending.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.fade != FadePhase::Idle
    }
}

fn fade_progress(start: Instant, now: Instant) -> f32 {
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f32() / FADE_DURATION.as_secs_f32()).min(1.0)
}

/// Location text shown under the picture.
#[derive(Debug, Clone)]
pub struct LocationDisplay {
    pub text: String,
    pub hidden: bool,
}

impl Default for LocationDisplay {
    fn default() -> Self {
        Self {
            text: String::new(),
            hidden: true,
        }
    }
}

impl LocationDisplay {
    /// Shows location data.
    pub fn show(&mut self, text: &str) {
        self.text = text.to_string();
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// Text to display, if the location is visible.
    pub fn visible_text(&self) -> Option<&str> {
        (!self.hidden).then_some(self.text.as_str())
    }
}
