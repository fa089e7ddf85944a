//! Scroll target planning for vim-style motions.
//!
//! The engine does not touch the page; hosts call [`plan_scroll`] with the
//! current geometry of the chat history and apply the returned plan.

use super::actions::ScrollKind;
use std::fmt;
use std::time::Duration;

/// Pixels per line step.
pub const STEP: f64 = 60.0;
/// Pixels per line step while the key auto-repeats.
pub const STEP_REPEAT: f64 = 15.0;
/// Pixels per animation frame during continuous scrolling.
pub const SCROLLING_SPEED: f64 = 20.0;

const DURATION_FAST: Duration = Duration::from_millis(100);
const DURATION_SMOOTH: Duration = Duration::from_millis(200);

/// Geometry of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    /// Height of the visible window, used for half-page motions.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// Direction of a continuous scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Signed per-frame delta.
    pub fn frame_delta(self) -> f64 {
        match self {
            ScrollDirection::Up => -SCROLLING_SPEED,
            ScrollDirection::Down => SCROLLING_SPEED,
        }
    }
}

/// How the host should move the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollMotion {
    /// Ease to `target` over `duration`.
    Animate { target: f64, duration: Duration },
    /// Set the position immediately.
    Jump { target: f64 },
    /// Scroll every frame until the key is released.
    Continuous(ScrollDirection),
}

impl fmt::Display for ScrollMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollMotion::Animate { target, duration } => {
                write!(f, "animate to {}px over {}ms", target, duration.as_millis())
            }
            ScrollMotion::Jump { target } => write!(f, "jump to {}px", target),
            ScrollMotion::Continuous(ScrollDirection::Up) => f.write_str("continuous up"),
            ScrollMotion::Continuous(ScrollDirection::Down) => f.write_str("continuous down"),
        }
    }
}

/// Plan one motion. `repeat` is the key event's auto-repeat flag.
pub fn plan_scroll(kind: ScrollKind, metrics: &ScrollMetrics, repeat: bool) -> ScrollMotion {
    let step = if repeat { STEP_REPEAT } else { STEP };
    let half_page = metrics.viewport_height / 2.0;
    let raw = match kind {
        ScrollKind::Top => 0.0,
        ScrollKind::Bottom => metrics.max_scroll(),
        ScrollKind::Up => metrics.scroll_top - step,
        ScrollKind::Down => metrics.scroll_top + step,
        ScrollKind::HalfUp => metrics.scroll_top - half_page,
        ScrollKind::HalfDown => metrics.scroll_top + half_page,
    };
    let target = raw.clamp(0.0, metrics.max_scroll());

    match (kind, repeat) {
        (ScrollKind::Up, true) => ScrollMotion::Continuous(ScrollDirection::Up),
        (ScrollKind::Down, true) => ScrollMotion::Continuous(ScrollDirection::Down),
        (ScrollKind::Up | ScrollKind::Down, false) => ScrollMotion::Animate {
            target,
            duration: DURATION_FAST,
        },
        (_, true) => ScrollMotion::Jump { target },
        (_, false) => ScrollMotion::Animate {
            target,
            duration: DURATION_SMOOTH,
        },
    }
}
