//! Timed attribute transitions.

use std::fmt;
use std::time::Duration;

use super::AttrValue;
use super::interpolate::{ease_cubic_in_out, interpolate};

/// Identifies one redraw and every transition it scheduled.
///
/// Tokens are handed out in increasing order. A redraw that starts while an
/// older one is still animating cancels it: the older transitions freeze at
/// their sampled values and the new ones start from there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RedrawToken(pub(crate) u64);

impl RedrawToken {
    pub fn generation(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        RedrawToken(self.0 + 1)
    }
}

impl fmt::Display for RedrawToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "redraw #{}", self.0)
    }
}

/// One attribute moving from `from` to `to`
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub from: AttrValue,
    pub to: AttrValue,
    pub start: Duration,
    pub duration: Duration,
    pub token: RedrawToken,
}

impl Tween {
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    pub fn is_done(&self, now: Duration) -> bool {
        now >= self.end()
    }

    /// Eased progress in `[0, 1]`
    pub fn progress(&self, now: Duration) -> f64 {
        if self.is_done(now) {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start).as_secs_f64();
        ease_cubic_in_out(elapsed / self.duration.as_secs_f64())
    }

    pub fn sample(&self, now: Duration) -> AttrValue {
        if self.is_done(now) {
            return self.to.clone();
        }
        interpolate(&self.from, &self.to, self.progress(now))
    }
}
