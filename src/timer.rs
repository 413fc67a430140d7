/// One-shot countdown driven by frame deltas.
///
/// Owned by whatever scheduled it; dropping the owner cancels it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f64,
}

impl Countdown {
    pub fn new(secs: f64) -> Self {
        Self {
            remaining: secs.max(0.0),
        }
    }

    /// Consumes `dt` seconds. Returns true once the countdown has run out.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.remaining = (self.remaining - sanitize_dt(dt)).max(0.0);
        self.remaining <= 0.0
    }
}

/// Negative or non-finite frame deltas count as zero.
pub(crate) fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}
