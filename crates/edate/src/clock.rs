use crate::Instant;

/// A source of "now".
///
/// The picker asks the clock whenever it needs a default cursor position,
/// so hosts (and tests) can pin time down with a [`FixedClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Local wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Always returns the same [`Instant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub Instant);

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> Instant {
        self.0
    }
}
