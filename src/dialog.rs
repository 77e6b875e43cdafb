//! Dialog lifecycle management.
//!
//! Interactive probes present UI artifacts (a confirmation dialog, a touch
//! grid, a recording panel). The lifecycle manager guarantees that exactly
//! one probe's artifacts are visible while it runs and that everything is
//! hidden before the next probe begins and after the run completes or is
//! reset. It is a best-effort visibility toggle with no resource
//! acquisition, so it has no error path.

use std::sync::Mutex;

/// Visibility control around each probe's UI artifacts.
///
/// `prepare` runs before a probe starts; `teardown_all` runs at run start,
/// run end, and reset, and must be idempotent.
pub trait DialogLifecycle: Send + Sync {
    /// Hides all known dialog artifacts, then records that the probe at
    /// `index` may show its own.
    fn prepare(&self, index: usize);

    /// Unconditionally hides every dialog artifact. Callable at any time.
    fn teardown_all(&self);
}

/// Bookkeeping implementation tracking which probe's panel is visible.
///
/// Front-ends poll [`DialogBoard::visible`] to decide what to render; the
/// board itself enforces the one-visible-panel invariant.
#[derive(Default)]
pub struct DialogBoard {
    visible: Mutex<Option<usize>>,
}

impl DialogBoard {
    /// Creates a board with nothing visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the probe whose panel is currently visible, if any.
    pub fn visible(&self) -> Option<usize> {
        match self.visible.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl DialogLifecycle for DialogBoard {
    fn prepare(&self, index: usize) {
        let mut guard = match self.visible.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = guard.take() {
            log::debug!("Hiding dialog panel for probe {}", previous);
        }
        *guard = Some(index);
    }

    fn teardown_all(&self) {
        let mut guard = match self.visible.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
    }
}

/// No-op lifecycle for headless runs (tests, `--yes` mode).
#[derive(Default, Clone, Copy)]
pub struct NullDialogs;

impl DialogLifecycle for NullDialogs {
    fn prepare(&self, _index: usize) {}

    fn teardown_all(&self) {}
}
