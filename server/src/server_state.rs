use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

pub struct ServerState {
    /// Directory holding the built frontend (`index.html` and its assets).
    pub dist: PathBuf,
    visits: AtomicU64,
}

impl ServerState {
    pub fn new(dist: PathBuf) -> Self {
        Self {
            dist,
            visits: AtomicU64::new(0),
        }
    }

    /// Counts a page load and returns the running total.
    pub fn record_visit(&self) -> u64 {
        self.visits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn visits(&self) -> u64 {
        self.visits.load(Ordering::Relaxed)
    }
}
