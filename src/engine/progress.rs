//! Progress counter for streamed results (verbose CLI only).

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Counter for an open-ended total (shows count without percentage).
pub fn create_counter(desc: &'static str, unit: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = unit
    )))
}

/// Force a refresh of the bar (e.g. so the counter shows 0 immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Advance the counter. Uses try_lock so a contended bar never blocks the caller.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Counter for `verbose`, shown immediately; None otherwise.
pub fn setup_counter(verbose: bool, desc: &'static str, unit: &'static str) -> Option<ProgressBar> {
    verbose.then(|| {
        let bar = create_counter(desc, unit);
        refresh_bar(&bar);
        bar
    })
}
