pub mod markup;
pub mod meta;
pub mod normalize;
pub mod walker;

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, ScheduleError};
use crate::schedule::Schedule;
use walker::Walker;

/// Single pass: markup events → walker → metadata + per-day sort.
pub fn parse_document(html: &str) -> Schedule {
    let mut walker = Walker::new();
    markup::read_events(html, |ev| walker.handle(ev));
    let (mut events, stats) = walker.finish();
    events.sort_by_start();

    info!(
        "Parsed {} events from {} cells ({} empty, {} outside the week)",
        stats.events, stats.cells, stats.empty_cells, stats.out_of_range
    );
    if !stats.sections.is_empty() {
        debug!("Sections: {}", stats.sections.join(" | "));
    }

    Schedule {
        meta: meta::extract(html),
        events,
    }
}

pub fn parse_file(path: &Path) -> Result<Schedule> {
    let html = std::fs::read_to_string(path).map_err(|source| ScheduleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Read {} ({} bytes)", path.display(), html.len());
    Ok(parse_document(&html))
}

// ── Tests ──
