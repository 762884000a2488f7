//! One run, end to end: fetch, parse, save, compare, report.
//!
//! Each stage either succeeds or aborts the run with its error. The only
//! expected non-error branch is a missing previous snapshot.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::catalog::{self, CatalogSnapshot};
use crate::error::{Error, Result};
use crate::report::{Renderer, Sink};
use crate::source::CatalogSource;
use crate::store::diff;
use crate::store::SnapshotStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing to compare against yet
    FirstRun { saved: PathBuf },
    Compared {
        saved: PathBuf,
        previous: PathBuf,
        additions: usize,
    },
}

pub fn run(
    source: &dyn CatalogSource,
    store: &SnapshotStore,
    today: NaiveDate,
    renderer: &Renderer,
    sink: &mut dyn Sink,
) -> Result<RunOutcome> {
    let catalog_url = source.resolve_catalog_url()?;
    let raw = source.fetch_text(&catalog_url)?;
    let current = catalog::parse(&raw)?;
    info!(items = current.len(), "catalog parsed");

    let saved = store.write(&current, today)?;
    sink.emit(&format!("Content saved as {}", saved.display()))?;

    let Some(previous_file) = store.find_previous(&saved)? else {
        sink.emit("No previous file found")?;
        return Ok(RunOutcome::FirstRun { saved });
    };

    let previous = store.read(&previous_file.path)?;
    let additions = report_additions(&current, &previous, renderer, sink)?;

    Ok(RunOutcome::Compared {
        saved,
        previous: previous_file.path,
        additions,
    })
}

/// Emit the new items of `current` relative to `previous`; returns how many there were.
pub fn report_additions(
    current: &CatalogSnapshot,
    previous: &CatalogSnapshot,
    renderer: &Renderer,
    sink: &mut dyn Sink,
) -> Result<usize> {
    let additions = diff::new_additions(current, previous);
    if additions.is_empty() {
        sink.emit("No new additions found")?;
        return Ok(0);
    }

    sink.emit("New additions:")?;
    for addition in &additions {
        sink.emit(&renderer.render(addition))?;
    }
    Ok(additions.len())
}

/// Compare two stored snapshots, defaulting to the two most recent
pub fn diff_stored(
    store: &SnapshotStore,
    dates: Option<(NaiveDate, NaiveDate)>,
    renderer: &Renderer,
    sink: &mut dyn Sink,
) -> Result<usize> {
    let (from, to) = match dates {
        Some((from, to)) => (store.path_for(from), store.path_for(to)),
        None => {
            let files = store.list()?;
            match files.as_slice() {
                [newest, older, ..] => (older.path.clone(), newest.path.clone()),
                _ => return Err(Error::NotEnoughSnapshots { found: files.len() }),
            }
        }
    };

    sink.emit(&format!("Comparing {} -> {}", from.display(), to.display()))?;
    let previous = store.read(&from)?;
    let current = store.read(&to)?;
    report_additions(&current, &previous, renderer, sink)
}

pub fn list(store: &SnapshotStore, sink: &mut dyn Sink) -> Result<()> {
    let files = store.list()?;
    if files.is_empty() {
        sink.emit("No snapshots found.")?;
        return Ok(());
    }

    for file in files {
        sink.emit(&format!("{}  {}", file.date, file.path.display()))?;
    }
    Ok(())
}
