//! Local filesystem watcher feeding change events to the sync loop

use std::path::Path;

use mirror_core::ChangeEvent;
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;

/// Pending events buffered between the watcher thread and the sync loop
const EVENT_BUFFER: usize = 256;

/// Translate one notify event into the change events worth syncing.
///
/// Creations, content writes and renames onto a path count as changes.
/// Removals, access and metadata-only events produce nothing. A rename's
/// combined `Both` event is dropped because its `To` half already names
/// the destination.
pub fn change_events(event: &Event) -> Vec<ChangeEvent> {
    match &event.kind {
        EventKind::Create(kind) => event
            .paths
            .iter()
            .map(|path| ChangeEvent {
                path: path.clone(),
                is_dir: *kind == CreateKind::Folder || path.is_dir(),
            })
            .collect(),
        EventKind::Modify(
            ModifyKind::Data(_)
            | ModifyKind::Any
            | ModifyKind::Name(RenameMode::To | RenameMode::Any),
        ) => event.paths.iter().map(|path| to_event(path)).collect(),
        _ => Vec::new(),
    }
}

fn to_event(path: &Path) -> ChangeEvent {
    ChangeEvent {
        path: path.to_path_buf(),
        is_dir: path.is_dir(),
    }
}

/// Watch `root` recursively.
///
/// The returned watcher must be kept alive for events to keep arriving.
pub fn start(root: &Path) -> Result<(RecommendedWatcher, mpsc::Receiver<ChangeEvent>)> {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            for change in change_events(&event) {
                debug!(path = %change.path.display(), kind = ?event.kind, "Change detected");
                if tx.blocking_send(change).is_err() {
                    return;
                }
            }
        }
        Err(e) => warn!("Watcher error: {}", e),
    })?;
    watcher.watch(root, RecursiveMode::Recursive)?;

    Ok((watcher, rx))
}
