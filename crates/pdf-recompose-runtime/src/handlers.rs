use crate::{RecomposeCommand, RecomposeUpdate};
use pdf_recompose::{Session, SourceId, display_name, load_pdf_bytes};
use std::path::PathBuf;
use tokio::sync::mpsc;

pub(crate) async fn handle_add_source(
    name: String,
    bytes: Vec<u8>,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<RecomposeUpdate>,
) {
    match session.add_source(bytes, name.clone()).await {
        Ok(source_id) => {
            let page_count = session.registry().page_count(source_id).await.unwrap_or(0);
            let _ = update_tx.send(RecomposeUpdate::SourceAdded {
                source_id,
                name,
                page_count,
            });
            send_pages(session, update_tx);
            send_advisories(session, update_tx);
        }
        Err(e) => {
            let _ = update_tx.send(RecomposeUpdate::Error {
                message: format!("Could not load \"{name}\". Is it a valid PDF? ({e})"),
            });
        }
    }
}

pub(crate) async fn handle_load_file(
    path: PathBuf,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<RecomposeUpdate>,
) {
    match load_pdf_bytes(&path).await {
        Ok(bytes) => handle_add_source(display_name(&path), bytes, session, update_tx).await,
        Err(e) => {
            let _ = update_tx.send(RecomposeUpdate::Error {
                message: format!("Failed to read {}: {e}", path.display()),
            });
        }
    }
}

pub(crate) async fn handle_assemble(
    session: &Session,
    update_tx: &mpsc::UnboundedSender<RecomposeUpdate>,
) {
    let _ = update_tx.send(RecomposeUpdate::Progress {
        operation: "Assembling pages".to_string(),
        current: 0,
        total: session.catalog().len(),
    });

    match session.assemble().await {
        Ok(bytes) => {
            log::info!("Assembled {} bytes", bytes.len());
            let _ = update_tx.send(RecomposeUpdate::Assembled { bytes });
        }
        Err(e) => {
            let _ = update_tx.send(RecomposeUpdate::Error {
                message: format!("Failed to assemble PDF: {e}"),
            });
        }
    }
}

pub(crate) async fn handle_assemble_ranges(
    source_id: SourceId,
    ranges: Vec<Vec<usize>>,
    session: &Session,
    update_tx: &mpsc::UnboundedSender<RecomposeUpdate>,
) {
    let _ = update_tx.send(RecomposeUpdate::Progress {
        operation: "Extracting ranges".to_string(),
        current: 0,
        total: ranges.len(),
    });

    match session.assemble_ranges(source_id, ranges).await {
        Ok(outputs) => {
            let outputs = outputs
                .into_iter()
                .map(|output| output.map_err(|e| e.to_string()))
                .collect();
            let _ = update_tx.send(RecomposeUpdate::RangesAssembled { outputs });
        }
        Err(e) => {
            let _ = update_tx.send(RecomposeUpdate::Error {
                message: format!("Failed to split PDF: {e}"),
            });
        }
    }
}

pub(crate) fn send_pages(session: &Session, update_tx: &mpsc::UnboundedSender<RecomposeUpdate>) {
    let _ = update_tx.send(RecomposeUpdate::PagesChanged {
        pages: session.list_pages(),
    });
}

pub(crate) fn send_advisories(
    session: &Session,
    update_tx: &mpsc::UnboundedSender<RecomposeUpdate>,
) {
    let _ = update_tx.send(RecomposeUpdate::Advisories {
        messages: session.advisories(),
    });
}

/// Whether `cmd` only rearranges the catalog
pub(crate) fn is_edit(cmd: &RecomposeCommand) -> bool {
    matches!(
        cmd,
        RecomposeCommand::MovePage { .. }
            | RecomposeCommand::DragPage { .. }
            | RecomposeCommand::RotatePage { .. }
            | RecomposeCommand::RemovePage { .. }
    )
}

/// Apply a catalog edit. Returns `true` if the catalog changed.
pub(crate) fn apply_edit(
    cmd: RecomposeCommand,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<RecomposeUpdate>,
) -> bool {
    match cmd {
        RecomposeCommand::MovePage { page_id, direction } => session.move_page(page_id, direction),
        RecomposeCommand::DragPage { from, to } => session.drag_page(from, to),
        RecomposeCommand::RotatePage { page_id, degrees } => {
            match session.rotate_page(page_id, degrees) {
                Ok(changed) => changed,
                Err(e) => {
                    let _ = update_tx.send(RecomposeUpdate::Error {
                        message: e.to_string(),
                    });
                    false
                }
            }
        }
        RecomposeCommand::RemovePage { page_id } => {
            let removed = session.remove_page(page_id);
            if removed {
                send_advisories(session, update_tx);
            }
            removed
        }
        other => {
            log::warn!("Ignoring non-edit command {:?}", other);
            false
        }
    }
}
