use crate::handlers;
use crate::{RecomposeCommand, RecomposeUpdate};
use pdf_recompose::Session;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Start a worker on the current runtime and return its channels.
pub fn spawn_worker() -> (
    mpsc::UnboundedSender<RecomposeCommand>,
    mpsc::UnboundedReceiver<RecomposeUpdate>,
    JoinHandle<()>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(worker_task(command_rx, update_tx));
    (command_tx, update_rx, handle)
}

/// Async worker task that owns one session and processes commands in order.
///
/// Commands are handled strictly one at a time, so edits sent while an assembly
/// is running wait in the channel until it has finished.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<RecomposeCommand>,
    update_tx: mpsc::UnboundedSender<RecomposeUpdate>,
) {
    let mut session = Session::new();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut session, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: RecomposeCommand,
    session: &mut Session,
    command_rx: &mut mpsc::UnboundedReceiver<RecomposeCommand>,
    update_tx: &mpsc::UnboundedSender<RecomposeUpdate>,
) {
    match cmd {
        RecomposeCommand::AddSource { name, bytes } => {
            handlers::handle_add_source(name, bytes, session, update_tx).await;
        }
        RecomposeCommand::LoadFile { path } => {
            handlers::handle_load_file(path, session, update_tx).await;
        }
        RecomposeCommand::ListPages => {
            handlers::send_pages(session, update_tx);
        }
        RecomposeCommand::Advise => {
            handlers::send_advisories(session, update_tx);
        }
        RecomposeCommand::Assemble => {
            handlers::handle_assemble(session, update_tx).await;
        }
        RecomposeCommand::AssembleRanges { source_id, ranges } => {
            handlers::handle_assemble_ranges(source_id, ranges, session, update_tx).await;
        }
        edit => {
            let mut changed = handlers::apply_edit(edit, session, update_tx);

            // Apply a burst of queued edits (a drag gesture, say) before reporting
            while let Ok(next_cmd) = command_rx.try_recv() {
                if handlers::is_edit(&next_cmd) {
                    changed |= handlers::apply_edit(next_cmd, session, update_tx);
                } else {
                    // Report what has been applied so far, then handle the
                    // non-edit command in its original position
                    if changed {
                        handlers::send_pages(session, update_tx);
                        changed = false;
                    }
                    Box::pin(process_command(next_cmd, session, command_rx, update_tx)).await;
                }
            }

            if changed {
                handlers::send_pages(session, update_tx);
            }
        }
    }
}
