//! Commands Layer
//!
//! The action surface handed to a presentation layer. Every command locks
//! the single planner, runs one engine operation, hands the document to the
//! background writer when the revision moved, and maps errors to strings.

mod day_cmd;
mod drawer_cmd;
mod history_cmd;
mod settings_cmd;
mod task_cmd;

pub use day_cmd::*;
pub use drawer_cmd::*;
pub use history_cmd::*;
pub use settings_cmd::*;
pub use task_cmd::*;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch, Mutex};

use crate::domain::{DayKey, DomainResult};
use crate::repository::StateRepository;
use crate::store::{Planner, PlannerDocument};

/// Work for the background writer, handled in order
enum WriterMsg {
    Save { revision: u64, document: PlannerDocument },
    Flush(oneshot::Sender<()>),
}

/// Application state shared across commands
pub struct AppState {
    planner: Mutex<Planner>,
    writer: mpsc::UnboundedSender<WriterMsg>,
    changes: watch::Sender<u64>,
}

impl AppState {
    /// Load the stored document (or start empty) and reconcile `today`.
    ///
    /// A document that exists but cannot be read is an error rather than
    /// an empty start, so the next save cannot overwrite it. Must be called
    /// inside a tokio runtime; the writer task is spawned here.
    pub async fn open(repo: Arc<dyn StateRepository>, today: DayKey) -> DomainResult<Self> {
        let document = match repo.load().await? {
            Some(document) => document,
            None => {
                log::info!("No saved planner found, starting empty");
                Default::default()
            }
        };

        let mut planner = Planner::new(document, today);
        planner.check_rollover(today);

        let (writer, queue) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(repo, queue));

        let (changes, _) = watch::channel(planner.revision());
        let state = Self {
            planner: Mutex::new(planner),
            writer,
            changes,
        };

        let planner = state.planner.lock().await;
        if planner.revision() > 0 {
            state.persist(&planner);
        }
        drop(planner);
        Ok(state)
    }

    /// Revision updates, one per committed change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Wait until every save queued so far has been attempted
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.writer.send(WriterMsg::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Run a mutating operation; persist and notify if it changed anything
    async fn run<T>(&self, op: impl FnOnce(&mut Planner) -> DomainResult<T>) -> Result<T, String> {
        let mut planner = self.planner.lock().await;
        let before = planner.revision();
        let result = op(&mut planner);
        if planner.revision() != before {
            self.persist(&planner);
        }
        result.map_err(|e| e.to_string())
    }

    /// Run a read-only query
    async fn view<T>(&self, query: impl FnOnce(&Planner) -> T) -> Result<T, String> {
        let planner = self.planner.lock().await;
        Ok(query(&planner))
    }

    /// Queue the current document for saving; does not wait for the write
    fn persist(&self, planner: &Planner) {
        let msg = WriterMsg::Save {
            revision: planner.revision(),
            document: planner.document(),
        };
        if self.writer.send(msg).is_err() {
            log::error!("Planner writer stopped, revision {} not saved", planner.revision());
        }
        self.changes.send_replace(planner.revision());
    }
}

/// Saves documents in the order they were queued. Failures are logged and
/// the next save simply writes the newer state.
async fn run_writer(repo: Arc<dyn StateRepository>, mut queue: mpsc::UnboundedReceiver<WriterMsg>) {
    while let Some(msg) = queue.recv().await {
        match msg {
            WriterMsg::Save { revision, document } => {
                if let Err(e) = repo.save(&document).await {
                    log::error!("Failed to save planner (revision {}): {}", revision, e);
                }
            }
            WriterMsg::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    log::debug!("Planner writer finished");
}
