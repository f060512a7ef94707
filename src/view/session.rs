//! Serialises view recomputations for one interactive user.
//!
//! A session owns a background task that recomputes the views whenever the parameters
//! change. At most one recomputation runs at a time. Submissions made while one is running
//! are coalesced: when it finishes, only the most recent parameters are computed and the
//! ones in between are skipped.

use crate::store::SnapshotStore;
use crate::view::engine::{load_views, Views};
use crate::view::error::ViewError;
use crate::view::params::ViewParams;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recomputing,
}

#[derive(Debug, Clone)]
pub enum ViewOutcome {
    Ready(Views),
    /// The snapshot table has not been written yet.
    NoData,
    Failed(Arc<ViewError>),
}

/// Result of one recomputation. `seq` is the submission number it answers.
#[derive(Debug, Clone)]
pub struct ViewUpdate {
    pub seq: u64,
    pub params: ViewParams,
    pub outcome: ViewOutcome,
}

#[derive(Debug, Clone, Copy)]
struct Submission {
    seq: u64,
    params: ViewParams,
}

/// Handle to a running view session. Clones share the same session; the background
/// task stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct ViewSession {
    submissions: Arc<watch::Sender<Submission>>,
    updates: watch::Receiver<Option<ViewUpdate>>,
    state: watch::Receiver<SessionState>,
    table: Arc<str>,
}

impl ViewSession {
    /// Starts the session and immediately computes views for `initial`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        store: Arc<dyn SnapshotStore>,
        table: impl Into<String>,
        initial: ViewParams,
    ) -> Self {
        let table: Arc<str> = Arc::from(table.into());
        let (submissions, submission_rx) = watch::channel(Submission {
            seq: 0,
            params: initial,
        });
        let (update_tx, updates) = watch::channel(None);
        let (state_tx, state) = watch::channel(SessionState::Idle);

        tokio::spawn(run(
            store,
            Arc::clone(&table),
            submission_rx,
            update_tx,
            state_tx,
        ));

        ViewSession {
            submissions: Arc::new(submissions),
            updates,
            state,
            table,
        }
    }

    /// Submits new parameters and returns their submission number.
    pub fn set_params(&self, params: ViewParams) -> u64 {
        let mut seq = 0;
        self.submissions.send_modify(|s| {
            s.seq += 1;
            s.params = params;
            seq = s.seq;
        });
        seq
    }

    /// Recomputes the current parameters against the latest snapshot.
    pub fn refresh(&self) -> u64 {
        let mut seq = 0;
        self.submissions.send_modify(|s| {
            s.seq += 1;
            seq = s.seq;
        });
        seq
    }

    /// The most recently submitted parameters.
    pub fn params(&self) -> ViewParams {
        self.submissions.borrow().params
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn latest(&self) -> Option<ViewUpdate> {
        self.updates.borrow().clone()
    }

    /// Receiver notified on every finished recomputation.
    pub fn subscribe(&self) -> watch::Receiver<Option<ViewUpdate>> {
        self.updates.clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Waits for the first update answering submission `seq` or a later one.
    /// `None` if the session stopped first.
    pub async fn wait_for(&self, seq: u64) -> Option<ViewUpdate> {
        let mut updates = self.updates.clone();
        let update = updates
            .wait_for(|u| u.as_ref().is_some_and(|u| u.seq >= seq))
            .await
            .ok()?;
        update.clone()
    }
}

async fn run(
    store: Arc<dyn SnapshotStore>,
    table: Arc<str>,
    mut submissions: watch::Receiver<Submission>,
    updates: watch::Sender<Option<ViewUpdate>>,
    state: watch::Sender<SessionState>,
) {
    loop {
        let Submission { seq, params } = *submissions.borrow_and_update();
        state.send_replace(SessionState::Recomputing);
        debug!("Recomputing views #{} for {}", seq, params);

        let outcome = recompute(Arc::clone(&store), Arc::clone(&table), params).await;
        updates.send_replace(Some(ViewUpdate {
            seq,
            params,
            outcome,
        }));
        state.send_replace(SessionState::Idle);

        // Resolves at once if newer parameters arrived while recomputing.
        if submissions.changed().await.is_err() {
            debug!("View session for '{}' closed", table);
            break;
        }
    }
}

async fn recompute(
    store: Arc<dyn SnapshotStore>,
    table: Arc<str>,
    params: ViewParams,
) -> ViewOutcome {
    let result = tokio::task::spawn_blocking(move || load_views(store.as_ref(), &table, params))
        .await
        .map_err(ViewError::from)
        .and_then(|r| r);
    match result {
        Ok(views) => ViewOutcome::Ready(views),
        Err(ViewError::NoData { .. }) => ViewOutcome::NoData,
        Err(e) => {
            warn!("View recomputation for {} failed: {}", params, e);
            ViewOutcome::Failed(Arc::new(e))
        }
    }
}
