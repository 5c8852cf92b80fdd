use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::{
    domain::{validate_post_list, Post},
    error::SyncFailureKind,
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::SyncError,
    source::{HttpPostSource, PostSource},
    store::{SharedContentStore, WeakContentStore},
};

const SYNC_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Per-request timeout. `None` waits for as long as the transport does.
    pub request_timeout: Option<Duration>,
    /// Reject lists with duplicate ids or unparseable dates instead of
    /// committing them.
    pub validate_posts: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// A newer activation was started against the same store.
    StaleGeneration,
    /// The store was dropped while the fetch was in flight.
    StoreDropped,
}

/// `Idle -> Fetching -> terminal`. `Fetching` is entered at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Committed { post_count: usize },
    /// The store was left untouched; only this state and the event stream
    /// tell the failure apart from never having synced.
    FailedSilent(SyncFailureKind),
    Cancelled,
    Discarded(DiscardReason),
}

impl SyncState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SyncState::Idle | SyncState::Fetching)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Started {
        source: String,
        generation: u64,
    },
    Committed {
        generation: u64,
        post_count: usize,
    },
    Failed {
        kind: SyncFailureKind,
        message: String,
    },
    Discarded(DiscardReason),
    Cancelled,
}

fn lock_state(state: &Mutex<SyncState>) -> MutexGuard<'_, SyncState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fetches the post list once and commits it to a store.
///
/// Failures never reach the store: whatever it held before activation stays
/// visible. They are logged and published on [`SyncController::subscribe_events`].
pub struct SyncController {
    source: Arc<dyn PostSource>,
    options: SyncOptions,
    state: Arc<Mutex<SyncState>>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncController {
    pub fn new(endpoint: Url, options: SyncOptions) -> Self {
        let source = HttpPostSource::new(endpoint).with_timeout(options.request_timeout);
        Self::with_source(Arc::new(source), options)
    }

    pub fn with_source(source: Arc<dyn PostSource>, options: SyncOptions) -> Self {
        let (events, _) = broadcast::channel(SYNC_EVENT_CAPACITY);
        Self {
            source,
            options,
            state: Arc::new(Mutex::new(SyncState::Idle)),
            events,
        }
    }

    pub fn state(&self) -> SyncState {
        *lock_state(&self.state)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Spawns the fetch onto the current tokio runtime and returns
    /// immediately. Must be called from within a runtime.
    pub fn start(&self, store: &SharedContentStore) -> Result<SyncHandle, SyncError> {
        let task = self.activate(store)?;
        let join = tokio::spawn(task.run());
        Ok(SyncHandle {
            join,
            state: self.state.clone(),
            events: self.events.clone(),
        })
    }

    /// Same flow as [`SyncController::start`], awaited inline.
    pub async fn run(&self, store: &SharedContentStore) -> Result<SyncState, SyncError> {
        let task = self.activate(store)?;
        Ok(task.run().await)
    }

    fn activate(&self, store: &SharedContentStore) -> Result<SyncTask, SyncError> {
        {
            let mut state = lock_state(&self.state);
            if *state != SyncState::Idle {
                return Err(SyncError::AlreadyActivated);
            }
            *state = SyncState::Fetching;
        }

        Ok(SyncTask {
            source: self.source.clone(),
            validate_posts: self.options.validate_posts,
            generation: store.begin_sync(),
            store: store.downgrade(),
            state: self.state.clone(),
            events: self.events.clone(),
        })
    }
}

struct SyncTask {
    source: Arc<dyn PostSource>,
    validate_posts: bool,
    generation: u64,
    store: WeakContentStore,
    state: Arc<Mutex<SyncState>>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncTask {
    async fn run(self) -> SyncState {
        let source = self.source.describe();
        info!(source = %source, generation = self.generation, "fetching posts");
        let _ = self.events.send(SyncEvent::Started {
            source,
            generation: self.generation,
        });

        let fetched = self.source.fetch_posts().await.and_then(|posts| {
            if self.validate_posts {
                validate_post_list(&posts)?;
            }
            Ok(posts)
        });

        match fetched {
            Ok(posts) => self.commit(posts),
            Err(err) => self.fail(err),
        }
    }

    fn commit(&self, posts: Vec<Post>) -> SyncState {
        // Holding the state lock across the store write keeps a concurrent
        // cancel from landing between the two.
        let mut state = lock_state(&self.state);
        if *state == SyncState::Cancelled {
            return SyncState::Cancelled;
        }

        let post_count = posts.len();
        let outcome = match self.store.upgrade() {
            None => SyncState::Discarded(DiscardReason::StoreDropped),
            Some(store) => {
                if store.commit_sync(self.generation, posts) {
                    SyncState::Committed { post_count }
                } else {
                    SyncState::Discarded(DiscardReason::StaleGeneration)
                }
            }
        };
        *state = outcome;
        drop(state);

        match outcome {
            SyncState::Committed { post_count } => {
                info!(generation = self.generation, post_count, "committed fetched posts");
                let _ = self.events.send(SyncEvent::Committed {
                    generation: self.generation,
                    post_count,
                });
            }
            SyncState::Discarded(reason) => {
                debug!(generation = self.generation, ?reason, "discarded fetched posts");
                let _ = self.events.send(SyncEvent::Discarded(reason));
            }
            _ => {}
        }
        outcome
    }

    fn fail(&self, err: SyncError) -> SyncState {
        let kind = err.kind().unwrap_or(SyncFailureKind::ParseFailure);
        let mut state = lock_state(&self.state);
        if *state == SyncState::Cancelled {
            return SyncState::Cancelled;
        }
        *state = SyncState::FailedSilent(kind);
        drop(state);

        warn!(
            kind = kind.label(),
            generation = self.generation,
            error = %err,
            "post sync failed; keeping current posts"
        );
        let _ = self.events.send(SyncEvent::Failed {
            kind,
            message: err.to_string(),
        });
        SyncState::FailedSilent(kind)
    }
}

/// Handle to a spawned sync. Dropping it detaches the task.
pub struct SyncHandle {
    join: JoinHandle<SyncState>,
    state: Arc<Mutex<SyncState>>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncHandle {
    /// Stops an in-flight fetch. No-op once the sync has reached a terminal
    /// state.
    pub fn cancel(&self) {
        {
            let mut state = lock_state(&self.state);
            if state.is_terminal() {
                return;
            }
            *state = SyncState::Cancelled;
        }
        self.join.abort();
        debug!("cancelled in-flight post sync");
        let _ = self.events.send(SyncEvent::Cancelled);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub async fn join(self) -> SyncState {
        match self.join.await {
            Ok(state) => state,
            Err(err) if err.is_cancelled() => SyncState::Cancelled,
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
