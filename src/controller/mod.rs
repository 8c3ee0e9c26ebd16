mod state;

pub use state::{Hydration, Mutation, Notice, PendingWrite, RemoveAbsent, SelectionState, Staged};

use std::sync::Arc;

use tokio::sync::{oneshot, Mutex, Notify};

use crate::{
    entities::{Place, Selection},
    error::{unavailable_error, Error},
    external::Gateway,
};

/// How a call to [`Controller::add`] or [`Controller::remove`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Unchanged,
    /// Shown locally and handed to the write already in flight. A failure
    /// surfaces through [`Controller::notice`].
    Queued,
    Committed,
}

/// Keeps the picked places, updating them optimistically against a
/// [`Gateway`].
///
/// Replace calls run on a writer task spawned onto the tokio runtime, so a
/// caller that stops waiting does not stall later mutations. The state lock
/// is never held across a gateway call.
pub struct Controller<G> {
    shared: Arc<Shared<G>>,
}

struct Shared<G> {
    gateway: G,
    state: Mutex<SelectionState>,
    idle: Notify,
}

impl<G: Gateway + Send + Sync + 'static> Controller<G> {
    pub fn new(gateway: G, remove_absent: RemoveAbsent) -> Self {
        Self {
            shared: Arc::new(Shared {
                gateway,
                state: Mutex::new(SelectionState::new(remove_absent)),
                idle: Notify::new(),
            }),
        }
    }

    /// Loads the stored selection. Called once at start-up; mutations made
    /// meanwhile are written once it finishes.
    #[tracing::instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<(), Error> {
        let hydration = self.shared.state.lock().await.begin_hydrate();

        let shared = self.shared.clone();
        let task = tokio::spawn(async move {
            let result = shared.gateway.read().await;
            let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);

            let next = shared.state.lock().await.finish_hydrate(hydration, result);
            match next {
                Some(write) => {
                    tokio::spawn(drain(shared, write, None));
                }
                None => shared.idle.notify_waiters(),
            }

            outcome
        });

        task.await
            .unwrap_or_else(|err| Err(unavailable_error().with_message(err.to_string())))
    }

    pub async fn available_places(&self) -> Result<Vec<Place>, Error> {
        self.shared.gateway.fetch_available_places().await
    }

    #[tracing::instrument(skip(self, place), fields(id = %place.id))]
    pub async fn add(&self, place: Place) -> Result<Applied, Error> {
        self.submit(Mutation::Add(place)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<Applied, Error> {
        self.submit(Mutation::Remove(id.to_string())).await
    }

    pub async fn selection(&self) -> Selection {
        self.shared.state.lock().await.displayed().clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.shared.state.lock().await.is_loading()
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.shared.state.lock().await.notice().cloned()
    }

    pub async fn load_error(&self) -> Option<Notice> {
        self.shared.state.lock().await.load_error().cloned()
    }

    pub async fn dismiss(&self) {
        self.shared.state.lock().await.dismiss();
    }

    pub async fn teardown(&self) {
        self.shared.state.lock().await.teardown();
        self.shared.idle.notify_waiters();
    }

    /// Waits until no write is in flight or queued.
    pub async fn flush(&self) {
        loop {
            let idle = self.shared.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();

            {
                let state = self.shared.state.lock().await;
                if !state.is_writing() && state.queued() == 0 {
                    return;
                }
            }

            idle.await;
        }
    }

    /// Stages `mutation` and, when no write is in flight, starts a writer
    /// that drains the queue. Waits only for this call's own write; its
    /// failure is returned as an error.
    async fn submit(&self, mutation: Mutation) -> Result<Applied, Error> {
        let staged = self.shared.state.lock().await.stage(mutation);

        let write = match staged {
            Staged::Unchanged => return Ok(Applied::Unchanged),
            Staged::Queued(_) => return Ok(Applied::Queued),
            Staged::Write(write) => write,
        };

        let (tx, rx) = oneshot::channel();
        tokio::spawn(drain(self.shared.clone(), write, Some(tx)));

        match rx.await {
            Ok(result) => result.map(|()| Applied::Committed),
            Err(_) => Err(unavailable_error().with_message("writer stopped")),
        }
    }
}

/// Issues `write` and every write queued behind it, one at a time. The
/// outcome of the first one is reported on `reply`.
async fn drain<G: Gateway + Send + Sync>(
    shared: Arc<Shared<G>>,
    write: PendingWrite,
    mut reply: Option<oneshot::Sender<Result<(), Error>>>,
) {
    let mut next = Some(write);

    while let Some(write) = next {
        let result = shared
            .gateway
            .replace(write.payload().places().to_vec())
            .await
            .map(|message| {
                tracing::debug!("gateway: {}", message);
            });

        next = shared.state.lock().await.settle(write, result.clone());

        if let Some(reply) = reply.take() {
            // the caller may have stopped waiting
            let _ = reply.send(result);
        }
    }

    shared.idle.notify_waiters();
}
