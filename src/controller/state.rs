use std::collections::VecDeque;
use std::str::FromStr;

use crate::entities::{Place, Selection};
use crate::error::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Add(Place),
    Remove(String),
}

impl Mutation {
    fn apply(&self, selection: &Selection) -> Selection {
        match self {
            Mutation::Add(place) => selection
                .with_added(place)
                .unwrap_or_else(|| selection.clone()),
            Mutation::Remove(id) => selection.without(id),
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Mutation::Add(_) => "Failed to update places.",
            Mutation::Remove(_) => "Failed to delete place.",
        }
    }
}

/// What `remove` does when the id is not in the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemoveAbsent {
    /// Still send the (unchanged) selection to the gateway.
    #[default]
    Write,
    /// Treat it as a no-op.
    Skip,
}

impl FromStr for RemoveAbsent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "write" => Ok(Self::Write),
            "skip" => Ok(Self::Skip),
            other => Err(format!("expected `write` or `skip`, got `{}`", other)),
        }
    }
}

/// A replace call the caller must issue and then hand back to
/// [`SelectionState::settle`].
#[derive(Clone, Debug, PartialEq)]
pub struct PendingWrite {
    seq: u64,
    generation: u64,
    snapshot: Selection,
    payload: Selection,
}

impl PendingWrite {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The selection as it was before this write's mutation.
    pub fn snapshot(&self) -> &Selection {
        &self.snapshot
    }

    /// The full list to send.
    pub fn payload(&self) -> &Selection {
        &self.payload
    }
}

#[derive(Debug, PartialEq)]
pub enum Staged {
    /// Nothing changed and nothing needs writing.
    Unchanged,
    /// Applied locally; its write will be issued once the one in flight settles.
    Queued(u64),
    Write(PendingWrite),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn from_error(err: &Error, fallback: &str) -> Self {
        let message = if err.message.is_empty() {
            fallback.to_string()
        } else {
            err.message.clone()
        };

        Self { message }
    }
}

/// Ticket for a hydrate started with [`SelectionState::begin_hydrate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hydration {
    generation: u64,
}

/// In-memory owner of the selection.
///
/// Mutations show up in [`displayed`](Self::displayed) as soon as they are
/// staged. At most one replace is in flight; later mutations wait in a queue
/// and their payload is computed from the last confirmed selection when they
/// are dequeued, so a failed write is never carried by a later one. Mutations
/// staged while a hydrate is pending wait the same way and are written on top
/// of the hydrated selection.
#[derive(Debug, Default)]
pub struct SelectionState {
    confirmed: Selection,
    displayed: Selection,
    in_flight: Option<(u64, Mutation)>,
    queue: VecDeque<(u64, Mutation)>,
    next_seq: u64,
    generation: u64,
    loading: bool,
    load_error: Option<Notice>,
    notice: Option<Notice>,
    remove_absent: RemoveAbsent,
}

impl SelectionState {
    pub fn new(remove_absent: RemoveAbsent) -> Self {
        Self {
            remove_absent,
            ..Default::default()
        }
    }

    pub fn displayed(&self) -> &Selection {
        &self.displayed
    }

    pub fn confirmed(&self) -> &Selection {
        &self.confirmed
    }

    pub fn is_writing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&Notice> {
        self.load_error.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Clears the update notice. The failed operation is not retried.
    pub fn dismiss(&mut self) {
        self.notice = None;
    }

    #[tracing::instrument(skip(self))]
    pub fn stage(&mut self, mutation: Mutation) -> Staged {
        if self.is_noop(&mutation, &self.displayed) {
            return Staged::Unchanged;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        if self.loading || self.in_flight.is_some() {
            tracing::debug!(seq, loading = self.loading, "write deferred, queueing");
            self.queue.push_back((seq, mutation));
            self.refresh_displayed();
            return Staged::Queued(seq);
        }

        Staged::Write(self.start(seq, mutation))
    }

    /// Records the outcome of `write` and returns the next write to issue, if
    /// any. A failure rolls the confirmed selection back to the write's
    /// snapshot and raises a notice.
    #[tracing::instrument(skip(self, write), fields(seq = write.seq))]
    pub fn settle(&mut self, write: PendingWrite, outcome: Result<(), Error>) -> Option<PendingWrite> {
        if write.generation != self.generation {
            tracing::debug!("ignoring write from a previous generation");
            return None;
        }

        let mutation = match self.in_flight.take() {
            Some((seq, mutation)) if seq == write.seq => mutation,
            other => {
                tracing::warn!("settled write is not the one in flight");
                self.in_flight = other;
                return None;
            }
        };

        match outcome {
            Ok(()) => self.confirmed = write.payload,
            Err(err) => {
                tracing::warn!("write failed, rolling back: {}", err);
                self.confirmed = write.snapshot;
                self.notice = Some(Notice::from_error(&err, mutation.failure_message()));
            }
        }

        self.next_write()
    }

    pub fn begin_hydrate(&mut self) -> Hydration {
        self.loading = true;

        Hydration {
            generation: self.generation,
        }
    }

    /// Adopts the stored selection and returns the first write deferred while
    /// it loaded, if any.
    ///
    /// On failure the selection stays as it was, a load error is raised and
    /// the deferred mutations are dropped: their payload cannot be computed
    /// without knowing what is stored. No retry.
    #[tracing::instrument(skip(self, outcome))]
    pub fn finish_hydrate(
        &mut self,
        hydration: Hydration,
        outcome: Result<Vec<Place>, Error>,
    ) -> Option<PendingWrite> {
        if hydration.generation != self.generation {
            tracing::debug!("ignoring hydrate from a previous generation");
            return None;
        }

        self.loading = false;

        match outcome {
            Ok(places) => {
                self.confirmed = Selection::from(places);
                self.load_error = None;
            }
            Err(err) => {
                tracing::warn!(
                    deferred = self.queue.len(),
                    "hydrate failed, dropping deferred mutations: {}",
                    err
                );
                self.queue.clear();
                self.load_error = Some(Notice::from_error(
                    &err,
                    "Failed to fetch already picked user places.",
                ));
            }
        }

        if self.in_flight.is_some() {
            self.refresh_displayed();
            return None;
        }

        self.next_write()
    }

    /// Forgets in-flight and queued writes; whatever they return later is
    /// ignored.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.queue.clear();
        self.loading = false;
        self.refresh_displayed();
    }

    fn is_noop(&self, mutation: &Mutation, selection: &Selection) -> bool {
        match mutation {
            Mutation::Add(place) => selection.contains(&place.id),
            Mutation::Remove(id) => {
                self.remove_absent == RemoveAbsent::Skip && !selection.contains(id)
            }
        }
    }

    fn next_write(&mut self) -> Option<PendingWrite> {
        while let Some((seq, mutation)) = self.queue.pop_front() {
            if self.is_noop(&mutation, &self.confirmed) {
                tracing::debug!(seq, "queued mutation no longer changes anything");
                continue;
            }

            return Some(self.start(seq, mutation));
        }

        self.refresh_displayed();
        None
    }

    fn start(&mut self, seq: u64, mutation: Mutation) -> PendingWrite {
        let snapshot = self.confirmed.clone();
        let payload = mutation.apply(&snapshot);

        self.in_flight = Some((seq, mutation));
        self.refresh_displayed();

        PendingWrite {
            seq,
            generation: self.generation,
            snapshot,
            payload,
        }
    }

    fn refresh_displayed(&mut self) {
        let pending = self.in_flight.iter().chain(self.queue.iter());

        self.displayed = pending.fold(self.confirmed.clone(), |selection, (_, mutation)| {
            mutation.apply(&selection)
        });
    }
}
