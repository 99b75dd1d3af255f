//! # Store Messages
//!
//! Message types exchanged between a [`StoreClient`](crate::StoreClient) and its
//! [`StoreActor`](crate::StoreActor).

use crate::entity::{Record, RecordId, Resource};
use crate::error::FrameworkError;
use std::fmt;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by store actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Predicate used by [`StoreRequest::FindAllBy`].
pub type Filter<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// Request sent to a store actor.
///
/// The variants mirror the store contract: find-all, find-one-by-id, save (insert-or-update)
/// and delete. `FindAllBy` is find-all narrowed by a field predicate.
pub enum StoreRequest<R: Resource> {
    FindAll {
        respond_to: Response<Vec<Record<R>>>,
    },
    FindAllBy {
        filter: Filter<R>,
        respond_to: Response<Vec<Record<R>>>,
    },
    FindById {
        id: RecordId,
        respond_to: Response<Option<Record<R>>>,
    },
    /// `id: None` inserts with a freshly assigned id; `Some(id)` overwrites the live record `id`
    /// and fails with `NotFound` when there is none.
    Save {
        id: Option<RecordId>,
        fields: R,
        respond_to: Response<Record<R>>,
    },
    Delete {
        record: Record<R>,
        respond_to: Response<()>,
    },
}

impl<R: Resource> fmt::Debug for StoreRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreRequest::FindAll { .. } => f.write_str("FindAll"),
            StoreRequest::FindAllBy { .. } => f.write_str("FindAllBy"),
            StoreRequest::FindById { id, .. } => f.debug_struct("FindById").field("id", id).finish(),
            StoreRequest::Save { id, fields, .. } => f
                .debug_struct("Save")
                .field("id", id)
                .field("fields", fields)
                .finish(),
            StoreRequest::Delete { record, .. } => {
                f.debug_struct("Delete").field("id", &record.id).finish()
            }
        }
    }
}
