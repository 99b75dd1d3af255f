//! # Store Client
//!
//! The client half of a resource store: a cheap, cloneable handle that turns method calls into
//! [`StoreRequest`] messages.

use crate::entity::{Record, RecordId, Resource};
use crate::error::FrameworkError;
use crate::message::{Filter, StoreRequest};
use tokio::sync::{mpsc, oneshot};

/// ## StoreClient
///
/// `StoreClient<R>` provides a type-safe, async API over a `StoreActor<R>`. Every call sends one
/// request over a Tokio mpsc channel and awaits the reply on a oneshot channel.
///
/// * **Cloneable**: holds only a sender, so cloning is inexpensive.
/// * **Async API**: every method resolves to `Result<_, FrameworkError>`.
/// * **Generic**: works with any type that implements [`Resource`].
pub struct StoreClient<R: Resource> {
    sender: mpsc::Sender<StoreRequest<R>>,
}

// derive(Clone) would demand R: Clone on the sender, which it doesn't need
impl<R: Resource> Clone for StoreClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<R: Resource> StoreClient<R> {
    pub fn new(sender: mpsc::Sender<StoreRequest<R>>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, FrameworkError>>) -> StoreRequest<R>,
    ) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn find_all(&self) -> Result<Vec<Record<R>>, FrameworkError> {
        self.request(|respond_to| StoreRequest::FindAll { respond_to })
            .await
    }

    pub async fn find_all_by(&self, filter: Filter<R>) -> Result<Vec<Record<R>>, FrameworkError> {
        self.request(|respond_to| StoreRequest::FindAllBy { filter, respond_to })
            .await
    }

    pub async fn find_by_id(&self, id: RecordId) -> Result<Option<Record<R>>, FrameworkError> {
        self.request(|respond_to| StoreRequest::FindById { id, respond_to })
            .await
    }

    /// Inserts (`id: None`) or overwrites (`Some(id)`) and returns the stored record.
    pub async fn save(&self, id: Option<RecordId>, fields: R) -> Result<Record<R>, FrameworkError> {
        self.request(|respond_to| StoreRequest::Save {
            id,
            fields,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, record: Record<R>) -> Result<(), FrameworkError> {
        self.request(|respond_to| StoreRequest::Delete { record, respond_to })
            .await
    }
}
