//! # ResourceStore Trait
//!
//! The seam between the [`ResourceHandler`](crate::ResourceHandler) and whatever holds the
//! records. The production implementation is [`StoreClient`], which talks to a `StoreActor`.
//! Tests can swap in the [`MockClient`](crate::mock::MockClient)'s client or any other type.
use crate::entity::{Record, RecordId, Resource};
use crate::error::FrameworkError;
use crate::message::Filter;
use crate::StoreClient;
use async_trait::async_trait;

/// Persistence contract for one resource kind.
///
/// # Example
///
/// ```rust
/// use resource_framework::{FrameworkError, Record, RecordId, Resource, ResourceStore};
/// use resource_framework::message::Filter;
/// use async_trait::async_trait;
/// use serde::{Deserialize, Serialize};
/// use std::sync::Mutex;
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Tag { label: String }
/// impl Resource for Tag {
///     const KIND: &'static str = "Tag";
///     const COLLECTION: &'static str = "tags";
/// }
///
/// // A store that only ever holds one record.
/// struct Single(Mutex<Option<Record<Tag>>>);
///
/// #[async_trait]
/// impl ResourceStore<Tag> for Single {
///     async fn find_all(&self) -> Result<Vec<Record<Tag>>, FrameworkError> {
///         Ok(self.0.lock().unwrap().iter().cloned().collect())
///     }
///     async fn find_all_by(&self, filter: Filter<Tag>) -> Result<Vec<Record<Tag>>, FrameworkError> {
///         Ok(self.find_all().await?.into_iter().filter(|r| filter(&r.fields)).collect())
///     }
///     async fn find_by_id(&self, id: RecordId) -> Result<Option<Record<Tag>>, FrameworkError> {
///         Ok(self.0.lock().unwrap().clone().filter(|r| r.id == id))
///     }
///     async fn save(&self, id: Option<RecordId>, fields: Tag) -> Result<Record<Tag>, FrameworkError> {
///         let record = Record::new(id.unwrap_or(0), fields);
///         *self.0.lock().unwrap() = Some(record.clone());
///         Ok(record)
///     }
///     async fn delete(&self, record: Record<Tag>) -> Result<(), FrameworkError> {
///         self.0.lock().unwrap().take().map(|_| ()).ok_or(FrameworkError::NotFound(record.id))
///     }
/// }
/// ```
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Record<R>>, FrameworkError>;

    async fn find_all_by(&self, filter: Filter<R>) -> Result<Vec<Record<R>>, FrameworkError>;

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record<R>>, FrameworkError>;

    /// `None` inserts with a fresh id, `Some(id)` overwrites that record.
    /// Fails with [`FrameworkError::NotFound`] when `Some(id)` names no live record.
    async fn save(&self, id: Option<RecordId>, fields: R) -> Result<Record<R>, FrameworkError>;

    /// Fails with [`FrameworkError::NotFound`] when no live record has `record.id`.
    async fn delete(&self, record: Record<R>) -> Result<(), FrameworkError>;
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for StoreClient<R> {
    #[tracing::instrument(skip(self), fields(entity_type = R::KIND))]
    async fn find_all(&self) -> Result<Vec<Record<R>>, FrameworkError> {
        tracing::debug!("Sending request");
        StoreClient::find_all(self).await
    }

    #[tracing::instrument(skip(self, filter), fields(entity_type = R::KIND))]
    async fn find_all_by(&self, filter: Filter<R>) -> Result<Vec<Record<R>>, FrameworkError> {
        tracing::debug!("Sending request");
        StoreClient::find_all_by(self, filter).await
    }

    #[tracing::instrument(skip(self), fields(entity_type = R::KIND))]
    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record<R>>, FrameworkError> {
        tracing::debug!("Sending request");
        StoreClient::find_by_id(self, id).await
    }

    #[tracing::instrument(skip(self, fields), fields(entity_type = R::KIND))]
    async fn save(&self, id: Option<RecordId>, fields: R) -> Result<Record<R>, FrameworkError> {
        tracing::debug!("Sending request");
        StoreClient::save(self, id, fields).await
    }

    #[tracing::instrument(skip(self, record), fields(entity_type = R::KIND, id = record.id))]
    async fn delete(&self, record: Record<R>) -> Result<(), FrameworkError> {
        tracing::debug!("Sending request");
        StoreClient::delete(self, record).await
    }
}
