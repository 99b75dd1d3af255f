//! # Resource Handler
//!
//! `ResourceHandler<R, S>` is the one generic implementation of the five CRUD operations.
//! Each operation runs the same pipeline:
//!
//! 1. **Authorize**: the [`AccessPolicy`] is consulted first. A denial returns
//!    [`ResourceError::Forbidden`] and the store is never touched.
//! 2. **Look up**: operations addressing one record resolve the id through the store.
//!    A miss becomes [`ResourceError::NotFound`] before any mutation is attempted.
//! 3. **Mutate / return**: the store call runs and its result is handed back.

use crate::client::StoreClient;
use crate::entity::{Record, RecordId, Resource};
use crate::error::{FrameworkError, ResourceError};
use crate::message::Filter;
use crate::policy::{AccessPolicy, Operation, Roles};
use crate::store::ResourceStore;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, warn};

/// Confirmation payload returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Generic CRUD handler for one resource kind.
///
/// `S` defaults to the actor-backed [`StoreClient`]; tests substitute any [`ResourceStore`].
pub struct ResourceHandler<R: Resource, S = StoreClient<R>> {
    store: S,
    policy: Arc<AccessPolicy>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Resource, S: Clone> Clone for ResourceHandler<R, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            policy: self.policy.clone(),
            _kind: PhantomData,
        }
    }
}

impl<R, S> ResourceHandler<R, S>
where
    R: Resource,
    S: ResourceStore<R>,
{
    /// Handler with the standard policy (reads need `USER`, writes need `ADMIN`).
    pub fn new(store: S) -> Self {
        Self::with_policy(store, Arc::new(AccessPolicy::standard()))
    }

    pub fn with_policy(store: S, policy: Arc<AccessPolicy>) -> Self {
        Self {
            store,
            policy,
            _kind: PhantomData,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Runs the policy check on its own.
    ///
    /// The HTTP layer calls this before it validates parameters so that a denied caller
    /// never learns whether its input was well-formed.
    pub fn authorize(&self, operation: Operation, roles: &Roles) -> Result<(), ResourceError> {
        self.policy.check(operation, roles).inspect_err(|_| {
            warn!(entity_type = R::KIND, %operation, %roles, "Access denied");
        })
    }

    pub async fn list(&self, roles: &Roles) -> Result<Vec<Record<R>>, ResourceError> {
        self.authorize(Operation::List, roles)?;
        Ok(self.store.find_all().await?)
    }

    /// A list narrowed by a field predicate. Same permission as [`list`](Self::list).
    pub async fn list_where(
        &self,
        roles: &Roles,
        filter: Filter<R>,
    ) -> Result<Vec<Record<R>>, ResourceError> {
        self.authorize(Operation::List, roles)?;
        Ok(self.store.find_all_by(filter).await?)
    }

    pub async fn get(&self, roles: &Roles, id: RecordId) -> Result<Record<R>, ResourceError> {
        self.authorize(Operation::Get, roles)?;
        self.find_existing(id).await
    }

    /// Saves a new record. The store assigns the id.
    pub async fn create(&self, roles: &Roles, fields: R) -> Result<Record<R>, ResourceError> {
        self.authorize(Operation::Create, roles)?;
        let record = self.store.save(None, fields).await?;
        info!(entity_type = R::KIND, id = record.id, "Created");
        Ok(record)
    }

    /// Replaces every field of record `id` with `incoming`. The id itself never changes.
    pub async fn update(
        &self,
        roles: &Roles,
        id: RecordId,
        incoming: R,
    ) -> Result<Record<R>, ResourceError> {
        self.authorize(Operation::Update, roles)?;
        let existing = self.find_existing(id).await?;
        let record = self
            .store
            .save(Some(existing.id), incoming)
            .await
            .map_err(gone_as_not_found::<R>)?;
        info!(entity_type = R::KIND, id = record.id, "Updated");
        Ok(record)
    }

    pub async fn delete(&self, roles: &Roles, id: RecordId) -> Result<Message, ResourceError> {
        self.authorize(Operation::Delete, roles)?;
        let existing = self.find_existing(id).await?;
        self.store
            .delete(existing)
            .await
            .map_err(gone_as_not_found::<R>)?;
        info!(entity_type = R::KIND, id, "Deleted");
        Ok(Message {
            message: format!("{} with id {} deleted", R::KIND, id),
        })
    }

    async fn find_existing(&self, id: RecordId) -> Result<Record<R>, ResourceError> {
        match self.store.find_by_id(id).await? {
            Some(record) => Ok(record),
            None => {
                warn!(entity_type = R::KIND, id, "Not found");
                Err(ResourceError::NotFound { kind: R::KIND, id })
            }
        }
    }
}

/// A record removed between lookup and mutation is reported like any other miss.
fn gone_as_not_found<R: Resource>(err: FrameworkError) -> ResourceError {
    match err {
        FrameworkError::NotFound(id) => ResourceError::NotFound { kind: R::KIND, id },
        other => ResourceError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{create_mock_client, Call, MockClient};
    use crate::policy::Role;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Kite {
        brand: String,
        line_length: i32,
    }

    impl Resource for Kite {
        const KIND: &'static str = "Kite";
        const COLLECTION: &'static str = "kites";
    }

    fn kite(brand: &str, line_length: i32) -> Kite {
        Kite {
            brand: brand.into(),
            line_length,
        }
    }

    fn admin() -> Roles {
        Roles::from_iter([Role::Admin, Role::User])
    }

    fn user() -> Roles {
        Roles::from_iter([Role::User])
    }

    #[tokio::test]
    async fn get_returns_found_record() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_by_id(3)
            .return_ok(Some(Record::new(3, kite("Ozone", 20))));

        let handler = ResourceHandler::new(mock.client());
        let record = handler.get(&user(), 3).await.unwrap();
        assert_eq!(record, Record::new(3, kite("Ozone", 20)));
        mock.verify();
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_by_id(7).return_ok(None);

        let handler = ResourceHandler::new(mock.client());
        let err = handler.get(&user(), 7).await.unwrap_err();
        assert_eq!(err, ResourceError::NotFound { kind: "Kite", id: 7 });
        assert_eq!(err.to_string(), "Kite with id 7 not found");
        mock.verify();
    }

    #[tokio::test]
    async fn update_of_missing_record_never_saves() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_by_id(4).return_ok(None);

        let handler = ResourceHandler::new(mock.client());
        let err = handler.update(&admin(), 4, kite("Flysurfer", 25)).await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { id: 4, .. }));
        assert_eq!(mock.calls(), vec![Call::FindById(4)]);
        mock.verify();
    }

    #[tokio::test]
    async fn update_keeps_looked_up_id() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_by_id(0)
            .return_ok(Some(Record::new(0, kite("Ozone", 20))));
        mock.expect_save().return_ok(Record::new(0, kite("Core", 22)));

        let handler = ResourceHandler::new(mock.client());
        let record = handler.update(&admin(), 0, kite("Core", 22)).await.unwrap();
        assert_eq!(record.id, 0);
        assert_eq!(
            mock.calls(),
            vec![
                Call::FindById(0),
                Call::Save {
                    id: Some(0),
                    fields: kite("Core", 22)
                }
            ]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn update_race_maps_store_not_found() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_by_id(0)
            .return_ok(Some(Record::new(0, kite("Ozone", 20))));
        mock.expect_save().return_err(FrameworkError::NotFound(0));

        let handler = ResourceHandler::new(mock.client());
        let err = handler.update(&admin(), 0, kite("Core", 22)).await.unwrap_err();
        assert_eq!(err, ResourceError::NotFound { kind: "Kite", id: 0 });
        assert_eq!(err.to_string(), "Kite with id 0 not found");
        mock.verify();
    }

    #[tokio::test]
    async fn create_saves_without_id() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_save().return_ok(Record::new(5, kite("North", 18)));

        let handler = ResourceHandler::new(mock.client());
        let record = handler.create(&admin(), kite("North", 18)).await.unwrap();
        assert_eq!(record.id, 5);
        assert_eq!(
            mock.calls(),
            vec![Call::Save {
                id: None,
                fields: kite("North", 18)
            }]
        );
    }

    #[tokio::test]
    async fn delete_confirms_with_kind_and_id() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_by_id(2)
            .return_ok(Some(Record::new(2, kite("Ozone", 20))));
        mock.expect_delete().return_ok(());

        let handler = ResourceHandler::new(mock.client());
        let message = handler.delete(&admin(), 2).await.unwrap();
        assert_eq!(message.message, "Kite with id 2 deleted");
        assert_eq!(mock.calls(), vec![Call::FindById(2), Call::Delete(2)]);
        mock.verify();
    }

    #[tokio::test]
    async fn delete_missing_never_reaches_store_delete() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_by_id(15).return_ok(None);

        let handler = ResourceHandler::new(mock.client());
        let err = handler.delete(&admin(), 15).await.unwrap_err();
        assert_eq!(err, ResourceError::NotFound { kind: "Kite", id: 15 });
        assert_eq!(mock.calls(), vec![Call::FindById(15)]);
    }

    #[tokio::test]
    async fn delete_race_maps_store_not_found() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_by_id(1)
            .return_ok(Some(Record::new(1, kite("Ozone", 20))));
        mock.expect_delete().return_err(FrameworkError::NotFound(1));

        let handler = ResourceHandler::new(mock.client());
        let err = handler.delete(&admin(), 1).await.unwrap_err();
        assert_eq!(err, ResourceError::NotFound { kind: "Kite", id: 1 });
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let mut mock = MockClient::<Kite>::new();
        mock.expect_find_all().return_err(FrameworkError::ActorClosed);

        let handler = ResourceHandler::new(mock.client());
        let err = handler.list(&user()).await.unwrap_err();
        assert_eq!(err, ResourceError::Store(FrameworkError::ActorClosed));
    }

    #[tokio::test]
    async fn user_writes_cause_zero_store_interactions() {
        let (client, mut receiver) = create_mock_client::<Kite>(10);
        let handler = ResourceHandler::new(client);
        let user = user();

        let denied = [
            handler.create(&user, kite("a", 1)).await.unwrap_err(),
            handler.update(&user, 0, kite("b", 2)).await.unwrap_err(),
            handler.delete(&user, 0).await.unwrap_err(),
        ];
        for err in denied {
            assert!(matches!(err, ResourceError::Forbidden { .. }));
        }
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn anonymous_reads_are_denied() {
        let (client, mut receiver) = create_mock_client::<Kite>(10);
        let handler = ResourceHandler::new(client);
        let anonymous = Roles::anonymous();

        assert_eq!(
            handler.list(&anonymous).await.unwrap_err(),
            ResourceError::Forbidden {
                operation: Operation::List
            }
        );
        assert_eq!(
            handler.get(&anonymous, 0).await.unwrap_err(),
            ResourceError::Forbidden {
                operation: Operation::Get
            }
        );
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn custom_policy_is_honored() {
        let (client, _receiver) = create_mock_client::<Kite>(10);
        let policy = AccessPolicy::new(vec![(Operation::Create, Role::User)]);
        let handler = ResourceHandler::with_policy(client, Arc::new(policy));

        assert_eq!(handler.policy().required_role(Operation::Create), Some(Role::User));
        assert_eq!(handler.policy().required_role(Operation::List), None);
        assert!(handler.authorize(Operation::Create, &user()).is_ok());
        assert!(handler.authorize(Operation::List, &admin()).is_err());
    }
}
