//! # Mock Store & Testing Guide
//!
//! `MockClient<R>` hands out a real [`StoreClient<R>`] whose requests are answered from a
//! queue of expectations instead of a `StoreActor`. It records every request it sees, so a
//! test can assert not only what the handler returned but which store calls it made.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | Scripted replies | Real id assignment |
//! | **State** | No real state (expectations) | Real record map |
//! | **Use Case** | Testing handler logic *around* the store | Testing the store or the full service |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires a closed channel) |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Handler Test (Pure Mock)</b></summary>
//!
//! ```rust
//! use resource_framework::mock::{Call, MockClient};
//! use resource_framework::policy::{Role, Roles};
//! use resource_framework::{Resource, ResourceHandler};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Note { text: String }
//! impl Resource for Note {
//!     const KIND: &'static str = "Note";
//!     const COLLECTION: &'static str = "notes";
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Note>::new();
//!     mock.expect_find_by_id(9).return_ok(None);
//!
//!     let handler = ResourceHandler::new(mock.client());
//!     let admin = Roles::from_iter([Role::Admin]);
//!     let err = handler.update(&admin, 9, Note { text: "x".into() }).await.unwrap_err();
//!
//!     assert_eq!(err.to_string(), "Note with id 9 not found");
//!     assert_eq!(mock.calls(), vec![Call::FindById(9)]); // save never called
//!     mock.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Zero Interactions (Raw Receiver)</b></summary>
//!
//! When the assertion is "the store was never contacted", skip the expectation queue and hold
//! the receiving end yourself:
//!
//! ```rust
//! use resource_framework::mock::create_mock_client;
//! use resource_framework::policy::{Role, Roles};
//! use resource_framework::{Resource, ResourceHandler};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Note { text: String }
//! impl Resource for Note {
//!     const KIND: &'static str = "Note";
//!     const COLLECTION: &'static str = "notes";
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (client, mut receiver) = create_mock_client::<Note>(4);
//!     let handler = ResourceHandler::new(client);
//!
//!     let user = Roles::from_iter([Role::User]);
//!     assert!(handler.delete(&user, 0).await.is_err());
//!     assert!(receiver.try_recv().is_err());
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Real Store Integration</b></summary>
//!
//! Spawn a `StoreActor` and drive a `ResourceHandler` over it.
//! See `tests/integration_test.rs` for end-to-end lifecycles.
//! </details>

use crate::client::StoreClient;
use crate::entity::{Record, RecordId, Resource};
use crate::error::FrameworkError;
use crate::message::StoreRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A request observed by a [`MockClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call<R> {
    FindAll,
    FindAllBy,
    FindById(RecordId),
    Save { id: Option<RecordId>, fields: R },
    Delete(RecordId),
}

/// A scripted reply, matched against incoming requests in FIFO order.
enum Expectation<R: Resource> {
    FindAll(Result<Vec<Record<R>>, FrameworkError>),
    FindAllBy(Result<Vec<Record<R>>, FrameworkError>),
    FindById {
        id: RecordId,
        response: Result<Option<Record<R>>, FrameworkError>,
    },
    Save(Result<Record<R>, FrameworkError>),
    Delete(Result<(), FrameworkError>),
}

struct MockState<R: Resource> {
    expectations: VecDeque<Expectation<R>>,
    calls: Vec<Call<R>>,
    unexpected: usize,
}

type SharedState<R> = Arc<Mutex<MockState<R>>>;

/// A mock store with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Bike>::new();
/// mock.expect_find_by_id(0).return_ok(Some(record));
/// mock.expect_save().return_ok(updated);
///
/// let handler = ResourceHandler::new(mock.client());
/// // drive the handler...
/// mock.verify(); // every expectation consumed, nothing unexpected
/// ```
pub struct MockClient<R: Resource> {
    client: StoreClient<R>,
    state: SharedState<R>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<R: Resource> Default for MockClient<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> MockClient<R> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<R>>(100);
        let state: SharedState<R> = Arc::new(Mutex::new(MockState {
            expectations: VecDeque::new(),
            calls: Vec::new(),
            unexpected: 0,
        }));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let mut state = task_state.lock().unwrap();
                state.calls.push(observe(&request));
                let expectation = state.expectations.pop_front();

                match (request, expectation) {
                    (StoreRequest::FindAll { respond_to }, Some(Expectation::FindAll(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::FindAllBy { respond_to, .. },
                        Some(Expectation::FindAllBy(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::FindById { id, respond_to },
                        Some(Expectation::FindById {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Save { respond_to, .. }, Some(Expectation::Save(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Delete { respond_to, .. }, Some(Expectation::Delete(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        // the responder is dropped, so the caller sees ActorDropped
                        warn!(?request, "Unexpected store request");
                        state.unexpected += 1;
                        if let Some(expectation) = expectation {
                            state.expectations.push_front(expectation);
                        }
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            state,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> StoreClient<R> {
        self.client.clone()
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<Call<R>> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn expect_find_all(&mut self) -> Reply<R, Vec<Record<R>>> {
        Reply::new(&self.state, Expectation::FindAll)
    }

    pub fn expect_find_all_by(&mut self) -> Reply<R, Vec<Record<R>>> {
        Reply::new(&self.state, Expectation::FindAllBy)
    }

    pub fn expect_find_by_id(&mut self, id: RecordId) -> Reply<R, Option<Record<R>>> {
        Reply::new(&self.state, move |response| Expectation::FindById { id, response })
    }

    pub fn expect_save(&mut self) -> Reply<R, Record<R>> {
        Reply::new(&self.state, Expectation::Save)
    }

    pub fn expect_delete(&mut self) -> Reply<R, ()> {
        Reply::new(&self.state, Expectation::Delete)
    }

    /// Verifies that all expectations were met and no unexpected request arrived.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if state.unexpected > 0 {
            panic!("{} unexpected store request(s): {:?}", state.unexpected, state.calls);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

fn observe<R: Resource>(request: &StoreRequest<R>) -> Call<R> {
    match request {
        StoreRequest::FindAll { .. } => Call::FindAll,
        StoreRequest::FindAllBy { .. } => Call::FindAllBy,
        StoreRequest::FindById { id, .. } => Call::FindById(*id),
        StoreRequest::Save { id, fields, .. } => Call::Save {
            id: *id,
            fields: fields.clone(),
        },
        StoreRequest::Delete { record, .. } => Call::Delete(record.id),
    }
}

/// Builder that completes an expectation with its scripted reply.
pub struct Reply<R: Resource, T> {
    state: SharedState<R>,
    make: Box<dyn FnOnce(Result<T, FrameworkError>) -> Expectation<R> + Send>,
}

impl<R: Resource, T> Reply<R, T> {
    fn new(
        state: &SharedState<R>,
        make: impl FnOnce(Result<T, FrameworkError>) -> Expectation<R> + Send + 'static,
    ) -> Self {
        Self {
            state: state.clone(),
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, FrameworkError>) {
        let expectation = (self.make)(response);
        self.state.lock().unwrap().expectations.push_back(expectation);
    }
}

// =============================================================================
// RAW RECEIVER HELPERS
// =============================================================================

/// Creates a client and the receiving end of its channel.
///
/// # Testing Strategy
/// The test plays the actor: it pulls requests off `receiver`, inspects them and answers on
/// the enclosed oneshot sender. `receiver.try_recv()` failing proves no request was sent.
///
/// **Note**: Consider using [`MockClient`] for a more fluent API.
pub fn create_mock_client<R: Resource>(
    buffer_size: usize,
) -> (StoreClient<R>, mpsc::Receiver<StoreRequest<R>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a FindAll request.
pub async fn expect_find_all<R: Resource>(
    receiver: &mut mpsc::Receiver<StoreRequest<R>>,
) -> Option<oneshot::Sender<Result<Vec<Record<R>>, FrameworkError>>> {
    match receiver.recv().await {
        Some(StoreRequest::FindAll { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a FindById request.
pub async fn expect_find_by_id<R: Resource>(
    receiver: &mut mpsc::Receiver<StoreRequest<R>>,
) -> Option<(
    RecordId,
    oneshot::Sender<Result<Option<Record<R>>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::FindById { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Save request.
pub async fn expect_save<R: Resource>(
    receiver: &mut mpsc::Receiver<StoreRequest<R>>,
) -> Option<(
    Option<RecordId>,
    R,
    oneshot::Sender<Result<Record<R>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::Save {
            id,
            fields,
            respond_to,
        }) => Some((id, fields, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request.
pub async fn expect_delete<R: Resource>(
    receiver: &mut mpsc::Receiver<StoreRequest<R>>,
) -> Option<(Record<R>, oneshot::Sender<Result<(), FrameworkError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Delete { record, respond_to }) => Some((record, respond_to)),
        _ => None,
    }
}
