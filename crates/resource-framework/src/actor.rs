//! # Store Actor
//!
//! `StoreActor<R>` is the server half of a resource store. It owns the records of one
//! resource kind and processes [`StoreRequest`]s sequentially, so every find, save and delete
//! is atomic with respect to every other request for that kind.

use crate::client::StoreClient;
use crate::entity::{Record, RecordId, Resource};
use crate::error::FrameworkError;
use crate::message::StoreRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns the records of one resource kind.
///
/// # Concurrency Model
/// Each actor runs in its own Tokio task and handles one message at a time. The `records`
/// map is owned exclusively by that task, so no lock is needed.
///
/// # Identifier Assignment
/// * Ids start at `0` and increase by one per insert.
/// * An id is never reused, even after its record is deleted.
/// * `Save` with an id only overwrites a live record; an absent id is `NotFound`.
/// * Records are kept in a `BTreeMap`, so `FindAll` returns them in id (insertion) order.
///
/// # Usage Pattern
///
/// 1.  **Create**: `StoreActor::new(buffer)` returns the actor and a cloneable client.
/// 2.  **Run**: spawn `actor.run()` in a background task.
/// 3.  **Stop**: drop every client; the loop drains and exits.
///
/// ```rust
/// use resource_framework::{Resource, StoreActor};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Note { text: String }
///
/// impl Resource for Note {
///     const KIND: &'static str = "Note";
///     const COLLECTION: &'static str = "notes";
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = StoreActor::<Note>::new(10);
///     tokio::spawn(actor.run());
///
///     let saved = client.save(None, Note { text: "hi".into() }).await.unwrap();
///     assert_eq!(saved.id, 0);
/// }
/// ```
pub struct StoreActor<R: Resource> {
    receiver: mpsc::Receiver<StoreRequest<R>>,
    records: BTreeMap<RecordId, R>,
    next_id: RecordId,
}

impl<R: Resource> StoreActor<R> {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full, client calls wait.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: BTreeMap::new(),
            next_id: 0,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        let entity_type = R::KIND;
        info!(entity_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::FindAll { respond_to } => {
                    let all = self.collect(|_| true);
                    debug!(entity_type, count = all.len(), "FindAll");
                    let _ = respond_to.send(Ok(all));
                }
                StoreRequest::FindAllBy { filter, respond_to } => {
                    let matching = self.collect(|fields| filter(fields));
                    debug!(entity_type, count = matching.len(), "FindAllBy");
                    let _ = respond_to.send(Ok(matching));
                }
                StoreRequest::FindById { id, respond_to } => {
                    let record = self
                        .records
                        .get(&id)
                        .map(|fields| Record::new(id, fields.clone()));
                    debug!(entity_type, %id, found = record.is_some(), "FindById");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::Save {
                    id,
                    fields,
                    respond_to,
                } => {
                    debug!(entity_type, ?id, ?fields, "Save");
                    let id = match id {
                        Some(id) if self.records.contains_key(&id) => id,
                        Some(id) => {
                            warn!(entity_type, %id, "Not found");
                            let _ = respond_to.send(Err(FrameworkError::NotFound(id)));
                            continue;
                        }
                        None => {
                            let id = self.next_id;
                            self.next_id += 1;
                            id
                        }
                    };
                    let replaced = self.records.insert(id, fields.clone()).is_some();
                    info!(entity_type, %id, replaced, size = self.records.len(), "Saved");
                    let _ = respond_to.send(Ok(Record::new(id, fields)));
                }
                StoreRequest::Delete { record, respond_to } => {
                    let id = record.id;
                    if self.records.remove(&id).is_some() {
                        info!(entity_type, %id, size = self.records.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id)));
                    }
                }
            }
        }

        info!(entity_type, size = self.records.len(), "Shutdown");
    }

    fn collect(&self, keep: impl Fn(&R) -> bool) -> Vec<Record<R>> {
        self.records
            .iter()
            .filter(|(_, fields)| keep(fields))
            .map(|(id, fields)| Record::new(*id, fields.clone()))
            .collect()
    }
}
