//! # Resource Framework
//!
//! Building blocks for role-gated CRUD services. The crate implements a
//! **Resource-Oriented Architecture (ROA)** on top of the **Actor Model**: every resource kind
//! gets one store actor with isolated state, and one generic handler that enforces an access
//! policy in front of it.
//!
//! ## Why ROA + Actor Model?
//!
//! ### Resource-Oriented Architecture (ROA)
//!
//! - The same five operations (list, get, create, update, delete) on every resource kind
//! - Predictable record lifecycle: absent → present → absent
//! - Uniform error contract: a missing id is always `"<Kind> with id <id> not found"`
//!
//! ### Actor Model
//!
//! - Isolated state (no shared memory, no locks)
//! - Message-passing concurrency
//! - Sequential processing within each store makes every save and delete atomic
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model) - Foundational concurrency pattern by Carl Hewitt
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Schema Layer** ([`Resource`], [`declare_resource!`]) - the fields of a kind
//! 2. **Store Layer** ([`StoreActor`], [`StoreClient`], [`ResourceStore`]) - records and ids
//! 3. **Policy Layer** ([`policy::AccessPolicy`]) - who may do what
//! 4. **Handler Layer** ([`ResourceHandler`]) - authorize → look up → mutate
//!
//! A kind is written once as a field list; everything else is generic.
//!
//! ```rust
//! use resource_framework::policy::{Role, Roles};
//! use resource_framework::{declare_resource, ResourceError, ResourceHandler, StoreActor};
//!
//! declare_resource! {
//!     Book {
//!         kind: "Book",
//!         collection: "books",
//!         fields { name: String, genre: String, author: String }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = StoreActor::<Book>::new(10);
//!     tokio::spawn(actor.run());
//!     let books: BookHandler = ResourceHandler::new(client);
//!
//!     let admin = Roles::from_iter([Role::Admin]);
//!     let dune = Book { name: "Dune".into(), genre: "SF".into(), author: "Herbert".into() };
//!     let created = books.create(&admin, dune).await.unwrap();
//!     assert_eq!(created.id, 0);
//!
//!     let user = Roles::from_iter([Role::User]);
//!     assert!(matches!(
//!         books.delete(&user, created.id).await,
//!         Err(ResourceError::Forbidden { .. })
//!     ));
//!     assert_eq!(
//!         books.get(&user, 9).await.unwrap_err().to_string(),
//!         "Book with id 9 not found"
//!     );
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each store actor runs in its own Tokio task
//! - Requests are processed **sequentially** within a store (no locks needed!)
//! - Stores of different kinds run in **parallel**
//! - Handlers are cheap to clone and hold no mutable state
//!
//! ## Testing
//!
//! The [`mock`] module provides a `MockClient` that answers store requests from scripted
//! expectations and records every call, so handler tests can assert that a denied or
//! not-found request never reached `save` or `delete`.

pub mod actor;
pub mod client;
pub mod declare;
pub mod entity;
pub mod error;
pub mod handler;
pub mod message;
pub mod mock;
pub mod policy;
pub mod store;
pub mod tracing;

#[doc(hidden)]
pub use paste;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use client::StoreClient;
pub use entity::{Record, RecordId, Resource};
pub use error::{ErrorBody, FrameworkError, ResourceError};
pub use handler::{Message, ResourceHandler};
pub use message::{Filter, Response, StoreRequest};
pub use policy::{AccessPolicy, Decision, Operation, Role, Roles};
pub use store::ResourceStore;
