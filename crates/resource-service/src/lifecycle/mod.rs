//! # System Lifecycle & Orchestration
//!
//! Starts one store actor per resource kind, wraps each client in a
//! [`ResourceHandler`](resource_framework::ResourceHandler), and tears everything down again.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all handlers**: closes the sender side of each store channel
//! 2. **Stores detect closure**: `receiver.recv()` returns `None`
//! 3. **Stores clean up**: log their final size and exit
//! 4. **Await completion**: every store task is joined
//!
//! Handler clones held elsewhere (e.g. by the HTTP router) keep their store alive, so the
//! router must be dropped before [`ResourceSystem::shutdown`] can finish.

pub mod resource_system;

pub use resource_system::*;
