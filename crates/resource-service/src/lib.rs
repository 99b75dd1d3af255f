//! # Resource Service
//!
//! Role-gated CRUD endpoints for bikes, cars, movies, books and restaurants, built on
//! [`resource_framework`].
//!
//! ## Core Components
//!
//! - **[resources]**: the five field schemas, declared with `declare_resource!`.
//! - **[lifecycle]**: [`ResourceSystem`](lifecycle::ResourceSystem) spawns one store per kind
//!   and shuts them down.
//! - **[http]**: the axum router, caller identification and error mapping.
//! - **[config]**: layered configuration (defaults, file, `RESOURCE_*` env).
//!
//! ## Testing
//!
//! `tests/http_test.rs` drives the full router with `tower::ServiceExt::oneshot`.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod resources;
