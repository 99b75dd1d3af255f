//! # Observability & Tracing
//!
//! The [`setup_tracing`] function installs the global `tracing` subscriber for a service built
//! on this framework.
//!
//! ## Configuration
//!
//! - `RUST_LOG`, when set, wins over the configured default level.
//! - The compact format hides the module prefix (`with_target(false)`); every store log line
//!   carries an `entity_type` field instead.
//! - `json = true` switches to one JSON object per line for log shippers.
//!
//! ## What Gets Traced
//!
//! - **Store Lifecycle**: startup and shutdown with the final record count
//! - **Store Operations**: FindAll, FindById, Save, Delete with `entity_type` and `id`
//! - **Handler Outcomes**: creates, updates, deletes at `info`; denials and misses at `warn`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show full payloads with debug logs
//! RUST_LOG=debug cargo run
//!
//! # Only store traffic
//! RUST_LOG=resource_framework::actor=debug cargo run
//! ```
//!
//! **With `RUST_LOG=debug`**:
//!
//! ```text
//! DEBUG Save entity_type="Bike" id=None fields=Bike { manufacturer: "Innersloth", model: "Among Us", num_gears: 69 }
//!  INFO Saved entity_type="Bike" id=0 replaced=false size=1
//!  INFO Created entity_type="Bike" id=0
//!  WARN Not found entity_type="Bike" id=7
//! ```

use tracing_subscriber::EnvFilter;

pub type TracingError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs the global subscriber.
///
/// `level` is an `EnvFilter` directive (`"info"`, `"resource_service=debug"`, ...) used when
/// `RUST_LOG` is unset. Fails if a global subscriber is already installed or the directive
/// does not parse.
pub fn setup_tracing(level: &str, json: bool) -> Result<(), TracingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false); // entity_type identifies the store instead

    if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    }
}
