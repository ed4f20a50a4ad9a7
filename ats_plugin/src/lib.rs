//! # ATS Plugin Runtime
//!
//! The control-plugin boundary for a real-time train simulation host. The
//! host delivers per-tick vehicle telemetry and discrete cab/track events;
//! the plugin answers with handle positions and drives panel indicators and
//! sound channels through host-owned shared memory.
//!
//! This crate owns everything with real invariants at that boundary:
//!
//! - [`io_array`] — bounds-checked view over the host's raw panel/sound
//!   arrays, rebound every tick
//! - [`session`] — the lifecycle state machine the host drives
//!   (`Load → SetVehicleSpec → Initialize → Elapse* → Dispose`)
//! - [`policy`] — the seam where simulation-specific driving logic plugs in
//! - [`config`] — TOML deployment configuration
//! - [`ffi`] — the raw `extern "system"` export surface
//!
//! Wire data lives in `ats_common`; this crate never invents sentinel
//! values of its own.
//!
//! ## Concurrency
//!
//! Single-threaded, cooperative, call-and-return: the host invokes entry
//! points synchronously on its simulation thread and never concurrently.
//! No entry point may block or sleep — `elapse` sits on the real-time tick
//! path.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod ffi;
pub mod io_array;
pub mod policy;
pub mod session;

pub use config::{ConfigError, PluginConfig};
pub use error::{AtsError, AtsResult};
pub use io_array::IoArray;
pub use policy::{DrivingPolicy, EchoPolicy, TickInput};
pub use session::{CabState, PluginSession, SessionState};

/// Initialize tracing for the plugin.
///
/// Safe to call repeatedly; only the first call installs the subscriber.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
