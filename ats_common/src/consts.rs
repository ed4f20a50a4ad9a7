//! System-wide constants for the ATS plugin workspace.
//!
//! Single source of truth for the boundary's numeric contract.
//! Imported by all crates — no duplication permitted.

/// ATS plugin protocol version reported to the host.
pub const PLUGIN_VERSION: i32 = 0x0002_0000;

/// Default length of the host's panel indicator array (int32 slots).
pub const PANEL_LENGTH: i32 = 256;

/// Default length of the host's sound instruction array (int32 slots).
pub const SOUND_LENGTH: i32 = 256;

/// Number of logical ATS keys (S, A1..C2, D..L).
pub const ATS_KEY_COUNT: usize = 16;
