//! ATS Common Library
//!
//! Shared data definitions for the ATS plugin boundary: the fixed-layout
//! structures exchanged with the simulation host every tick, the closed
//! instruction encodings carried inside them, and the system-wide constants.
//!
//! # Module Structure
//!
//! - [`wire`] - Fixed-layout value types crossing the host boundary
//! - [`instructions`] - Closed integer instruction sets and key bitflags
//! - [`consts`] - System-wide constants
//!
//! This crate is pure data: no behavior beyond raw-value conversions and
//! zero-equivalent defaults. The session state machine and memory access
//! live in `ats_plugin`.

pub mod consts;
pub mod instructions;
pub mod wire;

pub use consts::{ATS_KEY_COUNT, PANEL_LENGTH, PLUGIN_VERSION, SOUND_LENGTH};
pub use instructions::{
    AtsKey, CscInstruction, HornType, InitialHandlePosition, KeyState, SoundControl,
};
pub use wire::{BeaconData, HandleOutput, VehicleSpec, VehicleState};
