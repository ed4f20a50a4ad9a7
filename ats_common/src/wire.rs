//! Fixed-layout value types crossing the host boundary.
//!
//! All structs use `#[repr(C)]` with pinned field order and primitive widths;
//! the host passes them by value in both call and return directions, so any
//! layout drift corrupts the exchange silently. Sizes are locked down with
//! `const_assert_eq!` and field offsets are verified in tests.
//!
//! Every field defaults to its zero-equivalent — a structure handed back to
//! the host must never carry uninitialized memory.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::instructions::CscInstruction;

// ─── VehicleSpec ────────────────────────────────────────────────────

/// Vehicle specification, sent once at load time.
///
/// Immutable snapshot describing the vehicle's control granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct VehicleSpec {
    /// Number of service brake notches.
    pub brake_notches: i32,
    /// Number of power notches.
    pub power_notches: i32,
    /// ATS cancel notch.
    pub ats_cancel_notch: i32,
    /// 80% brake notch (67 degrees).
    pub b67_notch: i32,
    /// Number of cars in the consist.
    pub cars: i32,
}

const_assert_eq!(core::mem::size_of::<VehicleSpec>(), 20);

impl VehicleSpec {
    /// Emergency brake notch: one past the last service notch.
    #[inline]
    pub const fn emergency_notch(&self) -> i32 {
        self.brake_notches + 1
    }
}

// ─── VehicleState ───────────────────────────────────────────────────

/// State quantity of the vehicle, delivered every simulation tick.
///
/// Represents a single instant, not a delta. `time_ms` is the authoritative
/// simulation clock — tick cadence is host-determined, not wall-clock.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct VehicleState {
    /// Train position on the Z axis [m].
    pub location: f64,
    /// Train speed [km/h].
    pub speed: f32,
    /// Simulation time [ms].
    pub time_ms: i32,
    /// Brake cylinder pressure [Pa].
    pub bc_pressure: f32,
    /// Main reservoir pressure [Pa].
    pub mr_pressure: f32,
    /// Equalizing reservoir pressure [Pa].
    pub er_pressure: f32,
    /// Brake pipe pressure [Pa].
    pub bp_pressure: f32,
    /// Straight air pipe pressure [Pa].
    pub sap_pressure: f32,
    /// Motor current [A].
    pub current: f32,
}

const_assert_eq!(core::mem::size_of::<VehicleState>(), 40);

// ─── BeaconData ─────────────────────────────────────────────────────

/// Data received from a track-side beacon, delivered on crossing events only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct BeaconData {
    /// Beacon type.
    pub beacon_type: i32,
    /// Signal aspect of the connected section.
    pub signal: i32,
    /// Distance to the connected section [m]. Negative once passed.
    pub distance: f32,
    /// Optional payload.
    pub optional: i32,
}

const_assert_eq!(core::mem::size_of::<BeaconData>(), 16);

// ─── HandleOutput ───────────────────────────────────────────────────

/// Train operation instruction returned from every tick.
///
/// This is the plugin's sole effect on train motion. Field order (brake,
/// power, reverser, constant speed) matches the host ABI exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct HandleOutput {
    /// Commanded brake notch.
    pub brake: i32,
    /// Commanded power notch.
    pub power: i32,
    /// Commanded reverser position.
    pub reverser: i32,
    /// Constant-speed control instruction (raw `CscInstruction` value).
    pub constant_speed: i32,
}

const_assert_eq!(core::mem::size_of::<HandleOutput>(), 16);

impl HandleOutput {
    /// Build an output with a typed constant-speed instruction.
    pub const fn new(brake: i32, power: i32, reverser: i32, csc: CscInstruction) -> Self {
        Self {
            brake,
            power,
            reverser,
            constant_speed: csc.as_raw(),
        }
    }

    /// Neutral output: all handles released, constant speed continues.
    pub const fn neutral() -> Self {
        Self::new(0, 0, 0, CscInstruction::Continue)
    }

    /// Typed view of the constant-speed field. `None` for values outside
    /// the closed instruction set.
    #[inline]
    pub fn csc(&self) -> Option<CscInstruction> {
        CscInstruction::from_raw(self.constant_speed)
    }
}
