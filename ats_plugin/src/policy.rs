//! Driving-policy seam.
//!
//! The session state machine owns the lifecycle and the retained cab state;
//! what to actually do with the handles each tick is domain policy injected
//! through [`DrivingPolicy`]. Policies may be stateful but must stay
//! deterministic with respect to recorded state, and must never block —
//! `elapse` sits on the simulation's real-time tick path.

use ats_common::instructions::{CscInstruction, InitialHandlePosition};
use ats_common::wire::{HandleOutput, VehicleSpec, VehicleState};

use crate::io_array::IoArray;
use crate::session::CabState;

/// Borrowed inputs for one tick.
///
/// `state` is transient — a policy that needs history must copy explicitly.
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    /// Immutable vehicle specification captured at load time.
    pub spec: &'a VehicleSpec,
    /// Telemetry for this instant.
    pub state: &'a VehicleState,
    /// Session-retained cab state (commanded handles, keys, doors, signal).
    pub cab: &'a CabState,
}

/// Control policy consumed by the session's `elapse`.
pub trait DrivingPolicy {
    /// Reset hook, called on `initialize` (including scenario re-jumps).
    fn initialize(&mut self, spec: &VehicleSpec, position: InitialHandlePosition) {
        let _ = (spec, position);
    }

    /// Produce the tick's handle output and drive panel/sound side effects.
    fn elapse(
        &mut self,
        tick: TickInput<'_>,
        panel: &mut IoArray,
        sound: &mut IoArray,
    ) -> HandleOutput;
}

/// Default policy: echo the driver's commanded handles, clamped into the
/// vehicle's notch ranges, leaving constant-speed mode untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoPolicy;

impl EchoPolicy {
    /// Create the policy.
    pub const fn new() -> Self {
        Self
    }
}

impl DrivingPolicy for EchoPolicy {
    fn elapse(
        &mut self,
        tick: TickInput<'_>,
        _panel: &mut IoArray,
        _sound: &mut IoArray,
    ) -> HandleOutput {
        HandleOutput::new(
            tick.cab.brake.clamp(0, tick.spec.emergency_notch()),
            tick.cab.power.clamp(0, tick.spec.power_notches),
            tick.cab.reverser.clamp(-1, 1),
            CscInstruction::Continue,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick<'a>(
        spec: &'a VehicleSpec,
        state: &'a VehicleState,
        cab: &'a CabState,
    ) -> TickInput<'a> {
        TickInput { spec, state, cab }
    }

    #[test]
    fn echo_clamps_into_notch_ranges() {
        let spec = VehicleSpec {
            brake_notches: 8,
            power_notches: 5,
            ats_cancel_notch: 6,
            b67_notch: 6,
            cars: 4,
        };
        let state = VehicleState::default();
        let mut cab = CabState::new();
        cab.power = 99;
        cab.brake = -3;
        cab.reverser = 2;

        let mut policy = EchoPolicy::new();
        let mut panel = IoArray::unbound();
        let mut sound = IoArray::unbound();
        let out = policy.elapse(tick(&spec, &state, &cab), &mut panel, &mut sound);

        assert_eq!(out.power, 5);
        assert_eq!(out.brake, 0);
        assert_eq!(out.reverser, 1);
        assert_eq!(out.csc(), Some(CscInstruction::Continue));
    }

    #[test]
    fn echo_passes_in_range_handles_through() {
        let spec = VehicleSpec {
            brake_notches: 8,
            power_notches: 5,
            ..VehicleSpec::default()
        };
        let state = VehicleState::default();
        let mut cab = CabState::new();
        cab.power = 3;
        cab.brake = 2;
        cab.reverser = -1;

        let mut policy = EchoPolicy::new();
        let mut panel = IoArray::unbound();
        let mut sound = IoArray::unbound();
        let out = policy.elapse(tick(&spec, &state, &cab), &mut panel, &mut sound);

        assert_eq!(out.power, 3);
        assert_eq!(out.brake, 2);
        assert_eq!(out.reverser, -1);
    }

    #[test]
    fn emergency_notch_is_allowed() {
        let spec = VehicleSpec {
            brake_notches: 8,
            ..VehicleSpec::default()
        };
        let state = VehicleState::default();
        let mut cab = CabState::new();
        cab.brake = 9; // brake_notches + 1 = emergency

        let mut policy = EchoPolicy::new();
        let mut panel = IoArray::unbound();
        let mut sound = IoArray::unbound();
        let out = policy.elapse(tick(&spec, &state, &cab), &mut panel, &mut sound);
        assert_eq!(out.brake, 9);
    }
}
