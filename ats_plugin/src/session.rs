//! Plugin session lifecycle state machine.
//!
//! The host drives a fixed partial order of calls:
//! `Load → SetVehicleSpec → Initialize → Elapse (per tick) → Dispose`,
//! with cab events interleaved between `Initialize` and the final `Elapse`.
//! [`PluginSession`] enforces that order with an exhaustive transition table
//! and retains the state the contract requires between calls: the vehicle
//! specification, the initial handle posture, and the cab event mirror.
//!
//! Out-of-order calls indicate a host-side bug. They are reported loudly as
//! [`AtsError::ProtocolViolation`] and leave the session unchanged — the
//! caller decides whether to no-op and keep the simulation alive.

use ats_common::consts::PLUGIN_VERSION;
use ats_common::instructions::{AtsKey, CscInstruction, HornType, InitialHandlePosition, KeyState};
use ats_common::wire::{BeaconData, HandleOutput, VehicleSpec, VehicleState};
use tracing::{debug, error, trace, warn};

use crate::config::PluginConfig;
use crate::error::{AtsError, AtsResult};
use crate::io_array::IoArray;
use crate::policy::{DrivingPolicy, TickInput};

// ─── Session State ──────────────────────────────────────────────────

/// Lifecycle state of one plugin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No session active; only `load` is valid.
    Unloaded,
    /// Loaded, waiting for the vehicle specification.
    Loaded,
    /// Specification captured, waiting for `initialize`.
    SpecSet,
    /// Initialized, no tick delivered yet.
    Initialized,
    /// At least one tick delivered.
    Running,
}

// ─── Cab State ──────────────────────────────────────────────────────

/// Session-local mirror of the host's cab events.
///
/// Everything here is written by event calls and read by the driving policy
/// on the next tick. Transient per-call inputs (`VehicleState`) are never
/// stored; `BeaconData` is kept only as an explicit copy of the last event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CabState {
    /// Commanded power notch.
    pub power: i32,
    /// Commanded brake notch.
    pub brake: i32,
    /// Commanded reverser position.
    pub reverser: i32,
    /// Currently pressed ATS keys.
    pub keys: KeyState,
    /// Door state. The host reports transitions via DoorOpen/DoorClose.
    pub doors_closed: bool,
    /// Index of the current signal aspect.
    pub signal: i32,
    /// Horn most recently sounded.
    pub last_horn: Option<HornType>,
    /// Copy of the most recent beacon event.
    pub last_beacon: Option<BeaconData>,
}

impl CabState {
    /// Cab state with everything released and doors closed.
    pub const fn new() -> Self {
        Self {
            power: 0,
            brake: 0,
            reverser: 0,
            keys: KeyState::empty(),
            doors_closed: true,
            signal: 0,
            last_horn: None,
            last_beacon: None,
        }
    }

    /// Reset to the scenario's starting posture.
    fn reset(&mut self, spec: &VehicleSpec, position: InitialHandlePosition) {
        *self = Self::new();
        self.brake = match position {
            InitialHandlePosition::ServiceBrake => spec.brake_notches,
            InitialHandlePosition::EmergencyBrake | InitialHandlePosition::Removed => {
                spec.emergency_notch()
            }
        };
    }
}

impl Default for CabState {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Plugin Session ─────────────────────────────────────────────────

/// One plugin session with an explicit lifecycle.
///
/// Modeled as an ordinary constructible object rather than process-wide
/// globals so tests can run independent sessions side by side; the single
/// host-facing instance lives behind the FFI layer.
#[derive(Debug)]
pub struct PluginSession<P: DrivingPolicy> {
    state: SessionState,
    config: PluginConfig,
    spec: Option<VehicleSpec>,
    initial_position: Option<InitialHandlePosition>,
    cab: CabState,
    policy: P,
}

impl<P: DrivingPolicy> PluginSession<P> {
    /// Create an unloaded session around a driving policy.
    pub const fn new(policy: P) -> Self {
        Self {
            state: SessionState::Unloaded,
            config: PluginConfig::DEFAULT,
            spec: None,
            initial_position: None,
            cab: CabState::new(),
            policy,
        }
    }

    /// Replace the deployment configuration.
    pub fn set_config(&mut self, config: PluginConfig) {
        self.config = config;
    }

    /// Current lifecycle state.
    #[inline]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Captured vehicle specification, if any.
    #[inline]
    pub const fn vehicle_spec(&self) -> Option<&VehicleSpec> {
        self.spec.as_ref()
    }

    /// Recorded initial handle posture, if any.
    #[inline]
    pub const fn initial_position(&self) -> Option<InitialHandlePosition> {
        self.initial_position
    }

    /// Session-local cab state.
    #[inline]
    pub const fn cab(&self) -> &CabState {
        &self.cab
    }

    /// Active deployment configuration.
    #[inline]
    pub const fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Plugin protocol version reported to the host.
    #[inline]
    pub const fn version(&self) -> i32 {
        PLUGIN_VERSION
    }

    // ── Lifecycle transitions ──

    /// `Load`: Unloaded → Loaded. Resets all session state.
    pub fn load(&mut self) -> AtsResult<()> {
        match self.state {
            SessionState::Unloaded => {
                self.reset();
                self.state = SessionState::Loaded;
                debug!("session loaded");
                Ok(())
            }
            _ => Err(self.violation("load")),
        }
    }

    /// `Dispose`: any state → Unloaded. Never fails.
    pub fn dispose(&mut self) {
        self.reset();
        self.state = SessionState::Unloaded;
        debug!("session disposed");
    }

    /// `SetVehicleSpec`: Loaded | SpecSet → SpecSet.
    ///
    /// The host does not guarantee a single call; repeats overwrite
    /// idempotently and the last value wins.
    pub fn set_vehicle_spec(&mut self, spec: VehicleSpec) -> AtsResult<()> {
        match self.state {
            SessionState::Loaded | SessionState::SpecSet => {
                debug!(
                    brake_notches = spec.brake_notches,
                    power_notches = spec.power_notches,
                    cars = spec.cars,
                    "vehicle spec captured"
                );
                self.spec = Some(spec);
                self.state = SessionState::SpecSet;
                Ok(())
            }
            _ => Err(self.violation("set_vehicle_spec")),
        }
    }

    /// `Initialize`: SpecSet | Initialized | Running → Initialized.
    ///
    /// Re-initialization is legal: the host repeats the call on scenario
    /// jumps. Resets the cab to the starting posture and the policy with it.
    pub fn initialize(&mut self, position: InitialHandlePosition) -> AtsResult<()> {
        match self.state {
            SessionState::SpecSet | SessionState::Initialized | SessionState::Running => {
                let Some(spec) = self.spec else {
                    return Err(self.violation("initialize"));
                };
                debug!(?position, "session initialized");
                self.initial_position = Some(position);
                self.cab.reset(&spec, position);
                self.policy.initialize(&spec, position);
                self.state = SessionState::Initialized;
                Ok(())
            }
            _ => Err(self.violation("initialize")),
        }
    }

    /// `Elapse`: Initialized | Running → Running.
    ///
    /// Delegates to the driving policy and sanitizes its output into the
    /// vehicle's notch ranges. The views must be freshly bound for this
    /// tick — the host may have relocated the regions since the last one.
    pub fn elapse(
        &mut self,
        state: &VehicleState,
        panel: &mut IoArray,
        sound: &mut IoArray,
    ) -> AtsResult<HandleOutput> {
        match self.state {
            SessionState::Initialized | SessionState::Running => {}
            _ => return Err(self.violation("elapse")),
        }
        let Some(spec) = self.spec else {
            return Err(self.violation("elapse"));
        };

        let tick = TickInput {
            spec: &spec,
            state,
            cab: &self.cab,
        };
        let out = self.policy.elapse(tick, panel, sound);
        let out = sanitize_output(&spec, out);

        self.state = SessionState::Running;
        trace!(
            time_ms = state.time_ms,
            speed = state.speed,
            brake = out.brake,
            power = out.power,
            "tick"
        );
        Ok(out)
    }

    // ── Cab events (Initialized | Running only) ──

    /// `SetPower`: record the commanded power notch.
    pub fn set_power(&mut self, position: i32) -> AtsResult<()> {
        self.require_active("set_power")?;
        self.cab.power = position;
        Ok(())
    }

    /// `SetBrake`: record the commanded brake notch.
    pub fn set_brake(&mut self, position: i32) -> AtsResult<()> {
        self.require_active("set_brake")?;
        self.cab.brake = position;
        Ok(())
    }

    /// `SetReverser`: record the commanded reverser position.
    pub fn set_reverser(&mut self, position: i32) -> AtsResult<()> {
        self.require_active("set_reverser")?;
        self.cab.reverser = position;
        Ok(())
    }

    /// `KeyDown`: mark an ATS key as pressed.
    pub fn key_down(&mut self, key: AtsKey) -> AtsResult<()> {
        self.require_active("key_down")?;
        self.cab.keys.insert(KeyState::from_key(key));
        trace!(?key, "key down");
        Ok(())
    }

    /// `KeyUp`: mark an ATS key as released.
    pub fn key_up(&mut self, key: AtsKey) -> AtsResult<()> {
        self.require_active("key_up")?;
        self.cab.keys.remove(KeyState::from_key(key));
        trace!(?key, "key up");
        Ok(())
    }

    /// `HornBlow`: record which horn sounded.
    pub fn horn_blow(&mut self, horn: HornType) -> AtsResult<()> {
        self.require_active("horn_blow")?;
        self.cab.last_horn = Some(horn);
        trace!(?horn, "horn");
        Ok(())
    }

    /// `DoorOpen`: doors are open.
    pub fn door_open(&mut self) -> AtsResult<()> {
        self.require_active("door_open")?;
        self.cab.doors_closed = false;
        Ok(())
    }

    /// `DoorClose`: doors are closed.
    pub fn door_close(&mut self) -> AtsResult<()> {
        self.require_active("door_close")?;
        self.cab.doors_closed = true;
        Ok(())
    }

    /// `SetSignal`: record the current signal aspect index.
    pub fn set_signal(&mut self, signal: i32) -> AtsResult<()> {
        self.require_active("set_signal")?;
        self.cab.signal = signal;
        Ok(())
    }

    /// `SetBeaconData`: copy the beacon event into session state.
    ///
    /// The event itself is transient; only this explicit copy survives
    /// the call.
    pub fn set_beacon_data(&mut self, beacon: BeaconData) -> AtsResult<()> {
        self.require_active("set_beacon_data")?;
        trace!(
            beacon_type = beacon.beacon_type,
            signal = beacon.signal,
            distance = beacon.distance,
            "beacon"
        );
        self.cab.last_beacon = Some(beacon);
        Ok(())
    }

    // ── Fail-safe ──

    /// Well-defined output for a tick that could not produce a real one:
    /// zero power, configured fail-safe brake, neutral reverser.
    pub fn fail_safe_output(&self) -> HandleOutput {
        let brake = match &self.spec {
            Some(spec) => self.config.fail_safe_brake_for(spec),
            None => 0,
        };
        HandleOutput::new(brake, 0, 0, CscInstruction::Continue)
    }

    // ── Internals ──

    fn reset(&mut self) {
        self.spec = None;
        self.initial_position = None;
        self.cab = CabState::new();
    }

    fn require_active(&self, call: &'static str) -> AtsResult<()> {
        match self.state {
            SessionState::Initialized | SessionState::Running => Ok(()),
            _ => Err(self.violation(call)),
        }
    }

    fn violation(&self, call: &'static str) -> AtsError {
        let err = AtsError::ProtocolViolation {
            call,
            state: self.state,
        };
        error!(%err, "host call out of order");
        err
    }
}

/// Clamp a policy output into the ranges the host accepts.
///
/// Brake may reach the emergency notch (`brake_notches + 1`); power stays
/// within the service range; reverser is one of -1/0/1. A constant-speed
/// value outside the closed instruction set is replaced with Continue.
fn sanitize_output(spec: &VehicleSpec, mut out: HandleOutput) -> HandleOutput {
    out.brake = out.brake.clamp(0, spec.emergency_notch());
    out.power = out.power.clamp(0, spec.power_notches);
    out.reverser = out.reverser.clamp(-1, 1);
    if out.csc().is_none() {
        warn!(
            constant_speed = out.constant_speed,
            "policy produced an unknown constant-speed value"
        );
        out.constant_speed = CscInstruction::Continue.as_raw();
    }
    out
}
