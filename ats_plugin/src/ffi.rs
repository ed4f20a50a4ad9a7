//! Raw export surface invoked by the simulation host.
//!
//! One process-wide session sits behind a mutex; everything else in this
//! module is marshaling — raw `i32` sentinels and pointers on the way in,
//! typed session calls on the inside, a by-value [`HandleOutput`] on the way
//! out. Unknown raw values are logged and dropped rather than widening the
//! closed instruction sets.
//!
//! The host calls synchronously from its simulation thread and never
//! concurrently, so the mutex is uncontended; it exists to satisfy the
//! `static` requirements, not to coordinate callers.
//!
//! Session-level protocol violations are reported by the session itself
//! (`tracing::error!`) and treated as no-ops here: a host-side ordering bug
//! must not take down a live simulation.

use ats_common::instructions::{AtsKey, HornType, InitialHandlePosition};
use ats_common::wire::{BeaconData, HandleOutput, VehicleSpec, VehicleState};
use parking_lot::Mutex;
use tracing::warn;

use crate::config::PluginConfig;
use crate::io_array::IoArray;
use crate::policy::EchoPolicy;
use crate::session::PluginSession;

static SESSION: Mutex<PluginSession<EchoPolicy>> =
    Mutex::new(PluginSession::new(EchoPolicy::new()));

/// Called when the plugin is loaded.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn Load() {
    crate::init_tracing();

    let mut session = SESSION.lock();
    match PluginConfig::load_from_env() {
        Ok(config) => session.set_config(config),
        Err(e) => warn!(%e, "config load failed, keeping defaults"),
    }
    if session.load().is_err() {
        // Violation already reported; recover into a fresh session so the
        // host can keep going.
        session.dispose();
        let _ = session.load();
    }
}

/// Called when the plugin is unloaded.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn Dispose() {
    SESSION.lock().dispose();
}

/// Returns the plugin protocol version.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn GetPluginVersion() -> i32 {
    SESSION.lock().version()
}

/// Called when the train is loaded, with its control granularity.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn SetVehicleSpec(spec: VehicleSpec) {
    let _ = SESSION.lock().set_vehicle_spec(spec);
}

/// Called when the scenario starts or the train jumps to a new location.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn Initialize(initial_handle_position: i32) {
    let Some(position) = InitialHandlePosition::from_raw(initial_handle_position) else {
        warn!(
            raw = initial_handle_position,
            "unknown initial handle position"
        );
        return;
    };
    let _ = SESSION.lock().initialize(position);
}

/// Called every simulation tick with fresh telemetry and the current
/// panel/sound regions. Returns the tick's handle output.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn Elapse(
    vehicle_state: VehicleState,
    panel: *mut i32,
    sound: *mut i32,
) -> HandleOutput {
    let mut session = SESSION.lock();
    // Rebind both views every tick: the host may relocate the regions.
    let mut panel = unsafe { IoArray::bind(panel, session.config().panel_length) };
    let mut sound = unsafe { IoArray::bind(sound, session.config().sound_length) };
    match session.elapse(&vehicle_state, &mut panel, &mut sound) {
        Ok(output) => output,
        Err(_) => session.fail_safe_output(),
    }
}

/// Called when the power handle moves.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn SetPower(handle_position: i32) {
    let _ = SESSION.lock().set_power(handle_position);
}

/// Called when the brake handle moves.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn SetBrake(handle_position: i32) {
    let _ = SESSION.lock().set_brake(handle_position);
}

/// Called when the reverser handle moves.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn SetReverser(handle_position: i32) {
    let _ = SESSION.lock().set_reverser(handle_position);
}

/// Called when an ATS key is pressed.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn KeyDown(key_index: i32) {
    let Some(key) = AtsKey::from_raw(key_index) else {
        warn!(raw = key_index, "unknown key index");
        return;
    };
    let _ = SESSION.lock().key_down(key);
}

/// Called when an ATS key is released.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn KeyUp(key_index: i32) {
    let Some(key) = AtsKey::from_raw(key_index) else {
        warn!(raw = key_index, "unknown key index");
        return;
    };
    let _ = SESSION.lock().key_up(key);
}

/// Called when the horn is used.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn HornBlow(horn_index: i32) {
    let Some(horn) = HornType::from_raw(horn_index) else {
        warn!(raw = horn_index, "unknown horn type");
        return;
    };
    let _ = SESSION.lock().horn_blow(horn);
}

/// Called when the doors open.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn DoorOpen() {
    let _ = SESSION.lock().door_open();
}

/// Called when the doors close.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn DoorClose() {
    let _ = SESSION.lock().door_close();
}

/// Called when the current signal aspect changes.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn SetSignal(signal_index: i32) {
    let _ = SESSION.lock().set_signal(signal_index);
}

/// Called when the train crosses a beacon.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn SetBeaconData(beacon_data: BeaconData) {
    let _ = SESSION.lock().set_beacon_data(beacon_data);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ats_common::consts::PLUGIN_VERSION;
    use ats_common::instructions::CscInstruction;

    #[test]
    fn version_export_is_stateless() {
        assert_eq!(GetPluginVersion(), PLUGIN_VERSION);
    }

    // The export surface shares one process-wide session, so the whole
    // host-call sequence lives in a single test.
    #[test]
    fn exported_call_sequence() {
        // Out-of-order and malformed calls must be absorbed, not crash.
        SetPower(1);
        KeyDown(99);
        HornBlow(-1);
        Initialize(7);

        Load();
        SetVehicleSpec(VehicleSpec {
            brake_notches: 8,
            power_notches: 5,
            ats_cancel_notch: 6,
            b67_notch: 6,
            cars: 4,
        });
        Initialize(InitialHandlePosition::ServiceBrake.as_raw());

        let mut panel = vec![0i32; 256];
        let mut sound = vec![0i32; 256];
        let out = Elapse(
            VehicleState::default(),
            panel.as_mut_ptr(),
            sound.as_mut_ptr(),
        );
        assert_eq!(out.csc(), Some(CscInstruction::Continue));
        assert!((0..=8).contains(&out.brake));
        assert!((0..=5).contains(&out.power));

        SetBrake(2);
        SetPower(0);
        SetReverser(1);
        KeyDown(AtsKey::S.as_raw());
        KeyUp(AtsKey::S.as_raw());
        HornBlow(HornType::Primary.as_raw());
        DoorOpen();
        DoorClose();
        SetSignal(3);
        SetBeaconData(BeaconData {
            beacon_type: 1,
            signal: 2,
            distance: 88.0,
            optional: 0,
        });

        let out = Elapse(
            VehicleState {
                time_ms: 16,
                ..VehicleState::default()
            },
            panel.as_mut_ptr(),
            sound.as_mut_ptr(),
        );
        assert_eq!(out.brake, 2);
        assert_eq!(out.power, 0);
        assert_eq!(out.reverser, 1);

        // Null regions degrade to unbound views; the tick still answers.
        let out = Elapse(
            VehicleState::default(),
            core::ptr::null_mut(),
            core::ptr::null_mut(),
        );
        assert!(out.csc().is_some());

        Dispose();

        // After Dispose the tick path fails closed with the fail-safe output.
        let out = Elapse(
            VehicleState::default(),
            panel.as_mut_ptr(),
            sound.as_mut_ptr(),
        );
        assert_eq!(out.power, 0);
        assert_eq!(out.csc(), Some(CscInstruction::Continue));
    }
}
