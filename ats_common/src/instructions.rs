//! Closed instruction encodings carried across the host boundary.
//!
//! The host speaks raw `i32` sentinels; this module converts them to tagged
//! enums at the API edge and back to raw values only at the marshaling
//! boundary. The sets are closed — no additional sentinel values exist, and
//! `from_raw` returns `None` for anything outside them rather than guessing.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ─── Sound control ──────────────────────────────────────────────────

/// Sound-channel control instruction interpreted by the host's audio engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum SoundControl {
    /// Stop the channel.
    Stop = -10000,
    /// Play the channel in a loop.
    PlayLooping = 0,
    /// Play the channel once.
    PlayOnce = 1,
    /// Leave the channel as it is.
    Continue = 2,
}

impl SoundControl {
    /// Decode a raw host value. `None` outside the closed set.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -10000 => Some(Self::Stop),
            0 => Some(Self::PlayLooping),
            1 => Some(Self::PlayOnce),
            2 => Some(Self::Continue),
            _ => None,
        }
    }

    /// Raw wire value.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

// ─── Constant-speed control ─────────────────────────────────────────

/// Constant-speed control instruction returned in [`crate::wire::HandleOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum CscInstruction {
    /// Keep the current constant-speed mode.
    #[default]
    Continue = 0,
    /// Engage constant-speed operation.
    Enable = 1,
    /// Release constant-speed operation.
    Disable = 2,
}

impl CscInstruction {
    /// Decode a raw host value. `None` outside the closed set.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Continue),
            1 => Some(Self::Enable),
            2 => Some(Self::Disable),
            _ => None,
        }
    }

    /// Raw wire value.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

// ─── Initial handle position ────────────────────────────────────────

/// Handle posture at scenario start, delivered once with `Initialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum InitialHandlePosition {
    /// Brakes applied at full service.
    #[default]
    ServiceBrake = 0,
    /// Brakes applied at emergency.
    EmergencyBrake = 1,
    /// Handle removed (train secured).
    Removed = 2,
}

impl InitialHandlePosition {
    /// Decode a raw host value. `None` outside the closed set.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::ServiceBrake),
            1 => Some(Self::EmergencyBrake),
            2 => Some(Self::Removed),
            _ => None,
        }
    }

    /// Raw wire value.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

// ─── Horn type ──────────────────────────────────────────────────────

/// Which horn the driver sounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum HornType {
    /// Primary horn.
    Primary = 0,
    /// Secondary horn.
    Secondary = 1,
    /// Music horn.
    Music = 2,
}

impl HornType {
    /// Decode a raw host value. `None` outside the closed set.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Primary),
            1 => Some(Self::Secondary),
            2 => Some(Self::Music),
            _ => None,
        }
    }

    /// Raw wire value.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

// ─── ATS keys ───────────────────────────────────────────────────────

/// Logical ATS key, indexed 0–15 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
#[allow(missing_docs)]
pub enum AtsKey {
    S = 0,
    A1 = 1,
    A2 = 2,
    B1 = 3,
    B2 = 4,
    C1 = 5,
    C2 = 6,
    D = 7,
    E = 8,
    F = 9,
    G = 10,
    H = 11,
    I = 12,
    J = 13,
    K = 14,
    L = 15,
}

impl AtsKey {
    /// Decode a raw host key index. `None` outside 0..=15.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::S),
            1 => Some(Self::A1),
            2 => Some(Self::A2),
            3 => Some(Self::B1),
            4 => Some(Self::B2),
            5 => Some(Self::C1),
            6 => Some(Self::C2),
            7 => Some(Self::D),
            8 => Some(Self::E),
            9 => Some(Self::F),
            10 => Some(Self::G),
            11 => Some(Self::H),
            12 => Some(Self::I),
            13 => Some(Self::J),
            14 => Some(Self::K),
            15 => Some(Self::L),
            _ => None,
        }
    }

    /// Raw wire value.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

bitflags! {
    /// Pressed-key set retained by the session, one bit per [`AtsKey`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyState: u16 {
        const S  = 1 << 0;
        const A1 = 1 << 1;
        const A2 = 1 << 2;
        const B1 = 1 << 3;
        const B2 = 1 << 4;
        const C1 = 1 << 5;
        const C2 = 1 << 6;
        const D  = 1 << 7;
        const E  = 1 << 8;
        const F  = 1 << 9;
        const G  = 1 << 10;
        const H  = 1 << 11;
        const I  = 1 << 12;
        const J  = 1 << 13;
        const K  = 1 << 14;
        const L  = 1 << 15;
    }
}

impl Default for KeyState {
    fn default() -> Self {
        Self::empty()
    }
}

impl KeyState {
    /// The flag bit for a single key.
    #[inline]
    pub const fn from_key(key: AtsKey) -> Self {
        Self::from_bits_truncate(1 << key as i32)
    }

    /// Whether a key is currently held down.
    #[inline]
    pub const fn is_pressed(&self, key: AtsKey) -> bool {
        self.intersects(Self::from_key(key))
    }
}
