//! Input mapping for the back-end seam (§6). The engine never polls a
//! platform's native keycodes directly; a `Keymap` translates them into
//! the fixed `Key` set below, and an `InputState` tracks which keys and
//! mouse buttons are currently held.

use bitset_core::BitSet;

use crate::math::{Vec2, Vec2I};

#[derive(Copy, Clone, Hash, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Escape,
    Plus, Minus, Comma, Period, LeftBracket, RightBracket, Backslash, Slash, Space,
    Insert, Delete, Backspace,
}

impl Key {
    pub const COUNT: usize = Key::Backspace as usize + 1;
}

/// Mouse button numbering fixed by the spec: `{Left=1, Middle=2, Right=3}`.
#[derive(Copy, Clone, Hash, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum MouseButton {
    Left = 1,
    Middle = 2,
    Right = 3,
}

/// One entry of a platform keycode → `Key` translation table.
#[derive(Copy, Clone, Debug)]
pub enum KeymapEntry {
    /// A single platform keycode maps to a single `Key`.
    Exact { platform_code: u32, key: Key },
    /// `[platform_start, platform_start + len)` maps one-to-one, in order,
    /// onto `[key_start as u32, key_start as u32 + len)`.
    Range { platform_start: u32, key_start: Key, len: u32 },
    /// Like `Range`, but the platform code requires an additive offset
    /// before it lines up with the `Key` ordinal (used when a platform's
    /// numpad or function-key block is numbered differently).
    RangeWithOffset { platform_start: u32, key_start: Key, len: u32, offset: i64 },
}

/// A table of `KeymapEntry` values, consulted top-to-bottom; the first
/// matching entry wins.
pub struct Keymap {
    entries: Vec<KeymapEntry>,
}

impl Keymap {
    pub fn new(entries: Vec<KeymapEntry>) -> Self {
        Self { entries }
    }

    pub fn translate(&self, platform_code: u32) -> Option<Key> {
        for entry in &self.entries {
            match *entry {
                KeymapEntry::Exact { platform_code: code, key } if code == platform_code => {
                    return Some(key);
                }
                KeymapEntry::Range { platform_start, key_start, len }
                    if platform_code >= platform_start && platform_code < platform_start + len =>
                {
                    let ordinal = key_start as u32 + (platform_code - platform_start);
                    return key_from_ordinal(ordinal);
                }
                KeymapEntry::RangeWithOffset { platform_start, key_start, len, offset }
                    if platform_code >= platform_start && platform_code < platform_start + len =>
                {
                    let shifted = platform_code as i64 + offset;
                    let ordinal = key_start as i64 + shifted;
                    if ordinal < 0 {
                        return None;
                    }
                    return key_from_ordinal(ordinal as u32);
                }
                _ => {}
            }
        }
        None
    }
}

fn key_from_ordinal(ordinal: u32) -> Option<Key> {
    const TABLE: &[Key] = &[
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I, Key::J, Key::K,
        Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R, Key::S, Key::T, Key::U, Key::V,
        Key::W, Key::X, Key::Y, Key::Z, Key::Num0, Key::Num1, Key::Num2, Key::Num3, Key::Num4,
        Key::Num5, Key::Num6, Key::Num7, Key::Num8, Key::Num9, Key::F1, Key::F2, Key::F3, Key::F4,
        Key::F5, Key::F6, Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12, Key::Escape,
        Key::Plus, Key::Minus, Key::Comma, Key::Period, Key::LeftBracket, Key::RightBracket,
        Key::Backslash, Key::Slash, Key::Space, Key::Insert, Key::Delete, Key::Backspace,
    ];
    TABLE.get(ordinal as usize).copied()
}

/// Vertical mouse-pan clamp from the spec's control list, in degrees.
pub const MOUSE_PITCH_CLAMP_DEG: (f32, f32) = (-80.0, 10.0);

#[derive(Clone, Default)]
pub struct InputState {
    keyboard_keys: [u32; (Key::COUNT + 31) / 32],
    mouse_pos: Vec2I,
    mouse_buttons: u32,
    mouse_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&mut self, key: Key, is_down: bool) {
        if is_down {
            self.keyboard_keys.bit_set(key as usize);
        } else {
            self.keyboard_keys.bit_reset(key as usize);
        }
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keyboard_keys.bit_test(key as usize)
    }

    pub fn set_mouse_button_down(&mut self, button: MouseButton, is_down: bool) {
        if is_down {
            self.mouse_buttons.bit_set(button as usize);
        } else {
            self.mouse_buttons.bit_reset(button as usize);
        }
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.bit_test(button as usize)
    }

    pub fn set_mouse_position(&mut self, position: Vec2I) {
        self.mouse_pos = position;
    }

    pub fn mouse_position(&self) -> Vec2I {
        self.mouse_pos
    }

    pub fn set_mouse_locked(&mut self, locked: bool) {
        self.mouse_locked = locked;
    }

    pub fn mouse_locked(&self) -> bool {
        self.mouse_locked
    }
}

/// Mouse-look sensitivity, applied per-axis to raw pointer deltas before
/// the pitch clamp in `MOUSE_PITCH_CLAMP_DEG` is enforced.
#[derive(Copy, Clone, Debug)]
pub struct MouseSensitivity {
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for MouseSensitivity {
    fn default() -> Self {
        Self { yaw: 0.002, pitch: 0.002 }
    }
}

/// Applies sensitivity and the vertical clamp to a raw mouse delta,
/// returning the new `(yaw, pitch)` in radians.
pub fn apply_mouse_look(
    current_yaw: f32,
    current_pitch: f32,
    delta: Vec2,
    sensitivity: MouseSensitivity,
) -> (f32, f32) {
    let yaw = current_yaw + delta.x * sensitivity.yaw;
    let (min_deg, max_deg) = MOUSE_PITCH_CLAMP_DEG;
    let pitch = (current_pitch + delta.y * sensitivity.pitch)
        .clamp(min_deg.to_radians(), max_deg.to_radians());
    (yaw, pitch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_entry_maps_single_code() {
        let map = Keymap::new(vec![KeymapEntry::Exact { platform_code: 65, key: Key::A }]);
        assert_eq!(map.translate(65), Some(Key::A));
        assert_eq!(map.translate(66), None);
    }

    #[test]
    fn range_entry_maps_contiguous_block() {
        let map = Keymap::new(vec![KeymapEntry::Range {
            platform_start: 100,
            key_start: Key::A,
            len: 26,
        }]);
        assert_eq!(map.translate(100), Some(Key::A));
        assert_eq!(map.translate(101), Some(Key::B));
        assert_eq!(map.translate(125), Some(Key::Z));
        assert_eq!(map.translate(126), None);
    }

    #[test]
    fn range_with_offset_shifts_before_lookup() {
        let map = Keymap::new(vec![KeymapEntry::RangeWithOffset {
            platform_start: 200,
            key_start: Key::F1,
            len: 12,
            offset: -200,
        }]);
        assert_eq!(map.translate(200), Some(Key::F1));
        assert_eq!(map.translate(211), Some(Key::F12));
    }

    #[test]
    fn mouse_pitch_is_clamped() {
        let (_, pitch) = apply_mouse_look(0.0, 0.0, Vec2::new(0.0, 100_000.0), MouseSensitivity::default());
        assert!(pitch <= MOUSE_PITCH_CLAMP_DEG.1.to_radians() + 1e-4);
    }

    #[test]
    fn input_state_tracks_keys_and_buttons() {
        let mut state = InputState::new();
        assert!(!state.is_key_down(Key::W));
        state.set_key_down(Key::W, true);
        assert!(state.is_key_down(Key::W));
        state.set_mouse_button_down(MouseButton::Right, true);
        assert!(state.is_mouse_button_down(MouseButton::Right));
        assert!(!state.is_mouse_button_down(MouseButton::Left));
    }
}
