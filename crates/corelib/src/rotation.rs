//! Keyboard-driven rotation about two axes (pitch about X, yaw about Y).

use crate::Mat4;

/// Logical rotation inputs; the platform layer maps physical keys onto these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotateKey {
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
}

/// Accumulated orientation plus the set of currently held keys.
#[derive(Clone, Copy, Debug)]
pub struct DualAxisRotation {
    /// Radians about X.
    pub pitch: f32,
    /// Radians about Y.
    pub yaw: f32,
    /// Radians per second while a key is held.
    pub speed: f32,
    held: [bool; 4],
}

impl DualAxisRotation {
    pub const DEFAULT_SPEED: f32 = std::f32::consts::FRAC_PI_2;

    pub fn new(speed: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            speed,
            held: [false; 4],
        }
    }

    #[inline]
    fn slot(key: RotateKey) -> usize {
        match key {
            RotateKey::PitchUp => 0,
            RotateKey::PitchDown => 1,
            RotateKey::YawLeft => 2,
            RotateKey::YawRight => 3,
        }
    }

    pub fn set_key(&mut self, key: RotateKey, pressed: bool) {
        self.held[Self::slot(key)] = pressed;
    }

    pub fn is_held(&self, key: RotateKey) -> bool {
        self.held[Self::slot(key)]
    }

    /// Release every key (e.g. when the window loses focus).
    pub fn release_all(&mut self) {
        self.held = [false; 4];
    }

    /// True while at least one key is held, i.e. the next frame will differ.
    pub fn is_active(&self) -> bool {
        self.held.iter().any(|&h| h)
    }

    /// Integrate held keys over `dt` seconds. Opposite keys cancel.
    pub fn update(&mut self, dt: f32) {
        let axis = |pos: RotateKey, neg: RotateKey| {
            (self.is_held(pos) as i8 - self.is_held(neg) as i8) as f32
        };
        let pitch_dir = axis(RotateKey::PitchUp, RotateKey::PitchDown);
        let yaw_dir = axis(RotateKey::YawRight, RotateKey::YawLeft);

        self.pitch = wrap_angle(self.pitch + pitch_dir * self.speed * dt);
        self.yaw = wrap_angle(self.yaw + yaw_dir * self.speed * dt);
    }

    pub fn reset(&mut self) {
        self.pitch = 0.0;
        self.yaw = 0.0;
    }

    /// Model matrix: yaw applied after pitch.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw) * Mat4::from_rotation_x(self.pitch)
    }
}

impl Default for DualAxisRotation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED)
    }
}

/// Keep angles in (-PI, PI] so long sessions don't lose precision.
fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w == -PI { PI } else { w }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    #[test]
    fn idle_rotation_is_identity() {
        let mut r = DualAxisRotation::default();
        r.update(1.0);
        assert_eq!(r.matrix(), Mat4::IDENTITY);
        assert!(!r.is_active());
    }

    #[test]
    fn held_key_integrates_speed() {
        let mut r = DualAxisRotation::new(1.0);
        r.set_key(RotateKey::YawRight, true);
        r.update(0.25);
        r.update(0.25);
        assert!((r.yaw - 0.5).abs() < 1e-6);
        assert_eq!(r.pitch, 0.0);

        r.set_key(RotateKey::YawRight, false);
        r.set_key(RotateKey::PitchDown, true);
        r.update(0.5);
        assert!((r.pitch + 0.5).abs() < 1e-6);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut r = DualAxisRotation::new(2.0);
        r.set_key(RotateKey::PitchUp, true);
        r.set_key(RotateKey::PitchDown, true);
        r.update(1.0);
        assert_eq!(r.pitch, 0.0);
        r.release_all();
        assert!(!r.is_active());
    }

    #[test]
    fn quarter_yaw_turns_x_into_minus_z() {
        let mut r = DualAxisRotation::new(std::f32::consts::FRAC_PI_2);
        r.set_key(RotateKey::YawRight, true);
        r.update(1.0);
        let v = r.matrix().transform_vector3(Vec3::X);
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn angles_stay_wrapped() {
        let mut r = DualAxisRotation::new(1.0);
        r.set_key(RotateKey::YawLeft, true);
        for _ in 0..100 {
            r.update(0.5);
        }
        assert!(r.yaw.abs() <= std::f32::consts::PI);
    }
}
