//! Control input snapshot and where it comes from.
//!
//! The core only ever sees a [`ControlInput`] per tick. Whether it came from a
//! keyboard, a gamepad, the websocket host, or a scripted replay is the
//! caller's business.

use rapier3d::prelude::Real;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlInput {
    pub steer: Real,    // -1 (full left) .. 1 (full right)
    pub throttle: Real, // 0..1
    pub brake: Real,    // 0..1
}

#[inline]
fn sanitize(v: Real, lo: Real, hi: Real) -> Real {
    if v.is_finite() { v.clamp(lo, hi) } else { 0.0 }
}

impl ControlInput {
    pub fn new(steer: Real, throttle: Real, brake: Real) -> Self {
        Self { steer, throttle, brake }.clamped()
    }

    /// Forces every axis into its documented range; NaN/inf read as 0.
    pub fn clamped(self) -> Self {
        Self {
            steer: sanitize(self.steer, -1.0, 1.0),
            throttle: sanitize(self.throttle, 0.0, 1.0),
            brake: sanitize(self.brake, 0.0, 1.0),
        }
    }

    /// Digital (keyboard-style) mapping. Left wins if both steer keys are held.
    pub fn from_digital(left: bool, right: bool, accelerate: bool, brake: bool) -> Self {
        let steer = if left {
            -1.0
        } else if right {
            1.0
        } else {
            0.0
        };
        Self {
            steer,
            throttle: if accelerate { 1.0 } else { 0.0 },
            brake: if brake { 1.0 } else { 0.0 },
        }
    }
}

/// Supplies one snapshot per physics tick.
pub trait InputSource {
    fn snapshot(&mut self, tick: u64) -> ControlInput;
}

/// Replays keyframes: each input holds from its tick until the next keyframe.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<(u64, ControlInput)>,
}

impl ScriptedInput {
    pub fn new(mut frames: Vec<(u64, ControlInput)>) -> Self {
        frames.sort_by_key(|(t, _)| *t);
        Self { frames }
    }

    pub fn then(mut self, tick: u64, input: ControlInput) -> Self {
        self.frames.push((tick, input));
        self.frames.sort_by_key(|(t, _)| *t);
        self
    }
}

impl InputSource for ScriptedInput {
    fn snapshot(&mut self, tick: u64) -> ControlInput {
        self.frames
            .iter()
            .rev()
            .find(|(t, _)| *t <= tick)
            .map(|(_, input)| *input)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_axes() {
        let i = ControlInput::new(-3.0, 1.5, -0.2);
        assert_eq!(i, ControlInput { steer: -1.0, throttle: 1.0, brake: 0.0 });
    }

    #[test]
    fn nan_reads_as_zero() {
        let i = ControlInput { steer: Real::NAN, throttle: Real::INFINITY, brake: 0.5 }.clamped();
        assert_eq!(i.steer, 0.0);
        assert_eq!(i.throttle, 0.0);
        assert_eq!(i.brake, 0.5);
    }

    #[test]
    fn digital_mapping() {
        let i = ControlInput::from_digital(false, true, true, false);
        assert_eq!(i, ControlInput { steer: 1.0, throttle: 1.0, brake: 0.0 });
        assert_eq!(ControlInput::from_digital(true, true, false, true).steer, -1.0);
    }

    #[test]
    fn scripted_input_holds_until_next_keyframe() {
        let mut script = ScriptedInput::default()
            .then(10, ControlInput::new(0.0, 1.0, 0.0))
            .then(20, ControlInput::new(0.5, 0.0, 1.0));

        assert_eq!(script.snapshot(0), ControlInput::default());
        assert_eq!(script.snapshot(10).throttle, 1.0);
        assert_eq!(script.snapshot(19).throttle, 1.0);
        assert_eq!(script.snapshot(25).brake, 1.0);
    }
}
