//! Input state tracking

use std::collections::HashSet;

/// Logical flight controls. The windowing layer maps physical keys onto these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    ThrottleUp,
    ThrottleDown,
    PitchUp,
    PitchDown,
    RollLeft,
    RollRight,
    Jump,
}

/// Per-tick control input handed to steering and physics.
///
/// Axes are -1, 0 or +1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// +1 thrust, -1 brake/reverse
    pub throttle: i8,
    /// +1 nose down, -1 nose up
    pub pitch: i8,
    /// +1 roll left, -1 roll right
    pub roll: i8,
    /// One-shot impulse request for generic bodies
    pub jump: bool,
}

impl ControlInput {
    /// No input on any axis
    pub const NEUTRAL: Self = Self {
        throttle: 0,
        pitch: 0,
        roll: 0,
        jump: false,
    };

    /// Input with only the throttle set
    pub fn throttle(throttle: i8) -> Self {
        Self {
            throttle: throttle.signum(),
            ..Self::NEUTRAL
        }
    }
}

/// Tracks which controls are held
pub struct InputState {
    /// Currently pressed controls
    pressed: HashSet<Control>,
    /// Controls pressed this frame
    just_pressed: HashSet<Control>,
    /// Controls released this frame
    just_released: HashSet<Control>,
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    /// Record a press
    pub fn press(&mut self, control: Control) {
        if !self.pressed.contains(&control) {
            self.just_pressed.insert(control);
        }
        self.pressed.insert(control);
    }

    /// Record a release
    pub fn release(&mut self, control: Control) {
        self.pressed.remove(&control);
        self.just_released.insert(control);
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Check if a control is held
    pub fn is_pressed(&self, control: Control) -> bool {
        self.pressed.contains(&control)
    }

    /// Check if a control was pressed this frame
    pub fn is_just_pressed(&self, control: Control) -> bool {
        self.just_pressed.contains(&control)
    }

    /// Check if a control was released this frame
    pub fn is_just_released(&self, control: Control) -> bool {
        self.just_released.contains(&control)
    }

    /// Resolve the held controls into axis values for this tick.
    ///
    /// When both directions of an axis are held the positive one wins.
    /// Jump is edge-triggered.
    pub fn control_input(&self) -> ControlInput {
        ControlInput {
            throttle: self.axis(Control::ThrottleUp, Control::ThrottleDown),
            pitch: self.axis(Control::PitchDown, Control::PitchUp),
            roll: self.axis(Control::RollLeft, Control::RollRight),
            jump: self.is_just_pressed(Control::Jump),
        }
    }

    fn axis(&self, positive: Control, negative: Control) -> i8 {
        if self.is_pressed(positive) {
            1
        } else if self.is_pressed(negative) {
            -1
        } else {
            0
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
