/// One tick of device-agnostic input.
///
/// `*_pressed` fields are edges (true only on the tick the button went down);
/// `*_held` fields are levels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ActorInput {
    pub left: bool,
    pub right: bool,
    /// Analog stick X in `[-1, 1]`. Overrides the digital keys when outside
    /// the dead zone.
    pub axis_x: f32,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub roll_pressed: bool,
    pub roll_held: bool,
    pub attack_pressed: bool,
    pub dash_pressed: bool,
}

impl ActorInput {
    /// Signed horizontal intensity in `[-1, 1]`; 0 when nothing is held.
    pub fn horizontal(&self, dead_zone: f32) -> f32 {
        if self.axis_x.abs() > dead_zone {
            return self.axis_x.clamp(-1.0, 1.0);
        }
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// True if the held direction points at `side` (-1 left, 1 right).
    pub fn holds_toward(&self, side: f32, dead_zone: f32) -> bool {
        let h = self.horizontal(dead_zone);
        h != 0.0 && h.signum() == side.signum()
    }
}
