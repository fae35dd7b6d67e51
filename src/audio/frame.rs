// One stereo frame, the unit the mixer renders in
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    // folded down for mono devices
    pub fn mono(self) -> f32 {
        (self.left + self.right) * 0.5
    }
}
