//! Positional primitives.
use std::fmt::Display;

/// A point in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::Vector3;

    #[test]
    fn display() {
        assert_eq!(Vector3::new(1.0, -2.5, 0.0).to_string(), "(1, -2.5, 0)");
    }
}
