use std::fmt;
use std::ops::{Index, IndexMut};

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn all() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        self as u32
    }

    /// Returns the axis that follows this one, wrapping around from Z to X.
    pub fn next(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::Z,
            Self::Z => Self::X,
        }
    }

    /// Returns the two axes orthogonal to this one.
    pub fn others(self) -> [Self; 2] {
        match self {
            Self::X => [Self::Y, Self::Z],
            Self::Y => [Self::X, Self::Z],
            Self::Z => [Self::X, Self::Y],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

impl Index<Axis> for Vec3 {
    type Output = f32;

    fn index(&self, index: Axis) -> &Self::Output {
        match index {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl IndexMut<Axis> for Vec3 {
    fn index_mut(&mut self, index: Axis) -> &mut Self::Output {
        match index {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn next() {
        assert_eq!(Axis::Y, Axis::X.next());
        assert_eq!(Axis::Z, Axis::Y.next());
        assert_eq!(Axis::X, Axis::Z.next());
    }

    #[test]
    fn ids() {
        for axis in Axis::all() {
            assert_eq!(Some(axis), Axis::from_id(axis.id()));
        }

        assert_eq!(None, Axis::from_id(3));
    }

    #[test]
    fn index() {
        let mut target = vec3(1.0, 2.0, 3.0);

        target[Axis::Y] = 20.0;

        assert_eq!(1.0, target[Axis::X]);
        assert_eq!(20.0, target[Axis::Y]);
        assert_eq!(3.0, target[Axis::Z]);
    }
}
