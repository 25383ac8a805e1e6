use std::ops::{Add, AddAssign};

use glam::Vec3;

use crate::{gpu, Axis};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    pub fn area(&self) -> f32 {
        if !self.is_set() {
            return 0.0;
        }

        let extent = self.extent();

        2.0 * (extent.x * extent.y + extent.x * extent.z + extent.y * extent.z)
    }

    /// Returns the axis along which this box is the longest; ties are resolved
    /// towards the later axis.
    pub fn longest_axis(&self) -> Axis {
        let extent = self.extent();

        if extent.x > extent.y && extent.x > extent.z {
            Axis::X
        } else if extent.y > extent.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns the part of this box that lies below `at` on given axis.
    pub fn with_max_at(mut self, axis: Axis, at: f32) -> Self {
        self.max[axis] = at;
        self
    }

    /// Returns the part of this box that lies above `at` on given axis.
    pub fn with_min_at(mut self, axis: Axis, at: f32) -> Self {
        self.min[axis] = at;
        self
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    pub fn is_set(&self) -> bool {
        self.min.x != Self::default().min.x
    }

    pub fn serialize(&self) -> gpu::BoundingBox {
        gpu::BoundingBox::new(self.min, self.max)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::MAX, Vec3::MIN)
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.min = self.min.min(rhs);
        self.max = self.max.max(rhs);
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Vec3>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

impl Add<Self> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Self> for BoundingBox {
    fn add_assign(&mut self, rhs: Self) {
        if rhs.is_set() {
            *self += rhs.min;
            *self += rhs.max;
        }
    }
}

impl FromIterator<Self> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Self>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}
