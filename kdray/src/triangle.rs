use glam::{vec3, Mat4, Vec3, Vec4};

use crate::{gpu, BoundingBox};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    positions: [Vec3; 3],
}

impl Triangle {
    /// Number of floats a single triangle takes in a flat vertex buffer: three
    /// vertices, each padded to four components.
    pub const STRIDE: usize = 12;

    pub fn new(positions: [impl Into<Vec3>; 3]) -> Self {
        Self {
            positions: positions.map(Into::into),
        }
    }

    pub fn positions(&self) -> [Vec3; 3] {
        self.positions
    }

    pub fn center(&self) -> Vec3 {
        self.positions.iter().copied().sum::<Vec3>() / 3.0
    }

    pub fn bounds(&self) -> BoundingBox {
        self.positions.iter().copied().collect()
    }

    /// Converts this triangle into a [`gpu::WoopTriangle`]; degenerate
    /// triangles (ones with no area) yield a zeroed record that no ray can
    /// hit.
    pub fn serialize(&self) -> gpu::WoopTriangle {
        let [v0, v1, v2] = self.positions;
        let a = v0 - v2;
        let b = v1 - v2;
        let c = a.cross(b);

        let xform = Mat4::from_cols(
            a.extend(0.0),
            b.extend(0.0),
            c.extend(0.0),
            v2.extend(1.0),
        )
        .inverse();

        // The matrix's determinant is `c . c`, so it's singular exactly when
        // the triangle has no area
        if c.length_squared() == 0.0 || !xform.is_finite() {
            log::warn!("Found a degenerate triangle: {:?}", self.positions);

            return Default::default();
        }

        gpu::WoopTriangle {
            d0: xform.row(2) * Vec4::new(1.0, 1.0, 1.0, -1.0),
            d1: xform.row(0),
            d2: xform.row(1),
        }
    }
}

/// Interprets `vertices` as consecutive triangles, each made of three `xyzw`
/// vertices (with `w` ignored).
pub fn triangles_from_vertices(vertices: &[f32]) -> Vec<Triangle> {
    let chunks = vertices.chunks_exact(Triangle::STRIDE);

    if !chunks.remainder().is_empty() {
        log::warn!(
            "Vertex buffer contains {} trailing floats that don't form a \
             whole triangle - ignoring them",
            chunks.remainder().len(),
        );
    }

    chunks
        .map(|chunk| {
            Triangle::new([
                vec3(chunk[0], chunk[1], chunk[2]),
                vec3(chunk[4], chunk[5], chunk[6]),
                vec3(chunk[8], chunk[9], chunk[10]),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn bounds() {
        let target = Triangle::new([
            vec3(1.0, 0.0, 5.0),
            vec3(-1.0, 2.0, 4.0),
            vec3(0.0, 1.0, 6.0),
        ]);

        let bounds = target.bounds();

        assert_eq!(vec3(-1.0, 0.0, 4.0), bounds.min());
        assert_eq!(vec3(1.0, 2.0, 6.0), bounds.max());
        assert_eq!(vec3(0.0, 1.0, 5.0), target.center());
    }

    #[test]
    fn from_vertices() {
        #[rustfmt::skip]
        let vertices = [
            0.0, 0.0, 0.0, 1.0,
            1.0, 0.0, 0.0, 1.0,
            0.0, 1.0, 0.0, 1.0,

            2.0, 2.0, 2.0, 1.0,
            3.0, 2.0, 2.0, 1.0,
            2.0, 3.0, 2.0, 1.0,

            9.0, 9.0,
        ];

        let target = triangles_from_vertices(&vertices);

        assert_eq!(2, target.len());

        assert_eq!(
            [vec3(2.0, 2.0, 2.0), vec3(3.0, 2.0, 2.0), vec3(2.0, 3.0, 2.0)],
            target[1].positions(),
        );
    }

    #[test]
    fn serialize() {
        let target = Triangle::new([
            vec3(1.0, 2.0, 3.0),
            vec3(4.0, -1.0, 2.0),
            vec3(0.0, 0.0, 5.0),
        ]);

        let woop = target.serialize();
        let [v0, v1, v2] = target.positions().map(|p| p.extend(1.0));

        // First two rows map the triangle onto the unit triangle's barycentric
        // coordinates
        assert_relative_eq!(1.0, woop.d1.dot(v0), epsilon = 1e-4);
        assert_relative_eq!(0.0, woop.d1.dot(v1), epsilon = 1e-4);
        assert_relative_eq!(0.0, woop.d1.dot(v2), epsilon = 1e-4);
        assert_relative_eq!(0.0, woop.d2.dot(v0), epsilon = 1e-4);
        assert_relative_eq!(1.0, woop.d2.dot(v1), epsilon = 1e-4);
        assert_relative_eq!(0.0, woop.d2.dot(v2), epsilon = 1e-4);

        // ... while the third one measures distance from the triangle's plane
        for v in [v0, v1, v2] {
            assert_relative_eq!(
                0.0,
                woop.d0.truncate().dot(v.truncate()) - woop.d0.w,
                epsilon = 1e-4,
            );
        }
    }

    #[test]
    fn serialize_degenerate() {
        let target = Triangle::new([
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 1.0, 1.0),
            vec3(2.0, 2.0, 2.0),
        ]);

        assert_eq!(gpu::WoopTriangle::default(), target.serialize());
    }
}
