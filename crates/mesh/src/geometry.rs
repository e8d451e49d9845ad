use cgmath::Zero;

pub type Vector3 = cgmath::Vector3<f32>;

// We rely on Vector3 being repr(c).
static_assertions::assert_eq_size!(Vector3, [f32; 3]);
static_assertions::assert_eq_align!(Vector3, f32);

#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Triangle {
    pub p0: Vector3,
    pub p1: Vector3,
    pub p2: Vector3,
}

impl std::default::Default for Triangle {
    fn default() -> Self {
        Self {
            p0: Vector3::zero(),
            p1: Vector3::zero(),
            p2: Vector3::zero(),
        }
    }
}

impl Triangle {
    /// The un-normalized face normal.
    ///
    /// Its length is twice the area of the triangle, which makes it a natural
    /// weight when averaging face normals into vertex normals. Vertices are
    /// expected in counter-clockwise order when looking at the front face.
    pub fn area_normal(&self) -> Vector3 {
        (self.p1 - self.p0).cross(self.p2 - self.p0)
    }

    /// The unit face normal, or `None` for a degenerate (zero area) triangle.
    pub fn normal(&self) -> Option<Vector3> {
        crate::mesh::unit_or_none(&self.area_normal())
    }
}

/// An axis aligned bounding box.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// Returns the smallest box containing every point, or `None` when there
    /// are no points.
    pub fn from_points<'a, I: IntoIterator<Item = &'a Vector3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(
            Aabb {
                min: first,
                max: first,
            },
            |mut b, p| {
                b.min.x = b.min.x.min(p.x);
                b.min.y = b.min.y.min(p.y);
                b.min.z = b.min.z.min(p.z);
                b.max.x = b.max.x.max(p.x);
                b.max.y = b.max.y.max(p.y);
                b.max.z = b.max.z.max(p.z);
                b
            },
        ))
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccw_triangle_faces_up() {
        let t = Triangle {
            p0: Vector3::new(0.0, 0.0, 0.0),
            p1: Vector3::new(2.0, 0.0, 0.0),
            p2: Vector3::new(0.0, 2.0, 0.0),
        };
        assert_eq!(Vector3::new(0.0, 0.0, 4.0), t.area_normal());
        assert_eq!(Some(Vector3::unit_z()), t.normal());
    }

    #[test]
    fn degenerate_triangle_has_no_normal() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        let t = Triangle {
            p0: p,
            p1: p,
            p2: p,
        };
        assert_eq!(None, t.normal());
    }

    #[test]
    fn bounds_of_points() {
        let points = [
            Vector3::new(-1.0, 2.0, 0.0),
            Vector3::new(3.0, -2.0, 1.0),
            Vector3::new(0.0, 0.0, -5.0),
        ];
        let b = Aabb::from_points(&points).unwrap();
        assert_eq!(Vector3::new(-1.0, -2.0, -5.0), b.min);
        assert_eq!(Vector3::new(3.0, 2.0, 1.0), b.max);
        assert_eq!(Vector3::new(1.0, 0.0, -2.0), b.center());
        assert_eq!(Vector3::new(4.0, 4.0, 6.0), b.size());
        assert_eq!(None, Aabb::from_points(&[]));
    }
}
