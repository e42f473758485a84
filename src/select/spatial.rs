//! Ray queries against the mesh surface.
//!
//! The selector consumes surface raycasts through the [`MeshSpatial`] trait so
//! it stays agnostic of how acceleration structures are built and refreshed.
//! [`LinearMeshSpatial`] is the reference implementation: a brute-force scan
//! over all triangles using Möller–Trumbore intersection. Callers with large
//! meshes are expected to supply their own tree-backed implementation.

use nalgebra::{Point3, Vector3};

use crate::mesh::{GroupMesh, TriangleId};

/// A ray in mesh-local space with a normalized direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray3 {
    /// Ray origin.
    pub origin: Point3<f64>,
    direction: Vector3<f64>,
}

impl Ray3 {
    /// Create a ray; the direction is normalized.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// The normalized ray direction.
    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// The point at parameter `t` along the ray.
    #[inline]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// The (non-negative) ray parameter of the point closest to `p`.
    #[inline]
    pub fn project(&self, p: &Point3<f64>) -> f64 {
        (p - self.origin).dot(&self.direction).max(0.0)
    }

    /// The point on the ray closest to `p`.
    #[inline]
    pub fn nearest_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.point_at(self.project(p))
    }
}

/// A surface hit returned by [`MeshSpatial::find_nearest_hit_triangle`].
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The hit triangle.
    pub triangle: TriangleId,

    /// The hit position.
    pub position: Point3<f64>,

    /// The ray parameter of the hit.
    pub ray_t: f64,
}

/// Surface raycast capability consumed by the selector.
pub trait MeshSpatial {
    /// Find the nearest triangle hit by a ray, if any.
    fn find_nearest_hit_triangle(&self, ray: &Ray3) -> Option<RayHit>;

    /// Check whether `point` is hidden from `viewpoint` by the mesh surface.
    ///
    /// Casts from just off the point toward the viewpoint; any surface hit
    /// closer than the viewpoint occludes. The starting offset keeps
    /// triangles incident to the point itself from registering.
    fn is_occluded(&self, point: &Point3<f64>, viewpoint: &Point3<f64>) -> bool {
        let to_view = viewpoint - point;
        let distance = to_view.norm();
        if distance <= f64::EPSILON {
            return false;
        }

        let offset = distance * 1e-4;
        let direction = to_view / distance;
        let ray = Ray3::new(point + direction * offset, direction);
        match self.find_nearest_hit_triangle(&ray) {
            Some(hit) => hit.ray_t < distance - 2.0 * offset,
            None => false,
        }
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter of the hit, or `None` for a miss or a ray
/// parallel to the triangle plane.
pub fn intersect_ray_triangle(
    ray: &Ray3,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let epsilon = 1e-12;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction().cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < epsilon {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction().dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Brute-force [`MeshSpatial`] over a [`GroupMesh`].
#[derive(Debug)]
pub struct LinearMeshSpatial<'a, M: GroupMesh> {
    mesh: &'a M,
}

impl<'a, M: GroupMesh> LinearMeshSpatial<'a, M> {
    /// Create a spatial query over a mesh.
    pub fn new(mesh: &'a M) -> Self {
        Self { mesh }
    }
}

impl<M: GroupMesh> MeshSpatial for LinearMeshSpatial<'_, M> {
    fn find_nearest_hit_triangle(&self, ray: &Ray3) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for ti in 0..self.mesh.max_triangle_id() {
            let t = TriangleId::new(ti);
            if !self.mesh.is_triangle(t) {
                continue;
            }

            let [p0, p1, p2] = self.mesh.triangle_positions(t);
            if let Some(ray_t) = intersect_ray_triangle(ray, &p0, &p1, &p2) {
                if best.as_ref().map_or(true, |b| ray_t < b.ray_t) {
                    best = Some(RayHit {
                        triangle: t,
                        position: ray.point_at(ray_t),
                        ray_t,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TriMesh;

    fn square_mesh() -> TriMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        TriMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]], &[0, 0]).unwrap()
    }

    #[test]
    fn test_ray_projection() {
        let ray = Ray3::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        let p = Point3::new(1.0, 0.0, 3.0);

        assert!((ray.project(&p) - 3.0).abs() < 1e-12);
        assert!((ray.nearest_point(&p) - Point3::new(0.0, 0.0, 3.0)).norm() < 1e-12);

        // Points behind the origin clamp to t = 0
        let behind = Point3::new(0.0, 0.0, -5.0);
        assert_eq!(ray.project(&behind), 0.0);
    }

    #[test]
    fn test_ray_triangle_hit() {
        let v0 = Point3::new(0.0, 0.0, 0.0);
        let v1 = Point3::new(1.0, 0.0, 0.0);
        let v2 = Point3::new(0.0, 1.0, 0.0);

        let ray = Ray3::new(Point3::new(0.25, 0.25, 1.0), Vector3::new(0.0, 0.0, -1.0));
        let t = intersect_ray_triangle(&ray, &v0, &v1, &v2).unwrap();
        assert!((t - 1.0).abs() < 1e-12);

        // Miss outside the triangle
        let miss = Ray3::new(Point3::new(0.9, 0.9, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(intersect_ray_triangle(&miss, &v0, &v1, &v2).is_none());

        // Parallel ray
        let parallel = Ray3::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(intersect_ray_triangle(&parallel, &v0, &v1, &v2).is_none());
    }

    #[test]
    fn test_nearest_hit_picks_closest() {
        let mesh = square_mesh();
        let spatial = LinearMeshSpatial::new(&mesh);

        let ray = Ray3::new(Point3::new(0.5, 0.5, 2.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = spatial.find_nearest_hit_triangle(&ray).unwrap();
        assert!((hit.ray_t - 2.0).abs() < 1e-12);
        assert!((hit.position - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);

        let away = Ray3::new(Point3::new(0.5, 0.5, 2.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(spatial.find_nearest_hit_triangle(&away).is_none());
    }

    #[test]
    fn test_occlusion() {
        let mesh = square_mesh();
        let spatial = LinearMeshSpatial::new(&mesh);

        let viewpoint = Point3::new(0.5, 0.5, 2.0);

        // A point behind the square is occluded from above it
        let behind = Point3::new(0.5, 0.5, -1.0);
        assert!(spatial.is_occluded(&behind, &viewpoint));

        // A point on the surface is not occluded from its own side
        let on_surface = Point3::new(0.5, 0.5, 0.0);
        assert!(!spatial.is_occluded(&on_surface, &viewpoint));

        // A point beside the square sees the viewpoint freely
        let beside = Point3::new(3.0, 0.5, -1.0);
        assert!(!spatial.is_occluded(&beside, &viewpoint));
    }
}
