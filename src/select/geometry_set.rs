//! Spatial query support over corner points and edge polylines.
//!
//! [`GeometrySet`] holds the selectable point and curve geometry of a built
//! topology and answers ray-proximity queries: nearest element to a ray, and
//! all elements within tolerance for down-ray selection. "Nearest" means the
//! smallest ray parameter among in-tolerance candidates, so the element
//! closest to the viewer wins, not the one closest to the ray line; elements
//! at equal ray depth fall back to the one closest to the ray.
//!
//! The set supports cheap position refresh after mesh deformation
//! ([`update_points`](GeometrySet::update_points) /
//! [`update_curves`](GeometrySet::update_curves)) without rebuilding its
//! structure.

use nalgebra::Point3;

use super::spatial::Ray3;

/// A selectable point with its caller-assigned id.
#[derive(Debug, Clone, Copy)]
pub struct PointEntry {
    /// Caller-assigned id (the selector uses corner indices).
    pub id: usize,

    /// Current position.
    pub position: Point3<f64>,
}

/// A selectable polyline with its caller-assigned id.
#[derive(Debug, Clone)]
pub struct CurveEntry {
    /// Caller-assigned id (the selector uses group-edge indices).
    pub id: usize,

    /// Current polyline points.
    pub polyline: Vec<Point3<f64>>,
}

/// A point query result.
#[derive(Debug, Clone, Copy)]
pub struct NearestPoint {
    /// Id of the matched point.
    pub id: usize,

    /// Position of the matched point.
    pub position: Point3<f64>,

    /// Ray parameter of the ray point closest to the match.
    pub ray_t: f64,
}

/// A curve query result.
#[derive(Debug, Clone, Copy)]
pub struct NearestCurve {
    /// Id of the matched curve.
    pub id: usize,

    /// Nearest point on the curve.
    pub position: Point3<f64>,

    /// Ray parameter of the ray point closest to the match.
    pub ray_t: f64,

    /// Index of the matched polyline segment.
    pub segment: usize,
}

/// Point and polyline geometry with nearest-to-ray queries.
#[derive(Debug, Clone, Default)]
pub struct GeometrySet {
    points: Vec<PointEntry>,
    curves: Vec<CurveEntry>,
}

impl GeometrySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all geometry.
    pub fn clear(&mut self) {
        self.points.clear();
        self.curves.clear();
    }

    /// Number of points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of curves.
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Add a point.
    pub fn add_point(&mut self, id: usize, position: Point3<f64>) {
        self.points.push(PointEntry { id, position });
    }

    /// Add a polyline.
    pub fn add_curve(&mut self, id: usize, polyline: Vec<Point3<f64>>) {
        debug_assert!(polyline.len() >= 2, "curve {} has no segments", id);
        self.curves.push(CurveEntry { id, polyline });
    }

    /// Refresh every point position from its id, preserving structure.
    pub fn update_points(&mut self, position_of: impl Fn(usize) -> Point3<f64>) {
        for entry in &mut self.points {
            entry.position = position_of(entry.id);
        }
    }

    /// Refresh every curve polyline from its id, preserving structure.
    pub fn update_curves(&mut self, polyline_of: impl Fn(usize) -> Vec<Point3<f64>>) {
        for entry in &mut self.curves {
            entry.polyline = polyline_of(entry.id);
        }
    }

    /// Find the in-tolerance point nearest along the ray.
    ///
    /// `within` is given the candidate position and the ray point closest to
    /// it.
    pub fn find_nearest_point_to_ray(
        &self,
        ray: &Ray3,
        within: impl Fn(&Point3<f64>, &Point3<f64>) -> bool,
    ) -> Option<NearestPoint> {
        let mut best: Option<(NearestPoint, f64)> = None;
        for entry in &self.points {
            let ray_t = ray.project(&entry.position);
            let ray_point = ray.point_at(ray_t);
            if !within(&entry.position, &ray_point) {
                continue;
            }
            let distance = (entry.position - ray_point).norm();
            if best
                .as_ref()
                .map_or(true, |(b, d)| ray_t < b.ray_t || (ray_t == b.ray_t && distance < *d))
            {
                best = Some((
                    NearestPoint {
                        id: entry.id,
                        position: entry.position,
                        ray_t,
                    },
                    distance,
                ));
            }
        }
        best.map(|(b, _)| b)
    }

    /// Collect all in-tolerance points, sorted by ray parameter.
    pub fn collect_points_near_ray(
        &self,
        ray: &Ray3,
        within: impl Fn(&Point3<f64>, &Point3<f64>) -> bool,
    ) -> Vec<NearestPoint> {
        let mut results = Vec::new();
        for entry in &self.points {
            let ray_t = ray.project(&entry.position);
            let ray_point = ray.point_at(ray_t);
            if within(&entry.position, &ray_point) {
                let distance = (entry.position - ray_point).norm();
                results.push((
                    NearestPoint {
                        id: entry.id,
                        position: entry.position,
                        ray_t,
                    },
                    distance,
                ));
            }
        }
        results.sort_by(|(a, ad), (b, bd)| a.ray_t.total_cmp(&b.ray_t).then(ad.total_cmp(bd)));
        results.into_iter().map(|(p, _)| p).collect()
    }

    /// Find the in-tolerance curve point nearest along the ray.
    pub fn find_nearest_curve_to_ray(
        &self,
        ray: &Ray3,
        within: impl Fn(&Point3<f64>, &Point3<f64>) -> bool,
    ) -> Option<NearestCurve> {
        let mut best: Option<(NearestCurve, f64)> = None;
        for entry in &self.curves {
            if let Some((candidate, distance)) = nearest_on_curve(entry, ray, &within) {
                if best.as_ref().map_or(true, |(b, d)| {
                    candidate.ray_t < b.ray_t || (candidate.ray_t == b.ray_t && distance < *d)
                }) {
                    best = Some((candidate, distance));
                }
            }
        }
        best.map(|(b, _)| b)
    }

    /// Collect the nearest in-tolerance point of every matching curve,
    /// sorted by ray parameter.
    pub fn collect_curves_near_ray(
        &self,
        ray: &Ray3,
        within: impl Fn(&Point3<f64>, &Point3<f64>) -> bool,
    ) -> Vec<NearestCurve> {
        let mut results: Vec<(NearestCurve, f64)> = self
            .curves
            .iter()
            .filter_map(|entry| nearest_on_curve(entry, ray, &within))
            .collect();
        results.sort_by(|(a, ad), (b, bd)| a.ray_t.total_cmp(&b.ray_t).then(ad.total_cmp(bd)));
        results.into_iter().map(|(c, _)| c).collect()
    }
}

/// The in-tolerance point of one curve nearest along the ray, with its
/// distance from the ray.
fn nearest_on_curve(
    entry: &CurveEntry,
    ray: &Ray3,
    within: &impl Fn(&Point3<f64>, &Point3<f64>) -> bool,
) -> Option<(NearestCurve, f64)> {
    let mut best: Option<(NearestCurve, f64)> = None;
    for (segment, w) in entry.polyline.windows(2).enumerate() {
        let (position, ray_t) = closest_point_on_segment_to_ray(&w[0], &w[1], ray);
        let ray_point = ray.point_at(ray_t);
        if !within(&position, &ray_point) {
            continue;
        }
        let distance = (position - ray_point).norm();
        if best
            .as_ref()
            .map_or(true, |(b, d)| ray_t < b.ray_t || (ray_t == b.ray_t && distance < *d))
        {
            best = Some((
                NearestCurve {
                    id: entry.id,
                    position,
                    ray_t,
                    segment,
                },
                distance,
            ));
        }
    }
    best
}

/// Closest point on a segment to a ray.
///
/// Returns the segment point and the ray parameter of the closest ray point.
pub fn closest_point_on_segment_to_ray(
    a: &Point3<f64>,
    b: &Point3<f64>,
    ray: &Ray3,
) -> (Point3<f64>, f64) {
    let u = b - a;
    let v = ray.direction();
    let w0 = a - ray.origin;

    let uu = u.dot(&u);
    let uv = u.dot(&v);
    let ud = u.dot(&w0);
    let vd = v.dot(&w0);

    // Unconstrained minimizer of |w0 + s*u - t*v|^2, then clamp s to the
    // segment and t to the forward ray, re-projecting once after each clamp.
    let denom = uu - uv * uv;
    let mut s = if uu <= f64::EPSILON || denom.abs() <= f64::EPSILON {
        0.0
    } else {
        ((vd * uv - ud) / denom).clamp(0.0, 1.0)
    };

    let mut t = (vd + s * uv).max(0.0);
    if uu > f64::EPSILON {
        s = ((t * uv - ud) / uu).clamp(0.0, 1.0);
        t = (vd + s * uv).max(0.0);
    }

    (a + u * s, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn within_tolerance(tol: f64) -> impl Fn(&Point3<f64>, &Point3<f64>) -> bool {
        move |a, b| (a - b).norm() <= tol
    }

    #[test]
    fn test_segment_ray_crossing() {
        // Segment along x at z=0, ray straight down through (0.25, 0, 1)
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let ray = Ray3::new(Point3::new(0.25, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0));

        let (p, t) = closest_point_on_segment_to_ray(&a, &b, &ray);
        assert!((p - Point3::new(0.25, 0.0, 0.0)).norm() < 1e-12);
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_ray_clamps_to_endpoint() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        // Ray passes beyond the b endpoint
        let ray = Ray3::new(Point3::new(3.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0));

        let (p, _) = closest_point_on_segment_to_ray(&a, &b, &ray);
        assert!((p - b).norm() < 1e-12);
    }

    #[test]
    fn test_segment_behind_ray_clamps_to_origin() {
        let a = Point3::new(0.0, 0.0, -2.0);
        let b = Point3::new(1.0, 0.0, -2.0);
        // Ray points away from the segment
        let ray = Ray3::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));

        let (_, t) = closest_point_on_segment_to_ray(&a, &b, &ray);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_nearest_point_prefers_smaller_ray_t() {
        let mut set = GeometrySet::new();
        set.add_point(0, Point3::new(0.0, 0.0, 5.0));
        set.add_point(1, Point3::new(0.0, 0.0, 2.0));

        let ray = Ray3::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        let hit = set
            .find_nearest_point_to_ray(&ray, within_tolerance(0.1))
            .unwrap();
        assert_eq!(hit.id, 1);
        assert!((hit.ray_t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_collect_points_sorted() {
        let mut set = GeometrySet::new();
        set.add_point(0, Point3::new(0.0, 0.0, 5.0));
        set.add_point(1, Point3::new(0.0, 0.0, 2.0));
        set.add_point(2, Point3::new(3.0, 0.0, 2.0)); // out of tolerance

        let ray = Ray3::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        let hits = set.collect_points_near_ray(&ray, within_tolerance(0.1));
        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn test_equal_depth_tie_falls_to_closer_curve() {
        // Two curves at the same z (same ray parameter), one much closer to
        // the ray line; the closer one must win regardless of insertion order
        let mut set = GeometrySet::new();
        set.add_curve(
            0,
            vec![Point3::new(0.2, -1.0, 0.0), Point3::new(0.2, 1.0, 0.0)],
        );
        set.add_curve(
            1,
            vec![Point3::new(0.05, -1.0, 0.0), Point3::new(0.05, 1.0, 0.0)],
        );

        let ray = Ray3::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = set
            .find_nearest_curve_to_ray(&ray, within_tolerance(0.3))
            .unwrap();
        assert_eq!(hit.id, 1);
    }

    #[test]
    fn test_nearest_curve_reports_segment() {
        let mut set = GeometrySet::new();
        set.add_curve(
            4,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
        );

        let ray = Ray3::new(Point3::new(1.5, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = set
            .find_nearest_curve_to_ray(&ray, within_tolerance(0.1))
            .unwrap();
        assert_eq!(hit.id, 4);
        assert_eq!(hit.segment, 1);
        assert!((hit.position - Point3::new(1.5, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_update_points_refreshes_positions() {
        let mut set = GeometrySet::new();
        set.add_point(0, Point3::new(0.0, 0.0, 1.0));
        set.add_point(1, Point3::new(0.0, 0.0, 2.0));

        set.update_points(|id| Point3::new(0.0, 0.0, 10.0 + id as f64));

        let ray = Ray3::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        let hit = set
            .find_nearest_point_to_ray(&ray, within_tolerance(0.1))
            .unwrap();
        assert_eq!(hit.id, 0);
        assert!((hit.ray_t - 10.0).abs() < 1e-12);
    }
}
