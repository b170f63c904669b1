//! 2D convex hull used to restrict interaction surfaces to supported regions

const EPS: f64 = 1e-9;

/// Convex hull of a set of 2D points, vertices in counter-clockwise order.
///
/// Degenerate inputs (a single distinct point, or all points collinear)
/// reduce the hull to a point or a segment; containment then becomes
/// coincidence or on-segment membership. All boundary tests are inclusive.
#[derive(Debug, Clone)]
pub struct ConvexHull {
    vertices: Vec<(f64, f64)>,
}

fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

impl ConvexHull {
    /// Build the hull via the monotone chain algorithm.
    /// Returns `None` when no finite points are given.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let mut pts: Vec<(f64, f64)> = points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        if pts.is_empty() {
            return None;
        }
        pts.sort_by(|a, b| {
            a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
        });
        pts.dedup();

        if pts.len() <= 2 {
            return Some(Self { vertices: pts });
        }

        let mut lower: Vec<(f64, f64)> = Vec::new();
        for &p in &pts {
            while lower.len() >= 2
                && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
            {
                lower.pop();
            }
            lower.push(p);
        }

        let mut upper: Vec<(f64, f64)> = Vec::new();
        for &p in pts.iter().rev() {
            while upper.len() >= 2
                && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
            {
                upper.pop();
            }
            upper.push(p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);
        Some(Self { vertices: lower })
    }

    /// Hull vertices in counter-clockwise order
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Whether the point lies inside the hull; boundary points count as inside
    pub fn contains(&self, point: (f64, f64)) -> bool {
        match self.vertices.len() {
            0 => false,
            1 => {
                let v = self.vertices[0];
                (point.0 - v.0).abs() <= EPS && (point.1 - v.1).abs() <= EPS
            }
            2 => on_segment(self.vertices[0], self.vertices[1], point),
            n => {
                for i in 0..n {
                    let a = self.vertices[i];
                    let b = self.vertices[(i + 1) % n];
                    if cross(a, b, point) < -EPS {
                        return false;
                    }
                }
                true
            }
        }
    }
}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    if cross(a, b, p).abs() > EPS {
        return false;
    }
    let (min_x, max_x) = (a.0.min(b.0), a.0.max(b.0));
    let (min_y, max_y) = (a.1.min(b.1), a.1.max(b.1));
    p.0 >= min_x - EPS && p.0 <= max_x + EPS && p.1 >= min_y - EPS && p.1 <= max_y + EPS
}
