//! Polygon triangulation by ear clipping
//!
//! Holes are first bridged into the outer ring with a pair of coincident edges,
//! which turns the shape into a single (weakly simple) polygon that ear
//! clipping can consume.

use cgmath::Vector2;

const EPSILON: f32 = 1e-9;

/// Twice the signed area of a closed ring; positive for counter-clockwise.
pub fn signed_area(ring: &[Vector2<f32>]) -> f32 {
    let mut area = 0.0;
    for i in 0..ring.len() {
        let p = ring[i];
        let q = ring[(i + 1) % ring.len()];
        area += p.x * q.y - q.x * p.y;
    }
    area
}

/// Even-odd point in polygon test.
pub fn contains_point(ring: &[Vector2<f32>], point: Vector2<f32>) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Triangulates a counter-clockwise `outer` ring with clockwise `holes`.
///
/// Returned indices address the concatenation of `outer` followed by each
/// hole in order. Triangles wind counter-clockwise.
pub fn triangulate(outer: &[Vector2<f32>], holes: &[Vec<Vector2<f32>>]) -> Vec<[u32; 3]> {
    let mut points: Vec<Vector2<f32>> = outer.to_vec();
    let mut ring: Vec<u32> = (0..outer.len() as u32).collect();

    let mut hole_rings = Vec::with_capacity(holes.len());
    for hole in holes {
        let first = points.len() as u32;
        points.extend_from_slice(hole);
        hole_rings.push((first..first + hole.len() as u32).collect::<Vec<u32>>());
    }

    // Rightmost holes first so later bridges never cross earlier ones.
    hole_rings.retain(|hole| hole.len() >= 3);
    hole_rings.sort_by(|a, b| {
        let ax = max_x(&points, a);
        let bx = max_x(&points, b);
        bx.total_cmp(&ax)
    });
    for hole in hole_rings {
        bridge_hole(&points, &mut ring, &hole);
    }

    clip_ears(&points, ring)
}

fn max_x(points: &[Vector2<f32>], ring: &[u32]) -> f32 {
    ring.iter()
        .map(|&i| points[i as usize].x)
        .fold(f32::NEG_INFINITY, f32::max)
}

fn cross(o: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn in_triangle(p: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>, c: Vector2<f32>) -> bool {
    cross(a, b, p) >= -EPSILON && cross(b, c, p) >= -EPSILON && cross(c, a, p) >= -EPSILON
}

/// Splices `hole` into `ring` through a vertex visible from the hole's
/// rightmost point.
fn bridge_hole(points: &[Vector2<f32>], ring: &mut Vec<u32>, hole: &[u32]) {
    let Some(start) = (0..hole.len()).max_by(|&a, &b| {
        points[hole[a] as usize]
            .x
            .total_cmp(&points[hole[b] as usize].x)
    }) else {
        return;
    };
    let m = points[hole[start] as usize];

    // Closest ring edge hit by a ray from m towards +x.
    let mut hit: Option<(f32, usize)> = None;
    for i in 0..ring.len() {
        let a = points[ring[i] as usize];
        let b = points[ring[(i + 1) % ring.len()] as usize];
        if (a.y > m.y) == (b.y > m.y) || (a.y - b.y).abs() < EPSILON {
            continue;
        }
        let x = a.x + (m.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if x >= m.x && hit.map_or(true, |(best, _)| x < best) {
            let candidate = if a.x > b.x { i } else { (i + 1) % ring.len() };
            hit = Some((x, candidate));
        }
    }

    let Some((hit_x, mut visible)) = hit else {
        // Hole outside the ring; nothing sensible to connect to.
        return;
    };

    // A reflex vertex inside (m, hit, candidate) would block the bridge; take the
    // one closest in angle to the ray instead.
    let intersection = Vector2::new(hit_x, m.y);
    let candidate = points[ring[visible] as usize];
    let mut best_tan = f32::INFINITY;
    for (i, &index) in ring.iter().enumerate() {
        let p = points[index as usize];
        if i == visible || p.x < m.x || p == candidate {
            continue;
        }
        let inside = if candidate.y > m.y {
            in_triangle(p, m, intersection, candidate)
        } else {
            in_triangle(p, m, candidate, intersection)
        };
        if inside {
            let tan = (p.y - m.y).abs() / (p.x - m.x).max(EPSILON);
            if tan < best_tan {
                best_tan = tan;
                visible = i;
            }
        }
    }

    // Earlier bridges duplicate vertices; attach to the copy whose wedge faces m.
    let target = points[ring[visible] as usize];
    if let Some(copy) = (0..ring.len())
        .filter(|&i| points[ring[i] as usize] == target)
        .find(|&i| locally_inside(points, ring, i, m))
    {
        visible = copy;
    }

    let mut bridged = Vec::with_capacity(ring.len() + hole.len() + 2);
    bridged.extend_from_slice(&ring[..=visible]);
    for k in 0..=hole.len() {
        bridged.push(hole[(start + k) % hole.len()]);
    }
    bridged.push(ring[visible]);
    bridged.extend_from_slice(&ring[visible + 1..]);
    *ring = bridged;
}

fn locally_inside(points: &[Vector2<f32>], ring: &[u32], i: usize, m: Vector2<f32>) -> bool {
    let n = ring.len();
    let prev = points[ring[(i + n - 1) % n] as usize];
    let vertex = points[ring[i] as usize];
    let next = points[ring[(i + 1) % n] as usize];

    if cross(prev, vertex, next) >= 0.0 {
        cross(prev, vertex, m) >= 0.0 && cross(vertex, next, m) >= 0.0
    } else {
        cross(prev, vertex, m) >= 0.0 || cross(vertex, next, m) >= 0.0
    }
}

fn clip_ears(points: &[Vector2<f32>], mut ring: Vec<u32>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let point = |i: u32| points[i as usize];

    while ring.len() > 3 {
        let n = ring.len();
        let mut ear = None;

        for i in 0..n {
            let (a, b, c) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
            let (pa, pb, pc) = (point(a), point(b), point(c));
            if cross(pa, pb, pc) <= EPSILON {
                continue;
            }
            let blocked = ring.iter().any(|&other| {
                let p = point(other);
                p != pa && p != pb && p != pc && in_triangle(p, pa, pb, pc)
            });
            if !blocked {
                ear = Some(i);
                break;
            }
        }

        // Degenerate input: drop the flattest vertex so the loop always shrinks.
        let i = ear.unwrap_or_else(|| {
            (0..n)
                .min_by(|&x, &y| {
                    let area = |i: usize| {
                        cross(
                            point(ring[(i + n - 1) % n]),
                            point(ring[i]),
                            point(ring[(i + 1) % n]),
                        )
                        .abs()
                    };
                    area(x).total_cmp(&area(y))
                })
                .unwrap_or(0)
        });

        let (a, b, c) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
        if ear.is_some() {
            triangles.push([a, b, c]);
        }
        ring.remove(i);
    }

    if ring.len() == 3 && cross(point(ring[0]), point(ring[1]), point(ring[2])) > EPSILON {
        triangles.push([ring[0], ring[1], ring[2]]);
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f32, offset: f32) -> Vec<Vector2<f32>> {
        vec![
            Vector2::new(offset, offset),
            Vector2::new(offset + size, offset),
            Vector2::new(offset + size, offset + size),
            Vector2::new(offset, offset + size),
        ]
    }

    fn covered_area(points: &[Vector2<f32>], triangles: &[[u32; 3]]) -> f32 {
        triangles
            .iter()
            .map(|t| cross(points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]) / 2.0)
            .sum()
    }

    #[test]
    fn square_splits_into_two_triangles() {
        let outer = square(2.0, 0.0);
        let triangles = triangulate(&outer, &[]);
        assert_eq!(triangles.len(), 2);
        assert!((covered_area(&outer, &triangles) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn concave_polygon_keeps_its_area() {
        // L shape, area 3
        let outer = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(2.0, 1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(1.0, 2.0),
            Vector2::new(0.0, 2.0),
        ];
        let triangles = triangulate(&outer, &[]);
        assert_eq!(triangles.len(), 4);
        assert!((covered_area(&outer, &triangles) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn holes_are_left_uncovered() {
        let outer = square(4.0, 0.0);
        let mut hole = square(2.0, 1.0);
        hole.reverse();

        let triangles = triangulate(&outer, &[hole.clone()]);
        let mut points = outer.clone();
        points.extend_from_slice(&hole);

        assert!((covered_area(&points, &triangles) - 12.0).abs() < 1e-4);
        for t in &triangles {
            let center = (points[t[0] as usize] + points[t[1] as usize] + points[t[2] as usize]) / 3.0;
            assert!(!contains_point(&hole, center));
        }
    }

    #[test]
    fn stacked_holes_share_a_bridge_vertex() {
        // Outline of a "B": both holes have their rightmost points at x = 3.
        let outer = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(4.0, 0.0),
            Vector2::new(4.0, 7.0),
            Vector2::new(0.0, 7.0),
        ];
        let lower = vec![
            Vector2::new(1.0, 1.0),
            Vector2::new(1.0, 3.0),
            Vector2::new(3.0, 3.0),
            Vector2::new(3.0, 1.0),
        ];
        let upper = vec![
            Vector2::new(1.0, 4.0),
            Vector2::new(1.0, 6.0),
            Vector2::new(3.0, 6.0),
            Vector2::new(3.0, 4.0),
        ];

        let triangles = triangulate(&outer, &[lower.clone(), upper.clone()]);
        let mut points = outer.clone();
        points.extend_from_slice(&lower);
        points.extend_from_slice(&upper);

        assert!((covered_area(&points, &triangles) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn orientation_helpers() {
        let ring = square(1.0, 0.0);
        assert!(signed_area(&ring) > 0.0);
        assert!(contains_point(&ring, Vector2::new(0.5, 0.5)));
        assert!(!contains_point(&ring, Vector2::new(1.5, 0.5)));
    }
}
