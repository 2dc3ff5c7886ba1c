//! Surfaces of revolution

use std::f32::consts::PI;

use cgmath::Vector2;

use super::GeometryData;

/// Revolves `profile` (x = radius, y = height) a full turn around the Z axis,
/// with height running along +Z.
///
/// Produces `segments + 1` rings of `profile.len()` vertices; the first and
/// last ring coincide so the texture seam has its own vertices. Normals are
/// smoothed across neighbouring faces.
pub fn generate_lathe(profile: &[Vector2<f32>], segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segments = segments.max(3);
    let points = profile.len() as u32;

    if points < 2 {
        return data;
    }

    for i in 0..=segments {
        let phi = i as f32 / segments as f32 * 2.0 * PI;
        let (sin, cos) = phi.sin_cos();

        for (j, point) in profile.iter().enumerate() {
            data.vertices.push([point.x * cos, point.x * sin, point.y]);
            data.tex_coords.push([
                i as f32 / segments as f32,
                1.0 - j as f32 / (points - 1) as f32,
            ]);
        }
    }

    for i in 0..segments {
        for j in 0..points - 1 {
            let a = j + i * points;
            let b = a + points;
            let c = a + points + 1;
            let d = a + 1;

            data.indices.extend_from_slice(&[a, b, d, c, d, b]);
        }
    }

    data.compute_vertex_normals();
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn cylinder_profile() -> Vec<Vector2<f32>> {
        vec![Vector2::new(1.0, 0.0), Vector2::new(1.0, 1.0), Vector2::new(1.0, 2.0)]
    }

    #[test]
    fn test_lathe_generation() {
        let lathe = generate_lathe(&cylinder_profile(), 40);
        assert_eq!(lathe.vertex_count(), 41 * 3);
        assert_eq!(lathe.triangle_count(), 40 * 2 * 2);
        assert!(lathe.is_valid());
    }

    #[test]
    fn vertices_keep_profile_radius_and_height() {
        let lathe = generate_lathe(&cylinder_profile(), 16);
        for (k, vertex) in lathe.vertices.iter().enumerate() {
            let radius = (vertex[0] * vertex[0] + vertex[1] * vertex[1]).sqrt();
            assert!((radius - 1.0).abs() < 1e-5);
            assert_eq!(vertex[2], (k % 3) as f32);
        }
    }

    #[test]
    fn surface_faces_away_from_axis() {
        let lathe = generate_lathe(&cylinder_profile(), 12);
        for triangle in lathe.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|i| Vector3::from(lathe.vertices[i as usize]));
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            let radial = Vector3::new(center.x, center.y, 0.0);
            assert!(normal.dot(radial) > 0.0);
        }
        for normal in &lathe.normals {
            assert!(Vector3::from(*normal).z.abs() < 1e-4);
        }
    }

    #[test]
    fn short_profiles_produce_nothing() {
        assert!(generate_lathe(&[Vector2::new(1.0, 0.0)], 8).vertices.is_empty());
    }
}
