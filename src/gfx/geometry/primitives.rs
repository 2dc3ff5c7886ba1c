//! # Primitive Shape Generation
//!
//! Boxes and line helpers. All shapes are generated with proper normals and
//! texture coordinates.

use super::GeometryData;

/// Generate a box centered at the origin
///
/// Each face is a `segments x segments` grid with its own vertices, so normals
/// stay flat and every face maps the full texture.
pub fn generate_box(
    width: f32,
    height: f32,
    depth: f32,
    width_segments: u32,
    height_segments: u32,
    depth_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let (ws, hs, ds) = (
        width_segments.max(1),
        height_segments.max(1),
        depth_segments.max(1),
    );

    // (u axis, v axis, w axis, u dir, v dir, face width, face height, face depth, grid)
    build_face(&mut data, [2, 1, 0], -1.0, -1.0, [depth, height, width], [ds, hs]); // +x
    build_face(&mut data, [2, 1, 0], 1.0, -1.0, [depth, height, -width], [ds, hs]); // -x
    build_face(&mut data, [0, 2, 1], 1.0, 1.0, [width, depth, height], [ws, ds]); // +y
    build_face(&mut data, [0, 2, 1], 1.0, -1.0, [width, depth, -height], [ws, ds]); // -y
    build_face(&mut data, [0, 1, 2], 1.0, -1.0, [width, height, depth], [ws, hs]); // +z
    build_face(&mut data, [0, 1, 2], -1.0, -1.0, [width, height, -depth], [ws, hs]); // -z

    data
}

fn build_face(
    data: &mut GeometryData,
    axes: [usize; 3],
    u_dir: f32,
    v_dir: f32,
    size: [f32; 3],
    grid: [u32; 2],
) {
    let [u, v, w] = axes;
    let [face_width, face_height, face_depth] = size;
    let [grid_x, grid_y] = grid;

    let segment_width = face_width / grid_x as f32;
    let segment_height = face_height / grid_y as f32;
    let depth_half = face_depth / 2.0;
    let first = data.vertices.len() as u32;

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - face_height / 2.0;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - face_width / 2.0;

            let mut position = [0.0; 3];
            position[u] = x * u_dir;
            position[v] = y * v_dir;
            position[w] = depth_half;

            let mut normal = [0.0; 3];
            normal[w] = if face_depth > 0.0 { 1.0 } else { -1.0 };

            data.vertices.push(position);
            data.normals.push(normal);
            data.tex_coords
                .push([ix as f32 / grid_x as f32, iy as f32 / grid_y as f32]);
        }
    }

    let row = grid_x + 1;
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = first + ix + row * iy;
            let b = first + ix + row * (iy + 1);
            let c = first + (ix + 1) + row * (iy + 1);
            let d = first + (ix + 1) + row * iy;

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

const AXIS_COLORS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
const DASH_SIZE: f32 = 3.0;
const GAP_SIZE: f32 = 3.0;

/// Line segments along each axis: solid on the positive half, dashed on the
/// negative half, coloured red (X), green (Y) and blue (Z) through vertex colours.
pub fn generate_axes(length: f32) -> GeometryData {
    let mut data = GeometryData::new();

    for (axis, color) in AXIS_COLORS.iter().enumerate() {
        let mut point = |distance: f32| {
            let mut position = [0.0; 3];
            position[axis] = distance;
            data.vertices.push(position);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([0.0, 0.0]);
            data.colors.push(*color);
            data.indices.push(data.vertices.len() as u32 - 1);
        };

        point(0.0);
        point(length);

        let mut start = 0.0;
        while start < length {
            let end = (start + DASH_SIZE).min(length);
            point(-start);
            point(-end);
            start += DASH_SIZE + GAP_SIZE;
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0, 1, 1, 1);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.is_valid());
    }

    #[test]
    fn test_subdivided_box() {
        let cube = generate_box(500.0, 500.0, 500.0, 32, 32, 32);
        assert_eq!(cube.vertex_count(), 6 * 33 * 33);
        assert_eq!(cube.triangle_count(), 6 * 32 * 32 * 2);
        for vertex in &cube.vertices {
            assert!(vertex.iter().all(|c| c.abs() <= 250.0 + 1e-3));
        }
    }

    #[test]
    fn box_triangles_face_outward() {
        let slab = generate_box(100.0, 100.0, 5.0, 1, 1, 1);
        for triangle in slab.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|i| Vector3::from(slab.vertices[i as usize]));
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(normal.dot(center) > 0.0);
            assert!(
                normal
                    .normalize()
                    .dot(Vector3::from(slab.normals[triangle[0] as usize]))
                    > 0.99
            );
        }
    }

    #[test]
    fn test_axes_generation() {
        let axes = generate_axes(12.0);
        // per axis: one solid segment plus dashes at 0, 6
        assert_eq!(axes.indices.len(), 3 * (2 + 2 * 2));
        assert_eq!(axes.colors.len(), axes.vertices.len());
        assert_eq!(axes.vertices[1], [12.0, 0.0, 0.0]);
        assert_eq!(axes.colors[0], [1.0, 0.0, 0.0]);
        assert!(axes.is_valid());
    }
}
