//! Extruded 3D text
//!
//! Glyph outlines come from a [`GlyphSource`] as flattened contours in a y-up
//! plane. Contours are laid out along +X, grouped into outlines with holes,
//! triangulated into front and back caps and joined by side walls spanning
//! `0..depth` along +Z. With `bend` enabled the whole line is warped along an
//! arch before extrusion.

use cgmath::{InnerSpace, Vector2};

use super::{
    triangulate::{contains_point, signed_area, triangulate},
    GeometryData,
};

/// Height of the arch control point used when bending text.
const BEND_HEIGHT: f32 = 120.0;

/// Flattened outline of a single glyph at a given size.
#[derive(Debug, Clone, Default)]
pub struct GlyphOutline {
    /// Closed contours, y-up, origin at the pen position on the baseline.
    pub contours: Vec<Vec<Vector2<f32>>>,
    /// Horizontal distance to the next pen position.
    pub advance: f32,
}

/// Supplies glyph outlines, usually backed by a font file.
pub trait GlyphSource {
    /// Outline of `ch` scaled to `size` units, curves split into
    /// `curve_segments` straight pieces.
    fn glyph(&self, ch: char, size: f32, curve_segments: u32) -> GlyphOutline;

    /// Extra advance between two adjacent characters.
    fn kerning(&self, _left: char, _right: char, _size: f32) -> f32 {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOptions {
    pub size: f32,
    /// Extrusion depth along +Z.
    pub depth: f32,
    pub curve_segments: u32,
    /// Warp the line along an arch spanning the text width.
    pub bend: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 100.0,
            depth: 50.0,
            curve_segments: 4,
            bend: false,
        }
    }
}

/// One filled region: a counter-clockwise outline and its clockwise holes.
#[derive(Debug, Clone)]
struct Outline {
    outer: Vec<Vector2<f32>>,
    holes: Vec<Vec<Vector2<f32>>>,
}

pub fn generate_text(text: &str, glyphs: &dyn GlyphSource, options: &TextOptions) -> GeometryData {
    let mut outlines = Vec::new();
    let mut pen_x = 0.0;
    let mut previous = None;

    for ch in text.chars() {
        if let Some(left) = previous {
            pen_x += glyphs.kerning(left, ch, options.size);
        }

        let glyph = glyphs.glyph(ch, options.size, options.curve_segments);
        let contours = glyph
            .contours
            .into_iter()
            .filter_map(clean_contour)
            .map(|contour| {
                contour
                    .into_iter()
                    .map(|p| Vector2::new(p.x + pen_x, p.y))
                    .collect()
            })
            .collect();
        outlines.extend(group_contours(contours));

        pen_x += glyph.advance;
        previous = Some(ch);
    }

    let bend_width = outlines
        .iter()
        .flat_map(|outline| outline.outer.iter())
        .map(|p| p.x)
        .fold(0.0_f32, f32::max);
    let warp = |p: Vector2<f32>| {
        if options.bend && bend_width > 0.0 {
            bend_point(p, bend_width)
        } else {
            p
        }
    };

    let mut data = GeometryData::new();
    for outline in &outlines {
        extrude_outline(&mut data, outline, options.depth, &warp);
    }
    data
}

/// Drops repeated points and the closing duplicate; rejects degenerate contours.
fn clean_contour(contour: Vec<Vector2<f32>>) -> Option<Vec<Vector2<f32>>> {
    let mut cleaned: Vec<Vector2<f32>> = Vec::with_capacity(contour.len());
    for point in contour {
        if cleaned.last().map_or(true, |last| (*last - point).magnitude2() > 1e-12) {
            cleaned.push(point);
        }
    }
    while cleaned.len() > 1 && (cleaned[0] - cleaned[cleaned.len() - 1]).magnitude2() <= 1e-12 {
        cleaned.pop();
    }

    (cleaned.len() >= 3 && signed_area(&cleaned).abs() > 1e-9).then_some(cleaned)
}

/// Nesting depth decides the role: even depth fills, odd depth cuts a hole
/// into the smallest fill around it.
fn group_contours(contours: Vec<Vec<Vector2<f32>>>) -> Vec<Outline> {
    let depths: Vec<usize> = contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            contours
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && contains_point(other, contour[0]))
                .count()
        })
        .collect();

    let mut outlines = Vec::new();
    let mut outline_of = vec![None; contours.len()];
    for (i, contour) in contours.iter().enumerate() {
        if depths[i] % 2 == 0 {
            let mut outer = contour.clone();
            if signed_area(&outer) < 0.0 {
                outer.reverse();
            }
            outline_of[i] = Some(outlines.len());
            outlines.push(Outline {
                outer,
                holes: Vec::new(),
            });
        }
    }

    for (i, contour) in contours.iter().enumerate() {
        if depths[i] % 2 == 0 {
            continue;
        }
        let parent = (0..contours.len())
            .filter(|&j| depths[j] + 1 == depths[i] && contains_point(&contours[j], contour[0]))
            .min_by(|&a, &b| {
                signed_area(&contours[a])
                    .abs()
                    .total_cmp(&signed_area(&contours[b]).abs())
            })
            .and_then(|j| outline_of[j]);

        if let Some(parent) = parent {
            let mut hole = contour.clone();
            if signed_area(&hole) > 0.0 {
                hole.reverse();
            }
            outlines[parent].holes.push(hole);
        }
    }

    outlines
}

/// Moves `p` onto the arch (0,0) -> (w/2, BEND_HEIGHT) -> (w,0), offset along
/// the arch normal by its original height.
fn bend_point(p: Vector2<f32>, width: f32) -> Vector2<f32> {
    let t = p.x / width;
    let p0 = Vector2::new(0.0, 0.0);
    let p1 = Vector2::new(width / 2.0, BEND_HEIGHT);
    let p2 = Vector2::new(width, 0.0);

    let on_curve = p0 * ((1.0 - t) * (1.0 - t)) + p1 * (2.0 * (1.0 - t) * t) + p2 * (t * t);
    let tangent = ((p1 - p0) * (2.0 * (1.0 - t)) + (p2 - p1) * (2.0 * t)).normalize();
    let normal = Vector2::new(-tangent.y, tangent.x);

    on_curve + normal * p.y
}

fn extrude_outline(
    data: &mut GeometryData,
    outline: &Outline,
    depth: f32,
    warp: &dyn Fn(Vector2<f32>) -> Vector2<f32>,
) {
    let triangles = triangulate(&outline.outer, &outline.holes);

    let flat: Vec<Vector2<f32>> = outline
        .outer
        .iter()
        .chain(outline.holes.iter().flatten())
        .copied()
        .collect();
    let points: Vec<Vector2<f32>> = flat.iter().map(|&p| warp(p)).collect();

    // Front cap at z = depth, back cap at z = 0.
    for (z, normal_z) in [(depth, 1.0), (0.0, -1.0)] {
        let first = data.vertices.len() as u32;
        for p in &points {
            data.vertices.push([p.x, p.y, z]);
            data.normals.push([0.0, 0.0, normal_z]);
            data.tex_coords.push([p.x, p.y]);
        }
        for [a, b, c] in &triangles {
            if normal_z > 0.0 {
                data.indices.extend_from_slice(&[first + a, first + b, first + c]);
            } else {
                data.indices.extend_from_slice(&[first + a, first + c, first + b]);
            }
        }
    }

    let mut offset = 0;
    for contour in std::iter::once(&outline.outer).chain(outline.holes.iter()) {
        let ring = &points[offset..offset + contour.len()];
        offset += contour.len();

        for i in 0..ring.len() {
            let p = ring[i];
            let q = ring[(i + 1) % ring.len()];
            let edge = q - p;
            if edge.magnitude2() == 0.0 {
                continue;
            }
            let normal = Vector2::new(edge.y, -edge.x).normalize();

            let first = data.vertices.len() as u32;
            for (corner, z) in [(p, 0.0), (q, 0.0), (q, depth), (p, depth)] {
                data.vertices.push([corner.x, corner.y, z]);
                data.normals.push([normal.x, normal.y, 0.0]);
            }
            let along = edge.magnitude();
            data.tex_coords
                .extend_from_slice(&[[0.0, 0.0], [along, 0.0], [along, depth], [0.0, depth]]);
            data.indices
                .extend_from_slice(&[first, first + 1, first + 2, first, first + 2, first + 3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    /// Every glyph is a square; 'o' also has a square hole.
    struct SquareGlyphs;

    fn square(min: f32, max: f32) -> Vec<Vector2<f32>> {
        vec![
            Vector2::new(min, min),
            Vector2::new(max, min),
            Vector2::new(max, max),
            Vector2::new(min, max),
        ]
    }

    impl GlyphSource for SquareGlyphs {
        fn glyph(&self, ch: char, size: f32, _curve_segments: u32) -> GlyphOutline {
            let contours = match ch {
                ' ' => Vec::new(),
                'o' => {
                    let mut hole = square(0.25 * size, 0.75 * size);
                    hole.reverse();
                    vec![square(0.0, size), hole]
                }
                _ => vec![square(0.0, size)],
            };
            GlyphOutline {
                contours,
                advance: size * 1.5,
            }
        }

        fn kerning(&self, left: char, right: char, size: f32) -> f32 {
            if left == 'A' && right == 'V' {
                -0.5 * size
            } else {
                0.0
            }
        }
    }

    fn options(bend: bool) -> TextOptions {
        TextOptions {
            size: 2.0,
            depth: 1.0,
            curve_segments: 3,
            bend,
        }
    }

    fn min_x(geometry: &GeometryData) -> f32 {
        geometry.vertices.iter().map(|v| v[0]).fold(f32::INFINITY, f32::min)
    }

    #[test]
    fn single_glyph_is_a_closed_prism() {
        let text = generate_text("x", &SquareGlyphs, &options(false));
        // two caps of 4 vertices, 4 side quads
        assert_eq!(text.vertex_count(), 4 + 4 + 4 * 4);
        assert_eq!(text.triangle_count(), 2 + 2 + 4 * 2);
        assert!(text.is_valid());

        let depths: Vec<f32> = text.vertices.iter().map(|v| v[2]).collect();
        assert!(depths.iter().all(|&z| z == 0.0 || z == 1.0));
    }

    #[test]
    fn triangles_agree_with_normals() {
        let text = generate_text("o", &SquareGlyphs, &options(false));
        assert!(text.is_valid());
        for triangle in text.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|i| Vector3::from(text.vertices[i as usize]));
            let face = (b - a).cross(c - a).normalize();
            let stored = Vector3::from(text.normals[triangle[0] as usize]);
            assert!(face.dot(stored) > 0.99, "{face:?} vs {stored:?}");
        }
    }

    #[test]
    fn holes_stay_open() {
        let text = generate_text("o", &SquareGlyphs, &options(false));
        // the centre of the glyph must not be covered by a front cap triangle
        let center = Vector2::new(1.0, 1.0);
        for triangle in text.indices.chunks_exact(3) {
            let corners: Vec<[f32; 3]> =
                triangle.iter().map(|&i| text.vertices[i as usize]).collect();
            if corners.iter().all(|v| v[2] == 1.0) {
                let ring: Vec<Vector2<f32>> =
                    corners.iter().map(|v| Vector2::new(v[0], v[1])).collect();
                assert!(!contains_point(&ring, center));
            }
        }
    }

    #[test]
    fn glyphs_advance_with_kerning() {
        let plain = generate_text("AB", &SquareGlyphs, &options(false));
        let kerned = generate_text("AV", &SquareGlyphs, &options(false));
        let widest = |g: &GeometryData| g.vertices.iter().map(|v| v[0]).fold(0.0_f32, f32::max);

        assert_eq!(min_x(&plain), 0.0);
        assert_eq!(widest(&plain), 3.0 + 2.0);
        assert_eq!(widest(&kerned), 2.0 + 2.0);
    }

    #[test]
    fn spaces_only_move_the_pen() {
        let text = generate_text(" x", &SquareGlyphs, &options(false));
        assert_eq!(min_x(&text), 3.0);
        assert!(generate_text("   ", &SquareGlyphs, &options(false))
            .vertices
            .is_empty());
    }

    #[test]
    fn bend_raises_the_middle_of_the_line() {
        let flat = generate_text("xxxxx", &SquareGlyphs, &options(false));
        let bent = generate_text("xxxxx", &SquareGlyphs, &options(true));
        assert_eq!(flat.vertex_count(), bent.vertex_count());

        let top = |g: &GeometryData| g.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        assert_eq!(top(&flat), 2.0);
        assert!(top(&bent) > 50.0);

        // the ends of the arch stay on the baseline
        let first = bent.vertices[0];
        assert!(first[0].abs() < 1e-4 && first[1].abs() < 1e-4);
    }
}
