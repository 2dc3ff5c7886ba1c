//! The acorn silhouette revolved by the lathe.

use cgmath::Vector2;

/// Half outline as drawn: x grows towards the axis, y from stem to tip.
const ACORN_OUTLINE: [[f32; 2]; 28] = [
    [2.5, 0.0], // top of stem
    [2.25, 0.5],
    [2.07, 0.75], // bottom of stem
    [1.33, 0.871], // top of head
    [1.0, 1.0],
    [0.63, 1.25],
    [0.40, 1.5],
    [0.19, 1.75],
    [0.09, 2.0],
    [0.0, 2.25],
    [0.07, 2.75],
    [0.9, 2.89],
    [0.16, 2.89], // bottom of head
    [0.30, 3.09], // top of body
    [0.31, 3.25],
    [0.28, 3.50],
    [0.28, 3.75],
    [0.34, 4.0],
    [0.39, 4.24],
    [0.48, 4.5],
    [0.61, 4.75],
    [0.75, 5.0],
    [1.01, 5.23],
    [1.38, 5.49],
    [1.7, 5.64],
    [2.13, 5.75], // bottom of body
    [2.32, 5.91],
    [2.5, 6.05], // bottom of tip
];

/// Distance between the outline's x origin and the lathe axis.
const MIRROR_X: f32 = 2.5;

/// Lathe profile: (radius, height) pairs from stem to tip.
pub fn acorn_profile() -> Vec<Vector2<f32>> {
    ACORN_OUTLINE
        .iter()
        .map(|&[x, y]| Vector2::new(MIRROR_X - x, y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_climbs_from_stem_to_tip() {
        let profile = acorn_profile();
        assert_eq!(profile.len(), 28);
        assert!(profile.windows(2).all(|pair| pair[0].y <= pair[1].y));
    }

    #[test]
    fn stem_and_tip_sit_on_the_axis() {
        let profile = acorn_profile();
        assert_eq!(profile[0], Vector2::new(0.0, 0.0));
        assert!(profile[27].x.abs() < 1e-6);
        assert!(profile.iter().all(|point| point.x >= 0.0));
    }
}
