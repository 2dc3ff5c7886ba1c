mod common;

use acorn_scene::{
    showcase::{acorn_profile, orbit_step, FrameBudget},
    Showcase, ShowcaseConfig, ShowcaseError,
};
use cgmath::{InnerSpace, Point3, Transform, Vector3};
use rand::Rng;
use winit::event::MouseScrollDelta;

use common::{test_assets, RecordingRenderer};

fn compose() -> Showcase {
    Showcase::compose(&ShowcaseConfig::default(), &test_assets(), (1200, 800))
        .expect("scene should compose")
}

#[test]
fn scene_holds_every_node_in_order() {
    let showcase = compose();
    assert_eq!(
        showcase.scene.node_names(),
        vec!["light", "floor", "cube", "acorn", "text", "axes"]
    );
    assert_eq!(showcase.scene.find("acorn"), Some(showcase.acorn()));

    for node in &showcase.scene.nodes()[1..] {
        let geometry = node.geometry().expect("drawable node has geometry");
        assert!(geometry.vertex_count() > 0, "{} is empty", node.name);
        assert!(!node.materials().is_empty(), "{} has no material", node.name);
    }
}

#[test]
fn camera_starts_at_its_final_position() {
    let showcase = compose();
    let p = showcase.camera.position;
    assert!((p - Vector3::new(0.0, 60.0, 50.0)).magnitude() < 1e-5);
}

#[test]
fn text_geometry_is_not_empty() {
    let showcase = compose();
    let id = showcase.scene.find("text").expect("text node");
    let node = showcase.scene.get(id).expect("text node");
    let geometry = node.geometry().expect("text mesh");
    assert!(geometry.triangle_count() > 0);
    assert_eq!(node.materials().len(), 2);
}

#[test]
fn viewport_aspect_is_fixed_at_startup() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::default();

    showcase.run_frames(&mut renderer, 20).expect("frames");

    assert!((showcase.camera.aspect - 1.5).abs() < 1e-6);
}

#[test]
fn first_frame_orbits_from_the_final_position() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::default();
    let mut budget = FrameBudget::new(1);

    showcase.frame(&mut renderer, &mut budget).expect("frame");

    let theta = 0.01f32;
    let expected = Vector3::new(
        50.0 * theta.sin(),
        60.0 * theta.cos() + 50.0 * theta.sin(),
        50.0 * theta.cos(),
    );
    let rendered = renderer.frames[0].camera_position;
    assert!((rendered - expected).magnitude() < 1e-4);
    // Without input the controls leave the camera where the orbit put it.
    assert!((showcase.camera.position - expected).magnitude() < 1e-4);
    assert_eq!(budget.completed(), 1);
}

#[test]
fn acorn_spins_a_fixed_step_per_frame() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::default();

    let frames = showcase.run_frames(&mut renderer, 50).expect("frames");

    assert_eq!(frames, 50);
    assert_eq!(renderer.frames.len(), 50);
    for (i, record) in renderer.frames.iter().enumerate() {
        let expected = -0.02 * (i + 1) as f32;
        assert!((record.acorn_spin - expected).abs() < 1e-4);
    }
}

/// Stem and tip of the acorn in world space.
fn acorn_ends(showcase: &Showcase) -> (Point3<f32>, Point3<f32>) {
    let node = showcase.scene.get(showcase.acorn()).expect("acorn node");
    let model = node.transform.matrix();
    let profile = acorn_profile();
    let height = |i: usize| Point3::new(0.0, 0.0, profile[i].y);
    (
        model.transform_point(height(0)),
        model.transform_point(height(profile.len() - 1)),
    )
}

#[test]
fn acorn_hangs_stem_up() {
    let showcase = compose();
    let (stem, tip) = acorn_ends(&showcase);
    assert!((stem - Point3::new(0.0, 40.0, 0.0)).magnitude() < 1e-4);
    assert!(stem.y - tip.y > 25.0);
}

#[test]
fn acorn_spins_about_its_own_axis() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::default();
    let (stem, tip) = acorn_ends(&showcase);
    let axis = (tip - stem).normalize();

    for _ in 0..4 {
        showcase.run_frames(&mut renderer, 39).expect("frames");
        let (stem_now, tip_now) = acorn_ends(&showcase);
        assert!((stem_now - stem).magnitude() < 1e-3);
        assert!(((tip_now - stem_now).normalize() - axis).magnitude() < 1e-4);
    }
}

#[test]
fn orbit_keeps_the_horizontal_radius() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let mut p = Vector3::new(
            rng.random_range(-100.0f32..100.0),
            rng.random_range(-100.0f32..100.0),
            rng.random_range(-100.0f32..100.0),
        );
        let radius = p.x * p.x + p.z * p.z;
        for _ in 0..628 {
            p = orbit_step(p, 0.01);
        }
        let after = p.x * p.x + p.z * p.z;
        assert!((after - radius).abs() <= radius * 1e-3 + 1e-3);
    }
}

#[test]
fn camera_climbs_while_in_front() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::default();

    showcase.run_frames(&mut renderer, 100).expect("frames");

    let heights: Vec<f32> = renderer
        .frames
        .iter()
        .map(|record| record.camera_position.y)
        .collect();
    assert!(heights[0] > 60.0);
    assert!(heights.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn failed_render_stops_scheduling() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::failing_at(0);
    let mut budget = FrameBudget::new(10);

    let result = showcase.frame(&mut renderer, &mut budget);

    assert!(matches!(result, Err(ShowcaseError::Overlay(_))));
    assert_eq!(budget.completed(), 0);
}

#[test]
fn budget_counts_only_frames_that_completed() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::failing_at(2);
    let mut budget = FrameBudget::new(5);

    let results: Vec<bool> = (0..3)
        .map(|_| showcase.frame(&mut renderer, &mut budget).is_ok())
        .collect();

    assert_eq!(results, [true, true, false]);
    assert_eq!(budget.completed(), 2);
    assert!(!budget.exhausted());
}

#[test]
fn run_frames_reports_completed_frames() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::default();

    assert_eq!(showcase.run_frames(&mut renderer, 4).expect("frames"), 4);
    assert_eq!(renderer.frames.len(), 4);
}

#[test]
fn run_frames_stops_at_the_first_error() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::failing_at(3);

    assert!(showcase.run_frames(&mut renderer, 10).is_err());
    assert_eq!(renderer.frames.len(), 3);
}

#[test]
fn wheel_input_zooms_towards_the_target() {
    let mut showcase = compose();
    let mut renderer = RecordingRenderer::default();
    let orbited = orbit_step(showcase.camera.position, 0.01);

    showcase.controls.wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
    showcase
        .frame(&mut renderer, &mut FrameBudget::new(1))
        .expect("frame");

    assert!(showcase.camera.position.magnitude() < orbited.magnitude());
}
