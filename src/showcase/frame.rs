//! Per-frame animation and the seams to the host loop

use cgmath::{Vector3, Zero};

use crate::{
    error::Result,
    gfx::{camera::PerspectiveCamera, scene::Scene},
    performance::PerformanceMonitor,
};

use super::Showcase;

/// Draws one frame. Implemented by the GPU renderer and by test doubles.
pub trait FrameRenderer {
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        stats: &mut PerformanceMonitor,
    ) -> Result<()>;
}

/// Requests the next frame from whatever drives the loop.
pub trait FrameScheduler {
    fn schedule_next(&mut self);
}

/// Scheduler that grants a fixed number of frames, for headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBudget {
    remaining: usize,
    completed: usize,
}

impl FrameBudget {
    pub fn new(frames: usize) -> Self {
        Self {
            remaining: frames,
            completed: 0,
        }
    }

    pub fn exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Frames that ran to the end so far. A frame calls `schedule_next`
    /// exactly once, as its last step, so a failed frame is not counted.
    pub fn completed(&self) -> usize {
        self.completed
    }
}

impl FrameScheduler for FrameBudget {
    fn schedule_next(&mut self) {
        self.completed += 1;
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Moves a camera position one step along the orbit.
///
/// The y coordinate picks up the same `z * sin` term as x, so the camera
/// climbs while z is positive.
pub fn orbit_step(position: Vector3<f32>, theta: f32) -> Vector3<f32> {
    let (sin, cos) = theta.sin_cos();
    let Vector3 { x, y, z } = position;
    Vector3::new(x * cos + z * sin, y * cos + z * sin, z * cos - x * sin)
}

impl Showcase {
    /// Runs one frame: sample stats, spin the acorn, orbit and re-aim the
    /// camera, render, apply control input, schedule the next frame.
    ///
    /// A render error is returned before the next frame is scheduled.
    pub fn frame(
        &mut self,
        renderer: &mut dyn FrameRenderer,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<()> {
        self.stats.update();

        let acorn = self.scene.get_mut(self.acorn)?;
        acorn.transform.rotation.z -= self.animation.acorn_spin_step;

        let position = orbit_step(self.camera.position, self.animation.orbit_step);
        self.camera.set_position(position);
        self.camera.look_at(Vector3::zero());

        renderer.render(&self.scene, &self.camera, &mut self.stats)?;

        self.controls.update(&mut self.camera);
        scheduler.schedule_next();
        Ok(())
    }

    /// Drives `frames` frames back to back; returns how many completed.
    pub fn run_frames(&mut self, renderer: &mut dyn FrameRenderer, frames: usize) -> Result<usize> {
        let mut budget = FrameBudget::new(frames);
        while !budget.exhausted() {
            self.frame(renderer, &mut budget)?;
        }
        Ok(budget.completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_step_matches_the_formula() {
        let theta = 0.01f32;
        let next = orbit_step(Vector3::new(0.0, 60.0, 50.0), theta);
        assert!((next.x - 50.0 * theta.sin()).abs() < 1e-5);
        assert!((next.y - (60.0 * theta.cos() + 50.0 * theta.sin())).abs() < 1e-4);
        assert!((next.z - 50.0 * theta.cos()).abs() < 1e-4);
    }

    #[test]
    fn zero_angle_is_identity() {
        let p = Vector3::new(3.0, -2.0, 7.5);
        assert_eq!(orbit_step(p, 0.0), p);
    }

    #[test]
    fn budget_counts_down() {
        let mut budget = FrameBudget::new(2);
        assert!(!budget.exhausted());
        budget.schedule_next();
        budget.schedule_next();
        assert!(budget.exhausted());
        budget.schedule_next();
        assert_eq!(budget.completed(), 3);
    }
}
