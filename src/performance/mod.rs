//! # Frame Counter
//!
//! Sampled once per frame. The interval between consecutive
//! [`PerformanceMonitor::update`] calls goes into a rolling window, and the
//! overlay in the top-left corner shows either frames per second or frame
//! time over that window. Clicking the overlay switches between the two.
//!
//! ```rust
//! use acorn_scene::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//! monitor.update(); // once per frame
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Samples kept by [`PerformanceMonitor::new`], about two seconds at 60 Hz.
const DEFAULT_WINDOW: usize = 120;
/// Upper bound of the frame time graph.
const GRAPH_MAX_MS: f32 = 50.0;

/// What the overlay displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsMode {
    #[default]
    Fps,
    FrameTime,
}

impl StatsMode {
    pub fn next(self) -> Self {
        match self {
            StatsMode::Fps => StatsMode::FrameTime,
            StatsMode::FrameTime => StatsMode::Fps,
        }
    }
}

/// Values over the current window. Times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceMetrics {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
        }
    }
}

impl PerformanceMetrics {
    fn from_samples(samples: &VecDeque<Duration>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let ms = |d: &Duration| d.as_secs_f32() * 1000.0;
        let average = samples.iter().map(ms).sum::<f32>() / samples.len() as f32;
        let (min, max) = samples
            .iter()
            .map(ms)
            .fold((f32::MAX, 0.0f32), |(lo, hi), t| (lo.min(t), hi.max(t)));

        Self {
            fps: if average > 0.0 { 1000.0 / average } else { 0.0 },
            frame_time_ms: average,
            min_frame_time_ms: min,
            max_frame_time_ms: max,
        }
    }

    /// Lowest and highest rate in the window, in the unit of `mode`.
    fn range(&self, mode: StatsMode) -> String {
        match mode {
            StatsMode::Fps => format!(
                "({:.0}-{:.0})",
                1000.0 / self.max_frame_time_ms.max(f32::EPSILON),
                1000.0 / self.min_frame_time_ms.max(f32::EPSILON),
            ),
            StatsMode::FrameTime => format!(
                "({:.1}-{:.1})",
                self.min_frame_time_ms.min(self.max_frame_time_ms),
                self.max_frame_time_ms
            ),
        }
    }
}

pub struct PerformanceMonitor {
    samples: VecDeque<Duration>,
    window: usize,
    last_tick: Option<Instant>,
    metrics: PerformanceMetrics,
    mode: StatsMode,
    frames: u64,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    /// Averages over the last `window` frames.
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            last_tick: None,
            metrics: PerformanceMetrics::default(),
            mode: StatsMode::default(),
            frames: 0,
        }
    }

    /// Marks a frame. The first call only starts the clock.
    pub fn update(&mut self) {
        let now = Instant::now();
        if let Some(previous) = self.last_tick.replace(now) {
            self.record_frame(now - previous);
        }
        self.frames += 1;
    }

    pub fn record_frame(&mut self, frame_time: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(frame_time);
        self.metrics = PerformanceMetrics::from_samples(&self.samples);
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    /// Number of `update` calls so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn mode(&self) -> StatsMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: StatsMode) {
        self.mode = mode;
    }

    /// Frame times in the window, oldest first, in milliseconds.
    pub fn history_ms(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|d| d.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Headline text for the current mode.
    pub fn summary(&self) -> String {
        match self.mode {
            StatsMode::Fps => format!("{:.0} FPS", self.metrics.fps),
            StatsMode::FrameTime => format!("{:.1} MS", self.metrics.frame_time_ms),
        }
    }

    /// Draws the counter in the top-left corner.
    pub fn render_overlay(&mut self, ui: &imgui::Ui) {
        let summary = self.summary();
        let range = self.metrics.range(self.mode);
        let history = self.history_ms();
        let mut clicked = false;

        ui.window("Stats")
            .size([120.0, 70.0], imgui::Condition::Always)
            .position([0.0, 0.0], imgui::Condition::Always)
            .no_decoration()
            .bg_alpha(0.6)
            .build(|| {
                ui.text(&summary);
                ui.text_disabled(&range);
                if !history.is_empty() {
                    ui.plot_lines("##frame_times", &history)
                        .graph_size([104.0, 20.0])
                        .scale_min(0.0)
                        .scale_max(GRAPH_MAX_MS)
                        .build();
                }
                clicked = ui.is_window_hovered() && ui.is_mouse_clicked(imgui::MouseButton::Left);
            });

        if clicked {
            self.set_mode(self.mode.next());
        }
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_over_the_window() {
        let mut monitor = PerformanceMonitor::with_window(4);
        for ms in [10, 20, 30, 40] {
            monitor.record_frame(Duration::from_millis(ms));
        }
        let metrics = monitor.metrics();
        assert!((metrics.frame_time_ms - 25.0).abs() < 1e-3);
        assert!((metrics.fps - 40.0).abs() < 1e-2);
        assert!((metrics.min_frame_time_ms - 10.0).abs() < 1e-3);
        assert!((metrics.max_frame_time_ms - 40.0).abs() < 1e-3);
    }

    #[test]
    fn old_samples_fall_out_of_the_window() {
        let mut monitor = PerformanceMonitor::with_window(2);
        monitor.record_frame(Duration::from_millis(100));
        monitor.record_frame(Duration::from_millis(10));
        monitor.record_frame(Duration::from_millis(10));
        assert_eq!(monitor.history_ms().len(), 2);
        assert!((monitor.metrics().fps - 100.0).abs() < 1e-2);
    }

    #[test]
    fn first_update_only_starts_the_clock() {
        let mut monitor = PerformanceMonitor::new();
        monitor.update();
        assert!(monitor.history_ms().is_empty());
        monitor.update();
        assert_eq!(monitor.history_ms().len(), 1);
        assert_eq!(monitor.frames(), 2);
    }

    #[test]
    fn summary_follows_mode() {
        let mut monitor = PerformanceMonitor::new();
        monitor.record_frame(Duration::from_millis(20));
        assert_eq!(monitor.summary(), "50 FPS");
        monitor.set_mode(monitor.mode().next());
        assert_eq!(monitor.summary(), "20.0 MS");
    }

    #[test]
    fn range_is_reported_in_the_current_unit() {
        let mut monitor = PerformanceMonitor::new();
        monitor.record_frame(Duration::from_millis(10));
        monitor.record_frame(Duration::from_millis(20));
        assert_eq!(monitor.metrics().range(StatsMode::Fps), "(50-100)");
        assert_eq!(monitor.metrics().range(StatsMode::FrameTime), "(10.0-20.0)");
    }
}
