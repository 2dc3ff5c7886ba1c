use std::sync::Arc;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    assets::SceneAssets,
    config::ShowcaseConfig,
    error::{Result, ShowcaseError},
    gfx::{camera::PerspectiveCamera, rendering::RenderEngine, scene::Scene, ui::UiManager},
    performance::PerformanceMonitor,
    showcase::{FrameRenderer, FrameScheduler, Showcase, TEXT_FONT},
};

/// Window, event loop and GPU host for the [`Showcase`].
pub struct AcornApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ShowcaseConfig,
    window: Option<Arc<Window>>,
    renderer: Option<GpuFrameRenderer>,
    showcase: Option<Showcase>,
    error: Option<ShowcaseError>,
}

/// Renders frames with the wgpu engine and draws the stats overlay on top.
struct GpuFrameRenderer {
    engine: RenderEngine,
    ui: UiManager,
    window: Arc<Window>,
}

impl FrameRenderer for GpuFrameRenderer {
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        stats: &mut PerformanceMonitor,
    ) -> Result<()> {
        let ui = &mut self.ui;
        let window = &self.window;
        let overlay = |device: &wgpu::Device,
                       queue: &wgpu::Queue,
                       encoder: &mut wgpu::CommandEncoder,
                       view: &wgpu::TextureView| {
            ui.draw(device, queue, encoder, window, view, |frame| {
                stats.render_overlay(frame)
            })
        };
        self.engine.render_frame(scene, camera, Some(overlay))
    }
}

/// Schedules the next frame on the display refresh.
struct RedrawScheduler<'a> {
    window: &'a Window,
}

impl FrameScheduler for RedrawScheduler<'_> {
    fn schedule_next(&mut self) {
        self.window.request_redraw();
    }
}

impl AcornApp {
    pub fn new(config: ShowcaseConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                renderer: None,
                showcase: None,
                error: None,
            },
        })
    }

    /// Runs until the window closes, Escape is pressed or a frame fails.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        // Frames schedule their successor, so the loop can sleep in between.
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_config = &self.config.window;
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.clone())
                    .with_inner_size(LogicalSize::new(window_config.width, window_config.height))
                    .with_transparent(self.config.renderer.alpha),
            )?,
        );
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        info!("Window created ({}x{})", width, height);

        let config = &self.config;
        let mut engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            config,
        ))?;

        let assets = SceneAssets::load(&config.assets, TEXT_FONT)?;
        let showcase = Showcase::compose(config, &assets, (width, height))?;
        engine.upload_scene(&showcase.scene);

        let ui = UiManager::new(
            engine.device(),
            engine.queue(),
            engine.surface_format(),
            &window,
        );

        self.renderer = Some(GpuFrameRenderer {
            engine,
            ui,
            window: window.clone(),
        });
        self.showcase = Some(showcase);

        // First frame; every frame requests the next one.
        window.request_redraw();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ShowcaseError) {
        error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(renderer), Some(showcase)) = (
            self.window.clone(),
            self.renderer.as_mut(),
            self.showcase.as_mut(),
        ) else {
            return;
        };

        // The overlay sees input first.
        let captured = renderer.ui.handle_input(&window, window_id, &event);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                renderer.engine.resize(width, height);
            }
            WindowEvent::RedrawRequested => {
                let mut scheduler = RedrawScheduler { window: &window };
                if let Err(err) = showcase.frame(renderer, &mut scheduler) {
                    self.fail(event_loop, err);
                }
            }
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } => {
                showcase.controls.process_window_event(&event);
            }
            WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. } => {
                if !captured {
                    showcase.controls.process_window_event(&event);
                }
            }
            _ => (),
        }
    }
}
