use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::driver::{DemoConfig, FrameDriver, SessionState};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::render::{DecodedImage, Scene};
use crate::scene::GeometryBuffer;
use crate::time::SessionClock;
use crate::SetupError;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "rotor".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for a demo.
pub struct Runtime;

impl Runtime {
    /// Loads the demo's assets, opens the window, builds the scene and redraws
    /// until the window is closed.
    ///
    /// Setup failures (context, shaders, assets) end the loop and are returned
    /// as the error, downcastable to [`SetupError`].
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit, demo: DemoConfig) -> Result<()> {
        // Assets resolve before any GPU work; a failed load never reaches setup.
        let geometry = demo.geometry.resolve()?;
        let texture = demo.texture.as_ref().map(|t| t.decode()).transpose()?;

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut app = DemoApp::new(config, gpu_init, demo, geometry, texture);

        event_loop
            .run_app(&mut app)
            .context("winit event loop terminated with error")?;

        match app.failure.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct DemoApp {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    demo: DemoConfig,
    geometry: GeometryBuffer,
    texture: Option<DecodedImage>,

    driver: FrameDriver,
    session: SessionState,
    input: InputState,
    clock: SessionClock,

    scene: Option<Scene>,
    entry: Option<WindowEntry>,

    failure: Option<SetupError>,
    exit_requested: bool,
}

impl DemoApp {
    fn new(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        demo: DemoConfig,
        geometry: GeometryBuffer,
        texture: Option<DecodedImage>,
    ) -> Self {
        let driver = FrameDriver::new(&demo, geometry.clone());
        let session = driver.initial_state();
        Self {
            config,
            gpu_init,
            demo,
            geometry,
            texture,
            driver,
            session,
            input: InputState::default(),
            clock: SessionClock::new(),
            scene: None,
            entry: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SetupError) {
        log::error!("demo '{}' setup failed: {err}", self.demo.name);
        self.failure = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        if drawable(new_size) {
            // restarts the redraw chain that stalls while minimized
            entry.with_window(|w| w.request_redraw());
        }

        match self.demo.projection.for_size(new_size.width, new_size.height) {
            Some(projection) => {
                if let Some(scene) = self.scene.as_mut() {
                    scene.set_projection(projection);
                }
            }
            None => log::debug!(
                "degenerate size {}x{}; keeping previous projection",
                new_size.width,
                new_size.height
            ),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Self {
            entry,
            scene,
            driver,
            session,
            input,
            clock,
            exit_requested,
            ..
        } = self;
        let (Some(entry), Some(scene)) = (entry.as_mut(), scene.as_ref()) else {
            return;
        };

        if !drawable(entry.borrow_gpu().size()) {
            return;
        }

        let frame = match entry.borrow_gpu().begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                if entry.with_gpu_mut(|gpu| gpu.handle_surface_error(err)) == SurfaceErrorAction::Fatal {
                    log::error!("unrecoverable surface error; exiting");
                    *exit_requested = true;
                    event_loop.exit();
                }
                return;
            }
        };

        let time = clock.tick();
        let (next, plan) = driver.tick(std::mem::take(session), &time, input);
        *session = next;

        let gpu = entry.borrow_gpu();
        entry.with_window(|w| w.pre_present_notify());
        scene.render(gpu, frame, &plan);
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        let entry = match self.create_window_entry(event_loop) {
            Ok(entry) => entry,
            Err(e) => {
                self.fail(event_loop, SetupError::ContextUnavailable(format!("{e:#}")));
                return;
            }
        };

        let built = entry.with_gpu(|gpu| {
            Scene::build(gpu, &self.demo, &self.geometry, self.texture.as_ref())
        });
        match built {
            Ok(scene) => self.scene = Some(scene),
            Err(err) => {
                self.fail(event_loop, err);
                return;
            }
        }

        log::info!("demo '{}' running", self.demo.name);
        // Rotation is measured from the first rendered frame.
        self.clock = SessionClock::new();
        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw while there is something to draw into.
        if let Some(entry) = &self.entry {
            if drawable(entry.borrow_gpu().size()) {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(ev) = translate_window_event(&event) {
            self.input.apply_event(&ev);
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("window closed after {} frames", self.session.frames);
                self.scene = None;
                self.entry = None;
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => self.resize(*new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

/// A minimized window reports a zero size and has no surface to draw into.
fn drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}
