//! Window management and the main loop, via winit.
//!
//! [`WindowRunner`] owns the event loop. The caller provides a setup closure
//! that receives an [`EngineContext`] once the window and GPU exist, wires up
//! scenes, layers, and systems, and then the runner drives
//! [`Game::run`](crate::game::Game::run) on every redraw.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::error::{Error, Result};
use crate::game::Game;
use crate::input::InputSnapshot;
use crate::math::Vec2;
use crate::render::{GpuContext, LayerService, RenderBackend, WgpuRenderer};

/// Everything a game's setup closure gets to work with.
pub struct EngineContext {
    pub game: Game,
    pub layers: LayerService,
    pub input: Rc<RefCell<InputSnapshot>>,
    pub renderer: Rc<RefCell<WgpuRenderer>>,
}

/// Builder for the windowed main loop.
pub struct WindowRunner {
    title: String,
    width: f64,
    height: f64,
    setup: Option<Box<dyn FnOnce(&mut EngineContext)>>,
}

impl WindowRunner {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            width: 1280.0,
            height: 720.0,
            setup: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Closure run once, after the window and GPU are up.
    pub fn with_setup(mut self, setup: impl FnOnce(&mut EngineContext) + 'static) -> Self {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Run the event loop. Blocks until the window closes or a frame fails.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new().map_err(|e| Error::Render(e.to_string()))?;
        let mut app = WinitApp {
            title: self.title,
            width: self.width,
            height: self.height,
            setup: self.setup,
            window: None,
            context: None,
            start: Instant::now(),
            failure: None,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| Error::Render(e.to_string()))?;

        match app.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// The application state winit drives.
struct WinitApp {
    title: String,
    width: f64,
    height: f64,
    setup: Option<Box<dyn FnOnce(&mut EngineContext)>>,
    window: Option<Arc<Window>>,
    context: Option<EngineContext>,
    start: Instant,
    failure: Option<Error>,
}

impl WinitApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        error!("fatal: {err}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(self.width, self.height));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, Error::Render(e.to_string()));
                return;
            }
        };

        let gpu = match GpuContext::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };
        let (surface_width, surface_height) = gpu.surface_size();

        let renderer = match WgpuRenderer::new(gpu) {
            Ok(renderer) => Rc::new(RefCell::new(renderer)),
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };

        let mut context = EngineContext {
            game: Game::new(),
            layers: LayerService::new(surface_width as f32, surface_height as f32),
            input: Rc::new(RefCell::new(InputSnapshot::new())),
            renderer,
        };

        if let Some(setup) = self.setup.take() {
            setup(&mut context);
        }

        info!("window up, {} scene(s) registered", context.game.scene_count());
        self.context = Some(context);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(context) = self.context.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("window close requested, exiting");
                context.game.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                context.renderer.borrow_mut().resize(size.width, size.height);
                context
                    .layers
                    .set_window_size(size.width as f32, size.height as f32);
                context.layers.resize_all_layers(None);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    let mut input = context.input.borrow_mut();
                    match event.state {
                        ElementState::Pressed => input.keys.press(key_code),
                        ElementState::Released => input.keys.release(key_code),
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let mut input = context.input.borrow_mut();
                match state {
                    ElementState::Pressed => input.mouse.press(button),
                    ElementState::Released => input.mouse.release(button),
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                context.input.borrow_mut().cursor =
                    Vec2::new(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 16.0) as f32,
                };
                context.input.borrow_mut().wheel_delta += lines;
            }

            WindowEvent::RedrawRequested => {
                let frame_result = context.renderer.borrow_mut().begin_frame();
                match frame_result {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let mut renderer = context.renderer.borrow_mut();
                        let (w, h) = renderer.surface_size();
                        renderer.resize(w, h);
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                        return;
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        self.fail(event_loop, Error::Render("out of GPU memory".to_string()));
                        return;
                    }
                    Err(e) => {
                        warn!("surface error, skipping frame: {e:?}");
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                        return;
                    }
                }

                let timestamp_ms = self.start.elapsed().as_secs_f64() * 1000.0;
                if let Err(err) = context.game.run(timestamp_ms) {
                    context.renderer.borrow_mut().end_frame();
                    context.game.stop();
                    self.fail(event_loop, err.into());
                    return;
                }

                context.renderer.borrow_mut().end_frame();
                context.input.borrow_mut().next_frame();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
