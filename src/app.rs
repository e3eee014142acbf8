// app.rs
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::*,
    event_loop::ActiveEventLoop,
    keyboard::{Key, KeyCode, NamedKey, PhysicalKey},
    window::{Window, WindowId},
};

use crate::asset::GltfSource;
use crate::config::ConfigParameter;
use crate::ocean;
use crate::renderer::Renderer;
use crate::scheduler::OceanScene;
use crate::settings::OceanSettings;
use crate::time::AnimationClock;

const PIXELS_PER_SCROLL_LINE: f32 = 50.0;

pub struct App {
    settings: OceanSettings,
    renderer: Option<Renderer>,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    scene: OceanScene,
    clock: AnimationClock,
    dragging: bool,
    cursor: Option<PhysicalPosition<f64>>,
}

impl App {
    pub fn new(settings: OceanSettings) -> Self {
        let mut scene = OceanScene::new(&settings, Arc::new(GltfSource));
        ocean::populate(&mut scene, &settings.assets.root);

        Self {
            settings,
            renderer: None,
            window: None,
            window_id: None,
            scene,
            clock: AnimationClock::start(),
            dragging: false,
            cursor: None,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_mut() {
            self.scene.shutdown(renderer);
        }
        self.renderer = None;
        event_loop.exit();
    }
}

fn key_binding(code: KeyCode) -> Option<(ConfigParameter, f32)> {
    match code {
        KeyCode::ArrowUp => Some((ConfigParameter::Elevation, 1.0)),
        KeyCode::ArrowDown => Some((ConfigParameter::Elevation, -1.0)),
        KeyCode::ArrowRight => Some((ConfigParameter::Azimuth, 1.0)),
        KeyCode::ArrowLeft => Some((ConfigParameter::Azimuth, -1.0)),
        KeyCode::BracketRight => Some((ConfigParameter::DistortionScale, 1.0)),
        KeyCode::BracketLeft => Some((ConfigParameter::DistortionScale, -1.0)),
        KeyCode::Equal => Some((ConfigParameter::Size, 1.0)),
        KeyCode::Minus => Some((ConfigParameter::Size, -1.0)),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let resolution = &self.settings.render.resolution;
        let attributes = Window::default_attributes()
            .with_title("Ocean")
            .with_inner_size(PhysicalSize::new(resolution.width, resolution.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        let mut renderer = match pollster::block_on(Renderer::new(
            Arc::clone(&window),
            &self.settings.render,
            &self.settings.assets.water_normals,
        )) {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("Failed to initialize renderer: {}", err);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.scene.resize(size.width, size.height, &mut renderer);
        self.scene.startup(&mut renderer);
        self.clock = AnimationClock::start();

        self.window_id = Some(window.id());
        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if Some(id) != self.window_id {
            return;
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(size) => {
                self.scene.resize(size.width, size.height, renderer);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(w) = &self.window {
                    let size = w.inner_size();
                    self.scene.resize(size.width, size.height, renderer);
                }
            }
            WindowEvent::RedrawRequested => {
                let time = self.clock.tick();
                self.scene.tick(renderer, time);

                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.shutdown(event_loop);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some((parameter, direction)) = key_binding(code) {
                    let current = self.scene.config_value(parameter);
                    self.scene
                        .apply_config(parameter.nudge(current, direction), renderer);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.cursor) {
                    let height = renderer.size().height as f32;
                    self.scene.controls_mut().rotate(
                        (position.x - last.x) as f32,
                        (position.y - last.y) as f32,
                        height,
                    );
                }
                self.cursor = Some(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_SCROLL_LINE,
                };
                self.scene.controls_mut().zoom(steps);
            }
            _ => {}
        }
    }
}
