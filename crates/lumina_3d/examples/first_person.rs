//! First-person walkthrough of a small lit scene.
//!
//! WASD moves along the view axes, Space ascends, the mouse looks and
//! Escape quits. A torus and a cube sit under a point light, a
//! billboarded quad keeps facing the camera, and the overlay draws a
//! crosshair plus a swatch that goes green while you move.
//!
//! Run with: cargo run -p lumina_3d --example first_person

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use glam::Vec3;
use lumina_3d::{
    controller_event_system, controller_update_system, AmbientLight, BasicMaterial, BoxGeometry,
    Camera, ControllerEvent, Entity, FirstPersonController, Geometry, InputState, Mesh, Overlay,
    PhongMaterial, PointLight, Renderer, RendererConfig, TorusGeometry, Transform, Vertex, World,
};
use lumina_gpu::{ContextConfig, GpuContext};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

const SWATCH_SIZE: u32 = 24;

struct State {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: Renderer,
    world: World,
    player: Entity,
    input: InputState,
    swatch: Vec<u8>,
    last_frame: Instant,
}

impl State {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let mut gpu = pollster::block_on(GpuContext::new(
            window.clone(),
            size.width,
            size.height,
            ContextConfig::default(),
        ))?;
        let renderer = Renderer::new(
            &gpu,
            RendererConfig {
                clear_color: wgpu::Color {
                    r: 0.02,
                    g: 0.02,
                    b: 0.03,
                    a: 1.0,
                },
                ..RendererConfig::default()
            },
        );
        let (world, player) = build_scene(&mut gpu, &renderer);

        Ok(Self {
            window,
            gpu,
            renderer,
            world,
            player,
            input: InputState::new(),
            swatch: checker_pixels(SWATCH_SIZE),
            last_frame: Instant::now(),
        })
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        controller_update_system(&mut self.world, &self.input, dt);

        let (width, height) = self.gpu.size();
        let moving = self.input.any_movement();
        if let Some(overlay) = self.world.overlay_mut(self.player) {
            let cx = width as f32 / 2.0;
            let cy = height as f32 / 2.0;
            overlay.queue_rect(cx - 8.0, cy - 1.0, 16.0, 2.0, [1.0, 1.0, 1.0, 0.8]);
            overlay.queue_rect(cx - 1.0, cy - 8.0, 2.0, 16.0, [1.0, 1.0, 1.0, 0.8]);

            let tint = if moving {
                [0.3, 1.0, 0.3, 1.0]
            } else {
                [0.6, 0.6, 0.6, 1.0]
            };
            overlay.queue_bitmap(
                &mut self.gpu,
                16.0,
                16.0,
                SWATCH_SIZE,
                SWATCH_SIZE,
                &self.swatch,
                tint,
            );
        }

        if let Err(e) = self.renderer.render(&mut self.gpu, &mut self.world) {
            error!("frame dropped: {e}");
        }
    }
}

struct App {
    state: Option<State>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("Lumina - first person")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // Locked grab is not available everywhere; confined plus a hidden
        // cursor behaves the same for mouse look.
        if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
            let _ = window.set_cursor_grab(CursorGrabMode::Confined);
        }
        window.set_cursor_visible(false);

        match State::new(window) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                error!("failed to initialize GPU: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state.gpu.resize(size.width, size.height);
            }
            WindowEvent::Focused(false) => state.input.clear(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                match code {
                    KeyCode::KeyW => state.input.forward = pressed,
                    KeyCode::KeyS => state.input.backward = pressed,
                    KeyCode::KeyA => state.input.left = pressed,
                    KeyCode::KeyD => state.input.right = pressed,
                    KeyCode::Space => state.input.ascend = pressed,
                    KeyCode::Escape if pressed => {
                        if controller_event_system(
                            &mut state.world,
                            &ControllerEvent::EscapePressed,
                        ) {
                            event_loop.exit();
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => state.frame(),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            // Window deltas grow rightward and downward; the look system
            // takes positive angles as leftward yaw and upward pitch.
            controller_event_system(
                &mut state.world,
                &ControllerEvent::PointerMotion {
                    xrel: -(delta.0 as f32),
                    yrel: -(delta.1 as f32),
                },
            );
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

fn build_scene(gpu: &mut GpuContext, renderer: &Renderer) -> (World, Entity) {
    let mut world = World::new();
    let layouts = renderer.layouts();

    let player = world.spawn();
    world.add_transform(player, Transform::from_position(Vec3::new(0.0, 1.5, 6.0)));
    world.add_camera(player, Camera::new(70f32.to_radians(), 0.1, 1000.0));
    world.add_controller(player, FirstPersonController::default());
    world.add_overlay(player, Overlay::new(gpu, layouts, 64));
    world.set_active_camera(Some(player));

    let torus = world.spawn();
    let geometry = TorusGeometry::new(1.0, 0.4).expect("torus parameters are valid");
    world.add_mesh(torus, Mesh::upload(gpu, &geometry));
    world.add_material(
        torus,
        PhongMaterial::new(Vec3::new(0.2, 0.8, 0.3)).create(gpu, layouts),
    );
    world.add_transform(torus, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));

    let cube = world.spawn();
    world.add_mesh(cube, Mesh::upload(gpu, &BoxGeometry::cube(1.0)));
    world.add_material(
        cube,
        PhongMaterial::new(Vec3::new(0.9, 0.2, 0.2)).create(gpu, layouts),
    );
    world.add_transform(cube, Transform::from_position(Vec3::new(2.5, 0.5, 0.0)));

    let floor = world.spawn();
    world.add_mesh(floor, Mesh::upload(gpu, &BoxGeometry::new(12.0, 12.0, 0.2)));
    world.add_material(
        floor,
        PhongMaterial::new(Vec3::new(0.35, 0.35, 0.4)).create(gpu, layouts),
    );
    world.add_transform(floor, Transform::from_position(Vec3::new(0.0, -0.1, 0.0)));

    let sign = world.spawn();
    world.add_mesh(sign, Mesh::upload(gpu, &quad_geometry(1.5, 1.0)));
    world.add_material(
        sign,
        BasicMaterial::new(Vec3::new(1.0, 0.9, 0.2)).create(gpu, layouts),
    );
    world.add_transform(sign, Transform::from_position(Vec3::new(-2.5, 1.0, 0.0)));
    world.add_billboard(sign);

    let ambient = world.spawn();
    world.add_ambient_light(ambient, AmbientLight::white(0.08));

    let lamp = world.spawn();
    world.add_point_light(lamp, PointLight::white(1.0));
    world.add_transform(lamp, Transform::from_position(Vec3::new(2.0, 3.0, 2.0)));

    info!(entities = world.entities_issued(), "scene ready");
    (world, player)
}

/// Single quad in the XY plane, front toward -Z like the box generator's
/// front face, so a billboard shows it to the camera.
fn quad_geometry(width: f32, height: f32) -> Geometry {
    let hx = width / 2.0;
    let hy = height / 2.0;
    let vertices = vec![
        Vertex::flat([-hx, -hy, 0.0], [0.0, 1.0]),
        Vertex::flat([hx, -hy, 0.0], [1.0, 1.0]),
        Vertex::flat([hx, hy, 0.0], [1.0, 0.0]),
        Vertex::flat([-hx, hy, 0.0], [0.0, 0.0]),
    ];
    let indices = vec![0, 2, 1, 2, 0, 3];
    let mut geometry = Geometry::from_data(vertices, indices);
    geometry.compute_vertex_normals();
    geometry
}

/// RGBA checkerboard for the overlay bitmap path.
fn checker_pixels(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 60 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut App { state: None })?;
    Ok(())
}
