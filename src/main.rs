//! Nebula - real-time particle nebula animation
//!
//! Four particle populations (outer shell, core, starfield, energy field)
//! animated on the CPU and drawn as additively blended point sprites.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use rand::rngs::StdRng;
use rand::SeedableRng;

use nebula::config::AppConfig;
use nebula_core::{
    DirtyFlags, JitterNoise, NoiseSource, PerlinNoise, Population, PointerMailbox, SimulationState,
};
use nebula_render::{Camera, PointCloud, PointPipeline, RenderContext};

/// GPU-side clouds, one per population
struct Clouds {
    outer: PointCloud,
    core: PointCloud,
    stars: PointCloud,
    energy: PointCloud,
}

/// Main application state
struct App {
    config: AppConfig,
    sim: SimulationState,
    pointer: PointerMailbox,
    camera: Camera,
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    pipeline: Option<PointPipeline>,
    clouds: Option<Clouds>,
}

impl App {
    fn new() -> Self {
        // Load configuration
        let config = AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        });

        let seed = config.simulation.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        log::info!("field generation seed: {}", seed);

        let noise: Box<dyn NoiseSource> = match config.simulation.noise.as_str() {
            "jitter" => Box::new(JitterNoise),
            "perlin" => Box::new(PerlinNoise::new(seed as u32)),
            other => {
                log::warn!("Unknown noise source '{}', falling back to perlin", other);
                Box::new(PerlinNoise::new(seed as u32))
            }
        };

        let sim = SimulationState::generate(config.simulation.to_sim_params(), noise, &mut rng);

        let camera = Camera {
            distance: config.camera.distance,
            fov: config.camera.fov,
            near: config.camera.near,
            far: config.camera.far,
        };

        Self {
            config,
            sim,
            pointer: PointerMailbox::new(),
            camera,
            window: None,
            render_context: None,
            pipeline: None,
            clouds: None,
        }
    }

    /// Re-upload a population's positions if dirty, then write this frame's
    /// uniforms (the transform changes every frame anyway)
    fn sync_cloud(
        queue: &wgpu::Queue,
        cloud: &PointCloud,
        pop: &mut Population,
        view_proj: nebula_math::Mat4,
    ) {
        if pop.dirty().contains(DirtyFlags::POSITIONS) {
            cloud.upload_positions(queue, pop.positions());
        }
        cloud.update_uniforms(queue, view_proj, &pop.transform);
        pop.clear_dirty(DirtyFlags::ALL);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let mut window_attributes = Window::default_attributes()
                .with_title(&self.config.window.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                ));
            if self.config.window.fullscreen {
                window_attributes =
                    window_attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
            }

            let window = Arc::new(
                event_loop
                    .create_window(window_attributes)
                    .expect("Failed to create window"),
            );

            // Create render context
            let render_context = pollster::block_on(RenderContext::new(
                window.clone(),
                self.config.window.vsync,
            ))
            .expect("Failed to create render context");

            let pipeline = PointPipeline::new(&render_context.device, render_context.config.format);

            let sprites = &self.config.rendering;
            let clouds = Clouds {
                outer: PointCloud::new(
                    &render_context.device,
                    pipeline.bind_group_layout(),
                    self.sim.outer.positions(),
                    self.sim.outer.colors(),
                    sprites.outer.point_size,
                    sprites.outer.opacity,
                ),
                core: PointCloud::new(
                    &render_context.device,
                    pipeline.bind_group_layout(),
                    self.sim.core.positions(),
                    self.sim.core.colors(),
                    sprites.core.point_size,
                    sprites.core.opacity,
                ),
                stars: PointCloud::new(
                    &render_context.device,
                    pipeline.bind_group_layout(),
                    self.sim.stars.positions(),
                    self.sim.stars.colors(),
                    sprites.stars.point_size,
                    sprites.stars.opacity,
                ),
                energy: PointCloud::new(
                    &render_context.device,
                    pipeline.bind_group_layout(),
                    self.sim.energy.positions(),
                    self.sim.energy.colors(),
                    sprites.energy.point_size,
                    sprites.energy.opacity,
                ),
            };

            log::info!(
                "uploaded {} particles across 4 clouds",
                clouds.outer.count()
                    + clouds.core.count()
                    + clouds.stars.count()
                    + clouds.energy.count()
            );

            self.window = Some(window);
            self.render_context = Some(render_context);
            self.pipeline = Some(pipeline);
            self.clouds = Some(clouds);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(ctx) = &mut self.render_context {
                    ctx.resize(physical_size);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state == ElementState::Pressed {
                        match key {
                            KeyCode::Escape => {
                                event_loop.exit();
                            }
                            KeyCode::KeyF => {
                                if let Some(window) = &self.window {
                                    let new_fullscreen = if window.fullscreen().is_some() {
                                        None
                                    } else {
                                        Some(Fullscreen::Borderless(None))
                                    };
                                    window.set_fullscreen(new_fullscreen);
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                // Map window coordinates to [-1, 1] with +y up, matching the
                // space the repulsion rule works in.
                if let Some(ctx) = &self.render_context {
                    let w = ctx.size.width.max(1) as f32;
                    let h = ctx.size.height.max(1) as f32;
                    let x = (position.x as f32 / w) * 2.0 - 1.0;
                    let y = -((position.y as f32 / h) * 2.0 - 1.0);
                    self.pointer.store(x, y);
                }
            }

            WindowEvent::RedrawRequested => {
                let pointer = self.pointer.snapshot();
                self.sim.tick(pointer, self.camera.distance);

                let (Some(ctx), Some(pipeline), Some(clouds)) = (
                    &self.render_context,
                    &self.pipeline,
                    &self.clouds,
                ) else {
                    return;
                };

                let view_proj = self.camera.view_proj(ctx.aspect_ratio());

                Self::sync_cloud(&ctx.queue, &clouds.outer, &mut self.sim.outer, view_proj);
                Self::sync_cloud(&ctx.queue, &clouds.core, &mut self.sim.core, view_proj);
                Self::sync_cloud(&ctx.queue, &clouds.stars, &mut self.sim.stars, view_proj);
                Self::sync_cloud(&ctx.queue, &clouds.energy, &mut self.sim.energy, view_proj);

                let output = match ctx.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = ctx.size;
                        if let Some(ctx) = &mut self.render_context {
                            ctx.resize(size);
                        }
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                        return;
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        event_loop.exit();
                        return;
                    }
                    Err(e) => {
                        log::warn!("Surface error: {:?}", e);
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let mut encoder = ctx
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("Render Encoder"),
                    });

                let bg = &self.config.rendering.background_color;
                pipeline.render(
                    &mut encoder,
                    &view,
                    &[&clouds.stars, &clouds.energy, &clouds.outer, &clouds.core],
                    wgpu::Color {
                        r: bg[0] as f64,
                        g: bg[1] as f64,
                        b: bg[2] as f64,
                        a: bg[3] as f64,
                    },
                );

                ctx.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() {
    // Load config first so the configured log level applies from the start
    let config_result = AppConfig::load();
    let log_level = config_result
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&log_level)).init();
    log::info!("Starting Nebula");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
