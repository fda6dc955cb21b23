use anyhow::anyhow;
use glam::{Vec2, Vec3, Vec4};
use glass_core::decor::{GlowLayer, ShadowLayer};
use glass_core::panel::{rasterize, rounded_box_distance};
use glass_core::raster::premultiply;
use glass_core::{
    compose_visual, Compositor, FilterDocument, GlassConfig, GlassSize, InteractionController,
    Raster, Rect,
};
use instant::Instant;
use winit::dpi::LogicalSize;
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

// Viewer tuning
const WINDOW_SIZE: (f64, f64) = (900.0, 600.0);
const SHIMMER_MIX: f32 = 0.15;
const BACKDROP_TOP: Vec3 = Vec3::new(0.05, 0.06, 0.16);
const BACKDROP_BOTTOM: Vec3 = Vec3::new(0.22, 0.08, 0.28);
const STRIPE_PERIOD: f32 = 48.0;

const BLIT_WGSL: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) i: u32) -> VsOut {
    let uv = vec2<f32>(f32((i << 1u) & 2u), f32(i & 2u));
    var out: VsOut;
    out.pos = vec4<f32>(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0, 0.0, 1.0);
    out.uv = uv;
    return out;
}

@group(0) @binding(0) var frame_tex: texture_2d<f32>;
@group(0) @binding(1) var frame_sampler: sampler;

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return textureSample(frame_tex, frame_sampler, in.uv);
}
"#;

/// CPU side of the viewer: pointer state, the filter document and the
/// eased panel translation.
struct Scene {
    config: GlassConfig,
    filters: FilterDocument,
    compositor: Compositor,
    controller: InteractionController,
    panel_size: GlassSize,
    backdrop: Raster,
    translation: Vec2,
    cursor: Option<Vec2>,
    started: Instant,
    last_frame: Instant,
}

impl Scene {
    fn new(config: GlassConfig, panel_size: GlassSize, width: u32, height: u32) -> Self {
        let config = config.sanitized();
        let filters = FilterDocument::new("glass-native", &config);
        let mut controller = InteractionController::new(config.magnetic_pull);
        controller.set_size(panel_size);
        let now = Instant::now();
        Self {
            config,
            filters,
            compositor: Compositor::with_shared_texture(),
            controller,
            panel_size,
            backdrop: backdrop(width, height),
            translation: Vec2::ZERO,
            cursor: None,
            started: now,
            last_frame: now,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.backdrop = backdrop(width, height);
    }

    /// Untranslated panel bounds; the pointer is measured against these.
    fn panel_rect(&self) -> Rect {
        let w = self.backdrop.width() as f32;
        let h = self.backdrop.height() as f32;
        let size = self.panel_size;
        Rect::new(
            (w - size.width) / 2.0,
            (h - size.height) / 2.0,
            size.width,
            size.height,
        )
    }

    fn pointer_moved(&mut self, position: Vec2) {
        self.cursor = Some(position);
        let rect = self.panel_rect();
        let inside = rect.contains(position);
        if inside && !self.controller.is_hovered() {
            self.controller.on_pointer_enter();
        } else if !inside && self.controller.is_hovered() {
            self.controller.on_pointer_leave();
        }
        self.controller.on_pointer_move(position, Some(rect));
    }

    fn pointer_left(&mut self) {
        self.cursor = None;
        self.controller.on_pointer_leave();
    }

    fn clicked(&mut self) {
        let rect = self.panel_rect();
        if let Some(position) = self.cursor.filter(|p| rect.contains(*p)) {
            self.controller
                .on_click(position - Vec2::new(rect.left, rect.top), Instant::now());
        }
    }

    fn compose(&mut self) -> Raster {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        let t = (now - self.started).as_secs_f32();
        self.controller.expire(now);

        let visual = compose_visual(
            &self.controller.snapshot(),
            &self.config,
            self.panel_size,
            self.controller.is_hovered(),
            self.controller.ripples(),
            now,
        );
        // Elasticity is the easing time constant of the magnetic translation.
        let ease = if visual.elasticity > 0.0 {
            1.0 - (-dt / visual.elasticity).exp()
        } else {
            1.0
        };
        self.translation += (visual.translation - self.translation) * ease;

        let mut frame = self.backdrop.clone();
        let rect = self.panel_rect();
        let center = rect.center() + self.translation;

        draw_shadow(&mut frame, &visual.shadow, visual.effective_radius, center);
        let glow = glow_raster(&visual.glow);
        frame.draw_over(
            &glow,
            (center.x - glow.width() as f32 / 2.0).round() as i64,
            (center.y - glow.height() as f32 / 2.0).round() as i64,
        );

        let (pw, ph) = (
            self.panel_size.width.round() as u32,
            self.panel_size.height.round() as u32,
        );
        let source = rasterize((pw, ph), &visual, t);
        let origin = center - Vec2::new(pw as f32, ph as f32) / 2.0;
        match self.compositor.render_document(&self.filters, &source, t) {
            Ok(output) => {
                let mut glass = output.glass;
                let mix = SHIMMER_MIX * self.config.shimmer_intensity;
                for (g, s) in glass.pixels_mut().iter_mut().zip(output.shimmer.pixels()) {
                    // Screen the shimmer over the panel, inside its coverage.
                    let rgb = g.truncate();
                    let s = s.truncate() * mix * g.w;
                    *g = (rgb + s - rgb * s).min(Vec3::splat(g.w)).extend(g.w);
                }
                let (ox, oy) = output.source_offset;
                frame.draw_over(
                    &glass,
                    origin.x.round() as i64 - ox as i64,
                    origin.y.round() as i64 - oy as i64,
                );
            }
            Err(e) => {
                log::error!("[compositor] {e}");
                frame.draw_over(&source, origin.x.round() as i64, origin.y.round() as i64);
            }
        }
        frame
    }
}

fn backdrop(width: u32, height: u32) -> Raster {
    let mut out = Raster::new(width, height);
    for y in 0..height {
        let k = y as f32 / height.max(1) as f32;
        let base = BACKDROP_TOP.lerp(BACKDROP_BOTTOM, k);
        for x in 0..width {
            let phase = (x as f32 + y as f32) / STRIPE_PERIOD;
            let stripe = if phase.fract() < 0.5 { 1.0 } else { 0.85 };
            out.set(x, y, (base * stripe).extend(1.0));
        }
    }
    out
}

/// The glow's radial gradient over its own box, scaled by its opacity.
fn glow_raster(glow: &GlowLayer) -> Raster {
    let (w, h) = (glow.width.max(0.0) as u32, glow.height.max(0.0) as u32);
    let mut out = Raster::new(w, h);
    if glow.opacity <= 0.0 {
        return out;
    }
    let c = Vec2::new(w as f32, h as f32) / 2.0;
    // CSS `circle` gradients default to the farthest corner.
    let extent = c.length().max(1.0);
    for y in 0..h {
        for x in 0..w {
            let r = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - c).length() / extent;
            out.set(x, y, premultiply(glow.color_at(r)) * glow.opacity);
        }
    }
    out
}

fn draw_shadow(frame: &mut Raster, shadow: &ShadowLayer, radius: f32, center: Vec2) {
    let half = Vec2::new(shadow.width, shadow.height) / 2.0;
    for s in &shadow.shadows {
        let offset = center + Vec2::new(s.dx, s.dy);
        let reach = half + Vec2::splat(s.blur);
        let mut layer = Raster::new(
            (reach.x * 2.0).ceil() as u32,
            (reach.y * 2.0).ceil() as u32,
        );
        for y in 0..layer.height() {
            for x in 0..layer.width() {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - reach;
                let d = rounded_box_distance(p, half, radius);
                let a = s.alpha * (0.5 - d / s.blur.max(1.0)).clamp(0.0, 1.0);
                layer.set(x, y, Vec4::new(0.0, 0.0, 0.0, a));
            }
        }
        frame.draw_over(
            &layer,
            (offset.x - reach.x).round() as i64,
            (offset.y - reach.y).round() as i64,
        );
    }
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    frame_texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit"),
            source: wgpu::ShaderSource::Wgsl(BLIT_WGSL.into()),
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("frame_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let (frame_texture, bind_group) =
            frame_target(&device, &bind_group_layout, &sampler, config.width, config.height);
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group_layout,
            sampler,
            frame_texture,
            bind_group,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        let (texture, bind_group) = frame_target(
            &self.device,
            &self.bind_group_layout,
            &self.sampler,
            new_size.width,
            new_size.height,
        );
        self.frame_texture = texture;
        self.bind_group = bind_group;
    }

    fn render(&mut self, frame: &Raster) -> Result<(), wgpu::SurfaceError> {
        let (w, h) = (self.frame_texture.width(), self.frame_texture.height());
        if frame.width() == w && frame.height() == h {
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &self.frame_texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &frame.to_rgba8(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn frame_target(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::BindGroup) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("frame"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    (texture, bind_group)
}

/// Config overrides from `GLASS_*` environment variables, e.g.
/// `GLASS_DISPLACEMENT_SCALE=90` or `GLASS_OVER_LIGHT=1`.
fn config_from_env() -> GlassConfig {
    let vars: Vec<(String, String)> = std::env::vars()
        .filter_map(|(k, v)| {
            k.strip_prefix("GLASS_")
                .map(|name| (name.to_ascii_lowercase().replace('_', "-"), v))
        })
        .collect();
    GlassConfig::from_attributes(vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Liquid Glass (native)")
        .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1))
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuState::new(&window))?;
    let size = window.inner_size();
    let scale = window.scale_factor() as f32;
    let panel_size = GlassSize {
        width: GlassSize::default().width * scale,
        height: GlassSize::default().height * scale,
    };
    let mut scene = Scene::new(config_from_env(), panel_size, size.width.max(1), size.height.max(1));
    log::info!(
        "[init] {}x{} window, panel {}x{}",
        size.width,
        size.height,
        panel_size.width,
        panel_size.height
    );

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                scene.resize(size.width.max(1), size.height.max(1));
            }
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                scene.pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => scene.pointer_left(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => scene.clicked(),
            _ => {}
        },
        Event::AboutToWait => {
            let frame = scene.compose();
            match gpu.render(&frame) {
                Ok(_) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("[gpu] {e}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
