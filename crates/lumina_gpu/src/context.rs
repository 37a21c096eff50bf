//! GPU context
//!
//! [`GpuContext`] is the process-wide GPU state: device and queue, the window
//! surface and its configuration, the depth target, the shared white fallback
//! texture and the default sampler, plus the [`GpuResources`] table every
//! component handle points into.
//!
//! The depth target is deliberately owned here and replaced in exactly one
//! place, [`GpuContext::ensure_depth_target`], which the render system calls
//! at the top of each frame after comparing sizes. Nothing else may touch it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::resources::{GpuResources, TextureId};
use crate::texture::{create_depth_texture, create_white_texture};
use crate::{FrameError, GpuError};

/// Configuration for [`GpuContext::new`].
#[derive(Clone, Debug)]
pub struct ContextConfig {
    /// Present mode for the surface
    pub present_mode: wgpu::PresentMode,
    /// Force a specific surface format instead of the sRGB-preferring pick
    pub texture_format: Option<wgpu::TextureFormat>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            present_mode: wgpu::PresentMode::AutoVsync,
            texture_format: None,
        }
    }
}

/// An in-flight frame: the acquired swapchain texture and the command encoder
/// recording into it. Hand it back to [`GpuContext::end_frame`] to submit and
/// present; dropping it instead abandons the frame.
pub struct Frame {
    /// Command encoder for this frame's passes
    pub encoder: wgpu::CommandEncoder,
    /// View of the swapchain texture
    pub target: wgpu::TextureView,
    surface_texture: wgpu::SurfaceTexture,
}

/// Process-wide GPU state.
pub struct GpuContext {
    /// Logical device, shared with everything that creates GPU objects
    pub device: Arc<wgpu::Device>,
    /// Submission queue
    pub queue: Arc<wgpu::Queue>,
    /// Table of component-owned GPU objects
    pub resources: GpuResources,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    white_texture: TextureId,
    default_sampler: wgpu::Sampler,
}

impl GpuContext {
    /// Backend selection matching the platform's native API. Cuts startup
    /// time by not probing driver stacks that will never be used.
    fn preferred_backends() -> wgpu::Backends {
        #[cfg(target_os = "macos")]
        {
            wgpu::Backends::METAL
        }
        #[cfg(target_os = "windows")]
        {
            wgpu::Backends::DX12
        }
        #[cfg(target_os = "linux")]
        {
            wgpu::Backends::VULKAN
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            wgpu::Backends::PRIMARY
        }
    }

    /// Create the context for a window.
    ///
    /// `width`/`height` are the initial inner size in physical pixels.
    pub async fn new<W>(
        window: Arc<W>,
        width: u32,
        height: u32,
        config: ContextConfig,
    ) -> Result<Self, GpuError>
    where
        W: raw_window_handle::HasWindowHandle
            + raw_window_handle::HasDisplayHandle
            + Send
            + Sync
            + 'static,
    {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: Self::preferred_backends(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::AdapterNotFound)?;
        debug!(adapter = ?adapter.get_info().name, "selected adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Lumina Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let caps = surface.get_capabilities(&adapter);
        debug!(formats = ?caps.formats, "surface capabilities");
        if caps.formats.is_empty() {
            return Err(GpuError::NoSurfaceFormat);
        }
        let format = config.texture_format.unwrap_or_else(|| {
            caps.formats
                .iter()
                .find(|f| f.is_srgb())
                .copied()
                .unwrap_or(caps.formats[0])
        });
        debug!(?format, "selected surface format");

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: config.present_mode,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);

        let depth = create_depth_texture(&device, surface_config.width, surface_config.height);
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        let mut resources = GpuResources::new();
        let white = create_white_texture(&device, &queue);
        let white_texture = resources.insert_texture(white);

        let default_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("default sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            device,
            queue,
            resources,
            surface,
            config: surface_config,
            depth_view,
            depth_size: (width.max(1), height.max(1)),
            white_texture,
            default_sampler,
        })
    }

    /// Record a new window size. The surface is reconfigured immediately; the
    /// depth target catches up at the next frame's resize step.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Recreate the depth target if the surface size changed since it was
    /// last built. Called once per frame by the render system; the sole
    /// mutator of the depth target.
    pub fn ensure_depth_target(&mut self) {
        let size = (self.config.width, self.config.height);
        if size == self.depth_size {
            return;
        }
        debug!(from = ?self.depth_size, to = ?size, "resizing depth target");
        let depth = create_depth_texture(&self.device, size.0, size.1);
        self.depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth_size = size;
    }

    /// Acquire the swapchain texture and a command encoder for one frame.
    ///
    /// On an outdated/lost surface the swapchain is reconfigured so the next
    /// frame can proceed, and the current frame is still reported failed.
    pub fn begin_frame(&mut self) -> Result<Frame, FrameError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(e @ (wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost)) => {
                warn!("surface {e}, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Err(FrameError::Acquire(e));
            }
            Err(e) => return Err(FrameError::Acquire(e)),
        };
        let target = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        Ok(Frame {
            encoder,
            target,
            surface_texture,
        })
    }

    /// Submit the frame's commands and present.
    pub fn end_frame(&mut self, frame: Frame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.surface_texture.present();
    }

    /// Surface format pipelines must target
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Width / height of the current surface
    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Depth attachment view for the main pass
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Size the depth target was last built at
    pub fn depth_size(&self) -> (u32, u32) {
        self.depth_size
    }

    /// Shared 1x1 opaque white texture
    pub fn white_texture(&self) -> TextureId {
        self.white_texture
    }

    /// Shared linear sampler
    pub fn default_sampler(&self) -> &wgpu::Sampler {
        &self.default_sampler
    }
}
