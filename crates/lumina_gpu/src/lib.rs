//! # Lumina GPU
//!
//! Device, surface and resource-lifetime management for the Lumina engine.
//!
//! This crate owns everything that exists exactly once per process on the GPU
//! side:
//! - [`GpuContext`]: instance/adapter/device/queue, the window surface and its
//!   configuration, the depth target, the shared 1x1 white fallback texture
//!   and the default sampler.
//! - [`GpuResources`]: a slotmap-backed table of buffers, textures, shaders
//!   and render pipelines. Components in `lumina_3d` store the typed ids
//!   handed out by this table instead of raw wgpu objects, so ownership and
//!   release-exactly-once can be checked at the seam (see [`ResourceHost`]).
//!
//! Frame flow: [`GpuContext::begin_frame`] acquires the swapchain texture and
//! a command encoder, [`GpuContext::end_frame`] submits and presents. A failed
//! acquire is fatal for that frame only; the caller logs it and skips.

pub mod context;
pub mod resources;
pub mod texture;

pub use context::{ContextConfig, Frame, GpuContext};
pub use resources::{
    BufferId, GpuResources, PipelineId, ResourceHost, ShaderId, TextureEntry, TextureId,
};
pub use texture::{create_depth_texture, create_rgba_texture, create_white_texture, DEPTH_FORMAT};

use thiserror::Error;

/// Errors raised while bringing up the GPU context.
#[derive(Error, Debug)]
pub enum GpuError {
    /// No adapter matched the requested backends/surface
    #[error("no suitable GPU adapter found")]
    AdapterNotFound,
    /// Device request was rejected by the adapter
    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    /// Surface creation from the window handle failed
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    /// The adapter reported no usable surface formats
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Per-frame errors. None of these are fatal to the process: the render loop
/// logs them and skips the frame.
#[derive(Error, Debug)]
pub enum FrameError {
    /// Swapchain texture acquisition failed (lost/outdated/timeout)
    #[error("failed to acquire swapchain texture: {0}")]
    Acquire(#[from] wgpu::SurfaceError),
}
