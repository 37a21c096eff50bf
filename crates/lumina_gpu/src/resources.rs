//! GPU resource table
//!
//! Buffers, textures, shaders and pipelines owned by components live in one
//! central table and are referenced by typed slotmap keys. The table is the
//! single place where wgpu objects are created and dropped, which gives the
//! engine its release-exactly-once discipline: removing a key drops the
//! object, removing it again is a visible no-op (the key's version never
//! matches a reused slot).
//!
//! Component teardown in `lumina_3d` goes through the [`ResourceHost`] trait
//! rather than the concrete table, so tests can swap in a counting mock and
//! assert that a destroyed entity released each of its handles exactly once.

use slotmap::{new_key_type, SlotMap};
use wgpu::util::DeviceExt;

new_key_type! {
    /// Handle to a GPU buffer in the resource table
    pub struct BufferId;
    /// Handle to a GPU texture (and its default view)
    pub struct TextureId;
    /// Handle to a compiled shader module
    pub struct ShaderId;
    /// Handle to a built render pipeline
    pub struct PipelineId;
}

/// A texture plus the default view used for binding.
pub struct TextureEntry {
    /// The underlying texture
    pub texture: wgpu::Texture,
    /// Full-resource view, suitable for sampling or attachment
    pub view: wgpu::TextureView,
}

/// Release side of the resource table.
///
/// The entity-destroy cascade only ever needs to give handles back, so it is
/// written against this trait instead of [`GpuResources`] directly. Each
/// method returns whether the handle was still live; releasing twice returns
/// `false` and does nothing.
pub trait ResourceHost {
    /// Release a buffer handle
    fn release_buffer(&mut self, id: BufferId) -> bool;
    /// Release a texture handle
    fn release_texture(&mut self, id: TextureId) -> bool;
    /// Release a shader handle
    fn release_shader(&mut self, id: ShaderId) -> bool;
    /// Release a pipeline handle
    fn release_pipeline(&mut self, id: PipelineId) -> bool;
}

/// Central table of GPU objects, keyed by typed ids.
pub struct GpuResources {
    buffers: SlotMap<BufferId, wgpu::Buffer>,
    textures: SlotMap<TextureId, TextureEntry>,
    shaders: SlotMap<ShaderId, wgpu::ShaderModule>,
    pipelines: SlotMap<PipelineId, wgpu::RenderPipeline>,
}

impl Default for GpuResources {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuResources {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            buffers: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            shaders: SlotMap::with_key(),
            pipelines: SlotMap::with_key(),
        }
    }

    /// Create a vertex buffer initialized with `contents`
    pub fn create_vertex_buffer(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        contents: &[u8],
    ) -> BufferId {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.buffers.insert(buffer)
    }

    /// Create an index buffer initialized with `contents`
    pub fn create_index_buffer(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        contents: &[u8],
    ) -> BufferId {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::INDEX,
        });
        self.buffers.insert(buffer)
    }

    /// Create an uninitialized buffer of `size` bytes (overlay quad storage,
    /// rewritten every frame via `Queue::write_buffer`)
    pub fn create_buffer(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> BufferId {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        });
        self.buffers.insert(buffer)
    }

    /// Take ownership of an already-created texture
    pub fn insert_texture(&mut self, texture: wgpu::Texture) -> TextureId {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.textures.insert(TextureEntry { texture, view })
    }

    /// Compile a WGSL shader module
    pub fn create_shader(&mut self, device: &wgpu::Device, label: &str, wgsl: &str) -> ShaderId {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(wgsl.into()),
        });
        self.shaders.insert(module)
    }

    /// Take ownership of an already-compiled shader module
    pub fn insert_shader(&mut self, module: wgpu::ShaderModule) -> ShaderId {
        self.shaders.insert(module)
    }

    /// Take ownership of an already-built pipeline
    pub fn insert_pipeline(&mut self, pipeline: wgpu::RenderPipeline) -> PipelineId {
        self.pipelines.insert(pipeline)
    }

    /// Look up a buffer; `None` for released or never-issued ids
    pub fn buffer(&self, id: BufferId) -> Option<&wgpu::Buffer> {
        self.buffers.get(id)
    }

    /// Look up a texture entry
    pub fn texture(&self, id: TextureId) -> Option<&TextureEntry> {
        self.textures.get(id)
    }

    /// Look up a shader module
    pub fn shader(&self, id: ShaderId) -> Option<&wgpu::ShaderModule> {
        self.shaders.get(id)
    }

    /// Look up a pipeline
    pub fn pipeline(&self, id: PipelineId) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(id)
    }

    /// Number of live buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of live shaders
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Number of live pipelines
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }
}

impl ResourceHost for GpuResources {
    fn release_buffer(&mut self, id: BufferId) -> bool {
        self.buffers.remove(id).is_some()
    }

    fn release_texture(&mut self, id: TextureId) -> bool {
        self.textures.remove(id).is_some()
    }

    fn release_shader(&mut self, id: ShaderId) -> bool {
        self.shaders.remove(id).is_some()
    }

    fn release_pipeline(&mut self, id: PipelineId) -> bool {
        self.pipelines.remove(id).is_some()
    }
}
