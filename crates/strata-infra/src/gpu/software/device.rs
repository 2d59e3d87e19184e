// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::bindings::BoundResources;
use super::command::{RecordedCommand, SoftwareCommandList, SubmissionRecord};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use strata_core::gpu::*;
use strata_core::math::{Extent2D, Extent3D, Origin2D};

#[derive(Debug, Clone)]
pub(crate) struct TextureEntry {
    pub(crate) label: Option<String>,
    pub(crate) size: Extent3D,
    pub(crate) format: TextureFormat,
    pub(crate) texels: Vec<u32>,
}

#[derive(Debug)]
struct BufferEntry {
    label: Option<String>,
    usage: BufferUsage,
    data: Vec<u8>,
}

#[derive(Debug)]
struct BindGroupRecord {
    pipeline: ComputePipelineId,
    entries: Vec<BindGroupEntry>,
}

#[derive(Debug)]
struct PipelineEntry {
    kernel: Arc<dyn ComputeKernel>,
}

/// This struct holds all the resource tables, protected by an Arc.
#[derive(Debug)]
pub(crate) struct SoftwareDeviceInternal {
    kernels: RwLock<HashMap<String, Arc<dyn ComputeKernel>>>,
    broken_pipelines: Mutex<HashMap<String, String>>,
    pipeline_names: Mutex<HashMap<String, ComputePipelineId>>,
    pipelines: Mutex<HashMap<ComputePipelineId, PipelineEntry>>,
    textures: Mutex<HashMap<TextureId, TextureEntry>>,
    buffers: Mutex<HashMap<BufferId, BufferEntry>>,
    samplers: Mutex<HashMap<SamplerId, SamplerDescriptor<'static>>>,
    bind_groups: Mutex<HashMap<BindGroupId, BindGroupRecord>>,

    next_texture_id: AtomicUsize,
    next_buffer_id: AtomicUsize,
    next_sampler_id: AtomicUsize,
    next_bind_group_id: AtomicUsize,
    next_pipeline_id: AtomicU64,
    next_command_list_id: AtomicU64,
    next_submission_id: AtomicU64,

    resource_limit: AtomicUsize,
    fail_submissions: AtomicBool,
    submissions: Mutex<Vec<SubmissionRecord>>,
    barriers_executed: AtomicUsize,
}

/// A CPU implementation of [`GpuBackend`].
///
/// Cloning is cheap and every clone shares the same resource tables.
/// Commands execute synchronously inside [`GpuBackend::submit`], in recording
/// order, so `wait` never blocks.
#[derive(Debug, Clone)]
pub struct SoftwareDevice {
    internal: Arc<SoftwareDeviceInternal>,
}

impl Default for SoftwareDevice {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, ResourceError> {
    mutex
        .lock()
        .map_err(|e| ResourceError::BackendError(format!("Mutex poisoned ({what}): {e}")))
}

fn texels_from_bytes(data: &[u8]) -> impl Iterator<Item = u32> + '_ {
    data.chunks_exact(4)
        .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
}

impl SoftwareDevice {
    /// Creates an empty device with no kernels registered.
    pub fn new() -> Self {
        Self {
            internal: Arc::new(SoftwareDeviceInternal {
                kernels: RwLock::new(HashMap::new()),
                broken_pipelines: Mutex::new(HashMap::new()),
                pipeline_names: Mutex::new(HashMap::new()),
                pipelines: Mutex::new(HashMap::new()),
                textures: Mutex::new(HashMap::new()),
                buffers: Mutex::new(HashMap::new()),
                samplers: Mutex::new(HashMap::new()),
                bind_groups: Mutex::new(HashMap::new()),
                next_texture_id: AtomicUsize::new(0),
                next_buffer_id: AtomicUsize::new(0),
                next_sampler_id: AtomicUsize::new(0),
                next_bind_group_id: AtomicUsize::new(0),
                next_pipeline_id: AtomicU64::new(0),
                next_command_list_id: AtomicU64::new(0),
                next_submission_id: AtomicU64::new(1),
                resource_limit: AtomicUsize::new(usize::MAX),
                fail_submissions: AtomicBool::new(false),
                submissions: Mutex::new(Vec::new()),
                barriers_executed: AtomicUsize::new(0),
            }),
        }
    }

    /// Makes a kernel available as a compute pipeline under its name.
    pub fn register_kernel(&self, kernel: Arc<dyn ComputeKernel>) {
        let name = kernel.name().to_string();
        match self.internal.kernels.write() {
            Ok(mut kernels) => {
                log::debug!("SoftwareDevice: Registered kernel '{name}'");
                kernels.insert(name, kernel);
            }
            Err(e) => log::error!("SoftwareDevice: Kernel registry poisoned: {e}"),
        }
    }

    /// Makes pipeline creation for `shader` fail with `CompilationFailed`.
    pub fn mark_pipeline_broken(&self, shader: &str, details: &str) {
        if let Ok(mut broken) = lock(&self.internal.broken_pipelines, "broken_pipelines") {
            broken.insert(shader.to_string(), details.to_string());
        }
    }

    /// Caps the number of live resources; creations beyond it fail with
    /// `ResourceError::OutOfMemory`. `None` removes the cap.
    pub fn set_resource_limit(&self, limit: Option<usize>) {
        self.internal
            .resource_limit
            .store(limit.unwrap_or(usize::MAX), Ordering::SeqCst);
    }

    /// Makes every following `submit` fail until reset.
    pub fn set_fail_submissions(&self, fail: bool) {
        self.internal.fail_submissions.store(fail, Ordering::SeqCst);
    }

    /// Returns `true` if the handle names a live resource.
    pub fn is_alive(&self, resource: GpuResource) -> bool {
        let alive = match resource {
            GpuResource::Texture(id) => {
                lock(&self.internal.textures, "textures").map(|t| t.contains_key(&id))
            }
            GpuResource::Buffer(id) => {
                lock(&self.internal.buffers, "buffers").map(|b| b.contains_key(&id))
            }
            GpuResource::Sampler(id) => {
                lock(&self.internal.samplers, "samplers").map(|s| s.contains_key(&id))
            }
            GpuResource::BindGroup(id) => {
                lock(&self.internal.bind_groups, "bind_groups").map(|b| b.contains_key(&id))
            }
        };
        alive.unwrap_or(false)
    }

    /// The number of live textures, buffers, samplers, and bind groups.
    pub fn live_resource_count(&self) -> usize {
        let textures = lock(&self.internal.textures, "textures").map_or(0, |t| t.len());
        let buffers = lock(&self.internal.buffers, "buffers").map_or(0, |b| b.len());
        let samplers = lock(&self.internal.samplers, "samplers").map_or(0, |s| s.len());
        let groups = lock(&self.internal.bind_groups, "bind_groups").map_or(0, |b| b.len());
        textures + buffers + samplers + groups
    }

    /// The size of a live texture.
    pub fn texture_extent(&self, id: TextureId) -> Result<Extent3D, ResourceError> {
        let textures = lock(&self.internal.textures, "textures")?;
        textures
            .get(&id)
            .map(|t| t.size)
            .ok_or(ResourceError::NotFound)
    }

    /// Reads one layer of a texture as floats.
    pub fn read_texture_f32(&self, id: TextureId, layer: u32) -> Result<Vec<f32>, ResourceError> {
        self.read_texture_bits(id, layer)
            .map(|bits| bits.into_iter().map(f32::from_bits).collect())
    }

    /// Reads one layer of a texture as raw 32-bit texels.
    pub fn read_texture_bits(&self, id: TextureId, layer: u32) -> Result<Vec<u32>, ResourceError> {
        let textures = lock(&self.internal.textures, "textures")?;
        let entry = textures.get(&id).ok_or(ResourceError::NotFound)?;
        if layer >= entry.size.depth_or_array_layers {
            return Err(ResourceError::OutOfBounds);
        }
        let per_layer = entry.size.texels_per_layer();
        let start = layer as usize * per_layer;
        Ok(entry.texels[start..start + per_layer].to_vec())
    }

    /// Reads the contents of a buffer.
    pub fn read_buffer(&self, id: BufferId) -> Result<Vec<u8>, ResourceError> {
        let buffers = lock(&self.internal.buffers, "buffers")?;
        buffers
            .get(&id)
            .map(|b| b.data.clone())
            .ok_or(ResourceError::NotFound)
    }

    /// Every submission so far, oldest first.
    pub fn submissions(&self) -> Vec<SubmissionRecord> {
        lock(&self.internal.submissions, "submissions")
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// The number of barriers executed across all submissions.
    pub fn barriers_executed(&self) -> usize {
        self.internal.barriers_executed.load(Ordering::SeqCst)
    }

    fn check_capacity(&self, requested: impl FnOnce() -> String) -> Result<(), ResourceError> {
        let limit = self.internal.resource_limit.load(Ordering::SeqCst);
        if self.live_resource_count() >= limit {
            let requested = requested();
            log::warn!("SoftwareDevice: Resource limit {limit} reached allocating {requested}");
            return Err(ResourceError::OutOfMemory { requested });
        }
        Ok(())
    }

    fn execute(&self, commands: &[RecordedCommand]) -> Result<(), ResourceError> {
        for command in commands {
            match command {
                RecordedCommand::Copy(copy) => self.execute_copy(copy)?,
                RecordedCommand::Dispatch(dispatch) => self.execute_dispatch(dispatch)?,
                RecordedCommand::Barrier => {
                    self.internal.barriers_executed.fetch_add(1, Ordering::SeqCst);
                }
            }
        }
        Ok(())
    }

    fn execute_copy(&self, copy: &TextureCopy) -> Result<(), ResourceError> {
        let mut textures = lock(&self.internal.textures, "textures")?;
        let (w, h) = (copy.extent.width as usize, copy.extent.height as usize);

        let source = textures.get(&copy.source).ok_or_else(|| {
            log::warn!("SoftwareDevice: Copy source {:?} not found.", copy.source);
            ResourceError::NotFound
        })?;
        if !region_fits(source.size, copy.source_layer, copy.source_origin, copy.extent) {
            return Err(ResourceError::OutOfBounds);
        }
        let src_width = source.size.width as usize;
        let src_base = copy.source_layer as usize * source.size.texels_per_layer();
        let mut staged = Vec::with_capacity(w * h);
        for row in 0..h {
            let start = src_base
                + (copy.source_origin.y as usize + row) * src_width
                + copy.source_origin.x as usize;
            staged.extend_from_slice(&source.texels[start..start + w]);
        }

        let destination = textures.get_mut(&copy.destination).ok_or_else(|| {
            log::warn!(
                "SoftwareDevice: Copy destination {:?} not found.",
                copy.destination
            );
            ResourceError::NotFound
        })?;
        if !region_fits(
            destination.size,
            copy.destination_layer,
            copy.destination_origin,
            copy.extent,
        ) {
            return Err(ResourceError::OutOfBounds);
        }
        let dst_width = destination.size.width as usize;
        let dst_base = copy.destination_layer as usize * destination.size.texels_per_layer();
        for (row, texels) in staged.chunks_exact(w.max(1)).enumerate().take(h) {
            let start = dst_base
                + (copy.destination_origin.y as usize + row) * dst_width
                + copy.destination_origin.x as usize;
            destination.texels[start..start + w].copy_from_slice(texels);
        }
        Ok(())
    }

    fn execute_dispatch(&self, dispatch: &DispatchCommand) -> Result<(), ResourceError> {
        let kernel = lock(&self.internal.pipelines, "pipelines")?
            .get(&dispatch.pipeline)
            .map(|p| p.kernel.clone())
            .ok_or_else(|| {
                log::warn!(
                    "SoftwareDevice: ComputePipelineId {:?} not found.",
                    dispatch.pipeline
                );
                ResourceError::NotFound
            })?;
        let entries = {
            let groups = lock(&self.internal.bind_groups, "bind_groups")?;
            let group = groups.get(&dispatch.bind_group).ok_or_else(|| {
                log::warn!(
                    "SoftwareDevice: BindGroupId {:?} not found.",
                    dispatch.bind_group
                );
                ResourceError::NotFound
            })?;
            if group.pipeline != dispatch.pipeline {
                return Err(ResourceError::BackendError(format!(
                    "bind group {:?} was created for pipeline {:?}, not {:?}",
                    dispatch.bind_group, group.pipeline, dispatch.pipeline
                )));
            }
            group.entries.clone()
        };

        let mut bound = BoundResources::default();
        let mut missing = None;
        {
            let buffers = lock(&self.internal.buffers, "buffers")?;
            for entry in &entries {
                if let BindingResource::Buffer { buffer, .. } = entry.resource {
                    match buffers.get(&buffer) {
                        Some(b) => bound.bind_buffer(entry.binding, b.data.clone()),
                        None => missing = Some(GpuResource::Buffer(buffer)),
                    }
                }
            }
        }

        let mut textures = lock(&self.internal.textures, "textures")?;
        for entry in &entries {
            let (id, writable) = match entry.resource {
                BindingResource::StorageImage(id) => (id, true),
                BindingResource::SampledImage { texture, .. } => (texture, false),
                BindingResource::Buffer { .. } => continue,
            };
            if !bound.bind_image(entry.binding, id, writable, || textures.remove(&id)) {
                missing = Some(GpuResource::Texture(id));
            }
        }

        let result = match missing {
            Some(resource) => {
                log::warn!("SoftwareDevice: Bound {resource} no longer exists.");
                Err(ResourceError::NotFound)
            }
            None => run_invocations(kernel.as_ref(), dispatch, &mut bound),
        };

        for (id, entry) in bound.into_images() {
            textures.insert(id, entry);
        }
        result
    }
}

fn region_fits(size: Extent3D, layer: u32, origin: Origin2D, extent: Extent2D) -> bool {
    layer < size.depth_or_array_layers
        && origin.x as u64 + extent.width as u64 <= size.width as u64
        && origin.y as u64 + extent.height as u64 <= size.height as u64
}

fn run_invocations(
    kernel: &dyn ComputeKernel,
    dispatch: &DispatchCommand,
    resources: &mut BoundResources,
) -> Result<(), ResourceError> {
    let [gx, gy, gz] = dispatch.workgroups;
    for z in 0..gz {
        for y in 0..gy * WORKGROUP_SIZE {
            for x in 0..gx * WORKGROUP_SIZE {
                let invocation = KernelInvocation {
                    global_id: [x, y, z],
                };
                kernel
                    .invoke(invocation, &dispatch.parameters, resources)
                    .map_err(|e| {
                        log::error!(
                            "SoftwareDevice: Kernel '{}' failed at {:?}: {e}",
                            kernel.name(),
                            invocation.global_id
                        );
                        ResourceError::Kernel(e)
                    })?;
            }
        }
    }
    Ok(())
}

impl GpuBackend for SoftwareDevice {
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        self.check_capacity(|| format!("texture {:?}", descriptor.label))?;
        let size = descriptor.size;
        let texel_count = size.texels_per_layer() * size.depth_or_array_layers as usize;
        let id = TextureId(self.internal.next_texture_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.internal.textures, "textures")?.insert(
            id,
            TextureEntry {
                label: descriptor.label.as_deref().map(str::to_string),
                size,
                format: descriptor.format,
                texels: vec![0; texel_count],
            },
        );
        log::debug!(
            "SoftwareDevice: Created texture {:?} ({}x{}x{} {:?}) with ID: {id:?}",
            descriptor.label,
            size.width,
            size.height,
            size.depth_or_array_layers,
            descriptor.format
        );
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let mut textures = lock(&self.internal.textures, "textures")?;
        match textures.remove(&id) {
            Some(entry) => {
                log::debug!(
                    "SoftwareDevice: Destroyed texture {:?} with ID: {id:?}",
                    entry.label
                );
                Ok(())
            }
            None => Err(ResourceError::NotFound),
        }
    }

    fn write_texture(&self, id: TextureId, layer: u32, data: &[u8]) -> Result<(), ResourceError> {
        let mut textures = lock(&self.internal.textures, "textures")?;
        let entry = textures.get_mut(&id).ok_or(ResourceError::NotFound)?;
        if layer >= entry.size.depth_or_array_layers {
            return Err(ResourceError::OutOfBounds);
        }
        let per_layer = entry.size.texels_per_layer();
        let expected = (per_layer * entry.format.bytes_per_texel() as usize) as u64;
        if data.len() as u64 != expected {
            return Err(ResourceError::SizeMismatch {
                expected,
                actual: data.len() as u64,
            });
        }
        let start = layer as usize * per_layer;
        for (dst, texel) in entry.texels[start..start + per_layer]
            .iter_mut()
            .zip(texels_from_bytes(data))
        {
            *dst = texel;
        }
        Ok(())
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        if descriptor.size != data.len() as u64 {
            return Err(ResourceError::SizeMismatch {
                expected: descriptor.size,
                actual: data.len() as u64,
            });
        }
        self.check_capacity(|| format!("buffer {:?} ({} bytes)", descriptor.label, data.len()))?;
        let id = BufferId(self.internal.next_buffer_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.internal.buffers, "buffers")?.insert(
            id,
            BufferEntry {
                label: descriptor.label.as_deref().map(str::to_string),
                usage: descriptor.usage,
                data: data.to_vec(),
            },
        );
        log::debug!(
            "SoftwareDevice: Created buffer {:?} ({} bytes) with ID: {id:?}",
            descriptor.label,
            data.len()
        );
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let mut buffers = lock(&self.internal.buffers, "buffers")?;
        match buffers.remove(&id) {
            Some(entry) => {
                log::debug!(
                    "SoftwareDevice: Destroyed buffer {:?} ({:?}) with ID: {id:?}",
                    entry.label,
                    entry.usage
                );
                Ok(())
            }
            None => Err(ResourceError::NotFound),
        }
    }

    fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<SamplerId, ResourceError> {
        self.check_capacity(|| format!("sampler {:?}", descriptor.label))?;
        let id = SamplerId(self.internal.next_sampler_id.fetch_add(1, Ordering::Relaxed));
        let owned = SamplerDescriptor {
            label: descriptor
                .label
                .as_deref()
                .map(|l| std::borrow::Cow::Owned(l.to_string())),
            address_mode_u: descriptor.address_mode_u,
            address_mode_v: descriptor.address_mode_v,
            mag_filter: descriptor.mag_filter,
            min_filter: descriptor.min_filter,
        };
        lock(&self.internal.samplers, "samplers")?.insert(id, owned);
        Ok(id)
    }

    fn destroy_sampler(&self, id: SamplerId) -> Result<(), ResourceError> {
        match lock(&self.internal.samplers, "samplers")?.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ResourceError::NotFound),
        }
    }

    fn compute_pipeline(&self, shader: &str) -> Result<ComputePipelineId, PipelineError> {
        let poisoned = |what: &str| PipelineError::CompilationFailed {
            name: shader.to_string(),
            details: format!("{what} lock poisoned"),
        };

        let mut names = self
            .internal
            .pipeline_names
            .lock()
            .map_err(|_| poisoned("pipeline_names"))?;
        if let Some(id) = names.get(shader) {
            return Ok(*id);
        }

        let kernel = self
            .internal
            .kernels
            .read()
            .map_err(|_| poisoned("kernels"))?
            .get(shader)
            .cloned()
            .ok_or_else(|| {
                log::error!("SoftwareDevice: No kernel registered for shader '{shader}'");
                PipelineError::ShaderNotFound {
                    name: shader.to_string(),
                }
            })?;

        if let Some(details) = self
            .internal
            .broken_pipelines
            .lock()
            .map_err(|_| poisoned("broken_pipelines"))?
            .get(shader)
        {
            return Err(PipelineError::CompilationFailed {
                name: shader.to_string(),
                details: details.clone(),
            });
        }

        let id = ComputePipelineId(self.internal.next_pipeline_id.fetch_add(1, Ordering::Relaxed));
        self.internal
            .pipelines
            .lock()
            .map_err(|_| poisoned("pipelines"))?
            .insert(id, PipelineEntry { kernel });
        names.insert(shader.to_string(), id);
        log::info!("SoftwareDevice: Built compute pipeline '{shader}' with ID: {id:?}");
        Ok(id)
    }

    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError> {
        if !lock(&self.internal.pipelines, "pipelines")?.contains_key(&descriptor.pipeline) {
            return Err(ResourceError::NotFound);
        }
        let mut seen = HashSet::new();
        for entry in descriptor.entries {
            if !seen.insert(entry.binding) {
                return Err(ResourceError::BackendError(format!(
                    "binding {} appears twice in bind group {:?}",
                    entry.binding, descriptor.label
                )));
            }
            let alive = match entry.resource {
                BindingResource::StorageImage(texture) => {
                    self.is_alive(GpuResource::Texture(texture))
                }
                BindingResource::SampledImage { texture, sampler } => {
                    self.is_alive(GpuResource::Texture(texture))
                        && sampler.map_or(true, |s| self.is_alive(GpuResource::Sampler(s)))
                }
                BindingResource::Buffer { buffer, .. } => self.is_alive(GpuResource::Buffer(buffer)),
            };
            if !alive {
                log::warn!(
                    "SoftwareDevice: Bind group {:?} references a missing resource at binding {}",
                    descriptor.label,
                    entry.binding
                );
                return Err(ResourceError::NotFound);
            }
        }
        self.check_capacity(|| format!("bind group {:?}", descriptor.label))?;

        let id = BindGroupId(self.internal.next_bind_group_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.internal.bind_groups, "bind_groups")?.insert(
            id,
            BindGroupRecord {
                pipeline: descriptor.pipeline,
                entries: descriptor.entries.to_vec(),
            },
        );
        Ok(id)
    }

    fn destroy_bind_group(&self, id: BindGroupId) -> Result<(), ResourceError> {
        match lock(&self.internal.bind_groups, "bind_groups")?.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ResourceError::NotFound),
        }
    }

    fn create_command_list(&self, label: Option<&str>) -> Box<dyn CommandList> {
        let id = CommandListId(
            self.internal
                .next_command_list_id
                .fetch_add(1, Ordering::Relaxed),
        );
        Box::new(SoftwareCommandList::new(id, label))
    }

    fn submit(&self, commands: Box<dyn CommandList>) -> Result<SubmissionId, ResourceError> {
        let list = commands
            .into_any()
            .downcast::<SoftwareCommandList>()
            .map_err(|_| {
                ResourceError::BackendError(
                    "command list was not created by this device".to_string(),
                )
            })?;

        if self.internal.fail_submissions.load(Ordering::SeqCst) {
            return Err(ResourceError::BackendError(
                "device lost during submission".to_string(),
            ));
        }

        let id = SubmissionId(
            self.internal
                .next_submission_id
                .fetch_add(1, Ordering::Relaxed),
        );
        log::trace!(
            "SoftwareDevice: Executing submission {id:?} ({:?}, {} commands)",
            list.label,
            list.commands.len()
        );
        let result = self.execute(&list.commands);
        lock(&self.internal.submissions, "submissions")?.push(SubmissionRecord {
            id,
            label: list.label,
            commands: list.commands,
        });
        result.map(|_| id)
    }

    fn wait(&self, submission: SubmissionId) -> Result<(), ResourceError> {
        if submission.0 == 0
            || submission.0 >= self.internal.next_submission_id.load(Ordering::SeqCst)
        {
            return Err(ResourceError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(device: &SoftwareDevice, w: u32, h: u32, layers: u32) -> TextureId {
        device
            .create_texture(&TextureDescriptor {
                label: None,
                size: Extent3D::new(w, h, layers),
                dimension: if layers > 1 {
                    TextureDimension::D2Array
                } else {
                    TextureDimension::D2
                },
                format: TextureFormat::R32Float,
                usage: TextureUsage::COPY_SRC | TextureUsage::COPY_DST,
            })
            .unwrap()
    }

    #[test]
    fn write_then_read_layer() {
        let device = SoftwareDevice::new();
        let tex = texture(&device, 2, 2, 2);
        let values = [1.0f32, 2.0, 3.0, 4.0];
        device
            .write_texture(tex, 1, bytemuck::cast_slice(&values))
            .unwrap();
        assert_eq!(device.read_texture_f32(tex, 1).unwrap(), values.to_vec());
        assert_eq!(device.read_texture_f32(tex, 0).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn write_rejects_wrong_size() {
        let device = SoftwareDevice::new();
        let tex = texture(&device, 2, 2, 1);
        let err = device.write_texture(tex, 0, &[0u8; 12]).unwrap_err();
        assert_eq!(
            err,
            ResourceError::SizeMismatch {
                expected: 16,
                actual: 12
            }
        );
    }

    #[test]
    fn copy_into_array_layer() {
        let device = SoftwareDevice::new();
        let src = texture(&device, 2, 2, 1);
        let dst = texture(&device, 2, 2, 3);
        device
            .write_texture(src, 0, bytemuck::cast_slice(&[5.0f32, 6.0, 7.0, 8.0]))
            .unwrap();
        let mut list = device.create_command_list(Some("copy"));
        list.copy_texture_to_texture(&TextureCopy {
            source: src,
            source_layer: 0,
            source_origin: Origin2D::ZERO,
            destination: dst,
            destination_layer: 2,
            destination_origin: Origin2D::ZERO,
            extent: Extent2D::new(2, 2),
        });
        list.barrier();

        let submission = device.submit(list).unwrap();
        device.wait(submission).unwrap();

        assert_eq!(
            device.read_texture_f32(dst, 2).unwrap(),
            vec![5.0, 6.0, 7.0, 8.0]
        );
        assert_eq!(device.barriers_executed(), 1);
        assert_eq!(device.submissions().len(), 1);
    }

    #[test]
    fn unregistered_kernel_is_shader_not_found() {
        let device = SoftwareDevice::new();
        assert_eq!(
            device.compute_pipeline("erode"),
            Err(PipelineError::ShaderNotFound {
                name: "erode".to_string()
            })
        );
    }

    #[test]
    fn resource_limit_simulates_out_of_memory() {
        let device = SoftwareDevice::new();
        device.set_resource_limit(Some(1));
        let first = texture(&device, 1, 1, 1);
        let second = device.create_texture(&TextureDescriptor {
            label: Some("overflow".into()),
            size: Extent3D::new(1, 1, 1),
            dimension: TextureDimension::D2,
            format: TextureFormat::R32Float,
            usage: TextureUsage::empty(),
        });
        assert!(matches!(second, Err(ResourceError::OutOfMemory { .. })));
        device.destroy_texture(first).unwrap();
        assert_eq!(device.live_resource_count(), 0);
    }
}
