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

use super::device::TextureEntry;
use std::collections::HashMap;
use strata_core::gpu::{KernelError, KernelResources, TextureId};
use strata_core::math::Extent3D;

#[derive(Debug, Clone, Copy)]
enum Slot {
    Image { index: usize, writable: bool },
    Buffer { index: usize },
}

/// The resources of one dispatch, checked out of the device's tables while
/// the kernel runs.
#[derive(Debug, Default)]
pub(crate) struct BoundResources {
    slots: HashMap<u32, Slot>,
    images: Vec<(TextureId, TextureEntry)>,
    buffers: Vec<Vec<u8>>,
}

impl BoundResources {
    /// Binds a texture at `binding`. A texture bound at several slots is
    /// checked out once; `take` is only called the first time.
    pub(crate) fn bind_image(
        &mut self,
        binding: u32,
        id: TextureId,
        writable: bool,
        take: impl FnOnce() -> Option<TextureEntry>,
    ) -> bool {
        let index = match self.images.iter().position(|(bound, _)| *bound == id) {
            Some(index) => index,
            None => match take() {
                Some(entry) => {
                    self.images.push((id, entry));
                    self.images.len() - 1
                }
                None => return false,
            },
        };
        self.slots.insert(binding, Slot::Image { index, writable });
        true
    }

    pub(crate) fn bind_buffer(&mut self, binding: u32, data: Vec<u8>) {
        self.buffers.push(data);
        self.slots.insert(
            binding,
            Slot::Buffer {
                index: self.buffers.len() - 1,
            },
        );
    }

    /// Returns the checked-out textures to their owner.
    pub(crate) fn into_images(self) -> Vec<(TextureId, TextureEntry)> {
        self.images
    }

    fn image(&self, binding: u32) -> Result<(&TextureEntry, bool), KernelError> {
        match self.slots.get(&binding) {
            Some(Slot::Image { index, writable }) => Ok((&self.images[*index].1, *writable)),
            Some(Slot::Buffer { .. }) => Err(KernelError::WrongBindingKind {
                binding,
                expected: "image",
            }),
            None => Err(KernelError::UnboundSlot(binding)),
        }
    }
}

fn texel_index(
    entry: &TextureEntry,
    binding: u32,
    x: u32,
    y: u32,
    layer: u32,
) -> Result<usize, KernelError> {
    let size = entry.size;
    if x >= size.width || y >= size.height || layer >= size.depth_or_array_layers {
        return Err(KernelError::OutOfBounds {
            binding,
            texel: [x, y, layer],
        });
    }
    Ok(layer as usize * size.texels_per_layer() + y as usize * size.width as usize + x as usize)
}

impl KernelResources for BoundResources {
    fn image_extent(&self, binding: u32) -> Result<Extent3D, KernelError> {
        self.image(binding).map(|(entry, _)| entry.size)
    }

    fn load(&self, binding: u32, x: u32, y: u32, layer: u32) -> Result<u32, KernelError> {
        let (entry, _) = self.image(binding)?;
        let index = texel_index(entry, binding, x, y, layer)?;
        Ok(entry.texels[index])
    }

    fn store(
        &mut self,
        binding: u32,
        x: u32,
        y: u32,
        layer: u32,
        bits: u32,
    ) -> Result<(), KernelError> {
        let index = match self.slots.get(&binding) {
            Some(Slot::Image {
                index,
                writable: true,
            }) => *index,
            Some(_) => {
                return Err(KernelError::WrongBindingKind {
                    binding,
                    expected: "storage image",
                })
            }
            None => return Err(KernelError::UnboundSlot(binding)),
        };
        let entry = &mut self.images[index].1;
        let texel = texel_index(entry, binding, x, y, layer)?;
        entry.texels[texel] = bits;
        Ok(())
    }

    fn buffer(&self, binding: u32) -> Result<&[u8], KernelError> {
        match self.slots.get(&binding) {
            Some(Slot::Buffer { index }) => Ok(&self.buffers[*index]),
            Some(Slot::Image { .. }) => Err(KernelError::WrongBindingKind {
                binding,
                expected: "buffer",
            }),
            None => Err(KernelError::UnboundSlot(binding)),
        }
    }
}
