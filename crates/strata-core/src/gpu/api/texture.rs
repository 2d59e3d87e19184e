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

//! Defines data structures related to GPU texture and sampler resources.

use crate::math::Extent3D;
use std::borrow::Cow;

/// The texel formats the terrain pipeline stores.
///
/// Every format is a single 32-bit channel: heights are `R32Float`, control
/// maps pack their material bits into `R32Uint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// A single 32-bit float channel.
    R32Float,
    /// A single 32-bit unsigned integer channel.
    R32Uint,
}

impl TextureFormat {
    /// The size of one texel in bytes.
    pub const fn bytes_per_texel(&self) -> u32 {
        match self {
            TextureFormat::R32Float | TextureFormat::R32Uint => 4,
        }
    }
}

/// The dimensionality of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    /// A single two-dimensional image.
    D2,
    /// An indexed collection of two-dimensional slices of equal size.
    D2Array,
}

bitflags::bitflags! {
    /// A set of flags describing the allowed usages of a [`TextureId`](super::TextureId).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// The texture can be used as the source of a copy operation.
        const COPY_SRC = 1 << 0;
        /// The texture can be used as the destination of a copy operation.
        const COPY_DST = 1 << 1;
        /// The texture can be bound in a shader for sampling (reading).
        const TEXTURE_BINDING = 1 << 2;
        /// The texture can be used as a storage image (read/write access from shaders).
        const STORAGE_BINDING = 1 << 3;
    }
}

/// A descriptor used to create a [`TextureId`](super::TextureId).
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The dimensions (width, height, array layers) of the texture.
    pub size: Extent3D,
    /// The dimensionality of the texture.
    pub dimension: TextureDimension,
    /// The format of the texels in the texture.
    pub format: TextureFormat,
    /// How the texture will be used.
    pub usage: TextureUsage,
}

impl<'a> TextureDescriptor<'a> {
    /// Total size of the texture in bytes.
    pub fn byte_size(&self) -> u64 {
        self.size.texels_per_layer() as u64
            * self.size.depth_or_array_layers as u64
            * self.format.bytes_per_texel() as u64
    }
}

/// Defines how texture coordinates are handled when sampling outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// Coordinates wrap around.
    Repeat,
    /// Coordinates are clamped to the edge texel.
    ClampToEdge,
    /// Coordinates wrap around, mirroring at each boundary.
    MirrorRepeat,
}

/// Defines the filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    Nearest,
    /// Linear interpolation between the nearest texels.
    Linear,
}

/// A descriptor used to create a [`SamplerId`](super::SamplerId).
#[derive(Debug, Clone)]
pub struct SamplerDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The address mode for the U (x) coordinate.
    pub address_mode_u: AddressMode,
    /// The address mode for the V (y) coordinate.
    pub address_mode_v: AddressMode,
    /// The filter used when the texture is magnified.
    pub mag_filter: FilterMode,
    /// The filter used when the texture is minified.
    pub min_filter: FilterMode,
}

impl Default for SamplerDescriptor<'_> {
    fn default() -> Self {
        Self {
            label: None,
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_byte_size_counts_layers() {
        let descriptor = TextureDescriptor {
            label: None,
            size: Extent3D::new(16, 16, 3),
            dimension: TextureDimension::D2Array,
            format: TextureFormat::R32Float,
            usage: TextureUsage::COPY_DST | TextureUsage::TEXTURE_BINDING,
        };
        assert_eq!(descriptor.byte_size(), 16 * 16 * 3 * 4);
    }

    #[test]
    fn default_sampler_is_nearest_clamped() {
        let sampler = SamplerDescriptor::default();
        assert_eq!(sampler.address_mode_u, AddressMode::ClampToEdge);
        assert_eq!(sampler.mag_filter, FilterMode::Nearest);
    }
}
