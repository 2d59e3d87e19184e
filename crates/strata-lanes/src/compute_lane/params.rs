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

use bytemuck::Pod;

/// The block size compute parameter data must be a multiple of.
pub const PARAMETER_ALIGNMENT: usize = 16;

/// A tightly-packed parameter block for a compute dispatch.
///
/// Values are appended exactly as laid out in memory; no implicit padding is
/// ever inserted. Callers add padding explicitly so the block matches the
/// shader's layout and the backend's alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBlock {
    bytes: Vec<u8>,
}

impl ParameterBlock {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value.
    pub fn push<T: Pod>(&mut self, value: T) -> &mut Self {
        self.bytes.extend_from_slice(bytemuck::bytes_of(&value));
        self
    }

    /// Appends `count` zero bytes.
    pub fn add_padding(&mut self, count: usize) -> &mut Self {
        self.bytes.resize(self.bytes.len() + count, 0);
        self
    }

    /// Appends zero bytes up to the next multiple of `alignment`.
    pub fn pad_to(&mut self, alignment: usize) -> &mut Self {
        if alignment > 0 {
            let aligned = self.bytes.len().div_ceil(alignment) * alignment;
            self.bytes.resize(aligned, 0);
        }
        self
    }

    /// The size of the block in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` if the size is a multiple of [`PARAMETER_ALIGNMENT`].
    pub fn is_aligned(&self) -> bool {
        self.bytes.len() % PARAMETER_ALIGNMENT == 0
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the block, returning the packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_packed_without_gaps() {
        let mut block = ParameterBlock::new();
        block.push(1u32).push(2.5f32).push([3i32, 4]);
        assert_eq!(block.len(), 16);
        assert!(block.is_aligned());
        assert_eq!(&block.as_bytes()[0..4], &1u32.to_ne_bytes());
        assert_eq!(&block.as_bytes()[4..8], &2.5f32.to_ne_bytes());
    }

    #[test]
    fn explicit_padding() {
        let mut block = ParameterBlock::new();
        block.push(7u32);
        assert!(!block.is_aligned());
        block.add_padding(12);
        assert_eq!(block.len(), 16);
        assert!(block.is_aligned());
        assert!(block.as_bytes()[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn pad_to_rounds_up_only_when_needed() {
        let mut block = ParameterBlock::new();
        block.push([0u8; 20]);
        block.pad_to(PARAMETER_ALIGNMENT);
        assert_eq!(block.len(), 32);
        block.pad_to(PARAMETER_ALIGNMENT);
        assert_eq!(block.len(), 32);
    }
}
