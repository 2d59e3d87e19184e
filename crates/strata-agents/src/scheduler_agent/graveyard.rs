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

use strata_core::gpu::GpuResource;

/// Delayed destruction of GPU resources.
///
/// A resource buried at tick `T` is handed back by [`collect`](Self::collect)
/// no earlier than tick `T + delay`. Entries live in a ring of `delay` slots
/// indexed by their retirement tick, so each collection only inspects the
/// slot that can have become due.
#[derive(Debug)]
pub struct Graveyard {
    delay: u64,
    slots: Vec<Vec<(u64, GpuResource)>>,
    len: usize,
}

impl Graveyard {
    /// Creates an empty graveyard.
    pub fn new(delay: u64) -> Self {
        let slot_count = delay.max(1) as usize;
        Self {
            delay,
            slots: (0..slot_count).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    /// The number of ticks an entry waits.
    pub fn delay(&self) -> u64 {
        self.delay
    }

    fn slot(&self, tick: u64) -> usize {
        (tick % self.slots.len() as u64) as usize
    }

    /// Retires resources at `tick`.
    pub fn bury(&mut self, tick: u64, resources: impl IntoIterator<Item = GpuResource>) {
        let slot = self.slot(tick);
        let before = self.slots[slot].len();
        self.slots[slot].extend(resources.into_iter().map(|r| (tick, r)));
        self.len += self.slots[slot].len() - before;
    }

    /// Removes and returns every entry that is due at `now`.
    pub fn collect(&mut self, now: u64) -> Vec<GpuResource> {
        let delay = self.delay;
        let slot = self.slot(now);
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.slots[slot])
            .into_iter()
            .partition(|(retired_at, _)| now.saturating_sub(*retired_at) >= delay);
        self.slots[slot] = waiting;
        self.len -= due.len();
        due.into_iter().map(|(_, resource)| resource).collect()
    }

    /// Removes and returns every entry, due or not.
    pub fn drain_all(&mut self) -> Vec<GpuResource> {
        self.len = 0;
        self.slots
            .iter_mut()
            .flat_map(|slot| slot.drain(..).map(|(_, resource)| resource))
            .collect()
    }

    /// The number of buried resources.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing is buried.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::gpu::{BufferId, TextureId};

    #[test]
    fn entries_wait_for_the_full_delay() {
        let mut graveyard = Graveyard::new(3);
        graveyard.bury(5, [GpuResource::Texture(TextureId(1))]);
        graveyard.bury(6, [GpuResource::Buffer(BufferId(2))]);

        assert!(graveyard.collect(6).is_empty());
        assert!(graveyard.collect(7).is_empty());
        assert_eq!(graveyard.collect(8), vec![GpuResource::Texture(TextureId(1))]);
        assert_eq!(graveyard.len(), 1);
        assert_eq!(graveyard.collect(9), vec![GpuResource::Buffer(BufferId(2))]);
        assert!(graveyard.is_empty());
    }

    #[test]
    fn late_collection_never_frees_early() {
        let mut graveyard = Graveyard::new(2);
        graveyard.bury(0, [GpuResource::Texture(TextureId(1))]);
        graveyard.bury(2, [GpuResource::Texture(TextureId(2))]);
        // Slot 0 holds both; only the older one is due.
        assert_eq!(graveyard.collect(2), vec![GpuResource::Texture(TextureId(1))]);
        assert_eq!(graveyard.collect(4), vec![GpuResource::Texture(TextureId(2))]);
    }

    #[test]
    fn zero_delay_frees_on_the_same_tick() {
        let mut graveyard = Graveyard::new(0);
        graveyard.bury(4, [GpuResource::Texture(TextureId(1))]);
        assert_eq!(graveyard.collect(4).len(), 1);
    }

    #[test]
    fn drain_all_empties_every_slot() {
        let mut graveyard = Graveyard::new(4);
        for tick in 0..4 {
            graveyard.bury(tick, [GpuResource::Texture(TextureId(tick as usize))]);
        }
        assert_eq!(graveyard.drain_all().len(), 4);
        assert!(graveyard.is_empty());
    }
}
