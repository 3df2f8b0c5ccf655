//! A hierarchical demand-paged virtual memory simulator.
//!
//! [`VirtualMemory`] exposes exactly two operations over a simulated
//! physical memory and backing store: [`VirtualMemory::read_word`] and
//! [`VirtualMemory::write_word`]. Everything else — the bit-field decoder
//! ([`decoder`]), the three-tier frame allocator ([`frame_allocator`]),
//! and the page-table walker ([`walker`]) that ties them together — is an
//! implementation detail of translating a virtual address into a physical
//! one, materialising whatever tables or pages are missing along the way.
//!
//! The crate owns no persistent state of its own: all of it lives in the
//! [`vm_memory::PhysicalMemory`] collaborator passed in at construction,
//! so a fresh simulation is just a fresh collaborator.

pub mod decoder;
pub mod error;
pub mod frame_allocator;
pub mod walk_path;
pub mod walker;

pub use error::VmError;
pub use vm_memory::{Geometry, PhysicalMemory, SimulatedPhysicalMemory, Word};

/// Owns a [`Geometry`] and a physical-memory collaborator, and exposes the
/// two public operations over the virtual address space they describe.
pub struct VirtualMemory<M: PhysicalMemory> {
    geometry: Geometry,
    memory: M,
}

impl<M: PhysicalMemory> VirtualMemory<M> {
    /// Wraps an already-constructed collaborator. Does not touch physical
    /// memory — call [`VirtualMemory::initialize`] before reading or
    /// writing unless `memory` is already in a freshly-zeroed state.
    pub fn new(geometry: Geometry, memory: M) -> Self {
        Self { geometry, memory }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Direct access to the underlying physical-memory collaborator, for
    /// inspecting state in tests.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Zeroes frame 0 so the root page table starts out empty. No other
    /// physical memory state is touched.
    pub fn initialize(&mut self) {
        let page_size = self.geometry.page_size();
        for i in 0..page_size {
            self.memory.write_word(i, 0);
        }
        log::debug!("vm-core: initialised (root table in frame 0, page_size={page_size})");
    }

    /// Reads the word at virtual address `vaddr`.
    pub fn read_word(&mut self, vaddr: u64) -> Result<Word, VmError> {
        self.check_range(vaddr)?;
        let phys = walker::translate(&mut self.memory, &self.geometry, vaddr);
        Ok(self.memory.read_word(phys))
    }

    /// Writes `value` to the word at virtual address `vaddr`.
    pub fn write_word(&mut self, vaddr: u64, value: Word) -> Result<(), VmError> {
        self.check_range(vaddr)?;
        let phys = walker::translate(&mut self.memory, &self.geometry, vaddr);
        self.memory.write_word(phys, value);
        Ok(())
    }

    fn check_range(&self, vaddr: u64) -> Result<(), VmError> {
        let limit = self.geometry.virtual_memory_size();
        if vaddr >= limit {
            return Err(VmError::InvalidAddress { address: vaddr, limit });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_geometry() -> Geometry {
        Geometry::new(4, 20, 8, 4).unwrap()
    }

    fn vm() -> VirtualMemory<SimulatedPhysicalMemory> {
        let geometry = example_geometry();
        let memory = SimulatedPhysicalMemory::new(geometry);
        let mut vm = VirtualMemory::new(geometry, memory);
        vm.initialize();
        vm
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut vm = vm();
        vm.write_word(13, 13).unwrap();
        assert_eq!(vm.read_word(13).unwrap(), 13);
    }

    #[test]
    fn out_of_range_address_is_rejected_without_side_effects() {
        let mut vm = vm();
        let limit = vm.geometry().virtual_memory_size();
        let before = vm.memory.frames().to_vec();
        let err = vm.write_word(limit, 777).unwrap_err();
        assert_eq!(err, VmError::InvalidAddress { address: limit, limit });
        assert_eq!(vm.memory.frames(), before.as_slice());
    }

    #[test]
    fn last_legal_address_is_writable() {
        let mut vm = vm();
        let last = vm.geometry().virtual_memory_size() - 1;
        vm.write_word(last, 888).unwrap();
        assert_eq!(vm.read_word(last).unwrap(), 888);
    }

    #[test]
    fn repeated_writes_to_same_address_keep_only_the_last_value() {
        let mut vm = vm();
        vm.write_word(4, 100).unwrap();
        vm.write_word(4, 200).unwrap();
        vm.write_word(4, 300).unwrap();
        assert_eq!(vm.read_word(4).unwrap(), 300);
    }

    #[test]
    fn writes_to_distinct_addresses_do_not_interfere() {
        let mut vm = vm();
        vm.write_word(4, 111).unwrap();
        vm.write_word(20, 222).unwrap();
        assert_eq!(vm.read_word(4).unwrap(), 111);
        assert_eq!(vm.read_word(20).unwrap(), 222);
    }
}
