//! The page-table walker: descends one level at a time from frame 0,
//! materialising missing intermediate tables and leaf pages on demand,
//! and returns the physical address corresponding to a virtual address.

use vm_memory::{Geometry, PhysicalMemory};

use crate::decoder;
use crate::frame_allocator;
use crate::walk_path::WalkPath;

/// Translates `vaddr` into a physical address, materialising whatever
/// tables or leaf page are missing along the way.
///
/// `vaddr` must already be known to lie in `[0, geometry.virtual_memory_size())`.
pub fn translate<M: PhysicalMemory>(mem: &mut M, geometry: &Geometry, vaddr: u64) -> u64 {
    let decoded = decoder::decode(geometry, vaddr);
    let depth = geometry.tables_depth() as usize;
    let page_size = geometry.page_size();

    let mut walk_path = WalkPath::with_capacity(depth);
    let mut cur_frame = 0u64;
    walk_path.insert(cur_frame);

    for level in 0..depth {
        let idx = decoded.indices[level];
        let slot = cur_frame * page_size + idx;
        let mut child = mem.read_word(slot);

        if child == 0 {
            walk_path.insert(cur_frame);
            let new_frame = frame_allocator::find_frame(mem, geometry, &walk_path, decoded.page);

            if level + 1 < depth {
                zero_frame(mem, geometry, new_frame);
            } else {
                mem.restore(new_frame, decoded.page);
            }
            mem.write_word(slot, new_frame);
            log::trace!(
                "walker: materialised frame {new_frame} at level {level} (slot {slot:#x}) for page {}",
                decoded.page
            );
            child = new_frame;
        }

        walk_path.insert(cur_frame);
        walk_path.insert(child);
        cur_frame = child;
    }

    cur_frame * page_size + decoded.offset
}

fn zero_frame<M: PhysicalMemory>(mem: &mut M, geometry: &Geometry, frame: u64) {
    let base = frame * geometry.page_size();
    for i in 0..geometry.page_size() {
        mem.write_word(base + i, 0);
    }
}
