//! Three-tier frame acquisition: recycle an empty intermediate table, grow
//! into a never-used frame, or evict the resident leaf page with maximum
//! cyclic distance to the page being faulted in.
//!
//! All three tiers are evaluated by a single depth-first walk of the tree
//! reachable from frame 0 (`scan`) rather than three separate traversals —
//! tier 1 is detected pre-order as each table is visited, tier 2's running
//! maximum and tier 3's best eviction candidate are updated as each entry
//! is read. `find_frame` only decides which tier's result to use.
//!
//! If tier 1 finds a candidate the walk stops immediately — the DFS order
//! already guarantees it is the first empty table in left-to-right order,
//! and tiers 2/3 are moot once tier 1 succeeds.

use vm_memory::{Geometry, PhysicalMemory};

use crate::walk_path::WalkPath;

struct EmptyTableCandidate {
    frame: u64,
    parent_slot: u64,
}

struct EvictionCandidate {
    frame: u64,
    page: u64,
    parent_slot: u64,
    distance: u64,
}

#[derive(Default)]
struct ScanOutcome {
    empty_table: Option<EmptyTableCandidate>,
    max_frame: u64,
    eviction_candidate: Option<EvictionCandidate>,
}

/// Distance between two page numbers on a ring of size `num_pages`.
fn cyclic_distance(a: u64, b: u64, num_pages: u64) -> u64 {
    let linear = a.abs_diff(b);
    linear.min(num_pages - linear)
}

/// Depth-first walk of the tree rooted at `frame` (a table at `level`),
/// updating `out` with whichever tier candidates it finds along the way.
fn scan<M: PhysicalMemory>(
    mem: &M,
    geometry: &Geometry,
    walk_path: &WalkPath,
    faulting_page: u64,
    frame: u64,
    level: usize,
    page_acc: u64,
    parent_slot: Option<u64>,
    out: &mut ScanOutcome,
) {
    let page_size = geometry.page_size();
    let base = frame * page_size;

    if out.empty_table.is_none() {
        if let Some(slot) = parent_slot {
            if !walk_path.contains(frame) {
                let empty = (0..page_size).all(|i| mem.read_word(base + i) == 0);
                if empty {
                    out.empty_table = Some(EmptyTableCandidate { frame, parent_slot: slot });
                    return;
                }
            }
        }
    }

    let entries_are_leaves = level + 1 == geometry.tables_depth() as usize;

    for idx in 0..page_size {
        let entry = mem.read_word(base + idx);
        if entry == 0 {
            continue;
        }
        out.max_frame = out.max_frame.max(entry);
        let slot = base + idx;

        if entries_are_leaves {
            if walk_path.contains(entry) {
                continue;
            }
            let page = page_acc + geometry.contribution(level, idx);
            let distance = cyclic_distance(page, faulting_page, geometry.num_pages());
            let is_better = match &out.eviction_candidate {
                None => true,
                Some(current) => distance > current.distance,
            };
            if is_better {
                out.eviction_candidate =
                    Some(EvictionCandidate { frame: entry, page, parent_slot: slot, distance });
            }
        } else {
            let child_page_acc = page_acc + geometry.contribution(level, idx);
            scan(mem, geometry, walk_path, faulting_page, entry, level + 1, child_page_acc, Some(slot), out);
            if out.empty_table.is_some() {
                return;
            }
        }
    }
}

/// Finds a frame fit to be repurposed as the next table or leaf page for
/// `faulting_page`, not already locked in `walk_path`, and detaches it
/// from the tree (zeroing the parent entry, evicting a resident page to
/// the backing store if tier 3 was needed).
///
/// # Panics
/// Panics if every tier fails. Impossible when the geometry was built with
/// `num_frames > tables_depth`, a precondition `Geometry::new` enforces.
pub fn find_frame<M: PhysicalMemory>(
    mem: &mut M,
    geometry: &Geometry,
    walk_path: &WalkPath,
    faulting_page: u64,
) -> u64 {
    let mut outcome = ScanOutcome::default();
    scan(mem, geometry, walk_path, faulting_page, 0, 0, 0, None, &mut outcome);

    if let Some(candidate) = outcome.empty_table {
        mem.write_word(candidate.parent_slot, 0);
        log::debug!(
            "frame_allocator: tier1 recycled frame {} (detached from slot {:#x})",
            candidate.frame, candidate.parent_slot
        );
        return candidate.frame;
    }

    let grown = outcome.max_frame + 1;
    if grown < geometry.num_frames() && !walk_path.contains(grown) {
        log::debug!("frame_allocator: tier2 grew into unused frame {grown}");
        return grown;
    }

    let victim = outcome
        .eviction_candidate
        .expect("frame_allocator: all tiers failed — violates num_frames > tables_depth");
    mem.evict(victim.frame, victim.page);
    mem.write_word(victim.parent_slot, 0);
    log::debug!(
        "frame_allocator: tier3 evicted page {} (frame {}, cyclic distance {})",
        victim.page, victim.frame, victim.distance
    );
    victim.frame
}
