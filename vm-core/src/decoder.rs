//! Bit-field decoding of a virtual address into a page offset and the
//! per-level page-table indices the walker consults in order.

use vm_memory::Geometry;

/// A decoded virtual address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAddress {
    pub page: u64,
    pub offset: u64,
    /// Per-level table index, level 0 (root) first.
    pub indices: Vec<u64>,
}

/// Splits `vaddr` into a page number, an in-page offset, and one table
/// index per level of `geometry`.
///
/// `vaddr` must already be known to lie in `[0, geometry.virtual_memory_size())`
/// — this function does not itself validate the range.
pub fn decode(geometry: &Geometry, vaddr: u64) -> DecodedAddress {
    let page_size = geometry.page_size();
    let page = vaddr / page_size;
    let offset = vaddr % page_size;

    let depth = geometry.tables_depth() as usize;
    let mut indices = Vec::with_capacity(depth);
    for level in 0..depth {
        let width = geometry.layer_width(level);
        let shift = geometry.shift(level);
        let mask = (1u64 << width) - 1;
        indices.push((page >> shift) & mask);
    }

    DecodedAddress { page, offset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry::new(4, 20, 8, 4).unwrap()
    }

    #[test]
    fn offset_is_low_bits() {
        let g = geometry();
        let d = decode(&g, 0b1010_0000_0000_0000_0101);
        assert_eq!(d.offset, 0b0101);
    }

    #[test]
    fn indices_reconstruct_page_number() {
        let g = geometry();
        for page in [0u64, 1, 255, 4096, 65535] {
            let vaddr = page * g.page_size();
            let d = decode(&g, vaddr);
            assert_eq!(d.page, page);
            let mut rebuilt = 0u64;
            for (level, &idx) in d.indices.iter().enumerate() {
                rebuilt += g.contribution(level, idx);
            }
            assert_eq!(rebuilt, page);
        }
    }

    #[test]
    fn single_level_depth_uses_whole_page_number_as_index() {
        let g = Geometry::new(8, 16, 10, 1).unwrap();
        let d = decode(&g, 0b1111_1111_0000_0000);
        assert_eq!(d.indices.len(), 1);
        assert_eq!(d.indices[0], d.page);
    }

    #[test]
    fn level_zero_uses_same_formula_as_every_other_level() {
        // Regression guard: no special case for level 0 — its index is
        // derived from the precomputed shift exactly like any other level.
        let g = geometry();
        let d = decode(&g, 0xF_FFFF);
        let expected = (d.page >> g.shift(0)) & ((1 << g.layer_width(0)) - 1);
        assert_eq!(d.indices[0], expected);
    }
}
