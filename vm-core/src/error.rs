//! Typed errors for the public read/write surface.

use core::fmt;

/// Everything that can go wrong calling into [`crate::VirtualMemory`].
///
/// There is exactly one variant: internal conditions (missing tables, a
/// full physical memory) are handled by the frame allocator and never
/// surface here — see the module-level docs on [`crate::frame_allocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    /// The virtual address lies outside `[0, virtual_memory_size)`.
    InvalidAddress { address: u64, limit: u64 },
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddress { address, limit } => write!(
                f,
                "virtual address {:#x} is out of range (virtual memory size is {:#x})",
                address, limit
            ),
        }
    }
}

impl std::error::Error for VmError {}
