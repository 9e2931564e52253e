//! Chunk storage for discrete domains, backed by ndarray.
//!
//! A chunk owns a flat row-major buffer bound to a domain from
//! `dimgrid-core`; chunk-spans are borrowed views with the same tag-based
//! access rules. Deep copies and host mirrors move data between memory
//! spaces.

mod chunk;
mod copy;
mod memory;
mod span;

pub use chunk::{host_chunk, Chunk, HostChunk};
pub use copy::{create_mirror, create_mirror_and_copy, deepcopy, parallel_deepcopy};
pub use memory::{
    AllocError, Allocator, DeviceAllocator, DeviceSpace, HostAllocator, HostSpace, MemorySpace,
};
pub use span::{get_domain, ChunkSpan, ChunkSpanMut, WithDomain};
