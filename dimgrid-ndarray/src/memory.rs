//! Memory spaces and allocators.
//!
//! Every chunk lives in exactly one memory space. This build targets a
//! single-memory system, so the host and device spaces coincide in
//! behaviour; they stay distinct types so code written against them keeps
//! working when a separate device memory is plugged in.

use dimgrid_core::ExecutionSpace;

/// An abstract address space chunks allocate in.
pub trait MemorySpace: 'static {
    const NAME: &'static str;

    /// Whether host execution spaces can touch this memory directly.
    const HOST_ACCESSIBLE: bool;

    /// Whether kernels running on `E` may dereference into this space.
    fn accessible_from<E: ExecutionSpace>() -> bool {
        // every execution space in this build runs on the host
        Self::HOST_ACCESSIBLE
    }
}

/// Ordinary host memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSpace;

impl MemorySpace for HostSpace {
    const NAME: &'static str = "host";
    const HOST_ACCESSIBLE: bool = true;
}

/// Device memory. Coincides with host memory on this build.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceSpace;

impl MemorySpace for DeviceSpace {
    const NAME: &'static str = "device";
    const HOST_ACCESSIBLE: bool = true;
}

/// Allocation failure, the one recoverable error in the chunk layer.
#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    #[error("out of memory allocating {bytes} bytes in {space} space")]
    OutOfMemory { bytes: usize, space: &'static str },
}

/// Allocates the flat buffer behind a chunk.
pub trait Allocator: Copy + Default + 'static {
    /// The space the buffer lands in.
    type Space: MemorySpace;

    /// A buffer of `len` copies of `value`.
    fn allocate_filled<T: Clone>(&self, len: usize, value: T) -> Result<Vec<T>, AllocError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| AllocError::OutOfMemory {
                bytes: len * core::mem::size_of::<T>(),
                space: Self::Space::NAME,
            })?;
        buf.resize(len, value);
        Ok(buf)
    }
}

/// Allocates in [`HostSpace`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HostAllocator;

impl Allocator for HostAllocator {
    type Space = HostSpace;
}

/// Allocates in [`DeviceSpace`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceAllocator;

impl Allocator for DeviceAllocator {
    type Space = DeviceSpace;
}
