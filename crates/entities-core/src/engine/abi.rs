//! Contract between the portable module and its hosts
//!
//! Strings cross the boundary as `(ptr, len)` pairs of UTF-8 bytes in the
//! module's linear memory. The host allocates with [`ALLOC`], writes both
//! operands into one buffer, calls a primitive, then releases the buffer with
//! [`FREE`]. Zero-length operands may be passed as `(0, 0)`.
//!
//! Exports returning strings pack pointer and length into a single u64:
//! `(ptr << 32) | len`.

/// Bumped whenever an export signature or the memory protocol changes
pub const ABI_VERSION: u32 = 1;

pub const MEMORY: &str = "memory";
pub const ALLOC: &str = "wasm_alloc";
pub const FREE: &str = "wasm_free";
pub const ABI_VERSION_FN: &str = "entities_abi_version";
pub const EDIT_DISTANCE: &str = "edit_distance";
pub const EDIT_SIMILARITY: &str = "edit_similarity";
pub const JARO_WINKLER_SIMILARITY: &str = "jaro_winkler_similarity";

/// Pack a guest buffer location into the u64 return convention
pub fn pack(ptr: u32, len: u32) -> u64 {
    ((ptr as u64) << 32) | (len as u64)
}

/// Inverse of [`pack`]
pub fn unpack(packed: u64) -> (u32, u32) {
    ((packed >> 32) as u32, packed as u32)
}
