//! Dispatch record stores.

mod json;
mod memory;

pub use json::JsonDispatchStore;
pub use memory::MemoryDispatchStore;
