//! Card store implementations.

mod memory;

pub use memory::InMemoryCardStore;
