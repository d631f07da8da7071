//! Record store adapters.

mod file_store;
mod in_memory;

pub use file_store::FileStore;
pub use in_memory::InMemoryStore;
