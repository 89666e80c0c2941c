mod in_memory_store;
mod json_file_store;

pub use in_memory_store::InMemorySignalStore;
pub use json_file_store::JsonFileStore;
