// Adapters layer: concrete implementations of the domain ports (registry files, storage).

pub mod event_file;
pub mod registry_file;
pub mod storage;

pub use registry_file::FileRegistrySource;
pub use storage::LocalStorage;
