/// Cache adapters backing the `CacheStore` port
mod file_cache;
mod memory_cache;

pub use file_cache::FileCache;
pub use memory_cache::InMemoryCache;
