// AI response cache module

pub mod manager;
pub mod models;

pub use manager::ResponseCache;
pub use models::CacheStats;
