//! Persistence Layer - 数据持久化
//!
//! SQLite 和内存存储实现

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStoryRepository;
pub use sqlite::SqliteStoryRepository;
