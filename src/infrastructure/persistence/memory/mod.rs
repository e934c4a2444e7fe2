//! In-Memory Persistence - 内存存储实现
//!
//! 进程退出即丢失，用于本地试用和测试

mod story_repo;

pub use story_repo::InMemoryStoryRepository;
