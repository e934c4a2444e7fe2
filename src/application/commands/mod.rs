//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作（包括调用 LLM 的生成命令）

mod chapter_commands;
mod character_commands;
mod episode_commands;
mod generate_commands;
mod project_commands;
mod story_commands;

pub mod handlers;

pub use chapter_commands::*;
pub use character_commands::*;
pub use episode_commands::*;
pub use generate_commands::*;
pub use project_commands::*;
pub use story_commands::*;
