//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod chapter_handlers;
mod character_handlers;
mod episode_handlers;
mod generate_handlers;
mod project_handlers;
mod story_handlers;

pub use chapter_handlers::*;
pub use character_handlers::*;
pub use episode_handlers::*;
pub use generate_handlers::*;
pub use project_handlers::*;
pub use story_handlers::*;
