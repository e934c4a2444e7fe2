//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod project_handlers;
mod structure_handlers;

pub use project_handlers::*;
pub use structure_handlers::*;
