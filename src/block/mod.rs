//! The composition tree: blocks, their arena, and borders.

pub mod border;
pub mod node;
pub mod tree;

pub use border::{Border, EmptyBorder, LineBorder};
pub use node::{Block, WidgetId};
pub use tree::Tree;
