//! Layout negotiation: the `Sizer`/`Layout` protocol and the stock layouts.

pub mod flex;
pub mod grid;
pub mod sizer;

pub use flex::{Direction, FlexData, FlexLayout};
pub use grid::{Alignment, GridData, GridLayout};
pub use sizer::{default_max_size, FixedSizer, Hint, Layout, Sizer, Sizes, DEFAULT_MAX};
