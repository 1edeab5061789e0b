//! # gilt-blocks
//!
//! The retained-mode core of a desktop UI toolkit: a composition tree of
//! rectangular blocks, a two-phase layout protocol, typed event dispatch with
//! cascading, and the window shell the tree paints through.
//!
//! Everything lives in one explicitly constructed [`Ui`] context. The tree
//! is a slotmap arena addressed by [`WidgetId`]; handlers are strongly typed
//! callbacks keyed by a closed set of event kinds; optional widget
//! capabilities are typed slots rather than runtime type checks.
//!
//! ## Core Systems
//!
//! - **[`block`]**: Slotmap-backed widget tree, the `Block` node, borders
//! - **[`layout`]**: `Sizer`/`Layout` contracts, grid layout, taffy-powered flex layout
//! - **[`event`]**: Event kinds and cascade policy, payloads, handler registry, platform input
//! - **[`ui`]**: The context: dispatch, bounds changes, painting, focus, input routing, tasks
//! - **[`window`]**: Window state, platform surface hook, tab-order focus chain
//! - **[`capability`]**: Optional pager/scrollable capabilities
//! - **[`draw`]**: The canvas contract and a recording canvas
//! - **[`testing`]**: Headless pilot for driving a window in tests
//! - **[`geometry`]**: Point, Size, Rect, Insets primitives

// Foundation
pub mod color;
pub mod error;
pub mod geometry;

// Core systems
pub mod block;
pub mod capability;
pub mod layout;

// Events
pub mod event;

// Drawing
pub mod draw;

// Context and windows
pub mod ui;
pub mod window;

// Test support
pub mod testing;

pub use block::{Block, Tree, WidgetId};
pub use error::{DispatchError, HandlerError, Result, TreeError};
pub use event::{Event, EventKind, HandlerId, Target};
pub use ui::{Ui, UiConfig, UiHandle};
pub use window::{Surface, Window, WindowId};
