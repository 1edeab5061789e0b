//! Error types.
//!
//! Structural mistakes that cannot be silently ignored surface as
//! [`TreeError`]. Anything that runs handlers can fail with a
//! [`DispatchError`], which carries the handler's own error as its source.

use crate::block::WidgetId;
use crate::event::EventKind;
use crate::window::WindowId;

/// The error a handler returns when it cannot complete.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("widget {0:?} does not exist")]
    UnknownWidget(WidgetId),
    #[error("window {0:?} does not exist")]
    UnknownWindow(WindowId),
    #[error("adding {child:?} to {parent:?} would make it its own ancestor")]
    Cycle { parent: WidgetId, child: WidgetId },
}

/// Errors from dispatching an event, or from any operation that dispatches.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{kind} handler failed: {source}")]
    Handler {
        kind: EventKind,
        #[source]
        source: HandlerError,
    },
    #[error("event cascaded through more than {0} targets")]
    CascadeTooDeep(usize),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result alias for operations that may dispatch events.
pub type Result<T, E = DispatchError> = std::result::Result<T, E>;
