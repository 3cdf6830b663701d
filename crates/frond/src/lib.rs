//! Frond: a headless runtime for self-initializing page widgets.
//!
//! A [`Page`] owns a document model, a set of widget definitions and the
//! shared coordination services widgets rely on: scroll and resize
//! broadcasts, the scroll lock, overlay tracking, timers and observers.
//! Definitions bind widget constructors to elements by selector; the page
//! attaches at most one instance per element and definition, dispatches
//! events to them, and disconnects them when their element goes away.
//!
//! # Module Organization
//!
//! - [`widget`] - The trait implemented by all widgets
//! - [`widgets`] - Built-in widget implementations
//! - [`dom`], [`event`], [`selector`] - The document model

#![warn(missing_docs)]

mod core;

pub mod widget;
pub mod widgets;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
pub use core::{
    Context, NodeId, ObserverId, Page, TimerId, TypedId, WidgetId, broadcast, config, context,
    dom, dump, easing, error, event, focus_trap, geom, inert, navigation, observer, page,
    scroll_lock, selector, services, storage, timer,
};

pub use error::{Error, Result};
pub use widget::{EventOutcome, FilterControl, Widget};
