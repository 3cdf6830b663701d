//! The page runtime.

pub mod broadcast;
pub mod config;
pub mod context;
pub mod dom;
pub mod dump;
pub mod easing;
pub mod error;
pub mod event;
pub mod focus_trap;
pub mod geom;
pub mod id;
pub mod inert;
pub mod navigation;
pub mod observer;
pub mod page;
pub mod scroll_lock;
pub mod selector;
pub mod services;
pub mod storage;
pub mod timer;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::Context;
pub use id::{NodeId, ObserverId, TimerId, TypedId, WidgetId};
pub use page::Page;
