//! Page-wide shared state every widget reaches through its context.

use std::collections::VecDeque;

use crate::{
    NodeId, TimerId, WidgetId,
    core::{
        broadcast::{Broadcaster, Viewport},
        config::Config,
        inert::InertRegistry,
        observer::{Intersections, Mutations},
        scroll_lock::ScrollLock,
        storage::{MemoryStorage, Storage},
        timer::Timers,
    },
    event::CustomEvent,
};

/// An outbound navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Absolute destination URL.
    pub url: String,
    /// Open in a new browsing context?
    pub new_tab: bool,
}

/// The system clipboard.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    /// Last written text.
    pub text: Option<String>,
    /// Reject writes, as a browser does without permission.
    pub denied: bool,
}

/// Which overlays are open.
#[derive(Debug, Default)]
pub struct OverlayRegistry {
    /// The single open dropdown.
    pub dropdown: Option<WidgetId>,
    /// Open modals, innermost last.
    pub modals: Vec<WidgetId>,
}

impl OverlayRegistry {
    /// The innermost open modal.
    pub fn top_modal(&self) -> Option<WidgetId> {
        self.modals.last().copied()
    }

    /// Forget a widget in every slot.
    pub fn forget(&mut self, id: WidgetId) {
        if self.dropdown == Some(id) {
            self.dropdown = None;
        }
        self.modals.retain(|m| *m != id);
    }
}

/// A window scroll animation in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    /// Element being scrolled, or the window.
    pub element: Option<NodeId>,
    /// Starting offset.
    pub start: f64,
    /// Total change in offset.
    pub change: f64,
    /// Elapsed milliseconds.
    pub elapsed: f64,
    /// Total milliseconds.
    pub duration: f64,
}

/// Shared services. One instance per page.
#[derive(Debug)]
pub struct Services {
    /// Page configuration.
    pub config: Config,
    /// Deferred callbacks.
    pub timers: Timers,
    /// Window scroll fan-out.
    pub scroll: Broadcaster<f64>,
    /// Settled viewport fan-out.
    pub resize: Broadcaster<Viewport>,
    /// Depth-counted scroll lock.
    pub lock: ScrollLock,
    /// Background inertness claims.
    pub inert: InertRegistry,
    /// Intersection observations.
    pub intersections: Intersections,
    /// Child-list watches.
    pub mutations: Mutations,
    /// Open overlays.
    pub overlays: OverlayRegistry,
    /// Persistent storage.
    pub storage: Box<dyn Storage>,
    /// Clipboard.
    pub clipboard: Clipboard,
    /// Navigations requested, in order.
    pub navigations: Vec<Navigation>,
    /// Every custom event emitted, in order.
    pub emitted: Vec<CustomEvent>,
    /// Custom events waiting to be delivered, with their emitter.
    pub(crate) custom_queue: VecDeque<(WidgetId, CustomEvent)>,
    /// Widgets receiving document-level events, in registration order.
    pub(crate) doc_listeners: Vec<WidgetId>,
    /// Animated scroll in progress.
    pub(crate) scroll_animation: Option<ScrollAnimation>,
    /// Timer for the next animation step.
    pub(crate) scroll_timer: Option<TimerId>,
}

impl Services {
    /// Services for a page with the given configuration and viewport.
    pub fn new(config: Config, viewport: Viewport, scroll_y: f64) -> Self {
        Self {
            config,
            timers: Timers::default(),
            scroll: Broadcaster::new(scroll_y),
            resize: Broadcaster::new(viewport),
            lock: ScrollLock::default(),
            inert: InertRegistry::default(),
            intersections: Intersections::default(),
            mutations: Mutations::default(),
            overlays: OverlayRegistry::default(),
            storage: Box::new(MemoryStorage::default()),
            clipboard: Clipboard::default(),
            navigations: vec![],
            emitted: vec![],
            custom_queue: VecDeque::new(),
            doc_listeners: vec![],
            scroll_animation: None,
            scroll_timer: None,
        }
    }

    /// Release everything a widget registered.
    pub(crate) fn release_widget(&mut self, id: WidgetId) {
        self.timers.cancel_widget(id);
        self.scroll.unsubscribe_widget(id);
        self.resize.unsubscribe_widget(id);
        self.intersections.disconnect(id);
        self.mutations.disconnect(id);
        self.doc_listeners.retain(|w| *w != id);
        self.overlays.forget(id);
    }
}
