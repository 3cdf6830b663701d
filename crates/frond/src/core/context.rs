//! The handle a widget uses to reach its document and the shared services.

use std::{any::type_name, time::Duration};

use slotmap::SlotMap;
use tracing::debug;

use crate::{
    NodeId, ObserverId, TimerId, TypedId, WidgetId,
    core::{
        broadcast::{SubscriptionId, Viewport},
        config::{Config, ms},
        dom::Document,
        easing::ease_in_out_quad,
        observer::ObserveOptions,
        services::{Navigation, OverlayRegistry, ScrollAnimation, Services},
        storage::Storage,
        timer::{PageTask, TimerOwner},
    },
    error::{Error, Result},
    event::CustomEvent,
    widget::{FilterControl, Widget, downcast_mut},
};

/// A connected widget and the element it is bound to.
pub(crate) struct WidgetEntry {
    /// Root element.
    pub(crate) root: NodeId,
    /// Definition label, used in diagnostics.
    pub(crate) label: &'static str,
    /// The widget. Taken out of its slot while one of its hooks runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
}

/// Widget arena.
pub(crate) type WidgetStore = SlotMap<WidgetId, WidgetEntry>;

/// Run a closure against a widget, with a context scoped to that widget.
pub(crate) fn call_widget<R>(
    doc: &mut Document,
    services: &mut Services,
    widgets: &mut WidgetStore,
    id: WidgetId,
    f: impl FnOnce(&mut dyn Widget, &mut Context<'_>) -> Result<R>,
) -> Result<R> {
    let entry = widgets.get_mut(id).ok_or(Error::WidgetNotFound(id))?;
    let root = entry.root;
    let mut widget = entry.widget.take().ok_or(Error::ReentrantWidgetBorrow(id))?;
    let out = {
        let mut ctx = Context::new(doc, services, widgets, id, root);
        f(widget.as_mut(), &mut ctx)
    };
    if let Some(entry) = widgets.get_mut(id) {
        entry.widget = Some(widget);
    }
    out
}

/// Access to the page from inside a widget hook.
pub struct Context<'a> {
    /// The document.
    doc: &'a mut Document,
    /// Shared services.
    services: &'a mut Services,
    /// Every connected widget.
    widgets: &'a mut WidgetStore,
    /// The widget this context belongs to.
    id: WidgetId,
    /// That widget's root element.
    root: NodeId,
}

impl<'a> Context<'a> {
    /// Construct a context for one widget.
    pub(crate) fn new(
        doc: &'a mut Document,
        services: &'a mut Services,
        widgets: &'a mut WidgetStore,
        id: WidgetId,
        root: NodeId,
    ) -> Self {
        Self {
            doc,
            services,
            widgets,
            id,
            root,
        }
    }

    /// The current widget.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The current widget's root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The document.
    pub fn doc(&self) -> &Document {
        &*self.doc
    }

    /// The document, mutably.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut *self.doc
    }

    /// Page configuration.
    pub fn config(&self) -> &Config {
        &self.services.config
    }

    /// Current time on the page clock.
    pub fn now(&self) -> Duration {
        self.services.timers.now()
    }

    /// Current viewport size.
    pub fn viewport(&self) -> Viewport {
        let (width, height) = self.doc.viewport();
        Viewport { width, height }
    }

    /// Is the viewport at a mobile width?
    pub fn is_mobile(&self) -> bool {
        self.services
            .config
            .breakpoints
            .is_mobile(self.doc.viewport().0)
    }

    /// Is the viewport at a desktop width?
    pub fn is_desktop(&self) -> bool {
        self.services
            .config
            .breakpoints
            .is_desktop(self.doc.viewport().0)
    }

    // ---- queries ----

    /// First element under the root matching `sel`.
    pub fn query(&self, sel: &str) -> Result<Option<NodeId>> {
        self.doc.query(self.root, sel)
    }

    /// Every element under the root matching `sel`.
    pub fn query_all(&self, sel: &str) -> Result<Vec<NodeId>> {
        self.doc.query_all(self.root, sel)
    }

    /// First element under the root matching `sel`, or a missing element
    /// error naming this widget.
    pub fn require(&self, sel: &str) -> Result<NodeId> {
        self.query(sel)?.ok_or_else(|| Error::missing(self.label(), sel))
    }

    /// First element under `scope` matching `sel`, or a missing element error.
    pub fn require_in(&self, scope: NodeId, sel: &str) -> Result<NodeId> {
        self.doc
            .query(scope, sel)?
            .ok_or_else(|| Error::missing(self.label(), sel))
    }

    /// Label of the definition that created this widget.
    fn label(&self) -> &'static str {
        self.widgets.get(self.id).map_or("widget", |e| e.label)
    }

    /// Focus an element. Returns false if it cannot take focus.
    pub fn focus(&mut self, node: NodeId) -> bool {
        self.doc.focus(node)
    }

    // ---- timers ----

    /// Deliver `on_timer(tag)` to this widget after `delay`.
    pub fn schedule(&mut self, delay: Duration, tag: &'static str) -> TimerId {
        self.services
            .timers
            .schedule(TimerOwner::Widget(self.id, tag), delay)
    }

    /// Cancel a timer.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.services.timers.cancel(id)
    }

    /// Cancel the timer in `slot`, if any, and schedule a fresh one there.
    pub fn debounce(&mut self, slot: &mut Option<TimerId>, delay: Duration, tag: &'static str) {
        if let Some(t) = slot.take() {
            self.cancel(t);
        }
        *slot = Some(self.schedule(delay, tag));
    }

    /// Cancel the timer in `slot`, if any.
    pub fn clear_timer(&mut self, slot: &mut Option<TimerId>) {
        if let Some(t) = slot.take() {
            self.cancel(t);
        }
    }

    // ---- broadcasts ----

    /// Receive `on_scroll` for every window scroll.
    pub fn subscribe_scroll(&mut self) -> SubscriptionId {
        self.services.scroll.subscribe_widget(self.id)
    }

    /// Stop receiving window scrolls.
    pub fn unsubscribe_scroll(&mut self, id: SubscriptionId) -> bool {
        self.services.scroll.unsubscribe(id)
    }

    /// Receive `on_resize` for every settled viewport change.
    pub fn subscribe_resize(&mut self) -> SubscriptionId {
        self.services.resize.subscribe_widget(self.id)
    }

    /// Stop receiving viewport changes.
    pub fn unsubscribe_resize(&mut self, id: SubscriptionId) -> bool {
        self.services.resize.unsubscribe(id)
    }

    /// Last broadcast window scroll offset.
    pub fn last_scroll(&self) -> f64 {
        *self.services.scroll.last()
    }

    // ---- observers ----

    /// Observe an element's visibility. The first entry is delivered after the
    /// current hook returns.
    pub fn observe(
        &mut self,
        tag: &'static str,
        target: NodeId,
        options: ObserveOptions,
    ) -> ObserverId {
        self.services
            .intersections
            .observe(self.id, tag, target, options)
    }

    /// Stop one observation.
    pub fn unobserve(&mut self, id: ObserverId) {
        self.services.intersections.unobserve(id);
    }

    /// Stop every observation with a tag.
    pub fn unobserve_tag(&mut self, tag: &str) {
        self.services.intersections.unobserve_tag(self.id, tag);
    }

    /// Receive `on_mutation` when children change anywhere under `node`.
    pub fn watch_mutations(&mut self, node: NodeId) {
        self.services.mutations.watch(self.id, node);
    }

    /// Receive events at document level after bubbling.
    pub fn listen_document(&mut self) {
        if !self.services.doc_listeners.contains(&self.id) {
            self.services.doc_listeners.push(self.id);
        }
    }

    /// Stop receiving document-level events.
    pub fn unlisten_document(&mut self) {
        let id = self.id;
        self.services.doc_listeners.retain(|w| *w != id);
    }

    // ---- overlays ----

    /// Disable page scrolling.
    pub fn lock_scroll(&mut self) -> Result<()> {
        self.services.lock.disable(&mut *self.doc)
    }

    /// Release one scroll lock. On full release, scroll behaviour is restored
    /// after a short delay.
    pub fn unlock_scroll(&mut self) -> Result<()> {
        if self.services.lock.enable(&mut *self.doc)? {
            let delay = ms(self.services.config.timing.scroll_behavior_restore);
            self.services
                .timers
                .schedule(TimerOwner::Page(PageTask::ScrollBehaviorRestore), delay);
        }
        Ok(())
    }

    /// Is page scrolling disabled?
    pub fn scroll_locked(&self) -> bool {
        self.services.lock.is_locked()
    }

    /// Mark elements inert on behalf of this widget.
    pub fn claim_inert(&mut self, nodes: &[NodeId]) -> Result<()> {
        self.services.inert.claim(&mut *self.doc, self.id, nodes)
    }

    /// Drop this widget's inert claims.
    pub fn release_inert(&mut self) -> Result<()> {
        self.services.inert.release(&mut *self.doc, self.id)
    }

    /// Open overlay registry.
    pub fn overlays(&mut self) -> &mut OverlayRegistry {
        &mut self.services.overlays
    }

    // ---- outbound ----

    /// Emit a custom event from `source`. It is recorded on the page and
    /// delivered to the widgets rooted at or above `source`.
    pub fn emit(&mut self, source: NodeId, name: &str, detail: impl Into<String>) {
        let ev = CustomEvent {
            source,
            name: name.to_string(),
            detail: detail.into(),
        };
        debug!(name, "emit");
        self.services.emitted.push(ev.clone());
        self.services.custom_queue.push_back((self.id, ev));
    }

    /// Request a navigation.
    pub fn navigate(&mut self, url: impl Into<String>, new_tab: bool) {
        let url = url.into();
        debug!(url, new_tab, "navigate");
        self.services.navigations.push(Navigation { url, new_tab });
    }

    /// Persistent storage.
    pub fn storage(&mut self) -> &mut dyn Storage {
        self.services.storage.as_mut()
    }

    /// Write text to the clipboard.
    pub fn write_clipboard(&mut self, text: &str) -> Result<()> {
        if self.services.clipboard.denied {
            return Err(Error::Invalid("clipboard write denied".into()));
        }
        self.services.clipboard.text = Some(text.to_string());
        Ok(())
    }

    // ---- scrolling ----

    /// Scroll the window immediately. Returns the applied offset.
    pub fn scroll_window_to(&mut self, y: f64) -> f64 {
        self.doc.set_scroll_y(y)
    }

    /// Animate the window, or an element, to an offset with ease-in-out
    /// steps. A zero duration scrolls immediately.
    pub fn animate_scroll(
        &mut self,
        element: Option<NodeId>,
        to: f64,
        duration: Duration,
    ) -> Result<()> {
        start_scroll_animation(&mut *self.doc, &mut *self.services, element, to, duration)
    }

    // ---- other widgets ----

    /// Widgets bound exactly to `node`.
    pub fn widgets_at(&self, node: NodeId) -> Vec<WidgetId> {
        self.widgets
            .iter()
            .filter(|(_, e)| e.root == node)
            .map(|(id, _)| id)
            .collect()
    }

    /// Widgets whose root lies strictly inside `node`, in document order.
    pub fn widgets_within(&self, node: NodeId) -> Vec<WidgetId> {
        let mut out = vec![];
        for n in self.doc.descendants(node) {
            out.extend(self.widgets_at(n));
        }
        out
    }

    /// Run a closure against another widget.
    pub fn with_dyn<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut Context<'_>) -> Result<R>,
    ) -> Result<R> {
        call_widget(&mut *self.doc, &mut *self.services, &mut *self.widgets, id, f)
    }

    /// Run a closure against another widget of a known type.
    pub fn with_widget<W, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        self.with_dyn(id, |w, ctx| {
            let w = downcast_mut::<W>(w).ok_or_else(|| {
                Error::TypeMismatch(format!("expected {}", type_name::<W>()))
            })?;
            f(w, ctx)
        })
    }

    /// Run a closure against a typed widget.
    pub fn with_typed<W, R>(
        &mut self,
        id: TypedId<W>,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        self.with_widget(id.into(), f)
    }

    /// Run a closure against another widget if it is of type `W`.
    pub fn try_with_widget<W, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> Result<R>,
    ) -> Result<Option<R>>
    where
        W: Widget,
    {
        self.with_dyn(id, |w, ctx| match downcast_mut::<W>(w) {
            Some(w) => f(w, ctx).map(Some),
            None => Ok(None),
        })
    }

    /// Run a closure against another widget's filter control capability.
    /// Returns None if the widget has none.
    pub fn with_filter_control<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn FilterControl, &mut Context<'_>) -> Result<R>,
    ) -> Result<Option<R>> {
        self.with_dyn(id, |w, ctx| match w.filter_control() {
            Some(fc) => f(fc, ctx).map(Some),
            None => Ok(None),
        })
    }

    /// Ask another widget to close.
    pub fn dismiss(&mut self, id: WidgetId) -> Result<()> {
        self.with_dyn(id, |w, ctx| w.dismiss(ctx))
    }
}

/// Begin an animated scroll, replacing any running one. The first step is
/// applied immediately.
pub(crate) fn start_scroll_animation(
    doc: &mut Document,
    services: &mut Services,
    element: Option<NodeId>,
    to: f64,
    duration: Duration,
) -> Result<()> {
    if let Some(t) = services.scroll_timer.take() {
        services.timers.cancel(t);
    }
    let start = match element {
        Some(e) => doc.scroll_top(e),
        None => doc.scroll_y(),
    };
    services.scroll_animation = Some(ScrollAnimation {
        element,
        start,
        change: to - start,
        elapsed: 0.0,
        duration: duration.as_secs_f64() * 1000.0,
    });
    scroll_step(doc, services)
}

/// Apply one step of the running scroll animation and schedule the next.
pub(crate) fn scroll_step(doc: &mut Document, services: &mut Services) -> Result<()> {
    let Some(mut anim) = services.scroll_animation.take() else {
        return Ok(());
    };
    let step = services.config.timing.scroll_step;
    anim.elapsed += step as f64;
    let y = if anim.elapsed >= anim.duration {
        anim.start + anim.change
    } else {
        ease_in_out_quad(anim.elapsed, anim.start, anim.change, anim.duration)
    };
    match anim.element {
        Some(e) => doc.set_scroll_top(e, y)?,
        None => {
            doc.set_scroll_y(y);
        }
    }
    if anim.elapsed < anim.duration {
        services.scroll_animation = Some(anim);
        services.scroll_timer = Some(
            services
                .timers
                .schedule(TimerOwner::Page(PageTask::ScrollStep), ms(step)),
        );
    }
    Ok(())
}
