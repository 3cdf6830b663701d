//! The page runtime: widget definitions, lifecycle, event dispatch and the
//! shared managers.

use std::{
    any::type_name,
    collections::{HashMap, HashSet},
    mem,
    time::Duration,
};

use tracing::{debug, error, warn};

use crate::{
    NodeId, TimerId, TypedId, WidgetId,
    core::{
        broadcast::Viewport,
        config::{Config, ms},
        context::{
            Context, WidgetEntry, WidgetStore, call_widget, scroll_step, start_scroll_animation,
        },
        dom::Document,
        scroll_lock::LOCKED_CLASS,
        selector::Selector,
        services::{Clipboard, Navigation, Services},
        storage::Storage,
        timer::{PageTask, TimerOwner},
    },
    error::{Error, Result},
    event::{CustomEvent, Event, key::{Key, KeyCode}},
    widget::{EventOutcome, Widget, downcast_mut},
};

/// Upper bound on settle passes after one input.
const SETTLE_LIMIT: usize = 64;

/// Builds a widget for a matched element.
pub type Factory = Box<dyn Fn(&mut Context<'_>) -> Result<Box<dyn Widget>> + Send>;

/// A widget definition: which elements it binds to and how to build it.
struct Definition {
    /// Label used in diagnostics.
    label: &'static str,
    /// Elements this definition binds to.
    selector: Selector,
    /// Widget constructor.
    factory: Factory,
}

/// Bubbling state for one dispatched event.
#[derive(Debug, Default, Clone, Copy)]
struct Propagation {
    /// Default action suppressed.
    prevented: bool,
    /// Propagation stopped.
    stopped: bool,
}

/// A document together with its widgets and shared services.
pub struct Page {
    /// The document.
    doc: Document,
    /// Shared services.
    services: Services,
    /// Connected widgets.
    widgets: WidgetStore,
    /// Widget definitions, in registration order.
    defs: Vec<Definition>,
    /// Widgets by root element, in connection order.
    by_root: HashMap<NodeId, Vec<WidgetId>>,
    /// Element and definition pairs already attempted.
    attempted: HashSet<(NodeId, usize)>,
    /// Pending debounced resize.
    resize_timer: Option<TimerId>,
}

impl Page {
    /// A page over a document.
    pub fn new(doc: Document, config: Config) -> Self {
        let (width, height) = doc.viewport();
        let viewport = Viewport {
            width: width.floor(),
            height,
        };
        let services = Services::new(config, viewport, doc.scroll_y());
        Self {
            doc,
            services,
            widgets: WidgetStore::with_key(),
            defs: vec![],
            by_root: HashMap::new(),
            attempted: HashSet::new(),
            resize_timer: None,
        }
    }

    /// Register a widget definition for elements matching `selector`.
    pub fn define<W, F>(&mut self, label: &'static str, selector: &str, build: F) -> Result<()>
    where
        W: Widget,
        F: Fn(&mut Context<'_>) -> Result<W> + Send + 'static,
    {
        let selector = Selector::parse(selector)?;
        self.defs.push(Definition {
            label,
            selector,
            factory: Box::new(move |ctx| Ok(Box::new(build(ctx)?) as Box<dyn Widget>)),
        });
        Ok(())
    }

    /// Attach widgets to every matching element, then apply the initial
    /// viewport measurements and broadcast them.
    pub fn upgrade(&mut self) -> Result<()> {
        self.attach_all();
        self.settle()?;
        self.flush_resize()?;
        self.settle()
    }

    // ---- accessors ----

    /// The document.
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// The document, mutably. Call [`Page::settle`] after mutating so that
    /// widgets attach, detach and observe the change.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Shared services.
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Page configuration.
    pub fn config(&self) -> &Config {
        &self.services.config
    }

    /// Current time on the page clock.
    pub fn now(&self) -> Duration {
        self.services.timers.now()
    }

    /// Replace the persistent storage.
    pub fn set_storage(&mut self, storage: Box<dyn Storage>) {
        self.services.storage = storage;
    }

    /// Persistent storage.
    pub fn storage(&self) -> &dyn Storage {
        self.services.storage.as_ref()
    }

    /// Persistent storage, mutably.
    pub fn storage_mut(&mut self) -> &mut dyn Storage {
        self.services.storage.as_mut()
    }

    /// The clipboard.
    pub fn clipboard(&self) -> &Clipboard {
        &self.services.clipboard
    }

    /// The clipboard, mutably.
    pub fn clipboard_mut(&mut self) -> &mut Clipboard {
        &mut self.services.clipboard
    }

    /// Navigations requested so far.
    pub fn navigations(&self) -> &[Navigation] {
        &self.services.navigations
    }

    /// Custom events emitted so far.
    pub fn emitted(&self) -> &[CustomEvent] {
        &self.services.emitted
    }

    /// Take the custom event log.
    pub fn take_emitted(&mut self) -> Vec<CustomEvent> {
        mem::take(&mut self.services.emitted)
    }

    /// Number of connected widgets.
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Widgets bound to an element, in connection order.
    pub fn widgets_at(&self, node: NodeId) -> Vec<WidgetId> {
        self.by_root.get(&node).cloned().unwrap_or_default()
    }

    /// Root element and definition label of a widget.
    pub fn widget_info(&self, id: WidgetId) -> Option<(NodeId, &'static str)> {
        self.widgets.get(id).map(|e| (e.root, e.label))
    }

    /// Every connected widget, in document order of its root.
    pub fn widget_ids(&self) -> Vec<WidgetId> {
        let mut nodes = vec![self.doc.root()];
        nodes.extend(self.doc.descendants(self.doc.root()));
        nodes.into_iter().flat_map(|n| self.widgets_at(n)).collect()
    }

    /// The widget of type `W` bound to `node`.
    pub fn find_at<W: Widget>(&mut self, node: NodeId) -> Option<TypedId<W>> {
        self.widgets_at(node).into_iter().find_map(|id| {
            let entry = self.widgets.get_mut(id)?;
            let w = entry.widget.as_mut()?;
            downcast_mut::<W>(w.as_mut()).map(|_| TypedId::new(id))
        })
    }

    /// The first widget of type `W` in document order.
    pub fn find<W: Widget>(&mut self) -> Option<TypedId<W>> {
        self.widget_ids().into_iter().find_map(|id| {
            let entry = self.widgets.get_mut(id)?;
            let w = entry.widget.as_mut()?;
            downcast_mut::<W>(w.as_mut()).map(|_| TypedId::new(id))
        })
    }

    /// Run a closure against a widget, then settle.
    pub fn with_widget<W, R>(
        &mut self,
        id: impl Into<WidgetId>,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        let (doc, services, widgets) = (&mut self.doc, &mut self.services, &mut self.widgets);
        let out = call_widget(doc, services, widgets, id.into(), |w, ctx| {
            let w = downcast_mut::<W>(w)
                .ok_or_else(|| Error::TypeMismatch(format!("expected {}", type_name::<W>())))?;
            f(w, ctx)
        })?;
        self.settle()?;
        Ok(out)
    }

    /// Read a widget without settling.
    pub fn inspect<W, R>(
        &mut self,
        id: impl Into<WidgetId>,
        f: impl FnOnce(&W, &Document) -> R,
    ) -> Result<R>
    where
        W: Widget,
    {
        let id = id.into();
        let entry = self.widgets.get_mut(id).ok_or(Error::WidgetNotFound(id))?;
        let w = entry.widget.as_mut().ok_or(Error::ReentrantWidgetBorrow(id))?;
        let w = downcast_mut::<W>(w.as_mut())
            .ok_or_else(|| Error::TypeMismatch(format!("expected {}", type_name::<W>())))?;
        Ok(f(w, &self.doc))
    }

    // ---- input ----

    /// Dispatch an event, then settle.
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        self.dispatch_one(&event)?;
        self.settle()
    }

    /// A primary click: focus moves to the nearest focusable ancestor (or is
    /// dropped), then the click is dispatched.
    pub fn click(&mut self, node: NodeId) -> Result<()> {
        self.doc.el(node)?;
        let target = self
            .doc
            .ancestors(node)
            .into_iter()
            .find(|n| self.doc.is_focusable(*n));
        match target {
            Some(t) => {
                self.doc.focus(t);
            }
            None => self.doc.blur(),
        }
        self.settle()?;
        self.dispatch(Event::Click(node))
    }

    /// The element keyboard input goes to.
    fn key_target(&self) -> NodeId {
        self.doc.active().unwrap_or_else(|| self.doc.body())
    }

    /// Press a key on the focused element.
    pub fn key(&mut self, key: impl Into<Key>) -> Result<()> {
        let target = self.key_target();
        self.dispatch(Event::Key(target, key.into()))
    }

    /// Type a string one key at a time.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.key(c)?;
        }
        Ok(())
    }

    /// Paste text into the focused element.
    pub fn paste(&mut self, text: &str) -> Result<()> {
        let target = self.key_target();
        self.dispatch(Event::Paste(target, text.to_string()))
    }

    /// Move the pointer over an element.
    pub fn pointer_move(&mut self, node: NodeId) -> Result<()> {
        self.dispatch(Event::PointerMove(node))
    }

    /// Focus an element. Returns false if it cannot take focus.
    pub fn focus(&mut self, node: NodeId) -> Result<bool> {
        let ok = self.doc.focus(node);
        self.settle()?;
        Ok(ok)
    }

    /// Drop focus.
    pub fn blur(&mut self) -> Result<()> {
        self.doc.blur();
        self.settle()
    }

    /// Set a field's value as a user edit would, firing input.
    pub fn input_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.doc.set_value(node, value)?;
        self.dispatch(Event::Input(node))
    }

    /// Scroll the window. Ignored while the body is pinned.
    pub fn scroll_window(&mut self, y: f64) -> Result<()> {
        self.doc.set_scroll_y(y);
        self.settle()
    }

    /// Scroll an element.
    pub fn scroll_element(&mut self, node: NodeId, left: f64, top: f64) -> Result<()> {
        self.doc.set_scroll_left(node, left)?;
        self.doc.set_scroll_top(node, top)?;
        self.settle()
    }

    /// Resize the viewport. Subscribers hear about it once the size has been
    /// stable for the debounce period.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        self.doc.set_viewport(width, height);
        if let Some(t) = self.resize_timer.take() {
            self.services.timers.cancel(t);
        }
        let delay = ms(self.services.config.timing.resize_debounce);
        self.resize_timer = Some(
            self.services
                .timers
                .schedule(TimerOwner::Page(PageTask::ResizeFlush), delay),
        );
        self.settle()
    }

    /// Advance the clock, firing due timers in order.
    pub fn advance(&mut self, by: Duration) -> Result<()> {
        let until = self.services.timers.now() + by;
        while let Some((_, owner)) = self.services.timers.pop_due(until) {
            self.fire(owner)?;
            self.settle()?;
        }
        self.services.timers.set_now(until);
        self.settle()
    }

    /// Advance the clock until no timers remain, up to `limit`.
    pub fn run_timers(&mut self, limit: Duration) -> Result<()> {
        let end = self.services.timers.now() + limit;
        while let Some(wait) = self.services.timers.next_wait() {
            if self.services.timers.now() + wait > end {
                break;
            }
            self.advance(wait)?;
        }
        Ok(())
    }

    // ---- global page API ----

    /// Disable page scrolling.
    pub fn disable_scroll(&mut self) -> Result<()> {
        self.services.lock.disable(&mut self.doc)?;
        self.settle()
    }

    /// Release one scroll lock.
    pub fn enable_scroll(&mut self) -> Result<()> {
        if self.services.lock.enable(&mut self.doc)? {
            let delay = ms(self.services.config.timing.scroll_behavior_restore);
            self.services
                .timers
                .schedule(TimerOwner::Page(PageTask::ScrollBehaviorRestore), delay);
        }
        self.settle()
    }

    /// Close the innermost open modal. Returns false if none is open.
    pub fn close_modal(&mut self) -> Result<bool> {
        let Some(id) = self.services.overlays.top_modal() else {
            return Ok(false);
        };
        call_widget(&mut self.doc, &mut self.services, &mut self.widgets, id, |w, ctx| {
            w.dismiss(ctx)
        })?;
        self.settle()?;
        Ok(true)
    }

    /// Animate the window (or an element) to a vertical offset.
    pub fn scroll_to_position(
        &mut self,
        element: Option<NodeId>,
        to: f64,
        duration: Duration,
    ) -> Result<()> {
        start_scroll_animation(&mut self.doc, &mut self.services, element, to, duration)?;
        self.settle()
    }

    // ---- lifecycle ----

    /// Run everything the last change set in motion: queued events, custom
    /// events, widget attachment and detachment, mutation watches, scroll
    /// broadcasts and intersection changes.
    pub fn settle(&mut self) -> Result<()> {
        for _ in 0..SETTLE_LIMIT {
            let mut busy = false;
            while let Some(ev) = self.doc.next_event() {
                busy = true;
                self.dispatch_one(&ev)?;
            }
            while let Some((from, ev)) = self.services.custom_queue.pop_front() {
                busy = true;
                self.deliver_custom(from, &ev);
            }
            busy |= self.reap();
            let mutated = self.doc.take_mutations();
            if !mutated.is_empty() {
                busy = true;
                self.attach_all();
                for id in self.services.mutations.affected(&self.doc, &mutated) {
                    self.run_hook(id, "mutation", |w, ctx| w.on_mutation(ctx));
                }
            }
            busy |= self.broadcast_scroll();
            let batches = self.services.intersections.refresh(&self.doc);
            for (id, entries) in batches {
                busy = true;
                self.run_hook(id, "intersection", |w, ctx| w.on_intersection(&entries, ctx));
            }
            if !busy {
                return Ok(());
            }
        }
        warn!("page did not settle after {SETTLE_LIMIT} passes");
        Ok(())
    }

    /// Attach every definition to matching elements that lack an instance.
    fn attach_all(&mut self) {
        let mut nodes = vec![self.doc.root()];
        nodes.extend(self.doc.descendants(self.doc.root()));
        for di in 0..self.defs.len() {
            for node in &nodes {
                if !self.doc.exists(*node)
                    || self.attempted.contains(&(*node, di))
                    || !self.defs[di].selector.matches(&self.doc, *node)
                {
                    continue;
                }
                self.attempted.insert((*node, di));
                self.attach(di, *node);
            }
        }
    }

    /// Build and connect one widget.
    fn attach(&mut self, di: usize, node: NodeId) {
        let label = self.defs[di].label;
        let id = self.widgets.insert(WidgetEntry {
            root: node,
            label,
            widget: None,
        });
        let built = {
            let mut ctx =
                Context::new(&mut self.doc, &mut self.services, &mut self.widgets, id, node);
            (self.defs[di].factory)(&mut ctx)
        };
        let widget = match built {
            Ok(w) => w,
            Err(e) => {
                error!(widget = label, "attach failed: {e}");
                self.drop_widget(id);
                return;
            }
        };
        if let Some(entry) = self.widgets.get_mut(id) {
            entry.widget = Some(widget);
        }
        self.by_root.entry(node).or_default().push(id);
        debug!(widget = label, "connect");
        let (doc, services, widgets) = (&mut self.doc, &mut self.services, &mut self.widgets);
        let connected = call_widget(doc, services, widgets, id, |w, ctx| w.on_connect(ctx));
        if let Err(e) = connected {
            error!(widget = label, "connect failed: {e}");
            self.drop_widget(id);
        }
    }

    /// Disconnect widgets whose root left the document. Returns true if any
    /// did.
    fn reap(&mut self) -> bool {
        let gone: Vec<NodeId> = self
            .by_root
            .keys()
            .filter(|n| !self.doc.is_connected(**n))
            .copied()
            .collect();
        if gone.is_empty() {
            return false;
        }
        for node in gone {
            for id in self.by_root.get(&node).cloned().unwrap_or_default() {
                self.disconnect(id);
            }
            self.attempted.retain(|(n, _)| *n != node);
        }
        true
    }

    /// Disconnect and drop one widget.
    fn disconnect(&mut self, id: WidgetId) {
        let label = self.widgets.get(id).map_or("widget", |e| e.label);
        debug!(widget = label, "disconnect");
        let done = call_widget(&mut self.doc, &mut self.services, &mut self.widgets, id, |w, ctx| {
            w.on_disconnect(ctx);
            Ok(())
        });
        if let Err(e) = done {
            warn!(widget = label, hook = "disconnect", "{e}");
        }
        self.drop_widget(id);
    }

    /// Release a widget's registrations and remove it.
    fn drop_widget(&mut self, id: WidgetId) {
        self.services.release_widget(id);
        if let Err(e) = self.services.inert.release(&mut self.doc, id) {
            warn!("inert release failed: {e}");
        }
        if let Some(entry) = self.widgets.remove(id)
            && let Some(ids) = self.by_root.get_mut(&entry.root)
        {
            ids.retain(|w| *w != id);
            if ids.is_empty() {
                self.by_root.remove(&entry.root);
            }
        }
    }

    /// Run a hook, logging failures.
    fn run_hook(
        &mut self,
        id: WidgetId,
        hook: &'static str,
        f: impl FnOnce(&mut dyn Widget, &mut Context<'_>) -> Result<()>,
    ) {
        if !self.widgets.contains_key(id) {
            return;
        }
        if let Err(e) = call_widget(&mut self.doc, &mut self.services, &mut self.widgets, id, f) {
            let label = self.widgets.get(id).map_or("widget", |entry| entry.label);
            warn!(widget = label, hook, "{e}");
        }
    }

    /// Run an event hook, logging failures as unhandled.
    fn run_event_hook(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut Context<'_>) -> Result<EventOutcome>,
    ) -> Option<EventOutcome> {
        if !self.widgets.contains_key(id) {
            return None;
        }
        match call_widget(&mut self.doc, &mut self.services, &mut self.widgets, id, f) {
            Ok(o) => Some(o),
            Err(e) => {
                let label = self.widgets.get(id).map_or("widget", |entry| entry.label);
                warn!(widget = label, "event handler failed: {e}");
                None
            }
        }
    }

    // ---- dispatch ----

    /// Bubble one event through the widgets on its path, then to document
    /// listeners, then run its default action.
    fn dispatch_one(&mut self, event: &Event) -> Result<()> {
        let target = event.target();
        if !self.doc.exists(target) {
            return Ok(());
        }
        let mut prop = Propagation::default();
        'bubble: for node in self.doc.ancestors(target) {
            for id in self.widgets_at(node) {
                if let Some(o) = self.run_event_hook(id, |w, ctx| w.on_event(event, ctx)) {
                    prop.prevented |= o.prevents();
                    if o.stops() {
                        prop.stopped = true;
                        break 'bubble;
                    }
                }
            }
        }
        if !prop.stopped {
            for id in self.services.doc_listeners.clone() {
                if let Some(o) = self.run_event_hook(id, |w, ctx| w.on_document_event(event, ctx)) {
                    prop.prevented |= o.prevents();
                }
            }
        }
        if !prop.prevented && self.doc.exists(target) {
            self.default_action(event)?;
        }
        Ok(())
    }

    /// Deliver a custom event to widgets rooted at or above its source.
    fn deliver_custom(&mut self, from: WidgetId, event: &CustomEvent) {
        if !self.doc.exists(event.source) {
            return;
        }
        for node in self.doc.ancestors(event.source) {
            for id in self.widgets_at(node) {
                if id != from {
                    self.run_hook(id, "custom", |w, ctx| w.on_custom_event(event, ctx));
                }
            }
        }
    }

    /// Room left in a text field before its `maxlength`.
    fn room(&self, node: NodeId) -> usize {
        let Some(max) = self.doc.attr_f64(node, "maxlength") else {
            return usize::MAX;
        };
        let (start, end) = self.doc.selection(node);
        let used = self
            .doc
            .value(node)
            .chars()
            .count()
            .saturating_sub(end.saturating_sub(start));
        (max.max(0.0) as usize).saturating_sub(used)
    }

    /// Is the field editable by the user?
    fn editable(&self, node: NodeId) -> bool {
        self.doc.is_text_field(node)
            && !self.doc.has_attr(node, "readonly")
            && !self.doc.has_attr(node, "disabled")
    }

    /// The browser's behaviour for an event nobody prevented.
    fn default_action(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::Key(t, k) => self.key_default(*t, *k),
            Event::Paste(t, text) => {
                if self.editable(*t) {
                    let text: String = text.chars().take(self.room(*t)).collect();
                    self.doc.insert_text(*t, &text)?;
                    self.doc.queue_event(Event::Input(*t));
                }
                Ok(())
            }
            Event::Click(t) => self.click_default(*t),
            _ => Ok(()),
        }
    }

    /// Default keyboard behaviour.
    fn key_default(&mut self, t: NodeId, k: Key) -> Result<()> {
        if k.is_tab() {
            if let Some(n) = self.doc.next_tabbable(k.mods.shift) {
                self.doc.focus(n);
            }
            return Ok(());
        }
        if self.editable(t) {
            match k.key {
                KeyCode::Backspace => {
                    self.doc.delete_backward(t)?;
                    self.doc.queue_event(Event::Input(t));
                }
                KeyCode::Enter if self.doc.get(t).is_some_and(|e| e.tag() == "input") => {
                    if let Some(form) = self.doc.closest(t, "form")? {
                        self.doc.queue_event(Event::Submit(form));
                    }
                }
                _ => {
                    if let Some(c) = k.printable()
                        && self.room(t) > 0
                    {
                        self.doc.insert_text(t, &c.to_string())?;
                        self.doc.queue_event(Event::Input(t));
                    }
                }
            }
            return Ok(());
        }
        let el = self.doc.el(t)?;
        let checkbox = el.tag() == "input" && el.attr("type") == Some("checkbox");
        let button = el.tag() == "button" || el.attr("role") == Some("button");
        let link = el.tag() == "a" && el.has_attr("href");
        let disabled = el.disabled();
        let activates = match k.key {
            KeyCode::Enter => button || link,
            KeyCode::Char(' ') => (button || checkbox) && k.printable().is_some(),
            _ => false,
        };
        if activates && !disabled {
            self.doc.queue_event(Event::Click(t));
        }
        Ok(())
    }

    /// Default click behaviour.
    fn click_default(&mut self, t: NodeId) -> Result<()> {
        let el = self.doc.el(t)?;
        if el.disabled() {
            return Ok(());
        }
        let input_type =
            (el.tag() == "input").then(|| el.attr("type").unwrap_or("text").to_string());
        let checked = el.checked();
        let name = el.attr("name").map(str::to_string);
        match input_type.as_deref() {
            Some("checkbox") => {
                self.doc.set_checked(t, !checked)?;
                self.doc.queue_event(Event::Change(t));
                return Ok(());
            }
            Some("radio") => {
                if !checked {
                    if let Some(name) = name {
                        let sel = format!("input[type=radio][name=\"{name}\"]");
                        for r in self.doc.query_all(self.doc.root(), &sel)? {
                            self.doc.set_checked(r, false)?;
                        }
                    }
                    self.doc.set_checked(t, true)?;
                    self.doc.queue_event(Event::Change(t));
                }
                return Ok(());
            }
            Some(_) => return Ok(()),
            None => {}
        }
        if let Some(b) = self.doc.closest(t, "button")? {
            if self.doc.attr(b, "type").unwrap_or("submit") == "submit"
                && let Some(form) = self.doc.closest(b, "form")?
            {
                self.doc.queue_event(Event::Submit(form));
            }
            return Ok(());
        }
        if let Some(a) = self.doc.closest(t, "a[href]")? {
            let href = self.doc.attr(a, "href").unwrap_or_default().to_string();
            let new_tab = self.doc.attr(a, "target") == Some("_blank");
            let url = self.doc.location().join(&href)?;
            debug!(url = url.as_str(), "link navigation");
            self.services.navigations.push(Navigation {
                url: url.to_string(),
                new_tab,
            });
        }
        Ok(())
    }

    // ---- managers ----

    /// Broadcast a window scroll change, unless scrolling is locked. Returns
    /// true if subscribers ran.
    fn broadcast_scroll(&mut self) -> bool {
        let y = self.doc.scroll_y();
        if self.services.lock.is_locked()
            || self.doc.has_class(self.doc.body(), LOCKED_CLASS)
            || (*self.services.scroll.last() - y).abs() < f64::EPSILON
        {
            return false;
        }
        self.services.scroll.set(y);
        for (sub, widget) in self.services.scroll.targets() {
            match widget {
                Some(id) => self.run_hook(id, "scroll", |w, ctx| w.on_scroll(y, ctx)),
                None => self.services.scroll.call(sub),
            }
        }
        true
    }

    /// Measure the viewport, publish it as CSS custom properties and
    /// broadcast it.
    fn flush_resize(&mut self) -> Result<()> {
        let (width, height) = self.doc.viewport();
        let vp = Viewport {
            width: width.floor(),
            height,
        };
        let html = self.doc.root();
        self.doc.set_style(html, "--h-header", "")?;
        self.doc.set_style(html, "--w-viewport", format!("{}px", vp.width))?;
        self.doc.set_style(html, "--h-viewport", format!("{}px", vp.height))?;
        if let Some(header) = self.doc.query(html, "header")? {
            let h = self.doc.rect(header).h.floor();
            self.doc.set_style(html, "--h-header", format!("{h}px"))?;
        }
        if let Some(nav) = self.doc.query(html, "secondary-nav-interface")? {
            let h = self.doc.rect(nav).h;
            self.doc.set_style(html, "--h-sticky-header", format!("{h}px"))?;
        }
        self.services.resize.set(vp);
        for (sub, widget) in self.services.resize.targets() {
            match widget {
                Some(id) => self.run_hook(id, "resize", |w, ctx| w.on_resize(vp, ctx)),
                None => self.services.resize.call(sub),
            }
        }
        Ok(())
    }

    /// Handle a fired timer.
    fn fire(&mut self, owner: TimerOwner) -> Result<()> {
        match owner {
            TimerOwner::Widget(id, tag) => {
                self.run_hook(id, "timer", |w, ctx| w.on_timer(tag, ctx));
            }
            TimerOwner::Page(PageTask::ResizeFlush) => {
                self.resize_timer = None;
                self.flush_resize()?;
            }
            TimerOwner::Page(PageTask::ScrollBehaviorRestore) => {
                self.services.lock.restore_behavior(&mut self.doc)?;
            }
            TimerOwner::Page(PageTask::ScrollStep) => {
                self.services.scroll_timer = None;
                scroll_step(&mut self.doc, &mut self.services)?;
            }
        }
        Ok(())
    }
}
