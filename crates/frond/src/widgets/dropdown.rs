//! Dropdown menus: option lists, checkbox multi-selects and in-page section
//! menus, with at most one dropdown open per page.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    broadcast::{SubscriptionId, Viewport},
    config::ms,
    event::{
        Event,
        key::{Empty, Key, KeyCode},
    },
    focus_trap::FocusTrap,
};

use super::{overlay::OverlayState, scrollbar};

/// Class on the active in-page menu link.
const ACTIVE: &str = "is-active";
/// Class on menu items whose section is missing.
const HIDDEN_ITEM: &str = "menu-item-hidden";
/// Class on the keyboard-highlighted option.
const HAS_FOCUS: &str = "has-focus";
/// Root class while a scroll-locking dropdown is open.
const OVERLAY_CLASS: &str = "show-modal-overlay";
/// Offset applied when jumping to an in-page section.
const JUMP_OFFSET: f64 = -80.0;
/// Delay before jumping, so the close has released the page.
const JUMP_DELAY: Duration = Duration::from_millis(50);

/// Strip a trailing ` (n)` count from a label.
pub fn base_label(text: &str) -> &str {
    text.split(" (").next().unwrap_or(text)
}

/// The next option at or after `from` whose label starts with `c`. Never
/// wraps to the start of the list.
pub fn type_ahead<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    from: usize,
    c: char,
) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    labels
        .into_iter()
        .enumerate()
        .skip(from)
        .find(|(_, l)| l.chars().next().map(|f| f.to_ascii_lowercase()) == Some(c))
        .map(|(i, _)| i)
}

/// Resolved child elements of a dropdown.
#[derive(Debug)]
struct Parts {
    /// Toggle button.
    button: NodeId,
    /// Label inside the button.
    label: NodeId,
    /// Scrollable options list.
    list: Option<NodeId>,
    /// Popup container.
    popup: NodeId,
    /// Reset button.
    reset: Option<NodeId>,
    /// Reset button outside the dropdown's own flow.
    reset_filters: Option<NodeId>,
    /// Close button.
    close: Option<NodeId>,
    /// Apply button.
    apply: Option<NodeId>,
    /// Multi-select checkboxes.
    checkboxes: Vec<NodeId>,
    /// Single-select options.
    options: Vec<NodeId>,
    /// In-page menu links.
    links: Vec<NodeId>,
}

impl Parts {
    /// Query everything under the root.
    fn resolve(ctx: &Context) -> Result<Self> {
        let button = ctx.require("[dropdown-btn]")?;
        let popup = ctx.require("[dropdown-popup]")?;
        let doc = ctx.doc();
        Ok(Self {
            button,
            label: doc.query(button, "[dropdown-btn-text]")?.unwrap_or(button),
            list: ctx.query("[dropdown-options-list]")?,
            popup,
            reset: ctx.query("[dropdown-reset-btn]")?,
            reset_filters: ctx.query("[x-pagination-reset-filters-btn]")?,
            close: doc.query(popup, "[dropdown-close-btn]")?,
            apply: doc.query(popup, "[dropdown-apply-btn]")?,
            checkboxes: doc.query_all(popup, "[type=checkbox]")?,
            options: doc.query_all(popup, "[role=option]")?,
            links: ctx.query_all("[dropdown-inpage-menu-link]")?,
        })
    }

    /// Elements keyboard navigation and type-ahead move through.
    fn selectable(&self) -> Vec<NodeId> {
        let mut out = if !self.options.is_empty() {
            self.options.clone()
        } else if !self.checkboxes.is_empty() {
            self.checkboxes.clone()
        } else {
            self.links.clone()
        };
        out.extend(self.reset);
        out
    }
}

/// A `dropdown-interface` element.
#[derive(Debug)]
pub struct Dropdown {
    /// Child elements.
    parts: Parts,
    /// Navigable elements, reset button last.
    selectable: Vec<NodeId>,
    /// Button text when nothing is selected.
    default_value: String,
    /// Lifecycle state.
    state: OverlayState,
    /// Keyboard-highlighted option.
    active: Option<usize>,
    /// Did opening take a scroll lock?
    locked: bool,
    /// Section tops for in-page menu links, by link index.
    section_tops: Vec<Option<f64>>,
    /// Section an in-page link click will scroll to.
    jump: Option<NodeId>,
    /// Scroll subscription.
    scroll_sub: Option<SubscriptionId>,
}

impl Dropdown {
    /// Bind to the root.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let parts = Parts::resolve(ctx)?;
        let root = ctx.root();
        Ok(Self {
            selectable: parts.selectable(),
            default_value: ctx
                .doc()
                .attr(root, "dropdown-default-value")
                .unwrap_or_default()
                .to_string(),
            section_tops: vec![None; parts.links.len()],
            parts,
            state: OverlayState::Closed,
            active: None,
            locked: false,
            jump: None,
            scroll_sub: None,
        })
    }

    /// Lifecycle state.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Is the dropdown open?
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Index of the keyboard-highlighted option.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Is the dropdown disabled?
    fn disabled(ctx: &Context) -> bool {
        ctx.doc().has_attr(ctx.root(), "disabled")
    }

    /// Should opening lock page scroll at the current width?
    fn wants_lock(ctx: &Context) -> bool {
        let doc = ctx.doc();
        let root = ctx.root();
        if ctx.is_desktop() {
            doc.has_attr(root, "desktop-scroll-lock-on-open")
        } else {
            doc.has_attr(root, "mobile-scroll-lock-on-open")
        }
    }

    /// Animation length for the current width.
    fn duration(ctx: &Context, opening: bool) -> Duration {
        let t = &ctx.config().timing;
        ms(match (ctx.is_desktop(), opening) {
            (true, true) => t.dropdown_open,
            (true, false) => t.dropdown_close,
            (false, true) => t.dropdown_open_mobile,
            (false, false) => t.dropdown_close_mobile,
        })
    }

    /// Height the popup opens to.
    fn popup_height(&self, ctx: &Context) -> f64 {
        let doc = ctx.doc();
        let full = doc.scroll_height(self.parts.popup);
        if ctx.is_desktop() {
            return full;
        }
        let vh = ctx.viewport().height;
        if doc.has_attr(ctx.root(), "data-filter") {
            return vh;
        }
        full.min(vh - doc.client_rect(self.parts.popup).y)
    }

    /// Align the popup to the right when it starts past the middle of a
    /// desktop viewport.
    fn set_position(&self, ctx: &mut Context) -> Result<()> {
        if !ctx.is_desktop() {
            return Ok(());
        }
        let rect = ctx.doc().client_rect(self.parts.popup);
        let right_aligned = rect.x > ctx.viewport().width / 2.0;
        ctx.doc_mut()
            .toggle_class(self.parts.popup, "is-right-aligned", right_aligned)
    }

    /// Open, closing any other open dropdown first.
    pub fn open(&mut self, ctx: &mut Context) -> Result<()> {
        if self.is_open() || Self::disabled(ctx) {
            return Ok(());
        }
        let me = ctx.id();
        if let Some(other) = ctx.overlays().dropdown.filter(|o| *o != me) {
            ctx.dismiss(other)?;
        }
        ctx.overlays().dropdown = Some(me);
        self.state = OverlayState::Opening;
        debug!(widget = ?me, "dropdown open");
        if Self::wants_lock(ctx) {
            ctx.lock_scroll()?;
            let html = ctx.doc().root();
            ctx.doc_mut().add_class(html, OVERLAY_CLASS)?;
            self.locked = true;
        }
        ctx.release_inert()?;
        self.set_position(ctx)?;
        let height = self.popup_height(ctx);
        let doc = ctx.doc_mut();
        doc.set_attr(self.parts.button, "aria-expanded", "true")?;
        doc.set_attr(self.parts.popup, "aria-hidden", "false")?;
        doc.set_style(self.parts.popup, "height", format!("{height}px"))?;
        let delay = Self::duration(ctx, true);
        ctx.schedule(delay, "opened");
        Ok(())
    }

    /// Close and return focus to the button.
    pub fn close(&mut self, ctx: &mut Context) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        self.state = OverlayState::Closing;
        let me = ctx.id();
        if ctx.overlays().dropdown == Some(me) {
            ctx.overlays().dropdown = None;
        }
        debug!(widget = ?me, "dropdown close");
        if self.locked {
            ctx.unlock_scroll()?;
            let html = ctx.doc().root();
            ctx.doc_mut().remove_class(html, OVERLAY_CLASS)?;
            self.locked = false;
        }
        let doc = ctx.doc_mut();
        doc.set_attr(self.parts.button, "aria-expanded", "false")?;
        doc.set_attr(self.parts.popup, "aria-hidden", "true")?;
        for c in &self.parts.checkboxes {
            doc.set_attr(*c, "tabindex", "-1")?;
        }
        ctx.claim_inert(&[self.parts.popup])?;
        ctx.focus(self.parts.button);
        let delay = Self::duration(ctx, false);
        ctx.schedule(delay, "closed");
        Ok(())
    }

    /// Open or close.
    pub fn toggle(&mut self, ctx: &mut Context) -> Result<()> {
        if self.is_open() { self.close(ctx) } else { self.open(ctx) }
    }

    /// The open animation finished.
    fn opened(&mut self, ctx: &mut Context) -> Result<()> {
        self.state = OverlayState::Open;
        let doc = ctx.doc_mut();
        doc.set_attr(self.parts.popup, "tabindex", "0")?;
        if let Some(r) = self.parts.reset {
            doc.set_attr(r, "tabindex", "0")?;
        }
        for c in &self.parts.checkboxes {
            doc.set_attr(*c, "tabindex", "0")?;
        }
        if let Some(first) = self.parts.checkboxes.first() {
            ctx.focus(*first);
        }
        scrollbar::refresh_within(ctx, self.parts.popup)
    }

    /// The close animation finished.
    fn closed(&mut self, ctx: &mut Context) -> Result<()> {
        self.state = OverlayState::Closed;
        let doc = ctx.doc_mut();
        doc.set_attr(self.parts.popup, "tabindex", "-1")?;
        doc.set_style(self.parts.popup, "height", "0px")?;
        if let Some(r) = self.parts.reset {
            doc.set_attr(r, "tabindex", "-1")?;
        }
        Ok(())
    }

    /// Show the number of checked boxes in the button label.
    fn update_count(&self, ctx: &mut Context) -> Result<()> {
        let n = self
            .parts
            .checkboxes
            .iter()
            .filter(|c| ctx.doc().checked(**c))
            .count();
        let label = self.parts.label;
        let base = base_label(&ctx.doc().text_content(label)).to_string();
        let doc = ctx.doc_mut();
        if n == 0 {
            doc.remove_attr(label, "data-checked-count")?;
            doc.set_text(label, base)?;
        } else {
            doc.set_attr(label, "data-checked-count", format!("({n})"))?;
            doc.set_text(label, format!("{base} ({n})"))?;
        }
        self.show_reset(ctx, n > 0)
    }

    /// Show or hide the reset button's container.
    fn show_reset(&self, ctx: &mut Context, show: bool) -> Result<()> {
        let Some(parent) = self.parts.reset.and_then(|r| ctx.doc().parent(r)) else {
            return Ok(());
        };
        ctx.doc_mut()
            .set_attr(parent, "aria-hidden", (!show).to_string())
    }

    /// An option was chosen.
    fn choose(&mut self, ctx: &mut Context, option: NodeId) -> Result<()> {
        let value = ctx.doc().attr(option, "value").unwrap_or_default().to_string();
        let doc = ctx.doc_mut();
        for o in &self.parts.options {
            doc.set_attr(*o, "aria-selected", "false")?;
        }
        doc.set_text(self.parts.label, value)?;
        doc.set_attr(option, "aria-selected", "true")?;
        self.show_reset(ctx, true)?;
        if !ctx.doc().has_attr(ctx.root(), "multiselect") {
            self.close(ctx)?;
        }
        Ok(())
    }

    /// Clear every selection and close.
    pub fn reset(&mut self, ctx: &mut Context) -> Result<()> {
        if let Some(list) = self.parts.list {
            ctx.doc_mut().set_scroll_top(list, 0.0)?;
        }
        if !self.parts.checkboxes.is_empty() {
            for c in &self.parts.checkboxes {
                ctx.doc_mut().set_checked(*c, false)?;
            }
            self.update_count(ctx)?;
        }
        if !self.parts.options.is_empty() {
            let doc = ctx.doc_mut();
            for o in &self.parts.options {
                doc.set_attr(*o, "aria-selected", "false")?;
            }
            doc.set_text(self.parts.label, self.default_value.clone())?;
        }
        self.show_reset(ctx, false)?;
        self.close(ctx)
    }

    /// Move the keyboard highlight, wrapping and skipping hidden options.
    fn navigate(&mut self, ctx: &mut Context, forward: bool) -> Result<()> {
        let n = self.selectable.len();
        let hidden = |i: usize| ctx.doc().attr(self.selectable[i], "aria-hidden") == Some("true");
        let mut at = self.active;
        for _ in 0..n {
            let next = match (at, forward) {
                (None, true) => 0,
                (None, false) => n - 1,
                (Some(i), true) => (i + 1) % n,
                (Some(i), false) => (i + n - 1) % n,
            };
            at = Some(next);
            if !hidden(next) {
                break;
            }
        }
        let at = at.filter(|i| !hidden(*i));
        self.active = at;
        for (idx, o) in self.selectable.iter().enumerate() {
            ctx.doc_mut().toggle_class(*o, HAS_FOCUS, Some(idx) == at)?;
        }
        Ok(())
    }

    /// Highlight the next option starting with `c`.
    fn search(&mut self, ctx: &mut Context, c: char) -> Result<()> {
        let labels: Vec<String> = self
            .selectable
            .iter()
            .map(|o| ctx.doc().attr(*o, "value").unwrap_or_default().to_string())
            .collect();
        let from = self.active.map_or(0, |a| a + 1);
        let Some(i) = type_ahead(labels.iter().map(String::as_str), from, c) else {
            return Ok(());
        };
        self.active = Some(i);
        let doc = ctx.doc_mut();
        for (idx, o) in self.selectable.iter().enumerate() {
            doc.set_attr(*o, "aria-selected", (idx == i).to_string())?;
        }
        Ok(())
    }

    /// Activate the highlighted option as a click would.
    fn select_active(&self, ctx: &mut Context) {
        if let Some(node) = self.active.and_then(|i| self.selectable.get(i).copied()) {
            ctx.focus(node);
            ctx.doc_mut().queue_event(Event::Click(node));
        }
    }

    /// Keys while open, from anywhere on the page.
    fn open_key(&mut self, ctx: &mut Context, key: Key) -> Result<EventOutcome> {
        match key.key {
            KeyCode::Down if key.mods == Empty => self.navigate(ctx, true)?,
            KeyCode::Up if key.mods == Empty => self.navigate(ctx, false)?,
            KeyCode::Enter => self.select_active(ctx),
            KeyCode::Esc => self.close(ctx)?,
            KeyCode::Tab if !ctx.is_desktop() => {
                let trap = FocusTrap::new(self.parts.popup);
                if trap.handle_key(ctx.doc_mut(), key)? {
                    return Ok(EventOutcome::Prevent);
                }
                return Ok(EventOutcome::Ignore);
            }
            _ => {
                if let Some(c) = key.alphanumeric() {
                    self.search(ctx, c)?;
                }
                return Ok(EventOutcome::Ignore);
            }
        }
        Ok(EventOutcome::Prevent)
    }

    /// Recompute where each in-page section starts, less the header and
    /// button heights.
    fn measure_sections(&mut self, ctx: &Context) -> Result<()> {
        let doc = ctx.doc();
        let header = doc
            .query(doc.root(), "header")?
            .map_or(0.0, |h| doc.rect(h).h);
        let button = doc.rect(self.parts.button).h;
        for (i, link) in self.parts.links.iter().enumerate() {
            self.section_tops[i] = section_for(ctx, *link).map(|s| doc.rect(s).y - header - button);
        }
        Ok(())
    }

    /// Mark the link whose section the window has scrolled past.
    fn track_sections(&self, ctx: &mut Context, y: f64) -> Result<()> {
        let mut active = None;
        for (i, link) in self.parts.links.iter().enumerate() {
            let section = section_for(ctx, *link);
            let item = ctx.doc().parent(*link);
            let doc = ctx.doc_mut();
            doc.remove_class(*link, ACTIVE)?;
            if let Some(item) = item {
                doc.toggle_class(item, HIDDEN_ITEM, section.is_none())?;
            }
            if self.section_tops[i].is_some_and(|top| y > top) {
                active = Some(*link);
            }
        }
        if let Some(link) = active {
            let text = ctx.doc().text_content(link);
            let doc = ctx.doc_mut();
            doc.set_text(self.parts.label, text)?;
            doc.add_class(link, ACTIVE)?;
        }
        Ok(())
    }

    /// Handle a click inside the dropdown.
    fn click(&mut self, ctx: &mut Context, target: NodeId) -> Result<EventOutcome> {
        let within = |n: Option<NodeId>| n.is_some_and(|n| ctx.doc().contains(n, target));
        if within(Some(self.parts.button)) {
            self.toggle(ctx)?;
            return Ok(EventOutcome::Stop);
        }
        if within(self.parts.reset) || within(self.parts.reset_filters) {
            self.reset(ctx)?;
            return Ok(EventOutcome::Prevent);
        }
        if within(self.parts.close) || within(self.parts.apply) {
            self.close(ctx)?;
            return Ok(EventOutcome::Ignore);
        }
        let hit = |set: &[NodeId]| set.iter().copied().find(|n| ctx.doc().contains(*n, target));
        if let Some(link) = hit(&self.parts.links) {
            self.jump = section_for(ctx, link);
            self.close(ctx)?;
            ctx.schedule(JUMP_DELAY, "jump");
            return Ok(EventOutcome::Prevent);
        }
        if let Some(option) = hit(&self.parts.options) {
            self.choose(ctx, option)?;
        }
        Ok(EventOutcome::Ignore)
    }
}

/// The section an in-page link points at.
pub fn section_for(ctx: &Context, link: NodeId) -> Option<NodeId> {
    let href = ctx.doc().attr(link, "href")?;
    let (_, hash) = href.split_once('#')?;
    ctx.doc().by_id(hash)
}

impl Widget for Dropdown {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.listen_document();
        let doc = ctx.doc_mut();
        doc.set_attr(self.parts.popup, "tabindex", "-1")?;
        doc.set_attr(self.parts.popup, "aria-hidden", "true")?;
        if let Some(r) = self.parts.reset {
            doc.set_attr(r, "tabindex", "-1")?;
        }
        for c in &self.parts.checkboxes {
            doc.set_attr(*c, "tabindex", "-1")?;
        }
        ctx.claim_inert(&[self.parts.popup])?;
        self.set_position(ctx)?;
        if !self.parts.checkboxes.is_empty() {
            self.update_count(ctx)?;
        }
        ctx.subscribe_resize();
        if !self.parts.links.is_empty() || ctx.viewport().width > 1024.0 {
            self.scroll_sub = Some(ctx.subscribe_scroll());
        }
        self.measure_sections(ctx)
    }

    fn on_disconnect(&mut self, ctx: &mut Context) {
        let me = ctx.id();
        if ctx.overlays().dropdown == Some(me) {
            ctx.overlays().dropdown = None;
        }
        if self.locked && let Err(e) = ctx.unlock_scroll() {
            warn!("dropdown unlock failed: {e}");
        }
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Click(t) => self.click(ctx, *t),
            Event::Change(t) if self.parts.checkboxes.contains(t) => {
                self.update_count(ctx)?;
                Ok(EventOutcome::Ignore)
            }
            Event::Key(t, key) if self.parts.checkboxes.contains(t) && key.is_activation() => {
                let checked = ctx.doc().checked(*t);
                ctx.doc_mut().set_checked(*t, !checked)?;
                self.update_count(ctx)?;
                Ok(EventOutcome::Handle)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_document_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let root = ctx.root();
        match event {
            Event::Click(t) if self.is_open() && !ctx.doc().contains(root, *t) => {
                self.close(ctx)?;
                Ok(EventOutcome::Ignore)
            }
            Event::Key(t, key) if !self.is_open() => {
                if key.is_activation() && *t == self.parts.button {
                    self.open(ctx)?;
                    return Ok(EventOutcome::Prevent);
                }
                Ok(EventOutcome::Ignore)
            }
            Event::Key(_, key) => self.open_key(ctx, *key),
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_timer(&mut self, tag: &'static str, ctx: &mut Context) -> Result<()> {
        match tag {
            "opened" if self.state == OverlayState::Opening => self.opened(ctx),
            "closed" if self.state == OverlayState::Closing => self.closed(ctx),
            "jump" => {
                if let Some(section) = self.jump.take() {
                    let y = ctx.doc().offset_top(section) + JUMP_OFFSET;
                    ctx.scroll_window_to(y);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn on_scroll(&mut self, y: f64, ctx: &mut Context) -> Result<()> {
        if ctx.viewport().width > 1024.0 {
            self.close(ctx)?;
        }
        if !self.parts.links.is_empty() {
            self.track_sections(ctx, y)?;
        }
        Ok(())
    }

    fn on_resize(&mut self, _viewport: Viewport, ctx: &mut Context) -> Result<()> {
        self.set_position(ctx)?;
        self.measure_sections(ctx)
    }

    fn dismiss(&mut self, ctx: &mut Context) -> Result<()> {
        self.close(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(base_label("Colour (3)"), "Colour");
        assert_eq!(base_label("Colour"), "Colour");
    }

    #[test]
    fn type_ahead_is_forward_only() {
        let labels = ["Apple", "banana", "Avocado", "cherry"];
        assert_eq!(type_ahead(labels, 0, 'a'), Some(0));
        assert_eq!(type_ahead(labels, 1, 'A'), Some(2));
        assert_eq!(type_ahead(labels, 3, 'a'), None);
        assert_eq!(type_ahead(labels, 0, 'z'), None);
    }
}
