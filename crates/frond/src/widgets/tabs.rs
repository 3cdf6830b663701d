//! Tab groups with a roving tabindex and an overflowing tab strip, and
//! sliding tab bars whose highlight follows the active button.

use tracing::debug;

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    broadcast::Viewport,
    dom::Document,
    event::{
        Event,
        key::{Key, KeyCode},
    },
    observer::{IntersectionEntry, ObserveOptions},
};

use super::scrollbar;

/// Element tag owning the tabs.
const TAG: &str = "tab-interface";

/// Where a keystroke moves the selection in a group of `n` tabs currently
/// at `at`.
pub fn step(at: usize, n: usize, key: Key) -> Option<usize> {
    if n == 0 {
        return None;
    }
    match key.key {
        KeyCode::Left | KeyCode::Up => Some((at + n - 1) % n),
        KeyCode::Right | KeyCode::Down => Some((at + 1) % n),
        KeyCode::Home => Some(0),
        KeyCode::End => Some(n - 1),
        _ => None,
    }
}

/// A `tab-interface` element.
#[derive(Debug)]
pub struct Tabs {
    /// The tab strip.
    list: NodeId,
    /// Tabs owned by this group, skipping nested groups.
    tabs: Vec<NodeId>,
    /// Panels, parallel to `tabs`.
    panels: Vec<NodeId>,
    /// Scroll-back button.
    prev: Option<NodeId>,
    /// Scroll-forward button.
    next: Option<NodeId>,
    /// Selected tab.
    selected: usize,
}

impl Tabs {
    /// Bind to the group.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let list = Self::own(ctx, "[role=tablist]")?
            .first()
            .copied()
            .ok_or_else(|| crate::Error::missing("tabs", "[role=tablist]"))?;
        let tabs = Self::own(ctx, "[role=tab]")?;
        let selected = tabs
            .iter()
            .position(|t| ctx.doc().attr(*t, "aria-selected") == Some("true"))
            .unwrap_or(0);
        Ok(Self {
            list,
            panels: Self::own(ctx, "[role=tabpanel]")?,
            prev: ctx.query("[tablist-prev]")?,
            next: ctx.query("[tablist-next]")?,
            tabs,
            selected,
        })
    }

    /// Matches of `sel` whose nearest tab group is this one.
    fn own(ctx: &Context, sel: &str) -> Result<Vec<NodeId>> {
        let root = ctx.root();
        let doc = ctx.doc();
        let mut out = vec![];
        for n in ctx.query_all(sel)? {
            if doc.closest(n, TAG)? == Some(root) {
                out.push(n);
            }
        }
        Ok(out)
    }

    /// Index of the selected tab.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select tab `index`, showing its panel and focusing it.
    pub fn select(&mut self, ctx: &mut Context, index: usize) -> Result<()> {
        if index >= self.tabs.len() {
            return Ok(());
        }
        self.selected = index;
        self.apply(ctx)?;
        ctx.focus(self.tabs[index]);
        debug!(tab = index, "tab selected");
        if let Some(panel) = self.panels.get(index).copied() {
            scrollbar::refresh_within(ctx, panel)?;
        }
        Ok(())
    }

    /// Write the selection into the tabs and panels.
    fn apply(&self, ctx: &mut Context) -> Result<()> {
        let doc = ctx.doc_mut();
        for (i, tab) in self.tabs.iter().enumerate() {
            let on = i == self.selected;
            doc.set_attr(*tab, "tabindex", if on { "0" } else { "-1" })?;
            if on {
                doc.set_attr(*tab, "aria-selected", "true")?;
            } else {
                doc.remove_attr(*tab, "aria-selected")?;
            }
        }
        for (i, panel) in self.panels.iter().enumerate() {
            doc.toggle_attr(*panel, "hidden", i != self.selected)?;
        }
        Ok(())
    }

    /// Index of the first tab fully inside the strip.
    fn first_shown(&self, ctx: &Context) -> Option<usize> {
        self.tabs
            .iter()
            .position(|t| ctx.doc().attr(*t, "aria-hidden") == Some("false"))
    }

    /// Scroll the strip so tab `index` starts at its left edge.
    fn reveal(&self, ctx: &mut Context, index: usize) -> Result<()> {
        let x = ctx.doc().offset_left(self.tabs[index]);
        ctx.doc_mut().set_scroll_left(self.list, x)
    }

    /// Disable the scroll buttons at either end of the strip.
    fn update_buttons(&self, ctx: &mut Context) -> Result<()> {
        let shown = |t: Option<&NodeId>| {
            t.is_some_and(|t| ctx.doc().attr(*t, "aria-hidden") == Some("false"))
        };
        let first = shown(self.tabs.first());
        let last = shown(self.tabs.last());
        let doc = ctx.doc_mut();
        if let Some(p) = self.prev {
            doc.toggle_attr(p, "disabled", first)?;
        }
        if let Some(n) = self.next {
            doc.toggle_attr(n, "disabled", last)?;
        }
        Ok(())
    }

    /// Handle a keystroke on one of the tabs.
    fn key(&mut self, ctx: &mut Context, at: usize, key: Key) -> Result<EventOutcome> {
        if key.key == KeyCode::Down && key.mods.ctrl {
            if let Some(panel) = self.panels.get(self.selected).copied() {
                ctx.focus(panel);
            }
            return Ok(EventOutcome::Prevent);
        }
        if key.is_activation() && at != self.selected {
            self.select(ctx, at)?;
            return Ok(EventOutcome::Prevent);
        }
        match step(at, self.tabs.len(), key) {
            Some(i) => {
                self.select(ctx, i)?;
                Ok(EventOutcome::Prevent)
            }
            None => Ok(EventOutcome::Ignore),
        }
    }
}

impl Widget for Tabs {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        self.apply(ctx)?;
        let threshold = ctx.config().slider.tab_threshold;
        for tab in self.tabs.clone() {
            ctx.observe("tab", tab, ObserveOptions::within(self.list, threshold));
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Click(t) => {
                let doc = ctx.doc();
                if self.prev.is_some_and(|p| doc.contains(p, *t)) {
                    if let Some(i) = self.first_shown(ctx).filter(|i| *i > 0) {
                        self.reveal(ctx, i - 1)?;
                    }
                    return Ok(EventOutcome::Ignore);
                }
                if self.next.is_some_and(|n| doc.contains(n, *t)) {
                    if let Some(i) = self.first_shown(ctx).filter(|i| i + 1 < self.tabs.len()) {
                        self.reveal(ctx, i + 1)?;
                    }
                    return Ok(EventOutcome::Ignore);
                }
                let Some(i) = self.tabs.iter().position(|tab| doc.contains(*tab, *t)) else {
                    return Ok(EventOutcome::Ignore);
                };
                if i != self.selected {
                    self.select(ctx, i)?;
                }
                Ok(EventOutcome::Prevent)
            }
            Event::Key(t, key) => match self.tabs.iter().position(|tab| tab == t) {
                Some(i) => self.key(ctx, i, *key),
                None => Ok(EventOutcome::Ignore),
            },
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_intersection(&mut self, entries: &[IntersectionEntry], ctx: &mut Context) -> Result<()> {
        for e in entries {
            let focusables = ctx.doc().query_all(e.target, "a, button, [tabindex]")?;
            let doc = ctx.doc_mut();
            doc.set_attr(e.target, "aria-hidden", (!e.is_intersecting).to_string())?;
            for f in focusables {
                if e.is_intersecting {
                    doc.remove_attr(f, "tabindex")?;
                } else {
                    doc.set_attr(f, "tabindex", "-1")?;
                }
            }
        }
        self.update_buttons(ctx)
    }
}

/// Active sliding tab button.
const BUTTON_ACTIVE: &str = "m-sliding-tabs__button--active";
/// Active sliding tab panel.
const PANEL_ACTIVE: &str = "m-sliding-tabs__panel--active";

/// A `.m-sliding-tabs` bar. Buttons name their panel with `data-tab`; the
/// panel for `data-tab="x"` is `#panel-x`.
#[derive(Debug)]
pub struct SlidingTabs {
    /// Tab buttons.
    buttons: Vec<NodeId>,
    /// Highlight drawn under the active button.
    highlight: Option<NodeId>,
}

impl SlidingTabs {
    /// Bind to the bar.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        Ok(Self {
            buttons: ctx.query_all(".m-sliding-tabs__button")?,
            highlight: ctx.query(".m-sliding-tabs__active-bg")?,
        })
    }

    /// Index of the active button.
    pub fn active(&self, doc: &Document) -> Option<usize> {
        self.buttons.iter().position(|b| doc.has_class(*b, BUTTON_ACTIVE))
    }

    /// The panel a button controls.
    fn panel(ctx: &Context, button: NodeId) -> Option<NodeId> {
        let name = ctx.doc().attr(button, "data-tab")?;
        ctx.doc().by_id(&format!("panel-{name}"))
    }

    /// Size and place the highlight under the active button.
    fn place_highlight(&self, ctx: &mut Context) -> Result<()> {
        let (Some(bg), Some(i)) = (self.highlight, self.active(ctx.doc())) else {
            return Ok(());
        };
        let doc = ctx.doc();
        let button = self.buttons[i];
        let (w, x) = (doc.rect(button).w, doc.offset_left(button));
        let doc = ctx.doc_mut();
        doc.set_style(bg, "width", format!("{w}px"))?;
        doc.set_style(bg, "transform", format!("translateX({x}px)"))
    }

    /// Activate button `index` and its panel, and focus it.
    pub fn activate(&mut self, ctx: &mut Context, index: usize) -> Result<()> {
        let Some(target) = self.buttons.get(index).copied() else {
            return Ok(());
        };
        let panels: Vec<Option<NodeId>> =
            self.buttons.iter().map(|b| Self::panel(ctx, *b)).collect();
        let doc = ctx.doc_mut();
        for (b, panel) in self.buttons.iter().zip(&panels) {
            let on = *b == target;
            doc.toggle_class(*b, BUTTON_ACTIVE, on)?;
            doc.set_attr(*b, "aria-selected", on.to_string())?;
            doc.set_attr(*b, "tabindex", if on { "0" } else { "-1" })?;
            if let Some(p) = panel {
                doc.toggle_class(*p, PANEL_ACTIVE, on)?;
            }
        }
        self.place_highlight(ctx)?;
        ctx.focus(target);
        debug!(tab = index, "sliding tab selected");
        Ok(())
    }
}

impl Widget for SlidingTabs {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.subscribe_resize();
        self.place_highlight(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Click(t) => {
                let doc = ctx.doc();
                let Some(i) = self.buttons.iter().position(|b| doc.contains(*b, *t)) else {
                    return Ok(EventOutcome::Ignore);
                };
                self.activate(ctx, i)?;
                Ok(EventOutcome::Ignore)
            }
            Event::Key(t, key) => {
                let Some(at) = self.buttons.iter().position(|b| b == t) else {
                    return Ok(EventOutcome::Ignore);
                };
                // The bar is horizontal only.
                if matches!(key.key, KeyCode::Up | KeyCode::Down) {
                    return Ok(EventOutcome::Ignore);
                }
                match step(at, self.buttons.len(), *key) {
                    Some(i) => {
                        self.activate(ctx, i)?;
                        Ok(EventOutcome::Prevent)
                    }
                    None => Ok(EventOutcome::Ignore),
                }
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_resize(&mut self, _viewport: Viewport, ctx: &mut Context) -> Result<()> {
        self.place_highlight(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_wrap() {
        assert_eq!(step(0, 3, KeyCode::Left.into()), Some(2));
        assert_eq!(step(2, 3, KeyCode::Down.into()), Some(0));
        assert_eq!(step(1, 3, KeyCode::End.into()), Some(2));
        assert_eq!(step(1, 3, KeyCode::Home.into()), Some(0));
        assert_eq!(step(1, 3, KeyCode::Enter.into()), None);
        assert_eq!(step(0, 0, KeyCode::Right.into()), None);
    }
}
