//! Filter panels: full-screen overlays that count, clear and apply the
//! filter controls inside them.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    event::{CustomEvent, Event, key::KeyCode},
    widget::FILTER_CHANGE,
};

use super::overlay::{Overlay, OverlayState};

/// Open state class.
const OPEN: &str = "ui-filter-modal--open";

/// A parenthesised count such as `(3)`.
static COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d+\)").expect("count regex"));

/// Put `n` into a label: replace an existing `(k)`, drop it when `n` is
/// zero, or append ` (n)`.
pub fn with_count(text: &str, n: usize) -> String {
    if COUNT.is_match(text) {
        let replacement = if n == 0 { String::new() } else { format!("({n})") };
        COUNT.replace(text, replacement.as_str()).into_owned()
    } else if n == 0 {
        text.to_string()
    } else {
        format!("{text} ({n})")
    }
}

/// A `filter-interface` panel.
#[derive(Debug)]
pub struct FilterPanel {
    /// Name triggers refer to through `filter-name`.
    name: Option<String>,
    /// Clear-all button.
    clear: Option<NodeId>,
    /// Apply button.
    apply: Option<NodeId>,
    /// Live region announcing resets and applies.
    narrator: Option<NodeId>,
    /// Shared overlay bookkeeping.
    overlay: Overlay,
}

impl FilterPanel {
    /// Bind to the panel.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let root = ctx.root();
        Ok(Self {
            name: ctx.doc().attr(root, "id").map(str::to_string),
            clear: ctx.query("[filter-clear]")?,
            apply: ctx.query("[filter-apply]")?,
            narrator: ctx.query("[filter-narrator]")?,
            overlay: Overlay::new(root),
        })
    }

    /// Lifecycle state.
    pub fn state(&self) -> OverlayState {
        self.overlay.state()
    }

    /// Does `trigger` open this panel?
    fn opens(&self, ctx: &Context, trigger: NodeId) -> bool {
        self.name.is_some() && ctx.doc().attr(trigger, "filter-name") == self.name.as_deref()
    }

    /// Number of controls with a selection.
    pub fn active_count(&self, ctx: &mut Context) -> Result<usize> {
        let root = ctx.root();
        let mut n = 0;
        for id in ctx.widgets_within(root) {
            if ctx.with_filter_control(id, |fc, ctx| Ok(fc.is_active(ctx.doc())))? == Some(true) {
                n += 1;
            }
        }
        Ok(n)
    }

    /// Counter elements to update: those in the opening trigger, else those
    /// in any trigger for this panel, else every counter on the page.
    fn counters(&self, ctx: &Context) -> Result<Vec<NodeId>> {
        let doc = ctx.doc();
        if let Some(t) = self.overlay.trigger()
            && let Some(c) = doc.query(t, "[filter-count]")?
        {
            return Ok(vec![c]);
        }
        let mut own = vec![];
        for t in doc.query_all(doc.root(), "[filter-interface-open]")? {
            if self.opens(ctx, t) {
                own.extend(doc.query_all(t, "[filter-count]")?);
            }
        }
        if own.is_empty() {
            own = doc.query_all(doc.root(), "[filter-count]")?;
        }
        Ok(own)
    }

    /// Bring the buttons and counters in line with the controls.
    pub fn refresh(&self, ctx: &mut Context) -> Result<()> {
        let n = self.active_count(ctx)?;
        debug!(active = n, "filter refresh");
        if let Some(apply) = self.apply {
            let keep = ctx.doc().has_attr(apply, "data-prevent-disable");
            ctx.doc_mut().toggle_attr(apply, "disabled", !keep && n == 0)?;
        }
        if let Some(clear) = self.clear {
            let label = ctx.doc().query(clear, "span")?.unwrap_or(clear);
            let text = if n > 0 { format!("Clear All ({n})") } else { "Clear All".to_string() };
            ctx.doc_mut().set_text(label, text)?;
        }
        for c in self.counters(ctx)? {
            let text = with_count(&ctx.doc().text_content(c), n);
            ctx.doc_mut().set_text(c, text)?;
        }
        Ok(())
    }

    /// Clear every control.
    pub fn clear_all(&self, ctx: &mut Context) -> Result<()> {
        self.announce(ctx, "Filter is Reset")?;
        let root = ctx.root();
        for id in ctx.widgets_within(root) {
            ctx.with_filter_control(id, |fc, ctx| fc.clear(ctx))?;
        }
        self.refresh(ctx)
    }

    /// Set the narrator text.
    fn announce(&self, ctx: &mut Context, text: &str) -> Result<()> {
        match self.narrator {
            Some(n) => ctx.doc_mut().set_text(n, text),
            None => Ok(()),
        }
    }

    /// Open from `trigger`.
    pub fn open(&mut self, ctx: &mut Context, trigger: Option<NodeId>) -> Result<()> {
        if !self.overlay.open(ctx, trigger, true)? {
            return Ok(());
        }
        self.overlay.settle();
        let root = ctx.root();
        let doc = ctx.doc_mut();
        doc.set_attr(root, "aria-hidden", "false")?;
        doc.add_class(root, OPEN)?;
        doc.set_attr(root, "tabindex", "0")?;
        if let Some(first) = self.overlay.trap().first(ctx.doc())? {
            ctx.focus(first);
        }
        self.refresh(ctx)
    }

    /// Close and return focus to the trigger.
    pub fn close(&mut self, ctx: &mut Context) -> Result<()> {
        if !self.overlay.close(ctx)? {
            return Ok(());
        }
        self.overlay.settle();
        let root = ctx.root();
        let doc = ctx.doc_mut();
        doc.set_attr(root, "aria-hidden", "true")?;
        doc.set_attr(root, "tabindex", "-1")?;
        doc.remove_class(root, OPEN)
    }
}

impl Widget for FilterPanel {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.listen_document();
        self.refresh(ctx)
    }

    fn on_disconnect(&mut self, ctx: &mut Context) {
        if let Err(e) = self.overlay.teardown(ctx) {
            warn!("filter teardown failed: {e}");
        }
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let root = ctx.root();
        match event {
            Event::Click(t) => {
                let doc = ctx.doc();
                if self.clear.is_some_and(|c| doc.contains(c, *t)) {
                    self.clear_all(ctx)?;
                } else if self.apply.is_some_and(|a| doc.contains(a, *t)) {
                    self.announce(ctx, "Filter is applied")?;
                } else if self.overlay.is_open()
                    && (*t == root || doc.closest(*t, "[filter-close]")?.is_some())
                {
                    self.close(ctx)?;
                    return Ok(EventOutcome::Handle);
                }
                Ok(EventOutcome::Ignore)
            }
            Event::Key(_, key) if self.overlay.is_open() => {
                if *key == KeyCode::Esc {
                    self.close(ctx)?;
                    return Ok(EventOutcome::Handle);
                }
                if self.overlay.trap_key(ctx, *key)? {
                    return Ok(EventOutcome::Prevent);
                }
                Ok(EventOutcome::Ignore)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_document_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let Event::Click(t) = event else {
            return Ok(EventOutcome::Ignore);
        };
        if self.overlay.is_open() {
            return Ok(EventOutcome::Ignore);
        }
        match ctx.doc().closest(*t, "[filter-interface-open]")? {
            Some(trigger) if self.opens(ctx, trigger) => {
                self.open(ctx, Some(trigger))?;
                Ok(EventOutcome::Prevent)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_custom_event(&mut self, event: &CustomEvent, ctx: &mut Context) -> Result<()> {
        if event.name == FILTER_CHANGE {
            self.refresh(ctx)?;
        }
        Ok(())
    }

    fn dismiss(&mut self, ctx: &mut Context) -> Result<()> {
        self.close(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_in_labels() {
        assert_eq!(with_count("Filters", 2), "Filters (2)");
        assert_eq!(with_count("Filters (2)", 5), "Filters (5)");
        assert_eq!(with_count("Filters (2)", 0), "Filters ");
        assert_eq!(with_count("Filters", 0), "Filters");
    }
}
