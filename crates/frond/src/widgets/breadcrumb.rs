//! Breadcrumb trails that collapse to the first crumb on narrow viewports.

use tracing::debug;

use crate::{Context, EventOutcome, NodeId, Result, Widget, broadcast::Viewport, event::Event};

/// Class on each crumb.
const ITEM: &str = "m-breadcrumbs__item";
/// Class on the inserted expand crumb.
const EXPAND: &str = "m-breadcrumbs__item--expand";
/// Root class once every crumb is shown.
const SHOW_ALL: &str = "--show-all";
/// Viewports narrower than this collapse.
const COLLAPSE_BELOW: f64 = 768.0;

/// Should a trail of `items` crumbs collapse at `width`?
pub fn collapses(width: f64, items: usize) -> bool {
    width < COLLAPSE_BELOW && items > 2
}

/// An `.m-breadcrumbs` trail.
#[derive(Debug)]
pub struct Breadcrumb {
    /// Crumbs present in the markup.
    items: Vec<NodeId>,
    /// The inserted expand crumb, while collapsed.
    expander: Option<NodeId>,
    /// Has the user expanded the trail?
    expanded: bool,
}

impl Breadcrumb {
    /// Bind to the trail.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        Ok(Self {
            items: ctx.query_all(&format!(".{ITEM}"))?,
            expander: None,
            expanded: false,
        })
    }

    /// Is the trail currently collapsed?
    pub fn is_collapsed(&self) -> bool {
        self.expander.is_some()
    }

    /// Drop the expand crumb, if any.
    fn remove_expander(&mut self, ctx: &mut Context) -> Result<()> {
        if let Some(e) = self.expander.take() {
            ctx.doc_mut().remove(e)?;
        }
        Ok(())
    }

    /// Collapse or restore for the current width.
    fn layout(&mut self, ctx: &mut Context) -> Result<()> {
        self.remove_expander(ctx)?;
        let width = ctx.viewport().width;
        if self.expanded || !collapses(width, self.items.len()) {
            return Ok(());
        }
        let root = ctx.root();
        let first = self.items[0];
        let doc = ctx.doc_mut();
        doc.remove_class(root, SHOW_ALL)?;
        let li = doc.create("li");
        doc.add_class(li, ITEM)?;
        doc.add_class(li, EXPAND)?;
        let a = doc.create("a");
        doc.add_class(a, "m-breadcrumbs__link")?;
        doc.set_attr(a, "href", "#")?;
        doc.set_attr(a, "aria-label", "More options")?;
        doc.set_text(a, "...")?;
        doc.append(li, a)?;
        doc.insert_after(first, li)?;
        self.expander = Some(li);
        debug!(items = self.items.len(), "breadcrumb collapsed");
        Ok(())
    }
}

impl Widget for Breadcrumb {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.subscribe_resize();
        self.layout(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let Event::Click(t) = event else {
            return Ok(EventOutcome::Ignore);
        };
        if !self.expander.is_some_and(|e| ctx.doc().contains(e, *t)) {
            return Ok(EventOutcome::Ignore);
        }
        self.remove_expander(ctx)?;
        self.expanded = true;
        let root = ctx.root();
        ctx.doc_mut().add_class(root, SHOW_ALL)?;
        Ok(EventOutcome::Prevent)
    }

    fn on_resize(&mut self, _viewport: Viewport, ctx: &mut Context) -> Result<()> {
        self.layout(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_rule() {
        assert!(collapses(375.0, 3));
        assert!(!collapses(375.0, 2));
        assert!(!collapses(768.0, 5));
    }
}
