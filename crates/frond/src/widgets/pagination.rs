//! Numbered pagination controls.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::{Context, EventOutcome, NodeId, Result, Widget, event::Event};

/// Name of the event emitted when the page changes.
pub const PAGE_CHANGE: &str = "pageChange";

/// Results per page when the configuration does not say.
const DEFAULT_PAGE_SIZE: usize = 10;

/// One position in the rendered page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A page button.
    Page(usize),
    /// Collapsed pages.
    Ellipsis,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// Number of pages for a result count; never less than one.
pub fn page_count(results: usize, page_size: usize) -> usize {
    results.div_ceil(page_size.max(1)).max(1)
}

/// The page buttons shown for `current` of `total` pages. Six pages or
/// fewer are all shown; otherwise the first and last page stay visible
/// around a window on the current page.
pub fn window(current: usize, total: usize) -> Vec<Slot> {
    let total = total.max(1);
    let current = current.clamp(1, total);
    if total < 7 {
        return (1..=total).map(Slot::Page).collect();
    }
    let mut out = vec![Slot::Page(1)];
    if current < 4 {
        let end = if current == 3 { 4 } else { 3 };
        out.extend((2..=end).map(Slot::Page));
    } else {
        out.push(Slot::Ellipsis);
        let (start, end) = if current >= total - 3 {
            (total - 3, total - 1)
        } else {
            (current - 1, current + 1)
        };
        out.extend((start..=end).map(Slot::Page));
    }
    if current < total - 3 {
        out.push(Slot::Ellipsis);
    }
    out.push(Slot::Page(total));
    out
}

/// Payload of a page change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageChange {
    /// The new page.
    current_page: usize,
}

/// An `x-pagination` element.
#[derive(Debug)]
pub struct Pagination {
    /// Current page, 1-based.
    current: usize,
    /// Total result count.
    results: usize,
    /// Results per page.
    page_size: usize,
    /// Rendered buttons and the page each leads to.
    buttons: Vec<(NodeId, usize)>,
}

impl Pagination {
    /// Bind to the element, reading `x-current-page` and `x-total-results`.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let root = ctx.root();
        let read = |name: &str| {
            ctx.doc()
                .attr(root, name)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
        };
        let results = read("x-total-results").unwrap_or(1);
        let page_size = ctx.config().page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let total = page_count(results, page_size);
        Ok(Self {
            current: read("x-current-page").unwrap_or(1).min(total),
            results,
            page_size,
            buttons: vec![],
        })
    }

    /// Current page.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Total pages.
    pub fn total(&self) -> usize {
        page_count(self.results, self.page_size)
    }

    /// Replace the result count, keeping the page in range.
    pub fn set_results(&mut self, ctx: &mut Context, results: usize) -> Result<()> {
        self.results = results.max(1);
        self.current = self.current.min(self.total());
        let root = ctx.root();
        ctx.doc_mut()
            .set_attr(root, "x-total-results", self.results.to_string())?;
        self.render(ctx)
    }

    /// Go to `page`, emitting a change. Out-of-range pages and the current
    /// page are ignored.
    pub fn go_to(&mut self, ctx: &mut Context, page: usize) -> Result<()> {
        if page < 1 || page > self.total() || page == self.current {
            return Ok(());
        }
        self.current = page;
        debug!(page, "page change");
        let root = ctx.root();
        ctx.doc_mut()
            .set_attr(root, "x-current-page", page.to_string())?;
        self.render(ctx)?;
        let detail = serde_json::to_string(&PageChange { current_page: page })?;
        ctx.emit(root, PAGE_CHANGE, detail);
        Ok(())
    }

    /// Append a button to `parent`.
    fn button(
        &mut self,
        ctx: &mut Context,
        parent: NodeId,
        class: &str,
        text: String,
        to: usize,
        disabled: bool,
    ) -> Result<NodeId> {
        let doc = ctx.doc_mut();
        let b = doc.create("button");
        for c in class.split_whitespace() {
            doc.add_class(b, c)?;
        }
        doc.set_text(b, text)?;
        doc.toggle_attr(b, "disabled", disabled)?;
        doc.append(parent, b)?;
        self.buttons.push((b, to));
        Ok(b)
    }

    /// Rebuild the controls.
    pub fn render(&mut self, ctx: &mut Context) -> Result<()> {
        let root = ctx.root();
        let (current, total) = (self.current, self.total());
        self.buttons.clear();
        let doc = ctx.doc_mut();
        doc.clear_children(root)?;
        doc.add_class(root, "m-pagination")?;
        let nav = doc.create("div");
        doc.add_class(nav, "m-pagination__btns")?;
        doc.set_attr(nav, "role", "navigation")?;
        doc.set_attr(nav, "aria-label", "Pagination")?;
        doc.append(root, nav)?;

        let prev = self.button(
            ctx,
            nav,
            "m-btn-pagination m-btn-pagination--prev",
            "←".into(),
            current.saturating_sub(1),
            current == 1,
        )?;
        ctx.doc_mut().set_attr(prev, "aria-label", "Go to previous page")?;
        let mut before = true;
        for slot in window(current, total) {
            match slot {
                Slot::Page(n) => {
                    let label = n.to_string();
                    let b = self.button(ctx, nav, "m-pagination__page", label, n, n == current)?;
                    let doc = ctx.doc_mut();
                    doc.set_attr(b, "aria-label", format!("Go to page {n}"))?;
                    if n == current {
                        doc.set_attr(b, "aria-current", "page")?;
                        before = false;
                    }
                }
                Slot::Ellipsis => {
                    let doc = ctx.doc_mut();
                    let span = doc.create("span");
                    doc.add_class(span, "m-pagination__ellipsis")?;
                    doc.set_text(span, slot.to_string())?;
                    doc.set_attr(span, "aria-hidden", "true")?;
                    let label = if before { "before" } else { "after" };
                    let text = format!("Collapsed pages {label} current range");
                    doc.set_attr(span, "aria-label", text)?;
                    doc.append(nav, span)?;
                }
            }
        }
        let next = self.button(
            ctx,
            nav,
            "m-btn-pagination m-btn-pagination--next",
            "→".into(),
            current + 1,
            current == total,
        )?;
        ctx.doc_mut().set_attr(next, "aria-label", "Go to next page")?;

        let shown = (current * self.page_size).min(self.results);
        let doc = ctx.doc_mut();
        let info = doc.create("p");
        doc.add_class(info, "m-pagination__info")?;
        doc.set_text(info, format!("Showing {shown} of {} results", self.results))?;
        doc.append(root, info)
    }
}

impl Widget for Pagination {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        self.render(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let Event::Click(t) = event else {
            return Ok(EventOutcome::Ignore);
        };
        let doc = ctx.doc();
        let hit = self
            .buttons
            .iter()
            .find(|(b, _)| doc.contains(*b, *t) && !doc.el(*b).is_ok_and(|e| e.disabled()))
            .map(|(_, to)| *to);
        match hit {
            Some(page) => {
                self.go_to(ctx, page)?;
                Ok(EventOutcome::Handle)
            }
            None => Ok(EventOutcome::Ignore),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(current: usize, total: usize) -> String {
        window(current, total)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn windows() {
        assert_eq!(pages(1, 5), "1 2 3 4 5");
        assert_eq!(pages(1, 25), "1 2 3 ... 25");
        assert_eq!(pages(3, 25), "1 2 3 4 ... 25");
        assert_eq!(pages(13, 25), "1 ... 12 13 14 ... 25");
        assert_eq!(pages(22, 25), "1 ... 22 23 24 25");
        assert_eq!(pages(25, 25), "1 ... 22 23 24 25");
        assert_eq!(pages(1, 1), "1");
    }

    #[test]
    fn counts() {
        assert_eq!(page_count(45, 10), 5);
        assert_eq!(page_count(250, 10), 25);
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }
}
