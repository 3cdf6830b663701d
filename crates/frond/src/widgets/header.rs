//! The site header: scroll-dependent styling and the search dialog.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    event::Event,
    navigation::{clean_query, search_url},
};

/// Runs of two or more whitespace characters.
static RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("runs regex"));

/// Header class while the search dialog is open.
const SEARCH_OPEN: &str = "ui-header--search-open";
/// Document class while the search dialog is open.
const SEARCH_MENU_OPEN: &str = "is-search-menu-open";
/// Header class when the page is at the top on desktop.
const TRANSPARENT: &str = "ui-header--transparent";

/// Collapse whitespace runs to a single space, as the visitor types.
pub fn collapse_runs(s: &str) -> String {
    RUNS.replace_all(s, " ").into_owned()
}

/// A `.ui-header` element.
#[derive(Debug)]
pub struct SiteHeader {
    /// Search form.
    form: NodeId,
    /// Search input.
    input: NodeId,
    /// Buttons opening and closing the dialog.
    toggles: Vec<NodeId>,
    /// Cancel button.
    cancel: Option<NodeId>,
    /// Clear buttons.
    clear: Vec<NodeId>,
    /// Search container; clicks outside it close the dialog.
    container: Option<NodeId>,
    /// Magnifier icon, hidden on wide viewports while there is text.
    icon: Option<NodeId>,
    /// Last window scroll position seen.
    last_y: f64,
}

impl SiteHeader {
    /// Bind to the header.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let form = ctx.require(".ui-header__search-form")?;
        Ok(Self {
            form,
            input: ctx.require_in(form, ".ui-header__search-input")?,
            toggles: ctx.query_all(".ui-header__search-btn, .ui-header__search-btn--close")?,
            cancel: ctx.query(".ui-header__search-cancel")?,
            clear: ctx.doc().query_all(form, ".ui-header__search--clear")?,
            container: ctx.query(".ui-header__search-container")?,
            icon: ctx.query(".ui-header__search-icon")?,
            last_y: ctx.last_scroll(),
        })
    }

    /// Is the search dialog open?
    pub fn search_open(&self, ctx: &Context) -> bool {
        ctx.doc().has_class(ctx.root(), SEARCH_OPEN)
    }

    /// Open or close the search dialog.
    pub fn toggle_search(&mut self, ctx: &mut Context) -> Result<()> {
        let root = ctx.root();
        let open = !self.search_open(ctx);
        debug!(open, "search dialog");
        let doc = ctx.doc_mut();
        let html = doc.root();
        doc.toggle_class(root, "is-closing", !open)?;
        doc.toggle_class(root, SEARCH_OPEN, open)?;
        doc.toggle_class(root, TRANSPARENT, !open)?;
        doc.toggle_class(html, SEARCH_MENU_OPEN, open)?;
        if open {
            ctx.focus(self.input);
        }
        Ok(())
    }

    /// Close the dialog, clear the query and release the page scroll.
    fn cancel_search(&mut self, ctx: &mut Context) -> Result<()> {
        if ctx.scroll_locked() {
            ctx.unlock_scroll()?;
        }
        let root = ctx.root();
        let doc = ctx.doc_mut();
        let html = doc.root();
        doc.toggle_class(html, SEARCH_MENU_OPEN, false)?;
        doc.remove_class(root, SEARCH_OPEN)?;
        self.clear_query(ctx)
    }

    /// Empty the search field.
    fn clear_query(&self, ctx: &mut Context) -> Result<()> {
        let doc = ctx.doc_mut();
        doc.set_value(self.input, "")?;
        doc.remove_class(self.form, "is-filled")?;
        if let Some(icon) = self.icon {
            doc.set_style(icon, "display", "block")?;
        }
        Ok(())
    }

    /// Normalize the query as it is typed.
    fn typed(&self, ctx: &mut Context) -> Result<()> {
        let value = collapse_runs(ctx.doc().value(self.input));
        let wide = ctx.viewport().width > 768.0;
        let doc = ctx.doc_mut();
        doc.set_value(self.input, value.clone())?;
        doc.toggle_class(self.form, "is-filled", !value.is_empty())?;
        if wide && let Some(icon) = self.icon {
            doc.set_style(icon, "display", if value.is_empty() { "block" } else { "none" })?;
        }
        Ok(())
    }

    /// Redirect to the results page for the current query, if any.
    pub fn submit(&self, ctx: &mut Context) -> Result<()> {
        let Some(query) = clean_query(ctx.doc().value(self.input)) else {
            return Ok(());
        };
        ctx.doc_mut().set_value(self.input, query.clone())?;
        let url = search_url(ctx.doc().location(), &query, &ctx.config().search)?;
        ctx.navigate(url, false);
        Ok(())
    }

    /// Update scroll-dependent classes.
    fn scrolled(&mut self, ctx: &mut Context, y: f64) -> Result<()> {
        let root = ctx.root();
        let height = ctx.doc().rect(root).h;
        let desktop = ctx.viewport().width > ctx.config().breakpoints.desktop_min;
        let doc = ctx.doc_mut();
        let html = doc.root();
        if y > 0.0 {
            doc.add_class(root, "allow-transitions")?;
        }
        doc.toggle_class(root, "has-scrolled", y > 0.0)?;
        doc.toggle_class(root, "ui-header--sticky", y > height)?;
        if desktop {
            if doc.has_class(html, SEARCH_MENU_OPEN) {
                doc.toggle_class(root, TRANSPARENT, y > 0.0)?;
            } else if !doc.has_class(html, "is-flyout-menu-open") {
                doc.toggle_class(root, TRANSPARENT, y <= 0.0)?;
            }
        }
        if y > self.last_y {
            doc.add_class(root, "ui-header--hide")?;
        } else if y < self.last_y {
            doc.remove_class(root, "ui-header--hide")?;
        }
        self.last_y = y;
        Ok(())
    }
}

impl Widget for SiteHeader {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.subscribe_scroll();
        let y = ctx.last_scroll();
        self.scrolled(ctx, y)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Input(t) | Event::Paste(t, _) if *t == self.input => {
                self.typed(ctx)?;
                Ok(EventOutcome::Ignore)
            }
            Event::Submit(t) if *t == self.form => {
                self.submit(ctx)?;
                Ok(EventOutcome::Prevent)
            }
            Event::Click(t) => {
                let doc = ctx.doc();
                if self.toggles.iter().any(|b| doc.contains(*b, *t)) {
                    self.toggle_search(ctx)?;
                    return Ok(EventOutcome::Prevent);
                }
                if self.cancel.is_some_and(|b| doc.contains(b, *t)) {
                    self.cancel_search(ctx)?;
                    return Ok(EventOutcome::Prevent);
                }
                if self.clear.iter().any(|b| doc.contains(*b, *t)) {
                    self.clear_query(ctx)?;
                    return Ok(EventOutcome::Prevent);
                }
                let outside = self.container.is_some_and(|c| !doc.contains(c, *t));
                if outside
                    && self.search_open(ctx)
                    && doc.closest(*t, ".ui-header__search")?.is_some()
                {
                    self.toggle_search(ctx)?;
                }
                Ok(EventOutcome::Ignore)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_scroll(&mut self, y: f64, ctx: &mut Context) -> Result<()> {
        self.scrolled(ctx, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_collapse() {
        assert_eq!(collapse_runs("soda   ash"), "soda ash");
        assert_eq!(collapse_runs("soda ash "), "soda ash ");
        assert_eq!(collapse_runs("a\t\tb"), "a b");
    }
}
