//! Toasts and snackbars.
//!
//! Buttons marked `toast-btn` show their `data-text` in the page's alert bar;
//! `snackbar-btn` buttons show it in a snackbar appended to the body. Either
//! may copy `data-copy-text` to the clipboard first. A failed copy always
//! reports through the error-styled snackbar.

use std::fmt;

use tracing::{debug, warn};

use crate::{Context, EventOutcome, NodeId, Result, TimerId, Widget, config::ms, event::Event};

/// Alert bar class while shown.
const ALERT_VISIBLE: &str = "ui-alert-bar--visible";
/// Alert bar placement class while shown.
const ALERT_CENTER: &str = "ui-alert-bar--center";

/// Snackbar styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Neutral.
    Info,
    /// Something worked.
    Success,
    /// Something failed.
    Error,
}

impl Tone {
    /// Parse a `data-snackbar-type` value; unknown values are informational.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("success") => Self::Success,
            Some("error") => Self::Error,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// A snackbar on screen.
#[derive(Debug, Clone, Copy)]
struct Snack {
    /// The snackbar element.
    node: NodeId,
    /// Its close button.
    close: NodeId,
}

/// Notification controller bound to `body`.
#[derive(Debug, Default)]
pub struct Notifier {
    /// The alert bar toasts are shown in.
    alert: Option<NodeId>,
    /// Text element of the alert bar.
    alert_text: Option<NodeId>,
    /// Toast dismissal.
    toast_timer: Option<TimerId>,
    /// Current snackbar.
    snack: Option<Snack>,
    /// Snackbar dismissal.
    snack_timer: Option<TimerId>,
    /// Focus to restore when the snackbar closes.
    previous_focus: Option<NodeId>,
}

impl Notifier {
    /// Bind to the body, picking the last alert bar outside `main`.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let doc = ctx.doc();
        let mut alert = None;
        for bar in ctx.query_all(".ui-alert-bar")? {
            if doc.closest(bar, "main")?.is_none() {
                alert = Some(bar);
            }
        }
        let alert_text = match alert {
            Some(bar) => doc.query(bar, ".ui-alert-bar__text")?,
            None => None,
        };
        Ok(Self {
            alert,
            alert_text,
            ..Self::default()
        })
    }

    /// Is a snackbar on screen?
    pub fn snackbar(&self) -> Option<NodeId> {
        self.snack.map(|s| s.node)
    }

    /// Show a message in the alert bar for the toast duration.
    pub fn toast(&mut self, ctx: &mut Context, message: &str) -> Result<()> {
        let (Some(bar), Some(text)) = (self.alert, self.alert_text) else {
            debug!("no alert bar for toast");
            return Ok(());
        };
        let doc = ctx.doc_mut();
        doc.set_text(text, message)?;
        doc.add_class(bar, ALERT_CENTER)?;
        doc.add_class(bar, ALERT_VISIBLE)?;
        let delay = ms(ctx.config().timing.toast);
        ctx.debounce(&mut self.toast_timer, delay, "toast");
        Ok(())
    }

    /// Replace any snackbar with a new one and move focus to its close
    /// button.
    pub fn show_snackbar(&mut self, ctx: &mut Context, message: &str, tone: Tone) -> Result<()> {
        self.remove_snackbar(ctx)?;
        let body = ctx.root();
        let doc = ctx.doc_mut();
        let node = doc.create("div");
        doc.add_class(node, "m-snackbar")?;
        doc.add_class(node, &tone.to_string())?;
        doc.set_attr(node, "role", "alert")?;
        doc.set_attr(node, "aria-live", "assertive")?;
        doc.set_attr(node, "aria-atomic", "true")?;
        let text = doc.create("p");
        doc.add_class(text, "m-snackbar__text")?;
        doc.set_text(text, message)?;
        let close = doc.create("button");
        doc.add_class(close, "m-snackbar__close")?;
        doc.set_attr(close, "aria-label", "Close")?;
        doc.append(node, text)?;
        doc.append(node, close)?;
        doc.append(body, node)?;
        ctx.focus(close);
        self.snack = Some(Snack { node, close });
        let delay = ms(ctx.config().timing.snackbar);
        ctx.debounce(&mut self.snack_timer, delay, "snackbar");
        debug!(%tone, "snackbar shown");
        Ok(())
    }

    /// Drop the current snackbar without touching focus.
    fn remove_snackbar(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.clear_timer(&mut self.snack_timer);
        if let Some(s) = self.snack.take() {
            ctx.doc_mut().remove(s.node)?;
        }
        Ok(())
    }

    /// Close the snackbar and return focus to where it was.
    pub fn close_snackbar(&mut self, ctx: &mut Context) -> Result<()> {
        self.remove_snackbar(ctx)?;
        if let Some(prev) = self.previous_focus.take()
            && ctx.doc().is_connected(prev)
        {
            ctx.focus(prev);
        }
        Ok(())
    }

    /// Copy text, reporting failure in the error snackbar. Returns whether
    /// the copy worked.
    fn copy(&mut self, ctx: &mut Context, text: &str, message: &str) -> Result<bool> {
        match ctx.write_clipboard(text) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(error = %e, "copy to clipboard failed");
                if self.snack.is_none() {
                    self.show_snackbar(ctx, message, Tone::Error)?;
                }
                Ok(false)
            }
        }
    }

    /// A `toast-btn` was clicked.
    fn toast_button(&mut self, ctx: &mut Context, button: NodeId) -> Result<()> {
        let doc = ctx.doc();
        let message = doc.attr(button, "data-text").unwrap_or_default().to_string();
        let copy = doc.attr(button, "data-copy-text").map(str::to_string);
        let copying = doc.attr(button, "data-toast-type") == Some("copy-to-clipboard");
        self.previous_focus = doc.active();
        if copying && !self.copy(ctx, copy.as_deref().unwrap_or_default(), &message)? {
            return Ok(());
        }
        self.toast(ctx, &message)
    }

    /// A `snackbar-btn` was clicked.
    fn snackbar_button(&mut self, ctx: &mut Context, button: NodeId) -> Result<()> {
        let doc = ctx.doc();
        let message = doc.attr(button, "data-text").unwrap_or_default().to_string();
        let tone = Tone::parse(doc.attr(button, "data-snackbar-type"));
        let copy = doc.attr(button, "data-copy-text").map(str::to_string);
        self.previous_focus = doc.active();
        match copy {
            Some(text) => {
                if self.copy(ctx, &text, &message)? {
                    self.show_snackbar(ctx, &message, Tone::Success)?;
                }
                Ok(())
            }
            None => self.show_snackbar(ctx, &message, tone),
        }
    }
}

impl Widget for Notifier {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let Event::Click(t) = event else {
            return Ok(EventOutcome::Ignore);
        };
        if self.snack.is_some_and(|s| ctx.doc().contains(s.close, *t)) {
            self.close_snackbar(ctx)?;
            return Ok(EventOutcome::Handle);
        }
        let doc = ctx.doc();
        if let Some(b) = doc.closest(*t, "[toast-btn]")? {
            self.toast_button(ctx, b)?;
            return Ok(EventOutcome::Prevent);
        }
        if let Some(b) = doc.closest(*t, "[snackbar-btn]")? {
            self.snackbar_button(ctx, b)?;
            return Ok(EventOutcome::Prevent);
        }
        // Server-rendered snackbars just hide.
        if let Some(close) = doc.closest(*t, ".m-snackbar__close")?
            && let Some(bar) = doc.closest(close, ".m-snackbar")?
        {
            ctx.doc_mut().set_attr(bar, "hidden", "")?;
            return Ok(EventOutcome::Handle);
        }
        Ok(EventOutcome::Ignore)
    }

    fn on_timer(&mut self, tag: &'static str, ctx: &mut Context) -> Result<()> {
        match tag {
            "toast" => {
                self.toast_timer = None;
                if let Some(bar) = self.alert {
                    let doc = ctx.doc_mut();
                    doc.remove_class(bar, ALERT_VISIBLE)?;
                    doc.remove_class(bar, ALERT_CENTER)?;
                }
                Ok(())
            }
            "snackbar" => {
                self.snack_timer = None;
                self.close_snackbar(ctx)
            }
            _ => Ok(()),
        }
    }

    fn on_disconnect(&mut self, ctx: &mut Context) {
        ctx.clear_timer(&mut self.toast_timer);
        ctx.clear_timer(&mut self.snack_timer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tones() {
        assert_eq!(Tone::parse(Some("error")), Tone::Error);
        assert_eq!(Tone::parse(Some("warning")), Tone::Info);
        assert_eq!(Tone::parse(None).to_string(), "info");
    }
}
