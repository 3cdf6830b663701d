//! Modal dialogs opened by named triggers anywhere on the page.

use tracing::{debug, warn};

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    config::ms,
    event::{
        Event,
        key::{Key, KeyCode},
    },
};

use super::{
    input::TextArea,
    overlay::{Overlay, OverlayState},
    scrollbar,
};

/// Open state class.
const OPEN: &str = "ui-modal--open";
/// Modals with this class ignore backdrop clicks.
const LOCK: &str = "ui-modal__lock";
/// Triggers of every modal family; clicks on these still reach the page.
const OPENERS: &str = "[modal-interface-open], [data-modal-name]";
/// Body class used instead of the scroll lock for `data-nofix` modals.
const SOFT_LOCK: &str = "-scrollLock";

/// The attribute vocabulary a modal family uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalMarkup {
    /// Selector for triggers.
    pub opener: &'static str,
    /// Trigger attribute naming the modal it opens.
    pub opener_name: &'static str,
    /// Modal attribute holding its name.
    pub name: &'static str,
    /// Content region; clicks inside never reach the backdrop.
    pub content: &'static str,
    /// Close buttons.
    pub close: &'static str,
    /// Element focused on open, when present.
    pub heading: &'static str,
}

impl ModalMarkup {
    /// `modal-interface` elements.
    pub const INTERFACE: Self = Self {
        opener: "[modal-interface-open]",
        opener_name: "modal-name",
        name: "id",
        content: "[modal-interface-content]",
        close: "[modal-interface-close], .ui-modal__close",
        heading: ".ui-modal__header-title",
    };

    /// `[data-modal]` elements opened by `[data-modal-name]` triggers.
    pub const MANAGED: Self = Self {
        opener: "[data-modal-name]",
        opener_name: "data-modal-name",
        name: "data-modal",
        content: ".ui-modal__content",
        close: ".ui-modal__close-button",
        heading: "#modalHeading",
    };
}

/// A modal dialog.
#[derive(Debug)]
pub struct Modal {
    /// Attribute vocabulary.
    markup: ModalMarkup,
    /// Name triggers refer to.
    name: String,
    /// Content region.
    content: Option<NodeId>,
    /// Shared overlay bookkeeping.
    overlay: Overlay,
    /// Took the soft body lock instead of the scroll lock.
    soft_locked: bool,
}

impl Modal {
    /// Bind to a modal root.
    pub fn new(ctx: &mut Context, markup: ModalMarkup) -> Result<Self> {
        let root = ctx.root();
        let name = ctx
            .doc()
            .attr(root, markup.name)
            .ok_or_else(|| crate::Error::missing("modal", format!("[{}]", markup.name)))?
            .to_string();
        Ok(Self {
            markup,
            name,
            content: ctx.query(markup.content)?,
            overlay: Overlay::new(root),
            soft_locked: false,
        })
    }

    /// Lifecycle state.
    pub fn state(&self) -> OverlayState {
        self.overlay.state()
    }

    /// Is the modal open?
    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// Every trigger for this modal.
    fn triggers(&self, ctx: &Context) -> Result<Vec<NodeId>> {
        let doc = ctx.doc();
        Ok(doc
            .query_all(doc.root(), self.markup.opener)?
            .into_iter()
            .filter(|t| doc.attr(*t, self.markup.opener_name) == Some(self.name.as_str()))
            .collect())
    }

    /// The trigger an event target belongs to, if it opens this modal.
    fn trigger_for(&self, ctx: &Context, target: NodeId) -> Result<Option<NodeId>> {
        let doc = ctx.doc();
        Ok(doc
            .closest(target, self.markup.opener)?
            .filter(|t| doc.attr(*t, self.markup.opener_name) == Some(self.name.as_str())))
    }

    /// Should this modal leave the page scrollable and only mark the body?
    fn soft_lock(ctx: &Context) -> bool {
        let Some(mode) = ctx.doc().attr(ctx.root(), "data-nofix") else {
            return false;
        };
        let width = ctx.viewport().width;
        match mode {
            "desktop" => width >= 1024.0,
            "mobile" => width <= 1024.0,
            "desktop-mobile" => true,
            _ => false,
        }
    }

    /// Open, remembering `trigger` for focus restoration.
    pub fn open(&mut self, ctx: &mut Context, trigger: Option<NodeId>) -> Result<()> {
        let soft = Self::soft_lock(ctx);
        if !self.overlay.open(ctx, trigger, !soft)? {
            return Ok(());
        }
        debug!(modal = %self.name, "open");
        self.soft_locked = soft;
        let root = ctx.root();
        let heading = ctx.query(self.markup.heading)?;
        let doc = ctx.doc_mut();
        if soft {
            let body = doc.body();
            doc.add_class(body, SOFT_LOCK)?;
        }
        if let Some(t) = trigger {
            doc.set_attr(t, "aria-expanded", "true")?;
        }
        doc.set_attr(root, "aria-hidden", "false")?;
        doc.add_class(root, OPEN)?;
        let focused = heading.is_some_and(|h| ctx.focus(h));
        if !focused && let Some(first) = self.overlay.trap().first(ctx.doc())? {
            ctx.focus(first);
        }
        let delay = ms(ctx.config().timing.modal_open);
        ctx.schedule(delay, "opened");
        Ok(())
    }

    /// Close and return focus to the trigger.
    pub fn close(&mut self, ctx: &mut Context) -> Result<()> {
        if !self.overlay.close(ctx)? {
            return Ok(());
        }
        debug!(modal = %self.name, "close");
        let root = ctx.root();
        let trigger = self.overlay.trigger();
        let doc = ctx.doc_mut();
        doc.remove_class(root, OPEN)?;
        doc.set_attr(root, "aria-hidden", "true")?;
        if let Some(t) = trigger {
            doc.set_attr(t, "aria-expanded", "false")?;
        }
        if self.soft_locked {
            let body = doc.body();
            doc.remove_class(body, SOFT_LOCK)?;
            self.soft_locked = false;
        }
        let delay = ms(ctx.config().timing.modal_close);
        ctx.schedule(delay, "closed");
        Ok(())
    }

    /// Reset fields inside the modal once it is hidden.
    fn reset_contents(ctx: &mut Context) -> Result<()> {
        let root = ctx.root();
        for field in ctx.query_all("input[type=search]")? {
            ctx.doc_mut().set_value(field, "")?;
        }
        for id in ctx.widgets_within(root) {
            ctx.try_with_widget::<TextArea, _>(id, |w, ctx| w.reset(ctx))?;
        }
        Ok(())
    }

    /// Handle a keystroke inside the open modal.
    fn key(&mut self, ctx: &mut Context, key: Key) -> Result<EventOutcome> {
        if key == KeyCode::Esc {
            self.close(ctx)?;
            return Ok(EventOutcome::Handle);
        }
        if self.overlay.trap_key(ctx, key)? {
            return Ok(EventOutcome::Prevent);
        }
        Ok(EventOutcome::Ignore)
    }
}

impl Widget for Modal {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.listen_document();
        for t in self.triggers(ctx)? {
            let doc = ctx.doc_mut();
            doc.set_attr(t, "tabindex", "0")?;
            doc.set_attr(t, "aria-haspopup", "true")?;
            doc.set_attr(t, "aria-expanded", "false")?;
        }
        Ok(())
    }

    fn on_disconnect(&mut self, ctx: &mut Context) {
        if let Err(e) = self.overlay.teardown(ctx) {
            warn!(modal = %self.name, "teardown failed: {e}");
        }
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        if !self.overlay.is_open() {
            return Ok(EventOutcome::Ignore);
        }
        let root = ctx.root();
        match event {
            Event::Click(t) => {
                let close = ctx.doc().closest(*t, self.markup.close)?;
                if close.is_some_and(|c| ctx.doc().contains(root, c)) {
                    self.close(ctx)?;
                    return Ok(EventOutcome::Handle);
                }
                if *t == root && !ctx.doc().has_class(root, LOCK) {
                    self.close(ctx)?;
                    return Ok(EventOutcome::Handle);
                }
                let opener = ctx.doc().closest(*t, OPENERS)?;
                if opener.is_none() && self.content.is_some_and(|c| ctx.doc().contains(c, *t)) {
                    return Ok(EventOutcome::Stop);
                }
                Ok(EventOutcome::Ignore)
            }
            Event::Key(_, key) => self.key(ctx, *key),
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_document_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        if self.overlay.is_open() {
            return Ok(EventOutcome::Ignore);
        }
        let trigger = match event {
            Event::Click(t) => self.trigger_for(ctx, *t)?,
            Event::Key(t, key) if key.is_activation() => {
                self.trigger_for(ctx, *t)?.filter(|tr| tr == t)
            }
            _ => None,
        };
        match trigger {
            Some(t) => {
                self.open(ctx, Some(t))?;
                Ok(EventOutcome::Prevent)
            }
            None => Ok(EventOutcome::Ignore),
        }
    }

    fn on_timer(&mut self, tag: &'static str, ctx: &mut Context) -> Result<()> {
        match tag {
            "opened" if self.overlay.state() == OverlayState::Opening => {
                self.overlay.settle();
                let root = ctx.root();
                scrollbar::refresh_within(ctx, root)
            }
            "closed" if self.overlay.state() == OverlayState::Closing => {
                self.overlay.settle();
                Self::reset_contents(ctx)
            }
            _ => Ok(()),
        }
    }

    fn dismiss(&mut self, ctx: &mut Context) -> Result<()> {
        self.close(ctx)
    }
}
