//! Text field molecules: wrapper state classes, whitespace collapsing and
//! the textarea character counter.

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    event::{Event, key::KeyCode},
};

use super::sanitize::{collapse_spaces, rewrite};

/// Wrapper class while the field holds text.
pub const HAS_VALUE: &str = "has-value";
/// Wrapper class while the field is focused.
pub const HAS_FOCUS: &str = "has-focus-within";
/// Wrapper class after failed validation.
pub const IS_INVALID: &str = "is-invalid";

/// Is the trimmed value empty?
fn is_blank(ctx: &Context, field: NodeId) -> bool {
    ctx.doc().value(field).trim().is_empty()
}

/// Shared input handling: clear the invalid mark, collapse whitespace and
/// track whether there is a value.
fn on_input(ctx: &mut Context, field: NodeId, wrapper: NodeId) -> Result<()> {
    ctx.doc_mut().remove_class(wrapper, IS_INVALID)?;
    rewrite(ctx, field, collapse_spaces)?;
    let filled = !is_blank(ctx, field);
    ctx.doc_mut().toggle_class(wrapper, HAS_VALUE, filled)
}

/// Shared focus tracking. Returns true if the event was a focus change.
fn on_focus_change(
    ctx: &mut Context,
    event: &Event,
    field: NodeId,
    wrapper: NodeId,
) -> Result<bool> {
    match event {
        Event::Focus(t) if *t == field => {
            ctx.doc_mut().add_class(wrapper, HAS_FOCUS)?;
            Ok(true)
        }
        Event::Blur(t) if *t == field => {
            let filled = !is_blank(ctx, field);
            let doc = ctx.doc_mut();
            doc.remove_class(wrapper, HAS_FOCUS)?;
            doc.toggle_class(wrapper, HAS_VALUE, filled)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// A single-line text field inside a `.m-text-input-field__wrapper`.
#[derive(Debug)]
pub struct TextField {
    /// Element carrying the state classes.
    wrapper: NodeId,
    /// Is a value required?
    required: bool,
}

impl TextField {
    /// Bind to the root input.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let root = ctx.root();
        let wrapper = ctx
            .doc()
            .closest(root, ".m-text-input-field__wrapper")?
            .ok_or_else(|| crate::Error::missing("text-field", ".m-text-input-field__wrapper"))?;
        Ok(Self {
            wrapper,
            required: ctx.doc().has_attr(root, "required"),
        })
    }

    /// Is the field required but empty?
    pub fn is_invalid(&self, ctx: &Context) -> bool {
        self.required && is_blank(ctx, ctx.root())
    }
}

impl Widget for TextField {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        if !ctx.doc().value(ctx.root()).is_empty() {
            ctx.doc_mut().add_class(self.wrapper, HAS_FOCUS)?;
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let field = ctx.root();
        if on_focus_change(ctx, event, field, self.wrapper)? {
            return Ok(EventOutcome::Ignore);
        }
        match event {
            Event::Input(t) if *t == field => {
                on_input(ctx, field, self.wrapper)?;
                Ok(EventOutcome::Ignore)
            }
            // A leading space is never useful.
            Event::Key(t, k)
                if *t == field && k.key == KeyCode::Char(' ') && is_blank(ctx, field) =>
            {
                Ok(EventOutcome::Prevent)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

/// A textarea molecule with a live `n/max` character counter.
#[derive(Debug)]
pub struct TextArea {
    /// The textarea.
    field: NodeId,
    /// Counter element appended to the root.
    counter: NodeId,
    /// Declared `maxlength`, or zero.
    max: usize,
    /// Is a value required?
    required: bool,
}

impl TextArea {
    /// Bind to an `x-textarea-input` and append its counter.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let root = ctx.root();
        let field = ctx.require(".m-text-input-field__input")?;
        let max = ctx.doc().attr_f64(field, "maxlength").map_or(0, |m| m.max(0.0) as usize);
        let required = ctx.doc().has_attr(field, "required");
        let doc = ctx.doc_mut();
        let counter = doc.create("span");
        doc.add_class(counter, "m-text-input-field__char-counter")?;
        doc.append(root, counter)?;
        Ok(Self {
            field,
            counter,
            max,
            required,
        })
    }

    /// Refresh the counter.
    fn update_counter(&self, ctx: &mut Context) -> Result<()> {
        let n = ctx.doc().value(self.field).chars().count();
        ctx.doc_mut().set_text(self.counter, format!("{n}/{}", self.max))
    }

    /// Is the field required but empty?
    pub fn is_invalid(&self, ctx: &Context) -> bool {
        self.required && is_blank(ctx, self.field)
    }

    /// Empty the field and clear its state classes.
    pub fn reset(&mut self, ctx: &mut Context) -> Result<()> {
        let root = ctx.root();
        ctx.doc_mut().set_value(self.field, "")?;
        self.update_counter(ctx)?;
        let doc = ctx.doc_mut();
        doc.remove_class(root, HAS_VALUE)?;
        doc.remove_class(root, IS_INVALID)
    }
}

impl Widget for TextArea {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        self.update_counter(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let root = ctx.root();
        if on_focus_change(ctx, event, self.field, root)? {
            return Ok(EventOutcome::Ignore);
        }
        if let Event::Input(t) = event
            && *t == self.field
        {
            on_input(ctx, self.field, root)?;
            self.update_counter(ctx)?;
        }
        Ok(EventOutcome::Ignore)
    }
}
