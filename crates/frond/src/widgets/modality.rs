//! Body classes tracking whether the user last used a pointer or keyboard.

use crate::{Context, EventOutcome, Result, Widget, event::Event};

/// Body class after pointer input.
pub const USING_MOUSE: &str = "using-mouse";
/// Body class after keyboard input.
pub const USING_KEYBOARD: &str = "using-keyboard";

/// Input modality tracker bound to `body`.
#[derive(Debug, Default)]
pub struct Modality;

impl Modality {
    /// Mark the body for one modality.
    fn mark(ctx: &mut Context, keyboard: bool) -> Result<()> {
        let body = ctx.root();
        let doc = ctx.doc_mut();
        doc.toggle_class(body, USING_MOUSE, !keyboard)?;
        doc.toggle_class(body, USING_KEYBOARD, keyboard)
    }
}

impl Widget for Modality {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.listen_document();
        Ok(())
    }

    fn on_document_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::PointerMove(_) | Event::Click(_) => Self::mark(ctx, false)?,
            Event::Key(..) => Self::mark(ctx, true)?,
            _ => {}
        }
        Ok(EventOutcome::Ignore)
    }
}
