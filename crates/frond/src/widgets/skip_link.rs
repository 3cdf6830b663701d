//! "Skip to content" links.

use crate::{Context, EventOutcome, NodeId, Result, Widget, event::Event};

/// An `.m-skip-to-content` link that moves focus to `main`.
#[derive(Debug)]
pub struct SkipLink {
    /// The main landmark.
    main: NodeId,
    /// Did we give `main` a temporary tabindex?
    borrowed_tabindex: bool,
}

impl SkipLink {
    /// Bind to the link.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let doc = ctx.doc();
        let main = doc
            .query(doc.root(), "main")?
            .ok_or_else(|| crate::Error::missing("skip-link", "main"))?;
        Ok(Self {
            main,
            borrowed_tabindex: false,
        })
    }

    /// Focus the main landmark.
    fn skip(&mut self, ctx: &mut Context) -> Result<EventOutcome> {
        ctx.doc_mut().set_attr(self.main, "tabindex", "-1")?;
        self.borrowed_tabindex = true;
        ctx.focus(self.main);
        Ok(EventOutcome::Prevent)
    }
}

impl Widget for SkipLink {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.listen_document();
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Click(_) => self.skip(ctx),
            Event::Key(_, key) if key.is_activation() => self.skip(ctx),
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_document_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        if *event == Event::Blur(self.main) && self.borrowed_tabindex {
            self.borrowed_tabindex = false;
            ctx.doc_mut().remove_attr(self.main, "tabindex")?;
        }
        Ok(EventOutcome::Ignore)
    }
}
