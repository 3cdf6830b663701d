//! Whole-card links: a click anywhere on the card follows its `[card-link]`.

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    event::{Event, key::KeyCode},
};

/// A `card-link-interface` element or `[card-link-interface]` container.
#[derive(Debug)]
pub struct CardLink {
    /// The link the card follows.
    link: NodeId,
}

impl CardLink {
    /// Bind to the card.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        Ok(Self {
            link: ctx.require("[card-link]")?,
        })
    }
}

impl Widget for CardLink {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Click(t) if ctx.doc().contains(self.link, *t) => Ok(EventOutcome::Stop),
            Event::Click(_) => {
                ctx.doc_mut().queue_event(Event::Click(self.link));
                Ok(EventOutcome::Ignore)
            }
            Event::Key(_, key) if *key == KeyCode::Enter => {
                ctx.doc_mut().queue_event(Event::Click(self.link));
                Ok(EventOutcome::Prevent)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }
}
