//! Animated placeholder suggestions for search fields: each suggestion is
//! typed out after a fixed prefix, held, then deleted back to the prefix.

use crate::{
    Context, EventOutcome, Result, TimerId, Widget, config::ms, error::Error, event::Event,
};

/// One typing or deleting step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typist {
    /// Suggestions in order.
    suggestions: Vec<String>,
    /// Suggestion being shown.
    index: usize,
    /// Characters of prefix plus suggestion currently shown.
    len: usize,
    /// Removing characters rather than adding them.
    deleting: bool,
    /// Caret shown on this step.
    caret: bool,
}

/// What to do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Next character typed.
    Type,
    /// Next character deleted.
    Delete,
    /// Suggestion complete; hold before deleting.
    Hold,
}

impl Typist {
    /// A typist over a comma-separated suggestion list.
    pub fn new(list: &str) -> Self {
        Self {
            suggestions: list.split(',').map(str::to_string).collect(),
            index: 0,
            len: 0,
            deleting: false,
            caret: true,
        }
    }

    /// Advance one character. Returns the placeholder to show and how long
    /// to wait before the next step.
    pub fn step(&mut self, prefix: &str) -> (String, Pace) {
        let full: Vec<char> = prefix
            .chars()
            .chain(self.suggestions[self.index].chars())
            .collect();
        self.len = if self.deleting {
            self.len.saturating_sub(1)
        } else {
            (self.len + 1).min(full.len())
        };
        let mut shown: String = full[..self.len].iter().collect();
        if self.caret {
            shown.push('|');
        }
        let mut pace = if self.deleting { Pace::Delete } else { Pace::Type };
        if !self.deleting && self.len == full.len() {
            pace = Pace::Hold;
            self.deleting = true;
        } else if self.deleting && self.len <= prefix.chars().count() {
            self.deleting = false;
            self.index = (self.index + 1) % self.suggestions.len();
        }
        self.caret = !self.caret;
        (shown, pace)
    }
}

/// A `.ui-search-suggestion-placeholder` field.
#[derive(Debug)]
pub struct PlaceholderSuggestions {
    /// Animation state.
    typist: Typist,
    /// Pending step.
    timer: Option<TimerId>,
    /// The field has focus; the animation waits.
    focused: bool,
}

impl PlaceholderSuggestions {
    /// Bind to the root field.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let list = ctx
            .doc()
            .attr(ctx.root(), "data-suggestions-animation")
            .ok_or_else(|| Error::missing("placeholder", "[data-suggestions-animation]"))?;
        Ok(Self {
            typist: Typist::new(list),
            timer: None,
            focused: false,
        })
    }

    /// Show the next step and schedule the one after.
    fn tick(&mut self, ctx: &mut Context) -> Result<()> {
        if self.focused {
            return Ok(());
        }
        let prefix = ctx.config().placeholder_prefix.clone();
        let (text, pace) = self.typist.step(&prefix);
        let root = ctx.root();
        ctx.doc_mut().set_attr(root, "placeholder", text)?;
        let timing = &ctx.config().timing;
        let delay = match pace {
            Pace::Type => timing.placeholder_type,
            Pace::Delete => timing.placeholder_delete,
            Pace::Hold => timing.placeholder_pause,
        };
        ctx.debounce(&mut self.timer, ms(delay), "placeholder");
        Ok(())
    }
}

impl Widget for PlaceholderSuggestions {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        self.tick(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let root = ctx.root();
        match event {
            Event::Focus(t) if *t == root => {
                self.focused = true;
                ctx.clear_timer(&mut self.timer);
                ctx.doc_mut().set_attr(root, "placeholder", "")?;
            }
            Event::Blur(t) if *t == root => {
                self.focused = false;
                if ctx.doc().value(root).is_empty() {
                    self.tick(ctx)?;
                }
            }
            _ => {}
        }
        Ok(EventOutcome::Ignore)
    }

    fn on_timer(&mut self, _tag: &'static str, ctx: &mut Context) -> Result<()> {
        self.timer = None;
        self.tick(ctx)
    }

    fn on_disconnect(&mut self, ctx: &mut Context) {
        ctx.clear_timer(&mut self.timer);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn types_holds_and_deletes() {
        let mut t = Typist::new("ab,c");
        assert_eq!(t.step("> "), (">|".to_string(), Pace::Type));
        assert_eq!(t.step("> "), ("> ".to_string(), Pace::Type));
        assert_eq!(t.step("> "), ("> a|".to_string(), Pace::Type));
        assert_eq!(t.step("> "), ("> ab".to_string(), Pace::Hold));
        assert_eq!(t.step("> "), ("> a|".to_string(), Pace::Delete));
        assert_eq!(t.step("> "), ("> ".to_string(), Pace::Delete));
        assert_eq!(t.step("> "), ("> c|".to_string(), Pace::Hold));
        assert_eq!(t.step("> "), ("> ".to_string(), Pace::Delete));
        assert_eq!(t.step("> "), ("> a|".to_string(), Pace::Type));
    }
}
