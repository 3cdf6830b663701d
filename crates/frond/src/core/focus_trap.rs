//! Keeping Tab and Shift+Tab cycling inside a container.

use crate::{
    NodeId,
    core::dom::Document,
    error::Result,
    event::key::{Key, KeyCode},
};

/// Elements considered for a trap's cycle.
pub const FOCUSABLE: &str = "a[href], area[href], input:not([disabled]), \
     select:not([disabled]), textarea:not([disabled]), button:not([disabled]), \
     iframe, object, embed, [tabindex=\"0\"], [contenteditable]";

/// A focus trap over one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrap {
    /// Element focus is confined to.
    container: NodeId,
}

impl FocusTrap {
    /// Trap focus within `container`.
    pub fn new(container: NodeId) -> Self {
        Self { container }
    }

    /// The trapped container.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Focusable elements in the container, in document order. Hidden and
    /// inert elements are skipped.
    pub fn focusables(&self, doc: &Document) -> Result<Vec<NodeId>> {
        Ok(doc
            .query_all(self.container, FOCUSABLE)?
            .into_iter()
            .filter(|n| doc.is_focusable(*n))
            .collect())
    }

    /// First focusable element.
    pub fn first(&self, doc: &Document) -> Result<Option<NodeId>> {
        Ok(self.focusables(doc)?.first().copied())
    }

    /// Handle a keystroke. Returns true if the trap moved focus, in which case
    /// the default Tab navigation must be suppressed.
    pub fn handle_key(&self, doc: &mut Document, key: Key) -> Result<bool> {
        if key.key != KeyCode::Tab {
            return Ok(false);
        }
        let items = self.focusables(doc)?;
        let (Some(first), Some(last)) = (items.first().copied(), items.last().copied()) else {
            // Nothing to cycle through; swallow Tab so focus cannot escape.
            return Ok(true);
        };
        let active = doc.active();
        let inside = active.is_some_and(|a| doc.contains(self.container, a));
        let target = if key.mods.shift {
            (!inside || active == Some(first)).then_some(last)
        } else {
            (!inside || active == Some(last)).then_some(first)
        };
        match target {
            Some(t) => {
                doc.focus(t);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::event::key::Shift;

    #[test]
    fn wraps_both_ways() -> Result<()> {
        let mut d = Document::new(Url::parse("https://example.com/")?, 100.0, 100.0);
        let body = d.body();
        let modal = d.create("div");
        d.append(body, modal)?;
        let close = d.create("button");
        let input = d.create("input");
        let submit = d.create("button");
        let disabled = d.create("button");
        d.set_attr(disabled, "disabled", "")?;
        for n in [close, input, disabled, submit] {
            d.append(modal, n)?;
        }
        let trap = FocusTrap::new(modal);
        assert_eq!(trap.focusables(&d)?, vec![close, input, submit]);

        d.focus(submit);
        assert!(trap.handle_key(&mut d, KeyCode::Tab.into())?);
        assert_eq!(d.active(), Some(close));

        assert!(trap.handle_key(&mut d, Shift + KeyCode::Tab)?);
        assert_eq!(d.active(), Some(submit));

        d.focus(input);
        assert!(!trap.handle_key(&mut d, KeyCode::Tab.into())?);
        assert!(!trap.handle_key(&mut d, KeyCode::Esc.into())?);
        Ok(())
    }
}
