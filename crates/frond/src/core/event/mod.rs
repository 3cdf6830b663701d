//! Document events delivered to widgets.

pub mod key;

use crate::NodeId;

/// A DOM-style event. Every event has a target element and bubbles from the
/// target towards the document root. Focus and blur bubble, matching the
/// `focusin`/`focusout` pair widgets listen for.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A primary pointer click.
    Click(NodeId),
    /// A keydown.
    Key(NodeId, key::Key),
    /// A text field's value changed through user input.
    Input(NodeId),
    /// A committed change, e.g. a checkbox toggle or range release.
    Change(NodeId),
    /// Clipboard text pasted into the target.
    Paste(NodeId, String),
    /// The target received focus.
    Focus(NodeId),
    /// The target lost focus.
    Blur(NodeId),
    /// The target's own scroll offset changed.
    Scroll(NodeId),
    /// A pointer moved over the target.
    PointerMove(NodeId),
    /// A form was submitted.
    Submit(NodeId),
}

impl Event {
    /// The element the event was dispatched at.
    pub fn target(&self) -> NodeId {
        match self {
            Self::Click(t)
            | Self::Key(t, _)
            | Self::Input(t)
            | Self::Change(t)
            | Self::Paste(t, _)
            | Self::Focus(t)
            | Self::Blur(t)
            | Self::Scroll(t)
            | Self::PointerMove(t)
            | Self::Submit(t) => *t,
        }
    }

    /// The keystroke carried by a key event.
    pub fn key(&self) -> Option<key::Key> {
        match self {
            Self::Key(_, k) => Some(*k),
            _ => None,
        }
    }

    /// Short lowercase event name, as used in traces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click(_) => "click",
            Self::Key(..) => "keydown",
            Self::Input(_) => "input",
            Self::Change(_) => "change",
            Self::Paste(..) => "paste",
            Self::Focus(_) => "focusin",
            Self::Blur(_) => "focusout",
            Self::Scroll(_) => "scroll",
            Self::PointerMove(_) => "pointermove",
            Self::Submit(_) => "submit",
        }
    }
}

/// A named notification a widget raises for the page to observe, e.g.
/// `pageChange` from a pagination control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEvent {
    /// Element the event was emitted from.
    pub source: NodeId,
    /// Event name.
    pub name: String,
    /// Event payload, serialized as a string.
    pub detail: String,
}
