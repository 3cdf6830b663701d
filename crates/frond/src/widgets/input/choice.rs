//! Checkbox molecules and native filter inputs.

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    dom::Document,
    event::Event,
    widget::{FILTER_CHANGE, FilterControl},
};

/// A `.m-input-checkbox` container mirroring its checkbox into
/// `aria-checked`.
#[derive(Debug)]
pub struct Checkbox {
    /// The checkbox.
    input: NodeId,
}

impl Checkbox {
    /// Bind to the container.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        Ok(Self {
            input: ctx.require("[type=checkbox]")?,
        })
    }
}

impl Widget for Checkbox {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        if let Event::Change(t) = event
            && *t == self.input
        {
            let root = ctx.root();
            let checked = ctx.doc().checked(self.input);
            ctx.doc_mut().set_attr(root, "aria-checked", checked.to_string())?;
        }
        Ok(EventOutcome::Ignore)
    }
}

/// What kind of native control a filter field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// Checkbox or radio.
    Toggle,
    /// Free text.
    Text,
    /// A `select`.
    Select,
    /// Anything else; never counts as active.
    Other,
}

impl FieldKind {
    /// Classify an element.
    fn of(doc: &Document, node: NodeId) -> Self {
        let tag = doc.get(node).map(|e| e.tag().to_string()).unwrap_or_default();
        match (tag.as_str(), doc.attr(node, "type")) {
            ("select", _) => Self::Select,
            ("input", Some("checkbox" | "radio")) => Self::Toggle,
            ("input", None | Some("text" | "search")) => Self::Text,
            _ => Self::Other,
        }
    }
}

/// A native input or select inside a filter panel.
#[derive(Debug)]
pub struct FilterField {
    /// The control.
    node: NodeId,
    /// Control kind.
    kind: FieldKind,
}

impl FilterField {
    /// Bind to the root control.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let node = ctx.root();
        Ok(Self {
            node,
            kind: FieldKind::of(ctx.doc(), node),
        })
    }
}

impl Widget for FilterField {
    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        let root = ctx.root();
        if matches!(event, Event::Input(t) | Event::Change(t) if *t == root) {
            ctx.emit(root, FILTER_CHANGE, "");
        }
        Ok(EventOutcome::Ignore)
    }

    fn filter_control(&mut self) -> Option<&mut dyn FilterControl> {
        Some(self)
    }
}

impl FilterControl for FilterField {
    fn values(&self, doc: &Document) -> Vec<String> {
        let value = doc.value(self.node);
        let selected = match self.kind {
            FieldKind::Toggle => doc.checked(self.node),
            FieldKind::Text => !value.trim().is_empty(),
            FieldKind::Select => !value.is_empty(),
            FieldKind::Other => false,
        };
        if selected {
            vec![value.trim().to_string()]
        } else {
            vec![]
        }
    }

    fn clear(&mut self, ctx: &mut Context) -> Result<()> {
        let node = self.node;
        match self.kind {
            FieldKind::Toggle => ctx.doc_mut().set_checked(node, false),
            FieldKind::Text => ctx.doc_mut().set_value(node, ""),
            FieldKind::Select => {
                let first = ctx
                    .doc()
                    .query(node, "option")?
                    .map(|o| option_value(ctx.doc(), o))
                    .unwrap_or_default();
                ctx.doc_mut().set_value(node, first)
            }
            FieldKind::Other => Ok(()),
        }
    }
}

/// An option's value: its `value` attribute, else its text.
pub fn option_value(doc: &Document, option: NodeId) -> String {
    doc.attr(option, "value")
        .map_or_else(|| doc.text_content(option).trim().to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    use crate::testing::el;

    #[test]
    fn classify_controls() -> Result<()> {
        let mut doc = Document::new(Url::parse("https://example.com/")?, 1280.0, 800.0);
        let body = doc.body();
        let ids: Vec<NodeId> = [
            el("input").attr("type", "checkbox"),
            el("input"),
            el("select"),
            el("input").attr("type", "range"),
        ]
        .iter()
        .map(|e| e.build(&mut doc, body))
        .collect::<Result<_>>()?;
        let kinds: Vec<FieldKind> = ids.iter().map(|n| FieldKind::of(&doc, *n)).collect();
        assert_eq!(
            kinds,
            [FieldKind::Toggle, FieldKind::Text, FieldKind::Select, FieldKind::Other]
        );
        Ok(())
    }
}
