//! A small builder for document fixtures.

use crate::{
    NodeId,
    core::{dom::Document, geom::Rect},
    error::Result,
};

/// An element description, built fluently and then inserted into a document.
#[derive(Debug, Clone, Default)]
pub struct El {
    /// Tag name.
    tag: String,
    /// Attributes.
    attrs: Vec<(String, String)>,
    /// Classes.
    classes: Vec<String>,
    /// Inline style.
    style: Vec<(String, String)>,
    /// Own text.
    text: Option<String>,
    /// Form value.
    value: Option<String>,
    /// Checked state.
    checked: bool,
    /// Layout box.
    rect: Option<Rect>,
    /// Overflow container?
    clips: bool,
    /// Children.
    children: Vec<El>,
}

/// Start describing an element.
pub fn el(tag: &str) -> El {
    El {
        tag: tag.to_string(),
        ..Default::default()
    }
}

impl El {
    /// Set the `id` attribute.
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Set an attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Set a boolean attribute.
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    /// Add one or more space-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    /// Set an inline style property.
    pub fn style(mut self, prop: &str, value: &str) -> Self {
        self.style.push((prop.to_string(), value.to_string()));
        self
    }

    /// Set own text.
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Set the form value.
    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Check a checkbox.
    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Set the layout box in page coordinates.
    pub fn rect(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.rect = Some(Rect::new(x, y, w, h));
        self
    }

    /// Make this an overflow container that clips its children.
    pub fn clips(mut self) -> Self {
        self.clips = true;
        self
    }

    /// Append a child.
    pub fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children.extend(children);
        self
    }

    /// Create the element and its subtree under `parent`.
    pub fn build(&self, doc: &mut Document, parent: NodeId) -> Result<NodeId> {
        let id = doc.create(&self.tag);
        for (k, v) in &self.attrs {
            doc.set_attr(id, k, v.as_str())?;
        }
        for c in &self.classes {
            doc.add_class(id, c)?;
        }
        for (k, v) in &self.style {
            doc.set_style(id, k, v.as_str())?;
        }
        if let Some(t) = &self.text {
            doc.set_text(id, t.as_str())?;
        }
        if let Some(v) = &self.value {
            doc.set_value(id, v.as_str())?;
        }
        if self.checked {
            doc.set_checked(id, true)?;
        }
        if let Some(r) = self.rect {
            doc.set_rect(id, r)?;
        }
        if self.clips {
            doc.set_clips(id, true)?;
        }
        doc.append(parent, id)?;
        for c in &self.children {
            c.build(doc, id)?;
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    #[test]
    fn builds_tree() -> Result<()> {
        let mut doc = Document::new(Url::parse("https://example.com/")?, 1280.0, 800.0);
        let body = doc.body();
        let list = el("ul")
            .id("list")
            .class("a b")
            .children((0..3).map(|i| el("li").text(&format!("item {i}"))))
            .build(&mut doc, body)?;
        assert_eq!(doc.children(list).len(), 3);
        assert!(doc.has_class(list, "b"));
        assert_eq!(doc.by_id("list"), Some(list));
        Ok(())
    }
}
