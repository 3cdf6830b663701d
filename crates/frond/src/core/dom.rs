//! The document model: an arena of elements with attributes, classes, inline
//! style, form state, layout geometry and scroll offsets.

use std::{
    collections::{BTreeMap, VecDeque},
    mem,
};

use slotmap::SlotMap;
use url::Url;

use crate::{
    NodeId,
    core::{geom::Rect, selector::Selector},
    error::{Error, Result},
    event::Event,
};

/// Elements that are focusable without a tabindex when not disabled.
const NATIVE_FOCUSABLE: &[&str] = &["button", "input", "select", "textarea", "iframe"];

/// Elements that accept typed text.
const TEXT_FIELDS: &[&str] = &["input", "textarea"];

/// A file chosen through an upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// File name including extension.
    pub name: String,
    /// MIME type as reported by the browser.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
}

/// A single element in the arena.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Lowercase tag name.
    tag: String,
    /// Attributes other than `class` and `style`.
    attrs: BTreeMap<String, String>,
    /// Ordered, de-duplicated class list.
    classes: Vec<String>,
    /// Inline style properties.
    style: BTreeMap<String, String>,
    /// Own text content.
    text: String,
    /// Form control value.
    value: String,
    /// Selection as char offsets into `value`.
    selection: (usize, usize),
    /// Checkbox state.
    checked: bool,
    /// Files selected in an upload field.
    files: Vec<FileInfo>,
    /// Layout box in page coordinates, ignoring all scrolling.
    rect: Rect,
    /// Horizontal scroll offset of this element's content.
    scroll_left: f64,
    /// Vertical scroll offset of this element's content.
    scroll_top: f64,
    /// Whether this element clips its descendants (an overflow container).
    clips: bool,
    /// Parent element.
    parent: Option<NodeId>,
    /// Child elements in document order.
    children: Vec<NodeId>,
}

impl Element {
    /// Create a detached element.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value. Classes and inline style are not attributes here.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Is the attribute present?
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Attributes in name order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Inline style properties in name order.
    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Is the class present?
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The class list.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Inline style property.
    pub fn style(&self, prop: &str) -> Option<&str> {
        self.style.get(prop).map(String::as_str)
    }

    /// Own text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Form value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Current selection.
    pub fn selection(&self) -> (usize, usize) {
        self.selection
    }

    /// Checkbox state.
    pub fn checked(&self) -> bool {
        self.checked
    }

    /// Selected files.
    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    /// Layout rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Horizontal scroll offset.
    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    /// Vertical scroll offset.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Child ids.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Is the element disabled?
    pub fn disabled(&self) -> bool {
        self.has_attr("disabled")
    }
}

/// The page document.
#[derive(Debug)]
pub struct Document {
    /// Element arena.
    nodes: SlotMap<NodeId, Element>,
    /// The `html` element.
    root: NodeId,
    /// The `body` element.
    body: NodeId,
    /// Focused element.
    active: Option<NodeId>,
    /// Window vertical scroll offset.
    scroll_y: f64,
    /// Vertical offset applied to the body while it is pinned.
    body_offset: f64,
    /// Is the body pinned by fixed positioning?
    pinned: bool,
    /// Viewport width and height.
    viewport: (f64, f64),
    /// Current location.
    location: Url,
    /// Events raised by document mutations, waiting for dispatch.
    pending: VecDeque<Event>,
    /// Parents whose child lists changed since the last drain.
    mutated: Vec<NodeId>,
}

impl Document {
    /// Create an empty document at the given location with a viewport.
    pub fn new(location: Url, width: f64, height: f64) -> Self {
        let mut nodes: SlotMap<NodeId, Element> = SlotMap::with_key();
        let root = nodes.insert(Element::new("html"));
        let body = nodes.insert(Element::new("body"));
        nodes[body].parent = Some(root);
        nodes[root].children.push(body);
        let mut doc = Self {
            nodes,
            root,
            body,
            active: None,
            scroll_y: 0.0,
            body_offset: 0.0,
            pinned: false,
            viewport: (width, height),
            location,
            pending: VecDeque::new(),
            mutated: Vec::new(),
        };
        let r = Rect::new(0.0, 0.0, width, height);
        doc.nodes[root].rect = r;
        doc.nodes[body].rect = r;
        doc
    }

    /// The `html` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Look up an element.
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id)
    }

    /// Look up an element, failing if it is gone.
    pub fn el(&self, id: NodeId) -> Result<&Element> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Mutable element lookup.
    fn el_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Does the arena hold this element?
    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Is the element attached beneath the document root?
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors(id).last().copied() == Some(self.root)
    }

    /// Number of elements in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the arena empty? Never true, since `html` always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---- tree ----

    /// Parent element.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|e| e.parent)
    }

    /// Children of an element.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    /// The element and its ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut cur = self.nodes.contains_key(id).then_some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent(n);
        }
        out
    }

    /// Is `node` equal to or a descendant of `ancestor`?
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// All descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            if let Some(e) = self.nodes.get(n) {
                stack.extend(e.children.iter().rev());
            }
        }
        out
    }

    /// Create a detached element.
    pub fn create(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Element::new(tag))
    }

    /// Detach `child` from its current parent, if any.
    fn unlink(&mut self, child: NodeId) {
        if let Some(p) = self.parent(child) {
            if let Some(pe) = self.nodes.get_mut(p) {
                pe.children.retain(|c| *c != child);
            }
            self.mutated.push(p);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
    }

    /// Insert `child` under `parent` at `index`, moving it if already attached.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        self.el(child)?;
        if self.contains(child, parent) {
            return Err(Error::Invalid("cannot insert an element into itself".into()));
        }
        self.unlink(child);
        let p = self.el_mut(parent)?;
        let index = index.min(p.children.len());
        p.children.insert(index, child);
        self.el_mut(child)?.parent = Some(parent);
        self.mutated.push(parent);
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let n = self.el(parent)?.children.len();
        self.insert(parent, n, child)
    }

    /// Insert `child` directly after `reference`.
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) -> Result<()> {
        let parent = self
            .parent(reference)
            .ok_or_else(|| Error::Invalid("reference element has no parent".into()))?;
        let idx = self
            .el(parent)?
            .children
            .iter()
            .position(|c| *c == reference)
            .map_or(0, |i| i + 1);
        self.insert(parent, idx, child)
    }

    /// Remove an element and its subtree from the document and the arena,
    /// returning every removed id.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        if id == self.root || id == self.body {
            return Err(Error::Invalid("cannot remove html or body".into()));
        }
        self.el(id)?;
        self.unlink(id);
        let mut removed = vec![id];
        removed.extend(self.descendants(id));
        for n in &removed {
            self.nodes.remove(*n);
        }
        if self.active.is_some_and(|a| !self.nodes.contains_key(a)) {
            self.active = None;
        }
        Ok(removed)
    }

    /// Remove every child of an element.
    pub fn clear_children(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut removed = vec![];
        for c in self.children(id) {
            removed.extend(self.remove(c)?);
        }
        Ok(removed)
    }

    /// Take the list of parents whose children changed.
    pub fn take_mutations(&mut self) -> Vec<NodeId> {
        let mut m = mem::take(&mut self.mutated);
        m.dedup();
        m
    }

    /// Take the next event raised by a document mutation.
    pub fn next_event(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    /// Queue an event for dispatch after the current handler returns.
    pub fn queue_event(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    // ---- attributes, classes, style ----

    /// Attribute value.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|e| e.attr(name))
    }

    /// Is the attribute present?
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.nodes.get(id).is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        self.el_mut(id)?.attrs.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.el_mut(id)?.attrs.remove(name);
        Ok(())
    }

    /// Set or remove a boolean attribute.
    pub fn toggle_attr(&mut self, id: NodeId, name: &str, on: bool) -> Result<()> {
        if on {
            self.set_attr(id, name, "")
        } else {
            self.remove_attr(id, name)
        }
    }

    /// Parse an attribute as a number.
    pub fn attr_f64(&self, id: NodeId, name: &str) -> Option<f64> {
        self.attr(id, name).and_then(|v| v.trim().parse().ok())
    }

    /// Is the class present?
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes.get(id).is_some_and(|e| e.has_class(class))
    }

    /// Add a class if absent.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        let e = self.el_mut(id)?;
        if !e.has_class(class) {
            e.classes.push(class.to_string());
        }
        Ok(())
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        self.el_mut(id)?.classes.retain(|c| c != class);
        Ok(())
    }

    /// Add or remove a class.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) -> Result<()> {
        if on {
            self.add_class(id, class)
        } else {
            self.remove_class(id, class)
        }
    }

    /// Inline style property.
    pub fn style(&self, id: NodeId, prop: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|e| e.style(prop))
    }

    /// Set an inline style property. An empty value removes it.
    pub fn set_style(&mut self, id: NodeId, prop: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let e = self.el_mut(id)?;
        if value.is_empty() {
            e.style.remove(prop);
        } else {
            e.style.insert(prop.to_string(), value);
        }
        Ok(())
    }

    // ---- text and form state ----

    /// Own text of an element.
    pub fn text(&self, id: NodeId) -> &str {
        self.nodes.get(id).map_or("", |e| e.text())
    }

    /// Concatenated text of an element and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = self.text(id).to_string();
        for d in self.descendants(id) {
            out.push_str(self.text(d));
        }
        out
    }

    /// Replace an element's own text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        self.el_mut(id)?.text = text.into();
        Ok(())
    }

    /// Form value.
    pub fn value(&self, id: NodeId) -> &str {
        self.nodes.get(id).map_or("", |e| e.value())
    }

    /// Set a form value, moving the caret to the end.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<()> {
        let e = self.el_mut(id)?;
        e.value = value.into();
        let n = e.value.chars().count();
        e.selection = (n, n);
        Ok(())
    }

    /// Selection within a form value, as char offsets.
    pub fn selection(&self, id: NodeId) -> (usize, usize) {
        self.nodes.get(id).map_or((0, 0), |e| e.selection())
    }

    /// Set the selection, clamped to the value length.
    pub fn set_selection(&mut self, id: NodeId, start: usize, end: usize) -> Result<()> {
        let e = self.el_mut(id)?;
        let n = e.value.chars().count();
        let start = start.min(n);
        e.selection = (start, end.clamp(start, n));
        Ok(())
    }

    /// Replace the selection with `text`, leaving the caret after it.
    pub fn insert_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        let e = self.el_mut(id)?;
        let (start, end) = e.selection;
        let chars: Vec<char> = e.value.chars().collect();
        let start = start.min(chars.len());
        let end = end.clamp(start, chars.len());
        let mut v: String = chars[..start].iter().collect();
        v.push_str(text);
        v.extend(&chars[end..]);
        e.value = v;
        let caret = start + text.chars().count();
        e.selection = (caret, caret);
        Ok(())
    }

    /// Delete the selection, or the character before the caret.
    pub fn delete_backward(&mut self, id: NodeId) -> Result<()> {
        let (start, end) = self.selection(id);
        if start == end && start > 0 {
            self.set_selection(id, start - 1, end)?;
        }
        self.insert_text(id, "")
    }

    /// Checkbox state.
    pub fn checked(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|e| e.checked)
    }

    /// Set checkbox state.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<()> {
        self.el_mut(id)?.checked = checked;
        Ok(())
    }

    /// Selected files of an upload field.
    pub fn files(&self, id: NodeId) -> &[FileInfo] {
        self.nodes.get(id).map_or(&[], |e| e.files())
    }

    /// Replace the selected files of an upload field.
    pub fn set_files(&mut self, id: NodeId, files: Vec<FileInfo>) -> Result<()> {
        self.el_mut(id)?.files = files;
        Ok(())
    }

    /// Is this an editable text field?
    pub fn is_text_field(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|e| {
            TEXT_FIELDS.contains(&e.tag.as_str())
                && !matches!(
                    e.attr("type"),
                    Some("checkbox" | "radio" | "range" | "file" | "button" | "submit")
                )
        })
    }

    // ---- selectors ----

    /// Does the element match a selector?
    pub fn matches(&self, id: NodeId, sel: &Selector) -> bool {
        sel.matches(self, id)
    }

    /// First descendant of `scope` matching `sel`.
    pub fn query(&self, scope: NodeId, sel: &str) -> Result<Option<NodeId>> {
        let sel = Selector::parse(sel)?;
        Ok(self.descendants(scope).into_iter().find(|n| sel.matches(self, *n)))
    }

    /// Every descendant of `scope` matching `sel`, in document order.
    pub fn query_all(&self, scope: NodeId, sel: &str) -> Result<Vec<NodeId>> {
        let sel = Selector::parse(sel)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|n| sel.matches(self, *n))
            .collect())
    }

    /// Nearest inclusive ancestor matching `sel`.
    pub fn closest(&self, id: NodeId, sel: &str) -> Result<Option<NodeId>> {
        let sel = Selector::parse(sel)?;
        Ok(self.ancestors(id).into_iter().find(|n| sel.matches(self, *n)))
    }

    /// Element with the given `id` attribute.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.attr(*n, "id") == Some(id))
    }

    // ---- rendering state ----

    /// Is the element rendered? Elements under a `hidden` attribute or an
    /// inline `display: none` are not.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.is_connected(id)
            && self.ancestors(id).into_iter().all(|n| {
                !self.has_attr(n, "hidden") && self.style(n, "display") != Some("none")
            })
    }

    /// Is the element or an ancestor inert?
    pub fn is_inert(&self, id: NodeId) -> bool {
        self.ancestors(id).into_iter().any(|n| self.has_attr(n, "inert"))
    }

    // ---- focus ----

    /// Focused element.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Can the element take focus?
    pub fn is_focusable(&self, id: NodeId) -> bool {
        let Some(e) = self.nodes.get(id) else {
            return false;
        };
        let native = (NATIVE_FOCUSABLE.contains(&e.tag.as_str()) && !e.disabled())
            || (e.tag == "a" && e.has_attr("href"))
            || e.has_attr("contenteditable");
        (native || e.has_attr("tabindex"))
            && e.attr("type") != Some("hidden")
            && self.is_rendered(id)
            && !self.is_inert(id)
    }

    /// Is the element reachable with Tab?
    pub fn is_tabbable(&self, id: NodeId) -> bool {
        let negative = self
            .attr(id, "tabindex")
            .and_then(|t| t.trim().parse::<i32>().ok())
            .is_some_and(|t| t < 0);
        !negative && self.is_focusable(id)
    }

    /// Every tabbable element in document order.
    pub fn tab_order(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|n| self.is_tabbable(*n))
            .collect()
    }

    /// Focus an element, queueing blur and focus events. Returns false if the
    /// element cannot take focus.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_focusable(id) {
            return false;
        }
        if self.active == Some(id) {
            return true;
        }
        if let Some(prev) = self.active.take() {
            self.pending.push_back(Event::Blur(prev));
        }
        self.active = Some(id);
        self.pending.push_back(Event::Focus(id));
        true
    }

    /// Drop focus from the active element.
    pub fn blur(&mut self) {
        if let Some(prev) = self.active.take() {
            self.pending.push_back(Event::Blur(prev));
        }
    }

    /// The next (or previous) tabbable element after the focused one, wrapping.
    pub fn next_tabbable(&self, backwards: bool) -> Option<NodeId> {
        let order = self.tab_order();
        if order.is_empty() {
            return None;
        }
        let pos = self.active.and_then(|a| order.iter().position(|n| *n == a));
        let idx = match (pos, backwards) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        order.get(idx).copied()
    }

    // ---- geometry and scrolling ----

    /// Viewport size.
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Change the viewport size, keeping `html` and `body` at least as wide.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        for n in [self.root, self.body] {
            if let Some(e) = self.nodes.get_mut(n) {
                e.rect.w = width;
                e.rect.h = e.rect.h.max(height);
            }
        }
        self.scroll_y = self.scroll_y.min(self.max_scroll_y());
    }

    /// Layout rectangle of an element.
    pub fn rect(&self, id: NodeId) -> Rect {
        self.nodes.get(id).map(|e| e.rect).unwrap_or_default()
    }

    /// Set an element's layout rectangle.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) -> Result<()> {
        self.el_mut(id)?.rect = rect;
        Ok(())
    }

    /// Mark an element as an overflow container that clips its content.
    pub fn set_clips(&mut self, id: NodeId, clips: bool) -> Result<()> {
        self.el_mut(id)?.clips = clips;
        Ok(())
    }

    /// Offset of an element's left edge from its parent's.
    pub fn offset_left(&self, id: NodeId) -> f64 {
        let parent = self.parent(id).map(|p| self.rect(p).x).unwrap_or_default();
        self.rect(id).x - parent
    }

    /// Offset of an element's top edge from the document top.
    pub fn offset_top(&self, id: NodeId) -> f64 {
        self.rect(id).y
    }

    /// Full scrollable width of an element's content.
    pub fn scroll_width(&self, id: NodeId) -> f64 {
        let r = self.rect(id);
        self.children(id)
            .into_iter()
            .map(|c| self.rect(c).right() - r.x)
            .fold(r.w, f64::max)
    }

    /// Full scrollable height of an element's content.
    pub fn scroll_height(&self, id: NodeId) -> f64 {
        let r = self.rect(id);
        self.children(id)
            .into_iter()
            .map(|c| self.rect(c).bottom() - r.y)
            .fold(r.h, f64::max)
    }

    /// Horizontal scroll offset.
    pub fn scroll_left(&self, id: NodeId) -> f64 {
        self.nodes.get(id).map_or(0.0, |e| e.scroll_left)
    }

    /// Vertical scroll offset.
    pub fn scroll_top(&self, id: NodeId) -> f64 {
        self.nodes.get(id).map_or(0.0, |e| e.scroll_top)
    }

    /// Scroll an element horizontally, clamped to its content. Queues a
    /// scroll event if the offset changed.
    pub fn set_scroll_left(&mut self, id: NodeId, x: f64) -> Result<()> {
        let max = (self.scroll_width(id) - self.rect(id).w).max(0.0);
        let x = x.clamp(0.0, max);
        let e = self.el_mut(id)?;
        if (e.scroll_left - x).abs() > f64::EPSILON {
            e.scroll_left = x;
            self.pending.push_back(Event::Scroll(id));
        }
        Ok(())
    }

    /// Scroll an element vertically, clamped to its content.
    pub fn set_scroll_top(&mut self, id: NodeId, y: f64) -> Result<()> {
        let max = (self.scroll_height(id) - self.rect(id).h).max(0.0);
        let y = y.clamp(0.0, max);
        let e = self.el_mut(id)?;
        if (e.scroll_top - y).abs() > f64::EPSILON {
            e.scroll_top = y;
            self.pending.push_back(Event::Scroll(id));
        }
        Ok(())
    }

    /// Window scroll offset.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Largest window scroll offset the content allows.
    pub fn max_scroll_y(&self) -> f64 {
        if self.pinned {
            return 0.0;
        }
        let bottom = self
            .nodes
            .values()
            .map(|e| e.rect.bottom())
            .fold(0.0, f64::max);
        (bottom - self.viewport.1).max(0.0)
    }

    /// Scroll the window, clamped. Returns the applied offset.
    pub fn set_scroll_y(&mut self, y: f64) -> f64 {
        self.scroll_y = y.clamp(0.0, self.max_scroll_y());
        self.scroll_y
    }

    /// Pin the body in place, shifted up by `offset`, as fixed positioning
    /// does. The window can no longer scroll while pinned.
    pub fn pin_body(&mut self, offset: f64) {
        self.body_offset = offset;
        self.pinned = true;
        self.scroll_y = 0.0;
    }

    /// Release a pinned body.
    pub fn unpin_body(&mut self) {
        self.body_offset = 0.0;
        self.pinned = false;
    }

    /// Is the body pinned?
    pub fn body_pinned(&self) -> bool {
        self.pinned
    }

    /// Rectangle relative to the viewport, after every ancestor scroll offset
    /// and the window scroll are applied.
    pub fn client_rect(&self, id: NodeId) -> Rect {
        let mut r = self.rect(id);
        let mut pinned = false;
        for a in self.ancestors(id).into_iter().skip(1) {
            r = r.shift(-self.scroll_left(a), -self.scroll_top(a));
            pinned |= a == self.body;
        }
        if pinned {
            r = r.shift(0.0, -self.body_offset);
        }
        r.shift(0.0, -self.scroll_y)
    }

    /// The visible part of an element in viewport coordinates, clipped by
    /// every overflow ancestor below `stop`. None if nothing is visible or the
    /// element is not rendered.
    pub fn clipped_rect(&self, id: NodeId, stop: Option<NodeId>) -> Option<Rect> {
        if !self.is_rendered(id) {
            return None;
        }
        let mut r = self.client_rect(id);
        for a in self.ancestors(id).into_iter().skip(1) {
            if Some(a) == stop {
                break;
            }
            if self.nodes.get(a).is_some_and(|e| e.clips) {
                r = r.intersect(&self.client_rect(a))?;
            }
        }
        Some(r)
    }

    // ---- location ----

    /// Current location.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Navigate within the document model.
    pub fn set_location(&mut self, url: Url) {
        self.location = url;
    }

    /// Origin as serialized by the browser, e.g. `https://example.com`.
    pub fn origin(&self) -> String {
        self.location.origin().ascii_serialization()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        let url = Url::parse("https://example.com/p/widget").unwrap();
        Document::new(url, 1000.0, 800.0)
    }

    #[test]
    fn tree_ops() -> Result<()> {
        let mut d = doc();
        let body = d.body();
        let a = d.create("div");
        let b = d.create("span");
        d.append(body, a)?;
        d.append(a, b)?;
        assert!(d.contains(a, b));
        assert!(d.is_connected(b));
        assert_eq!(d.ancestors(b), vec![b, a, body, d.root()]);
        assert!(d.insert(b, 0, a).is_err());

        let c = d.create("p");
        assert!(!d.is_connected(c));
        d.insert_after(a, c)?;
        assert!(d.is_connected(c));
        assert_eq!(d.children(body), vec![a, c]);

        let removed = d.remove(a)?;
        assert_eq!(removed.len(), 2);
        assert!(!d.exists(b));
        assert_eq!(d.take_mutations(), vec![body, a, body]);
        Ok(())
    }

    #[test]
    fn queries() -> Result<()> {
        let mut d = doc();
        let body = d.body();
        let list = d.create("ul");
        d.set_attr(list, "role", "tablist")?;
        d.append(body, list)?;
        for i in 0..3 {
            let li = d.create("button");
            d.set_attr(li, "role", "tab")?;
            d.set_text(li, format!("t{i}"))?;
            d.append(list, li)?;
        }
        assert_eq!(d.query_all(body, "[role=tab]")?.len(), 3);
        assert_eq!(d.query_all(body, "[role=\"tablist\"] button")?.len(), 3);
        let first = d.query(body, "button")?.unwrap();
        assert_eq!(d.closest(first, "ul")?, Some(list));
        assert_eq!(d.text_content(list), "t0t1t2");
        Ok(())
    }

    #[test]
    fn focus_and_tab_order() -> Result<()> {
        let mut d = doc();
        let body = d.body();
        let a = d.create("button");
        let b = d.create("input");
        let c = d.create("div");
        let hidden = d.create("button");
        d.set_attr(c, "tabindex", "-1")?;
        d.set_attr(hidden, "hidden", "")?;
        for n in [a, b, c, hidden] {
            d.append(body, n)?;
        }
        assert_eq!(d.tab_order(), vec![a, b]);
        assert!(d.focus(c));
        assert!(!d.focus(hidden));
        assert_eq!(d.active(), Some(c));
        assert_eq!(d.next_event(), Some(Event::Focus(c)));
        d.focus(a);
        assert_eq!(d.next_event(), Some(Event::Blur(c)));
        assert_eq!(d.next_tabbable(false), Some(b));
        assert_eq!(d.next_tabbable(true), Some(b));

        d.set_attr(b, "inert", "true")?;
        assert_eq!(d.tab_order(), vec![a]);
        Ok(())
    }

    #[test]
    fn text_editing() -> Result<()> {
        let mut d = doc();
        let i = d.create("input");
        d.set_value(i, "hello")?;
        d.set_selection(i, 1, 3)?;
        d.insert_text(i, "EY")?;
        assert_eq!(d.value(i), "hEYlo");
        assert_eq!(d.selection(i), (3, 3));
        d.delete_backward(i)?;
        assert_eq!(d.value(i), "hElo");
        Ok(())
    }

    #[test]
    fn scrolling_geometry() -> Result<()> {
        let mut d = doc();
        let body = d.body();
        d.set_rect(body, Rect::new(0.0, 0.0, 1000.0, 3000.0))?;
        let list = d.create("ul");
        d.set_rect(list, Rect::new(0.0, 100.0, 300.0, 100.0))?;
        d.set_clips(list, true)?;
        d.append(body, list)?;
        let card = d.create("li");
        d.set_rect(card, Rect::new(300.0, 100.0, 300.0, 100.0))?;
        d.append(list, card)?;

        assert_eq!(d.scroll_width(list), 600.0);
        let visible = d.clipped_rect(card, None).map(|r| r.area());
        assert_eq!(visible, Some(0.0));

        d.set_scroll_left(list, 1000.0)?;
        assert_eq!(d.scroll_left(list), 300.0);
        assert_eq!(d.next_event(), Some(Event::Scroll(list)));
        assert_eq!(d.clipped_rect(card, None), Some(Rect::new(0.0, 100.0, 300.0, 100.0)));

        assert_eq!(d.set_scroll_y(5000.0), 2200.0);
        assert_eq!(d.client_rect(card).y, -2100.0);
        d.pin_body(2200.0);
        assert_eq!(d.scroll_y(), 0.0);
        assert_eq!(d.client_rect(card).y, -2100.0);
        Ok(())
    }
}
