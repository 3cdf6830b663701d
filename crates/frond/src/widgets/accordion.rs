//! Accordions: independently expanding sections with keyboard navigation
//! between their headers.

use std::collections::VecDeque;

use tracing::debug;

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    config::ms,
    event::{
        Event,
        key::{Key, KeyCode},
    },
};

/// Class on an expanded section.
const EXPANDED: &str = "is-accordion-expanded";
/// Content class that skips the animation.
const INSTANT: &str = "instant-transition";
/// Elements made unreachable inside collapsed content.
const FOCUSABLE: &str = "input, button, a, select, textarea";

/// One header and its content.
#[derive(Debug, Clone, Copy)]
struct Section {
    /// Toggle button.
    trigger: NodeId,
    /// The `[accordion]` element.
    container: NodeId,
    /// Collapsible content.
    content: NodeId,
}

/// An `accordion-interface` element.
#[derive(Debug, Default)]
pub struct Accordion {
    /// Sections in document order.
    sections: Vec<Section>,
    /// Sections whose expand animation is running.
    expanding: VecDeque<NodeId>,
    /// Sections whose collapse animation is running.
    collapsing: VecDeque<NodeId>,
}

impl Accordion {
    /// Bind to the accordion.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let mut acc = Self::default();
        acc.bind(ctx)?;
        Ok(acc)
    }

    /// Resolve sections from the current markup. Triggers without a
    /// container or content are skipped.
    fn bind(&mut self, ctx: &Context) -> Result<()> {
        let doc = ctx.doc();
        self.sections.clear();
        for trigger in ctx.query_all("[accordion-button]")? {
            let Some(container) = doc.closest(trigger, "[accordion]")? else {
                continue;
            };
            if let Some(content) = doc.query(container, "[accordion-content]")? {
                self.sections.push(Section { trigger, container, content });
            }
        }
        Ok(())
    }

    /// Is section `index` expanded?
    pub fn is_expanded(&self, ctx: &Context, index: usize) -> bool {
        self.sections
            .get(index)
            .is_some_and(|s| ctx.doc().has_class(s.container, EXPANDED))
    }

    /// Content in a wide-viewport footer keeps its own focus handling.
    fn footer_content(ctx: &Context, content: NodeId) -> Result<bool> {
        Ok(ctx.viewport().width > 768.0 && ctx.doc().closest(content, "footer")?.is_some())
    }

    /// Make the content's controls reachable with Tab, or not.
    fn set_focusable(ctx: &mut Context, content: NodeId, on: bool) -> Result<()> {
        if Self::footer_content(ctx, content)? {
            ctx.doc_mut()
                .set_attr(content, "tabindex", if on { "0" } else { "-1" })?;
            return Ok(());
        }
        for el in ctx.doc().query_all(content, FOCUSABLE)? {
            if on {
                ctx.doc_mut().remove_attr(el, "tabindex")?;
            } else {
                ctx.doc_mut().set_attr(el, "tabindex", "-1")?;
            }
        }
        Ok(())
    }

    /// Bring a section's attributes in line with its container class,
    /// without animating.
    fn init_section(ctx: &mut Context, s: Section) -> Result<()> {
        let open = ctx.doc().has_class(s.container, EXPANDED);
        let doc = ctx.doc_mut();
        doc.set_attr(s.trigger, "aria-expanded", open.to_string())?;
        doc.set_attr(s.content, "display-content", open.to_string())?;
        if open {
            doc.set_style(s.content, "height", "auto")?;
        } else {
            doc.set_style(s.content, "height", "0px")?;
            doc.set_style(s.content, "overflow", "hidden")?;
            doc.set_attr(s.content, "tabindex", "-1")?;
        }
        Self::set_focusable(ctx, s.content, open)
    }

    /// Expand or collapse section `index`.
    pub fn toggle(&mut self, ctx: &mut Context, index: usize) -> Result<()> {
        let Some(s) = self.sections.get(index).copied() else {
            return Ok(());
        };
        let open = !ctx.doc().has_class(s.container, EXPANDED);
        debug!(section = index, open, "accordion toggle");
        let doc = ctx.doc_mut();
        doc.set_attr(s.trigger, "aria-expanded", open.to_string())?;
        doc.set_attr(s.content, "display-content", open.to_string())?;
        doc.toggle_class(s.container, EXPANDED, open)?;
        Self::set_focusable(ctx, s.content, open)?;
        let instant = ctx.doc().has_class(s.content, INSTANT);
        let timing = &ctx.config().timing;
        let (expand, collapse) = (timing.accordion_expand, timing.accordion_collapse);
        if open {
            let delay = ms(if instant { 0 } else { expand });
            let full = ctx.doc().scroll_height(s.content);
            ctx.doc_mut().set_style(s.content, "height", format!("{full}px"))?;
            self.expanding.push_back(s.content);
            ctx.schedule(delay, "expanded");
        } else if ctx.doc().has_attr(s.container, "close-instantly-on-click") {
            ctx.doc_mut().set_style(s.content, "height", "0px")?;
        } else {
            let delay = ms(if instant { 0 } else { collapse });
            self.collapsing.push_back(s.content);
            ctx.schedule(delay, "collapsed");
        }
        Ok(())
    }

    /// Move focus between headers.
    fn key(&mut self, ctx: &mut Context, at: usize, key: Key) -> Result<EventOutcome> {
        if key.is_activation() {
            self.toggle(ctx, at)?;
            return Ok(EventOutcome::Prevent);
        }
        let n = self.sections.len();
        let to = match key.key {
            KeyCode::Up | KeyCode::Left => at.checked_sub(1),
            KeyCode::Down | KeyCode::Right => Some(at + 1).filter(|i| *i < n),
            KeyCode::Home => Some(0).filter(|_| n > 0),
            KeyCode::End => n.checked_sub(1),
            _ => return Ok(EventOutcome::Ignore),
        };
        match to {
            Some(i) => {
                ctx.focus(self.sections[i].trigger);
                Ok(EventOutcome::Prevent)
            }
            None => Ok(EventOutcome::Ignore),
        }
    }

    /// An expand animation finished.
    fn expanded(&mut self, ctx: &mut Context) -> Result<()> {
        let Some(content) = self.expanding.pop_front() else {
            return Ok(());
        };
        ctx.doc_mut().set_style(content, "height", "auto")?;
        let Some(s) = self.sections.iter().find(|s| s.content == content).copied() else {
            return Ok(());
        };
        if ctx.doc().has_attr(s.container, "scroll-into-view-on-click") {
            let y = ctx.doc().offset_top(s.container);
            ctx.scroll_window_to(y);
        }
        Ok(())
    }
}

impl Widget for Accordion {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        for s in self.sections.clone() {
            Self::init_section(ctx, s)?;
        }
        let root = ctx.root();
        ctx.watch_mutations(root);
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Click(t) => {
                let doc = ctx.doc();
                match self.sections.iter().position(|s| doc.contains(s.trigger, *t)) {
                    Some(i) => {
                        self.toggle(ctx, i)?;
                        Ok(EventOutcome::Prevent)
                    }
                    None => Ok(EventOutcome::Ignore),
                }
            }
            Event::Key(t, key) => match self.sections.iter().position(|s| s.trigger == *t) {
                Some(i) => self.key(ctx, i, *key),
                None => Ok(EventOutcome::Ignore),
            },
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_timer(&mut self, tag: &'static str, ctx: &mut Context) -> Result<()> {
        match tag {
            "expanded" => self.expanded(ctx),
            "collapsed" => match self.collapsing.pop_front() {
                Some(content) => ctx.doc_mut().set_style(content, "height", "0px"),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn on_mutation(&mut self, ctx: &mut Context) -> Result<()> {
        let known: Vec<NodeId> = self.sections.iter().map(|s| s.trigger).collect();
        self.bind(ctx)?;
        for s in self.sections.clone() {
            if !known.contains(&s.trigger) {
                Self::init_section(ctx, s)?;
            }
        }
        Ok(())
    }
}
