//! Entrance animations triggered by scrolling elements into view.

use crate::{
    Context, Result, Widget,
    broadcast::Viewport,
    config::MotionConfig,
    observer::{IntersectionEntry, ObserveOptions},
};

/// Class on elements inside the shrunken viewport.
pub const IN_VIEW: &str = "is-in-view";

/// Kind of entrance animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    /// The element animates as a whole.
    Single,
    /// Children animate one after another.
    Stagger,
}

/// Bottom root margin for an animation kind at a viewport size.
pub fn root_margin(kind: MotionKind, viewport: Viewport, cfg: &MotionConfig) -> f64 {
    if viewport.width < 768.0 {
        return cfg.margin_compact;
    }
    match kind {
        MotionKind::Stagger => cfg.stagger_margin,
        MotionKind::Single => {
            let (low, high) = cfg.short_heights;
            if (low..=high).contains(&viewport.height) {
                cfg.margin_compact
            } else {
                cfg.margin
            }
        }
    }
}

/// A `[data-motion-observer]` or `[data-stagger-motion-observer]` element.
#[derive(Debug)]
pub struct Motion {
    /// Animation kind.
    kind: MotionKind,
}

impl Motion {
    /// Bind to the element, reading its kind from its attributes.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let doc = ctx.doc();
        let root = ctx.root();
        let stagger = doc.has_attr(root, "data-stagger-motion-observer")
            || doc.attr(root, "data-motion-observer") == Some("stagger");
        Ok(Self {
            kind: if stagger { MotionKind::Stagger } else { MotionKind::Single },
        })
    }

    /// Animation kind.
    pub fn kind(&self) -> MotionKind {
        self.kind
    }

    /// Give each staggered child a transition delay from its index.
    fn stagger(&self, ctx: &mut Context) -> Result<()> {
        let root = ctx.root();
        let step = ctx.config().timing.stagger_step;
        let marked = ctx.query_all("[data-stagger-motion-index]")?;
        let items = if marked.is_empty() { ctx.doc().children(root) } else { marked };
        for (pos, item) in items.into_iter().enumerate() {
            let index = ctx
                .doc()
                .attr(item, "data-stagger-motion-index")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(pos as u64);
            ctx.doc_mut()
                .set_style(item, "transition-delay", format!("{}ms", index * step))?;
        }
        Ok(())
    }
}

impl Widget for Motion {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        if self.kind == MotionKind::Stagger {
            self.stagger(ctx)?;
        }
        let root = ctx.root();
        if ctx.doc().has_attr(root, "data-hero-motion-element") {
            return ctx.doc_mut().add_class(root, IN_VIEW);
        }
        let margin = root_margin(self.kind, ctx.viewport(), &ctx.config().motion);
        ctx.observe("motion", root, ObserveOptions::viewport(0.0).margin_bottom(margin));
        Ok(())
    }

    fn on_intersection(&mut self, entries: &[IntersectionEntry], ctx: &mut Context) -> Result<()> {
        for e in entries {
            ctx.doc_mut().toggle_class(e.target, IN_VIEW, e.is_intersecting)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins() {
        let cfg = MotionConfig::default();
        let vp = |width, height| Viewport { width, height };
        assert_eq!(root_margin(MotionKind::Single, vp(375.0, 800.0), &cfg), -50.0);
        assert_eq!(root_margin(MotionKind::Single, vp(1440.0, 900.0), &cfg), -150.0);
        assert_eq!(root_margin(MotionKind::Single, vp(1440.0, 640.0), &cfg), -50.0);
        assert_eq!(root_margin(MotionKind::Stagger, vp(1440.0, 640.0), &cfg), -100.0);
    }
}
