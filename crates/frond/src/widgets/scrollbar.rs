//! Custom scrollbars drawn beside a native scroll container.

use std::fmt;

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    broadcast::Viewport,
    easing::{clamp, map_range},
    event::Event,
};

/// Scroll direction of a scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Scrolls left and right.
    Horizontal,
    /// Scrolls up and down.
    Vertical,
}

impl Axis {
    /// Class prefix used by the markup for this axis.
    fn prefix(self) -> &'static str {
        match self {
            Self::Horizontal => ".js-horizontalScrollbar",
            Self::Vertical => ".js-verticalScrollbar",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// Length of a thumb on a `track`-long track, for a scroller showing
/// `visible` of `full`. Zero when nothing overflows.
pub fn thumb_length(visible: f64, full: f64, track: f64) -> f64 {
    if full <= 0.0 {
        return 0.0;
    }
    let percent = visible * 100.0 / full;
    if percent < 100.0 { percent * track / 100.0 } else { 0.0 }
}

/// A `.js-horizontalScrollbar__container` or `.js-verticalScrollbar__container`.
#[derive(Debug)]
pub struct Scrollbar {
    /// Direction.
    axis: Axis,
    /// The native scroll container.
    scroller: NodeId,
    /// Track the thumb moves along.
    track: NodeId,
    /// Thumb.
    thumb: NodeId,
    /// Scroll extent beyond the visible area.
    overflow: f64,
    /// Furthest the thumb can travel.
    travel: f64,
    /// Current thumb offset along the track.
    offset: f64,
}

impl Scrollbar {
    /// Bind to a container.
    pub fn new(ctx: &mut Context, axis: Axis) -> Result<Self> {
        let p = axis.prefix();
        Ok(Self {
            axis,
            scroller: ctx.require(&format!("{p}__scroller"))?,
            track: ctx.require(&format!("{p}__track"))?,
            thumb: ctx.require(&format!("{p}__thumb"))?,
            overflow: 0.0,
            travel: 0.0,
            offset: 0.0,
        })
    }

    /// Thumb offset along the track.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Does the scroller overflow?
    pub fn overflowing(&self) -> bool {
        self.overflow > 0.0
    }

    /// Re-measure the scroller and resize the thumb.
    pub fn set_dimensions(&mut self, ctx: &mut Context) -> Result<()> {
        let doc = ctx.doc();
        let (full, visible, track) = match self.axis {
            Axis::Horizontal => (
                doc.scroll_width(self.scroller),
                doc.rect(self.scroller).w,
                doc.rect(self.track).w,
            ),
            Axis::Vertical => (
                doc.scroll_height(self.scroller),
                doc.rect(self.scroller).h,
                doc.rect(self.track).h,
            ),
        };
        let thumb = thumb_length(visible, full, track);
        self.overflow = full - visible;
        self.travel = track - thumb;
        let root = ctx.root();
        let overflowing = self.overflowing();
        let doc = ctx.doc_mut();
        match self.axis {
            Axis::Horizontal => {
                doc.set_style(self.thumb, "width", format!("{thumb}px"))?;
                doc.toggle_class(self.track, "isHidden", !overflowing)?;
                doc.toggle_class(root, "isOverflowing", overflowing)?;
                doc.set_attr(self.scroller, "data-overflowing", overflowing.to_string())?;
            }
            Axis::Vertical => {
                doc.set_style(self.thumb, "height", format!("{thumb}px"))?;
                doc.set_attr(self.track, "aria-hidden", (!overflowing).to_string())?;
            }
        }
        self.sync(ctx)
    }

    /// Move the thumb to match the scroll position.
    fn sync(&mut self, ctx: &mut Context) -> Result<()> {
        let doc = ctx.doc();
        let pos = match self.axis {
            Axis::Horizontal => doc.scroll_left(self.scroller),
            Axis::Vertical => doc.scroll_top(self.scroller),
        };
        self.offset = if pos <= 0.0 || !self.overflowing() {
            0.0
        } else {
            map_range(0.0, self.overflow, 0.0, self.travel, clamp(0.0, self.overflow, pos))
        };
        let transform = match self.axis {
            Axis::Horizontal => format!("translate3d({}px, 0, 0)", self.offset),
            Axis::Vertical => format!("translate3d(0, {}px, 0)", self.offset),
        };
        ctx.doc_mut().set_style(self.thumb, "transform", transform)
    }
}

impl Widget for Scrollbar {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        ctx.subscribe_resize();
        ctx.watch_mutations(self.scroller);
        self.set_dimensions(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        if *event == Event::Scroll(self.scroller) {
            self.sync(ctx)?;
        }
        Ok(EventOutcome::Ignore)
    }

    fn on_resize(&mut self, _viewport: Viewport, ctx: &mut Context) -> Result<()> {
        self.set_dimensions(ctx)
    }

    fn on_mutation(&mut self, ctx: &mut Context) -> Result<()> {
        self.set_dimensions(ctx)
    }

    fn name(&self) -> String {
        format!("scrollbar ({})", self.axis)
    }
}

/// Re-measure every scrollbar inside `node`, e.g. once an overlay or panel
/// holding one becomes visible.
pub fn refresh_within(ctx: &mut Context, node: NodeId) -> Result<()> {
    for id in ctx.widgets_within(node) {
        ctx.try_with_widget::<Scrollbar, _>(id, |w, ctx| w.set_dimensions(ctx))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumb_lengths() {
        assert_eq!(thumb_length(50.0, 200.0, 100.0), 25.0);
        assert_eq!(thumb_length(200.0, 200.0, 100.0), 0.0);
        assert_eq!(thumb_length(100.0, 0.0, 100.0), 0.0);
    }
}
