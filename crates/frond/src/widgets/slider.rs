//! Card sliders and carousels.
//!
//! A slider is a horizontally scrolling list of cards whose scroll position
//! is its state: cards report their own visibility through intersection
//! observations, and the previous/next buttons, nav visibility and dots are
//! derived from which cards are fully shown. One widget covers every
//! variant; [`SliderMode`] selects native scrolling or animated transforms,
//! looping and autoplay.

use tracing::debug;

use crate::{
    Context, EventOutcome, NodeId, Result, TimerId, Widget,
    config::ms,
    easing::{clamp, map_range},
    event::Event,
    observer::{IntersectionEntry, ObserveOptions},
};

use super::scrollbar::thumb_length;

/// Class on card lists that are on screen.
const VISIBLE: &str = "is-visible";
/// Class on buttons while clicks are suppressed.
const BLOCKED: &str = "is-pressed-state-blocked";
/// Root class while a transform slide runs.
const ANIMATING: &str = "is-slider-animating";
/// List class while a transform slide runs.
const NO_SNAP: &str = "disable-scroll-snapping";

/// How a slider moves between cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderMode {
    /// Animate cards with transforms, then jump the scroll offset; otherwise
    /// scroll the list natively.
    pub animated: bool,
    /// Advancing past the last card wraps to the first.
    pub looping: bool,
    /// Advance on a timer while on screen.
    pub autoplay: bool,
    /// Cards advanced per click on wide viewports, unless a list says
    /// otherwise with `data-cards-per-slide`.
    pub cards_per_slide: Option<usize>,
    /// Scroll the window so a list about to move is fully on screen.
    pub reveal_list: bool,
}

impl SliderMode {
    /// `slider-interface`: native scrolling with a scroll indicator.
    pub const SLIDER: Self = Self {
        animated: false,
        looping: false,
        autoplay: false,
        cards_per_slide: None,
        reveal_list: true,
    };

    /// `history-slider-interface`: one card per click.
    pub const HISTORY: Self = Self {
        cards_per_slide: Some(1),
        ..Self::SLIDER
    };

    /// `image-carousel-interface`: animated, looping, autoplaying.
    pub const CAROUSEL: Self = Self {
        animated: true,
        looping: true,
        autoplay: true,
        cards_per_slide: Some(1),
        reveal_list: false,
    };
}

/// Which way a slide moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the first card.
    Prev,
    /// Towards the last card.
    Next,
}

/// Where a slide from the first visible card `at` lands, among `n` cards.
/// Returns the card index to show and the scroll target in card widths, or
/// None if the slider cannot move that way.
pub fn slide_target(
    at: usize,
    n: usize,
    per_slide: usize,
    dir: Direction,
    looping: bool,
) -> Option<(usize, f64)> {
    match dir {
        Direction::Next if at + 1 < n => Some((at + 1, (at + per_slide) as f64)),
        Direction::Next if looping && n > 1 => Some((0, 0.0)),
        Direction::Prev if at > 0 => Some((at - 1, (at as f64 - per_slide as f64).max(0.0))),
        _ => None,
    }
}

/// One scrolling list of cards.
#[derive(Debug, Clone)]
struct CardList {
    /// The scroll container.
    list: NodeId,
    /// Cards in order.
    cards: Vec<NodeId>,
    /// Scroll indicator track and thumb.
    indicator: Option<(NodeId, NodeId)>,
}

/// A transform slide in flight.
#[derive(Debug, Clone, Copy)]
struct Slide {
    /// List being moved.
    list: NodeId,
    /// Card leaving.
    from: NodeId,
    /// Card arriving.
    to: NodeId,
    /// Scroll offset to jump to once the animation ends.
    left: f64,
}

/// A card slider or carousel.
#[derive(Debug)]
pub struct Slider {
    /// Behaviour flags.
    mode: SliderMode,
    /// Card lists.
    lists: Vec<CardList>,
    /// Prev/next button containers.
    navs: Vec<NodeId>,
    /// Previous buttons.
    prev: Vec<NodeId>,
    /// Next buttons.
    next: Vec<NodeId>,
    /// Autoplay start buttons.
    play: Vec<NodeId>,
    /// Autoplay stop buttons.
    pause: Vec<NodeId>,
    /// Clicks are ignored until a user scroll settles.
    cooldown: Option<TimerId>,
    /// Running transform slide.
    sliding: Option<Slide>,
    /// Autoplay tick.
    autoplay: Option<TimerId>,
    /// Autoplay stopped by the user.
    paused: bool,
}

impl Slider {
    /// Bind to a slider root.
    pub fn new(ctx: &mut Context, mode: SliderMode) -> Result<Self> {
        let lists = Self::lists(ctx)?;
        if lists.is_empty() {
            return Err(crate::Error::missing("slider", "[slider-card-list]"));
        }
        Ok(Self {
            mode,
            lists,
            navs: ctx.query_all("[slider-nav]")?,
            prev: ctx.query_all("[slider-prev]")?,
            next: ctx.query_all("[slider-next]")?,
            play: ctx.query_all(".ui-image-carousel__play-btn")?,
            pause: ctx.query_all(".ui-image-carousel__pause-btn")?,
            cooldown: None,
            sliding: None,
            autoplay: None,
            paused: false,
        })
    }

    /// Card lists with their cards and indicators.
    fn lists(ctx: &Context) -> Result<Vec<CardList>> {
        let doc = ctx.doc();
        let tracks = ctx.query_all("[slider-scroll-indicator-track]")?;
        let thumbs = ctx.query_all("[slider-scroll-indicator-thumb]")?;
        let mut lists = vec![];
        for (i, list) in ctx.query_all("[slider-card-list]")?.into_iter().enumerate() {
            lists.push(CardList {
                list,
                cards: doc.query_all(list, "[slider-card]")?,
                indicator: tracks.get(i).copied().zip(thumbs.get(i).copied()),
            });
        }
        Ok(lists)
    }

    /// Start observing every card and list.
    fn observe(&self, ctx: &mut Context) {
        let cfg = ctx.config().slider.clone();
        for l in &self.lists {
            for c in &l.cards {
                ctx.observe("card", *c, ObserveOptions::viewport(cfg.card_threshold));
            }
            ctx.observe("list", l.list, ObserveOptions::viewport(cfg.list_threshold));
        }
    }

    /// Number of cards across all lists.
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }

    /// Is the card currently shown in full?
    fn shown(ctx: &Context, card: NodeId) -> bool {
        ctx.doc().attr(card, "aria-hidden") == Some("false")
    }

    /// Is autoplay scheduled?
    pub fn is_playing(&self) -> bool {
        self.autoplay.is_some()
    }

    /// Disable previous at the first card and next at the last.
    fn update_buttons(&self, ctx: &mut Context) -> Result<()> {
        let shown = |c: Option<&NodeId>| c.is_some_and(|c| Self::shown(ctx, *c));
        let first = self.lists.iter().any(|l| shown(l.cards.first()));
        let last = self.lists.iter().any(|l| shown(l.cards.last()));
        let doc = ctx.doc_mut();
        for b in &self.prev {
            doc.toggle_attr(*b, "disabled", first)?;
        }
        for b in &self.next {
            doc.toggle_attr(*b, "disabled", last)?;
        }
        Ok(())
    }

    /// Hide the nav when no list is on screen, or a visible list shows
    /// every card.
    fn update_nav(&self, ctx: &mut Context) -> Result<()> {
        let visible: Vec<&CardList> = self
            .lists
            .iter()
            .filter(|l| ctx.doc().has_class(l.list, VISIBLE))
            .collect();
        let hide = visible.is_empty()
            || visible
                .iter()
                .any(|l| l.cards.iter().all(|c| Self::shown(ctx, *c)));
        let doc = ctx.doc_mut();
        for n in &self.navs {
            doc.toggle_attr(*n, "hidden", hide)?;
        }
        Ok(())
    }

    /// Size each scroll indicator thumb and hide indicators with nothing to
    /// scroll.
    fn size_indicators(&self, ctx: &mut Context) -> Result<()> {
        for l in &self.lists {
            let Some((track, thumb)) = l.indicator else {
                continue;
            };
            let doc = ctx.doc();
            let full = doc.scroll_width(l.list);
            let visible = doc.rect(l.list).w;
            let width = thumb_length(visible, full, doc.rect(track).w);
            let outer = doc.parent(track).and_then(|p| doc.parent(p));
            let doc = ctx.doc_mut();
            doc.set_style(thumb, "width", format!("{width}px"))?;
            if let Some(outer) = outer {
                doc.set_style(outer, "display", if full <= visible { "none" } else { "flex" })?;
            }
        }
        self.move_indicators(ctx)
    }

    /// Place each indicator thumb to match its list's scroll offset.
    fn move_indicators(&self, ctx: &mut Context) -> Result<()> {
        for l in &self.lists {
            let Some((track, thumb)) = l.indicator else {
                continue;
            };
            let doc = ctx.doc();
            let overflow = doc.scroll_width(l.list) - doc.rect(l.list).w;
            let travel = doc.rect(track).w - doc.rect(thumb).w.max(0.0);
            let left = doc.scroll_left(l.list);
            let x = if left <= 0.0 {
                0.0
            } else {
                clamp(0.0, travel.max(0.0), map_range(0.0, overflow, 0.0, travel, left))
            };
            ctx.doc_mut()
                .set_style(thumb, "transform", format!("translate3d({x}px, 0, 0)"))?;
        }
        Ok(())
    }

    /// Cards per click for a list at the current width.
    fn per_slide(&self, ctx: &Context, list: NodeId) -> usize {
        if ctx.viewport().width <= ctx.config().breakpoints.mobile_max {
            return 1;
        }
        ctx.doc()
            .attr(list, "data-cards-per-slide")
            .and_then(|v| v.parse().ok())
            .or(self.mode.cards_per_slide)
            .unwrap_or(ctx.config().slider.cards_per_slide)
    }

    /// Mark dot `index` of a list active.
    fn set_dot(ctx: &mut Context, list: NodeId, index: usize) -> Result<()> {
        let Some(dots) = ctx.doc().query(list, "[slider-dots]")? else {
            return Ok(());
        };
        for (i, dot) in ctx.doc().query_all(dots, "span")?.into_iter().enumerate() {
            ctx.doc_mut().toggle_class(dot, "is-active", i == index)?;
        }
        Ok(())
    }

    /// Scroll the window so the slider's bottom edge is on screen, unless
    /// that would push its top under the header.
    fn reveal(ctx: &mut Context) -> Result<()> {
        let doc = ctx.doc();
        let rect = doc.client_rect(ctx.root());
        let vh = ctx.viewport().height;
        let header = doc.query(doc.root(), "header")?.map_or(0.0, |h| doc.rect(h).h);
        let hidden = rect.bottom() - vh;
        if hidden > 0.0 && rect.y - hidden > header {
            let y = doc.scroll_y() + hidden;
            ctx.scroll_window_to(y);
        }
        Ok(())
    }

    /// Move one step. Returns true if a slide started.
    pub fn advance(&mut self, ctx: &mut Context, dir: Direction) -> Result<bool> {
        if self.cooldown.is_some() || self.sliding.is_some() {
            return Ok(false);
        }
        let Some(list) = self
            .lists
            .iter()
            .find(|l| ctx.doc().has_class(l.list, VISIBLE))
            .cloned()
        else {
            return Ok(false);
        };
        let Some(at) = list.cards.iter().position(|c| Self::shown(ctx, *c)) else {
            return Ok(false);
        };
        let per_slide = self.per_slide(ctx, list.list);
        let n = list.cards.len();
        let Some((to, widths)) = slide_target(at, n, per_slide, dir, self.mode.looping) else {
            return Ok(false);
        };
        self.stop_autoplay(ctx);
        let width = ctx.doc().client_rect(list.cards[to]).w;
        let left = width * widths;
        debug!(from = at, to, left, "slide");
        if !self.mode.animated {
            if self.mode.reveal_list {
                Self::reveal(ctx)?;
            }
            ctx.doc_mut().set_scroll_left(list.list, left)?;
            return Ok(true);
        }
        Self::set_dot(ctx, list.list, to)?;
        let from = list.cards[at];
        let arriving = list.cards[to];
        let wraps = dir == Direction::Next && to < at;
        let (out, inn) = match dir {
            // The first card is brought round to the last slot and slides in
            // from beyond it, above the leaving card.
            Direction::Next if wraps => ("-30%".to_string(), format!("{}%", (n - 1) * 100)),
            Direction::Next => ("-30%".to_string(), "-100%".to_string()),
            Direction::Prev => ("30%".to_string(), "100%".to_string()),
        };
        let root = ctx.root();
        let doc = ctx.doc_mut();
        doc.add_class(list.list, NO_SNAP)?;
        doc.add_class(root, ANIMATING)?;
        if wraps {
            doc.set_style(from, "z-index", "0")?;
            doc.set_style(arriving, "z-index", "1")?;
        }
        doc.set_style(from, "transform", format!("translateX({out})"))?;
        doc.set_style(arriving, "transform", format!("translateX({inn})"))?;
        self.sliding = Some(Slide {
            list: list.list,
            from,
            to: arriving,
            left,
        });
        let delay = ms(ctx.config().timing.slide_transition);
        ctx.schedule(delay, "slid");
        Ok(true)
    }

    /// Finish a transform slide: clear the transforms and jump the list to
    /// its new offset without animation.
    fn finish_slide(&mut self, ctx: &mut Context) -> Result<()> {
        let Some(s) = self.sliding.take() else {
            return Ok(());
        };
        let root = ctx.root();
        let doc = ctx.doc_mut();
        for card in [s.from, s.to] {
            doc.set_style(card, "transform", "")?;
            doc.set_style(card, "z-index", "")?;
        }
        doc.set_scroll_left(s.list, s.left)?;
        doc.remove_class(s.list, NO_SNAP)?;
        doc.remove_class(root, ANIMATING)?;
        self.resume_autoplay(ctx);
        Ok(())
    }

    /// Schedule the next autoplay tick unless the user paused.
    fn resume_autoplay(&mut self, ctx: &mut Context) {
        if self.mode.autoplay && !self.paused {
            let delay = ms(ctx.config().timing.autoplay_interval);
            ctx.debounce(&mut self.autoplay, delay, "autoplay");
        }
    }

    /// Cancel the pending autoplay tick.
    fn stop_autoplay(&mut self, ctx: &mut Context) {
        ctx.clear_timer(&mut self.autoplay);
    }

    /// Start or stop autoplay from the play/pause buttons.
    pub fn set_paused(&mut self, ctx: &mut Context, paused: bool) -> Result<()> {
        self.paused = paused;
        if paused {
            self.stop_autoplay(ctx);
        } else {
            self.resume_autoplay(ctx);
        }
        let doc = ctx.doc_mut();
        for b in &self.play {
            doc.toggle_attr(*b, "hidden", !paused)?;
        }
        for b in &self.pause {
            doc.toggle_attr(*b, "hidden", paused)?;
        }
        Ok(())
    }

    /// A list scrolled under the user's hand: suppress clicks briefly.
    fn scrolled(&mut self, ctx: &mut Context) -> Result<()> {
        self.move_indicators(ctx)?;
        let doc = ctx.doc_mut();
        for b in self.prev.iter().chain(&self.next) {
            doc.add_class(*b, BLOCKED)?;
        }
        let delay = ms(ctx.config().timing.slider_cooldown);
        ctx.debounce(&mut self.cooldown, delay, "cooldown");
        Ok(())
    }

    /// Which button, if any, contains `target`.
    fn button_at(&self, ctx: &Context, target: NodeId) -> Option<&'static str> {
        let hit = |set: &[NodeId]| set.iter().any(|b| ctx.doc().contains(*b, target));
        if hit(&self.prev) {
            Some("prev")
        } else if hit(&self.next) {
            Some("next")
        } else if hit(&self.play) {
            Some("play")
        } else if hit(&self.pause) {
            Some("pause")
        } else {
            None
        }
    }
}

impl Widget for Slider {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        self.observe(ctx);
        let root = ctx.root();
        if self.mode.autoplay {
            let threshold = ctx.config().slider.autoplay_threshold;
            ctx.observe("self", root, ObserveOptions::viewport(threshold));
        }
        ctx.watch_mutations(root);
        self.size_indicators(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Scroll(t) if self.lists.iter().any(|l| l.list == *t) => {
                if self.sliding.is_none() {
                    self.scrolled(ctx)?;
                }
                Ok(EventOutcome::Ignore)
            }
            Event::Click(t) => {
                match self.button_at(ctx, *t) {
                    Some("prev") => {
                        self.advance(ctx, Direction::Prev)?;
                    }
                    Some("next") => {
                        self.advance(ctx, Direction::Next)?;
                    }
                    Some("play") => self.set_paused(ctx, false)?,
                    Some("pause") => self.set_paused(ctx, true)?,
                    _ => return Ok(EventOutcome::Ignore),
                }
                Ok(EventOutcome::Prevent)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_intersection(&mut self, entries: &[IntersectionEntry], ctx: &mut Context) -> Result<()> {
        let mut lists_changed = false;
        for e in entries {
            match e.tag {
                "card" => {
                    let doc = ctx.doc_mut();
                    doc.set_attr(e.target, "aria-hidden", (!e.is_intersecting).to_string())?;
                    if !self.mode.animated {
                        if e.is_intersecting {
                            doc.remove_attr(e.target, "tabindex")?;
                        } else {
                            doc.set_attr(e.target, "tabindex", "-1")?;
                        }
                    }
                }
                "list" => {
                    ctx.doc_mut().toggle_class(e.target, VISIBLE, e.is_intersecting)?;
                    lists_changed = true;
                }
                "self" if e.is_intersecting => self.resume_autoplay(ctx),
                "self" => self.stop_autoplay(ctx),
                _ => {}
            }
        }
        self.update_buttons(ctx)?;
        self.update_nav(ctx)?;
        if lists_changed {
            self.size_indicators(ctx)?;
        }
        Ok(())
    }

    fn on_timer(&mut self, tag: &'static str, ctx: &mut Context) -> Result<()> {
        match tag {
            "cooldown" => {
                self.cooldown = None;
                let doc = ctx.doc_mut();
                for b in self.prev.iter().chain(&self.next) {
                    doc.remove_class(*b, BLOCKED)?;
                }
                Ok(())
            }
            "slid" => self.finish_slide(ctx),
            "autoplay" => {
                self.autoplay = None;
                if !self.advance(ctx, Direction::Next)? {
                    self.resume_autoplay(ctx);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn on_mutation(&mut self, ctx: &mut Context) -> Result<()> {
        // Cards were re-rendered: observe the new set.
        ctx.unobserve_tag("card");
        ctx.unobserve_tag("list");
        self.lists = Self::lists(ctx)?;
        self.observe(ctx);
        self.size_indicators(ctx)
    }

    fn on_disconnect(&mut self, ctx: &mut Context) {
        self.stop_autoplay(ctx);
        ctx.clear_timer(&mut self.cooldown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets() {
        assert_eq!(slide_target(0, 3, 1, Direction::Next, false), Some((1, 1.0)));
        assert_eq!(slide_target(0, 5, 2, Direction::Next, false), Some((1, 2.0)));
        assert_eq!(slide_target(2, 3, 1, Direction::Next, false), None);
        assert_eq!(slide_target(2, 3, 1, Direction::Next, true), Some((0, 0.0)));
        assert_eq!(slide_target(0, 1, 1, Direction::Next, true), None);
        assert_eq!(slide_target(0, 3, 1, Direction::Prev, true), None);
        assert_eq!(slide_target(1, 5, 2, Direction::Prev, false), Some((0, 0.0)));
    }
}
