//! In-page section navigation: a strip of links to the page's sections that
//! highlights the section on screen and keeps its card in view.

use tracing::debug;

use crate::{
    Context, EventOutcome, NodeId, Result, Widget,
    broadcast::Viewport,
    dom::Document,
    event::Event,
    observer::{IntersectionEntry, ObserveOptions},
};

use super::dropdown::section_for;

/// Sections a nav can point at.
const SECTIONS: &str = "main > section[id], [modal-interface-content] > section[id]";
/// Class on the card of the section in view.
const ACTIVE: &str = "is-active";

/// A `secondary-nav-interface` element.
#[derive(Debug)]
pub struct SecondaryNav {
    /// The scrolling card list.
    list: NodeId,
    /// Link cards in order.
    cards: Vec<NodeId>,
    /// Sections tracked for the active link.
    sections: Vec<NodeId>,
    /// Prev/next button containers.
    navs: Vec<NodeId>,
    /// Scroll-back buttons.
    prev: Vec<NodeId>,
    /// Scroll-forward buttons.
    next: Vec<NodeId>,
    /// Trailing action button that the next buttons sit beside on small
    /// screens.
    action: Option<NodeId>,
}

impl SecondaryNav {
    /// Bind to the nav.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        let doc = ctx.doc();
        Ok(Self {
            list: ctx.require("[nav-slider-card-list]")?,
            cards: ctx.query_all("[nav-slider-card]")?,
            sections: doc.query_all(doc.root(), SECTIONS)?,
            navs: ctx.query_all("[nav-slider-nav]")?,
            prev: ctx.query_all("[nav-slider-prev]")?,
            next: ctx.query_all("[nav-slider-next]")?,
            action: ctx.query(".ui-secondary-nav__action")?,
        })
    }

    /// The link inside a card.
    fn link(ctx: &Context, card: NodeId) -> Option<NodeId> {
        ctx.doc().query(card, "[nav-link]").ok().flatten()
    }

    /// The card linking to `section`.
    fn card_for(&self, ctx: &Context, section: NodeId) -> Option<NodeId> {
        self.cards.iter().copied().find(|c| {
            Self::link(ctx, *c).and_then(|l| section_for(ctx, l)) == Some(section)
        })
    }

    /// Card currently marked active.
    pub fn active(&self, doc: &Document) -> Option<NodeId> {
        self.cards.iter().copied().find(|c| doc.has_class(*c, ACTIVE))
    }

    /// Make `card` the only active card and scroll it to the start of the
    /// strip.
    fn set_active(&self, ctx: &mut Context, card: NodeId) -> Result<()> {
        let x = ctx.doc().offset_left(card);
        let doc = ctx.doc_mut();
        for c in &self.cards {
            doc.toggle_class(*c, ACTIVE, *c == card)?;
        }
        doc.set_scroll_left(self.list, x)?;
        self.update_buttons(ctx)
    }

    /// Disable the scroll buttons at either end of the strip.
    fn update_buttons(&self, ctx: &mut Context) -> Result<()> {
        let doc = ctx.doc();
        let left = doc.scroll_left(self.list);
        let at_end = left + doc.rect(self.list).w >= doc.scroll_width(self.list) - 2.0;
        let doc = ctx.doc_mut();
        for b in &self.prev {
            doc.toggle_attr(*b, "disabled", left <= 1.0)?;
        }
        for b in &self.next {
            doc.toggle_attr(*b, "disabled", at_end)?;
        }
        Ok(())
    }

    /// Hide the scroll buttons when every card is shown.
    fn update_nav(&self, ctx: &mut Context) -> Result<()> {
        let all = self
            .cards
            .iter()
            .all(|c| ctx.doc().attr(*c, "aria-hidden") == Some("false"));
        let doc = ctx.doc_mut();
        for n in &self.navs {
            doc.toggle_attr(*n, "hidden", all)?;
        }
        Ok(())
    }

    /// Scroll the strip one card back or forward from the first shown card.
    fn step(&self, ctx: &mut Context, forward: bool) -> Result<()> {
        let Some(at) = self
            .cards
            .iter()
            .position(|c| ctx.doc().attr(*c, "aria-hidden") == Some("false"))
        else {
            return Ok(());
        };
        let to = if forward {
            at + 1
        } else if let Some(i) = at.checked_sub(1) {
            i
        } else {
            return Ok(());
        };
        let Some(card) = self.cards.get(to).copied() else {
            return Ok(());
        };
        let x = ctx.doc().offset_left(card);
        ctx.doc_mut().set_scroll_left(self.list, x)
    }

    /// Scroll the window so a linked section starts below the header.
    fn jump(ctx: &mut Context, link: NodeId) -> Result<()> {
        let Some(section) = section_for(ctx, link) else {
            return Ok(());
        };
        let doc = ctx.doc();
        let mut header = doc.query(doc.root(), "header")?.map_or(0.0, |h| doc.rect(h).h);
        if doc
            .query(doc.root(), ".ui-flyout-menu__level-nav.is-visible")?
            .is_some()
        {
            header -= 60.0;
        }
        let y = doc.client_rect(section).y + doc.scroll_y() - header;
        debug!(y, "section jump");
        ctx.scroll_window_to(y);
        Ok(())
    }

    /// Keep the next buttons clear of the trailing action on small screens.
    fn place_buttons(&self, ctx: &mut Context) -> Result<()> {
        let Some(action) = self.action else {
            return Ok(());
        };
        if ctx.is_desktop() {
            return Ok(());
        }
        let right = ctx.doc().rect(action).w + 10.0;
        let doc = ctx.doc_mut();
        for b in &self.next {
            doc.set_style(*b, "right", format!("{right}px"))?;
        }
        Ok(())
    }
}

impl Widget for SecondaryNav {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        let cfg = ctx.config().slider.clone();
        for s in self.sections.clone() {
            ctx.observe("section", s, ObserveOptions::viewport(cfg.section_threshold));
        }
        for c in self.cards.clone() {
            ctx.observe("card", c, ObserveOptions::viewport(cfg.nav_card_threshold));
        }
        ctx.observe("list", self.list, ObserveOptions::viewport(cfg.nav_card_threshold));
        ctx.subscribe_resize();
        self.place_buttons(ctx)?;
        self.update_buttons(ctx)
    }

    fn on_event(&mut self, event: &Event, ctx: &mut Context) -> Result<EventOutcome> {
        match event {
            Event::Scroll(t) if *t == self.list => {
                self.update_buttons(ctx)?;
                Ok(EventOutcome::Ignore)
            }
            Event::Click(t) => {
                let doc = ctx.doc();
                let hit = |set: &[NodeId]| set.iter().any(|b| doc.contains(*b, *t));
                if hit(&self.prev) {
                    self.step(ctx, false)?;
                    return Ok(EventOutcome::Ignore);
                }
                if hit(&self.next) {
                    self.step(ctx, true)?;
                    return Ok(EventOutcome::Ignore);
                }
                let link = self
                    .cards
                    .iter()
                    .filter_map(|c| Self::link(ctx, *c))
                    .find(|l| ctx.doc().contains(*l, *t));
                match link {
                    Some(link) => {
                        Self::jump(ctx, link)?;
                        Ok(EventOutcome::Prevent)
                    }
                    None => Ok(EventOutcome::Ignore),
                }
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn on_intersection(&mut self, entries: &[IntersectionEntry], ctx: &mut Context) -> Result<()> {
        for e in entries {
            match e.tag {
                "section" => {
                    let Some(card) = self.card_for(ctx, e.target) else {
                        continue;
                    };
                    if e.is_intersecting {
                        self.set_active(ctx, card)?;
                    } else {
                        ctx.doc_mut().remove_class(card, ACTIVE)?;
                    }
                }
                "card" => {
                    let focusables = ctx.doc().query_all(e.target, "a, button, [tabindex]")?;
                    let doc = ctx.doc_mut();
                    doc.set_attr(e.target, "aria-hidden", (!e.is_intersecting).to_string())?;
                    for f in focusables {
                        if e.is_intersecting {
                            doc.remove_attr(f, "tabindex")?;
                        } else {
                            doc.set_attr(f, "tabindex", "-1")?;
                        }
                    }
                }
                "list" => {
                    ctx.doc_mut().toggle_class(e.target, "is-visible", e.is_intersecting)?;
                }
                _ => {}
            }
        }
        self.update_buttons(ctx)?;
        self.update_nav(ctx)
    }

    fn on_resize(&mut self, _viewport: Viewport, ctx: &mut Context) -> Result<()> {
        self.place_buttons(ctx)
    }
}
