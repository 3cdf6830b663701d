//! Intersection and mutation observation.
//!
//! Observations are recomputed by the page after every event, timer, scroll
//! and resize. An intersection entry is delivered when a target is first
//! observed and afterwards whenever its intersecting state flips.

use slotmap::SlotMap;

use crate::{
    NodeId, ObserverId, WidgetId,
    core::{dom::Document, geom::Rect},
};

/// Options for an intersection observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Reference element, or the viewport when None.
    pub root: Option<NodeId>,
    /// Fraction of the target that must be visible. Zero means any overlap.
    pub threshold: f64,
    /// Pixels added to the bottom of the root box; negative values shrink it.
    pub margin_bottom: f64,
}

impl ObserveOptions {
    /// Observe against the viewport with a threshold.
    pub fn viewport(threshold: f64) -> Self {
        Self {
            root: None,
            threshold,
            margin_bottom: 0.0,
        }
    }

    /// Observe against a scroll container with a threshold.
    pub fn within(root: NodeId, threshold: f64) -> Self {
        Self {
            root: Some(root),
            threshold,
            margin_bottom: 0.0,
        }
    }

    /// Set the bottom root margin.
    pub fn margin_bottom(mut self, px: f64) -> Self {
        self.margin_bottom = px;
        self
    }
}

/// A change in a target's visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Observation handle.
    pub observer: ObserverId,
    /// Owner-chosen label for the observation.
    pub tag: &'static str,
    /// Observed element.
    pub target: NodeId,
    /// Does the target meet the threshold?
    pub is_intersecting: bool,
    /// Visible fraction of the target's area.
    pub ratio: f64,
}

/// One registered observation.
#[derive(Debug, Clone)]
struct Observation {
    /// Widget that receives entries.
    owner: WidgetId,
    /// Owner-chosen label.
    tag: &'static str,
    /// Observed element.
    target: NodeId,
    /// Root box configuration.
    options: ObserveOptions,
    /// Last delivered state.
    last: Option<bool>,
}

/// Registry of intersection observations.
#[derive(Debug, Default)]
pub struct Intersections {
    /// Observations by handle.
    items: SlotMap<ObserverId, Observation>,
    /// Registration order.
    order: Vec<ObserverId>,
}

/// Compute the visible ratio of `target` against a root box.
pub fn intersection_ratio(doc: &Document, target: NodeId, options: &ObserveOptions) -> (bool, f64) {
    let root_box = match options.root {
        Some(r) if !doc.is_rendered(r) => return (false, 0.0),
        Some(r) => doc.client_rect(r),
        None => {
            let (w, h) = doc.viewport();
            Rect::new(0.0, 0.0, w, h)
        }
    }
    .extend_bottom(options.margin_bottom);
    let full = doc.client_rect(target);
    let Some(visible) = doc
        .clipped_rect(target, options.root)
        .and_then(|r| r.intersect(&root_box))
    else {
        return (false, 0.0);
    };
    let ratio = if full.area() > 0.0 {
        visible.area() / full.area()
    } else {
        1.0
    };
    let hit = if options.threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio + 1e-9 >= options.threshold
    };
    (hit, ratio)
}

impl Intersections {
    /// Start observing a target.
    pub fn observe(
        &mut self,
        owner: WidgetId,
        tag: &'static str,
        target: NodeId,
        options: ObserveOptions,
    ) -> ObserverId {
        let id = self.items.insert(Observation {
            owner,
            tag,
            target,
            options,
            last: None,
        });
        self.order.push(id);
        id
    }

    /// Stop an observation.
    pub fn unobserve(&mut self, id: ObserverId) {
        self.items.remove(id);
        self.order.retain(|o| *o != id);
    }

    /// Stop every observation by an owner with the given tag.
    pub fn unobserve_tag(&mut self, owner: WidgetId, tag: &str) {
        let ids: Vec<ObserverId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.items.get(*id).is_some_and(|o| o.owner == owner && o.tag == tag))
            .collect();
        for id in ids {
            self.unobserve(id);
        }
    }

    /// Drop every observation owned by a widget.
    pub fn disconnect(&mut self, owner: WidgetId) {
        self.items.retain(|_, o| o.owner != owner);
        let items = &self.items;
        self.order.retain(|id| items.contains_key(*id));
    }

    /// Number of live observations.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Are there no observations?
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Recompute every observation, returning changed entries batched per
    /// owner in registration order. Observations of removed targets are
    /// dropped.
    pub fn refresh(&mut self, doc: &Document) -> Vec<(WidgetId, Vec<IntersectionEntry>)> {
        let mut batches: Vec<(WidgetId, Vec<IntersectionEntry>)> = vec![];
        let mut dead = vec![];
        for id in &self.order {
            let Some(o) = self.items.get_mut(*id) else {
                continue;
            };
            if !doc.exists(o.target) {
                dead.push(*id);
                continue;
            }
            let (hit, ratio) = intersection_ratio(doc, o.target, &o.options);
            if o.last == Some(hit) {
                continue;
            }
            o.last = Some(hit);
            let entry = IntersectionEntry {
                observer: *id,
                tag: o.tag,
                target: o.target,
                is_intersecting: hit,
                ratio,
            };
            match batches.iter_mut().find(|(w, _)| *w == o.owner) {
                Some((_, v)) => v.push(entry),
                None => batches.push((o.owner, vec![entry])),
            }
        }
        for id in dead {
            self.unobserve(id);
        }
        batches
    }
}

/// Widgets interested in child-list changes beneath an element.
#[derive(Debug, Default)]
pub struct Mutations {
    /// Watched subtrees.
    watches: Vec<(WidgetId, NodeId)>,
}

impl Mutations {
    /// Watch for child-list changes anywhere within `node`.
    pub fn watch(&mut self, owner: WidgetId, node: NodeId) {
        if !self.watches.contains(&(owner, node)) {
            self.watches.push((owner, node));
        }
    }

    /// Drop every watch held by a widget.
    pub fn disconnect(&mut self, owner: WidgetId) {
        self.watches.retain(|(w, _)| *w != owner);
    }

    /// Owners whose watched subtree contains one of the mutated parents.
    pub fn affected(&self, doc: &Document, mutated: &[NodeId]) -> Vec<WidgetId> {
        let mut out = vec![];
        for (owner, node) in &self.watches {
            if mutated.iter().any(|m| doc.contains(*node, *m)) && !out.contains(owner) {
                out.push(*owner);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::error::Result;

    #[test]
    fn cards_in_scroller() -> Result<()> {
        let mut ws: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let w = ws.insert(());
        let mut d = Document::new(Url::parse("https://example.com/")?, 375.0, 800.0);
        let body = d.body();
        let list = d.create("ul");
        d.set_rect(list, Rect::new(0.0, 0.0, 300.0, 100.0))?;
        d.set_clips(list, true)?;
        d.append(body, list)?;
        let mut cards = vec![];
        for i in 0..3 {
            let c = d.create("li");
            d.set_rect(c, Rect::new(300.0 * f64::from(i), 0.0, 300.0, 100.0))?;
            d.append(list, c)?;
            cards.push(c);
        }

        let mut obs = Intersections::default();
        for c in &cards {
            obs.observe(w, "card", *c, ObserveOptions::within(list, 0.99));
        }
        let first = obs.refresh(&d);
        let flags: Vec<bool> = first[0].1.iter().map(|e| e.is_intersecting).collect();
        assert_eq!(flags, vec![true, false, false]);
        assert!(obs.refresh(&d).is_empty());

        d.set_scroll_left(list, 600.0)?;
        let changed = obs.refresh(&d);
        let got: Vec<(NodeId, bool)> = changed[0]
            .1
            .iter()
            .map(|e| (e.target, e.is_intersecting))
            .collect();
        assert_eq!(got, vec![(cards[0], false), (cards[2], true)]);

        d.remove(cards[2])?;
        obs.refresh(&d);
        assert_eq!(obs.len(), 2);
        Ok(())
    }

    #[test]
    fn margins_and_thresholds() -> Result<()> {
        let mut d = Document::new(Url::parse("https://example.com/")?, 1000.0, 800.0);
        let body = d.body();
        d.set_rect(body, Rect::new(0.0, 0.0, 1000.0, 4000.0))?;
        let el = d.create("section");
        d.set_rect(el, Rect::new(0.0, 700.0, 1000.0, 200.0))?;
        d.append(body, el)?;

        let (hit, ratio) = intersection_ratio(&d, el, &ObserveOptions::viewport(0.0));
        assert!(hit);
        assert!((ratio - 0.5).abs() < 1e-9);

        let opts = ObserveOptions::viewport(0.0).margin_bottom(-150.0);
        assert!(!intersection_ratio(&d, el, &opts).0);

        assert!(!intersection_ratio(&d, el, &ObserveOptions::viewport(0.6)).0);
        d.set_scroll_y(300.0);
        assert!(intersection_ratio(&d, el, &ObserveOptions::viewport(0.99)).0);
        Ok(())
    }
}
