//! Reference-counted inertness of background content.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{NodeId, WidgetId, core::dom::Document, error::Result};

/// Tracks which open overlays claimed which elements as inert. An element
/// loses its `inert` attribute only when no claimant remains, so closing an
/// inner overlay leaves the outer overlay's background inert.
#[derive(Debug, Default)]
pub struct InertRegistry {
    /// Claimants per element, in claim order.
    claims: BTreeMap<NodeId, Vec<WidgetId>>,
}

impl InertRegistry {
    /// Mark elements inert on behalf of `owner`.
    pub fn claim(&mut self, doc: &mut Document, owner: WidgetId, nodes: &[NodeId]) -> Result<()> {
        for n in nodes {
            let owners = self.claims.entry(*n).or_default();
            if !owners.contains(&owner) {
                owners.push(owner);
            }
            doc.set_attr(*n, "inert", "true")?;
        }
        debug!(count = nodes.len(), "inert claim");
        Ok(())
    }

    /// Drop every claim held by `owner`, un-inerting elements nobody else
    /// still claims.
    pub fn release(&mut self, doc: &mut Document, owner: WidgetId) -> Result<()> {
        let mut freed = vec![];
        for (node, owners) in self.claims.iter_mut() {
            owners.retain(|o| *o != owner);
            if owners.is_empty() {
                freed.push(*node);
            }
        }
        for n in freed {
            self.claims.remove(&n);
            if doc.exists(n) {
                doc.remove_attr(n, "inert")?;
            }
        }
        Ok(())
    }

    /// Is the element claimed by anyone?
    pub fn is_claimed(&self, node: NodeId) -> bool {
        self.claims.contains_key(&node)
    }

    /// Number of claimants for an element.
    pub fn claimants(&self, node: NodeId) -> usize {
        self.claims.get(&node).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;
    use url::Url;

    use super::*;

    #[test]
    fn nested_overlays() -> Result<()> {
        let mut ws: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let (outer, inner) = (ws.insert(()), ws.insert(()));
        let mut d = Document::new(Url::parse("https://example.com/")?, 100.0, 100.0);
        let main = d.create("main");
        let footer = d.create("footer");
        let body = d.body();
        d.append(body, main)?;
        d.append(body, footer)?;

        let mut reg = InertRegistry::default();
        reg.claim(&mut d, outer, &[main])?;
        reg.claim(&mut d, inner, &[main, footer])?;
        assert_eq!(reg.claimants(main), 2);

        reg.release(&mut d, inner)?;
        assert_eq!(d.attr(main, "inert"), Some("true"));
        assert!(!d.has_attr(footer, "inert"));

        reg.release(&mut d, outer)?;
        assert!(!d.has_attr(main, "inert"));
        assert!(!reg.is_claimed(main));
        Ok(())
    }
}
