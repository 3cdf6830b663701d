//! Recently viewed products.
//!
//! On a product page the current product is recorded in storage shortly
//! after load. Anywhere else the stored products are rendered as cards into
//! the section's slider, which is only revealed when at least one card was
//! rendered.

use tracing::{debug, warn};

use crate::{
    Context, NodeId, Result, TimerId, Widget,
    config::ms,
    dom::Document,
    storage::{RecentItem, RecentList},
};

/// Image used for products without one.
const PLACEHOLDER_IMAGE: &str = "assets/common/images/empty.webp";

/// The product described by a product page, if `path` is one.
pub fn product_slug<'a>(path: &'a str, marker: &str) -> Option<&'a str> {
    path.find(marker).map(|i| &path[i..])
}

/// Create an element with classes and attributes.
fn element(doc: &mut Document, tag: &str, classes: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
    let n = doc.create(tag);
    for c in classes.split_whitespace() {
        doc.add_class(n, c)?;
    }
    for (k, v) in attrs {
        doc.set_attr(n, k, *v)?;
    }
    Ok(n)
}

/// A `[recently-viewed]` section.
#[derive(Debug)]
pub struct RecentlyViewed {
    /// Card container.
    list: NodeId,
    /// The product on this page, waiting to be recorded.
    pending: Option<RecentItem>,
    /// Deferred record.
    timer: Option<TimerId>,
    /// Cards rendered last time.
    rendered: usize,
}

impl RecentlyViewed {
    /// Bind to the section.
    pub fn new(ctx: &mut Context) -> Result<Self> {
        Ok(Self {
            list: ctx.require(".ui-product-card__list")?,
            pending: None,
            timer: None,
            rendered: 0,
        })
    }

    /// Cards rendered by the last render.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// The product shown on this page, read from the overview and gallery.
    fn current_product(ctx: &Context, slug: &str) -> Result<Option<RecentItem>> {
        let doc = ctx.doc();
        let Some(overview) = doc.by_id("overview") else {
            return Ok(None);
        };
        let images = doc.query_all(doc.root(), ".ui-product-gallery__slider-item img")?;
        let image = images
            .iter()
            .find(|i| !doc.has_attr(**i, "is-featured-hero-image"))
            .or_else(|| images.first())
            .and_then(|i| {
                doc.attr(*i, "data-common-src")
                    .or_else(|| doc.attr(*i, "data-desktop-src"))
                    .or_else(|| doc.attr(*i, "src"))
            })
            .filter(|src| *src != PLACEHOLDER_IMAGE)
            .unwrap_or_default();
        Ok(Some(RecentItem {
            id: slug.to_string(),
            name: doc.attr(overview, "data-product-title").unwrap_or_default().to_string(),
            url: doc.location().to_string(),
            slug: slug.to_string(),
            image: image.to_string(),
            listing_image_type: doc.attr(overview, "data-product-image-type").map(str::to_string),
        }))
    }

    /// Stored products; unreadable storage counts as empty.
    fn stored(ctx: &mut Context) -> Vec<RecentItem> {
        let list = RecentList::new(ctx.config().recent.key.clone(), ctx.config().recent.capacity);
        list.load(ctx.storage()).unwrap_or_else(|e| {
            warn!(error = %e, "unreadable recently viewed list");
            vec![]
        })
    }

    /// Append one product card.
    fn card(&self, ctx: &mut Context, index: usize, item: &RecentItem) -> Result<()> {
        let doc = ctx.doc_mut();
        let li = element(doc, "li", "ui-product-card__list-item", &[("slider-card", "")])?;
        let index = index.to_string();
        let card = element(
            doc,
            "div",
            "ui-product-card --recently-viewed",
            &[("data-stagger-motion-index", &index), ("data-stagger-motion-type", "sm")],
        )?;
        let content = element(doc, "card-link-interface", "ui-product-card__content", &[])?;
        let cover = item.listing_image_type.as_deref() == Some("Cover");
        let wrapper = element(
            doc,
            "div",
            if cover {
                "ui-product-card__image-wrapper ui-product-card__image--cover"
            } else {
                "ui-product-card__image-wrapper"
            },
            &[],
        )?;
        let src = if item.image.is_empty() { PLACEHOLDER_IMAGE } else { &item.image };
        let img = element(
            doc,
            "img",
            if item.image.is_empty() {
                "ui-product-card__image"
            } else {
                "ui-product-card__image is-loaded"
            },
            &[("alt", ""), ("src", src), ("data-image", ""), ("data-common-src", src)],
        )?;
        let body = element(doc, "div", "ui-product-card__body", &[])?;
        let title = element(doc, "h3", "ui-product-card__title", &[])?;
        let link = element(doc, "a", "", &[("card-link", ""), ("href", &item.url)])?;
        doc.set_text(link, item.name.clone())?;
        doc.append(title, link)?;
        doc.append(body, title)?;
        doc.append(wrapper, img)?;
        doc.append(content, wrapper)?;
        doc.append(content, body)?;
        doc.append(card, content)?;
        doc.append(li, card)?;
        doc.append(self.list, li)
    }

    /// Render `items` as cards, skipping the product named `current`.
    fn render(
        &mut self,
        ctx: &mut Context,
        items: &[RecentItem],
        current: Option<&str>,
    ) -> Result<()> {
        let root = ctx.root();
        if items.is_empty() {
            let doc = ctx.doc_mut();
            doc.set_attr(root, "hidden", "")?;
            return doc.set_attr(root, "aria-hidden", "true");
        }
        ctx.doc_mut().clear_children(self.list)?;
        self.rendered = 0;
        for (i, item) in items.iter().enumerate() {
            if Some(item.name.as_str()) != current {
                self.card(ctx, i, item)?;
                self.rendered += 1;
            }
        }
        debug!(cards = self.rendered, "recently viewed rendered");
        let doc = ctx.doc_mut();
        doc.set_attr(self.list, "data-motion-observer", "stagger")?;
        if self.rendered > 0 {
            doc.remove_attr(root, "hidden")?;
            doc.set_attr(root, "aria-hidden", "false")?;
        }
        Ok(())
    }

    /// Record the pending product, then show the others.
    fn record(&mut self, ctx: &mut Context) -> Result<()> {
        let Some(item) = self.pending.take() else {
            return Ok(());
        };
        let list = RecentList::new(ctx.config().recent.key.clone(), ctx.config().recent.capacity);
        let name = item.name.clone();
        let items = list.record(ctx.storage(), item)?;
        self.render(ctx, &items, Some(&name))
    }
}

impl Widget for RecentlyViewed {
    fn on_connect(&mut self, ctx: &mut Context) -> Result<()> {
        let root = ctx.root();
        ctx.doc_mut().set_attr(root, "hidden", "")?;
        let path = ctx.doc().location().path().to_string();
        let marker = ctx.config().recent.product_marker.clone();
        match product_slug(&path, &marker) {
            Some(slug) => {
                self.pending = Self::current_product(ctx, slug)?;
                if self.pending.is_some() {
                    let delay = ms(ctx.config().timing.recent_record);
                    ctx.debounce(&mut self.timer, delay, "record");
                }
                Ok(())
            }
            None => {
                let items = Self::stored(ctx);
                self.render(ctx, &items, None)
            }
        }
    }

    fn on_timer(&mut self, tag: &'static str, ctx: &mut Context) -> Result<()> {
        if tag == "record" {
            self.timer = None;
            self.record(ctx)?;
        }
        Ok(())
    }

    fn on_disconnect(&mut self, ctx: &mut Context) {
        ctx.clear_timer(&mut self.timer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        assert_eq!(product_slug("/kenya/p/soda-ash", "/p/"), Some("/p/soda-ash"));
        assert_eq!(product_slug("/products", "/p/"), None);
    }
}
