//! Sample pages built from the same markup the site serves.

use clap::ValueEnum;
use frond::{
    Result,
    config::Config,
    storage::{MemoryStorage, RecentItem, RecentList},
    testing::{El, Harness, el},
};

/// The sample pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sample {
    /// A product listing: header, card slider, accordion, pagination and
    /// the recently viewed section.
    Listing,
    /// A product page that records itself as recently viewed.
    Product,
    /// A page with a modal, two dropdowns and notification buttons.
    Overlays,
}

impl Sample {
    /// Location the page is served from.
    pub fn url(self) -> &'static str {
        match self {
            Self::Listing => "https://www.example.com/kenya/products",
            Self::Product => "https://www.example.com/kenya/p/soda-ash",
            Self::Overlays => "https://www.example.com/kenya/contact",
        }
    }

    /// Body content.
    pub fn body(self) -> Vec<El> {
        let main = el("main").id("main").rect(0.0, 80.0, 1280.0, 4000.0);
        let main = match self {
            Self::Listing => main.children([slider(), accordion(), pagination(), recent()]),
            Self::Product => main.children([overview(), recent()]),
            Self::Overlays => main.children([
                el("button")
                    .id("open")
                    .attr("modal-interface-open", "")
                    .attr("modal-name", "contact")
                    .text("Contact us"),
                dropdown("sort", &["Newest", "Oldest", "Name"]),
                dropdown("region", &["Kenya", "Europe", "North America"]),
                el("button")
                    .id("share")
                    .flag("toast-btn")
                    .attr("data-toast-type", "copy-to-clipboard")
                    .attr("data-text", "Link copied")
                    .attr("data-copy-text", "https://www.example.com/kenya/contact"),
                el("a")
                    .id("brochure")
                    .attr("href", "https://cdn.example.net/docs/brochure.pdf")
                    .attr("download", ""),
            ]),
        };
        let mut body = vec![header(), main];
        if self == Self::Overlays {
            body.push(modal());
            body.push(
                el("div")
                    .class("ui-alert-bar")
                    .child(el("p").class("ui-alert-bar__text")),
            );
        }
        body
    }

    /// Build and upgrade the page. Listing pages start with two products in
    /// the recently viewed list.
    pub fn build(self, config: Config, size: (f64, f64)) -> Result<Harness> {
        let mut storage = MemoryStorage::default();
        if self == Self::Listing {
            let list = RecentList::new(config.recent.key.clone(), config.recent.capacity);
            list.record(&mut storage, product("/p/salt", "Refined Salt"))?;
            list.record(&mut storage, product("/p/soda-ash", "Soda Ash"))?;
        }
        Harness::builder(self.body())
            .url(self.url())
            .size(size.0, size.1)
            .config(config)
            .storage(storage)
            .build()
    }
}

/// A stored product.
fn product(slug: &str, name: &str) -> RecentItem {
    RecentItem {
        id: slug.into(),
        name: name.into(),
        url: format!("https://www.example.com/kenya{slug}"),
        slug: slug.into(),
        image: String::new(),
        listing_image_type: None,
    }
}

/// Site header with the search dialog.
fn header() -> El {
    el("header").id("header").class("ui-header").rect(0.0, 0.0, 1280.0, 80.0).children([
        el("button").id("search").class("ui-header__search-btn"),
        el("div").class("ui-header__search").child(
            el("div").class("ui-header__search-container").child(
                el("form").class("ui-header__search-form").children([
                    el("input")
                        .id("query")
                        .class("ui-header__search-input")
                        .attr("type", "search"),
                    el("button")
                        .class("ui-header__search--clear")
                        .attr("type", "button"),
                ]),
            ),
        ),
    ])
}

/// A product slider with six cards.
fn slider() -> El {
    let cards = (0..6).map(|i| {
        el("li")
            .flag("slider-card")
            .rect(400.0 * f64::from(i), 200.0, 400.0, 300.0)
            .child(el("a").attr("href", &format!("/kenya/p/{i}")).text(&format!("Product {i}")))
    });
    el("slider-interface").id("products").rect(0.0, 200.0, 1200.0, 400.0).children([
        el("ul")
            .flag("slider-card-list")
            .rect(0.0, 200.0, 1200.0, 300.0)
            .clips()
            .children(cards),
        el("div").flag("slider-nav").children([
            el("button").id("prev").flag("slider-prev"),
            el("button").id("next").flag("slider-next"),
        ]),
    ])
}

/// Three FAQ sections.
fn accordion() -> El {
    let section = |i: u32| {
        let y = 700.0 + 60.0 * f64::from(i);
        el("div").flag("accordion").children([
            el("button")
                .id(&format!("faq{i}"))
                .flag("accordion-button")
                .text(&format!("Question {i}")),
            el("div")
                .flag("accordion-content")
                .rect(0.0, y, 1200.0, 0.0)
                .child(el("p").rect(0.0, y, 1200.0, 80.0).text("Answer")),
        ])
    };
    el("accordion-interface").id("faq").children((0..3).map(section))
}

/// Result pagination.
fn pagination() -> El {
    el("x-pagination")
        .id("pages")
        .attr("x-total-results", "137")
        .attr("x-current-page", "1")
}

/// Recently viewed products.
fn recent() -> El {
    el("section")
        .id("recent")
        .flag("recently-viewed")
        .child(el("ul").class("ui-product-card__list"))
}

/// Product overview and gallery.
fn overview() -> El {
    el("div")
        .id("overview")
        .attr("data-product-title", "Soda Ash")
        .child(
            el("div")
                .class("ui-product-gallery__slider-item")
                .child(el("img").attr("src", "/img/soda-ash.webp")),
        )
}

/// A dropdown with the given options.
fn dropdown(id: &str, options: &[&str]) -> El {
    el("dropdown-interface").id(id).children([
        el("button").id(&format!("{id}-btn")).flag("dropdown-btn"),
        el("div").flag("dropdown-popup").child(
            el("ul").children(
                options
                    .iter()
                    .map(|o| el("li").attr("role", "option").text(o)),
            ),
        ),
    ])
}

/// The contact modal.
fn modal() -> El {
    el("modal-interface").id("contact").child(
        el("div").flag("modal-interface-content").children([
            el("h2").class("ui-modal__header-title").attr("tabindex", "-1").text("Contact"),
            el("input").id("email").attr("type", "text"),
            el("button").id("send").text("Send"),
            el("button").id("close").class("ui-modal__close"),
        ]),
    )
}

#[cfg(test)]
mod tests {
    use frond::widgets::{Modal, Pagination, Slider};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn samples_upgrade() -> Result<()> {
        let size = (1280.0, 800.0);
        let mut listing = Sample::Listing.build(Config::default(), size)?;
        listing.widget::<Slider>("products")?;
        let pages = listing.widget::<Pagination>("pages")?;
        assert_eq!(listing.page.inspect::<Pagination, _>(pages, |p, _| p.total())?, 14);
        assert_eq!(listing.attr("recent", "hidden")?, None);

        let mut overlays = Sample::Overlays.build(Config::default(), size)?;
        overlays.widget::<Modal>("contact")?;
        overlays.click("open")?;
        assert!(overlays.page.services().lock.is_locked());

        let mut product = Sample::Product.build(Config::default(), size)?;
        product.advance(500)?;
        assert_eq!(
            RecentList::new("recentlyViewedProducts", 13).load(product.page.storage())?.len(),
            1
        );
        Ok(())
    }
}
