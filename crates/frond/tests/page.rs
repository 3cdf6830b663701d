//! Page-level widgets: header search, notifications, downloads and the
//! recently viewed list.

#[cfg(test)]
mod tests {
    use frond::{
        Result,
        event::key::KeyCode,
        storage::{MemoryStorage, RecentItem, RecentList},
        testing::{El, Harness, el},
        widgets::RecentlyViewed,
    };
    use pretty_assertions::assert_eq;

    fn main_body() -> El {
        el("main").id("main").rect(0.0, 80.0, 1280.0, 3000.0)
    }

    fn header() -> El {
        el("header").id("hdr").class("ui-header").rect(0.0, 0.0, 1280.0, 80.0).children([
            el("button").id("toggle").class("ui-header__search-btn"),
            el("div").class("ui-header__search").id("dialog").child(
                el("div").class("ui-header__search-container").child(
                    el("form").id("form").class("ui-header__search-form").children([
                        el("input")
                            .id("q")
                            .class("ui-header__search-input")
                            .attr("type", "search"),
                        el("button")
                            .id("clear")
                            .class("ui-header__search--clear")
                            .attr("type", "button"),
                    ]),
                ),
            ),
        ])
    }

    #[test]
    fn header_search_submits() -> Result<()> {
        let mut h = Harness::builder([header(), main_body()])
            .url("https://www.example.com/kenya/products")
            .build()?;
        h.click("toggle")?;
        assert!(h.has_class("hdr", "ui-header--search-open")?);
        assert_eq!(h.focused().as_deref(), Some("q"));

        h.type_text("soda   ash")?;
        assert_eq!(h.value("q")?, "soda ash");
        assert!(h.has_class("form", "is-filled")?);

        h.key(KeyCode::Enter)?;
        let nav = h.page.navigations().last().cloned();
        assert_eq!(
            nav.map(|n| (n.url, n.new_tab)),
            Some(("https://www.example.com/kenya/global-search?search=soda+ash".to_string(), false))
        );

        h.click("clear")?;
        assert_eq!(h.value("q")?, "");
        assert!(!h.has_class("form", "is-filled")?);

        // A click in the dialog backdrop closes it.
        h.click("dialog")?;
        assert!(!h.has_class("hdr", "ui-header--search-open")?);
        Ok(())
    }

    #[test]
    fn blank_search_does_nothing() -> Result<()> {
        let mut h = Harness::builder([header(), main_body()]).build()?;
        h.focus("q")?;
        h.type_text("   ")?;
        h.key(KeyCode::Enter)?;
        assert!(h.page.navigations().is_empty());
        Ok(())
    }

    #[test]
    fn header_follows_scroll() -> Result<()> {
        let mut h = Harness::builder([header(), main_body()]).build()?;
        assert!(h.has_class("hdr", "ui-header--transparent")?);
        h.scroll_window(300.0)?;
        assert!(h.has_class("hdr", "has-scrolled")?);
        assert!(h.has_class("hdr", "ui-header--sticky")?);
        assert!(h.has_class("hdr", "ui-header--hide")?);
        assert!(!h.has_class("hdr", "ui-header--transparent")?);
        h.scroll_window(200.0)?;
        assert!(!h.has_class("hdr", "ui-header--hide")?);
        h.scroll_window(0.0)?;
        assert!(!h.has_class("hdr", "has-scrolled")?);
        assert!(h.has_class("hdr", "ui-header--transparent")?);
        Ok(())
    }

    fn alert_bar() -> El {
        el("div")
            .id("alert")
            .class("ui-alert-bar")
            .child(el("p").id("alert-text").class("ui-alert-bar__text"))
    }

    fn copy_button() -> El {
        el("button")
            .id("copy")
            .flag("toast-btn")
            .attr("data-text", "Link copied")
            .attr("data-toast-type", "copy-to-clipboard")
            .attr("data-copy-text", "https://www.example.com/p/salt")
    }

    #[test]
    fn toast_after_copy() -> Result<()> {
        let mut h = Harness::builder([main_body().child(copy_button()), alert_bar()]).build()?;
        h.click("copy")?;
        assert_eq!(
            h.page.clipboard_mut().text.as_deref(),
            Some("https://www.example.com/p/salt")
        );
        assert_eq!(h.text("alert-text")?, "Link copied");
        assert!(h.has_class("alert", "ui-alert-bar--visible")?);
        h.advance(2000)?;
        assert!(!h.has_class("alert", "ui-alert-bar--visible")?);
        Ok(())
    }

    #[test]
    fn failed_copy_shows_snackbar() -> Result<()> {
        let mut h = Harness::builder([main_body().child(copy_button()), alert_bar()]).build()?;
        h.page.clipboard_mut().denied = true;
        h.click("copy")?;
        assert!(!h.has_class("alert", "ui-alert-bar--visible")?);
        let snack = h.q(".m-snackbar.error")?;
        assert_eq!(h.doc().attr(snack, "role"), Some("alert"));
        let close = h.q(".m-snackbar__close")?;
        assert_eq!(h.doc().active(), Some(close));

        h.click_node(close)?;
        assert!(h.qa(".m-snackbar")?.is_empty());
        assert_eq!(h.focused().as_deref(), Some("copy"));
        Ok(())
    }

    #[test]
    fn snackbar_times_out() -> Result<()> {
        let button = el("button")
            .id("note")
            .flag("snackbar-btn")
            .attr("data-text", "Saved")
            .attr("data-snackbar-type", "success");
        let mut h = Harness::builder([main_body().child(button)]).build()?;
        h.click("note")?;
        let snack = h.q(".m-snackbar")?;
        assert!(h.doc().has_class(snack, "success"));
        h.advance(4000)?;
        assert!(h.qa(".m-snackbar")?.is_empty());
        Ok(())
    }

    #[test]
    fn cross_origin_downloads_use_proxy() -> Result<()> {
        let mut h = Harness::builder([main_body().children([
            el("a")
                .id("remote")
                .attr("href", "https://cdn.example.net/r/report.pdf")
                .attr("download", ""),
            el("a").id("local").attr("href", "/files/a.pdf").attr("download", ""),
        ])])
        .build()?;
        h.click("remote")?;
        h.click("local")?;
        let navs: Vec<_> = h
            .page
            .navigations()
            .iter()
            .map(|n| (n.url.as_str(), n.new_tab))
            .collect();
        assert_eq!(
            navs,
            [
                (
                    "https://www.example.com/api/download-file.php?url=https%3A%2F%2Fcdn.example.net%2Fr%2Freport.pdf&filename=report.pdf",
                    true
                ),
                ("https://www.example.com/files/a.pdf", false),
            ]
        );
        Ok(())
    }

    fn recent_section() -> El {
        el("section")
            .id("recent")
            .flag("recently-viewed")
            .child(el("ul").id("cards").class("ui-product-card__list"))
    }

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

    fn list() -> RecentList {
        RecentList::new("recentlyViewedProducts", 13)
    }

    #[test]
    fn product_page_records_itself() -> Result<()> {
        let overview = el("div")
            .id("overview")
            .attr("data-product-title", "Soda Ash")
            .attr("data-product-image-type", "Cover");
        let gallery = el("div").class("ui-product-gallery__slider-item").children([
            el("img").attr("src", "/img/hero.webp").flag("is-featured-hero-image"),
            el("img").attr("src", "/img/soda.webp"),
        ]);
        let mut h = Harness::builder([main_body().children([overview, gallery, recent_section()])])
            .url("https://www.example.com/kenya/p/soda-ash")
            .build()?;
        assert_eq!(h.attr("recent", "hidden")?.as_deref(), Some(""));
        assert!(list().load(h.page.storage())?.is_empty());

        h.advance(500)?;
        let stored = list().load(h.page.storage())?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].slug, "/p/soda-ash");
        assert_eq!(stored[0].image, "/img/soda.webp");
        assert_eq!(stored[0].listing_image_type.as_deref(), Some("Cover"));
        // Only the current product is known, so nothing is shown.
        assert_eq!(h.attr("recent", "hidden")?.as_deref(), Some(""));
        Ok(())
    }

    #[test]
    fn listing_page_renders_cards() -> Result<()> {
        let mut storage = MemoryStorage::default();
        list().record(&mut storage, product("/p/salt", "Salt"))?;
        list().record(&mut storage, product("/p/soda-ash", "Soda Ash"))?;
        let mut h = Harness::builder([main_body().child(recent_section())])
            .url("https://www.example.com/kenya/products")
            .storage(storage)
            .build()?;
        let w = h.widget::<RecentlyViewed>("recent")?;
        assert_eq!(h.page.inspect::<RecentlyViewed, _>(w, |r, _| r.rendered())?, 2);
        assert_eq!(h.attr("recent", "hidden")?, None);
        assert_eq!(h.attr("recent", "aria-hidden")?.as_deref(), Some("false"));
        let names: Vec<String> = h
            .qa("#cards [card-link]")?
            .into_iter()
            .map(|n| h.doc().text(n).to_string())
            .collect();
        assert_eq!(names, ["Soda Ash", "Salt"]);
        Ok(())
    }

    #[test]
    fn corrupt_storage_is_empty() -> Result<()> {
        let mut storage = MemoryStorage::default();
        frond::storage::Storage::set(&mut storage, "recentlyViewedProducts", "{not json".into())?;
        let h = Harness::builder([main_body().child(recent_section())])
            .url("https://www.example.com/kenya/products")
            .storage(storage)
            .build()?;
        assert_eq!(h.attr("recent", "hidden")?.as_deref(), Some(""));
        assert_eq!(h.attr("recent", "aria-hidden")?.as_deref(), Some("true"));
        Ok(())
    }

    fn placeholder(h: &Harness) -> Result<String> {
        Ok(h.attr("q", "placeholder")?.unwrap_or_default())
    }

    #[test]
    fn placeholder_types_suggestions_until_focused() -> Result<()> {
        let field = el("input")
            .id("q")
            .class("ui-search-suggestion-placeholder")
            .attr("data-suggestions-animation", "soda,salt");
        let mut h = Harness::builder([field]).build()?;
        assert_eq!(placeholder(&h)?, "S|");
        h.advance(2600)?;
        assert_eq!(placeholder(&h)?, "Search by soda");
        h.advance(1500)?;
        assert_eq!(placeholder(&h)?, "Search by sod|");
        h.advance(300)?;
        assert_eq!(placeholder(&h)?, "Search by ");
        h.advance(100)?;
        assert_eq!(placeholder(&h)?, "Search by s|");

        assert!(h.focus("q")?);
        assert_eq!(placeholder(&h)?, "");
        h.advance(1000)?;
        assert_eq!(placeholder(&h)?, "");
        h.blur()?;
        assert_eq!(placeholder(&h)?, "Search by sa");

        h.focus("q")?;
        h.type_text("ash")?;
        h.blur()?;
        h.advance(1000)?;
        assert_eq!(placeholder(&h)?, "");
        Ok(())
    }
}
