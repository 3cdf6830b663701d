//! Tabs, accordions, pagination and section navigation.

#[cfg(test)]
mod tests {
    use frond::{
        Result,
        event::key::KeyCode,
        testing::{El, Harness, el},
        widgets::{Accordion, Pagination, SecondaryNav, SlidingTabs, Tabs, pagination::PAGE_CHANGE},
    };
    use pretty_assertions::assert_eq;

    fn tabs() -> El {
        let tab = |i: u32| {
            el("button")
                .id(&format!("t{i}"))
                .attr("role", "tab")
                .rect(200.0 * f64::from(i), 0.0, 200.0, 40.0)
        };
        let panel = |i: u32| el("div").id(&format!("p{i}")).attr("role", "tabpanel");
        el("tab-interface").id("tabs").children([
            el("div")
                .attr("role", "tablist")
                .rect(0.0, 0.0, 1000.0, 40.0)
                .clips()
                .children((0..3).map(tab)),
            panel(0),
            panel(1),
            panel(2),
        ])
    }

    #[test]
    fn roving_tabindex() -> Result<()> {
        let mut h = Harness::builder([tabs()]).build()?;
        let w = h.widget::<Tabs>("tabs")?;
        assert_eq!(h.attr("t0", "tabindex")?.as_deref(), Some("0"));
        assert_eq!(h.attr("t1", "tabindex")?.as_deref(), Some("-1"));
        assert_eq!(h.attr("p1", "hidden")?.as_deref(), Some(""));

        h.click("t1")?;
        assert_eq!(h.attr("t1", "aria-selected")?.as_deref(), Some("true"));
        assert_eq!(h.attr("t0", "aria-selected")?, None);
        assert_eq!(h.attr("p1", "hidden")?, None);
        assert_eq!(h.attr("p0", "hidden")?.as_deref(), Some(""));

        h.key(KeyCode::Right)?;
        assert_eq!(h.focused().as_deref(), Some("t2"));
        h.key(KeyCode::Right)?;
        assert_eq!(h.focused().as_deref(), Some("t0"));
        h.key(KeyCode::End)?;
        assert_eq!(h.page.inspect::<Tabs, _>(w, |t, _| t.selected())?, 2);
        Ok(())
    }

    fn accordion() -> El {
        let section = |i: u32| {
            el("div").flag("accordion").id(&format!("s{i}")).children([
                el("button").id(&format!("h{i}")).flag("accordion-button"),
                el("div")
                    .id(&format!("c{i}"))
                    .flag("accordion-content")
                    .rect(0.0, 0.0, 600.0, 0.0)
                    .child(
                        el("a")
                            .id(&format!("l{i}"))
                            .attr("href", "/x")
                            .rect(0.0, 0.0, 600.0, 120.0),
                    ),
            ])
        };
        el("accordion-interface").id("acc").children((0..3).map(section))
    }

    #[test]
    fn sections_expand_independently() -> Result<()> {
        let mut h = Harness::builder([accordion()]).build()?;
        let w = h.widget::<Accordion>("acc")?;
        assert_eq!(h.attr("h0", "aria-expanded")?.as_deref(), Some("false"));
        assert_eq!(h.attr("l0", "tabindex")?.as_deref(), Some("-1"));

        h.click("h0")?;
        h.click("h2")?;
        assert!(h.has_class("s0", "is-accordion-expanded")?);
        assert!(h.has_class("s2", "is-accordion-expanded")?);
        assert_eq!(h.attr("l0", "tabindex")?, None);
        assert_eq!(h.doc().style(h.id("c0")?, "height"), Some("120px"));
        h.advance(500)?;
        assert_eq!(h.doc().style(h.id("c0")?, "height"), Some("auto"));

        h.click("h0")?;
        h.advance(500)?;
        assert_eq!(h.doc().style(h.id("c0")?, "height"), Some("0px"));
        let open = h.page.with_widget(w, |a: &mut Accordion, ctx| {
            Ok((0..3).map(|i| a.is_expanded(ctx, i)).collect::<Vec<_>>())
        })?;
        assert_eq!(open, vec![false, false, true]);
        Ok(())
    }

    #[test]
    fn arrow_keys_move_between_headers() -> Result<()> {
        let mut h = Harness::builder([accordion()]).build()?;
        h.focus("h0")?;
        h.key(KeyCode::Down)?;
        assert_eq!(h.focused().as_deref(), Some("h1"));
        h.key(KeyCode::End)?;
        assert_eq!(h.focused().as_deref(), Some("h2"));
        h.key(KeyCode::Down)?;
        assert_eq!(h.focused().as_deref(), Some("h2"));
        h.key(KeyCode::Home)?;
        assert_eq!(h.focused().as_deref(), Some("h0"));
        Ok(())
    }

    fn pages(h: &Harness) -> Result<Vec<String>> {
        let mut out = vec![];
        for n in h.qa(".m-pagination__btns > *")? {
            out.push(h.doc().text(n).to_string());
        }
        Ok(out)
    }

    #[test]
    fn pagination_renders_and_emits() -> Result<()> {
        let mut h = Harness::builder([el("x-pagination")
            .id("pg")
            .attr("x-total-results", "250")
            .attr("x-current-page", "1")])
        .build()?;
        let w = h.widget::<Pagination>("pg")?;
        assert_eq!(pages(&h)?, ["←", "1", "2", "3", "...", "25", "→"]);
        let info = h.q(".m-pagination__info")?;
        assert_eq!(h.doc().text(info), "Showing 10 of 250 results");

        let next = h.q(".m-btn-pagination--next")?;
        h.click_node(next)?;
        assert_eq!(h.page.inspect::<Pagination, _>(w, |p, _| p.current())?, 2);
        let last = h.page.emitted().last().map(|e| (e.name.clone(), e.detail.clone()));
        assert_eq!(last, Some((PAGE_CHANGE.to_string(), r#"{"currentPage":2}"#.to_string())));

        let buttons = h.qa(".m-pagination__page")?;
        h.click_node(buttons[buttons.len() - 1])?;
        assert_eq!(pages(&h)?, ["←", "1", "...", "22", "23", "24", "25", "→"]);
        let next = h.q(".m-btn-pagination--next")?;
        assert_eq!(h.doc().attr(next, "disabled"), Some(""));

        // The current page and disabled buttons do nothing.
        let emitted = h.page.emitted().len();
        h.click_node(next)?;
        let current = h.q("[aria-current=page]")?;
        h.click_node(current)?;
        assert_eq!(h.page.emitted().len(), emitted);
        Ok(())
    }

    /// A header, a section nav strip showing two of four link cards, and
    /// four 1000px sections.
    fn section_page(action: bool) -> Vec<El> {
        let card = |i: u32| {
            let x = 300.0 * f64::from(i);
            el("li")
                .id(&format!("n{i}"))
                .flag("nav-slider-card")
                .rect(x, 80.0, 300.0, 60.0)
                .child(
                    el("a")
                        .id(&format!("l{i}"))
                        .flag("nav-link")
                        .attr("href", &format!("#s{i}"))
                        .rect(x, 80.0, 300.0, 60.0),
                )
        };
        let section = |i: u32| {
            el("section")
                .id(&format!("s{i}"))
                .rect(0.0, 140.0 + 1000.0 * f64::from(i), 1280.0, 1000.0)
        };
        vec![
            el("header").rect(0.0, 0.0, 1280.0, 80.0),
            el("secondary-nav-interface").id("snav").rect(0.0, 80.0, 1280.0, 60.0).children([
                el("ul")
                    .id("navlist")
                    .flag("nav-slider-card-list")
                    .rect(0.0, 80.0, 600.0, 60.0)
                    .clips()
                    .children((0..4).map(card)),
                el("div").id("nnav").flag("nav-slider-nav").children([
                    el("button").id("nprev").flag("nav-slider-prev"),
                    el("button").id("nnext").flag("nav-slider-next"),
                ]),
                el("button")
                    .class(if action {
                        "ui-secondary-nav__action"
                    } else {
                        "ui-secondary-nav__link"
                    })
                    .rect(1230.0, 80.0, 48.0, 60.0),
            ]),
            el("main").rect(0.0, 140.0, 1280.0, 4000.0).children((0..4).map(section)),
        ]
    }

    #[test]
    fn section_nav_follows_the_page() -> Result<()> {
        let mut h = Harness::builder(section_page(false)).build()?;
        let nav = h.widget::<SecondaryNav>("snav")?;
        let list = h.id("navlist")?;
        assert!(h.has_class("n0", "is-active")?);
        assert!(!h.has_class("n1", "is-active")?);
        assert_eq!(h.attr("n1", "aria-hidden")?.as_deref(), Some("false"));
        assert_eq!(h.attr("n2", "aria-hidden")?.as_deref(), Some("true"));
        assert_eq!(h.attr("l2", "tabindex")?.as_deref(), Some("-1"));
        assert_eq!(h.attr("nnav", "hidden")?, None);
        assert!(h.attr("nprev", "disabled")?.is_some());
        assert!(h.attr("nnext", "disabled")?.is_none());

        h.click("nnext")?;
        assert_eq!(h.page.doc().scroll_left(list), 300.0);
        assert_eq!(h.attr("n2", "aria-hidden")?.as_deref(), Some("false"));
        assert!(h.attr("nprev", "disabled")?.is_none());
        h.click("nprev")?;
        assert_eq!(h.page.doc().scroll_left(list), 0.0);

        // Links scroll the section to just below the header.
        h.click("l2")?;
        assert_eq!(h.page.doc().scroll_y(), 2060.0);
        assert!(h.page.navigations().is_empty());
        assert!(h.has_class("n2", "is-active")?);
        assert!(!h.has_class("n0", "is-active")?);
        assert_eq!(h.page.doc().scroll_left(list), 600.0);
        assert!(h.attr("nprev", "disabled")?.is_none());
        assert!(h.attr("nnext", "disabled")?.is_some());
        let active = h.page.inspect::<SecondaryNav, _>(nav, |w, doc| w.active(doc))?;
        assert_eq!(active, Some(h.id("n2")?));
        Ok(())
    }

    #[test]
    fn section_nav_clears_the_action_on_small_screens() -> Result<()> {
        let h = Harness::builder(section_page(true)).size(800.0, 800.0).build()?;
        assert_eq!(h.page.doc().style(h.id("nnext")?, "right"), Some("58px"));
        let h = Harness::builder(section_page(true)).build()?;
        assert_eq!(h.page.doc().style(h.id("nnext")?, "right"), None);
        Ok(())
    }

    fn sliding_tabs() -> Vec<El> {
        let button = |i: u32| {
            let b = el("button")
                .id(&format!("b{i}"))
                .class("m-sliding-tabs__button")
                .attr("data-tab", &format!("t{i}"))
                .rect(100.0 + 150.0 * f64::from(i), 0.0, 150.0, 40.0);
            if i == 0 { b.class("m-sliding-tabs__button--active") } else { b }
        };
        let panel = |i: u32| {
            el("div")
                .id(&format!("panel-t{i}"))
                .class("m-sliding-tabs__panel")
        };
        let mut page = vec![
            el("div").id("st").class("m-sliding-tabs").rect(0.0, 0.0, 600.0, 40.0).children([
                el("span").id("bg").class("m-sliding-tabs__active-bg"),
                button(0),
                button(1),
                button(2),
            ]),
        ];
        page.extend((0..3).map(panel));
        page
    }

    #[test]
    fn sliding_tabs_move_the_highlight() -> Result<()> {
        let mut h = Harness::builder(sliding_tabs()).build()?;
        let bg = h.id("bg")?;
        assert_eq!(h.page.doc().style(bg, "width"), Some("150px"));
        assert_eq!(h.page.doc().style(bg, "transform"), Some("translateX(100px)"));

        h.click("b2")?;
        assert!(h.has_class("b2", "m-sliding-tabs__button--active")?);
        assert!(!h.has_class("b0", "m-sliding-tabs__button--active")?);
        assert_eq!(h.attr("b2", "aria-selected")?.as_deref(), Some("true"));
        assert_eq!(h.attr("b0", "tabindex")?.as_deref(), Some("-1"));
        assert!(h.has_class("panel-t2", "m-sliding-tabs__panel--active")?);
        assert!(!h.has_class("panel-t0", "m-sliding-tabs__panel--active")?);
        assert_eq!(h.page.doc().style(bg, "transform"), Some("translateX(400px)"));
        assert_eq!(h.focused().as_deref(), Some("b2"));

        h.key(KeyCode::Right)?;
        assert_eq!(h.focused().as_deref(), Some("b0"));
        h.key(KeyCode::Down)?;
        assert_eq!(h.focused().as_deref(), Some("b0"));
        h.key(KeyCode::End)?;
        let tabs = h.widget::<SlidingTabs>("st")?;
        assert_eq!(h.page.inspect::<SlidingTabs, _>(tabs, |w, doc| w.active(doc))?, Some(2));
        assert!(h.has_class("b2", "m-sliding-tabs__button--active")?);
        assert!(h.has_class("panel-t2", "m-sliding-tabs__panel--active")?);
        Ok(())
    }
}
