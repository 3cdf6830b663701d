//! Card sliders driven by card visibility.

#[cfg(test)]
mod tests {
    use frond::{
        Result,
        testing::{El, Harness, el},
        widgets::Slider,
    };
    use pretty_assertions::assert_eq;

    /// A 600px wide clipping list of `n` 300px cards, with prev/next buttons.
    fn slider(tag: &str, n: u32) -> El {
        let cards = (0..n).map(|i| {
            el("li")
                .id(&format!("c{i}"))
                .flag("slider-card")
                .rect(300.0 * f64::from(i), 100.0, 300.0, 200.0)
        });
        el(tag).id("s").rect(0.0, 100.0, 600.0, 300.0).children([
            el("ul")
                .id("list")
                .flag("slider-card-list")
                .rect(0.0, 100.0, 600.0, 200.0)
                .clips()
                .children(cards),
            el("div").id("nav").flag("slider-nav").children([
                el("button").id("prev").flag("slider-prev"),
                el("button").id("next").flag("slider-next"),
            ]),
        ])
    }

    fn disabled(h: &Harness, id: &str) -> Result<bool> {
        Ok(h.attr(id, "disabled")?.is_some())
    }

    #[test]
    fn buttons_follow_visible_cards() -> Result<()> {
        let mut h = Harness::builder([slider("slider-interface", 4)]).build()?;
        assert_eq!(h.attr("c1", "aria-hidden")?.as_deref(), Some("false"));
        assert_eq!(h.attr("c2", "aria-hidden")?.as_deref(), Some("true"));
        assert_eq!(h.attr("c2", "tabindex")?.as_deref(), Some("-1"));
        assert!(h.has_class("list", "is-visible")?);
        assert!(disabled(&h, "prev")?);
        assert!(!disabled(&h, "next")?);
        assert_eq!(h.attr("nav", "hidden")?, None);

        // Two cards per click on wide viewports.
        h.click("next")?;
        assert_eq!(h.page.doc().scroll_left(h.id("list")?), 600.0);
        assert_eq!(h.attr("c3", "aria-hidden")?.as_deref(), Some("false"));
        assert!(!disabled(&h, "prev")?);
        assert!(disabled(&h, "next")?);
        Ok(())
    }

    #[test]
    fn clicks_wait_for_scroll_to_settle() -> Result<()> {
        let mut h = Harness::builder([slider("slider-interface", 4)]).build()?;
        h.scroll_element("list", 600.0, 0.0)?;
        assert!(h.has_class("prev", "is-pressed-state-blocked")?);
        h.click("prev")?;
        assert_eq!(h.page.doc().scroll_left(h.id("list")?), 600.0);

        h.advance(100)?;
        assert!(!h.has_class("prev", "is-pressed-state-blocked")?);
        h.click("prev")?;
        assert_eq!(h.page.doc().scroll_left(h.id("list")?), 0.0);
        Ok(())
    }

    #[test]
    fn one_card_per_click_on_mobile() -> Result<()> {
        let mut h = Harness::builder([slider("slider-interface", 4)]).size(375.0, 800.0).build()?;
        h.click("next")?;
        assert_eq!(h.page.doc().scroll_left(h.id("list")?), 300.0);
        Ok(())
    }

    #[test]
    fn nav_hidden_when_everything_fits() -> Result<()> {
        let h = Harness::builder([slider("slider-interface", 2)]).build()?;
        assert_eq!(h.attr("nav", "hidden")?.as_deref(), Some(""));
        Ok(())
    }

    #[test]
    fn rebinds_rendered_cards() -> Result<()> {
        let mut h = Harness::builder([slider("slider-interface", 0)]).build()?;
        let s = h.widget::<Slider>("s")?;
        assert_eq!(h.page.inspect::<Slider, _>(s, |w, _| w.card_count())?, 0);
        assert_eq!(h.attr("nav", "hidden")?.as_deref(), Some(""));
        let list = h.id("list")?;
        for i in 0..3 {
            el("li")
                .flag("slider-card")
                .rect(300.0 * f64::from(i), 100.0, 300.0, 200.0)
                .build(h.page.doc_mut(), list)?;
        }
        h.page.settle()?;
        assert_eq!(h.page.inspect::<Slider, _>(s, |w, _| w.card_count())?, 3);
        assert!(!disabled(&h, "next")?);
        assert_eq!(h.attr("nav", "hidden")?, None);
        Ok(())
    }

    /// A one-card-wide carousel of three 600px cards with autoplay
    /// controls, above a tall page.
    fn carousel() -> Vec<El> {
        let cards = (0..3).map(|i| {
            el("li")
                .id(&format!("c{i}"))
                .flag("slider-card")
                .rect(600.0 * f64::from(i), 100.0, 600.0, 200.0)
        });
        vec![
            el("image-carousel-interface").id("s").rect(0.0, 100.0, 600.0, 300.0).children([
                el("ul")
                    .id("list")
                    .flag("slider-card-list")
                    .rect(0.0, 100.0, 600.0, 200.0)
                    .clips()
                    .children(cards),
                el("div").id("nav").flag("slider-nav").children([
                    el("button").id("prev").flag("slider-prev"),
                    el("button").id("next").flag("slider-next"),
                    el("button").id("play").class("ui-image-carousel__play-btn").flag("hidden"),
                    el("button").id("pause").class("ui-image-carousel__pause-btn"),
                ]),
            ]),
            el("main").rect(0.0, 400.0, 600.0, 3000.0),
        ]
    }

    fn left(h: &Harness) -> Result<f64> {
        Ok(h.page.doc().scroll_left(h.id("list")?))
    }

    fn transform(h: &Harness, id: &str) -> Result<Option<String>> {
        Ok(h.page.doc().style(h.id(id)?, "transform").map(str::to_string))
    }

    fn playing(h: &mut Harness) -> Result<bool> {
        let s = h.widget::<Slider>("s")?;
        h.page.inspect::<Slider, _>(s, |w, _| w.is_playing())
    }

    #[test]
    fn carousel_autoplays_and_wraps() -> Result<()> {
        let mut h = Harness::builder(carousel()).build()?;
        assert!(playing(&mut h)?);
        assert_eq!(h.attr("c0", "aria-hidden")?.as_deref(), Some("false"));

        h.advance(4000)?;
        assert!(h.has_class("s", "is-slider-animating")?);
        assert_eq!(transform(&h, "c0")?.as_deref(), Some("translateX(-30%)"));
        assert_eq!(transform(&h, "c1")?.as_deref(), Some("translateX(-100%)"));
        h.advance(400)?;
        assert_eq!(left(&h)?, 600.0);
        assert_eq!(transform(&h, "c1")?, None);
        assert!(!h.has_class("s", "is-slider-animating")?);

        h.advance(4000)?;
        h.advance(400)?;
        assert_eq!(left(&h)?, 1200.0);
        assert_eq!(h.attr("c2", "aria-hidden")?.as_deref(), Some("false"));

        // From the last card the first comes round into the last slot.
        h.advance(4000)?;
        assert_eq!(transform(&h, "c0")?.as_deref(), Some("translateX(200%)"));
        assert_eq!(h.page.doc().style(h.id("c0")?, "z-index"), Some("1"));
        assert_eq!(transform(&h, "c2")?.as_deref(), Some("translateX(-30%)"));
        assert_eq!(h.page.doc().style(h.id("c2")?, "z-index"), Some("0"));
        assert_eq!(left(&h)?, 1200.0);
        h.advance(400)?;
        assert_eq!(left(&h)?, 0.0);
        assert_eq!(transform(&h, "c0")?, None);
        assert_eq!(h.page.doc().style(h.id("c0")?, "z-index"), None);
        assert_eq!(h.attr("c0", "aria-hidden")?.as_deref(), Some("false"));
        assert!(playing(&mut h)?);
        Ok(())
    }

    #[test]
    fn carousel_pauses_off_screen() -> Result<()> {
        let mut h = Harness::builder(carousel()).build()?;
        h.scroll_window(1000.0)?;
        assert!(!playing(&mut h)?);
        h.advance(8000)?;
        assert_eq!(left(&h)?, 0.0);

        h.scroll_window(0.0)?;
        assert!(playing(&mut h)?);
        h.advance(4400)?;
        assert_eq!(left(&h)?, 600.0);
        Ok(())
    }

    #[test]
    fn carousel_pause_survives_manual_slides() -> Result<()> {
        let mut h = Harness::builder(carousel()).build()?;
        assert_eq!(h.attr("play", "hidden")?.as_deref(), Some(""));
        assert_eq!(h.attr("pause", "hidden")?, None);

        h.click("pause")?;
        assert!(!playing(&mut h)?);
        assert_eq!(h.attr("play", "hidden")?, None);
        assert_eq!(h.attr("pause", "hidden")?.as_deref(), Some(""));

        h.click("next")?;
        h.advance(400)?;
        assert_eq!(left(&h)?, 600.0);
        assert!(!playing(&mut h)?);
        h.advance(8000)?;
        assert_eq!(left(&h)?, 600.0);

        h.click("prev")?;
        assert_eq!(transform(&h, "c0")?.as_deref(), Some("translateX(100%)"));
        h.advance(400)?;
        assert_eq!(left(&h)?, 0.0);
        assert!(!playing(&mut h)?);

        h.click("play")?;
        assert!(playing(&mut h)?);
        assert_eq!(h.attr("play", "hidden")?.as_deref(), Some(""));
        assert_eq!(h.attr("pause", "hidden")?, None);
        h.advance(4000)?;
        h.advance(400)?;
        assert_eq!(left(&h)?, 600.0);
        Ok(())
    }

    #[test]
    fn removing_a_carousel_disconnects_it() -> Result<()> {
        let mut h = Harness::builder(carousel()).build()?;
        assert!(playing(&mut h)?);
        let pending = h.page.services().timers.len();
        let root = h.id("s")?;
        h.page.doc_mut().remove(root)?;
        h.page.settle()?;
        assert!(h.page.find::<Slider>().is_none());
        assert_eq!(h.page.services().timers.len(), pending - 1);
        h.advance(8000)?;
        Ok(())
    }
}
