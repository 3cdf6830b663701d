//! Modals, dropdowns and the scroll lock they share.

#[cfg(test)]
mod tests {
    use frond::{
        Result,
        event::key::{Key, KeyCode, Shift},
        testing::{El, Harness, el},
        widgets::{Dropdown, Modal},
    };
    use pretty_assertions::assert_eq;

    fn page_body() -> El {
        el("main").id("main").rect(0.0, 0.0, 1280.0, 3000.0)
    }

    fn modal() -> Vec<El> {
        vec![
            page_body().child(
                el("button")
                    .id("open")
                    .attr("modal-interface-open", "")
                    .attr("modal-name", "m"),
            ),
            el("modal-interface").id("m").child(el("div").flag("modal-interface-content").children([
                el("button").id("a"),
                el("a").id("b").attr("href", "/x"),
                el("button").id("c").class("ui-modal__close"),
            ])),
        ]
    }

    fn dropdown(n: u8) -> El {
        el("dropdown-interface").id(&format!("d{n}")).children([
            el("button").id(&format!("b{n}")).flag("dropdown-btn"),
            el("div").id(&format!("p{n}")).flag("dropdown-popup").child(
                el("ul").children([
                    el("li").attr("role", "option").text("One"),
                    el("li").attr("role", "option").text("Two"),
                ]),
            ),
        ])
    }

    #[test]
    fn modal_traps_focus() -> Result<()> {
        let mut h = Harness::builder(modal()).scrolled(400.0).build()?;
        h.click("open")?;
        assert_eq!(h.focused().as_deref(), Some("a"));
        assert_eq!(h.attr("open", "aria-expanded")?.as_deref(), Some("true"));
        assert!(h.page.services().lock.is_locked());
        assert!(h.page.doc().is_inert(h.id("open")?));

        h.key(KeyCode::Tab)?;
        assert_eq!(h.focused().as_deref(), Some("b"));
        h.key(KeyCode::Tab)?;
        assert_eq!(h.focused().as_deref(), Some("c"));
        h.key(KeyCode::Tab)?;
        assert_eq!(h.focused().as_deref(), Some("a"));
        h.key(Key {
            mods: Shift,
            key: KeyCode::Tab,
        })?;
        assert_eq!(h.focused().as_deref(), Some("c"));
        Ok(())
    }

    #[test]
    fn modal_closes_and_restores() -> Result<()> {
        let mut h = Harness::builder(modal()).scrolled(400.0).build()?;
        let m = h.widget::<Modal>("m")?;
        h.click("open")?;
        h.advance(300)?;
        h.key(KeyCode::Esc)?;
        assert_eq!(h.focused().as_deref(), Some("open"));
        assert!(!h.page.services().lock.is_locked());
        assert_eq!(h.page.doc().scroll_y(), 400.0);
        assert!(!h.page.doc().is_inert(h.id("open")?));
        h.advance(200)?;
        assert!(!h.page.inspect::<Modal, _>(m, |w, _| w.is_open())?);

        h.click("open")?;
        assert!(h.page.close_modal()?);
        assert!(!h.page.close_modal()?);
        Ok(())
    }

    #[test]
    fn close_button() -> Result<()> {
        let mut h = Harness::builder(modal()).build()?;
        h.click("open")?;
        h.click("c")?;
        assert_eq!(h.attr("m", "aria-hidden")?.as_deref(), Some("true"));
        Ok(())
    }

    #[test]
    fn nested_scroll_locks() -> Result<()> {
        let mut h = Harness::builder([page_body()]).scrolled(250.0).build()?;
        h.page.disable_scroll()?;
        h.page.disable_scroll()?;
        assert_eq!(h.page.services().lock.depth(), 2);
        h.page.enable_scroll()?;
        assert!(h.page.services().lock.is_locked());
        h.scroll_window(900.0)?;
        h.page.enable_scroll()?;
        assert!(!h.page.services().lock.is_locked());
        assert_eq!(h.page.doc().scroll_y(), 250.0);

        // Unbalanced enables are ignored.
        h.page.enable_scroll()?;
        assert_eq!(h.page.services().lock.depth(), 0);
        Ok(())
    }

    #[test]
    fn one_dropdown_open() -> Result<()> {
        let mut h = Harness::builder([page_body().children([dropdown(1), dropdown(2)])]).build()?;
        let d1 = h.widget::<Dropdown>("d1")?;
        let d2 = h.widget::<Dropdown>("d2")?;
        assert_eq!(h.attr("p1", "aria-hidden")?.as_deref(), Some("true"));

        h.click("b1")?;
        assert!(h.page.inspect::<Dropdown, _>(d1, |w, _| w.is_open())?);
        assert_eq!(h.attr("b1", "aria-expanded")?.as_deref(), Some("true"));

        h.click("b2")?;
        assert!(!h.page.inspect::<Dropdown, _>(d1, |w, _| w.is_open())?);
        assert!(h.page.inspect::<Dropdown, _>(d2, |w, _| w.is_open())?);
        assert_eq!(h.attr("b1", "aria-expanded")?.as_deref(), Some("false"));
        Ok(())
    }
}
