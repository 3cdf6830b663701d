//! Page scroll locking for overlays.

use tracing::{debug, warn};

use crate::{core::dom::Document, error::Result};

/// Class set on `html` while locked.
pub const FREEZE_CLASS: &str = "freeze-scroll";
/// Class set on `body` while locked; also read by the scroll manager.
pub const LOCKED_CLASS: &str = "is-scroll-locked";
/// Class that pins the body in place.
pub const FIX_BODY_CLASS: &str = "fix-body-scroll";

/// A depth-counted scroll lock. Only the outermost `disable` records the
/// scroll offset and applies the pinned styling; only the matching outermost
/// `enable` removes it and restores the offset.
#[derive(Debug, Default)]
pub struct ScrollLock {
    /// Number of outstanding `disable` calls.
    depth: usize,
    /// Scroll offset recorded on the 0 to 1 transition.
    saved: f64,
}

impl ScrollLock {
    /// Is scrolling currently disabled?
    pub fn is_locked(&self) -> bool {
        self.depth > 0
    }

    /// Outstanding lock count.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The recorded scroll offset.
    pub fn saved(&self) -> f64 {
        self.saved
    }

    /// Disable page scrolling.
    pub fn disable(&mut self, doc: &mut Document) -> Result<()> {
        self.depth += 1;
        debug!(depth = self.depth, "scroll lock disable");
        if self.depth > 1 {
            return Ok(());
        }
        self.saved = doc.scroll_y();
        let (html, body) = (doc.root(), doc.body());
        doc.add_class(html, FREEZE_CLASS)?;
        doc.add_class(body, LOCKED_CLASS)?;
        doc.add_class(body, FIX_BODY_CLASS)?;
        doc.set_style(body, "top", format!("-{}px", self.saved))?;
        doc.set_style(html, "scroll-behavior", "unset")?;
        doc.set_style(body, "scroll-behavior", "unset")?;
        doc.pin_body(self.saved);
        Ok(())
    }

    /// Re-enable page scrolling. Returns true when the lock was fully
    /// released, in which case the caller should restore scroll behaviour
    /// after a short delay.
    pub fn enable(&mut self, doc: &mut Document) -> Result<bool> {
        if self.depth == 0 {
            warn!("scroll lock enable without matching disable");
            return Ok(false);
        }
        self.depth -= 1;
        debug!(depth = self.depth, "scroll lock enable");
        if self.depth > 0 {
            return Ok(false);
        }
        let (html, body) = (doc.root(), doc.body());
        doc.remove_class(html, FREEZE_CLASS)?;
        doc.remove_class(body, FIX_BODY_CLASS)?;
        doc.set_style(body, "top", "")?;
        doc.unpin_body();
        doc.set_scroll_y(self.saved);
        doc.remove_class(body, LOCKED_CLASS)?;
        Ok(true)
    }

    /// Clear the scroll-behaviour override, unless a new lock was taken in
    /// the meantime.
    pub fn restore_behavior(&self, doc: &mut Document) -> Result<()> {
        if self.is_locked() {
            return Ok(());
        }
        let (html, body) = (doc.root(), doc.body());
        doc.set_style(html, "scroll-behavior", "")?;
        doc.set_style(body, "scroll-behavior", "")
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::core::geom::Rect;

    fn doc() -> Result<Document> {
        let url = Url::parse("https://example.com/")?;
        let mut d = Document::new(url, 1000.0, 800.0);
        let body = d.body();
        d.set_rect(body, Rect::new(0.0, 0.0, 1000.0, 5000.0))?;
        Ok(d)
    }

    #[test]
    fn round_trip() -> Result<()> {
        let mut d = doc()?;
        let body = d.body();
        d.set_scroll_y(400.0);
        let mut lock = ScrollLock::default();
        lock.disable(&mut d)?;
        assert!(d.has_class(body, FIX_BODY_CLASS));
        assert_eq!(d.style(body, "top"), Some("-400px"));
        assert_eq!(d.scroll_y(), 0.0);

        assert!(lock.enable(&mut d)?);
        assert_eq!(d.scroll_y(), 400.0);
        assert!(!d.has_class(body, FIX_BODY_CLASS));
        assert!(!d.has_class(body, LOCKED_CLASS));
        assert_eq!(d.style(body, "top"), None);
        assert_eq!(d.style(body, "scroll-behavior"), Some("unset"));
        lock.restore_behavior(&mut d)?;
        assert_eq!(d.style(body, "scroll-behavior"), None);
        Ok(())
    }

    #[test]
    fn nested_keeps_first_offset() -> Result<()> {
        let mut d = doc()?;
        d.set_scroll_y(400.0);
        let mut lock = ScrollLock::default();
        lock.disable(&mut d)?;
        lock.disable(&mut d)?;
        assert_eq!(lock.depth(), 2);
        assert_eq!(lock.saved(), 400.0);

        assert!(!lock.enable(&mut d)?);
        assert!(d.body_pinned());
        assert!(lock.enable(&mut d)?);
        assert_eq!(d.scroll_y(), 400.0);

        // Unbalanced enable is ignored.
        assert!(!lock.enable(&mut d)?);
        assert_eq!(lock.depth(), 0);
        Ok(())
    }
}
