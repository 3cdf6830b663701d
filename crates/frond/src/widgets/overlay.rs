//! Open/close bookkeeping shared by modals and filter panels.

use std::fmt;

use tracing::debug;

use crate::{
    Context, NodeId, Result,
    event::key::Key,
    focus_trap::FocusTrap,
};

/// Where an overlay is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    /// Hidden.
    #[default]
    Closed,
    /// Visible and interactive, open animation running.
    Opening,
    /// Visible and interactive.
    Open,
    /// Close animation running; already non-interactive.
    Closing,
}

impl OverlayState {
    /// Does the overlay currently accept interaction?
    pub fn is_open(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
        };
        f.write_str(s)
    }
}

/// Every `main` landmark that does not contain `overlay`.
pub fn background(ctx: &Context, overlay: NodeId) -> Result<Vec<NodeId>> {
    let doc = ctx.doc();
    Ok(doc
        .query_all(doc.root(), "main")?
        .into_iter()
        .filter(|m| !doc.contains(*m, overlay))
        .collect())
}

/// State, trigger and focus trap for one full-screen overlay.
#[derive(Debug)]
pub struct Overlay {
    /// Lifecycle state.
    state: OverlayState,
    /// Element that opened the overlay; focus returns here on close.
    trigger: Option<NodeId>,
    /// Focus cycle.
    trap: FocusTrap,
    /// Did opening take a scroll lock?
    locked: bool,
}

impl Overlay {
    /// Bookkeeping for an overlay rooted at `container`.
    pub fn new(container: NodeId) -> Self {
        Self {
            state: OverlayState::Closed,
            trigger: None,
            trap: FocusTrap::new(container),
            locked: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Is the overlay open or opening?
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// The element that opened the overlay.
    pub fn trigger(&self) -> Option<NodeId> {
        self.trigger
    }

    /// The focus trap.
    pub fn trap(&self) -> &FocusTrap {
        &self.trap
    }

    /// Enter `Opening`: make the background inert, optionally lock page
    /// scroll and register as the innermost modal. Returns false if the
    /// overlay was already open.
    pub fn open(&mut self, ctx: &mut Context, trigger: Option<NodeId>, lock: bool) -> Result<bool> {
        if self.is_open() {
            return Ok(false);
        }
        self.trigger = trigger;
        let root = ctx.root();
        let inert = background(ctx, root)?;
        ctx.claim_inert(&inert)?;
        if lock {
            ctx.lock_scroll()?;
        }
        self.locked = lock;
        let id = ctx.id();
        ctx.overlays().modals.push(id);
        self.state = OverlayState::Opening;
        debug!(widget = ?id, "overlay opening");
        Ok(true)
    }

    /// Enter `Closing`: release inertness and the scroll lock, deregister and
    /// return focus to the trigger. Returns false if already closed.
    pub fn close(&mut self, ctx: &mut Context) -> Result<bool> {
        if !self.is_open() {
            return Ok(false);
        }
        self.state = OverlayState::Closing;
        ctx.release_inert()?;
        if self.locked {
            ctx.unlock_scroll()?;
            self.locked = false;
        }
        let id = ctx.id();
        ctx.overlays().forget(id);
        if let Some(t) = self.trigger {
            ctx.focus(t);
        }
        debug!(widget = ?id, "overlay closing");
        Ok(true)
    }

    /// The running animation finished.
    pub fn settle(&mut self) {
        self.state = match self.state {
            OverlayState::Opening => OverlayState::Open,
            OverlayState::Closing => OverlayState::Closed,
            s => s,
        };
    }

    /// Keep Tab inside the overlay. Returns true if focus was moved.
    pub fn trap_key(&self, ctx: &mut Context, key: Key) -> Result<bool> {
        if !self.is_open() {
            return Ok(false);
        }
        self.trap.handle_key(ctx.doc_mut(), key)
    }

    /// Release everything an open overlay holds, without moving focus.
    pub fn teardown(&mut self, ctx: &mut Context) -> Result<()> {
        if self.is_open() {
            ctx.release_inert()?;
            if self.locked {
                ctx.unlock_scroll()?;
                self.locked = false;
            }
            let id = ctx.id();
            ctx.overlays().forget(id);
        }
        self.state = OverlayState::Closed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states() {
        assert!(OverlayState::Opening.is_open());
        assert!(OverlayState::Open.is_open());
        assert!(!OverlayState::Closing.is_open());
        assert_eq!(OverlayState::default(), OverlayState::Closed);
        assert_eq!(OverlayState::Closing.to_string(), "closing");
    }
}
