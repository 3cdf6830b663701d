//! Widget trait and event outcome types.

use std::any::{Any, type_name};

use convert_case::{Case, Casing};

use crate::{
    Context,
    core::{
        broadcast::Viewport,
        dom::Document,
        observer::IntersectionEntry,
    },
    error::Result,
    event::{CustomEvent, Event},
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was not handled and bubbles on with its default action.
    Ignore,
    /// The default action is suppressed; the event keeps bubbling.
    Prevent,
    /// Propagation stops; the default action still runs.
    Stop,
    /// The event was handled: propagation stops and the default action is
    /// suppressed.
    Handle,
}

impl EventOutcome {
    /// Does this outcome suppress the default action?
    pub fn prevents(self) -> bool {
        matches!(self, Self::Prevent | Self::Handle)
    }

    /// Does this outcome stop propagation?
    pub fn stops(self) -> bool {
        matches!(self, Self::Stop | Self::Handle)
    }
}

/// An input-like widget that contributes to a filter panel. Filter panels
/// talk to their controls only through this interface.
pub trait FilterControl {
    /// Currently selected values; empty when inactive.
    fn values(&self, doc: &Document) -> Vec<String>;

    /// Reset to the unselected state.
    fn clear(&mut self, ctx: &mut Context) -> Result<()>;

    /// Is any value selected?
    fn is_active(&self, doc: &Document) -> bool {
        !self.values(doc).is_empty()
    }
}

/// Name of the change notification filter controls emit.
pub const FILTER_CHANGE: &str = "filterchange";

/// Widgets are controllers attached to one root element each.
///
/// A widget is constructed when a matching element is connected, resolves the
/// child elements it needs up front, and afterwards only reacts to hooks.
pub trait Widget: Any + Send {
    /// Called once after construction, while the root is connected. Register
    /// subscriptions, observers and initial DOM state here.
    fn on_connect(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Called once before the widget is dropped. Services the widget
    /// registered are released by the page afterwards.
    fn on_disconnect(&mut self, _ctx: &mut Context) {}

    /// Handle an event whose target is within this widget's root.
    fn on_event(&mut self, _event: &Event, _ctx: &mut Context) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Handle an event at document level, after bubbling finished without
    /// being stopped. Only delivered to widgets that called
    /// [`Context::listen_document`].
    fn on_document_event(&mut self, _event: &Event, _ctx: &mut Context) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// A custom event emitted at or below this widget's root.
    fn on_custom_event(&mut self, _event: &CustomEvent, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// A timer scheduled through [`Context::schedule`] fired.
    fn on_timer(&mut self, _tag: &'static str, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Observed elements changed visibility.
    fn on_intersection(
        &mut self,
        _entries: &[IntersectionEntry],
        _ctx: &mut Context,
    ) -> Result<()> {
        Ok(())
    }

    /// The window scrolled. Only delivered to scroll subscribers.
    fn on_scroll(&mut self, _y: f64, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// The viewport settled at a new size. Only delivered to resize
    /// subscribers.
    fn on_resize(&mut self, _viewport: Viewport, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Children changed under a watched element.
    fn on_mutation(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Close, if this widget is an open overlay.
    fn dismiss(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Filter control capability, for widgets that have it.
    fn filter_control(&mut self) -> Option<&mut dyn FilterControl> {
        None
    }

    /// Name used in traces and dumps, derived from the type name.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        let short = name.rsplit("::").next().unwrap_or(name);
        short.to_case(Case::Kebab)
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

/// Downcast a widget trait object.
pub(crate) fn downcast_mut<W: Widget>(widget: &mut dyn Widget) -> Option<&mut W> {
    let any = widget as &mut dyn Any;
    any.downcast_mut::<W>()
}
