//! Scroll and resize fan-out.
//!
//! The page listens to the underlying window scroll and resize once and
//! relays the new value to every subscriber in registration order. Widgets
//! subscribe themselves and receive `on_scroll` / `on_resize`; anything else
//! may register a plain callback.

use std::fmt;

use tracing::warn;

use crate::{WidgetId, error::Result};

/// Viewport dimensions as broadcast by the resize manager.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels, floored.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

/// Handle returned by a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A broadcast callback.
pub type Callback<T> = Box<dyn FnMut(&T) -> Result<()> + Send>;

/// A registered receiver.
enum Subscriber<T> {
    /// Delivered through the widget's hook.
    Widget(WidgetId),
    /// A free-standing callback.
    Callback(Callback<T>),
}

/// A single-source, many-subscriber relay that remembers the last value.
pub struct Broadcaster<T> {
    /// Most recent broadcast value.
    last: T,
    /// Next subscription id.
    next: u64,
    /// Subscribers in registration order.
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
}

impl<T: fmt::Debug> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("last", &self.last)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: Default> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Broadcaster<T> {
    /// Create a broadcaster seeded with an initial value.
    pub fn new(initial: T) -> Self {
        Self {
            last: initial,
            next: 0,
            subscribers: Vec::new(),
        }
    }

    /// The last value set.
    pub fn last(&self) -> &T {
        &self.last
    }

    /// Record a new value without notifying anyone.
    pub fn set(&mut self, value: T) {
        self.last = value;
    }

    /// Allocate the next id.
    fn alloc(&mut self) -> SubscriptionId {
        self.next += 1;
        SubscriptionId(self.next)
    }

    /// Subscribe a widget.
    pub fn subscribe_widget(&mut self, widget: WidgetId) -> SubscriptionId {
        let id = self.alloc();
        self.subscribers.push((id, Subscriber::Widget(widget)));
        id
    }

    /// Subscribe a callback.
    pub fn subscribe(
        &mut self,
        f: impl FnMut(&T) -> Result<()> + Send + 'static,
    ) -> SubscriptionId {
        let id = self.alloc();
        self.subscribers.push((id, Subscriber::Callback(Box::new(f))));
        id
    }

    /// Remove a subscription. Removing an unknown id is a no-op that returns
    /// false.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(s, _)| *s != id);
        before != self.subscribers.len()
    }

    /// Remove every subscription held by a widget.
    pub fn unsubscribe_widget(&mut self, widget: WidgetId) {
        self.subscribers
            .retain(|(_, s)| !matches!(s, Subscriber::Widget(w) if *w == widget));
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Are there no subscribers?
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Is the subscription still registered?
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.iter().any(|(s, _)| *s == id)
    }

    /// Snapshot of the delivery order. Widget subscribers carry their id.
    pub fn targets(&self) -> Vec<(SubscriptionId, Option<WidgetId>)> {
        self.subscribers
            .iter()
            .map(|(id, s)| match s {
                Subscriber::Widget(w) => (*id, Some(*w)),
                Subscriber::Callback(_) => (*id, None),
            })
            .collect()
    }

    /// Invoke a callback subscriber with the last value. Errors are logged and
    /// swallowed so the remaining subscribers still run.
    pub fn call(&mut self, id: SubscriptionId) {
        let last = &self.last;
        if let Some((_, Subscriber::Callback(f))) =
            self.subscribers.iter_mut().find(|(s, _)| *s == id)
            && let Err(e) = f(last)
        {
            warn!("broadcast subscriber failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use slotmap::SlotMap;

    use super::*;
    use crate::error::Error;

    #[test]
    fn order_and_unsubscribe() {
        let mut ws: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let w = ws.insert(());
        let seen = Arc::new(Mutex::new(vec![]));

        let mut b = Broadcaster::new(0.0_f64);
        let s = seen.clone();
        let a = b.subscribe(move |v| {
            s.lock().unwrap().push(("a", *v));
            Ok(())
        });
        let ws_id = b.subscribe_widget(w);
        let s = seen.clone();
        let c = b.subscribe(move |v| {
            s.lock().unwrap().push(("c", *v));
            Ok(())
        });

        let targets = b.targets();
        assert_eq!(targets, vec![(a, None), (ws_id, Some(w)), (c, None)]);

        b.set(12.0);
        for (id, widget) in b.targets() {
            if widget.is_none() {
                b.call(id);
            }
        }
        assert_eq!(*seen.lock().unwrap(), vec![("a", 12.0), ("c", 12.0)]);

        assert!(b.unsubscribe(a));
        assert!(!b.unsubscribe(a));
        b.unsubscribe_widget(w);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn failing_subscriber_is_isolated() {
        let hits = Arc::new(Mutex::new(0));
        let mut b = Broadcaster::new(Viewport::default());
        let bad = b.subscribe(|_| Err(Error::Invalid("boom".into())));
        let h = hits.clone();
        let good = b.subscribe(move |_| {
            *h.lock().unwrap() += 1;
            Ok(())
        });
        b.call(bad);
        b.call(good);
        assert_eq!(*hits.lock().unwrap(), 1);
    }
}
