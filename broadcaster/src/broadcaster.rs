use std::cell::RefCell;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use crate::callback::{Callback, ClosureCallback, MemberCallback, StaticCallback};
use crate::config::{BroadcasterConfig, DispatchPolicy};
use crate::error::{CallbackFailure, DispatchError, panic_message};
use crate::registry::{Registry, SubscriptionId};

/// Notifies every callback subscribed to an event when that event is dispatched.
///
/// `E` names the event channel, `P` is the parameter list handed to every callback (use a tuple
/// for more than one value). Each callback receives the event and a clone of the parameters, in
/// the order the callbacks were subscribed.
///
/// A broadcaster owns the callbacks it creates and releases them on unsubscribe, replacement or
/// drop. It is deliberately not `Clone`. It does no locking either; share it across threads only
/// behind your own synchronization.
pub struct Broadcaster<E, P> {
    registry: Registry<E, P>,
    config: BroadcasterConfig,
}

impl<E, P> Default for Broadcaster<E, P>
where
    E: Eq + Hash + Clone + 'static,
    P: Clone + 'static,
{
    fn default() -> Self { Self::new() }
}

impl<E, P> Broadcaster<E, P>
where
    E: Eq + Hash + Clone + 'static,
    P: Clone + 'static,
{
    pub fn new() -> Self { Self::with_config(BroadcasterConfig::default()) }

    pub fn with_config(config: BroadcasterConfig) -> Self { Self { registry: Registry::new(), config } }

    pub fn config(&self) -> &BroadcasterConfig { &self.config }

    /// Subscribe a free function to `event`.
    ///
    /// If the same function is already subscribed to `event`, the old entry is removed and the
    /// function moves to the end of the sequence. "Same" means the function pointers compare
    /// equal; distinct functions with identical bodies may be merged by the compiler and then
    /// count as the same. Keep the returned id and use [`unsubscribe_id`](Self::unsubscribe_id)
    /// when exact removal matters.
    pub fn subscribe(&mut self, event: E, callback: fn(E, P)) -> SubscriptionId {
        if !self.registry.ensure(event.clone()) {
            self.sweep(&event);
            self.replace(&event, |existing| is_static(existing, callback));
        }
        self.append(event, Box::new(StaticCallback::new(callback)))
    }

    /// Subscribe `method` bound to `object`.
    ///
    /// Only a weak reference to `object` is kept. Subscribing the same method on the same object
    /// again replaces the earlier entry; the same method on a different object is a separate
    /// subscriber.
    pub fn subscribe_method<T: 'static>(&mut self, event: E, object: &Rc<RefCell<T>>, method: fn(&mut T, E, P)) -> SubscriptionId {
        if !self.registry.ensure(event.clone()) {
            self.sweep(&event);
            self.replace(&event, |existing| is_member(existing, object, method));
        }
        self.append(event, Box::new(MemberCallback::new(object, method)))
    }

    /// Subscribe a closure. Closures are never deduplicated; keep the returned id to unsubscribe.
    pub fn subscribe_fn<F>(&mut self, event: E, f: F) -> SubscriptionId
    where F: Fn(E, P) + 'static {
        self.sweep(&event);
        self.append(event, Box::new(ClosureCallback::new(f)))
    }

    /// Remove `callback` from `event`. Returns whether anything was removed.
    ///
    /// Matches by function pointer, with the same caveat as [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&mut self, event: &E, callback: fn(E, P)) -> bool {
        self.sweep(event);
        let removed = self.registry.remove_first(event, |existing| is_static(existing, callback));
        self.removed(event, removed)
    }

    /// Remove `method` bound to `object` from `event`. Returns whether anything was removed.
    pub fn unsubscribe_method<T: 'static>(&mut self, event: &E, object: &Rc<RefCell<T>>, method: fn(&mut T, E, P)) -> bool {
        self.sweep(event);
        let removed = self.registry.remove_first(event, |existing| is_member(existing, object, method));
        self.removed(event, removed)
    }

    /// Remove the subscription `id` from `event`. Returns whether anything was removed.
    pub fn unsubscribe_id(&mut self, event: &E, id: SubscriptionId) -> bool {
        self.sweep(event);
        let removed = self.registry.remove_id(event, id).then_some(id);
        self.removed(event, removed)
    }

    /// Invoke every callback subscribed to `event`, in subscription order.
    ///
    /// Dispatching an event nobody subscribed to does nothing. What happens when a callback
    /// panics depends on [`BroadcasterConfig::dispatch_policy`].
    pub fn dispatch(&self, event: E, params: P) {
        match self.config.dispatch_policy {
            DispatchPolicy::Propagate => self.invoke_all(event, params),
            DispatchPolicy::Isolate => {
                if let Err(err) = self.try_dispatch(event, params) {
                    tracing::warn!("{}", err);
                }
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch), but every callback runs even if an earlier one panics.
    ///
    /// Returns the number of callbacks that actually ran, or an error listing the ones that
    /// panicked. Bound methods whose object is gone or already borrowed are skipped and not
    /// counted; a callback that panicked counts as invoked.
    pub fn try_dispatch(&self, event: E, params: P) -> Result<usize, DispatchError> {
        let Some(entries) = self.registry.entries(&event) else {
            tracing::trace!("dispatch: no subscribers");
            return Ok(0);
        };

        let mut invoked = 0;
        let mut failures = Vec::new();
        for entry in entries {
            let (e, p) = (event.clone(), params.clone());
            match std::panic::catch_unwind(AssertUnwindSafe(|| entry.callback.invoke(e, p))) {
                Ok(ran) => invoked += usize::from(ran),
                Err(payload) => {
                    invoked += 1;
                    let message = panic_message(&*payload);
                    tracing::warn!("subscription {} panicked during dispatch: {}", entry.id, message);
                    failures.push(CallbackFailure { id: entry.id, message });
                }
            }
        }

        if failures.is_empty() {
            Ok(invoked)
        } else {
            Err(DispatchError::CallbacksPanicked { invoked, failures })
        }
    }

    fn invoke_all(&self, event: E, params: P) {
        let Some(entries) = self.registry.entries(&event) else {
            tracing::trace!("dispatch: no subscribers");
            return;
        };
        tracing::trace!("dispatch to {} subscribers", entries.len());

        // clone for each subscriber except the last one
        if let Some((last, rest)) = entries.split_last() {
            for entry in rest {
                entry.callback.invoke(event.clone(), params.clone());
            }
            last.callback.invoke(event, params);
        }
    }

    fn append(&mut self, event: E, callback: Box<dyn Callback<E, P>>) -> SubscriptionId {
        let id = self.registry.push(event.clone(), callback);
        tracing::trace!("subscribed {} ({} subscribers on its event)", id, self.registry.len(&event));
        id
    }

    fn sweep(&mut self, event: &E) {
        let dropped = self.registry.remove_dead(event);
        if dropped > 0 {
            tracing::debug!("dropped {} subscriptions whose target is gone", dropped);
            if self.config.prune_empty && self.registry.prune(event) {
                tracing::debug!("pruned empty event");
            }
        }
    }

    // Only reached when the sequence already existed. A sequence created by the current call is
    // empty, so there is nothing to replace.
    fn replace<F>(&mut self, event: &E, matches: F)
    where F: Fn(&dyn Callback<E, P>) -> bool {
        if let Some(old) = self.registry.remove_first(event, matches) {
            tracing::debug!("replacing subscription {}", old);
        }
    }

    fn removed(&mut self, event: &E, removed: Option<SubscriptionId>) -> bool {
        let Some(id) = removed else {
            tracing::trace!("unsubscribe: no matching subscriber");
            return false;
        };
        tracing::trace!("unsubscribed {}", id);
        if self.config.prune_empty && self.registry.prune(event) {
            tracing::debug!("pruned empty event after unsubscribing {}", id);
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn registry(&self) -> &Registry<E, P> { &self.registry }
}

fn is_static<E: 'static, P: 'static>(existing: &dyn Callback<E, P>, callback: fn(E, P)) -> bool {
    existing.as_any().downcast_ref::<StaticCallback<E, P>>().is_some_and(|existing| existing.targets(callback))
}

fn is_member<E: 'static, T: 'static, P: 'static>(existing: &dyn Callback<E, P>, object: &Rc<RefCell<T>>, method: fn(&mut T, E, P)) -> bool {
    existing.as_any().downcast_ref::<MemberCallback<E, T, P>>().is_some_and(|existing| existing.targets(object, method))
}

impl<E, P> Debug for Broadcaster<E, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster").field("events", &self.registry.event_count()).field("config", &self.config).finish()
    }
}

impl<E, P> Drop for Broadcaster<E, P> {
    fn drop(&mut self) {
        let released = self.registry.clear();
        tracing::trace!("broadcaster dropped, released {} callbacks", released);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static HITS: Cell<(u32, u32)> = const { Cell::new((0, 0)) };
    }

    fn noop(_event: &'static str, _params: ()) { HITS.with(|hits| hits.set((hits.get().0 + 1, hits.get().1))); }
    fn other(_event: &'static str, _params: ()) { HITS.with(|hits| hits.set((hits.get().0, hits.get().1 + 1))); }

    #[test]
    fn test_distinct_functions_stay_distinct() {
        HITS.with(|hits| hits.set((0, 0)));
        let mut broadcaster = Broadcaster::<&'static str, ()>::new();
        broadcaster.subscribe("a", noop);
        broadcaster.subscribe("a", other);
        broadcaster.dispatch("a", ());
        assert_eq!(HITS.with(Cell::get), (1, 1));
    }

    #[test]
    fn test_dead_member_entries_are_swept_on_change() {
        struct Target;
        impl Target {
            fn handle(&mut self, _event: &'static str, _params: ()) {}
        }

        let mut broadcaster = Broadcaster::<&'static str, ()>::new();
        let targets: Vec<_> = (0..100).map(|_| Rc::new(RefCell::new(Target))).collect();
        for target in &targets {
            broadcaster.subscribe_method("a", target, Target::handle);
        }
        drop(targets);
        // nothing has changed the event since the targets died
        assert_eq!(broadcaster.registry().len(&"a"), 100);
        assert_eq!(broadcaster.try_dispatch("a", ()).unwrap(), 0);

        let live = Rc::new(RefCell::new(Target));
        broadcaster.subscribe_method("a", &live, Target::handle);
        assert_eq!(broadcaster.registry().len(&"a"), 1);
        assert_eq!(broadcaster.try_dispatch("a", ()).unwrap(), 1);
    }

    #[test]
    fn test_sweep_prunes_when_configured() {
        struct Target;
        impl Target {
            fn handle(&mut self, _event: &'static str, _params: ()) {}
        }

        let mut broadcaster = Broadcaster::<&'static str, ()>::with_config(BroadcasterConfig::pruning());
        let target = Rc::new(RefCell::new(Target));
        broadcaster.subscribe_method("a", &target, Target::handle);
        drop(target);

        assert!(!broadcaster.unsubscribe(&"a", noop));
        assert!(broadcaster.registry().entries(&"a").is_none());
    }

    #[test]
    fn test_subscribe_creates_key_lazily() {
        let mut broadcaster = Broadcaster::<&'static str, ()>::new();
        assert!(broadcaster.registry().entries(&"a").is_none());
        broadcaster.subscribe("a", noop);
        assert_eq!(broadcaster.registry().len(&"a"), 1);
    }

    #[test]
    fn test_resubscribe_replaces_entry() {
        let mut broadcaster = Broadcaster::<&'static str, ()>::new();
        let first = broadcaster.subscribe("a", noop);
        broadcaster.subscribe("a", other);
        let again = broadcaster.subscribe("a", noop);

        assert_ne!(first, again);
        let ids: Vec<_> = broadcaster.registry().entries(&"a").unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1], again);
        assert!(!broadcaster.unsubscribe_id(&"a", first));
    }

    #[test]
    fn test_empty_key_is_retained_by_default() {
        let mut broadcaster = Broadcaster::<&'static str, ()>::new();
        broadcaster.subscribe("a", noop);
        assert!(broadcaster.unsubscribe(&"a", noop));
        assert!(broadcaster.registry().entries(&"a").is_some());
        assert_eq!(broadcaster.registry().len(&"a"), 0);
    }

    #[test]
    fn test_empty_key_is_pruned_when_configured() {
        let mut broadcaster = Broadcaster::<&'static str, ()>::with_config(BroadcasterConfig::pruning());
        broadcaster.subscribe("a", noop);
        broadcaster.subscribe("a", other);
        assert!(broadcaster.unsubscribe(&"a", noop));
        assert!(broadcaster.registry().entries(&"a").is_some());
        assert!(broadcaster.unsubscribe(&"a", other));
        assert!(broadcaster.registry().entries(&"a").is_none());
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let mut broadcaster = Broadcaster::<&'static str, ()>::new();
        assert!(!broadcaster.unsubscribe(&"a", noop));
        broadcaster.subscribe("a", noop);
        assert!(!broadcaster.unsubscribe(&"a", other));
        assert_eq!(broadcaster.registry().len(&"a"), 1);
    }
}
