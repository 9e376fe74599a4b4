use std::collections::HashMap;
use std::hash::Hash;

use crate::callback::Callback;

/// Identifies one subscription. Issued by a [`Broadcaster`](crate::Broadcaster) on every
/// subscribe and never reused by that broadcaster.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(usize);

impl From<SubscriptionId> for usize {
    fn from(id: SubscriptionId) -> Self { id.0 }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

pub(crate) struct Entry<E, P> {
    pub id: SubscriptionId,
    pub callback: Box<dyn Callback<E, P>>,
}

/// Event key to insertion-ordered subscriber sequence.
///
/// Keys are created lazily on first subscribe. Removing the last entry leaves the key mapped to an
/// empty sequence unless the caller prunes it.
pub(crate) struct Registry<E, P> {
    events: HashMap<E, Vec<Entry<E, P>>>,
    next_id: usize,
}

impl<E: Eq + Hash, P> Registry<E, P> {
    pub fn new() -> Self { Self { events: HashMap::new(), next_id: 0 } }

    /// Make sure `event` has a sequence. Returns true if it was created by this call.
    pub fn ensure(&mut self, event: E) -> bool {
        match self.events.entry(event) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(v) => {
                v.insert(Vec::new());
                true
            }
        }
    }

    pub fn entries(&self, event: &E) -> Option<&[Entry<E, P>]> { self.events.get(event).map(Vec::as_slice) }

    /// Append a callback to the end of `event`'s sequence, creating the sequence if needed.
    pub fn push(&mut self, event: E, callback: Box<dyn Callback<E, P>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.events.entry(event).or_default().push(Entry { id, callback });
        id
    }

    /// Remove the first entry of `event` whose callback satisfies `predicate`.
    pub fn remove_first<F>(&mut self, event: &E, predicate: F) -> Option<SubscriptionId>
    where F: Fn(&dyn Callback<E, P>) -> bool {
        let entries = self.events.get_mut(event)?;
        let index = entries.iter().position(|entry| predicate(entry.callback.as_ref()))?;
        Some(entries.remove(index).id)
    }

    pub fn remove_id(&mut self, event: &E, id: SubscriptionId) -> bool {
        let Some(entries) = self.events.get_mut(event) else { return false };
        match entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every entry of `event` whose target is gone. Returns how many were dropped.
    pub fn remove_dead(&mut self, event: &E) -> usize {
        let Some(entries) = self.events.get_mut(event) else { return 0 };
        let before = entries.len();
        entries.retain(|entry| entry.callback.is_alive());
        before - entries.len()
    }

    /// Drop `event` from the map if its sequence is empty. Returns true if the key was removed.
    pub fn prune(&mut self, event: &E) -> bool {
        if self.events.get(event).is_some_and(Vec::is_empty) {
            self.events.remove(event);
            true
        } else {
            false
        }
    }

    pub fn len(&self, event: &E) -> usize { self.events.get(event).map_or(0, Vec::len) }
}

impl<E, P> Registry<E, P> {
    pub fn event_count(&self) -> usize { self.events.len() }

    /// Release every callback and forget every key. Returns how many callbacks were released.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        for entries in self.events.values_mut() {
            released += entries.len();
            entries.clear();
        }
        self.events.clear();
        released
    }
}
