/// How [`Broadcaster::dispatch`](crate::Broadcaster::dispatch) reacts to a callback that panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// The panic unwinds out of `dispatch`; callbacks after the failing one are not invoked.
    #[default]
    Propagate,
    /// The panic is caught and logged, and the remaining callbacks still run.
    Isolate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcasterConfig {
    /// Forget an event key once its last subscriber is removed.
    /// When false (the default) the key stays mapped to an empty sequence.
    pub prune_empty: bool,
    pub dispatch_policy: DispatchPolicy,
}

impl BroadcasterConfig {
    pub fn new(prune_empty: bool, dispatch_policy: DispatchPolicy) -> Self { Self { prune_empty, dispatch_policy } }

    /// Keep empty keys and let panics propagate
    pub fn retaining() -> Self { Self::new(false, DispatchPolicy::Propagate) }

    /// Drop empty keys on last unsubscribe
    pub fn pruning() -> Self { Self::new(true, DispatchPolicy::Propagate) }

    /// Keep dispatching past a panicking callback
    pub fn isolating() -> Self { Self::new(false, DispatchPolicy::Isolate) }
}
