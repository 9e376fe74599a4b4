use super::Callback;

/// Wraps a free function. Two static callbacks are the same target when their function pointers
/// compare equal.
///
/// Function addresses are not a reliable identity: distinct functions that compile to identical
/// code may be merged and compare equal, and the same function may have more than one address.
/// Use the [`SubscriptionId`](crate::SubscriptionId) returned on subscribe when exact removal
/// matters.
pub struct StaticCallback<E, P> {
    func: fn(E, P),
}

impl<E, P> StaticCallback<E, P> {
    pub fn new(func: fn(E, P)) -> Self { Self { func } }

    /// Whether this callback wraps `func`.
    pub fn targets(&self, func: fn(E, P)) -> bool { std::ptr::fn_addr_eq(self.func, func) }
}

impl<E, P> PartialEq<fn(E, P)> for StaticCallback<E, P> {
    fn eq(&self, other: &fn(E, P)) -> bool { self.targets(*other) }
}

impl<E: 'static, P: 'static> Callback<E, P> for StaticCallback<E, P> {
    fn invoke(&self, event: E, params: P) -> bool {
        (self.func)(event, params);
        true
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
