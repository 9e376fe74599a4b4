use super::Callback;

/// Wraps an arbitrary closure. Closures have no comparable identity, so they are never
/// deduplicated and can only be removed through their [`SubscriptionId`](crate::SubscriptionId).
pub struct ClosureCallback<E, P>(Box<dyn Fn(E, P)>);

impl<E, P> ClosureCallback<E, P> {
    pub fn new<F>(f: F) -> Self
    where F: Fn(E, P) + 'static {
        Self(Box::new(f))
    }
}

impl<E: 'static, P: 'static> Callback<E, P> for ClosureCallback<E, P> {
    fn invoke(&self, event: E, params: P) -> bool {
        (self.0)(event, params);
        true
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
