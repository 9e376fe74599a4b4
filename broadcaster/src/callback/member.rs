use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::Callback;

/// Wraps an object together with one of its methods.
///
/// The object is held weakly: the broadcaster never keeps a subscriber alive. Once the
/// object is dropped the callback does nothing when invoked, and the broadcaster discards it
/// the next time that event's subscribers change.
pub struct MemberCallback<E, T, P> {
    object: Weak<RefCell<T>>,
    method: fn(&mut T, E, P),
}

impl<E, T, P> MemberCallback<E, T, P> {
    pub fn new(object: &Rc<RefCell<T>>, method: fn(&mut T, E, P)) -> Self { Self { object: Rc::downgrade(object), method } }

    /// Whether this callback binds `method` on this particular `object`.
    pub fn targets(&self, object: &Rc<RefCell<T>>, method: fn(&mut T, E, P)) -> bool {
        std::ptr::fn_addr_eq(self.method, method) && std::ptr::eq(self.object.as_ptr(), Rc::as_ptr(object))
    }

    /// Whether the bound object is still alive.
    pub fn is_alive(&self) -> bool { self.object.strong_count() > 0 }
}

impl<E: 'static, T: 'static, P: 'static> Callback<E, P> for MemberCallback<E, T, P> {
    fn invoke(&self, event: E, params: P) -> bool {
        let Some(object) = self.object.upgrade() else {
            tracing::debug!("member callback target of {} has been dropped; skipping", std::any::type_name::<T>());
            return false;
        };
        // A target that is already borrowed is dispatching into itself.
        let Ok(mut target) = object.try_borrow_mut() else {
            tracing::warn!("member callback target of {} is already borrowed; skipping", std::any::type_name::<T>());
            return false;
        };
        (self.method)(&mut *target, event, params);
        true
    }

    fn is_alive(&self) -> bool { MemberCallback::is_alive(self) }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
