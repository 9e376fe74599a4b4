mod closure;
mod member;
mod static_fn;

pub use closure::ClosureCallback;
pub use member::MemberCallback;
pub use static_fn::StaticCallback;

/// Something that can be invoked with an event and its parameters.
///
/// The registry stores every kind of subscriber behind this one trait, so a single ordered
/// sequence can hold free functions, bound methods and closures side by side.
pub trait Callback<E, P> {
    /// Run the wrapped target. Returns false if the target could not be reached and nothing ran.
    fn invoke(&self, event: E, params: P) -> bool;

    /// Whether invoking can still reach the target. Entries that report false are dropped the
    /// next time their event's subscribers are modified.
    fn is_alive(&self) -> bool { true }

    /// Used to find a specific variant again when unsubscribing or replacing.
    #[doc(hidden)]
    fn as_any(&self) -> &dyn std::any::Any;
}
