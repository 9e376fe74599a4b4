use std::cell::RefCell;
use tracing::Level;

#[ctor::ctor]
fn init_tracing() { let _ = tracing_subscriber::fmt().with_max_level(Level::TRACE).with_test_writer().try_init(); }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(unused)]
pub enum Event {
    Click,
    Hover,
}

thread_local! {
    static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Record a call made by a free-function callback on the current test thread.
#[allow(unused)]
pub fn record(call: String) { CALLS.with(|calls| calls.borrow_mut().push(call)); }

/// Drain the calls recorded so far on the current test thread.
#[allow(unused)]
pub fn calls() -> Vec<String> { CALLS.with(|calls| calls.borrow_mut().drain(..).collect()) }
