/*!
A keyed publish/subscribe broadcaster.

Subscribe free functions, methods bound to an object, or closures to named events, then
dispatch an event to invoke every callback currently subscribed to it, in subscription order.

# Basic usage

```rust
use broadcaster::Broadcaster;

fn update(event: &'static str, value: i32) { println!("{event}: update({value})"); }

let mut broadcaster = Broadcaster::<&'static str, i32>::new();
broadcaster.subscribe("click", update);
broadcaster.dispatch("click", 5); // click: update(5)
broadcaster.dispatch("hover", 5); // nobody listens, nothing happens
```

# Bound methods

Objects are shared as `Rc<RefCell<T>>` and held weakly, so subscribing never keeps an object
alive. Unsubscribe before dropping the object; a dropped target is skipped on dispatch.

```rust
use std::{cell::RefCell, rc::Rc};
use broadcaster::Broadcaster;

#[derive(Default)]
struct Clicks {
    total: i32,
}

impl Clicks {
    fn on_click(&mut self, _event: &'static str, (x, y): (i32, i32)) { self.total += x + y; }
}

let clicks = Rc::new(RefCell::new(Clicks::default()));
let mut broadcaster = Broadcaster::<&'static str, (i32, i32)>::new();
broadcaster.subscribe_method("click", &clicks, Clicks::on_click);
broadcaster.dispatch("click", (1, 2));
assert_eq!(clicks.borrow().total, 3);

broadcaster.unsubscribe_method(&"click", &clicks, Clicks::on_click);
broadcaster.dispatch("click", (1, 2));
assert_eq!(clicks.borrow().total, 3);
```

# Panicking callbacks

By default a panic in one callback unwinds out of `dispatch` and the callbacks after it are not
invoked. [`Broadcaster::try_dispatch`] and [`DispatchPolicy::Isolate`] keep going and report the
failures instead.
*/

mod broadcaster;
mod callback;
mod config;
mod error;
mod registry;

pub use broadcaster::*;
pub use callback::*;
pub use config::*;
pub use error::{CallbackFailure, DispatchError};
pub use registry::SubscriptionId;
