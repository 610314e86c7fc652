//! Minimal publish/subscribe primitive every stage is built on.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A callback receiving broadcast values.
pub type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Wraps a closure into a [`Subscriber`].
pub fn subscriber<T>(f: impl Fn(&T) + 'static) -> Subscriber<T> {
	Rc::new(f)
}

/// Holds the current subscriber list and delivers values to it.
///
/// Registration replaces the whole list (last call wins). Delivery is
/// synchronous and follows registration order.
pub struct Observable<T> {
	subscribers: RefCell<Vec<Subscriber<T>>>,
}

impl<T> Observable<T> {
	/// Empty observable with no subscribers.
	pub fn new() -> Self {
		Self {
			subscribers: RefCell::new(Vec::new()),
		}
	}

	/// Replaces the subscriber list.
	pub fn subscribe(&self, subscribers: Vec<Subscriber<T>>) {
		*self.subscribers.borrow_mut() = subscribers;
	}

	/// Replaces the subscriber list with a single callback.
	pub fn on_update(&self, f: impl Fn(&T) + 'static) {
		self.subscribe(vec![subscriber(f)]);
	}

	/// Number of registered subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.subscribers.borrow().len()
	}

	/// Delivers `value` to every subscriber, in order.
	pub fn broadcast(&self, value: &T) {
		// Subscribers may re-register or trigger nested broadcasts.
		let subscribers = self.subscribers.borrow().clone();
		for subscriber in &subscribers {
			subscriber(value);
		}
	}
}

impl<T> Default for Observable<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for Observable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observable")
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}
