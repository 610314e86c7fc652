//! The decorator seam shared by data pipelines and graph chains.
//!
//! A chain is built bottom-up: every decorator owns its upstream stage and
//! registers itself as that stage's only subscriber. `send_update` travels
//! down to the source, and the resulting update flows back up, each decorator
//! caching what it saw, recomputing its view and broadcasting it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ChartError, Result};
use crate::observable::{Observable, Subscriber, subscriber};

/// One link of a decorator chain.
pub trait Stage {
	/// Payload broadcast to subscribers.
	type Update: Clone + 'static;

	/// Replaces the subscriber list of this stage.
	fn subscribe(&self, subscribers: Vec<Subscriber<Self::Update>>);

	/// Asks the chain to recompute and broadcast from its source.
	fn send_update(&self) -> Result<()>;

	/// Replaces the subscriber list with a single callback.
	fn on_update(&self, f: impl Fn(&Self::Update) + 'static)
	where
		Self: Sized,
	{
		self.subscribe(vec![subscriber(f)]);
	}
}

/// Derives a decorator's view from the latest upstream update.
///
/// Settings live inside the transform (usually in `Cell`s) so mutators can
/// change them through a shared reference.
pub trait Transform: 'static {
	/// Payload of the chain the transform sits in.
	type Update: Clone + 'static;

	/// Derived view of one upstream update.
	fn apply(&self, update: Self::Update) -> Self::Update;
}

/// Cached state behind a decorator, shared with its upstream subscription.
pub(crate) struct Relay<T: Transform> {
	transform: T,
	last_seen: RefCell<Option<T::Update>>,
	observable: Observable<T::Update>,
}

impl<T: Transform> Relay<T> {
	fn receive(&self, update: &T::Update) {
		*self.last_seen.borrow_mut() = Some(update.clone());
		self.publish_cached();
	}

	fn publish_cached(&self) {
		let Some(update) = self.last_seen.borrow().clone() else {
			return;
		};
		let derived = self.transform.apply(update);
		self.observable.broadcast(&derived);
	}

	fn ensure_primed(&self) -> Result<()> {
		match *self.last_seen.borrow() {
			Some(_) => Ok(()),
			None => Err(ChartError::NoDataYet),
		}
	}

	/// Recomputes from the cache, failing when nothing was seen yet.
	fn republish(&self) -> Result<()> {
		self.ensure_primed()?;
		self.publish_cached();
		Ok(())
	}

	fn last_seen(&self) -> Option<T::Update> {
		self.last_seen.borrow().clone()
	}
}

/// A decorator: `transform` applied to everything `upstream` broadcasts.
pub struct Decorated<S, T: Transform> {
	upstream: S,
	relay: Rc<Relay<T>>,
}

impl<S, T> Decorated<S, T>
where
	S: Stage,
	T: Transform<Update = S::Update>,
{
	/// Wraps `upstream` and subscribes to it.
	pub fn new(upstream: S, transform: T) -> Self {
		let relay = Rc::new(Relay {
			transform,
			last_seen: RefCell::new(None),
			observable: Observable::new(),
		});
		let weak = Rc::downgrade(&relay);
		upstream.on_update(move |update| {
			if let Some(relay) = weak.upgrade() {
				relay.receive(update);
			}
		});
		Self { upstream, relay }
	}

	/// The wrapped stage.
	pub fn upstream(&self) -> &S {
		&self.upstream
	}

	/// Settings of this decorator.
	pub fn transform(&self) -> &T {
		&self.relay.transform
	}

	/// Re-derives and rebroadcasts the cached upstream update.
	pub fn republish(&self) -> Result<()> {
		self.relay.republish()
	}

	/// Fails with [`ChartError::NoDataYet`] until an upstream update arrived.
	pub(crate) fn ensure_primed(&self) -> Result<()> {
		self.relay.ensure_primed()
	}

	/// Latest upstream update, before this decorator's transform.
	pub(crate) fn last_seen(&self) -> Option<T::Update> {
		self.relay.last_seen()
	}
}

impl<S, T> Stage for Decorated<S, T>
where
	S: Stage,
	T: Transform<Update = S::Update>,
{
	type Update = S::Update;

	fn subscribe(&self, subscribers: Vec<Subscriber<Self::Update>>) {
		self.relay.observable.subscribe(subscribers);
	}

	fn send_update(&self) -> Result<()> {
		self.upstream.send_update()
	}
}
