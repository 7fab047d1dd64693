//! Reducer store engine.
//!
//! A [`Store`] pairs an immutable state snapshot with a pure [`Reducer`].
//! Every dispatch computes the next snapshot and replaces the stored one
//! wholesale; readers hold `Arc` snapshots, so comparing two snapshots with
//! [`Arc::ptr_eq`] tells whether anything changed.
//!
//! Stores come in two variants that differ only in subscription support:
//!
//! | Variant | Lifetime | `subscribe` |
//! |---------|----------|-------------|
//! | [`StoreMode::Server`] | one request | returns a no-op [`Subscription`] |
//! | [`StoreMode::Client`] | whole page | listeners run after each state change |

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};

/// Pure state-transition function for one domain.
pub trait Reducer: Send + Sync + 'static {
	/// Domain state.
	type State: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;
	/// Action type accepted by [`Store::dispatch`].
	type Action: fmt::Debug;

	/// Store name used in logs and errors.
	const NAME: &'static str;

	/// Computes the next state.
	///
	/// Returns `None` when the action does not concern this reducer; the
	/// store then keeps the current snapshot untouched. Reducers must not
	/// dispatch.
	fn reduce(&self, state: &Self::State, action: &Self::Action) -> Option<Self::State>;
}

/// Whether a store notifies subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
	/// Per-request store without subscriptions.
	Server,
	/// Long-lived store with synchronous subscriber notification.
	Client,
}

/// Errors raised by [`Store::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	/// A dispatch reached the store while it was still reducing.
	#[error("dispatch re-entered store `{store}` while it was reducing")]
	ReentrantDispatch {
		/// Name of the store.
		store: &'static str,
	},
}

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Listeners {
	next_id: u64,
	entries: Vec<(u64, Listener)>,
}

struct Inner<R: Reducer> {
	reducer: R,
	state: RwLock<Arc<R::State>>,
	listeners: Option<Arc<Mutex<Listeners>>>,
	// Serializes dispatches across threads; the flag catches re-entry from
	// the thread already holding the lock.
	reducing: ReentrantMutex<Cell<bool>>,
}

/// Clears the reducing flag even if the reducer panics.
struct ReducingGuard<'a>(&'a Cell<bool>);

impl Drop for ReducingGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

/// A reducer store handle. Clones share the same state.
pub struct Store<R: Reducer> {
	inner: Arc<Inner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<R: Reducer> fmt::Debug for Store<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Store")
			.field("name", &R::NAME)
			.field("mode", &self.mode())
			.field("state", &self.get_state())
			.finish()
	}
}

impl<R: Reducer> Store<R> {
	/// Creates a store.
	pub fn new(mode: StoreMode, initial: R::State, reducer: R) -> Self {
		let listeners = match mode {
			StoreMode::Server => None,
			StoreMode::Client => Some(Arc::new(Mutex::new(Listeners::default()))),
		};
		Self {
			inner: Arc::new(Inner {
				reducer,
				state: RwLock::new(Arc::new(initial)),
				listeners,
				reducing: ReentrantMutex::new(Cell::new(false)),
			}),
		}
	}

	/// Creates a per-request store without subscriptions.
	pub fn server(initial: R::State, reducer: R) -> Self {
		Self::new(StoreMode::Server, initial, reducer)
	}

	/// Creates a long-lived store with subscriptions.
	pub fn client(initial: R::State, reducer: R) -> Self {
		Self::new(StoreMode::Client, initial, reducer)
	}

	/// Returns the store variant.
	pub fn mode(&self) -> StoreMode {
		if self.inner.listeners.is_some() {
			StoreMode::Client
		} else {
			StoreMode::Server
		}
	}

	/// Returns the current snapshot.
	pub fn get_state(&self) -> Arc<R::State> {
		Arc::clone(&self.inner.state.read())
	}

	/// Dispatches an action.
	pub fn dispatch(&self, action: impl Into<R::Action>) -> Result<(), StoreError> {
		self.dispatch_ref(&action.into())
	}

	/// Dispatches a borrowed action.
	///
	/// The snapshot is replaced before any subscriber runs, so listeners
	/// calling [`get_state`](Self::get_state) observe the new value.
	/// Subscribers are only notified when the reducer produced a new state.
	///
	/// # Errors
	///
	/// Returns [`StoreError::ReentrantDispatch`] when called from inside this
	/// store's reducer. Dispatches from other threads wait instead.
	pub fn dispatch_ref(&self, action: &R::Action) -> Result<(), StoreError> {
		{
			let reducing = self.inner.reducing.lock();
			if reducing.replace(true) {
				return Err(StoreError::ReentrantDispatch { store: R::NAME });
			}
			let _guard = ReducingGuard(&reducing);
			let current = self.get_state();
			let Some(next) = self.inner.reducer.reduce(&current, action) else {
				tracing::trace!(store = R::NAME, ?action, "action ignored");
				return Ok(());
			};
			*self.inner.state.write() = Arc::new(next);
		}

		tracing::trace!(store = R::NAME, ?action, "state replaced");
		self.notify();
		Ok(())
	}

	/// Registers a listener called with no arguments after each state change.
	///
	/// Listeners run synchronously in subscription order. On a server store
	/// the listener is dropped and a no-op subscription is returned.
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn() + Send + Sync + 'static,
	{
		let Some(listeners) = &self.inner.listeners else {
			return Subscription::noop();
		};

		let mut guard = listeners.lock();
		let id = guard.next_id;
		guard.next_id += 1;
		guard.entries.push((id, Arc::new(listener)));

		Subscription {
			target: Some((Arc::downgrade(listeners), id)),
		}
	}

	/// Returns the number of registered listeners.
	pub fn subscriber_count(&self) -> usize {
		self.inner
			.listeners
			.as_ref()
			.map_or(0, |listeners| listeners.lock().entries.len())
	}

	fn notify(&self) {
		let Some(listeners) = &self.inner.listeners else {
			return;
		};
		// Snapshot so listeners may (un)subscribe or dispatch without deadlocking.
		let snapshot: Vec<Listener> = listeners
			.lock()
			.entries
			.iter()
			.map(|(_, listener)| Arc::clone(listener))
			.collect();
		for listener in snapshot {
			listener();
		}
	}
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Debug, Clone, Default)]
pub struct Subscription {
	target: Option<(Weak<Mutex<Listeners>>, u64)>,
}

impl fmt::Debug for Listeners {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Listeners")
			.field("count", &self.entries.len())
			.finish()
	}
}

impl Subscription {
	/// A subscription that is not attached to any store.
	pub fn noop() -> Self {
		Self::default()
	}

	/// Returns whether this handle refers to a client store listener.
	pub fn is_active(&self) -> bool {
		self.target.as_ref().is_some_and(|(listeners, id)| {
			listeners
				.upgrade()
				.is_some_and(|listeners| listeners.lock().entries.iter().any(|(entry, _)| entry == id))
		})
	}

	/// Removes the listener. Calling it again is a no-op.
	pub fn unsubscribe(&self) {
		let Some((listeners, id)) = &self.target else {
			return;
		};
		if let Some(listeners) = listeners.upgrade() {
			listeners.lock().entries.retain(|(entry, _)| entry != id);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Debug)]
	enum CounterAction {
		Add(i64),
		Reset,
		Ignored,
	}

	struct CounterReducer;

	impl Reducer for CounterReducer {
		type State = i64;
		type Action = CounterAction;
		const NAME: &'static str = "counter";

		fn reduce(&self, state: &i64, action: &CounterAction) -> Option<i64> {
			match action {
				CounterAction::Add(n) => Some(state + n),
				CounterAction::Reset => Some(0),
				CounterAction::Ignored => None,
			}
		}
	}

	#[rstest]
	fn test_dispatch_replaces_snapshot() {
		let store = Store::server(1, CounterReducer);
		let before = store.get_state();
		store.dispatch(CounterAction::Add(2)).unwrap();
		let after = store.get_state();

		assert_eq!(*before, 1);
		assert_eq!(*after, 3);
		assert!(!Arc::ptr_eq(&before, &after));
	}

	#[rstest]
	#[case(StoreMode::Server)]
	#[case(StoreMode::Client)]
	fn test_unhandled_action_keeps_snapshot(#[case] mode: StoreMode) {
		let store = Store::new(mode, 5, CounterReducer);
		let before = store.get_state();
		store.dispatch(CounterAction::Ignored).unwrap();
		assert!(Arc::ptr_eq(&before, &store.get_state()));
	}

	#[rstest]
	fn test_server_store_has_no_subscriptions() {
		let store = Store::server(0, CounterReducer);
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let sub = store.subscribe(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		store.dispatch(CounterAction::Add(1)).unwrap();

		assert_eq!(store.mode(), StoreMode::Server);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert!(!sub.is_active());
		sub.unsubscribe();
	}

	#[rstest]
	fn test_listeners_see_new_state_in_order() {
		let store = Store::client(0, CounterReducer);
		let seen = Arc::new(Mutex::new(Vec::new()));

		for tag in ["first", "second"] {
			let store_handle = store.clone();
			let seen = Arc::clone(&seen);
			store.subscribe(move || seen.lock().push((tag, *store_handle.get_state())));
		}

		store.dispatch(CounterAction::Add(7)).unwrap();

		assert_eq!(*seen.lock(), vec![("first", 7), ("second", 7)]);
	}

	#[rstest]
	fn test_no_notification_without_change() {
		let store = Store::client(0, CounterReducer);
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		store.subscribe(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		store.dispatch(CounterAction::Ignored).unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 0);
		store.dispatch(CounterAction::Reset).unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	fn test_unsubscribe_is_idempotent() {
		let store = Store::client(0, CounterReducer);
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let sub = store.subscribe(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		assert!(sub.is_active());
		sub.unsubscribe();
		sub.unsubscribe();
		store.dispatch(CounterAction::Add(1)).unwrap();

		assert!(!sub.is_active());
		assert_eq!(store.subscriber_count(), 0);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[rstest]
	fn test_listener_may_unsubscribe_itself() {
		let store = Store::client(0, CounterReducer);
		let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
		let slot_in_listener = Arc::clone(&slot);
		let sub = store.subscribe(move || {
			if let Some(sub) = slot_in_listener.lock().as_ref() {
				sub.unsubscribe();
			}
		});
		*slot.lock() = Some(sub);

		store.dispatch(CounterAction::Add(1)).unwrap();
		assert_eq!(store.subscriber_count(), 0);
	}

	#[rstest]
	fn test_listener_may_dispatch_after_replacement() {
		let store = Store::client(0, CounterReducer);
		let handle = store.clone();
		store.subscribe(move || {
			if *handle.get_state() == 1 {
				handle.dispatch(CounterAction::Add(10)).unwrap();
			}
		});

		store.dispatch(CounterAction::Add(1)).unwrap();
		assert_eq!(*store.get_state(), 11);
	}

	#[rstest]
	fn test_dispatch_from_other_threads_is_serialized() {
		let store = Store::client(0, CounterReducer);
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let store = store.clone();
				std::thread::spawn(move || {
					for _ in 0..250 {
						store.dispatch(CounterAction::Add(1)).unwrap();
					}
				})
			})
			.collect();
		for handle in handles {
			handle.join().unwrap();
		}
		assert_eq!(*store.get_state(), 1000);
	}

	struct SelfDispatchingReducer {
		me: std::sync::OnceLock<Store<SelfDispatchingReducer>>,
		observed: Mutex<Option<Result<(), StoreError>>>,
	}

	impl Reducer for SelfDispatchingReducer {
		type State = i64;
		type Action = CounterAction;
		const NAME: &'static str = "self-dispatching";

		fn reduce(&self, state: &i64, _action: &CounterAction) -> Option<i64> {
			if let Some(store) = self.me.get() {
				*self.observed.lock() = Some(store.dispatch(CounterAction::Reset));
			}
			Some(state + 1)
		}
	}

	#[rstest]
	fn test_dispatch_from_reducer_is_rejected() {
		let store = Store::client(
			0,
			SelfDispatchingReducer {
				me: std::sync::OnceLock::new(),
				observed: Mutex::new(None),
			},
		);
		let _ = store.inner.reducer.me.set(store.clone());

		store.dispatch(CounterAction::Add(1)).unwrap();

		assert_eq!(*store.get_state(), 1);
		assert_eq!(
			*store.inner.reducer.observed.lock(),
			Some(Err(StoreError::ReentrantDispatch {
				store: "self-dispatching"
			}))
		);
		// The flag is cleared once the outer dispatch finishes.
		store.dispatch(CounterAction::Add(1)).unwrap();
		assert_eq!(*store.get_state(), 2);
	}
}
