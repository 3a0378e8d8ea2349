use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Computes the state following an action. Reducers never mutate
/// in place; the store swaps in what they return.
pub trait Reducer: Clone {
  type Action;

  #[must_use]
  fn reduce(self, action: &Self::Action) -> Self;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback type for state change notifications.
pub type ChangeHandler<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Holds the state of type `S` and routes every change through its
/// [`Reducer`].
///
/// - `dispatch(action)` reduces the current state and notifies every
///   subscriber with the new one.
/// - `state()` returns a snapshot.
/// - `subscribe(handler)` registers a change handler.
/// - `unsubscribe(id)` removes it.
pub struct Store<S: Reducer> {
  state: RwLock<S>,
  handlers: RwLock<Vec<(SubscriptionId, ChangeHandler<S>)>>,
  next_id: AtomicU64,
}

impl<S: Reducer> Store<S> {
  pub fn new(initial: S) -> Self {
    Self {
      state: RwLock::new(initial),
      handlers: RwLock::new(Vec::new()),
      next_id: AtomicU64::new(1),
    }
  }

  #[must_use]
  pub fn state(&self) -> S {
    self
      .state
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Dispatches run one at a time. Handlers are called after the
  /// new state is in place, in subscription order, and may read or
  /// dispatch to the store themselves.
  pub fn dispatch(&self, action: impl Into<S::Action>) {
    let action = action.into();
    let next = {
      let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
      let next = state.clone().reduce(&action);
      *state = next.clone();
      next
    };

    let handlers = self
      .handlers
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .iter()
      .map(|(_, handler)| handler.clone())
      .collect::<Vec<_>>();

    for handler in handlers {
      handler(&next);
    }
  }

  pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
  where
    F: Fn(&S) + Send + Sync + 'static,
  {
    let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
    self
      .handlers
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .push((id, Arc::new(handler)));
    id
  }

  /// Returns whether a handler was removed.
  pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
    let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
    let before = handlers.len();
    handlers.retain(|(entry, _)| *entry != id);
    handlers.len() != before
  }
}

impl<S: Reducer + std::fmt::Debug> std::fmt::Debug for Store<S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let handlers = self
      .handlers
      .read()
      .map_or(0, |handlers| handlers.len());

    f.debug_struct("Store")
      .field("state", &self.state())
      .field("handlers", &handlers)
      .finish()
  }
}
