//! The Store - single owner of application state.
//!
//! A store holds one immutable snapshot (`Arc<State>`), replaces it wholesale
//! on every successful dispatch, and synchronously notifies its observers.
//!
//! # Dispatch cycle
//!
//! `idle -> dispatch -> apply transition -> notify -> drain queue -> idle`
//!
//! - The subscriber list is snapshotted before the transition runs. Observers
//!   added during notification miss the in-flight dispatch; observers removed
//!   during notification still receive it.
//! - A failed transition leaves the state untouched and notifies nobody.
//! - Dispatches from other threads wait for the current cycle to finish.
//!   Dispatches from an observer on the notifying thread are handled per
//!   [`ReentrancyPolicy`].

use crate::metrics::{self as names, outcome};
use crate::subscription::{SubscriberRegistry, Subscription, SubscriptionId};
use crate::{DispatchError, ReentrancyPolicy, StoreConfig};
use parking_lot::{ReentrantMutex, RwLock};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::sync::watch;
use unistore_core::{Action, Reducer};

/// How a dispatch was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The transition ran and observers were notified before returning
    Applied,
    /// Re-entrant dispatch: the action will run once the current
    /// notification round completes
    Queued,
}

/// Per-store dispatch bookkeeping, guarded by the dispatch lock
struct DispatchCycle<A> {
    active: bool,
    queue: VecDeque<A>,
}

/// Clears the cycle on every exit path, unwinding included
struct CycleReset<'a, A>(&'a RefCell<DispatchCycle<A>>);

impl<A> Drop for CycleReset<'_, A> {
    fn drop(&mut self) {
        if let Ok(mut cycle) = self.0.try_borrow_mut() {
            cycle.active = false;
            cycle.queue.clear();
        }
    }
}

struct Inner<R: Reducer> {
    reducer: R,
    state: RwLock<Arc<R::State>>,
    subscribers: Arc<SubscriberRegistry>,
    cycle: ReentrantMutex<RefCell<DispatchCycle<R::Action>>>,
    config: StoreConfig,
}

/// The Store - runtime owner of a reducer's state
///
/// The Store manages:
/// 1. State (an `Arc` snapshot behind a `RwLock`, replaced on every transition)
/// 2. Reducer (pure transition logic)
/// 3. Subscriptions (observers notified after each successful dispatch)
///
/// Cloning a store yields another handle to the same state. Create one store
/// at the application's composition root and pass clones to the components
/// that need it.
///
/// # Example
///
/// ```
/// use unistore_core::{reducer_fn, AnyAction};
/// use unistore_runtime::Store;
///
/// let store = Store::new(reducer_fn(|count: &i64, action: &AnyAction| {
///     match action.action_type() {
///         "INCREMENT" => count + 1,
///         _ => *count,
///     }
/// }));
///
/// store.dispatch(AnyAction::new("INCREMENT")?)?;
/// assert_eq!(*store.state(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
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

impl<R> Store<R>
where
    R: Reducer,
    R::Action: Action,
{
    /// Create a store starting at the reducer's declared initial state
    ///
    /// Falls back to the state type's default when the reducer declares none
    /// (see [`Reducer::initial_state`]).
    #[must_use]
    pub fn new(reducer: R) -> Self
    where
        R::State: Default,
    {
        let initial_state = reducer.initial_state().unwrap_or_default();
        Self::with_state(reducer, initial_state)
    }

    /// Create a store with an explicit initial state
    #[must_use]
    pub fn with_state(reducer: R, initial_state: R::State) -> Self {
        Self::with_config(reducer, initial_state, StoreConfig::default())
    }

    /// Create a store with custom configuration
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::with_config(
    ///     PanelReducer,
    ///     PanelState::default(),
    ///     StoreConfig::default().with_name("panel").with_reentrancy(ReentrancyPolicy::Reject),
    /// );
    /// ```
    #[must_use]
    pub fn with_config(reducer: R, initial_state: R::State, config: StoreConfig) -> Self {
        tracing::debug!(
            store = %config.name,
            reentrancy = config.reentrancy.as_str(),
            "Store created"
        );

        Self {
            inner: Arc::new(Inner {
                reducer,
                state: RwLock::new(Arc::new(initial_state)),
                subscribers: Arc::new(SubscriberRegistry::new(config.name.clone())),
                cycle: ReentrantMutex::new(RefCell::new(DispatchCycle {
                    active: false,
                    queue: VecDeque::new(),
                })),
                config,
            }),
        }
    }

    /// Current state snapshot
    ///
    /// The returned `Arc` stays valid (and unchanged) after later dispatches.
    #[must_use]
    pub fn state(&self) -> Arc<R::State> {
        Arc::clone(&self.inner.state.read())
    }

    /// Project a value out of the current state
    ///
    /// The lock is released before `selector` runs, so selectors may freely
    /// call back into the store.
    pub fn select<T>(&self, selector: impl FnOnce(&R::State) -> T) -> T {
        let snapshot = self.state();
        selector(&snapshot)
    }

    /// Dispatch an action
    ///
    /// 1. Runs the reducer on the current snapshot
    /// 2. Replaces the snapshot with the result
    /// 3. Notifies the observers registered when the dispatch started, in
    ///    subscription order
    /// 4. Runs any actions queued by observers during step 3
    ///
    /// # Returns
    ///
    /// - `Dispatched::Applied` once the cycle above completed
    /// - `Dispatched::Queued` for a re-entrant dispatch under
    ///   [`ReentrancyPolicy::Queue`]
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Transition`] if the reducer failed; the state is
    ///   unchanged and no observer is notified
    /// - [`DispatchError::Reentrant`] for a re-entrant dispatch under
    ///   [`ReentrancyPolicy::Reject`]
    /// - [`DispatchError::QueueFull`] if the re-entrant queue is at capacity
    ///
    /// # Panics
    ///
    /// A panic in the reducer or an observer propagates to the caller. A
    /// reducer panic leaves the state unchanged; an observer panic happens
    /// after the state was replaced and discards queued actions. The store
    /// remains usable either way.
    #[tracing::instrument(
        skip_all,
        name = "store_dispatch",
        fields(store = %self.inner.config.name, action_type = action.action_type())
    )]
    pub fn dispatch(&self, action: R::Action) -> Result<Dispatched, DispatchError<R::Error>> {
        let cycle = self.inner.cycle.lock();

        if cycle.borrow().active {
            return self.enqueue(&cycle, action);
        }

        cycle.borrow_mut().active = true;
        let _reset = CycleReset(&cycle);

        if let Err(error) = self.apply(&action) {
            self.record_outcome(outcome::FAILED);
            return Err(DispatchError::Transition(error));
        }
        self.record_outcome(outcome::APPLIED);
        self.drain(&cycle);

        Ok(Dispatched::Applied)
    }

    /// Register an observer called with no arguments after every successful
    /// dispatch
    ///
    /// Observers read the new state through a store handle they captured.
    /// An observer that captures a clone of its own store keeps that store
    /// alive until it unsubscribes.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.subscribers.register(Arc::new(observer));
        Subscription::new(id, &self.inner.subscribers)
    }

    /// Number of registered observers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// This store's configuration
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// The reducer this store runs, e.g. to build a slice's actions
    #[must_use]
    pub fn reducer(&self) -> &R {
        &self.inner.reducer
    }

    /// Bridge to async code: a receiver that always holds the latest snapshot
    ///
    /// The backing observer removes itself on the first notification after
    /// every receiver has been dropped.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut changes = store.watch();
    /// tokio::spawn(async move {
    ///     while changes.changed().await.is_ok() {
    ///         render(&changes.borrow_and_update());
    ///     }
    /// });
    /// ```
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<R::State>>
    where
        R: Send + Sync + 'static,
        R::State: Send + Sync + 'static,
        R::Action: Send + 'static,
    {
        let (sender, receiver) = watch::channel(self.state());
        let store = Arc::downgrade(&self.inner);
        let registry = Arc::downgrade(&self.inner.subscribers);
        let own_id: Arc<OnceLock<SubscriptionId>> = Arc::new(OnceLock::new());

        let subscription = self.subscribe({
            let own_id = Arc::clone(&own_id);
            move || {
                if sender.is_closed() {
                    if let (Some(id), Some(registry)) = (own_id.get(), registry.upgrade()) {
                        registry.remove(*id);
                    }
                    return;
                }
                if let Some(inner) = store.upgrade() {
                    sender.send_replace(Arc::clone(&inner.state.read()));
                }
            }
        });

        let _ = own_id.set(subscription.id());
        receiver
    }

    fn enqueue(
        &self,
        cycle: &RefCell<DispatchCycle<R::Action>>,
        action: R::Action,
    ) -> Result<Dispatched, DispatchError<R::Error>> {
        let config = &self.inner.config;
        metrics::counter!(
            names::REENTRANT_DISPATCH_TOTAL,
            "store" => config.name.clone(),
            "policy" => config.reentrancy.as_str()
        )
        .increment(1);

        match config.reentrancy {
            ReentrancyPolicy::Reject => {
                tracing::warn!("Re-entrant dispatch rejected");
                self.record_outcome(outcome::REJECTED);
                Err(DispatchError::Reentrant)
            },
            ReentrancyPolicy::Queue => {
                let mut cycle = cycle.borrow_mut();
                let pending = cycle.queue.len();

                if pending >= config.max_queued_actions {
                    tracing::warn!(pending, "Re-entrant dispatch queue is full");
                    self.record_outcome(outcome::REJECTED);
                    return Err(DispatchError::QueueFull(pending));
                }

                cycle.queue.push_back(action);
                tracing::debug!(pending = pending + 1, "Re-entrant dispatch queued");
                self.record_outcome(outcome::QUEUED);
                Ok(Dispatched::Queued)
            },
        }
    }

    fn apply(&self, action: &R::Action) -> Result<(), R::Error> {
        let started = Instant::now();
        let observers = self.inner.subscribers.snapshot();
        let current = self.state();

        let next = match self.inner.reducer.reduce(&current, action) {
            Ok(next) => next,
            Err(error) => {
                tracing::warn!(
                    action_type = action.action_type(),
                    "Transition failed, state left unchanged"
                );
                return Err(error);
            },
        };

        *self.inner.state.write() = Arc::new(next);
        tracing::debug!(
            action_type = action.action_type(),
            observers = observers.len(),
            "Transition applied"
        );

        for observer in &observers {
            observer();
        }

        metrics::histogram!(names::DISPATCH_DURATION, "store" => self.inner.config.name.clone())
            .record(started.elapsed().as_secs_f64());
        Ok(())
    }

    fn drain(&self, cycle: &RefCell<DispatchCycle<R::Action>>) {
        loop {
            let next = cycle.borrow_mut().queue.pop_front();
            let Some(action) = next else {
                break;
            };

            let drained = if self.apply(&action).is_ok() {
                outcome::APPLIED
            } else {
                tracing::warn!(
                    action_type = action.action_type(),
                    "Queued action dropped after failed transition"
                );
                outcome::DROPPED
            };
            self.count(names::DRAINED_TOTAL, drained);
        }
    }

    /// One outcome per `dispatch` call
    fn record_outcome(&self, outcome: &'static str) {
        self.count(names::DISPATCH_TOTAL, outcome);
    }

    fn count(&self, name: &'static str, outcome: &'static str) {
        metrics::counter!(
            name,
            "store" => self.inner.config.name.clone(),
            "outcome" => outcome
        )
        .increment(1);
    }
}

impl<R: Reducer> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.config.name)
            .field("reentrancy", &self.inner.config.reentrancy)
            .field("subscribers", &self.inner.subscribers.len())
            .finish_non_exhaustive()
    }
}
