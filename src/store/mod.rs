//! State Store
//!
//! Minimal synchronous state container: a root reducer behind an ordered
//! middleware chain.
//!
//! ```text
//! dispatch ──> middleware[0] ──> middleware[1] ──> ... ──> reducer
//!                   │                  │
//!                   └─ may dispatch ───┘  (nested, re-enters the chain at middleware[0])
//! ```
//!
//! Middleware receive the store, the continuation [`Next`] and the
//! transition. Calling `next.run` forwards the transition down the chain;
//! calling `store.dispatch` starts a fresh pass from the top. Both return
//! synchronously.

mod transition;

use std::cell::{Ref, RefCell};
use std::fmt;

pub use transition::Transition;

use crate::error::{Result, SpecError};

/// Root reducer: previous state and transition to next state
pub type Reducer<S> = Box<dyn Fn(S, &Transition) -> S>;

/// A pipeline stage
pub trait Middleware<S> {
    /// Handle a transition, usually forwarding it with `next.run`
    fn handle(&self, store: &Store<S>, next: Next<'_, S>, transition: Transition) -> Result<Transition>;
}

/// Continuation to the rest of the chain
pub struct Next<'a, S> {
    middleware: &'a [Box<dyn Middleware<S>>],
    store: &'a Store<S>,
}

impl<'a, S: Default> Next<'a, S> {
    /// Run the next middleware, or the reducer at the end of the chain
    pub fn run(self, transition: Transition) -> Result<Transition> {
        if let Some((first, rest)) = self.middleware.split_first() {
            let next = Next {
                middleware: rest,
                store: self.store,
            };
            first.handle(self.store, next, transition)
        } else {
            self.store.reduce(&transition)?;
            Ok(transition)
        }
    }
}

/// Middleware built from a closure
pub struct FnMiddleware<F>(F);

/// Wrap a closure as middleware
pub fn middleware_fn<S, F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&Store<S>, Next<'_, S>, Transition) -> Result<Transition>,
{
    FnMiddleware(f)
}

impl<S, F> Middleware<S> for FnMiddleware<F>
where
    F: Fn(&Store<S>, Next<'_, S>, Transition) -> Result<Transition>,
{
    fn handle(&self, store: &Store<S>, next: Next<'_, S>, transition: Transition) -> Result<Transition> {
        (self.0)(store, next, transition)
    }
}

/// Single-threaded state container
pub struct Store<S> {
    state: RefCell<S>,
    reducer: Reducer<S>,
    middleware: Vec<Box<dyn Middleware<S>>>,
}

impl<S: Default> Store<S> {
    /// Create a store with an initial state and root reducer
    pub fn new(initial: S, reducer: impl Fn(S, &Transition) -> S + 'static) -> Self {
        Self {
            state: RefCell::new(initial),
            reducer: Box::new(reducer),
            middleware: Vec::new(),
        }
    }

    /// Append a middleware stage; stages run in insertion order
    pub fn with_middleware(mut self, m: impl Middleware<S> + 'static) -> Self {
        self.middleware.push(Box::new(m));
        self
    }

    /// Borrow the current state
    ///
    /// The borrow must be released before the next dispatch reaches the
    /// reducer, otherwise that dispatch fails with `StateBorrowed`.
    pub fn state(&self) -> Ref<'_, S> {
        self.state.borrow()
    }

    /// Send a transition through the full middleware chain
    ///
    /// Returns whatever the first middleware returns; with no middleware,
    /// the transition itself once reduced.
    pub fn dispatch(&self, transition: Transition) -> Result<Transition> {
        let next = Next {
            middleware: &self.middleware,
            store: self,
        };
        next.run(transition)
    }

    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    fn reduce(&self, transition: &Transition) -> Result<()> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| SpecError::StateBorrowed)?;
        let previous = std::mem::take(&mut *state);
        *state = (self.reducer)(previous, transition);
        Ok(())
    }
}

impl<S: Default + Clone> Store<S> {
    /// Clone the current state
    pub fn get_state(&self) -> S {
        self.state.borrow().clone()
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn counter(state: i64, t: &Transition) -> i64 {
        match t.kind.as_str() {
            "INC" => state + 1,
            "DEC" => state - 1,
            _ => state,
        }
    }

    #[test]
    fn test_dispatch_without_middleware() {
        let store = Store::new(0, counter);
        store.dispatch(Transition::new("INC")).unwrap();
        store.dispatch(Transition::new("INC")).unwrap();
        store.dispatch(Transition::new("NOOP")).unwrap();
        assert_eq!(*store.state(), 2);
        assert_eq!(store.get_state(), 2);
    }

    #[test]
    fn test_middleware_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());

        let store = Store::new(0, counter)
            .with_middleware(middleware_fn(move |_store: &Store<i64>, next: Next<'_, i64>, t: Transition| {
                a.borrow_mut().push("a:before");
                let result = next.run(t);
                a.borrow_mut().push("a:after");
                result
            }))
            .with_middleware(middleware_fn(move |store: &Store<i64>, next: Next<'_, i64>, t: Transition| {
                b.borrow_mut().push("b:before");
                let result = next.run(t);
                b.borrow_mut().push(if *store.state() == 1 { "b:after=1" } else { "b:after" });
                result
            }));

        store.dispatch(Transition::new("INC")).unwrap();
        assert_eq!(store.middleware_count(), 2);
        assert_eq!(*log.borrow(), vec!["a:before", "b:before", "b:after=1", "a:after"]);
    }

    #[test]
    fn test_nested_dispatch_reenters_chain() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();

        let store = Store::new(0, counter).with_middleware(middleware_fn(
            move |store: &Store<i64>, next: Next<'_, i64>, t: Transition| {
                s.borrow_mut().push(t.kind.clone());
                let follow_up = t.kind == "INC";
                let result = next.run(t)?;
                if follow_up {
                    store.dispatch(Transition::new("DEC"))?;
                }
                Ok(result)
            },
        ));

        let result = store.dispatch(Transition::new("INC")).unwrap();
        assert_eq!(result.kind, "INC");
        assert_eq!(*store.state(), 0);
        assert_eq!(*seen.borrow(), vec!["INC", "DEC"]);
    }

    #[test]
    fn test_middleware_can_swallow() {
        let store = Store::new(0, counter).with_middleware(middleware_fn(
            |_store: &Store<i64>, _next: Next<'_, i64>, t: Transition| Ok(t),
        ));
        store.dispatch(Transition::new("INC")).unwrap();
        assert_eq!(*store.state(), 0);
    }

    #[test]
    fn test_reduce_while_state_borrowed_fails() {
        let store = Store::new(0, counter).with_middleware(middleware_fn(
            |store: &Store<i64>, next: Next<'_, i64>, t: Transition| {
                let _held = store.state();
                next.run(t)
            },
        ));

        let err = store.dispatch(Transition::new("INC")).unwrap_err();
        assert!(matches!(err, SpecError::StateBorrowed));
        assert_eq!(*store.state(), 0);
    }
}
