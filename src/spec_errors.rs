//! Error slice reducer
//!
//! Holds the violation list from the most recent validation pass. Install it
//! next to the application's own slices:
//!
//! ```
//! use serde::Serialize;
//! use store_spec::{spec_errors, Store, Transition, ViolationList};
//!
//! #[derive(Debug, Default, Serialize)]
//! struct AppState {
//!     todos: Vec<String>,
//!     #[serde(rename = "specErrors")]
//!     spec_errors: ViolationList,
//! }
//!
//! fn app(state: AppState, t: &Transition) -> AppState {
//!     AppState {
//!         todos: state.todos,
//!         spec_errors: spec_errors::reduce(state.spec_errors, t),
//!     }
//! }
//!
//! let store = Store::new(AppState::default(), app);
//! store.dispatch(Transition::report_errors(ViolationList::new())).unwrap();
//! assert!(store.state().spec_errors.is_empty());
//! ```

use crate::store::Transition;
use crate::violation::ViolationList;

/// Type of the error-report transition
pub const SPEC_ADD_ERROR: &str = "SPEC_ADD_ERROR";

/// Replace the list on an error report, pass it through otherwise
pub fn reduce(previous: ViolationList, transition: &Transition) -> ViolationList {
    if transition.is_error_report() {
        transition.violations.clone().unwrap_or_default()
    } else {
        previous
    }
}
