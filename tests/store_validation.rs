//! Store Validation Tests
//!
//! The validation middleware installed in a store with an error slice.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use rstest::rstest;
use serde::Serialize;
use serde_json::{json, Value};

use store_spec::{
    combine, create_validator, create_validator_with, middleware_fn, spec_errors, AggregateSchema,
    DraftVersion, Next, SchemaDocument, SpecError, Store, Transition, ValidationConfig, ViolationList,
};

#[derive(Debug, Default, Serialize)]
struct AppState {
    todos: Value,
    #[serde(rename = "specErrors")]
    spec_errors: ViolationList,
}

fn todos(state: Value, t: &Transition) -> Value {
    match t.kind.as_str() {
        "SET_TODOS" => t.payload.clone(),
        "ADD_TODO" => {
            let mut list = state.as_array().cloned().unwrap_or_default();
            list.push(t.payload.clone());
            Value::Array(list)
        }
        _ => state,
    }
}

fn app(state: AppState, t: &Transition) -> AppState {
    AppState {
        todos: todos(state.todos, t),
        spec_errors: spec_errors::reduce(state.spec_errors, t),
    }
}

fn todo_aggregate() -> AggregateSchema {
    let todos = SchemaDocument::new(json!({
        "id": "todos",
        "type": "array",
        "items": {"$ref": "#/definitions/todo"}
    }))
    .unwrap();
    let todo = SchemaDocument::new(json!({
        "id": "todo",
        "type": "object",
        "properties": {
            "text": {"type": "string"},
            "completed": {"type": "boolean"}
        },
        "required": ["text", "completed"]
    }))
    .unwrap();
    combine([("todosSpec", todos)], [("todoSpec", todo)]).unwrap()
}

fn todo_store() -> Store<AppState> {
    Store::new(AppState { todos: json!([]), ..AppState::default() }, app)
        .with_middleware(create_validator(&todo_aggregate()).unwrap())
}

/// Middleware counting the error reports that reach it
fn count_reports(counter: Rc<Cell<usize>>) -> impl store_spec::Middleware<AppState> {
    middleware_fn(move |_store: &Store<AppState>, next: Next<'_, AppState>, t: Transition| {
        if t.is_error_report() {
            counter.set(counter.get() + 1);
        }
        next.run(t)
    })
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_wrong_type_is_reported() {
    let store = todo_store();
    store
        .dispatch(Transition::with_payload("SET_TODOS", json!("not-an-array")))
        .unwrap();

    let state = store.state();
    assert!(!state.spec_errors.is_empty());
    assert!(state.spec_errors.iter().any(|v| v.path.contains("todos")));
    assert!(state.spec_errors.touches("/todos"));
}

#[test]
fn test_reported_list_is_exactly_the_validation_result() {
    let aggregate = todo_aggregate();
    let validator = create_validator(&aggregate).unwrap();
    let expected = validator
        .validate(&json!({"todos": "not-an-array", "specErrors": []}))
        .unwrap()
        .violations;

    let store = Store::new(AppState { todos: json!([]), ..AppState::default() }, app)
        .with_middleware(validator);
    store
        .dispatch(Transition::with_payload("SET_TODOS", json!("not-an-array")))
        .unwrap();

    assert_eq!(store.state().spec_errors, expected);
}

#[test]
fn test_valid_state_clears_errors() {
    let store = todo_store();
    store
        .dispatch(Transition::with_payload("SET_TODOS", json!("not-an-array")))
        .unwrap();
    assert!(!store.state().spec_errors.is_empty());

    store.dispatch(Transition::with_payload("SET_TODOS", json!([]))).unwrap();
    assert!(store.state().spec_errors.is_empty());
}

#[test]
fn test_nested_item_violation() {
    let store = todo_store();
    store
        .dispatch(Transition::with_payload("ADD_TODO", json!({"text": "ship it", "completed": false})))
        .unwrap();
    assert!(store.state().spec_errors.is_empty());

    store
        .dispatch(Transition::with_payload("ADD_TODO", json!({"text": "no flag"})))
        .unwrap();
    let state = store.state();
    assert_eq!(state.spec_errors.len(), 1);
    assert_eq!(state.spec_errors.as_slice()[0].path, "/todos/1");
    assert!(state.spec_errors.as_slice()[0].message.contains("completed"));
}

#[test]
fn test_errors_survive_unrelated_transitions() {
    let store = Store::new(AppState { todos: json!([]), ..AppState::default() }, app);
    let list: ViolationList = vec![store_spec::Violation::new("/todos", "/type", "bad")].into();
    store.dispatch(Transition::report_errors(list.clone())).unwrap();
    store.dispatch(Transition::new("SOMETHING_ELSE")).unwrap();
    assert_eq!(store.state().spec_errors, list);
}

#[test]
fn test_refs_by_namespaced_id() {
    let todos = SchemaDocument::new(json!({
        "id": "todos",
        "type": "array",
        "items": {"$ref": "/todo"}
    }))
    .unwrap();
    let todo = SchemaDocument::new(json!({
        "id": "todo",
        "type": "object",
        "required": ["text"]
    }))
    .unwrap();
    let aggregate = combine([("todos", todos)], [("todo", todo)]).unwrap();
    let validator = create_validator(&aggregate).unwrap();

    assert!(validator.validate(&json!({"todos": [{"text": "a"}]})).unwrap().valid);
    let outcome = validator.validate(&json!({"todos": [{}]})).unwrap();
    assert!(!outcome.valid);
    assert_eq!(outcome.violations.as_slice()[0].path, "/todos/0");
}

#[rstest]
#[case(DraftVersion::Draft6)]
#[case(DraftVersion::Draft7)]
fn test_validator_builds_under_each_draft(#[case] draft: DraftVersion) {
    let config = ValidationConfig {
        draft,
        ..ValidationConfig::default()
    };
    let validator = create_validator_with(&todo_aggregate(), &config).unwrap();

    let valid = json!({"todos": [{"text": "a", "completed": false}]});
    assert!(validator.validate(&valid).unwrap().valid);

    let outcome = validator.validate(&json!({"todos": [{"text": "a"}]})).unwrap();
    assert!(!outcome.valid);
    assert!(outcome.violations.iter().any(|v| v.path == "/todos/0"));
}

// =============================================================================
// Error reports
// =============================================================================

#[test]
fn test_one_report_per_transition_by_default() {
    let reports = Rc::new(Cell::new(0));
    let store = Store::new(AppState { todos: json!([]), ..AppState::default() }, app)
        .with_middleware(create_validator(&todo_aggregate()).unwrap())
        .with_middleware(count_reports(reports.clone()));

    store.dispatch(Transition::new("NOOP")).unwrap();
    assert_eq!(reports.get(), 1);

    store
        .dispatch(Transition::with_payload("SET_TODOS", json!(42)))
        .unwrap();
    assert_eq!(reports.get(), 2);
}

#[test]
fn test_revalidating_reports_is_bounded() {
    let reports = Rc::new(Cell::new(0));
    let config = ValidationConfig {
        revalidate_error_reports: true,
        ..ValidationConfig::default()
    };
    let store = Store::new(AppState { todos: json!([]), ..AppState::default() }, app)
        .with_middleware(create_validator_with(&todo_aggregate(), &config).unwrap())
        .with_middleware(count_reports(reports.clone()));

    store
        .dispatch(Transition::with_payload("SET_TODOS", json!(42)))
        .unwrap();
    assert_eq!(reports.get(), 2);
    assert!(store.state().spec_errors.touches("/todos"));

    store.dispatch(Transition::with_payload("SET_TODOS", json!([]))).unwrap();
    assert_eq!(reports.get(), 4);
    assert!(store.state().spec_errors.is_empty());
}

#[test]
fn test_error_slice_in_schema_does_not_diverge() {
    // The error slice is itself constrained: it must stay empty
    let todos = SchemaDocument::new(json!({"id": "todos", "type": "array"})).unwrap();
    let errors = SchemaDocument::new(json!({"id": "specErrors", "type": "array", "maxItems": 0})).unwrap();
    let aggregate =
        combine([("todos", todos), ("errors", errors)], Vec::<(&str, SchemaDocument)>::new()).unwrap();

    let config = ValidationConfig {
        revalidate_error_reports: true,
        ..ValidationConfig::default()
    };
    let store = Store::new(AppState { todos: json!([]), ..AppState::default() }, app)
        .with_middleware(create_validator_with(&aggregate, &config).unwrap());

    store.dispatch(Transition::with_payload("SET_TODOS", json!(1))).unwrap();
    // Second pass sees the first list in state and reports the slice too
    assert!(store.state().spec_errors.touches("/todos"));
    assert!(store.state().spec_errors.touches("/specErrors"));
}

#[test]
fn test_transition_result_is_returned() {
    let store = todo_store();
    let result = store
        .dispatch(Transition::with_payload("ADD_TODO", json!({"text": "a", "completed": true})))
        .unwrap();
    assert_eq!(result.kind, "ADD_TODO");
    assert_eq!(result.payload["text"], "a");
}

// =============================================================================
// Engine failures
// =============================================================================

#[derive(Debug, Default, Serialize)]
struct Poisonable {
    // Non-string keys cannot become JSON object keys
    cells: BTreeMap<Vec<u8>, u8>,
    #[serde(rename = "specErrors")]
    spec_errors: ViolationList,
}

fn poisonable(mut state: Poisonable, t: &Transition) -> Poisonable {
    if t.kind == "POISON" {
        state.cells.insert(vec![1, 2], 3);
    }
    state.spec_errors = spec_errors::reduce(state.spec_errors, t);
    state
}

#[test]
fn test_engine_failure_aborts_dispatch() {
    let cells = SchemaDocument::new(json!({"id": "cells", "type": "object"})).unwrap();
    let aggregate = combine([("cells", cells)], Vec::<(&str, SchemaDocument)>::new()).unwrap();
    let reports = Rc::new(Cell::new(0));
    let counter = reports.clone();

    let store = Store::new(Poisonable::default(), poisonable)
        .with_middleware(create_validator(&aggregate).unwrap())
        .with_middleware(middleware_fn(
            move |_store: &Store<Poisonable>, next: Next<'_, Poisonable>, t: Transition| {
                if t.is_error_report() {
                    counter.set(counter.get() + 1);
                }
                next.run(t)
            },
        ));

    store.dispatch(Transition::new("INIT")).unwrap();
    assert_eq!(reports.get(), 1);

    let err = store.dispatch(Transition::new("POISON")).unwrap_err();
    assert!(matches!(err, SpecError::Json(_)));
    assert_eq!(reports.get(), 1);
    assert_eq!(store.state().cells.len(), 1);
}

#[test]
fn test_unresolved_reference_is_engine_failure() {
    let todos = SchemaDocument::new(json!({
        "id": "todos",
        "type": "array",
        "items": {"$ref": "#/definitions/missing"}
    }))
    .unwrap();
    let aggregate = combine([("todos", todos)], Vec::<(&str, SchemaDocument)>::new()).unwrap();

    let result = create_validator(&aggregate)
        .and_then(|validator| validator.validate(&json!({"todos": [1]})));
    assert!(result.is_err());
}
