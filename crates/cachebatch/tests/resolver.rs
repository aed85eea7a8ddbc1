// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for batch resolution against a recording store.

use std::sync::Mutex;
use std::time::Duration;

use cachebatch::{
    ArgRef, Args, Argument, BatchResolver, BoxError, Container, ContainerKind, DeclaredType, ErrorKind, ExpressionEvaluator,
    Invocation, Loaded, Loader, LookupFailurePolicy, MemoryStore, MethodSignature,
};
use cachebatch_store::testing::{MockStore, StoreOp};
use cachebatch_store::{CacheEntry, CacheKey};
use tick::Clock;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

/// Lookup keys are the item itself; write keys strip the `v:` prefix from the value.
///
/// The key expression `fail` errors and `empty` yields an empty key. The expire expression
/// `len` uses the value length in seconds, `text` yields a non-numeric result and `fail` errors.
#[derive(Debug)]
struct Stub;

impl ExpressionEvaluator<String, String> for Stub {
    fn eval_key(&self, expr: &str, _target: &str, _method: &str, args: Args<'_, String>, value: Option<&String>) -> Result<String, BoxError> {
        match expr {
            "fail" => return Err("key expression failed".into()),
            "empty" => return Ok(String::new()),
            _ => {}
        }

        if let Some(value) = value {
            return value.strip_prefix("v:").map(str::to_string).ok_or_else(|| "unkeyed value".into());
        }

        args.iter()
            .find_map(|arg| match arg {
                ArgRef::Item(item) => Some(item.clone()),
                _ => None,
            })
            .ok_or_else(|| "no item in scope".into())
    }

    fn eval_field(&self, expr: &str, _args: Args<'_, String>, _value: Option<&String>) -> Result<String, BoxError> {
        Ok(expr.to_string())
    }

    fn eval_expire(&self, expr: &str, _args: Args<'_, String>, value: &String) -> Result<serde_json::Value, BoxError> {
        match expr {
            "len" => Ok(serde_json::json!(value.len())),
            "text" => Ok(serde_json::json!("soon")),
            _ => Err("expire expression failed".into()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Returns one value per item in the container family of the input.
    Mirror,
    /// Returns one value per item in the given container family.
    As(ContainerKind),
    /// Like `Mirror`, but leaves out the given item.
    Skip(&'static str),
    Single,
    Nothing,
    Fail,
}

/// A loader that records every invocation it receives.
#[derive(Debug)]
struct ItemLoader {
    mode: Mode,
    calls: Mutex<Vec<Invocation<String>>>,
}

impl ItemLoader {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Invocation<String>> {
        self.calls.lock().unwrap().clone()
    }

    fn loaded_items(&self, call: usize, index: usize) -> Container<String> {
        match self.calls()[call].argument(index) {
            Some(Argument::Batch(items)) => items.clone(),
            other => panic!("expected a batch argument, got {other:?}"),
        }
    }
}

impl Loader<String, String> for ItemLoader {
    async fn load(&self, invocation: Invocation<String>) -> Result<Loaded<String>, BoxError> {
        self.calls.lock().unwrap().push(invocation.clone());

        let items = invocation
            .into_args()
            .into_iter()
            .find_map(|arg| match arg {
                Argument::Batch(items) => Some(items),
                _ => None,
            })
            .unwrap_or_else(|| Container::from(vec!["x".to_string(), "y".to_string()]));
        let kind = items.kind();
        let values = items.into_ordered_sequence().into_iter().map(|item| format!("v:{item}"));

        match self.mode {
            Mode::Mirror => Ok(Loaded::Batch(Container::from_ordered_sequence(kind, 0, values))),
            Mode::As(kind) => Ok(Loaded::Batch(Container::from_ordered_sequence(kind, 0, values))),
            Mode::Skip(skipped) => {
                let skipped = format!("v:{skipped}");
                Ok(Loaded::Batch(Container::from_ordered_sequence(
                    kind,
                    0,
                    values.filter(|value| *value != skipped),
                )))
            }
            Mode::Single => Ok(Loaded::Single("v:single".to_string())),
            Mode::Nothing => Ok(Loaded::Nothing),
            Mode::Fail => Err("downstream unavailable".into()),
        }
    }
}

fn list_signature() -> MethodSignature {
    MethodSignature::new("get", vec![DeclaredType::List], DeclaredType::List)
}

fn resolver_with(store: MockStore<String>, signature: MethodSignature) -> BatchResolver<String, String, MockStore<String>, Stub> {
    BatchResolver::builder::<String, String>(Clock::new_frozen())
        .store(store)
        .evaluator(Stub)
        .method(signature)
        .key_expression("#item")
        .expire(Duration::from_secs(10))
        .build()
        .unwrap()
}

fn resolver(store: MockStore<String>) -> BatchResolver<String, String, MockStore<String>, Stub> {
    resolver_with(store, list_signature())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

fn call(items: &[&str]) -> Invocation<String> {
    Invocation::new("svc", "get", vec![Argument::Batch(Container::from(strings(items)))])
}

fn seeded(items: &[&str]) -> MockStore<String> {
    MockStore::with_data(
        items
            .iter()
            .map(|item| (CacheKey::new(*item), CacheEntry::new(format!("v:{item}"))))
            .collect(),
    )
}

fn resolved(values: Container<Option<String>>) -> Vec<Option<String>> {
    values.into_ordered_sequence()
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|value| Some((*value).to_string())).collect()
}

fn written(store: &MockStore<String>) -> Vec<(CacheKey, CacheEntry<String>)> {
    store
        .operations()
        .into_iter()
        .filter_map(|op| match op {
            StoreOp::MultiSet(entries) => Some(entries),
            StoreOp::MultiGet(_) => None,
        })
        .flatten()
        .collect()
}

static_assertions::assert_impl_all!(BatchResolver<String, String, MockStore<String>, Stub>: Send, Sync);

#[test]
fn partial_hit_loads_only_misses_and_writes_them_back() {
    block_on(async {
        let store = seeded(&["A", "C"]);
        let resolver = resolver(store.clone());
        let loader = ItemLoader::new(Mode::Mirror);

        let values = resolver.resolve(call(&["A", "B", "C"]), &loader).await.unwrap();

        assert_eq!(values.kind(), ContainerKind::List);
        assert_eq!(resolved(values), some(&["v:A", "v:B", "v:C"]));
        assert_eq!(loader.calls().len(), 1);
        assert_eq!(loader.loaded_items(0, 0), Container::from(strings(&["B"])));

        let operations = store.operations();
        assert_eq!(operations.len(), 2);
        assert!(matches!(&operations[0], StoreOp::MultiGet(keys) if keys.len() == 3));

        let written = written(&store);
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, CacheKey::new("B"));
        assert_eq!(written[0].1.value(), "v:B");
        assert_eq!(written[0].1.ttl(), Some(Duration::from_secs(10)));
    });
}

#[test]
fn all_misses_are_loaded_and_written() {
    block_on(async {
        let store = MockStore::new();
        let resolver = resolver(store.clone());
        let loader = ItemLoader::new(Mode::Mirror);

        let values = resolver.resolve(call(&["X", "Y"]), &loader).await.unwrap();

        assert_eq!(resolved(values), some(&["v:X", "v:Y"]));
        assert_eq!(loader.loaded_items(0, 0), Container::from(strings(&["X", "Y"])));
        assert!(store.contains_key(&CacheKey::new("X")));
        assert!(store.contains_key(&CacheKey::new("Y")));
        assert_eq!(written(&store).len(), 2);
    });
}

#[test]
fn all_hits_skip_loader_and_writeback() {
    block_on(async {
        let store = seeded(&["A", "B"]);
        let resolver = resolver(store.clone());
        let loader = ItemLoader::new(Mode::Mirror);

        let values = resolver.resolve(call(&["B", "A"]), &loader).await.unwrap();

        assert_eq!(resolved(values), some(&["v:B", "v:A"]));
        assert!(loader.calls().is_empty());
        assert_eq!(store.operations().len(), 1);
    });
}

#[test]
fn result_follows_input_order() {
    block_on(async {
        let store = seeded(&["B"]);
        let resolver = resolver(store);
        let loader = ItemLoader::new(Mode::Mirror);

        let values = resolver.resolve(call(&["C", "A", "B"]), &loader).await.unwrap();

        assert_eq!(resolved(values), some(&["v:C", "v:A", "v:B"]));
        assert_eq!(loader.loaded_items(0, 0), Container::from(strings(&["C", "A"])));
    });
}

#[test]
fn empty_batch_is_rejected_without_side_effects() {
    block_on(async {
        let store = MockStore::new();
        let resolver = resolver(store.clone());
        let loader = ItemLoader::new(Mode::Mirror);

        let error = resolver.resolve(call(&[]), &loader).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::EmptyBatch);
        assert!(loader.calls().is_empty());
        assert!(store.operations().is_empty());
    });
}

#[test]
fn missing_or_scalar_batch_argument_is_rejected() {
    block_on(async {
        let store = MockStore::new();
        let resolver = resolver(store.clone());
        let loader = ItemLoader::new(Mode::Mirror);

        let missing = Invocation::new("svc", "get", Vec::new());
        let error = resolver.resolve(missing, &loader).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidBatchArgument);

        let scalar = Invocation::new("svc", "get", vec![Argument::Value(serde_json::json!("A"))]);
        let error = resolver.resolve(scalar, &loader).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidBatchArgument);

        assert!(loader.calls().is_empty());
        assert!(store.operations().is_empty());
    });
}

#[test]
fn batch_of_an_undeclared_family_is_rejected() {
    block_on(async {
        let store = MockStore::new();
        let signature = MethodSignature::new("get", vec![DeclaredType::Array], DeclaredType::List);
        let resolver = resolver_with(store.clone(), signature);
        let loader = ItemLoader::new(Mode::Mirror);

        let items: std::collections::HashSet<String> = strings(&["A", "B"]).into_iter().collect();
        let invocation = Invocation::new("svc", "get", vec![Argument::Batch(Container::from(items))]);
        let error = resolver.resolve(invocation, &loader).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidBatchArgument);
        assert!(error.to_string().contains("declared as array but a set was passed"), "{error}");
        assert!(loader.calls().is_empty());
        assert!(store.operations().is_empty());
    });
}

#[test]
fn list_parameter_accepts_a_linked_list() {
    block_on(async {
        let signature = MethodSignature::new("get", vec![DeclaredType::LinkedList], DeclaredType::List);
        let resolver = resolver_with(seeded(&["A"]), signature);
        let loader = ItemLoader::new(Mode::Mirror);

        let values = resolver.resolve(call(&["A", "B"]), &loader).await.unwrap();

        assert_eq!(resolved(values), some(&["v:A", "v:B"]));
        assert_eq!(loader.loaded_items(0, 0), Container::from(strings(&["B"])));
    });
}

#[test]
fn unresolved_items_are_skipped_by_default() {
    block_on(async {
        let resolver = resolver(MockStore::new());
        let loader = ItemLoader::new(Mode::Skip("B"));

        let values = resolver.resolve(call(&["A", "B", "C"]), &loader).await.unwrap();

        assert_eq!(resolved(values), some(&["v:A", "v:C"]));
    });
}

#[test]
fn unresolved_items_become_empty_slots_when_requested() {
    block_on(async {
        let store = MockStore::new();
        let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
            .store(store.clone())
            .evaluator(Stub)
            .method(list_signature())
            .key_expression("#item")
            .return_null_value(true)
            .build()
            .unwrap();
        let loader = ItemLoader::new(Mode::Skip("B"));

        let values = resolver.resolve(call(&["A", "B", "C"]), &loader).await.unwrap();

        assert_eq!(
            resolved(values),
            vec![Some("v:A".to_string()), None, Some("v:C".to_string())]
        );
        assert!(!store.contains_key(&CacheKey::new("B")));
        assert_eq!(written(&store).len(), 2);
    });
}

#[test]
fn duplicate_items_are_looked_up_and_loaded_once() {
    block_on(async {
        let store = MockStore::new();
        let resolver = resolver(store.clone());
        let loader = ItemLoader::new(Mode::Mirror);

        let values = resolver.resolve(call(&["A", "A", "B"]), &loader).await.unwrap();

        assert_eq!(resolved(values), some(&["v:A", "v:A", "v:B"]));
        assert_eq!(loader.loaded_items(0, 0), Container::from(strings(&["A", "B"])));
        assert!(matches!(&store.operations()[0], StoreOp::MultiGet(keys) if keys.len() == 2));
    });
}

#[test]
fn set_input_keeps_its_family_for_the_loader_and_result() {
    block_on(async {
        let signature = MethodSignature::new("get", vec![DeclaredType::Set], DeclaredType::Set);
        let resolver = resolver_with(seeded(&["A"]), signature);
        let loader = ItemLoader::new(Mode::Mirror);

        let items: std::collections::HashSet<String> = strings(&["A", "B", "C"]).into_iter().collect();
        let invocation = Invocation::new("svc", "get", vec![Argument::Batch(Container::from(items))]);
        let values = resolver.resolve(invocation, &loader).await.unwrap();

        assert_eq!(values.kind(), ContainerKind::Set);
        let expected: Container<Option<String>> = Container::from(
            some(&["v:A", "v:B", "v:C"])
                .into_iter()
                .collect::<std::collections::HashSet<_>>(),
        );
        assert_eq!(values, expected);

        let misses = loader.loaded_items(0, 0);
        assert_eq!(misses.kind(), ContainerKind::Set);
        assert_eq!(misses.len(), 2);
    });
}

#[test]
fn array_input_is_loaded_as_array_and_collapsed_into_declared_set() {
    block_on(async {
        let signature = MethodSignature::new("get", vec![DeclaredType::Array], DeclaredType::OrderedSet);
        let resolver = resolver_with(MockStore::new(), signature);
        let loader = ItemLoader::new(Mode::As(ContainerKind::OrderedSet));

        let items = Container::from(["B".to_string(), "A".to_string(), "B".to_string()]);
        let invocation = Invocation::new("svc", "get", vec![Argument::Batch(items)]);
        let values = resolver.resolve(invocation, &loader).await.unwrap();

        assert_eq!(values.kind(), ContainerKind::OrderedSet);
        assert_eq!(resolved(values), some(&["v:B", "v:A"]));

        let misses = loader.loaded_items(0, 0);
        assert_eq!(misses.kind(), ContainerKind::Array);
        assert_eq!(misses.into_ordered_sequence(), strings(&["B", "A"]));
    });
}

#[test]
fn batch_at_later_position_passes_other_arguments_through() {
    block_on(async {
        let signature = MethodSignature::new(
            "get",
            vec![DeclaredType::Scalar("Region".into()), DeclaredType::List],
            DeclaredType::List,
        );
        let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
            .store(seeded(&["A"]))
            .evaluator(Stub)
            .method(signature)
            .key_expression("#item")
            .iterable_arg_index(1)
            .build()
            .unwrap();
        let loader = ItemLoader::new(Mode::Mirror);

        let invocation = Invocation::new(
            "svc",
            "get",
            vec![
                Argument::Value(serde_json::json!("eu")),
                Argument::Batch(Container::from(strings(&["A", "B"]))),
            ],
        );
        let values = resolver.resolve(invocation, &loader).await.unwrap();

        assert_eq!(resolved(values), some(&["v:A", "v:B"]));
        let calls = loader.calls();
        assert_eq!(calls[0].argument(0), Some(&Argument::Value(serde_json::json!("eu"))));
        assert_eq!(loader.loaded_items(0, 1), Container::from(strings(&["B"])));
    });
}

#[test]
fn namespace_and_field_qualify_written_keys() {
    block_on(async {
        let store = MockStore::new();
        let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
            .store(store.clone())
            .evaluator(Stub)
            .method(list_signature())
            .namespace("users")
            .key_expression("#item")
            .field_expression("profile")
            .build()
            .unwrap();

        resolver.resolve(call(&["A"]), &ItemLoader::new(Mode::Mirror)).await.unwrap();

        let key = CacheKey::new("A").with_namespace("users").with_field("profile");
        assert!(matches!(&store.operations()[0], StoreOp::MultiGet(keys) if keys == &vec![key.clone()]));
        assert!(store.contains_key(&key));
    });
}

#[test]
fn lookup_failure_is_treated_as_miss_by_default() {
    block_on(async {
        let store = seeded(&["A"]);
        store.fail_when(|op| matches!(op, StoreOp::MultiGet(_)));
        let resolver = resolver(store.clone());
        let loader = ItemLoader::new(Mode::Mirror);

        let values = resolver.resolve(call(&["A", "B"]), &loader).await.unwrap();

        assert_eq!(resolved(values), some(&["v:A", "v:B"]));
        assert_eq!(loader.loaded_items(0, 0), Container::from(strings(&["A", "B"])));
        assert_eq!(written(&store).len(), 2);
    });
}

#[test]
fn lookup_failure_aborts_when_configured() {
    block_on(async {
        let store = MockStore::new();
        store.fail_when(|op| matches!(op, StoreOp::MultiGet(_)));
        let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
            .store(store.clone())
            .evaluator(Stub)
            .method(list_signature())
            .key_expression("#item")
            .lookup_failure(LookupFailurePolicy::Abort)
            .build()
            .unwrap();
        let loader = ItemLoader::new(Mode::Mirror);

        let error = resolver.resolve(call(&["A"]), &loader).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::CacheUnavailable);
        assert!(std::error::Error::source(&error).is_some());
        assert!(loader.calls().is_empty());
    });
}

#[test]
fn writeback_failure_still_returns_loaded_values() {
    block_on(async {
        let store = seeded(&["A"]);
        store.fail_when(|op| matches!(op, StoreOp::MultiSet(_)));
        let resolver = resolver(store.clone());

        let values = resolver
            .resolve(call(&["A", "B"]), &ItemLoader::new(Mode::Mirror))
            .await
            .unwrap();

        assert_eq!(resolved(values), some(&["v:A", "v:B"]));
        assert!(!store.contains_key(&CacheKey::new("B")));
    });
}

#[test]
fn loader_failure_propagates_without_writeback() {
    block_on(async {
        let store = MockStore::new();
        let resolver = resolver(store.clone());

        let error = resolver.resolve(call(&["A"]), &ItemLoader::new(Mode::Fail)).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::LoaderFailed);
        assert!(written(&store).is_empty());
    });
}

#[test]
fn single_value_from_loader_is_rejected() {
    block_on(async {
        let store = MockStore::new();
        let resolver = resolver(store.clone());

        let error = resolver.resolve(call(&["A"]), &ItemLoader::new(Mode::Single)).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidLoaderResult);
        assert!(written(&store).is_empty());
    });
}

#[test]
fn loader_result_in_wrong_family_is_rejected() {
    block_on(async {
        let resolver = resolver(MockStore::new());

        let error = resolver
            .resolve(call(&["A"]), &ItemLoader::new(Mode::As(ContainerKind::Set)))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidLoaderResult);
    });
}

#[test]
fn loader_returning_nothing_keeps_only_hits() {
    block_on(async {
        let store = seeded(&["A"]);
        let resolver = resolver(store.clone());

        let values = resolver
            .resolve(call(&["A", "B"]), &ItemLoader::new(Mode::Nothing))
            .await
            .unwrap();

        assert_eq!(resolved(values), some(&["v:A"]));
        assert!(written(&store).is_empty());
    });
}

#[test]
fn key_expression_failures_abort_before_lookup() {
    block_on(async {
        for expression in ["fail", "empty"] {
            let store = MockStore::new();
            let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
                .store(store.clone())
                .evaluator(Stub)
                .method(list_signature())
                .key_expression(expression)
                .build()
                .unwrap();
            let loader = ItemLoader::new(Mode::Mirror);

            let error = resolver.resolve(call(&["A"]), &loader).await.unwrap_err();

            assert_eq!(error.kind(), ErrorKind::ExpressionEvaluation, "expression `{expression}`");
            assert!(store.operations().is_empty());
            assert!(loader.calls().is_empty());
        }
    });
}

#[test]
fn expire_expression_sets_per_value_ttl() {
    block_on(async {
        let store = MockStore::new();
        let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
            .store(store.clone())
            .evaluator(Stub)
            .method(list_signature())
            .key_expression("#item")
            .expire(Duration::from_secs(10))
            .expire_expression("len")
            .build()
            .unwrap();

        resolver
            .resolve(call(&["A", "BBBB"]), &ItemLoader::new(Mode::Mirror))
            .await
            .unwrap();

        assert_eq!(store.entry(&CacheKey::new("A")).unwrap().ttl(), Some(Duration::from_secs(3)));
        assert_eq!(store.entry(&CacheKey::new("BBBB")).unwrap().ttl(), Some(Duration::from_secs(6)));
    });
}

#[test]
fn invalid_expire_results_fail_without_writeback() {
    block_on(async {
        for expression in ["text", "fail"] {
            let store = MockStore::new();
            let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
                .store(store.clone())
                .evaluator(Stub)
                .method(list_signature())
                .key_expression("#item")
                .expire_expression(expression)
                .build()
                .unwrap();

            let error = resolver
                .resolve(call(&["A"]), &ItemLoader::new(Mode::Mirror))
                .await
                .unwrap_err();

            assert_eq!(error.kind(), ErrorKind::ExpressionEvaluation, "expression `{expression}`");
            assert!(written(&store).is_empty());
        }
    });
}

#[test]
fn zero_default_expire_writes_entries_without_ttl() {
    block_on(async {
        let store = MockStore::new();
        let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
            .store(store.clone())
            .evaluator(Stub)
            .method(list_signature())
            .key_expression("#item")
            .build()
            .unwrap();

        resolver.resolve(call(&["A"]), &ItemLoader::new(Mode::Mirror)).await.unwrap();

        assert_eq!(store.entry(&CacheKey::new("A")).unwrap().ttl(), None);
    });
}

#[test]
fn method_without_parameters_loads_and_caches_every_value() {
    block_on(async {
        let store = MockStore::new();
        let signature = MethodSignature::new("all", Vec::new(), DeclaredType::List);
        let resolver = resolver_with(store.clone(), signature);
        let loader = ItemLoader::new(Mode::Mirror);

        let values = resolver
            .resolve(Invocation::new("svc", "all", Vec::new()), &loader)
            .await
            .unwrap();

        assert_eq!(resolved(values), some(&["v:x", "v:y"]));
        assert_eq!(loader.calls().len(), 1);

        let operations = store.operations();
        assert_eq!(operations.len(), 1);
        assert!(matches!(&operations[0], StoreOp::MultiSet(entries) if entries.len() == 2));
        assert!(store.contains_key(&CacheKey::new("x")));
    });
}

#[test]
fn method_without_parameters_returning_nothing_yields_empty_result() {
    block_on(async {
        let store = MockStore::new();
        let signature = MethodSignature::new("all", Vec::new(), DeclaredType::OrderedSet);
        let resolver = resolver_with(store.clone(), signature);

        let values = resolver
            .resolve(Invocation::new("svc", "all", Vec::new()), &ItemLoader::new(Mode::Nothing))
            .await
            .unwrap();

        assert_eq!(values.kind(), ContainerKind::OrderedSet);
        assert!(values.is_empty());
        assert!(store.operations().is_empty());
    });
}

#[test]
fn repeated_resolution_is_served_from_memory_store() {
    block_on(async {
        let resolver = BatchResolver::builder::<String, String>(Clock::new_frozen())
            .store(MemoryStore::new(Clock::new_frozen()))
            .evaluator(Stub)
            .method(list_signature())
            .key_expression("#item")
            .expire(Duration::from_secs(60))
            .build()
            .unwrap();
        let loader = ItemLoader::new(Mode::Mirror);

        let first = resolver.resolve(call(&["A", "B"]), &loader).await.unwrap();
        let second = resolver.resolve(call(&["A", "B"]), &loader).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(resolved(second), some(&["v:A", "v:B"]));
        assert_eq!(loader.calls().len(), 1);
    });
}
