//! Tests for the caching fetch module

use super::*;
use crate::error::Error;
use crate::testing::{GatedTransport, ScriptedTransport};
use crate::types::{PaginatedRequestParams, PaginatedResponse, PAGINATED_TRANSACTIONS};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

// ============================================================================
// Cache Key Tests
// ============================================================================

#[test]
fn test_cache_key_format() {
    assert_eq!(
        cache_key("paginatedTransactions", &json!({"page": 0})),
        r#"paginatedTransactions{"page":0}"#
    );
    assert_eq!(
        cache_key("paginatedTransactions", &json!({"page": null})),
        r#"paginatedTransactions{"page":null}"#
    );
}

// ============================================================================
// fetch_with_cache Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_with_cache_memoizes() {
    let transport = ScriptedTransport::new();
    transport.respond(
        PAGINATED_TRANSACTIONS,
        json!({"page": 0}),
        json!({"data": [1, 2], "nextPage": 1}),
    );
    let fetch = CustomFetch::new(transport);

    let params = PaginatedRequestParams::first();
    let first: Option<PaginatedResponse<Vec<u32>>> = fetch
        .fetch_with_cache(PAGINATED_TRANSACTIONS, &params)
        .await
        .unwrap();
    let second: Option<PaginatedResponse<Vec<u32>>> = fetch
        .fetch_with_cache(PAGINATED_TRANSACTIONS, &params)
        .await
        .unwrap();

    assert_eq!(first, Some(PaginatedResponse::new(vec![1, 2], Some(1))));
    assert_eq!(first, second);
    assert_eq!(fetch.transport().call_count(), 1);
    assert!(fetch.is_cached(PAGINATED_TRANSACTIONS, &params));
}

#[tokio::test]
async fn test_fetch_with_cache_memoizes_null() {
    let transport = ScriptedTransport::new();
    transport.respond(PAGINATED_TRANSACTIONS, json!({"page": 3}), Value::Null);
    let fetch = CustomFetch::new(transport);

    let params = PaginatedRequestParams::new(Some(3));
    for _ in 0..2 {
        let page: Option<PaginatedResponse<Vec<u32>>> = fetch
            .fetch_with_cache(PAGINATED_TRANSACTIONS, &params)
            .await
            .unwrap();
        assert!(page.is_none());
    }

    assert_eq!(fetch.transport().call_count(), 1);
}

#[tokio::test]
async fn test_fetch_with_cache_distinct_params() {
    let transport = ScriptedTransport::new();
    transport.respond("ep", json!({"page": 0}), json!("zero"));
    transport.respond("ep", json!({"page": 1}), json!("one"));
    let fetch = CustomFetch::new(transport);

    let zero: Option<String> = fetch.fetch_with_cache("ep", &json!({"page": 0})).await.unwrap();
    let one: Option<String> = fetch.fetch_with_cache("ep", &json!({"page": 1})).await.unwrap();

    assert_eq!(zero.as_deref(), Some("zero"));
    assert_eq!(one.as_deref(), Some("one"));
    assert_eq!(fetch.cache_len(), 2);
}

#[tokio::test]
async fn test_fetch_with_cache_failure_not_cached() {
    let transport = ScriptedTransport::new();
    transport.fail("ep", json!({"page": 0}));
    let fetch = CustomFetch::new(transport);

    let result: Result<Option<Value>, Error> =
        fetch.fetch_with_cache("ep", &json!({"page": 0})).await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
    assert_eq!(fetch.cache_len(), 0);
    assert!(!fetch.loading());
}

#[tokio::test]
async fn test_fetch_with_cache_decode_failure_not_cached() {
    let transport = ScriptedTransport::new();
    transport.respond("ep", json!({}), json!({"unexpected": true}));
    let fetch = CustomFetch::new(transport);

    let result: Result<Option<PaginatedResponse<Vec<u32>>>, Error> =
        fetch.fetch_with_cache("ep", &json!({})).await;

    assert!(matches!(result, Err(Error::Decode { .. })));
    assert_eq!(fetch.cache_len(), 0);
}

// ============================================================================
// fetch_without_cache Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_without_cache_always_requests() {
    let transport = ScriptedTransport::new();
    transport.respond("ep", json!({"id": "t1"}), Value::Null);
    let fetch = CustomFetch::new(transport);

    for _ in 0..3 {
        let result: Option<Value> = fetch
            .fetch_without_cache("ep", &json!({"id": "t1"}))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    assert_eq!(fetch.transport().call_count(), 3);
    assert_eq!(fetch.cache_len(), 0);
}

// ============================================================================
// Cache Clearing Tests
// ============================================================================

async fn warmed_fetch() -> CustomFetch<ScriptedTransport> {
    let transport = ScriptedTransport::new();
    transport.respond("paginatedTransactions", json!({"page": 0}), json!(1));
    transport.respond("paginatedTransactions", json!({"page": 1}), json!(2));
    transport.respond("transactionsByEmployee", json!({"employeeId": "e1"}), json!(3));
    transport.respond("employees", json!({}), json!(4));
    let fetch = CustomFetch::new(transport);

    let _: Option<Value> = fetch.fetch_with_cache("paginatedTransactions", &json!({"page": 0})).await.unwrap();
    let _: Option<Value> = fetch.fetch_with_cache("paginatedTransactions", &json!({"page": 1})).await.unwrap();
    let _: Option<Value> = fetch
        .fetch_with_cache("transactionsByEmployee", &json!({"employeeId": "e1"}))
        .await
        .unwrap();
    let _: Option<Value> = fetch.fetch_with_cache("employees", &json!({})).await.unwrap();
    fetch
}

#[tokio::test]
async fn test_clear_cache() {
    let fetch = warmed_fetch().await;
    assert_eq!(fetch.cache_len(), 4);

    fetch.clear_cache();
    assert_eq!(fetch.cache_len(), 0);
}

#[tokio::test]
async fn test_clear_cache_by_endpoint() {
    let fetch = warmed_fetch().await;

    fetch.clear_cache_by_endpoint(&["paginatedTransactions", "transactionsByEmployee"]);

    assert_eq!(fetch.cache_len(), 1);
    assert!(fetch.is_cached("employees", &json!({})));
    assert!(!fetch.is_cached("paginatedTransactions", &json!({"page": 0})));

    let _: Option<Value> = fetch
        .fetch_with_cache("paginatedTransactions", &json!({"page": 0}))
        .await
        .unwrap();
    assert_eq!(fetch.transport().call_count(), 5);
}

// ============================================================================
// Loading Tests
// ============================================================================

#[tokio::test]
async fn test_loading_while_in_flight() {
    let (transport, mut started) = GatedTransport::new(vec![json!("done")]);
    let fetch = Arc::new(CustomFetch::new(transport));
    assert!(!fetch.loading());

    let task = tokio::spawn({
        let fetch = Arc::clone(&fetch);
        async move {
            let value: Option<String> = fetch.fetch_with_cache("ep", &json!({})).await?;
            Ok::<_, Error>(value)
        }
    });

    started.recv().await.unwrap();
    assert!(fetch.loading());

    fetch.transport().release(1);
    let value = task.await.unwrap().unwrap();

    assert_eq!(value.as_deref(), Some("done"));
    assert!(!fetch.loading());
}

#[tokio::test]
async fn test_cache_hit_does_not_flip_loading() {
    let transport = ScriptedTransport::new();
    transport.respond("ep", json!({}), json!(1));
    let fetch = CustomFetch::new(transport);

    let _: Option<u32> = fetch.fetch_with_cache("ep", &json!({})).await.unwrap();
    let _: Option<u32> = fetch.fetch_with_cache("ep", &json!({})).await.unwrap();

    assert!(!fetch.loading());
    assert_eq!(fetch.transport().call_count(), 1);
}

#[tokio::test]
async fn test_fetch_through_shared_dyn_transport() {
    let scripted = Arc::new(ScriptedTransport::new());
    scripted.respond("ep", json!({}), json!("shared"));
    let transport: Arc<dyn Transport> = scripted.clone();
    let fetch = CustomFetch::new(transport);

    let value: Option<String> = fetch.fetch_with_cache("ep", &json!({})).await.unwrap();

    assert_eq!(value.as_deref(), Some("shared"));
    assert_eq!(scripted.call_count(), 1);
}
