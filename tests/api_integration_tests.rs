mod common;

use common::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_full_lifecycle() {
    let server = TestServer::start().await;

    let response = server
        .post_gas(json!({
            "network": "ETH",
            "discord_bot_token": "abc",
            "set_nickname": true,
            "frequency": 30
        }))
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["network"], "ETH");
    assert_eq!(body["set_nickname"], true);
    assert_eq!(body["frequency"], 30);
    assert!(body.get("token").is_none());
    assert!(body.get("discord_bot_token").is_none());

    let response = server
        .post_gas(json!({
            "network": "ETH",
            "discord_bot_token": "abc",
            "set_nickname": true,
            "frequency": 30
        }))
        .await;
    assert_eq!(response.status(), 409);

    let list = server.list_gas().await;
    let entries = list.as_object().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries.contains_key("ETH"));

    let response = server.delete_gas("ETH").await;
    assert_eq!(response.status(), 204);
    assert!(response.bytes().await.unwrap().is_empty());

    let list = server.list_gas().await;
    assert!(list.as_object().unwrap().is_empty());

    let response = server.delete_gas("ETH").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_missing_required_fields() {
    let server = TestServer::start().await;

    let response = server
        .post_gas(json!({"network": "", "discord_bot_token": "abc"}))
        .await;
    assert_eq!(response.status(), 400);

    let response = server.post_gas(json!({"network": "BTC"})).await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_INPUT");

    assert!(server.list_gas().await.as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_empty_values_are_taken_as_given() {
    let server = TestServer::start().await;

    let response = server
        .post_gas(json!({"network": "BTC", "discord_bot_token": "   ", "set_nickname": null}))
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["set_nickname"], false);

    server
        .post_gas(json!({"network": "arb", "discord_bot_token": "abc"}))
        .await;
    assert_eq!(server.delete_gas("%20arb%20").await.status(), 404);
    assert_eq!(server.delete_gas("arb").await.status(), 204);
}

#[tokio::test]
async fn test_malformed_body() {
    let server = TestServer::start().await;

    let response = server
        .client
        .post(server.url("/gas"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = server
        .post_gas(json!({"network": "ETH", "discord_bot_token": "abc", "frequency": "often"}))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_network_is_case_insensitive() {
    let server = TestServer::start().await;

    let response = server
        .post_gas(json!({"network": "matic", "discord_bot_token": "abc"}))
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["network"], "MATIC");
    assert_eq!(body["frequency"], 60);

    let response = server
        .post_gas(json!({"network": "Matic", "discord_bot_token": "abc"}))
        .await;
    assert_eq!(response.status(), 409);

    let response = server.delete_gas("matic").await;
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_list_matches_created_entries() {
    let server = TestServer::start().await;

    for (network, frequency, nickname) in [("ETH", 30, true), ("BTC", 120, false), ("SOL", 0, true)] {
        let response = server
            .post_gas(json!({
                "network": network,
                "discord_bot_token": "secret-token",
                "set_nickname": nickname,
                "frequency": frequency
            }))
            .await;
        assert_eq!(response.status(), 200);
    }

    let list = server.list_gas().await;
    let entries = list.as_object().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries["ETH"]["frequency"], 30);
    assert_eq!(entries["ETH"]["set_nickname"], true);
    assert_eq!(entries["BTC"]["frequency"], 120);
    assert_eq!(entries["BTC"]["set_nickname"], false);
    assert_eq!(entries["SOL"]["frequency"], 60);
    assert!(!list.to_string().contains("secret-token"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_for_same_network() {
    let server = TestServer::start().await;

    let mut requests = Vec::new();
    for _ in 0..10 {
        let client = server.client.clone();
        let url = server.url("/gas");
        requests.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({"network": "ETH", "discord_bot_token": "abc"}))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    let mut ok = 0;
    let mut conflict = 0;
    for request in requests {
        match request.await.unwrap().as_u16() {
            200 => ok += 1,
            409 => conflict += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflict, 9);
    assert_eq!(server.registry.len().await, 1);
    assert_eq!(server.registry.metrics().gas_count().get(), 1);
}

#[tokio::test]
async fn test_creates_are_persisted_and_deletes_are_not() {
    let server = TestServer::start_with_db().await;
    let pool = server.pool.clone().unwrap();

    let response = server
        .post_gas(json!({"network": "ETH", "discord_bot_token": "abc", "frequency": 30}))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(server.delete_gas("ETH").await.status(), 204);

    let response = server
        .post_gas(json!({"network": "eth", "discord_bot_token": "def", "frequency": 45}))
        .await;
    assert_eq!(response.status(), 200);

    let rows: Vec<(String, String, i64)> =
        sqlx::query_as("SELECT network, token, frequency FROM gases")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(rows, vec![("ETH".to_string(), "def".to_string(), 45)]);

    assert_eq!(server.delete_gas("ETH").await.status(), 204);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gases")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_store_failure_does_not_block_create() {
    let server = TestServer::start_with_db().await;
    server.pool.as_ref().unwrap().close().await;

    let response = server
        .post_gas(json!({"network": "ETH", "discord_bot_token": "abc"}))
        .await;
    assert_eq!(response.status(), 200);

    let list = server.list_gas().await;
    assert!(list.as_object().unwrap().contains_key("ETH"));
}

#[tokio::test]
async fn test_metrics_track_watch_count() {
    let server = TestServer::start().await;

    server
        .post_gas(json!({"network": "ETH", "discord_bot_token": "abc"}))
        .await;
    server
        .post_gas(json!({"network": "BTC", "discord_bot_token": "abc"}))
        .await;
    server.delete_gas("BTC").await;

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains("gas_watchers 1"));
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["watching"], 0);

    let response = server
        .client
        .get(server.url("/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_shutdown_empties_registry() {
    let server = TestServer::start().await;

    server
        .post_gas(json!({"network": "ETH", "discord_bot_token": "abc"}))
        .await;
    let gas = server.registry.get("ETH").await.unwrap();
    assert!(!gas.handle().is_stopped());

    server.registry.shutdown().await;

    assert!(gas.handle().is_stopped());
    assert!(server.list_gas().await.as_object().unwrap().is_empty());
}
