//! End-to-end query workflows: prefetch-then-read, mutation-driven
//! invalidation, guarded reads, and notification accounting.

mod common;

use common::{deployment_json, envelope, TestFixture};
use opsdeck::query::descriptors;
use opsdeck::{Method, NotificationKind, QueryState};
use serde_json::json;

#[test]
fn test_prefetch_then_read_fetches_once() {
    let fixture = TestFixture::new();
    fixture.transport.respond(
        Method::Get,
        "/deployments",
        envelope(json!([deployment_json(1, "chat-api", "running")])),
    );

    // Route loader warms the cache...
    fixture.console.prefetch(&[descriptors::deployments(
        fixture.console.deployments(),
    )]);

    // ...and the render-time read targets the same slot
    let deployments = fixture.console.deployments_query().read().unwrap();

    assert_eq!(deployments.len(), 1);
    assert_eq!(fixture.calls_to(Method::Get, "/deployments").len(), 1);
}

#[test]
fn test_prefetch_failure_is_swallowed_and_read_retries() {
    let fixture = TestFixture::new();
    fixture
        .transport
        .fail(Method::Get, "/deployments", "gateway timeout");
    fixture.transport.respond(
        Method::Get,
        "/deployments",
        envelope(json!([deployment_json(1, "chat-api", "running")])),
    );

    // Prefetch hits the failure and swallows it
    fixture.console.prefetch(&[descriptors::deployments(
        fixture.console.deployments(),
    )]);

    // The read retries and succeeds
    let deployments = fixture.console.deployments_query().read().unwrap();
    assert_eq!(deployments[0].name, "chat-api");
    assert_eq!(fixture.calls_to(Method::Get, "/deployments").len(), 2);
}

#[test]
fn test_mutation_invalidates_so_read_never_serves_pre_mutation_data() {
    let fixture = TestFixture::new();
    // First listing: two deployments; after the delete: one
    fixture.transport.respond(
        Method::Get,
        "/deployments",
        envelope(json!([
            deployment_json(1, "chat-api", "running"),
            deployment_json(2, "embeddings", "running"),
        ])),
    );
    fixture.transport.respond(
        Method::Get,
        "/deployments",
        envelope(json!([deployment_json(1, "chat-api", "running")])),
    );
    fixture
        .transport
        .respond(Method::Delete, "/deployments/2", envelope(json!({})));

    let before = fixture.console.deployments_query().read().unwrap();
    assert_eq!(before.len(), 2);

    fixture
        .console
        .delete_deployment_mutation()
        .execute(&2)
        .unwrap();

    // The listing key was declared stale: this read must refetch
    let after = fixture.console.deployments_query().read().unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(fixture.calls_to(Method::Get, "/deployments").len(), 2);

    // Exactly one success notification for the mutation
    assert_eq!(
        fixture.notifier.messages(),
        vec![(NotificationKind::Success, "Deployment deleted".to_string())]
    );
}

#[test]
fn test_mutation_failure_notifies_once_and_cache_stays_fresh() {
    let fixture = TestFixture::new();
    fixture.transport.respond(
        Method::Get,
        "/deployments",
        envelope(json!([deployment_json(1, "chat-api", "running")])),
    );
    fixture.transport.reject(
        Method::Delete,
        "/deployments/1",
        409,
        Some("deployment is serving traffic"),
    );

    fixture.console.deployments_query().read().unwrap();
    let result = fixture.console.delete_deployment_mutation().execute(&1);
    assert!(result.is_err());

    // One error notification, with the server's message
    assert_eq!(
        fixture.notifier.messages(),
        vec![(
            NotificationKind::Error,
            "deployment is serving traffic".to_string()
        )]
    );

    // A failed mutation invalidates nothing: the cached listing still serves
    fixture.console.deployments_query().read().unwrap();
    assert_eq!(fixture.calls_to(Method::Get, "/deployments").len(), 1);
}

#[test]
fn test_guarded_read_waits_for_parameter() {
    let fixture = TestFixture::new();
    fixture.transport.respond(
        Method::Get,
        "/deployments/5",
        envelope(deployment_json(5, "rerank", "running")),
    );

    // Parameter not yet available: no fetch is issued
    let guarded = fixture.console.deployment_query(None);
    assert!(guarded.state().is_pending());
    assert!(fixture.transport.calls().is_empty());

    // Parameter resolved: the rebuilt query fetches
    let ready = fixture.console.deployment_query(Some(5));
    match ready.state() {
        QueryState::Ready(deployment) => assert_eq!(deployment.name, "rerank"),
        other => panic!("expected data, got {other:?}"),
    }
    assert_eq!(fixture.calls_to(Method::Get, "/deployments/5").len(), 1);
}

#[test]
fn test_login_stores_session_before_notifying() {
    let fixture = TestFixture::new();
    fixture.transport.respond(
        Method::Post,
        "/auth/login",
        envelope(json!({"token": "jwt-001", "role": "Admin"})),
    );

    let session = fixture
        .console
        .login_mutation()
        .execute(&opsdeck::types::Credentials {
            email: "op@example.com".into(),
            password: "hunter2".into(),
        })
        .unwrap();

    assert_eq!(session.token, "jwt-001");
    // Side effects landed: token persisted, role derived
    assert_eq!(
        fixture.console.tokens().token().unwrap().as_deref(),
        Some("jwt-001")
    );
    assert!(fixture.console.role_store().role().is_admin());
    assert_eq!(
        fixture.notifier.messages(),
        vec![(NotificationKind::Success, "Signed in".to_string())]
    );
}

#[test]
fn test_login_failure_uses_fallback_message_and_stores_nothing() {
    let fixture = TestFixture::new();
    fixture
        .transport
        .fail(Method::Post, "/auth/login", "dns failure");

    let result = fixture
        .console
        .login_mutation()
        .execute(&opsdeck::types::Credentials {
            email: "op@example.com".into(),
            password: "hunter2".into(),
        });

    assert!(result.is_err());
    assert_eq!(fixture.console.tokens().token().unwrap(), None);
    assert_eq!(
        fixture.notifier.messages(),
        vec![(NotificationKind::Error, "Sign-in failed".to_string())]
    );
}

#[test]
fn test_cluster_mutations_invalidate_entity_and_status_keys() {
    let fixture = TestFixture::new();
    fixture.transport.respond(
        Method::Get,
        "/infrastructure",
        envelope(json!([{"id": 1, "name": "prod-eu", "status": "ready", "region": "eu-1"}])),
    );
    fixture.transport.respond(
        Method::Get,
        "/infrastructure/1/status",
        envelope(json!({"phase": "Ready", "ready": true})),
    );
    fixture
        .transport
        .respond(Method::Delete, "/infrastructure/1", envelope(json!({})));

    fixture.console.clusters_query().read().unwrap();
    let status_query = fixture
        .console
        .cluster_status_query(1, std::time::Duration::from_secs(3600));
    status_query.read().unwrap();

    fixture
        .console
        .remove_cluster_mutation()
        .execute(&1)
        .unwrap();

    // Resource-wide invalidation reaches both the listing and the status key
    fixture.console.clusters_query().read().unwrap();
    status_query.read().unwrap();
    assert_eq!(fixture.calls_to(Method::Get, "/infrastructure").len(), 2);
    assert_eq!(
        fixture.calls_to(Method::Get, "/infrastructure/1/status").len(),
        2
    );
}
