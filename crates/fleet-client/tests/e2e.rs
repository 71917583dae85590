//! End-to-end: a real gateway in front of a mock upstream, driven through the
//! typed client and the orchestrator.

use fleet_client::cache::CacheKey;
use fleet_client::orchestrator::{ActionKind, ActionOutcome, ActionRequest, ResourceKind};
use fleet_client::{Client, ClientError, Orchestrator};
use fleet_core::config::ConsoleConfig;
use fleet_core::credential::Credential;
use fleet_core::resource::{Machine, MachineState};

/// Boot the gateway on an ephemeral port, proxying to `upstream`.
async fn spawn_gateway(upstream: &str) -> String {
    let config = ConsoleConfig {
        upstream_base_url: upstream.to_string(),
        ..Default::default()
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        fleet_server::serve_on(&config, listener).await.unwrap();
    });
    format!("http://127.0.0.1:{port}")
}

fn client(gateway: &str) -> Client {
    Client::new(gateway, Credential::new("fo1_e2e", Some("acme")).unwrap())
}

const MACHINE_STOPPED: &str =
    r#"[{"id":"m1","name":"web-1","state":"stopped","region":"fra","config":{"image":"nginx"}}]"#;
const MACHINE_STARTED: &str =
    r#"[{"id":"m1","name":"web-1","state":"started","region":"fra","config":{"image":"nginx"}}]"#;

#[tokio::test]
async fn start_action_through_gateway_invalidates_cache_and_next_fetch_sees_new_state() {
    let mut upstream = mockito::Server::new_async().await;
    let list_stopped = upstream
        .mock("GET", "/apps/demo/machines")
        .match_header("authorization", "Bearer fo1_e2e")
        .with_body(MACHINE_STOPPED)
        .expect(1)
        .create_async()
        .await;
    let start = upstream
        .mock("POST", "/apps/demo/machines/m1/start")
        .match_header("authorization", "Bearer fo1_e2e")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let gateway = spawn_gateway(&upstream.url()).await;
    let orch = Orchestrator::new(client(&gateway));
    let key = CacheKey::Machines { app: "demo".into() };

    // Initial fetch lands in the cache.
    let machines = orch.client_ref().list_machines("demo").await.unwrap();
    assert_eq!(machines[0].state, MachineState::Stopped);
    orch.cache_put(key.clone(), &machines);
    assert!(orch.cache_get::<Vec<Machine>>(&key).is_some());

    // Start the machine through the orchestrator.
    orch.request(ActionRequest {
        kind: ActionKind::Start,
        resource: ResourceKind::Machine,
        app: "demo".into(),
        target_id: "m1".into(),
        target_label: "web-1".into(),
    })
    .unwrap();
    let outcome = orch.execute("m1").await.unwrap();
    assert_eq!(outcome, ActionOutcome::Completed);

    // The mutation invalidated the cached list, so the next view must
    // refetch — and the refetch observes the new remote state.
    assert!(orch.cache_get::<Vec<Machine>>(&key).is_none());
    list_stopped.remove_async().await;
    let _list_started = upstream
        .mock("GET", "/apps/demo/machines")
        .with_body(MACHINE_STARTED)
        .create_async()
        .await;

    let machines = orch.client_ref().list_machines("demo").await.unwrap();
    assert_eq!(machines[0].state, MachineState::Started);
    start.assert_async().await;
}

#[tokio::test]
async fn upstream_error_envelope_surfaces_as_typed_error() {
    let mut upstream = mockito::Server::new_async().await;
    let _missing = upstream
        .mock("GET", "/apps/ghost")
        .with_status(404)
        .with_body(r#"{"error":"App not found"}"#)
        .create_async()
        .await;

    let gateway = spawn_gateway(&upstream.url()).await;
    let err = client(&gateway).get_app("ghost").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref m) if m.contains("App not found")));
    assert_eq!(err.upstream_status(), Some(404));
}

#[tokio::test]
async fn gateway_rejects_unauthenticated_requests_without_upstream_contact() {
    let mut upstream = mockito::Server::new_async().await;
    let untouched = upstream
        .mock("GET", "/apps")
        .expect(0)
        .create_async()
        .await;

    let gateway = spawn_gateway(&upstream.url()).await;
    let response = reqwest::get(format!("{gateway}/proxy/apps")).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    untouched.assert_async().await;
}
