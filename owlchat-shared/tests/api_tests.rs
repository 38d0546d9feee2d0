//! Integration tests for the OWLDB client against an in-process mock server.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use serde_json::{Value, json};
use shared::config::Config;
use shared::models::{NewPost, ReactionKind};
use shared::{ClientError, MemoryTokenStore, OwlClient, StreamEvent, TokenStore};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: Option<String>,
    auth: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockState {
    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn meta() -> Value {
    json!({
        "createdBy": "ada",
        "createdAt": 1_700_000_000_000_i64,
        "lastModifiedBy": "ada",
        "lastModifiedAt": 1_700_000_000_000_i64
    })
}

fn post_doc(id: &str, parent: &str, at: i64) -> Value {
    json!({
        "path": format!("/team/channels/general/posts/{id}"),
        "meta": {"createdBy": "bob", "createdAt": at, "lastModifiedBy": "bob", "lastModifiedAt": at},
        "doc": {"msg": format!("post {id}"), "parent": parent, "reactions": {"like": ["ada"], "smile": []}}
    })
}

fn json_response(status: StatusCode, body: &Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        auth: auth.clone(),
        body: body.clone(),
    });

    let path = uri.path();
    if path == "/auth" {
        if method == Method::DELETE {
            return StatusCode::NO_CONTENT.into_response();
        }
        let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let name = request["username"].as_str().unwrap_or_default();
        if name == "intruder" {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        return json_response(StatusCode::OK, &json!({"token": format!("tok-{name}")}));
    }

    if auth.as_deref().is_none_or(|value| !value.starts_with("Bearer tok-")) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match (method, path) {
        (Method::GET, "/v1/owlchat/") => json_response(
            StatusCode::OK,
            &json!([
                {"path": "/team", "meta": meta(), "doc": {}},
                {"path": "/my%20home", "meta": meta(), "doc": {}}
            ]),
        ),
        (Method::GET, "/v1/owlchat/broken/channels/") => json_response(
            StatusCode::OK,
            &json!([{"path": "/broken/channels/x", "doc": {}}]),
        ),
        (Method::GET, "/v1/owlchat/team/channels/general/posts/") => {
            if uri.query() == Some("mode=subscribe") {
                let first = post_doc("1", "", 10);
                let body = format!(
                    "15 sec\n\nevent: update\ndata: {first}\nid: 10\n\nevent: delete\ndata: {first}\n\n"
                );
                return (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "text/event-stream")],
                    body,
                )
                    .into_response();
            }
            json_response(
                StatusCode::OK,
                &json!([post_doc("2", "/team/channels/general/posts/1", 20), post_doc("1", "", 10)]),
            )
        }
        (Method::GET, _) => StatusCode::NOT_FOUND.into_response(),
        (Method::POST, _) => json_response(
            StatusCode::CREATED,
            &json!({"uri": format!("{path}new")}),
        ),
        (Method::DELETE, _) => StatusCode::NO_CONTENT.into_response(),
        _ => json_response(StatusCode::OK, &json!({"uri": path})),
    }
}

async fn spawn_mock() -> (String, MockState) {
    let state = MockState::default();
    let app = Router::new().fallback(handle).with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn client_for(host: &str) -> (OwlClient, Arc<MemoryTokenStore>) {
    let mut config = Config::with_defaults();
    config.database.host = host.to_string();
    let tokens = Arc::new(MemoryTokenStore::new());
    (OwlClient::from_config(&config, tokens.clone()), tokens)
}

async fn logged_in() -> (OwlClient, MockState) {
    let (host, state) = spawn_mock().await;
    let (client, _) = client_for(&host);
    client.login("ada").await.unwrap();
    (client, state)
}

#[tokio::test]
async fn test_login_stores_token_and_authorizes_requests() {
    let (host, state) = spawn_mock().await;
    let (client, tokens) = client_for(&host);

    let name = client.login(" ada ").await.unwrap();
    assert_eq!(name, "ada");
    assert_eq!(tokens.load().unwrap().as_deref(), Some("tok-ada"));

    client.get_workspaces().await.unwrap();
    let requests = state.requests();
    assert_eq!(requests[0].body, r#"{"username":"ada"}"#);
    assert!(requests[0].auth.is_none());
    assert_eq!(requests[1].auth.as_deref(), Some("Bearer tok-ada"));
}

#[tokio::test]
async fn test_blank_login_sends_nothing() {
    let (host, state) = spawn_mock().await;
    let (client, _) = client_for(&host);

    let err = client.login("").await.unwrap_err();
    assert!(err.is_validation());
    assert!(state.requests().is_empty());
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_rejected_login_leaves_user_logged_out() {
    let (host, _) = spawn_mock().await;
    let (client, _) = client_for(&host);

    let err = client.login("intruder").await.unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 401, .. }));
    assert_eq!(err.to_string(), "401 Unauthorized");
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_workspace_listing_is_validated_and_named() {
    let (client, _) = logged_in().await;

    let workspaces = client.get_workspaces().await.unwrap();
    let names: Vec<_> = workspaces.iter().map(|doc| doc.name()).collect();
    assert_eq!(names, vec!["team", "my home"]);

    let err = client.get_channels("broken").await.unwrap_err();
    assert!(matches!(err, ClientError::Schema { .. }));
}

#[tokio::test]
async fn test_missing_resource_reports_status_line() {
    let (client, _) = logged_in().await;
    let err = client.get_channels("nowhere").await.unwrap_err();
    assert_eq!(err.to_string(), "404 Not Found");
}

#[tokio::test]
async fn test_posts_are_projected() {
    let (client, _) = logged_in().await;
    let posts = client.get_posts("team", "general").await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].parent.as_deref(), Some("/team/channels/general/posts/1"));
    assert!(posts[1].is_root());
    assert_eq!(posts[1].reaction_counts(), vec![(ReactionKind::Like, 1)]);
}

#[tokio::test]
async fn test_create_database_puts_base_path() {
    let (client, state) = logged_in().await;
    client.create_database().await.unwrap();

    let put = state
        .requests()
        .into_iter()
        .find(|request| request.method == Method::PUT)
        .unwrap();
    assert_eq!(put.path, "/v1/owlchat");
    assert!(put.body.is_empty());
    assert_eq!(put.auth.as_deref(), Some("Bearer tok-ada"));
}

#[tokio::test]
async fn test_create_workspace_and_channel_put_collections() {
    let (client, state) = logged_in().await;
    client.create_workspace("new team").await.unwrap();
    client.create_channel("new team", "general").await.unwrap();

    let puts: Vec<_> = state
        .requests()
        .into_iter()
        .filter(|request| request.method == Method::PUT)
        .collect();
    assert_eq!(puts.len(), 4);
    assert_eq!(puts[0].path, "/v1/owlchat/new%20team");
    assert_eq!(puts[0].body, "{}");
    assert_eq!(puts[1].path, "/v1/owlchat/new%20team/channels/");
    assert!(puts[1].body.is_empty());
    assert_eq!(puts[2].path, "/v1/owlchat/new%20team/channels/general");
    assert_eq!(puts[3].path, "/v1/owlchat/new%20team/channels/general/posts/");
}

#[tokio::test]
async fn test_create_post_and_reaction_bodies() {
    let (client, state) = logged_in().await;

    let created = client
        .create_post("team", "general", &NewPost::new("hello", None))
        .await
        .unwrap();
    assert!(created.is_some());
    client
        .add_reaction("/team/channels/general/posts/1", ReactionKind::Celebrate, "ada")
        .await
        .unwrap();

    let requests = state.requests();
    let post = requests.iter().find(|r| r.method == Method::POST && r.path != "/auth").unwrap();
    let body: Value = serde_json::from_str(&post.body).unwrap();
    assert_eq!(body["msg"], "hello");
    assert_eq!(body["reactions"]["frown"], json!([]));

    let patch = requests.iter().find(|r| r.method == Method::PATCH).unwrap();
    assert_eq!(patch.path, "/v1/owlchat/team/channels/general/posts/1");
    assert_eq!(
        serde_json::from_str::<Value>(&patch.body).unwrap(),
        json!([{"op": "ArrayAdd", "path": "/reactions/celebrate", "value": "ada"}])
    );
}

#[tokio::test]
async fn test_delete_and_logout() {
    let (client, state) = logged_in().await;
    client.delete_channel("team", "general").await.unwrap();
    client.delete_workspace("team").await.unwrap();
    client.logout().await.unwrap();
    assert!(!client.is_logged_in());

    let deletes: Vec<_> = state
        .requests()
        .into_iter()
        .filter(|request| request.method == Method::DELETE)
        .map(|request| request.path)
        .collect();
    assert_eq!(
        deletes,
        vec!["/v1/owlchat/team/channels/general", "/v1/owlchat/team", "/auth"]
    );

    let err = client.get_workspaces().await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
}

#[tokio::test]
async fn test_logout_clears_token_when_server_is_gone() {
    let (client, tokens) = client_for("http://127.0.0.1:1");
    tokens.save("stale").unwrap();
    assert!(client.logout().await.is_err());
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_subscription_classifies_frames() {
    let (client, state) = logged_in().await;
    let events: Vec<_> = client.subscribe("team", "general").collect().await;

    let events: Vec<StreamEvent> = events.into_iter().map(Result::unwrap).collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], StreamEvent::KeepAlive);
    match &events[1] {
        StreamEvent::Post(post) => assert_eq!(post.contents, "post 1"),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(events[2], StreamEvent::Violation("delete".into()));

    let subscribe = state
        .requests()
        .into_iter()
        .find(|request| request.query.is_some())
        .unwrap();
    assert_eq!(subscribe.query.as_deref(), Some("mode=subscribe"));
}
