use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use github_proxy::github::client::GitHubClient;
use github_proxy::github::types::{Branch, CommitRef};
use github_proxy::server::{self, AppState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
}

#[derive(Clone)]
struct MockState {
    stubs: Arc<HashMap<String, Stub>>,
    delay: Duration,
    requests: Arc<Mutex<Vec<String>>>,
}

// Logs every request and answers after a fixed delay; unknown paths get GitHub's 404 body.
pub struct MockGitHub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub struct MockGitHubBuilder {
    stubs: HashMap<String, Stub>,
    delay: Duration,
}

impl MockGitHubBuilder {
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn json(self, path: &str, body: &str) -> Self {
        self.status(path, 200, body)
    }

    pub fn status(mut self, path: &str, status: u16, body: &str) -> Self {
        self.stubs.insert(
            path.to_string(),
            Stub {
                status: StatusCode::from_u16(status).expect("valid status"),
                body: body.to_string(),
            },
        );
        self
    }

    pub async fn start(self) -> MockGitHub {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            stubs: Arc::new(self.stubs),
            delay: self.delay,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(respond).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock github");
        let addr = listener.local_addr().expect("mock github addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock github serve");
        });

        MockGitHub {
            base_url: format!("http://{addr}"),
            requests,
            handle,
        }
    }
}

impl MockGitHub {
    pub fn builder() -> MockGitHubBuilder {
        MockGitHubBuilder::default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| p.as_str() == path).count()
    }
}

impl Drop for MockGitHub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(State(state): State<MockState>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    state.requests.lock().expect("request log").push(path.clone());
    tokio::time::sleep(state.delay).await;

    let (status, body) = match state.stubs.get(&path) {
        Some(stub) => (stub.status, stub.body.clone()),
        None => (
            StatusCode::NOT_FOUND,
            r#"{"message":"Not Found"}"#.to_string(),
        ),
    };
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub async fn spawn_proxy(upstream: &str) -> String {
    let client = GitHubClient::new(upstream).expect("github client");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind proxy");
    let addr = listener.local_addr().expect("proxy addr");
    let state = AppState::new(Arc::new(client));
    tokio::spawn(async move {
        server::serve(listener, state, std::future::pending())
            .await
            .expect("proxy serve");
    });
    format!("http://{addr}")
}

pub fn branch(name: &str, sha: &str) -> Branch {
    Branch {
        name: name.to_string(),
        commit: CommitRef {
            sha: sha.to_string(),
        },
    }
}

pub fn is_commit_sha(sha: &str) -> bool {
    sha.len() == 40 && sha.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}
