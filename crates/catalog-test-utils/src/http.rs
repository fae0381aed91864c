//! Stub HTTP host for catalog tests.
//!
//! An axum router serving canned responses keyed by request path. Unknown
//! paths answer `404`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned response for one path.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    /// `200 OK` with a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Arbitrary status with a JSON body.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn not_found() -> Self {
        Self::status(404, "404: Not Found")
    }
}

impl IntoResponse for StubResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

async fn count_hit(State(hits): State<Arc<AtomicUsize>>, request: Request, next: Next) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

/// Local HTTP server that answers catalog requests from a route table.
///
/// The server task is aborted when the value is dropped.
pub struct StubCatalogServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl StubCatalogServer {
    /// Bind to an ephemeral localhost port and start serving `routes`.
    ///
    /// Route keys are full request paths, e.g. `/specs/index.json`.
    ///
    /// # Panics
    /// Panics if the listener cannot be bound.
    pub async fn start<I, P>(routes: I) -> Self
    where
        I: IntoIterator<Item = (P, StubResponse)>,
        P: Into<String>,
    {
        let hits = Arc::new(AtomicUsize::new(0));

        let mut app = Router::new();
        for (path, response) in routes {
            let path: String = path.into();
            app = app.route(&path, get(move || async move { response }));
        }
        let app = app
            .fallback(|| async { StubResponse::not_found() })
            .layer(middleware::from_fn_with_state(Arc::clone(&hits), count_hit));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("StubCatalogServer: bind failed: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("StubCatalogServer: no local addr: {e}"));

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, hits, task }
    }

    /// Catalog base URL; routes should be registered under `/specs`.
    pub fn base_url(&self) -> String {
        format!("http://{}/specs", self.addr)
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for StubCatalogServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A base URL on localhost where nothing is listening.
///
/// # Panics
/// Panics if a temporary listener cannot be bound.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("unreachable_base_url: bind failed: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("unreachable_base_url: no local addr: {e}"));
    drop(listener);
    format!("http://{addr}/specs")
}
