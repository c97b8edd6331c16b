//! In-process stand-in for a GoRest-compatible users resource.
//!
//! Serves the same status codes, bodies and pagination headers the suite
//! checks for, backed by a [`ResourceActor`] holding [`RemoteUser`] records.
//! Used by `--mock` runs and by the crate's own tests.

pub mod entity;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{ResourceActor, ResourceClient};
use crate::domain::{ApiMessage, NewUser, RemoteUser, INVALID_TOKEN, RESOURCE_NOT_FOUND};
use crate::error::StoreError;
use entity::UserDraft;

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Clone)]
pub struct MockState {
    token: Arc<str>,
    store: ResourceClient<RemoteUser>,
}

impl MockState {
    pub fn new(token: impl Into<String>, store: ResourceClient<RemoteUser>) -> Self {
        Self {
            token: Arc::from(token.into()),
            store,
        }
    }
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user)
                .patch(update_user)
                .put(update_user)
                .delete(delete_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiMessage::new(message))).into_response()
}

fn not_found() -> Response {
    message_response(StatusCode::NOT_FOUND, RESOURCE_NOT_FOUND)
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        match self {
            StoreError::NotFound(_) => not_found(),
            StoreError::Invalid(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            other => {
                error!(error = %other, "Users store unavailable");
                message_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

async fn require_token(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.token);
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if authorized {
        next.run(request).await
    } else {
        debug!(path = %request.uri().path(), "Rejected request with bad token");
        message_response(StatusCode::UNAUTHORIZED, INVALID_TOKEN)
    }
}

/// Non-numeric ids are treated as unknown records rather than bad requests.
fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

fn parse_draft(body: &[u8]) -> UserDraft {
    serde_json::from_slice(body).unwrap_or_default()
}

async fn create_user(State(state): State<MockState>, body: Bytes) -> Response {
    match state.store.create(parse_draft(&body)).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_user(State(state): State<MockState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return not_found();
    };
    match state.store.get(id).await {
        Ok(Some(user)) => Json(user).into_response(),
        Ok(None) => not_found(),
        Err(e) => e.into_response(),
    }
}

async fn update_user(
    State(state): State<MockState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return not_found();
    };
    match state.store.update(id, parse_draft(&body)).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_user(State(state): State<MockState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return not_found();
    };
    match state.store.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    per_page: Option<String>,
}

impl ListParams {
    /// 1-based page; anything unparsable or zero means the first page.
    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    fn per_page(&self) -> usize {
        self.per_page
            .as_deref()
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| *p > 0)
            .map_or(DEFAULT_PER_PAGE, |p| p.min(MAX_PER_PAGE))
    }
}

async fn list_users(State(state): State<MockState>, Query(params): Query<ListParams>) -> Response {
    let page = params.page();
    let limit = params.per_page();
    let offset = (page - 1).saturating_mul(limit);

    let listing = match state.store.list(offset, limit).await {
        Ok(listing) => listing,
        Err(e) => return e.into_response(),
    };
    let pages = listing.total.div_ceil(limit).max(1);

    let mut response = Json(listing.items).into_response();
    let headers = response.headers_mut();
    headers.insert("x-pagination-total", HeaderValue::from(listing.total));
    headers.insert("x-pagination-pages", HeaderValue::from(pages));
    headers.insert("x-pagination-page", HeaderValue::from(page));
    headers.insert("x-pagination-limit", HeaderValue::from(limit));
    response
}

/// A running mock users service bound to an ephemeral localhost port.
pub struct MockUsersService {
    base_url: String,
    store: ResourceClient<RemoteUser>,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<()>,
    actor: JoinHandle<()>,
}

impl MockUsersService {
    /// Starts the store actor and the HTTP server. Requests must carry
    /// `Authorization: Bearer <token>`.
    #[instrument(skip_all)]
    pub async fn start(token: impl Into<String>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let id_counter = Arc::new(AtomicU64::new(1));
        let next_id = move || id_counter.fetch_add(1, Ordering::SeqCst);
        let (actor, store) = ResourceActor::<RemoteUser>::new(32, next_id);
        let actor = tokio::spawn(actor.run());

        let app = router(MockState::new(token, store.clone()));
        let (shutdown, signal) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal.await;
                })
                .await;
            if let Err(e) = served {
                error!(error = %e, "Mock users service failed");
            }
        });

        let base_url = format!("http://{addr}");
        info!(base_url = %base_url, "Mock users service listening");
        Ok(Self {
            base_url,
            store,
            shutdown,
            server,
            actor,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg(test)]
    pub fn store(&self) -> &ResourceClient<RemoteUser> {
        &self.store
    }

    /// Inserts `users` directly into the store, skipping any that collide
    /// with an existing email. Returns the ids that were assigned.
    pub async fn seed(&self, users: impl IntoIterator<Item = NewUser>) -> Result<Vec<u64>, StoreError> {
        let mut ids = Vec::new();
        for user in users {
            match self.store.create(user.into()).await {
                Ok(created) => ids.push(created.id),
                Err(StoreError::Invalid(errors)) => {
                    warn!(?errors, "Skipped seed user");
                }
                Err(e) => return Err(e),
            }
        }
        debug!(count = ids.len(), "Seeded users");
        Ok(ids)
    }

    pub async fn shutdown(self) {
        info!("Shutting down mock users service");
        let _ = self.shutdown.send(());
        if let Err(e) = self.server.await {
            error!("Mock server task failed: {:?}", e);
        }
        drop(self.store);
        if let Err(e) = self.actor.await {
            error!("Store actor task failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults_and_caps() {
        let params = ListParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);

        let params = ListParams {
            page: Some("0".into()),
            per_page: Some("500".into()),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), MAX_PER_PAGE);

        let params = ListParams {
            page: Some("3".into()),
            per_page: Some("abc".into()),
        };
        assert_eq!(params.page(), 3);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_malformed_body_becomes_empty_draft() {
        let draft = parse_draft(b"not json");
        assert!(draft.name.is_none() && draft.email.is_none());
        let draft = parse_draft(br#"{"name":"test"}"#);
        assert_eq!(draft.name.as_deref(), Some("test"));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-1"), None);
    }
}
