//! # Mock Framework
//!
//! Utilities for testing store consumers in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_list`] to assert on
//! the requests and script the store's answers.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, Page, ResourceClient, ResourceRequest, Response};

/// Creates a mock client and a receiver for asserting requests.
///
/// Nothing answers the requests arriving on `receiver` except the test, so
/// success, validation failures and a vanished store can all be simulated
/// deterministically.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(usize, usize, Response<Page<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List {
            offset,
            limit,
            respond_to,
        }) => Some((offset, limit, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{FieldError, Gender, NewUser, RemoteUser, UserStatus, IS_INVALID};
    use crate::error::StoreError;
    use crate::mock_service::{router, MockState};

    const TOKEN: &str = "test-token";

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {TOKEN}"));
        match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn jane(id: u64) -> RemoteUser {
        RemoteUser {
            id,
            fields: NewUser::new("Jane Doe", Gender::Female, "jane.doe.x7z@gmail.com", UserStatus::Active),
        }
    }

    #[tokio::test]
    async fn test_create_forwards_draft_and_returns_201() {
        let (store, mut receiver) = create_mock_client::<RemoteUser>(10);
        let app = router(MockState::new(TOKEN, store));

        let call = tokio::spawn(app.oneshot(request(
            "POST",
            "/users",
            Some(json!({ "name": "Jane Doe", "gender": "female", "email": "jane.doe.x7z@gmail.com", "status": "active" })),
        )));

        let (draft, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(draft.name.as_deref(), Some("Jane Doe"));
        assert_eq!(draft.gender.as_deref(), Some("female"));
        responder.send(Ok(jane(77))).unwrap();

        let response = call.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["id"], json!(77));
        assert_eq!(body["email"], json!("jane.doe.x7z@gmail.com"));
    }

    #[tokio::test]
    async fn test_update_validation_error_becomes_422() {
        let (store, mut receiver) = create_mock_client::<RemoteUser>(10);
        let app = router(MockState::new(TOKEN, store));

        let call = tokio::spawn(app.oneshot(request("PATCH", "/users/5", Some(json!({ "email": "test" })))));

        let (id, patch, responder) = expect_update(&mut receiver).await.expect("Expected Update request");
        assert_eq!(id, 5);
        assert_eq!(patch.email.as_deref(), Some("test"));
        responder
            .send(Err(StoreError::Invalid(vec![FieldError::new("email", IS_INVALID)])))
            .unwrap();

        let response = call.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await, json!([{ "field": "email", "message": "is invalid" }]));
    }

    #[tokio::test]
    async fn test_dropped_store_reply_becomes_500() {
        let (store, mut receiver) = create_mock_client::<RemoteUser>(10);
        let app = router(MockState::new(TOKEN, store));

        let call = tokio::spawn(app.oneshot(request("GET", "/users/1", None)));
        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        drop(responder);

        let response = call.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_pages_and_headers() {
        let (store, mut receiver) = create_mock_client::<RemoteUser>(10);
        let app = router(MockState::new(TOKEN, store));

        let call = tokio::spawn(app.oneshot(request("GET", "/users?page=3&per_page=2", None)));
        let (offset, limit, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        assert_eq!((offset, limit), (4, 2));
        responder
            .send(Ok(Page {
                items: vec![jane(2), jane(1)],
                total: 7,
            }))
            .unwrap();

        let response = call.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["x-pagination-total"], "7");
        assert_eq!(headers["x-pagination-pages"], "4");
        assert_eq!(headers["x-pagination-page"], "3");
        assert_eq!(headers["x-pagination-limit"], "2");
        assert_eq!(body_json(response).await.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_bad_token_never_reaches_store() {
        let (store, mut receiver) = create_mock_client::<RemoteUser>(10);
        let app = router(MockState::new(TOKEN, store));

        let req = Request::builder()
            .uri("/users")
            .header(AUTHORIZATION, "Bearer invalid_token")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "message": "Invalid token" }));
        assert!(receiver.try_recv().is_err());
    }
}
