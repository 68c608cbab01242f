// GET /users handler

use async_stream::stream;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use std::sync::Arc;
use tracing::{error, info};
use warp::http::header::{HeaderValue, CONTENT_TYPE};
use warp::hyper::Body;
use warp::reply::Response;
use warp::Rejection;

use crate::error::ApiError;
use crate::models::User;
use crate::store::{self, UserStore};

pub async fn list_users_handler(store: Arc<dyn UserStore>) -> Result<Response, Rejection> {
    info!("GET /users");

    let mut users = store.find_all().await;

    // A store failing before anything is written still gets a proper 500
    let first = match users.next().await {
        Some(Ok(user)) => Some(user),
        Some(Err(err)) => return Err(warp::reject::custom(ApiError::UpstreamFailure(err))),
        None => None,
    };

    let body = json_array(futures::stream::iter(first.map(Ok)).chain(users));

    let mut response = Response::new(Body::wrap_stream(body));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

/// Encode users as a JSON array, one chunk per user as it arrives
///
/// A store error ends the body early; chunks already sent are not retracted.
fn json_array<S>(users: S) -> impl Stream<Item = Result<Bytes, ApiError>> + Send + 'static
where
    S: Stream<Item = store::Result<User>> + Send + 'static,
{
    stream! {
        yield Ok::<_, ApiError>(Bytes::from_static(b"["));

        let mut users = Box::pin(users);
        let mut written = 0usize;
        while let Some(user) = users.next().await {
            let user = match user {
                Ok(user) => user,
                Err(err) => {
                    error!(error = %err, written, "user stream failed mid-response");
                    yield Err(ApiError::UpstreamFailure(err));
                    return;
                }
            };

            let mut chunk = Vec::with_capacity(64);
            if written > 0 {
                chunk.push(b',');
            }
            if let Err(err) = serde_json::to_writer(&mut chunk, &user) {
                yield Err(ApiError::Encoding(err));
                return;
            }
            written += 1;
            yield Ok(Bytes::from(chunk));
        }

        yield Ok(Bytes::from_static(b"]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryUserStore, StoreError, UserStream};
    use async_trait::async_trait;
    use warp::http::StatusCode;
    use warp::Reply;

    /// Store yielding `users` and then failing
    struct FailingUserStore {
        users: Vec<User>,
    }

    #[async_trait]
    impl UserStore for FailingUserStore {
        async fn find_all(&self) -> UserStream {
            let items = self
                .users
                .clone()
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(StoreError::Unavailable(
                    "connection reset".to_string(),
                ))));
            Box::pin(futures::stream::iter(items))
        }

        async fn save(&self, user: User) -> store::Result<User> {
            Ok(user)
        }

        async fn delete_all(&self) -> store::Result<()> {
            Ok(())
        }
    }

    fn user(id: &str, name: &str) -> User {
        User {
            id: Some(id.to_string()),
            name: name.to_string(),
        }
    }

    async fn body_of(response: Response) -> Result<Bytes, warp::hyper::Error> {
        warp::hyper::body::to_bytes(response.into_body()).await
    }

    #[tokio::test]
    async fn test_lists_users_in_store_order() {
        let store = InMemoryUserStore::new();
        for name in ["Ahmed", "John", "Doe", "Salma"] {
            store.save(User::unsaved(name)).await.unwrap();
        }

        let response = list_users_handler(Arc::new(store)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let body = body_of(response).await.unwrap();
        let users: Vec<User> = serde_json::from_slice(&body).unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Ahmed", "John", "Doe", "Salma"]);
        assert!(users.iter().all(|u| u.id.is_some()));
    }

    #[tokio::test]
    async fn test_empty_store_gives_empty_array() {
        let response = list_users_handler(Arc::new(InMemoryUserStore::new()))
            .await
            .unwrap();

        let body = body_of(response).await.unwrap();
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn test_failure_before_first_user_is_rejected() {
        let store = FailingUserStore { users: vec![] };

        let rejection = list_users_handler(Arc::new(store)).await.unwrap_err();

        let err = rejection.find::<ApiError>().unwrap();
        assert!(matches!(err, ApiError::UpstreamFailure(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_failure_mid_stream_truncates_body() {
        let store = FailingUserStore {
            users: vec![user("1", "Ahmed"), user("2", "John")],
        };

        let response = list_users_handler(Arc::new(store)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert!(body_of(response).await.is_err());
    }

    #[tokio::test]
    async fn test_json_array_chunks() {
        let users = futures::stream::iter(vec![Ok(user("1", "Ahmed")), Ok(user("2", "Salma"))]);

        let chunks: Vec<Bytes> = json_array(users)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;

        assert_eq!(chunks.len(), 4);
        assert_eq!(&chunks[0][..], b"[");
        assert_eq!(&chunks[1][..], br#"{"id":"1","name":"Ahmed"}"#);
        assert_eq!(&chunks[2][..], br#",{"id":"2","name":"Salma"}"#);
        assert_eq!(&chunks[3][..], b"]");
    }

    #[tokio::test]
    async fn test_json_array_stops_after_error() {
        let users = futures::stream::iter(vec![
            Ok(user("1", "Ahmed")),
            Err(StoreError::Unavailable("gone".to_string())),
            Ok(user("2", "Salma")),
        ]);

        let chunks: Vec<Result<Bytes, ApiError>> = json_array(users).collect().await;

        assert_eq!(chunks.len(), 3);
        assert!(chunks[1].is_ok());
        assert!(matches!(chunks[2], Err(ApiError::UpstreamFailure(_))));
    }

    #[tokio::test]
    async fn test_response_converts_into_reply() {
        let response = list_users_handler(Arc::new(InMemoryUserStore::new()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
