// Route definitions and handlers

use std::convert::Infallible;
use std::sync::Arc;
use warp::path::Tail;
use warp::{Filter, Rejection};

use crate::error::{handle_rejection, ApiError};
use crate::generator::MessageGenerator;
use crate::handlers;
use crate::models::StreamRequest;
use crate::store::UserStore;

/// Collaborators shared by every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub generator: MessageGenerator,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, generator: MessageGenerator) -> Self {
        Self { store, generator }
    }
}

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // GET /users
    let list_users = warp::get()
        .and(users_path())
        .and(with_store(state.store))
        .and_then(handlers::list_users_handler);

    // GET /stream/{name}
    let stream_messages = warp::get()
        .and(stream_name())
        .and(with_generator(state.generator))
        .and_then(handlers::stream_messages_handler);

    list_users
        .or(stream_messages)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// `/users` and its aliases
fn users_path() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path!("users")
        .or(warp::path!("api" / "users"))
        .unify()
        .or(warp::path!("api-v2" / "users"))
        .unify()
}

/// `{name}` under `/stream` and its aliases
///
/// Takes the raw tail so a missing name is a bad request rather than an
/// unmatched path.
fn stream_name() -> impl Filter<Extract = (StreamRequest,), Error = Rejection> + Clone {
    warp::path("stream")
        .or(warp::path("sse"))
        .unify()
        .or(warp::path("sse-v2"))
        .unify()
        .and(warp::path::tail())
        .and_then(extract_stream_name)
}

async fn extract_stream_name(tail: Tail) -> Result<StreamRequest, Rejection> {
    let segment = tail.as_str();
    let segment = segment.strip_suffix('/').unwrap_or(segment);
    if segment.contains('/') {
        return Err(warp::reject::not_found());
    }
    parse_stream_name(segment).map_err(warp::reject::custom)
}

/// Decode and validate the `{name}` path segment
pub fn parse_stream_name(segment: &str) -> Result<StreamRequest, ApiError> {
    if segment.is_empty() {
        return Err(ApiError::InvalidPathParameter(
            "stream name must not be empty".to_string(),
        ));
    }

    let name = urlencoding::decode(segment).map_err(|_| {
        ApiError::InvalidPathParameter("stream name is not valid UTF-8".to_string())
    })?;

    if name.trim().is_empty() {
        return Err(ApiError::InvalidPathParameter(
            "stream name must not be blank".to_string(),
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(ApiError::InvalidPathParameter(
            "stream name contains control characters".to_string(),
        ));
    }

    Ok(StreamRequest::new(name.into_owned()))
}

fn with_store(
    store: Arc<dyn UserStore>,
) -> impl Filter<Extract = (Arc<dyn UserStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_generator(
    generator: MessageGenerator,
) -> impl Filter<Extract = (MessageGenerator,), Error = Infallible> + Clone {
    warp::any().map(move || generator.clone())
}
