#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reactive_greeter::models::User;
use reactive_greeter::store::{self, StoreError, UserStore, UserStream};
use reactive_greeter::{configure_routes, AppState};
use std::net::SocketAddr;

/// Serve `state` on an ephemeral local port
pub fn spawn_server(state: AppState) -> SocketAddr {
    let routes = configure_routes(state);
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

/// Store that yields `users` and then fails
pub struct FailingUserStore {
    pub users: Vec<User>,
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
                "backend went away".to_string(),
            ))));
        Box::pin(stream::iter(items))
    }

    async fn save(&self, user: User) -> store::Result<User> {
        Ok(user)
    }

    async fn delete_all(&self) -> store::Result<()> {
        Ok(())
    }
}

/// Collect the `data:` payloads of the first `count` SSE frames
pub async fn read_sse_data<S>(body: S, count: usize) -> Vec<String>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>>,
{
    let mut body = Box::pin(body);
    let mut buffer = String::new();
    let mut data = Vec::new();

    while data.len() < count {
        let chunk = body
            .next()
            .await
            .expect("stream ended early")
            .expect("failed to read chunk");
        buffer.push_str(std::str::from_utf8(&chunk).expect("invalid UTF-8"));

        while let Some(end) = buffer.find("\n\n") {
            let frame: String = buffer.drain(..end + 2).collect();
            for line in frame.lines() {
                // Comment lines (keep-alive) start with ':'
                if let Some(payload) = line.strip_prefix("data:") {
                    data.push(payload.trim_start().to_string());
                }
            }
        }
    }

    data.truncate(count);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_sse_data_skips_comments() {
        let chunks = vec![
            Ok(Bytes::from_static(b":\n\ndata:{\"message\":\"a\"}\n\nda")),
            Ok(Bytes::from_static(b"ta:{\"message\":\"b\"}\n\n")),
        ];

        let data = read_sse_data(stream::iter(chunks), 2).await;
        assert_eq!(data, vec![r#"{"message":"a"}"#, r#"{"message":"b"}"#]);
    }
}
