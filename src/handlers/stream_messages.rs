// GET /stream/{name} handler

use futures_util::stream::StreamExt;
use tracing::info;
use warp::Rejection;

use crate::generator::MessageGenerator;
use crate::models::StreamRequest;
use crate::sse::create_message_event;

pub async fn stream_messages_handler(
    request: StreamRequest,
    generator: MessageGenerator,
) -> Result<impl warp::Reply, Rejection> {
    info!("GET /stream/{}", request.name);

    // Dropped together with the response body when the client goes away
    let event_stream = generator
        .generate(request)
        .map(|event| create_message_event(&event));

    Ok(warp::sse::reply(
        warp::sse::keep_alive().stream(event_stream),
    ))
}
