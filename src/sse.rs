use std::convert::Infallible;
use warp::sse::Event;

use crate::models::MessageEvent;

/// Create an SSE frame carrying a greeting as JSON data
pub fn create_message_event(event: &MessageEvent) -> Result<Event, Infallible> {
    let payload = serde_json::json!({
        "message": event.message
    });

    Ok(Event::default().data(payload.to_string()))
}
