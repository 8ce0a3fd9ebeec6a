//! Event feed publishing

use redis::{aio::ConnectionManager, AsyncCommands};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::constants::EVENT_FEED_CHANNEL;
use crate::utils::time::now_utc;

/// Publishes entity change events to the Redis event feed.
///
/// The feed is advisory: a failed publish is logged and dropped, it
/// never fails the operation that produced the event.
pub struct EventService;

impl EventService {
    pub async fn publish(
        redis: &ConnectionManager,
        contest_id: Option<i64>,
        entity: &str,
        entity_id: &str,
        action: &str,
    ) {
        let event = json!({
            "id": Uuid::new_v4().to_string(),
            "time": now_utc().to_rfc3339(),
            "contest_id": contest_id,
            "entity": entity,
            "entity_id": entity_id,
            "action": action,
        });

        let mut conn = redis.clone();
        if let Err(e) = conn
            .publish::<_, _, ()>(EVENT_FEED_CHANNEL, event.to_string())
            .await
        {
            warn!(entity, entity_id, action, error = %e, "failed to publish event");
        }
    }
}
