//! Event-driven invalidation
//!
//! Maps domain write events to the key namespaces they make stale. Keys
//! follow the `"{namespace}:{user_id}"` convention, optionally with more
//! `:`-separated segments after the user id.

use tracing::debug;

use crate::cache::SharedCache;

// == Invalidation Event ==
/// A write that makes some cached reads stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidationEvent {
    PostCreated,
    PostUpdated,
    PostPublished,
    AccountConnected,
    AccountUpdated,
    SettingsChanged,
}

impl InvalidationEvent {
    /// Key namespaces invalidated by this event.
    pub fn namespaces(self) -> &'static [&'static str] {
        match self {
            Self::PostCreated => &["analytics", "calendar", "trending"],
            Self::PostUpdated => &["analytics", "calendar"],
            Self::PostPublished => &["analytics", "trending"],
            Self::AccountConnected => &["accounts", "analytics"],
            Self::AccountUpdated => &["accounts", "profile"],
            Self::SettingsChanged => &["settings", "user_preferences"],
        }
    }
}

/// Builds the `"{namespace}:{user_id}"` key.
#[must_use]
pub fn scoped_key(namespace: &str, user_id: u64) -> String {
    format!("{}:{}", namespace, user_id)
}

/// Drops every cached entry made stale by `event`.
///
/// Without a user the whole namespace goes. With a user only that user's
/// key and its `:`-separated children go, so user 12 leaves user 123 alone.
/// Returns the number of entries removed.
pub fn invalidate_event<V: Clone>(
    cache: &SharedCache<V>,
    event: InvalidationEvent,
    user_id: Option<u64>,
) -> usize {
    let removed: usize = event
        .namespaces()
        .iter()
        .map(|namespace| match user_id {
            Some(uid) => {
                let key = scoped_key(namespace, uid);
                let exact = usize::from(cache.remove(&key).is_some());
                exact + cache.invalidate_prefix(&format!("{}:", key))
            }
            None => cache.invalidate_prefix(&format!("{}:", namespace)),
        })
        .sum();

    debug!(?event, ?user_id, removed, "Applied invalidation event");
    removed
}
