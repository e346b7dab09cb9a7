//! In-memory event store
//!
//! Same contract as the PostgreSQL store: ids start at 1, are strictly
//! increasing, and rows are listed in insertion order.

use crate::domain::event::{EventRepository, StoredEvent};
use crate::domain::shared::{EventId, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: Vec<StoredEvent>,
}

#[derive(Default)]
pub struct MemoryEventStore {
    inner: RwLock<Inner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for MemoryEventStore {
    async fn insert(&self, event_type: &str, payload: &str) -> Result<EventId> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = EventId::new(inner.next_id);

        inner.rows.push(StoredEvent {
            id,
            event_type: event_type.to_string(),
            payload: payload.to_string(),
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<StoredEvent>> {
        let inner = self.inner.read().await;
        let take = match limit {
            Some(n) => usize::try_from(n.max(0)).unwrap_or(usize::MAX),
            None => usize::MAX,
        };
        Ok(inner.rows.iter().take(take).cloned().collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.rows.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryEventStore::new();
        let a = store.insert("click", "btn1").await.unwrap();
        let b = store.insert("click", "btn2").await.unwrap();

        assert_eq!(a, EventId::new(1));
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let store = MemoryEventStore::new();
        for i in 0..5 {
            store.insert("view", &format!("page-{}", i)).await.unwrap();
        }

        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(all[0].payload, "page-0");
    }

    #[tokio::test]
    async fn test_list_with_limit() {
        let store = MemoryEventStore::new();
        for i in 0..3 {
            store.insert("view", &format!("page-{}", i)).await.unwrap();
        }

        let first_two = store.list(Some(2)).await.unwrap();
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two[1].payload, "page-1");

        assert_eq!(store.list(Some(10)).await.unwrap().len(), 3);
        assert!(store.list(Some(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count() {
        let store = MemoryEventStore::new();
        assert_eq!(store.count().await.unwrap(), 0);
        store.insert("click", "x").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
