//! Snapshot store abstraction used by the lookup pipeline.
//!
//! [`PgSnapshotStore`] persists to Postgres. [`MemorySnapshotStore`] keeps an
//! in-process arena and is used when no database is configured and in tests.
//!
//! ## Limitations of the in-memory store
//!
//! - No durability: all snapshots are lost when the process exits.
//! - Single-process only.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use zipeats_core::{RestaurantRecord, ZipCodeSnapshot};

use crate::DbError;

/// Append-only snapshot history keyed by zip code.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Most recently created snapshot for the exact `zip_code`, if any.
    async fn latest_snapshot(&self, zip_code: &str) -> Result<Option<ZipCodeSnapshot>, DbError>;

    /// Appends a new snapshot and returns its id. Never touches older snapshots.
    async fn insert_snapshot(
        &self,
        zip_code: &str,
        restaurants: &[RestaurantRecord],
    ) -> Result<i64, DbError>;

    /// Verifies the backing store is reachable.
    async fn health_check(&self) -> Result<(), DbError>;
}

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgSnapshotStore {
    pool: PgPool,
}

impl PgSnapshotStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn latest_snapshot(&self, zip_code: &str) -> Result<Option<ZipCodeSnapshot>, DbError> {
        crate::snapshots::latest_snapshot(&self.pool, zip_code).await
    }

    async fn insert_snapshot(
        &self,
        zip_code: &str,
        restaurants: &[RestaurantRecord],
    ) -> Result<i64, DbError> {
        crate::snapshots::insert_snapshot(&self.pool, zip_code, restaurants).await
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }
}

/// In-memory arena of immutable snapshots. Ids are 1-based arena positions,
/// so a higher id is always a newer snapshot.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<Vec<ZipCodeSnapshot>>,
}

fn poison_err<T>(_: PoisonError<T>) -> DbError {
    DbError::Poisoned
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots stored across all zip codes.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Poisoned`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, DbError> {
        Ok(self.snapshots.read().map_err(poison_err)?.len())
    }

    /// # Errors
    ///
    /// Returns [`DbError::Poisoned`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, DbError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn latest_snapshot(&self, zip_code: &str) -> Result<Option<ZipCodeSnapshot>, DbError> {
        let snapshots = self.snapshots.read().map_err(poison_err)?;
        Ok(snapshots
            .iter()
            .rev()
            .find(|s| s.zip_code == zip_code)
            .cloned())
    }

    async fn insert_snapshot(
        &self,
        zip_code: &str,
        restaurants: &[RestaurantRecord],
    ) -> Result<i64, DbError> {
        let mut snapshots = self.snapshots.write().map_err(poison_err)?;
        let id = i64::try_from(snapshots.len()).unwrap_or(i64::MAX).saturating_add(1);
        snapshots.push(ZipCodeSnapshot {
            id,
            zip_code: zip_code.to_string(),
            retrieved_at: Utc::now(),
            restaurants: restaurants.to_vec(),
        });
        Ok(id)
    }

    async fn health_check(&self) -> Result<(), DbError> {
        self.snapshots.read().map_err(poison_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipeats_core::Genre;

    fn record(name: &str, genre: Genre) -> RestaurantRecord {
        RestaurantRecord {
            name: name.to_string(),
            genre,
            price_level: None,
            is_open: None,
        }
    }

    #[tokio::test]
    async fn missing_zip_returns_none() {
        let store = MemorySnapshotStore::new();
        let found = store.latest_snapshot("94103").await.expect("read");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn latest_snapshot_wins_and_history_is_kept() {
        let store = MemorySnapshotStore::new();
        let first = store
            .insert_snapshot("94103", &[record("Old Taqueria", Genre::Mexican)])
            .await
            .expect("insert");
        let second = store
            .insert_snapshot(
                "94103",
                &[
                    record("Sushi Zen", Genre::Japanese),
                    record("Corner Bar", Genre::Bar),
                ],
            )
            .await
            .expect("insert");
        assert!(second > first);

        let latest = store
            .latest_snapshot("94103")
            .await
            .expect("read")
            .expect("snapshot exists");
        assert_eq!(latest.id, second);
        let names: Vec<&str> = latest.restaurants.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sushi Zen", "Corner Bar"]);
        assert_eq!(store.len().expect("len"), 2);
    }

    #[tokio::test]
    async fn lookup_is_exact_on_zip_code() {
        let store = MemorySnapshotStore::new();
        store
            .insert_snapshot("94103", &[record("A", Genre::Restaurant)])
            .await
            .expect("insert");
        store
            .insert_snapshot("10001", &[record("B", Genre::Restaurant)])
            .await
            .expect("insert");

        let latest = store
            .latest_snapshot("94103")
            .await
            .expect("read")
            .expect("snapshot exists");
        assert_eq!(latest.restaurants[0].name, "A");
        assert!(store.latest_snapshot("9410").await.expect("read").is_none());
    }

    #[tokio::test]
    async fn empty_snapshot_is_stored_but_not_usable() {
        let store = MemorySnapshotStore::new();
        store.insert_snapshot("94103", &[]).await.expect("insert");
        let latest = store
            .latest_snapshot("94103")
            .await
            .expect("read")
            .expect("snapshot exists");
        assert!(!latest.is_usable());
    }

    #[tokio::test]
    async fn memory_store_is_always_healthy() {
        let store = MemorySnapshotStore::new();
        assert!(store.health_check().await.is_ok());
        assert!(store.is_empty().expect("is_empty"));
    }
}
