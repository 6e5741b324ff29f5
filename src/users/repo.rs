use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Per-user favorite movie ids. Add and remove are idempotent.
#[async_trait]
pub trait FavoriteRepo: Send + Sync {
    /// Ids in the order they were first added.
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<i64>>;
    async fn add(&self, user_id: Uuid, movie_id: i64) -> anyhow::Result<()>;
    async fn remove(&self, user_id: Uuid, movie_id: i64) -> anyhow::Result<()>;
}

pub struct PgFavoriteRepo {
    db: PgPool,
}

impl PgFavoriteRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepo for PgFavoriteRepo {
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT movie_id
              FROM favorites
             WHERE user_id = $1
             ORDER BY seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list favorites")?;
        Ok(ids)
    }

    async fn add(&self, user_id: Uuid, movie_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, movie_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, movie_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .execute(&self.db)
        .await
        .context("add favorite")?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, movie_id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.db)
            .await
            .context("remove favorite")?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryFavoriteRepo {
    by_user: RwLock<HashMap<Uuid, Vec<i64>>>,
}

impl MemoryFavoriteRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteRepo for MemoryFavoriteRepo {
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<i64>> {
        let map = self.by_user.read().await;
        Ok(map.get(&user_id).cloned().unwrap_or_default())
    }

    async fn add(&self, user_id: Uuid, movie_id: i64) -> anyhow::Result<()> {
        let mut map = self.by_user.write().await;
        let ids = map.entry(user_id).or_default();
        if !ids.contains(&movie_id) {
            ids.push(movie_id);
        }
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, movie_id: i64) -> anyhow::Result<()> {
        let mut map = self.by_user.write().await;
        if let Some(ids) = map.get_mut(&user_id) {
            ids.retain(|id| *id != movie_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_is_idempotent_and_remove_restores() {
        let repo = MemoryFavoriteRepo::new();
        let user = Uuid::new_v4();
        repo.add(user, 3).await.unwrap();
        let before = repo.list(user).await.unwrap();

        repo.add(user, 9).await.unwrap();
        repo.add(user, 9).await.unwrap();
        assert_eq!(repo.list(user).await.unwrap(), vec![3, 9]);

        repo.remove(user, 9).await.unwrap();
        assert_eq!(repo.list(user).await.unwrap(), before);

        repo.remove(user, 42).await.unwrap();
        assert_eq!(repo.list(user).await.unwrap(), before);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let repo = MemoryFavoriteRepo::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        repo.add(a, 1).await.unwrap();
        assert!(repo.list(b).await.unwrap().is_empty());
    }
}
