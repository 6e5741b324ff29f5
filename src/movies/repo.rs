use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tokio::sync::RwLock;

use super::{filter::MovieFilter, model::Movie};

const MOVIE_COLUMNS: &str = "movie_id, title, year, poster_url, backdrop_url, rating, duration, \
     genres, description, language, streaming_on, is_trending, is_classic, is_hidden_gem";

/// Movie catalog. All listings come back in catalog (insertion) order.
#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn list_all(&self) -> anyhow::Result<Vec<Movie>>;
    async fn find(&self, filter: &MovieFilter) -> anyhow::Result<Vec<Movie>>;
    async fn get(&self, movie_id: i64) -> anyhow::Result<Option<Movie>>;
    /// Returns `false` when a movie with the same id is already present.
    async fn insert_if_absent(&self, movie: &Movie) -> anyhow::Result<bool>;
}

pub struct PgMovieRepo {
    db: PgPool,
}

impl PgMovieRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieRepo for PgMovieRepo {
    async fn list_all(&self) -> anyhow::Result<Vec<Movie>> {
        self.find(&MovieFilter::default()).await
    }

    async fn find(&self, filter: &MovieFilter) -> anyhow::Result<Vec<Movie>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM movies", MOVIE_COLUMNS));
        filter.push_sql(&mut qb);
        qb.push(" ORDER BY position ASC");

        let rows = qb
            .build_query_as::<Movie>()
            .fetch_all(&self.db)
            .await
            .context("query movies")?;
        Ok(rows)
    }

    async fn get(&self, movie_id: i64) -> anyhow::Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {} FROM movies WHERE movie_id = $1",
            MOVIE_COLUMNS
        ))
        .bind(movie_id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("get movie {}", movie_id))?;
        Ok(movie)
    }

    async fn insert_if_absent(&self, movie: &Movie) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO movies (movie_id, title, year, poster_url, backdrop_url, rating, duration,
                                genres, description, language, streaming_on,
                                is_trending, is_classic, is_hidden_gem)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (movie_id) DO NOTHING
            "#,
        )
        .bind(movie.movie_id)
        .bind(&movie.title)
        .bind(movie.year)
        .bind(&movie.poster_url)
        .bind(&movie.backdrop_url)
        .bind(movie.rating)
        .bind(movie.duration)
        .bind(&movie.genres)
        .bind(&movie.description)
        .bind(&movie.language)
        .bind(&movie.streaming_on)
        .bind(movie.is_trending)
        .bind(movie.is_classic)
        .bind(movie.is_hidden_gem)
        .execute(&self.db)
        .await
        .with_context(|| format!("insert movie {}", movie.movie_id))?;
        Ok(res.rows_affected() == 1)
    }
}

/// Vec-backed catalog for tests and local runs without a database.
#[derive(Default)]
pub struct MemoryMovieRepo {
    movies: RwLock<Vec<Movie>>,
}

impl MemoryMovieRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieRepo for MemoryMovieRepo {
    async fn list_all(&self) -> anyhow::Result<Vec<Movie>> {
        Ok(self.movies.read().await.clone())
    }

    async fn find(&self, filter: &MovieFilter) -> anyhow::Result<Vec<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().filter(|m| filter.matches(m)).cloned().collect())
    }

    async fn get(&self, movie_id: i64) -> anyhow::Result<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.movie_id == movie_id).cloned())
    }

    async fn insert_if_absent(&self, movie: &Movie) -> anyhow::Result<bool> {
        let mut movies = self.movies.write().await;
        if movies.iter().any(|m| m.movie_id == movie.movie_id) {
            return Ok(false);
        }
        movies.push(movie.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_repo_keeps_insertion_order_and_first_duplicate() {
        let repo = MemoryMovieRepo::new();
        assert!(repo.insert_if_absent(&Movie::new(7, "First")).await.unwrap());
        assert!(repo.insert_if_absent(&Movie::new(2, "Second")).await.unwrap());
        assert!(!repo.insert_if_absent(&Movie::new(7, "Shadow")).await.unwrap());

        let all = repo.list_all().await.unwrap();
        let titles: Vec<_> = all.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(repo.get(7).await.unwrap().unwrap().title, "First");
        assert!(repo.get(99).await.unwrap().is_none());
    }
}
