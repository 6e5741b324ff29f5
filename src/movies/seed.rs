use std::{collections::HashSet, path::Path};

use anyhow::Context;
use tracing::{debug, info, warn};

use super::{model::Movie, repo::MovieRepo};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    /// Already in the catalog from an earlier run.
    pub existing: usize,
    /// Repeated ids inside the seed file itself.
    pub duplicates: usize,
}

pub fn load_seed_file(path: &Path) -> anyhow::Result<Vec<Movie>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read seed file {}", path.display()))?;
    let movies: Vec<Movie> = serde_json::from_str(&raw)
        .with_context(|| format!("parse seed file {}", path.display()))?;
    Ok(movies)
}

/// Inserts movies whose id is not in the catalog yet. The first record wins
/// for ids repeated inside the file.
pub async fn seed_catalog(repo: &dyn MovieRepo, movies: Vec<Movie>) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut seen = HashSet::with_capacity(movies.len());
    for movie in movies {
        if !seen.insert(movie.movie_id) {
            warn!(movie_id = movie.movie_id, title = %movie.title, "duplicate movie id in seed file, skipped");
            report.duplicates += 1;
            continue;
        }
        if repo.insert_if_absent(&movie).await? {
            report.inserted += 1;
        } else {
            debug!(movie_id = movie.movie_id, "already in catalog");
            report.existing += 1;
        }
    }
    info!(
        inserted = report.inserted,
        existing = report.existing,
        duplicates = report.duplicates,
        "catalog seeded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movies::repo::MemoryMovieRepo;

    #[tokio::test]
    async fn duplicates_are_skipped() {
        let repo = MemoryMovieRepo::new();
        let movies = vec![
            Movie::new(6, "Spirited Away"),
            Movie::new(7, "Amelie"),
            Movie::new(6, "The Dark Knight"),
        ];
        let report = seed_catalog(&repo, movies).await.unwrap();
        assert_eq!(
            report,
            SeedReport { inserted: 2, existing: 0, duplicates: 1 }
        );
        assert_eq!(repo.get(6).await.unwrap().unwrap().title, "Spirited Away");
    }

    #[tokio::test]
    async fn reseeding_counts_existing_not_duplicates() {
        let repo = MemoryMovieRepo::new();
        let movies = || vec![Movie::new(1, "Inception"), Movie::new(2, "Parasite")];
        seed_catalog(&repo, movies()).await.unwrap();

        let report = seed_catalog(&repo, movies()).await.unwrap();
        assert_eq!(
            report,
            SeedReport { inserted: 0, existing: 2, duplicates: 0 }
        );
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }

    #[test]
    fn shipped_seed_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/movies.json");
        let movies = load_seed_file(&path).unwrap();
        assert!(!movies.is_empty());
        assert!(movies.iter().all(|m| !m.genres.is_empty()));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_seed_file(Path::new("/nonexistent/movies.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/movies.json"));
    }
}
