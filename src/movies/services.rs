use anyhow::Context;
use tracing::{debug, info};

use super::{filter::MovieFilter, model::Movie, repo::MovieRepo};
use crate::preferences::UserPreferences;

pub struct Recommendation {
    pub movies: Vec<Movie>,
    /// Set when nothing matched and the whole catalog was returned instead.
    pub fell_back: bool,
}

/// Runs the preference filter against the catalog, falling back to the
/// full catalog when it matches nothing.
pub async fn recommend(
    repo: &dyn MovieRepo,
    prefs: &UserPreferences,
) -> anyhow::Result<Recommendation> {
    let filter = MovieFilter::from_preferences(prefs);
    debug!(?filter, "recommendation filter");

    let movies = repo.find(&filter).await.context("filter catalog")?;
    if !movies.is_empty() {
        info!(matches = movies.len(), "recommendations found");
        return Ok(Recommendation {
            movies,
            fell_back: false,
        });
    }

    let all = repo.list_all().await.context("list catalog")?;
    info!(catalog = all.len(), "no matches, returning whole catalog");
    Ok(Recommendation {
        movies: all,
        fell_back: true,
    })
}
