use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry. Field names on the wire follow the frontend's camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    #[serde(alias = "id")]
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "posterUrl")]
    pub poster_url: Option<String>,
    #[serde(default, rename = "backdropUrl")]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Minutes.
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, rename = "streamingOn")]
    pub streaming_on: Option<Vec<String>>,
    #[serde(default, rename = "isTrending")]
    pub is_trending: Option<bool>,
    #[serde(default, rename = "isClassic")]
    pub is_classic: Option<bool>,
    #[serde(default, rename = "isHiddenGem")]
    pub is_hidden_gem: Option<bool>,
}

impl Movie {
    /// Bare record with only the fields the filter looks at.
    pub fn new(movie_id: i64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            year: None,
            poster_url: None,
            backdrop_url: None,
            rating: None,
            duration: None,
            genres: Vec::new(),
            description: None,
            language: None,
            streaming_on: None,
            is_trending: None,
            is_classic: None,
            is_hidden_gem: None,
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_duration(mut self, minutes: i32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn trending(mut self) -> Self {
        self.is_trending = Some(true);
        self
    }

    pub fn classic(mut self) -> Self {
        self.is_classic = Some(true);
        self
    }

    pub fn hidden_gem(mut self) -> Self {
        self.is_hidden_gem = Some(true);
        self
    }
}
