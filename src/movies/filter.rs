//! Translation of a preference record into a catalog filter.
//!
//! Every present criterion must hold (AND). Inside the genre set and the
//! tag set a single hit is enough (OR). The same filter is evaluated in
//! memory by [`MovieFilter::matches`] and in SQL by [`MovieFilter::push_sql`];
//! the two must agree.

use sqlx::{Postgres, QueryBuilder};

use super::model::Movie;
use crate::preferences::{PreferenceTag, UserPreferences};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    pub genres: Vec<String>,
    pub language: Option<String>,
    pub max_duration: Option<u32>,
    pub tags: Vec<PreferenceTag>,
}

impl MovieFilter {
    pub fn from_preferences(prefs: &UserPreferences) -> Self {
        let mut tags: Vec<PreferenceTag> = Vec::with_capacity(prefs.preferences.len());
        for tag in &prefs.preferences {
            if !tags.contains(tag) {
                tags.push(*tag);
            }
        }
        let language = Some(prefs.language.as_str())
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Self {
            genres: prefs.genres.clone(),
            language,
            max_duration: prefs.duration_limit(),
            tags,
        }
    }

    /// True when no criterion is active, i.e. the filter selects the whole catalog.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
            && self.language.is_none()
            && self.max_duration.is_none()
            && self.tags.is_empty()
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        if !self.genres.is_empty() && !movie.genres.iter().any(|g| self.genres.contains(g)) {
            return false;
        }

        if let Some(lang) = &self.language {
            if movie.language.as_deref() != Some(lang.as_str()) {
                return false;
            }
        }

        if let Some(limit) = self.max_duration {
            match movie.duration {
                Some(d) if i64::from(d) <= i64::from(limit) => {}
                _ => return false,
            }
        }

        if !self.tags.is_empty() && !self.tags.iter().any(|t| has_tag(movie, *t)) {
            return false;
        }

        true
    }

    /// Appends a `WHERE` clause (or nothing, for an empty filter) to `qb`.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = " WHERE ";

        if !self.genres.is_empty() {
            qb.push(sep).push("genres && ").push_bind(self.genres.clone());
            sep = " AND ";
        }

        if let Some(lang) = &self.language {
            qb.push(sep).push("language = ").push_bind(lang.clone());
            sep = " AND ";
        }

        if let Some(limit) = self.max_duration {
            qb.push(sep).push("duration <= ").push_bind(i64::from(limit));
            sep = " AND ";
        }

        if !self.tags.is_empty() {
            qb.push(sep).push("(");
            for (i, tag) in self.tags.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(tag_column(*tag)).push(" IS TRUE");
            }
            qb.push(")");
        }
    }
}

fn has_tag(movie: &Movie, tag: PreferenceTag) -> bool {
    let flag = match tag {
        PreferenceTag::Trending => movie.is_trending,
        PreferenceTag::Classic => movie.is_classic,
        PreferenceTag::HiddenGems => movie.is_hidden_gem,
    };
    flag.unwrap_or(false)
}

fn tag_column(tag: PreferenceTag) -> &'static str {
    match tag {
        PreferenceTag::Trending => "is_trending",
        PreferenceTag::Classic => "is_classic",
        PreferenceTag::HiddenGems => "is_hidden_gem",
    }
}
