use serde::{Deserialize, Serialize};

/// Duration threshold meaning "any length".
pub const ANY_DURATION: u32 = 999;

fn any_duration() -> u32 {
    ANY_DURATION
}

/// Special flags a viewer can ask for. A movie qualifies if any requested flag is set on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceTag {
    Trending,
    Classic,
    HiddenGems,
}

/// Output of the questionnaire, consumed by `POST /recommendations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub watching_with: String,
    #[serde(default)]
    pub age_range: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default = "any_duration")]
    pub duration: u32,
    #[serde(default)]
    pub preferences: Vec<PreferenceTag>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            mood: String::new(),
            watching_with: String::new(),
            age_range: String::new(),
            genres: Vec::new(),
            language: "English".into(),
            duration: ANY_DURATION,
            preferences: Vec::new(),
        }
    }
}

impl UserPreferences {
    /// Effective duration cap; `None` for the sentinel or an unset (zero) value.
    pub fn duration_limit(&self) -> Option<u32> {
        match self.duration {
            0 | ANY_DURATION => None,
            d => Some(d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_format() {
        let prefs: UserPreferences = serde_json::from_str(
            r#"{"mood":"happy","watchingWith":"friends","ageRange":"adult",
                "genres":["Comedy"],"language":"English","duration":120,
                "preferences":["trending","hidden_gems"]}"#,
        )
        .unwrap();
        assert_eq!(prefs.watching_with, "friends");
        assert_eq!(prefs.duration_limit(), Some(120));
        assert_eq!(
            prefs.preferences,
            vec![PreferenceTag::Trending, PreferenceTag::HiddenGems]
        );
    }

    #[test]
    fn sentinel_and_missing_duration_mean_any() {
        let prefs: UserPreferences = serde_json::from_str(r#"{"genres":["Drama"]}"#).unwrap();
        assert_eq!(prefs.duration, ANY_DURATION);
        assert_eq!(prefs.duration_limit(), None);

        let zero = UserPreferences {
            duration: 0,
            ..UserPreferences::default()
        };
        assert_eq!(zero.duration_limit(), None);
    }

    #[test]
    fn rejects_unknown_tag() {
        let res: Result<UserPreferences, _> =
            serde_json::from_str(r#"{"preferences":["popular"]}"#);
        assert!(res.is_err());
    }
}
