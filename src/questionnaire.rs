//! Seven-step preference wizard.
//!
//! The wizard holds a cursor over [`Step::ALL`] and a [`UserPreferences`]
//! being filled in. Moving forward is gated by the current step's completion
//! check; moving back never is. Advancing from the last step hands the
//! record out instead of moving.

use crate::preferences::{PreferenceTag, UserPreferences, ANY_DURATION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Mood,
    WatchingWith,
    AgeRange,
    Genres,
    Language,
    Duration,
    Preferences,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::Mood,
        Step::WatchingWith,
        Step::AgeRange,
        Step::Genres,
        Step::Language,
        Step::Duration,
        Step::Preferences,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Mood => "How are you feeling today?",
            Step::WatchingWith => "Who are you watching with?",
            Step::AgeRange => "Select age range for content",
            Step::Genres => "What genres do you enjoy?",
            Step::Language => "Preferred language?",
            Step::Duration => "How much time do you have?",
            Step::Preferences => "Any special preferences?",
        }
    }
}

/// A selectable value and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice<T: 'static> {
    pub value: T,
    pub label: &'static str,
}

pub const MOODS: &[Choice<&str>] = &[
    Choice { value: "happy", label: "Happy" },
    Choice { value: "sad", label: "Sad" },
    Choice { value: "excited", label: "Excited" },
    Choice { value: "relaxed", label: "Relaxed" },
    Choice { value: "romantic", label: "Romantic" },
    Choice { value: "bored", label: "Bored" },
];

pub const COMPANIONS: &[Choice<&str>] = &[
    Choice { value: "alone", label: "Alone" },
    Choice { value: "friends", label: "Friends" },
    Choice { value: "family", label: "Family" },
    Choice { value: "partner", label: "Partner" },
    Choice { value: "children", label: "Children" },
];

pub const AGE_RANGES: &[Choice<&str>] = &[
    Choice { value: "all", label: "All Ages" },
    Choice { value: "children", label: "Children (0-12)" },
    Choice { value: "teen", label: "Teenagers (13-17)" },
    Choice { value: "adult", label: "Adults (18+)" },
];

pub const GENRES: &[&str] = &[
    "Action", "Adventure", "Animation", "Comedy", "Crime", "Documentary", "Drama", "Fantasy",
    "Historical", "Horror", "Mystery", "Romance", "Science Fiction", "Thriller", "Western",
    "Family",
];

pub const LANGUAGES: &[&str] = &["English", "Tamil", "Hindi"];

pub const DURATIONS: &[Choice<u32>] = &[
    Choice { value: 90, label: "< 90 min" },
    Choice { value: 120, label: "< 2 hours" },
    Choice { value: 150, label: "< 2.5 hours" },
    Choice { value: ANY_DURATION, label: "Any length" },
];

pub const TAGS: &[Choice<PreferenceTag>] = &[
    Choice { value: PreferenceTag::Trending, label: "Trending Now" },
    Choice { value: PreferenceTag::Classic, label: "Classics" },
    Choice { value: PreferenceTag::HiddenGems, label: "Hidden Gems" },
];

/// Outcome of [`Questionnaire::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Current step incomplete; nothing changed.
    Blocked,
    Moved(Step),
    Submitted(UserPreferences),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    step: Step,
    prefs: UserPreferences,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    pub fn new() -> Self {
        Self {
            step: Step::Mood,
            prefs: UserPreferences::default(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.prefs
    }

    /// Fraction of the wizard reached, counting the current step.
    pub fn progress(&self) -> f32 {
        (self.step.index() + 1) as f32 / Step::ALL.len() as f32
    }

    pub fn can_continue(&self) -> bool {
        let p = &self.prefs;
        match self.step {
            Step::Mood => !p.mood.is_empty(),
            Step::WatchingWith => !p.watching_with.is_empty(),
            Step::AgeRange => !p.age_range.is_empty(),
            Step::Genres => !p.genres.is_empty(),
            Step::Language => !p.language.is_empty(),
            Step::Duration => p.duration != 0,
            Step::Preferences => true,
        }
    }

    pub fn advance(&mut self) -> Advance {
        if !self.can_continue() {
            return Advance::Blocked;
        }
        match Step::ALL.get(self.step.index() + 1) {
            Some(next) => {
                self.step = *next;
                Advance::Moved(self.step)
            }
            None => Advance::Submitted(self.prefs.clone()),
        }
    }

    pub fn retreat(&mut self) -> Step {
        if let Some(prev) = self.step.index().checked_sub(1) {
            self.step = Step::ALL[prev];
        }
        self.step
    }

    pub fn set_mood(&mut self, mood: impl Into<String>) {
        self.prefs.mood = mood.into();
    }

    pub fn set_watching_with(&mut self, company: impl Into<String>) {
        self.prefs.watching_with = company.into();
    }

    pub fn set_age_range(&mut self, range: impl Into<String>) {
        self.prefs.age_range = range.into();
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.prefs.language = language.into();
    }

    pub fn set_duration(&mut self, minutes: u32) {
        self.prefs.duration = minutes;
    }

    /// Adds the genre if absent, removes it otherwise.
    pub fn toggle_genre(&mut self, genre: &str) {
        toggle(&mut self.prefs.genres, genre.to_string());
    }

    pub fn toggle_preference(&mut self, tag: PreferenceTag) {
        toggle(&mut self.prefs.preferences, tag);
    }
}

fn toggle<T: PartialEq>(set: &mut Vec<T>, item: T) {
    if let Some(pos) = set.iter().position(|x| *x == item) {
        set.remove(pos);
    } else {
        set.push(item);
    }
}
