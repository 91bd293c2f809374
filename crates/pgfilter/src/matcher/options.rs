//! Inputs for the string and date matchers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a single string value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Exact,
    Contains,
    StartsWith,
    EndsWith,
}

impl MatchMode {
    /// Place `%` wildcards around `value` for this mode.
    pub fn pattern(self, value: String) -> String {
        match self {
            MatchMode::Exact => value,
            MatchMode::Contains => format!("%{value}%"),
            MatchMode::StartsWith => format!("{value}%"),
            MatchMode::EndsWith => format!("%{value}"),
        }
    }
}

/// Case sensitivity of a string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    #[default]
    Sensitive,
    NonSensitive,
}

/// Options for [`by_string_column`](super::by_string_column).
///
/// Every field is optional; unset fields resolve to [`MatchMode::Exact`] and
/// [`Sensitivity::Sensitive`]. Combining options with [`StringOptions::merge`]
/// (or collecting an iterator of them) is last-wins per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StringOptions {
    pub match_mode: Option<MatchMode>,
    pub sensitivity: Option<Sensitivity>,
}

impl StringOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match mode.
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = Some(mode);
        self
    }

    /// Set the case sensitivity.
    pub fn sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }

    /// Match anywhere in the column (`%v%`).
    pub fn contains(self) -> Self {
        self.match_mode(MatchMode::Contains)
    }

    /// Match a prefix (`v%`).
    pub fn starts_with(self) -> Self {
        self.match_mode(MatchMode::StartsWith)
    }

    /// Match a suffix (`%v`).
    pub fn ends_with(self) -> Self {
        self.match_mode(MatchMode::EndsWith)
    }

    /// Compare through `LOWER(...)` on both sides.
    pub fn case_insensitive(self) -> Self {
        self.sensitivity(Sensitivity::NonSensitive)
    }

    /// Overlay `later` on top of `self`: fields set in `later` win.
    pub fn merge(self, later: StringOptions) -> Self {
        Self {
            match_mode: later.match_mode.or(self.match_mode),
            sensitivity: later.sensitivity.or(self.sensitivity),
        }
    }

    /// Apply defaults to unset fields.
    pub fn resolve(self) -> (MatchMode, Sensitivity) {
        (
            self.match_mode.unwrap_or_default(),
            self.sensitivity.unwrap_or_default(),
        )
    }
}

impl From<MatchMode> for StringOptions {
    fn from(mode: MatchMode) -> Self {
        Self::new().match_mode(mode)
    }
}

impl From<Sensitivity> for StringOptions {
    fn from(sensitivity: Sensitivity) -> Self {
        Self::new().sensitivity(sensitivity)
    }
}

impl From<(MatchMode, Sensitivity)> for StringOptions {
    fn from((mode, sensitivity): (MatchMode, Sensitivity)) -> Self {
        Self::new().match_mode(mode).sensitivity(sensitivity)
    }
}

impl FromIterator<StringOptions> for StringOptions {
    fn from_iter<I: IntoIterator<Item = StringOptions>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::merge)
    }
}

/// Date bounds for [`by_date_column`](super::by_date_column).
///
/// `on` takes precedence over `after`/`before`. With both `after` and `before`
/// the range is inclusive; with only one of them the comparison is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dates {
    pub on: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

impl Dates {
    /// Match the calendar day of `day`.
    pub fn on(day: DateTime<Utc>) -> Self {
        Self {
            on: Some(day),
            ..Self::default()
        }
    }

    /// Strictly after `start`.
    pub fn after(start: DateTime<Utc>) -> Self {
        Self {
            after: Some(start),
            ..Self::default()
        }
    }

    /// Strictly before `end`.
    pub fn before(end: DateTime<Utc>) -> Self {
        Self {
            before: Some(end),
            ..Self::default()
        }
    }

    /// Inclusive range `[after, before]`.
    pub fn between(after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        Self {
            after: Some(after),
            before: Some(before),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.on.is_none() && self.after.is_none() && self.before.is_none()
    }
}
