//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of workstations on the production line.
pub const WORKSTATION_COUNT: usize = 6;

/// Index of a workstation on the production line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkstationId(pub usize);

impl WorkstationId {
    /// Every workstation of the line in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..WORKSTATION_COUNT).map(Self)
    }

    /// Zero-based index of the workstation.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkstationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WS{}", self.0)
    }
}

/// Aggregation level of the production time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per day.
    #[default]
    Daily,
    /// Seven consecutive days per bucket.
    Weekly,
    /// Thirty consecutive days per bucket.
    Monthly,
}

impl Granularity {
    /// All granularities, finest first.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// Number of daily records folded into one bucket.
    pub const fn group_size(self) -> usize {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    /// Lowercase identifier, also used in file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = crate::DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(crate::DashError::validation_field(
                format!("Unknown granularity '{other}', expected daily, weekly or monthly"),
                "granularity",
            )),
        }
    }
}

/// Colour theme of the rendered dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on a light background.
    #[default]
    Light,
    /// Light text on a dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Lowercase identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = crate::DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(crate::DashError::validation_field(
                format!("Unknown theme '{other}', expected light or dark"),
                "theme",
            )),
        }
    }
}

/// Immutable description of what the dashboard currently shows.
///
/// Every user interaction produces a new value; rendering is a pure function
/// of the dataset and this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ViewState {
    /// Selected aggregation level.
    pub granularity: Granularity,
    /// Selected colour theme.
    pub theme: Theme,
}

impl ViewState {
    /// Create a view state.
    pub const fn new(granularity: Granularity, theme: Theme) -> Self {
        Self { granularity, theme }
    }

    /// Same view with another granularity.
    #[must_use]
    pub const fn with_granularity(self, granularity: Granularity) -> Self {
        Self { granularity, ..self }
    }

    /// Same view with the theme switched.
    #[must_use]
    pub const fn toggle_theme(self) -> Self {
        Self {
            theme: self.theme.toggled(),
            ..self
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.granularity, self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_sizes() {
        assert_eq!(Granularity::Daily.group_size(), 1);
        assert_eq!(Granularity::Weekly.group_size(), 7);
        assert_eq!(Granularity::Monthly.group_size(), 30);
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("Weekly".parse::<Granularity>().unwrap(), Granularity::Weekly);
        assert_eq!(" month ".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert!("yearly".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_view_state_transitions_leave_original_untouched() {
        let view = ViewState::default();
        let weekly = view.with_granularity(Granularity::Weekly);
        let dark = weekly.toggle_theme();

        assert_eq!(view, ViewState::new(Granularity::Daily, Theme::Light));
        assert_eq!(weekly.theme, Theme::Light);
        assert_eq!(dark, ViewState::new(Granularity::Weekly, Theme::Dark));
        assert_eq!(dark.toggle_theme(), weekly);
        assert_eq!(dark.to_string(), "weekly-dark");
    }

    #[test]
    fn test_workstation_display() {
        let ids: Vec<String> = WorkstationId::all().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["WS0", "WS1", "WS2", "WS3", "WS4", "WS5"]);
    }
}
