use std::fmt;

/// Presentation bucket for a maturity score.
///
/// Thresholds are inclusive lower bounds: 80 and up is `Advanced`, 60 and up
/// `Intermediate`, 40 and up `Basic`, anything lower `Initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaturityBand {
    Initial,
    Basic,
    Intermediate,
    Advanced,
}

impl MaturityBand {
    pub const ADVANCED_THRESHOLD: u8 = 80;
    pub const INTERMEDIATE_THRESHOLD: u8 = 60;
    pub const BASIC_THRESHOLD: u8 = 40;

    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= Self::ADVANCED_THRESHOLD => Self::Advanced,
            s if s >= Self::INTERMEDIATE_THRESHOLD => Self::Intermediate,
            s if s >= Self::BASIC_THRESHOLD => Self::Basic,
            _ => Self::Initial,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Hex color used for badges and progress bars.
    #[must_use]
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Initial => "#DC2626",
            Self::Basic => "#2563EB",
            Self::Intermediate => "#F59E0B",
            Self::Advanced => "#059669",
        }
    }
}

impl fmt::Display for MaturityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
