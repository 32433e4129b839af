use serde::{Deserialize, Serialize};
use std::fmt;

/// The resolved conversational domain for a turn
///
/// A closed set: handler dispatch is an exhaustive match over this enum,
/// so adding a domain is an explicit case addition everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Appointment,
    Followup,
    Medication,
    Caregiver,
    /// The ambiguous default; also the primary classifier's
    /// "uncertain" sentinel
    Help,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Self::Appointment,
        Self::Followup,
        Self::Medication,
        Self::Caregiver,
        Self::Help,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Followup => "followup",
            Self::Medication => "medication",
            Self::Caregiver => "caregiver",
            Self::Help => "help",
        }
    }

    /// Parse a classifier label; anything outside the fixed set
    /// collapses to `Help`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "appointment" => Self::Appointment,
            "followup" => Self::Followup,
            "medication" => Self::Medication,
            "caregiver" => Self::Caregiver,
            _ => Self::Help,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
