use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical urgency tier
///
/// The ordering is total: `Red > Orange > Green`. When multiple rules
/// match, the highest tier wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    /// Routine logging, reviewed at the next visit
    Green,
    /// Same-day nurse follow-up
    Orange,
    /// Emergency, immediate care instruction
    Red,
}

impl Tier {
    /// Upgrade by exactly one tier. RED is already maximal.
    pub fn escalate(self) -> Self {
        match self {
            Self::Green => Self::Orange,
            Self::Orange | Self::Red => Self::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Orange => "ORANGE",
            Self::Green => "GREEN",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_is_total() {
        assert!(Tier::Red > Tier::Orange);
        assert!(Tier::Orange > Tier::Green);
        assert!(Tier::Red > Tier::Green);
    }

    #[test]
    fn test_escalate_never_skips() {
        assert_eq!(Tier::Green.escalate(), Tier::Orange);
        assert_eq!(Tier::Orange.escalate(), Tier::Red);
        assert_eq!(Tier::Red.escalate(), Tier::Red);
    }

    #[test]
    fn test_wire_format_is_uppercase() {
        let json = serde_json::to_string(&Tier::Orange).unwrap();
        assert_eq!(json, "\"ORANGE\"");
    }
}
