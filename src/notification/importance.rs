//! Importance classification for notifications
//!
//! The importance level drives channel selection:
//! - HIGH: every channel the user allows, SMS first
//! - NORMAL: email and in-app
//! - LOW: in-app only, unless the request carries the opt-in context

use crate::error::FanoutError;
use serde::{Deserialize, Serialize};

/// Importance level for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Normal,
    High,
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Normal => "normal",
            Importance::High => "high",
        }
    }
}

/// Parse importance from request text.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Anything
/// else is rejected; an unknown value is never treated as `low`.
impl std::str::FromStr for Importance {
    type Err = FanoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Importance::Low),
            "normal" => Ok(Importance::Normal),
            "high" => Ok(Importance::High),
            _ => Err(FanoutError::UnknownImportance(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_importance() {
        assert_eq!("high".parse::<Importance>().unwrap(), Importance::High);
        assert_eq!("Normal".parse::<Importance>().unwrap(), Importance::Normal);
        assert_eq!(" LOW ".parse::<Importance>().unwrap(), Importance::Low);
    }

    #[test]
    fn test_parse_unknown_importance_is_error() {
        let err = "urgent".parse::<Importance>().unwrap_err();
        assert!(matches!(err, FanoutError::UnknownImportance(ref v) if v == "urgent"));
        assert!("".parse::<Importance>().is_err());
    }

    #[test]
    fn test_importance_display() {
        assert_eq!(format!("{}", Importance::High), "high");
        assert_eq!(format!("{}", Importance::Normal), "normal");
        assert_eq!(format!("{}", Importance::Low), "low");
    }

    #[test]
    fn test_importance_serde() {
        assert_eq!(serde_json::to_string(&Importance::Normal).unwrap(), "\"normal\"");
        let parsed: Importance = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Importance::High);
        assert!(serde_json::from_str::<Importance>("\"critical\"").is_err());
    }
}
