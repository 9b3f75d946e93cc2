//! Output kind selectors
//!
//! `OUTPUT <Name>` declarations select which transpilers run. Selector
//! spellings match the source grammar; lowercase directory aliases are
//! accepted for CLI convenience.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A compilation target, one per transpiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Static site configuration
    MintSite,
    /// Qualification agent configuration
    Agent,
    /// Timed SMS campaign sequence
    SmsCampaign,
    /// Metrics dashboard definition
    RMetrics,
    /// vROI calculator definition
    Vroi,
    /// Semantic skill descriptor
    SkSkill,
}

impl OutputKind {
    /// Every kind, in canonical order. Transpilers run and outputs serialize
    /// in this order regardless of selector declaration order.
    pub const ALL: [OutputKind; 6] = [
        OutputKind::MintSite,
        OutputKind::Agent,
        OutputKind::SmsCampaign,
        OutputKind::RMetrics,
        OutputKind::Vroi,
        OutputKind::SkSkill,
    ];

    /// Selector spelling used in `OUTPUT` declarations
    pub fn name(&self) -> &'static str {
        match self {
            OutputKind::MintSite => "MintSite",
            OutputKind::Agent => "AGENT",
            OutputKind::SmsCampaign => "SMS_CAMPAIGN",
            OutputKind::RMetrics => "RMetrics",
            OutputKind::Vroi => "vROI",
            OutputKind::SkSkill => "SK_SKILL",
        }
    }

    /// Output subdirectory used by the boundary layer
    pub fn subdir(&self) -> &'static str {
        match self {
            OutputKind::MintSite => "mintsite",
            OutputKind::Agent => "agents",
            OutputKind::SmsCampaign => "campaigns",
            OutputKind::RMetrics => "rmetrics",
            OutputKind::Vroi => "vroi",
            OutputKind::SkSkill => "skills",
        }
    }

    /// Resolve a selector name or directory alias
    pub fn from_name(name: &str) -> Option<Self> {
        OutputKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name || kind.subdir() == name)
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputKind::from_name(s).ok_or_else(|| CoreError::UnknownOutput(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_names_resolve() {
        for kind in OutputKind::ALL {
            assert_eq!(OutputKind::from_name(kind.name()), Some(kind));
            assert_eq!(OutputKind::from_name(kind.subdir()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_selector() {
        assert_eq!(OutputKind::from_name("Cloudflare"), None);
        assert!("SDR".parse::<OutputKind>().is_err());
    }
}
