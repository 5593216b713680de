//! Visual tones shared by goals, badges and status chips.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of color tags a record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Default,
    #[default]
    Primary,
    Accent,
    Success,
    Warning,
    Danger,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Default => "default",
            Tone::Primary => "primary",
            Tone::Accent => "accent",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Tone::Default => "#64748b",
            Tone::Primary => "#8b5cf6",
            Tone::Accent => "#3b82f6",
            Tone::Success => "#22c55e",
            Tone::Warning => "#f59e0b",
            Tone::Danger => "#ef4444",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Tone::Default),
            "primary" => Ok(Tone::Primary),
            "accent" => Ok(Tone::Accent),
            "success" => Ok(Tone::Success),
            "warning" => Ok(Tone::Warning),
            "danger" => Ok(Tone::Danger),
            other => Err(format!("Unknown tone: {}", other)),
        }
    }
}

// Unknown tags stored by older clients render as primary
impl<'de> Deserialize<'de> for Tone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .and_then(|s| Tone::from_str(&s).ok())
            .unwrap_or_default())
    }
}
