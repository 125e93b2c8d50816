use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Economy,
    Premium,
}

impl Mode {
    pub fn display_name(self) -> &'static str {
        match self {
            Mode::Economy => "Economy",
            Mode::Premium => "Premium",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Economy => "economy",
            Mode::Premium => "premium",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated quote, as cached on disk.
///
/// Only `day_key` and `mode` decide whether a cached quote can be reused;
/// `created_at` is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub day_key: String,
    pub mode: Mode,
    pub quote: String,
    pub context: String,
    pub created_at: DateTime<Utc>,
}
