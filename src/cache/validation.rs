use crate::models::{Artifact, Mode};

/// A stored quote is reusable only for the same day and the same mode.
pub fn is_valid(stored: Option<&Artifact>, today_key: &str, mode: Mode) -> bool {
    stored.is_some_and(|artifact| artifact.day_key == today_key && artifact.mode == mode)
}
