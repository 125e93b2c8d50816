use crate::models::Mode;

/// Model parameters for one quality tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub model: &'static str,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ModelConfig {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Economy => Self {
                model: "gpt-4o-mini",
                max_tokens: 180,
                temperature: 0.7,
            },
            Mode::Premium => Self {
                model: "gpt-4o",
                max_tokens: 220,
                temperature: 0.7,
            },
        }
    }
}

pub const SYSTEM_PROMPT: &str = r#"You are a calm and concise daily reflection companion.

Rules:
- Produce ONLY original writing. Do NOT quote or attribute real people or books.
- Avoid cliches, platitudes and motivational poster language.
- Keep the quote short and memorable (1-2 sentences).
- Keep the context practical and grounded (2-4 sentences).
- No markdown, no bullet lists.

Output contract:
- Return ONLY a single JSON object with exactly these string fields:
  {"quote":"...","context":"..."}"#;

pub fn user_prompt(day_key: &str, mode: Mode, user_guidance: &str) -> String {
    let guidance = user_guidance.trim();
    let guidance = if guidance.is_empty() { "(none)" } else { guidance };

    format!(
        "Today (local date): {}\nMode: {}\nUser guidance: {}\nGenerate the daily quote now. Remember: output ONLY the JSON object.",
        day_key,
        mode.display_name(),
        guidance
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_allows_more_tokens_at_the_same_temperature() {
        let economy = ModelConfig::for_mode(Mode::Economy);
        let premium = ModelConfig::for_mode(Mode::Premium);
        assert!(premium.max_tokens > economy.max_tokens);
        assert_eq!(premium.temperature, economy.temperature);
        assert_ne!(premium.model, economy.model);
    }

    #[test]
    fn user_prompt_marks_missing_guidance() {
        let prompt = user_prompt("2026-01-04", Mode::Economy, "   ");
        assert!(prompt.contains("Today (local date): 2026-01-04"));
        assert!(prompt.contains("Mode: Economy"));
        assert!(prompt.contains("User guidance: (none)"));
    }

    #[test]
    fn user_prompt_embeds_trimmed_guidance() {
        let prompt = user_prompt("2026-01-04", Mode::Premium, "  about patience \n");
        assert!(prompt.contains("Mode: Premium"));
        assert!(prompt.contains("User guidance: about patience\n"));
    }
}
