use serde::Deserialize;

use crate::error::ParseError;

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsedQuote {
    pub quote: String,
    pub context: String,
}

/// Pull a `{"quote": ..., "context": ...}` object out of raw model output.
///
/// Models do not reliably return bare JSON, so a surrounding code fence is
/// stripped and any prose around the outermost braces is ignored.
pub fn parse_quote(raw: &str) -> Result<ParsedQuote, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let unfenced = strip_code_fence(trimmed);
    let json = extract_json_object(unfenced).ok_or(ParseError::NoJsonObject)?;

    let decoded: ParsedQuote =
        serde_json::from_str(json).map_err(|_| ParseError::DecodingFailed)?;

    let quote = decoded.quote.trim();
    let context = decoded.context.trim();
    if quote.is_empty() || context.is_empty() {
        return Err(ParseError::MissingFields);
    }

    Ok(ParsedQuote {
        quote: quote.to_string(),
        context: context.to_string(),
    })
}

fn strip_code_fence(s: &str) -> &str {
    if !s.starts_with(FENCE) {
        return s;
    }

    let mut out = match s.find('\n') {
        Some(newline) => &s[newline + 1..],
        None => s,
    };
    if let Some(closing) = out.rfind(FENCE) {
        out = &out[..closing];
    }
    out.trim()
}

fn extract_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(&s[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(quote: &str, context: &str) -> ParsedQuote {
        ParsedQuote {
            quote: quote.to_string(),
            context: context.to_string(),
        }
    }

    #[test]
    fn parses_bare_json() {
        let result = parse_quote(r#"{"quote":"q","context":"c"}"#);
        assert_eq!(result, Ok(parsed("q", "c")));
    }

    #[test]
    fn strips_json_code_fence() {
        let result = parse_quote("```json\n{\"quote\":\"q\",\"context\":\"c\"}\n```");
        assert_eq!(result, Ok(parsed("q", "c")));
    }

    #[test]
    fn ignores_prose_around_the_object() {
        let raw = "Here is today's quote:\n{\"quote\": \"Rest is part of the work.\", \"context\": \"Pause before you push.\"}\nEnjoy!";
        let result = parse_quote(raw).unwrap();
        assert_eq!(result.quote, "Rest is part of the work.");
        assert_eq!(result.context, "Pause before you push.");
    }

    #[test]
    fn trims_field_values() {
        let result = parse_quote(r#"  {"quote":"  q ","context":"\n c\t"}  "#);
        assert_eq!(result, Ok(parsed("q", "c")));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_quote(""), Err(ParseError::Empty));
        assert_eq!(parse_quote(" \n\t "), Err(ParseError::Empty));
    }

    #[test]
    fn rejects_text_without_braces() {
        assert_eq!(parse_quote("not json"), Err(ParseError::NoJsonObject));
        assert_eq!(parse_quote("} backwards {"), Err(ParseError::NoJsonObject));
    }

    #[test]
    fn rejects_fence_without_body() {
        assert_eq!(parse_quote("```"), Err(ParseError::NoJsonObject));
    }

    #[test]
    fn rejects_wrong_field_types() {
        assert_eq!(
            parse_quote(r#"{"quote":1,"context":"c"}"#),
            Err(ParseError::DecodingFailed)
        );
        assert_eq!(
            parse_quote(r#"{"quote":"q"}"#),
            Err(ParseError::DecodingFailed)
        );
        assert_eq!(parse_quote("{ nope }"), Err(ParseError::DecodingFailed));
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            parse_quote(r#"{"quote":"","context":"c"}"#),
            Err(ParseError::MissingFields)
        );
        assert_eq!(
            parse_quote(r#"{"quote":"q","context":"   "}"#),
            Err(ParseError::MissingFields)
        );
    }
}
