//! Verification verdicts.
//!
//! [`parse_verdict`] turns a free-form verifier completion into the
//! three-way [`VerificationResult`]. It is pure text handling, no I/O.
//!
//! | Format | Example |
//! |--------|---------|
//! | ` ```verdict ` fence (preferred) | `{"verdict": "revised", "answer": "...", "reason": "..."}` |
//! | Raw JSON | the same object anywhere in the text |
//! | Keyword lines | `VERDICT: UNSUPPORTED` / `REASON: ...` |
//! | Bare text | treated as a corrected answer |

use crate::core::string::fenced_blocks;
use serde::{Deserialize, Serialize};

/// Outcome of checking a draft answer against its context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum VerificationResult {
    /// Every claim is supported by the context
    Approved,
    /// Partially supported; the corrected answer keeps only supported claims
    Revised(String),
    /// No usable evidence supports the draft
    Unsupported(String),
}

impl VerificationResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationResult::Approved => "approved",
            VerificationResult::Revised(_) => "revised",
            VerificationResult::Unsupported(_) => "unsupported",
        }
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_UNSUPPORTED_REASON: &str = "the retrieved context does not support the answer";
const UNRECOGNISED_VERDICT: &str = "unrecognised verifier verdict";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Supported,
    Revised,
    Unsupported,
}

impl Verdict {
    fn parse(value: &str) -> Option<Self> {
        let normalized = value
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase()
            .replace(['-', ' '], "_");
        match normalized.as_str() {
            "supported" | "fully_supported" | "approved" | "approve" => Some(Verdict::Supported),
            "revised" | "revise" | "partially_supported" | "partial" | "corrected" => {
                Some(Verdict::Revised)
            }
            "unsupported" | "not_supported" | "rejected" | "reject" => Some(Verdict::Unsupported),
            _ => None,
        }
    }
}

/// Parse a verifier completion into a [`VerificationResult`].
///
/// ` ```verdict ` / ` ```json ` fenced blocks are read first, then a JSON
/// object anywhere in the text, then keyword lines. Structured output whose
/// verdict is not recognised becomes [`VerificationResult::Unsupported`];
/// only plain prose is taken as a corrected answer.
///
/// A revision whose text matches `draft` is reported as
/// [`VerificationResult::Approved`]. A revision without text cannot be
/// applied and becomes [`VerificationResult::Unsupported`].
pub fn parse_verdict(response: &str, draft: &str) -> VerificationResult {
    let mut unrecognised = false;
    let mut parsed = None;
    for structured in [parse_json_verdict(response), parse_keyword_verdict(response)] {
        match structured {
            Structured::Parsed(found) => {
                parsed = Some(found);
                break;
            }
            Structured::Unrecognised => unrecognised = true,
            Structured::Absent => {}
        }
    }

    let (verdict, answer, reason) = match parsed {
        Some(parsed) => parsed,
        None if unrecognised => {
            return VerificationResult::Unsupported(UNRECOGNISED_VERDICT.to_string());
        }
        None => {
            // Bare text: the verifier returned its corrected answer directly
            let text = response.trim();
            if text.is_empty() {
                (
                    Verdict::Unsupported,
                    None,
                    Some("verifier returned an empty judgement".to_string()),
                )
            } else {
                (Verdict::Revised, Some(text.to_string()), None)
            }
        }
    };

    match verdict {
        Verdict::Supported => VerificationResult::Approved,
        Verdict::Revised => match answer.filter(|a| !a.trim().is_empty()) {
            Some(text) if text.trim() == draft.trim() => VerificationResult::Approved,
            Some(text) => VerificationResult::Revised(text.trim().to_string()),
            None => VerificationResult::Unsupported(
                reason.unwrap_or_else(|| "verifier proposed a revision without text".to_string()),
            ),
        },
        Verdict::Unsupported => VerificationResult::Unsupported(
            reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNSUPPORTED_REASON.to_string()),
        ),
    }
}

type ParsedVerdict = (Verdict, Option<String>, Option<String>);

enum Structured {
    Parsed(ParsedVerdict),
    /// Structured output was present but carried no known verdict
    Unrecognised,
    Absent,
}

fn parse_json_verdict(response: &str) -> Structured {
    let blocks = fenced_blocks(response, &["verdict", "json"]);
    for block in &blocks {
        if let Some(parsed) = first_json_object(block).and_then(|v| verdict_fields(&v)) {
            return Structured::Parsed(parsed);
        }
    }

    let mut saw_object = !blocks.is_empty();
    for (start, _) in response.match_indices('{') {
        if let Some(value) = first_json_object(&response[start..]) {
            if let Some(parsed) = verdict_fields(&value) {
                return Structured::Parsed(parsed);
            }
            saw_object = true;
        }
    }

    if saw_object {
        Structured::Unrecognised
    } else {
        Structured::Absent
    }
}

/// The JSON object at the start of `text`, ignoring whatever follows it.
fn first_json_object(text: &str) -> Option<serde_json::Value> {
    let value = serde_json::Deserializer::from_str(text.trim_start())
        .into_iter::<serde_json::Value>()
        .next()?
        .ok()?;
    value.is_object().then_some(value)
}

fn verdict_fields(parsed: &serde_json::Value) -> Option<ParsedVerdict> {
    let verdict = Verdict::parse(parsed.get("verdict")?.as_str()?)?;
    let field = |key: &str| {
        parsed
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };
    Some((
        verdict,
        field("answer").or_else(|| field("revised_answer")),
        field("reason"),
    ))
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Answer,
    Reason,
}

fn parse_keyword_verdict(response: &str) -> Structured {
    let mut saw_verdict = false;
    let mut verdict = None;
    let mut answer: Option<String> = None;
    let mut reason: Option<String> = None;
    // Field that continuation lines append to
    let mut target: Option<Field> = None;

    for line in response.lines() {
        let trimmed = line.trim().trim_start_matches('*');
        let upper = trimmed.to_uppercase();

        if let Some(value) = keyword_value(trimmed, &upper, "VERDICT") {
            saw_verdict = true;
            verdict = Verdict::parse(value);
            target = None;
        } else if let Some(value) = keyword_value(trimmed, &upper, "ANSWER") {
            answer = Some(value.to_string());
            target = Some(Field::Answer);
        } else if let Some(value) = keyword_value(trimmed, &upper, "REASON") {
            reason = Some(value.to_string());
            target = Some(Field::Reason);
        } else if let Some(field) = target {
            let slot = match field {
                Field::Answer => &mut answer,
                Field::Reason => &mut reason,
            };
            if let Some(text) = slot.as_mut() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(line.trim_end());
            }
        }
    }

    match verdict {
        Some(v) => Structured::Parsed((
            v,
            answer.map(|a| a.trim().to_string()),
            reason.map(|r| r.trim().to_string()),
        )),
        None if saw_verdict => Structured::Unrecognised,
        None => Structured::Absent,
    }
}

/// `KEY: value` (case-insensitive key, optional `**` bold markers).
fn keyword_value<'a>(line: &'a str, upper: &str, key: &str) -> Option<&'a str> {
    if !upper.starts_with(key) {
        return None;
    }
    let rest = line.get(key.len()..)?.trim_start_matches('*').trim_start();
    rest.strip_prefix(':')
        .map(|value| value.trim().trim_start_matches("**").trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT: &str = "Vector databases enable fast similarity search.";

    #[test]
    fn test_json_supported() {
        let response = r#"```verdict
{"verdict": "supported", "reason": "all claims found in Chunk 1"}
```"#;
        assert_eq!(parse_verdict(response, DRAFT), VerificationResult::Approved);
    }

    #[test]
    fn test_json_revised() {
        let response = r#"{"verdict": "partially_supported", "answer": "Vector databases support similarity search."}"#;
        assert_eq!(
            parse_verdict(response, DRAFT),
            VerificationResult::Revised("Vector databases support similarity search.".to_string())
        );
    }

    #[test]
    fn test_json_revised_identical_to_draft_is_approved() {
        let response = format!(r#"{{"verdict": "revised", "answer": "{}"}}"#, DRAFT);
        assert_eq!(parse_verdict(&response, DRAFT), VerificationResult::Approved);
    }

    #[test]
    fn test_json_revised_without_text_is_unsupported() {
        let response = r#"{"verdict": "revised", "answer": "  "}"#;
        assert!(matches!(
            parse_verdict(response, DRAFT),
            VerificationResult::Unsupported(_)
        ));
    }

    #[test]
    fn test_json_unsupported_keeps_reason() {
        let response = r#"{"verdict": "unsupported", "reason": "context is about GPUs"}"#;
        assert_eq!(
            parse_verdict(response, DRAFT),
            VerificationResult::Unsupported("context is about GPUs".to_string())
        );
    }

    #[test]
    fn test_keyword_format_multiline_answer() {
        let response = "\
**VERDICT:** REVISED
ANSWER: Vector databases index embeddings.
They support approximate nearest neighbour search.
";
        assert_eq!(
            parse_verdict(response, DRAFT),
            VerificationResult::Revised(
                "Vector databases index embeddings.\nThey support approximate nearest neighbour search."
                    .to_string()
            )
        );
    }

    #[test]
    fn test_keyword_unsupported_default_reason() {
        let response = "Verdict: unsupported";
        assert_eq!(
            parse_verdict(response, DRAFT),
            VerificationResult::Unsupported(DEFAULT_UNSUPPORTED_REASON.to_string())
        );
    }

    #[test]
    fn test_bare_text_is_revision() {
        let response = "Vector databases allow similarity search over embeddings.";
        assert_eq!(
            parse_verdict(response, DRAFT),
            VerificationResult::Revised(response.to_string())
        );
    }

    #[test]
    fn test_verdict_fence_wins_over_stray_braces() {
        let response = "Checked claims {1,2} against the context.\n```verdict\n{\"verdict\": \"supported\", \"reason\": \"see Chunk 1\"}\n```\nDone.";
        assert_eq!(parse_verdict(response, DRAFT), VerificationResult::Approved);
    }

    #[test]
    fn test_raw_json_after_stray_brace() {
        let response = r#"Claims {a} and {b} checked. {"verdict": "unsupported", "reason": "no evidence"} end"#;
        assert_eq!(
            parse_verdict(response, DRAFT),
            VerificationResult::Unsupported("no evidence".to_string())
        );
    }

    #[test]
    fn test_unknown_json_verdict_is_unsupported() {
        let response = r#"{"verdict": "pass", "reason": "all good"}"#;
        assert_eq!(
            parse_verdict(response, DRAFT),
            VerificationResult::Unsupported(UNRECOGNISED_VERDICT.to_string())
        );
    }

    #[test]
    fn test_unknown_fenced_verdict_is_unsupported() {
        let response = "```verdict\nlooks fine to me\n```";
        assert_eq!(
            parse_verdict(response, DRAFT),
            VerificationResult::Unsupported(UNRECOGNISED_VERDICT.to_string())
        );
    }

    #[test]
    fn test_unknown_keyword_verdict_is_unsupported() {
        assert_eq!(
            parse_verdict("VERDICT: PASS\nREASON: fine", DRAFT),
            VerificationResult::Unsupported(UNRECOGNISED_VERDICT.to_string())
        );
    }

    #[test]
    fn test_empty_response_is_unsupported() {
        assert!(matches!(
            parse_verdict("   ", DRAFT),
            VerificationResult::Unsupported(_)
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(VerificationResult::Approved.to_string(), "approved");
        assert_eq!(VerificationResult::Revised("x".into()).to_string(), "revised");
    }
}
