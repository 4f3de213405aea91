//! Plan parsing from planner completions.
//!
//! Supports three formats, tried in order:
//! 1. ` ```plan ` (or ` ```json `) fenced code blocks containing JSON
//! 2. A raw JSON object anywhere in the response
//! 3. Sectioned text (`REPHRASED QUESTION:`, `KEY CONCEPTS:`,
//!    `SEARCH STRATEGY:`, `SUB-QUESTIONS:` followed by a list)
//!
//! A `None` result is the malformed-plan condition; the Planner recovers
//! from it by falling back to the original question.

use super::entities::PlanDraft;
use crate::core::string::fenced_blocks;

/// Parse planner output into a [`PlanDraft`].
///
/// Returns `None` if no recognizable structure with at least one
/// sub-question is found.
pub fn parse_plan(response: &str) -> Option<PlanDraft> {
    for block in fenced_blocks(response, &["plan", "json"]) {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&block)
            && let Some(draft) = parse_plan_json(&parsed)
        {
            return Some(draft);
        }
    }

    if let Some(start) = response.find('{')
        && let Some(end) = response.rfind('}')
        && end > start
        && let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&response[start..=end])
        && let Some(draft) = parse_plan_json(&parsed)
    {
        return Some(draft);
    }

    parse_plan_sections(response)
}

/// Parse a plan from a JSON value.
///
/// Expected schema:
/// ```json
/// {
///   "rephrased_question": "string (optional)",
///   "key_concepts": ["string", ...],
///   "strategy": "string (optional)",
///   "sub_questions": ["string", ...]
/// }
/// ```
///
/// Returns `None` if `sub_questions` is missing or contains no strings.
pub fn parse_plan_json(json: &serde_json::Value) -> Option<PlanDraft> {
    let sub_questions: Vec<String> = json
        .get("sub_questions")
        .or_else(|| json.get("subquestions"))?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect();

    if sub_questions.is_empty() {
        return None;
    }

    let text_field = |key: &str| {
        json.get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let key_concepts = json
        .get("key_concepts")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(PlanDraft {
        rephrased_question: text_field("rephrased_question"),
        key_concepts,
        strategy: text_field("strategy").or_else(|| text_field("search_strategy")),
        sub_questions,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Rephrased,
    KeyConcepts,
    Strategy,
    SubQuestions,
    Other,
}

/// Parse the sectioned text format the planning prompt falls back to.
fn parse_plan_sections(response: &str) -> Option<PlanDraft> {
    let mut draft = PlanDraft::default();
    let mut section = Section::Other;
    let mut strategy_lines: Vec<String> = Vec::new();

    for raw in response.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((next, rest)) = section_header(line) {
            section = next;
            if !rest.is_empty() {
                match section {
                    Section::Rephrased => draft.rephrased_question = Some(rest.to_string()),
                    Section::Strategy => strategy_lines.push(rest.to_string()),
                    Section::KeyConcepts => draft.key_concepts.extend(split_concepts(rest)),
                    Section::SubQuestions | Section::Other => {}
                }
            }
            continue;
        }

        match section {
            Section::Rephrased if draft.rephrased_question.is_none() => {
                draft.rephrased_question = Some(strip_list_marker(line).to_string());
            }
            Section::KeyConcepts => {
                draft.key_concepts.extend(split_concepts(strip_list_marker(line)));
            }
            Section::Strategy => strategy_lines.push(strip_list_marker(line).to_string()),
            Section::SubQuestions => {
                let item = strip_list_marker(line);
                if !item.is_empty() {
                    draft.sub_questions.push(item.to_string());
                }
            }
            Section::Rephrased | Section::Other => {}
        }
    }

    if draft.sub_questions.is_empty() {
        return None;
    }
    if !strategy_lines.is_empty() {
        draft.strategy = Some(strategy_lines.join(" "));
    }
    Some(draft)
}

/// Detect a section header line, returning the section and any inline text
/// after the colon.
fn section_header(line: &str) -> Option<(Section, &str)> {
    let cleaned = strip_list_marker(line.trim_start_matches('#').trim())
        .trim_start_matches('*')
        .trim();
    let (head, rest) = match cleaned.split_once(':') {
        Some((head, rest)) => (head, rest),
        None => (cleaned, ""),
    };
    let raw_head = head.trim_matches('*').trim();
    let head = raw_head.to_uppercase();
    let rest = rest.trim().trim_start_matches("**").trim();

    let section = if head.starts_with("REPHRASED QUESTION") {
        Section::Rephrased
    } else if head.starts_with("KEY ENTITIES") || head.starts_with("KEY CONCEPTS") {
        Section::KeyConcepts
    } else if head.starts_with("SEARCH STRATEGY") {
        Section::Strategy
    } else if head.starts_with("SUB-QUESTION")
        || head.starts_with("SUB QUESTION")
        || head.starts_with("SUBQUESTION")
    {
        Section::SubQuestions
    } else if raw_head.len() <= 40
        && !raw_head.is_empty()
        && !raw_head.ends_with('?')
        && raw_head.chars().all(|c| !c.is_lowercase())
        && cleaned.contains(':')
    {
        // Any other all-caps "HEADER:" line ends the current section
        Section::Other
    } else {
        return None;
    };

    Some((section, rest))
}

/// Remove a leading `-`, `*`, `•`, `1.` or `1)` list marker.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
    {
        return rest.trim();
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }
    line
}

fn split_concepts(text: &str) -> Vec<String> {
    text.split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
