//! Console output formatter for cycle results

use colored::Colorize;
use planqa_application::QueryError;
use planqa_domain::{AnswerOutcome, QueryResult};

/// Formats cycle results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result: plan, sub-questions, context and answer
    pub fn format(result: &QueryResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("planqa Results"));
        output.push('\n');

        output.push_str(&Self::section_header("Plan"));
        for line in result.plan.lines() {
            match line.split_once(':') {
                Some((label, rest))
                    if label == "Original Question" || label == "Rephrased Question" =>
                {
                    output.push_str(&format!("{}{}\n", format!("{label}:").cyan().bold(), rest));
                }
                _ => {
                    output.push_str(line);
                    output.push('\n');
                }
            }
        }

        output.push_str(&Self::section_header("Sub-questions"));
        for (i, sub_question) in result.sub_questions.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, sub_question));
        }

        output.push_str(&Self::section_header("Context"));
        if result.context.is_empty() {
            output.push_str(&format!("{}\n", "(no passages retrieved)".dimmed()));
        } else {
            for line in result.context.lines() {
                if line.starts_with("[Chunk ") {
                    output.push_str(&format!("{}\n", line.yellow().bold()));
                } else {
                    output.push_str(&Self::indent(line, "  "));
                    output.push('\n');
                }
            }
        }

        output.push_str(&Self::section_header("Answer"));
        if let Some(outcome) = result.outcome() {
            output.push_str(&format!("{}\n\n", Self::outcome_label(outcome)));
        }
        output.push_str(&result.answer);
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON (the `POST /qa` response shape)
    pub fn format_json(result: &QueryResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the answer only (concise output)
    pub fn format_answer(result: &QueryResult) -> String {
        format!("{}\n", result.answer)
    }

    pub fn format_error(error: &QueryError) -> String {
        format!(
            "{} {}\n",
            format!("Error ({}):", error.kind()).red().bold(),
            error
        )
    }

    fn outcome_label(outcome: AnswerOutcome) -> String {
        match outcome {
            AnswerOutcome::Verified => "[verified]".green().to_string(),
            AnswerOutcome::Corrected => "[corrected by verifier]".yellow().to_string(),
            AnswerOutcome::NoInformation => "[no relevant passages]".dimmed().to_string(),
            AnswerOutcome::Unsupported => "[unsupported]".red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
