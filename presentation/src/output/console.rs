//! Console output formatter for deliberation traces

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::{DeliberationTrace, Review, Stage};

/// Formats deliberation traces for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete trace
    pub fn format(trace: &DeliberationTrace) -> String {
        let meta = &trace.meta;
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("LLM Council Deliberation"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            trace.original_prompt
        ));

        output.push_str(&format!(
            "{} {}\n",
            "Council:".cyan().bold(),
            trace
                .opinions
                .iter()
                .map(|o| o.model_ref.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Chairman:".cyan().bold(),
            meta.chairman_model
        ));

        // Stage 1
        output.push_str(&Self::section_header(Stage::Opinions));
        for opinion in &trace.opinions {
            let title = format!("── #{} {} ──", opinion.response_id, opinion.model_ref);
            if opinion.succeeded {
                output.push_str(&format!("\n{}\n{}\n", title.yellow().bold(), opinion.text));
            } else {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    title.red().bold(),
                    opinion.text.dimmed()
                ));
            }
        }

        // Stage 2
        output.push_str(&Self::section_header(Stage::Review));
        if meta.review_skipped {
            output.push_str(&format!("\n{}\n", "Skipped: no usable opinions".yellow()));
        }
        for review in &trace.reviews {
            output.push_str(&Self::format_review(review));
        }

        // Stage 3
        output.push_str(&Self::section_header(Stage::Synthesis));
        output.push_str(&format!("\n{}\n", trace.verdict));

        for warning in &meta.warnings {
            output.push_str(&format!("\n{} {}\n", "warning:".yellow().bold(), warning));
        }

        output.push_str(&Self::summary(trace));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(trace: &DeliberationTrace) -> String {
        serde_json::to_string_pretty(trace).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    pub fn format_verdict(trace: &DeliberationTrace) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== LLM Council Verdict ===".cyan().bold()
        ));

        output.push_str(&format!("{} {}\n\n", "Q:".bold(), trace.original_prompt));

        output.push_str(&format!(
            "{} {}/{}\n\n",
            "Council members responding:".dimmed(),
            trace.meta.succeeded_opinions,
            trace.meta.council_size
        ));

        output.push_str(&trace.verdict);
        output.push('\n');

        output
    }

    fn format_review(review: &Review) -> String {
        let title = format!("── {} ──", review.reviewer);
        if !review.succeeded {
            return format!(
                "\n{}\n{}\n",
                title.red().bold(),
                "No usable review".dimmed()
            );
        }

        let mut text = format!("\n{}\n", title.yellow().bold());
        if !review.rankings.is_empty() {
            let order = review
                .rankings
                .iter()
                .map(|r| format!("#{} ({})", r.response_id, r.total_score))
                .collect::<Vec<_>>()
                .join(" > ");
            text.push_str(&format!("{} {}\n", "Ranking:".bold(), order));
        }
        for score in &review.detailed_scores {
            text.push_str(&format!(
                "  #{}: accuracy {}, insight {}, logic {}\n{}\n",
                score.response_id,
                score.accuracy,
                score.insight,
                score.logic,
                Self::indent(&score.critique, "    ")
            ));
        }
        text
    }

    fn summary(trace: &DeliberationTrace) -> String {
        let meta = &trace.meta;
        let t = &meta.timing;
        format!(
            "\n{} {}/{} opinions, {}/{} reviews | {:.2}s + {:.2}s + {:.2}s = {:.2}s\n",
            "Summary:".cyan().bold(),
            meta.succeeded_opinions,
            meta.council_size,
            meta.succeeded_reviews,
            trace.reviews.len(),
            t.stage1_seconds,
            t.stage2_seconds,
            t.stage3_seconds,
            t.total_seconds
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(stage: Stage) -> String {
        let title = format!("Stage {}: {}", stage.number(), stage.display_name());
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

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, trace: &DeliberationTrace) -> String {
        Self::format(trace)
    }

    fn format_json(&self, trace: &DeliberationTrace) -> String {
        Self::format_json(trace)
    }

    fn format_verdict(&self, trace: &DeliberationTrace) -> String {
        Self::format_verdict(trace)
    }
}
