//! Prompt templates for the deliberation stages

use crate::deliberation::value_objects::{Opinion, Review};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for Stage 1 (independent opinions)
    pub fn opinion_system() -> &'static str {
        r#"You are an expert advisor. Provide a concise, accurate, and carefully reasoned answer to the user's question.
Your answer must stand on its own: reason independently and do not mention or refer to any other model or advisor."#
    }

    /// System prompt for Stage 2 (anonymous cross-review)
    pub fn review_system() -> &'static str {
        r#"You are a critical reviewer on an advisory council. You will see several anonymized answers to the same user question, each labelled "Response #<id>".

Your task:
1. Critique every response for accuracy, insight, and logical rigor.
2. Score each response from 0 to 10 on accuracy, insight, and logic.
3. Rank the responses from best to worst.

Output format: respond with a raw JSON object only. No preamble, no explanation, no markdown code fences.
{
  "rankings": [{"response_id": 1, "total_score": 28}],
  "detailed_scores": [{"response_id": 1, "accuracy": 9, "insight": 9, "logic": 10, "critique": "..."}]
}"#
    }

    /// User prompt for Stage 2
    pub fn review_prompt(question: &str, anonymized_block: &str) -> String {
        format!(
            "Original User Query: {}\n\nCouncil Responses to Review:\n{}",
            question, anonymized_block
        )
    }

    /// System prompt for Stage 3 (chairman synthesis)
    pub fn chairman_system() -> &'static str {
        r#"You are the Chairman of an advisory council. Your only function is to arbitrate and synthesize the answers the council members already gave. You are a referee, not an additional participant.

Rules:
1. Do not add your own opinion, conjecture, or perspective.
2. Do not introduce any claim that no council member stated.
3. Where members agree, state the consensus directly and concisely.
4. Where members contradict each other, name the contradiction, weigh the evidence and the peer-review critiques supplied, and declare the best-supported position.
5. Members that failed to respond are already excluded from the material below. Do not speculate about them and do not treat their absence as a weakness of the result.
6. Structure your answer exactly as follows:

## Consensus Verdict
<the synthesized, definitive answer>

## Key Points of Agreement
<bullet list of what the council agreed on>

## Contradictions Resolved
<each contradiction and how it was resolved; write "None." if there were none>

## Council Participation
<how many members responded successfully and how many failed>

Do not hedge with phrases such as "I think" or "in my opinion"."#
    }

    /// User prompt for Stage 3.
    ///
    /// Only successful opinions and successful reviewers are rendered; the
    /// participation line still counts every council member.
    pub fn chairman_prompt(question: &str, opinions: &[Opinion], reviews: &[Review]) -> String {
        let mut prompt = format!("ORIGINAL QUERY: {}\n\nCOUNCIL OPINIONS:\n", question);

        let successful: Vec<&Opinion> = opinions.iter().filter(|o| o.succeeded).collect();
        if successful.is_empty() {
            prompt.push_str("(no council member produced an answer)\n");
        }
        for opinion in &successful {
            prompt.push_str(&format!(
                "--- RESPONSE #{} ---\n{}\n\n",
                opinion.response_id, opinion.text
            ));
        }

        let critiques: Vec<String> = reviews
            .iter()
            .filter(|r| r.succeeded)
            .map(Self::format_review)
            .collect();
        if !critiques.is_empty() {
            prompt.push_str("\nPEER REVIEWS:\n");
            prompt.push_str(&critiques.join("\n---\n"));
        }

        prompt.push_str(&format!(
            "\nPARTICIPATION: {}/{} council members responded successfully.\n",
            successful.len(),
            opinions.len()
        ));

        prompt
    }

    fn format_review(review: &Review) -> String {
        let mut text = String::from("Reviewer (anonymized):\n");
        for score in &review.detailed_scores {
            text.push_str(&format!(
                "- Assessment of Response #{}:\n  Scores: Accuracy={}/10, Insight={}/10, Logic={}/10\n  Critique: {}\n",
                score.response_id, score.accuracy, score.insight, score.logic, score.critique
            ));
        }
        if !review.rankings.is_empty() {
            let order = review
                .rankings
                .iter()
                .map(|r| format!("#{} ({})", r.response_id, r.total_score))
                .collect::<Vec<_>>()
                .join(" > ");
            text.push_str(&format!("  Ranking: {}\n", order));
        }
        text
    }
}
