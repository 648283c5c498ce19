//! Anonymization of Stage 1 opinions before cross-review

use super::value_objects::Opinion;
use std::collections::BTreeMap;

const SECTION_SEPARATOR: &str = "\n---\n";

/// Body rendered for a failed member; its fallback marker names the model
const NO_RESPONSE: &str = "[This council member did not respond]";

/// Review-ready rendering of a set of opinions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizedOpinions {
    /// Numbered sections keyed by `response_id` only
    pub text: String,
    /// `response_id` → model identifier; kept for debugging, never shown to reviewers
    pub identities: BTreeMap<u32, String>,
}

/// Render opinions as `### Response #<id>` sections with model identity removed.
///
/// Every supplied `response_id` appears exactly once in the output,
/// in input order. Failed members keep their section but not their text.
pub fn anonymize_opinions(opinions: &[Opinion]) -> AnonymizedOpinions {
    let mut sections = Vec::with_capacity(opinions.len());
    let mut identities = BTreeMap::new();

    for opinion in opinions {
        let body = if opinion.succeeded {
            opinion.text.as_str()
        } else {
            NO_RESPONSE
        };
        sections.push(format!("### Response #{}\n{}\n", opinion.response_id, body));
        identities.insert(opinion.response_id, opinion.model_ref.model().to_string());
    }

    AnonymizedOpinions {
        text: sections.join(SECTION_SEPARATOR),
        identities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model_ref::ProviderModelRef;

    fn opinions() -> Vec<Opinion> {
        vec![
            Opinion::from_response(
                1,
                ProviderModelRef::openrouter("vendor-a/alpha:free").unwrap(),
                "Answer one.",
            ),
            Opinion::from_response(
                2,
                ProviderModelRef::groq("beta-70b").unwrap(),
                "[beta-70b failed to respond after 1 retries]",
            ),
            Opinion::from_response(
                3,
                ProviderModelRef::openrouter("vendor-c/gamma").unwrap(),
                "Answer three.",
            ),
        ]
    }

    #[test]
    fn test_preserves_every_response_id() {
        let result = anonymize_opinions(&opinions());
        let ids: Vec<u32> = result.identities.keys().copied().collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for id in 1..=3 {
            assert_eq!(
                result.text.matches(&format!("### Response #{id}\n")).count(),
                1
            );
        }
        assert!(!result.text.contains("### Response #4"));
    }

    #[test]
    fn test_strips_model_identity() {
        let result = anonymize_opinions(&opinions());
        assert!(!result.text.contains("vendor-a/alpha"));
        assert!(!result.text.contains("vendor-c/gamma"));
        assert!(!result.text.contains("beta-70b"));
        assert!(result.text.contains(NO_RESPONSE));
        assert_eq!(result.identities[&1], "vendor-a/alpha:free");
    }

    #[test]
    fn test_sections_are_separated() {
        let result = anonymize_opinions(&opinions());
        assert_eq!(result.text.matches(SECTION_SEPARATOR).count(), 2);
        assert!(result.text.starts_with("### Response #1\nAnswer one.\n"));
    }

    #[test]
    fn test_empty_input() {
        let result = anonymize_opinions(&[]);
        assert!(result.text.is_empty());
        assert!(result.identities.is_empty());
    }
}
