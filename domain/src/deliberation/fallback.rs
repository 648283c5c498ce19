//! Fallback markers: plain-text placeholders returned instead of errors.
//!
//! Every layer below the orchestrator degrades to one of these strings
//! rather than failing, and callers classify text with [`is_fallback`].
//!
//! The predicate is a heuristic: a genuine answer that starts with `[` and
//! mentions "error" or "failed" is misclassified as a failure. It is kept
//! as-is for compatibility with existing traces.

/// Returns `true` when `text` looks like a fallback marker.
///
/// A marker starts with `[` and contains `failed` or `error`
/// (case-insensitive). Both keyword checks sit under the prefix check.
///
/// ```
/// use council_domain::deliberation::fallback::is_fallback;
///
/// assert!(is_fallback("[model-x failed to respond after 3 retries]"));
/// assert!(!is_fallback("Good error handling starts with typed errors."));
/// ```
pub fn is_fallback(text: &str) -> bool {
    let lower = text.to_lowercase();
    text.starts_with('[') && (lower.contains("failed") || lower.contains("error"))
}

/// Builders for every marker the system emits
pub struct FallbackMarker;

impl FallbackMarker {
    /// Returns `true` only for text in the exact shape of a marker built here.
    ///
    /// Unlike [`is_fallback`], a genuine answer that happens to start with `[`
    /// and mention an error is never matched.
    ///
    /// ```
    /// use council_domain::deliberation::fallback::FallbackMarker;
    ///
    /// assert!(FallbackMarker::is_emitted("[m failed to respond after 2 retries]"));
    /// assert!(!FallbackMarker::is_emitted("[Note] error handling matters"));
    /// ```
    pub fn is_emitted(text: &str) -> bool {
        let Some(inner) = text
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return false;
        };

        if let Some(id) = inner.strip_prefix("Error: Unknown provider '") {
            return id.ends_with('\'');
        }
        if let Some(label) = inner
            .strip_prefix("Error: ")
            .and_then(|rest| rest.strip_suffix(" is not configured"))
        {
            return !label.is_empty();
        }
        if let Some(rest) = inner.strip_prefix("Chairman model ") {
            return rest.contains(" failed to synthesize: ");
        }
        if let Some(model) = inner.strip_suffix(" encountered an unexpected orchestration error") {
            return !model.is_empty();
        }
        match inner
            .rsplit_once(" failed to respond after ")
            .and_then(|(model, rest)| Some((model, rest.strip_suffix(" retries")?)))
        {
            Some((model, count)) => {
                !model.is_empty() && !count.is_empty() && count.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }

    /// A provider call that exhausted its retries or hit a terminal error
    pub fn retries_exhausted(model: &str, retries: u32) -> String {
        format!("[{model} failed to respond after {retries} retries]")
    }

    /// A council member whose call panicked inside the gather
    pub fn orchestration_error(model: &str) -> String {
        format!("[{model} encountered an unexpected orchestration error]")
    }

    /// The chairman call could not produce a verdict
    pub fn chairman_failed(model: &str, kind: &str) -> String {
        format!("[Chairman model {model} failed to synthesize: {kind}]")
    }

    /// The provider has no credential configured
    pub fn provider_not_configured(provider_label: &str) -> String {
        format!("[Error: {provider_label} is not configured]")
    }

    /// The provider tag does not name a supported provider
    pub fn unknown_provider(provider_id: &str) -> String {
        format!("[Error: Unknown provider '{provider_id}']")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_client_fallback() {
        assert!(is_fallback(&FallbackMarker::retries_exhausted("m", 3)));
    }

    #[test]
    fn test_detects_all_emitted_markers() {
        assert!(is_fallback(&FallbackMarker::orchestration_error("m")));
        assert!(is_fallback(&FallbackMarker::chairman_failed("m", "timeout")));
        assert!(is_fallback(&FallbackMarker::provider_not_configured("GROQ")));
        assert!(is_fallback(&FallbackMarker::unknown_provider("foo")));
    }

    #[test]
    fn test_is_case_insensitive() {
        assert!(is_fallback("[Model FAILED]"));
        assert!(is_fallback("[ERROR: upstream]"));
    }

    #[test]
    fn test_genuine_answer_mentioning_error_succeeds() {
        // Keyword without the bracket prefix must never count as a failure.
        assert!(!is_fallback("Error handling in Rust uses Result."));
        assert!(!is_fallback("Retries failed? Use exponential backoff."));
        assert!(!is_fallback("The request failed with an error, so retry."));
    }

    #[test]
    fn test_bracket_without_keyword_succeeds() {
        assert!(!is_fallback("[1] Rust is memory safe."));
    }

    #[test]
    fn test_known_false_positive_is_preserved() {
        assert!(is_fallback("[Note] error handling matters"));
    }

    #[test]
    fn test_is_emitted_matches_every_builder() {
        for marker in [
            FallbackMarker::retries_exhausted("z-ai/glm-4.5-air:free", 3),
            FallbackMarker::orchestration_error("m"),
            FallbackMarker::chairman_failed("c/chair", "timeout"),
            FallbackMarker::provider_not_configured("GROQ"),
            FallbackMarker::unknown_provider("foo"),
        ] {
            assert!(FallbackMarker::is_emitted(&marker), "{marker}");
        }
    }

    #[test]
    fn test_is_emitted_rejects_bracketed_answers() {
        assert!(!FallbackMarker::is_emitted(
            "[Consensus] The council agrees: error handling in Rust uses Result."
        ));
        assert!(!FallbackMarker::is_emitted("[Note] error handling matters"));
        assert!(!FallbackMarker::is_emitted("[Retries failed to respond after many retries]"));
        assert!(!FallbackMarker::is_emitted("m failed to respond after 1 retries"));
    }

    #[test]
    fn test_marker_formats() {
        assert_eq!(
            FallbackMarker::unknown_provider("foo"),
            "[Error: Unknown provider 'foo']"
        );
        assert_eq!(
            FallbackMarker::provider_not_configured("GROQ"),
            "[Error: GROQ is not configured]"
        );
        assert_eq!(
            FallbackMarker::retries_exhausted("z-ai/glm-4.5-air:free", 2),
            "[z-ai/glm-4.5-air:free failed to respond after 2 retries]"
        );
    }
}
