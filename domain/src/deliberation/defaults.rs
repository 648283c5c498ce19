//! Built-in council used when neither the request nor the config names one

use crate::core::model_ref::ProviderModelRef;

/// Default council, all served through OpenRouter's free tier.
///
/// A model may appear more than once; each entry is an independent member.
pub const DEFAULT_COUNCIL: [&str; 4] = [
    "arcee-ai/trinity-large-preview:free",
    "z-ai/glm-4.5-air:free",
    "arcee-ai/trinity-mini:free",
    "arcee-ai/trinity-mini:free",
];

pub const DEFAULT_CHAIRMAN: &str = "arcee-ai/trinity-large-preview:free";

pub fn default_council() -> Vec<ProviderModelRef> {
    DEFAULT_COUNCIL
        .iter()
        .map(|model| ProviderModelRef::builtin(model))
        .collect()
}

pub fn default_chairman() -> ProviderModelRef {
    ProviderModelRef::builtin(DEFAULT_CHAIRMAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::Provider;

    #[test]
    fn test_default_council_routes_to_openrouter() {
        let council = default_council();
        assert_eq!(council.len(), 4);
        assert!(council.iter().all(|m| m.provider() == &Provider::OpenRouter));
        assert_eq!(council[2], council[3]);
    }

    #[test]
    fn test_default_chairman() {
        assert_eq!(default_chairman().model(), DEFAULT_CHAIRMAN);
    }
}
