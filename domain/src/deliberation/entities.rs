//! Deliberation domain entities

use serde::{Deserialize, Serialize};

/// Stage of a deliberation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Independent opinions - every council member answers alone
    Opinions,
    /// Anonymous cross-review - members score each other's answers
    Review,
    /// Chairman synthesis - one arbiter produces the verdict
    Synthesis,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Opinions => "opinions",
            Stage::Review => "review",
            Stage::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Opinions => "Independent Opinions",
            Stage::Review => "Anonymous Cross-Review",
            Stage::Synthesis => "Chairman Synthesis",
        }
    }

    /// 1-based position in the pipeline
    pub fn number(&self) -> u8 {
        match self {
            Stage::Opinions => 1,
            Stage::Review => 2,
            Stage::Synthesis => 3,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
