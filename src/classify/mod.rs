use serde::{Deserialize, Serialize};

pub mod engine;

pub use engine::Classifier;

/// Label attached to an author identity. Classification is a pure function
/// of the identity string and is recomputed on demand, never cached, so the
/// rule set can change between runs without stale labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Human,
    Automated,
}

/// One classification rule. Rules are applied in order, case-insensitively;
/// the first match labels the identity `Automated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotRule {
    pub name: String,
    pub pattern: String,
}

impl BotRule {
    fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

/// The built-in rule table. This is a heuristic: identities like "Abbott"
/// match the bare "bot" substring and well-disguised automation slips
/// through. Both directions are accepted, known limitations.
pub fn default_rules() -> Vec<BotRule> {
    vec![
        BotRule::new("Bracketed bot marker", r"\[bot\]"),
        BotRule::new("Bot substring", r"bot"),
        BotRule::new("Dependabot", r"dependabot"),
        BotRule::new("GitHub Actions", r"github-actions"),
        BotRule::new("Renovate", r"renovate"),
        BotRule::new("Greenkeeper", r"greenkeeper"),
        BotRule::new("Codecov", r"codecov"),
        BotRule::new("Snyk", r"snyk"),
        BotRule::new("WhiteSource", r"whitesource"),
        BotRule::new("Auto prefix", r"^auto"),
        BotRule::new("CI prefix", r"^ci"),
        BotRule::new("Deploy prefix", r"^deploy"),
        BotRule::new("Automation substring", r"automation"),
        // Numeric-only identities are usually system accounts
        BotRule::new("Numeric identity", r"^\s*[0-9]+\s*$"),
    ]
}
