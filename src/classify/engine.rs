use super::*;
use crate::engine::rank::rank_against;
use crate::engine::{AggregateTally, AuthorCounts, LeaderboardEntry};
use anyhow::{Context, Result};
use regex::RegexBuilder;
use tracing::debug;

pub struct Classifier {
    compiled_rules: Vec<(regex::Regex, BotRule)>,
}

impl Classifier {
    pub fn new() -> Result<Self> {
        Self::with_rules(default_rules())
    }

    /// Build a classifier from an explicit rule table, e.g. the defaults
    /// plus site-specific additions from the config file.
    pub fn with_rules(rules: Vec<BotRule>) -> Result<Self> {
        let compiled_rules = rules
            .into_iter()
            .map(|rule| {
                let regex = RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("Failed to compile classifier rule: {}", rule.name))?;
                Ok((regex, rule))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Compiled {} classifier rules", compiled_rules.len());

        Ok(Self { compiled_rules })
    }

    pub fn classify(&self, identity: &str) -> Label {
        for (regex, _) in &self.compiled_rules {
            if regex.is_match(identity) {
                return Label::Automated;
            }
        }
        Label::Human
    }

    pub fn is_automated(&self, identity: &str) -> bool {
        self.classify(identity) == Label::Automated
    }

    /// Which rule fired, for diagnostics.
    pub fn matched_rule(&self, identity: &str) -> Option<&BotRule> {
        self.compiled_rules
            .iter()
            .find(|(regex, _)| regex.is_match(identity))
            .map(|(_, rule)| rule)
    }

    /// Human-labeled subset of a tally.
    pub fn human_counts(&self, tally: &AggregateTally) -> AuthorCounts {
        tally
            .author_totals
            .iter()
            .filter(|(identity, _)| !self.is_automated(identity))
            .map(|(identity, count)| (identity.clone(), *count))
            .collect()
    }

    /// Top human contributor, or `None` when every identity in the tally is
    /// automated. The percentage is reported against all commits, automated
    /// ones included.
    pub fn top_human(&self, tally: &AggregateTally) -> Option<LeaderboardEntry> {
        let humans = self.human_counts(tally);
        rank_against(&humans, Some(1), tally.total_commits()).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new().unwrap()
    }

    #[test]
    fn bracketed_and_numeric_identities_are_automated() {
        let c = classifier();
        assert_eq!(c.classify("dependabot[bot]"), Label::Automated);
        assert_eq!(c.classify("42"), Label::Automated);
        assert_eq!(c.classify("github-actions"), Label::Automated);
        assert_eq!(c.classify("Renovate Bot"), Label::Automated);
        assert_eq!(c.classify("ci-runner"), Label::Automated);
    }

    #[test]
    fn human_identities_pass_through() {
        let c = classifier();
        assert_eq!(c.classify("Jane Doe"), Label::Human);
        // digits present but not digits-only
        assert_eq!(c.classify("4Chan_user"), Label::Human);
    }

    #[test]
    fn rules_are_case_insensitive() {
        let c = classifier();
        assert_eq!(c.classify("DEPENDABOT"), Label::Automated);
        assert_eq!(c.classify("Automation Account"), Label::Automated);
    }

    #[test]
    fn matched_rule_reports_first_hit() {
        let c = classifier();
        let rule = c.matched_rule("dependabot[bot]").unwrap();
        assert_eq!(rule.name, "Bracketed bot marker");
    }

    #[test]
    fn extra_rules_extend_the_table() {
        let mut rules = default_rules();
        rules.push(BotRule::new("Vendor sync", r"vendor-sync"));
        let c = Classifier::with_rules(rules).unwrap();
        assert_eq!(c.classify("acme-vendor-sync"), Label::Automated);
    }

    #[test]
    fn top_human_skips_automated_identities() {
        let c = classifier();
        let tally = AggregateTally {
            author_totals: AuthorCounts::from([
                ("dependabot[bot]".to_string(), 90),
                ("Jane Doe".to_string(), 10),
            ]),
        };

        let top = c.top_human(&tally).unwrap();
        assert_eq!(top.identity, "Jane Doe");
        assert_eq!(top.commits, 10);
        // share of all 100 commits, not of the 10 human ones
        assert_eq!(top.percentage, 10.0);
    }

    #[test]
    fn top_human_none_when_all_automated() {
        let c = classifier();
        let tally = AggregateTally {
            author_totals: AuthorCounts::from([
                ("dependabot[bot]".to_string(), 5),
                ("github-actions".to_string(), 3),
            ]),
        };

        assert!(c.top_human(&tally).is_none());
    }
}
