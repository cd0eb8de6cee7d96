//! Optional rule configuration.
//!
//! A session enables rules from a fixed, closed vocabulary:
//! - `Rule::Inspection`: the inspection token (needs 7+ players)
//! - `Rule::Shadow`: an evil special hidden from the seer
//! - `Rule::Mimic`: an evil seer-impersonator plus its good counterpart
//! - `Rule::Loner`: an evil special cut off from the other evils (needs 10 players)
//!
//! Two API shapes exist. The strict single-rule calls (`enable`,
//! `enable_named`, `disable_named`) report every problem as a `GameError`.
//! The bulk calls (`enable_many`, `disable_many`) are best-effort and silently
//! skip unknown names, already-set rules and rules that would not validate.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{GameError, Violations};
use crate::rules::quest::evil_count;

/// A named optional rule.
///
/// Declaration order is the display order and the assigner's priority order
/// for evil specials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rule {
    Inspection,
    Shadow,
    Mimic,
    Loner,
}

impl Rule {
    /// Every rule in the vocabulary.
    pub const ALL: [Rule; 4] = [Rule::Inspection, Rule::Shadow, Rule::Mimic, Rule::Loner];

    /// Evil-special rules, in assignment priority order.
    pub const EVIL_SPECIALS: [Rule; 3] = [Rule::Shadow, Rule::Mimic, Rule::Loner];

    /// The rule's canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Rule::Inspection => "inspection",
            Rule::Shadow => "shadow",
            Rule::Mimic => "mimic",
            Rule::Loner => "loner",
        }
    }

    /// Whether the rule adds an evil special role.
    #[must_use]
    pub const fn is_evil_special(self) -> bool {
        !matches!(self, Rule::Inspection)
    }

    /// Minimum roster size the rule needs, if any.
    #[must_use]
    pub const fn min_players(self) -> Option<usize> {
        match self {
            Rule::Inspection => Some(7),
            Rule::Loner => Some(10),
            Rule::Shadow | Rule::Mimic => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Rule::ALL
            .into_iter()
            .find(|r| r.name() == lower)
            .ok_or_else(|| GameError::UnknownRule(s.to_string()))
    }
}

/// Membership test against the rule vocabulary (case-insensitive).
#[must_use]
pub fn is_rule_name(name: &str) -> bool {
    name.parse::<Rule>().is_ok()
}

/// The set of enabled optional rules.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    enabled: BTreeSet<Rule>,
}

impl Configuration {
    /// Create a configuration with no rules enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a rule is enabled.
    #[must_use]
    pub fn is_enabled(&self, rule: Rule) -> bool {
        self.enabled.contains(&rule)
    }

    /// Enabled rules in display order.
    pub fn enabled(&self) -> impl Iterator<Item = Rule> + '_ {
        self.enabled.iter().copied()
    }

    /// Number of enabled evil-special rules.
    #[must_use]
    pub fn evil_special_count(&self) -> usize {
        self.enabled.iter().filter(|r| r.is_evil_special()).count()
    }

    /// Strictly enable a rule for a roster of `roster_size` players.
    pub fn enable(&mut self, rule: Rule, roster_size: usize) -> Result<(), GameError> {
        if self.is_enabled(rule) {
            return Err(GameError::AlreadyEnabled(rule));
        }
        Self::check_min_players(rule, roster_size)?;
        if rule.is_evil_special() {
            Self::check_evil_room(self.evil_special_count() + 1, roster_size)?;
        }

        self.enabled.insert(rule);
        debug!(rule = rule.name(), roster_size, "rule enabled");
        Ok(())
    }

    /// Strictly enable a rule by name.
    pub fn enable_named(&mut self, name: &str, roster_size: usize) -> Result<Rule, GameError> {
        let rule = name.parse()?;
        self.enable(rule, roster_size)?;
        Ok(rule)
    }

    /// Best-effort enable of several rules by name.
    ///
    /// Returns the rules that were newly enabled.
    pub fn enable_many<S: AsRef<str>>(&mut self, names: &[S], roster_size: usize) -> Vec<Rule> {
        names
            .iter()
            .filter_map(|name| name.as_ref().parse::<Rule>().ok())
            .filter(|&rule| self.enable(rule, roster_size).is_ok())
            .collect()
    }

    /// Disable a rule. Always succeeds; a no-op when already disabled.
    pub fn disable(&mut self, rule: Rule) {
        if self.enabled.remove(&rule) {
            debug!(rule = rule.name(), "rule disabled");
        }
    }

    /// Disable a rule by name, reporting unknown names.
    pub fn disable_named(&mut self, name: &str) -> Result<Rule, GameError> {
        let rule = name.parse()?;
        self.disable(rule);
        Ok(rule)
    }

    /// Best-effort disable of several rules by name; unknown names are skipped.
    pub fn disable_many<S: AsRef<str>>(&mut self, names: &[S]) {
        for rule in names.iter().filter_map(|n| n.as_ref().parse::<Rule>().ok()) {
            self.disable(rule);
        }
    }

    /// Enabled rule names in order, or `"none"` when nothing is enabled.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Re-check every enabled rule against the current roster size.
    ///
    /// A single violation is returned as-is; several are aggregated into
    /// `GameError::InvalidConfiguration`.
    pub fn validate(&self, roster_size: usize) -> Result<(), GameError> {
        let mut violations = Violations::default();

        for rule in self.enabled() {
            if let Err(err) = Self::check_min_players(rule, roster_size) {
                violations.0.push(err);
            }
        }
        if let Err(err) = Self::check_evil_room(self.evil_special_count(), roster_size) {
            violations.0.push(err);
        }

        violations.into_result()
    }

    fn check_min_players(rule: Rule, roster_size: usize) -> Result<(), GameError> {
        match rule.min_players() {
            Some(required) if roster_size < required => Err(GameError::InsufficientPlayers {
                what: rule.name(),
                required,
                actual: roster_size,
            }),
            _ => Ok(()),
        }
    }

    // At least one evil must stay free for the hunter.
    fn check_evil_room(specials: usize, roster_size: usize) -> Result<(), GameError> {
        let evils = evil_count(roster_size);
        if specials > 0 && specials >= evils {
            return Err(GameError::TooManyEvilSpecials {
                enabled: specials,
                evil_count: evils,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<_> = self.enabled().map(Rule::name).collect();
        f.write_str(&names.join(", "))
    }
}
