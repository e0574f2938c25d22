//! Colorizer: ordered pattern rules applied to a line.
//!
//! Each rule is a regex with exactly one capture group plus the tag that
//! group's characters receive. Rules run in order against the first match
//! only, and a later rule overwrites an earlier one wherever they overlap.

use super::tag::{ColorCell, ColorTag};
use crate::error::ConfigError;
use regex::Regex;

/// Rules shipped with the binary, aimed at strace, HTTP and SQL traffic.
pub const DEFAULT_RULES: &[&str] = &[
    r"(?P<GREEN>SELECT)",
    r"(?P<BLUE>(?:lstat|stat))",
    r"^(?P<RED>writev)",
    r#""(?P<RED>HTTP/[^"]+)"#,
    r"(?P<CYAN>/data/code/[^.]+\.\w*)",
    r#"(?P<WHITEB>GET[^"]+)""#,
    r"(?P<YELLOWB>portal_\w+_\w+_\w+)",
    r"(?P<YELLOWB>(?:masterapp|activitystream|analytics|api|comments|dashbaord|front_end|limit|socialmedia|tagging|userauth|entity)_\w+)",
];

/// One coloring rule.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    tag: ColorTag,
}

impl Rule {
    /// Build a rule from a pattern with exactly one capture group.
    pub fn new(tag: ColorTag, pattern: &str) -> Result<Self, ConfigError> {
        let regex = compile(pattern)?;
        Ok(Self { regex, tag })
    }

    /// Build a rule whose color is the name of its single group,
    /// e.g. `(?P<GREEN>SELECT)` or `(?P<WHITEB>GET[^"]+)"`.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let regex = compile(pattern)?;
        let name = regex
            .capture_names()
            .flatten()
            .next()
            .ok_or_else(|| ConfigError::UnnamedGroup {
                pattern: pattern.to_string(),
            })?;
        let tag = name.parse().map_err(|_| ConfigError::UnknownColor {
            pattern: pattern.to_string(),
            name: name.to_string(),
        })?;
        Ok(Self { regex, tag })
    }

    /// Parse a command-line `COLOR=PATTERN` spec.
    pub fn from_spec(spec: &str) -> Result<Self, ConfigError> {
        let (color, pattern) = spec
            .split_once('=')
            .filter(|(color, pattern)| !color.is_empty() && !pattern.is_empty())
            .ok_or_else(|| ConfigError::InvalidRuleSpec {
                spec: spec.to_string(),
            })?;
        let tag = color.parse().map_err(|_| ConfigError::UnknownColor {
            pattern: pattern.to_string(),
            name: color.to_string(),
        })?;
        Self::new(tag, pattern)
    }

    /// The tag this rule assigns.
    pub const fn tag(&self) -> ColorTag {
        self.tag
    }

    /// Byte range of the captured group in the first match, if any.
    fn span(&self, line: &str) -> Option<std::ops::Range<usize>> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.range())
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    // captures_len counts the implicit whole-match group.
    let found = regex.captures_len() - 1;
    if found != 1 {
        return Err(ConfigError::GroupCount {
            pattern: pattern.to_string(),
            found,
        });
    }
    Ok(regex)
}

/// The ordered rule set, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct Colorizer {
    rules: Vec<Rule>,
}

impl Colorizer {
    /// Create a colorizer from already-built rules.
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Create a colorizer from `(?P<COLOR>...)` patterns.
    pub fn from_patterns<'a>(
        patterns: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConfigError> {
        patterns
            .into_iter()
            .map(Rule::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// The built-in rule set.
    pub fn with_default_rules() -> Result<Self, ConfigError> {
        Self::from_patterns(DEFAULT_RULES.iter().copied())
    }

    /// Append a rule; it takes precedence over every earlier rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Tag every character of `line`.
    ///
    /// The result has exactly one cell per `char` of the input.
    pub fn colorize(&self, line: &str) -> Vec<ColorCell> {
        let spans: Vec<_> = self
            .rules
            .iter()
            .filter_map(|rule| rule.span(line).map(|span| (span, rule.tag)))
            .collect();

        line.char_indices()
            .map(|(offset, ch)| {
                let tag = spans
                    .iter()
                    .rev()
                    .find(|(span, _)| span.contains(&offset))
                    .map_or(ColorTag::PLAIN, |(_, tag)| *tag);
                ColorCell::new(ch, tag)
            })
            .collect()
    }
}
