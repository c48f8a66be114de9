//! Dotted version normalization and comparison.
//!
//! Two kinds of comparison are provided:
//!
//! - **Truncated** comparison ([`VersionComparator::compare`]) cuts both
//!   versions down to the component count of the shorter one before comparing,
//!   so a platform bound of `"9"` admits every `9.x.y` host.
//! - **Standard** comparison ([`VersionComparator::ordering`]) compares the full
//!   versions, including pre-release words such as `beta` or `RC`.
//!
//! # Examples
//!
//! ```
//! use market_core::version::{Operator, VersionComparator};
//!
//! assert!(VersionComparator::compare("5.1.2.3", "5.1", Operator::Eq));
//! assert!(VersionComparator::is_newer("2.2.0", "2.1.0"));
//! assert!(!VersionComparator::is_newer("1.0beta", "1.0"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Comparison operator applied to two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `>=`
    Ge,
    /// `>`
    Gt,
    /// `!=`
    Ne,
}

impl Operator {
    /// Checks whether an ordering of `left` relative to `right` satisfies the operator.
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Eq => ordering == Ordering::Equal,
            Self::Ge => ordering != Ordering::Less,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ne => ordering != Ordering::Equal,
        }
    }

    /// Returns the canonical symbol for the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::Ne => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operator string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown comparison operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "lt" => Ok(Self::Lt),
            "<=" | "le" => Ok(Self::Le),
            "=" | "==" | "eq" => Ok(Self::Eq),
            ">=" | "ge" => Ok(Self::Ge),
            ">" | "gt" => Ok(Self::Gt),
            "!=" | "<>" | "ne" => Ok(Self::Ne),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

/// Rank of a version component. Numbers sit between pre-release and patch-level words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Unknown,
    Dev,
    Alpha,
    Beta,
    Rc,
    Number,
    Patch,
}

impl Rank {
    /// Known words, matched by prefix in this order.
    const WORDS: [(&'static str, Rank); 9] = [
        ("dev", Rank::Dev),
        ("alpha", Rank::Alpha),
        ("a", Rank::Alpha),
        ("beta", Rank::Beta),
        ("b", Rank::Beta),
        ("RC", Rank::Rc),
        ("rc", Rank::Rc),
        ("pl", Rank::Patch),
        ("p", Rank::Patch),
    ];

    fn of_word(word: &str) -> Self {
        Self::WORDS
            .iter()
            .find(|(prefix, _)| word.starts_with(prefix))
            .map_or(Self::Unknown, |(_, rank)| *rank)
    }
}

/// One canonical component of a version.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    /// Decimal digits without leading zeros.
    Number(String),
    Word(Rank),
}

impl Part {
    fn parse(token: &str) -> Self {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            let trimmed = token.trim_start_matches('0');
            Self::Number(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
        } else {
            Self::Word(Rank::of_word(token))
        }
    }

    fn rank(&self) -> Rank {
        match self {
            Self::Number(_) => Rank::Number,
            Self::Word(rank) => *rank,
        }
    }

    /// Ordering contributed by a trailing part the other version does not have.
    fn trailing_ordering(&self) -> Ordering {
        match self {
            Self::Number(_) => Ordering::Greater,
            Self::Word(rank) => rank.cmp(&Rank::Number),
        }
    }
}

impl PartialOrd for Part {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Part {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // No leading zeros, so longer means larger.
            (Self::Number(a), Self::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A version string split into canonical components.
///
/// Digit runs and letter runs form separate components; every other character
/// (`.`, `-`, `_`, `+`, ...) separates components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedVersion {
    parts: Vec<Part>,
}

impl DottedVersion {
    /// Parses a version string. Never fails: unrecognized words rank lowest.
    pub fn parse(version: &str) -> Self {
        let mut parts = Vec::new();
        let mut token = String::new();
        let mut token_is_digit = false;

        for c in version.chars() {
            if !c.is_ascii_alphanumeric() {
                if !token.is_empty() {
                    parts.push(Part::parse(&token));
                    token.clear();
                }
                continue;
            }

            let is_digit = c.is_ascii_digit();
            if !token.is_empty() && is_digit != token_is_digit {
                parts.push(Part::parse(&token));
                token.clear();
            }
            token_is_digit = is_digit;
            token.push(c);
        }
        if !token.is_empty() {
            parts.push(Part::parse(&token));
        }

        Self { parts }
    }
}

impl PartialOrd for DottedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DottedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        for (left, right) in self.parts.iter().zip(&other.parts) {
            let ordering = left.cmp(right);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        let (left_len, right_len) = (self.parts.len(), other.parts.len());
        match left_len.cmp(&right_len) {
            Ordering::Equal => Ordering::Equal,
            Ordering::Greater => self.parts[right_len].trailing_ordering(),
            Ordering::Less => other.parts[left_len].trailing_ordering().reverse(),
        }
    }
}

/// Version comparator for catalog and platform versions.
pub struct VersionComparator;

impl VersionComparator {
    /// Truncates both versions to the component count of the shorter one.
    ///
    /// `("5.1.2.3", "5.1")` becomes `("5.1", "5.1")` and
    /// `("5.2.6.5", "5.1")` becomes `("5.2", "5.1")`.
    pub fn normalize(first: &str, second: &str) -> (String, String) {
        let first: Vec<&str> = first.split('.').collect();
        let second: Vec<&str> = second.split('.').collect();

        let length = first.len().min(second.len());
        (first[..length].join("."), second[..length].join("."))
    }

    /// Normalizes both versions, then checks `first <operator> second`.
    pub fn compare(first: &str, second: &str, operator: Operator) -> bool {
        let (first, second) = Self::normalize(first, second);
        operator.matches(Self::ordering(&first, &second))
    }

    /// Standard comparison of two full versions, without truncation.
    pub fn ordering(first: &str, second: &str) -> Ordering {
        DottedVersion::parse(first).cmp(&DottedVersion::parse(second))
    }

    /// Checks if `candidate` is strictly newer than `current`.
    pub fn is_newer(candidate: &str, current: &str) -> bool {
        Self::ordering(candidate, current) == Ordering::Greater
    }
}
