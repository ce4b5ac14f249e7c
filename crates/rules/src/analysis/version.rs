//! Solidity version constraints: parsing, floating-range detection, and
//! deployment recommendations.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolcVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SolcVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn is_at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        match self.major.cmp(&major) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.minor.cmp(&minor) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => self.patch >= patch,
            },
        }
    }
}

impl PartialOrd for SolcVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SolcVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => match self.minor.cmp(&other.minor) {
                Ordering::Equal => self.patch.cmp(&other.patch),
                other => other,
            },
            other => other,
        }
    }
}

/// Range markers that make a pragma float instead of pinning one compiler.
pub const FLOATING_MARKERS: [char; 6] = ['>', '<', '*', '^', '~', '-'];

/// First floating marker present in a constraint, if any.
pub fn floating_marker(constraint: &str) -> Option<char> {
    constraint.chars().find(|c| FLOATING_MARKERS.contains(c))
}

/// Lower bound of a constraint like `^0.8.0` or `>=0.7.0 <0.9.0`.
pub fn parse_constraint(constraint: &str) -> Option<SolcVersion> {
    let cleaned = constraint
        .trim()
        .trim_start_matches('^')
        .trim_start_matches('~')
        .trim_start_matches(">=")
        .trim_start_matches("<=")
        .trim_start_matches('>')
        .trim_start_matches('<')
        .trim();

    let version_part = cleaned.split_whitespace().next()?;
    let parts: Vec<&str> = version_part.split('.').collect();

    let major = parts.first()?.parse::<u32>().ok()?;
    let minor = parts.get(1).and_then(|s| s.parse::<u32>().ok()).unwrap_or(0);
    let patch = parts.get(2).and_then(|s| s.parse::<u32>().ok()).unwrap_or(0);

    Some(SolcVersion::new(major, minor, patch))
}

/// Compiler releases considered fine to deploy with.
pub const ALLOWED_VERSIONS: [&str; 7] = [
    "0.5.16", "0.5.17", "0.6.11", "0.6.12", "0.7.5", "0.7.6", "0.8.16",
];

/// Releases with known codegen bugs; never deploy with these.
pub const BUGGY_VERSIONS: [&str; 6] = ["0.4.22", "0.5.5", "0.5.6", "0.5.14", "0.6.9", "0.8.8"];

pub const OLD_VERSION_TXT: &str = "allows old versions";
pub const COMPLEX_PRAGMA_TXT: &str = "is too complex";
pub const BUGGY_VERSION_TXT: &str =
    "is known to contain severe issues (https://solidity.readthedocs.io/en/latest/bugs.html)";
pub const NOT_RECOMMENDED_TXT: &str = "is not recommended for deployment";

/// Why a version constraint is disallowed, or `None` when it is acceptable.
pub fn check_constraint(constraint: &str) -> Option<&'static str> {
    let comparators = constraint
        .split_whitespace()
        .filter(|part| part.starts_with(['>', '<', '^', '~']))
        .count();
    if comparators > 1 {
        return Some(COMPLEX_PRAGMA_TXT);
    }

    let lower = parse_constraint(constraint)?;
    if !lower.is_at_least(0, 6, 11) {
        return Some(OLD_VERSION_TXT);
    }
    None
}

/// Verdict on the concrete compiler version the unit was built with.
pub fn check_compiler_version(version: &str) -> Option<&'static str> {
    if BUGGY_VERSIONS.contains(&version) {
        return Some(BUGGY_VERSION_TXT);
    }
    if !ALLOWED_VERSIONS.contains(&version) {
        return Some(NOT_RECOMMENDED_TXT);
    }
    None
}
