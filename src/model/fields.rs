//! Header patterns selecting the columns each rule applies to

use std::sync::LazyLock;

use regex::Regex;

/// A header-name pattern
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
}

impl FieldPattern {
    fn builtin(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).expect("built-in field pattern must compile"),
        }
    }

    /// Check a header name against the pattern
    pub fn matches(&self, header: &str) -> bool {
        self.regex.is_match(header)
    }
}

static NAME: LazyLock<FieldPattern> = LazyLock::new(|| FieldPattern::builtin("Name"));
static PHONE: LazyLock<FieldPattern> =
    LazyLock::new(|| FieldPattern::builtin(r"^Phone \d+ - Value$"));
static EMAIL: LazyLock<FieldPattern> =
    LazyLock::new(|| FieldPattern::builtin(r"^E-mail \d+ - Value$"));

static NOISE: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    [
        r"^Address \d+ - ",
        r"^Group Membership$",
        r"^Website \d+ - ",
        r"^Relation \d+ - ",
        r"^Birthday$",
        r"^Nickname$",
        r"^Notes$",
    ]
    .into_iter()
    .map(FieldPattern::builtin)
    .collect()
});

/// Column families of the Google contacts export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any header containing `Name`
    Name,
    /// `Phone <n> - Value`
    Phone,
    /// `E-mail <n> - Value`
    Email,
}

impl FieldKind {
    pub fn pattern(&self) -> &'static FieldPattern {
        match self {
            FieldKind::Name => &*NAME,
            FieldKind::Phone => &*PHONE,
            FieldKind::Email => &*EMAIL,
        }
    }
}

/// Columns blanked unconditionally: addresses, groups, websites,
/// relations, birthday, nickname, notes.
pub fn noise_patterns() -> &'static [FieldPattern] {
    NOISE.as_slice()
}
