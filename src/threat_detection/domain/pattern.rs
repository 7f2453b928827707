use super::PackageName;
use thiserror::Error;

/// Maximum length of a single pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// Rejected trust/ignore pattern. The pattern is skipped; the rest stay active.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Pattern cannot be empty")]
    Empty,

    #[error("Pattern is too long: '{pattern}' ({length} chars). Maximum: {max} chars")]
    TooLong {
        pattern: String,
        length: usize,
        max: usize,
    },

    #[error("Unsupported wildcard in pattern '{pattern}'\n\n💡 Hint: Only exact names and namespace wildcards such as \"@scope/*\" are supported")]
    UnsupportedWildcard { pattern: String },
}

/// A compiled trust or ignore pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Exact match: "package-name"
    Exact(String),
    /// Namespace wildcard: "@scope/*", stored as the "@scope/" prefix
    Namespace(String),
}

impl Pattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let pattern = raw.trim();

        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }

        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(PatternError::TooLong {
                pattern: pattern.to_string(),
                length: pattern.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }

        if let Some(namespace) = pattern.strip_suffix("/*") {
            if namespace.is_empty() || namespace.contains('*') {
                return Err(PatternError::UnsupportedWildcard {
                    pattern: pattern.to_string(),
                });
            }
            return Ok(Pattern::Namespace(format!("{}/", namespace)));
        }

        if pattern.contains('*') {
            return Err(PatternError::UnsupportedWildcard {
                pattern: pattern.to_string(),
            });
        }

        Ok(Pattern::Exact(pattern.to_string()))
    }

    pub fn matches(&self, name: &PackageName) -> bool {
        let name = name.as_str();
        match self {
            Pattern::Exact(exact) => name == exact,
            Pattern::Namespace(prefix) => name.len() > prefix.len() && name.starts_with(prefix),
        }
    }
}

/// Set of trust or ignore patterns sharing one matching function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compiles every pattern, returning the valid set plus the rejections
    pub fn parse<I, S>(raw_patterns: I) -> (Self, Vec<PatternError>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        let mut errors = Vec::new();

        for raw in raw_patterns {
            match Pattern::parse(raw.as_ref()) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => errors.push(e),
            }
        }

        (Self { patterns }, errors)
    }

    pub fn matches(&self, name: &PackageName) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
