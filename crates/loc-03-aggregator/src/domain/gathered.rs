//! # Gathered Results
//!
//! Settled outcome of a scatter: one entry per queried source, either a value
//! or a failure.

use std::fmt;

/// A source that failed during a scatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure<E> {
    /// Identity of the failed source.
    pub source_id: String,
    /// Its error.
    pub error: E,
}

impl<E: fmt::Display> fmt::Display for SourceFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_id, self.error)
    }
}

/// Per-source values and failures of one scatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gathered<T, E> {
    /// Successful sources and their values, in source order.
    pub values: Vec<(String, T)>,
    /// Failed sources, in source order.
    pub failures: Vec<SourceFailure<E>>,
}

impl<T, E> Default for Gathered<T, E> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T, E> Gathered<T, E> {
    /// Number of sources queried.
    pub fn queried(&self) -> usize {
        self.values.len() + self.failures.len()
    }

    /// Number of sources that answered.
    pub fn succeeded(&self) -> usize {
        self.values.len()
    }

    /// Number of sources that failed.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when sources were queried and none answered.
    pub fn all_failed(&self) -> bool {
        self.queried() > 0 && self.values.is_empty()
    }

    /// Identities of the failed sources.
    pub fn failed_sources(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.source_id.as_str()).collect()
    }

    /// Values without their source identity.
    pub fn into_values(self) -> Vec<T> {
        self.values.into_iter().map(|(_, value)| value).collect()
    }
}

impl<T, E: fmt::Display> Gathered<T, E> {
    /// `source: message` for every failure.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let gathered: Gathered<u32, String> = Gathered {
            values: vec![("a".into(), 1)],
            failures: vec![SourceFailure {
                source_id: "b".into(),
                error: "down".into(),
            }],
        };
        assert_eq!(gathered.queried(), 2);
        assert_eq!(gathered.succeeded(), 1);
        assert!(!gathered.all_failed());
        assert_eq!(gathered.failed_sources(), vec!["b"]);
        assert_eq!(gathered.failure_messages(), vec!["b: down"]);
        assert_eq!(gathered.into_values(), vec![1]);
    }

    #[test]
    fn test_empty_is_not_all_failed() {
        let gathered: Gathered<u32, String> = Gathered::default();
        assert!(!gathered.all_failed());
    }
}
