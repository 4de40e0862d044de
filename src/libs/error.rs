use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchainError {
    /// A line that does not have the expected fields
    Malformed {
        /// Which kind of record was being read, e.g. "hit" or "AGP"
        kind: &'static str,
        /// A human-readable message explaining the error
        message: String,
        /// The offending line
        line: String,
    },
    /// The same anchor of a genome pair is declared in two candidate pairs
    DuplicatePair {
        genome: String,
        anchor: String,
    },
    /// A placement table that does not partition its chromosome
    InvalidPlacement {
        message: String,
        record: String,
    },
}

impl AnchainError {
    pub fn malformed(kind: &'static str, message: impl Into<String>, line: &str) -> Self {
        AnchainError::Malformed {
            kind,
            message: message.into(),
            line: line.to_string(),
        }
    }
}

impl fmt::Display for AnchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchainError::Malformed {
                kind,
                message,
                line,
            } => write!(f, "Malformed {} record: {}\nLine: \"{}\"", kind, message, line),
            AnchainError::DuplicatePair { genome, anchor } => write!(
                f,
                "Duplicate candidate pair for anchor {} of genome {}",
                anchor, genome
            ),
            AnchainError::InvalidPlacement { message, record } => {
                write!(f, "{} in record:\n{}", message, record)
            }
        }
    }
}

impl std::error::Error for AnchainError {}

/// Parses one field, naming it in the error.
pub(crate) fn parse_field<T: std::str::FromStr>(
    kind: &'static str,
    name: &str,
    value: &str,
    line: &str,
) -> Result<T, AnchainError> {
    value
        .parse::<T>()
        .map_err(|_| AnchainError::malformed(kind, format!("invalid {}: {}", name, value), line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_malformed() {
        let err = AnchainError::malformed("hit", "expected 12 fields, found 2", "a\tb");
        assert_eq!(
            err.to_string(),
            "Malformed hit record: expected 12 fields, found 2\nLine: \"a\tb\""
        );
    }

    #[test]
    fn test_parse_field() {
        let v: i64 = parse_field("anchor", "start", "42", "").unwrap();
        assert_eq!(v, 42);

        let err = parse_field::<i64>("anchor", "start", "4x2", "line").unwrap_err();
        assert!(err.to_string().contains("invalid start: 4x2"));
    }
}
