use std::fmt;

#[derive(Debug)]
pub enum MergeError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad join key, bad combine clause, etc.).
    ConfigValidation(String),
    /// Source text decodes to zero non-blank rows. Callers treat this as
    /// "no data", not as a fatal condition.
    EmptySource { name: String },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::EmptySource { name } => write!(f, "source '{name}' contains no rows"),
        }
    }
}

impl std::error::Error for MergeError {}
