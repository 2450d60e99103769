use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, penalty out of range, etc.).
    ConfigValidation(String),
    /// Missing required column in input data.
    MissingColumn { source: String, column: String },
    /// Date parse error.
    DateParse { source: String, record_id: String, value: String },
    /// Numeric field parse error (billed volume, amount, fine).
    NumberParse { source: String, record_id: String, value: String },
    /// Enumerated field parse error (insurance, road tax).
    EnumParse { source: String, record_id: String, value: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::DateParse { source, record_id, value } => {
                write!(f, "{source}, record '{record_id}': cannot parse date '{value}'")
            }
            Self::NumberParse { source, record_id, value } => {
                write!(f, "{source}, record '{record_id}': cannot parse number '{value}'")
            }
            Self::EnumParse { source, record_id, value } => {
                write!(f, "{source}, record '{record_id}': unrecognized value '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
