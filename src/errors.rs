use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AssemblyError {
    #[error("Syntax error on line {line}: {reason}")]
    SyntaxError { line: usize, reason: String },

    #[error("Invalid instruction on line {line}: {reason}")]
    InvalidInstruction { line: usize, reason: String },

    #[error("Invalid operand on line {line}: {reason}")]
    InvalidOperand { line: usize, reason: String },

    #[error("Label error on line {line}: {reason}")]
    LabelError { line: usize, reason: String },

    #[error("Memory error on line {line}: {reason}")]
    MemoryError { line: usize, reason: String },

    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

impl AssemblyError {
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblyError::SyntaxError { line, .. }
            | AssemblyError::InvalidInstruction { line, .. }
            | AssemblyError::InvalidOperand { line, .. }
            | AssemblyError::LabelError { line, .. }
            | AssemblyError::MemoryError { line, .. } => Some(*line),
            AssemblyError::ConfigError { .. } => None,
        }
    }
}
