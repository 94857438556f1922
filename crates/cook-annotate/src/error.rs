use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    InvalidArguments = 1,
    InvalidTable = 2,
    Validation = 3,
    Io = 4,
}

impl ExitCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Success),
            1 => Some(Self::InvalidArguments),
            2 => Some(Self::InvalidTable),
            3 => Some(Self::Validation),
            4 => Some(Self::Io),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("classification table entry {position} has a blank term")]
    BlankTerm { position: usize },

    #[error("invalid classification table: {0}")]
    InvalidTable(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl AnnotateError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::BlankTerm { .. } => ExitCode::InvalidTable,
            Self::InvalidTable(_) => ExitCode::InvalidTable,
            Self::Validation(_) => ExitCode::Validation,
            Self::Io { .. } => ExitCode::Io,
        }
    }
}

pub type AnnotateResult<T> = Result<T, AnnotateError>;
