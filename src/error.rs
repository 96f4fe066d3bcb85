use thiserror::Error;

/// Top-level error type for the inkgeo geometry kernel.
///
/// Only parsing can fail. Geometric queries on valid values are total and
/// report degenerate configurations through sentinel results instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InkgeoError {
    #[error(transparent)]
    PathParse(#[from] PathParseError),

    #[error(transparent)]
    TransformParse(#[from] TransformParseError),

    #[error(transparent)]
    ColorParse(#[from] ColorParseError),
}

/// Errors raised while reading SVG path data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathParseError {
    #[error("unknown path command {command:?}")]
    UnknownCommand { command: char },

    #[error(
        "command {command:?} got {count} number(s), expected a multiple of {expected_multiple}"
    )]
    ArgumentCount {
        command: char,
        count: usize,
        expected_multiple: usize,
    },

    #[error("expected a number, got {token:?}")]
    InvalidNumber { token: String },

    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedCharacter { found: char, offset: usize },
}

/// Errors raised while reading a CSS `transform` value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformParseError {
    #[error("unsupported transform action: {0}")]
    UnsupportedAction(String),

    #[error("transform action {action} does not accept {count} argument(s)")]
    ArgumentCount { action: String, count: usize },

    #[error("invalid transform argument: {0}")]
    InvalidNumber(String),

    #[error("unexpected input in transform: {0:?}")]
    UnexpectedInput(String),
}

/// Errors raised while reading a color.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorParseError {
    #[error("invalid hex color: {0}")]
    InvalidHex(String),

    #[error("invalid color component: {0}")]
    InvalidComponent(String),

    #[error("unrecognized color: {0}")]
    Unrecognized(String),
}

/// Convenience type alias for results using [`InkgeoError`].
pub type Result<T> = std::result::Result<T, InkgeoError>;
