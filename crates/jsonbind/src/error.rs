//! Error taxonomy shared by the tokenizer, the binding engine, and function
//! dispatch.
//!
//! Every failure in this crate is a value of [`Error`]. Syntactic errors are
//! terminal for the tokenizer that raised them; [`Error::NeedMoreData`] is the
//! one refillable condition, repeated verbatim until the caller supplies more
//! input.

use alloc::string::String;

use thiserror::Error;

use crate::token::TokenKind;

/// Closed set of diagnostic kinds surfaced by tokenizing, binding, and
/// serialization.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input ran out mid-document and the refill callback (if any) supplied
    /// nothing.
    #[error("need more data")]
    NeedMoreData,
    /// Two productions are adjacent without the required separator.
    #[error("invalid token, expected a separator")]
    InvalidToken,
    /// A separator was consumed but no value or member followed before a
    /// container terminator.
    #[error("expected a data token")]
    ExpectedDataToken,
    /// An object member key is not a quoted string.
    #[error("illegal property name")]
    IllegalPropertyName,
    /// A value position holds an unquoted token that is neither a recognized
    /// literal nor a valid number.
    #[error("illegal data value")]
    IllegalDataValue,
    /// A character that is illegal in the current lexical state.
    #[error("encountered illegal character")]
    EncounteredIllegalChar,
    /// The binding engine expected a different token classification.
    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Classification the target field required.
        expected: TokenKind,
        /// Classification actually present in the stream.
        found: TokenKind,
    },
    /// A `Number` token did not parse into the target numeric type.
    #[error("failed to parse number")]
    FailedToParseNumber,
    /// A fixed-capacity array target received more elements than it can hold.
    #[error("array capacity of {capacity} exceeded")]
    ArrayCapacityExceeded {
        /// Capacity of the target array.
        capacity: usize,
    },
    /// The caller-supplied serialization sink reported a write failure.
    #[error("failed to write serialized output")]
    OutputFailed(#[from] core::fmt::Error),
}

/// An [`Error`] positioned in the input, with the text leading up to the
/// failure point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error} at {line}:{column} near '{context}'")]
pub struct ErrorReport {
    /// What went wrong.
    pub error: Error,
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
    /// A short window of input ending at the failure point, rendered
    /// lossily when the input is not valid UTF-8.
    pub context: String,
}
