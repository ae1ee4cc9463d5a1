/// Configuration options for the tokenizer.
///
/// # Default
///
/// All options default to `false`, which gives strict JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerOptions {
    /// Whether to accept unquoted ASCII words outside the recognized
    /// literals.
    ///
    /// When enabled, an unquoted object member key is accepted (its name text
    /// reports `is_quoted() == false`) and an unquoted word in value position
    /// produces a [`TokenKind::Ascii`] token instead of an error.
    ///
    /// When disabled, an unquoted key raises
    /// [`Error::IllegalPropertyName`] and an unquoted non-literal value
    /// raises [`Error::IllegalDataValue`].
    ///
    /// [`TokenKind::Ascii`]: crate::TokenKind::Ascii
    /// [`Error::IllegalPropertyName`]: crate::Error::IllegalPropertyName
    /// [`Error::IllegalDataValue`]: crate::Error::IllegalDataValue
    pub allow_ascii_literals: bool,
}
