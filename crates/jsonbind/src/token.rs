//! Token model: a classified lexical unit plus borrowed-or-owned views of the
//! bytes it covers.

use alloc::{borrow::Cow, string::String};

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{` — opens an object scope.
    ObjectStart,
    /// `}` — closes an object scope.
    ObjectEnd,
    /// `[` — opens an array scope.
    ArrayStart,
    /// `]` — closes an array scope.
    ArrayEnd,
    /// A quoted string value.
    String,
    /// An unquoted word that is not a literal. Only produced when
    /// [`TokenizerOptions::allow_ascii_literals`] is enabled; otherwise this
    /// classification surfaces as an error instead of a token.
    ///
    /// [`TokenizerOptions::allow_ascii_literals`]: crate::TokenizerOptions::allow_ascii_literals
    Ascii,
    /// A number value. The text is validated against the JSON number grammar;
    /// numeric conversion happens at binding time.
    Number,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
}

impl TokenKind {
    /// Returns `true` for `ObjectStart` and `ArrayStart`.
    #[must_use]
    pub fn is_scope_start(self) -> bool {
        matches!(self, Self::ObjectStart | Self::ArrayStart)
    }

    /// Returns `true` for `ObjectEnd` and `ArrayEnd`.
    #[must_use]
    pub fn is_scope_end(self) -> bool {
        matches!(self, Self::ObjectEnd | Self::ArrayEnd)
    }
}

/// Text covered by a token: either a borrowed slice of a caller-provided
/// input segment, or bytes copied out when the token crossed a segment
/// boundary or came from a copied segment.
///
/// Borrowed text stays valid for the `'buf` lifetime the caller guaranteed to
/// [`Tokenizer::add_data`]; owned text is self-contained.
///
/// [`Tokenizer::add_data`]: crate::Tokenizer::add_data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenText<'buf> {
    text: Cow<'buf, str>,
    quoted: bool,
    has_escapes: bool,
}

impl<'buf> TokenText<'buf> {
    pub(crate) fn new(text: Cow<'buf, str>, quoted: bool, has_escapes: bool) -> Self {
        Self {
            text,
            quoted,
            has_escapes,
        }
    }

    /// Fixed punctuation text, e.g. the `{` covered by an `ObjectStart`.
    pub(crate) fn punctuation(text: &'static str) -> Self {
        Self {
            text: Cow::Borrowed(text),
            quoted: false,
            has_escapes: false,
        }
    }

    /// The raw text, exactly as it appeared between the quotes (escape
    /// sequences are not decoded here).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the source text was surrounded by quotes.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Whether the raw text contains escape sequences that require decoding.
    #[must_use]
    pub fn has_escapes(&self) -> bool {
        self.has_escapes
    }
}

/// One classified lexical unit.
///
/// An object member is a single token: `name` holds the member key and
/// `value` the member value. `name` is `None` for array elements and
/// top-level values. For `ObjectStart`/`ArrayStart` the value text covers
/// exactly the opening delimiter; the subtree follows as further tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'buf> {
    /// Classification of the value.
    pub kind: TokenKind,
    /// Member key, when this token is an object member.
    pub name: Option<TokenText<'buf>>,
    /// Value text.
    pub value: TokenText<'buf>,
}

impl Token<'_> {
    /// Member key as a `&str`, if present.
    #[must_use]
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().map(TokenText::as_str)
    }

    /// Value text as a `&str`.
    #[must_use]
    pub fn value_str(&self) -> &str {
        self.value.as_str()
    }

    /// Appends the minimal textual form of this token's value to `out`:
    /// quoted raw text for strings, raw text otherwise. For scope tokens this
    /// is the single delimiter character.
    pub fn value_text_into(&self, out: &mut String) {
        if self.value.is_quoted() {
            out.push('"');
            out.push_str(self.value.as_str());
            out.push('"');
        } else {
            out.push_str(self.value.as_str());
        }
    }
}
