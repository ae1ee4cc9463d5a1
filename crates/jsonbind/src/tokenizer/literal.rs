//! Resumable matcher for the `true` / `false` / `null` literals.
//!
//! The matcher holds only the unmatched tail of the literal, so it survives a
//! chunk boundary (or a `NeedMoreData` return) at any point inside the word.

use crate::token::TokenKind;

/// Which literal the matcher is committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    True,
    False,
    Null,
}

impl Literal {
    pub(crate) fn token_kind(self) -> TokenKind {
        match self {
            Literal::True | Literal::False => TokenKind::Bool,
            Literal::Null => TokenKind::Null,
        }
    }
}

/// What happened after feeding one more byte into the matcher.
pub(crate) enum Step {
    /// Byte matched; the literal is not finished yet.
    NeedMore,
    /// Byte matched and completed the literal.
    Done(Literal),
    /// Byte did not match the expected one.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiteralMatcher {
    remaining: &'static [u8],
    literal: Literal,
}

impl LiteralMatcher {
    /// Starts matching from the first byte (`t`, `f`, or `n`).
    pub(crate) fn start(first: u8) -> Option<Self> {
        let (remaining, literal) = match first {
            b't' => (b"rue".as_slice(), Literal::True),
            b'f' => (b"alse".as_slice(), Literal::False),
            b'n' => (b"ull".as_slice(), Literal::Null),
            _ => return None,
        };
        Some(Self { remaining, literal })
    }

    pub(crate) fn step(&mut self, b: u8) -> Step {
        let Some((&expected, rest)) = self.remaining.split_first() else {
            return Step::Reject;
        };
        if b != expected {
            return Step::Reject;
        }
        self.remaining = rest;
        if rest.is_empty() {
            Step::Done(self.literal)
        } else {
            Step::NeedMore
        }
    }
}
