//! Opaque capture of sub-documents during binding.
//!
//! [`RawText`] keeps a member's value as JSON text; [`RawTokens`] keeps it as
//! the token subtree. Both consume exactly one value from the stream and pass
//! it through unexamined, so a struct can carry schema-less regions alongside
//! its typed fields.

use alloc::{string::String, vec::Vec};

use crate::{
    bind::BindValue,
    error::Error,
    parse::ParseContext,
    ser::{Serializer, TokenWriter},
    token::Token,
};

/// A field that captures its value as JSON text instead of decoding it.
///
/// The captured text is minimal JSON reconstructed from tokens, not the
/// original byte span; on emission it is written back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawText(pub String);

impl<'buf> BindValue<'buf> for RawText {
    fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
        let token = ctx.take_token()?;
        self.0.clear();
        if token.kind.is_scope_start() {
            ctx.tokenizer.copy_including_value(&token, &mut self.0)
        } else {
            token.value_text_into(&mut self.0);
            Ok(())
        }
    }

    fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        serializer.raw(&self.0)
    }
}

/// A field that captures its value as the token subtree.
///
/// For a container this is the start token through the matching end token
/// inclusive; for a scalar it is the single token. The captured tokens can be
/// replayed into a fresh [`ParseContext`] later.
#[derive(Debug, Clone, Default)]
pub struct RawTokens<'buf> {
    /// The captured subtree, in stream order.
    pub tokens: Vec<Token<'buf>>,
}

impl<'buf> BindValue<'buf> for RawTokens<'buf> {
    fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
        self.tokens = ctx.capture_subtree()?;
        Ok(())
    }

    fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        let mut rendered = String::new();
        let mut writer = TokenWriter::new();
        for (index, token) in self.tokens.iter().enumerate() {
            // The opening token's member name belongs to the enclosing
            // object, not the captured value.
            writer.write_token(token, index > 0, &mut rendered)?;
        }
        serializer.raw(&rendered)
    }
}
