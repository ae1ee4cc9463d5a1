//! Parse context: drives the tokenizer against a type's field descriptors.
//!
//! The context owns its tokenizer, mirrors its sticky-error behavior at the
//! binding level, and exposes the small token plumbing the [`BindValue`]
//! implementations are built on. On any error the partially populated target
//! is unspecified; callers must not trust it.

use alloc::{format, string::String, vec::Vec};

use crate::{
    bind::{BindValue, ObjectDescriptor},
    error::Error,
    token::{Token, TokenKind},
    tokenizer::Tokenizer,
};

/// Orchestrates a [`Tokenizer`] and object descriptors to populate a target
/// value.
pub struct ParseContext<'buf> {
    /// The tokenizer feeding this context. Public so callers can register a
    /// refill callback or append data mid-parse.
    pub tokenizer: Tokenizer<'buf>,
    error: Option<Error>,
    current: Option<Token<'buf>>,
}

impl<'buf> ParseContext<'buf> {
    /// A context over one borrowed byte buffer.
    #[must_use]
    pub fn new(data: &'buf [u8]) -> Self {
        let mut tokenizer = Tokenizer::new();
        tokenizer.add_data(data);
        Self::with_tokenizer(tokenizer)
    }

    /// A context over one borrowed string.
    #[must_use]
    pub fn from_str(data: &'buf str) -> Self {
        Self::new(data.as_bytes())
    }

    /// A context replaying a previously captured token sequence, without
    /// re-lexing.
    #[must_use]
    pub fn from_tokens(tokens: &[Token<'buf>]) -> Self {
        let mut tokenizer = Tokenizer::new();
        tokenizer.add_tokens(tokens);
        Self::with_tokenizer(tokenizer)
    }

    /// A context over an explicitly configured tokenizer.
    #[must_use]
    pub fn with_tokenizer(tokenizer: Tokenizer<'buf>) -> Self {
        Self {
            tokenizer,
            error: None,
            current: None,
        }
    }

    /// The sticky error, if any operation on this context has failed.
    #[must_use]
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Human-readable rendering of the error state with source position.
    #[must_use]
    pub fn make_error_string(&self) -> String {
        match self.error {
            // Tokenizer-level failures carry input context.
            Some(error) if self.tokenizer.error() == Some(error) => {
                self.tokenizer.make_error_string()
            }
            Some(error) => {
                let (line, column) = self.tokenizer.position();
                format!("{error} at {line}:{column}")
            }
            None => self.tokenizer.make_error_string(),
        }
    }

    /// Recursively populates `target` from the input.
    ///
    /// The first structural or type mismatch sets the context's sticky error
    /// and aborts; every later call reports that same error without touching
    /// the input.
    ///
    /// # Errors
    ///
    /// Any [`Error`] raised by tokenization or binding.
    pub fn parse_to<T: BindValue<'buf>>(&mut self, target: &mut T) -> Result<(), Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let result = self.advance().and_then(|()| target.bind(self));
        if let Err(error) = result {
            self.error = Some(error);
            return Err(error);
        }
        Ok(())
    }

    // ---- token plumbing for BindValue implementations ---------------------

    /// Fetches the next token into the current slot.
    pub(crate) fn advance(&mut self) -> Result<(), Error> {
        self.current = Some(self.tokenizer.next_token()?);
        Ok(())
    }

    /// Takes the current token; binding a value consumes it.
    pub(crate) fn take_token(&mut self) -> Result<Token<'buf>, Error> {
        self.current.take().ok_or(Error::NeedMoreData)
    }

    /// Member name of the current token, when it has one.
    pub(crate) fn current_name(&self) -> Option<&str> {
        self.current
            .as_ref()
            .and_then(|t| t.name.as_ref())
            .map(crate::token::TokenText::as_str)
    }

    /// Classification of the current token without consuming it.
    pub(crate) fn peek_kind(&self) -> Result<TokenKind, Error> {
        self.current
            .as_ref()
            .map(|t| t.kind)
            .ok_or(Error::NeedMoreData)
    }

    /// Consumes the current token, requiring classification `kind`.
    pub(crate) fn expect_kind(&mut self, kind: TokenKind) -> Result<Token<'buf>, Error> {
        let token = self.take_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Error::TypeMismatch {
                expected: kind,
                found: token.kind,
            })
        }
    }

    /// Advances to the next array element. Returns `false` once the closing
    /// end token has been consumed.
    pub(crate) fn advance_element(&mut self) -> Result<bool, Error> {
        self.advance()?;
        if self.peek_kind()?.is_scope_end() {
            self.current = None;
            Ok(false)
        } else {
            Ok(true)
        }
    }

    /// Binds an object: expects `ObjectStart`, then loops over member
    /// tokens, recursing into matching descriptor fields and skipping
    /// unknown members, until the matching `ObjectEnd`.
    ///
    /// # Errors
    ///
    /// Any [`Error`] raised by tokenization or field binding.
    pub fn bind_object<T>(
        &mut self,
        target: &mut T,
        descriptor: &ObjectDescriptor<'buf, T>,
    ) -> Result<(), Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let result = self.bind_object_members(target, descriptor);
        if let Err(error) = result {
            self.error = Some(error);
        }
        result
    }

    fn bind_object_members<T>(
        &mut self,
        target: &mut T,
        descriptor: &ObjectDescriptor<'buf, T>,
    ) -> Result<(), Error> {
        self.expect_kind(TokenKind::ObjectStart)?;
        loop {
            self.advance()?;
            if self.peek_kind()? == TokenKind::ObjectEnd {
                self.current = None;
                return Ok(());
            }
            let name = match self.current.as_ref().and_then(|t| t.name.clone()) {
                Some(name) => name,
                // Member without a key cannot come off the tokenizer; guard
                // against hand-built token lists.
                None => return Err(Error::IllegalPropertyName),
            };
            match descriptor.parse_field(name.as_str(), target, self) {
                Some(result) => result?,
                None => self.skip_value()?,
            }
        }
    }

    /// Consumes and discards the current value: the single scalar, or the
    /// whole subtree for a container.
    pub(crate) fn skip_value(&mut self) -> Result<(), Error> {
        let token = self.take_token()?;
        if !token.kind.is_scope_start() {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.tokenizer.next_token()?;
            if token.kind.is_scope_start() {
                depth += 1;
            } else if token.kind.is_scope_end() {
                depth -= 1;
            }
        }
        Ok(())
    }

    /// Copies the current value's token subtree out of the stream, consuming
    /// it: the single scalar token, or start-through-matching-end for a
    /// container.
    pub(crate) fn capture_subtree(&mut self) -> Result<Vec<Token<'buf>>, Error> {
        let start = self.take_token()?;
        let mut tokens = Vec::new();
        let is_container = start.kind.is_scope_start();
        tokens.push(start);
        if is_container {
            let mut depth = 1usize;
            while depth > 0 {
                let token = self.tokenizer.next_token()?;
                if token.kind.is_scope_start() {
                    depth += 1;
                } else if token.kind.is_scope_end() {
                    depth -= 1;
                }
                tokens.push(token);
            }
        }
        Ok(tokens)
    }
}
