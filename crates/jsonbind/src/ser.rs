//! Serialization: emitting JSON text from bound values and from token
//! streams.
//!
//! [`Serializer`] walks a value with its object descriptor in declaration
//! order and writes minimal JSON text to a caller-supplied sink.
//! [`TokenWriter`] re-emits a token sequence as text; it backs subtree
//! reconstruction ([`Tokenizer::copy_including_value`]) and the re-emission
//! of captured token lists.
//!
//! [`Tokenizer::copy_including_value`]: crate::Tokenizer::copy_including_value

use alloc::{string::String, vec::Vec};
use core::fmt::{self, Write};

use crate::{
    bind::{BindValue, ObjectDescriptor},
    error::Error,
    text,
    token::Token,
};

/// Emits JSON text to a caller-supplied [`core::fmt::Write`] sink.
///
/// Comma and name/value alternation is tracked internally, so bound values
/// can emit themselves without threading any state.
pub struct Serializer<'w> {
    out: &'w mut dyn Write,
    /// One `bool` per open container: `true` until its first entry is
    /// written.
    first: Vec<bool>,
    after_name: bool,
}

impl<'w> Serializer<'w> {
    /// A serializer writing to `out`.
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self {
            out,
            first: Vec::new(),
            after_name: false,
        }
    }

    fn value_prelude(&mut self) -> Result<(), Error> {
        if self.after_name {
            self.after_name = false;
            return Ok(());
        }
        if let Some(first) = self.first.last_mut() {
            if *first {
                *first = false;
            } else {
                self.out.write_char(',')?;
            }
        }
        Ok(())
    }

    /// Writes a member name and the separating colon.
    ///
    /// # Errors
    ///
    /// Fails when the sink does.
    pub fn name(&mut self, name: &str) -> Result<(), Error> {
        self.value_prelude()?;
        self.out.write_char('"')?;
        text::write_escaped_string(name, self.out)?;
        self.out.write_str("\":")?;
        self.after_name = true;
        Ok(())
    }

    /// Opens an object value.
    ///
    /// # Errors
    ///
    /// Fails when the sink does.
    pub fn begin_object(&mut self) -> Result<(), Error> {
        self.value_prelude()?;
        self.out.write_char('{')?;
        self.first.push(true);
        Ok(())
    }

    /// Closes the innermost object.
    ///
    /// # Errors
    ///
    /// Fails when the sink does.
    pub fn end_object(&mut self) -> Result<(), Error> {
        self.first.pop();
        self.out.write_char('}')?;
        Ok(())
    }

    /// Opens an array value.
    ///
    /// # Errors
    ///
    /// Fails when the sink does.
    pub fn begin_array(&mut self) -> Result<(), Error> {
        self.value_prelude()?;
        self.out.write_char('[')?;
        self.first.push(true);
        Ok(())
    }

    /// Closes the innermost array.
    ///
    /// # Errors
    ///
    /// Fails when the sink does.
    pub fn end_array(&mut self) -> Result<(), Error> {
        self.first.pop();
        self.out.write_char(']')?;
        Ok(())
    }

    /// Writes a string value, escaping as needed.
    ///
    /// # Errors
    ///
    /// Fails when the sink does.
    pub fn string(&mut self, value: &str) -> Result<(), Error> {
        self.value_prelude()?;
        self.out.write_char('"')?;
        text::write_escaped_string(value, self.out)?;
        self.out.write_char('"')?;
        Ok(())
    }

    /// Writes an unquoted scalar from format arguments.
    ///
    /// # Errors
    ///
    /// Fails when the sink does.
    pub fn scalar(&mut self, args: fmt::Arguments<'_>) -> Result<(), Error> {
        self.value_prelude()?;
        self.out.write_fmt(args)?;
        Ok(())
    }

    /// Writes pre-rendered JSON text verbatim in value position.
    ///
    /// # Errors
    ///
    /// Fails when the sink does.
    pub fn raw(&mut self, json: &str) -> Result<(), Error> {
        self.value_prelude()?;
        self.out.write_str(json)?;
        Ok(())
    }

    /// Emits `value` as an object, walking `descriptor` in declaration
    /// order.
    ///
    /// # Errors
    ///
    /// Propagates sink failures and field emission errors.
    pub fn emit_object<'buf, T>(
        &mut self,
        value: &T,
        descriptor: &ObjectDescriptor<'buf, T>,
    ) -> Result<(), Error> {
        self.begin_object()?;
        for field in descriptor.fields() {
            self.name(field.name())?;
            field.emit(value, self)?;
        }
        self.end_object()
    }
}

/// Serializes a bound value to a fresh string.
///
/// # Errors
///
/// Propagates emission errors, e.g. a non-finite float.
pub fn to_json_string<'buf, T: BindValue<'buf>>(value: &T) -> Result<String, Error> {
    let mut out = String::new();
    let mut serializer = Serializer::new(&mut out);
    value.emit(&mut serializer)?;
    Ok(out)
}

/// Re-emits a token sequence as minimal JSON text.
///
/// Keeps its own first-entry stack, mirroring [`Serializer`], so a subtree
/// can be reconstructed purely from tokens.
pub(crate) struct TokenWriter {
    first: Vec<bool>,
}

impl TokenWriter {
    pub(crate) fn new() -> Self {
        Self { first: Vec::new() }
    }

    /// Writes one token. `include_name` is `false` for the token that opens
    /// a capture, whose member name belongs to the enclosing object rather
    /// than the captured value.
    pub(crate) fn write_token<W: Write>(
        &mut self,
        token: &Token<'_>,
        include_name: bool,
        out: &mut W,
    ) -> Result<(), Error> {
        if token.kind.is_scope_end() {
            self.first.pop();
            out.write_str(token.value.as_str())?;
            return Ok(());
        }
        if let Some(first) = self.first.last_mut() {
            if *first {
                *first = false;
            } else {
                out.write_char(',')?;
            }
        }
        if include_name {
            if let Some(name) = &token.name {
                out.write_char('"')?;
                if name.has_escapes() {
                    out.write_str(name.as_str())?;
                } else {
                    text::write_escaped_string(name.as_str(), out)?;
                }
                out.write_str("\":")?;
            }
        }
        if token.kind.is_scope_start() {
            out.write_str(token.value.as_str())?;
            self.first.push(true);
            return Ok(());
        }
        if token.value.is_quoted() {
            out.write_char('"')?;
            out.write_str(token.value.as_str())?;
            out.write_char('"')?;
        } else {
            out.write_str(token.value.as_str())?;
        }
        Ok(())
    }
}
