//! Incremental JSON tokenizer.
//!
//! The tokenizer owns a chain of input segments and a lexical state machine
//! that produces one [`Token`] per [`Tokenizer::next_token`] call. Input may
//! arrive in arbitrarily sized chunks, including one byte at a time; the
//! token stream is identical regardless of how the bytes are partitioned.
//! Chunk boundaries may fall anywhere, including inside a string escape, a
//! number, or a literal keyword.
//!
//! Token text is borrowed from the caller's segment whenever a token lies
//! entirely inside one borrowed segment; tokens that cross a segment boundary
//! or come from copied segments are copied out once, when they complete.
//!
//! When the cursor runs dry mid-token the tokenizer synchronously invokes the
//! registered refill callback, giving it the chance to append more segments
//! before scanning resumes. Without a callback (or when the callback adds
//! nothing) [`Error::NeedMoreData`] is returned; the in-flight token state is
//! preserved, so adding data and calling [`Tokenizer::next_token`] again
//! resumes exactly where scanning stopped. All other errors are terminal:
//! every later call reports the same error.

mod chain;
mod literal;
mod options;

use alloc::{
    borrow::Cow,
    boxed::Box,
    collections::VecDeque,
    string::{String, ToString},
    vec::Vec,
};

use bstr::ByteSlice;

pub use chain::InputChain;
use chain::Peeked;
use literal::{Literal, LiteralMatcher, Step};
pub use options::TokenizerOptions;

use crate::{
    error::{Error, ErrorReport},
    ser::TokenWriter,
    text,
    token::{Token, TokenKind, TokenText},
};

/// Kind of an open nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

/// Structural expectation between tokens. Together with the top of the scope
/// stack this determines the legal transition set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Before the document value; only `{` or `[` are accepted.
    RootValue,
    /// Right after `{`: a key or `}`.
    KeyOrEnd,
    /// After a comma inside an object: a key is required.
    Key,
    /// After a member key.
    Colon,
    /// After a colon: a member value is required.
    Value,
    /// Right after `[`: an element or `]`.
    ValueOrEnd,
    /// After a comma inside an array: an element is required.
    ElementValue,
    /// After a value inside a container.
    CommaOrEnd,
    /// The root value is complete.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanKind {
    Str,
    Number,
    LiteralWord,
    AsciiWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrState {
    Normal,
    Escape,
    Unicode(u8),
}

/// In-flight token scan. Kept out-of-line in the tokenizer so a scan survives
/// both segment crossings and `NeedMoreData` returns.
struct Scan {
    kind: ScanKind,
    for_key: bool,
    quoted: bool,
    has_escapes: bool,
    /// Offset in the *current* segment where unconsumed token content starts.
    seg_start_off: usize,
    /// Accumulated content from earlier segments, once the token can no
    /// longer be a single borrowed slice.
    buffered: Option<Vec<u8>>,
    str_state: StrState,
    literal: Option<LiteralMatcher>,
    literal_value: Option<Literal>,
}

impl Scan {
    fn new(kind: ScanKind, for_key: bool, quoted: bool, seg_start_off: usize) -> Self {
        Self {
            kind,
            for_key,
            quoted,
            has_escapes: false,
            seg_start_off,
            buffered: None,
            str_state: StrState::Normal,
            literal: None,
            literal_value: None,
        }
    }
}

/// The incremental tokenizer.
pub struct Tokenizer<'buf> {
    chain: InputChain<'buf>,
    replay: VecDeque<Token<'buf>>,
    scopes: Vec<Scope>,
    expect: Expect,
    scan: Option<Scan>,
    pending_name: Option<TokenText<'buf>>,
    error: Option<Error>,
    error_pos: Option<(usize, usize)>,
    refill: Option<Box<dyn FnMut(&mut InputChain<'buf>) + 'buf>>,
    options: TokenizerOptions,
}

impl Default for Tokenizer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'buf> Tokenizer<'buf> {
    /// A tokenizer with strict JSON options and no input.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(TokenizerOptions::default())
    }

    /// A tokenizer with explicit options.
    #[must_use]
    pub fn with_options(options: TokenizerOptions) -> Self {
        Self {
            chain: InputChain::new(),
            replay: VecDeque::new(),
            scopes: Vec::new(),
            expect: Expect::RootValue,
            scan: None,
            pending_name: None,
            error: None,
            error_pos: None,
            refill: None,
            options,
        }
    }

    /// Appends a borrowed input segment. The caller guarantees the backing
    /// memory outlives every token whose text references it.
    pub fn add_data(&mut self, data: &'buf [u8]) {
        self.chain.add_data(data);
    }

    /// Appends a copied input segment; the tokenizer owns the bytes.
    pub fn add_data_copy(&mut self, data: &[u8]) {
        self.chain.add_data_copy(data);
    }

    /// Queues an already-tokenized sequence, e.g. a captured subtree. Queued
    /// tokens are replayed by [`Tokenizer::next_token`] before any byte
    /// input is consulted.
    pub fn add_tokens(&mut self, tokens: &[Token<'buf>]) {
        self.replay.extend(tokens.iter().cloned());
    }

    /// Registers the callback invoked synchronously whenever input runs out
    /// mid-token. The callback may append segments to the chain; if it adds
    /// nothing, the pending operation reports [`Error::NeedMoreData`].
    pub fn set_refill<F>(&mut self, refill: F)
    where
        F: FnMut(&mut InputChain<'buf>) + 'buf,
    {
        self.refill = Some(Box::new(refill));
    }

    /// 1-based line and column of the cursor.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        self.chain.position()
    }

    /// The sticky error, if one has been raised.
    #[must_use]
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// The sticky error positioned in the input, or `None` when no error has
    /// been raised.
    #[must_use]
    pub fn error_report(&self) -> Option<ErrorReport> {
        let error = self.error?;
        let (line, column) = self.error_pos.unwrap_or_else(|| self.chain.position());
        Some(ErrorReport {
            error,
            line,
            column,
            context: self.chain.context_snippet().as_bstr().to_string(),
        })
    }

    /// Human-readable rendering of the current error state: kind, line and
    /// column, and the input context around the failure point.
    #[must_use]
    pub fn make_error_string(&self) -> String {
        match self.error_report() {
            Some(report) => report.to_string(),
            None => "no error".to_string(),
        }
    }

    /// Advances the state machine and returns exactly one token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NeedMoreData`] when input is exhausted mid-document
    /// and no refill supplied more; any other kind is a terminal syntax
    /// error that every subsequent call repeats.
    pub fn next_token(&mut self) -> Result<Token<'buf>, Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if let Some(token) = self.replay.pop_front() {
            return Ok(token);
        }
        match self.advance_token() {
            Ok(token) => Ok(token),
            Err(error) => {
                if error != Error::NeedMoreData {
                    self.error = Some(error);
                    self.error_pos = Some(self.chain.position());
                }
                Err(error)
            }
        }
    }

    /// Appends the minimal textual form of `token`'s value to `out`. For a
    /// scope start this is the opening delimiter only; use
    /// [`Tokenizer::copy_including_value`] for the whole subtree.
    pub fn copy_from_value(&self, token: &Token<'buf>, out: &mut String) {
        token.value_text_into(out);
    }

    /// Reconstructs the full textual form of the value starting at `start`,
    /// walking the stream forward to the matching end token when `start`
    /// opens a container. The output is minimal JSON rebuilt from tokens, not
    /// the original bytes; the tokenizer is left positioned after the
    /// matching end token.
    ///
    /// # Errors
    ///
    /// Propagates any tokenizer error raised while walking the subtree.
    pub fn copy_including_value(
        &mut self,
        start: &Token<'buf>,
        out: &mut String,
    ) -> Result<(), Error> {
        let mut writer = TokenWriter::new();
        writer.write_token(start, false, out)?;
        if !start.kind.is_scope_start() {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.next_token()?;
            if token.kind.is_scope_start() {
                depth += 1;
            } else if token.kind.is_scope_end() {
                depth -= 1;
            }
            writer.write_token(&token, true, out)?;
        }
        Ok(())
    }

    // ---- byte-level plumbing ----------------------------------------------

    /// Peek at the next byte, advancing over segment boundaries. Crossing a
    /// boundary while a scan is in flight flushes the scanned span of the old
    /// segment into the scan's buffer, so token text never dangles.
    fn peek_norm(&mut self) -> Option<u8> {
        loop {
            match self.chain.peek_raw() {
                Peeked::Byte(b) => return Some(b),
                Peeked::EndOfSegment => {
                    if let Some(scan) = &mut self.scan {
                        let span = self.chain.span_from(scan.seg_start_off);
                        scan.buffered.get_or_insert_with(Vec::new).extend_from_slice(&span);
                        scan.seg_start_off = 0;
                    }
                    self.chain.advance_segment();
                }
                Peeked::Exhausted => return None,
            }
        }
    }

    fn try_refill(&mut self) -> bool {
        let before = self.chain.total_bytes();
        let Some(refill) = self.refill.as_mut() else {
            return false;
        };
        refill(&mut self.chain);
        self.chain.total_bytes() > before
    }

    fn peek_or_refill(&mut self) -> Result<u8, Error> {
        loop {
            if let Some(b) = self.peek_norm() {
                return Ok(b);
            }
            if !self.try_refill() {
                return Err(Error::NeedMoreData);
            }
        }
    }

    fn skip_to_token(&mut self) -> Result<u8, Error> {
        loop {
            let b = self.peek_or_refill()?;
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.chain.bump();
            } else {
                return Ok(b);
            }
        }
    }

    // ---- token construction -----------------------------------------------

    fn advance_token(&mut self) -> Result<Token<'buf>, Error> {
        loop {
            if self.scan.is_some() {
                if let Some(token) = self.run_scan()? {
                    return Ok(token);
                }
                // A member key completed; keep going for its value.
                continue;
            }
            let b = self.skip_to_token()?;
            if let Some(token) = self.dispatch_structural(b)? {
                return Ok(token);
            }
        }
    }

    /// Handles one byte in a between-token position: punctuation is consumed
    /// in place, container tokens are emitted, scans are started.
    fn dispatch_structural(&mut self, b: u8) -> Result<Option<Token<'buf>>, Error> {
        match self.expect {
            Expect::RootValue => match b {
                b'{' | b'[' => Ok(Some(self.begin_scope(b))),
                // A bare scalar root is rejected; documents are objects or
                // arrays.
                _ => Err(Error::IllegalDataValue),
            },
            Expect::KeyOrEnd | Expect::Key => match b {
                b'"' => {
                    self.chain.bump();
                    self.begin_scan(ScanKind::Str, true, true);
                    Ok(None)
                }
                b'}' if self.expect == Expect::KeyOrEnd => Ok(Some(self.end_scope(Scope::Object))),
                b'}' => Err(Error::ExpectedDataToken),
                b',' => Err(Error::EncounteredIllegalChar),
                b'A'..=b'Z' | b'a'..=b'z' | b'_' => {
                    if self.options.allow_ascii_literals {
                        self.begin_scan(ScanKind::AsciiWord, true, false);
                        self.chain.bump();
                        Ok(None)
                    } else {
                        Err(Error::IllegalPropertyName)
                    }
                }
                _ => Err(Error::EncounteredIllegalChar),
            },
            Expect::Colon => {
                if b == b':' {
                    self.chain.bump();
                    self.expect = Expect::Value;
                    Ok(None)
                } else {
                    Err(Error::InvalidToken)
                }
            }
            Expect::Value => match b {
                b'}' | b']' => Err(Error::ExpectedDataToken),
                _ => self.begin_value(b),
            },
            Expect::ValueOrEnd => match b {
                b']' => Ok(Some(self.end_scope(Scope::Array))),
                b'}' => Err(Error::EncounteredIllegalChar),
                _ => self.begin_value(b),
            },
            Expect::ElementValue => match b {
                b']' => Err(Error::ExpectedDataToken),
                b'}' => Err(Error::EncounteredIllegalChar),
                _ => self.begin_value(b),
            },
            Expect::CommaOrEnd => match b {
                b',' => {
                    self.chain.bump();
                    self.expect = match self.scopes.last() {
                        Some(Scope::Object) => Expect::Key,
                        _ => Expect::ElementValue,
                    };
                    Ok(None)
                }
                b'}' => {
                    if self.scopes.last() == Some(&Scope::Object) {
                        Ok(Some(self.end_scope(Scope::Object)))
                    } else {
                        Err(Error::EncounteredIllegalChar)
                    }
                }
                b']' => {
                    if self.scopes.last() == Some(&Scope::Array) {
                        Ok(Some(self.end_scope(Scope::Array)))
                    } else {
                        Err(Error::EncounteredIllegalChar)
                    }
                }
                _ => Err(Error::InvalidToken),
            },
            Expect::Done => Err(Error::EncounteredIllegalChar),
        }
    }

    /// Starts a value production at `b`.
    fn begin_value(&mut self, b: u8) -> Result<Option<Token<'buf>>, Error> {
        match b {
            b'{' | b'[' => Ok(Some(self.begin_scope(b))),
            b'"' => {
                self.chain.bump();
                self.begin_scan(ScanKind::Str, false, true);
                Ok(None)
            }
            b'-' | b'0'..=b'9' => {
                self.begin_scan(ScanKind::Number, false, false);
                self.chain.bump();
                Ok(None)
            }
            b't' | b'f' | b'n' => {
                self.begin_scan(ScanKind::LiteralWord, false, false);
                if let Some(scan) = &mut self.scan {
                    scan.literal = LiteralMatcher::start(b);
                }
                self.chain.bump();
                Ok(None)
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => {
                if self.options.allow_ascii_literals {
                    self.begin_scan(ScanKind::AsciiWord, false, false);
                    self.chain.bump();
                    Ok(None)
                } else {
                    Err(Error::IllegalDataValue)
                }
            }
            b',' => Err(Error::EncounteredIllegalChar),
            _ => Err(Error::EncounteredIllegalChar),
        }
    }

    fn begin_scan(&mut self, kind: ScanKind, for_key: bool, quoted: bool) {
        self.scan = Some(Scan::new(kind, for_key, quoted, self.chain.offset()));
    }

    fn begin_scope(&mut self, b: u8) -> Token<'buf> {
        self.chain.bump();
        let (scope, kind, text) = if b == b'{' {
            (Scope::Object, TokenKind::ObjectStart, "{")
        } else {
            (Scope::Array, TokenKind::ArrayStart, "[")
        };
        self.scopes.push(scope);
        self.expect = if scope == Scope::Object {
            Expect::KeyOrEnd
        } else {
            Expect::ValueOrEnd
        };
        Token {
            kind,
            name: self.pending_name.take(),
            value: TokenText::punctuation(text),
        }
    }

    fn end_scope(&mut self, scope: Scope) -> Token<'buf> {
        self.chain.bump();
        self.scopes.pop();
        self.expect = if self.scopes.is_empty() {
            Expect::Done
        } else {
            Expect::CommaOrEnd
        };
        let (kind, text) = if scope == Scope::Object {
            (TokenKind::ObjectEnd, "}")
        } else {
            (TokenKind::ArrayEnd, "]")
        };
        Token {
            kind,
            name: None,
            value: TokenText::punctuation(text),
        }
    }

    // ---- scans -------------------------------------------------------------

    fn run_scan(&mut self) -> Result<Option<Token<'buf>>, Error> {
        let kind = self.scan.as_ref().map(|s| s.kind);
        match kind {
            Some(ScanKind::Str) => self.run_string_scan(),
            Some(ScanKind::Number) => self.run_number_scan(),
            Some(ScanKind::LiteralWord) => self.run_literal_scan(),
            Some(ScanKind::AsciiWord) => self.run_ascii_scan(),
            None => Err(Error::NeedMoreData),
        }
    }

    fn run_string_scan(&mut self) -> Result<Option<Token<'buf>>, Error> {
        loop {
            let b = self.peek_or_refill()?;
            let state = self.scan.as_ref().map_or(StrState::Normal, |s| s.str_state);
            match state {
                StrState::Normal => match b {
                    b'"' => {
                        let (text, for_key) = self.finish_scan_text()?;
                        self.chain.bump();
                        return Ok(self.finish_scanned(TokenKind::String, text, for_key));
                    }
                    b'\\' => {
                        if let Some(scan) = &mut self.scan {
                            scan.has_escapes = true;
                            scan.str_state = StrState::Escape;
                        }
                        self.chain.bump();
                    }
                    0x00..=0x1F => return Err(Error::EncounteredIllegalChar),
                    _ => self.chain.bump(),
                },
                StrState::Escape => match b {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                        if let Some(scan) = &mut self.scan {
                            scan.str_state = StrState::Normal;
                        }
                        self.chain.bump();
                    }
                    b'u' => {
                        if let Some(scan) = &mut self.scan {
                            scan.str_state = StrState::Unicode(4);
                        }
                        self.chain.bump();
                    }
                    _ => return Err(Error::EncounteredIllegalChar),
                },
                StrState::Unicode(remaining) => {
                    if !b.is_ascii_hexdigit() {
                        return Err(Error::EncounteredIllegalChar);
                    }
                    if let Some(scan) = &mut self.scan {
                        scan.str_state = if remaining > 1 {
                            StrState::Unicode(remaining - 1)
                        } else {
                            StrState::Normal
                        };
                    }
                    self.chain.bump();
                }
            }
        }
    }

    fn run_number_scan(&mut self) -> Result<Option<Token<'buf>>, Error> {
        loop {
            let b = self.peek_or_refill()?;
            match b {
                b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E' => self.chain.bump(),
                b' ' | b'\t' | b'\n' | b'\r' | b',' | b'}' | b']' => {
                    let (text, for_key) = self.finish_scan_text()?;
                    if !text::is_valid_number(text.as_str()) {
                        return Err(Error::IllegalDataValue);
                    }
                    return Ok(self.finish_scanned(TokenKind::Number, text, for_key));
                }
                _ => return Err(Error::IllegalDataValue),
            }
        }
    }

    fn run_literal_scan(&mut self) -> Result<Option<Token<'buf>>, Error> {
        loop {
            let b = self.peek_or_refill()?;
            if let Some(literal) = self.scan.as_ref().and_then(|s| s.literal_value) {
                // Literal word complete; the next byte decides whether it
                // stands alone.
                if b.is_ascii_alphanumeric() || b == b'_' {
                    if self.options.allow_ascii_literals {
                        return self.continue_as_ascii();
                    }
                    return Err(Error::IllegalDataValue);
                }
                let (text, for_key) = self.finish_scan_text()?;
                return Ok(self.finish_scanned(literal.token_kind(), text, for_key));
            }
            let step = match self.scan.as_mut().and_then(|s| s.literal.as_mut()) {
                Some(matcher) => matcher.step(b),
                None => return Err(Error::IllegalDataValue),
            };
            match step {
                Step::NeedMore => self.chain.bump(),
                Step::Done(literal) => {
                    if let Some(scan) = &mut self.scan {
                        scan.literal_value = Some(literal);
                    }
                    self.chain.bump();
                }
                Step::Reject => {
                    if self.options.allow_ascii_literals {
                        return self.continue_as_ascii();
                    }
                    return Err(Error::IllegalDataValue);
                }
            }
        }
    }

    fn continue_as_ascii(&mut self) -> Result<Option<Token<'buf>>, Error> {
        if let Some(scan) = &mut self.scan {
            scan.kind = ScanKind::AsciiWord;
        }
        self.run_ascii_scan()
    }

    fn run_ascii_scan(&mut self) -> Result<Option<Token<'buf>>, Error> {
        loop {
            let b = self.peek_or_refill()?;
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
                self.chain.bump();
            } else {
                let (text, for_key) = self.finish_scan_text()?;
                return Ok(self.finish_scanned(TokenKind::Ascii, text, for_key));
            }
        }
    }

    /// Assembles the token text for the completed scan: the buffered prefix
    /// plus the span still sitting in the current segment, borrowed when the
    /// whole token lies inside one borrowed segment.
    fn finish_scan_text(&mut self) -> Result<(TokenText<'buf>, bool), Error> {
        let scan = self.scan.take().ok_or(Error::NeedMoreData)?;
        let tail = self.chain.span_from(scan.seg_start_off);
        let text: Cow<'buf, str> = match scan.buffered {
            Some(mut buffered) => {
                buffered.extend_from_slice(&tail);
                Cow::Owned(
                    String::from_utf8(buffered).map_err(|_| Error::EncounteredIllegalChar)?,
                )
            }
            None => match tail {
                Cow::Borrowed(bytes) => Cow::Borrowed(
                    core::str::from_utf8(bytes).map_err(|_| Error::EncounteredIllegalChar)?,
                ),
                Cow::Owned(bytes) => Cow::Owned(
                    String::from_utf8(bytes).map_err(|_| Error::EncounteredIllegalChar)?,
                ),
            },
        };
        let token_text = TokenText::new(text, scan.quoted, scan.has_escapes);
        Ok((token_text, scan.for_key))
    }

    /// Routes finished scan text: keys become the pending member name, values
    /// become a token carrying that name.
    fn finish_scanned(
        &mut self,
        kind: TokenKind,
        text: TokenText<'buf>,
        for_key: bool,
    ) -> Option<Token<'buf>> {
        if for_key {
            self.pending_name = Some(text);
            self.expect = Expect::Colon;
            return None;
        }
        self.expect = if self.scopes.is_empty() {
            Expect::Done
        } else {
            Expect::CommaOrEnd
        };
        Some(Token {
            kind,
            name: self.pending_name.take(),
            value: text,
        })
    }
}
