//! Incremental JSON tokenization and declarative struct binding.
//!
//! The crate is built around three layers:
//!
//! - [`Tokenizer`]: a chunk-invariant, zero-copy-where-possible lexer. Input
//!   arrives in arbitrarily sized segments, an optional refill callback
//!   supplies more bytes mid-token, and token text borrows from the caller's
//!   buffers whenever a token lies inside one segment.
//! - [`ParseContext`] and [`BindValue`]: declarative binding of token streams
//!   onto plain structs via [`ObjectDescriptor`] field tables, written for
//!   you by [`bind_object!`]. [`RawText`] and [`RawTokens`] capture opaque
//!   sub-documents, and [`Serializer`] walks the same descriptors to emit
//!   JSON text back out.
//! - [`FunctionRegistry`] and [`CallContext`]: dispatch of top-level object
//!   members to named handlers, with per-member failure isolation.
//!
//! ```
//! use jsonbind::{ParseContext, bind_object, to_json_string};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//! bind_object!(Point { x, y });
//!
//! let mut point = Point::default();
//! let mut ctx = ParseContext::from_str(r#"{"x":3,"y":-1}"#);
//! ctx.parse_to(&mut point).unwrap();
//! assert_eq!(point.x, 3);
//! assert_eq!(to_json_string(&point).unwrap(), r#"{"x":3,"y":-1}"#);
//! ```

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod bind;
mod capture;
mod dispatch;
mod error;
mod parse;
mod ser;
mod text;
mod token;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use bind::{BindValue, Field, ObjectDescriptor};
pub use capture::{RawText, RawTokens};
pub use dispatch::{CallContext, DispatchFailure, FunctionRegistry};
pub use error::{Error, ErrorReport};
pub use parse::ParseContext;
pub use ser::{Serializer, to_json_string};
pub use token::{Token, TokenKind, TokenText};
pub use tokenizer::{InputChain, Tokenizer, TokenizerOptions};
