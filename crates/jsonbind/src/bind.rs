//! Declarative field binding.
//!
//! A type participates in parsing and serialization by implementing
//! [`BindValue`]. Scalars, strings, options, vectors, and fixed arrays are
//! covered here; struct types delegate to an [`ObjectDescriptor`] — an
//! ordered table of named field bindings, each pairing a shared and a
//! mutable accessor for one field. The [`bind_object!`] macro writes that
//! delegation for the common case.
//!
//! Descriptor order matters for serialization (emission order) but not for
//! parsing, where members are looked up by name and unknown input keys are
//! skipped.

use alloc::{boxed::Box, string::String, vec::Vec};

use crate::{
    error::Error,
    parse::ParseContext,
    ser::Serializer,
    text,
    token::TokenKind,
};

/// A value that can be populated from a parse context and emitted to a
/// serializer.
pub trait BindValue<'buf> {
    /// Populates `self` from the context's current token (and, for
    /// containers, the tokens that follow it).
    ///
    /// # Errors
    ///
    /// Returns a type mismatch for an incompatible token classification, or
    /// propagates tokenizer errors.
    fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error>;

    /// Emits `self` in value position.
    ///
    /// # Errors
    ///
    /// Propagates sink failures; non-finite floats are rejected.
    fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error>;
}

type ParseFn<'buf, T> = Box<dyn Fn(&mut T, &mut ParseContext<'buf>) -> Result<(), Error> + 'buf>;
type EmitFn<'buf, T> = Box<dyn Fn(&T, &mut Serializer<'_>) -> Result<(), Error> + 'buf>;

/// One named field binding inside an [`ObjectDescriptor`].
pub struct Field<'buf, T> {
    name: &'static str,
    parse: ParseFn<'buf, T>,
    emit: EmitFn<'buf, T>,
}

impl<T> Field<'_, T> {
    /// The member name this field binds to.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn emit(&self, target: &T, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        (self.emit)(target, serializer)
    }
}

/// Ordered list of field bindings for one struct type.
pub struct ObjectDescriptor<'buf, T> {
    fields: Vec<Field<'buf, T>>,
}

impl<'buf, T> ObjectDescriptor<'buf, T> {
    /// An empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field binding. `get` and `get_mut` are plain accessors for
    /// the field; declaration order here is emission order.
    #[must_use]
    pub fn field<F>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self
    where
        F: BindValue<'buf> + 'buf,
        T: 'buf,
    {
        self.fields.push(Field {
            name,
            parse: Box::new(move |target, ctx| get_mut(target).bind(ctx)),
            emit: Box::new(move |target, serializer| get(target).emit(serializer)),
        });
        self
    }

    /// Looks up a field binding by exact member name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Field<'buf, T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn fields(&self) -> &[Field<'buf, T>] {
        &self.fields
    }

    pub(crate) fn parse_field(
        &self,
        name: &str,
        target: &mut T,
        ctx: &mut ParseContext<'buf>,
    ) -> Option<Result<(), Error>> {
        self.find(name).map(|field| (field.parse)(target, ctx))
    }
}

impl<T> Default for ObjectDescriptor<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements [`BindValue`] for a struct by listing its bound fields.
///
/// Member names are the field identifiers; parsing looks fields up by name,
/// serialization emits them in the listed order.
///
/// ```
/// use jsonbind::{ParseContext, bind_object};
///
/// #[derive(Default)]
/// struct Child {
///     some_more: String,
///     another_int: i32,
/// }
/// bind_object!(Child { some_more, another_int });
///
/// let mut child = Child::default();
/// let mut ctx = ParseContext::from_str(r#"{"some_more":"world","another_int":495}"#);
/// ctx.parse_to(&mut child).unwrap();
/// assert_eq!(child.another_int, 495);
/// ```
#[macro_export]
macro_rules! bind_object {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl<'buf> $crate::BindValue<'buf> for $ty {
            fn bind(
                &mut self,
                ctx: &mut $crate::ParseContext<'buf>,
            ) -> Result<(), $crate::Error> {
                let descriptor = $crate::ObjectDescriptor::new()
                    $(.field(
                        stringify!($field),
                        |v: &Self| &v.$field,
                        |v: &mut Self| &mut v.$field,
                    ))+;
                ctx.bind_object(self, &descriptor)
            }

            fn emit(
                &self,
                serializer: &mut $crate::Serializer<'_>,
            ) -> Result<(), $crate::Error> {
                let descriptor = $crate::ObjectDescriptor::new()
                    $(.field(
                        stringify!($field),
                        |v: &Self| &v.$field,
                        |v: &mut Self| &mut v.$field,
                    ))+;
                serializer.emit_object(self, &descriptor)
            }
        }
    };
}

impl<'buf> BindValue<'buf> for bool {
    fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
        let token = ctx.take_token()?;
        if token.kind != TokenKind::Bool {
            return Err(Error::TypeMismatch {
                expected: TokenKind::Bool,
                found: token.kind,
            });
        }
        *self = token.value_str() == "true";
        Ok(())
    }

    fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        serializer.scalar(format_args!("{self}"))
    }
}

macro_rules! bind_integer {
    ($($ty:ty),+) => {
        $(impl<'buf> BindValue<'buf> for $ty {
            fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
                let token = ctx.take_token()?;
                if token.kind != TokenKind::Number {
                    return Err(Error::TypeMismatch {
                        expected: TokenKind::Number,
                        found: token.kind,
                    });
                }
                *self = token
                    .value_str()
                    .parse()
                    .map_err(|_| Error::FailedToParseNumber)?;
                Ok(())
            }

            fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
                serializer.scalar(format_args!("{self}"))
            }
        })+
    };
}

bind_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

macro_rules! bind_float {
    ($($ty:ty),+) => {
        $(impl<'buf> BindValue<'buf> for $ty {
            fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
                let token = ctx.take_token()?;
                if token.kind != TokenKind::Number {
                    return Err(Error::TypeMismatch {
                        expected: TokenKind::Number,
                        found: token.kind,
                    });
                }
                *self = token
                    .value_str()
                    .parse()
                    .map_err(|_| Error::FailedToParseNumber)?;
                Ok(())
            }

            fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
                if !self.is_finite() {
                    return Err(Error::IllegalDataValue);
                }
                serializer.scalar(format_args!("{self}"))
            }
        })+
    };
}

bind_float!(f32, f64);

impl<'buf> BindValue<'buf> for String {
    fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
        let token = ctx.take_token()?;
        if !matches!(token.kind, TokenKind::String | TokenKind::Ascii) {
            return Err(Error::TypeMismatch {
                expected: TokenKind::String,
                found: token.kind,
            });
        }
        self.clear();
        if token.value.has_escapes() {
            text::unescape_into(token.value_str(), self)?;
        } else {
            self.push_str(token.value_str());
        }
        Ok(())
    }

    fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        serializer.string(self)
    }
}

impl<'buf, T> BindValue<'buf> for Option<T>
where
    T: BindValue<'buf> + Default,
{
    fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
        if ctx.peek_kind()? == TokenKind::Null {
            let _ = ctx.take_token()?;
            *self = None;
            return Ok(());
        }
        let inner = self.get_or_insert_with(T::default);
        inner.bind(ctx)
    }

    fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        match self {
            Some(inner) => inner.emit(serializer),
            None => serializer.scalar(format_args!("null")),
        }
    }
}

impl<'buf, T> BindValue<'buf> for Vec<T>
where
    T: BindValue<'buf> + Default,
{
    fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
        ctx.expect_kind(TokenKind::ArrayStart)?;
        self.clear();
        while ctx.advance_element()? {
            let mut element = T::default();
            element.bind(ctx)?;
            self.push(element);
        }
        Ok(())
    }

    fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        serializer.begin_array()?;
        for element in self {
            element.emit(serializer)?;
        }
        serializer.end_array()
    }
}

impl<'buf, T, const N: usize> BindValue<'buf> for [T; N]
where
    T: BindValue<'buf>,
{
    fn bind(&mut self, ctx: &mut ParseContext<'buf>) -> Result<(), Error> {
        ctx.expect_kind(TokenKind::ArrayStart)?;
        let mut index = 0;
        while ctx.advance_element()? {
            let Some(slot) = self.get_mut(index) else {
                return Err(Error::ArrayCapacityExceeded { capacity: N });
            };
            slot.bind(ctx)?;
            index += 1;
        }
        // Fewer elements than capacity leaves the remainder untouched.
        Ok(())
    }

    fn emit(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        serializer.begin_array()?;
        for element in self {
            element.emit(serializer)?;
        }
        serializer.end_array()
    }
}
