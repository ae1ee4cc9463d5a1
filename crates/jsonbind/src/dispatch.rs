//! Function dispatch: routing top-level object members to named handlers.
//!
//! A [`FunctionRegistry`] maps member names to handlers whose argument types
//! implement [`BindValue`]. [`CallContext::call_functions`] walks one
//! top-level object and invokes the matching handler for each member,
//! decoding the member's value as the handler's argument. Each member is
//! bound in its own replay context, so a malformed argument fails that one
//! call and the walk continues with the next member.

use alloc::{
    boxed::Box,
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    bind::BindValue,
    error::Error,
    parse::ParseContext,
    token::TokenKind,
};

type InvokeFn<'buf, C> = Box<dyn FnMut(&mut C, &mut ParseContext<'buf>) -> Result<(), Error> + 'buf>;

/// One registered handler.
struct FunctionDescriptor<'buf, C> {
    name: &'static str,
    invoke: InvokeFn<'buf, C>,
}

/// Named handlers sharing one state value of type `C`.
pub struct FunctionRegistry<'buf, C> {
    functions: Vec<FunctionDescriptor<'buf, C>>,
}

impl<'buf, C> FunctionRegistry<'buf, C> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
        }
    }

    /// Registers `handler` under `name`. The member value is decoded into a
    /// fresh `A::default()` before the handler runs.
    pub fn register<A, F>(&mut self, name: &'static str, mut handler: F)
    where
        A: BindValue<'buf> + Default,
        F: FnMut(&mut C, A) + 'buf,
    {
        self.functions.push(FunctionDescriptor {
            name,
            invoke: Box::new(move |state, ctx| {
                let mut argument = A::default();
                ctx.parse_to(&mut argument)?;
                handler(state, argument);
                Ok(())
            }),
        });
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut FunctionDescriptor<'buf, C>> {
        self.functions.iter_mut().find(|f| f.name == name)
    }
}

impl<C> Default for FunctionRegistry<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A handler invocation that failed, recorded without stopping the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    /// Name of the member whose handler failed.
    pub function: String,
    /// The error the argument decode or tokenizer raised.
    pub error: Error,
}

/// Drives one dispatch pass over a top-level object.
pub struct CallContext<'buf> {
    /// The underlying parse context; public for refill registration.
    pub context: ParseContext<'buf>,
    failures: Vec<DispatchFailure>,
}

impl<'buf> CallContext<'buf> {
    /// A call context over one borrowed byte buffer.
    #[must_use]
    pub fn new(data: &'buf [u8]) -> Self {
        Self {
            context: ParseContext::new(data),
            failures: Vec::new(),
        }
    }

    /// A call context over one borrowed string.
    #[must_use]
    pub fn from_str(data: &'buf str) -> Self {
        Self::new(data.as_bytes())
    }

    /// Failures recorded by the most recent walk, in stream order.
    #[must_use]
    pub fn failures(&self) -> &[DispatchFailure] {
        &self.failures
    }

    /// Walks the top-level object, invoking the matching handler for each
    /// member and skipping members no handler is registered for.
    ///
    /// A handler whose argument fails to decode is recorded in
    /// [`CallContext::failures`] and does not stop the walk; the first such
    /// failure is returned after the object is fully consumed. Structural
    /// errors in the object itself abort immediately.
    ///
    /// # Errors
    ///
    /// The first recorded handler failure, or any structural error.
    pub fn call_functions<C>(
        &mut self,
        registry: &mut FunctionRegistry<'buf, C>,
        state: &mut C,
    ) -> Result<(), Error> {
        self.failures.clear();
        self.context.advance()?;
        self.context.expect_kind(TokenKind::ObjectStart)?;
        loop {
            self.context.advance()?;
            if self.context.peek_kind()? == TokenKind::ObjectEnd {
                let _ = self.context.take_token()?;
                break;
            }
            let name = match self.context.current_name() {
                Some(name) => name.to_string(),
                None => return Err(Error::IllegalPropertyName),
            };
            let Some(function) = registry.find_mut(&name) else {
                self.context.skip_value()?;
                continue;
            };
            // Bind the argument from a replayed copy of the subtree so a
            // failure cannot leave the outer stream mid-value.
            let tokens = self.context.capture_subtree()?;
            let mut child = ParseContext::from_tokens(&tokens);
            if let Err(error) = (function.invoke)(state, &mut child) {
                self.failures.push(DispatchFailure {
                    function: name,
                    error,
                });
            }
        }
        match self.failures.first() {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }
}
