//! Orchestration of a binding pass over a command's fields.
//!
//! The [`Compiler`] walks a [`Schema`] in binding order (flags, options,
//! multi-options, then the positional field), resolves each descriptor to the
//! command's storage through [`FieldSlots`], and runs the matching binder
//! against the shared [`TokenList`]. The first error stops the pass; fields
//! bound before it keep their new values.

use tracing::{Span, debug, field, instrument};

use crate::{
    Result,
    binder,
    conversion::{ConversionPolicy, Negatable, SequenceSlot, ValueSlot},
    descriptor::{BindingKind, FieldDescriptor, Schema},
    error::BindingError,
    tokens::TokenList,
};

/// Mutable view of one field's storage, typed by what the field accepts.
pub enum Slot<'a> {
    /// Storage toggled by a flag.
    Toggle(&'a mut dyn Negatable),
    /// Storage for exactly one converted token.
    Single(&'a mut dyn ValueSlot),
    /// Storage for an ordered run of converted tokens.
    Sequence(&'a mut dyn SequenceSlot),
}

/// Resolves field names to storage slots.
pub trait FieldSlots {
    /// Returns the slot backing `field`, or `None` when the value has no such
    /// field.
    fn slot(&mut self, field: &str) -> Option<Slot<'_>>;
}

/// A command type with a registered [`Schema`].
///
/// Usually implemented by the [`command!`](crate::command!) macro.
pub trait Bindable: FieldSlots {
    /// Returns the schema registered for the type.
    fn schema() -> &'static Schema;

    /// Names the command in diagnostics.
    #[must_use]
    fn command_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Runs binding passes with a fixed configuration.
///
/// # Examples
/// ```
/// use argot_core::{Compiler, ConversionPolicy, TokenList, command};
///
/// command! {
///     #[derive(Debug)]
///     struct Build {
///         flag release: bool,
///         multi_option features: Vec<String>,
///         input target: Option<String>,
///     }
/// }
///
/// let compiler = Compiler::builder()
///     .with_conversion_policy(ConversionPolicy::FailFast)
///     .build();
/// let build: Build = compiler.bind(TokenList::from(["-r", "--features", "a", "b", "-x", "app"]))?;
/// assert!(build.release);
/// assert_eq!(build.features, ["a", "b"]);
/// assert_eq!(build.target.as_deref(), Some("app"));
/// # Ok::<(), argot_core::BindingError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    policy: ConversionPolicy,
}

impl Compiler {
    /// Creates a compiler with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a [`CompilerBuilder`].
    #[must_use]
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Returns how multi-value binders treat unconvertible tokens.
    #[must_use]
    pub fn conversion_policy(&self) -> ConversionPolicy {
        self.policy
    }

    /// Binds `tokens` onto a default-constructed `C`.
    ///
    /// # Errors
    /// Returns the first [`BindingError`] raised by any binder.
    pub fn bind<C>(&self, tokens: impl Into<TokenList>) -> Result<C>
    where
        C: Bindable + Default,
    {
        let mut command = C::default();
        let mut tokens = tokens.into();
        self.bind_into(&mut command, &mut tokens)?;
        Ok(command)
    }

    /// Binds `tokens` onto an existing command value, leaving unconsumed
    /// tokens in the list.
    ///
    /// # Errors
    /// Returns the first [`BindingError`] raised by any binder. Fields bound
    /// before the failure keep their new values.
    pub fn bind_into<C: Bindable>(&self, command: &mut C, tokens: &mut TokenList) -> Result<()> {
        self.bind_schema(C::command_name(), C::schema(), command, tokens)
    }

    /// Runs one binding pass of `schema` against `target`.
    ///
    /// # Errors
    /// Returns [`BindingError::UnknownField`] or [`BindingError::SlotMismatch`]
    /// when `target` does not match the schema, and the first binder error
    /// otherwise.
    #[instrument(
        name = "core.bind",
        err,
        skip(self, command, schema, target, tokens),
        fields(
            command = command,
            fields = schema.len(),
            tokens = tokens.len(),
            policy = self.policy.as_str(),
            remaining = field::Empty,
        ),
    )]
    pub fn bind_schema(
        &self,
        command: &str,
        schema: &Schema,
        target: &mut dyn FieldSlots,
        tokens: &mut TokenList,
    ) -> Result<()> {
        for descriptor in schema.binding_order() {
            self.bind_field(descriptor, target, tokens)?;
        }
        Span::current().record("remaining", tokens.len());
        debug!(remaining = tokens.len(), "binding pass completed");
        Ok(())
    }

    fn bind_field(
        &self,
        descriptor: &FieldDescriptor,
        target: &mut dyn FieldSlots,
        tokens: &mut TokenList,
    ) -> Result<bool> {
        let field = descriptor.name();
        let Some(slot) = target.slot(field) else {
            return Err(BindingError::UnknownField { field });
        };
        match (descriptor.kind(), slot) {
            (BindingKind::Flag, Slot::Toggle(value)) => {
                Ok(binder::bind_flag(descriptor, value, tokens))
            }
            (BindingKind::Option, Slot::Single(value)) => {
                binder::bind_option(descriptor, value, tokens)
            }
            (BindingKind::MultiOption, Slot::Sequence(values)) => {
                binder::bind_multi_option(descriptor, values, tokens, self.policy)
            }
            (BindingKind::Input, Slot::Single(value)) => {
                binder::bind_input(descriptor, value, tokens)
            }
            (BindingKind::MultiInput, Slot::Sequence(values)) => {
                binder::bind_multi_input(descriptor, values, tokens, self.policy)
            }
            (kind, _) => Err(BindingError::SlotMismatch { field, kind }),
        }
    }
}

/// Configures and constructs [`Compiler`] instances.
///
/// # Examples
/// ```
/// use argot_core::{CompilerBuilder, ConversionPolicy};
///
/// let builder = CompilerBuilder::new();
/// assert_eq!(builder.conversion_policy(), ConversionPolicy::FailFast);
///
/// let compiler = builder.with_conversion_policy(ConversionPolicy::Lenient).build();
/// assert_eq!(compiler.conversion_policy(), ConversionPolicy::Lenient);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CompilerBuilder {
    policy: ConversionPolicy,
}

impl CompilerBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides how multi-value binders treat unconvertible tokens.
    #[must_use]
    pub fn with_conversion_policy(mut self, policy: ConversionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configured conversion policy.
    #[must_use]
    pub fn conversion_policy(&self) -> ConversionPolicy {
        self.policy
    }

    /// Constructs the [`Compiler`].
    #[must_use]
    pub fn build(self) -> Compiler {
        Compiler {
            policy: self.policy,
        }
    }
}

/// Binds `tokens` onto a default-constructed `C` with the default
/// [`Compiler`].
///
/// # Errors
/// Returns the first [`BindingError`] raised by any binder.
///
/// # Examples
/// ```
/// use argot_core::{bind, command};
///
/// command! {
///     struct Greetings {
///         flag informal: bool,
///         multi_input people: Vec<String>,
///     }
/// }
///
/// let greetings: Greetings = bind(["-i", "Ada", "Grace"])?;
/// assert!(greetings.informal);
/// assert_eq!(greetings.people, ["Ada", "Grace"]);
/// # Ok::<(), argot_core::BindingError>(())
/// ```
pub fn bind<C>(tokens: impl Into<TokenList>) -> Result<C>
where
    C: Bindable + Default,
{
    Compiler::new().bind(tokens)
}

/// Binds `tokens` onto `command` with the default [`Compiler`].
///
/// # Errors
/// Returns the first [`BindingError`] raised by any binder.
pub fn bind_into<C: Bindable>(command: &mut C, tokens: &mut TokenList) -> Result<()> {
    Compiler::new().bind_into(command, tokens)
}
