//! Static field metadata for bindable command types.
//!
//! A command type registers its fields once as a [`Schema`]: an immutable
//! table of [`FieldDescriptor`]s validated so that at most one positional
//! field exists. The `command!` macro builds this table in a `static`, which
//! turns a second positional field into a compile error.

use std::{borrow::Cow, collections::HashSet, fmt};

use crate::{Result, error::BindingError};

/// How a field is matched against the token list and how many values it takes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BindingKind {
    /// A boolean-like marker toggled by its presence.
    Flag,
    /// A marker followed by exactly one value.
    Option,
    /// A marker followed by a run of values.
    MultiOption,
    /// The last remaining token after every marker has been consumed.
    Input,
    /// Every remaining token after every marker has been consumed.
    MultiInput,
}

impl BindingKind {
    /// Returns `true` for [`BindingKind::Input`] and [`BindingKind::MultiInput`].
    #[must_use]
    pub const fn is_positional(self) -> bool {
        matches!(self, Self::Input | Self::MultiInput)
    }

    /// Returns `true` when the kind is matched through a marker token.
    #[must_use]
    pub const fn is_marked(self) -> bool {
        !self.is_positional()
    }

    /// Rank of the kind in the binding pass: flags, then options, then
    /// multi-options, then the positional field.
    #[must_use]
    pub const fn category(self) -> u8 {
        match self {
            Self::Flag => 0,
            Self::Option => 1,
            Self::MultiOption => 2,
            Self::Input | Self::MultiInput => 3,
        }
    }

    /// Returns a short label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Option => "option",
            Self::MultiOption => "multi-option",
            Self::Input => "input",
            Self::MultiInput => "multi-input",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable metadata describing one declared field.
///
/// # Examples
/// ```
/// use argot_core::{BindingKind, FieldDescriptor};
///
/// let verbose = FieldDescriptor::flag("verbose");
/// assert_eq!(verbose.kind(), BindingKind::Flag);
/// assert!(verbose.matches_marker("verbose"));
/// assert!(verbose.matches_marker("v"));
///
/// let strict = FieldDescriptor::flag("verbose").strict();
/// assert!(!strict.matches_marker("v"));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: BindingKind,
    strict_name: bool,
}

impl FieldDescriptor {
    /// Creates a descriptor of any kind.
    #[must_use]
    pub const fn new(name: &'static str, kind: BindingKind) -> Self {
        Self {
            name,
            kind,
            strict_name: false,
        }
    }

    /// Creates a [`BindingKind::Flag`] descriptor.
    #[must_use]
    pub const fn flag(name: &'static str) -> Self {
        Self::new(name, BindingKind::Flag)
    }

    /// Creates a [`BindingKind::Option`] descriptor.
    #[must_use]
    pub const fn option(name: &'static str) -> Self {
        Self::new(name, BindingKind::Option)
    }

    /// Creates a [`BindingKind::MultiOption`] descriptor.
    #[must_use]
    pub const fn multi_option(name: &'static str) -> Self {
        Self::new(name, BindingKind::MultiOption)
    }

    /// Creates a [`BindingKind::Input`] descriptor.
    #[must_use]
    pub const fn input(name: &'static str) -> Self {
        Self::new(name, BindingKind::Input)
    }

    /// Creates a [`BindingKind::MultiInput`] descriptor.
    #[must_use]
    pub const fn multi_input(name: &'static str) -> Self {
        Self::new(name, BindingKind::MultiInput)
    }

    /// Disables the single-character short form for this field.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict_name = true;
        self
    }

    /// Sets whether the single-character short form is disabled.
    #[must_use]
    pub const fn with_strict_name(mut self, strict_name: bool) -> Self {
        self.strict_name = strict_name;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the binding kind.
    #[must_use]
    pub const fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Returns `true` when only the full name matches.
    #[must_use]
    pub const fn strict_name(&self) -> bool {
        self.strict_name
    }

    /// Tests the option text of a marker (the token with its leading dashes
    /// stripped) against this field.
    ///
    /// The long form matches the whole name. Unless the field is strict, a
    /// single character equal to the first character of the name matches as
    /// the short form.
    #[must_use]
    pub fn matches_marker(&self, option_text: &str) -> bool {
        if option_text == self.name {
            return true;
        }
        if self.strict_name {
            return false;
        }
        let mut chars = option_text.chars();
        match (chars.next(), chars.next()) {
            (Some(short), None) => self.name.chars().next() == Some(short),
            _ => false,
        }
    }
}

/// The validated descriptor table of a command type.
///
/// # Examples
/// ```
/// use argot_core::{BindingError, FieldDescriptor, Schema};
///
/// static GREETINGS: Schema = Schema::from_static(&[
///     FieldDescriptor::flag("informal"),
///     FieldDescriptor::multi_input("people"),
/// ]);
/// assert_eq!(GREETINGS.len(), 2);
///
/// let err = Schema::try_new(vec![
///     FieldDescriptor::input("source"),
///     FieldDescriptor::input("target"),
/// ])
/// .expect_err("two positional fields are ambiguous");
/// assert!(matches!(err, BindingError::AmbiguousPositional { .. }));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    fields: Cow<'static, [FieldDescriptor]>,
}

impl Schema {
    /// Registers a static descriptor table.
    ///
    /// # Panics
    /// Panics when `fields` declares more than one positional field or repeats
    /// a field name. Used to initialise a `static` or `const`, the panic is a
    /// compile-time error.
    #[must_use]
    pub const fn from_static(fields: &'static [FieldDescriptor]) -> Self {
        assert!(
            positional_count(fields) <= 1,
            "only one positional field may be declared per command"
        );
        assert!(
            !has_duplicate_names(fields),
            "field names must be unique within a command"
        );
        Self {
            fields: Cow::Borrowed(fields),
        }
    }

    /// Registers a descriptor table built at runtime.
    ///
    /// # Errors
    /// Returns [`BindingError::AmbiguousPositional`] when more than one
    /// positional field is declared and [`BindingError::DuplicateField`] when a
    /// name repeats.
    pub fn try_new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let positional: Vec<&'static str> = fields
            .iter()
            .filter(|field| field.kind.is_positional())
            .map(FieldDescriptor::name)
            .collect();
        if positional.len() > 1 {
            return Err(BindingError::AmbiguousPositional { fields: positional });
        }

        let mut seen = HashSet::with_capacity(fields.len());
        if let Some(repeated) = fields.iter().find(|field| !seen.insert(field.name)) {
            return Err(BindingError::DuplicateField {
                field: repeated.name,
            });
        }

        Ok(Self {
            fields: Cow::Owned(fields),
        })
    }

    /// Starts a [`SchemaBuilder`].
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Returns the descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks a descriptor up by field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the positional field, if one is declared.
    #[must_use]
    pub fn positional(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.kind.is_positional())
    }

    /// Returns the descriptors in binding order: every flag, then every
    /// option, then every multi-option, then the positional field, each
    /// category in declaration order.
    #[must_use]
    pub fn binding_order(&self) -> Vec<&FieldDescriptor> {
        let mut ordered: Vec<&FieldDescriptor> = self.fields.iter().collect();
        ordered.sort_by_key(|field| field.kind.category());
        ordered
    }
}

const fn positional_count(fields: &[FieldDescriptor]) -> usize {
    let mut count = 0;
    let mut rest = fields;
    while let [field, tail @ ..] = rest {
        if field.kind.is_positional() {
            count += 1;
        }
        rest = tail;
    }
    count
}

const fn has_duplicate_names(fields: &[FieldDescriptor]) -> bool {
    let mut rest = fields;
    while let [field, tail @ ..] = rest {
        let mut others = tail;
        while let [other, remaining @ ..] = others {
            if bytes_eq(field.name.as_bytes(), other.name.as_bytes()) {
                return true;
            }
            others = remaining;
        }
        rest = tail;
    }
    false
}

const fn bytes_eq(left: &[u8], right: &[u8]) -> bool {
    let mut a = left;
    let mut b = right;
    loop {
        match (a, b) {
            ([], []) => return true,
            ([x, a_tail @ ..], [y, b_tail @ ..]) if *x == *y => {
                a = a_tail;
                b = b_tail;
            }
            _ => return false,
        }
    }
}

/// Fluent manual registration of a [`Schema`].
///
/// # Examples
/// ```
/// use argot_core::{BindingKind, FieldDescriptor, Schema};
///
/// let schema = Schema::builder()
///     .flag("debug")
///     .option("count")
///     .field(FieldDescriptor::multi_option("tag").strict())
///     .multi_input("paths")
///     .build()
///     .expect("schema is valid");
/// assert_eq!(schema.positional().map(|field| field.kind()), Some(BindingKind::MultiInput));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Appends an arbitrary descriptor.
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Appends a flag.
    #[must_use]
    pub fn flag(self, name: &'static str) -> Self {
        self.field(FieldDescriptor::flag(name))
    }

    /// Appends a single-value option.
    #[must_use]
    pub fn option(self, name: &'static str) -> Self {
        self.field(FieldDescriptor::option(name))
    }

    /// Appends a repeatable-value option.
    #[must_use]
    pub fn multi_option(self, name: &'static str) -> Self {
        self.field(FieldDescriptor::multi_option(name))
    }

    /// Appends a single positional input.
    #[must_use]
    pub fn input(self, name: &'static str) -> Self {
        self.field(FieldDescriptor::input(name))
    }

    /// Appends a positional input sequence.
    #[must_use]
    pub fn multi_input(self, name: &'static str) -> Self {
        self.field(FieldDescriptor::multi_input(name))
    }

    /// Validates the descriptors and registers the schema.
    ///
    /// # Errors
    /// See [`Schema::try_new`].
    pub fn build(self) -> Result<Schema> {
        Schema::try_new(self.fields)
    }
}
