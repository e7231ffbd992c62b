//! Error types for the argot binding engine.
//!
//! Binding failures fall into two families. User input errors
//! ([`BindingError::ConversionFailure`], [`BindingError::MissingValue`]) are
//! recoverable and reported to the caller. Declaration defects
//! ([`BindingError::AmbiguousPositional`] and friends) describe a command type
//! that was declared incorrectly and surface at registration time.

use std::fmt;

use thiserror::Error;

use crate::descriptor::BindingKind;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error produced while registering a command type or binding its fields.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BindingError {
    /// A token was present but could not be converted to the field's type.
    #[error("{field}: couldn't convert '{token}' to a value of type {expected}")]
    ConversionFailure {
        /// The offending raw token.
        token: String,
        /// Name of the field being bound.
        field: &'static str,
        /// Human-readable name of the expected type.
        expected: String,
    },
    /// An option marker was given without the value that must follow it.
    #[error("{field}: missing value after option marker")]
    MissingValue {
        /// Name of the option whose value is absent.
        field: &'static str,
    },
    /// The command type declares more than one positional field.
    #[error("only one positional field may be declared per command (found {})", .fields.join(", "))]
    AmbiguousPositional {
        /// Names of every positional field in the declaration.
        fields: Vec<&'static str>,
    },
    /// Two descriptors share the same field name.
    #[error("field `{field}` is declared more than once")]
    DuplicateField {
        /// The repeated field name.
        field: &'static str,
    },
    /// The schema names a field that the command value does not expose.
    #[error("field `{field}` is declared in the schema but has no storage slot")]
    UnknownField {
        /// The unresolved field name.
        field: &'static str,
    },
    /// The storage slot exposed for a field cannot hold values of its kind.
    #[error("field `{field}` is declared as {kind} but its slot cannot bind that kind")]
    SlotMismatch {
        /// The mismatched field name.
        field: &'static str,
        /// The binding kind named by the descriptor.
        kind: BindingKind,
    },
}

define_error_codes! {
    /// Stable codes describing [`BindingError`] variants.
    enum BindingErrorCode for BindingError {
        /// A token could not be converted to the field's type.
        ConversionFailure => ConversionFailure { .. } => "ARGOT_CONVERSION_FAILURE",
        /// An option marker was missing its value.
        MissingValue => MissingValue { .. } => "ARGOT_MISSING_VALUE",
        /// More than one positional field was declared.
        AmbiguousPositional => AmbiguousPositional { .. } => "ARGOT_AMBIGUOUS_POSITIONAL",
        /// A field name was declared twice.
        DuplicateField => DuplicateField { .. } => "ARGOT_DUPLICATE_FIELD",
        /// A declared field has no storage slot.
        UnknownField => UnknownField { .. } => "ARGOT_UNKNOWN_FIELD",
        /// A declared field's slot cannot hold its binding kind.
        SlotMismatch => SlotMismatch { .. } => "ARGOT_SLOT_MISMATCH",
    }
}

impl BindingError {
    /// Returns `true` when the error describes a defect in the command
    /// declaration rather than in the user's arguments.
    ///
    /// # Examples
    /// ```
    /// use argot_core::BindingError;
    ///
    /// assert!(!BindingError::MissingValue { field: "name" }.is_declaration_defect());
    /// assert!(BindingError::UnknownField { field: "name" }.is_declaration_defect());
    /// ```
    #[must_use]
    pub const fn is_declaration_defect(&self) -> bool {
        !matches!(
            self,
            Self::ConversionFailure { .. } | Self::MissingValue { .. }
        )
    }

    /// Returns the name of the field the error concerns, when there is one.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::ConversionFailure { field, .. }
            | Self::MissingValue { field }
            | Self::DuplicateField { field }
            | Self::UnknownField { field }
            | Self::SlotMismatch { field, .. } => Some(*field),
            Self::AmbiguousPositional { .. } => None,
        }
    }
}

/// Convenient alias for results returned by the binding API.
pub type Result<T> = core::result::Result<T, BindingError>;
