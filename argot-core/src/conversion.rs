//! Value conversion from raw argument tokens.
//!
//! Every bindable field's element type implements [`FromToken`]. The binders
//! never see concrete types: they work through the object-safe [`ValueSlot`]
//! and [`SequenceSlot`] views, which blanket implementations provide for any
//! convertible type and for `Vec`s of convertible types.

use std::{borrow::Cow, path::PathBuf};

/// Fallible construction of a value from a single argument token.
///
/// # Examples
/// ```
/// use argot_core::FromToken;
///
/// assert_eq!(u8::from_token("7"), Some(7));
/// assert_eq!(u8::from_token("seven"), None);
/// assert_eq!(Vec::<u8>::from_token("[1, 2,3]"), Some(vec![1, 2, 3]));
/// assert_eq!(Option::<u8>::from_token("9"), Some(Some(9)));
/// ```
pub trait FromToken: Sized {
    /// Builds a value from `token`, returning `None` when it is not a valid
    /// textual form of `Self`.
    fn from_token(token: &str) -> Option<Self>;

    /// Names the type in conversion error messages.
    ///
    /// Defaults to the type's name without module paths, so
    /// `alloc::vec::Vec<app::Mode>` reads `Vec<Mode>`.
    #[must_use]
    fn expected() -> Cow<'static, str> {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Strips the module path from every path segment of `full`.
fn short_type_name(full: &'static str) -> Cow<'static, str> {
    if !full.contains("::") {
        return Cow::Borrowed(full);
    }
    let mut short = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut rest = full;
    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("::") {
            short.truncate(segment_start);
            rest = after;
            continue;
        }
        short.push(ch);
        if !(ch.is_alphanumeric() || ch == '_') {
            segment_start = short.len();
        }
        rest = &rest[ch.len_utf8()..];
    }
    Cow::Owned(short)
}

/// Implements [`FromToken`] for types that already implement
/// [`std::str::FromStr`].
///
/// # Examples
/// ```
/// use argot_core::{FromToken, from_token_via_from_str};
///
/// struct Port(u16);
///
/// impl std::str::FromStr for Port {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Port)
///     }
/// }
///
/// from_token_via_from_str!(Port);
///
/// assert_eq!(Port::from_token("8080").map(|port| port.0), Some(8080));
/// assert_eq!(Port::expected(), "Port");
/// ```
#[macro_export]
macro_rules! from_token_via_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromToken for $ty {
                fn from_token(token: &str) -> ::core::option::Option<Self> {
                    token.parse().ok()
                }

                fn expected() -> ::std::borrow::Cow<'static, str> {
                    ::std::borrow::Cow::Borrowed(stringify!($ty))
                }
            }
        )+
    };
}

from_token_via_from_str!(
    String, PathBuf, char, bool, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
    f32, f64,
);

impl<T: FromToken> FromToken for Option<T> {
    fn from_token(token: &str) -> Option<Self> {
        T::from_token(token).map(Some)
    }

    fn expected() -> Cow<'static, str> {
        T::expected()
    }
}

/// Sequences accept the bracketed list form `[a,b,c]`. Elements are trimmed
/// and `[]` is the empty list; one bad element rejects the whole token.
impl<T: FromToken> FromToken for Vec<T> {
    fn from_token(token: &str) -> Option<Self> {
        let inner = bracketed(token)?;
        if inner.trim().is_empty() {
            return Some(Vec::new());
        }
        inner
            .split(',')
            .map(|element| T::from_token(element.trim()))
            .collect()
    }

    fn expected() -> Cow<'static, str> {
        Cow::Owned(format!("[{}]", T::expected()))
    }
}

fn bracketed(token: &str) -> Option<&str> {
    token.strip_prefix('[')?.strip_suffix(']')
}

/// Values that a flag marker can toggle.
///
/// # Examples
/// ```
/// use argot_core::Negatable;
///
/// let mut verbose = false;
/// verbose.negate();
/// assert!(verbose);
///
/// let mut color: Option<bool> = None;
/// color.negate();
/// assert_eq!(color, Some(true));
/// ```
pub trait Negatable {
    /// Flips the value in place.
    fn negate(&mut self);
}

impl Negatable for bool {
    fn negate(&mut self) {
        *self = !*self;
    }
}

impl Negatable for Option<bool> {
    fn negate(&mut self) {
        *self = Some(!self.unwrap_or(false));
    }
}

/// Storage that accepts exactly one token.
pub trait ValueSlot {
    /// Converts `token` and stores the result, returning `false` (and leaving
    /// the slot untouched) when conversion fails.
    fn assign(&mut self, token: &str) -> bool;

    /// Names the type stored by the slot.
    fn expected_type(&self) -> Cow<'static, str>;
}

impl<T: FromToken> ValueSlot for T {
    fn assign(&mut self, token: &str) -> bool {
        match T::from_token(token) {
            Some(value) => {
                *self = value;
                true
            }
            None => false,
        }
    }

    fn expected_type(&self) -> Cow<'static, str> {
        T::expected()
    }
}

/// How a multi-value binder treats tokens that fail conversion.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ConversionPolicy {
    /// The first unconvertible token aborts the binder with an error.
    #[default]
    FailFast,
    /// Unconvertible tokens are consumed and dropped from the sequence.
    Lenient,
}

impl ConversionPolicy {
    /// Returns a short label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FailFast => "fail_fast",
            Self::Lenient => "lenient",
        }
    }
}

/// Result of decoding a run of tokens into a [`SequenceSlot`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunOutcome {
    /// Number of values stored in the slot.
    pub stored: usize,
    /// Tokens skipped under [`ConversionPolicy::Lenient`].
    pub dropped: Vec<String>,
}

/// Storage that accepts an ordered run of tokens.
pub trait SequenceSlot {
    /// Converts every token of `run` and replaces the slot's contents with the
    /// results in token order.
    ///
    /// A run made of a single bracketed token (`[a,b]`) is decoded as a list.
    ///
    /// # Errors
    /// Under [`ConversionPolicy::FailFast`] returns the first token that fails
    /// conversion; the slot is left untouched in that case.
    fn assign_run(&mut self, run: &[String], policy: ConversionPolicy)
    -> Result<RunOutcome, String>;

    /// Names the element type stored by the slot.
    fn expected_type(&self) -> Cow<'static, str>;
}

impl<T: FromToken> SequenceSlot for Vec<T> {
    fn assign_run(
        &mut self,
        run: &[String],
        policy: ConversionPolicy,
    ) -> Result<RunOutcome, String> {
        if let [single] = run
            && bracketed(single).is_some()
        {
            return match Self::from_token(single) {
                Some(values) => {
                    let stored = values.len();
                    *self = values;
                    Ok(RunOutcome {
                        stored,
                        dropped: Vec::new(),
                    })
                }
                None if policy == ConversionPolicy::Lenient => {
                    self.clear();
                    Ok(RunOutcome {
                        stored: 0,
                        dropped: vec![single.clone()],
                    })
                }
                None => Err(single.clone()),
            };
        }

        let mut values = Vec::with_capacity(run.len());
        let mut dropped = Vec::new();
        for token in run {
            match T::from_token(token) {
                Some(value) => values.push(value),
                None => match policy {
                    ConversionPolicy::FailFast => return Err(token.clone()),
                    ConversionPolicy::Lenient => dropped.push(token.clone()),
                },
            }
        }
        let stored = values.len();
        *self = values;
        Ok(RunOutcome { stored, dropped })
    }

    fn expected_type(&self) -> Cow<'static, str> {
        T::expected()
    }
}
