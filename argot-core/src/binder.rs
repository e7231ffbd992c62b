//! Token-consuming binders, one per [`BindingKind`](crate::BindingKind).
//!
//! Each binder scans the shared [`TokenList`], removes exactly the tokens it
//! consumed, and writes the converted value into the field's slot. Binders
//! return `Ok(true)` when they assigned the field and `Ok(false)` when the
//! field keeps its default.

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::{
    Result,
    conversion::{ConversionPolicy, Negatable, SequenceSlot, ValueSlot},
    descriptor::FieldDescriptor,
    error::BindingError,
    tokens::TokenList,
};

/// Toggles `slot` on the first marker matching `descriptor` and removes that
/// marker. Later repetitions of the marker are left in the list.
///
/// # Examples
/// ```
/// use argot_core::{FieldDescriptor, TokenList, binder::bind_flag};
///
/// let mut tokens = TokenList::from(["-v", "--verbose"]);
/// let mut verbose = false;
/// assert!(bind_flag(&FieldDescriptor::flag("verbose"), &mut verbose, &mut tokens));
/// assert!(verbose);
/// assert_eq!(tokens.as_slice(), ["--verbose"]);
/// ```
pub fn bind_flag(
    descriptor: &FieldDescriptor,
    slot: &mut dyn Negatable,
    tokens: &mut TokenList,
) -> bool {
    let Some(index) = tokens.find_marker(descriptor) else {
        return false;
    };
    slot.negate();
    tokens.remove(index);
    debug!(field = descriptor.name(), index, "flag toggled");
    true
}

/// Binds the token following the first matching marker.
///
/// # Errors
/// Returns [`BindingError::MissingValue`] when the marker is the last token
/// and [`BindingError::ConversionFailure`] when the value does not convert.
///
/// # Examples
/// ```
/// use argot_core::{FieldDescriptor, TokenList, binder::bind_option};
///
/// let mut tokens = TokenList::from(["--count", "7", "rest"]);
/// let mut count = 0_u32;
/// bind_option(&FieldDescriptor::option("count"), &mut count, &mut tokens)?;
/// assert_eq!(count, 7);
/// assert_eq!(tokens.as_slice(), ["rest"]);
/// # Ok::<(), argot_core::BindingError>(())
/// ```
pub fn bind_option(
    descriptor: &FieldDescriptor,
    slot: &mut dyn ValueSlot,
    tokens: &mut TokenList,
) -> Result<bool> {
    let Some(index) = tokens.find_marker(descriptor) else {
        return Ok(false);
    };
    let value_index = index + 1;
    let Some(value) = tokens.get(value_index) else {
        return Err(BindingError::MissingValue {
            field: descriptor.name(),
        });
    };
    if !slot.assign(value) {
        return Err(conversion_failure(descriptor, value, slot.expected_type()));
    }
    tokens.drain(index..value_index + 1);
    debug!(field = descriptor.name(), index, "option bound");
    Ok(true)
}

/// Binds the run of non-marker tokens following the first matching marker.
///
/// The run ends at the next marker token or the end of the list. The marker
/// and the whole run are removed.
///
/// # Errors
/// Under [`ConversionPolicy::FailFast`] returns
/// [`BindingError::ConversionFailure`] for the first token that does not
/// convert.
///
/// # Examples
/// ```
/// use argot_core::{ConversionPolicy, FieldDescriptor, TokenList, binder::bind_multi_option};
///
/// let mut tokens = TokenList::from(["-x", "1", "2", "3", "-y", "4"]);
/// let mut xs: Vec<u8> = Vec::new();
/// bind_multi_option(
///     &FieldDescriptor::multi_option("x"),
///     &mut xs,
///     &mut tokens,
///     ConversionPolicy::FailFast,
/// )?;
/// assert_eq!(xs, [1, 2, 3]);
/// assert_eq!(tokens.as_slice(), ["-y", "4"]);
/// # Ok::<(), argot_core::BindingError>(())
/// ```
pub fn bind_multi_option(
    descriptor: &FieldDescriptor,
    slot: &mut dyn SequenceSlot,
    tokens: &mut TokenList,
    policy: ConversionPolicy,
) -> Result<bool> {
    let Some(index) = tokens.find_marker(descriptor) else {
        return Ok(false);
    };
    let start = index + 1;
    let end = tokens.next_marker_from(start);
    assign_run(descriptor, slot, tokens.slice(start..end), policy)?;
    tokens.drain(index..end);
    debug!(
        field = descriptor.name(),
        index,
        values = end - start,
        "multi-option bound"
    );
    Ok(true)
}

/// Binds the last remaining token. An empty list leaves the field untouched.
///
/// # Errors
/// Returns [`BindingError::ConversionFailure`] when the token does not
/// convert.
///
/// # Examples
/// ```
/// use argot_core::{FieldDescriptor, TokenList, binder::bind_input};
///
/// let mut tokens = TokenList::from(["first", "last"]);
/// let mut input = String::new();
/// bind_input(&FieldDescriptor::input("input"), &mut input, &mut tokens)?;
/// assert_eq!(input, "last");
/// assert_eq!(tokens.as_slice(), ["first"]);
/// # Ok::<(), argot_core::BindingError>(())
/// ```
pub fn bind_input(
    descriptor: &FieldDescriptor,
    slot: &mut dyn ValueSlot,
    tokens: &mut TokenList,
) -> Result<bool> {
    let Some(candidate) = tokens.last() else {
        return Ok(false);
    };
    if !slot.assign(candidate) {
        return Err(conversion_failure(descriptor, candidate, slot.expected_type()));
    }
    tokens.pop_last();
    debug!(field = descriptor.name(), "input bound");
    Ok(true)
}

/// Binds every remaining token in order and empties the list. An empty list
/// leaves the field untouched.
///
/// # Errors
/// Under [`ConversionPolicy::FailFast`] returns
/// [`BindingError::ConversionFailure`] for the first token that does not
/// convert.
pub fn bind_multi_input(
    descriptor: &FieldDescriptor,
    slot: &mut dyn SequenceSlot,
    tokens: &mut TokenList,
    policy: ConversionPolicy,
) -> Result<bool> {
    if tokens.is_empty() {
        return Ok(false);
    }
    assign_run(descriptor, slot, tokens.as_slice(), policy)?;
    let consumed = tokens.take_all().len();
    debug!(field = descriptor.name(), values = consumed, "multi-input bound");
    Ok(true)
}

fn assign_run(
    descriptor: &FieldDescriptor,
    slot: &mut dyn SequenceSlot,
    run: &[String],
    policy: ConversionPolicy,
) -> Result<()> {
    let outcome = match slot.assign_run(run, policy) {
        Ok(outcome) => outcome,
        Err(token) => return Err(conversion_failure(descriptor, &token, slot.expected_type())),
    };
    for token in &outcome.dropped {
        warn!(
            field = descriptor.name(),
            token = token.as_str(),
            expected = %slot.expected_type(),
            "dropped unconvertible token"
        );
    }
    Ok(())
}

fn conversion_failure(
    descriptor: &FieldDescriptor,
    token: &str,
    expected: Cow<'static, str>,
) -> BindingError {
    BindingError::ConversionFailure {
        token: token.to_owned(),
        field: descriptor.name(),
        expected: expected.into_owned(),
    }
}
