//! Argot core library.
//!
//! A declarative command-line argument binder. A command type declares typed
//! fields, tags each with a [`BindingKind`], and registers them once as a
//! [`Schema`]. A [`Compiler`] then maps a raw argument list onto those fields
//! in a single pass, or reports a structured [`BindingError`].
//!
//! # Examples
//! ```
//! use argot_core::{BindingError, bind, command};
//!
//! command! {
//!     #[derive(Debug)]
//!     struct Resize {
//!         flag verbose: bool,
//!         option width: u32 = 80,
//!         multi_option tag: Vec<String>,
//!         multi_input paths: Vec<String>,
//!     }
//! }
//!
//! let resize: Resize = bind(["x.png", "y.png", "--width", "120", "-v", "-t", "a", "b"])?;
//! assert!(resize.verbose);
//! assert_eq!(resize.width, 120);
//! assert_eq!(resize.tag, ["a", "b"]);
//! assert_eq!(resize.paths, ["x.png", "y.png"]);
//!
//! let err = bind::<Resize>(["--width"]).expect_err("width needs a value");
//! assert_eq!(err, BindingError::MissingValue { field: "width" });
//! # Ok::<(), BindingError>(())
//! ```

pub mod binder;
mod compiler;
mod conversion;
mod descriptor;
mod error;
mod macros;
pub mod tokens;

pub use crate::{
    compiler::{Bindable, Compiler, CompilerBuilder, FieldSlots, Slot, bind, bind_into},
    conversion::{ConversionPolicy, FromToken, Negatable, RunOutcome, SequenceSlot, ValueSlot},
    descriptor::{BindingKind, FieldDescriptor, Schema, SchemaBuilder},
    error::{BindingError, BindingErrorCode, Result},
    tokens::TokenList,
};
