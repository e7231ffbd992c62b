//! Declarative registration of command types.

/// Declares a command struct together with its static field table.
///
/// Each field is prefixed by its visibility, then its binding kind (`flag`,
/// `option`, `multi_option`, `input`, or `multi_input`), optionally followed
/// by descriptor modifiers in parentheses such as `(strict)`, and may carry a
/// default after `=`. Fields without a default use [`Default::default`].
///
/// The macro generates the struct, its [`Default`] implementation, a
/// [`FieldSlots`](crate::FieldSlots) lookup and a
/// [`Bindable`](crate::Bindable) implementation whose [`Schema`](crate::Schema)
/// lives in a `static`.
///
/// # Examples
/// ```
/// use argot_core::{Bindable, bind, command};
///
/// command! {
///     /// Greets everyone named on the command line.
///     #[derive(Debug, PartialEq)]
///     pub struct Greetings {
///         /// Print with debug formatting.
///         pub flag(strict) debug: bool,
///         pub flag informal: bool,
///         pub multi_input people: Vec<String>,
///     }
/// }
///
/// assert_eq!(Greetings::schema().len(), 3);
/// let greetings: Greetings = bind(["-debug", "-i", "Ada"])?;
/// assert_eq!(
///     greetings,
///     Greetings { debug: true, informal: true, people: vec!["Ada".into()] },
/// );
/// # Ok::<(), argot_core::BindingError>(())
/// ```
///
/// A second positional field is rejected while compiling:
///
/// ```compile_fail
/// argot_core::command! {
///     struct Copy {
///         input source: String,
///         input target: String,
///     }
/// }
///
/// fn main() {
///     let _ = <Copy as argot_core::Bindable>::schema();
/// }
/// ```
#[macro_export]
macro_rules! command {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $kind:ident $( ( $($modifier:ident),* $(,)? ) )?
                $field:ident : $field_ty:ty $( = $default:expr )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $crate::__command_default!($($default)?), )*
                }
            }
        }

        impl $crate::FieldSlots for $name {
            fn slot(&mut self, field: &str) -> ::core::option::Option<$crate::Slot<'_>> {
                match field {
                    $( stringify!($field) => ::core::option::Option::Some(
                        $crate::__command_slot!($kind, &mut self.$field)
                    ), )*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl $crate::Bindable for $name {
            fn schema() -> &'static $crate::Schema {
                const FIELDS: &[$crate::FieldDescriptor] = &[
                    $(
                        $crate::FieldDescriptor::$kind(stringify!($field))
                            $( $( .$modifier() )* )?,
                    )*
                ];
                static SCHEMA: $crate::Schema = $crate::Schema::from_static(FIELDS);
                &SCHEMA
            }

            fn command_name() -> &'static str {
                stringify!($name)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __command_default {
    () => {
        ::core::default::Default::default()
    };
    ($default:expr) => {
        $default
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __command_slot {
    (flag, $place:expr) => {
        $crate::Slot::Toggle($place)
    };
    (option, $place:expr) => {
        $crate::Slot::Single($place)
    };
    (multi_option, $place:expr) => {
        $crate::Slot::Sequence($place)
    };
    (input, $place:expr) => {
        $crate::Slot::Single($place)
    };
    (multi_input, $place:expr) => {
        $crate::Slot::Sequence($place)
    };
}
