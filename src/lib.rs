//! Derive a fluent builder whose fields start from sensible defaults.
//!
//! ```
//! use prefab::Builder;
//!
//! #[derive(Debug, PartialEq, Builder)]
//! struct Cat {
//!     name: String,
//! }
//!
//! #[derive(Debug, PartialEq, Builder)]
//! struct Person {
//!     name: String,
//!     middle_name: Option<String>,
//!     age: u32,
//!     #[builder(default = "Cat { name: \"Bob\".into() }")]
//!     cat: Cat,
//!     friend: Option<Box<Person>>,
//! }
//!
//! let person = Person::builder().name("Alex".into()).age(42).build();
//! assert_eq!(
//!     person,
//!     Person {
//!         name: "Alex".into(),
//!         middle_name: Some(String::new()),
//!         age: 42,
//!         cat: Cat { name: "Bob".into() },
//!         friend: None,
//!     }
//! );
//! ```
//!
//! Every field gets a slot in the `{Record}Builder` struct, initialised as
//! follows (first match wins):
//!
//! - `#[builder(default = "expr")]` or `#[builder(default = expr)]`: `expr`;
//!   a bare `#[builder(default)]` means `Default::default()`.
//! - Primitives, strings, paths, collections and similar: `Default::default()`.
//! - `Duration`, `SystemTime`, `DateTime`, `Uuid`, `Url`, IP and socket
//!   addresses, `NonZero*`: a fixed canonical value (zero, the epoch, the nil
//!   UUID, `file:///`, the unspecified address, `MIN`).
//! - `Range<T>` / `RangeInclusive<T>`: an empty range at `T`'s default.
//! - `Result<T, E>`: `Ok` of `T`'s default.
//! - `Option<T>`: `Some` of `T`'s default, or `None` if `T` has none.
//! - `Box<T>`, `Rc<T>`, `Arc<T>`, `Cell<T>`, `RefCell<T>`, `Mutex<T>`,
//!   `RwLock<T>`: the wrapper around `T`'s default.
//! - tuples and `[T; N]`: each element's default.
//! - `fn(A) -> R` and `Box<dyn Fn(A) -> R>`: a closure returning `R`'s default.
//! - `&str` and `&[T]`: empty.
//! - any other named type: its own builder, `<T>::builder().build()`, so it
//!   must derive `Builder` too.
//!
//! Types without a default (generic parameters, the record itself, raw
//! pointers, ...) are compile errors unless given an explicit default.
//!
//! Only direct self references are recognised: `Self`, `Person`,
//! `crate::Person` or `self::Person` inside `Person`. A cycle through another
//! record, or a self reference spelled through `super::`, still delegates to
//! the builder and recurses forever when the builder is created.
//!
//! # Struct attributes
//!
//! | Attribute               | Meaning |
//! |:----------------------- |:------- |
//! | `prefix = "with_"`      | Prepended to every setter name. |
//! | `suffix = "..."`        | Appended to every setter name. |
//! | `visibility = "pub"`    | Visibility of the builder and its methods. Defaults to the struct's. |
//!
//! # Field attributes
//!
//! | Attribute                 | Meaning |
//! |:------------------------- |:------- |
//! | `default`, `default = ..` | Explicit default value. |
//! | `into`                    | The setter accepts `impl Into<T>`. |
//! | `rename = "name"`         | Setter name instead of the field name. |
//! | `skip`                    | No slot or setter; `build` uses the default. |
//! | `skip_prefix`             | Ignore the struct's `prefix` for this setter. |
//! | `skip_suffix`             | Ignore the struct's `suffix` for this setter. |

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::DeriveInput;

macro_rules! bail {
    ($span: expr => $message: literal $(, $args: expr)*$(,)?) => {
        return Err(syn::Error::new(
            $span,
            format!($message, $($args),*),
        ))
    }
}

mod builder;
mod default;
mod diagnostic;
mod field;
mod record;
mod synth;
mod ty;

use record::Record;
use synth::BuilderPlan;

#[proc_macro_derive(Builder, attributes(builder))]
pub fn builder(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let record = Record::try_from(input)?;
    let plan = BuilderPlan::resolve(&record)?;
    Ok(plan.into_token_stream())
}
