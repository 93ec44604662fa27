//! Type-directed inference of the expression a builder slot starts from.
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. an explicit `#[builder(default = ...)]` is used verbatim;
//! 2. named types are looked up in [`KnownType`], falling back to the
//!    type's own derived builder (`<T>::builder().build()`);
//! 3. collections are always empty;
//! 4. `Option<T>` becomes `Some(<default of T>)`, or `None` when `T` has no
//!    default;
//! 5. pointers wrap the default of what they point to;
//! 6. functions become closures returning the default of their output;
//! 7. tuples and arrays combine the defaults of their elements;
//! 8. anything else is an [`UnsupportedType`].
//!
//! Only expressions are produced here. Nothing is evaluated until the
//! generated builder runs.

use std::str::FromStr;

use proc_macro2::Span;
use quote::ToTokens;
use strum::EnumString;
use syn::{Expr, Generics, Ident, Path, Type, parse_quote, spanned::Spanned};

use crate::ty::TypeDescriptor;

/// A field type with no inferable default.
#[derive(Debug)]
pub struct UnsupportedType {
    span: Span,
    ty: String,
    reason: Option<&'static str>,
}

impl UnsupportedType {
    fn new(ty: &Type) -> Self {
        Self {
            span: ty.span(),
            ty: ty.to_token_stream().to_string(),
            reason: None,
        }
    }

    fn because(mut self, reason: &'static str) -> Self {
        self.reason = Some(reason);
        self
    }
}

impl From<UnsupportedType> for syn::Error {
    fn from(value: UnsupportedType) -> Self {
        let reason = value
            .reason
            .map(|reason| format!(" ({reason})"))
            .unwrap_or_default();
        syn::Error::new(
            value.span,
            format!(
                "cannot infer a default value for `{}`{}; specify one with \
                 `#[builder(default = \"...\")]`",
                value.ty, reason
            ),
        )
    }
}

/// Named types with a fixed default, keyed by the last segment of their path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
enum KnownType {
    #[strum(
        serialize = "bool",
        serialize = "char",
        serialize = "i8",
        serialize = "i16",
        serialize = "i32",
        serialize = "i64",
        serialize = "i128",
        serialize = "isize",
        serialize = "u8",
        serialize = "u16",
        serialize = "u32",
        serialize = "u64",
        serialize = "u128",
        serialize = "usize",
        serialize = "f32",
        serialize = "f64",
        serialize = "String",
        serialize = "OsString",
        serialize = "PathBuf",
        serialize = "CString",
        serialize = "Cow",
        serialize = "Decimal",
        serialize = "Bytes",
        serialize = "BytesMut",
        serialize = "Wrapping",
        serialize = "Saturating",
        serialize = "PhantomData",
        serialize = "PhantomPinned",
        serialize = "AtomicBool",
        serialize = "AtomicI8",
        serialize = "AtomicI16",
        serialize = "AtomicI32",
        serialize = "AtomicI64",
        serialize = "AtomicIsize",
        serialize = "AtomicU8",
        serialize = "AtomicU16",
        serialize = "AtomicU32",
        serialize = "AtomicU64",
        serialize = "AtomicUsize",
        serialize = "NaiveDate",
        serialize = "NaiveTime",
        serialize = "NaiveDateTime"
    )]
    ZeroConstructible,
    Duration,
    SystemTime,
    DateTime,
    Uuid,
    Url,
    #[strum(serialize = "Ipv4Addr", serialize = "Ipv6Addr")]
    UnspecifiedIp,
    IpAddr,
    SocketAddr,
    #[strum(
        serialize = "NonZeroU8",
        serialize = "NonZeroU16",
        serialize = "NonZeroU32",
        serialize = "NonZeroU64",
        serialize = "NonZeroU128",
        serialize = "NonZeroUsize"
    )]
    NonZero,
    Range,
    RangeInclusive,
    Result,
}

impl KnownType {
    fn default_value(
        self,
        engine: &Inference,
        ty: &Type,
        args: &[&Type],
    ) -> Result<Expr, UnsupportedType> {
        let value = match self {
            Self::ZeroConstructible => zero(ty),
            Self::Duration => parse_quote! { <#ty>::ZERO },
            Self::SystemTime => parse_quote! { <#ty>::UNIX_EPOCH },
            Self::DateTime => parse_quote! { <#ty>::from(::std::time::SystemTime::UNIX_EPOCH) },
            Self::Uuid => parse_quote! { <#ty>::nil() },
            Self::Url => parse_quote! {
                <#ty>::parse("file:///").expect("the root file URL is valid")
            },
            Self::UnspecifiedIp => parse_quote! { <#ty>::UNSPECIFIED },
            Self::IpAddr => parse_quote! {
                ::std::net::IpAddr::V4(::std::net::Ipv4Addr::UNSPECIFIED)
            },
            Self::SocketAddr => parse_quote! {
                <#ty>::new(::std::net::IpAddr::V4(::std::net::Ipv4Addr::UNSPECIFIED), 0)
            },
            Self::NonZero => parse_quote! { <#ty>::MIN },
            Self::Range => {
                let bound = engine.first_argument(ty, args)?;
                parse_quote! { (#bound..#bound) }
            }
            Self::RangeInclusive => {
                let bound = engine.first_argument(ty, args)?;
                parse_quote! { (#bound..=#bound) }
            }
            Self::Result => {
                let ok = engine.first_argument(ty, args)?;
                parse_quote! { ::core::result::Result::Ok(#ok) }
            }
        };

        Ok(value)
    }
}

fn zero(ty: &Type) -> Expr {
    parse_quote! { <#ty as ::core::default::Default>::default() }
}

fn absent() -> Expr {
    parse_quote! { ::core::option::Option::None }
}

/// Default inference for the fields of one record.
pub struct Inference<'a> {
    record: &'a Ident,
    type_params: Vec<&'a Ident>,
}

impl<'a> Inference<'a> {
    pub fn new(record: &'a Ident, generics: &'a Generics) -> Self {
        Self {
            record,
            type_params: generics.type_params().map(|param| &param.ident).collect(),
        }
    }

    /// The expression a slot of type `ty` starts from, preferring `explicit`.
    pub fn infer(&self, ty: &Type, explicit: Option<&Expr>) -> Result<Expr, UnsupportedType> {
        match explicit {
            Some(expr) => Ok(expr.clone()),
            None => self.infer_type(ty),
        }
    }

    fn infer_type(&self, ty: &Type) -> Result<Expr, UnsupportedType> {
        match TypeDescriptor::classify(ty) {
            TypeDescriptor::Nominal { path, ident, args } => self.nominal(ty, path, ident, &args),
            TypeDescriptor::ArrayOf | TypeDescriptor::MapOf => Ok(zero(ty)),
            TypeDescriptor::Optional(inner) => Ok(match self.infer_type(inner) {
                Ok(value) => parse_quote! { ::core::option::Option::Some(#value) },
                Err(_) => absent(),
            }),
            TypeDescriptor::Pointer { constructor, inner } => {
                if is_unsized(inner) {
                    return Ok(zero(ty));
                }
                let value = self.infer_type(inner)?;
                Ok(parse_quote! { #constructor::new(#value) })
            }
            TypeDescriptor::Function { inputs, output } => {
                let value = match output {
                    Some(output) => self.infer_type(output)?,
                    None => parse_quote! { () },
                };
                Ok(parse_quote! { |#(_: #inputs),*| #value })
            }
            TypeDescriptor::TupleOf(elems) => {
                let values = elems
                    .into_iter()
                    .map(|elem| self.infer_type(elem))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(parse_quote! { (#(#values,)*) })
            }
            TypeDescriptor::FixedArray(elem) => {
                let value = self.infer_type(elem)?;
                Ok(parse_quote! { ::core::array::from_fn(|_| #value) })
            }
            TypeDescriptor::Borrowed(target) => match target {
                Type::Path(path) if path.qself.is_none() && path.path.is_ident("str") => {
                    Ok(parse_quote! { "" })
                }
                Type::Slice(_) => Ok(parse_quote! { &[] }),
                _ => Err(UnsupportedType::new(ty)),
            },
            TypeDescriptor::Unsupported => Err(UnsupportedType::new(ty)),
        }
    }

    fn nominal(
        &self,
        ty: &Type,
        path: &Path,
        ident: &Ident,
        args: &[&Type],
    ) -> Result<Expr, UnsupportedType> {
        if let Some(reason) = self.placeholder(path) {
            return Err(UnsupportedType::new(ty).because(reason));
        }

        match KnownType::from_str(&ident.to_string()) {
            Ok(known) => known.default_value(self, ty, args),
            Err(_) => Ok(parse_quote! { <#ty>::builder().build() }),
        }
    }

    /// Types that cannot be delegated to a builder: generic parameters of the
    /// record, and the record itself, spelled bare or from `crate`/`self`.
    fn placeholder(&self, path: &Path) -> Option<&'static str> {
        if path.leading_colon.is_some() {
            return None;
        }

        let first = &path.segments.first()?.ident;
        let last = &path.segments.last()?.ident;
        let local = path.segments.len() == 1 || first == "crate" || first == "self";
        if first == "Self" || (local && last == self.record) {
            Some("it refers back to the record being built")
        } else if self.type_params.iter().any(|param| first == *param) {
            Some("it is a generic parameter")
        } else {
            None
        }
    }

    fn first_argument(&self, ty: &Type, args: &[&Type]) -> Result<Expr, UnsupportedType> {
        match args.first() {
            Some(arg) => self.infer_type(arg),
            None => Err(UnsupportedType::new(ty).because("its type argument is missing")),
        }
    }
}

fn is_unsized(ty: &Type) -> bool {
    match ty {
        Type::Slice(_) => true,
        Type::Path(path) => path.qself.is_none() && path.path.is_ident("str"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use proc_macro2::TokenStream;
    use quote::quote;

    use super::*;

    fn norm(tokens: impl ToTokens) -> String {
        tokens
            .to_token_stream()
            .to_string()
            .split_whitespace()
            .collect()
    }

    fn infer(ty: Type) -> Result<String, String> {
        let record: Ident = parse_quote!(Node);
        let generics: Generics = parse_quote!(<'a, T: Clone>);
        Inference::new(&record, &generics)
            .infer(&ty, None)
            .map(norm)
            .map_err(|e| syn::Error::from(e).to_string())
    }

    fn infers(ty: Type, expected: TokenStream) {
        assert_eq!(infer(ty), Ok(norm(expected)));
    }

    #[test]
    fn explicit_default_wins() {
        let record: Ident = parse_quote!(Person);
        let generics = Generics::default();
        let engine = Inference::new(&record, &generics);
        let explicit: Expr = parse_quote!(Cat::named("Bob"));

        for ty in [parse_quote!(Cat), parse_quote!(u8), parse_quote!(*const u8)] {
            let value = engine.infer(&ty, Some(&explicit)).unwrap();
            assert_eq!(norm(value), norm(quote!(Cat::named("Bob"))));
        }
    }

    #[test]
    fn primitives_are_zero_constructed() {
        infers(parse_quote!(u8), quote!(<u8 as ::core::default::Default>::default()));
        infers(parse_quote!(bool), quote!(<bool as ::core::default::Default>::default()));
        infers(parse_quote!(f64), quote!(<f64 as ::core::default::Default>::default()));
        infers(
            parse_quote!(std::string::String),
            quote!(<std::string::String as ::core::default::Default>::default()),
        );
        infers(
            parse_quote!(Cow<'a, str>),
            quote!(<Cow<'a, str> as ::core::default::Default>::default()),
        );
    }

    #[test]
    fn canonical_literals() {
        infers(parse_quote!(Duration), quote!(<Duration>::ZERO));
        infers(parse_quote!(std::time::SystemTime), quote!(<std::time::SystemTime>::UNIX_EPOCH));
        infers(
            parse_quote!(DateTime<Utc>),
            quote!(<DateTime<Utc>>::from(::std::time::SystemTime::UNIX_EPOCH)),
        );
        infers(parse_quote!(uuid::Uuid), quote!(<uuid::Uuid>::nil()));
        infers(
            parse_quote!(Url),
            quote!(<Url>::parse("file:///").expect("the root file URL is valid")),
        );
        infers(parse_quote!(Ipv6Addr), quote!(<Ipv6Addr>::UNSPECIFIED));
        infers(parse_quote!(NonZeroUsize), quote!(<NonZeroUsize>::MIN));
    }

    #[test]
    fn collections_ignore_their_elements() {
        infers(
            parse_quote!(Vec<T>),
            quote!(<Vec<T> as ::core::default::Default>::default()),
        );
        infers(
            parse_quote!(BTreeMap<String, Node>),
            quote!(<BTreeMap<String, Node> as ::core::default::Default>::default()),
        );
    }

    #[test]
    fn optional_uses_inner_default() {
        infers(
            parse_quote!(Option<String>),
            quote!(::core::option::Option::Some(
                <String as ::core::default::Default>::default()
            )),
        );
    }

    #[test]
    fn optional_falls_back_to_none() {
        infers(parse_quote!(Option<T>), quote!(::core::option::Option::None));
        infers(parse_quote!(Option<Box<Node>>), quote!(::core::option::Option::None));
        infers(parse_quote!(Option<fn() -> !>), quote!(::core::option::Option::None));
    }

    #[test]
    fn pointers_propagate_failure() {
        infers(
            parse_quote!(std::rc::Rc<RefCell<u8>>),
            quote!(std::rc::Rc::new(RefCell::new(
                <u8 as ::core::default::Default>::default()
            ))),
        );
        infers(
            parse_quote!(Box<str>),
            quote!(<Box<str> as ::core::default::Default>::default()),
        );
        assert!(infer(parse_quote!(Box<T>)).is_err());
    }

    #[test]
    fn functions_return_default_output() {
        infers(
            parse_quote!(fn(u8, &str) -> bool),
            quote!(|_: u8, _: &str| <bool as ::core::default::Default>::default()),
        );
        infers(
            parse_quote!(Box<dyn Fn(u8) + Send>),
            quote!(Box::new(|_: u8| ())),
        );
        assert!(infer(parse_quote!(fn() -> T)).is_err());
    }

    #[test]
    fn tuples_and_arrays() {
        infers(parse_quote!(()), quote!(()));
        infers(
            parse_quote!((u8,)),
            quote!((<u8 as ::core::default::Default>::default(),)),
        );
        infers(
            parse_quote!((u8, Duration)),
            quote!((<u8 as ::core::default::Default>::default(), <Duration>::ZERO,)),
        );
        infers(
            parse_quote!([Duration; 40]),
            quote!(::core::array::from_fn(|_| <Duration>::ZERO)),
        );
        assert!(infer(parse_quote!((u8, T))).is_err());
    }

    #[test]
    fn references() {
        infers(parse_quote!(&'a str), quote!(""));
        infers(parse_quote!(&'static [u8]), quote!(&[]));
        assert!(infer(parse_quote!(&'a Node)).is_err());
    }

    #[test]
    fn ranges_recurse_into_their_bound() {
        infers(
            parse_quote!(Range<u8>),
            quote!((<u8 as ::core::default::Default>::default()
                .. <u8 as ::core::default::Default>::default())),
        );
        infers(
            parse_quote!(RangeInclusive<Duration>),
            quote!((<Duration>::ZERO ..= <Duration>::ZERO)),
        );
        assert_eq!(
            infer(parse_quote!(Range)),
            Err("cannot infer a default value for `Range` (its type argument is missing); \
                 specify one with `#[builder(default = \"...\")]`"
                .to_owned())
        );
    }

    #[test]
    fn result_uses_success_type() {
        infers(
            parse_quote!(Result<u8, String>),
            quote!(::core::result::Result::Ok(
                <u8 as ::core::default::Default>::default()
            )),
        );
        assert!(infer(parse_quote!(io::Result<T>)).is_err());
    }

    #[test]
    fn other_types_delegate_to_their_builder() {
        infers(parse_quote!(Cat), quote!(<Cat>::builder().build()));
        infers(
            parse_quote!(zoo::Pen<Cat>),
            quote!(<zoo::Pen<Cat>>::builder().build()),
        );
        infers(
            parse_quote!(::other::Node),
            quote!(<::other::Node>::builder().build()),
        );
    }

    #[test]
    fn placeholders_are_unsupported() {
        assert_eq!(
            infer(parse_quote!(T)),
            Err("cannot infer a default value for `T` (it is a generic parameter); \
                 specify one with `#[builder(default = \"...\")]`"
                .to_owned())
        );
        assert!(infer(parse_quote!(T::Output)).is_err());
        assert_eq!(
            infer(parse_quote!(Box<Self>)),
            Err("cannot infer a default value for `Self` (it refers back to the record \
                 being built); specify one with `#[builder(default = \"...\")]`"
                .to_owned())
        );
        assert!(infer(parse_quote!(Box<Node>)).is_err());
    }

    #[test]
    fn crate_and_self_paths_to_the_record_are_self_references() {
        infers(
            parse_quote!(Option<Box<crate::Node>>),
            quote!(::core::option::Option::None),
        );
        infers(
            parse_quote!(Option<Box<self::Node>>),
            quote!(::core::option::Option::None),
        );
        assert!(infer(parse_quote!(Box<crate::tree::Node>)).is_err());
        infers(
            parse_quote!(other::Node),
            quote!(<other::Node>::builder().build()),
        );
    }

    #[test]
    fn unsupported_types() {
        assert_eq!(
            infer(parse_quote!(*const u8)),
            Err("cannot infer a default value for `* const u8`; \
                 specify one with `#[builder(default = \"...\")]`"
                .to_owned())
        );
        assert!(infer(parse_quote!(&'a mut String)).is_err());
        assert!(infer(parse_quote!(dyn std::fmt::Debug)).is_err());
    }

    #[test]
    fn inference_is_deterministic() {
        let ty: Type = parse_quote!((Option<Vec<u8>>, fn(Cat) -> Range<u32>, [Uuid; 2]));
        assert_eq!(infer(ty.clone()), infer(ty));
    }
}
