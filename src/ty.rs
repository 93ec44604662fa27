//! Classification of field types into the shapes the default inference
//! engine knows how to handle.

use syn::{GenericArgument, Ident, Path, PathArguments, ReturnType, Type, TypeParamBound};

/// Owning wrappers whose value is fully determined by the value they hold.
const POINTERS: [&str; 7] = ["Box", "Rc", "Arc", "Cell", "RefCell", "Mutex", "RwLock"];

/// Growable sequences and sets, empty by default whatever they hold.
const SEQUENCES: [&str; 6] = [
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "BinaryHeap",
];

const MAPS: [&str; 2] = ["HashMap", "BTreeMap"];

const FN_TRAITS: [&str; 3] = ["Fn", "FnMut", "FnOnce"];

/// The structural shape of a field type.
///
/// Every variant borrows from the `syn::Type` it was classified from, so the
/// engine can splice the user's own spelling of a type back into the
/// generated code.
pub enum TypeDescriptor<'a> {
    /// A named type such as `String`, `Cat` or `Range<u8>`.
    Nominal {
        path: &'a Path,
        ident: &'a Ident,
        args: Vec<&'a Type>,
    },
    /// `Option<T>`.
    Optional(&'a Type),
    /// A transparent wrapper such as `Box<T>`, built with `Wrapper::new`.
    Pointer {
        /// The wrapper's path with the generic arguments of its last segment
        /// removed, so unsizing coercions still apply to `new`'s argument.
        constructor: Path,
        inner: &'a Type,
    },
    /// `Vec<T>` and the other sequence and set collections.
    ArrayOf,
    /// `HashMap<K, V>` and `BTreeMap<K, V>`.
    MapOf,
    /// `[T; N]`, holding the element type.
    FixedArray(&'a Type),
    /// `(A, B, ...)`, including `()`.
    TupleOf(Vec<&'a Type>),
    /// `fn(A) -> R` or `dyn Fn(A) -> R`; a missing output is `()`.
    Function {
        inputs: Vec<&'a Type>,
        output: Option<&'a Type>,
    },
    /// A shared reference `&T`.
    Borrowed(&'a Type),
    /// Anything the engine has no rule for.
    Unsupported,
}

impl<'a> TypeDescriptor<'a> {
    pub fn classify(ty: &'a Type) -> Self {
        match ty {
            Type::Paren(paren) => Self::classify(&paren.elem),
            Type::Group(group) => Self::classify(&group.elem),
            Type::Path(path) if path.qself.is_none() => Self::classify_path(&path.path),
            Type::Array(array) => Self::FixedArray(&array.elem),
            Type::Tuple(tuple) => Self::TupleOf(tuple.elems.iter().collect()),
            Type::BareFn(bare_fn) => Self::Function {
                inputs: bare_fn.inputs.iter().map(|arg| &arg.ty).collect(),
                output: return_type(&bare_fn.output),
            },
            Type::TraitObject(object) => object
                .bounds
                .iter()
                .find_map(|bound| match bound {
                    TypeParamBound::Trait(bound) => fn_signature(&bound.path),
                    _ => None,
                })
                .unwrap_or(Self::Unsupported),
            Type::Reference(reference) if reference.mutability.is_none() => {
                Self::Borrowed(&reference.elem)
            }
            _ => Self::Unsupported,
        }
    }

    fn classify_path(path: &'a Path) -> Self {
        let Some(last) = path.segments.last() else {
            return Self::Unsupported;
        };
        let name = last.ident.to_string();
        let args = generic_types(&last.arguments);
        let single = match args.as_slice() {
            &[inner] => Some(inner),
            _ => None,
        };

        match (name.as_str(), single) {
            ("Option", Some(inner)) => Self::Optional(inner),
            (pointer, Some(inner)) if POINTERS.contains(&pointer) => {
                let mut constructor = path.clone();
                if let Some(last) = constructor.segments.last_mut() {
                    last.arguments = PathArguments::None;
                }
                Self::Pointer { constructor, inner }
            }
            (sequence, _) if SEQUENCES.contains(&sequence) => Self::ArrayOf,
            (map, _) if MAPS.contains(&map) => Self::MapOf,
            _ => Self::Nominal {
                path,
                ident: &last.ident,
                args,
            },
        }
    }
}

/// The type arguments of a path segment, ignoring lifetimes and constants.
fn generic_types(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn fn_signature(path: &Path) -> Option<TypeDescriptor<'_>> {
    let last = path.segments.last()?;
    if !FN_TRAITS.contains(&last.ident.to_string().as_str()) {
        return None;
    }

    let PathArguments::Parenthesized(args) = &last.arguments else {
        return None;
    };

    Some(TypeDescriptor::Function {
        inputs: args.inputs.iter().collect(),
        output: return_type(&args.output),
    })
}

fn return_type(output: &ReturnType) -> Option<&Type> {
    match output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(&**ty),
    }
}
