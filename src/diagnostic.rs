use proc_macro2::Span;

/// Structural problems with the item `Builder` is derived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// Derived on an `enum` or a `union`.
    RequiresStruct,
    /// Derived on a tuple struct, whose fields have no names for setters.
    RequiresNamedFields,
}

impl Diagnostic {
    pub const fn message(self) -> &'static str {
        match self {
            Diagnostic::RequiresStruct => "builder generation requires a struct/record declaration",
            Diagnostic::RequiresNamedFields => {
                "builder generation requires a struct with named fields"
            }
        }
    }

    pub fn at(self, span: Span) -> syn::Error {
        syn::Error::new(span, self.message())
    }
}
