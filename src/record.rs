use syn::{Data, DeriveInput, Fields, Generics, Ident, spanned::Spanned};

use crate::{
    builder::BuilderAttr,
    diagnostic::Diagnostic,
    field::{self, BuilderField},
};

/// A struct that a builder is generated for.
pub struct Record<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attr: BuilderAttr,
    /// Stored fields in declaration order.
    pub fields: Vec<BuilderField>,
}

impl<'a> TryFrom<&'a DeriveInput> for Record<'a> {
    type Error = syn::Error;

    fn try_from(input: &'a DeriveInput) -> Result<Self, Self::Error> {
        let data_struct = match &input.data {
            Data::Struct(data_struct) => data_struct,
            Data::Enum(data_enum) => {
                return Err(Diagnostic::RequiresStruct.at(data_enum.enum_token.span()));
            }
            Data::Union(data_union) => {
                return Err(Diagnostic::RequiresStruct.at(data_union.union_token.span()));
            }
        };

        let fields = match &data_struct.fields {
            Fields::Named(fields_named) => field::extract(fields_named)?,
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(Diagnostic::RequiresNamedFields.at(input.ident.span()));
            }
        };

        Ok(Record {
            ident: &input.ident,
            generics: &input.generics,
            attr: BuilderAttr::from_attrs(&input.attrs, &input.vis)?,
            fields,
        })
    }
}
