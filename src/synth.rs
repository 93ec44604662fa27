use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{Expr, Ident};

use crate::{default::Inference, field::BuilderField, record::Record};

/// Method names the builder defines itself.
const RESERVED: [&str; 2] = ["new", "build"];

/// A field paired with the expression its slot starts from.
struct Slot<'a> {
    field: &'a BuilderField,
    default: Expr,
}

/// Everything needed to emit the builder of one record.
pub struct BuilderPlan<'a> {
    record: &'a Record<'a>,
    builder: Ident,
    slots: Vec<Slot<'a>>,
    setters: Vec<Option<Ident>>,
}

impl<'a> BuilderPlan<'a> {
    /// Infers a default for every field. Any failure rejects the whole
    /// record, with every failing field reported.
    pub fn resolve(record: &'a Record<'a>) -> syn::Result<Self> {
        let engine = Inference::new(record.ident, record.generics);
        let mut errors: Option<syn::Error> = None;
        let mut slots = Vec::with_capacity(record.fields.len());

        for field in &record.fields {
            match engine.infer(&field.ty, field.attr.default.as_ref()) {
                Ok(default) => slots.push(Slot { field, default }),
                Err(e) => push_error(&mut errors, e.into()),
            }
        }

        let setters: Vec<_> = record
            .fields
            .iter()
            .map(|field| field.setter(&record.attr))
            .collect();
        for (i, setter) in setters.iter().enumerate() {
            let Some(setter) = setter else { continue };
            if RESERVED.iter().any(|reserved| setter == reserved) {
                push_error(
                    &mut errors,
                    syn::Error::new(
                        setter.span(),
                        format!(
                            "setter `{setter}` collides with the builder's own `{setter}`; \
                             rename it with `#[builder(rename = \"...\")]`"
                        ),
                    ),
                );
            } else if setters[..i].iter().flatten().any(|other| other == setter) {
                push_error(
                    &mut errors,
                    syn::Error::new(setter.span(), format!("duplicate setter `{setter}`")),
                );
            }
        }

        if let Some(errors) = errors {
            return Err(errors);
        }

        let mut builder = format_ident!("{}Builder", record.ident);
        builder.set_span(record.ident.span());

        Ok(BuilderPlan {
            record,
            builder,
            slots,
            setters,
        })
    }
}

fn push_error(errors: &mut Option<syn::Error>, error: syn::Error) {
    match errors {
        Some(errors) => errors.combine(error),
        None => *errors = Some(error),
    }
}

impl ToTokens for BuilderPlan<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let ident = self.record.ident;
        let builder = &self.builder;
        let vis = &self.record.attr.vis;
        let (impl_generics, ty_generics, where_clause) = self.record.generics.split_for_impl();

        let stored: Vec<_> = self.slots.iter().filter(|s| !s.field.attr.skip).collect();

        // Skipped fields may be the only users of a generic parameter.
        let marker = (stored.len() < self.slots.len() && !self.record.generics.params.is_empty())
            .then(|| format_ident!("__prefab_marker"));
        let marker_field = marker.iter().map(|marker| {
            quote! { #marker: ::core::marker::PhantomData<fn() -> #ident #ty_generics> }
        });
        let marker_init = marker.iter().map(|marker| {
            quote! { #marker: ::core::marker::PhantomData }
        });

        let fields = stored.iter().map(|slot| {
            let ident = &slot.field.ident;
            let ty = &slot.field.ty;
            quote! { #ident: #ty }
        });

        let initial = stored.iter().map(|slot| {
            let ident = &slot.field.ident;
            let default = &slot.default;
            quote! { #ident: #default }
        });

        let functions = self
            .slots
            .iter()
            .zip(&self.setters)
            .filter_map(|(slot, setter)| Some((slot.field, setter.as_ref()?)))
            .map(|(field, setter)| {
                let ident = &field.ident;
                let ty = &field.ty;
                let (source, value) = if field.attr.into {
                    (
                        quote! { impl ::core::convert::Into<#ty> },
                        quote! { ::core::convert::Into::into(#ident) },
                    )
                } else {
                    (ty.to_token_stream(), ident.to_token_stream())
                };
                let doc = format!("Returns the builder with `{ident}` replaced.");

                quote! {
                    #[doc = #doc]
                    #[must_use]
                    #vis fn #setter(self, #ident: #source) -> Self {
                        Self {
                            #ident: #value,
                            ..self
                        }
                    }
                }
            });

        let build_fields = self.slots.iter().map(|slot| {
            let name = &slot.field.ident;
            if slot.field.attr.skip {
                let default = &slot.default;
                quote! { #name: #default }
            } else {
                quote! { #name: self.#name }
            }
        });

        let builder_doc = format!("Builder for [`{ident}`], starting from default field values.");

        tokens.extend(quote! {
            #[doc = #builder_doc]
            #vis struct #builder #impl_generics #where_clause {
                #(#fields,)*
                #(#marker_field,)*
            }

            impl #impl_generics #builder #ty_generics #where_clause {
                /// Creates a builder with every field at its default value.
                #vis fn new() -> Self {
                    Self {
                        #(#initial,)*
                        #(#marker_init,)*
                    }
                }

                #(#functions)*

                /// Builds the value from the current field values.
                #vis fn build(self) -> #ident #ty_generics {
                    #ident {
                        #(#build_fields,)*
                    }
                }
            }

            impl #impl_generics ::core::default::Default for #builder #ty_generics #where_clause {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl #impl_generics #ident #ty_generics #where_clause {
                /// Starts a builder with every field at its default value.
                #vis fn builder() -> #builder #ty_generics {
                    #builder::new()
                }
            }
        });
    }
}
