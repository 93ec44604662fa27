use quote::format_ident;
use strum::{IntoStaticStr, VariantArray};
use syn::{
    Expr, Field, FieldsNamed, Ident, LitStr, Token, Type, Visibility, parse::ParseStream,
    spanned::Spanned,
};

use crate::builder::BuilderAttr;

#[derive(Clone, Copy, PartialEq, Eq, VariantArray, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum Attribute {
    Default,
    Into,
    Rename,
    Skip,
    SkipPrefix,
    SkipSuffix,
}

impl Attribute {
    fn as_str(self) -> &'static str {
        self.into()
    }
}

impl AsRef<str> for Attribute {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Attribute {
    fn parse(ident: &Ident) -> syn::Result<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|e| ident == e)
            .ok_or_else(|| {
                syn::Error::new(
                    ident.span(),
                    format!(
                        "Unknown attribute '{}'.  Valid attributes are: '{}'",
                        ident,
                        Self::VARIANTS
                            .iter()
                            .map(|s| s.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })
    }
}

/// One stored member of the record, as seen by the builder.
pub struct BuilderField {
    pub ident: Ident,
    /// Kept for fidelity with the declaration; generation ignores it.
    #[allow(unused)]
    pub vis: Visibility,
    pub ty: Type,
    pub attr: FieldAttr,
}

#[derive(Default)]
pub struct FieldAttr {
    /// Explicit default, used verbatim in place of the inferred one.
    pub default: Option<Expr>,
    pub into: bool,
    pub rename: Option<Ident>,
    pub skip: bool,
    pub skip_prefix: bool,
    pub skip_suffix: bool,
    /// Attributes already given, with the span of their first use.
    seen: Vec<(Attribute, Ident)>,
}

impl FieldAttr {
    fn parse_into(&mut self, input: ParseStream) -> syn::Result<()> {
        while input.peek(syn::Ident) {
            let ident: Ident = input.parse()?;
            let attribute = Attribute::parse(&ident)?;
            if self.seen.iter().any(|(a, _)| *a == attribute) {
                bail!(ident.span() => "`{}` may only be used once.", attribute.as_str());
            }

            match attribute {
                Attribute::Default => {
                    let value: Expr = if input.peek(Token![=]) {
                        let _: Token![=] = input.parse()?;
                        if input.peek(LitStr) {
                            let s: LitStr = input.parse()?;
                            s.parse()?
                        } else {
                            input.parse()?
                        }
                    } else {
                        syn::parse_quote! { ::core::default::Default::default() }
                    };

                    self.default = Some(value);
                }
                Attribute::Into => self.into = true,
                Attribute::Rename => {
                    let _: Token![=] = input.parse()?;
                    let s: LitStr = input.parse()?;

                    self.rename = Some(s.parse()?);
                }
                Attribute::Skip => self.skip = true,
                Attribute::SkipPrefix => self.skip_prefix = true,
                Attribute::SkipSuffix => self.skip_suffix = true,
            }
            self.seen.push((attribute, ident));

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        if !input.is_empty() {
            return Err(input.error("expected a builder attribute"));
        }

        Ok(())
    }

    /// `skip` removes the setter, so setter options make no sense next to it.
    fn check(&self) -> syn::Result<()> {
        if !self.skip {
            return Ok(());
        }

        let conflicts = [
            Attribute::Into,
            Attribute::Rename,
            Attribute::SkipPrefix,
            Attribute::SkipSuffix,
        ];
        if let Some((attribute, ident)) = self.seen.iter().find(|(a, _)| conflicts.contains(a)) {
            bail!(ident.span() => "`{}` cannot be combined with `skip`", attribute.as_str());
        }

        Ok(())
    }
}

impl TryFrom<&Field> for BuilderField {
    type Error = syn::Error;

    fn try_from(value: &Field) -> Result<Self, Self::Error> {
        let Some(ident) = value.ident.as_ref() else {
            bail!(value.ty.span() => "builder fields must be named");
        };

        let mut attr = FieldAttr::default();
        for builder_attr in value.attrs.iter().filter(|a| a.path().is_ident("builder")) {
            builder_attr.parse_args_with(|input: ParseStream| attr.parse_into(input))?;
        }
        attr.check()?;

        Ok(BuilderField {
            ident: ident.clone(),
            vis: value.vis.clone(),
            ty: value.ty.clone(),
            attr,
        })
    }
}

impl BuilderField {
    /// Name of the chained setter for this field, or `None` when skipped.
    pub fn setter(&self, builder: &BuilderAttr) -> Option<Ident> {
        if self.attr.skip {
            return None;
        }

        let base = self.attr.rename.as_ref().unwrap_or(&self.ident);
        let prefix = if self.attr.skip_prefix { "" } else { &builder.prefix };
        let suffix = if self.attr.skip_suffix { "" } else { &builder.suffix };

        if prefix.is_empty() && suffix.is_empty() {
            Some(base.clone())
        } else {
            let mut ident = format_ident!("{}{}{}", prefix, base, suffix);
            ident.set_span(base.span());
            Some(ident)
        }
    }
}

/// Collects the named fields of a record in declaration order.
pub fn extract(fields: &FieldsNamed) -> syn::Result<Vec<BuilderField>> {
    fields.named.iter().map(BuilderField::try_from).collect()
}

#[cfg(test)]
mod tests {
    use quote::ToTokens;
    use syn::{FieldsNamed, parse_quote};

    use super::*;

    fn fields(input: FieldsNamed) -> Vec<BuilderField> {
        extract(&input).unwrap()
    }

    fn error(input: FieldsNamed) -> String {
        match extract(&input) {
            Ok(_) => panic!("fields were accepted"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn keeps_declaration_order() {
        let fields = fields(parse_quote!({ zeta: u8, alpha: String, mid: Option<u8> }));
        let names: Vec<_> = fields.iter().map(|f| f.ident.to_string()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn default_accepts_string_and_expression() {
        let fields = fields(parse_quote!({
            #[builder(default = "Cat::named(\"Bob\")")]
            a: Cat,
            #[builder(default = 42)]
            b: u32,
            #[builder(default)]
            c: u32,
        }));

        let defaults: Vec<_> = fields
            .iter()
            .map(|f| f.attr.default.to_token_stream().to_string())
            .collect();
        assert_eq!(
            defaults,
            [
                "Cat :: named (\"Bob\")",
                "42",
                ":: core :: default :: Default :: default ()",
            ]
        );
    }

    #[test]
    fn merges_multiple_attributes() {
        let fields = fields(parse_quote!({
            #[builder(into)]
            #[builder(rename = "label")]
            name: String,
        }));

        assert!(fields[0].attr.into);
        assert_eq!(fields[0].attr.rename.as_ref().unwrap(), "label");
    }

    #[test]
    fn rejects_repeated_attribute() {
        assert_eq!(
            error(parse_quote!({
                #[builder(default = "1", default = "2")]
                a: u32,
            })),
            "`default` may only be used once."
        );
        assert_eq!(
            error(parse_quote!({
                #[builder(into)]
                #[builder(into)]
                a: String,
            })),
            "`into` may only be used once."
        );
    }

    #[test]
    fn rejects_setter_options_on_skipped_field() {
        assert_eq!(
            error(parse_quote!({
                #[builder(skip, into)]
                a: String,
            })),
            "`into` cannot be combined with `skip`"
        );
    }

    #[test]
    fn rejects_unknown_attribute() {
        assert_eq!(
            error(parse_quote!({
                #[builder(repeat)]
                a: Vec<u8>,
            })),
            "Unknown attribute 'repeat'.  Valid attributes are: \
             'default, into, rename, skip, skip_prefix, skip_suffix'"
        );
    }

    #[test]
    fn setter_names() {
        let attrs: Vec<syn::Attribute> =
            vec![parse_quote!(#[builder(prefix = "with_", suffix = "_v")])];
        let builder = BuilderAttr::from_attrs(&attrs, &Visibility::Inherited).unwrap();
        let fields = fields(parse_quote!({
            plain: u8,
            #[builder(skip_prefix)]
            no_prefix: u8,
            #[builder(skip_suffix, rename = "other")]
            renamed: u8,
            #[builder(skip)]
            hidden: u8,
        }));

        let setters: Vec<_> = fields
            .iter()
            .map(|f| f.setter(&builder).map(|s| s.to_string()))
            .collect();
        assert_eq!(
            setters,
            [
                Some("with_plain_v".to_owned()),
                Some("no_prefix_v".to_owned()),
                Some("with_other".to_owned()),
                None,
            ]
        );
    }

    #[test]
    fn raw_identifier_setter_without_affixes() {
        let builder = BuilderAttr::new(Visibility::Inherited);
        let fields = fields(parse_quote!({ r#type: u8 }));
        assert_eq!(fields[0].setter(&builder).unwrap().to_string(), "r#type");
    }
}
