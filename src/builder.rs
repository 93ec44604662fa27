use strum::{IntoStaticStr, VariantArray};
use syn::{
    Attribute as SynAttribute, Ident, LitStr, Token, Visibility,
    parse::ParseStream,
};

#[derive(Clone, Copy, VariantArray, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum Attribute {
    Prefix,
    Suffix,
    Visibility,
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

/// Options given to `#[builder(...)]` on the record itself.
pub struct BuilderAttr {
    /// Prepended to every setter name.
    pub prefix: String,
    /// Appended to every setter name.
    pub suffix: String,
    /// Visibility of the builder type and all of its methods.
    pub vis: Visibility,
}

impl BuilderAttr {
    pub fn new(vis: Visibility) -> Self {
        Self {
            prefix: Default::default(),
            suffix: Default::default(),
            vis,
        }
    }

    /// Reads every `#[builder]` attribute on the record, starting from the
    /// record's own visibility.
    pub fn from_attrs(attrs: &[SynAttribute], vis: &Visibility) -> syn::Result<Self> {
        let mut out = Self::new(vis.clone());
        let mut seen = Seen::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("builder")) {
            attr.parse_args_with(|input: ParseStream| out.parse_into(input, &mut seen))?;
        }

        Ok(out)
    }

    fn parse_into(&mut self, input: ParseStream, seen: &mut Seen) -> syn::Result<()> {
        while input.peek(syn::Ident) {
            let ident = input.parse()?;
            match Attribute::parse(&ident)? {
                Attribute::Prefix => {
                    if seen.prefix {
                        bail!(ident.span() => "`prefix` may only be used once.");
                    }

                    let _: Token![=] = input.parse()?;
                    self.prefix = input.parse::<LitStr>()?.value();
                    seen.prefix = true;
                }
                Attribute::Suffix => {
                    if seen.suffix {
                        bail!(ident.span() => "`suffix` may only be used once.");
                    }

                    let _: Token![=] = input.parse()?;
                    self.suffix = input.parse::<LitStr>()?.value();
                    seen.suffix = true;
                }
                Attribute::Visibility => {
                    if seen.vis {
                        bail!(ident.span() => "`visibility` may only be used once.");
                    }

                    let _: Token![=] = input.parse()?;
                    let s: LitStr = input.parse()?;
                    self.vis = if s.value().trim().is_empty() {
                        Visibility::Inherited
                    } else {
                        s.parse()?
                    };
                    seen.vis = true;
                }
            }

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
}

#[derive(Default)]
struct Seen {
    prefix: bool,
    suffix: bool,
    vis: bool,
}
