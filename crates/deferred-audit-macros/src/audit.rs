//! Implementation of #[derive(Audit)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, Generics, Ident, Index, Member};

use crate::attrs::{parse_audit_attrs, AuditArgs, Mode};

pub fn derive_audit_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct FieldInfo {
    /// Name used in shapes and exemptions ("0", "1", … for positional fields).
    name: String,
    member: Member,
    /// Pattern binding inside enum arms.
    binding: Ident,
    exempt: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Named,
    Unnamed,
    Unit,
}

struct VariantInfo<'a> {
    ident: &'a Ident,
    style: Style,
    fields: Vec<FieldInfo>,
}

enum Body<'a> {
    Struct { style: Style, fields: Vec<FieldInfo> },
    Enum { variants: Vec<VariantInfo<'a>> },
}

impl Body<'_> {
    fn fields_mut(&mut self) -> Box<dyn Iterator<Item = &mut FieldInfo> + '_> {
        match self {
            Body::Struct { fields, .. } => Box::new(fields.iter_mut()),
            Body::Enum { variants } => Box::new(variants.iter_mut().flat_map(|v| v.fields.iter_mut())),
        }
    }

    /// Every distinct field name, in first-declared order.
    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |field: &FieldInfo| {
            if !names.contains(&field.name) {
                names.push(field.name.clone());
            }
        };
        match self {
            Body::Struct { fields, .. } => fields.iter().for_each(&mut push),
            Body::Enum { variants } => variants
                .iter()
                .flat_map(|v| v.fields.iter())
                .for_each(&mut push),
        }
        names
    }
}

fn style_of(fields: &Fields) -> Style {
    match fields {
        Fields::Named(_) => Style::Named,
        Fields::Unnamed(_) => Style::Unnamed,
        Fields::Unit => Style::Unit,
    }
}

fn collect_fields(fields: &Fields) -> Vec<FieldInfo> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| match &field.ident {
            Some(ident) => {
                let name = ident.unraw().to_string();
                FieldInfo {
                    binding: format_ident!("__audit_{}", name),
                    name,
                    member: Member::Named(ident.clone()),
                    exempt: false,
                }
            }
            None => FieldInfo {
                name: i.to_string(),
                member: Member::Unnamed(Index::from(i)),
                binding: format_ident!("__audit_{}", i),
                exempt: false,
            },
        })
        .collect()
}

fn member_name(member: &Member) -> String {
    match member {
        Member::Named(ident) => ident.unraw().to_string(),
        Member::Unnamed(index) => index.index.to_string(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let args = parse_audit_attrs(&input.attrs)?;
    let ident = &input.ident;

    let mut body = match &input.data {
        Data::Struct(data) => Body::Struct {
            style: style_of(&data.fields),
            fields: collect_fields(&data.fields),
        },
        Data::Enum(data) => Body::Enum {
            variants: data
                .variants
                .iter()
                .map(|variant| VariantInfo {
                    ident: &variant.ident,
                    style: style_of(&variant.fields),
                    fields: collect_fields(&variant.fields),
                })
                .collect(),
        },
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Audit cannot be derived for unions: the active field is unknown",
            ));
        }
    };

    // Exemptions must name real fields; a typo is a build error.
    let field_names = body.field_names();
    let mut allowed: Vec<String> = Vec::new();
    for member in &args.allow {
        let name = member_name(member);
        if !field_names.contains(&name) {
            return Err(syn::Error::new_spanned(
                member,
                format!("audit: `{name}` is not a field of `{ident}`, so it cannot be exempted"),
            ));
        }
        if !allowed.contains(&name) {
            allowed.push(name);
        }
    }

    for field in body.fields_mut() {
        field.exempt = args.mode == Mode::Exempt || allowed.contains(&field.name);
    }

    let display = args
        .name
        .as_ref()
        .map(|lit| lit.value())
        .unwrap_or_else(|| ident.unraw().to_string());

    let generics = match args.mode {
        Mode::Structural => with_bounds(&input.generics, quote!(::deferred_audit::Audit)),
        Mode::Deep => with_bounds(&input.generics, quote!(::deferred_audit::Cell)),
        Mode::Shallow | Mode::Exempt => input.generics.clone(),
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let children = children_body(&body, args.mode);
    let audit_body = match args.mode {
        Mode::Structural | Mode::Exempt => quote! {
            ::deferred_audit::dispatch::structural(self, trail)
        },
        Mode::Deep => quote! {
            ::deferred_audit::deep::audit_deep(self, trail)
        },
        Mode::Shallow => quote! {
            let _ = trail;
            ::std::result::Result::Ok(::std::option::Option::None)
        },
    };

    let shaped_impl = match args.mode {
        Mode::Structural | Mode::Exempt => {
            let alternatives: Vec<String> = match &body {
                Body::Struct { .. } => Vec::new(),
                Body::Enum { variants } => variants.iter().map(|v| v.ident.unraw().to_string()).collect(),
            };
            let exemptions = exemptions_tokens(&args, &allowed);
            let shape = shape_body(&body);
            quote! {
                impl #impl_generics ::deferred_audit::Shaped for #ident #ty_generics #where_clause {
                    const FIELDS: &'static [&'static str] = &[#(#field_names),*];
                    const ALTERNATIVES: &'static [&'static str] = &[#(#alternatives),*];
                    const EXEMPTIONS: ::deferred_audit::Exemptions = #exemptions;

                    fn shape(&self) -> ::deferred_audit::Shape<'_> {
                        #shape
                    }
                }
            }
        }
        Mode::Shallow | Mode::Deep => quote! {},
    };

    Ok(quote! {
        impl #impl_generics ::deferred_audit::Cell for #ident #ty_generics #where_clause {
            fn children(&self) -> ::std::vec::Vec<&dyn ::deferred_audit::Cell> {
                #children
            }
        }

        impl #impl_generics ::deferred_audit::Audit for #ident #ty_generics #where_clause {
            fn type_name() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#display)
            }

            fn audit(&self, trail: &::deferred_audit::Trail<'_>) -> ::deferred_audit::CheckResult {
                #audit_body
            }
        }

        #shaped_impl
    })
}

fn with_bounds(generics: &Generics, bound: TokenStream2) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote!(#param: #bound));
    }
    generics
}

fn exemptions_tokens(args: &AuditArgs, allowed: &[String]) -> TokenStream2 {
    if args.mode == Mode::Exempt {
        quote!(::deferred_audit::Exemptions::Everything)
    } else if allowed.is_empty() {
        quote!(::deferred_audit::Exemptions::Nothing)
    } else {
        quote!(::deferred_audit::Exemptions::fields(Self::FIELDS, &[#(#allowed),*]))
    }
}

/// Enum arm pattern binding the fields selected by `bind`, ignoring the rest.
fn variant_pattern(variant: &VariantInfo<'_>, bind: impl Fn(&FieldInfo) -> bool) -> TokenStream2 {
    let ident = variant.ident;
    match variant.style {
        Style::Named => {
            let parts = variant.fields.iter().map(|field| {
                let member = &field.member;
                if bind(field) {
                    let binding = &field.binding;
                    quote!(#member: #binding)
                } else {
                    quote!(#member: _)
                }
            });
            quote!(Self::#ident { #(#parts),* })
        }
        Style::Unnamed => {
            let parts = variant.fields.iter().map(|field| {
                if bind(field) {
                    let binding = &field.binding;
                    quote!(#binding)
                } else {
                    quote!(_)
                }
            });
            quote!(Self::#ident( #(#parts),* ))
        }
        Style::Unit => quote!(Self::#ident),
    }
}

fn children_body(body: &Body<'_>, mode: Mode) -> TokenStream2 {
    // Exemptions are dispatcher policy; deep inspection still reaches every field.
    let include = |_: &FieldInfo| match mode {
        Mode::Structural | Mode::Deep => true,
        Mode::Shallow | Mode::Exempt => false,
    };

    match body {
        Body::Struct { fields, .. } => {
            let items = fields.iter().filter(|f| include(*f)).map(|field| {
                let member = &field.member;
                quote!(&self.#member as &dyn ::deferred_audit::Cell)
            });
            quote!(::std::vec![#(#items),*])
        }
        Body::Enum { variants } if variants.is_empty() => quote!(match *self {}),
        Body::Enum { variants } => {
            let arms = variants.iter().map(|variant| {
                let pattern = variant_pattern(variant, include);
                let items = variant.fields.iter().filter(|f| include(*f)).map(|field| {
                    let binding = &field.binding;
                    quote!(#binding as &dyn ::deferred_audit::Cell)
                });
                quote!(#pattern => ::std::vec![#(#items),*],)
            });
            quote!(match self { #(#arms)* })
        }
    }
}

fn field_tokens(field: &FieldInfo, value: TokenStream2) -> TokenStream2 {
    let name = &field.name;
    if field.exempt {
        quote!(::deferred_audit::Field::exempt(#name))
    } else {
        quote!(::deferred_audit::Field::new(#name, #value))
    }
}

fn shape_body(body: &Body<'_>) -> TokenStream2 {
    match body {
        Body::Struct { style: Style::Unit, .. } => quote!(::deferred_audit::Shape::Leaf),
        Body::Struct { fields, .. } if fields.is_empty() => quote!(::deferred_audit::Shape::Leaf),
        Body::Struct { fields, .. } => {
            let items = fields.iter().map(|field| {
                let member = &field.member;
                field_tokens(field, quote!(&self.#member))
            });
            quote!(::deferred_audit::Shape::Product(::std::vec![#(#items),*]))
        }
        Body::Enum { variants } if variants.is_empty() => quote!(match *self {}),
        Body::Enum { variants } => {
            let arms = variants.iter().map(|variant| {
                let pattern = variant_pattern(variant, |field| !field.exempt);
                let name = variant.ident.unraw().to_string();
                let items = variant.fields.iter().map(|field| {
                    let binding = &field.binding;
                    field_tokens(field, quote!(#binding))
                });
                quote! {
                    #pattern => ::deferred_audit::Shape::Sum(
                        ::deferred_audit::Alternative::new(#name, ::std::vec![#(#items),*]),
                    ),
                }
            });
            quote!(match self { #(#arms)* })
        }
    }
}
