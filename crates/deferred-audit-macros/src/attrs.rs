//! Parsing of `#[audit(...)]` container attributes.

use syn::parse::Parse;
use syn::{Attribute, LitStr, Member, Token};

/// How a type takes part in checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Structural,
    Shallow,
    Deep,
    Exempt,
}

impl Mode {
    fn keyword(self) -> &'static str {
        match self {
            Mode::Structural => "structural",
            Mode::Shallow => "shallow",
            Mode::Deep => "deep",
            Mode::Exempt => "exempt",
        }
    }
}

/// Parsed container attributes.
#[derive(Debug)]
pub struct AuditArgs {
    pub mode: Mode,
    /// Display name override.
    pub name: Option<LitStr>,
    /// Fields that may remain deferred, as written (for error spans).
    pub allow: Vec<Member>,
}

pub fn parse_audit_attrs(attrs: &[Attribute]) -> syn::Result<AuditArgs> {
    let mut mode: Option<Mode> = None;
    let mut name = None;
    let mut allow = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("audit") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let selected = if meta.path.is_ident("shallow") {
                Some(Mode::Shallow)
            } else if meta.path.is_ident("deep") {
                Some(Mode::Deep)
            } else if meta.path.is_ident("exempt") {
                Some(Mode::Exempt)
            } else {
                None
            };

            if let Some(selected) = selected {
                if let Some(previous) = mode {
                    return Err(meta.error(format!(
                        "audit: `{}` conflicts with `{}`; choose one mode",
                        selected.keyword(),
                        previous.keyword(),
                    )));
                }
                mode = Some(selected);
                return Ok(());
            }

            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(syn::Error::new_spanned(
                        value,
                        "audit: `name` must not be empty",
                    ));
                }
                name = Some(value);
                return Ok(());
            }

            if meta.path.is_ident("allow") {
                // Members rather than paths, so positional fields (`0`) parse too.
                let content;
                syn::parenthesized!(content in meta.input);
                let members = content.parse_terminated(Member::parse, Token![,])?;
                allow.extend(members);
                return Ok(());
            }

            let key = meta
                .path
                .get_ident()
                .map(|ident| ident.to_string())
                .unwrap_or_else(|| "<path>".to_string());
            Err(meta.error(format!("audit: unknown attribute `{key}`")))
        })?;
    }

    let mode = mode.unwrap_or(Mode::Structural);
    if mode != Mode::Structural {
        if let Some(first) = allow.first() {
            return Err(syn::Error::new_spanned(
                first,
                format!(
                    "audit: `allow` only applies to structural participation, not `{}`",
                    mode.keyword()
                ),
            ));
        }
    }

    Ok(AuditArgs { mode, name, allow })
}
