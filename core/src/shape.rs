#![deny(missing_docs)]

//! # List Shape Classification
//!
//! Proplist fields are emitted either as `Vec<T>` (required) or as
//! `Option<Vec<T>>` (optional). The patch engine needs to know which one it is
//! looking at, and the element type `T`, to synthesize correct code.

use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasGenericArgs};
use ra_ap_syntax::{AstNode, SourceFile};

/// The two recognized declarations of a proplist field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListShape {
    /// `Vec<T>`: the list must be present; an empty list is a mistake.
    Required(String),
    /// `Option<Vec<T>>`: `None` means "no list".
    Optional(String),
}

impl ListShape {
    /// Source text of the element type `T`.
    pub fn item_type(&self) -> &str {
        match self {
            ListShape::Required(t) | ListShape::Optional(t) => t,
        }
    }

    /// Whether the field is declared without an `Option` wrapper.
    pub fn is_required(&self) -> bool {
        matches!(self, ListShape::Required(_))
    }

    /// Expression iterating over `&T` for `self.<field>`.
    ///
    /// An absent optional list iterates as empty.
    pub fn iter_expr(&self, field: &str) -> String {
        match self {
            ListShape::Required(_) => format!("self.{}.iter()", field),
            ListShape::Optional(_) => format!("self.{}.iter().flatten()", field),
        }
    }
}

/// Classifies a declared field type. `None` means the shape is not supported.
pub fn classify_list_type(ty: &ast::Type) -> Option<ListShape> {
    if let Some(item) = unwrap_generic(ty, "Vec") {
        return Some(ListShape::Required(item.syntax().text().to_string()));
    }

    let inner = unwrap_generic(ty, "Option")?;
    let item = unwrap_generic(&inner, "Vec")?;
    Some(ListShape::Optional(item.syntax().text().to_string()))
}

/// Classifies a type written as source text, e.g. `Option<Vec<Container>>`.
pub fn classify_type_text(ty: &str) -> Option<ListShape> {
    let wrapper = format!("type Probe = {};", ty);
    let parse = SourceFile::parse(&wrapper, Edition::Edition2021);
    if !parse.errors().is_empty() {
        return None;
    }
    let alias = parse
        .tree()
        .syntax()
        .descendants()
        .find_map(ast::TypeAlias::cast)?;
    classify_list_type(&alias.ty()?)
}

/// Returns `T` when `ty` is `<name><T>` (possibly path-qualified).
fn unwrap_generic(ty: &ast::Type, name: &str) -> Option<ast::Type> {
    let ast::Type::PathType(path_type) = ty else {
        return None;
    };
    let segment = path_type.path()?.segment()?;
    if segment.name_ref()?.text() != name {
        return None;
    }

    let mut args = segment.generic_arg_list()?.generic_args();
    let first = args.next()?;
    if args.next().is_some() {
        return None;
    }

    match first {
        ast::GenericArg::TypeArg(type_arg) => type_arg.ty(),
        _ => None,
    }
}
