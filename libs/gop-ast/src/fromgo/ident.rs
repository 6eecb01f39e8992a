//! # Identifier Conversion
//!
//! Converted identifiers keep their binding: when the Go identifier was
//! resolved, the Go+ identifier gets an [`Object`] whose payload is the
//! Go identifier itself. [`check_ident`] reads that payload back.

use crate::ast::{Ident, ObjKind, Object};
use go_parser::ast as go;
use std::any::Any;
use std::sync::Arc;

/// Convert an identifier, carrying its binding along.
pub fn gop_ident(v: &go::Ident) -> Ident {
    let obj = v.obj.as_ref().map(|obj| {
        let data: Arc<dyn Any + Send + Sync> = Arc::new(v.clone());
        Arc::new(Object {
            kind: gop_obj_kind(obj.kind),
            name: obj.name.clone(),
            decl: obj.decl,
            data: Some(data),
        })
    });
    Ident {
        name_pos: v.name_pos,
        name: v.name.clone(),
        obj,
    }
}

pub(crate) fn gop_idents(list: &[go::Ident]) -> Vec<Ident> {
    list.iter().map(gop_ident).collect()
}

/// Find the Go identifier a converted identifier was made from.
///
/// ## Returns
///
/// `Some` when the identifier is bound to an object whose payload is a
/// Go identifier; the binding itself is then `ident.obj`. `None` when
/// there is no object or the payload has any other shape.
///
/// ## Example
///
/// ```rust
/// use gop_ast::ast::Ident;
/// use gop_ast::fromgo::check_ident;
///
/// assert!(check_ident(&Ident::new("x")).is_none());
/// ```
pub fn check_ident(v: &Ident) -> Option<&go::Ident> {
    v.obj.as_ref()?.data.as_deref()?.downcast_ref::<go::Ident>()
}

fn gop_obj_kind(kind: go::ObjKind) -> ObjKind {
    match kind {
        go::ObjKind::Bad => ObjKind::Bad,
        go::ObjKind::Pkg => ObjKind::Pkg,
        go::ObjKind::Con => ObjKind::Con,
        go::ObjKind::Typ => ObjKind::Typ,
        go::ObjKind::Var => ObjKind::Var,
        go::ObjKind::Fun => ObjKind::Fun,
        go::ObjKind::Lbl => ObjKind::Lbl,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use go_parser::span::Pos;

    #[test]
    fn test_unbound_ident_is_not_found() {
        assert!(check_ident(&Ident::new("x")).is_none());
    }

    #[test]
    fn test_ident_payload_is_found() {
        let mut obj = Object::new(ObjKind::Bad, "");
        obj.data = Some(Arc::new(go::Ident::new(Pos::NONE, "")));
        let ident = Ident {
            name_pos: Pos::NONE,
            name: String::new(),
            obj: Some(Arc::new(obj)),
        };
        assert!(check_ident(&ident).is_some());
    }

    #[test]
    fn test_other_payload_is_not_found() {
        let mut obj = Object::new(ObjKind::Var, "x");
        obj.data = Some(Arc::new(String::from("x")));
        let ident = Ident {
            name_pos: Pos::NONE,
            name: "x".into(),
            obj: Some(Arc::new(obj)),
        };
        assert!(check_ident(&ident).is_none());
    }

    #[test]
    fn test_object_without_payload_is_not_found() {
        let ident = Ident {
            name_pos: Pos::NONE,
            name: "x".into(),
            obj: Some(Arc::new(Object::new(ObjKind::Var, "x"))),
        };
        assert!(check_ident(&ident).is_none());
    }

    #[test]
    fn test_binding_is_carried() {
        let mut base = go::Ident::new(Pos::from_offset(7), "count");
        base.obj = Some(Arc::new(go::Object::new(
            go::ObjKind::Var,
            "count",
            Pos::from_offset(2),
        )));
        let ident = gop_ident(&base);
        assert_eq!(ident.name, "count");
        assert_eq!(ident.name_pos, Pos::from_offset(7));

        let obj = ident.obj.as_ref().unwrap();
        assert_eq!(obj.kind, ObjKind::Var);
        assert_eq!(obj.decl, Pos::from_offset(2));
        assert_eq!(check_ident(&ident), Some(&base));
    }

    #[test]
    fn test_unbound_base_ident_stays_unbound() {
        let ident = gop_ident(&go::Ident::new(Pos::from_offset(0), "int"));
        assert!(ident.obj.is_none());
    }
}
