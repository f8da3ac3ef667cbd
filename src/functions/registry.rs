use super::UnaryOp;
use crate::Expr;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Definition of a unary function: its formula name and the derivative of
/// the function with respect to its argument.
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    pub name: &'static str,
    pub op: UnaryOp,
    /// `f'(u)` for `f(u)`; the caller multiplies by `u'`
    pub derivative: fn(&Expr) -> Expr,
}

static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let defs = super::definitions::all_definitions();
    let mut map = FxHashMap::with_capacity_and_hasher(defs.len(), Default::default());
    for def in defs {
        map.insert(def.name, def);
    }
    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Definition by formula name
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }

    /// Definition of an operator; every [`UnaryOp`] has one
    pub(crate) fn of(op: UnaryOp) -> &'static FunctionDefinition {
        let registry = REGISTRY.get_or_init(init_registry);
        &registry[op.name()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operator_is_registered() {
        for op in UnaryOp::ALL {
            assert_eq!(Registry::of(op).op, op);
        }
        assert!(Registry::get("gamma").is_none());
    }
}
