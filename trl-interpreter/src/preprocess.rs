//! Merging and AC flattening of type definitions.
//!
//! AC terms are kept flat: `add[add[1,2],3]` is `add[1,2,3]`. A type shape
//! `add[$sum,$n]` where `$sum` itself accepts `add[...]` shapes therefore
//! never matches as written, and is expanded into one shape per `add`
//! shape of `$sum` with `$sum`'s arguments spliced in. Expansion repeats
//! until the table stops changing.

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use trl_terms::{TypeDefinition, TypeName, TypeShape};

/// Type name to accepted shapes, one entry per distinct name.
pub(crate) type TypeTable = IndexMap<TypeName, IndexSet<TypeShape>>;

/// Merges repeated declarations of the same type name and removes
/// duplicate shapes.
pub(crate) fn merge_type_definitions<'a>(
    definitions: impl IntoIterator<Item = &'a TypeDefinition>,
) -> TypeTable {
    let mut table = TypeTable::new();
    for def in definitions {
        table
            .entry(def.name.clone())
            .or_default()
            .extend(def.accepted.iter().cloned());
    }
    table
}

/// Expands AC shapes whose argument types accept AC shapes of the same
/// name, repeating until no shape changes.
///
/// Cyclic AC type graphs are rejected by validation; for them the
/// expansion is cut off after a bounded number of rounds.
pub(crate) fn flatten_ac_types(mut table: TypeTable) -> TypeTable {
    let max_rounds = table.len() + 2;
    for round in 0..max_rounds {
        let next = flatten_round(&table);
        if next == table {
            debug!("AC type flattening converged after {round} round(s)");
            return next;
        }
        table = next;
    }
    warn!("AC type flattening did not converge after {max_rounds} rounds");
    table
}

fn flatten_round(table: &TypeTable) -> TypeTable {
    table
        .iter()
        .map(|(parent, shapes)| {
            let mut next = IndexSet::new();
            for shape in shapes {
                match expand_ac_shape(table, shape) {
                    Some(copies) => next.extend(copies),
                    None => {
                        next.insert(shape.clone());
                    }
                }
            }
            (parent.clone(), next)
        })
        .collect()
}

/// Splices the same-named AC shapes of the first expandable argument type
/// into `shape`. The shape itself is kept alongside the copies when the
/// argument type also accepts other shapes.
fn expand_ac_shape(table: &TypeTable, shape: &TypeShape) -> Option<Vec<TypeShape>> {
    let TypeShape::Ac { name, args } = shape else {
        return None;
    };
    for (index, (arg_type, card)) in args.iter().enumerate() {
        let Some(accepted) = table.get(arg_type) else {
            continue;
        };
        let same_name = same_name_ac_args(accepted, name);
        if same_name.is_empty() {
            continue;
        }
        let rest = args
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, arg)| arg.clone());
        let mut copies: Vec<TypeShape> = same_name
            .iter()
            .map(|inner| {
                TypeShape::ac_weighted(
                    name,
                    rest.clone()
                        .chain(inner.iter().map(|(t, c)| (t.clone(), c * card))),
                )
            })
            .collect();
        if accepted.len() > same_name.len() {
            copies.push(shape.clone());
        }
        return Some(copies);
    }
    None
}

fn same_name_ac_args<'a>(
    accepted: &'a IndexSet<TypeShape>,
    name: &str,
) -> Vec<&'a Vec<(TypeName, usize)>> {
    accepted
        .iter()
        .filter_map(|shape| match shape {
            TypeShape::Ac { name: n, args } if n == name => Some(args),
            _ => None,
        })
        .collect()
}

/// The graph of AC expansions: an edge `P -> T` for every declared type
/// `T` that would be spliced into an AC shape of `P`. A cycle in this
/// graph makes flattening diverge.
pub(crate) fn ac_expansion_graph(table: &TypeTable) -> IndexMap<TypeName, IndexSet<TypeName>> {
    let mut graph: IndexMap<TypeName, IndexSet<TypeName>> = IndexMap::new();
    for (parent, shapes) in table {
        for shape in shapes {
            let TypeShape::Ac { name, args } = shape else {
                continue;
            };
            for (arg_type, _) in args {
                let Some(accepted) = table.get(arg_type) else {
                    continue;
                };
                let targets = same_name_ac_args(accepted, name)
                    .into_iter()
                    .flatten()
                    .map(|(t, _)| t)
                    .filter(|t| table.contains_key(*t));
                let edges = graph.entry(parent.clone()).or_default();
                edges.extend(targets.cloned());
            }
        }
    }
    graph
}

/// The ε-transition graph: an edge `P -> T` for every shape `$T` accepted
/// by `P`.
pub(crate) fn type_name_graph(table: &TypeTable) -> IndexMap<TypeName, IndexSet<TypeName>> {
    table
        .iter()
        .map(|(parent, shapes)| {
            let targets = shapes
                .iter()
                .filter_map(|shape| match shape {
                    TypeShape::TypeName(t) => Some(t.clone()),
                    _ => None,
                })
                .collect();
            (parent.clone(), targets)
        })
        .collect()
}

/// The nodes of `graph` that lie on a cycle, in graph order.
pub(crate) fn nodes_on_cycles(graph: &IndexMap<TypeName, IndexSet<TypeName>>) -> Vec<&TypeName> {
    graph
        .keys()
        .filter(|start| {
            let mut seen: IndexSet<&TypeName> = IndexSet::new();
            let mut stack: Vec<&TypeName> = graph
                .get(*start)
                .map(|next| next.iter().collect())
                .unwrap_or_default();
            while let Some(node) = stack.pop() {
                if node == *start {
                    return true;
                }
                if !seen.insert(node) {
                    continue;
                }
                if let Some(next) = graph.get(node) {
                    stack.extend(next.iter());
                }
            }
            false
        })
        .collect()
}
