//! Directive Types
//!
//! Infers the type arguments of a generic directive from the types of the
//! expressions bound to its inputs. Unification records, for every open
//! type parameter, the set of types it met; resolution then picks the one
//! type in each set that every other candidate is assignable to.

use indexmap::{IndexMap, IndexSet};

use crate::symbols::Symbol;

/// Open type parameter -> the types it was unified with, in the order met.
pub type CandidateTypeSets = IndexMap<Symbol, IndexSet<Symbol>>;

fn add_candidate(sets: &mut CandidateTypeSets, parameter: &Symbol, ty: &Symbol) {
    sets.entry(parameter.clone()).or_default().insert(ty.clone());
}

/// Unifies the declared type `t` with the type `s` of a bound value.
///
/// Returns whether a candidate was recorded anywhere below this call.
/// Signatures, constructors and indexers are not unified.
pub fn inferrencial_type(t: &Symbol, s: &Symbol, sets: &mut CandidateTypeSets) -> bool {
    if t.is_open_type_parameter() {
        add_candidate(sets, t, s);
        return true;
    }

    let mut inference_made = false;
    let generic_of_t = t.generic_type();
    let generic_of_s = s.generic_type();
    if generic_of_t.is_some() && generic_of_t == generic_of_s {
        let arguments_of_t = t.type_arguments().unwrap_or_default();
        let arguments_of_s = s.type_arguments().unwrap_or_default();
        for (a, b) in arguments_of_t.iter().zip(arguments_of_s.iter()) {
            inference_made = inferrencial_type(a, b, sets) || inference_made;
        }
    } else if t.is_union_type() || t.is_intersection_type() {
        let constituents = t.constituent_types();
        let mut sub_inference_made = false;
        for constituent in constituents.iter().filter(|c| !c.is_open_type_parameter()) {
            sub_inference_made = inferrencial_type(constituent, s, sets) || sub_inference_made;
        }
        if sub_inference_made {
            inference_made = true;
        } else {
            let open: Vec<&Symbol> = constituents
                .iter()
                .filter(|c| c.is_open_type_parameter())
                .collect();
            if let [parameter] = open.as_slice() {
                add_candidate(sets, parameter, s);
                inference_made = true;
            }
        }
    } else if s.is_union_type() || s.is_intersection_type() {
        for constituent in s.constituent_types() {
            inference_made = inferrencial_type(t, &constituent, sets) || inference_made;
        }
    } else {
        let members_of_s = s.members();
        for member_of_t in t.members().values() {
            let Some(member_of_s) = members_of_s.get(&member_of_t.name()) else {
                continue;
            };
            if let (Some(a), Some(b)) = (member_of_t.type_(), member_of_s.type_()) {
                inference_made = inferrencial_type(&a, &b, sets) || inference_made;
            }
        }
    }
    inference_made
}

/// The member of `set` every other member is assignable to, if there is
/// exactly one such type.
///
/// The result depends on iteration order when the set holds types that
/// are neither sub- nor supertypes of each other; such sets resolve to
/// `None` unless a later type covers all of the discarded ones.
pub fn resolve_inferred_type(set: &IndexSet<Symbol>) -> Option<Symbol> {
    let mut discarded: Vec<&Symbol> = Vec::new();
    let mut candidate: Option<&Symbol> = None;

    for ty in set {
        match candidate {
            None => candidate = Some(ty),
            Some(current) if current.super_type_of(ty) => {}
            Some(current) => {
                if ty.super_type_of(current) && discarded.iter().all(|d| ty.super_type_of(d)) {
                    discarded.clear();
                } else {
                    discarded.push(current);
                }
                candidate = Some(ty);
            }
        }
    }

    if discarded.is_empty() {
        candidate.cloned()
    } else {
        None
    }
}

/// Infers each type parameter of a generic directive class from
/// `(input member name, bound value type)` pairs.
///
/// The result lists every type parameter of `directive` in declaration
/// order, with `None` when nothing or nothing consistent was inferred.
pub fn infer_type_arguments(
    directive: &Symbol,
    bindings: &[(String, Symbol)],
) -> Vec<(Symbol, Option<Symbol>)> {
    let parameters = directive.type_arguments().unwrap_or_default();
    if parameters.is_empty() {
        return Vec::new();
    }

    let members = directive.members();
    let mut sets = CandidateTypeSets::new();
    for (name, value_type) in bindings {
        let Some(member) = members.get(name) else {
            continue;
        };
        if !member.is_input_property() {
            continue;
        }
        if let Some(declared) = member.type_() {
            inferrencial_type(&declared, value_type, &mut sets);
        }
    }

    parameters
        .into_iter()
        .map(|parameter| {
            let inferred = sets.get(&parameter).and_then(resolve_inferred_type);
            (parameter, inferred)
        })
        .collect()
}
