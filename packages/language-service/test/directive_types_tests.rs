/**
 * Directive Type Tests
 *
 * Unification of declared input types with bound value types, and the
 * resolution of candidate sets to a single type.
 */

#[cfg(test)]
mod tests {
    use angular_language_service::directive_types::CandidateTypeSets;
    use angular_language_service::static_symbols::MemberFlags;
    use angular_language_service::{
        infer_type_arguments, inferrencial_type, resolve_inferred_type, BuiltinType, StaticTypes,
        Symbol,
    };
    use indexmap::IndexSet;

    const FILE: &str = "test.ts";

    fn set(types: &[Symbol]) -> IndexSet<Symbol> {
        types.iter().cloned().collect()
    }

    /// The single type inferred for the single parameter in `sets`.
    fn inferred_type(sets: &CandidateTypeSets) -> Symbol {
        assert_eq!(sets.len(), 1, "unexpected number of inferred type parameters");
        let candidates = &sets[0];
        assert_eq!(candidates.len(), 1, "unexpected number of inferred types for parameter");
        candidates[0].clone()
    }

    fn expect_inferred_member(ty: &Symbol, member: &str, expression: &Symbol, expected: &str) {
        let member = ty.members().get(member).cloned().expect("member is declared");
        let declared = member.type_().expect("member has a type");
        let mut sets = CandidateTypeSets::new();
        assert!(inferrencial_type(&declared, expression, &mut sets));
        assert_eq!(inferred_type(&sets).name(), expected);
    }

    /// `export class <name><T> { <member>: <declared(T)> }`.
    fn generic_class(
        types: &StaticTypes,
        name: &str,
        member: &str,
        declared: impl Fn(&Symbol) -> Symbol,
    ) -> Symbol {
        let class = types.declare_class(FILE, name, &["T"]);
        let parameter = types.type_parameter(&class, 0).expect("class has a parameter");
        types.add_input(&class, member, &declared(&parameter));
        class
    }

    mod unification {
        use super::*;

        #[test]
        fn can_infer_the_type_of_ng_for_of_from_an_array() {
            let types = StaticTypes::new();
            let ng_for_of = generic_class(&types, "NgForOf", "ngForOf", |t| types.array_of(t));
            let person = types.declare_class(FILE, "Person", &[]);
            types.add_property(&person, "name", &types.primitive(BuiltinType::String));
            let people = types.declare_value(FILE, "people", &types.array_of(&person));

            let people_type = people.type_().expect("value has a type");
            expect_inferred_member(&ng_for_of, "ngForOf", &people_type, "Person");
        }

        #[test]
        fn can_infer_a_type_from_a_union() {
            let types = StaticTypes::new();
            let string = types.primitive(BuiltinType::String);
            let a = generic_class(&types, "A", "a", |t| types.union(&[t.clone(), string.clone()]));
            let n = types.primitive(BuiltinType::Number);
            expect_inferred_member(&a, "a", &n, "number");
        }

        #[test]
        fn can_infer_a_type_from_an_intersection() {
            let types = StaticTypes::new();
            let number = types.primitive(BuiltinType::Number);
            let a = generic_class(&types, "A", "a", |t| {
                types.intersection(&[t.clone(), number.clone()])
            });
            expect_inferred_member(&a, "a", &number, "number");
        }

        #[test]
        fn can_infer_a_type_from_an_object_type() {
            let types = StaticTypes::new();
            let a = generic_class(&types, "A", "a", |t| types.object(&[("b", t.clone())]));
            let o = types.object(&[("b", types.primitive(BuiltinType::Number))]);
            expect_inferred_member(&a, "a", &o, "number");
        }

        #[test]
        fn should_not_infer_from_unrelated_types() {
            let types = StaticTypes::new();
            let a = generic_class(&types, "A", "a", |t| types.object(&[("b", t.clone())]));
            let declared = a.members().get("a").and_then(|m| m.type_()).expect("a is typed");
            let mut sets = CandidateTypeSets::new();
            let other = types.object(&[("c", types.primitive(BuiltinType::Number))]);
            assert!(!inferrencial_type(&declared, &other, &mut sets));
            assert!(sets.is_empty());
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn should_not_resolve_a_type_for_disjoint_types() {
            let types = StaticTypes::new();
            let number = types.primitive(BuiltinType::Number);
            let string = types.primitive(BuiltinType::String);
            assert_eq!(resolve_inferred_type(&set(&[number, string])), None);
        }

        #[test]
        fn infers_a_union_from_its_constituents() {
            let types = StaticTypes::new();
            let number = types.primitive(BuiltinType::Number);
            let string = types.primitive(BuiltinType::String);
            let union = types.union(&[number.clone(), string.clone()]);
            let resolved = resolve_inferred_type(&set(&[union.clone(), string, number]));
            assert_eq!(resolved, Some(union));
        }

        #[test]
        fn infers_a_constituent_from_an_intersection() {
            let types = StaticTypes::new();
            let number = types.primitive(BuiltinType::Number);
            let string = types.primitive(BuiltinType::String);
            let intersection = types.intersection(&[number, string.clone()]);
            let resolved = resolve_inferred_type(&set(&[intersection, string.clone()]));
            assert_eq!(resolved, Some(string));
        }

        #[test]
        fn infers_a_base_type_from_itself_and_a_descendant() {
            let types = StaticTypes::new();
            let a = types.declare_class(FILE, "A", &[]);
            let b = types.declare_class(FILE, "B", &[]);
            types.set_base(&b, &a);
            assert_eq!(resolve_inferred_type(&set(&[a.clone(), b.clone()])), Some(a.clone()));
            assert_eq!(resolve_inferred_type(&set(&[b, a.clone()])), Some(a));
        }

        #[test]
        fn infers_a_base_type_from_deeply_derived_classes() {
            let types = StaticTypes::new();
            let mut chain: Vec<Symbol> = Vec::new();
            for name in ["A", "B", "C", "D", "E"] {
                let class = types.declare_class(FILE, name, &[]);
                if let Some(base) = chain.last() {
                    types.set_base(&class, base);
                }
                chain.push(class);
            }
            let values: Vec<Symbol> = chain
                .iter()
                .enumerate()
                .map(|(index, class)| {
                    let value = types.declare_value(FILE, &format!("v{}", index), class);
                    value.type_().expect("value has a type")
                })
                .collect();
            let base = values[0].clone();

            let orders = permutations(&values);
            assert_eq!(orders.len(), 120);
            for order in orders {
                assert_eq!(resolve_inferred_type(&set(&order)), Some(base.clone()));
            }
        }

        #[test]
        fn is_order_sensitive_for_incomparable_siblings() {
            // B and C share the base A, which is not among the candidates.
            let types = StaticTypes::new();
            let a = types.declare_class(FILE, "A", &[]);
            let b = types.declare_class(FILE, "B", &[]);
            let c = types.declare_class(FILE, "C", &[]);
            types.set_base(&b, &a);
            types.set_base(&c, &a);
            assert_eq!(resolve_inferred_type(&set(&[b.clone(), c.clone()])), None);
            // A later common base absorbs everything discarded before it.
            assert_eq!(resolve_inferred_type(&set(&[b, c, a.clone()])), Some(a));
        }

        fn permutations(items: &[Symbol]) -> Vec<Vec<Symbol>> {
            if items.len() <= 1 {
                return vec![items.to_vec()];
            }
            let mut result = Vec::new();
            for index in 0..items.len() {
                let mut rest = items.to_vec();
                let first = rest.remove(index);
                for mut tail in permutations(&rest) {
                    tail.insert(0, first.clone());
                    result.push(tail);
                }
            }
            result
        }
    }

    mod type_arguments {
        use super::*;

        #[test]
        fn should_infer_each_parameter_from_bound_inputs() {
            let types = StaticTypes::new();
            let ng_for_of = generic_class(&types, "NgForOf", "ngForOf", |t| types.array_of(t));
            let hero = types.declare_class(FILE, "Hero", &[]);
            let bindings = vec![("ngForOf".to_string(), types.array_of(&hero))];

            let inferred = infer_type_arguments(&ng_for_of, &bindings);
            assert_eq!(inferred.len(), 1);
            assert_eq!(inferred[0].0.name(), "T");
            assert_eq!(inferred[0].1, Some(hero));
        }

        #[test]
        fn should_ignore_members_that_are_not_inputs() {
            let types = StaticTypes::new();
            let class = types.declare_class(FILE, "Box", &["T"]);
            let parameter = types.type_parameter(&class, 0).expect("class has a parameter");
            types.add_member(&class, "value", &parameter, MemberFlags::empty());
            let bindings = vec![("value".to_string(), types.primitive(BuiltinType::Number))];

            let inferred = infer_type_arguments(&class, &bindings);
            assert_eq!(inferred.len(), 1);
            assert_eq!(inferred[0].1, None);
        }

        #[test]
        fn should_leave_conflicting_parameters_unresolved() {
            let types = StaticTypes::new();
            let class = types.declare_class(FILE, "Pair", &["T"]);
            let parameter = types.type_parameter(&class, 0).expect("class has a parameter");
            types.add_input(&class, "left", &parameter);
            types.add_input(&class, "right", &parameter);
            let bindings = vec![
                ("left".to_string(), types.primitive(BuiltinType::Number)),
                ("right".to_string(), types.primitive(BuiltinType::String)),
                ("missing".to_string(), types.primitive(BuiltinType::Boolean)),
            ];

            let inferred = infer_type_arguments(&class, &bindings);
            assert_eq!(inferred[0].1, None);
        }

        #[test]
        fn should_return_nothing_for_non_generic_directives() {
            let types = StaticTypes::new();
            let class = types.declare_class(FILE, "Plain", &[]);
            assert!(infer_type_arguments(&class, &[]).is_empty());
        }
    }
}
