/**
 * Parser Tests
 *
 * Bindings, actions, interpolations and template bindings, checked through
 * the serializer and the recorded errors.
 */

#[cfg(test)]
mod tests {
    use angular_compiler::expression_parser::{
        ast::*, parser::Parser, parser::TemplateBindingParseResult, serialize,
    };

    const LOCATION: &str = "location";

    fn parse_action(text: &str) -> ASTWithSource {
        Parser::new().parse_action(text, LOCATION)
    }

    fn parse_binding(text: &str) -> ASTWithSource {
        Parser::new().parse_binding(text, LOCATION)
    }

    fn parse_template_bindings(key: &str, text: &str) -> TemplateBindingParseResult {
        Parser::new().parse_template_bindings(key, text, LOCATION)
    }

    fn check_binding(exp: &str, expected: Option<&str>) {
        let result = parse_binding(exp);
        assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
        assert_eq!(serialize(&result.ast), expected.unwrap_or(exp));
    }

    fn check_action(exp: &str, expected: Option<&str>) {
        let result = parse_action(exp);
        assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
        assert_eq!(serialize(&result.ast), expected.unwrap_or(exp));
    }

    fn error_messages(result: &ASTWithSource) -> Vec<String> {
        result.errors.iter().map(|e| e.message.clone()).collect()
    }

    mod bindings {
        use super::*;

        #[test]
        fn should_parse_property_access() {
            check_binding("a", None);
            check_binding("a.b.c", None);
            check_binding("a?.b", None);
            check_binding("a[b]", None);
            check_binding("a.b(c, d)", None);
            check_binding("a?.b()", None);
            check_binding("fns[0](1)", None);
            check_binding("a!.b", None);
        }

        #[test]
        fn should_parse_literals() {
            check_binding("true", None);
            check_binding("null", None);
            check_binding("undefined", None);
            check_binding("1.5", None);
            check_binding("'x'", Some("\"x\""));
            check_binding("[1, 'x']", Some("[1, \"x\"]"));
            check_binding("{a: 1, 'b': c}", Some("{a: 1, \"b\": c}"));
        }

        #[test]
        fn should_parse_operators_with_precedence() {
            check_binding("1 + 2 * 3", None);
            check_binding("a && b || c", None);
            check_binding("a == b && c !== d", None);
            check_binding("a ? b : c", None);
            check_binding("!a", None);
            check_binding("-a", Some("0 - a"));
            check_binding("+a", Some("a - 0"));
            check_binding("(a + b) * c", Some("a + b * c"));
        }

        #[test]
        fn should_parse_pipes() {
            check_binding("a | uppercase", Some("(a | uppercase)"));
            check_binding("a | slice:1:b", Some("(a | slice:1:b)"));
            check_binding("a | json | lowercase", Some("((a | json) | lowercase)"));
        }

        #[test]
        fn should_ignore_trailing_comments() {
            check_binding("a // comment", Some("a"));
            check_binding("'http://x'", Some("\"http://x\""));
        }

        #[test]
        fn should_record_spans() {
            let result = parse_binding("a.bc");
            match &result.ast {
                AST::PropertyRead(read) => {
                    assert_eq!(read.span, ParseSpan::new(0, 4));
                    assert_eq!(read.name_span, ParseSpan::new(2, 4));
                    assert_eq!(read.receiver.span(), ParseSpan::new(0, 1));
                }
                other => panic!("expected property read, got {:?}", other),
            }
        }
    }

    mod actions {
        use super::*;

        #[test]
        fn should_parse_chains_and_assignments() {
            check_action("a = 1; b()", None);
            check_action("a[0] = b", None);
            check_action("a.b = c ? d : e", None);
            check_action("onSave($event)", None);
        }

        #[test]
        fn should_reject_pipes() {
            let result = parse_action("a | b");
            assert!(error_messages(&result)[0].contains("Cannot have a pipe in an action expression"));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_reject_assignments_in_bindings() {
            let result = parse_binding("a = 1");
            assert!(error_messages(&result)[0].contains("Bindings cannot contain assignments"));
        }

        #[test]
        fn should_reject_chains_in_bindings() {
            let result = parse_binding("a; b");
            assert!(error_messages(&result)[0]
                .contains("Binding expression cannot contain chained expression"));
        }

        #[test]
        fn should_report_unexpected_tokens_with_location() {
            let result = parse_binding("a b");
            assert_eq!(
                error_messages(&result),
                vec!["Parser Error: Unexpected token 'b' at column 3 in [a b] in location"]
            );
        }

        #[test]
        fn should_report_incomplete_conditionals() {
            let result = parse_binding("a ? b");
            assert_eq!(
                error_messages(&result),
                vec!["Parser Error: Conditional expression a ? b requires all 3 expressions at the end of the expression [a ? b] in location"]
            );
        }

        #[test]
        fn should_report_interpolation_in_bindings() {
            let result = parse_binding("{{a}}");
            assert!(error_messages(&result)[0]
                .starts_with("Parser Error: Got interpolation ({{}}) where expression was expected at column 0 in"));
        }

        #[test]
        fn should_report_lexer_errors() {
            let result = parse_binding("a + #");
            assert!(error_messages(&result)[0].contains("Unexpected character [#]"));
        }

        #[test]
        fn should_report_missing_closing_parens() {
            let result = parse_binding("f(a");
            assert!(error_messages(&result)[0].contains("Missing expected )"));
        }
    }

    mod interpolation {
        use super::*;

        #[test]
        fn should_return_none_without_interpolation() {
            assert!(Parser::new().parse_interpolation("plain text", LOCATION).is_none());
        }

        #[test]
        fn should_split_text_and_expressions() {
            let result = Parser::new()
                .parse_interpolation("x {{a}} y {{ b.c }}", LOCATION)
                .unwrap();
            assert!(result.errors.is_empty());
            match &result.ast {
                AST::Interpolation(interpolation) => {
                    assert_eq!(interpolation.strings, vec!["x ", " y ", ""]);
                    assert_eq!(interpolation.expressions.len(), 2);
                    assert_eq!(serialize(&interpolation.expressions[1]), "b.c");
                    match &interpolation.expressions[1] {
                        AST::PropertyRead(read) => {
                            assert_eq!(read.name_span, ParseSpan::new(15, 16));
                        }
                        other => panic!("expected property read, got {:?}", other),
                    }
                }
                other => panic!("expected interpolation, got {:?}", other),
            }
            assert_eq!(serialize(&result.ast), "x {{ a }} y {{ b.c }}");
        }

        #[test]
        fn should_report_blank_expressions() {
            let result = Parser::new().parse_interpolation("a {{ }}", LOCATION).unwrap();
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0]
                .message
                .contains("Blank expressions are not allowed in interpolated strings"));
        }
    }

    mod template_bindings {
        use super::*;

        fn keys(result: &TemplateBindingParseResult) -> Vec<(String, bool, Option<String>)> {
            result
                .template_bindings
                .iter()
                .map(|b| (b.key.clone(), b.key_is_var, b.name.clone()))
                .collect()
        }

        #[test]
        fn should_parse_ng_for_microsyntax() {
            let result = parse_template_bindings("ngFor", "let item of items; let i = index");
            assert!(result.errors.is_empty());
            assert_eq!(
                keys(&result),
                vec![
                    ("ngFor".to_string(), false, None),
                    ("item".to_string(), true, Some("$implicit".to_string())),
                    ("ngForOf".to_string(), false, None),
                    ("i".to_string(), true, Some("index".to_string())),
                ]
            );
            let of = result.template_bindings[2].expression.as_ref().unwrap();
            assert_eq!(of.source, "items");
        }

        #[test]
        fn should_parse_simple_expressions() {
            let result = parse_template_bindings("ngIf", "cond");
            assert_eq!(keys(&result), vec![("ngIf".to_string(), false, None)]);
            let expression = result.template_bindings[0].expression.as_ref().unwrap();
            assert_eq!(serialize(&expression.ast), "cond");
        }

        #[test]
        fn should_support_as_bindings() {
            let result = parse_template_bindings("ngIf", "user | async as u");
            assert_eq!(
                keys(&result),
                vec![
                    ("ngIf".to_string(), false, None),
                    ("u".to_string(), true, Some("ngIf".to_string())),
                ]
            );
        }

        #[test]
        fn should_join_dashed_keys() {
            let result = parse_template_bindings("ngFor", "let item of items; track-by: fn");
            assert_eq!(result.template_bindings[3].key, "ngForTrack-by");
        }
    }
}
