/**
 * HTML Parser Tests
 *
 * Tree shapes, source spans and error reporting of the markup parser.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{humanize_dom, humanize_dom_source_spans, humanize_errors, row};
    use angular_compiler::ml_parser::ast::Node;
    use angular_compiler::ml_parser::html_parser::HtmlParser;
    use angular_compiler::ml_parser::lexer::TokenizeOptions;
    use angular_compiler::ml_parser::parser::ParseTreeResult;

    fn parse(html: &str) -> ParseTreeResult {
        HtmlParser::new().parse(html, "TestComp")
    }

    fn parse_icu(html: &str) -> ParseTreeResult {
        HtmlParser::new().parse_with_options(
            html,
            "TestComp",
            TokenizeOptions {
                tokenize_expansion_forms: true,
            },
        )
    }

    mod text_nodes {
        use super::*;

        #[test]
        fn should_parse_root_level_text_nodes() {
            assert_eq!(humanize_dom(&parse("a")).unwrap(), vec![row(&["Text", "a", "0"])]);
        }

        #[test]
        fn should_parse_text_nodes_inside_regular_elements() {
            assert_eq!(
                humanize_dom(&parse("<div>a</div>")).unwrap(),
                vec![row(&["Element", "div", "0"]), row(&["Text", "a", "1"])]
            );
        }

        #[test]
        fn should_keep_interpolations_in_text() {
            assert_eq!(
                humanize_dom(&parse("<h1>{{title}}</h1>")).unwrap(),
                vec![row(&["Element", "h1", "0"]), row(&["Text", "{{title}}", "1"])]
            );
        }

        #[test]
        fn should_decode_entities() {
            assert_eq!(
                humanize_dom(&parse("<p>&lt;&amp;&#x41;</p>")).unwrap(),
                vec![row(&["Element", "p", "0"]), row(&["Text", "<&A", "1"])]
            );
        }

        #[test]
        fn should_ignore_first_lf_in_pre() {
            assert_eq!(
                humanize_dom(&parse("<pre>\na</pre>")).unwrap(),
                vec![row(&["Element", "pre", "0"]), row(&["Text", "a", "1"])]
            );
        }
    }

    mod elements {
        use super::*;

        #[test]
        fn should_parse_nested_elements() {
            assert_eq!(
                humanize_dom(&parse("<div><span></span></div>")).unwrap(),
                vec![row(&["Element", "div", "0"]), row(&["Element", "span", "1"])]
            );
        }

        #[test]
        fn should_support_void_elements() {
            assert_eq!(
                humanize_dom(&parse("<link rel=\"author license\" href=\"/about\">")).unwrap(),
                vec![
                    row(&["Element", "link", "0"]),
                    row(&["Attribute", "rel", "author license", "1"]),
                    row(&["Attribute", "href", "/about", "1"]),
                ]
            );
        }

        #[test]
        fn should_close_void_elements_on_text_nodes() {
            assert_eq!(
                humanize_dom(&parse("<p>before<br>after</p>")).unwrap(),
                vec![
                    row(&["Element", "p", "0"]),
                    row(&["Text", "before", "1"]),
                    row(&["Element", "br", "1"]),
                    row(&["Text", "after", "1"]),
                ]
            );
        }

        #[test]
        fn should_implicitly_close_elements() {
            assert_eq!(
                humanize_dom(&parse("<ul><li>1<li>2</ul>")).unwrap(),
                vec![
                    row(&["Element", "ul", "0"]),
                    row(&["Element", "li", "1"]),
                    row(&["Text", "1", "2"]),
                    row(&["Element", "li", "1"]),
                    row(&["Text", "2", "2"]),
                ]
            );
        }

        #[test]
        fn should_close_p_on_block_elements() {
            assert_eq!(
                humanize_dom(&parse("<div><p>1<div>2</div></div>")).unwrap(),
                vec![
                    row(&["Element", "div", "0"]),
                    row(&["Element", "p", "1"]),
                    row(&["Text", "1", "2"]),
                    row(&["Element", "div", "1"]),
                    row(&["Text", "2", "2"]),
                ]
            );
        }

        #[test]
        fn should_support_self_closing_custom_elements() {
            assert_eq!(
                humanize_dom(&parse("<my-cmp/>")).unwrap(),
                vec![row(&["Element", "my-cmp", "0"])]
            );
        }

        #[test]
        fn should_keep_raw_text_of_script() {
            assert_eq!(
                humanize_dom(&parse("<script>a<b></script>")).unwrap(),
                vec![row(&["Element", "script", "0"]), row(&["Text", "a<b>", "1"])]
            );
        }

        #[test]
        fn should_close_unterminated_elements_at_eof() {
            assert_eq!(
                humanize_dom(&parse("<div><span>x")).unwrap(),
                vec![
                    row(&["Element", "div", "0"]),
                    row(&["Element", "span", "1"]),
                    row(&["Text", "x", "2"]),
                ]
            );
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_parse_binding_attributes() {
            assert_eq!(
                humanize_dom(&parse("<input [value]=\"v\" (input)='f($event)' #ref disabled>"))
                    .unwrap(),
                vec![
                    row(&["Element", "input", "0"]),
                    row(&["Attribute", "[value]", "v", "1"]),
                    row(&["Attribute", "(input)", "f($event)", "1"]),
                    row(&["Attribute", "#ref", "", "1"]),
                    row(&["Attribute", "disabled", "", "1"]),
                ]
            );
        }

        #[test]
        fn should_record_value_spans() {
            let result = parse("<a href=\"x.html\" b=c d>");
            let element = match &result.root_nodes[0] {
                Node::Element(e) => e,
                other => panic!("expected element, got {:?}", other),
            };
            let href = &element.attrs[0];
            assert_eq!(href.source_span.text(), "href=\"x.html\"");
            assert_eq!(href.value_span.as_ref().unwrap().text(), "x.html");
            assert_eq!(element.attrs[1].value_span.as_ref().unwrap().text(), "c");
            assert!(element.attrs[2].value_span.is_none());
        }
    }

    mod comments {
        use super::*;

        #[test]
        fn should_parse_comments() {
            assert_eq!(
                humanize_dom_source_spans(&parse("<!-- note -->x")).unwrap(),
                vec![
                    row(&["Comment", "note", "0", "<!-- note -->"]),
                    row(&["Text", "x", "0", "x"]),
                ]
            );
        }
    }

    mod expansion_forms {
        use super::*;

        #[test]
        fn should_parse_expansion_forms() {
            let result = parse_icu("<div>{messages.length, plural, =0 {<b>bold</b>} other {many}}</div>");
            assert_eq!(
                humanize_dom(&result).unwrap(),
                vec![
                    row(&["Element", "div", "0"]),
                    row(&["Expansion", "messages.length", "plural", "1"]),
                    row(&["ExpansionCase", "=0", "2"]),
                    row(&["Element", "b", "3"]),
                    row(&["Text", "bold", "4"]),
                    row(&["ExpansionCase", "other", "2"]),
                    row(&["Text", "many", "3"]),
                ]
            );
        }

        #[test]
        fn should_report_unterminated_expansion_forms() {
            let result = parse_icu("{a, select, b {c}");
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors[0].msg, "Invalid ICU message. Missing '}'.");
        }
    }

    mod source_spans {
        use super::*;

        #[test]
        fn should_use_the_start_tag_as_element_span() {
            assert_eq!(
                humanize_dom_source_spans(&parse("<div a=\"b\">t</div>")).unwrap(),
                vec![
                    row(&["Element", "div", "0", "<div a=\"b\">"]),
                    row(&["Attribute", "a", "b", "1", "a=\"b\""]),
                    row(&["Text", "t", "1", "t"]),
                ]
            );
        }

        #[test]
        fn should_set_end_spans_only_for_explicit_end_tags() {
            let result = parse("<div><p>a</div><br>");
            let div = match &result.root_nodes[0] {
                Node::Element(e) => e,
                other => panic!("expected element, got {:?}", other),
            };
            assert_eq!(div.end_source_span.as_ref().unwrap().text(), "</div>");
            let p = match &div.children[0] {
                Node::Element(e) => e,
                other => panic!("expected element, got {:?}", other),
            };
            assert!(p.end_source_span.is_none());
            let br = match &result.root_nodes[1] {
                Node::Element(e) => e,
                other => panic!("expected element, got {:?}", other),
            };
            assert!(br.end_source_span.is_none());
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_report_unexpected_closing_tags() {
            let result = parse("<div></p></div>");
            let errors = humanize_errors(&result.errors);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0][0], "</p>");
            assert!(errors[0][1].starts_with("Unexpected closing tag \"p\""));
            assert_eq!(errors[0][2], "0:5");
        }

        #[test]
        fn should_report_closing_tags_for_void_elements() {
            let result = parse("<input></input>");
            assert_eq!(
                humanize_errors(&result.errors),
                vec![row(&["</input>", "Void elements do not have end tags \"input\"", "0:7"])]
            );
        }

        #[test]
        fn should_report_self_closing_html_elements() {
            let result = parse("<p/>");
            assert_eq!(
                humanize_errors(&result.errors),
                vec![row(&[
                    "<p",
                    "Only void, custom and foreign elements can be self closed \"p\"",
                    "0:0"
                ])]
            );
        }

        #[test]
        fn should_report_unterminated_start_tags() {
            let result = parse("<div a <span></span>");
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors[0].msg, "Opening tag \"div\" not terminated.");
            assert_eq!(result.root_nodes.len(), 1);
        }

        #[test]
        fn should_report_unknown_entities() {
            let result = parse("<p>&unknown;</p>");
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors[0].span.text(), "&unknown;");
        }
    }
}
