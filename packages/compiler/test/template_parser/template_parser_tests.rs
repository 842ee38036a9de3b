/**
 * Template Parser Tests
 *
 * Binding forms, directive matching and validation errors.
 */

#[cfg(test)]
mod tests {
    use angular_compiler::compile_metadata::{
        CompileDirectiveMetadata, CompilePipeMetadata, CompileTypeMetadata, StaticSymbol,
    };
    use angular_compiler::directive_matching::SelectorError;
    use angular_compiler::expression_parser::{serialize, Parser};
    use angular_compiler::schema::{DomElementSchemaRegistry, SchemaMetadata};
    use angular_compiler::template_parser::*;

    fn type_of(name: &str) -> CompileTypeMetadata {
        CompileTypeMetadata::new(StaticSymbol::new("app.ts", name))
    }

    fn component() -> CompileDirectiveMetadata {
        CompileDirectiveMetadata::new(type_of("Root"), Some("root")).component()
    }

    fn directives() -> Vec<CompileDirectiveMetadata> {
        vec![
            CompileDirectiveMetadata::new(type_of("NgIf"), Some("[ngIf]")).with_inputs(&["ngIf"]),
            CompileDirectiveMetadata::new(type_of("NgFor"), Some("[ngFor][ngForOf]"))
                .with_inputs(&["ngForOf"]),
            CompileDirectiveMetadata::new(type_of("MyComp"), Some("my-comp"))
                .component()
                .with_inputs(&["value"])
                .with_outputs(&["changed"]),
            CompileDirectiveMetadata::new(type_of("DirA"), Some("[a]")).with_export_as("dirA"),
        ]
    }

    fn pipes() -> Vec<CompilePipeMetadata> {
        vec![CompilePipeMetadata::new(type_of("UpperPipe"), "upper")]
    }

    fn parse_with(
        template: &str,
        directives: &[CompileDirectiveMetadata],
        schemas: &[SchemaMetadata],
    ) -> TemplateParseResult {
        let registry = DomElementSchemaRegistry::new();
        TemplateParser::new(Parser::new(), &registry)
            .parse(&component(), template, directives, &pipes(), schemas, "TestComp")
            .unwrap()
    }

    fn parse(template: &str) -> TemplateParseResult {
        parse_with(template, &directives(), &[])
    }

    fn messages(result: &TemplateParseResult) -> Vec<String> {
        result.errors.iter().map(|e| e.msg.clone()).collect()
    }

    struct Humanizer(Vec<String>);

    impl<'a> TemplateAstVisitor<'a> for Humanizer {
        type Output = ();

        fn visit_element(&mut self, ast: &'a ElementAst) -> Option<()> {
            self.0.push(format!("Element:{}", ast.name));
            template_visit_each_child(self, TemplateAstRef::Element(ast));
            None
        }

        fn visit_embedded_template(&mut self, ast: &'a EmbeddedTemplateAst) -> Option<()> {
            self.0.push("Template".to_string());
            template_visit_each_child(self, TemplateAstRef::EmbeddedTemplate(ast));
            None
        }

        fn visit_directive(&mut self, ast: &'a DirectiveAst) -> Option<()> {
            self.0.push(format!("Directive:{}", ast.directive.name()));
            template_visit_each_child(self, TemplateAstRef::Directive(ast));
            None
        }

        fn visit_directive_property(&mut self, ast: &'a BoundDirectivePropertyAst) -> Option<()> {
            self.0.push(format!(
                "DirectiveProperty:{}={}",
                ast.directive_name,
                serialize(&ast.value.ast)
            ));
            None
        }

        fn visit_provider(&mut self, ast: &'a ProviderAst) -> Option<()> {
            self.0.push(format!("Provider:{}", ast.token.name));
            None
        }

        fn visit_attr(&mut self, ast: &'a AttrAst) -> Option<()> {
            self.0.push(format!("Attr:{}={}", ast.name, ast.value));
            None
        }

        fn visit_element_property(&mut self, ast: &'a BoundElementPropertyAst) -> Option<()> {
            self.0
                .push(format!("Property:{}={}", ast.name, serialize(&ast.value.ast)));
            None
        }

        fn visit_event(&mut self, ast: &'a BoundEventAst) -> Option<()> {
            self.0.push(format!(
                "Event:{}={}",
                ast.full_name(),
                serialize(&ast.handler.ast)
            ));
            None
        }

        fn visit_reference(&mut self, ast: &'a ReferenceAst) -> Option<()> {
            self.0
                .push(format!("Reference:{}={}", ast.name, ast.value.name));
            None
        }

        fn visit_variable(&mut self, ast: &'a VariableAst) -> Option<()> {
            self.0.push(format!("Variable:{}={}", ast.name, ast.value));
            None
        }

        fn visit_text(&mut self, ast: &'a TextAst) -> Option<()> {
            self.0.push(format!("Text:{}", ast.value));
            None
        }

        fn visit_bound_text(&mut self, ast: &'a BoundTextAst) -> Option<()> {
            self.0
                .push(format!("BoundText:{}", serialize(&ast.value.ast)));
            None
        }

        fn visit_ng_content(&mut self, ast: &'a NgContentAst) -> Option<()> {
            self.0.push(format!("NgContent:{}", ast.index));
            None
        }
    }

    fn humanize(result: &TemplateParseResult) -> Vec<String> {
        let mut humanizer = Humanizer(Vec::new());
        template_visit_all(&mut humanizer, &result.template_ast);
        humanizer.0
    }

    mod nodes {
        use super::*;

        #[test]
        fn should_parse_text_and_elements() {
            let result = parse("<div title=\"t\">Hello</div>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(humanize(&result), vec!["Element:div", "Attr:title=t", "Text:Hello"]);
        }

        #[test]
        fn should_parse_interpolated_text() {
            let result = parse("<div>{{a}}</div>");
            assert_eq!(humanize(&result), vec!["Element:div", "BoundText:{{ a }}"]);
        }

        #[test]
        fn should_parse_ng_content() {
            let result = parse("<ng-content></ng-content><ng-content select=\"p\"></ng-content>");
            assert_eq!(humanize(&result), vec!["NgContent:0", "NgContent:1"]);
        }

        #[test]
        fn should_report_content_in_ng_content() {
            let result = parse("<ng-content>x</ng-content>");
            assert_eq!(messages(&result), vec!["<ng-content> element cannot have content."]);
        }

        #[test]
        fn should_drop_script_and_style() {
            let result = parse("<script>a</script><style>b</style><p></p>");
            assert_eq!(humanize(&result), vec!["Element:p"]);
        }

        #[test]
        fn should_not_bind_inside_non_bindable() {
            let result = parse("<div ngNonBindable><span [x]=\"y\">{{a}}</span></div>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(
                humanize(&result),
                vec![
                    "Element:div",
                    "Attr:ngNonBindable=",
                    "Element:span",
                    "Attr:[x]=y",
                    "Text:{{a}}"
                ]
            );
        }

        #[test]
        fn should_include_markup_errors() {
            let result = parse("<div></span>");
            assert!(messages(&result)[0].starts_with("Unexpected closing tag \"span\""));
        }
    }

    mod bindings {
        use super::*;

        #[test]
        fn should_parse_properties_events_and_references() {
            let result = parse("<div [title]=\"t\" (click)=\"go()\" #el></div>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(
                humanize(&result),
                vec![
                    "Element:div",
                    "Property:title=t",
                    "Event:click=go()",
                    "Reference:el=ElementRef"
                ]
            );
        }

        #[test]
        fn should_parse_canonical_binding_forms() {
            let result = parse("<div bind-title=\"t\" on-click=\"go()\" ref-el></div>");
            assert_eq!(
                humanize(&result),
                vec![
                    "Element:div",
                    "Property:title=t",
                    "Event:click=go()",
                    "Reference:el=ElementRef"
                ]
            );
        }

        #[test]
        fn should_parse_interpolated_attributes() {
            let result = parse("<div title=\"a{{b}}c\"></div>");
            assert_eq!(humanize(&result), vec!["Element:div", "Property:title=a{{ b }}c"]);
        }

        #[test]
        fn should_expand_two_way_bindings() {
            let result = parse("<my-comp [(value)]=\"v\"></my-comp>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(
                humanize(&result),
                vec![
                    "Element:my-comp",
                    "Event:valueChange=v = $event",
                    "Directive:MyComp",
                    "DirectiveProperty:value=v",
                    "Provider:MyComp"
                ]
            );
        }

        #[test]
        fn should_strip_data_prefix() {
            let result = parse("<div data-[title]=\"t\"></div>");
            assert_eq!(humanize(&result), vec!["Element:div", "Property:title=t"]);
        }

        #[test]
        fn should_accept_non_ascii_attribute_names() {
            let result = parse("<div ééé=\"x\" data-é=\"y\"></div>");
            assert!(messages(&result).is_empty());
            assert!(humanize(&result).contains(&"Attr:ééé=x".to_string()));
        }

        #[test]
        fn should_report_let_on_plain_elements() {
            let result = parse("<div let-x></div>");
            assert_eq!(
                messages(&result),
                vec!["\"let-\" is only supported on template elements."]
            );
        }

        #[test]
        fn should_report_unknown_properties() {
            let result = parse("<div [foo]=\"x\"></div>");
            assert_eq!(
                messages(&result),
                vec!["Can't bind to 'foo' since it isn't a known property of 'div'."]
            );
        }

        #[test]
        fn should_allow_any_property_with_no_errors_schema() {
            let result = parse_with("<div [foo]=\"x\"></div>", &directives(), &[SchemaMetadata::NoErrors]);
            assert!(result.errors.is_empty());
        }

        #[test]
        fn should_report_unknown_pipes_at_their_use() {
            let result = parse("<p>{{ x | nope }}</p>");
            assert_eq!(messages(&result), vec!["The pipe 'nope' could not be found"]);
            assert_eq!(result.errors[0].span.text(), "x | nope");

            let result = parse("<p>{{ x | upper }}</p>");
            assert!(result.errors.is_empty());
        }

        #[test]
        fn should_report_expression_errors() {
            let result = parse("<div [title]=\"a b\"></div>");
            assert!(messages(&result)[0].starts_with("Parser Error: Unexpected token 'b'"));
        }
    }

    mod directives {
        use super::*;

        #[test]
        fn should_bind_component_inputs() {
            let result = parse("<my-comp [value]=\"v\" (changed)=\"c()\"></my-comp>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(
                humanize(&result),
                vec![
                    "Element:my-comp",
                    "Event:changed=c()",
                    "Directive:MyComp",
                    "DirectiveProperty:value=v",
                    "Provider:MyComp"
                ]
            );
        }

        #[test]
        fn should_bind_inputs_from_literal_attributes() {
            let result = parse("<my-comp value=\"v\"></my-comp>");
            assert_eq!(
                humanize(&result),
                vec![
                    "Element:my-comp",
                    "Attr:value=v",
                    "Directive:MyComp",
                    "DirectiveProperty:value=\"v\"",
                    "Provider:MyComp"
                ]
            );
        }

        #[test]
        fn should_resolve_export_as_references() {
            let result = parse("<div a #d=\"dirA\"></div>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(
                humanize(&result),
                vec![
                    "Element:div",
                    "Attr:a=",
                    "Reference:d=DirA",
                    "Directive:DirA",
                    "Provider:DirA"
                ]
            );
        }

        #[test]
        fn should_report_missing_export_as() {
            let result = parse("<div #d=\"missing\"></div>");
            assert_eq!(
                messages(&result),
                vec!["There is no directive with \"exportAs\" set to \"missing\""]
            );
        }

        #[test]
        fn should_report_duplicate_references() {
            let result = parse("<div #a></div><div #a></div>");
            assert_eq!(messages(&result), vec!["Reference \"#a\" is defined several times"]);
        }

        #[test]
        fn should_report_more_than_one_component() {
            let mut dirs = directives();
            dirs.push(CompileDirectiveMetadata::new(type_of("OtherComp"), Some("my-comp")).component());
            let result = parse_with("<my-comp></my-comp>", &dirs, &[]);
            assert_eq!(
                messages(&result),
                vec!["More than one component matched on this element.\nMake sure that only one component's selector can match a given element.\nConflicting components: MyComp,OtherComp"]
            );
        }

        #[test]
        fn should_report_unknown_elements() {
            let result = parse("<foo-bar></foo-bar>");
            assert_eq!(
                messages(&result),
                vec!["'foo-bar' is not a known element:\n1. If 'foo-bar' is an Angular component, then verify that it is part of this module.\n2. If 'foo-bar' is a Web Component then add 'CUSTOM_ELEMENTS_SCHEMA' to the '@NgModule.schemas' of this component to suppress this message."]
            );

            let result = parse_with("<foo-bar></foo-bar>", &directives(), &[SchemaMetadata::CustomElements]);
            assert!(result.errors.is_empty());
        }

        #[test]
        fn should_fail_on_malformed_selectors() {
            let registry = DomElementSchemaRegistry::new();
            let dirs = vec![CompileDirectiveMetadata::new(type_of("Bad"), Some(":not(:not(a))"))];
            let result = TemplateParser::new(Parser::new(), &registry).parse(
                &component(),
                "<div></div>",
                &dirs,
                &[],
                &[],
                "TestComp",
            );
            assert_eq!(result.err(), Some(SelectorError::NestedNot));
        }
    }

    mod embedded_templates {
        use super::*;

        #[test]
        fn should_wrap_star_attributes() {
            let result = parse("<div *ngIf=\"show\"></div>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(
                humanize(&result),
                vec![
                    "Template",
                    "Directive:NgIf",
                    "DirectiveProperty:ngIf=show",
                    "Provider:NgIf",
                    "Element:div"
                ]
            );
        }

        #[test]
        fn should_declare_microsyntax_variables() {
            let result = parse("<li *ngFor=\"let item of items; let i = index\">{{item}}</li>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(
                humanize(&result),
                vec![
                    "Template",
                    "Variable:item=$implicit",
                    "Variable:i=index",
                    "Directive:NgFor",
                    "DirectiveProperty:ngForOf=items",
                    "Provider:NgFor",
                    "Element:li",
                    "BoundText:{{ item }}"
                ]
            );
        }

        #[test]
        fn should_support_the_template_attribute() {
            let result = parse("<div template=\"ngIf show\"></div>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(humanize(&result)[..3], ["Template", "Directive:NgIf", "DirectiveProperty:ngIf=show"]);
        }

        #[test]
        fn should_parse_ng_template_variables() {
            let result = parse("<ng-template let-item=\"value\" #tpl></ng-template>");
            assert!(result.errors.is_empty(), "{:?}", messages(&result));
            assert_eq!(
                humanize(&result),
                vec!["Template", "Reference:tpl=TemplateRef", "Variable:item=value"]
            );
        }

        #[test]
        fn should_report_unused_template_bindings() {
            let result = parse("<div *ngUnknown=\"x\"></div>");
            assert!(messages(&result).contains(
                &"Property binding ngUnknown not used by any directive on an embedded template. Make sure that the property name is spelled correctly and all directives are listed in the \"@NgModule.declarations\".".to_string()
            ));
        }

        #[test]
        fn should_report_multiple_template_bindings() {
            let result = parse("<div *ngIf=\"a\" *ngFor=\"let x of xs\"></div>");
            assert!(messages(&result)
                .iter()
                .any(|m| m.starts_with("Can't have multiple template bindings on one element.")));
        }
    }
}
