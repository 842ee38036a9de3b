/**
 * Definition Tests
 *
 * Symbols and declaration sites for names under a template position:
 * components, directive members, references, variables and expressions.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{
        Toh, APP_FILE, DETAIL_TEMPLATE, HERO, HERO_FILE, HERO_LIST, LIST_FILE,
    };
    use angular_language_service::{
        LanguageService, Location, ProjectHost, Span, SymbolKind,
    };

    fn service(toh: &Toh) -> LanguageService<ProjectHost> {
        LanguageService::new(toh.host())
    }

    fn span_in(content: &str, needle: &str) -> Span {
        let start = content.find(needle).expect("needle is in the content");
        Span::new(start, start + needle.len())
    }

    fn location(file_name: &str, span: Span) -> Vec<Location> {
        vec![Location {
            file_name: file_name.to_string(),
            span,
        }]
    }

    #[test]
    fn should_find_the_component_of_an_element() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let position = toh.detail.at("list-element");

        let info = service
            .get_symbol_at(DETAIL_TEMPLATE, position)
            .expect("element name resolves");
        assert_eq!(info.symbol.name(), "HeroListComponent");
        assert_eq!(info.symbol.kind(), SymbolKind::Component);
        let name = span_in(&toh.detail.text, "my-hero-list");
        assert_eq!(info.span, name);

        assert_eq!(
            service.get_definition_at(DETAIL_TEMPLATE, position),
            Some(location(LIST_FILE, span_in(HERO_LIST, "HeroListComponent")))
        );
    }

    #[test]
    fn should_find_the_output_behind_an_event() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let position = toh.detail.at("selected-output");

        let info = service
            .get_symbol_at(DETAIL_TEMPLATE, position)
            .expect("event name resolves");
        assert_eq!(info.symbol.name(), "selected");
        assert_eq!(info.symbol.kind(), SymbolKind::Event);
        assert_eq!(info.span, span_in(&toh.detail.text, "(selected)"));

        assert_eq!(
            service.get_definition_at(DETAIL_TEMPLATE, position),
            Some(location(LIST_FILE, span_in(HERO_LIST, "selected")))
        );
    }

    #[test]
    fn should_find_the_input_behind_a_property_binding() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let position = toh.detail.at("heroes-input");

        let info = service
            .get_symbol_at(DETAIL_TEMPLATE, position)
            .expect("input name resolves");
        assert_eq!(info.symbol.name(), "heroes");
        assert_eq!(info.symbol.kind(), SymbolKind::Property);
        assert_eq!(info.span, span_in(&toh.detail.text, "[heroes]"));

        assert_eq!(
            service.get_definition_at(DETAIL_TEMPLATE, position),
            Some(location(LIST_FILE, span_in(HERO_LIST, "heroes")))
        );
    }

    #[test]
    fn should_find_component_members_read_by_a_binding() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let position = toh.detail.at("heroes-value");

        let info = service
            .get_symbol_at(DETAIL_TEMPLATE, position)
            .expect("bound value resolves");
        assert_eq!(info.symbol.name(), "heroes");
        assert_eq!(info.span, Span::new(position, position + "heroes".len()));
        assert_eq!(
            info.symbol.type_().map(|ty| ty.name()),
            Some("Hero[]".to_string())
        );
    }

    #[test]
    fn should_find_members_in_interpolations() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let name_definition = Some(location(HERO_FILE, span_in(HERO, "name")));

        let position = toh.detail.at("detail-name");
        let info = service
            .get_symbol_at(DETAIL_TEMPLATE, position)
            .expect("member resolves");
        assert_eq!(info.symbol.name(), "name");
        assert_eq!(info.symbol.kind(), SymbolKind::Property);
        assert_eq!(info.span, Span::new(position, position + 4));
        assert_eq!(service.get_definition_at(DETAIL_TEMPLATE, position), name_definition);

        // `item` is typed from the iterated `heroes`.
        let position = toh.detail.at("item-name");
        assert_eq!(service.get_definition_at(DETAIL_TEMPLATE, position), name_definition);
    }

    #[test]
    fn should_rebase_spans_of_inline_templates() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let info = service
            .get_symbol_at(APP_FILE, toh.app.at("sub-start"))
            .expect("title resolves");
        assert_eq!(info.symbol.name(), "title");
        assert_eq!(info.span, Span::new(toh.app.at("sub-start"), toh.app.at("sub-end")));
    }

    #[test]
    fn should_find_template_references() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let info = service
            .get_symbol_at(DETAIL_TEMPLATE, toh.detail.at("list-ref"))
            .expect("reference resolves");
        assert_eq!(info.symbol.name(), "HeroListComponent");
        assert_eq!(info.symbol.kind(), SymbolKind::Directive);
        assert_eq!(info.span, span_in(&toh.detail.text, "#list"));
    }

    #[test]
    fn should_find_template_variables() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let position = toh.detail.at("item-variable");
        let info = service
            .get_symbol_at(DETAIL_TEMPLATE, position)
            .expect("variable resolves");
        assert_eq!(info.symbol.name(), "item");
        assert_eq!(info.symbol.kind(), SymbolKind::Variable);
        assert_eq!(info.symbol.type_().map(|ty| ty.name()), Some("Hero".to_string()));

        let definition = service
            .get_definition_at(DETAIL_TEMPLATE, position)
            .expect("variables are declared in the template");
        assert_eq!(definition[0].file_name, DETAIL_TEMPLATE);
        assert!(definition[0].span.start <= position && position < definition[0].span.end);
    }

    #[test]
    fn should_find_nothing_in_plain_content() {
        let toh = Toh::new();
        let mut service = service(&toh);
        let text = toh.detail.text.find("details!").expect("text is in the template");
        assert!(service.get_symbol_at(DETAIL_TEMPLATE, text).is_none());

        let h2 = toh.detail.text.find("<h2>").expect("h2 is in the template") + 1;
        assert!(service.get_symbol_at(DETAIL_TEMPLATE, h2).is_none());
        assert!(service.get_definition_at(DETAIL_TEMPLATE, h2).is_none());
    }

    #[test]
    fn should_need_type_information() {
        let toh = Toh::without_types();
        let mut service = service(&toh);
        assert!(service
            .get_symbol_at(DETAIL_TEMPLATE, toh.detail.at("list-element"))
            .is_none());
    }
}
