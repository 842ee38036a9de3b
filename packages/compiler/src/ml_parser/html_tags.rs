//! HTML Tag Definitions
//!
//! Per-tag parsing rules: void elements, implicit closing, raw text content
//! and leading newline handling.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use super::tags::TagContentType;
use crate::schema::dom_element_schema_registry::DomElementSchemaRegistry;
use crate::schema::element_schema_registry::ElementSchemaRegistry;

#[derive(Debug, Clone)]
pub struct HtmlTagDefinition {
    pub closed_by_children: HashSet<&'static str>,
    pub content_type: TagContentType,
    /// Content type when the element lives in the `svg` namespace.
    pub svg_content_type: Option<TagContentType>,
    pub closed_by_parent: bool,
    pub is_void: bool,
    pub ignore_first_lf: bool,
    pub can_self_close: bool,
}

impl HtmlTagDefinition {
    pub fn new() -> Self {
        HtmlTagDefinition {
            closed_by_children: HashSet::new(),
            content_type: TagContentType::ParsableData,
            svg_content_type: None,
            closed_by_parent: false,
            is_void: false,
            ignore_first_lf: false,
            can_self_close: false,
        }
    }

    pub fn void() -> Self {
        HtmlTagDefinition {
            is_void: true,
            closed_by_parent: true,
            can_self_close: true,
            ..Self::new()
        }
    }

    pub fn with_closed_by_children(mut self, children: &[&'static str]) -> Self {
        self.closed_by_children.extend(children.iter().copied());
        self
    }

    pub fn with_closed_by_parent(mut self) -> Self {
        self.closed_by_parent = true;
        self
    }

    pub fn with_content_type(mut self, content_type: TagContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_svg_content_type(mut self, content_type: TagContentType) -> Self {
        self.svg_content_type = Some(content_type);
        self
    }

    pub fn with_ignore_first_lf(mut self) -> Self {
        self.ignore_first_lf = true;
        self
    }

    pub fn with_can_self_close(mut self) -> Self {
        self.can_self_close = true;
        self
    }

    pub fn is_closed_by_child(&self, name: &str) -> bool {
        self.is_void || self.closed_by_children.contains(name.to_lowercase().as_str())
    }

    pub fn get_content_type(&self, prefix: Option<&str>) -> TagContentType {
        match (prefix, self.svg_content_type) {
            (Some("svg"), Some(content_type)) => content_type,
            _ => self.content_type,
        }
    }
}

impl Default for HtmlTagDefinition {
    fn default() -> Self {
        Self::new()
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "base", "meta", "area", "embed", "link", "img", "input", "param", "hr", "br", "source",
    "track", "wbr", "col",
];

const P_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "main", "nav", "ol", "p",
    "pre", "section", "table", "ul",
];

static TAG_DEFINITIONS: Lazy<HashMap<String, HtmlTagDefinition>> = Lazy::new(|| {
    let mut defs: HashMap<String, HtmlTagDefinition> = VOID_ELEMENTS
        .iter()
        .map(|name| (name.to_string(), HtmlTagDefinition::void()))
        .collect();

    let closing: &[(&str, &[&'static str], bool)] = &[
        ("p", P_CLOSERS, true),
        ("thead", &["tbody", "tfoot"], false),
        ("tbody", &["tbody", "tfoot"], true),
        ("tfoot", &["tbody"], true),
        ("tr", &["tr"], true),
        ("td", &["td", "th"], true),
        ("th", &["td", "th"], true),
        ("li", &["li"], true),
        ("dt", &["dt", "dd"], false),
        ("dd", &["dt", "dd"], true),
        ("rb", &["rb", "rt", "rtc", "rp"], true),
        ("rt", &["rb", "rt", "rtc", "rp"], true),
        ("rtc", &["rb", "rtc", "rp"], true),
        ("rp", &["rb", "rt", "rtc", "rp"], true),
        ("optgroup", &["optgroup"], true),
        ("option", &["option", "optgroup"], true),
    ];
    for (name, children, by_parent) in closing {
        let mut def = HtmlTagDefinition::new().with_closed_by_children(children);
        if *by_parent {
            def = def.with_closed_by_parent();
        }
        defs.insert(name.to_string(), def);
    }

    defs.insert("pre".into(), HtmlTagDefinition::new().with_ignore_first_lf());
    defs.insert("listing".into(), HtmlTagDefinition::new().with_ignore_first_lf());
    defs.insert(
        "style".into(),
        HtmlTagDefinition::new().with_content_type(TagContentType::RawText),
    );
    defs.insert(
        "script".into(),
        HtmlTagDefinition::new().with_content_type(TagContentType::RawText),
    );
    defs.insert(
        "title".into(),
        HtmlTagDefinition::new()
            .with_content_type(TagContentType::EscapableRawText)
            .with_svg_content_type(TagContentType::ParsableData),
    );
    defs.insert(
        "textarea".into(),
        HtmlTagDefinition::new()
            .with_content_type(TagContentType::EscapableRawText)
            .with_ignore_first_lf(),
    );

    // Every other known HTML element gets the plain definition, which
    // forbids `<div/>`. Unknown (custom) elements fall back to the default.
    let registry = DomElementSchemaRegistry::new();
    for tag_name in registry.all_known_element_names() {
        defs.entry(tag_name.to_lowercase())
            .or_insert_with(HtmlTagDefinition::new);
    }

    defs
});

static DEFAULT_TAG_DEFINITION: Lazy<HtmlTagDefinition> =
    Lazy::new(|| HtmlTagDefinition::new().with_can_self_close());

pub fn is_known_tag(tag_name: &str) -> bool {
    TAG_DEFINITIONS.contains_key(&tag_name.to_lowercase())
}

pub fn get_html_tag_definition(tag_name: &str) -> &'static HtmlTagDefinition {
    TAG_DEFINITIONS
        .get(tag_name)
        .or_else(|| TAG_DEFINITIONS.get(&tag_name.to_lowercase()))
        .unwrap_or(&DEFAULT_TAG_DEFINITION)
}
