//! Template Preparser
//!
//! Classifies markup elements before binding: `<ng-content>`, elements the
//! template parser drops (`<script>`, `<style>`, stylesheet links) and
//! `ngNonBindable` subtrees.

use crate::ml_parser::ast::Element;
use crate::ml_parser::tags::{is_ng_content, local_name};

const NG_CONTENT_SELECT_ATTR: &str = "select";
const LINK_ELEMENT: &str = "link";
const LINK_STYLE_REL_ATTR: &str = "rel";
const LINK_STYLE_REL_VALUE: &str = "stylesheet";
const STYLE_ELEMENT: &str = "style";
const SCRIPT_ELEMENT: &str = "script";
const NG_NON_BINDABLE_ATTR: &str = "ngNonBindable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreparsedElementType {
    NgContent,
    Style,
    Stylesheet,
    Script,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparsedElement {
    pub element_type: PreparsedElementType,
    /// `select` of an `<ng-content>`, `*` when absent.
    pub select_attr: String,
    pub non_bindable: bool,
}

impl PreparsedElement {
    /// Elements that produce no template node at all.
    pub fn is_dropped(&self) -> bool {
        matches!(
            self.element_type,
            PreparsedElementType::Script | PreparsedElementType::Style | PreparsedElementType::Stylesheet
        )
    }
}

pub fn preparse_element(element: &Element) -> PreparsedElement {
    let mut select_attr = None;
    let mut rel_attr = None;
    let mut non_bindable = false;

    for attr in &element.attrs {
        let name = attr.name.to_lowercase();
        if name == NG_CONTENT_SELECT_ATTR {
            select_attr = Some(attr.value.clone());
        } else if name == LINK_STYLE_REL_ATTR {
            rel_attr = Some(attr.value.clone());
        } else if attr.name == NG_NON_BINDABLE_ATTR {
            non_bindable = true;
        }
    }

    let node_name = local_name(&element.name).to_lowercase();
    let element_type = if is_ng_content(&node_name) {
        PreparsedElementType::NgContent
    } else if node_name == STYLE_ELEMENT {
        PreparsedElementType::Style
    } else if node_name == SCRIPT_ELEMENT {
        PreparsedElementType::Script
    } else if node_name == LINK_ELEMENT && rel_attr.as_deref() == Some(LINK_STYLE_REL_VALUE) {
        PreparsedElementType::Stylesheet
    } else {
        PreparsedElementType::Other
    };

    PreparsedElement {
        element_type,
        select_attr: match select_attr {
            Some(select) if !select.is_empty() => select,
            _ => "*".to_string(),
        },
        non_bindable,
    }
}
