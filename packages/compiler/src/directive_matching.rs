/**
 * Directive Matching - CSS Selector Matching
 *
 * Parses directive selectors and finds the directives whose selector matches
 * an element.
 */
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

static SELECTOR_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\:not\()|(([\.\#]?)[-\w]+)|(?:\[([-.\w*\\$]+)(?:=(?:"([^"]*)"|'([^']*)'|([^\]]*)))?\])|(\))|(\s*,\s*)"#)
        .expect("selector pattern is valid")
});

/// Capture groups of [`SELECTOR_REGEXP`].
#[derive(Debug, Clone, Copy)]
enum SelectorRegexp {
    Not = 1,
    Tag = 2,
    Prefix = 3,
    Attribute = 4,
    AttributeValueDouble = 5,
    AttributeValueSingle = 6,
    AttributeValueUnquoted = 7,
    NotEnd = 8,
    Separator = 9,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Nesting :not in a selector is not allowed")]
    NestedNot,
    #[error("Multiple selectors in :not are not supported")]
    MultipleInNot,
    #[error("Error in attribute selector \"{0}\". Unescaped \"$\" is not supported. Please escape with \"\\$\".")]
    UnescapedDollar(String),
}

/// A compound selector: optional element, classes, attributes and `:not()` parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssSelector {
    pub element: Option<String>,
    pub class_names: Vec<String>,
    /// `(name, lowercased value)`; the value is empty when only presence matters.
    pub attrs: Vec<(String, String)>,
    pub not_selectors: Vec<CssSelector>,
}

impl CssSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma separated selector list.
    pub fn parse(selector: &str) -> Result<Vec<CssSelector>, SelectorError> {
        let mut results = Vec::new();
        let mut css_selector = CssSelector::new();
        let mut in_not = false;

        for cap in SELECTOR_REGEXP.captures_iter(selector) {
            if cap.get(SelectorRegexp::Not as usize).is_some() {
                if in_not {
                    return Err(SelectorError::NestedNot);
                }
                in_not = true;
                css_selector.not_selectors.push(CssSelector::new());
            }

            if let Some(tag_match) = cap.get(SelectorRegexp::Tag as usize) {
                let tag = tag_match.as_str();
                let prefix = cap
                    .get(SelectorRegexp::Prefix as usize)
                    .map(|m| m.as_str())
                    .unwrap_or("");
                let current = css_selector.current(in_not);
                match prefix {
                    "#" => current.add_attribute("id", &tag[1..]),
                    "." => current.add_class_name(&tag[1..]),
                    _ => current.set_element(tag),
                }
            }

            if let Some(attr_match) = cap.get(SelectorRegexp::Attribute as usize) {
                let value = [
                    SelectorRegexp::AttributeValueDouble,
                    SelectorRegexp::AttributeValueSingle,
                    SelectorRegexp::AttributeValueUnquoted,
                ]
                .iter()
                .find_map(|group| cap.get(*group as usize))
                .map(|m| m.as_str())
                .unwrap_or("");
                let name = unescape_attribute(attr_match.as_str())?;
                css_selector.current(in_not).add_attribute(&name, value);
            }

            if cap.get(SelectorRegexp::NotEnd as usize).is_some() {
                in_not = false;
            }

            if cap.get(SelectorRegexp::Separator as usize).is_some() {
                if in_not {
                    return Err(SelectorError::MultipleInNot);
                }
                add_result(&mut results, std::mem::take(&mut css_selector));
            }
        }

        add_result(&mut results, css_selector);
        Ok(results)
    }

    fn current(&mut self, in_not: bool) -> &mut CssSelector {
        if in_not && !self.not_selectors.is_empty() {
            let last = self.not_selectors.len() - 1;
            &mut self.not_selectors[last]
        } else {
            self
        }
    }

    pub fn is_element_selector(&self) -> bool {
        self.has_element_selector() && self.class_names.is_empty() && self.attrs.is_empty()
    }

    pub fn has_element_selector(&self) -> bool {
        matches!(self.element.as_deref(), Some(element) if element != "*")
    }

    pub fn set_element(&mut self, element: &str) {
        self.element = Some(element.to_string());
    }

    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_string(), value.to_lowercase()));
    }

    pub fn add_class_name(&mut self, name: &str) {
        self.class_names.push(name.to_lowercase());
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|(name, _)| name.as_str())
    }
}

fn add_result(results: &mut Vec<CssSelector>, mut css_sel: CssSelector) {
    if !css_sel.not_selectors.is_empty()
        && css_sel.element.is_none()
        && css_sel.class_names.is_empty()
        && css_sel.attrs.is_empty()
    {
        css_sel.element = Some("*".to_string());
    }
    results.push(css_sel);
}

/// Drops `\` escapes; a bare `$` is rejected.
fn unescape_attribute(attr: &str) -> Result<String, SelectorError> {
    let mut result = String::with_capacity(attr.len());
    let mut escaping = false;
    for ch in attr.chars() {
        if ch == '\\' {
            escaping = true;
            continue;
        }
        if ch == '$' && !escaping {
            return Err(SelectorError::UnescapedDollar(attr.to_string()));
        }
        escaping = false;
        result.push(ch);
    }
    Ok(result)
}

impl fmt::Display for CssSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(element) = &self.element {
            write!(f, "{}", element)?;
        }
        for class_name in &self.class_names {
            write!(f, ".{}", class_name)?;
        }
        for (name, value) in &self.attrs {
            let name = name.replace('$', "\\$");
            if value.is_empty() {
                write!(f, "[{}]", name)?;
            } else {
                write!(f, "[{}={}]", name, value)?;
            }
        }
        for not_selector in &self.not_selectors {
            write!(f, ":not({})", not_selector)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct SelectorContext<T> {
    selector: CssSelector,
    data: T,
    id: usize,
}

/// Index of selectors by element, class and attribute.
#[derive(Debug, Clone)]
pub struct SelectorMatcher<T> {
    element_map: HashMap<String, Vec<SelectorContext<T>>>,
    class_map: HashMap<String, Vec<SelectorContext<T>>>,
    attr_map: HashMap<String, HashMap<String, Vec<SelectorContext<T>>>>,
    counter: usize,
}

impl<T: Clone> SelectorMatcher<T> {
    pub fn new() -> Self {
        SelectorMatcher {
            element_map: HashMap::new(),
            class_map: HashMap::new(),
            attr_map: HashMap::new(),
            counter: 0,
        }
    }

    pub fn add_selectables(&mut self, selectors: &[CssSelector], data: T) {
        for selector in selectors {
            self.add_selectable(selector.clone(), data.clone());
        }
    }

    pub fn add_selectable(&mut self, css_selector: CssSelector, data: T) {
        let context = SelectorContext {
            selector: css_selector.clone(),
            data,
            id: self.counter,
        };
        self.counter += 1;

        if let Some(element) = &css_selector.element {
            self.element_map
                .entry(element.clone())
                .or_default()
                .push(context.clone());
        }
        for class_name in &css_selector.class_names {
            self.class_map
                .entry(class_name.clone())
                .or_default()
                .push(context.clone());
        }
        for (name, value) in &css_selector.attrs {
            self.attr_map
                .entry(name.clone())
                .or_default()
                .entry(value.clone())
                .or_default()
                .push(context.clone());
        }
    }

    /// Calls `callback` once per registered selector matching `css_selector`.
    /// Returns whether anything matched.
    pub fn match_selector<F>(&self, css_selector: &CssSelector, mut callback: F) -> bool
    where
        F: FnMut(&CssSelector, &T),
    {
        let mut seen = HashSet::new();
        let mut candidates: Vec<&SelectorContext<T>> = Vec::new();

        if let Some(element) = &css_selector.element {
            candidates.extend(self.element_map.get(element).into_iter().flatten());
        }
        candidates.extend(self.element_map.get("*").into_iter().flatten());
        for class_name in &css_selector.class_names {
            candidates.extend(self.class_map.get(class_name).into_iter().flatten());
        }
        for (name, value) in &css_selector.attrs {
            if let Some(values) = self.attr_map.get(name) {
                candidates.extend(values.get(value).into_iter().flatten());
                if !value.is_empty() {
                    candidates.extend(values.get("").into_iter().flatten());
                }
            }
        }

        let mut matched = false;
        for context in candidates {
            if seen.insert(context.id) && is_match(css_selector, &context.selector) {
                callback(&context.selector, &context.data);
                matched = true;
            }
        }
        matched
    }
}

impl<T: Clone> Default for SelectorMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn is_match(selector: &CssSelector, pattern: &CssSelector) -> bool {
    if let Some(pat_elem) = &pattern.element {
        if pat_elem != "*" && selector.element.as_ref() != Some(pat_elem) {
            return false;
        }
    }

    if !pattern
        .class_names
        .iter()
        .all(|class| selector.class_names.contains(class))
    {
        return false;
    }

    for (pat_name, pat_value) in &pattern.attrs {
        let found = selector.attrs.iter().any(|(name, value)| {
            name == pat_name && (pat_value.is_empty() || value.eq_ignore_ascii_case(pat_value))
        });
        if !found {
            return false;
        }
    }

    !pattern
        .not_selectors
        .iter()
        .any(|not_selector| not_matches(selector, not_selector))
}

/// A `:not()` part matches when every condition it names holds.
fn not_matches(selector: &CssSelector, not_selector: &CssSelector) -> bool {
    let element_ok = match not_selector.element.as_deref() {
        None | Some("*") => true,
        Some(element) => selector.element.as_deref() == Some(element),
    };
    element_ok
        && not_selector
            .class_names
            .iter()
            .all(|class| selector.class_names.contains(class))
        && not_selector.attrs.iter().all(|(pat_name, pat_value)| {
            selector.attrs.iter().any(|(name, value)| {
                name == pat_name && (pat_value.is_empty() || value.eq_ignore_ascii_case(pat_value))
            })
        })
}
