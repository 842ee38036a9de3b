//! HTML Info
//!
//! Element and attribute names of HTML 4.01 strict, used for completions.
//! Each element lists attribute groups; a group maps attribute names to an
//! entry of the value table.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The values an attribute accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// A DTD value kind such as `CDATA` or `NUMBER`.
    Named(&'static str),
    /// One of a fixed list of keywords.
    Enumerated(&'static [&'static str]),
}

use AttrType::{Enumerated, Named};

const VALUES: &[AttrType] = &[
    Named("ID"),
    Named("CDATA"),
    Named("NAME"),
    Enumerated(&["ltr", "rtl"]),
    Enumerated(&["rect", "circle", "poly", "default"]),
    Named("NUMBER"),
    Enumerated(&["nohref"]),
    Enumerated(&["ismap"]),
    Enumerated(&["declare"]),
    Enumerated(&["DATA", "REF", "OBJECT"]),
    Enumerated(&["GET", "POST"]),
    Named("IDREF"),
    Enumerated(&[
        "TEXT", "PASSWORD", "CHECKBOX", "RADIO", "SUBMIT", "RESET", "FILE", "HIDDEN", "IMAGE",
        "BUTTON",
    ]),
    Enumerated(&["checked"]),
    Enumerated(&["disabled"]),
    Enumerated(&["readonly"]),
    Enumerated(&["multiple"]),
    Enumerated(&["selected"]),
    Enumerated(&["button", "submit", "reset"]),
    Enumerated(&["void", "above", "below", "hsides", "lhs", "rhs", "vsides", "box", "border"]),
    Enumerated(&["none", "groups", "rows", "cols", "all"]),
    Enumerated(&["left", "center", "right", "justify", "char"]),
    Enumerated(&["top", "middle", "bottom", "baseline"]),
    Named("IDREFS"),
    Enumerated(&["row", "col", "rowgroup", "colgroup"]),
    Enumerated(&["defer"]),
];

const GROUPS: &[&[(&str, usize)]] = &[
    &[("id", 0)],
    &[
        ("onclick", 1),
        ("ondblclick", 1),
        ("onmousedown", 1),
        ("onmouseup", 1),
        ("onmouseover", 1),
        ("onmousemove", 1),
        ("onmouseout", 1),
        ("onkeypress", 1),
        ("onkeydown", 1),
        ("onkeyup", 1),
    ],
    &[("lang", 2), ("dir", 3)],
    &[("onload", 1), ("onunload", 1)],
    &[("name", 1)],
    &[("href", 1)],
    &[("type", 1)],
    &[("alt", 1)],
    &[("tabindex", 5)],
    &[("media", 1)],
    &[("nohref", 6)],
    &[("usemap", 1)],
    &[("src", 1)],
    &[("onfocus", 1), ("onblur", 1)],
    &[("charset", 1)],
    &[
        ("declare", 8),
        ("classid", 1),
        ("codebase", 1),
        ("data", 1),
        ("codetype", 1),
        ("archive", 1),
        ("standby", 1),
    ],
    &[("title", 1)],
    &[("value", 1)],
    &[("cite", 1)],
    &[("datetime", 1)],
    &[("accept", 1)],
    &[("shape", 4), ("coords", 1)],
    &[("for", 11)],
    &[
        ("action", 1),
        ("method", 10),
        ("enctype", 1),
        ("onsubmit", 1),
        ("onreset", 1),
        ("accept-charset", 1),
    ],
    &[("valuetype", 9)],
    &[("longdesc", 1)],
    &[("width", 1)],
    &[("disabled", 14)],
    &[("readonly", 15), ("onselect", 1)],
    &[("accesskey", 1)],
    &[("size", 5), ("multiple", 16)],
    &[("onchange", 1)],
    &[("label", 1)],
    &[("selected", 17)],
    &[("type", 12), ("checked", 13), ("size", 1), ("maxlength", 5)],
    &[("rows", 5), ("cols", 5)],
    &[("type", 18)],
    &[("height", 1)],
    &[
        ("summary", 1),
        ("border", 1),
        ("frame", 19),
        ("rules", 20),
        ("cellspacing", 1),
        ("cellpadding", 1),
        ("datapagesize", 1),
    ],
    &[("align", 21), ("char", 1), ("charoff", 1), ("valign", 22)],
    &[("span", 5)],
    &[
        ("abbr", 1),
        ("axis", 1),
        ("headers", 23),
        ("scope", 24),
        ("rowspan", 5),
        ("colspan", 5),
    ],
    &[("profile", 1)],
    &[("http-equiv", 2), ("name", 2), ("content", 1), ("scheme", 1)],
    &[("class", 1), ("style", 1)],
    &[("hreflang", 2), ("rel", 1), ("rev", 1)],
    &[("ismap", 7)],
    &[("defer", 25), ("event", 1), ("for", 1)],
];

const PHRASE: &[usize] = &[0, 1, 2, 16, 44];
const CELL_ALIGN: &[usize] = &[0, 1, 2, 16, 39, 44];

const ELEMENTS: &[(&str, &[usize])] = &[
    ("TT", PHRASE),
    ("I", PHRASE),
    ("B", PHRASE),
    ("BIG", PHRASE),
    ("SMALL", PHRASE),
    ("EM", PHRASE),
    ("STRONG", PHRASE),
    ("DFN", PHRASE),
    ("CODE", PHRASE),
    ("SAMP", PHRASE),
    ("KBD", PHRASE),
    ("VAR", PHRASE),
    ("CITE", PHRASE),
    ("ABBR", PHRASE),
    ("ACRONYM", PHRASE),
    ("SUB", PHRASE),
    ("SUP", PHRASE),
    ("SPAN", PHRASE),
    ("BDO", &[0, 2, 16, 44]),
    ("BR", &[0, 16, 44]),
    ("BODY", &[0, 1, 2, 3, 16, 44]),
    ("ADDRESS", PHRASE),
    ("DIV", PHRASE),
    ("A", &[0, 1, 2, 4, 5, 6, 8, 13, 14, 16, 21, 29, 44, 45]),
    ("MAP", &[0, 1, 2, 4, 16, 44]),
    ("AREA", &[0, 1, 2, 5, 7, 8, 10, 13, 16, 21, 29, 44]),
    ("LINK", &[0, 1, 2, 5, 6, 9, 14, 16, 44, 45]),
    ("IMG", &[0, 1, 2, 4, 7, 11, 12, 16, 25, 26, 37, 44, 46]),
    ("OBJECT", &[0, 1, 2, 4, 6, 8, 11, 15, 16, 26, 37, 44]),
    ("PARAM", &[0, 4, 6, 17, 24]),
    ("HR", PHRASE),
    ("P", PHRASE),
    ("H1", PHRASE),
    ("H2", PHRASE),
    ("H3", PHRASE),
    ("H4", PHRASE),
    ("H5", PHRASE),
    ("H6", PHRASE),
    ("PRE", PHRASE),
    ("Q", &[0, 1, 2, 16, 18, 44]),
    ("BLOCKQUOTE", &[0, 1, 2, 16, 18, 44]),
    ("INS", &[0, 1, 2, 16, 18, 19, 44]),
    ("DEL", &[0, 1, 2, 16, 18, 19, 44]),
    ("DL", PHRASE),
    ("DT", PHRASE),
    ("DD", PHRASE),
    ("OL", PHRASE),
    ("UL", PHRASE),
    ("LI", PHRASE),
    ("FORM", &[0, 1, 2, 4, 16, 20, 23, 44]),
    ("LABEL", &[0, 1, 2, 13, 16, 22, 29, 44]),
    (
        "INPUT",
        &[0, 1, 2, 4, 7, 8, 11, 12, 13, 16, 17, 20, 27, 28, 29, 31, 34, 44, 46],
    ),
    ("SELECT", &[0, 1, 2, 4, 8, 13, 16, 27, 30, 31, 44]),
    ("OPTGROUP", &[0, 1, 2, 16, 27, 32, 44]),
    ("OPTION", &[0, 1, 2, 16, 17, 27, 32, 33, 44]),
    ("TEXTAREA", &[0, 1, 2, 4, 8, 13, 16, 27, 28, 29, 31, 35, 44]),
    ("FIELDSET", PHRASE),
    ("LEGEND", &[0, 1, 2, 16, 29, 44]),
    ("BUTTON", &[0, 1, 2, 4, 8, 13, 16, 17, 27, 29, 36, 44]),
    ("TABLE", &[0, 1, 2, 16, 26, 38, 44]),
    ("CAPTION", PHRASE),
    ("COLGROUP", &[0, 1, 2, 16, 26, 39, 40, 44]),
    ("COL", &[0, 1, 2, 16, 26, 39, 40, 44]),
    ("THEAD", CELL_ALIGN),
    ("TBODY", CELL_ALIGN),
    ("TFOOT", CELL_ALIGN),
    ("TR", CELL_ALIGN),
    ("TH", &[0, 1, 2, 16, 39, 41, 44]),
    ("TD", &[0, 1, 2, 16, 39, 41, 44]),
    ("HEAD", &[2, 42]),
    ("TITLE", &[2]),
    ("BASE", &[5]),
    ("META", &[2, 43]),
    ("STYLE", &[2, 6, 9, 16]),
    ("SCRIPT", &[6, 12, 14, 47]),
    ("NOSCRIPT", PHRASE),
    ("HTML", &[2]),
];

static ELEMENT_GROUPS: Lazy<HashMap<&'static str, &'static [usize]>> =
    Lazy::new(|| ELEMENTS.iter().copied().collect());

/// Merges the groups of an element; later groups override earlier ones.
fn compose(element: &str) -> IndexMap<&'static str, usize> {
    let mut result = IndexMap::new();
    if let Some(indexes) = ELEMENT_GROUPS.get(element.to_uppercase().as_str()) {
        for index in indexes.iter() {
            if let Some(group) = GROUPS.get(*index) {
                result.extend(group.iter().copied());
            }
        }
    }
    result
}

/// Every known element, lowercase, in sorted order.
pub fn element_names() -> Vec<String> {
    let mut names: Vec<&str> = ELEMENTS.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names.into_iter().map(str::to_lowercase).collect()
}

/// The attributes `element` accepts, sorted. Unknown elements have none.
pub fn attribute_names(element: &str) -> Vec<String> {
    let mut names: Vec<String> = compose(element).keys().map(|k| k.to_string()).collect();
    names.sort();
    names
}

pub fn attribute_type(element: &str, attribute: &str) -> Option<AttrType> {
    compose(element)
        .get(attribute.to_lowercase().as_str())
        .and_then(|index| VALUES.get(*index))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_names_are_sorted_lowercase() {
        let names = element_names();
        assert_eq!(names.len(), ELEMENTS.len());
        assert_eq!(names.first().map(String::as_str), Some("a"));
        assert!(names.contains(&"h1".to_string()));
        assert!(names.contains(&"noscript".to_string()));
        assert!(names.iter().all(|n| n.chars().all(|c| !c.is_ascii_uppercase())));
    }

    #[test]
    fn test_attribute_names() {
        let names = attribute_names("a");
        assert!(names.contains(&"href".to_string()));
        assert!(names.contains(&"onclick".to_string()));
        assert!(names.contains(&"class".to_string()));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(attribute_names("TITLE"), vec!["dir", "lang"]);
        assert!(attribute_names("my-comp").is_empty());
    }

    #[test]
    fn test_attribute_types() {
        // `size` comes from different groups on input and select.
        assert_eq!(attribute_type("input", "size"), Some(Named("CDATA")));
        assert_eq!(attribute_type("select", "size"), Some(Named("NUMBER")));
        assert_eq!(
            attribute_type("input", "type"),
            Some(Enumerated(&[
                "TEXT", "PASSWORD", "CHECKBOX", "RADIO", "SUBMIT", "RESET", "FILE", "HIDDEN",
                "IMAGE", "BUTTON"
            ]))
        );
        assert_eq!(attribute_type("a", "HREF"), Some(Named("CDATA")));
        assert_eq!(attribute_type("a", "nope"), None);
        assert_eq!(attribute_type("meta", "name"), Some(Named("NAME")));
    }
}
