//! Tag helpers shared by the markup parser and the template parser.

/// How the lexer treats the content of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContentType {
    /// `<script>`, `<style>`: no markup, no entities.
    RawText,
    /// `<textarea>`, `<title>`: no markup, entities decoded.
    EscapableRawText,
    ParsableData,
}

/// Splits a `:namespace:name` element name.
///
/// Names without a leading colon have no namespace. A leading colon with
/// no second colon is an error when `fatal` is set, otherwise the name is
/// returned unchanged.
pub fn split_ns_name(element_name: &str, fatal: bool) -> Result<(Option<String>, String), String> {
    let rest = match element_name.strip_prefix(':') {
        Some(rest) => rest,
        None => return Ok((None, element_name.to_string())),
    };

    match rest.find(':') {
        Some(idx) => Ok((Some(rest[..idx].to_string()), rest[idx + 1..].to_string())),
        None if fatal => Err(format!(
            "Unsupported format \"{}\" expecting \":namespace:name\"",
            element_name
        )),
        None => Ok((None, element_name.to_string())),
    }
}

/// The local part of a possibly namespaced name.
pub fn local_name(name: &str) -> String {
    split_ns_name(name, false)
        .map(|(_, name)| name)
        .unwrap_or_else(|_| name.to_string())
}

pub fn is_ng_container(tag_name: &str) -> bool {
    local_name(tag_name) == "ng-container"
}

pub fn is_ng_content(tag_name: &str) -> bool {
    local_name(tag_name) == "ng-content"
}

/// `<ng-template>` and the legacy `<template>` both declare embedded views.
pub fn is_ng_template(tag_name: &str) -> bool {
    let name = local_name(tag_name);
    name == "ng-template" || name == "template"
}
