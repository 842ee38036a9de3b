//! HTML Parser
//!
//! The markup parser wired to the HTML tag definitions.

use super::html_tags::get_html_tag_definition;
use super::lexer::TokenizeOptions;
use super::parser::{ParseTreeResult, Parser};

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        HtmlParser
    }

    /// Parses a template without ICU expansion forms.
    pub fn parse(&self, source: &str, url: &str) -> ParseTreeResult {
        self.parse_with_options(source, url, TokenizeOptions::default())
    }

    pub fn parse_with_options(
        &self,
        source: &str,
        url: &str,
        options: TokenizeOptions,
    ) -> ParseTreeResult {
        Parser::new(get_html_tag_definition).parse(source, url, options)
    }
}
