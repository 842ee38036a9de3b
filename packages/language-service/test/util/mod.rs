#![allow(dead_code)]

//! Fixtures for language service tests: sources annotated with `~{name}`
//! position markers, a small tour-of-heroes project, and hosts and parsers
//! that count how often they are asked for work.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use angular_compiler::directive_matching::SelectorError;
use angular_compiler::ml_parser::{HtmlParser, ParseTreeResult};
use angular_compiler::schema::SchemaMetadata;
use angular_compiler::{CompileDirectiveMetadata, CompilePipeMetadata, TemplateParseResult};
use angular_language_service::project::ProjectManifest;
use angular_language_service::{
    Completion, DomTemplateParser, LanguageServiceHost, MarkupParser, MetadataResolver,
    ProjectHost, Span, SymbolQuery, TemplateAstParser, TemplateSource,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"~\{(\w+(-\w+)*)\}").unwrap());

/// A source with its markers removed and their offsets recorded.
#[derive(Debug, Clone)]
pub struct MarkedSource {
    pub text: String,
    markers: HashMap<String, usize>,
}

impl MarkedSource {
    pub fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut markers = HashMap::new();
        let mut last = 0;
        for captures in MARKER.captures_iter(source) {
            let whole = captures.get(0).unwrap();
            text.push_str(&source[last..whole.start()]);
            markers.insert(captures[1].to_string(), text.len());
            last = whole.end();
        }
        text.push_str(&source[last..]);
        MarkedSource { text, markers }
    }

    pub fn at(&self, name: &str) -> usize {
        *self
            .markers
            .get(name)
            .unwrap_or_else(|| panic!("no marker named {}", name))
    }

    /// The span of `needle`, searched from the marker `name`.
    pub fn span_of(&self, name: &str, needle: &str) -> Span {
        let from = self.at(name);
        let start = from
            + self.text[from..]
                .find(needle)
                .unwrap_or_else(|| panic!("{:?} does not follow marker {}", needle, name));
        Span::new(start, start + needle.len())
    }
}

/// The text between `template: \`` and the closing backtick.
pub fn inline_template_range(content: &str) -> (usize, usize) {
    let open = "template: `";
    let start = content.find(open).expect("file has an inline template") + open.len();
    let end = start + content[start..].find('`').expect("inline template is closed");
    (start, end)
}

pub const APP_FILE: &str = "app/app.component.ts";
pub const HERO_FILE: &str = "app/hero.ts";
pub const DETAIL_FILE: &str = "app/hero-detail.component.ts";
pub const DETAIL_TEMPLATE: &str = "app/hero-detail.component.html";
pub const LIST_FILE: &str = "app/hero-list.component.ts";
pub const ROUTER_FILE: &str = "router/router.ts";
pub const COMMON_FILE: &str = "common/common.ts";

pub const APP_COMPONENT: &str = r#"import { Component } from '@angular/core';
import { Hero } from './hero';

@Component({
  selector: 'my-app',
  template: `~{empty}
    <~{start-tag}h~{start-tag-after-h}1~{start-tag-h1} ~{h1-after-space}>~{h1-content}{{~{sub-start}title~{sub-end}}}</h1>
    ~{after-h1}<h2>{{hero.name}} details!</h2>
    <div><label>id: </label>{{hero.id}}</div>
    <div ~{div-attributes}>
      <label>name: </label>
      <input [value]="hero.~{input-member}name" [title]="~{title-scope}title">
    </div>
    <my-hero-detail [hero]="hero"></my-hero-detail>
    <a routerLink="/heroes" ~{a-attr}>Heroes</a>
    <router-outlet></router-outlet>
    &~{entity-amp}amp;
  `
})
export class AppComponent {
  title = 'Tour of Heroes';
  hero: Hero = { id: 1, name: 'Windstorm' };
}
"#;

pub const HERO_DETAIL_HTML: &str = r#"<div *ngIf="hero">
  <h2>{{hero.~{detail-name}name}} details!</h2>
  <my-~{list-element}hero-list [her~{heroes-input}oes]="~{heroes-value}heroes" (sel~{selected-output}ected)="onSelected($event)" #~{list-ref}list></my-hero-list>
  <ul>
    <li *ngFor="let ~{item-variable}item of heroes">{{item.~{item-name}name}}</li>
  </ul>
</div>
"#;

pub const HERO: &str = "export class Hero {\n  id: number;\n  name: string;\n}\n";

pub const HERO_LIST: &str = "export class HeroListComponent {\n  @Input() heroes: Hero[];\n  @Output() selected = new EventEmitter<Hero>();\n}\n";

fn span_in(content: &str, needle: &str) -> serde_json::Value {
    let start = content.find(needle).expect("needle is in the content");
    json!({"start": start, "end": start + needle.len()})
}

fn directive(file: &str, name: &str, selector: &str) -> serde_json::Value {
    json!({"type": {"reference": {"filePath": file, "name": name}}, "selector": selector})
}

fn component(file: &str, name: &str, selector: &str) -> serde_json::Value {
    let mut value = directive(file, name, selector);
    value["isComponent"] = json!(true);
    value
}

/// The tour-of-heroes project: an inline template in `APP_FILE` and an
/// external template for `HeroDetailComponent`.
pub struct Toh {
    pub app: MarkedSource,
    pub detail: MarkedSource,
    pub manifest: ProjectManifest,
}

impl Toh {
    /// With type information for every class.
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Metadata only; expressions cannot be typed.
    pub fn without_types() -> Self {
        Self::build(false)
    }

    fn build(with_types: bool) -> Self {
        let app = MarkedSource::new(APP_COMPONENT);
        let detail = MarkedSource::new(HERO_DETAIL_HTML);
        let (start, end) = inline_template_range(&app.text);

        let mut directives = vec![
            component(APP_FILE, "AppComponent", "my-app"),
            component(DETAIL_FILE, "HeroDetailComponent", "my-hero-detail"),
            component(LIST_FILE, "HeroListComponent", "my-hero-list"),
            directive(ROUTER_FILE, "RouterLink", "[routerLink]"),
            directive(ROUTER_FILE, "RouterOutlet", "router-outlet"),
            directive(COMMON_FILE, "NgFor", "[ngFor][ngForOf]"),
            directive(COMMON_FILE, "NgIf", "[ngIf]"),
        ];
        directives[1]["inputs"] = json!(["hero"]);
        directives[2]["inputs"] = json!(["heroes"]);
        directives[2]["outputs"] = json!(["selected"]);
        directives[3]["inputs"] = json!(["routerLink", "target"]);
        directives[5]["inputs"] = json!(["ngForOf"]);
        directives[6]["inputs"] = json!(["ngIf"]);

        let classes = if with_types {
            json!([
                {"file": HERO_FILE, "name": "Hero", "span": span_in(HERO, "Hero"), "members": [
                    {"name": "id", "type": "number", "span": span_in(HERO, "id")},
                    {"name": "name", "type": "string", "span": span_in(HERO, "name")}
                ]},
                {"file": APP_FILE, "name": "AppComponent", "members": [
                    {"name": "title", "type": "string"},
                    {"name": "hero", "type": "Hero"}
                ]},
                {"file": DETAIL_FILE, "name": "HeroDetailComponent", "members": [
                    {"name": "hero", "type": "Hero", "kind": "input"},
                    {"name": "heroes", "type": "Hero[]"},
                    {"name": "onSelected", "type": "void", "kind": "method"}
                ]},
                {"file": LIST_FILE, "name": "HeroListComponent", "span": span_in(HERO_LIST, "HeroListComponent"), "members": [
                    {"name": "heroes", "type": "Hero[]", "kind": "input", "span": span_in(HERO_LIST, "heroes")},
                    {"name": "selected", "type": "any", "kind": "output", "span": span_in(HERO_LIST, "selected")}
                ]},
                {"file": COMMON_FILE, "name": "NgFor", "typeParameters": ["T"], "members": [
                    {"name": "ngForOf", "type": "T[]", "kind": "input"}
                ]}
            ])
        } else {
            json!([])
        };

        let manifest = json!({
            "files": [
                {"fileName": APP_FILE, "version": "1", "content": app.text,
                 "templates": [{"component": "AppComponent", "start": start, "end": end}]},
                {"fileName": DETAIL_TEMPLATE, "version": "1", "content": detail.text,
                 "templates": [{"component": "HeroDetailComponent", "componentFile": DETAIL_FILE}]},
                {"fileName": HERO_FILE, "content": HERO},
                {"fileName": LIST_FILE, "content": HERO_LIST}
            ],
            "directives": directives,
            "classes": classes
        });
        let manifest = serde_json::from_value(manifest).expect("fixture manifest is valid");
        Toh {
            app,
            detail,
            manifest,
        }
    }

    pub fn host(&self) -> ProjectHost {
        ProjectHost::from_manifest(self.manifest.clone(), Path::new(".")).expect("fixture project loads")
    }
}

impl Default for Toh {
    fn default() -> Self {
        Self::new()
    }
}

/// A project with a single file whose templates are given by `(component,
/// start, end)`.
pub fn single_file_host(file_name: &str, content: &str, templates: &[(&str, usize, usize)]) -> ProjectHost {
    let templates: Vec<serde_json::Value> = templates
        .iter()
        .map(|(component, start, end)| json!({"component": component, "start": start, "end": end}))
        .collect();
    let manifest = json!({
        "files": [{"fileName": file_name, "content": content, "templates": templates}],
        "directives": [component(file_name, "AppComponent", "my-app")],
        "classes": [{"file": file_name, "name": "Helper"}]
    });
    let manifest: ProjectManifest = serde_json::from_value(manifest).expect("fixture manifest is valid");
    ProjectHost::from_manifest(manifest, Path::new(".")).expect("fixture project loads")
}

/// Shared call counter.
#[derive(Debug, Clone, Default)]
pub struct Counter(Rc<Cell<usize>>);

impl Counter {
    pub fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

pub struct CountingMarkupParser {
    pub calls: Counter,
}

impl MarkupParser for CountingMarkupParser {
    fn parse(&self, source: &str, url: &str) -> ParseTreeResult {
        self.calls.bump();
        HtmlParser::new().parse(source, url)
    }
}

pub struct CountingTemplateParser {
    pub calls: Counter,
    inner: DomTemplateParser,
}

impl CountingTemplateParser {
    pub fn new(calls: Counter) -> Self {
        CountingTemplateParser {
            calls,
            inner: DomTemplateParser::new(),
        }
    }
}

impl TemplateAstParser for CountingTemplateParser {
    fn parse(
        &self,
        html: &ParseTreeResult,
        component: &CompileDirectiveMetadata,
        directives: &[CompileDirectiveMetadata],
        pipes: &[CompilePipeMetadata],
        schemas: &[SchemaMetadata],
    ) -> Result<TemplateParseResult, SelectorError> {
        self.calls.bump();
        self.inner.parse(html, component, directives, pipes, schemas)
    }
}

/// Delegates to a project and counts template list lookups. Without a
/// script version nothing can be cached per file.
pub struct CountingHost {
    pub inner: ProjectHost,
    pub template_lookups: Counter,
    pub report_versions: bool,
}

impl CountingHost {
    pub fn new(inner: ProjectHost) -> Self {
        CountingHost {
            inner,
            template_lookups: Counter::default(),
            report_versions: true,
        }
    }
}

impl LanguageServiceHost for CountingHost {
    fn resolver(&self) -> &dyn MetadataResolver {
        self.inner.resolver()
    }

    fn get_template_at(&self, file_name: &str, position: usize) -> Option<TemplateSource> {
        self.inner.get_template_at(file_name, position)
    }

    fn get_templates(&self, file_name: &str) -> Option<Vec<TemplateSource>> {
        self.template_lookups.bump();
        self.inner.get_templates(file_name)
    }

    fn get_script_version(&self, file_name: &str) -> Option<String> {
        if self.report_versions {
            self.inner.get_script_version(file_name)
        } else {
            None
        }
    }

    fn get_symbol_query(&self, file_name: &str) -> Option<Rc<dyn SymbolQuery>> {
        self.inner.get_symbol_query(file_name)
    }
}

/// Fails when any of `names` is missing from `completions`.
pub fn expect_entries(completions: Option<Vec<Completion>>, names: &[&str]) {
    let completions = completions.expect("completions are available");
    let missing: Vec<&&str> = names
        .iter()
        .filter(|name| !completions.iter().any(|c| c.name == **name))
        .collect();
    assert!(
        missing.is_empty(),
        "missing {:?} in {:?}",
        missing,
        completions.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
    );
}

pub fn names(completions: &[Completion]) -> Vec<&str> {
    completions.iter().map(|c| c.name.as_str()).collect()
}
