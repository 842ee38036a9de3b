//! Project Host
//!
//! A [`LanguageServiceHost`] backed by a JSON manifest: the source files
//! and where their templates are, the directive and pipe metadata, and
//! optionally the classes the templates bind to.
//!
//! ```json
//! {
//!   "files": [
//!     {"fileName": "app.component.ts", "version": "3", "path": "src/app.component.ts",
//!      "templates": [{"component": "AppComponent", "start": 120, "end": 181}]},
//!     {"fileName": "hero.html", "content": "<h1>{{hero.name}}</h1>",
//!      "templates": [{"component": "HeroComponent", "componentFile": "hero.ts"}]}
//!   ],
//!   "directives": [{"type": {"reference": {"filePath": "app.component.ts", "name": "AppComponent"}},
//!                   "isComponent": true, "selector": "my-app"}],
//!   "classes": [{"file": "app.component.ts", "name": "AppComponent",
//!                "members": [{"name": "title", "type": "string"}]}]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use angular_compiler::{CompileDirectiveMetadata, CompilePipeMetadata, StaticSymbol};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ProjectError, ResolveError};
use crate::static_symbols::{MemberFlags, StaticTypes};
use crate::symbols::{BuiltinType, Symbol, SymbolQuery};
use crate::types::{LanguageServiceHost, MetadataResolver, Span, TemplateSource};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    #[serde(default)]
    pub files: Vec<FileManifest>,
    #[serde(default)]
    pub directives: Vec<CompileDirectiveMetadata>,
    #[serde(default)]
    pub pipes: Vec<CompilePipeMetadata>,
    #[serde(default)]
    pub classes: Vec<ClassManifest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileManifest {
    pub file_name: String,
    #[serde(default = "initial_version")]
    pub version: String,
    /// Inline file text; wins over `path`.
    pub content: Option<String>,
    /// File to read, relative to the manifest.
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub templates: Vec<TemplateManifest>,
}

fn initial_version() -> String {
    "0".to_string()
}

/// A template inside a file. Without `start`/`end` the whole file is the
/// template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateManifest {
    pub component: String,
    /// File declaring the component; defaults to the file of the template.
    pub component_file: Option<String>,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassManifest {
    pub file: String,
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Base class, written as a type.
    pub extends: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberManifest>,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    #[default]
    Property,
    Input,
    Output,
    Method,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberManifest {
    pub name: String,
    /// A type such as `string`, `Hero[]`, `T | null` or `Map<string, Hero>`;
    /// the result type for methods.
    #[serde(rename = "type", default = "any_type")]
    pub type_: String,
    #[serde(default)]
    pub kind: MemberKind,
    #[serde(default)]
    pub private: bool,
    pub span: Option<Span>,
}

fn any_type() -> String {
    "any".to_string()
}

#[derive(Debug, Clone)]
struct SourceFile {
    version: String,
    content: String,
    templates: Vec<TemplateSource>,
}

/// A project loaded from a manifest.
#[derive(Debug)]
pub struct ProjectHost {
    files: IndexMap<String, SourceFile>,
    directives: Vec<CompileDirectiveMetadata>,
    pipes: Vec<CompilePipeMetadata>,
    /// Declared classes that are not directives.
    classes: Vec<StaticSymbol>,
    types: Option<StaticTypes>,
}

impl ProjectHost {
    /// Reads the manifest at `path`; file paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let text = read(path)?;
        let manifest: ProjectManifest = serde_json::from_str(&text).map_err(|source| ProjectError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_manifest(manifest, base)
    }

    pub fn from_manifest(manifest: ProjectManifest, base: &Path) -> Result<Self, ProjectError> {
        let mut files = IndexMap::new();
        for file in manifest.files {
            let content = match (file.content, &file.path) {
                (Some(content), _) => content,
                (None, Some(path)) => read(&base.join(path))?,
                (None, None) => return Err(ProjectError::MissingContent(file.file_name)),
            };
            let templates = file
                .templates
                .iter()
                .map(|template| template_source(&file.file_name, &file.version, &content, template))
                .collect::<Result<Vec<_>, _>>()?;
            files.insert(
                file.file_name,
                SourceFile {
                    version: file.version,
                    content,
                    templates,
                },
            );
        }

        let classes = manifest
            .classes
            .iter()
            .map(|class| StaticSymbol::new(class.file.as_str(), class.name.as_str()))
            .collect();
        let types = if manifest.classes.is_empty() {
            None
        } else {
            Some(build_types(&manifest.classes)?)
        };

        tracing::debug!(
            files = files.len(),
            directives = manifest.directives.len(),
            pipes = manifest.pipes.len(),
            "project loaded"
        );
        Ok(ProjectHost {
            files,
            directives: manifest.directives,
            pipes: manifest.pipes,
            classes,
            types,
        })
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn content(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(|file| file.content.as_str())
    }

    /// Replaces the text of a file and bumps its version. Template spans
    /// are kept, so edits are expected to stay inside them.
    pub fn update_file(&mut self, file_name: &str, content: String) -> Result<(), ProjectError> {
        let Some(file) = self.files.get_mut(file_name) else {
            return Err(ProjectError::UnknownFile(file_name.to_string()));
        };
        let version = file
            .version
            .parse::<u64>()
            .map(|v| (v + 1).to_string())
            .unwrap_or_else(|_| format!("{}'", file.version));
        let mut templates = Vec::with_capacity(file.templates.len());
        for template in &file.templates {
            let end = template.span.end.min(content.len());
            let start = template.span.start.min(end);
            let source = content
                .get(start..end)
                .ok_or_else(|| ProjectError::TemplateOutOfBounds {
                    file: file_name.to_string(),
                    start,
                    end,
                })?
                .to_string();
            templates.push(TemplateSource {
                source,
                version: version.clone(),
                span: Span::new(start, end),
                type_: template.type_.clone(),
            });
        }
        tracing::debug!(file = file_name, %version, "file updated");
        file.version = version;
        file.content = content;
        file.templates = templates;
        Ok(())
    }

    /// One-based line and column of a byte offset.
    pub fn line_and_column(&self, file_name: &str, offset: usize) -> Option<(usize, usize)> {
        let content = self.content(file_name)?;
        let before = content.get(..offset.min(content.len()))?;
        let line = before.matches('\n').count() + 1;
        let column = before.rsplit('\n').next().map_or(0, |rest| rest.chars().count()) + 1;
        Some((line, column))
    }

    fn find_directive(&self, type_: &StaticSymbol) -> Option<&CompileDirectiveMetadata> {
        self.directives.iter().find(|directive| {
            let reference = &directive.type_.reference;
            reference.file_path == type_.file_path && reference.name == type_.name
        })
    }
}

fn read(path: &Path) -> Result<String, ProjectError> {
    fs::read_to_string(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn template_source(
    file_name: &str,
    version: &str,
    content: &str,
    template: &TemplateManifest,
) -> Result<TemplateSource, ProjectError> {
    let start = template.start.unwrap_or(0);
    let end = template.end.unwrap_or(content.len());
    let source = content
        .get(start..end)
        .ok_or_else(|| ProjectError::TemplateOutOfBounds {
            file: file_name.to_string(),
            start,
            end,
        })?;
    let component_file = template.component_file.as_deref().unwrap_or(file_name);
    Ok(TemplateSource {
        source: source.to_string(),
        version: version.to_string(),
        span: Span::new(start, end),
        type_: StaticSymbol::new(component_file, template.component.as_str()),
    })
}

/// Declares every class first so members and bases can name any of them.
fn build_types(classes: &[ClassManifest]) -> Result<StaticTypes, ProjectError> {
    let types = StaticTypes::new();
    let declared: Vec<Symbol> = classes
        .iter()
        .map(|class| {
            let parameters: Vec<&str> = class.type_parameters.iter().map(String::as_str).collect();
            let symbol = types.declare_class(&class.file, &class.name, &parameters);
            if let Some(span) = class.span {
                types.set_definition_span(&symbol, span);
            }
            symbol
        })
        .collect();
    let by_name: IndexMap<&str, Symbol> = classes
        .iter()
        .zip(&declared)
        .map(|(class, symbol)| (class.name.as_str(), symbol.clone()))
        .collect();

    for (class, symbol) in classes.iter().zip(&declared) {
        let parameters: Vec<(&str, Symbol)> = class
            .type_parameters
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                types
                    .type_parameter(symbol, index)
                    .map(|parameter| (name.as_str(), parameter))
            })
            .collect();
        let resolver = TypeResolver {
            types: &types,
            classes: &by_name,
            parameters: &parameters,
        };
        if let Some(base) = &class.extends {
            if !types.set_base(symbol, &resolver.resolve(base)) {
                return Err(ProjectError::CyclicBase {
                    class: class.name.clone(),
                    base: base.clone(),
                });
            }
        }
        for member in &class.members {
            let mut flags = match member.kind {
                MemberKind::Property => MemberFlags::empty(),
                MemberKind::Input => MemberFlags::INPUT,
                MemberKind::Output => MemberFlags::OUTPUT,
                MemberKind::Method => MemberFlags::METHOD,
            };
            if member.private {
                flags |= MemberFlags::PRIVATE;
            }
            let ty = resolver.resolve(&member.type_);
            let member_symbol = types.add_member(symbol, &member.name, &ty, flags);
            if let Some(span) = member.span {
                types.set_definition_span(&member_symbol, span);
            }
        }
    }
    Ok(types)
}

/// Reads the type syntax used in manifests.
struct TypeResolver<'a> {
    types: &'a StaticTypes,
    classes: &'a IndexMap<&'a str, Symbol>,
    parameters: &'a [(&'a str, Symbol)],
}

impl TypeResolver<'_> {
    fn resolve(&self, text: &str) -> Symbol {
        let text = text.trim();
        let alternatives = split_top_level(text, '|');
        if alternatives.len() > 1 {
            let types: Vec<Symbol> = alternatives.iter().map(|part| self.resolve(part)).collect();
            return self.types.union(&types);
        }
        let parts = split_top_level(text, '&');
        if parts.len() > 1 {
            let types: Vec<Symbol> = parts.iter().map(|part| self.resolve(part)).collect();
            return self.types.intersection(&types);
        }
        if let Some(element) = text.strip_suffix("[]") {
            return self.types.array_of(&self.resolve(element));
        }
        if let Some(body) = text.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            let fields: Vec<(&str, Symbol)> = split_top_level(body, ',')
                .into_iter()
                .flat_map(|field| split_top_level(field, ';'))
                .filter_map(|field| field.split_once(':'))
                .map(|(name, ty)| (name.trim(), self.resolve(ty)))
                .collect();
            return self.types.object(&fields);
        }
        if let Some(inner) = text.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
            return self.resolve(inner);
        }
        if let Some((name, rest)) = text.split_once('<') {
            if let Some(arguments) = rest.strip_suffix('>') {
                let arguments: Vec<Symbol> = split_top_level(arguments, ',')
                    .iter()
                    .map(|argument| self.resolve(argument))
                    .collect();
                if name.trim() == "Array" {
                    let any = self.types.primitive(BuiltinType::Any);
                    return self.types.array_of(arguments.first().unwrap_or(&any));
                }
                return self.types.instantiate(&self.resolve(name), &arguments);
            }
        }

        let builtin = match text {
            "any" => Some(BuiltinType::Any),
            "boolean" => Some(BuiltinType::Boolean),
            "null" => Some(BuiltinType::Null),
            "number" => Some(BuiltinType::Number),
            "string" => Some(BuiltinType::String),
            "undefined" | "void" => Some(BuiltinType::Undefined),
            _ => None,
        };
        if let Some(kind) = builtin {
            return self.types.primitive(kind);
        }
        if text == "Array" {
            return self.types.array_of(&self.types.primitive(BuiltinType::Any));
        }
        if let Some((_, parameter)) = self.parameters.iter().find(|(name, _)| *name == text) {
            return parameter.clone();
        }
        if let Some(class) = self.classes.get(text) {
            return class.clone();
        }
        tracing::warn!(ty = text, "unknown type in manifest, using any");
        self.types.primitive(BuiltinType::Any)
    }
}

/// Splits at `separator` outside of `<>`, `()`, `{}` and `[]`.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        match ch {
            '<' | '(' | '{' | '[' => depth += 1,
            '>' | ')' | '}' | ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts.into_iter().map(str::trim).filter(|part| !part.is_empty()).collect()
}

impl MetadataResolver for ProjectHost {
    fn maybe_get_directive_metadata(
        &self,
        type_: &StaticSymbol,
    ) -> Result<Option<CompileDirectiveMetadata>, ResolveError> {
        if let Some(directive) = self.find_directive(type_) {
            return Ok(Some(directive.clone()));
        }
        let is_class = self
            .classes
            .iter()
            .any(|class| class.file_path == type_.file_path && class.name == type_.name);
        if is_class {
            Ok(None)
        } else {
            Err(ResolveError::UnknownType(type_.clone()))
        }
    }

    fn get_view_directives_metadata(
        &self,
        type_: &StaticSymbol,
    ) -> Result<Vec<CompileDirectiveMetadata>, ResolveError> {
        match self.find_directive(type_) {
            Some(_) => Ok(self.directives.clone()),
            None => Err(ResolveError::UnknownType(type_.clone())),
        }
    }

    fn get_view_pipes_metadata(
        &self,
        type_: &StaticSymbol,
    ) -> Result<Vec<CompilePipeMetadata>, ResolveError> {
        match self.find_directive(type_) {
            Some(_) => Ok(self.pipes.clone()),
            None => Err(ResolveError::UnknownType(type_.clone())),
        }
    }
}

impl LanguageServiceHost for ProjectHost {
    fn resolver(&self) -> &dyn MetadataResolver {
        self
    }

    /// A position at the very end of a template still belongs to it.
    fn get_template_at(&self, file_name: &str, position: usize) -> Option<TemplateSource> {
        self.files
            .get(file_name)?
            .templates
            .iter()
            .find(|template| position >= template.span.start && position <= template.span.end)
            .cloned()
    }

    fn get_templates(&self, file_name: &str) -> Option<Vec<TemplateSource>> {
        self.files.get(file_name).map(|file| file.templates.clone())
    }

    fn get_script_version(&self, file_name: &str) -> Option<String> {
        self.files.get(file_name).map(|file| file.version.clone())
    }

    fn get_symbol_query(&self, _file_name: &str) -> Option<Rc<dyn SymbolQuery>> {
        self.types
            .as_ref()
            .map(|types| Rc::new(types.clone()) as Rc<dyn SymbolQuery>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("A | B<C | D> | E", '|'), vec!["A", "B<C | D>", "E"]);
        assert_eq!(split_top_level("Map<string, Hero>", ','), vec!["Map<string, Hero>"]);
        assert_eq!(split_top_level("", ','), Vec::<&str>::new());
    }

    #[test]
    fn test_type_resolver() {
        let classes = vec![ClassManifest {
            file: "app.ts".to_string(),
            name: "Hero".to_string(),
            type_parameters: Vec::new(),
            extends: None,
            members: vec![MemberManifest {
                name: "name".to_string(),
                type_: "string".to_string(),
                kind: MemberKind::Property,
                private: false,
                span: None,
            }],
            span: None,
        }];
        let types = build_types(&classes).expect("classes are acyclic");
        let hero = types.lookup("app.ts", "Hero").expect("Hero is declared");
        let by_name: IndexMap<&str, Symbol> = [("Hero", hero)].into_iter().collect();
        let resolver = TypeResolver {
            types: &types,
            classes: &by_name,
            parameters: &[],
        };
        assert_eq!(resolver.resolve("Hero[]").name(), "Hero[]");
        assert_eq!(resolver.resolve("string | null").name(), "string | null");
        assert_eq!(resolver.resolve("{ b: number }").name(), "{ b: number }");
        assert_eq!(resolver.resolve("Array<Hero>").name(), "Hero[]");
        assert_eq!(resolver.resolve("Unknown").name(), "any");
    }

    #[test]
    fn test_line_and_column() {
        let manifest = ProjectManifest {
            files: vec![FileManifest {
                file_name: "a.html".to_string(),
                version: "1".to_string(),
                content: Some("one\ntwo\n".to_string()),
                path: None,
                templates: Vec::new(),
            }],
            ..ProjectManifest::default()
        };
        let host = ProjectHost::from_manifest(manifest, Path::new(".")).unwrap();
        assert_eq!(host.line_and_column("a.html", 0), Some((1, 1)));
        assert_eq!(host.line_and_column("a.html", 5), Some((2, 2)));
        assert_eq!(host.line_and_column("b.html", 0), None);
    }
}
