//! Markdown code map rendering
//!
//! Each file is presented as a black box: its imports/exports, declared
//! types and public callables with their descriptions.

use crate::config::MarkdownConfig;
use crate::correlator::render_parameter;
use crate::extractors::base::{Function, Method, StructuralModel, TypeDecl};
use crate::orchestrator::FileReport;
use crate::utils::text::{collapse_whitespace, truncate_string};
use once_cell::sync::Lazy;
use regex::Regex;

const NO_DESCRIPTION: &str = "Нет описания";

static ANCHOR_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\-_]").unwrap());

/// GitHub-style anchor: lowercase, spaces to `-`, everything else outside
/// `[a-z0-9-_]` dropped
pub fn create_anchor(text: &str) -> String {
    let anchor = text.to_lowercase().replace(' ', "-");
    ANCHOR_STRIP.replace_all(&anchor, "").into_owned()
}

pub struct MarkdownRenderer<'c> {
    config: &'c MarkdownConfig,
}

impl<'c> MarkdownRenderer<'c> {
    pub fn new(config: &'c MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, project_name: &str, files: &[FileReport]) -> String {
        let mut out = format!("# Карта кода проекта {}\n\n", project_name);

        out.push_str("## Общая информация\n\n");
        out.push_str(
            "Эта карта кода представляет высокоуровневое описание проекта. \
             Каждый файл представлен как \"черный ящик\" \n\
             с его интерфейсами (импорты/экспорты) и публичными методами.\n\n",
        );

        if self.config.include_toc {
            out.push_str("## Содержание\n\n");
            for file in files {
                let path = &file.model.file_path;
                out.push_str(&format!("- [{}](#{})\n", path, create_anchor(path)));
            }
            out.push_str("\n\n");
        }

        for file in files {
            out.push_str(&self.render_file(file));
        }
        out
    }

    pub fn render_file(&self, file: &FileReport) -> String {
        let model = &file.model;
        let mut out = format!("## {}\n\n", model.file_path);

        if self.config.include_file_info {
            out.push_str(&format!("- **Язык**: {}\n", model.language));
            out.push_str(&format!(
                "- **Состав**: функций {}, методов {}, типов {}\n",
                model.functions.len(),
                model.methods.len(),
                model.types.len()
            ));
            if let Some(summary) = &file.summary {
                out.push_str(&format!("- **Описание файла**: {}\n", collapse_whitespace(summary)));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "### Импорты/Экспорты\n```\n{}\n```\n\n",
            imports_exports(model)
        ));

        let types: Vec<&TypeDecl> = model.public_types();
        if !types.is_empty() {
            out.push_str("### Типы\n\n");
            for type_decl in types {
                out.push_str(&render_type(type_decl));
            }
        }

        let functions = model.public_functions();
        let methods = model.public_methods();
        if !functions.is_empty() || !methods.is_empty() {
            out.push_str("### Публичные методы\n\n");
            for function in functions {
                out.push_str(&self.render_function(function));
            }
            if self.config.group_methods_by_type {
                for (owner, owned) in group_by_owner(&methods) {
                    out.push_str(&format!("**{}**\n\n", owner));
                    for method in owned {
                        out.push_str(&self.render_method(method));
                    }
                }
            } else {
                for method in methods {
                    out.push_str(&self.render_method(method));
                }
            }
        }

        out.push('\n');
        out
    }

    fn render_function(&self, function: &Function) -> String {
        self.render_callable(
            &function.name,
            &function.parameters.iter().map(render_parameter).collect::<Vec<_>>(),
            &function.return_type,
            &function.description,
        )
    }

    fn render_method(&self, method: &Method) -> String {
        self.render_callable(
            &method.qualified_name(),
            &method.parameters.iter().map(render_parameter).collect::<Vec<_>>(),
            &method.return_type,
            &method.description,
        )
    }

    fn render_callable(
        &self,
        title: &str,
        parameters: &[String],
        return_type: &str,
        description: &str,
    ) -> String {
        let mut out = format!("#### {}\n", title);
        if !parameters.is_empty() {
            out.push_str("- **Входные параметры**: \n");
            for parameter in parameters {
                out.push_str(&format!("  - {}\n", parameter));
            }
        }
        if !return_type.is_empty() {
            out.push_str("- **Выходные параметры**: \n");
            out.push_str(&format!("  - {}\n", return_type));
        }
        out.push_str(&format!("- **Описание**: {}\n\n", self.description(description)));
        out
    }

    fn description(&self, description: &str) -> String {
        let text = collapse_whitespace(description);
        if text.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            truncate_string(&text, self.config.max_method_description_length)
        }
    }
}

fn imports_exports(model: &StructuralModel) -> String {
    let mut content = String::new();

    if !model.imports.is_empty() {
        content.push_str("Импорты:\n");
        for import in &model.imports {
            if import.alias.is_empty() {
                content.push_str(&format!("- {}\n", import.path));
            } else {
                content.push_str(&format!("- {} as {}\n", import.path, import.alias));
            }
        }
    }

    if !model.exports.is_empty() {
        if !model.imports.is_empty() {
            content.push('\n');
        }
        content.push_str("Экспорты:\n");
        for export in &model.exports {
            let default = if export.is_default { ", default" } else { "" };
            content.push_str(&format!("- {} ({}{})\n", export.name, export.kind, default));
        }
    }

    content
}

fn render_type(type_decl: &TypeDecl) -> String {
    let mut out = format!("#### {} ({})\n", type_decl.name, type_decl.kind);
    if !type_decl.parent.is_empty() {
        out.push_str(&format!("- **Родитель**: {}\n", type_decl.parent));
    }
    if !type_decl.implements.is_empty() {
        out.push_str(&format!("- **Реализует**: {}\n", type_decl.implements.join(", ")));
    }
    let fields: Vec<_> = type_decl.properties.iter().filter(|p| p.is_public).collect();
    if !fields.is_empty() {
        out.push_str("- **Поля**: \n");
        for field in fields {
            if field.type_name.is_empty() {
                out.push_str(&format!("  - {}\n", field.name));
            } else {
                out.push_str(&format!("  - {}: {}\n", field.name, field.type_name));
            }
        }
    }
    out.push('\n');
    out
}

/// Methods grouped by owner, owners in order of first appearance
fn group_by_owner<'m>(methods: &[&'m Method]) -> Vec<(&'m str, Vec<&'m Method>)> {
    let mut groups: Vec<(&str, Vec<&Method>)> = Vec::new();
    for &method in methods {
        match groups.iter_mut().find(|(owner, _)| *owner == method.belongs_to) {
            Some((_, owned)) => owned.push(method),
            None => groups.push((method.belongs_to.as_str(), vec![method])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{Import, Parameter, Property, TypeKind};

    fn report() -> FileReport {
        let mut model = StructuralModel::new("Go", "pkg/http server.go");
        model.imports.push(Import {
            path: "net/http".to_string(),
            ..Default::default()
        });
        model.imports.push(Import {
            path: "github.com/rs/zerolog/log".to_string(),
            alias: "zlog".to_string(),
            ..Default::default()
        });
        model.types.push(TypeDecl {
            name: "Server".to_string(),
            kind: TypeKind::Struct,
            is_public: true,
            properties: vec![
                Property {
                    name: "Addr".to_string(),
                    type_name: "string".to_string(),
                    is_public: true,
                    ..Default::default()
                },
                Property {
                    name: "mux".to_string(),
                    is_public: false,
                    ..Default::default()
                },
            ],
            ..Default::default()
        });
        model.functions.push(Function {
            name: "NewServer".to_string(),
            parameters: vec![Parameter::named("addr").with_type("string")],
            return_type: "*Server".to_string(),
            is_public: true,
            description: "Создает сервер.\n  Не запускает его.".to_string(),
            ..Default::default()
        });
        for (name, owner) in [("Start", "Server"), ("Close", "Listener"), ("Stop", "Server")] {
            model.methods.push(Method {
                name: name.to_string(),
                belongs_to: owner.to_string(),
                is_public: true,
                ..Default::default()
            });
        }
        model.methods.push(Method {
            name: "reset".to_string(),
            belongs_to: "Server".to_string(),
            is_public: false,
            ..Default::default()
        });
        FileReport {
            model,
            summary: Some("HTTP сервер.".to_string()),
        }
    }

    #[test]
    fn anchors() {
        assert_eq!(create_anchor("pkg/http server.go"), "pkghttp-servergo");
        assert_eq!(create_anchor("Internal/My_File.PY"), "internalmy_filepy");
        assert_eq!(create_anchor("кириллица.go"), "go");
    }

    #[test]
    fn full_document_layout() {
        let config = MarkdownConfig::default();
        let out = MarkdownRenderer::new(&config).render("demo", &[report()]);

        assert!(out.starts_with("# Карта кода проекта demo\n\n## Общая информация\n\n"));
        assert!(out.contains("## Содержание\n\n- [pkg/http server.go](#pkghttp-servergo)\n"));
        assert!(out.contains("## pkg/http server.go\n\n- **Язык**: Go\n"));
        assert!(out.contains("- **Описание файла**: HTTP сервер.\n"));
        assert!(out.contains(
            "### Импорты/Экспорты\n```\nИмпорты:\n- net/http\n- github.com/rs/zerolog/log as zlog\n\n```"
        ));
        assert!(out.contains("#### Server (struct)\n- **Поля**: \n  - Addr: string\n\n"));
        assert!(!out.contains("mux"));
        assert!(out.contains(
            "#### NewServer\n- **Входные параметры**: \n  - addr: string\n\
             - **Выходные параметры**: \n  - *Server\n\
             - **Описание**: Создает сервер. Не запускает его.\n\n"
        ));
        assert!(out.contains("#### Server.Start\n- **Описание**: Нет описания\n\n"));
        assert!(!out.contains("Server.reset"));
    }

    #[test]
    fn methods_grouped_by_owner() {
        let config = MarkdownConfig::default();
        let out = MarkdownRenderer::new(&config).render_file(&report());
        let start = out.find("#### Server.Start").unwrap();
        let stop = out.find("#### Server.Stop").unwrap();
        let close = out.find("#### Listener.Close").unwrap();
        assert!(start < stop && stop < close);
        assert!(out.contains("**Server**\n\n#### Server.Start"));
    }

    #[test]
    fn ungrouped_methods_keep_source_order() {
        let config = MarkdownConfig {
            group_methods_by_type: false,
            ..Default::default()
        };
        let out = MarkdownRenderer::new(&config).render_file(&report());
        let close = out.find("#### Listener.Close").unwrap();
        let stop = out.find("#### Server.Stop").unwrap();
        assert!(close < stop);
        assert!(!out.contains("**Server**"));
    }

    #[test]
    fn toc_and_file_info_can_be_disabled() {
        let config = MarkdownConfig {
            include_toc: false,
            include_file_info: false,
            ..Default::default()
        };
        let out = MarkdownRenderer::new(&config).render("demo", &[report()]);
        assert!(!out.contains("## Содержание"));
        assert!(!out.contains("**Язык**"));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let config = MarkdownConfig {
            max_method_description_length: 10,
            ..Default::default()
        };
        let out = MarkdownRenderer::new(&config).render_file(&report());
        assert!(out.contains("- **Описание**: Создает се...\n"));
    }
}
