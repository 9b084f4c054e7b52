//! Prompt construction and marker-based reply parsing
//!
//! Batch prompts number methods `Метод 1:`, `Метод 2:`, ... relative to the
//! batch, and replies are correlated back by the same numbering. Building and
//! parsing must always agree on that indexing.

use super::MethodInfo;
use crate::extractors::base::StructuralModel;
use crate::utils::text::truncate_with_marker;
use std::collections::HashMap;

pub const DEFAULT_MAX_CONTEXT_LENGTH: usize = 8000;

/// Appended to file context that exceeded the configured length
pub const TRUNCATION_MARKER: &str = "...[контекст обрезан из-за длины]";

const BATCH_TEMPLATE_HEAD: &str = "Проанализируй следующие методы из одного файла и предоставь краткое, точное описание \n\
для каждого метода. Для каждого метода напиши один абзац (3-4 предложения максимум).\n\
Фокусируйся на том, что метод делает, его входных и выходных данных, и основных побочных эффектах.\n\n";

const BATCH_TEMPLATE_TAIL: &str = "Формат вывода:\n\
Метод 1: [Описание метода 1]\n\
Метод 2: [Описание метода 2]\n\
...и так далее\n\n\
Предоставь только описания методов в указанном формате без дополнительных пояснений или вступлений.";

const METHOD_TEMPLATE_HEAD: &str = "Проанализируй следующий код метода и предоставь краткое, точное описание \n\
его функциональности в одном абзаце (3-4 предложения максимум). \n\
Фокусируйся на том, что метод делает, его входных и выходных данных, и основных побочных эффектах.\n\n";

const SUMMARY_TEMPLATE_HEAD: &str = "Проанализируй структуру файла и предоставь краткое описание его назначения \n\
и функциональности в одном абзаце (максимум 3-4 предложения).\n\
Фокусируйся на том, что файл реализует, его основном назначении и взаимодействии с другими компонентами.\n\n";

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_context_length: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTEXT_LENGTH)
    }
}

impl PromptBuilder {
    /// A zero length falls back to the default
    pub fn new(max_context_length: usize) -> Self {
        let max_context_length = if max_context_length == 0 {
            DEFAULT_MAX_CONTEXT_LENGTH
        } else {
            max_context_length
        };
        Self { max_context_length }
    }

    pub fn max_context_length(&self) -> usize {
        self.max_context_length
    }

    /// Context cut to the configured character count, marked when cut
    pub fn truncate_context(&self, context: &str) -> String {
        truncate_with_marker(context, self.max_context_length, TRUNCATION_MARKER)
    }

    /// Context block identifying the file a batch comes from
    pub fn file_context(model: &StructuralModel) -> String {
        format!("Файл: {}\nЯзык: {}\n", model.file_path, model.language)
    }

    pub fn build_batch_prompt(&self, methods: &[MethodInfo], context: &str) -> String {
        let mut listing = String::new();
        for (i, method) in methods.iter().enumerate() {
            listing.push_str(&format!(
                "{} {}\nСигнатура: {}\n\n",
                marker(i),
                method.name,
                method.signature
            ));
        }

        format!(
            "{}Методы:\n{}\n\nКонтекст файла:\n{}\n\n{}",
            BATCH_TEMPLATE_HEAD,
            listing,
            self.truncate_context(context),
            BATCH_TEMPLATE_TAIL
        )
    }

    /// Map method name → description for every marker found in `response`
    ///
    /// A marker line starts a new entry; following non-marker lines are
    /// joined to it with single spaces. Methods without a marker are absent.
    pub fn parse_batch_response(
        &self,
        response: &str,
        methods: &[MethodInfo],
    ) -> HashMap<String, String> {
        let markers: Vec<String> = (0..methods.len()).map(marker).collect();
        let mut result = HashMap::new();
        let mut current: Option<&str> = None;
        let mut description = String::new();

        for line in response.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let header = markers
                .iter()
                .zip(methods)
                .find(|(prefix, _)| trimmed.starts_with(prefix.as_str()));

            match header {
                Some((prefix, method)) => {
                    if let Some(name) = current {
                        result.insert(name.to_string(), description.trim().to_string());
                    }
                    current = Some(method.name.as_str());
                    description = trimmed[prefix.len()..].trim().to_string();
                }
                None if current.is_some() => {
                    description.push(' ');
                    description.push_str(trimmed);
                }
                None => {}
            }
        }

        if let Some(name) = current {
            result.insert(name.to_string(), description.trim().to_string());
        }
        result
    }

    pub fn build_method_prompt(&self, method: &MethodInfo, context: &str) -> String {
        format!(
            "{}Метод: {}\nСигнатура: {}\nКонтекст файла: {}\n\n\
             Предоставь только описание метода без дополнительного форматирования, пояснений или вступлений.",
            METHOD_TEMPLATE_HEAD,
            method.name,
            method.signature,
            self.truncate_context(context)
        )
    }

    pub fn build_file_summary_prompt(&self, model: &StructuralModel) -> String {
        let imports: Vec<&str> = model.imports.iter().map(|i| i.path.as_str()).collect();

        let mut exports = String::new();
        for export in &model.exports {
            exports.push_str(&format!("{} ({})\n", export.name, export.kind));
        }

        let mut methods = String::new();
        let callables = model
            .public_functions()
            .into_iter()
            .map(MethodInfo::from_function)
            .chain(model.public_methods().into_iter().map(MethodInfo::from_method));
        for info in callables {
            methods.push_str(&format!(
                "Метод: {}\nСигнатура: {}\n\n",
                info.name, info.signature
            ));
        }

        format!(
            "{}Информация о файле:\nИмя файла: {}\nЯзык: {}\nИмпорты:\n{}\n\nЭкспорты:\n{}\n\n\
             Публичные методы:\n{}\n\n\
             Предоставь только описание файла без дополнительного форматирования, пояснений или вступлений.",
            SUMMARY_TEMPLATE_HEAD,
            model.file_path,
            model.language,
            imports.join("\n"),
            exports,
            methods
        )
    }
}

/// Batch-relative, 1-based marker for position `index`
fn marker(index: usize) -> String {
    format!("Метод {}:", index + 1)
}
