//! Code map generation pipeline
//!
//! scan → parallel extraction → per-file descriptions (batches in order) →
//! optional file summaries → markdown. Per-file and per-batch failures are
//! logged and skipped; only setup and output failures abort the run.

use crate::config::Config;
use crate::correlator::Describer;
use crate::errors::ExtractError;
use crate::extractors::{default_registry, ExtractorRegistry, StructuralModel};
use crate::llm::{create_provider, TextGenerator};
use crate::markdown::MarkdownRenderer;
use crate::scanner::{Scanner, SourceFile};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// One extracted file and its optional generated summary
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileReport {
    pub model: StructuralModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RunStats {
    pub files_scanned: usize,
    pub files_parsed: usize,
    pub files_skipped: usize,
    pub callables_described: usize,
    pub descriptions_missing: usize,
    pub batches_failed: usize,
}

#[derive(Debug, Clone)]
pub struct CodeMap {
    pub markdown: String,
    pub files: Vec<FileReport>,
    pub stats: RunStats,
}

pub struct CodeMapper {
    config: Config,
    registry: ExtractorRegistry,
    generator: Option<Box<dyn TextGenerator>>,
}

impl CodeMapper {
    pub fn new(
        config: Config,
        registry: ExtractorRegistry,
        generator: Option<Box<dyn TextGenerator>>,
    ) -> Self {
        Self {
            config,
            registry,
            generator,
        }
    }

    /// Built-in languages plus the provider named in the config
    pub fn from_config(config: Config) -> Result<Self> {
        let registry = default_registry().context("Failed to register language extractors")?;
        let generator = create_provider(&config.llm).context("Failed to create text generation provider")?;
        Ok(Self::new(config, registry, generator))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generate(&self, project_root: &Path) -> Result<CodeMap> {
        let scanner = Scanner::new(&self.config.filesystem, &self.config.parser)?;
        let files = scanner
            .scan(project_root)
            .with_context(|| format!("Failed to scan {}", project_root.display()))?;
        info!("🔍 Found {} source file(s) in {}", files.len(), project_root.display());

        let mut stats = RunStats {
            files_scanned: files.len(),
            ..Default::default()
        };

        let mut reports: Vec<FileReport> = self
            .extract_all(&files)
            .into_iter()
            .map(|model| FileReport {
                model,
                summary: None,
            })
            .collect();
        stats.files_parsed = reports.len();
        stats.files_skipped = stats.files_scanned - stats.files_parsed;
        info!(
            "📄 Extracted {} file(s), skipped {}",
            stats.files_parsed, stats.files_skipped
        );

        if let Some(generator) = &self.generator {
            self.describe_all(generator.as_ref(), &mut reports, &mut stats);
        }

        let project_name = project_name(project_root);
        let markdown = MarkdownRenderer::new(&self.config.markdown).render(&project_name, &reports);

        Ok(CodeMap {
            markdown,
            files: reports,
            stats,
        })
    }

    /// Extract every file in parallel; results keep scan order and failed
    /// files are dropped
    pub fn extract_all(&self, files: &[SourceFile]) -> Vec<StructuralModel> {
        let results: Vec<Option<StructuralModel>> =
            files.par_iter().map(|file| self.extract_one(file)).collect();
        results.into_iter().flatten().collect()
    }

    fn extract_one(&self, file: &SourceFile) -> Option<StructuralModel> {
        let bytes = match fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %file.relative_path, "⚠️  Failed to read file: {}", e);
                return None;
            }
        };
        let content = String::from_utf8_lossy(&bytes);

        match self.registry.parse_file(&file.relative_path, &content) {
            Ok(model) => Some(model),
            Err(e @ ExtractError::NotSupported { .. }) => {
                debug!(file = %file.relative_path, "Skipping: {}", e);
                None
            }
            Err(e) => {
                warn!(file = %file.relative_path, "⚠️  Skipping: {}", e);
                None
            }
        }
    }

    /// Files are handled one at a time; each file's batches run in order
    fn describe_all(
        &self,
        generator: &dyn TextGenerator,
        reports: &mut [FileReport],
        stats: &mut RunStats,
    ) {
        let describer = Describer::new(generator, &self.config.llm)
            .include_private(self.config.parser.parse_private_methods);
        info!("🤖 Generating descriptions with {}", generator.name());

        for report in reports.iter_mut() {
            let outcome = describer.describe(&mut report.model);
            stats.callables_described += outcome.described;
            stats.descriptions_missing += outcome.missing.len();
            stats.batches_failed += outcome.failed_batches.len();

            if self.config.llm.summarize_files {
                match describer.summarize(&report.model) {
                    Ok(summary) if !summary.is_empty() => report.summary = Some(summary),
                    Ok(_) => {}
                    Err(e) => {
                        warn!(file = %report.model.file_path, "⚠️  File summary failed: {}", e)
                    }
                }
            }
        }
    }

    /// Write the rendered map, creating parent directories
    pub fn save(markdown: &str, output: &Path) -> Result<()> {
        ensure_parent_dir(output)?;
        fs::write(output, markdown)
            .with_context(|| format!("Failed to write code map to {}", output.display()))?;
        info!("💾 Code map saved to {}", output.display());
        Ok(())
    }

    /// Dump the structural models as pretty JSON
    pub fn save_json(files: &[FileReport], output: &Path) -> Result<()> {
        ensure_parent_dir(output)?;
        let json = serde_json::to_string_pretty(files).context("Failed to serialize models")?;
        fs::write(output, json)
            .with_context(|| format!("Failed to write JSON to {}", output.display()))?;
        info!("💾 Structural models saved to {}", output.display());
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Name of the project directory, resolving `.` and friends
fn project_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::llm::{GenerationRequest, GenerationResponse};
    use tempfile::TempDir;

    const SERVER_GO: &str = r#"package server

import "net/http"

// Server serves requests
type Server struct {
	addr string
}

func NewServer(addr string) *Server {
	return &Server{addr: addr}
}

func (s *Server) Start() error {
	return http.ListenAndServe(s.addr, nil)
}

func (s *Server) stop() {}
"#;

    const UTIL_PY: &str = "def slugify(text: str) -> str:\n    return text.lower()\n\n\ndef _private():\n    pass\n";

    /// Answers every batch with one numbered line per listed method, and
    /// file summary prompts with a fixed sentence
    struct Counting;

    impl TextGenerator for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
            let text = if request.prompt.contains("Информация о файле:") {
                "Сводка файла.".to_string()
            } else {
                let count = request.prompt.matches("Сигнатура:").count();
                (1..=count).map(|i| format!("Метод {}: описание {}\n", i, i)).collect()
            };
            Ok(GenerationResponse {
                text,
                tokens_used: 0,
                truncated: false,
            })
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("server")).unwrap();
        fs::write(dir.path().join("server/server.go"), SERVER_GO).unwrap();
        fs::write(dir.path().join("util.py"), UTIL_PY).unwrap();
        fs::write(dir.path().join("broken.py"), "def broken(:\n").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes").unwrap();
        dir
    }

    fn offline_config() -> Config {
        let mut config = Config::default();
        config.llm.provider = "none".to_string();
        config.llm.batch_delay = 0;
        config
    }

    #[test]
    fn extracts_in_scan_order_and_skips_broken_files() {
        let dir = project();
        let mapper = CodeMapper::from_config(offline_config()).unwrap();
        let map = mapper.generate(dir.path()).unwrap();

        let paths: Vec<_> = map.files.iter().map(|f| f.model.file_path.as_str()).collect();
        assert_eq!(paths, vec!["server/server.go", "util.py"]);
        assert_eq!(map.stats.files_scanned, 3);
        assert_eq!(map.stats.files_parsed, 2);
        assert_eq!(map.stats.files_skipped, 1);
        assert_eq!(map.stats.callables_described, 0);

        assert!(map.markdown.contains("## server/server.go"));
        assert!(map.markdown.contains("#### NewServer"));
        assert!(map.markdown.contains("Нет описания"));
    }

    #[test]
    fn describes_public_callables_with_a_generator() {
        let dir = project();
        let mut config = offline_config();
        config.llm.summarize_files = true;
        let mapper = CodeMapper::new(config, default_registry().unwrap(), Some(Box::new(Counting)));
        let map = mapper.generate(dir.path()).unwrap();

        // NewServer + Server.Start, then slugify
        assert_eq!(map.stats.callables_described, 3);
        assert_eq!(map.stats.descriptions_missing, 0);

        let server = &map.files[0].model;
        assert_eq!(server.functions[0].description, "описание 1");
        let start = server.methods.iter().find(|m| m.name == "Start").unwrap();
        assert_eq!(start.description, "описание 2");
        let stop = server.methods.iter().find(|m| m.name == "stop").unwrap();
        assert!(stop.description.is_empty());

        assert_eq!(map.files[0].summary.as_deref(), Some("Сводка файла."));
        assert!(map.markdown.contains("описание 2"));
    }

    #[test]
    fn saves_markdown_and_json() {
        let dir = project();
        let mapper = CodeMapper::from_config(offline_config()).unwrap();
        let map = mapper.generate(dir.path()).unwrap();

        let out = TempDir::new().unwrap();
        let md_path = out.path().join("docs/code-map.md");
        CodeMapper::save(&map.markdown, &md_path).unwrap();
        assert_eq!(fs::read_to_string(&md_path).unwrap(), map.markdown);

        let json_path = out.path().join("models.json");
        CodeMapper::save_json(&map.files, &json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value[0]["model"]["language"], "Go");
        assert_eq!(value[1]["model"]["functions"][0]["name"], "slugify");
    }

    #[test]
    fn missing_project_root_fails() {
        let dir = TempDir::new().unwrap();
        let mapper = CodeMapper::from_config(offline_config()).unwrap();
        assert!(mapper.generate(&dir.path().join("absent")).is_err());
    }
}
