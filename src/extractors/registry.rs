//! ExtractorRegistry - resolves a file to the extractor for its language
//!
//! Registration happens once at startup through `&mut self`; resolution only
//! needs `&self`, so a built registry can be shared across threads without
//! locking. Extractor instances are constructed lazily on first resolve and
//! cached for the life of the registry.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use super::{ExtractorConstructor, LanguageExtractor, StructuralModel};
use crate::errors::{ExtractError, RegistryError};
use crate::language::normalize_extension;

struct Registration {
    language: String,
    extensions: Vec<String>,
    constructor: ExtractorConstructor,
    instance: OnceCell<Arc<dyn LanguageExtractor>>,
}

impl Registration {
    fn extractor(&self) -> Arc<dyn LanguageExtractor> {
        self.instance
            .get_or_init(|| {
                debug!("Constructing extractor for {}", self.language);
                Arc::from((self.constructor)())
            })
            .clone()
    }
}

/// An extension reassigned from one language to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedExtension {
    pub extension: String,
    pub previous: String,
    pub current: String,
}

/// Maps file extension → language name → extractor
#[derive(Default)]
pub struct ExtractorRegistry {
    registrations: Vec<Registration>,
    by_language: HashMap<String, usize>,
    by_extension: HashMap<String, usize>,
    shadowed: Vec<ShadowedExtension>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language under one or more extensions
    ///
    /// Registering the same language twice is an error. An extension already
    /// claimed by another language is reassigned to the new one (last
    /// registration wins) and a warning is logged.
    pub fn register(
        &mut self,
        language: &str,
        extensions: &[&str],
        constructor: ExtractorConstructor,
    ) -> Result<(), RegistryError> {
        if self.by_language.contains_key(language) {
            return Err(RegistryError::DuplicateLanguage {
                language: language.to_string(),
            });
        }
        if extensions.is_empty() {
            return Err(RegistryError::EmptyExtensions {
                language: language.to_string(),
            });
        }

        let mut normalized = Vec::with_capacity(extensions.len());
        for extension in extensions {
            let ext = normalize_extension(extension);
            if ext.len() < 2 || ext[1..].contains(|c: char| matches!(c, '.' | '/' | '\\' | ' ')) {
                return Err(RegistryError::InvalidExtension {
                    language: language.to_string(),
                    extension: extension.to_string(),
                });
            }
            normalized.push(ext);
        }

        let index = self.registrations.len();
        for ext in &normalized {
            if let Some(previous) = self.by_extension.insert(ext.clone(), index) {
                let previous_language = &self.registrations[previous].language;
                warn!(
                    "⚠️  Extension {} re-registered: {} replaces {}",
                    ext, language, previous_language
                );
                self.shadowed.push(ShadowedExtension {
                    extension: ext.clone(),
                    previous: previous_language.clone(),
                    current: language.to_string(),
                });
            }
        }

        self.by_language.insert(language.to_string(), index);
        self.registrations.push(Registration {
            language: language.to_string(),
            extensions: normalized,
            constructor,
            instance: OnceCell::new(),
        });
        debug!("Registered language {} for {:?}", language, extensions);
        Ok(())
    }

    /// Resolve a file path to its extractor
    pub fn resolve(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<Arc<dyn LanguageExtractor>, ExtractError> {
        let extension = extension_of(file_path.as_ref());
        match self.by_extension.get(&extension) {
            Some(&index) => Ok(self.registrations[index].extractor()),
            None => Err(ExtractError::NotSupported { extension }),
        }
    }

    /// Resolve and parse in one step
    pub fn parse_file(
        &self,
        file_path: &str,
        content: &str,
    ) -> Result<StructuralModel, ExtractError> {
        self.resolve(file_path)?.parse(content, file_path)
    }

    /// Language name for a path, without constructing an extractor
    pub fn language_for(&self, file_path: impl AsRef<Path>) -> Option<&str> {
        let extension = extension_of(file_path.as_ref());
        self.by_extension
            .get(&extension)
            .map(|&index| self.registrations[index].language.as_str())
    }

    pub fn is_supported(&self, file_path: impl AsRef<Path>) -> bool {
        self.language_for(file_path).is_some()
    }

    /// Registered languages in registration order
    pub fn languages(&self) -> Vec<&str> {
        self.registrations
            .iter()
            .map(|r| r.language.as_str())
            .collect()
    }

    /// Extensions currently routed to `language` (reassigned ones excluded)
    pub fn extensions_for(&self, language: &str) -> Vec<&str> {
        let Some(&index) = self.by_language.get(language) else {
            return Vec::new();
        };
        self.registrations[index]
            .extensions
            .iter()
            .filter(|ext| self.by_extension.get(*ext) == Some(&index))
            .map(String::as_str)
            .collect()
    }

    /// Extensions taken over by a later registration, in order
    pub fn shadowed(&self) -> &[ShadowedExtension] {
        &self.shadowed
    }

    pub fn extension_count(&self) -> usize {
        self.by_extension.len()
    }
}

/// Lowercased extension with a leading dot, or "" when the path has none
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(normalize_extension)
        .unwrap_or_default()
}

/// Register every built-in language
pub fn register_builtin_languages(registry: &mut ExtractorRegistry) -> Result<(), RegistryError> {
    registry.register("Go", &[".go"], || {
        Box::new(super::go::GoExtractor::new())
    })?;
    registry.register("JavaScript", &[".js", ".jsx", ".mjs", ".cjs"], || {
        Box::new(super::javascript::JavaScriptExtractor::javascript())
    })?;
    registry.register("TypeScript", &[".ts", ".tsx", ".mts", ".cts"], || {
        Box::new(super::javascript::JavaScriptExtractor::typescript())
    })?;
    registry.register("Python", &[".py", ".pyw"], || {
        Box::new(super::python::PythonExtractor::new())
    })?;
    Ok(())
}

/// A registry with every built-in language registered
pub fn default_registry() -> Result<ExtractorRegistry, RegistryError> {
    let mut registry = ExtractorRegistry::new();
    register_builtin_languages(&mut registry)?;
    Ok(registry)
}
