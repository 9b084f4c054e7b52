//! Language Extractors Module
//!
//! Tree-sitter based extractors that turn one source file into a
//! language-agnostic [`StructuralModel`].
//!
//! # Architecture
//!
//! - `base` - the structural model, per-file helpers, visibility predicates
//! - `registry` - extension → language → extractor dispatch
//! - Language modules (go, javascript, python). TypeScript is served by the
//!   JavaScript walker running over the TypeScript grammars.
//!
//! Each extractor performs a single traversal. Nodes with a handler are
//! handled (and handlers own their subtrees); every other node is
//! recursed into so wrapped declarations are still found exactly once.

pub mod base;
pub mod registry;

pub mod go;
pub mod javascript;
pub mod python;

pub use base::{
    CallableRef, Constant, Export, ExportKind, Function, Import, Method, MethodKind, Parameter,
    Position, Property, StructuralModel, TypeDecl, TypeKind, Variable,
};
pub use registry::{
    default_registry, register_builtin_languages, ExtractorRegistry, ShadowedExtension,
};

use crate::errors::ExtractError;

/// One implementation per supported language
///
/// Implementations are stateless: a single instance is shared across
/// threads and reused for every file of its language.
pub trait LanguageExtractor: Send + Sync {
    /// Language name as registered (e.g. "Go")
    fn language(&self) -> &'static str;

    /// Parse one file into its structural model
    fn parse(&self, content: &str, file_path: &str) -> Result<StructuralModel, ExtractError>;
}

/// Builds a fresh extractor; called at most once per language by the registry
pub type ExtractorConstructor = fn() -> Box<dyn LanguageExtractor>;
