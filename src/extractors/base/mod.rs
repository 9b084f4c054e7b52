// Base extractor types and helpers for Code Telescope
//
// - types.rs: the language-agnostic StructuralModel and its elements
// - extractor.rs: BaseExtractor, the read-only per-file view walkers use
// - tree_methods.rs: small tree navigation helpers
// - visibility.rs: per-language visibility predicates

pub mod extractor;
pub mod tree_methods;
pub mod types;
pub mod visibility;

// Re-export key types for external use
pub use extractor::{unquote, BaseExtractor};
pub use types::{
    CallableRef, Constant, Export, ExportKind, Function, Import, Method, MethodKind, Parameter,
    Position, Property, StructuralModel, TypeDecl, TypeKind, Variable,
};
