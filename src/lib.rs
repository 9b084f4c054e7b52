// Code Telescope - tree-sitter code maps with generated descriptions
//
// Extractors turn each source file into a language-agnostic structural
// model; the correlator asks a text generator to describe its public
// callables in batches; the markdown renderer writes the map.

pub mod config;
pub mod correlator;
pub mod errors;
pub mod extractors;
pub mod language;
pub mod llm;
pub mod markdown;
pub mod orchestrator;
pub mod scanner;
pub mod utils;

pub use config::Config;
pub use errors::{ConfigError, ExtractError, ProviderError, RegistryError};
pub use extractors::{default_registry, ExtractorRegistry, StructuralModel};
pub use orchestrator::{CodeMap, CodeMapper, RunStats};
