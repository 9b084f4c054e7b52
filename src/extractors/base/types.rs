// Structural model types for Code Telescope
//
// Every extractor produces one StructuralModel per file. All lists preserve
// insertion order, which is the order declarations appear in the source.

use serde::{Deserialize, Serialize};

/// Source range of an extracted element
///
/// Lines and columns are 1-based; byte offsets are 0-based like tree-sitter's.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub start_byte: u32,
    pub end_byte: u32,
}

impl Position {
    /// Build a position from tree-sitter's 0-based coordinates
    pub fn from_node(node: &tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_line: start.row as u32 + 1,
            start_column: start.column as u32 + 1,
            end_line: end.row as u32 + 1,
            end_column: end.column as u32 + 1,
            start_byte: node.start_byte() as u32,
            end_byte: node.end_byte() as u32,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Import {
    /// Module or package reference exactly as written (quotes removed)
    pub path: String,
    /// Local rename, empty unless the source renames the binding
    pub alias: String,
    /// Bindings the statement brings into scope
    pub names: Vec<String>,
    pub is_dynamic: bool,
    pub is_namespace: bool,
    pub is_type_import: bool,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Class,
    Struct,
    Interface,
    Enum,
    Type,
    Variable,
    Constant,
    Module,
    Value,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExportKind::Function => "function",
            ExportKind::Class => "class",
            ExportKind::Struct => "struct",
            ExportKind::Interface => "interface",
            ExportKind::Enum => "enum",
            ExportKind::Type => "type",
            ExportKind::Variable => "variable",
            ExportKind::Constant => "constant",
            ExportKind::Module => "module",
            ExportKind::Value => "value",
        };
        write!(f, "{}", s)
    }
}

/// Declared intent to expose `name`; not checked against other model entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Export {
    pub name: String,
    pub kind: ExportKind,
    pub is_default: bool,
    pub is_type_export: bool,
    pub is_namespace: bool,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    /// Default expression as source text, never evaluated
    pub default_value: String,
    pub is_required: bool,
    pub is_variadic: bool,
    pub is_destructured_object: bool,
    pub is_destructured_array: bool,
}

impl Parameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_required: true,
            ..Default::default()
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Attach a default value; a defaulted parameter is never required
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self.is_required = false;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self.is_required = false;
        self
    }
}

/// Top-level callable
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    pub is_public: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub position: Position,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    #[default]
    Method,
    Getter,
    Setter,
}

/// Callable bound to a type. `belongs_to` is never empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Method {
    pub name: String,
    pub belongs_to: String,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    pub is_public: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_static: bool,
    pub is_constructor: bool,
    /// Declared without a body (interface members, abstract signatures)
    pub is_abstract: bool,
    pub kind: MethodKind,
    pub position: Position,
    pub description: String,
}

impl Method {
    /// `Owner.name`, unique within a file unless the source overloads
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.belongs_to, self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Alias,
    /// Go named type over a non-struct, non-interface underlying type
    Type,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Alias => "alias",
            TypeKind::Type => "type",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub name: String,
    pub type_name: String,
    pub default_value: String,
    pub is_public: bool,
    pub is_static: bool,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub is_public: bool,
    pub parent: String,
    pub implements: Vec<String>,
    pub generic_parameters: Vec<String>,
    pub decorators: Vec<String>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Variable {
    pub name: String,
    pub type_name: String,
    pub is_public: bool,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Constant {
    pub name: String,
    pub type_name: String,
    pub value: String,
    pub is_public: bool,
    pub position: Position,
}

/// Reference to a describable callable inside a StructuralModel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableRef {
    Function(usize),
    Method(usize),
}

/// Normalized, language-agnostic record of one file's declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuralModel {
    pub language: String,
    pub file_path: String,
    pub imports: Vec<Import>,
    pub exports: Vec<Export>,
    pub functions: Vec<Function>,
    pub methods: Vec<Method>,
    pub types: Vec<TypeDecl>,
    pub variables: Vec<Variable>,
    pub constants: Vec<Constant>,
}

impl StructuralModel {
    pub fn new(language: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            file_path: file_path.into(),
            ..Default::default()
        }
    }

    /// Public methods in insertion order
    pub fn public_methods(&self) -> Vec<&Method> {
        self.methods.iter().filter(|m| m.is_public).collect()
    }

    pub fn public_functions(&self) -> Vec<&Function> {
        self.functions.iter().filter(|f| f.is_public).collect()
    }

    pub fn public_types(&self) -> Vec<&TypeDecl> {
        self.types.iter().filter(|t| t.is_public).collect()
    }

    /// File-scope methods owned by `type_name`
    pub fn methods_of(&self, type_name: &str) -> Vec<&Method> {
        self.methods
            .iter()
            .filter(|m| m.belongs_to == type_name)
            .collect()
    }

    /// Callables eligible for descriptions: functions first, then methods,
    /// each in insertion order
    pub fn describable(&self, include_private: bool) -> Vec<CallableRef> {
        let functions = self
            .functions
            .iter()
            .enumerate()
            .filter(|(_, f)| include_private || f.is_public)
            .map(|(i, _)| CallableRef::Function(i));
        let methods = self
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| include_private || m.is_public)
            .map(|(i, _)| CallableRef::Method(i));
        functions.chain(methods).collect()
    }

    /// Write a description onto a callable
    ///
    /// Method descriptions are mirrored into the owning type's copy so the
    /// file-scope list and `TypeDecl::methods` stay equal.
    pub fn set_description(&mut self, target: CallableRef, description: &str) -> bool {
        match target {
            CallableRef::Function(i) => match self.functions.get_mut(i) {
                Some(function) => {
                    function.description = description.to_string();
                    true
                }
                None => false,
            },
            CallableRef::Method(i) => {
                let Some(method) = self.methods.get_mut(i) else {
                    return false;
                };
                method.description = description.to_string();
                let (owner, name, position) =
                    (method.belongs_to.clone(), method.name.clone(), method.position);

                for type_decl in self.types.iter_mut().filter(|t| t.name == owner) {
                    for nested in type_decl
                        .methods
                        .iter_mut()
                        .filter(|m| m.name == name && m.position == position)
                    {
                        nested.description = description.to_string();
                    }
                }
                true
            }
        }
    }

    /// Mirror file-scope methods into their owning type when the type is
    /// declared in this file and its method list is still empty
    pub fn attach_methods_to_types(&mut self) {
        for type_decl in &mut self.types {
            if !type_decl.methods.is_empty() {
                continue;
            }
            type_decl.methods = self
                .methods
                .iter()
                .filter(|m| m.belongs_to == type_decl.name)
                .cloned()
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, owner: &str, public: bool, line: u32) -> Method {
        Method {
            name: name.to_string(),
            belongs_to: owner.to_string(),
            is_public: public,
            position: Position {
                start_line: line,
                start_column: 1,
                end_line: line,
                end_column: 10,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn public_methods_preserve_insertion_order() {
        let mut model = StructuralModel::new("go", "a.go");
        model.methods = vec![
            method("Zed", "T", true, 1),
            method("hidden", "T", false, 2),
            method("Alpha", "T", true, 3),
        ];

        let names: Vec<_> = model.public_methods().iter().map(|m| m.name.clone()).collect();
        assert_eq!(names, vec!["Zed", "Alpha"]);
    }

    #[test]
    fn describable_lists_functions_before_methods() {
        let mut model = StructuralModel::new("go", "a.go");
        model.methods = vec![method("Run", "Server", true, 5)];
        model.functions = vec![
            Function {
                name: "New".into(),
                is_public: true,
                ..Default::default()
            },
            Function {
                name: "helper".into(),
                ..Default::default()
            },
        ];

        assert_eq!(
            model.describable(false),
            vec![CallableRef::Function(0), CallableRef::Method(0)]
        );
        assert_eq!(model.describable(true).len(), 3);
    }

    #[test]
    fn set_description_keeps_type_copy_in_sync() {
        let mut model = StructuralModel::new("go", "a.go");
        model.types.push(TypeDecl {
            name: "Server".into(),
            kind: TypeKind::Struct,
            ..Default::default()
        });
        model.methods = vec![method("Run", "Server", true, 5), method("Stop", "Server", true, 9)];
        model.attach_methods_to_types();

        assert!(model.set_description(CallableRef::Method(1), "Stops the server."));

        let nested: Vec<&Method> = model.types[0].methods.iter().collect();
        let flat = model.methods_of("Server");
        assert_eq!(nested, flat);
        assert_eq!(model.types[0].methods[1].description, "Stops the server.");
        assert!(model.types[0].methods[0].description.is_empty());
    }

    #[test]
    fn set_description_out_of_range_is_rejected() {
        let mut model = StructuralModel::new("python", "m.py");
        assert!(!model.set_description(CallableRef::Function(3), "nope"));
        assert!(!model.set_description(CallableRef::Method(0), "nope"));
    }

    #[test]
    fn defaulted_and_variadic_parameters_are_optional() {
        assert!(Parameter::named("a").is_required);
        assert!(!Parameter::named("b").with_default("1").is_required);
        assert!(!Parameter::named("rest").variadic().is_required);
    }
}
