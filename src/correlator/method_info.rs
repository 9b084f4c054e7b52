//! Prompt-side view of a callable

use crate::extractors::base::{CallableRef, Function, Method, MethodKind, Parameter, StructuralModel};
use std::collections::HashMap;

/// Name and rendered signature of one callable
///
/// Method names are qualified with their owner (`Server.Start`), and
/// accessors carry their kind (`Temp.value (getter)`) so a property's getter
/// and setter correlate separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: String,
    pub signature: String,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
        }
    }

    pub fn from_function(function: &Function) -> Self {
        Self {
            name: function.name.clone(),
            signature: render_signature(&function.name, &function.parameters, &function.return_type),
        }
    }

    pub fn from_method(method: &Method) -> Self {
        let name = match method.kind {
            MethodKind::Method => method.qualified_name(),
            MethodKind::Getter => format!("{} (getter)", method.qualified_name()),
            MethodKind::Setter => format!("{} (setter)", method.qualified_name()),
        };
        Self {
            name,
            signature: render_signature(&method.name, &method.parameters, &method.return_type),
        }
    }

    pub fn for_callable(model: &StructuralModel, target: CallableRef) -> Option<Self> {
        match target {
            CallableRef::Function(i) => model.functions.get(i).map(Self::from_function),
            CallableRef::Method(i) => model.methods.get(i).map(Self::from_method),
        }
    }
}

/// Suffix repeated names with `#2`, `#3`, ... in order of appearance
///
/// Replies are correlated by name, so every entry must be unique.
pub fn disambiguate(infos: &mut [MethodInfo]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for info in infos.iter_mut() {
        let count = seen.entry(info.name.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            info.name = format!("{} #{}", info.name, count);
        }
    }
}

/// `name(a: T, b: U = d, ...rest) R`
pub fn render_signature(name: &str, parameters: &[Parameter], return_type: &str) -> String {
    let params: Vec<String> = parameters.iter().map(render_parameter).collect();
    let mut signature = format!("{}({})", name, params.join(", "));
    if !return_type.is_empty() {
        signature.push(' ');
        signature.push_str(return_type);
    }
    signature
}

/// `name: type = default`, with `...` for variadics that do not already carry it
pub fn render_parameter(parameter: &Parameter) -> String {
    let mut rendered = String::new();
    // Python keeps its stars in the name, Go puts `...` on the type
    if parameter.is_variadic
        && !parameter.name.starts_with('*')
        && !parameter.type_name.starts_with("...")
    {
        rendered.push_str("...");
    }
    rendered.push_str(&parameter.name);
    if !parameter.type_name.is_empty() {
        if parameter.name.is_empty() {
            rendered.push_str(&parameter.type_name);
        } else {
            rendered.push_str(": ");
            rendered.push_str(&parameter.type_name);
        }
    }
    if !parameter.default_value.is_empty() {
        rendered.push_str(" = ");
        rendered.push_str(&parameter.default_value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_style_signature() {
        let params = vec![
            Parameter::named("a").with_type("string"),
            Parameter::named("b").with_type("int"),
        ];
        assert_eq!(
            render_signature("Foo", &params, "int, error"),
            "Foo(a: string, b: int) int, error"
        );
    }

    #[test]
    fn variadic_markers_are_not_doubled() {
        let go = vec![Parameter::named("args").with_type("...string").variadic()];
        assert_eq!(render_signature("Log", &go, ""), "Log(args: ...string)");

        let python = vec![
            Parameter::named("self"),
            Parameter::named("*args").variadic(),
            Parameter::named("**kwargs").variadic(),
        ];
        assert_eq!(
            render_signature("run", &python, "None"),
            "run(self, *args, **kwargs) None"
        );

        let js = vec![Parameter::named("rest").with_type("string[]").variadic()];
        assert_eq!(render_signature("tag", &js, ""), "tag(...rest: string[])");
    }

    #[test]
    fn defaults_and_unnamed_parameters() {
        let params = vec![
            Parameter::named("timeout").with_type("float").with_default("30.0"),
            Parameter::named("").with_type("int"),
        ];
        assert_eq!(
            render_signature("wait", &params, ""),
            "wait(timeout: float = 30.0, int)"
        );
    }

    #[test]
    fn methods_use_qualified_names() {
        let method = Method {
            name: "Start".to_string(),
            belongs_to: "Server".to_string(),
            parameters: vec![Parameter::named("ctx").with_type("context.Context")],
            return_type: "error".to_string(),
            ..Default::default()
        };
        let info = MethodInfo::from_method(&method);
        assert_eq!(info.name, "Server.Start");
        assert_eq!(info.signature, "Start(ctx: context.Context) error");
    }

    #[test]
    fn accessors_are_named_by_kind() {
        let accessor = |kind| Method {
            name: "value".to_string(),
            belongs_to: "Temp".to_string(),
            kind,
            ..Default::default()
        };
        assert_eq!(
            MethodInfo::from_method(&accessor(MethodKind::Getter)).name,
            "Temp.value (getter)"
        );
        assert_eq!(
            MethodInfo::from_method(&accessor(MethodKind::Setter)).name,
            "Temp.value (setter)"
        );
    }

    #[test]
    fn repeated_names_get_numbered() {
        let mut infos = vec![
            MethodInfo::new("A.run", "run()"),
            MethodInfo::new("A.stop", "stop()"),
            MethodInfo::new("A.run", "run(x)"),
            MethodInfo::new("A.run", "run(x, y)"),
        ];
        disambiguate(&mut infos);
        let names: Vec<_> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A.run", "A.stop", "A.run #2", "A.run #3"]);
    }
}
