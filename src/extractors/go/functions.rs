use crate::extractors::base::visibility::go_is_public;
use crate::extractors::base::{ExportKind, Function, Method, MethodKind};
use tracing::debug;
use tree_sitter::Node;

/// Function and method extraction for Go
impl super::GoWalker<'_> {
    pub(super) fn extract_function(&mut self, node: Node) {
        let Some(name) = self.base.field_text(&node, "name") else {
            return;
        };
        let function = self.build_function(node, name);
        if function.is_public {
            self.add_export(&function.name, ExportKind::Function, function.position);
        }
        self.model.functions.push(function);
    }

    /// `func (r *T) Name(...)`: the receiver names the owner and is not a parameter
    pub(super) fn extract_method(&mut self, node: Node) {
        let Some(name) = self.base.field_text(&node, "name") else {
            return;
        };

        let owner = node
            .child_by_field_name("receiver")
            .and_then(|receiver| self.receiver_type(receiver));

        let Some(belongs_to) = owner else {
            // No usable receiver: not a method
            debug!("Go method {} has no receiver type, recording as function", name);
            let function = self.build_function(node, name);
            self.model.functions.push(function);
            return;
        };

        let function = self.build_function(node, name);
        self.model.methods.push(Method {
            name: function.name,
            belongs_to,
            parameters: function.parameters,
            return_type: function.return_type,
            is_public: function.is_public,
            kind: MethodKind::Method,
            position: function.position,
            ..Default::default()
        });
    }

    fn build_function(&self, node: Node, name: String) -> Function {
        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| self.extract_parameter_list(p))
            .unwrap_or_default();
        let return_type = node
            .child_by_field_name("result")
            .map(|r| self.render_result(r))
            .unwrap_or_default();

        Function {
            is_public: go_is_public(&name),
            name,
            parameters,
            return_type,
            position: self.base.position(&node),
            ..Default::default()
        }
    }
}
