//! Batch Description Correlator
//!
//! Attaches generated descriptions to the callables of one StructuralModel.
//! Callables are sent in fixed-size batches, strictly in order, and each
//! reply is correlated back by its batch-relative `Метод N:` markers.
//!
//! Failure handling per batch:
//! - provider error: the whole batch is discarded, the next batch proceeds
//! - missing markers: those callables keep an empty description

pub mod method_info;
pub mod prompt;

pub use method_info::{disambiguate, render_parameter, render_signature, MethodInfo};
pub use prompt::PromptBuilder;

use crate::config::LlmConfig;
use crate::errors::ProviderError;
use crate::extractors::base::{CallableRef, StructuralModel};
use crate::llm::{GenerationRequest, TextGenerator};
use std::ops::Range;
use std::time::Duration;
use tracing::{debug, warn};

/// What happened while describing one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeOutcome {
    pub batches: usize,
    /// Batch indices whose request failed
    pub failed_batches: Vec<usize>,
    pub described: usize,
    /// Names the replies did not cover (from successful batches only)
    pub missing: Vec<String>,
}

impl DescribeOutcome {
    /// Some callables were left without a description
    pub fn is_partial(&self) -> bool {
        !self.missing.is_empty() || !self.failed_batches.is_empty()
    }
}

/// Contiguous index ranges of at most `batch_size` items
pub fn plan_batches(count: usize, batch_size: usize) -> Vec<Range<usize>> {
    let batch_size = batch_size.max(1);
    (0..count)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(count))
        .collect()
}

pub struct Describer<'g> {
    generator: &'g dyn TextGenerator,
    prompts: PromptBuilder,
    batch_size: usize,
    batch_delay: Duration,
    max_tokens: u32,
    temperature: f64,
    include_private: bool,
}

impl<'g> Describer<'g> {
    pub fn new(generator: &'g dyn TextGenerator, config: &LlmConfig) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(config.max_context_length),
            batch_size: config.batch_size.max(1),
            batch_delay: Duration::from_secs(config.batch_delay),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            include_private: false,
        }
    }

    pub fn include_private(mut self, include: bool) -> Self {
        self.include_private = include;
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    fn request(&self, prompt: String) -> GenerationRequest {
        GenerationRequest {
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            metadata: Default::default(),
        }
    }

    /// Describe every eligible callable of `model`, batch by batch
    ///
    /// A batch's descriptions are applied all at once after its reply has
    /// been parsed, never partially.
    pub fn describe(&self, model: &mut StructuralModel) -> DescribeOutcome {
        let (targets, mut names): (Vec<CallableRef>, Vec<MethodInfo>) = model
            .describable(self.include_private)
            .into_iter()
            .filter_map(|target| MethodInfo::for_callable(model, target).map(|info| (target, info)))
            .unzip();
        disambiguate(&mut names);
        let infos: Vec<(CallableRef, MethodInfo)> = targets.into_iter().zip(names).collect();

        let context = PromptBuilder::file_context(model);
        let batches = plan_batches(infos.len(), self.batch_size);
        let mut outcome = DescribeOutcome {
            batches: batches.len(),
            ..Default::default()
        };

        for (index, range) in batches.into_iter().enumerate() {
            if index > 0 && !self.batch_delay.is_zero() {
                std::thread::sleep(self.batch_delay);
            }

            let batch = &infos[range];
            let methods: Vec<MethodInfo> = batch.iter().map(|(_, info)| info.clone()).collect();
            let request = self
                .request(self.prompts.build_batch_prompt(&methods, &context))
                .with_metadata("file", model.file_path.clone())
                .with_metadata("batch", index.to_string());

            let response = match self.generator.generate(&request) {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        file = %model.file_path,
                        batch = index,
                        "⚠️  Description batch failed, skipping: {}",
                        e
                    );
                    outcome.failed_batches.push(index);
                    continue;
                }
            };
            if response.truncated {
                debug!(file = %model.file_path, batch = index, "Reply hit the token limit");
            }

            let descriptions = self.prompts.parse_batch_response(&response.text, &methods);
            for (target, info) in batch {
                match descriptions.get(&info.name) {
                    Some(text) if !text.is_empty() => {
                        if model.set_description(*target, text) {
                            outcome.described += 1;
                        }
                    }
                    _ => outcome.missing.push(info.name.clone()),
                }
            }
        }

        if !outcome.missing.is_empty() {
            warn!(
                file = %model.file_path,
                "⚠️  No description returned for {} callable(s): {}",
                outcome.missing.len(),
                outcome.missing.join(", ")
            );
        }
        debug!(
            file = %model.file_path,
            "Described {} callable(s) in {} batch(es)",
            outcome.described,
            outcome.batches
        );
        outcome
    }

    /// One-paragraph summary of the whole file
    pub fn summarize(&self, model: &StructuralModel) -> Result<String, ProviderError> {
        let request = self
            .request(self.prompts.build_file_summary_prompt(model))
            .with_metadata("file", model.file_path.clone());
        let response = self.generator.generate(&request)?;
        Ok(response.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{Function, Method, TypeDecl};
    use crate::llm::GenerationResponse;
    use std::sync::Mutex;

    /// Replies with scripted results in order and records every prompt
    struct Scripted {
        replies: Mutex<Vec<Result<String, ()>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<&str, ()>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .rev()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Answers every batch by echoing each listed method's marker
        fn echoing() -> Self {
            Self::new(Vec::new())
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl TextGenerator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            let scripted = self.replies.lock().unwrap().pop();
            let text = match scripted {
                Some(Ok(text)) => text,
                Some(Err(())) => {
                    return Err(ProviderError::InvalidResponse {
                        provider: "scripted".to_string(),
                        message: "scripted failure".to_string(),
                    })
                }
                None => echo_markers(&request.prompt),
            };
            Ok(GenerationResponse {
                text,
                tokens_used: 0,
                truncated: false,
            })
        }
    }

    /// `Метод N: <name> описан` for every listed method of a batch prompt
    fn echo_markers(prompt: &str) -> String {
        let listing = prompt
            .split("Методы:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\nКонтекст файла:").next())
            .unwrap_or_default();
        listing
            .lines()
            .filter(|line| line.starts_with("Метод "))
            .map(|line| format!("{} описан\n", line))
            .collect()
    }

    fn config(batch_size: usize) -> LlmConfig {
        LlmConfig {
            batch_size,
            batch_delay: 0,
            ..Default::default()
        }
    }

    fn model_with(functions: usize, methods: usize) -> StructuralModel {
        let mut model = StructuralModel::new("Go", "pkg/server.go");
        for i in 0..functions {
            model.functions.push(Function {
                name: format!("Func{}", i),
                is_public: true,
                ..Default::default()
            });
        }
        let mut server = TypeDecl {
            name: "Server".to_string(),
            is_public: true,
            ..Default::default()
        };
        for i in 0..methods {
            let method = Method {
                name: format!("Method{}", i),
                belongs_to: "Server".to_string(),
                is_public: true,
                ..Default::default()
            };
            server.methods.push(method.clone());
            model.methods.push(method);
        }
        model.types.push(server);
        model
    }

    #[test]
    fn batch_plan_sizes() {
        assert_eq!(plan_batches(0, 5), Vec::<Range<usize>>::new());
        assert_eq!(plan_batches(5, 5), vec![0..5]);
        assert_eq!(plan_batches(12, 5), vec![0..5, 5..10, 10..12]);
        assert_eq!(plan_batches(3, 0), vec![0..1, 1..2, 2..3]);
        for n in 0..30 {
            assert_eq!(plan_batches(n, 5).len(), n.div_ceil(5));
        }
    }

    #[test]
    fn issues_one_request_per_batch_in_order() {
        let generator = Scripted::echoing();
        let mut model = model_with(4, 8);
        let outcome = Describer::new(&generator, &config(5)).describe(&mut model);

        assert_eq!(outcome.batches, 3);
        assert_eq!(outcome.described, 12);
        assert!(!outcome.is_partial());

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("Метод 1: Func0\n"));
        assert!(prompts[0].contains("Метод 5: Server.Method0\n"));
        assert!(prompts[1].contains("Метод 1: Server.Method1\n"));
        assert!(prompts[2].contains("Метод 2: Server.Method7\n"));
        assert!(!prompts[2].contains("Метод 3:"));

        assert_eq!(model.functions[0].description, "Func0 описан");
        assert_eq!(model.methods[7].description, "Server.Method7 описан");
        // The owning type's copy stays in sync
        assert_eq!(model.types[0].methods[7].description, "Server.Method7 описан");
    }

    #[test]
    fn missing_marker_leaves_one_callable_undescribed() {
        let generator = Scripted::new(vec![Ok("Метод 1: первая\nМетод 3: третья")]);
        let mut model = model_with(3, 0);
        let outcome = Describer::new(&generator, &config(5)).describe(&mut model);

        assert_eq!(outcome.described, 2);
        assert_eq!(outcome.missing, vec!["Func1".to_string()]);
        assert!(outcome.is_partial());
        assert_eq!(model.functions[0].description, "первая");
        assert_eq!(model.functions[1].description, "");
        assert_eq!(model.functions[2].description, "третья");
    }

    #[test]
    fn failed_batch_is_discarded_and_next_batch_proceeds() {
        let generator = Scripted::new(vec![
            Err(()),
            Ok("Метод 1: шестая\nМетод 2: седьмая"),
        ]);
        let mut model = model_with(7, 0);
        let outcome = Describer::new(&generator, &config(5)).describe(&mut model);

        assert_eq!(outcome.failed_batches, vec![0]);
        assert_eq!(outcome.described, 2);
        assert!(outcome.missing.is_empty());
        assert!(model.functions[..5].iter().all(|f| f.description.is_empty()));
        assert_eq!(model.functions[5].description, "шестая");
        assert_eq!(model.functions[6].description, "седьмая");
    }

    #[test]
    fn getter_and_setter_keep_their_own_descriptions() {
        let source = "class Temp:\n    @property\n    def value(self):\n        return self._v\n\n    @value.setter\n    def value(self, v):\n        self._v = v\n";
        let mut model = crate::extractors::default_registry()
            .unwrap()
            .parse_file("temp.py", source)
            .unwrap();
        assert_eq!(model.methods.len(), 2);

        let generator = Scripted::new(vec![Ok("Метод 1: читает значение\nМетод 2: записывает значение")]);
        let outcome = Describer::new(&generator, &config(5)).describe(&mut model);

        assert_eq!(outcome.described, 2);
        assert!(generator.prompts()[0].contains("Метод 1: Temp.value (getter)\n"));
        assert!(generator.prompts()[0].contains("Метод 2: Temp.value (setter)\n"));
        assert_eq!(model.methods[0].description, "читает значение");
        assert_eq!(model.methods[1].description, "записывает значение");
    }

    #[test]
    fn repeated_names_in_one_batch_are_correlated_separately() {
        let mut model = model_with(2, 0);
        model.functions[1].name = "Func0".to_string();

        let generator = Scripted::echoing();
        let outcome = Describer::new(&generator, &config(5)).describe(&mut model);

        assert_eq!(outcome.described, 2);
        assert_eq!(model.functions[0].description, "Func0 описан");
        assert_eq!(model.functions[1].description, "Func0 #2 описан");
    }

    #[test]
    fn private_callables_are_skipped_unless_requested() {
        let mut model = model_with(2, 0);
        model.functions[1].is_public = false;

        let generator = Scripted::echoing();
        let outcome = Describer::new(&generator, &config(5)).describe(&mut model.clone());
        assert_eq!(outcome.described, 1);

        let generator = Scripted::echoing();
        let outcome = Describer::new(&generator, &config(5))
            .include_private(true)
            .describe(&mut model);
        assert_eq!(outcome.described, 2);
        assert_eq!(model.functions[1].description, "Func1 описан");
    }

    #[test]
    fn nothing_to_describe_sends_nothing() {
        let generator = Scripted::echoing();
        let mut model = StructuralModel::new("Go", "empty.go");
        let outcome = Describer::new(&generator, &config(5)).describe(&mut model);
        assert_eq!(outcome, DescribeOutcome::default());
        assert!(generator.prompts().is_empty());
    }

    #[test]
    fn summary_uses_the_file_prompt() {
        let generator = Scripted::new(vec![Ok("  Файл запускает HTTP сервер.  ")]);
        let model = model_with(1, 1);
        let summary = Describer::new(&generator, &config(5))
            .summarize(&model)
            .unwrap();
        assert_eq!(summary, "Файл запускает HTTP сервер.");
        assert!(generator.prompts()[0].contains("Имя файла: pkg/server.go"));
    }
}
