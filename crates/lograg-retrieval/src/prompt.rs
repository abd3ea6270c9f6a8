use std::fmt::Write;

use lograg_core::traits::{AnswerGenerator, Completion};
use lograg_core::Metadata;

/// Builds the question prompt around one retrieved log line.
pub fn answer_prompt(context: &Metadata, question: &str) -> String {
    let mut prompt = String::from("Based on the following log entry, answer the question:\n\n");
    let _ = writeln!(prompt, "Log entry (line {}):\n{}\n", context.line_number, context.text);
    prompt.push_str("Extracted fields:\n");
    if context.fields.is_empty() {
        prompt.push_str("(none)\n");
    }
    for (name, value) in context.fields.iter() {
        let _ = writeln!(prompt, "{name}: {value}");
    }
    let _ = write!(prompt, "\nQuestion: {question}");
    prompt
}

/// Answer generator that sends [`answer_prompt`] to a completion backend.
pub struct PromptAnswerGenerator<C> {
    completion: C,
}

impl<C: Completion> PromptAnswerGenerator<C> {
    pub fn new(completion: C) -> Self { Self { completion } }
}

impl<C: Completion> AnswerGenerator for PromptAnswerGenerator<C> {
    fn generate(&self, context: &Metadata, question: &str) -> anyhow::Result<String> {
        self.completion.complete(&answer_prompt(context, question))
    }
}
