//! Prompt assembly for basic and grounded completions

/// Instruction line for the ungrounded baseline
const BASIC_PREAMBLE: &str = "You are a helpful enterprise architecture assistant.";

/// Instruction line for context-grounded answers
const GROUNDED_PREAMBLE: &str = "You are an enterprise architecture copilot. Use only the provided context to answer the question, and cite the relevant framework names when possible.";

/// Which prompt variant was used for an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Question only
    Basic,
    /// Retrieved context plus question
    Grounded,
}

/// Build the baseline prompt containing only the question
#[must_use]
pub fn basic_prompt(question: &str) -> String {
    format!(
        "{BASIC_PREAMBLE}\nQuestion: {}\nAnswer:",
        question.trim()
    )
}

/// Build a prompt that grounds the answer in retrieved context
#[must_use]
pub fn grounded_prompt(question: &str, context: &str) -> String {
    format!(
        "{GROUNDED_PREAMBLE}\n\nContext:\n{}\n\nQuestion: {}\nAnswer:",
        context.trim(),
        question.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt_layout() {
        let prompt = basic_prompt("  What is OV-1?  ");
        assert_eq!(
            prompt,
            "You are a helpful enterprise architecture assistant.\nQuestion: What is OV-1?\nAnswer:"
        );
    }

    #[test]
    fn test_grounded_prompt_contains_context_block() {
        let context = "DoDAF 2.02 | OV-1 - Graphic.\n\nTOGAF 10 | ADM - Method.";
        let prompt = grounded_prompt("What is OV-1?", context);

        assert!(prompt.starts_with(GROUNDED_PREAMBLE));
        assert!(prompt.contains("\n\nContext:\nDoDAF 2.02 | OV-1 - Graphic.\n\nTOGAF 10 | ADM - Method.\n\n"));
        assert!(prompt.ends_with("Question: What is OV-1?\nAnswer:"));
    }

    #[test]
    fn test_grounded_prompt_with_empty_context() {
        let prompt = grounded_prompt("q", "");
        assert!(prompt.contains("Context:\n\n\nQuestion: q"));
    }
}
