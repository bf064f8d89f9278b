use manuscript_core::{AiError, AiGateway, TextGenerator, SYNTHESIS_FAILURE_MESSAGE};
use std::cell::RefCell;

struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::Status {
            code: 429,
            body: "quota exceeded".to_string(),
        })
    }
}

#[derive(Default)]
struct RecordingGenerator {
    reply: String,
    prompts: RefCell<Vec<String>>,
}

impl TextGenerator for RecordingGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

fn drafts() -> [String; 3] {
    ["one".to_string(), "two".to_string(), "three".to_string()]
}

#[test]
fn polish_failure_returns_input_unchanged() {
    let gateway = AiGateway::new(FailingGenerator);
    assert_eq!(gateway.polish("Rough text.\n\nMore."), "Rough text.\n\nMore.");
}

#[test]
fn synthesize_failure_returns_fixed_message() {
    let gateway = AiGateway::new(FailingGenerator);
    assert_eq!(gateway.synthesize(&drafts()), SYNTHESIS_FAILURE_MESSAGE);
}

#[test]
fn empty_generator_output_counts_as_failure() {
    let gateway = AiGateway::new(RecordingGenerator {
        reply: "   ".to_string(),
        ..RecordingGenerator::default()
    });
    assert_eq!(gateway.polish("keep"), "keep");
    assert_eq!(gateway.synthesize(&drafts()), SYNTHESIS_FAILURE_MESSAGE);
}

#[test]
fn successful_calls_return_trimmed_output_and_send_one_prompt() {
    let generator = RecordingGenerator {
        reply: "\nPolished.\n".to_string(),
        ..RecordingGenerator::default()
    };
    let gateway = AiGateway::new(&generator);

    assert_eq!(gateway.polish("rough"), "Polished.");
    assert_eq!(generator.prompts.borrow().len(), 1);
    assert_eq!(gateway.synthesize(&drafts()), "Polished.");
    assert_eq!(generator.prompts.borrow().len(), 2);
}

#[test]
fn blank_polish_input_skips_the_generator() {
    let generator = RecordingGenerator {
        reply: "should not be used".to_string(),
        ..RecordingGenerator::default()
    };
    let gateway = AiGateway::new(&generator);

    assert_eq!(gateway.polish("  \n"), "  \n");
    assert_eq!(gateway.polish(""), "");
    assert!(generator.prompts.borrow().is_empty());
}

#[test]
fn boxed_generators_are_accepted() {
    let gateway = AiGateway::new(Box::new(FailingGenerator) as Box<dyn TextGenerator>);
    assert_eq!(gateway.polish("as is"), "as is");
}

#[test]
fn prompts_carry_the_source_text() {
    let generator = RecordingGenerator {
        reply: "ok".to_string(),
        ..RecordingGenerator::default()
    };
    let gateway = AiGateway::new(&generator);

    gateway.polish("the manuscript body");
    gateway.synthesize(&drafts());

    let prompts = generator.prompts.borrow();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("the manuscript body"));
    assert!(prompts[1].contains("[Draft 1]\none"));
    assert!(prompts[1].contains("[Draft 3]\nthree"));
}
