//! Scripted text generators

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use aria_report::{Generation, GenerationError, GenerationPrompt, TextGenerator};

/// What a stub does on each call
#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    Fail,
    /// Quote every excerpt line of the prompt back as its own paragraph
    EchoExcerpts,
}

/// Generator returning a fixed reply and recording every prompt
pub struct StubGenerator {
    identifier: String,
    model: String,
    reply: StubReply,
    prompts: Arc<Mutex<Vec<GenerationPrompt>>>,
}

impl StubGenerator {
    pub fn new(identifier: &str, reply: StubReply) -> Self {
        Self {
            identifier: identifier.to_string(),
            model: format!("{}-stub-model", identifier),
            reply,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn text(identifier: &str, text: &str) -> Self {
        Self::new(identifier, StubReply::Text(text.to_string()))
    }

    pub fn failing(identifier: &str) -> Self {
        Self::new(identifier, StubReply::Fail)
    }

    /// Handle to the prompts seen so far, usable after the stub is moved
    pub fn prompts(&self) -> Arc<Mutex<Vec<GenerationPrompt>>> {
        Arc::clone(&self.prompts)
    }
}

/// Excerpt lines (`[SEG-NNN] text`) of a grounding prompt
pub fn prompt_excerpts(prompt: &GenerationPrompt) -> Vec<String> {
    prompt
        .user_text
        .lines()
        .filter(|l| l.starts_with("[SEG-"))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn generate(&self, prompt: &GenerationPrompt) -> Result<Generation, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.clone());

        let text = match &self.reply {
            StubReply::Text(text) => text.clone(),
            StubReply::Fail => {
                return Err(GenerationError::Status {
                    status: 503,
                    body: "service unavailable".to_string(),
                })
            }
            StubReply::EchoExcerpts => prompt_excerpts(prompt).join("\n\n"),
        };

        Ok(Generation {
            text,
            model: self.model.clone(),
            provider: "stub".to_string(),
            raw: serde_json::json!({ "stub": self.identifier }),
        })
    }
}
