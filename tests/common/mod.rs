#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docbranch::generator::{AnswerGenerator, GenerationError};

/// Reply to every summary request. Long enough to pass summary validation.
pub const SUMMARY: &str = "The conversation established that Paris is the capital of France. \
It then compared Berlin as the capital of Germany and noted both cities are large. \
However the answers did not cover population figures.";

/// Records every call and answers with a fixed reply, or fails when built
/// with [`FakeGenerator::failing`]. Summary requests are also counted in
/// `summary_calls`.
#[derive(Default)]
pub struct FakeGenerator {
    pub calls: Mutex<Vec<(String, String)>>,
    pub summary_calls: Mutex<usize>,
    fail: bool,
}

impl FakeGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn last_context(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(_, c)| c.clone())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn summary_count(&self) -> usize {
        *self.summary_calls.lock().unwrap()
    }

    fn failure(&self) -> Result<(), GenerationError> {
        if self.fail {
            return Err(GenerationError::Provider {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AnswerGenerator for FakeGenerator {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), context.to_string()));
        self.failure()?;
        Ok(format!("Answer to: {}", question))
    }

    async fn summarize(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push((prompt.to_string(), String::new()));
        *self.summary_calls.lock().unwrap() += 1;
        self.failure()?;
        Ok(SUMMARY.to_string())
    }
}
