use std::sync::{Arc, Mutex};
use storyboard_pulse::{Completer, Error};

#[derive(Clone)]
pub struct MockCompleter {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with_status: Option<u16>,
}

impl MockCompleter {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with_status: None,
        }
    }

    pub fn from_fixture() -> Self {
        Self::new(include_str!("../fixtures/reply.md"))
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with_status: Some(status),
        }
    }
}

impl Completer for MockCompleter {
    type Error = Error;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(status) = self.fail_with_status {
            return Err(Error::Service {
                status,
                message: "mock completion failure".into(),
            });
        }
        Ok(self.reply.clone())
    }
}
