use std::{fmt::Debug, future::Future};

use crate::error::Error;

pub trait Completer {
    const CONTEXT_WINDOW_LIMIT: usize = 128_000;

    type Error: Debug + Into<Error>;

    /// Sends `prompt` as a single user message and returns the reply text verbatim
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>>;
}
