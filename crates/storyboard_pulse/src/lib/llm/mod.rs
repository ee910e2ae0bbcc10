pub mod completer;
pub mod openai;
