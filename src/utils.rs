pub mod llm;
pub mod postprocess;
pub mod text;
pub mod token;
#[cfg(feature = "terminal_printing")]
pub mod printing;
pub(crate) mod prompt_processing;
