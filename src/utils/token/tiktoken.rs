use std::collections::HashMap;
use anyhow::{anyhow, Result};
pub use tiktoken_rs::{get_bpe_from_model, CoreBPE};

use crate::utils::token::CountToken;
use lazy_static::lazy_static;

lazy_static! {
    /// const map from model family to context window size.
    pub static ref MODEL_TO_MAX_TOKENS: HashMap<&'static str, usize> = HashMap::from([
        ("gpt-4", 8192),
        ("gpt-4-32k", 32768),
        ("gpt-4-turbo", 128000),
        ("gpt-3.5-turbo", 16385),
    ]);
}

/// Map a model name onto the family whose tokenizer and context window it shares.
fn model_family(model: &str) -> Option<&'static str> {
    if model.starts_with("gpt-4-32k") {
        Some("gpt-4-32k")
    } else if model.starts_with("gpt-4-turbo") || model.starts_with("gpt-4-1106") || model.starts_with("gpt-4-0125") {
        Some("gpt-4-turbo")
    } else if model.starts_with("gpt-4") {
        Some("gpt-4")
    } else if model.starts_with("gpt-3.5") {
        Some("gpt-3.5-turbo")
    } else {
        None
    }
}

/// Counter using the Tiktoken tokenizer.
#[derive(Clone)]
#[readonly::make]
pub struct Tiktoken {
    /// The model family of the tokenizer. read-only.
    #[readonly]
    pub model: String,
    /// The tokenizer. read-only.
    #[readonly]
    pub bpe: CoreBPE,
}

impl Tiktoken {
    /// Create a new Tiktoken counter. Fails for models outside [MODEL_TO_MAX_TOKENS].
    pub fn new(model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        let family = model_family(&model).ok_or_else(|| anyhow!("model {} is not supported", model))?;
        let bpe = get_bpe_from_model(family)?;
        Ok(Tiktoken {
            model: family.to_string(),
            bpe,
        })
    }

    /// Context window of the model family.
    pub fn max_tokens(&self) -> usize {
        MODEL_TO_MAX_TOKENS.get(self.model.as_str()).copied().unwrap_or(0)
    }
}

impl CountToken for Tiktoken {
    fn count_token(&self, string: &str) -> usize {
        self.bpe.encode_with_special_tokens(string).len()
    }
}

#[cfg(test)]
mod test_tiktoken {
    use super::{model_family, Tiktoken};
    use crate::utils::token::CountToken;

    #[test]
    fn test_model_family() {
        assert_eq!(Some("gpt-4"), model_family("gpt-4-0613"));
        assert_eq!(Some("gpt-4-32k"), model_family("gpt-4-32k-0613"));
        assert_eq!(Some("gpt-3.5-turbo"), model_family("gpt-3.5-turbo-16k"));
        assert_eq!(None, model_family("claude"));
    }

    #[test]
    fn test_count() {
        let counter = Tiktoken::new("gpt-4").expect("gpt-4 tokenizer is bundled");
        assert_eq!(8192, counter.max_tokens());
        assert!(counter.count_token("We saw record sales in the third quarter.") > 0);
        assert_eq!(0, counter.count_token(""));
        assert!(Tiktoken::new("unknown-model").is_err());
    }
}
