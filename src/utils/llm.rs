//! The LLM endpoint of a prompt pipeline.
//!
//! Everything in this crate talks to a model through [CompleteText], a prompt in and a reply out. [OpenAIChat] is the
//! implementation backed by the OpenAI chat completion API; tests plug in scripted implementations instead.

use anyhow::{anyhow, Result};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use log::debug;

/// Anything that turns a prompt into a completion.
#[async_trait]
pub trait CompleteText: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: CompleteText + ?Sized> CompleteText for Box<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

/// Settings of a chat completion request.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub model: String,
    pub temperature: f32,
    /// Sent as a system message before the prompt, if set
    pub system_prompt: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            system_prompt: None,
        }
    }
}

/// Chat completion model from OpenAI API.
#[derive(Clone, Debug)]
pub struct OpenAIChat {
    pub client: Client<OpenAIConfig>,
    pub config: ChatConfig,
}

impl OpenAIChat {
    /// Client configured from the environment (`OPENAI_API_KEY`, and optionally `OPENAI_BASE_URL`).
    pub fn from_env(config: ChatConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Use a preconfigured client, e.g. one pointed at another OpenAI-compatible endpoint.
    pub fn with_client(client: Client<OpenAIConfig>, config: ChatConfig) -> Self {
        Self { client, config }
    }

    fn messages(&self, prompt: &str) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = &self.config.system_prompt {
            messages.push(ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt.as_str())
                .build()?
                .into());
        }
        messages.push(ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?
            .into());
        Ok(messages)
    }
}

#[async_trait]
impl CompleteText for OpenAIChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.config.model.as_str())
            .temperature(self.config.temperature)
            .messages(self.messages(prompt)?)
            .build()?;
        let response = self.client.chat().create(request).await?;
        let reply = response.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("model {} returned no content", self.config.model))?;
        debug!("Completion from {}:\n{}", self.config.model, reply);
        Ok(reply)
    }
}

#[cfg(test)]
pub(crate) mod test_llm {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use super::{ChatConfig, CompleteText, OpenAIChat};

    /// Replies with canned completions in order and records the prompts it was given.
    #[derive(Default)]
    pub(crate) struct ScriptedLlm {
        replies: Mutex<VecDeque<String>>,
        pub(crate) prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        pub(crate) fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompleteText for ScriptedLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies.lock().unwrap().pop_front().ok_or_else(|| anyhow!("script exhausted"))
        }
    }

    #[test]
    fn test_messages() {
        let chat = OpenAIChat::from_env(ChatConfig {
            system_prompt: Some("You are terse.".to_string()),
            ..ChatConfig::default()
        });
        assert_eq!(2, chat.messages("hello").unwrap().len());
        let chat = OpenAIChat::from_env(ChatConfig::default());
        assert_eq!(1, chat.messages("hello").unwrap().len());
    }

    #[tokio::test]
    async fn test_scripted() {
        let llm: Box<dyn CompleteText> = Box::new(ScriptedLlm::new(["a"]));
        assert_eq!("a", llm.complete("p").await.unwrap());
        assert!(llm.complete("p").await.is_err());
    }
}
