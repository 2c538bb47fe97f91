//! AI capability port.
//!
//! The gateway fronts exactly one capability: take a prompt, produce an
//! answer. The answer can be awaited whole or observed as it is produced.
//! Both forms come from the same fragment stream, so the concatenation of
//! streamed fragments always equals the awaited answer.

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;
use thiserror::Error;

use crate::domain::{AskRequest, ModelDescriptor};

/// Lazy, finite, non-restartable sequence of answer fragments.
///
/// Fragments arrive in emission order. An `Err` item is terminal: nothing
/// after it is read.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, AskError>> + Send>>;

/// Errors surfaced by the AI capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AskError {
    /// The capability ran and reported a failure.
    #[error("{0}")]
    Failed(String),

    /// The capability could not be reached or started.
    #[error("AI capability unavailable: {0}")]
    Unavailable(String),
}

/// Port for the single-prompt AI capability.
///
/// Implementations must be safe for concurrent, independent invocations;
/// no conversation state is shared between calls.
#[async_trait]
pub trait AskPort: Send + Sync + fmt::Debug {
    /// Start answering `request` and return the fragment stream.
    ///
    /// An `Err` here means the capability never started; failures after
    /// the first fragment arrive as an `Err` item in the stream.
    async fn ask_stream(&self, request: &AskRequest) -> Result<FragmentStream, AskError>;

    /// Answer `request` and return the complete text.
    ///
    /// The default drains [`AskPort::ask_stream`].
    async fn ask(&self, request: &AskRequest) -> Result<String, AskError> {
        let mut stream = self.ask_stream(request).await?;
        let mut answer = String::new();
        while let Some(fragment) = stream.next().await {
            answer.push_str(&fragment?);
        }
        Ok(answer)
    }

    /// Models this capability advertises.
    fn models(&self) -> Vec<ModelDescriptor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of fragments.
    #[derive(Debug)]
    struct ScriptedAsk {
        items: Vec<Result<String, AskError>>,
    }

    #[async_trait]
    impl AskPort for ScriptedAsk {
        async fn ask_stream(&self, _request: &AskRequest) -> Result<FragmentStream, AskError> {
            Ok(Box::pin(futures_util::stream::iter(self.items.clone())))
        }

        fn models(&self) -> Vec<ModelDescriptor> {
            vec![ModelDescriptor::from_id("scripted")]
        }
    }

    #[tokio::test]
    async fn test_ask_concatenates_fragments_in_order() {
        let port = ScriptedAsk {
            items: vec![Ok("Hel".into()), Ok("lo".into()), Ok(", world".into())],
        };

        let answer = port.ask(&AskRequest::new("hi")).await.unwrap();
        assert_eq!(answer, "Hello, world");
    }

    #[test]
    fn test_ask_surfaces_mid_stream_error() {
        let port = ScriptedAsk {
            items: vec![
                Ok("partial".into()),
                Err(AskError::Failed("boom".into())),
                Ok("never read".into()),
            ],
        };

        let result = tokio_test::block_on(port.ask(&AskRequest::new("hi")));
        assert_eq!(result, Err(AskError::Failed("boom".into())));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AskError::Failed("quota".into()).to_string(), "quota");
        assert_eq!(
            AskError::Unavailable("no binary".into()).to_string(),
            "AI capability unavailable: no binary"
        );
    }
}
