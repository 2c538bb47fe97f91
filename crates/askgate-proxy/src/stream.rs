//! SSE framing of an answer fragment stream.
//!
//! Frame sequence for a successful answer:
//!
//! ```text
//! data: {"id":"chatcmpl-xyz",...,"choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}
//!
//! data: {"id":"chatcmpl-xyz",...,"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}
//!
//! data: [DONE]
//! ```
//!
//! A failure ends the body after a single `data: {"error":"..."}` frame,
//! with no terminal chunk and no `[DONE]`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use askgate_core::{AskPort, AskRequest, FragmentStream};

use crate::models::ErrorResponse;
use crate::translate::CompletionEnvelope;

const DONE_FRAME: &[u8] = b"data: [DONE]\n\n";

/// Build the `text/event-stream` response for a streaming chat request.
///
/// Headers are committed before the capability is invoked, so a failure to
/// start is reported in-band like any other stream error.
pub fn sse_response(
    ask: Arc<dyn AskPort>,
    request: AskRequest,
    envelope: CompletionEnvelope,
) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("x-accel-buffering", "no") // Disable nginx buffering
        .body(Body::from_stream(sse_frames(ask, request, envelope)))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Where the emitter is in the frame sequence.
enum Phase {
    /// Capability not yet invoked.
    Pending(Arc<dyn AskPort>, AskRequest),
    Streaming(FragmentStream),
    /// Terminal chunk sent, `[DONE]` is next.
    Finishing,
    Done,
}

/// State threaded through the `unfold` stream.
struct EmitterState {
    phase: Phase,
    envelope: CompletionEnvelope,
    fragments: usize,
}

/// Lazily invoke the capability and turn its fragments into SSE frames.
///
/// Dropping the returned stream drops the fragment stream with it.
pub(crate) fn sse_frames(
    ask: Arc<dyn AskPort>,
    request: AskRequest,
    envelope: CompletionEnvelope,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let state = EmitterState {
        phase: Phase::Pending(ask, request),
        envelope,
        fragments: 0,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        loop {
            match std::mem::replace(&mut st.phase, Phase::Done) {
                Phase::Pending(ask, request) => match ask.ask_stream(&request).await {
                    Ok(fragments) => st.phase = Phase::Streaming(fragments),
                    Err(e) => {
                        warn!(model = ?request.model, "Ask failed to start: {e}");
                        return Some((Ok(error_frame(&e.to_string())), st));
                    }
                },
                Phase::Streaming(mut fragments) => match fragments.next().await {
                    Some(Ok(fragment)) if fragment.is_empty() => {
                        st.phase = Phase::Streaming(fragments);
                    }
                    Some(Ok(fragment)) => {
                        st.fragments += 1;
                        let frame = data_frame(&st.envelope.chunk(fragment));
                        st.phase = Phase::Streaming(fragments);
                        return Some((Ok(frame), st));
                    }
                    Some(Err(e)) => {
                        warn!(fragments = st.fragments, "Ask failed mid-stream: {e}");
                        return Some((Ok(error_frame(&e.to_string())), st));
                    }
                    None => {
                        debug!(fragments = st.fragments, "Answer stream complete");
                        let frame = data_frame(&st.envelope.final_chunk());
                        st.phase = Phase::Finishing;
                        return Some((Ok(frame), st));
                    }
                },
                Phase::Finishing => return Some((Ok(Bytes::from_static(DONE_FRAME)), st)),
                Phase::Done => return None,
            }
        }
    })
}

fn data_frame(payload: &impl Serialize) -> Bytes {
    match serde_json::to_string(payload) {
        Ok(json) => Bytes::from(format!("data: {json}\n\n")),
        Err(e) => error_frame(&e.to_string()),
    }
}

fn error_frame(message: &str) -> Bytes {
    let json = serde_json::to_string(&ErrorResponse::new(message))
        .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    Bytes::from(format!("data: {json}\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use askgate_core::{AskError, ModelDescriptor};
    use async_trait::async_trait;

    #[derive(Debug)]
    enum Script {
        Items(Vec<Result<String, AskError>>),
        RefuseToStart(AskError),
    }

    #[async_trait]
    impl AskPort for Script {
        async fn ask_stream(&self, _request: &AskRequest) -> Result<FragmentStream, AskError> {
            match self {
                Self::Items(items) => Ok(Box::pin(futures_util::stream::iter(items.clone()))),
                Self::RefuseToStart(e) => Err(e.clone()),
            }
        }

        fn models(&self) -> Vec<ModelDescriptor> {
            Vec::new()
        }
    }

    async fn frames(script: Script) -> Vec<String> {
        sse_frames(
            Arc::new(script),
            AskRequest::new("hi"),
            CompletionEnvelope::now("x"),
        )
        .map(|frame| match frame {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(never) => match never {},
        })
        .collect()
        .await
    }

    fn payload(frame: &str) -> serde_json::Value {
        let json = frame
            .strip_prefix("data: ")
            .and_then(|f| f.strip_suffix("\n\n"))
            .unwrap();
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_fragments_then_stop_then_done() {
        let frames = frames(Script::Items(vec![Ok("Hel".into()), Ok("lo".into())])).await;

        assert_eq!(frames.len(), 4);
        assert_eq!(payload(&frames[0])["choices"][0]["delta"]["content"], "Hel");
        assert_eq!(payload(&frames[1])["choices"][0]["delta"]["content"], "lo");

        let last = payload(&frames[2]);
        assert_eq!(last["choices"][0]["delta"], serde_json::json!({}));
        assert_eq!(last["choices"][0]["finish_reason"], "stop");
        assert_eq!(frames[3], "data: [DONE]\n\n");
    }

    #[tokio::test]
    async fn test_empty_fragments_are_skipped() {
        let frames = frames(Script::Items(vec![
            Ok(String::new()),
            Ok("a".into()),
            Ok(String::new()),
        ]))
        .await;

        assert_eq!(frames.len(), 3);
        assert_eq!(payload(&frames[0])["choices"][0]["delta"]["content"], "a");
    }

    #[tokio::test]
    async fn test_mid_stream_error_ends_without_done() {
        let frames = frames(Script::Items(vec![
            Ok("partial".into()),
            Err(AskError::Failed("quota exceeded".into())),
            Ok("never".into()),
        ]))
        .await;

        assert_eq!(frames.len(), 2);
        assert_eq!(
            payload(&frames[1]),
            serde_json::json!({"error": "quota exceeded"})
        );
        assert!(frames.iter().all(|f| !f.contains("[DONE]")));
    }

    #[tokio::test]
    async fn test_start_failure_is_a_single_error_frame() {
        let frames = frames(Script::RefuseToStart(AskError::Unavailable(
            "no binary".into(),
        )))
        .await;

        assert_eq!(frames.len(), 1);
        assert_eq!(
            payload(&frames[0])["error"],
            "AI capability unavailable: no binary"
        );
    }

    #[tokio::test]
    async fn test_empty_answer_still_terminates() {
        let frames = frames(Script::Items(Vec::new())).await;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], "data: [DONE]\n\n");
    }

    #[test]
    fn test_response_headers() {
        let res = sse_response(
            Arc::new(Script::Items(Vec::new())),
            AskRequest::new("hi"),
            CompletionEnvelope::now("x"),
        );

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(res.headers()[header::CONNECTION], "keep-alive");
    }
}
