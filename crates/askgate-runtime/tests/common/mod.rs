//! Shared helpers for askgate-runtime integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use askgate_core::{
    AskError, AskPort, AskRequest, FragmentStream, GatewayConfig, ModelDescriptor, NotifierPort,
    NotifyKind,
};
use askgate_runtime::GatewaySupervisor;
use async_trait::async_trait;

pub const TEST_API_KEY: &str = "lifecycle-key";

/// Echoes the prompt back as the answer.
#[derive(Debug, Default)]
pub struct EchoAsk;

#[async_trait]
impl AskPort for EchoAsk {
    async fn ask_stream(&self, request: &AskRequest) -> Result<FragmentStream, AskError> {
        let answer = format!("echo: {}", request.prompt);
        Ok(Box::pin(futures_util::stream::iter(vec![Ok(answer)])))
    }

    fn models(&self) -> Vec<ModelDescriptor> {
        vec![ModelDescriptor::from_id("echo")]
    }
}

/// Records every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<(NotifyKind, String, String)>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, title, _)| title.clone())
            .collect()
    }

    pub fn failures(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(kind, _, _)| *kind == NotifyKind::Failure)
            .map(|(_, _, message)| message.clone())
            .collect()
    }
}

impl NotifierPort for RecordingNotifier {
    fn notify(&self, kind: NotifyKind, title: &str, message: &str) {
        self.seen
            .lock()
            .unwrap()
            .push((kind, title.to_string(), message.to_string()));
    }
}

/// Config on `port` with short probes so negative checks stay fast.
pub fn test_config(port: u16) -> GatewayConfig {
    let mut config = GatewayConfig::with_defaults(TEST_API_KEY).with_port(port);
    config.probe_timeout = Duration::from_millis(300);
    config
}

pub fn supervisor(port: u16, notifier: Arc<RecordingNotifier>) -> GatewaySupervisor {
    GatewaySupervisor::new(test_config(port), Arc::new(EchoAsk), notifier)
}
