//! AI capability backed by an external command.
//!
//! One child process per request. The prompt goes into a `{prompt}`
//! argument, or onto stdin when no argument carries the placeholder.
//! Stdout is streamed back as answer fragments.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use askgate_core::{AskError, AskPort, AskRequest, DEFAULT_MODEL, FragmentStream, ModelDescriptor};

const PROMPT_PLACEHOLDER: &str = "{prompt}";
const MODEL_PLACEHOLDER: &str = "{model}";

/// Stdout read size.
const READ_CHUNK: usize = 4096;

/// Lines of stderr kept for the failure message.
const STDERR_TAIL_LINES: usize = 10;

/// [`AskPort`] that runs `program args...` for every request.
#[derive(Debug, Clone)]
pub struct CommandAsk {
    program: String,
    args: Vec<String>,
    models: Vec<ModelDescriptor>,
}

impl CommandAsk {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            models: Vec::new(),
        }
    }

    /// Build from a whitespace-separated command line.
    pub fn from_command_line(line: &str) -> Result<Self, AskError> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| AskError::Unavailable("no ask command configured".to_string()))?;
        Ok(Self::new(program, words.collect()))
    }

    /// Advertise these models instead of the single default one.
    #[must_use]
    pub fn with_models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = models;
        self
    }

    fn prompt_on_stdin(&self) -> bool {
        !self.args.iter().any(|a| a.contains(PROMPT_PLACEHOLDER))
    }

    fn render_args(&self, request: &AskRequest) -> Vec<String> {
        let model = request.model.as_deref().unwrap_or(DEFAULT_MODEL);
        self.args
            .iter()
            .map(|arg| substitute(arg, model, &request.prompt))
            .collect()
    }

    fn spawn(&self, request: &AskRequest) -> Result<Child, AskError> {
        let stdin = if self.prompt_on_stdin() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        Command::new(&self.program)
            .args(self.render_args(request))
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AskError::Unavailable(format!("failed to start {}: {e}", self.program)))
    }
}

/// Fill `{model}` and `{prompt}` in one pass over the template, so text
/// inserted for one placeholder is never scanned for the other.
fn substitute(template: &str, model: &str, prompt: &str) -> String {
    let mut out = String::with_capacity(template.len() + prompt.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(PROMPT_PLACEHOLDER) {
            out.push_str(prompt);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(MODEL_PLACEHOLDER) {
            out.push_str(model);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

#[async_trait]
impl AskPort for CommandAsk {
    async fn ask_stream(&self, request: &AskRequest) -> Result<FragmentStream, AskError> {
        let mut child = self.spawn(request)?;
        debug!(program = %self.program, pid = ?child.id(), "Ask command started");

        if let Some(mut stdin) = child.stdin.take() {
            let prompt = request.prompt.clone();
            // Written from a task so a large prompt cannot deadlock against
            // a full stdout pipe.
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    debug!("Failed to write prompt to ask command: {e}");
                }
            });
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AskError::Unavailable("ask command has no stdout".to_string()))?;

        let stderr = child.stderr.take().map(|mut pipe| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf).await;
                buf
            })
        });

        Ok(Box::pin(output_stream(OutputState {
            child,
            stdout,
            stderr,
            pending: Vec::new(),
            phase: Phase::Reading,
        })))
    }

    fn models(&self) -> Vec<ModelDescriptor> {
        if self.models.is_empty() {
            vec![ModelDescriptor::from_id(DEFAULT_MODEL)]
        } else {
            self.models.clone()
        }
    }
}

enum Phase {
    Reading,
    /// Stdout closed; exit status is next.
    Exited,
    Done,
}

/// State threaded through the `unfold` stream. Owns the child, so dropping
/// the stream kills the process.
struct OutputState {
    child: Child,
    stdout: ChildStdout,
    stderr: Option<JoinHandle<Vec<u8>>>,
    /// Bytes of an incomplete UTF-8 sequence carried to the next read.
    pending: Vec<u8>,
    phase: Phase,
}

fn output_stream(
    state: OutputState,
) -> impl futures_util::Stream<Item = Result<String, AskError>> + Send + 'static {
    futures_util::stream::unfold(state, |mut st| async move {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match st.phase {
                Phase::Done => return None,
                Phase::Reading => match st.stdout.read(&mut chunk).await {
                    Ok(0) => {
                        st.phase = Phase::Exited;
                        if !st.pending.is_empty() {
                            let tail = String::from_utf8_lossy(&st.pending).into_owned();
                            st.pending.clear();
                            return Some((Ok(tail), st));
                        }
                    }
                    Ok(n) => {
                        st.pending.extend_from_slice(&chunk[..n]);
                        let text = take_utf8(&mut st.pending);
                        if !text.is_empty() {
                            return Some((Ok(text), st));
                        }
                    }
                    Err(e) => {
                        st.phase = Phase::Done;
                        return Some((Err(AskError::Failed(e.to_string())), st));
                    }
                },
                Phase::Exited => {
                    st.phase = Phase::Done;
                    let status = match st.child.wait().await {
                        Ok(status) => status,
                        Err(e) => return Some((Err(AskError::Failed(e.to_string())), st)),
                    };
                    if status.success() {
                        return None;
                    }
                    let stderr = match st.stderr.take() {
                        Some(task) => task.await.unwrap_or_default(),
                        None => Vec::new(),
                    };
                    let message = failure_message(status, &stderr);
                    warn!("Ask command failed: {message}");
                    return Some((Err(AskError::Failed(message)), st));
                }
            }
        }
    })
}

/// Decode as much of `pending` as is complete.
///
/// Invalid bytes become U+FFFD. Only an incomplete multi-byte sequence at
/// the very end stays in `pending` for the next read.
fn take_utf8(pending: &mut Vec<u8>) -> String {
    let mut text = String::with_capacity(pending.len());
    let mut rest: &[u8] = pending;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                rest = &[];
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                text.push_str(&String::from_utf8_lossy(valid));
                match e.error_len() {
                    Some(len) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[len..];
                    }
                    None => {
                        rest = after;
                        break;
                    }
                }
            }
        }
    }

    let carry = rest.to_vec();
    *pending = carry;
    text
}

/// Trimmed stderr tail, or the exit status when stderr was empty.
fn failure_message(status: ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");

    if tail.is_empty() {
        format!("ask command exited with {status}")
    } else {
        tail
    }
}
