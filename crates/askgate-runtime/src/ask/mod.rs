//! Concrete [`AskPort`](askgate_core::AskPort) implementations.

mod command;

pub use command::CommandAsk;
