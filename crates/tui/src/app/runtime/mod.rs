mod client;
mod decoder;

pub(crate) use client::{send_user_message, spawn_claude, RuntimeMessage};
pub(crate) use decoder::{ProtocolEvent, StreamDecoder};
