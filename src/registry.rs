//! Wire type name to codec mapping.
//!
//! The registry is built once and never mutated afterwards. Components take it
//! by `Arc` so tests can inject their own; [`MessageRegistry::global`] returns
//! a process-wide instance with the built-in codecs.
//!
//! ```rust
//! use tcnart::messages::{Message, VideoStreamMessage};
//! use tcnart::registry::MessageRegistry;
//!
//! let registry = MessageRegistry::global();
//! let msg = Message::from(VideoStreamMessage::new(1, vec![0xAB]));
//! let bytes = registry.encode(&msg).unwrap();
//! let decoded = registry.decode("tcnart_msgs::msg::VideoStreamMessage", &bytes).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::trace;

use crate::messages::{
    DeviceContextReply, Message, NullRequest, SisJoinMessage, StreamDescriptorMessage,
    VideoStreamMessage, WireMessage,
};
use crate::transport::Sample;
use crate::{Result, TcnError};

pub type DecodeFn = fn(&[u8]) -> Result<Message>;
pub type EncodeFn = fn(&Message) -> Result<Vec<u8>>;

/// Decode/encode function pair for one wire type.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

impl Codec {
    /// JSON codec for a schema type.
    pub fn json<T: WireMessage>() -> Self {
        Self { decode: decode_json::<T>, encode: encode_json::<T> }
    }
}

/// Decode a JSON payload as `T`.
pub fn decode_json<T: WireMessage>(payload: &[u8]) -> Result<Message> {
    serde_json::from_slice::<T>(payload)
        .map(T::into_message)
        .map_err(|e| TcnError::decode_failed(T::TYPE_NAME, e.to_string()))
}

/// Encode a message of kind `T` as JSON.
pub fn encode_json<T: WireMessage>(msg: &Message) -> Result<Vec<u8>> {
    let inner = T::from_message(msg).ok_or_else(|| {
        TcnError::encode_failed(
            T::TYPE_NAME,
            format!("message kind is {}", msg.type_name().unwrap_or("Invalid")),
        )
    })?;
    serde_json::to_vec(inner).map_err(|e| TcnError::encode_failed(T::TYPE_NAME, e.to_string()))
}

/// Immutable mapping from wire type names to codecs.
#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    codecs: HashMap<String, Codec>,
}

impl MessageRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with JSON codecs for every built-in message kind.
    pub fn with_default_codecs() -> Self {
        Self::builder().with_default_codecs().build()
    }

    /// Process-wide registry with the built-in codecs, initialised on first use.
    pub fn global() -> &'static MessageRegistry {
        static GLOBAL: OnceLock<MessageRegistry> = OnceLock::new();
        GLOBAL.get_or_init(MessageRegistry::with_default_codecs)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.codecs.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    /// Decode `payload` with the codec registered for `type_name`.
    pub fn decode(&self, type_name: &str, payload: &[u8]) -> Result<Message> {
        let codec = self
            .codecs
            .get(type_name)
            .ok_or_else(|| TcnError::decode_failed(type_name, "no codec registered"))?;
        trace!(type_name, bytes = payload.len(), "Decoding message");
        (codec.decode)(payload)
    }

    /// Decode a sample, taking the type name from its attachment or `default_type`.
    pub fn decode_sample(&self, sample: &Sample, default_type: &str) -> Result<Message> {
        self.decode(sample.type_name_or(default_type), &sample.payload)
    }

    /// Encode `msg` under its own wire type name.
    pub fn encode(&self, msg: &Message) -> Result<Vec<u8>> {
        let type_name = msg
            .type_name()
            .ok_or_else(|| TcnError::encode_failed("Invalid", "invalid messages cannot be encoded"))?;
        self.encode_as(type_name, msg)
    }

    /// Encode `msg` with the codec registered for `type_name`.
    pub fn encode_as(&self, type_name: &str, msg: &Message) -> Result<Vec<u8>> {
        let codec = self
            .codecs
            .get(type_name)
            .ok_or_else(|| TcnError::encode_failed(type_name, "no codec registered"))?;
        (codec.encode)(msg)
    }
}

/// Collects codecs before freezing them into a [`MessageRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    codecs: HashMap<String, Codec>,
}

impl RegistryBuilder {
    /// Register `codec` for `type_name`, replacing any previous entry.
    pub fn register(mut self, type_name: impl Into<String>, codec: Codec) -> Self {
        self.codecs.insert(type_name.into(), codec);
        self
    }

    /// Register the JSON codec of `T` under its own type name.
    pub fn register_json<T: WireMessage>(self) -> Self {
        self.register(T::TYPE_NAME, Codec::json::<T>())
    }

    pub fn with_default_codecs(self) -> Self {
        self.register_json::<StreamDescriptorMessage>()
            .register_json::<DeviceContextReply>()
            .register_json::<VideoStreamMessage>()
            .register_json::<SisJoinMessage>()
            .register_json::<NullRequest>()
    }

    pub fn build(self) -> MessageRegistry {
        MessageRegistry { codecs: self.codecs }
    }
}
