//! Message schemas carried over the bus.
//!
//! Every payload is identified on the wire by a type name (for example
//! `tcnart_msgs::msg::VideoStreamMessage`) carried in the sample attachment.
//! [`Message`] is the closed set of kinds this crate understands; anything that
//! fails to decode becomes [`Message::Invalid`].

mod device;
mod primitives;
mod sis;
mod stream;

pub use device::{CameraSensorMessage, DeviceContextReply, NullRequest};
pub use primitives::{CameraModel, Quaternion, RigidTransform, Vector3};
pub use sis::{
    CoordinateAxis, CoordinateSystem, SisComponentMessage, SisComponentRef, SisJoinMessage,
    SisRelationMessage, SisRelationRef, SisScope, SisTransformation,
};
pub use stream::{BufferInfo, StreamDescriptorMessage, VideoStreamMessage};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub const STREAM_DESCRIPTOR_TYPE: &str = "tcnart_msgs::msg::StreamDescriptorMessage";
pub const VIDEO_STREAM_TYPE: &str = "tcnart_msgs::msg::VideoStreamMessage";
pub const SIS_JOIN_TYPE: &str = "tcnart_msgs::msg::SISJoinMessage";
pub const DEVICE_CONTEXT_REPLY_TYPE: &str = "pcpd_msgs::rpc::DeviceContextReply";
pub const NULL_REQUEST_TYPE: &str = "tcnart_msgs::rpc::NullRequest";

/// A decoded bus message.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Message {
    StreamDescriptor(StreamDescriptorMessage),
    DeviceContextReply(DeviceContextReply),
    VideoStream(VideoStreamMessage),
    SisJoin(SisJoinMessage),
    NullRequest(NullRequest),
    /// Undecodable payload, also used as the end-of-stream marker.
    #[default]
    Invalid,
}

impl Message {
    /// Capture timestamp, for kinds that carry one.
    pub fn timestamp(&self) -> Option<u64> {
        match self {
            Message::VideoStream(msg) => Some(msg.timestamp),
            _ => None,
        }
    }

    /// Wire type name of this kind. `Invalid` has none.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Message::StreamDescriptor(_) => Some(StreamDescriptorMessage::TYPE_NAME),
            Message::DeviceContextReply(_) => Some(DeviceContextReply::TYPE_NAME),
            Message::VideoStream(_) => Some(VideoStreamMessage::TYPE_NAME),
            Message::SisJoin(_) => Some(SisJoinMessage::TYPE_NAME),
            Message::NullRequest(_) => Some(NullRequest::TYPE_NAME),
            Message::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Message::Invalid)
    }
}

/// A schema type that can travel on the bus as one [`Message`] kind.
pub trait WireMessage: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Registered wire type name.
    const TYPE_NAME: &'static str;

    fn into_message(self) -> Message;

    /// Borrow `Self` out of a message of the matching kind.
    fn from_message(msg: &Message) -> Option<&Self>;
}

macro_rules! wire_message {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl WireMessage for $ty {
            const TYPE_NAME: &'static str = $name;

            fn into_message(self) -> Message {
                Message::$variant(self)
            }

            fn from_message(msg: &Message) -> Option<&Self> {
                match msg {
                    Message::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Message {
            fn from(msg: $ty) -> Self {
                Message::$variant(msg)
            }
        }
    };
}

wire_message!(StreamDescriptorMessage, StreamDescriptor, STREAM_DESCRIPTOR_TYPE);
wire_message!(DeviceContextReply, DeviceContextReply, DEVICE_CONTEXT_REPLY_TYPE);
wire_message!(VideoStreamMessage, VideoStream, VIDEO_STREAM_TYPE);
wire_message!(SisJoinMessage, SisJoin, SIS_JOIN_TYPE);
wire_message!(NullRequest, NullRequest, NULL_REQUEST_TYPE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_video_frames_carry_timestamps() {
        assert_eq!(Message::from(VideoStreamMessage::new(42, vec![])).timestamp(), Some(42));
        assert_eq!(Message::from(StreamDescriptorMessage::default()).timestamp(), None);
        assert_eq!(Message::Invalid.timestamp(), None);
    }

    #[test]
    fn type_names_match_wire_constants() {
        assert_eq!(Message::from(SisJoinMessage::default()).type_name(), Some(SIS_JOIN_TYPE));
        assert_eq!(
            Message::from(DeviceContextReply::default()).type_name(),
            Some("pcpd_msgs::rpc::DeviceContextReply")
        );
        assert_eq!(Message::Invalid.type_name(), None);
        assert!(Message::default().is_invalid());
    }

    #[test]
    fn from_message_only_borrows_matching_kind() {
        let msg = Message::from(VideoStreamMessage::new(7, vec![1, 2]));
        assert!(VideoStreamMessage::from_message(&msg).is_some());
        assert!(StreamDescriptorMessage::from_message(&msg).is_none());
    }
}
