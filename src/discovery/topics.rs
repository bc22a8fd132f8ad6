//! Topic naming convention shared with the sensor services.

/// Join `topic` under `prefix`.
pub fn qualified(prefix: &str, topic: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), topic.trim_start_matches('/'))
}

/// Wildcard RPC topic answered by every sensor's `describe` queryable.
pub fn describe_topic(prefix: &str) -> String {
    qualified(prefix, "k4a_capture_multi/rpc/sensor/*/describe")
}

/// Wildcard topic of SIS join announcements from every client.
pub fn sis_join_topic(prefix: &str) -> String {
    qualified(prefix, "*/sis/join")
}

/// Descriptor topic of a sensor's color stream, relative to the prefix.
pub fn color_topic(sensor: &str) -> String {
    format!("{sensor}/cfg/dsc/color_image_bitstream")
}

/// Descriptor topic of a sensor's depth stream, relative to the prefix.
pub fn depth_topic(sensor: &str) -> String {
    format!("{sensor}/cfg/dsc/depth_image_bitstream")
}

pub fn color_stream_name(sensor: &str) -> String {
    format!("{sensor}_color")
}

pub fn depth_stream_name(sensor: &str) -> String {
    format!("{sensor}_depth")
}
