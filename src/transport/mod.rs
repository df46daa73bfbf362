//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod messages;

pub use messages::{
    SEND_PATH, SEND_TEMPLATE_PATH, TransportError, decode_error_json_response,
    decode_send_json_response, encode_send_json, encode_send_template_json,
};
