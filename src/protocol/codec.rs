use std::io;

use serde_json::Value;

use super::message::Message;
use crate::error::{DebugError, DebugResult};

/// Encode a message as one line of JSON terminated by a single `\n`.
pub fn encode(message: &Message) -> DebugResult<String> {
    let mut line = serde_json::to_string(message)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    line.push('\n');
    Ok(line)
}

/// Decode one received line. Fails with `MalformedMessage` when the line is not
/// a JSON object with a known string `type`.
pub fn decode(line: &str) -> DebugResult<Message> {
    let trimmed = line.trim_end_matches(['\r', '\n']);

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| DebugError::malformed(trimmed, e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| DebugError::malformed(trimmed, "not a JSON object"))?;

    match object.get("type") {
        Some(Value::String(_)) => {}
        Some(_) => return Err(DebugError::malformed(trimmed, "'type' is not a string")),
        None => return Err(DebugError::malformed(trimmed, "missing 'type' field")),
    }

    serde_json::from_value(value).map_err(|e| DebugError::malformed(trimmed, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_malformed(line: &str) {
        match decode(line) {
            Err(DebugError::MalformedMessage { .. }) => {}
            other => panic!("expected MalformedMessage for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn encode_terminates_with_single_newline() {
        let line = encode(&Message::break_at(3)).unwrap();
        assert_eq!(line, "{\"type\":\"break\",\"linenumber\":3}\n");
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn decode_accepts_client_messages() {
        assert_eq!(decode("{\"type\":\"clientinit\"}\n").unwrap(), Message::ClientInit);
        assert_eq!(decode("{\"type\":\"continue\"}").unwrap(), Message::Continue);
    }

    #[test]
    fn decode_ignores_carriage_return() {
        assert_eq!(decode("{\"type\":\"continue\"}\r\n").unwrap(), Message::Continue);
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let msg = decode(r#"{"type":"continue","client":"editor"}"#).unwrap();
        assert_eq!(msg, Message::Continue);
    }

    #[test]
    fn decode_reads_break_line() {
        let msg = decode(r#"{"type":"break","linenumber":42}"#).unwrap();
        assert_eq!(msg, Message::break_at(42));
    }

    #[test]
    fn decode_rejects_invalid_json() {
        assert_malformed("not json at all");
        assert_malformed("");
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert_malformed("[\"continue\"]");
        assert_malformed("\"continue\"");
    }

    #[test]
    fn decode_rejects_missing_or_bad_type() {
        assert_malformed(r#"{"kind":"continue"}"#);
        assert_malformed(r#"{"type":7}"#);
    }

    #[test]
    fn decode_rejects_unknown_type() {
        assert_malformed(r#"{"type":"block","cause":"busy"}"#);
    }

    #[test]
    fn decode_rejects_ill_typed_payload() {
        assert_malformed(r#"{"type":"break","linenumber":"three"}"#);
    }
}
