use serde::{Deserialize, Serialize};

/// One step of the line-stepping protocol.
///
/// Serialized as a flat JSON object whose `type` field selects the variant,
/// e.g. `{"type":"break","linenumber":3}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Sent once by the controller when the session starts. The socket
    /// transport fills in the address it is listening on.
    ServerInit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        host: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        port: Option<u16>,
    },
    /// The client's answer to `serverinit`.
    ClientInit,
    /// The target is suspended before evaluating `linenumber`.
    Break { linenumber: u32 },
    /// The client allows the target to advance past the current break.
    Continue,
    /// The target program has stopped running.
    Finish,
}

impl Message {
    pub fn server_init() -> Self {
        Message::ServerInit {
            host: None,
            port: None,
        }
    }

    pub fn server_init_at(host: impl Into<String>, port: u16) -> Self {
        Message::ServerInit {
            host: Some(host.into()),
            port: Some(port),
        }
    }

    pub fn break_at(linenumber: u32) -> Self {
        Message::Break { linenumber }
    }

    /// The wire value of the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::ServerInit { .. } => "serverinit",
            Message::ClientInit => "clientinit",
            Message::Break { .. } => "break",
            Message::Continue => "continue",
            Message::Finish => "finish",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_matches_serialized_tag() {
        let messages = [
            Message::server_init(),
            Message::ClientInit,
            Message::break_at(7),
            Message::Continue,
            Message::Finish,
        ];
        for msg in messages {
            let value = serde_json::to_value(&msg).unwrap();
            assert_eq!(value["type"], msg.kind());
        }
    }

    #[test]
    fn stream_server_init_has_no_address_fields() {
        let value = serde_json::to_value(Message::server_init()).unwrap();
        assert_eq!(value, json!({"type": "serverinit"}));
    }

    #[test]
    fn socket_server_init_carries_address() {
        let value = serde_json::to_value(Message::server_init_at("127.0.0.1", 40123)).unwrap();
        assert_eq!(
            value,
            json!({"type": "serverinit", "host": "127.0.0.1", "port": 40123})
        );
    }

    #[test]
    fn break_uses_linenumber_field() {
        let value = serde_json::to_value(Message::break_at(12)).unwrap();
        assert_eq!(value, json!({"type": "break", "linenumber": 12}));
    }
}
