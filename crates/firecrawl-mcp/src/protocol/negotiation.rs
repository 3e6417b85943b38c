//! Per-connection handshake state.

use crate::types::{Implementation, InitializeParams, InitializeResult, MCP_VERSION};

/// What the server knows about the connected client.
#[derive(Debug, Clone, Default)]
pub struct ClientSession {
    pub client: Option<Implementation>,
    /// Version the client asked for; the reply always carries [`MCP_VERSION`].
    pub requested_version: Option<String>,
    pub initialized: bool,
}

impl ClientSession {
    pub fn negotiate(&mut self, params: InitializeParams) -> InitializeResult {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol {}, answering with {MCP_VERSION}",
                params.protocol_version
            );
        }

        tracing::info!(
            "Initialize from {} v{}",
            params.client_info.name,
            params.client_info.version
        );

        self.requested_version = Some(params.protocol_version);
        self.client = Some(params.client_info);
        self.initialized = false;

        InitializeResult::default_result()
    }

    pub fn mark_initialized(&mut self) {
        if self.client.is_none() {
            tracing::warn!("initialized notification before initialize");
        }
        self.initialized = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(version: &str) -> InitializeParams {
        InitializeParams {
            protocol_version: version.to_string(),
            capabilities: serde_json::Value::Null,
            client_info: Implementation {
                name: "claude".to_string(),
                version: "1.0".to_string(),
            },
        }
    }

    #[test]
    fn test_reply_uses_server_version() {
        let mut session = ClientSession::default();
        let result = session.negotiate(params("2099-01-01"));
        assert_eq!(result.protocol_version, MCP_VERSION);
        assert_eq!(session.requested_version.as_deref(), Some("2099-01-01"));
        assert!(!session.initialized);

        session.mark_initialized();
        assert!(session.initialized);
    }
}
