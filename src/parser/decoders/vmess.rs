//! VMess descriptor decoder
//!
//! Format: `vmess://<base64-json>`. The payload is Base64-encoded JSON,
//! frequently with its trailing padding stripped:
//! `vmess://BASE64({ "add": "host", "port": 443, "id": "uuid", "ps": "name", ... })`

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::parser::base64::decode_padded;
use crate::parser::record::{Credential, NodeRecord, NodeScheme, NodeStatus};

use super::NodeDecoder;

const DEFAULT_LABEL: &str = "VMess node";

/// Decoder for VMess (vmess://) descriptor lines
pub struct VmessDecoder;

/// Recognized keys of the VMess JSON payload; everything absent defaults to
/// empty-string/zero
#[derive(Deserialize, Debug)]
struct VmessPayload {
    /// Server address
    #[serde(default)]
    add: String,
    /// Server port (can be string or number)
    #[serde(default, deserialize_with = "deserialize_port")]
    port: u16,
    /// UUID
    #[serde(default)]
    id: String,
    /// Remark/name
    #[serde(default)]
    ps: String,
}

impl NodeDecoder for VmessDecoder {
    fn scheme(&self) -> NodeScheme {
        NodeScheme::Vmess
    }

    fn prefix(&self) -> &'static str {
        "vmess://"
    }

    fn decode(&self, line: &str) -> NodeRecord {
        match try_decode(line) {
            Ok(record) => record,
            Err(e) => {
                debug!("Failed to decode VMess descriptor: {:#}", e);
                NodeRecord::degraded(line, NodeScheme::Vmess, DEFAULT_LABEL)
            }
        }
    }
}

fn try_decode(line: &str) -> Result<NodeRecord> {
    trace!("Decoding VMess descriptor");
    let encoded = line
        .strip_prefix("vmess://")
        .context("Missing vmess:// prefix")?;

    let decoded = decode_padded(encoded)
        .and_then(|b| String::from_utf8(b).context("Invalid UTF-8"))
        .context("Failed to decode VMess payload")?;

    trace!("Decoded VMess JSON: {}", decoded);

    let payload: VmessPayload =
        serde_json::from_str(&decoded).context("Failed to parse VMess JSON")?;

    let label = if payload.ps.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        payload.ps
    };

    Ok(NodeRecord {
        raw: line.to_string(),
        scheme: NodeScheme::Vmess,
        server: payload.add,
        port: payload.port,
        credential: Credential::Uuid(payload.id),
        params: Default::default(),
        label,
        status: NodeStatus::Ok,
    })
}

/// Custom deserializer for port (handles string, number, or null)
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        String(String),
    }

    match Option::<PortValue>::deserialize(deserializer)? {
        Some(PortValue::Number(n)) => Ok(n),
        Some(PortValue::String(s)) if s.is_empty() => Ok(0),
        Some(PortValue::String(s)) => s.parse().map_err(serde::de::Error::custom),
        None => Ok(0),
    }
}
