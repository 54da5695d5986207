//! Trojan descriptor decoder
//!
//! Format: `trojan://<password>@<host>:<port>[?<query>][#<fragment>]`.
//! Structurally identical to VLESS, but the credential before `@` is a
//! plaintext password that is never Base64- or percent-decoded.

use anyhow::{Result, anyhow};
use tracing::{debug, trace};

use crate::parser::record::{Credential, NodeRecord, NodeScheme, NodeStatus};

use super::{NodeDecoder, split_authority_uri};

const DEFAULT_LABEL: &str = "Trojan node";

/// Decoder for Trojan (trojan://) descriptor lines
pub struct TrojanDecoder;

impl NodeDecoder for TrojanDecoder {
    fn scheme(&self) -> NodeScheme {
        NodeScheme::Trojan
    }

    fn prefix(&self) -> &'static str {
        "trojan://"
    }

    fn decode(&self, line: &str) -> NodeRecord {
        match try_decode(line) {
            Ok(record) => record,
            Err(e) => {
                debug!("Failed to decode Trojan descriptor: {:#}", e);
                NodeRecord::degraded(line, NodeScheme::Trojan, DEFAULT_LABEL)
            }
        }
    }
}

fn try_decode(line: &str) -> Result<NodeRecord> {
    trace!("Decoding Trojan descriptor");
    let rest = line
        .strip_prefix("trojan://")
        .ok_or_else(|| anyhow!("Missing trojan:// prefix"))?;
    let parts = split_authority_uri(rest)?;

    Ok(NodeRecord {
        raw: line.to_string(),
        scheme: NodeScheme::Trojan,
        server: parts.server,
        port: parts.port,
        credential: Credential::Password(parts.credential),
        params: parts.params,
        label: parts.label.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        status: NodeStatus::Ok,
    })
}
