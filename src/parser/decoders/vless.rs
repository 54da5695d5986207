//! VLESS descriptor decoder
//!
//! Format: `vless://<uuid>@<host>:<port>[?<query>][#<fragment>]`

use anyhow::{Result, anyhow};
use tracing::{debug, trace};

use crate::parser::record::{Credential, NodeRecord, NodeScheme, NodeStatus};

use super::{NodeDecoder, split_authority_uri};

const DEFAULT_LABEL: &str = "VLESS node";

/// Decoder for VLESS (vless://) descriptor lines
pub struct VlessDecoder;

impl NodeDecoder for VlessDecoder {
    fn scheme(&self) -> NodeScheme {
        NodeScheme::Vless
    }

    fn prefix(&self) -> &'static str {
        "vless://"
    }

    fn decode(&self, line: &str) -> NodeRecord {
        match try_decode(line) {
            Ok(record) => record,
            Err(e) => {
                debug!("Failed to decode VLESS descriptor: {:#}", e);
                NodeRecord::degraded(line, NodeScheme::Vless, DEFAULT_LABEL)
            }
        }
    }
}

fn try_decode(line: &str) -> Result<NodeRecord> {
    trace!("Decoding VLESS descriptor");
    let rest = line
        .strip_prefix("vless://")
        .ok_or_else(|| anyhow!("Missing vless:// prefix"))?;
    let parts = split_authority_uri(rest)?;

    Ok(NodeRecord {
        raw: line.to_string(),
        scheme: NodeScheme::Vless,
        server: parts.server,
        port: parts.port,
        credential: Credential::Uuid(parts.credential),
        params: parts.params,
        label: parts.label.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        status: NodeStatus::Ok,
    })
}
