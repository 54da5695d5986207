//! Node record types
//!
//! This module defines the structured record produced for every descriptor
//! line, along with the scheme and status tags attached to it.

use std::collections::HashMap;

use serde::Serialize;

// ============================================================================
// Scheme and Status Tags
// ============================================================================

/// Proxy protocol scheme identified by the URI prefix of a descriptor line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeScheme {
    Vless,
    Vmess,
    #[serde(rename = "ss")]
    Shadowsocks,
    Trojan,
    Unknown,
}

impl NodeScheme {
    /// Short tag used for grouping and output file names
    pub fn tag(&self) -> &'static str {
        match self {
            NodeScheme::Vless => "vless",
            NodeScheme::Vmess => "vmess",
            NodeScheme::Shadowsocks => "ss",
            NodeScheme::Trojan => "trojan",
            NodeScheme::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NodeScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Whether decoding fully succeeded or fell back to placeholder fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Ok,
    Degraded,
}

// ============================================================================
// Credential
// ============================================================================

/// Scheme-dependent credential extracted from a descriptor line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Credential {
    /// VLESS/VMess UUID
    Uuid(String),
    /// Shadowsocks cipher method and password
    MethodPassword { method: String, password: String },
    /// Trojan plaintext password
    Password(String),
    /// No credential could be extracted
    None,
}

// ============================================================================
// Node Record
// ============================================================================

/// Structured record for one descriptor line.
///
/// Exactly one record is produced per non-blank input line. `raw` always holds
/// the normalized input line verbatim, so a `Degraded` record still carries
/// everything needed to reproduce the original descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub raw: String,
    pub scheme: NodeScheme,
    pub server: String,
    pub port: u16,
    pub credential: Credential,
    pub params: HashMap<String, String>,
    pub label: String,
    pub status: NodeStatus,
}

impl NodeRecord {
    /// Record for a line whose decoder failed; structured fields hold defaults
    pub fn degraded(raw: &str, scheme: NodeScheme, label: &str) -> Self {
        Self {
            raw: raw.to_string(),
            scheme,
            server: String::new(),
            port: 0,
            credential: Credential::None,
            params: HashMap::new(),
            label: label.to_string(),
            status: NodeStatus::Degraded,
        }
    }

    /// Record for a line that matched no known scheme prefix
    pub fn unrecognized(raw: &str) -> Self {
        Self::degraded(raw, NodeScheme::Unknown, "unrecognized format")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_tags() {
        assert_eq!(NodeScheme::Vless.tag(), "vless");
        assert_eq!(NodeScheme::Vmess.tag(), "vmess");
        assert_eq!(NodeScheme::Shadowsocks.tag(), "ss");
        assert_eq!(NodeScheme::Trojan.tag(), "trojan");
        assert_eq!(NodeScheme::Unknown.tag(), "unknown");
    }

    #[test]
    fn test_scheme_display() {
        assert_eq!(format!("{}", NodeScheme::Shadowsocks), "ss");
        assert_eq!(format!("{}", NodeScheme::Vless), "vless");
    }

    #[test]
    fn test_scheme_serializes_as_tag() {
        let json = serde_json::to_string(&NodeScheme::Shadowsocks).unwrap();
        assert_eq!(json, r#""ss""#);
        let json = serde_json::to_string(&NodeScheme::Unknown).unwrap();
        assert_eq!(json, r#""unknown""#);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&NodeStatus::Ok).unwrap(), r#""ok""#);
        assert_eq!(
            serde_json::to_string(&NodeStatus::Degraded).unwrap(),
            r#""degraded""#
        );
    }

    #[test]
    fn test_credential_serialization() {
        let uuid = Credential::Uuid("abc".to_string());
        assert_eq!(serde_json::to_string(&uuid).unwrap(), r#""abc""#);

        let pair = Credential::MethodPassword {
            method: "aes-256-gcm".to_string(),
            password: "pw".to_string(),
        };
        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.contains(r#""method":"aes-256-gcm""#));
        assert!(json.contains(r#""password":"pw""#));

        assert_eq!(serde_json::to_string(&Credential::None).unwrap(), "null");
    }

    #[test]
    fn test_degraded_record_defaults() {
        let record = NodeRecord::degraded("vless://broken", NodeScheme::Vless, "VLESS node");
        assert_eq!(record.raw, "vless://broken");
        assert_eq!(record.scheme, NodeScheme::Vless);
        assert_eq!(record.server, "");
        assert_eq!(record.port, 0);
        assert_eq!(record.credential, Credential::None);
        assert!(record.params.is_empty());
        assert_eq!(record.label, "VLESS node");
        assert_eq!(record.status, NodeStatus::Degraded);
    }

    #[test]
    fn test_unrecognized_record() {
        let record = NodeRecord::unrecognized("garbage-not-a-uri");
        assert_eq!(record.scheme, NodeScheme::Unknown);
        assert_eq!(record.label, "unrecognized format");
        assert_eq!(record.status, NodeStatus::Degraded);
        assert_eq!(record.raw, "garbage-not-a-uri");
    }
}
