//! Shadowsocks descriptor decoder
//!
//! Format: `ss://<userinfo-or-legacy>[#<fragment>]`.
//! The SIP002 form carries `BASE64(method:password)@host:port`; the legacy
//! form is a single opaque payload. Field-level failures fill placeholders
//! instead of rejecting the line, so every `ss://` line yields a record.

use tracing::trace;

use crate::parser::base64::decode_padded;
use crate::parser::record::{Credential, NodeRecord, NodeScheme, NodeStatus};

use super::{NodeDecoder, decode_fragment, split_host_port};

const DEFAULT_LABEL: &str = "SS node";
const PLACEHOLDER: &str = "unknown";

/// Decoder for Shadowsocks (ss://) descriptor lines
pub struct ShadowsocksDecoder;

impl NodeDecoder for ShadowsocksDecoder {
    fn scheme(&self) -> NodeScheme {
        NodeScheme::Shadowsocks
    }

    fn prefix(&self) -> &'static str {
        "ss://"
    }

    fn decode(&self, line: &str) -> NodeRecord {
        trace!("Decoding Shadowsocks descriptor");
        let Some(rest) = line.strip_prefix("ss://") else {
            return NodeRecord::degraded(line, NodeScheme::Shadowsocks, DEFAULT_LABEL);
        };

        // Fragment is split on the last '#'
        let (main_part, label) = match rest.rfind('#') {
            Some(pos) => (&rest[..pos], decode_fragment(&rest[pos + 1..])),
            None => (rest, DEFAULT_LABEL.to_string()),
        };

        let mut server = PLACEHOLDER.to_string();
        let mut port = 0u16;
        let mut method = PLACEHOLDER.to_string();
        let mut password = PLACEHOLDER.to_string();
        let mut degraded = true;

        if let Some((userinfo, hostport)) = main_part.split_once('@') {
            degraded = false;

            match decode_userinfo(userinfo) {
                Some((m, p)) => {
                    method = m;
                    password = p;
                }
                None => degraded = true,
            }

            match split_host_port(hostport) {
                Ok((host, p)) => {
                    server = host;
                    port = p;
                }
                Err(_) => degraded = true,
            }
        }
        // Legacy/opaque form without '@' keeps all placeholders

        NodeRecord {
            raw: line.to_string(),
            scheme: NodeScheme::Shadowsocks,
            server,
            port,
            credential: Credential::MethodPassword { method, password },
            params: Default::default(),
            label,
            status: if degraded {
                NodeStatus::Degraded
            } else {
                NodeStatus::Ok
            },
        }
    }
}

/// Decodes `BASE64(method:password)` userinfo, split on the first `:`
fn decode_userinfo(userinfo: &str) -> Option<(String, String)> {
    let decoded = decode_padded(userinfo).ok()?;
    let decoded_str = String::from_utf8(decoded).ok()?;
    let (method, password) = decoded_str.split_once(':')?;
    Some((method.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    use super::*;

    #[test]
    fn test_ss_sip002_descriptor() {
        let line = "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpwNzhuYUNmMkVmT2xSU0xUWDB3RlZ4@host.example:443#Label";
        let record = ShadowsocksDecoder.decode(line);

        assert_eq!(record.status, NodeStatus::Ok);
        assert_eq!(record.server, "host.example");
        assert_eq!(record.port, 443);
        assert_eq!(
            record.credential,
            Credential::MethodPassword {
                method: "chacha20-ietf-poly1305".to_string(),
                password: "p78naCf2EfOlRSLTX0wFVx".to_string(),
            }
        );
        assert_eq!(record.label, "Label");
    }

    #[test]
    fn test_ss_unpadded_userinfo() {
        let encoded = STANDARD.encode("aes-256-gcm:secret");
        let line = format!("ss://{}@h.example:8388#x", encoded.trim_end_matches('='));
        let record = ShadowsocksDecoder.decode(&line);
        assert_eq!(record.status, NodeStatus::Ok);
        assert_eq!(
            record.credential,
            Credential::MethodPassword {
                method: "aes-256-gcm".to_string(),
                password: "secret".to_string(),
            }
        );
    }

    #[test]
    fn test_ss_password_containing_colon() {
        // Only the first ':' separates method from password
        let encoded = STANDARD.encode("aes-256-gcm:pass:word");
        let line = format!("ss://{}@h.example:8388", encoded);
        let record = ShadowsocksDecoder.decode(&line);
        assert_eq!(
            record.credential,
            Credential::MethodPassword {
                method: "aes-256-gcm".to_string(),
                password: "pass:word".to_string(),
            }
        );
    }

    #[test]
    fn test_ss_no_fragment_uses_default_label() {
        let encoded = STANDARD.encode("aes-256-gcm:pw");
        let record = ShadowsocksDecoder.decode(&format!("ss://{}@h.example:443", encoded));
        assert_eq!(record.label, "SS node");
    }

    #[test]
    fn test_ss_bad_userinfo_keeps_record() {
        let line = "ss://!!!not-base64!!!@h.example:443#tag";
        let record = ShadowsocksDecoder.decode(line);
        // Credential degraded, host/port still extracted
        assert_eq!(record.status, NodeStatus::Degraded);
        assert_eq!(record.server, "h.example");
        assert_eq!(record.port, 443);
        assert_eq!(
            record.credential,
            Credential::MethodPassword {
                method: "unknown".to_string(),
                password: "unknown".to_string(),
            }
        );
        assert_eq!(record.label, "tag");
    }

    #[test]
    fn test_ss_userinfo_without_colon_degrades() {
        let encoded = STANDARD.encode("no-separator-here");
        let record = ShadowsocksDecoder.decode(&format!("ss://{}@h.example:443", encoded));
        assert_eq!(record.status, NodeStatus::Degraded);
        assert_eq!(
            record.credential,
            Credential::MethodPassword {
                method: "unknown".to_string(),
                password: "unknown".to_string(),
            }
        );
    }

    #[test]
    fn test_ss_bad_port_degrades_but_keeps_credential() {
        let encoded = STANDARD.encode("aes-256-gcm:pw");
        let record = ShadowsocksDecoder.decode(&format!("ss://{}@h.example:zzz", encoded));
        assert_eq!(record.status, NodeStatus::Degraded);
        assert_eq!(record.server, "unknown");
        assert_eq!(record.port, 0);
        assert_eq!(
            record.credential,
            Credential::MethodPassword {
                method: "aes-256-gcm".to_string(),
                password: "pw".to_string(),
            }
        );
    }

    #[test]
    fn test_ss_legacy_opaque_form() {
        let line = "ss://b3BhcXVlLWxlZ2FjeS1wYXlsb2Fk#legacy";
        let record = ShadowsocksDecoder.decode(line);
        assert_eq!(record.status, NodeStatus::Degraded);
        assert_eq!(record.server, "unknown");
        assert_eq!(record.port, 0);
        assert_eq!(
            record.credential,
            Credential::MethodPassword {
                method: "unknown".to_string(),
                password: "unknown".to_string(),
            }
        );
        assert_eq!(record.label, "legacy");
        assert_eq!(record.raw, line);
    }

    #[test]
    fn test_ss_truncated_prefix_degrades() {
        let record = ShadowsocksDecoder.decode("ss:/");
        assert_eq!(record.status, NodeStatus::Degraded);
        assert_eq!(record.raw, "ss:/");
        assert_eq!(record.label, "SS node");
    }

    #[test]
    fn test_ss_fragment_split_on_last_hash() {
        let encoded = STANDARD.encode("aes-256-gcm:pw");
        let record = ShadowsocksDecoder.decode(&format!("ss://{}@h.example:443#a#b", encoded));
        assert_eq!(record.label, "b");
    }
}
