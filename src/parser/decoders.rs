//! Per-scheme descriptor decoders
//!
//! Each decoder converts one descriptor line into a [`NodeRecord`]. Decoders
//! never return errors: a line that cannot be decoded yields a `Degraded`
//! record carrying the original text and a default label, so one bad line can
//! never interrupt batch processing.

mod shadowsocks;
mod trojan;
mod vless;
mod vmess;

pub use shadowsocks::ShadowsocksDecoder;
pub use trojan::TrojanDecoder;
pub use vless::VlessDecoder;
pub use vmess::VmessDecoder;

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use tracing::trace;

use super::record::{NodeRecord, NodeScheme};

// ============================================================================
// Decoder Trait
// ============================================================================

/// Trait for decoding individual descriptor lines
pub trait NodeDecoder: Send + Sync {
    /// Returns the scheme this decoder handles
    fn scheme(&self) -> NodeScheme;

    /// Returns the URI prefix this decoder matches (e.g. `"vless://"`)
    fn prefix(&self) -> &'static str;

    /// Decodes a line into a record; total, never fails
    fn decode(&self, line: &str) -> NodeRecord;
}

// ============================================================================
// Dispatch
// ============================================================================

/// Decoders in fixed priority order; the first matching prefix wins
pub fn decoder_table() -> [&'static dyn NodeDecoder; 4] {
    [
        &VlessDecoder,
        &VmessDecoder,
        &ShadowsocksDecoder,
        &TrojanDecoder,
    ]
}

/// Dispatches one normalized line to the decoder matching its scheme prefix.
///
/// Lines matching no known prefix produce an `Unknown` fallback record.
pub fn decode_line(line: &str) -> NodeRecord {
    for decoder in decoder_table() {
        if line.starts_with(decoder.prefix()) {
            trace!("Dispatching line to {} decoder", decoder.scheme());
            return decoder.decode(line);
        }
    }
    trace!("No decoder matched line, emitting fallback record");
    NodeRecord::unrecognized(line)
}

// ============================================================================
// Shared Splitting Helpers
// ============================================================================

/// Decomposed `<credential>@<host>:<port>[?<query>][#<fragment>]` remainder,
/// shared by the VLESS and Trojan decoders
pub(crate) struct AuthorityParts {
    pub credential: String,
    pub server: String,
    pub port: u16,
    pub params: HashMap<String, String>,
    pub label: Option<String>,
}

/// Splits an authority-style descriptor remainder (scheme prefix already
/// stripped).
///
/// The remainder is first split once on `?`; a fragment is only recognized
/// inside the query part, so a `#` without a preceding `?` stays part of the
/// authority. Missing `@`, missing `:`, or a non-numeric port are errors the
/// caller converts into a degraded record.
pub(crate) fn split_authority_uri(rest: &str) -> Result<AuthorityParts> {
    let (authority, tail) = match rest.split_once('?') {
        Some((a, t)) => (a, Some(t)),
        None => (rest, None),
    };

    let (credential, hostport) = authority
        .split_once('@')
        .ok_or_else(|| anyhow!("Missing '@' separator in authority"))?;

    let (server, port) = split_host_port(hostport)?;

    let (params, label) = match tail {
        Some(t) => match t.split_once('#') {
            Some((query, fragment)) => (parse_query(query), Some(decode_fragment(fragment))),
            None => (parse_query(t), None),
        },
        None => (HashMap::new(), None),
    };

    Ok(AuthorityParts {
        credential: credential.to_string(),
        server,
        port,
        params,
        label,
    })
}

/// Splits `host:port` on the last `:`; the port must parse as an unsigned
/// 16-bit integer
pub(crate) fn split_host_port(hostport: &str) -> Result<(String, u16)> {
    let colon_pos = hostport
        .rfind(':')
        .ok_or_else(|| anyhow!("Invalid host:port format: missing colon"))?;

    let host = hostport[..colon_pos].to_string();
    let port: u16 = hostport[colon_pos + 1..]
        .parse()
        .map_err(|_| anyhow!("Invalid port number: {}", &hostport[colon_pos + 1..]))?;

    Ok((host, port))
}

/// Parses an `&`-delimited `key=value` query string.
///
/// Pairs without `=` are ignored; duplicate keys keep the last value.
pub(crate) fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(key.to_string(), value.to_string());
        }
    }
    params
}

/// Percent-decodes a URI fragment into a display label, keeping the raw text
/// when the encoding is invalid
pub(crate) fn decode_fragment(fragment: &str) -> String {
    urlencoding::decode(fragment)
        .unwrap_or_else(|_| fragment.into())
        .into_owned()
}
