//! Capture dump reader
//!
//! A dump holds one captured UDP datagram per line:
//!
//! ```text
//! # comment
//! 192.168.1.10:53211 -> 5.188.125.14:5056 | 00 01 00 01 00 00 00 00 ...
//! 0001000100000000...
//! ```
//!
//! The endpoint prefix is optional. Hex digits may be separated by spaces.

/// Malformed dump line
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DumpError {
    #[error("Invalid hex digit in '{0}'")]
    InvalidHex(String),

    #[error("Odd number of hex digits: {0}")]
    OddLength(usize),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// One captured datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRecord {
    /// Source and destination port, when the line names its endpoints
    pub ports: Option<(u16, u16)>,
    pub payload: Vec<u8>,
}

impl DumpRecord {
    /// Apply the capture filter: keep datagrams from or to `port`
    ///
    /// Lines without endpoints are assumed to be pre-filtered.
    pub fn matches_port(&self, port: u16) -> bool {
        self.ports
            .map_or(true, |(src, dst)| src == port || dst == port)
    }
}

/// Parse one dump line, returning `None` for blank lines and comments
pub fn parse_line(line: &str) -> Result<Option<DumpRecord>, DumpError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (ports, hex) = match line.split_once('|') {
        Some((endpoints, hex)) => (Some(parse_endpoints(endpoints)?), hex),
        None => (None, line),
    };

    Ok(Some(DumpRecord {
        ports,
        payload: decode_hex(hex)?,
    }))
}

/// `src:port -> dst:port`
fn parse_endpoints(text: &str) -> Result<(u16, u16), DumpError> {
    let (src, dst) = text
        .split_once("->")
        .ok_or_else(|| DumpError::InvalidEndpoint(text.trim().to_string()))?;
    Ok((parse_port(src)?, parse_port(dst)?))
}

fn parse_port(endpoint: &str) -> Result<u16, DumpError> {
    let endpoint = endpoint.trim();
    endpoint
        .rsplit_once(':')
        .and_then(|(_, port)| port.parse().ok())
        .ok_or_else(|| DumpError::InvalidEndpoint(endpoint.to_string()))
}

fn decode_hex(text: &str) -> Result<Vec<u8>, DumpError> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(DumpError::OddLength(digits.len()));
    }

    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| DumpError::InvalidHex(String::from_utf8_lossy(pair).into_owned()))
        })
        .collect()
}
