//! Minimal HTTP request decoding
//!
//! Turns the bytes of a single read into a method, a path and, for
//! requests with a body, the decoded `application/x-www-form-urlencoded`
//! fields. Nothing here touches a socket.

use std::collections::HashMap;
use std::fmt;

/// Request method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "POST" => Self::Post,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
            Self::Other(token) => f.write_str(token),
        }
    }
}

/// Decoded form fields. Later duplicates overwrite earlier ones.
pub type FormData = HashMap<String, String>;

/// A decoded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: Method,
    pub path: String,
    /// Form fields from the body; `None` when there is no blank line
    /// separating headers from a body, or the method is not POST
    pub form: Option<FormData>,
}

impl ParsedRequest {
    /// Value of a form field, if the request carried one
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form.as_ref()?.get(name).map(String::as_str)
    }

    /// Value of a form field, empty when absent
    pub fn field_or_empty(&self, name: &str) -> String {
        self.field(name).unwrap_or_default().to_string()
    }
}

const HEADER_END: &str = "\r\n\r\n";

/// Decode a raw request buffer
///
/// The buffer is treated as the whole request. Anything cut off by the
/// read buffer is simply missing from the result.
pub fn parse_request(raw: &[u8]) -> ParsedRequest {
    let text = String::from_utf8_lossy(raw);

    let request_line = text.split('\n').next().unwrap_or_default();
    let request_line = request_line.trim_end_matches('\r');

    let (method_token, rest) = request_line
        .split_once(' ')
        .unwrap_or((request_line, ""));
    let path = rest.split(' ').next().unwrap_or_default();

    let method = Method::from_token(method_token);

    let form = match method {
        Method::Post => text
            .find(HEADER_END)
            .map(|pos| parse_form(&text[pos + HEADER_END.len()..])),
        _ => None,
    };

    ParsedRequest {
        method,
        path: path.to_string(),
        form,
    }
}

/// Decode an `application/x-www-form-urlencoded` body
///
/// Pairs without `=` are dropped. Only the first `=` splits key from value.
pub fn parse_form(body: &str) -> FormData {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (url_decode(key), url_decode(value)))
        .collect()
}

/// Percent-decode a form component, turning `+` into a space
///
/// A `%` not followed by two hex digits is kept literally. Decoded bytes
/// that are not valid UTF-8 are replaced with U+FFFD.
pub fn url_decode(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match hex_pair(bytes[i + 1], bytes[i + 2]) {
                    Some(byte) => {
                        decoded.push(byte);
                        i += 3;
                    }
                    None => {
                        decoded.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            other => {
                decoded.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_pair(high: u8, low: u8) -> Option<u8> {
    let high = (high as char).to_digit(16)?;
    let low = (low as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}
