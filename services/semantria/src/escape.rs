// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Percent-escaping rules shared by request signing and body encoding.
//!
//! Two tables are in play:
//!
//! - [`URI_COMPONENT`] leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` alone. The signature
//!   is computed over urls escaped with this table.
//! - [`UTF8_ESCAPE`] leaves `A-Z a-z 0-9 * + . / _ -` alone. It is layered under the
//!   former when request and response bodies are moved to and from byte-safe text.
//!
//! [`URI_UNSAFE`] only covers what an http uri cannot carry at all and is used to
//! turn an already assembled url into a request target.
//!
//! Every escape is a per-byte `%XX` of the UTF-8 encoding with uppercase hex.

use percent_encoding::{
    percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC,
};
use semsign_core::{Error, Result};

/// Characters escaped by [`encode_uri_component`].
pub const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters escaped by [`escape_utf8`].
pub const UTF8_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'+')
    .remove(b'.')
    .remove(b'/')
    .remove(b'_')
    .remove(b'-');

/// Characters escaped by [`escape_uri`].
pub const URI_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Escape characters that cannot appear in a request target, keeping `%` escapes
/// and url delimiters as they are.
pub fn escape_uri(s: &str) -> String {
    utf8_percent_encode(s, URI_UNSAFE).to_string()
}

/// Escape every character outside the uri component set.
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Escape every character outside `A-Z a-z 0-9 * + . / _ -`.
pub fn escape_utf8(s: &str) -> String {
    utf8_percent_encode(s, UTF8_ESCAPE).to_string()
}

/// Decode escapes that spell out a one, two or three byte UTF-8 character.
///
/// Anything else, including four byte sequences, stray `%` and malformed
/// continuation bytes, is left in place untouched.
pub fn unescape_utf8(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some((c, len)) = decode_escaped_char(&bytes[i..]) {
                out.push_str(&s[last..i]);
                out.push(c);
                i += len;
                last = i;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&s[last..]);
    out
}

/// Encode text for a request body.
///
/// Equivalent to `unescape_utf8(encode_uri_component(s))`: characters outside
/// the basic multilingual plane stay percent-escaped, everything else comes
/// back as itself.
pub fn encode_utf8(s: &str) -> String {
    unescape_utf8(&encode_uri_component(s))
}

/// Decode text from a response body.
pub fn decode_utf8(s: &str) -> Result<String> {
    percent_decode_str(&escape_utf8(s))
        .decode_utf8()
        .map(|v| v.into_owned())
        .map_err(|e| Error::unexpected("response body is not valid UTF-8").with_source(e))
}

fn decode_escaped_char(b: &[u8]) -> Option<(char, usize)> {
    let first = escaped_byte(b, 0)?;
    let buf: Vec<u8> = match first {
        0x00..=0x7F => return Some((first as char, 3)),
        0xC2..=0xDF => vec![first, continuation(b, 3, 0x80, 0xBF)?],
        0xE0..=0xEF => {
            let (lo, hi) = match first {
                0xE0 => (0xA0, 0xBF),
                0xED => (0x80, 0x9F),
                _ => (0x80, 0xBF),
            };
            vec![
                first,
                continuation(b, 3, lo, hi)?,
                continuation(b, 6, 0x80, 0xBF)?,
            ]
        }
        _ => return None,
    };

    let c = std::str::from_utf8(&buf).ok()?.chars().next()?;
    Some((c, buf.len() * 3))
}

fn continuation(b: &[u8], at: usize, lo: u8, hi: u8) -> Option<u8> {
    escaped_byte(b, at).filter(|v| (lo..=hi).contains(v))
}

fn escaped_byte(b: &[u8], at: usize) -> Option<u8> {
    if *b.get(at)? != b'%' {
        return None;
    }
    let hi = (*b.get(at + 1)? as char).to_digit(16)?;
    let lo = (*b.get(at + 2)? as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
