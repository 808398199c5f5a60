// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! String/byte literal unescaping: single-letter escapes, octal, `\xHH`,
//! `\uXXXX`/`\UXXXXXXXX`, raw/byte prefixes, and the backtick
//! `` `...` `` long-string form.

use anyhow::anyhow;

fn unesc(c: char) -> u8 {
    match c {
        'a' => b'\x07',
        'b' => b'\x08',
        'f' => b'\x0C',
        'n' => b'\x0A',
        'r' => b'\x0D',
        't' => b'\x09',
        'v' => b'\x0B',
        '\\' => b'\\',
        '\'' => b'\'',
        '"' => b'"',
        '`' => b'`',
        _ => unreachable!(),
    }
}

pub enum DecodedSequence {
    String(String),
    Bytes(Vec<u8>),
}

/// Unquotes `quoted_str`, which must include its surrounding quote
/// characters (and optional `r`/`b` prefixes), returning the decoded
/// value.
pub fn unquote(quoted_str: &str) -> anyhow::Result<DecodedSequence> {
    let mut quoted = quoted_str;
    let mut raw = false;
    let mut is_byte = false;
    if let Some(rest) = quoted.strip_prefix('r') {
        raw = true;
        quoted = rest;
    }
    if let Some(rest) = quoted.strip_prefix('b') {
        is_byte = true;
        quoted = rest;
    }
    if quoted.len() < 2 {
        return Err(anyhow!("string literal too short"));
    }

    let quote = quoted.chars().next().unwrap();
    if !matches!(quote, '"' | '\'' | '`') || quoted.chars().last().unwrap() != quote {
        return Err(anyhow!("string literal {quoted} has invalid quotes"));
    }
    quoted = &quoted[1..quoted.len() - 1];

    let unquote_chars = if raw { "\r" } else { "\\\r" };
    if !quoted.chars().any(|x| unquote_chars.contains(x)) {
        return if is_byte {
            Ok(DecodedSequence::Bytes(quoted.into()))
        } else {
            Ok(DecodedSequence::String(quoted.to_string()))
        };
    }

    let mut buf: Vec<u8> = vec![];
    loop {
        match quoted.chars().position(|c| unquote_chars.contains(c)) {
            Some(i) => {
                quoted[..i].chars().for_each(|c| buf.push(c as u8));
                quoted = &quoted[i..];
            }
            None => {
                quoted.chars().for_each(|c| buf.push(c as u8));
                break;
            }
        }

        if let Some(rest) = quoted.strip_prefix('\r') {
            buf.push(b'\n');
            quoted = rest.strip_prefix('\n').unwrap_or(rest);
            continue;
        }

        if quoted.len() == 1 {
            return Err(anyhow!("truncated escape sequence \\"));
        }

        match quoted.chars().nth(1) {
            Some('\n') => quoted = &quoted[2..],
            Some(c @ ('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '\'' | '"' | '`')) => {
                buf.push(unesc(c));
                quoted = &quoted[2..]
            }
            Some(c @ '0'..='7') => {
                let mut n = c.to_digit(8).unwrap();
                quoted = &quoted[2..];
                for _ in 0..2 {
                    match quoted.chars().next() {
                        Some(d @ '0'..='7') => {
                            n = n * 8 + d.to_digit(8).unwrap();
                            quoted = &quoted[1..];
                        }
                        _ => break,
                    }
                }
                if !is_byte && n > 127 {
                    return Err(anyhow!(
                        "non-ASCII octal escape \\{n:o} (use \\u{n:04x} for the UTF-8 encoding)"
                    ));
                }
                buf.push(n as u8)
            }
            Some('x') => {
                if quoted.len() < 4 {
                    return Err(anyhow!("truncated escape sequence {quoted}"));
                }
                let n = u32::from_str_radix(&quoted[2..4], 16)
                    .map_err(|_| anyhow!("could not parse hex escape {}", &quoted[..4]))?;
                if !is_byte && n > 127 {
                    return Err(anyhow!("non-ASCII hex escape {}", &quoted[..4]));
                }
                buf.push(n as u8);
                quoted = &quoted[4..]
            }
            Some(u @ ('u' | 'U')) => {
                let sz = if u == 'U' { 10 } else { 6 };
                if quoted.len() < sz {
                    return Err(anyhow!("truncated escape sequence {quoted}"));
                }
                let n = u32::from_str_radix(&quoted[2..sz], 16)
                    .map_err(|_| anyhow!("could not parse unicode escape {}", &quoted[..sz]))?;
                if (0xd800..0xe000).contains(&n) || n > 0x10FFFF {
                    return Err(anyhow!("invalid Unicode code point U+{n:04x}"));
                }
                let ch = char::from_u32(n).ok_or_else(|| anyhow!("invalid Unicode code point U+{n:04x}"))?;
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
                quoted = &quoted[sz..]
            }
            _ => return Err(anyhow!("invalid escape sequence \\{quoted}")),
        }
    }

    if is_byte {
        return Ok(DecodedSequence::Bytes(buf));
    }
    Ok(DecodedSequence::String(String::from_utf8(buf)?))
}

/// Renders `s` as a double-quoted string literal, escaping non-printable
/// characters. Used for `Display`ing scanned `String` tokens in error
/// messages.
pub fn quote(s: &str) -> String {
    let mut buf = "\"".to_string();
    for c in s.chars() {
        if c == '\'' {
            buf.push(c);
            continue;
        }
        c.escape_default().for_each(|c| buf.push(c));
    }
    buf.push('"');
    buf
}
