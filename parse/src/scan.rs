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

//! Byte-stream scanner: UTF-8-aware byte-at-a-time decoding with
//! line/column tracking, plus temporal operators, `@` annotations, and
//! duration/timestamp literals.

use anyhow::{anyhow, Result};
use std::io;

use crate::error::{ErrorContext, ScanError};
use crate::quote::{unquote, DecodedSequence};
use crate::token::Token;

pub struct Scanner<R>
where
    R: io::Read,
{
    iter: io::Bytes<R>,
    ch: Option<char>,
    pub line: usize,
    pub col: usize,
    pub start_of_line: usize,
    text: String,
    path: String,
}

impl<R> Scanner<R>
where
    R: io::Read,
{
    pub fn new<P: ToString>(reader: R, path: P) -> Self {
        Self {
            iter: reader.bytes(),
            ch: None,
            line: 1,
            col: 0,
            start_of_line: 0,
            text: String::new(),
            path: path.to_string(),
        }
    }

    pub fn get_error_context(&self) -> ErrorContext {
        ErrorContext {
            path: self.path.clone(),
            line: self.line,
            col: self.col,
            start_of_line: self.start_of_line,
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.next_token_internal()
    }

    fn next_token_internal(&mut self) -> Result<Token> {
        match self.next_char_skip()? {
            Some('=') => Ok(Token::Eq),
            Some(';') => Ok(Token::Semi),
            Some(',') => Ok(Token::Comma),
            Some('@') => Ok(Token::At),
            Some('!') => match self.peek()? {
                Some('=') => {
                    let _ = self.next_char()?;
                    Ok(Token::BangEq)
                }
                _ => Ok(Token::Bang),
            },
            Some('(') => Ok(Token::LParen),
            Some(')') => Ok(Token::RParen),
            Some('{') => Ok(Token::LBrace),
            Some('}') => Ok(Token::RBrace),
            Some('[') => match self.peek()? {
                Some('-') => {
                    let _ = self.next_char()?;
                    Ok(Token::BeforeOrMeets)
                }
                Some('+') => {
                    let _ = self.next_char()?;
                    Ok(Token::AfterOrMeets)
                }
                _ => Ok(Token::LBracket),
            },
            Some(']') => Ok(Token::RBracket),
            Some('≤') => Ok(Token::Le),
            Some('<') => match self.peek()? {
                Some('=') => {
                    let _ = self.next_char()?;
                    Ok(Token::Le)
                }
                Some('-') => {
                    let _ = self.next_char()?;
                    Ok(Token::StrictlyBefore)
                }
                Some('+') => {
                    let _ = self.next_char()?;
                    Ok(Token::StrictlyAfter)
                }
                _ => Ok(Token::Lt),
            },
            Some('≥') => Ok(Token::Ge),
            Some('>') => match self.peek()? {
                Some('=') => {
                    let _ = self.next_char()?;
                    Ok(Token::Ge)
                }
                _ => Ok(Token::Gt),
            },
            Some(':') => match self.peek()? {
                Some('-') => {
                    let _ = self.next_char()?;
                    Ok(Token::ColonDash)
                }
                _ => Ok(Token::Colon),
            },
            Some('|') => match self.peek()? {
                Some('>') => {
                    let _ = self.next_char()?;
                    Ok(Token::PipeGt)
                }
                _ => Ok(Token::Pipe),
            },
            Some('.') => match self.peek()? {
                Some('A'..='Z') => {
                    let first = self.next_char()?.expect("could not get peeked character.");
                    self.ident_or_dot_ident(first, true)
                }
                _ => Ok(Token::Dot),
            },
            Some('/') => self.name(),
            Some('⟸') => Ok(Token::LongLeftDoubleArrow),
            Some(delim @ ('\'' | '"' | '`')) => self.string(delim, false),
            Some(first @ '0'..='9') => self.numeric(first),
            Some(ch) if is_ident_start(ch) => {
                if ch == 'b' {
                    if let Some(delim @ ('\'' | '"')) = self.peek()? {
                        let _ = self.next_char()?;
                        return self.string(delim, true);
                    }
                }
                self.ident(ch)
            }
            Some(ch) => Err(anyhow!(ScanError::Unexpected(self.get_error_context(), ch))),
            None => Ok(Token::Eof),
        }
    }

    fn name(&mut self) -> Result<Token> {
        self.text.clear();
        self.text.push('/');
        let mut seen_char = false;
        loop {
            match self.peek()? {
                Some(c) if is_name_char(c) => {
                    self.next_char()?;
                    self.text.push(c);
                    seen_char = true;
                }
                Some('/') => {
                    self.next_char()?;
                    if !seen_char {
                        return Err(anyhow!(ScanError::Malformed(
                            self.get_error_context(),
                            format!("name constant: expected char after {}", self.text),
                        )));
                    }
                    self.text.push('/');
                    seen_char = false;
                }
                _ => break,
            }
        }
        if !seen_char {
            return Err(anyhow!(ScanError::Malformed(
                self.get_error_context(),
                format!("name constant: expected name char after {}", self.text),
            )));
        }
        Ok(Token::Name { name: self.text.clone() })
    }

    fn string(&mut self, delim: char, is_byte: bool) -> Result<Token> {
        self.text.clear();
        if is_byte {
            self.text.push('b');
        }
        self.text.push(delim);
        loop {
            match self.next_char()? {
                Some(c) if c == delim => break,
                Some(c) => self.text.push(c),
                _ => break,
            }
        }
        self.text.push(delim);
        match unquote(self.text.as_str())? {
            DecodedSequence::String(decoded) => Ok(Token::String { decoded }),
            DecodedSequence::Bytes(decoded) => Ok(Token::Bytes { decoded }),
        }
    }

    fn numeric(&mut self, first: char) -> Result<Token> {
        self.text.clear();
        self.text.push(first);
        while let Some(c @ '0'..='9') = self.peek()? {
            self.next_char()?;
            self.text.push(c);
        }

        // `YYYY-...` is a timestamp, never a subtraction (there is no binary
        // minus in this grammar).
        if self.text.len() == 4 && matches!(self.peek()?, Some('-')) {
            return self.timestamp();
        }
        if let Some(tok) = self.duration_suffix()? {
            return Ok(tok);
        }

        let mut is_float = false;
        loop {
            match self.peek()? {
                Some(c @ '0'..='9') => {
                    self.next_char()?;
                    self.text.push(c)
                }
                Some(c @ '.') => {
                    self.next_char()?;
                    is_float = true;
                    self.text.push(c)
                }
                _ => break,
            }
        }
        if is_float {
            let num = self.text.parse::<f64>()?;
            return Ok(Token::Float { decoded: num });
        }
        let num = self.text.parse::<i64>()?;
        Ok(Token::Int { decoded: num })
    }

    /// Consumes a `d`/`h`/`m`/`s`/`ms` unit suffix right after a digit run,
    /// if present, converting the whole literal to milliseconds.
    fn duration_suffix(&mut self) -> Result<Option<Token>> {
        let unit_start = match self.peek()? {
            Some(c @ ('d' | 'h' | 'm' | 's')) => c,
            _ => return Ok(None),
        };
        self.next_char()?;
        let unit = if unit_start == 'm' {
            if let Some('s') = self.peek()? {
                self.next_char()?;
                "ms"
            } else {
                "m"
            }
        } else {
            match unit_start {
                'd' => "d",
                'h' => "h",
                's' => "s",
                _ => unreachable!(),
            }
        };
        let magnitude: i64 = self
            .text
            .parse()
            .map_err(|_| anyhow!(ScanError::Malformed(self.get_error_context(), "malformed duration magnitude".into())))?;
        let millis = match unit {
            "d" => magnitude * 86_400_000,
            "h" => magnitude * 3_600_000,
            "m" => magnitude * 60_000,
            "s" => magnitude * 1_000,
            "ms" => magnitude,
            _ => unreachable!(),
        };
        Ok(Some(Token::Duration { millis }))
    }

    /// Consumes the remainder of a `YYYY-MM-DD(THH:MM:SS(.d+)?Z?)?`
    /// timestamp; `self.text` already holds the 4-digit year and `peek()`
    /// is known to be `-`.
    fn timestamp(&mut self) -> Result<Token> {
        self.expect_literal_char('-')?;
        self.expect_digits(2)?;
        self.expect_literal_char('-')?;
        self.expect_digits(2)?;
        if let Some('T') = self.peek()? {
            self.next_char()?;
            self.text.push('T');
            self.expect_digits(2)?;
            self.expect_literal_char(':')?;
            self.expect_digits(2)?;
            self.expect_literal_char(':')?;
            self.expect_digits(2)?;
            if let Some('.') = self.peek()? {
                self.next_char()?;
                self.text.push('.');
                while let Some(c @ '0'..='9') = self.peek()? {
                    self.next_char()?;
                    self.text.push(c);
                }
            }
            if let Some('Z') = self.peek()? {
                self.next_char()?;
                self.text.push('Z');
            }
        }
        Ok(Token::Timestamp { decoded: self.text.clone() })
    }

    fn expect_literal_char(&mut self, want: char) -> Result<()> {
        match self.next_char()? {
            Some(c) if c == want => {
                self.text.push(c);
                Ok(())
            }
            got => Err(anyhow!(ScanError::Malformed(
                self.get_error_context(),
                format!("malformed timestamp: expected `{want}` got `{got:?}`"),
            ))),
        }
    }

    fn expect_digits(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            match self.next_char()? {
                Some(c @ '0'..='9') => self.text.push(c),
                got => {
                    return Err(anyhow!(ScanError::Malformed(
                        self.get_error_context(),
                        format!("malformed timestamp: expected digit got `{got:?}`"),
                    )))
                }
            }
        }
        Ok(())
    }

    fn ident(&mut self, first: char) -> Result<Token> {
        self.ident_or_dot_ident(first, false)
    }

    fn ident_or_dot_ident(&mut self, first: char, dot_ident: bool) -> Result<Token> {
        self.text.clear();
        self.text.push(first);
        loop {
            match self.peek()? {
                Some(ch) if is_ident(ch) => {
                    self.next_char()?;
                    self.text.push(ch);
                }
                Some(':') if self.text == "fn" => {
                    self.next_char()?;
                    self.text.push(':');
                }
                _ => {
                    return match self.text.as_str() {
                        "Package" => Ok(Token::Package),
                        "Use" => Ok(Token::Use),
                        "Decl" => Ok(Token::Decl),
                        "temporal" => Ok(Token::Temporal),
                        "bound" => Ok(Token::Bound),
                        "inclusion" => Ok(Token::Inclusion),
                        "do" => Ok(Token::Do),
                        "descr" => Ok(Token::Descr),
                        "let" => Ok(Token::Let),
                        _ if dot_ident => {
                            let mut fn_name = String::from("fn:");
                            fn_name.push_str(&self.text);
                            Ok(Token::Ident { name: fn_name })
                        }
                        _ => Ok(Token::Ident { name: self.text.clone() }),
                    }
                }
            }
        }
    }

    #[inline]
    fn next_char(&mut self) -> Result<Option<char>> {
        if let Some(c) = self.ch.take() {
            return Ok(Some(c));
        }
        macro_rules! next_byte_or_incomplete {
            ($self:expr) => {
                $self
                    .next_byte()?
                    .ok_or_else(|| anyhow!(ScanError::IncompleteUtf8(self.get_error_context())))
            };
        }
        let b = self.next_byte()?;
        match b {
            None => Ok(None),
            Some(b @ 0x00..=0x7F) => Ok(Some(unsafe { char::from_u32_unchecked(b.into()) })),
            Some(b1 @ 0xC0..=0xDF) => {
                let b2 = next_byte_or_incomplete!(self)?;
                let bytes = [b1, b2];
                let s = std::str::from_utf8(&bytes)?;
                Ok(s.chars().next())
            }
            Some(b1 @ 0xE0..=0xEF) => {
                let b2 = next_byte_or_incomplete!(self)?;
                let b3 = next_byte_or_incomplete!(self)?;
                let bytes = [b1, b2, b3];
                let s = std::str::from_utf8(&bytes)?;
                Ok(s.chars().next())
            }
            Some(b1 @ 0xF0..=0xF4) => {
                let b2 = next_byte_or_incomplete!(self)?;
                let b3 = next_byte_or_incomplete!(self)?;
                let b4 = next_byte_or_incomplete!(self)?;
                let bytes = [b1, b2, b3, b4];
                let s = std::str::from_utf8(&bytes)?;
                Ok(s.chars().next())
            }
            _ => Err(anyhow!("invalid utf8")),
        }
    }

    /// Advance to next non-whitespace byte. Skip comments.
    #[inline]
    fn next_char_skip(&mut self) -> Result<Option<char>> {
        loop {
            match self.next_char()? {
                Some(' ' | '\t' | '\n') => {}
                Some('#') => self.skip_line()?,
                z => return Ok(z),
            };
        }
    }

    fn skip_line(&mut self) -> Result<()> {
        loop {
            match self.next_byte()? {
                Some(b'\n') | None => return Ok(()),
                _ => {}
            }
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        match self.iter.next() {
            None => Ok(None),
            Some(Ok(b'\n')) => {
                self.start_of_line += self.col + 1;
                self.line += 1;
                self.col = 0;
                Ok(Some(b'\n'))
            }
            Some(Ok(c)) => {
                self.col += 1;
                Ok(Some(c))
            }
            Some(Err(e)) => Err(e.into()),
        }
    }

    #[inline]
    pub fn peek(&mut self) -> Result<Option<char>> {
        Ok(match self.ch {
            Some(ch) => Some(ch),
            None => {
                self.ch = self.next_char()?;
                self.ch
            }
        })
    }
}

fn is_ident_start(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
}

fn is_ident(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')
}

fn is_name_char(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '~' | '.' | '%')
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan_all(s: &str) -> Result<Vec<Token>> {
        let mut sc = Scanner::new(s.as_bytes(), "test");
        let mut got = vec![];
        loop {
            let token = sc.next_token()?;
            if let Token::Eof = token {
                return Ok(got);
            }
            got.push(token);
        }
    }

    #[test]
    fn test_ident() -> Result<()> {
        let mut sc = Scanner::new("hello".as_bytes(), "test");
        match sc.next_token()? {
            Token::Ident { name } if name == "hello" => {}
            t => panic!("unexpected token {:?}", t),
        }
        Ok(())
    }

    #[test]
    fn test_keywords() -> Result<()> {
        let got = scan_all("do ⟸ let bound descr inclusion Package Use temporal")?;
        use Token::*;
        let want =
            vec![Do, LongLeftDoubleArrow, Let, Bound, Descr, Inclusion, Package, Use, Temporal];
        assert_eq!(want, got);
        Ok(())
    }

    #[test]
    fn test_values() -> Result<()> {
        let got = scan_all("1 3.14 'foo' b'foo' \"bar\" b\"bar\" `baz`")?;
        let want = vec![
            Token::Int { decoded: 1 },
            Token::Float { decoded: 3.14 },
            Token::String { decoded: "foo".to_string() },
            Token::Bytes { decoded: "foo".as_bytes().into() },
            Token::String { decoded: "bar".to_string() },
            Token::Bytes { decoded: "bar".as_bytes().into() },
            Token::String { decoded: "baz".to_string() },
        ];
        assert_eq!(want, got);
        Ok(())
    }

    #[test]
    fn test_punctuation() -> Result<()> {
        let got = scan_all(".=!!=()[]{}::-|>@")?;
        use Token::*;
        let want = vec![
            Dot, Eq, Bang, BangEq, LParen, RParen, LBracket, RBracket, LBrace, RBrace, Colon,
            ColonDash, PipeGt, At,
        ];
        assert_eq!(want, got);
        Ok(())
    }

    #[test]
    fn test_names() -> Result<()> {
        let got = scan_all("/foo /foo/bar")?;
        let want = vec![
            Token::Name { name: "/foo".to_string() },
            Token::Name { name: "/foo/bar".to_string() },
        ];
        assert_eq!(want, got);
        Ok(())
    }

    #[test]
    fn test_names_negative() {
        scan_all("/").unwrap_err();
        scan_all("/foo/").unwrap_err();
    }

    #[test]
    fn test_temporal_operators() -> Result<()> {
        let got = scan_all("<- [- <+ [+")?;
        use Token::*;
        let want = vec![StrictlyBefore, BeforeOrMeets, StrictlyAfter, AfterOrMeets];
        assert_eq!(want, got);
        Ok(())
    }

    #[test]
    fn test_duration() -> Result<()> {
        let got = scan_all("5m 200ms 3h 2d 30s")?;
        let want = vec![
            Token::Duration { millis: 5 * 60_000 },
            Token::Duration { millis: 200 },
            Token::Duration { millis: 3 * 3_600_000 },
            Token::Duration { millis: 2 * 86_400_000 },
            Token::Duration { millis: 30_000 },
        ];
        assert_eq!(want, got);
        Ok(())
    }

    #[test]
    fn test_timestamp() -> Result<()> {
        let got = scan_all("2024-01-02 2024-01-02T03:04:05Z 2024-01-02T03:04:05.5")?;
        let want = vec![
            Token::Timestamp { decoded: "2024-01-02".to_string() },
            Token::Timestamp { decoded: "2024-01-02T03:04:05Z".to_string() },
            Token::Timestamp { decoded: "2024-01-02T03:04:05.5".to_string() },
        ];
        assert_eq!(want, got);
        Ok(())
    }
}
