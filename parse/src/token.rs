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

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Illegal,
    Eof,

    Name { name: String },       // /foo/bar
    Ident { name: String },      // x
    Int { decoded: i64 },        // 123
    Float { decoded: f64 },      // 1.23e45
    String { decoded: String },  // "foo" or 'foo' or `foo`
    Bytes { decoded: Vec<u8> },  // b"foo", etc
    Duration { millis: i64 },    // 5m, 3h, 200ms
    Timestamp { decoded: String }, // 2024-01-02T03:04:05Z

    Semi,      // ;
    Package,   // Package
    Decl,      // Decl
    Use,       // Use
    Temporal,  // temporal
    Bound,     // bound
    Descr,     // descr
    Inclusion, // inclusion
    Let,       // let
    Do,        // do
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    Colon,     // :
    ColonDash, // :-
    LongLeftDoubleArrow, // ⟸
    Eq,        // =
    Bang,      // !
    BangEq,    // !=
    Comma,     // ,
    Lt,        // <
    Le,        // <=
    Gt,        // >
    Ge,        // >=
    Pipe,      // |
    PipeGt,    // |>
    At,        // @
    Dot,       // .

    // Temporal operators.
    StrictlyBefore, // <-
    BeforeOrMeets,  // [-
    StrictlyAfter,  // <+
    AfterOrMeets,   // [+
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Illegal => write!(f, "illegal"),
            Token::Eof => write!(f, "eof"),
            Token::Package => write!(f, "Package"),
            Token::Decl => write!(f, "Decl"),
            Token::Temporal => write!(f, "temporal"),

            Token::Name { name } => write!(f, "{}", name),
            Token::Ident { name } => write!(f, "{}", name),
            Token::Int { decoded } => write!(f, "{}", decoded),
            Token::Float { decoded } => write!(f, "{}", decoded),
            Token::String { decoded } => write!(f, "{}", crate::quote::quote(decoded.as_str())),
            Token::Bytes { decoded } => write!(f, "{:?}", decoded),
            Token::Duration { millis } => write!(f, "{}ms", millis),
            Token::Timestamp { decoded } => write!(f, "{}", decoded),

            Token::Semi => write!(f, ";"),
            Token::Use => write!(f, "Use"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Colon => write!(f, ":"),
            Token::ColonDash => write!(f, ":-"),
            Token::LongLeftDoubleArrow => write!(f, "⟸"),
            Token::Pipe => write!(f, "|"),
            Token::PipeGt => write!(f, "|>"),
            Token::Bound => write!(f, "bound"),
            Token::Inclusion => write!(f, "inclusion"),
            Token::Descr => write!(f, "descr"),
            Token::Let => write!(f, "let"),
            Token::Do => write!(f, "do"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Eq => write!(f, "="),
            Token::Bang => write!(f, "!"),
            Token::BangEq => write!(f, "!="),
            Token::Comma => write!(f, ","),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::At => write!(f, "@"),
            Token::Dot => write!(f, "."),

            Token::StrictlyBefore => write!(f, "<-"),
            Token::BeforeOrMeets => write!(f, "[-"),
            Token::StrictlyAfter => write!(f, "<+"),
            Token::AfterOrMeets => write!(f, "[+"),
        }
    }
}
