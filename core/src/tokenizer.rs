//! Byte-oriented scanner that splits raw text into uppercase word tokens.
//!
//! The scan is deliberately ASCII-only: a run of `[A-Za-z0-9_]` bytes is one
//! word, anything else that is not whitespace comes back as a single-byte
//! `Illegal` token. Multi-byte sequences therefore degrade to a series of
//! `Illegal` tokens rather than being word-broken.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Illegal,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

pub struct Tokenizer<'a> {
    input: &'a [u8],
    pos: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            finished: false,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(b' ' | b'\t' | b'\n' | b'\r')) = self.input.get(self.pos) {
            self.pos += 1;
        }
    }

    /// Advances past exactly one token and returns it. At end of input this
    /// returns an `Eof` token, and keeps returning it on later calls.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(&b) = self.input.get(self.pos) else {
            return Token {
                kind: TokenKind::Eof,
                text: String::new(),
            };
        };

        if is_word_byte(b) {
            let start = self.pos;
            while self.pos < self.input.len() && is_word_byte(self.input[self.pos]) {
                self.pos += 1;
            }
            let text = self.input[start..self.pos]
                .iter()
                .map(|b| b.to_ascii_uppercase() as char)
                .collect();
            Token {
                kind: TokenKind::Word,
                text,
            }
        } else {
            self.pos += 1;
            Token {
                kind: TokenKind::Illegal,
                text: (b as char).to_string(),
            }
        }
    }
}

/// Yields every token including the final `Eof`, then stops.
impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let tok = self.next_token();
        if tok.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(tok)
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
