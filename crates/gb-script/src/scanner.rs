use gb_core::SourceLocation;
use tracing::warn;

use crate::token::{command_kind, Token, TokenKind};

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    last_width: usize,
    exhausted: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            last_width: 0,
            exhausted: false,
        }
    }

    pub fn next_token(&mut self) -> Token<'a> {
        let start = self.pos;
        let Some(ch) = self.read() else {
            return Token::new(TokenKind::EndOfInput, "", start);
        };
        self.unread();

        match ch {
            ch if is_whitespace(ch) => self.scan_whitespace(),
            '*' => self.scan_word(TokenKind::Label),
            '[' => self.scan_word(TokenKind::JumpBracket),
            '@' => self.scan_command(),
            '-' => self.scan_word(TokenKind::BranchMarker),
            ']' => self.scan_whitespace(),
            '\0' => {
                self.read();
                self.token_from(TokenKind::Illegal, start)
            }
            _ => self.scan_text(),
        }
    }

    fn scan_whitespace(&mut self) -> Token<'a> {
        let start = self.pos;
        self.read();
        while let Some(ch) = self.read() {
            if !is_whitespace(ch) {
                self.unread();
                break;
            }
        }
        self.token_from(TokenKind::Whitespace, start)
    }

    fn scan_word(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.pos;
        self.read();
        self.consume_alphanumeric();
        self.token_from(kind, start)
    }

    fn scan_command(&mut self) -> Token<'a> {
        let start = self.pos;
        self.read();
        self.consume_alphanumeric();
        let literal = &self.source[start..self.pos];
        match command_kind(literal) {
            Some(kind) => Token::new(kind, literal, start),
            None => {
                let location = SourceLocation::at_offset(self.source, start);
                warn!(
                    command = literal,
                    line = location.line,
                    column = location.column,
                    "unrecognized command treated as whitespace"
                );
                Token::new(TokenKind::Whitespace, literal, start)
            }
        }
    }

    fn scan_text(&mut self) -> Token<'a> {
        let start = self.pos;
        self.read();
        while let Some(ch) = self.read() {
            if is_eol(ch) {
                self.unread();
                break;
            }
        }
        self.token_from(TokenKind::Text, start)
    }

    fn consume_alphanumeric(&mut self) {
        while let Some(ch) = self.read() {
            if !ch.is_ascii_alphanumeric() {
                self.unread();
                break;
            }
        }
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token::new(kind, &self.source[start..self.pos], start)
    }

    fn read(&mut self) -> Option<char> {
        let ch = self.source[self.pos..].chars().next()?;
        self.last_width = ch.len_utf8();
        self.pos += self.last_width;
        Some(ch)
    }

    // Only the most recent read can be undone.
    fn unread(&mut self) {
        self.pos -= self.last_width;
        self.last_width = 0;
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::EndOfInput {
            self.exhausted = true;
            return None;
        }
        Some(token)
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_eol(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}
