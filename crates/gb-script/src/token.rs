#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfInput,
    Whitespace,
    Text,
    Label,
    JumpBracket,
    ChoiceBlockStart,
    BranchMarker,
    BlockEnd,
    Wait,
    Illegal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub literal: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, literal: &'a str, offset: usize) -> Self {
        Self {
            kind,
            literal,
            offset,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    // Empty for `[*name]`; the name arrives as the next label token.
    pub fn target_name(&self) -> &'a str {
        match self.kind {
            TokenKind::JumpBracket => self.literal.strip_prefix('[').unwrap_or(self.literal),
            _ => self.literal,
        }
    }
}

pub(crate) fn command_kind(literal: &str) -> Option<TokenKind> {
    match literal {
        "@buttons" => Some(TokenKind::ChoiceBlockStart),
        "@end" => Some(TokenKind::BlockEnd),
        "@wait" => Some(TokenKind::Wait),
        _ => None,
    }
}
