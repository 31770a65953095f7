pub mod parser;
pub mod scanner;
pub mod token;

pub use parser::{ParseOptions, Parser, Strictness, DEFAULT_MAX_TOKENS};
pub use scanner::Scanner;
pub use token::{Token, TokenKind};
