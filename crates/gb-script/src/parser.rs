use gb_core::{Branch, GamebookError, SourceLocation, Statement, MAX_BRANCHES};
use tracing::{debug, warn};

use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

pub const DEFAULT_MAX_TOKENS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_branches: usize,
    pub strictness: Strictness,
    pub max_tokens: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_branches: MAX_BRANCHES,
            strictness: Strictness::Lenient,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SearchTarget {
    Label(String),
    Reference(String),
}

impl SearchTarget {
    fn matches(&self, literal: &str) -> bool {
        match self {
            Self::Label(label) => label == literal,
            Self::Reference(name) => {
                let name = name.strip_prefix('*').unwrap_or(name);
                literal.strip_prefix('*') == Some(name)
            }
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Label(label) | Self::Reference(label) => label,
        }
    }
}

struct SegmentState {
    current: Vec<Statement>,
    saved: Vec<Statement>,
    collecting: bool,
    matched: bool,
    target: SearchTarget,
}

impl SegmentState {
    fn new(target: SearchTarget) -> Self {
        Self {
            current: Vec::new(),
            saved: Vec::new(),
            collecting: false,
            matched: false,
            target,
        }
    }
}

pub struct Parser<'a> {
    source: &'a str,
    scanner: Scanner<'a>,
    pushback: Option<Token<'a>>,
    options: ParseOptions,
    scanned: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: ParseOptions) -> Self {
        Self {
            source,
            scanner: Scanner::new(source),
            pushback: None,
            options,
            scanned: 0,
        }
    }

    pub fn resolve(self, label: &str) -> Result<Vec<Statement>, GamebookError> {
        self.run(SearchTarget::Label(label.to_string()))
    }

    pub fn resolve_reference(self, target: &str) -> Result<Vec<Statement>, GamebookError> {
        self.run(SearchTarget::Reference(target.to_string()))
    }

    fn run(mut self, target: SearchTarget) -> Result<Vec<Statement>, GamebookError> {
        let mut state = SegmentState::new(target);

        loop {
            let token = self.scan_ignore_whitespace()?;
            match token.kind {
                TokenKind::Text => state.current.push(Statement::text(token.literal)),
                TokenKind::Label => {
                    if state.target.matches(token.literal) {
                        debug!(label = token.literal, "segment label matched");
                        state.current = state.saved.clone();
                        state.collecting = true;
                        state.matched = true;
                    }
                }
                TokenKind::JumpBracket => {
                    let reference = self.jump_target(token)?;
                    if state.collecting {
                        debug!(jump_to = reference, "continuation jump");
                        state.saved = state.current.clone();
                        state.target = SearchTarget::Reference(reference.to_string());
                        state.collecting = false;
                    }
                }
                TokenKind::ChoiceBlockStart => {
                    if let Some(choice) = self.parse_choice_block(token)? {
                        state.current.push(choice);
                    }
                    if state.collecting {
                        debug!(statements = state.current.len(), "segment ended at choice");
                        return Ok(state.current);
                    }
                }
                TokenKind::Wait => {
                    let duration = self.scan_ignore_whitespace()?;
                    match duration.kind {
                        TokenKind::Text => state.current.push(Statement::pause(duration.literal)),
                        _ if self.options.strictness == Strictness::Strict => {
                            return Err(GamebookError::with_location(
                                "PARSE_MALFORMED_WAIT",
                                format!(
                                    "@wait expects a duration, found \"{}\".",
                                    duration.literal
                                ),
                                self.location(token.offset),
                            ));
                        }
                        TokenKind::EndOfInput => {
                            warn!(
                                line = self.location(token.offset).line,
                                "@wait without a duration at end of input"
                            );
                            self.unscan(duration);
                        }
                        // Lenient keeps whatever token follows as the literal.
                        _ => state.current.push(Statement::pause(duration.literal)),
                    }
                }
                TokenKind::BlockEnd => {
                    if state.collecting {
                        debug!(statements = state.current.len(), "segment ended at @end");
                        return Ok(state.current);
                    }
                }
                TokenKind::Illegal => {
                    let location = self.location(token.offset);
                    warn!(
                        line = location.line,
                        column = location.column,
                        "illegal character skipped"
                    );
                }
                TokenKind::EndOfInput => return self.finish(state),
                TokenKind::Whitespace | TokenKind::BranchMarker => {}
            }
        }
    }

    fn finish(&self, state: SegmentState) -> Result<Vec<Statement>, GamebookError> {
        if state.collecting {
            return Ok(state.current);
        }

        match self.options.strictness {
            Strictness::Lenient => {
                debug!(
                    label = state.target.as_str(),
                    statements = state.current.len(),
                    "target never reached; returning accumulated statements"
                );
                Ok(state.current)
            }
            Strictness::Strict if state.matched => Err(GamebookError::new(
                "PARSE_JUMP_TARGET_NOT_FOUND",
                format!(
                    "Continuation target \"{}\" has no matching label after the jump.",
                    state.target.as_str()
                ),
            )),
            Strictness::Strict => Err(GamebookError::new(
                "PARSE_LABEL_NOT_FOUND",
                format!("Label \"{}\" was not found.", state.target.as_str()),
            )),
        }
    }

    fn parse_choice_block(&mut self, start: Token<'a>) -> Result<Option<Statement>, GamebookError> {
        let prompt = self.scan_ignore_whitespace()?;
        if prompt.kind == TokenKind::EndOfInput {
            self.unscan(prompt);
            return self.malformed_choice_block(start, "missing prompt text");
        }

        let mut branches = Vec::new();
        let mut truncated = 0usize;
        loop {
            let marker = self.scan_ignore_whitespace()?;
            if marker.kind != TokenKind::BranchMarker {
                self.unscan(marker);
                break;
            }
            let Some(branch) = self.parse_branch()? else {
                return self.malformed_choice_block(start, "branch without a [target]");
            };
            if branches.len() < self.options.max_branches {
                branches.push(branch);
            } else {
                truncated += 1;
            }
        }
        if truncated > 0 {
            debug!(
                truncated,
                max = self.options.max_branches,
                "extra branches dropped"
            );
        }

        let closing = self.scan_ignore_whitespace()?;
        if closing.kind != TokenKind::BlockEnd {
            self.unscan(closing);
            return self.malformed_choice_block(start, "block is not closed by @end");
        }

        Statement::choice(prompt.literal, branches, self.options.max_branches).map(Some)
    }

    fn parse_branch(&mut self) -> Result<Option<Branch>, GamebookError> {
        let bracket = self.scan_ignore_whitespace()?;
        if bracket.kind != TokenKind::JumpBracket {
            self.unscan(bracket);
            return Ok(None);
        }
        let target = self.jump_target(bracket)?;

        let button = self.scan_ignore_whitespace()?;
        let button_text = if button.kind == TokenKind::Text {
            button.literal
        } else {
            self.unscan(button);
            ""
        };
        Ok(Some(Branch::new(target, button_text)))
    }

    fn jump_target(&mut self, bracket: Token<'a>) -> Result<&'a str, GamebookError> {
        let name = bracket.target_name();
        if !name.is_empty() {
            return Ok(name);
        }
        let next = self.scan_ignore_whitespace()?;
        if next.kind == TokenKind::EndOfInput {
            self.unscan(next);
            return Ok("");
        }
        Ok(next.literal)
    }

    fn malformed_choice_block(
        &self,
        start: Token<'a>,
        reason: &str,
    ) -> Result<Option<Statement>, GamebookError> {
        let location = self.location(start.offset);
        match self.options.strictness {
            Strictness::Lenient => {
                warn!(
                    line = location.line,
                    column = location.column,
                    reason,
                    "malformed @buttons block dropped"
                );
                Ok(None)
            }
            Strictness::Strict => Err(GamebookError::with_location(
                "PARSE_MALFORMED_CHOICE_BLOCK",
                format!("Malformed @buttons block: {}.", reason),
                location,
            )),
        }
    }

    fn scan(&mut self) -> Result<Token<'a>, GamebookError> {
        if let Some(token) = self.pushback.take() {
            return Ok(token);
        }
        self.scanned += 1;
        if self.scanned > self.options.max_tokens {
            return Err(GamebookError::new(
                "PARSE_GUARD_EXCEEDED",
                format!("Token guard exceeded: max_tokens={}.", self.options.max_tokens),
            ));
        }
        Ok(self.scanner.next_token())
    }

    fn scan_ignore_whitespace(&mut self) -> Result<Token<'a>, GamebookError> {
        loop {
            let token = self.scan()?;
            if !token.is_whitespace() {
                return Ok(token);
            }
        }
    }

    fn unscan(&mut self, token: Token<'a>) {
        self.pushback = Some(token);
    }

    fn location(&self, offset: usize) -> SourceLocation {
        SourceLocation::at_offset(self.source, offset)
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;
    use gb_core::StatementKind;

    fn resolve(source: &str, label: &str) -> Vec<Statement> {
        Parser::new(source, ParseOptions::default())
            .resolve(label)
            .expect("lenient resolve should pass")
    }

    fn strict() -> ParseOptions {
        ParseOptions {
            strictness: Strictness::Strict,
            ..ParseOptions::default()
        }
    }

    #[test]
    fn continuation_jump_carries_text_into_target_segment() {
        let source = "*a\nhello\n[b]\n*b\nworld\n@end";
        assert_eq!(
            resolve(source, "*a"),
            vec![Statement::text("hello"), Statement::text("world")]
        );
        let strict_result = Parser::new(source, strict())
            .resolve("*a")
            .expect("jump target exists");
        assert_eq!(strict_result.len(), 2);
    }

    #[test]
    fn continuation_jump_skips_unrelated_segments_in_between() {
        let source = "*a\nhello\n[*c]\n*b\nnot me\n@end\n*c\nworld\n@end";
        assert_eq!(
            resolve(source, "*a"),
            vec![Statement::text("hello"), Statement::text("world")]
        );
    }

    #[test]
    fn choice_block_terminates_segment() {
        let source = "*a\n@buttons\nChoose\n- [x] Go X\n- [y] Go Y\n@end\nmore text\n@end";
        let statements = resolve(source, "*a");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].kind(), StatementKind::ChoicePrompt);
        assert_eq!(statements[0].display_text(), "Choose");
        assert_eq!(
            statements[0].branches(),
            &[Branch::new("x", "Go X"), Branch::new("y", "Go Y")]
        );
    }

    #[test]
    fn label_match_is_exact() {
        let source = "intro\n*started\nwrong\n@end\n*start\nright\n@end\nstart\n";
        assert_eq!(resolve(source, "*start"), vec![Statement::text("right")]);
        assert!(Parser::new(source, strict()).resolve("start").is_err());
    }

    #[test]
    fn branch_list_is_capped_at_max_branches() {
        let source = "*a\n@buttons\nPick\n- [a] A\n- [b] B\n- [c] C\n- [d] D\n- [e] E\n- [f] F\n@end\n";
        let statements = resolve(source, "*a");
        assert_eq!(statements.len(), 1);
        let targets: Vec<&str> = statements[0]
            .branches()
            .iter()
            .map(|branch| branch.target_label.as_str())
            .collect();
        assert_eq!(targets, vec!["a", "b", "c", "d"]);

        let two = ParseOptions {
            max_branches: 2,
            ..ParseOptions::default()
        };
        let statements = Parser::new(source, two).resolve("*a").expect("resolve");
        assert_eq!(statements[0].branches().len(), 2);
    }

    #[test]
    fn resolve_is_deterministic() {
        let source = "*start\nhi\n@wait 1s\n@buttons\nGo?\n- [*yes] Yes\n- [*no] No\n@end\n";
        assert_eq!(resolve(source, "*start"), resolve(source, "*start"));
    }

    #[test]
    fn empty_source_yields_no_statements() {
        assert!(resolve("", "*anything").is_empty());
    }

    #[test]
    fn wait_does_not_end_collection() {
        let source = "*a\nfirst\n@wait 2s\nsecond\n@end\nafter";
        assert_eq!(
            resolve(source, "*a"),
            vec![
                Statement::text("first"),
                Statement::pause("2s"),
                Statement::text("second"),
            ]
        );
    }

    #[test]
    fn unmatched_label_falls_back_to_whole_stream_when_lenient() {
        let source = "one\n*a\ntwo\n@end\nthree";
        assert_eq!(
            resolve(source, "*missing"),
            vec![
                Statement::text("one"),
                Statement::text("two"),
                Statement::text("three"),
            ]
        );
    }

    #[test]
    fn unmatched_label_is_an_error_when_strict() {
        let error = Parser::new("one\n*a\ntwo\n@end", strict())
            .resolve("*missing")
            .expect_err("strict should fail");
        assert_eq!(error.code, "PARSE_LABEL_NOT_FOUND");
    }

    #[test]
    fn dangling_jump_is_an_error_when_strict() {
        let error = Parser::new("*a\nhello\n[nowhere]\n*b\nworld\n@end", strict())
            .resolve("*a")
            .expect_err("strict should fail");
        assert_eq!(error.code, "PARSE_JUMP_TARGET_NOT_FOUND");
    }

    #[test]
    fn unclosed_choice_block_is_dropped_when_lenient() {
        let source = "*a\nbefore\n@buttons\nPick\n- [x] X\n";
        assert_eq!(resolve(source, "*a"), vec![Statement::text("before")]);
    }

    #[test]
    fn unclosed_choice_block_is_an_error_when_strict() {
        let error = Parser::new("*a\n@buttons\nPick\n- [x] X\n", strict())
            .resolve("*a")
            .expect_err("strict should fail");
        assert_eq!(error.code, "PARSE_MALFORMED_CHOICE_BLOCK");
        assert_eq!(error.location, Some(SourceLocation { line: 2, column: 1 }));
    }

    #[test]
    fn choice_in_an_unrelated_segment_does_not_stop_the_search() {
        let source = "*a\n@buttons\nPick\n- [b] B\n@end\n*b\nyou picked b\n@end\n";
        assert_eq!(resolve(source, "*b"), vec![Statement::text("you picked b")]);
    }

    #[test]
    fn reference_resolution_accepts_both_bracket_forms() {
        let source = "*a\nA\n@end\n*x\nX\n@end\n";
        let bare = Parser::new(source, ParseOptions::default())
            .resolve_reference("x")
            .expect("resolve");
        let starred = Parser::new(source, ParseOptions::default())
            .resolve_reference("*x")
            .expect("resolve");
        assert_eq!(bare, vec![Statement::text("X")]);
        assert_eq!(bare, starred);
    }

    #[test]
    fn starred_branch_targets_keep_their_sigil() {
        let source = "*a\n@buttons\nPick\n- [*left] Left\n- [*right] Right\n@end\n";
        let statements = resolve(source, "*a");
        assert_eq!(
            statements[0].branches(),
            &[Branch::new("*left", "Left"), Branch::new("*right", "Right")]
        );
    }

    #[test]
    fn token_guard_bounds_runaway_input() {
        let options = ParseOptions {
            max_tokens: 4,
            ..ParseOptions::default()
        };
        let error = Parser::new("a\nb\nc\nd\ne\n", options)
            .resolve("*x")
            .expect_err("guard should trip");
        assert_eq!(error.code, "PARSE_GUARD_EXCEEDED");
    }

    #[test]
    fn duplicate_label_restarts_from_saved_prefix() {
        assert_eq!(
            resolve("*a\nx\n*a\ny\n@end\n", "*a"),
            vec![Statement::text("y")]
        );
    }

    #[test]
    fn token_after_dropped_choice_block_is_read_again() {
        let source = "*z\n@buttons\nP\n- [x] X\n*a\nhello\n@end";
        assert_eq!(resolve(source, "*a"), vec![Statement::text("hello")]);
    }

    #[test]
    fn starred_jump_outside_segment_consumes_its_label() {
        let source = "*z\nfoo\n[*a]\n*a\nhello\n@end";
        assert_eq!(resolve(source, "*a"), vec![Statement::text("hello")]);
    }

    #[test]
    fn wait_at_end_of_input_adds_no_pause() {
        assert_eq!(resolve("*a\nhi\n@wait", "*a"), vec![Statement::text("hi")]);
        assert_eq!(resolve("*a\nhi\n@wait   \n", "*a"), vec![Statement::text("hi")]);
    }

    #[test]
    fn wait_without_duration_text_keeps_next_token_when_lenient() {
        assert_eq!(
            resolve("*a\nhi\n@wait\n@end\nafter\n", "*a"),
            vec![
                Statement::text("hi"),
                Statement::pause("@end"),
                Statement::text("after"),
            ]
        );
    }

    #[test]
    fn wait_without_duration_text_is_an_error_when_strict() {
        for source in ["*a\nhi\n@wait\n@end\n", "*a\nhi\n@wait"] {
            let error = Parser::new(source, strict())
                .resolve("*a")
                .expect_err("strict should fail");
            assert_eq!(error.code, "PARSE_MALFORMED_WAIT");
            assert_eq!(error.location, Some(SourceLocation { line: 3, column: 1 }));
        }
    }

    #[test]
    fn unknown_commands_and_illegal_characters_are_skipped() {
        let source = "*a\n@music town\nhello\n\0\n@end";
        assert_eq!(
            resolve(source, "*a"),
            vec![Statement::text("town"), Statement::text("hello")]
        );
    }
}
