use core::ast::*;
use core::errors::{EmberError, ErrorReport};
use core::tokens::{KeywordKind, OperatorKind, PunctKind, Token, TokenKind};

mod parse_declarations;
mod parse_expressions;
mod parse_statements;

/// Result of a single parse routine.
pub type ParseResult<T> = Result<T, EmberError>;

/// Recursive-descent parser. Holds a single-token lookahead over an owned
/// token slice and builds a `Box`-recursive AST; no arena, no indices.
pub struct Parser<'t> {
  tokens: &'t [Token],
  pos: usize,
  errors: Vec<EmberError>,
}

impl<'t> Parser<'t> {
  /// Parses a full program (always a flat statement list — the "root
  /// block" — rather than a single `block` node, since there is no
  /// enclosing `{ }` at the top level).
  pub fn parse(tokens: &'t [Token]) -> (Vec<Stmt>, Vec<EmberError>) {
    let mut parser = Parser { tokens, pos: 0, errors: Vec::new() };
    let mut stmts = Vec::new();

    while !parser.is_at_end() {
      match parser.parse_stmt() {
        Ok(stmt) => stmts.push(stmt),
        Err(e) => {
          parser.errors.push(e);
          parser.synchronize();
        }
      }
    }

    (stmts, parser.errors)
  }

  fn peek(&self) -> &Token {
    &self.tokens[self.pos]
  }

  fn peek_next(&self) -> Option<&Token> {
    self.tokens.get(self.pos + 1)
  }

  fn previous(&self) -> &Token {
    &self.tokens[self.pos - 1]
  }

  fn is_at_end(&self) -> bool {
    matches!(self.peek().kind, TokenKind::Eof)
  }

  fn advance(&mut self) -> &Token {
    if !self.is_at_end() {
      self.pos += 1;
    }
    self.previous()
  }

  fn loc(&self) -> Loc {
    let t = self.peek();
    Loc { line: t.line, column: t.column }
  }

  fn check_kw(&self, kw: KeywordKind) -> bool {
    matches!(&self.peek().kind, TokenKind::Keyword(k) if *k == kw)
  }

  fn check_op(&self, op: OperatorKind) -> bool {
    matches!(&self.peek().kind, TokenKind::Operator(o) if *o == op)
  }

  fn check_punct(&self, p: PunctKind) -> bool {
    matches!(&self.peek().kind, TokenKind::Punctuation(p2) if *p2 == p)
  }

  fn check_ident(&self) -> bool {
    matches!(self.peek().kind, TokenKind::Identifier)
  }

  fn match_kw(&mut self, kw: KeywordKind) -> bool {
    if self.check_kw(kw) {
      self.advance();
      true
    } else {
      false
    }
  }

  fn match_op(&mut self, op: OperatorKind) -> bool {
    if self.check_op(op) {
      self.advance();
      true
    } else {
      false
    }
  }

  fn match_punct(&mut self, p: PunctKind) -> bool {
    if self.check_punct(p) {
      self.advance();
      true
    } else {
      false
    }
  }

  fn consume_punct(&mut self, p: PunctKind, message: &str) -> ParseResult<()> {
    if self.match_punct(p) {
      Ok(())
    } else {
      Err(self.error_at_current(message))
    }
  }

  fn consume_ident(&mut self, message: &str) -> ParseResult<String> {
    if self.check_ident() {
      Ok(self.advance().lexeme.clone())
    } else {
      Err(self.error_at_current(message))
    }
  }

  fn error_at_current(&self, message: &str) -> EmberError {
    let t = self.peek();
    EmberError::Parse(ErrorReport {
      line: t.line,
      column: t.column,
      lexeme_len: t.lexeme.len(),
      message: message.to_string(),
    })
  }

  /// Skips tokens until a likely statement boundary, so one syntax error
  /// doesn't cascade into a wall of follow-on errors.
  fn synchronize(&mut self) {
    while !self.is_at_end() {
      if self.check_punct(PunctKind::Semicolon) {
        self.advance();
        return;
      }
      if self.check_punct(PunctKind::RBrace) {
        return;
      }
      // `return` is deliberately not in this stop-set: it is not a real
      // statement keyword here (functions fall off the end rather than
      // returning a value), so treating it as a recovery point would
      // leave `synchronize` returning without ever advancing past it.
      if matches!(
        self.peek().kind,
        TokenKind::Keyword(
          KeywordKind::If | KeywordKind::While | KeywordKind::For | KeywordKind::Function | KeywordKind::Var | KeywordKind::Let | KeywordKind::Const
        )
      ) {
        return;
      }
      self.advance();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use lexer::Lexer;

  fn parse(src: &str) -> (Vec<Stmt>, Vec<EmberError>) {
    let chars: Vec<char> = src.chars().collect();
    let tokens = Lexer::lex(&chars);
    Parser::parse(&tokens)
  }

  #[test]
  fn parses_a_variable_declaration_with_initializer() {
    let (stmts, errors) = parse("var x = 1 + 2;");
    assert!(errors.is_empty());
    assert_eq!(stmts.len(), 1);
    assert!(matches!(&stmts[0], Stmt::VarDecl(name, Some(_), _) if name == "x"));
  }

  #[test]
  fn precedence_climbs_multiplication_over_addition() {
    let (stmts, errors) = parse("1 + 2 * 3;");
    assert!(errors.is_empty());
    match &stmts[0] {
      Stmt::Expr(Expr::Binary(BinaryOp::Add, _, right, _)) => {
        assert!(matches!(**right, Expr::Binary(BinaryOp::Mul, ..)));
      }
      other => panic!("expected top-level Add, got {:?}", other),
    }
  }

  #[test]
  fn assignment_is_right_associative_and_rejects_non_variable_targets() {
    let (_, errors) = parse("1 = 2;");
    assert!(!errors.is_empty());
  }

  #[test]
  fn parses_if_else_if_chain() {
    let (stmts, errors) = parse("if (x) { y = 1; } else if (z) { y = 2; } else { y = 3; }");
    assert!(errors.is_empty());
    assert!(matches!(&stmts[0], Stmt::If(_, _, Some(_), _)));
  }

  #[test]
  fn parses_for_loop_with_var_header() {
    let (stmts, errors) = parse("for (var i = 0; i < 10; i = i + 1) { print(i); }");
    assert!(errors.is_empty());
    assert!(matches!(&stmts[0], Stmt::For(Some(_), Some(_), Some(_), _, _)));
  }

  #[test]
  fn indexing_composes_left_to_right() {
    let (stmts, _) = parse("a[0][1];");
    match &stmts[0] {
      Stmt::Expr(Expr::Index(inner, _, _)) => assert!(matches!(**inner, Expr::Index(..))),
      other => panic!("expected nested Index, got {:?}", other),
    }
  }

  #[test]
  fn function_def_and_call_round_trip() {
    let (stmts, errors) = parse("function add(a, b) { print(a + b); }");
    assert!(errors.is_empty());
    assert!(matches!(&stmts[0], Stmt::FunctionDef(name, params, _, _) if name == "add" && params.len() == 2));
  }

  #[test]
  fn syntax_error_recovers_at_next_statement() {
    let (stmts, errors) = parse("var = ; var y = 1;");
    assert!(!errors.is_empty());
    assert!(stmts.iter().any(|s| matches!(s, Stmt::VarDecl(name, _, _) if name == "y")));
  }
}
