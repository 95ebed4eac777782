use core::ast::*;
use core::tokens::KeywordKind;
use core::tokens::{PunctKind, TokenKind};

use crate::{ParseResult, Parser};

impl<'t> Parser<'t> {
  /// Dispatches on the current token: `if` / `while` / `for` / `function`
  /// to their dedicated routines, `{` to a block, `var`/`let`/`const` to a
  /// variable declaration, `import` to a file import, otherwise an
  /// expression statement.
  pub(crate) fn parse_stmt(&mut self) -> ParseResult<Stmt> {
    if self.match_kw(KeywordKind::If) {
      return self.parse_if_stmt();
    }
    if self.match_kw(KeywordKind::While) {
      return self.parse_while_stmt();
    }
    if self.match_kw(KeywordKind::For) {
      return self.parse_for_stmt();
    }
    if self.match_kw(KeywordKind::Function) {
      return self.parse_function_def();
    }
    if self.match_kw(KeywordKind::Import) {
      return self.parse_import_stmt();
    }
    if self.check_punct(PunctKind::LBrace) {
      return self.parse_block_stmt();
    }
    if self.check_kw(KeywordKind::Var) || self.check_kw(KeywordKind::Let) || self.check_kw(KeywordKind::Const) {
      self.advance();
      return self.parse_var_decl();
    }

    self.parse_expr_stmt()
  }

  /// `import "path";` — the path is a plain string literal, not a general
  /// expression; nothing is bound to a name, the imported file's
  /// statements are inlined as-is by the compiler/evaluator.
  fn parse_import_stmt(&mut self) -> ParseResult<Stmt> {
    let loc = self.loc();
    let path = match self.peek().kind {
      TokenKind::String => self.advance().lexeme.clone(),
      _ => return Err(self.error_at_current("Expected a string literal after 'import'.")),
    };
    self.consume_punct(PunctKind::Semicolon, "Expected ';' after import path.")?;
    Ok(Stmt::Import(path, loc))
  }

  pub(crate) fn parse_block_stmt(&mut self) -> ParseResult<Stmt> {
    let loc = self.loc();
    self.consume_punct(PunctKind::LBrace, "Expected '{'.")?;
    let stmts = self.parse_block_body()?;
    Ok(Stmt::Block(stmts, loc))
  }

  fn parse_block_body(&mut self) -> ParseResult<Vec<Stmt>> {
    let mut stmts = Vec::new();

    while !self.check_punct(PunctKind::RBrace) && !self.is_at_end() {
      stmts.push(self.parse_stmt()?);
    }

    self.consume_punct(PunctKind::RBrace, "Expected '}' to close block.")?;
    Ok(stmts)
  }

  fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
    let loc = self.loc();
    self.consume_punct(PunctKind::LParen, "Expected '(' after 'if'.")?;
    let cond = self.parse_expr()?;
    self.consume_punct(PunctKind::RParen, "Expected ')' after if condition.")?;
    let then_branch = Box::new(self.parse_block_stmt()?);

    let else_branch = if self.match_kw(KeywordKind::Else) {
      if self.check_kw(KeywordKind::If) {
        self.advance();
        Some(Box::new(self.parse_if_stmt()?))
      } else {
        Some(Box::new(self.parse_block_stmt()?))
      }
    } else {
      None
    };

    Ok(Stmt::If(cond, then_branch, else_branch, loc))
  }

  fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
    let loc = self.loc();
    self.consume_punct(PunctKind::LParen, "Expected '(' after 'while'.")?;
    let cond = self.parse_expr()?;
    self.consume_punct(PunctKind::RParen, "Expected ')' after while condition.")?;
    let body = Box::new(self.parse_block_stmt()?);
    Ok(Stmt::While(cond, body, loc))
  }

  fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
    let loc = self.loc();
    self.consume_punct(PunctKind::LParen, "Expected '(' after 'for'.")?;

    let init = if self.match_punct(PunctKind::Semicolon) {
      None
    } else {
      let head = if self.check_kw(KeywordKind::Var) || self.check_kw(KeywordKind::Let) || self.check_kw(KeywordKind::Const)
      {
        self.advance();
        let (name, init_expr) = self.parse_var_decl_parts()?;
        ForInit::VarDecl(name, init_expr)
      } else {
        ForInit::Expr(self.parse_expr()?)
      };

      self.consume_punct(PunctKind::Semicolon, "Expected ';' after for-loop initializer.")?;
      Some(Box::new(head))
    };

    let cond = if self.check_punct(PunctKind::Semicolon) {
      None
    } else {
      Some(self.parse_expr()?)
    };
    self.consume_punct(PunctKind::Semicolon, "Expected ';' after for-loop condition.")?;

    let incr = if self.check_punct(PunctKind::RParen) {
      None
    } else {
      Some(self.parse_expr()?)
    };
    self.consume_punct(PunctKind::RParen, "Expected ')' after for-loop clauses.")?;

    let body = Box::new(self.parse_block_stmt()?);
    Ok(Stmt::For(init, cond, incr, body, loc))
  }

  fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
    let expr = self.parse_expr()?;
    self.consume_punct(PunctKind::Semicolon, "Expected ';' after expression.")?;
    Ok(Stmt::Expr(expr))
  }
}
