use core::ast::*;
use core::tokens::PunctKind;

use crate::{ParseResult, Parser};

impl<'t> Parser<'t> {
  /// Parses a `var`/`let`/`const` declaration in statement context — the
  /// leading keyword has already been consumed by the caller. All three
  /// keywords are interchangeable; the AST carries no distinction between
  /// them.
  pub(super) fn parse_var_decl(&mut self) -> ParseResult<Stmt> {
    let loc = self.loc();
    let (name, init) = self.parse_var_decl_parts()?;
    self.consume_punct(PunctKind::Semicolon, "Expected ';' after variable declaration.")?;
    Ok(Stmt::VarDecl(name, init, loc))
  }

  /// The `name (= expr)?` body of a declaration, shared between the
  /// statement form (which the caller terminates with `;`) and the
  /// `for`-header form (which has no terminating `;` of its own).
  pub(super) fn parse_var_decl_parts(&mut self) -> ParseResult<(String, Option<Expr>)> {
    let name = self.consume_ident("Expected variable name.")?;

    let init = if self.check_op(core::tokens::OperatorKind::Assign) {
      self.advance();
      Some(self.parse_expr()?)
    } else {
      None
    };

    Ok((name, init))
  }

  /// `function name ( param, param, ... ) block` — the leading keyword has
  /// already been consumed by the caller.
  pub(super) fn parse_function_def(&mut self) -> ParseResult<Stmt> {
    let loc = self.loc();
    let name = self.consume_ident("Expected function name.")?;
    self.consume_punct(PunctKind::LParen, "Expected '(' after function name.")?;

    let mut params = Vec::new();
    if !self.check_punct(PunctKind::RParen) {
      loop {
        params.push(self.consume_ident("Expected parameter name.")?);
        if !self.match_punct(PunctKind::Comma) {
          break;
        }
      }
    }
    self.consume_punct(PunctKind::RParen, "Expected ')' after parameter list.")?;

    let body = Box::new(self.parse_block_stmt()?);
    Ok(Stmt::FunctionDef(name, params, body, loc))
  }
}
