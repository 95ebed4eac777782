use core::ast::*;
use core::errors::{EmberError, ErrorReport};
use core::tokens::{OperatorKind, PunctKind, TokenKind};
use core::utils::parse_number_lexeme;

use crate::{ParseResult, Parser};

impl<'t> Parser<'t> {
  /// Parses a general expression. Precedence climb bottoms out here and
  /// the other `parse_*` functions below, lowest to highest.
  pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
    self.parse_assignment()
  }

  /// `=` — right-associative, only legal when the left side is a variable
  /// reference.
  fn parse_assignment(&mut self) -> ParseResult<Expr> {
    let target = self.parse_or()?;

    if self.check_op(OperatorKind::Assign) {
      let eq_loc = self.loc();
      self.advance();
      let value = self.parse_assignment()?;

      return match target {
        Expr::Variable(name, loc) => Ok(Expr::Assignment(name, Box::new(value), loc)),
        _ => Err(EmberError::Parse(ErrorReport {
          line: eq_loc.line,
          column: eq_loc.column,
          lexeme_len: 1,
          message: "Invalid assignment target.".to_string(),
        })),
      };
    }

    Ok(target)
  }

  fn parse_or(&mut self) -> ParseResult<Expr> {
    let mut left = self.parse_and()?;

    while self.check_op(OperatorKind::OrOr) {
      self.advance();
      let right = self.parse_and()?;
      let loc = left.loc();
      left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right), loc);
    }

    Ok(left)
  }

  fn parse_and(&mut self) -> ParseResult<Expr> {
    let mut left = self.parse_equality()?;

    while self.check_op(OperatorKind::AndAnd) {
      self.advance();
      let right = self.parse_equality()?;
      let loc = left.loc();
      left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right), loc);
    }

    Ok(left)
  }

  fn parse_equality(&mut self) -> ParseResult<Expr> {
    let mut left = self.parse_relational()?;

    loop {
      let op = if self.check_op(OperatorKind::EqEq) {
        BinaryOp::Eq
      } else if self.check_op(OperatorKind::NotEq) {
        BinaryOp::NotEq
      } else {
        break;
      };

      self.advance();
      let right = self.parse_relational()?;
      let loc = left.loc();
      left = Expr::Binary(op, Box::new(left), Box::new(right), loc);
    }

    Ok(left)
  }

  fn parse_relational(&mut self) -> ParseResult<Expr> {
    let mut left = self.parse_term()?;

    loop {
      let op = if self.check_op(OperatorKind::Less) {
        BinaryOp::Less
      } else if self.check_op(OperatorKind::LessEq) {
        BinaryOp::LessEq
      } else if self.check_op(OperatorKind::Greater) {
        BinaryOp::Greater
      } else if self.check_op(OperatorKind::GreaterEq) {
        BinaryOp::GreaterEq
      } else {
        break;
      };

      self.advance();
      let right = self.parse_term()?;
      let loc = left.loc();
      left = Expr::Binary(op, Box::new(left), Box::new(right), loc);
    }

    Ok(left)
  }

  fn parse_term(&mut self) -> ParseResult<Expr> {
    let mut left = self.parse_factor()?;

    loop {
      let op = if self.check_op(OperatorKind::Plus) {
        BinaryOp::Add
      } else if self.check_op(OperatorKind::Minus) {
        BinaryOp::Sub
      } else {
        break;
      };

      self.advance();
      let right = self.parse_factor()?;
      let loc = left.loc();
      left = Expr::Binary(op, Box::new(left), Box::new(right), loc);
    }

    Ok(left)
  }

  fn parse_factor(&mut self) -> ParseResult<Expr> {
    let mut left = self.parse_unary()?;

    loop {
      let op = if self.check_op(OperatorKind::Star) {
        BinaryOp::Mul
      } else if self.check_op(OperatorKind::Slash) {
        BinaryOp::Div
      } else if self.check_op(OperatorKind::Percent) {
        BinaryOp::Mod
      } else {
        break;
      };

      self.advance();
      let right = self.parse_unary()?;
      let loc = left.loc();
      left = Expr::Binary(op, Box::new(left), Box::new(right), loc);
    }

    Ok(left)
  }

  fn parse_unary(&mut self) -> ParseResult<Expr> {
    if self.check_op(OperatorKind::Minus) {
      let loc = self.loc();
      self.advance();
      let operand = self.parse_unary()?;
      return Ok(Expr::Unary(UnaryOp::Negate, Box::new(operand), loc));
    }

    if self.check_op(OperatorKind::Bang) {
      let loc = self.loc();
      self.advance();
      let operand = self.parse_unary()?;
      return Ok(Expr::Unary(UnaryOp::Not, Box::new(operand), loc));
    }

    self.parse_primary()
  }

  /// Literal, variable, function call, array literal, parenthesized
  /// sub-expression — then zero or more `[ e ]` index suffixes applied
  /// left-to-right.
  fn parse_primary(&mut self) -> ParseResult<Expr> {
    let loc = self.loc();

    let mut expr = match self.peek().kind.clone() {
      TokenKind::Number => {
        let lexeme = self.advance().lexeme.clone();
        let n = parse_number_lexeme(&lexeme).map_err(|_| {
          EmberError::Parse(ErrorReport {
            line: loc.line,
            column: loc.column,
            lexeme_len: lexeme.len(),
            message: format!("Invalid number literal '{}'.", lexeme),
          })
        })?;
        Expr::Literal(LiteralValue::Number(n), loc)
      }
      TokenKind::String => {
        let s = self.advance().lexeme.clone();
        Expr::Literal(LiteralValue::String(s), loc)
      }
      TokenKind::Boolean(b) => {
        self.advance();
        Expr::Literal(LiteralValue::Boolean(b), loc)
      }
      TokenKind::Null => {
        self.advance();
        Expr::Literal(LiteralValue::Null, loc)
      }
      TokenKind::Identifier => {
        let name = self.advance().lexeme.clone();

        if self.check_punct(PunctKind::LParen) {
          self.advance();
          let args = self.parse_call_args()?;
          Expr::Call(name, args, loc)
        } else {
          Expr::Variable(name, loc)
        }
      }
      TokenKind::Punctuation(PunctKind::LBracket) => {
        self.advance();
        self.parse_array_literal(loc)?
      }
      TokenKind::Punctuation(PunctKind::LParen) => {
        self.advance();
        let inner = self.parse_expr()?;
        self.consume_punct(PunctKind::RParen, "Expected ')' after expression.")?;
        inner
      }
      TokenKind::Error(kind) => {
        let lexeme_len = self.advance().lexeme.len();
        return Err(EmberError::Lex(ErrorReport { line: loc.line, column: loc.column, lexeme_len, message: kind.message() }));
      }
      _ => return Err(self.error_at_current("Expected expression.")),
    };

    while self.check_punct(PunctKind::LBracket) {
      let idx_loc = self.loc();
      self.advance();
      let index = self.parse_expr()?;
      self.consume_punct(PunctKind::RBracket, "Expected ']' after index expression.")?;
      expr = Expr::Index(Box::new(expr), Box::new(index), idx_loc);
    }

    Ok(expr)
  }

  fn parse_call_args(&mut self) -> ParseResult<Vec<Expr>> {
    let mut args = Vec::new();

    if self.check_punct(PunctKind::RParen) {
      self.advance();
      return Ok(args);
    }

    loop {
      args.push(self.parse_expr()?);

      if !self.match_punct(PunctKind::Comma) {
        break;
      }
    }

    self.consume_punct(PunctKind::RParen, "Expected ')' after argument list.")?;
    Ok(args)
  }

  fn parse_array_literal(&mut self, loc: Loc) -> ParseResult<Expr> {
    let mut elements = Vec::new();

    if self.check_punct(PunctKind::RBracket) {
      self.advance();
      return Ok(Expr::ArrayLiteral(elements, loc));
    }

    loop {
      elements.push(self.parse_expr()?);

      if !self.match_punct(PunctKind::Comma) {
        break;
      }
      if self.check_punct(PunctKind::RBracket) {
        break;
      }
    }

    self.consume_punct(PunctKind::RBracket, "Expected ']' after array literal.")?;
    Ok(Expr::ArrayLiteral(elements, loc))
  }
}
