use core::tokens::{Token, TokenKind};

use crate::Lexer;

impl<'a> Lexer<'a> {
  /// Makes a numeric literal: one-or-more digits, optionally containing a
  /// single `.` (no hex/octal/binary/scientific forms in
  /// this core).
  pub(super) fn make_numeric_token(&mut self) -> Token {
    while !self.is_at_end() && self.get_current().is_ascii_digit() {
      self.advance();
    }

    if self.get_current() == '.' && self.get_next().is_ascii_digit() {
      self.advance();
      while !self.is_at_end() && self.get_current().is_ascii_digit() {
        self.advance();
      }
    }

    self.make_token(TokenKind::Number)
  }
}
