use core::tokens::{LexErrorKind, Token, TokenKind};

use crate::Lexer;

impl<'a> Lexer<'a> {
  /// Makes a string literal. Escapes (`\n \t \\ \"`) are decoded here, so
  /// the token's lexeme already holds the string's runtime value. Any
  /// other `\X` escape, or running off the end of input before the
  /// closing quote, produces an error token.
  pub(super) fn make_string_token(&mut self) -> Token {
    let mut value = String::new();

    loop {
      if self.is_at_end() {
        return self.make_error_token(LexErrorKind::UnterminatedString);
      }

      let c = self.advance();

      if c == '"' {
        break;
      }

      if c == '\n' {
        return self.make_error_token(LexErrorKind::UnterminatedString);
      }

      if c == '\\' {
        if self.is_at_end() {
          return self.make_error_token(LexErrorKind::UnterminatedString);
        }
        let escaped = self.advance();
        match escaped {
          'n' => value.push('\n'),
          't' => value.push('\t'),
          '\\' => value.push('\\'),
          '"' => value.push('"'),
          other => return self.make_error_token(LexErrorKind::BadEscape(other)),
        }
        continue;
      }

      value.push(c);
    }

    let (line, column) = (self.line, self.token_start - self.line_start + 1);
    Token::new(TokenKind::String, value, line, column)
  }
}
