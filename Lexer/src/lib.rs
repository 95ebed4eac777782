use core::tokens::{KeywordKind, OperatorKind, PunctKind, Token, TokenKind};

mod lex_numbers;
mod lex_strings;

#[macro_export]
macro_rules! char_is_ident_start {
  ($ch:expr) => {{
    $ch.is_alphabetic() || $ch == '_'
  }};
}

/// Character-stream scanner. Converts source text into a flat list of
/// tokens in one pass; never panics — unrecognized input becomes an
/// `Error` token that the parser turns into a diagnostic.
pub struct Lexer<'a> {
  source: &'a [char],
  current: usize,
  line: usize,
  /// Offset of the first character of the line currently being scanned.
  line_start: usize,
  /// Offset of the first character of the token being built.
  token_start: usize,
}

impl<'a> Lexer<'a> {
  /// Binds a read-only character stream and lexes it to completion.
  pub fn lex(source: &[char]) -> Vec<Token> {
    let mut lexer = Lexer {
      source,
      current: 0,
      line: 1,
      line_start: 0,
      token_start: 0,
    };

    let mut tokens = Vec::new();
    loop {
      let tok = lexer.next_token();
      let is_eof = tok.kind == TokenKind::Eof;
      tokens.push(tok);
      if is_eof {
        break;
      }
    }
    tokens
  }

  /// Returns the next token in the stream, skipping whitespace and
  /// comments first.
  pub fn next_token(&mut self) -> Token {
    self.skip_whitespace();
    self.token_start = self.current;

    if self.is_at_end() {
      return self.make_token(TokenKind::Eof);
    }

    let c = self.advance();

    if char_is_ident_start!(c) {
      return self.make_identifier_token();
    }
    if c.is_ascii_digit() {
      return self.make_numeric_token();
    }
    if c == '"' {
      return self.make_string_token();
    }

    use OperatorKind::*;
    use PunctKind::*;

    match c {
      '+' => self.make_token(TokenKind::Operator(Plus)),
      '-' => self.make_token(TokenKind::Operator(Minus)),
      '*' => self.make_token(TokenKind::Operator(Star)),
      '/' => self.make_token(TokenKind::Operator(Slash)),
      '%' => self.make_token(TokenKind::Operator(Percent)),
      '=' if self.matches('=') => self.make_token(TokenKind::Operator(EqEq)),
      '=' => self.make_token(TokenKind::Operator(Assign)),
      '!' if self.matches('=') => self.make_token(TokenKind::Operator(NotEq)),
      '!' => self.make_token(TokenKind::Operator(Bang)),
      '<' if self.matches('=') => self.make_token(TokenKind::Operator(LessEq)),
      '<' => self.make_token(TokenKind::Operator(Less)),
      '>' if self.matches('=') => self.make_token(TokenKind::Operator(GreaterEq)),
      '>' => self.make_token(TokenKind::Operator(Greater)),
      '&' if self.matches('&') => self.make_token(TokenKind::Operator(AndAnd)),
      '|' if self.matches('|') => self.make_token(TokenKind::Operator(OrOr)),
      '(' => self.make_token(TokenKind::Punctuation(LParen)),
      ')' => self.make_token(TokenKind::Punctuation(RParen)),
      '{' => self.make_token(TokenKind::Punctuation(LBrace)),
      '}' => self.make_token(TokenKind::Punctuation(RBrace)),
      '[' => self.make_token(TokenKind::Punctuation(LBracket)),
      ']' => self.make_token(TokenKind::Punctuation(RBracket)),
      ',' => self.make_token(TokenKind::Punctuation(Comma)),
      ';' => self.make_token(TokenKind::Punctuation(Semicolon)),
      '.' => self.make_token(TokenKind::Punctuation(Dot)),
      other => self.make_error_token(core::tokens::LexErrorKind::UnexpectedChar(other)),
    }
  }

  fn get_previous(&self) -> char {
    self.source[self.current - 1]
  }

  fn get_current(&self) -> char {
    if self.is_at_end() {
      '\0'
    } else {
      self.source[self.current]
    }
  }

  fn get_next(&self) -> char {
    if self.current + 1 >= self.source.len() {
      '\0'
    } else {
      self.source[self.current + 1]
    }
  }

  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn matches(&mut self, expected: char) -> bool {
    if self.is_at_end() || self.get_current() != expected {
      return false;
    }
    self.current += 1;
    true
  }

  fn advance(&mut self) -> char {
    self.current += 1;
    self.get_previous()
  }

  fn skip_whitespace(&mut self) {
    loop {
      if self.is_at_end() {
        break;
      }

      match self.get_current() {
        ' ' | '\r' | '\t' => {
          self.current += 1;
        }
        '\n' => {
          self.line += 1;
          self.current += 1;
          self.line_start = self.current;
        }
        '/' if self.get_next() == '/' => {
          while !self.is_at_end() && self.get_current() != '\n' {
            self.current += 1;
          }
        }
        '/' if self.get_next() == '*' => {
          self.current += 2;
          while !self.is_at_end() && !(self.get_current() == '*' && self.get_next() == '/') {
            if self.get_current() == '\n' {
              self.line += 1;
              self.line_start = self.current + 1;
            }
            self.current += 1;
          }
          if !self.is_at_end() {
            self.current += 2;
          }
        }
        _ => break,
      }
    }
  }

  fn make_identifier_token(&mut self) -> Token {
    while !self.is_at_end() && (self.get_current().is_alphanumeric() || self.get_current() == '_') {
      self.advance();
    }

    let lexeme: String = self.source[self.token_start..self.current].iter().collect();
    let kind = if let Some(kw) = KeywordKind::lookup(&lexeme) {
      TokenKind::Keyword(kw)
    } else {
      match lexeme.as_str() {
        "true" => TokenKind::Boolean(true),
        "false" => TokenKind::Boolean(false),
        "null" => TokenKind::Null,
        _ => TokenKind::Identifier,
      }
    };

    Token::new(kind, lexeme, self.line, self.token_start - self.line_start + 1)
  }

  fn make_token(&self, kind: TokenKind) -> Token {
    let lexeme: String = self.source[self.token_start..self.current].iter().collect();
    Token::new(kind, lexeme, self.line, self.token_start - self.line_start + 1)
  }

  fn make_error_token(&mut self, err: core::tokens::LexErrorKind) -> Token {
    let lexeme: String = self.source[self.token_start..self.current].iter().collect();
    Token::new(TokenKind::Error(err), lexeme, self.line, self.token_start - self.line_start + 1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lex(src: &str) -> Vec<TokenKind> {
    let chars: Vec<char> = src.chars().collect();
    Lexer::lex(&chars).into_iter().map(|t| t.kind).collect()
  }

  #[test]
  fn recognizes_keywords_and_identifiers() {
    let kinds = lex("var x if notakeyword");
    assert_eq!(
      kinds,
      vec![
        TokenKind::Keyword(KeywordKind::Var),
        TokenKind::Identifier,
        TokenKind::Keyword(KeywordKind::If),
        TokenKind::Identifier,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn recognizes_multi_char_operators_before_their_prefixes() {
    let kinds = lex("== != <= >= && ||");
    assert_eq!(
      kinds,
      vec![
        TokenKind::Operator(OperatorKind::EqEq),
        TokenKind::Operator(OperatorKind::NotEq),
        TokenKind::Operator(OperatorKind::LessEq),
        TokenKind::Operator(OperatorKind::GreaterEq),
        TokenKind::Operator(OperatorKind::AndAnd),
        TokenKind::Operator(OperatorKind::OrOr),
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn decodes_string_escapes() {
    let chars: Vec<char> = r#""a\nb\t\"c\\""#.chars().collect();
    let tokens = Lexer::lex(&chars);
    assert_eq!(tokens[0].lexeme, "a\nb\t\"c\\");
  }

  #[test]
  fn unterminated_string_is_an_error_token() {
    let chars: Vec<char> = "\"abc".chars().collect();
    let tokens = Lexer::lex(&chars);
    assert!(matches!(tokens[0].kind, TokenKind::Error(core::tokens::LexErrorKind::UnterminatedString)));
  }

  #[test]
  fn skips_comments() {
    let kinds = lex("var x // trailing\n/* block */ = 1;");
    assert_eq!(
      kinds,
      vec![
        TokenKind::Keyword(KeywordKind::Var),
        TokenKind::Identifier,
        TokenKind::Operator(OperatorKind::Assign),
        TokenKind::Number,
        TokenKind::Punctuation(PunctKind::Semicolon),
        TokenKind::Eof,
      ]
    );
  }
}
