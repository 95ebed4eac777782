use std::num::ParseFloatError;

/// Parses a number literal's lexeme (one-or-more digits, optionally a
/// single `.`) into the `f64` that backs every Runtime Value number.
pub fn parse_number_lexeme(lexeme: &str) -> Result<f64, ParseFloatError> {
  lexeme.parse::<f64>()
}
