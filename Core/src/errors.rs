use std::fmt;

/// A located diagnostic, shared by the lexer and the parser. Shape mirrors
/// what a recursive-descent parser accumulates at each failure point: the
/// line/column of the offending token, how long its lexeme is (so a caller
/// can underline it in a source snippet), and a human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
  pub line: usize,
  pub column: usize,
  pub lexeme_len: usize,
  pub message: String,
}

/// The failure taxonomy surfaced by the core.
#[derive(Debug, Clone, PartialEq)]
pub enum EmberError {
  Lex(ErrorReport),
  Parse(ErrorReport),
  TypeMismatch(String),
  DivideByZero,
  UndefinedVariable(String),
  UndefinedFunction(String),
  IndexOutOfBounds { index: i64, len: usize },
  StackOverflow,
  StackUnderflow,
  UnknownOpcode(u8),
  Io(String),
}

impl fmt::Display for EmberError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EmberError::Lex(r) => write!(f, "LexError at [{}:{}]: {}", r.line, r.column, r.message),
      EmberError::Parse(r) => write!(f, "ParseError at [{}:{}]: {}", r.line, r.column, r.message),
      EmberError::TypeMismatch(msg) => write!(f, "TypeMismatch: {}", msg),
      EmberError::DivideByZero => write!(f, "DivideByZero: division or modulo by zero."),
      EmberError::UndefinedVariable(name) => write!(f, "UndefinedVariable: '{}' is not defined.", name),
      EmberError::UndefinedFunction(name) => write!(f, "UndefinedFunction: '{}' is not a function.", name),
      EmberError::IndexOutOfBounds { index, len } => {
        write!(f, "IndexOutOfBounds: index {} out of bounds for length {}.", index, len)
      }
      EmberError::StackOverflow => write!(f, "StackOverflow: operand stack exceeded capacity."),
      EmberError::StackUnderflow => write!(f, "StackUnderflow: popped an empty operand stack."),
      EmberError::UnknownOpcode(op) => write!(f, "UnknownOpcode: byte {:#04x} is not a valid opcode.", op),
      EmberError::Io(msg) => write!(f, "IoError: {}", msg),
    }
  }
}

impl EmberError {
  /// True for the runtime failure kinds the evaluator is expected to
  /// diagnose and paper over with a null value rather than unwind (wrong
  /// operand kind, an unbound name, a bad index, division by zero). False
  /// for everything that genuinely can't be papered over — a file that
  /// couldn't be read, an import cycle, a lex/parse failure surfacing from
  /// an imported file, or a VM-level fault — which should keep propagating.
  pub fn is_recoverable_at_runtime(&self) -> bool {
    matches!(
      self,
      EmberError::TypeMismatch(_)
        | EmberError::DivideByZero
        | EmberError::UndefinedVariable(_)
        | EmberError::UndefinedFunction(_)
        | EmberError::IndexOutOfBounds { .. }
    )
  }
}

impl std::error::Error for EmberError {}

/// Prints a diagnostic to stderr in a colored `<Kind>: <message>` style.
pub fn report(err: &EmberError) {
  eprintln!("\x1b[31;1m{}\x1b[0m", err);
}

/// Prints every diagnostic in a multi-error parse recovery batch.
pub fn report_all(errs: &[EmberError]) {
  for e in errs {
    report(e);
  }
}
