use crate::ast::Stmt;

/// The built-in functions registered in the evaluator's root environment.
/// `print` is included here even
/// though the bytecode compiler special-cases `print(...)` into its own
/// `PRINT` opcode rather than a `CALL` — the evaluator still dispatches to
/// it as an ordinary builtin value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinId {
  Print,
  Floor,
  Ceil,
  Sqrt,
  Pow,
  Sin,
  Cos,
  Tan,
  Log,
  Round,
  Concat,
  Substring,
  ToUpper,
  ToLower,
  IndexOf,
  Replace,
}

impl BuiltinId {
  pub fn lookup(name: &str) -> Option<BuiltinId> {
    match name {
      "print" => Some(BuiltinId::Print),
      "floor" => Some(BuiltinId::Floor),
      "ceil" => Some(BuiltinId::Ceil),
      "sqrt" => Some(BuiltinId::Sqrt),
      "pow" => Some(BuiltinId::Pow),
      "sin" => Some(BuiltinId::Sin),
      "cos" => Some(BuiltinId::Cos),
      "tan" => Some(BuiltinId::Tan),
      "log" => Some(BuiltinId::Log),
      "round" => Some(BuiltinId::Round),
      "concat" => Some(BuiltinId::Concat),
      "substring" => Some(BuiltinId::Substring),
      "to_upper" => Some(BuiltinId::ToUpper),
      "to_lower" => Some(BuiltinId::ToLower),
      "index_of" => Some(BuiltinId::IndexOf),
      "replace" => Some(BuiltinId::Replace),
      _ => None,
    }
  }
}

/// A callable Runtime Value. User-defined functions borrow their body
/// straight out of the AST they were declared in — the evaluator never
/// outlives that AST, so the borrow is sound, and it avoids a second owned
/// copy of every function body.
#[derive(Debug, Clone)]
pub enum FunctionValue<'ast> {
  Builtin(BuiltinId),
  UserDefined {
    name: String,
    params: Vec<String>,
    body: &'ast Stmt,
  },
}

/// The tagged runtime value exchanged both as a VM stack operand and as an
/// Environment binding. Deep-copied on every read out of an Environment
/// (`Clone` realizes that directly: cloning a `Str`/`Array` payload always
/// allocates a fresh owned buffer, so no two live Values ever alias).
///
/// The bytecode backend only ever needs `Value<'static>`, since the
/// compiler/VM never construct a `Function(UserDefined)` value (Non-goal:
/// the compiled backend does not support function calls). The evaluator
/// uses `Value<'ast>` tied to the lifetime of the AST it is walking.
#[derive(Debug, Clone)]
pub enum Value<'ast> {
  Number(f64),
  Str(String),
  Bool(bool),
  Null,
  Array(Vec<Value<'ast>>),
  /// Parallel keys/values sequences. Present in the type per the data
  /// model, but only the evaluator path may construct one — nothing in
  /// §4.2's grammar produces object-literal syntax, so this variant has
  /// no constructor in this core; it exists so `kind()`/coercion cover it.
  Object(Vec<String>, Vec<Value<'ast>>),
  Function(FunctionValue<'ast>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
  Number,
  Str,
  Bool,
  Null,
  Array,
  Object,
  Function,
}

impl<'ast> Value<'ast> {
  pub fn kind(&self) -> ValueKind {
    match self {
      Value::Number(_) => ValueKind::Number,
      Value::Str(_) => ValueKind::Str,
      Value::Bool(_) => ValueKind::Bool,
      Value::Null => ValueKind::Null,
      Value::Array(_) => ValueKind::Array,
      Value::Object(..) => ValueKind::Object,
      Value::Function(_) => ValueKind::Function,
    }
  }

  /// Truthiness used by `JUMP_IF_FALSE`/`NOT`/the evaluator's branch
  /// conditions when coercion is allowed: boolean uses its value, number
  /// is false iff zero, null is false, every other kind is true.
  pub fn is_truthy(&self) -> bool {
    match self {
      Value::Bool(b) => *b,
      Value::Number(n) => *n != 0.0,
      Value::Null => false,
      _ => true,
    }
  }

  /// The `%g`-equivalent form used by `print`: integral numbers print
  /// without a fractional part, everything else uses Rust's shortest
  /// round-trippable `Display` form.
  pub fn to_print_string(&self) -> String {
    match self {
      Value::Number(n) => format_number_g(*n),
      Value::Str(s) => s.clone(),
      Value::Bool(b) => b.to_string(),
      Value::Null => "null".to_string(),
      Value::Array(_) => "[array]".to_string(),
      Value::Object(..) => "[object]".to_string(),
      Value::Function(_) => "[function]".to_string(),
    }
  }

  /// The `%.2f`-equivalent coercion used when `+` concatenates a non-string
  /// operand into a string.
  pub fn to_coerce_string(&self) -> String {
    match self {
      Value::Number(n) => format!("{:.2}", n),
      other => other.to_print_string(),
    }
  }
}

fn format_number_g(n: f64) -> String {
  if n.fract() == 0.0 && n.is_finite() {
    format!("{}", n as i64)
  } else {
    format!("{}", n)
  }
}

/// Kind-aware equality for `==`/`!=`. Numeric-vs-numeric uses IEEE
/// ordering, strings compare byte-for-byte, booleans by identity, null
/// equals null. Values of differing kinds are never equal. Array, object,
/// and function values have no defined notion of equality in this core
/// (there is no identity to compare and no structural-equality rule)
/// and always compare unequal, even to themselves.
pub fn values_equal(a: &Value, b: &Value) -> bool {
  match (a, b) {
    (Value::Number(x), Value::Number(y)) => x == y,
    (Value::Str(x), Value::Str(y)) => x == y,
    (Value::Bool(x), Value::Bool(y)) => x == y,
    (Value::Null, Value::Null) => true,
    _ => false,
  }
}
