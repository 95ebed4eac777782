use core::ast::Stmt;
use core::errors::EmberError;
use core::values::{BuiltinId, FunctionValue, Value};

mod builtins;
mod environment;
mod eval;

pub use environment::Environment;

const BUILTIN_NAMES: &[&str] = &[
  "print", "floor", "ceil", "sqrt", "pow", "sin", "cos", "tan", "log", "round", "concat", "substring", "to_upper",
  "to_lower", "index_of", "replace",
];

/// Binds every name in the built-in surface to its callable value in the
/// given (normally root) scope.
pub fn register_builtins(env: &mut Environment) {
  for name in BUILTIN_NAMES {
    let id = BuiltinId::lookup(name).expect("BUILTIN_NAMES must stay in sync with BuiltinId::lookup");
    env.declare(name, Value::Function(FunctionValue::Builtin(id)));
  }
}

/// Runs a whole program against a fresh root environment with the built-in
/// surface registered.
pub fn run<'ast>(program: &'ast [Stmt]) -> Result<(), EmberError> {
  let mut env = Environment::create_root();
  register_builtins(&mut env);
  eval::eval_program(program, &mut env)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn run_source(src: &str) -> Environment<'static> {
    let chars: Vec<char> = src.chars().collect();
    let tokens = lexer::Lexer::lex(&chars);
    let (stmts, errors) = parser::Parser::parse(&tokens);
    assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
    let leaked: &'static [Stmt] = Box::leak(stmts.into_boxed_slice());
    let mut env = Environment::create_root();
    register_builtins(&mut env);
    eval::eval_program(leaked, &mut env).expect("eval failed");
    env
  }

  #[test]
  fn arithmetic_and_variables() {
    let env = run_source("var x = 2; var y = 3; var z = x + y * 4;");
    assert!(matches!(env.get("z"), Some(Value::Number(n)) if *n == 14.0));
  }

  #[test]
  fn string_concatenation_coerces_numbers() {
    let env = run_source("var m = \"count: \" + 3;");
    assert!(matches!(env.get("m"), Some(Value::Str(s)) if s == "count: 3.00"));
  }

  #[test]
  fn logical_and_with_a_non_boolean_operand_diagnoses_and_continues() {
    // A type error does not unwind the program: `x` lands on `Value::Null`
    // and evaluation of the rest of the program proceeds normally.
    let env = run_source("var x = 1 && true; var y = 2;");
    assert!(matches!(env.get("x"), Some(Value::Null)));
    assert!(matches!(env.get("y"), Some(Value::Number(n)) if *n == 2.0));
  }

  #[test]
  fn user_defined_function_sees_its_own_parameter_scope() {
    let env = run_source("function inc(x) { x = x + 1; } var before = 1; inc(before);");
    // `before` is untouched: the function parameter `x` is a fresh binding
    // in the call's own scope, not an alias to the caller's argument.
    assert!(matches!(env.get("before"), Some(Value::Number(n)) if *n == 1.0));
  }

  #[test]
  fn array_indexing_round_trips() {
    let env = run_source("var a = [10, 20, 30]; var b = a[2];");
    assert!(matches!(env.get("b"), Some(Value::Number(n)) if *n == 30.0));
  }

  #[test]
  fn for_loop_scope_does_not_leak_the_loop_variable() {
    let env = run_source("for (var i = 0; i < 3; i = i + 1) { var doubled = i * 2; }");
    assert!(env.get("i").is_none());
    assert!(env.get("doubled").is_none());
  }

  #[test]
  fn importing_a_file_that_imports_itself_is_rejected_as_a_cycle() {
    let dir = std::env::temp_dir().join(format!("ember_evaluator_import_cycle_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let a_path = dir.join("a.ember");
    std::fs::write(&a_path, format!("import \"{}\";", a_path.to_string_lossy().replace('\\', "\\\\"))).expect("write a.ember");

    let src = format!("import \"{}\";", a_path.to_string_lossy().replace('\\', "\\\\"));
    let chars: Vec<char> = src.chars().collect();
    let tokens = lexer::Lexer::lex(&chars);
    let (stmts, errors) = parser::Parser::parse(&tokens);
    assert!(errors.is_empty());
    let leaked: &'static [Stmt] = Box::leak(stmts.into_boxed_slice());
    assert!(run(leaked).is_err());

    let _ = std::fs::remove_dir_all(&dir);
  }
}
