use core::ast::{BinaryOp, Expr, ForInit, LiteralValue, Stmt, UnaryOp};
use core::errors::EmberError;
use core::values::{values_equal, FunctionValue, Value};

use crate::builtins;
use crate::environment::Environment;

fn type_err(msg: impl Into<String>) -> EmberError {
  EmberError::TypeMismatch(msg.into())
}

pub fn eval_program<'ast>(program: &'ast [Stmt], env: &mut Environment<'ast>) -> Result<(), EmberError> {
  for stmt in program {
    eval_stmt(stmt, env)?;
  }
  Ok(())
}

pub fn eval_stmt<'ast>(stmt: &'ast Stmt, env: &mut Environment<'ast>) -> Result<(), EmberError> {
  match stmt {
    Stmt::Expr(e) => {
      eval_expr(e, env)?;
      Ok(())
    }

    Stmt::VarDecl(name, init, _) => {
      let value = match init {
        Some(e) => eval_expr(e, env)?,
        None => Value::Null,
      };
      env.declare(name, value);
      Ok(())
    }

    Stmt::Block(stmts, _) => {
      env.create_child();
      let result = eval_stmt_list(stmts, env);
      env.destroy_child();
      result
    }

    Stmt::If(cond, then_branch, else_branch, _) => {
      if eval_condition(cond, env)? {
        eval_stmt(then_branch, env)
      } else if let Some(eb) = else_branch {
        eval_stmt(eb, env)
      } else {
        Ok(())
      }
    }

    Stmt::While(cond, body, _) => {
      while eval_condition(cond, env)? {
        eval_stmt(body, env)?;
      }
      Ok(())
    }

    Stmt::For(init, cond, incr, body, _) => {
      env.create_child();
      let result = eval_for_loop(init, cond, incr, body, env);
      env.destroy_child();
      result
    }

    Stmt::FunctionDef(name, params, body, _) => {
      let value =
        Value::Function(FunctionValue::UserDefined { name: name.clone(), params: params.clone(), body: body.as_ref() });
      env.declare(name, value);
      Ok(())
    }

    Stmt::Import(path, _) => {
      // Import failures (a missing file, a cycle) are not ordinary
      // evaluation errors: the statements that would have been inlined
      // never run at all, so there is no sensible `Value` to substitute
      // and carry on with. These propagate as hard failures, unlike the
      // type/lookup errors below.
      let canonical = std::fs::canonicalize(path).map(|p| p.to_string_lossy().into_owned()).unwrap_or_else(|_| path.clone());
      if !env.try_begin_import(&canonical) {
        return Err(EmberError::Io(format!("import cycle detected: '{}' is already being imported", path)));
      }

      let source = std::fs::read_to_string(path).map_err(|e| EmberError::Io(e.to_string()))?;
      let chars: Vec<char> = source.chars().collect();
      let tokens = lexer::Lexer::lex(&chars);
      let (stmts, mut errors) = parser::Parser::parse(&tokens);
      if let Some(err) = errors.drain(..).next() {
        return Err(err);
      }
      // The imported program must outlive this call the same way the root
      // program does (a function it defines may be invoked long after the
      // `import` statement runs), so it is leaked rather than freed —
      // acceptable for a script that runs once and exits.
      let leaked: &'static [Stmt] = Box::leak(stmts.into_boxed_slice());
      for s in leaked {
        eval_stmt(s, env)?;
      }
      Ok(())
    }

    Stmt::Switch(..) => Err(type_err("switch statements have no reachable grammar production and cannot be evaluated.")),
  }
}

fn eval_stmt_list<'ast>(stmts: &'ast [Stmt], env: &mut Environment<'ast>) -> Result<(), EmberError> {
  for s in stmts {
    eval_stmt(s, env)?;
  }
  Ok(())
}

fn eval_for_loop<'ast>(
  init: &'ast Option<Box<ForInit>>,
  cond: &'ast Option<Expr>,
  incr: &'ast Option<Expr>,
  body: &'ast Stmt,
  env: &mut Environment<'ast>,
) -> Result<(), EmberError> {
  if let Some(init) = init {
    match &**init {
      ForInit::VarDecl(name, e) => {
        let value = match e {
          Some(e) => eval_expr(e, env)?,
          None => Value::Null,
        };
        env.declare(name, value);
      }
      ForInit::Expr(e) => {
        eval_expr(e, env)?;
      }
    }
  }

  loop {
    let keep_going = match cond {
      Some(c) => eval_condition(c, env)?,
      None => true,
    };
    if !keep_going {
      break;
    }
    eval_stmt(body, env)?;
    if let Some(incr) = incr {
      eval_expr(incr, env)?;
    }
  }
  Ok(())
}

fn require_bool(value: Value) -> Result<bool, EmberError> {
  match value {
    Value::Bool(b) => Ok(b),
    _ => Err(type_err("expected a boolean condition")),
  }
}

/// Evaluates a condition for `if`/`while`/`for`. A non-boolean result is a
/// type error, which — like every other evaluator error — is diagnosed and
/// does not unwind; the condition is treated as false so the statement it
/// guards is simply skipped rather than aborting the whole program. A hard
/// failure from evaluating the condition itself (e.g. a function call whose
/// body hit an import cycle) still propagates.
fn eval_condition<'ast>(expr: &'ast Expr, env: &mut Environment<'ast>) -> Result<bool, EmberError> {
  match eval_expr(expr, env)? {
    Value::Bool(b) => Ok(b),
    _ => {
      core::errors::report(&type_err("expected a boolean condition"));
      Ok(false)
    }
  }
}

/// Evaluates an expression to a `Value`. Per the evaluator's propagation
/// policy, a runtime failure (unbound name, wrong operand kind, divide by
/// zero, out-of-bounds index, call to a non-function) is diagnosed in
/// place and replaced with `Value::Null` rather than unwinding the caller —
/// there is no exception model. `eval_expr_inner` recurses through this
/// function rather than through itself, so every sub-expression is caught
/// and reported independently at the point it actually failed.
pub fn eval_expr<'ast>(expr: &'ast Expr, env: &mut Environment<'ast>) -> Result<Value<'ast>, EmberError> {
  match eval_expr_inner(expr, env) {
    Ok(v) => Ok(v),
    Err(e) if e.is_recoverable_at_runtime() => {
      core::errors::report(&e);
      Ok(Value::Null)
    }
    Err(e) => Err(e),
  }
}

fn eval_expr_inner<'ast>(expr: &'ast Expr, env: &mut Environment<'ast>) -> Result<Value<'ast>, EmberError> {
  match expr {
    Expr::Literal(lit, _) => Ok(match lit {
      LiteralValue::Number(n) => Value::Number(*n),
      LiteralValue::String(s) => Value::Str(s.clone()),
      LiteralValue::Boolean(b) => Value::Bool(*b),
      LiteralValue::Null => Value::Null,
    }),

    Expr::Variable(name, _) => env.get(name).cloned().ok_or_else(|| EmberError::UndefinedVariable(name.clone())),

    Expr::Assignment(name, value, _) => {
      let v = eval_expr(value, env)?;
      env.set(name, v.clone());
      Ok(v)
    }

    Expr::Unary(op, operand, _) => {
      let v = eval_expr(operand, env)?;
      match op {
        UnaryOp::Negate => match v {
          Value::Number(n) => Ok(Value::Number(-n)),
          _ => Err(type_err("unary '-' requires a number")),
        },
        UnaryOp::Not => match v {
          Value::Bool(b) => Ok(Value::Bool(!b)),
          _ => Err(type_err("unary '!' requires a boolean")),
        },
      }
    }

    Expr::Binary(op, lhs, rhs, _) => eval_binary(*op, lhs, rhs, env),

    Expr::Call(name, args, _) => {
      let callee = env.get(name).cloned().ok_or_else(|| EmberError::UndefinedFunction(name.clone()))?;
      let mut values = Vec::with_capacity(args.len());
      for arg in args {
        values.push(eval_expr(arg, env)?);
      }
      match callee {
        Value::Function(FunctionValue::Builtin(id)) => builtins::call(id, &values),
        Value::Function(FunctionValue::UserDefined { params, body, .. }) => {
          env.create_child();
          for (i, param) in params.iter().enumerate() {
            let value = values.get(i).cloned().unwrap_or(Value::Null);
            env.declare(param, value);
          }
          let result = eval_stmt(body, env).map(|_| Value::Null);
          env.destroy_child();
          result
        }
        _ => Err(EmberError::UndefinedFunction(name.clone())),
      }
    }

    Expr::ArrayLiteral(elements, _) => {
      let mut values = Vec::with_capacity(elements.len());
      for e in elements {
        values.push(eval_expr(e, env)?);
      }
      Ok(Value::Array(values))
    }

    Expr::Index(target, index, _) => {
      let target = eval_expr(target, env)?;
      let index = eval_expr(index, env)?;
      let idx = match index {
        Value::Number(n) => n as i64,
        _ => return Err(type_err("index must be a number")),
      };
      match target {
        Value::Array(items) => {
          if idx < 0 || idx as usize >= items.len() {
            return Err(EmberError::IndexOutOfBounds { index: idx, len: items.len() });
          }
          Ok(items[idx as usize].clone())
        }
        _ => Err(type_err("indexing target is not an array")),
      }
    }
  }
}

fn eval_binary<'ast>(op: BinaryOp, lhs: &'ast Expr, rhs: &'ast Expr, env: &mut Environment<'ast>) -> Result<Value<'ast>, EmberError> {
  // Logical operators short-circuit is not required by the data model, but
  // both operands still must be boolean, so there is no benefit to
  // evaluating eagerly versus lazily here; evaluating both keeps this in
  // step with every other binary operator's evaluation order.
  if matches!(op, BinaryOp::And | BinaryOp::Or) {
    let left = require_bool(eval_expr(lhs, env)?)?;
    let right = require_bool(eval_expr(rhs, env)?)?;
    return Ok(Value::Bool(match op {
      BinaryOp::And => left && right,
      BinaryOp::Or => left || right,
      _ => unreachable!(),
    }));
  }

  let left = eval_expr(lhs, env)?;
  let right = eval_expr(rhs, env)?;

  match op {
    BinaryOp::Add => match (&left, &right) {
      (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
      _ => Ok(Value::Str(format!("{}{}", left.to_coerce_string(), right.to_coerce_string()))),
    },
    BinaryOp::Sub => numeric(left, right, |a, b| a - b),
    BinaryOp::Mul => numeric(left, right, |a, b| a * b),
    BinaryOp::Div => numeric_checked(left, right, |a, b| a / b),
    BinaryOp::Mod => numeric_checked(left, right, |a, b| a % b),
    BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
    BinaryOp::NotEq => Ok(Value::Bool(!values_equal(&left, &right))),
    BinaryOp::Less => compare(left, right, |a, b| a < b),
    BinaryOp::Greater => compare(left, right, |a, b| a > b),
    BinaryOp::LessEq => compare(left, right, |a, b| a <= b),
    BinaryOp::GreaterEq => compare(left, right, |a, b| a >= b),
    BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
  }
}

fn numeric<'ast>(left: Value<'ast>, right: Value<'ast>, f: impl Fn(f64, f64) -> f64) -> Result<Value<'ast>, EmberError> {
  match (left, right) {
    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(a, b))),
    _ => Err(type_err("operator requires both operands to be numbers")),
  }
}

fn numeric_checked<'ast>(left: Value<'ast>, right: Value<'ast>, f: impl Fn(f64, f64) -> f64) -> Result<Value<'ast>, EmberError> {
  match (left, right) {
    (Value::Number(_), Value::Number(b)) if b == 0.0 => Err(EmberError::DivideByZero),
    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(a, b))),
    _ => Err(type_err("operator requires both operands to be numbers")),
  }
}

fn compare<'ast>(left: Value<'ast>, right: Value<'ast>, f: impl Fn(f64, f64) -> bool) -> Result<Value<'ast>, EmberError> {
  match (left, right) {
    (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(f(a, b))),
    _ => Err(type_err("comparison operators require both operands to be numbers")),
  }
}
