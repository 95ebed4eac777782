use core::ast::{BinaryOp, Expr, ForInit, LiteralValue, Stmt, UnaryOp};
use core::bytecode::OpCode;
use core::errors::EmberError;
use core::values::Value;

use crate::Compiler;

impl<'s> Compiler<'s> {
  pub(crate) fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), EmberError> {
    match stmt {
      Stmt::Expr(e) => self.compile_expr_as_statement(e),

      Stmt::VarDecl(name, init, _) => {
        match init {
          Some(e) => self.compile_expr(e)?,
          None => self.emit_const(Value::Null)?,
        }
        let slot = self.symbols.get_or_add(name, false)?;
        self.emit_op_u8(OpCode::StoreVar, slot);
        Ok(())
      }

      Stmt::Block(stmts, _) => {
        for s in stmts {
          self.compile_stmt(s)?;
        }
        Ok(())
      }

      Stmt::If(cond, then_branch, else_branch, _) => {
        self.compile_expr(cond)?;
        let else_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.compile_stmt(then_branch)?;
        let end_jump = self.emit_jump(OpCode::Jump);
        self.patch_jump(else_jump);
        if let Some(eb) = else_branch {
          self.compile_stmt(eb)?;
        }
        self.patch_jump(end_jump);
        Ok(())
      }

      Stmt::While(cond, body, _) => {
        let loop_start = self.chunk.len();
        self.compile_expr(cond)?;
        let exit_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.compile_stmt(body)?;
        self.emit_loop(loop_start);
        self.patch_jump(exit_jump);
        Ok(())
      }

      Stmt::For(init, cond, incr, body, _) => {
        if let Some(init) = init {
          match &**init {
            ForInit::VarDecl(name, e) => {
              match e {
                Some(e) => self.compile_expr(e)?,
                None => self.emit_const(Value::Null)?,
              }
              let slot = self.symbols.get_or_add(name, false)?;
              self.emit_op_u8(OpCode::StoreVar, slot);
            }
            ForInit::Expr(e) => self.compile_expr_as_statement(e)?,
          }
        }

        let loop_start = self.chunk.len();
        match cond {
          Some(c) => self.compile_expr(c)?,
          None => self.emit_const(Value::Bool(true))?,
        }
        let exit_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.compile_stmt(body)?;
        if let Some(incr) = incr {
          self.compile_expr_as_statement(incr)?;
        }
        self.emit_loop(loop_start);
        self.patch_jump(exit_jump);
        Ok(())
      }

      Stmt::FunctionDef(name, _params, _body, _) => {
        // Only the slot is reserved at this point; the compiled backend
        // never calls a user-defined function (only the evaluator does),
        // so there is no body to emit.
        self.symbols.get_or_add(name, true)?;
        Ok(())
      }

      Stmt::Import(path, _) => {
        let canonical = std::fs::canonicalize(path)
          .map(|p| p.to_string_lossy().into_owned())
          .unwrap_or_else(|_| path.clone());
        if !self.imported.insert(canonical) {
          return Err(EmberError::TypeMismatch(format!(
            "import cycle detected: '{}' is already being imported",
            path
          )));
        }

        let source = std::fs::read_to_string(path).map_err(|e| EmberError::Io(e.to_string()))?;
        let chars: Vec<char> = source.chars().collect();
        let tokens = lexer::Lexer::lex(&chars);
        let (stmts, mut errors) = parser::Parser::parse(&tokens);
        if let Some(err) = errors.drain(..).next() {
          return Err(err);
        }
        // Inline the imported program's statements directly, skipping the
        // `EOF` that a standalone `compile` would append for it — an EOF
        // halts the VM, and this import is not the end of the program.
        for s in &stmts {
          self.compile_stmt(s)?;
        }
        Ok(())
      }

      Stmt::Switch(..) => Err(EmberError::TypeMismatch(
        "switch statements have no reachable grammar production and cannot be compiled.".to_string(),
      )),
    }
  }

  /// Compiles `expr` as a standalone statement: the stack must be exactly
  /// as deep afterward as it was before. A root-level assignment already
  /// balances itself (`STORE_VAR` consumes the one value `compile_expr`
  /// would otherwise push), so it skips both the reload `compile_expr`
  /// does for nested assignments and the trailing `POP` every other
  /// expression statement needs.
  fn compile_expr_as_statement(&mut self, expr: &Expr) -> Result<(), EmberError> {
    if let Expr::Assignment(name, value, _) = expr {
      self.compile_expr(value)?;
      let slot = self.symbols.get_or_add(name, false)?;
      self.emit_op_u8(OpCode::StoreVar, slot);
      return Ok(());
    }

    self.compile_expr(expr)?;
    self.emit_op(OpCode::Pop);
    Ok(())
  }

  pub(crate) fn compile_expr(&mut self, expr: &Expr) -> Result<(), EmberError> {
    match expr {
      Expr::Literal(lit, _) => {
        let value = match lit {
          LiteralValue::Number(n) => Value::Number(*n),
          LiteralValue::String(s) => Value::Str(s.clone()),
          LiteralValue::Boolean(b) => Value::Bool(*b),
          LiteralValue::Null => Value::Null,
        };
        self.emit_const(value)
      }

      Expr::Variable(name, _) => {
        let slot = self.symbols.get_or_add(name, false)?;
        self.emit_op_u8(OpCode::LoadVar, slot);
        Ok(())
      }

      Expr::Assignment(name, value, _) => {
        self.compile_expr(value)?;
        let slot = self.symbols.get_or_add(name, false)?;
        self.emit_op_u8(OpCode::StoreVar, slot);
        // Reload so the assignment still has a value as a sub-expression,
        // e.g. the outer `=` in `a = b = 1;`.
        self.emit_op_u8(OpCode::LoadVar, slot);
        Ok(())
      }

      Expr::Unary(op, operand, _) => {
        self.compile_expr(operand)?;
        match op {
          UnaryOp::Negate => self.emit_op(OpCode::Neg),
          UnaryOp::Not => self.emit_op(OpCode::Not),
        }
        Ok(())
      }

      Expr::Binary(op, lhs, rhs, _) => {
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
          return Err(EmberError::TypeMismatch(
            "logical '&&'/'||' are not supported by the bytecode backend; they only run under the tree-walking evaluator.".to_string(),
          ));
        }

        self.compile_expr(lhs)?;
        self.compile_expr(rhs)?;
        let opcode = match op {
          BinaryOp::Add => OpCode::Add,
          BinaryOp::Sub => OpCode::Sub,
          BinaryOp::Mul => OpCode::Mul,
          BinaryOp::Div => OpCode::Div,
          BinaryOp::Mod => OpCode::Mod,
          BinaryOp::Eq => OpCode::Eq,
          BinaryOp::NotEq => OpCode::Neq,
          BinaryOp::Less => OpCode::Lt,
          BinaryOp::Greater => OpCode::Gt,
          BinaryOp::LessEq => OpCode::Lte,
          BinaryOp::GreaterEq => OpCode::Gte,
          BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        };
        self.emit_op(opcode);
        Ok(())
      }

      Expr::ArrayLiteral(elements, _) => {
        // `ARRAY_PUSH`'s own stack effect (pop value, pop array, append,
        // push updated array) already nets to zero per element when the
        // element is compiled directly before it — no `DUP` needed to
        // keep a single array value live across the whole literal.
        self.emit_op(OpCode::NewArray);
        for element in elements {
          self.compile_expr(element)?;
          self.emit_op(OpCode::ArrayPush);
        }
        Ok(())
      }

      Expr::Index(target, index, _) => {
        self.compile_expr(target)?;
        self.compile_expr(index)?;
        self.emit_op(OpCode::GetIndex);
        Ok(())
      }

      Expr::Call(name, args, _) => {
        if name == "print" {
          // Each argument is compiled and printed on its own line; `PRINT`
          // only ever pops a single value off the stack.
          for arg in args {
            self.compile_expr(arg)?;
            self.emit_op(OpCode::Print);
          }
          // A call expression must still leave a value behind for any
          // enclosing expression (e.g. `print(1);` used as a statement,
          // which then gets POPed by `compile_expr_as_statement`).
          self.emit_const(Value::Null)?;
          return Ok(());
        }

        for arg in args {
          self.compile_expr(arg)?;
        }
        let slot = self.symbols.get_or_add(name, true)?;
        self.emit_op(OpCode::Call);
        self.chunk.push_byte(slot);
        self.chunk.push_byte(args.len() as u8);
        // `CALL` is a documented no-op at the VM level (the compiled
        // backend does not support user-defined function calls); leave a
        // null behind so the stack still balances like any other call
        // expression would.
        self.emit_const(Value::Null)?;
        Ok(())
      }
    }
  }

  fn emit_const(&mut self, value: Value<'static>) -> Result<(), EmberError> {
    let idx = self.chunk.add_constant(value)?;
    self.emit_op_u8(OpCode::LoadConst, idx);
    Ok(())
  }
}
