use std::collections::HashSet;

use core::bytecode::OpCode;
use core::chunk::Chunk;
use core::errors::EmberError;
use symbols::SymbolTable;

mod visitor;

/// One-pass AST-to-bytecode compiler. Walks a statement list exactly once,
/// emitting into a single `Chunk` and allocating variable/function slots in
/// `symbols` as declarations are seen. Holds no state across calls other
/// than the chunk and table it is handed — a fresh `Compiler` is created
/// per compilation unit (and recursively, per `import`).
pub struct Compiler<'s> {
  chunk: Chunk,
  symbols: &'s mut SymbolTable,
  /// Canonicalized paths already inlined by an `import`, so a cycle is
  /// rejected instead of recursing forever.
  imported: HashSet<String>,
}

impl<'s> Compiler<'s> {
  /// Compiles a full program: every statement in order, followed by a
  /// trailing `EOF` that halts the VM.
  pub fn compile(program: &[core::ast::Stmt], symbols: &'s mut SymbolTable) -> Result<Chunk, EmberError> {
    let mut compiler = Compiler { chunk: Chunk::new(), symbols, imported: HashSet::new() };
    for stmt in program {
      compiler.compile_stmt(stmt)?;
    }
    compiler.emit_op(OpCode::Eof);
    Ok(compiler.chunk)
  }

  fn emit_op(&mut self, op: OpCode) {
    self.chunk.push_byte(op.into());
  }

  fn emit_op_u8(&mut self, op: OpCode, operand: u8) {
    self.emit_op(op);
    self.chunk.push_byte(operand);
  }

  /// Emits `op` followed by a two-byte placeholder offset and returns the
  /// index of that placeholder, to be filled in later by `patch_jump`.
  fn emit_jump(&mut self, op: OpCode) -> usize {
    self.emit_op(op);
    self.chunk.push_short(0xFFFF);
    self.chunk.len() - 2
  }

  /// Patches the placeholder at `at` so the jump lands just past the
  /// current end of the chunk.
  fn patch_jump(&mut self, at: usize) {
    let offset = (self.chunk.len() - at - 2) as u16;
    self.chunk.patch_short(at, offset);
  }

  /// Emits a backward `LOOP` back to `loop_start`. The offset is measured
  /// from the byte following the two-byte operand, same as a forward jump,
  /// just subtracted instead of added at execution time.
  fn emit_loop(&mut self, loop_start: usize) {
    self.emit_op(OpCode::Loop);
    let offset = (self.chunk.len() - loop_start + 2) as u16;
    self.chunk.push_short(offset);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use core::bytecode::OpCode;

  fn compile_source(src: &str) -> (Chunk, SymbolTable) {
    let chars: Vec<char> = src.chars().collect();
    let tokens = lexer::Lexer::lex(&chars);
    let (stmts, errors) = parser::Parser::parse(&tokens);
    assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
    let mut symbols = SymbolTable::new();
    let chunk = Compiler::compile(&stmts, &mut symbols).expect("compile failed");
    (chunk, symbols)
  }

  #[test]
  fn var_decl_emits_const_then_store() {
    let (chunk, symbols) = compile_source("var x = 1;");
    assert_eq!(symbols.len(), 1);
    assert_eq!(chunk.code[0], OpCode::LoadConst.into());
    assert_eq!(chunk.code[2], OpCode::StoreVar.into());
    assert_eq!(*chunk.code.last().unwrap(), OpCode::Eof.into());
  }

  #[test]
  fn if_without_else_patches_a_single_forward_jump() {
    let (chunk, _) = compile_source("if (true) { var x = 1; }");
    // LOAD_CONST true, JUMP_IF_FALSE +2, LOAD_CONST 1, STORE_VAR 0, EOF
    assert_eq!(chunk.code[0], OpCode::LoadConst.into());
    assert_eq!(chunk.code[2], OpCode::JumpIfFalse.into());
    let jump_target = chunk.get_short(3);
    // offset is measured from the byte right after the two-byte operand
    let landing = 3 + 2 + jump_target as usize;
    assert_eq!(landing, chunk.len() - 1);
  }

  #[test]
  fn while_loop_emits_a_backward_loop_instruction() {
    let (chunk, _) = compile_source("while (false) { var x = 1; }");
    assert!(chunk.code.contains(&OpCode::Loop.into()));
  }

  #[test]
  fn logical_and_is_rejected_by_the_compiled_backend() {
    let chars: Vec<char> = "var x = true && false;".chars().collect();
    let tokens = lexer::Lexer::lex(&chars);
    let (stmts, errors) = parser::Parser::parse(&tokens);
    assert!(errors.is_empty());
    let mut symbols = SymbolTable::new();
    assert!(Compiler::compile(&stmts, &mut symbols).is_err());
  }

  #[test]
  fn chained_assignment_leaves_a_residual_value_for_the_outer_store() {
    let (chunk, symbols) = compile_source("var a = 0; var b = 0; a = b = 1;");
    assert_eq!(symbols.len(), 2);
    // the trailing expression statement `a = b = 1;` must not leave the
    // stack unbalanced: it should compile to a STORE_VAR for `b`, a
    // LOAD_VAR reload for the nested assignment's value, then a STORE_VAR
    // for `a` with no trailing POP.
    let store_count = chunk.code.iter().filter(|&&b| b == OpCode::StoreVar.into()).count();
    assert_eq!(store_count, 4); // two var decls + two assignments
  }

  #[test]
  fn print_call_compiles_to_the_print_opcode_not_a_call() {
    let (chunk, _) = compile_source("print(1);");
    assert!(chunk.code.contains(&OpCode::Print.into()));
    assert!(!chunk.code.contains(&OpCode::Call.into()));
  }

  #[test]
  fn importing_a_file_that_imports_itself_is_rejected_as_a_cycle() {
    let dir = std::env::temp_dir().join(format!("ember_compiler_import_cycle_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let a_path = dir.join("a.ember");
    std::fs::write(&a_path, format!("import \"{}\";", a_path.to_string_lossy().replace('\\', "\\\\"))).expect("write a.ember");

    let src = format!("import \"{}\";", a_path.to_string_lossy().replace('\\', "\\\\"));
    let chars: Vec<char> = src.chars().collect();
    let tokens = lexer::Lexer::lex(&chars);
    let (stmts, errors) = parser::Parser::parse(&tokens);
    assert!(errors.is_empty());
    let mut symbols = SymbolTable::new();
    assert!(Compiler::compile(&stmts, &mut symbols).is_err());

    let _ = std::fs::remove_dir_all(&dir);
  }
}
