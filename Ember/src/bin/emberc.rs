use std::io::ErrorKind;
use std::path::Path;
use std::{env, fs, process};

use core::chunk::Chunk;
use core::errors::report_all;

fn main() {
  let args: Vec<String> = env::args().collect();
  let rest = &args[1..];

  let (subcommand, rest) = match rest.first().map(String::as_str) {
    Some("compile") => ("compile", &rest[1..]),
    Some("run") => ("run", &rest[1..]),
    _ => ("compile", rest),
  };

  let mut file: Option<&str> = None;
  let mut out: Option<&str> = None;
  let mut i = 0;
  while i < rest.len() {
    if rest[i] == "-o" {
      out = rest.get(i + 1).map(String::as_str);
      i += 2;
    } else {
      if file.is_none() {
        file = Some(rest[i].as_str());
      }
      i += 1;
    }
  }

  let file = file.unwrap_or_else(|| {
    eprintln!("Usage: emberc [compile|run] <file> [-o <out>]");
    process::exit(64);
  });

  match subcommand {
    "compile" => run_compile(file, out.unwrap_or("a.embc")),
    "run" => run_chunk(file),
    _ => unreachable!(),
  }
}

fn run_compile(file: &str, out: &str) {
  let source = read_source(file);
  let chars: Vec<char> = source.chars().collect();
  let tokens = lexer::Lexer::lex(&chars);
  let (stmts, errors) = parser::Parser::parse(&tokens);
  if !errors.is_empty() {
    report_all(&errors);
    process::exit(65);
  }

  let mut symbols = symbols::SymbolTable::new();
  let chunk = match compiler::Compiler::compile(&stmts, &mut symbols) {
    Ok(c) => c,
    Err(e) => {
      core::errors::report(&e);
      process::exit(65);
    }
  };

  let write_result = fs::File::create(out).and_then(|mut f| {
    if wants_native_embed(out) {
      write_native_stub(&chunk, &mut f)
    } else {
      chunk.write_to(&mut f)
    }
    .map_err(|e| std::io::Error::new(ErrorKind::Other, e.to_string()))
  });

  if let Err(e) = write_result {
    eprintln!("Failed to write '{}': {}.", out, e);
    process::exit(70);
  }
}

fn run_chunk(file: &str) {
  let bytes = match fs::read(file) {
    Ok(b) => b,
    Err(e) => {
      eprintln!("Failed to read '{}': {}.", file, e);
      process::exit(70);
    }
  };

  let chunk = match Chunk::read_from(&mut bytes.as_slice()) {
    Ok(c) => c,
    Err(e) => {
      core::errors::report(&e);
      process::exit(65);
    }
  };

  let mut vm = virtual_machine::VM::new(chunk);
  match vm.run() {
    Ok(()) => process::exit(0),
    Err(e) => {
      core::errors::report(&e);
      process::exit(70);
    }
  }
}

/// The `-o` target wants the "embed into a native executable" path when
/// it has no extension or an explicit `.exe` extension.
fn wants_native_embed(out: &str) -> bool {
  match Path::new(out).extension() {
    None => true,
    Some(ext) => ext == "exe",
  }
}

/// Placeholder for the native-executable-embed path: a real
/// implementation would link a host-provided VM library around the
/// chunk and produce a genuinely self-executing binary. This only
/// records the chunk behind a marker header so the gap is never
/// silently mistaken for a working native build.
fn write_native_stub<W: std::io::Write>(chunk: &Chunk, w: &mut W) -> Result<(), core::errors::EmberError> {
  w.write_all(b"EMBER-NATIVE-STUB\0")
    .map_err(|e| core::errors::EmberError::Io(e.to_string()))?;
  chunk.write_to(w)
}

fn read_source(filename: &str) -> String {
  match fs::read_to_string(filename) {
    Ok(src) => src,
    Err(e) => {
      match e.kind() {
        ErrorKind::NotFound => eprintln!("File '{}' not found.", filename),
        ErrorKind::PermissionDenied => eprintln!("Need permission to open '{}'.", filename),
        _ => eprintln!("Unexpected error when opening file '{}': {}.", filename, e),
      }
      process::exit(e.raw_os_error().unwrap_or(70));
    }
  }
}
