use std::io::ErrorKind;
use std::{env, fs, process};

use core::errors::report_all;

fn main() {
  let args: Vec<String> = env::args().collect();

  let filename = match args.as_slice() {
    [_, file] => file,
    _ => {
      eprintln!("Usage: ember <script_file>");
      process::exit(64);
    }
  };

  let source = read_source(filename);

  let chars: Vec<char> = source.chars().collect();
  let tokens = lexer::Lexer::lex(&chars);
  let (stmts, errors) = parser::Parser::parse(&tokens);
  if !errors.is_empty() {
    report_all(&errors);
    process::exit(65);
  }

  match evaluator::run(&stmts) {
    Ok(()) => process::exit(0),
    Err(e) => {
      core::errors::report(&e);
      process::exit(70);
    }
  }
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
