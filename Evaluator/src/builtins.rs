use core::errors::EmberError;
use core::values::{BuiltinId, Value};

fn type_err(msg: &str) -> EmberError {
  EmberError::TypeMismatch(msg.to_string())
}

fn as_number(v: &Value) -> Result<f64, EmberError> {
  match v {
    Value::Number(n) => Ok(*n),
    _ => Err(type_err("expected a number argument")),
  }
}

fn as_str<'a, 'ast>(v: &'a Value<'ast>) -> Result<&'a str, EmberError> {
  match v {
    Value::Str(s) => Ok(s.as_str()),
    _ => Err(type_err("expected a string argument")),
  }
}

/// Dispatches a call to one of the names registered in the root
/// environment at startup. Every builtin fails with `TypeMismatch` on a
/// wrong argument count or kind, per the documented built-in surface.
pub fn call<'ast>(id: BuiltinId, args: &[Value<'ast>]) -> Result<Value<'ast>, EmberError> {
  match id {
    BuiltinId::Print => {
      let mut out = String::new();
      for arg in args {
        out.push_str(&arg.to_print_string());
      }
      println!("{}", out);
      Ok(Value::Null)
    }

    BuiltinId::Floor => Ok(Value::Number(one_number(args)?.floor())),
    BuiltinId::Ceil => Ok(Value::Number(one_number(args)?.ceil())),
    BuiltinId::Sqrt => Ok(Value::Number(one_number(args)?.sqrt())),
    BuiltinId::Sin => Ok(Value::Number(one_number(args)?.sin())),
    BuiltinId::Cos => Ok(Value::Number(one_number(args)?.cos())),
    BuiltinId::Tan => Ok(Value::Number(one_number(args)?.tan())),
    BuiltinId::Log => Ok(Value::Number(one_number(args)?.ln())),
    BuiltinId::Round => Ok(Value::Number(one_number(args)?.round())),

    BuiltinId::Pow => {
      if args.len() != 2 {
        return Err(type_err("pow expects exactly 2 arguments"));
      }
      Ok(Value::Number(as_number(&args[0])?.powf(as_number(&args[1])?)))
    }

    BuiltinId::Concat => {
      if args.is_empty() {
        return Err(type_err("concat expects at least 1 argument"));
      }
      let mut out = String::new();
      for arg in args {
        out.push_str(as_str(arg)?);
      }
      Ok(Value::Str(out))
    }

    BuiltinId::Substring => {
      if args.len() != 3 {
        return Err(type_err("substring expects exactly 3 arguments (string, start, end)"));
      }
      let s = as_str(&args[0])?;
      let chars: Vec<char> = s.chars().collect();
      let start = as_number(&args[1])? as i64;
      let end = as_number(&args[2])? as i64;
      if start < 0 || end < start || end as usize > chars.len() {
        return Err(EmberError::IndexOutOfBounds { index: end, len: chars.len() });
      }
      Ok(Value::Str(chars[start as usize..end as usize].iter().collect()))
    }

    BuiltinId::ToUpper => Ok(Value::Str(one_str(args)?.to_uppercase())),
    BuiltinId::ToLower => Ok(Value::Str(one_str(args)?.to_lowercase())),

    BuiltinId::IndexOf => {
      if args.len() != 2 {
        return Err(type_err("index_of expects exactly 2 arguments (string, substring)"));
      }
      let haystack = as_str(&args[0])?;
      let needle = as_str(&args[1])?;
      match haystack.find(needle) {
        Some(byte_idx) => Ok(Value::Number(haystack[..byte_idx].chars().count() as f64)),
        None => Ok(Value::Number(-1.0)),
      }
    }

    BuiltinId::Replace => {
      if args.len() != 3 {
        return Err(type_err("replace expects exactly 3 arguments (string, from, to)"));
      }
      let s = as_str(&args[0])?;
      let from = as_str(&args[1])?;
      let to = as_str(&args[2])?;
      Ok(Value::Str(s.replace(from, to)))
    }
  }
}

fn one_number(args: &[Value]) -> Result<f64, EmberError> {
  if args.len() != 1 {
    return Err(type_err("expected exactly 1 numeric argument"));
  }
  as_number(&args[0])
}

fn one_str<'a, 'ast>(args: &'a [Value<'ast>]) -> Result<&'a str, EmberError> {
  if args.len() != 1 {
    return Err(type_err("expected exactly 1 string argument"));
  }
  as_str(&args[0])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn index_of_counts_characters_not_bytes() {
    let args = vec![Value::Str("héllo".to_string()), Value::Str("llo".to_string())];
    let result = call(BuiltinId::IndexOf, &args).unwrap();
    assert!(matches!(result, Value::Number(n) if n == 2.0));
  }

  #[test]
  fn substring_rejects_an_out_of_range_end() {
    let args = vec![Value::Str("hi".to_string()), Value::Number(0.0), Value::Number(5.0)];
    assert!(matches!(call(BuiltinId::Substring, &args), Err(EmberError::IndexOutOfBounds { .. })));
  }

  #[test]
  fn pow_requires_two_numbers() {
    let args = vec![Value::Number(2.0), Value::Str("x".to_string())];
    assert!(call(BuiltinId::Pow, &args).is_err());
  }
}
