use std::io::{self, Read, Write};

use crate::errors::EmberError;
use crate::values::Value;

const TAG_NUMBER: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_NULL: u8 = 2;
const TAG_STR: u8 = 3;

/// A self-contained unit of bytecode: a flat instruction stream plus the
/// constant pool it indexes into. `constants` only ever holds
/// Number/Str/Bool/Null values — the compiler never emits an Array,
/// Object, or Function as a literal constant — which is what makes this
/// type serializable in full.
#[derive(Debug, Default, Clone)]
pub struct Chunk {
  pub code: Vec<u8>,
  pub constants: Vec<Value<'static>>,
}

impl Chunk {
  pub fn new() -> Self {
    Chunk::default()
  }

  pub fn len(&self) -> usize {
    self.code.len()
  }

  pub fn is_empty(&self) -> bool {
    self.code.is_empty()
  }

  pub fn push_byte(&mut self, byte: u8) {
    self.code.push(byte);
  }

  /// Splits a 16-bit value into two bytes (big-endian) and appends them.
  pub fn push_short(&mut self, val: u16) {
    let bytes = val.to_be_bytes();
    self.code.push(bytes[0]);
    self.code.push(bytes[1]);
  }

  /// Reads the two bytes at `idx`/`idx+1` as a big-endian `u16`.
  pub fn get_short(&self, idx: usize) -> u16 {
    u16::from_be_bytes([self.code[idx], self.code[idx + 1]])
  }

  /// Overwrites the two placeholder bytes at `idx` with `val`, used to
  /// patch a forward jump once its target address is known.
  pub fn patch_short(&mut self, idx: usize, val: u16) {
    let bytes = val.to_be_bytes();
    self.code[idx] = bytes[0];
    self.code[idx + 1] = bytes[1];
  }

  /// Appends a value to the constant pool and returns its index. Fails
  /// once a 257th distinct constant would be needed, since constants are
  /// addressed by a single byte operand.
  pub fn add_constant(&mut self, value: Value<'static>) -> Result<u8, EmberError> {
    if self.constants.len() >= 256 {
      return Err(EmberError::TypeMismatch("Too many constants in one chunk (max 256).".to_string()));
    }
    self.constants.push(value);
    Ok((self.constants.len() - 1) as u8)
  }

  /// Serializes this chunk to `w`: 32-bit LE
  /// `code_count`, 32-bit LE `constants_count`, the raw code bytes, then
  /// each constant as a one-byte type tag plus its payload.
  pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EmberError> {
    let io_err = |e: io::Error| EmberError::Io(e.to_string());

    w.write_all(&(self.code.len() as u32).to_le_bytes()).map_err(io_err)?;
    w.write_all(&(self.constants.len() as u32).to_le_bytes()).map_err(io_err)?;
    w.write_all(&self.code).map_err(io_err)?;

    for constant in &self.constants {
      match constant {
        Value::Number(n) => {
          w.write_all(&[TAG_NUMBER]).map_err(io_err)?;
          w.write_all(&n.to_ne_bytes()).map_err(io_err)?;
        }
        Value::Bool(b) => {
          w.write_all(&[TAG_BOOL, *b as u8]).map_err(io_err)?;
        }
        Value::Null => {
          w.write_all(&[TAG_NULL]).map_err(io_err)?;
        }
        Value::Str(s) => {
          w.write_all(&[TAG_STR]).map_err(io_err)?;
          w.write_all(&(s.len() as u32).to_le_bytes()).map_err(io_err)?;
          w.write_all(s.as_bytes()).map_err(io_err)?;
        }
        Value::Array(_) | Value::Object(..) | Value::Function(_) => {
          return Err(EmberError::TypeMismatch(
            "Array, object, and function constants are not serializable.".to_string(),
          ));
        }
      }
    }

    Ok(())
  }

  /// Reads a chunk back from `r`, the exact inverse of `write_to`.
  pub fn read_from<R: Read>(r: &mut R) -> Result<Chunk, EmberError> {
    let io_err = |e: io::Error| EmberError::Io(e.to_string());

    let mut u32_buf = [0u8; 4];
    r.read_exact(&mut u32_buf).map_err(io_err)?;
    let code_count = u32::from_le_bytes(u32_buf) as usize;

    r.read_exact(&mut u32_buf).map_err(io_err)?;
    let constants_count = u32::from_le_bytes(u32_buf) as usize;

    let mut code = vec![0u8; code_count];
    r.read_exact(&mut code).map_err(io_err)?;

    let mut constants = Vec::with_capacity(constants_count);
    for _ in 0..constants_count {
      let mut tag = [0u8; 1];
      r.read_exact(&mut tag).map_err(io_err)?;

      let value = match tag[0] {
        TAG_NUMBER => {
          let mut buf = [0u8; 8];
          r.read_exact(&mut buf).map_err(io_err)?;
          Value::Number(f64::from_ne_bytes(buf))
        }
        TAG_BOOL => {
          let mut buf = [0u8; 1];
          r.read_exact(&mut buf).map_err(io_err)?;
          Value::Bool(buf[0] != 0)
        }
        TAG_NULL => Value::Null,
        TAG_STR => {
          r.read_exact(&mut u32_buf).map_err(io_err)?;
          let len = u32::from_le_bytes(u32_buf) as usize;
          let mut buf = vec![0u8; len];
          r.read_exact(&mut buf).map_err(io_err)?;
          Value::Str(String::from_utf8(buf).map_err(|e| EmberError::Io(e.to_string()))?)
        }
        other => return Err(EmberError::Io(format!("Unknown constant type tag {}.", other))),
      };

      constants.push(value);
    }

    Ok(Chunk { code, constants })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serialization_round_trip() {
    let mut chunk = Chunk::new();
    chunk.push_byte(crate::bytecode::OpCode::LoadConst.into());
    chunk.push_byte(0);
    chunk.push_byte(crate::bytecode::OpCode::Eof.into());
    chunk.add_constant(Value::Number(3.5)).unwrap();
    chunk.add_constant(Value::Str("hi".to_string())).unwrap();
    chunk.add_constant(Value::Bool(true)).unwrap();
    chunk.add_constant(Value::Null).unwrap();

    let mut buf = Vec::new();
    chunk.write_to(&mut buf).unwrap();
    let read_back = Chunk::read_from(&mut buf.as_slice()).unwrap();

    assert_eq!(chunk.code, read_back.code);
    assert_eq!(chunk.constants.len(), read_back.constants.len());
  }

  #[test]
  fn rejects_array_constants() {
    let mut chunk = Chunk::new();
    chunk.constants.push(Value::Array(vec![]));
    let mut buf = Vec::new();
    assert!(chunk.write_to(&mut buf).is_err());
  }
}
