use core::errors::EmberError;

/// Append-only name table shared by the compiler and the VM's global slot
/// array. Once a name has a slot it keeps it for the lifetime of the
/// compilation unit; slots are addressable by a single byte operand, so
/// the table caps out at 256 distinct names.
#[derive(Debug, Default)]
pub struct SymbolTable {
  names: Vec<String>,
  is_function: Vec<bool>,
}

impl SymbolTable {
  pub fn new() -> Self {
    SymbolTable::default()
  }

  /// Returns the slot for `name`, allocating a fresh one if this is the
  /// first time it's been seen. `is_function` only affects a fresh
  /// allocation — an existing slot keeps the kind of its first
  /// declaration.
  pub fn get_or_add(&mut self, name: &str, is_function: bool) -> Result<u8, EmberError> {
    if let Some(idx) = self.names.iter().position(|n| n == name) {
      return Ok(idx as u8);
    }

    if self.names.len() >= 256 {
      return Err(EmberError::TypeMismatch(format!(
        "Too many distinct names in one compilation unit (max 256); '{}' has no free slot.",
        name
      )));
    }

    self.names.push(name.to_string());
    self.is_function.push(is_function);
    Ok((self.names.len() - 1) as u8)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  pub fn is_function(&self, slot: u8) -> bool {
    self.is_function.get(slot as usize).copied().unwrap_or(false)
  }

  pub fn name_at(&self, slot: u8) -> Option<&str> {
    self.names.get(slot as usize).map(String::as_str)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reuses_slot_for_repeated_name() {
    let mut table = SymbolTable::new();
    let a = table.get_or_add("x", false).unwrap();
    let b = table.get_or_add("x", false).unwrap();
    assert_eq!(a, b);
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn fails_past_256_distinct_names() {
    let mut table = SymbolTable::new();
    for i in 0..256 {
      table.get_or_add(&format!("v{}", i), false).unwrap();
    }
    assert!(table.get_or_add("one_too_many", false).is_err());
  }
}
