use std::collections::HashSet;

use core::values::Value;

/// A chain of lexical scopes, innermost last. `Environment` owns the whole
/// chain directly rather than linking parent pointers through `Rc`/`Box` —
/// entering/leaving a scope is a push/pop on this stack.
pub struct Environment<'ast> {
  scopes: Vec<Vec<(String, Value<'ast>)>>,
  imported: HashSet<String>,
}

impl<'ast> Environment<'ast> {
  /// An empty global scope with no parent.
  pub fn create_root() -> Self {
    Environment { scopes: vec![Vec::new()], imported: HashSet::new() }
  }

  /// Records that `canonical_path` is now being imported. Returns `true`
  /// the first time a given path is seen and `false` on every subsequent
  /// attempt, so a caller can reject an import cycle instead of recursing
  /// forever.
  pub fn try_begin_import(&mut self, canonical_path: &str) -> bool {
    self.imported.insert(canonical_path.to_string())
  }

  /// Pushes a fresh, empty scope on top of the chain.
  pub fn create_child(&mut self) {
    self.scopes.push(Vec::new());
  }

  /// Pops the innermost scope, discarding every binding it held.
  pub fn destroy_child(&mut self) {
    self.scopes.pop();
  }

  /// Introduces a new binding in the current (innermost) scope,
  /// shadowing any binding of the same name in an outer scope. Used by
  /// variable declarations, which always declare locally.
  pub fn declare(&mut self, name: &str, value: Value<'ast>) {
    let current = self.scopes.last_mut().expect("environment always has at least the root scope");
    current.push((name.to_string(), value));
  }

  /// Walks outward from the current scope looking for an existing binding
  /// named `name`. If one is found, its value is replaced. If none is
  /// found anywhere in the chain, a new binding is created in the current
  /// scope, same as `declare`.
  pub fn set(&mut self, name: &str, value: Value<'ast>) {
    for scope in self.scopes.iter_mut().rev() {
      if let Some(slot) = scope.iter_mut().find(|(n, _)| n == name) {
        slot.1 = value;
        return;
      }
    }
    self.declare(name, value);
  }

  /// Walks outward from the current scope, returning the first binding
  /// found for `name`.
  pub fn get(&self, name: &str) -> Option<&Value<'ast>> {
    for scope in self.scopes.iter().rev() {
      if let Some((_, v)) = scope.iter().find(|(n, _)| n == name) {
        return Some(v);
      }
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_updates_a_binding_in_an_outer_scope() {
    let mut env = Environment::create_root();
    env.declare("x", Value::Number(1.0));
    env.create_child();
    env.set("x", Value::Number(2.0));
    assert!(matches!(env.get("x"), Some(Value::Number(n)) if *n == 2.0));
    env.destroy_child();
    assert!(matches!(env.get("x"), Some(Value::Number(n)) if *n == 2.0));
  }

  #[test]
  fn try_begin_import_rejects_a_repeated_path() {
    let mut env = Environment::create_root();
    assert!(env.try_begin_import("/scripts/a.ember"));
    assert!(!env.try_begin_import("/scripts/a.ember"));
    assert!(env.try_begin_import("/scripts/b.ember"));
  }

  #[test]
  fn declare_shadows_rather_than_overwrites() {
    let mut env = Environment::create_root();
    env.declare("x", Value::Number(1.0));
    env.create_child();
    env.declare("x", Value::Number(2.0));
    assert!(matches!(env.get("x"), Some(Value::Number(n)) if *n == 2.0));
    env.destroy_child();
    assert!(matches!(env.get("x"), Some(Value::Number(n)) if *n == 1.0));
  }
}
