/// Source location carried by every AST node, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loc {
  pub line: usize,
  pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
  Negate,
  Not,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Mod,
  Eq,
  NotEq,
  Less,
  Greater,
  LessEq,
  GreaterEq,
  And,
  Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
  Number(f64),
  String(String),
  Boolean(bool),
  Null,
}

/// An expression node. Child pointers express exclusive ownership: dropping
/// an `Expr` recursively drops its children and any owned strings.
#[derive(Debug)]
pub enum Expr {
  Literal(LiteralValue, Loc),
  Variable(String, Loc),
  Unary(UnaryOp, Box<Expr>, Loc),
  Binary(BinaryOp, Box<Expr>, Box<Expr>, Loc),
  Assignment(String, Box<Expr>, Loc),
  Call(String, Vec<Expr>, Loc),
  ArrayLiteral(Vec<Expr>, Loc),
  Index(Box<Expr>, Box<Expr>, Loc),
}

impl Expr {
  pub fn loc(&self) -> Loc {
    match self {
      Expr::Literal(_, l)
      | Expr::Variable(_, l)
      | Expr::Unary(_, _, l)
      | Expr::Binary(_, _, _, l)
      | Expr::Assignment(_, _, l)
      | Expr::Call(_, _, l)
      | Expr::ArrayLiteral(_, l)
      | Expr::Index(_, _, l) => *l,
    }
  }
}

/// Either half of a `for`-header init clause.
#[derive(Debug)]
pub enum ForInit {
  VarDecl(String, Option<Expr>),
  Expr(Expr),
}

/// A statement node. `Switch` is carried as a reserved node kind: the
/// grammar never constructs it (there is no switch syntax), but the shape
/// exists so the compiler's documented emission rule for it has something
/// to match against, and so that a later grammar extension has a home to
/// land in.
#[derive(Debug)]
pub enum Stmt {
  Expr(Expr),
  VarDecl(String, Option<Expr>, Loc),
  Block(Vec<Stmt>, Loc),
  If(Expr, Box<Stmt>, Option<Box<Stmt>>, Loc),
  While(Expr, Box<Stmt>, Loc),
  For(Option<Box<ForInit>>, Option<Expr>, Option<Expr>, Box<Stmt>, Loc),
  FunctionDef(String, Vec<String>, Box<Stmt>, Loc),
  Import(String, Loc),
  Switch(Expr, Vec<(Expr, Stmt)>, Option<Box<Stmt>>, Loc),
}

impl Stmt {
  pub fn loc(&self) -> Loc {
    match self {
      Stmt::Expr(e) => e.loc(),
      Stmt::VarDecl(_, _, l)
      | Stmt::Block(_, l)
      | Stmt::If(_, _, _, l)
      | Stmt::While(_, _, l)
      | Stmt::For(_, _, _, _, l)
      | Stmt::FunctionDef(_, _, _, l)
      | Stmt::Import(_, l)
      | Stmt::Switch(_, _, _, l) => *l,
    }
  }
}
