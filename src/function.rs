//! Named functions and the registry a program resolves calls against.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;

use crate::error::{Error, Result, Scope};
use crate::instruction::Instruction;

/**
  A function is a named instruction sequence. It is invoked with its arguments bound to `x1`,
  `x2`, …, and its answer is whatever its `y` holds when it halts. Bodies refer to other functions
  only by name, so a registry never owns a cycle even when the call graph has one.
*/
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Function {
  pub name        : DefaultAtom,
  /// A human-facing rendering of what the function computes, e.g. `x1 - 1`.
  pub user_string : Option<String>,
  pub body        : Vec<Instruction>,
}

impl Function {
  pub fn new(name: &str, user_string: Option<&str>, body: Vec<Instruction>) -> Function {
    Function {
      name        : DefaultAtom::from(name),
      user_string : user_string.map(|text| text.to_string()),
      body
    }
  }

  pub fn scope(&self) -> Scope {
    Scope::Function(self.name.clone())
  }

  /// Names of the functions this body calls directly, in order of first appearance.
  pub fn callees(&self) -> Vec<DefaultAtom> {
    callees_of(&self.body)
  }
}

impl Display for Function {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match &self.user_string {
      Some(text) => write!(f, "{} = {}", self.name, text),
      None       => write!(f, "{}", self.name),
    }
  }
}

/// Names of every function called anywhere in `instructions`, including nested argument calls,
/// in order of first appearance.
pub fn callees_of(instructions: &[Instruction]) -> Vec<DefaultAtom> {
  let mut seen: HashSet<DefaultAtom> = HashSet::new();
  let mut names = Vec::new();
  for call in instructions.iter().filter_map(|instruction| instruction.call()) {
    for nested in call.iter() {
      if seen.insert(nested.name.clone()) {
        names.push(nested.name.clone());
      }
    }
  }
  names
}

/// The name-to-body table of a program.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
  functions: HashMap<DefaultAtom, Function>,
}

impl FunctionRegistry {

  pub fn new() -> FunctionRegistry {
    FunctionRegistry {
      functions: HashMap::new()
    }
  }

  /// Registers `function`, returning any previous definition of the same name.
  pub fn insert(&mut self, function: Function) -> Option<Function> {
    self.functions.insert(function.name.clone(), function)
  }

  pub fn get(&self, name: &DefaultAtom) -> Option<&Function> {
    self.functions.get(name)
  }

  /// Like `get`, but a missing name is an `UnknownFunction` error reported against the call site.
  pub fn lookup(&self, name: &DefaultAtom, scope: &Scope, position: usize) -> Result<&Function> {
    self.functions.get(name).ok_or_else(|| Error::UnknownFunction {
      name     : name.clone(),
      scope    : scope.clone(),
      position
    })
  }

  pub fn contains(&self, name: &DefaultAtom) -> bool {
    self.functions.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.functions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.functions.is_empty()
  }

  /// Every registered name, sorted, so that anything iterating the registry is deterministic.
  pub fn names(&self) -> Vec<DefaultAtom> {
    let mut names: Vec<DefaultAtom> = self.functions.keys().cloned().collect();
    names.sort_by(|a, b| (&**a).cmp(&**b));
    names
  }

  /// Every registered function, in name order.
  pub fn functions(&self) -> Vec<&Function> {
    self.names().iter().filter_map(|name| self.functions.get(name)).collect()
  }

  /**
    Names of every registered function reachable from `instructions`, directly or through other
    function bodies, in breadth-first order of discovery. Unregistered names are skipped; they
    are reported by validation.
  */
  pub fn reachable_from(&self, instructions: &[Instruction]) -> Vec<DefaultAtom> {
    let mut seen: HashSet<DefaultAtom> = HashSet::new();
    let mut reached = Vec::new();
    let mut queue: VecDeque<DefaultAtom> = callees_of(instructions).into();

    while let Some(name) = queue.pop_front() {
      if !seen.insert(name.clone()) {
        continue;
      }
      if let Some(function) = self.functions.get(&name) {
        reached.push(name);
        queue.extend(function.callees());
      }
    }
    reached
  }

  /**
    Finds a cycle in the call graph, if there is one, and returns it as a chain of names that
    starts and ends with the same function, e.g. `[F, G, F]`. Searches start from each function
    in name order, so the reported chain is deterministic.
  */
  pub fn find_recursion(&self) -> Option<Vec<DefaultAtom>> {
    let mut finished: HashSet<DefaultAtom> = HashSet::new();
    for name in self.names() {
      let mut path = Vec::new();
      if let Some(chain) = self.find_recursion_from(&name, &mut path, &mut finished) {
        return Some(chain);
      }
    }
    None
  }

  fn find_recursion_from(
      &self,
      name     : &DefaultAtom,
      path     : &mut Vec<DefaultAtom>,
      finished : &mut HashSet<DefaultAtom>
    ) -> Option<Vec<DefaultAtom>>
  {
    if let Some(start) = path.iter().position(|caller| caller == name) {
      let mut chain = path[start..].to_vec();
      chain.push(name.clone());
      return Some(chain);
    }
    if finished.contains(name) {
      return None;
    }
    let function = self.functions.get(name)?;

    path.push(name.clone());
    for callee in function.callees() {
      if let Some(chain) = self.find_recursion_from(&callee, path, finished) {
        return Some(chain);
      }
    }
    path.pop();
    finished.insert(name.clone());
    None
  }
}
