//! Function arguments: the expression trees that make function composition possible.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;

use crate::variable::Variable;

// region Argument and FunctionCall declarations and definitions

/// A single argument of a function call.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Argument {
  /// A bare variable reference, possibly a `Variable::Constant`.
  Variable(Variable),
  /// A nested call whose result is the argument's value.
  Call(FunctionCall),
}

/**
  The `FunctionCall` struct represents `(F, a_1, …, a_n)`. As with all strings in this codebase,
  `FunctionCall::name` is interned. Arguments are evaluated bottom-up, left to right, before the
  call itself runs.
*/
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FunctionCall {
  pub name      : DefaultAtom,
  pub arguments : Vec<Argument>,
}

impl FunctionCall {

  pub fn new(name: &str, arguments: Vec<Argument>) -> FunctionCall {
    FunctionCall {
      name: DefaultAtom::from(name),
      arguments
    }
  }

  /// Iterates over this call and every call nested in its arguments, breadth first.
  pub fn iter(&self) -> CallIter<'_> {
    CallIter::new(self)
  }

  /// Every variable read by this call tree, constants included, in left-to-right order.
  pub fn variables(&self) -> Vec<Variable> {
    let mut buffer = Vec::new();
    self.collect_variables(&mut buffer);
    buffer
  }

  fn collect_variables(&self, buffer: &mut Vec<Variable>) {
    for argument in self.arguments.iter() {
      match argument {
        Argument::Variable(variable) => buffer.push(*variable),
        Argument::Call(call)         => call.collect_variables(buffer),
      }
    }
  }

  /// Rebuilds the tree with every variable passed through `rename`.
  pub fn rename_variables<F>(&self, rename: &mut F) -> FunctionCall
    where F: FnMut(Variable) -> Variable
  {
    FunctionCall {
      name: self.name.clone(),
      arguments: self.arguments.iter().map(|argument| argument.rename_variables(rename)).collect()
    }
  }

  /// Depth of the call tree: 1 for a call whose arguments are all variables.
  pub fn depth(&self) -> usize {
    1 + self.arguments
            .iter()
            .map(|argument| match argument {
              Argument::Call(call)   => call.depth(),
              Argument::Variable(_)  => 0
            })
            .max()
            .unwrap_or(0)
  }

  /// Returns a tree rendering of the call, one node per line.
  pub fn tree_string(&self) -> String {
    Argument::Call(self.clone()).fmt_aux(&"".to_string(), &"".to_string())
  }
}

impl Display for FunctionCall {
  /// The conventional composition syntax, e.g. `(AND,(NOT,(EQUAL,x2,x1)),x1)`.
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}", self.name)?;
    for argument in self.arguments.iter() {
      write!(f, ",{}", argument)?;
    }
    write!(f, ")")
  }
}

impl Display for Argument {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Argument::Variable(variable) => write!(f, "{}", variable),
      Argument::Call(call)         => write!(f, "{}", call),
    }
  }
}

impl Argument {

  pub fn variable(variable: Variable) -> Argument {
    Argument::Variable(variable)
  }

  pub fn constant(value: u64) -> Argument {
    Argument::Variable(Variable::Constant(value))
  }

  pub fn call(name: &str, arguments: Vec<Argument>) -> Argument {
    Argument::Call(FunctionCall::new(name, arguments))
  }

  pub fn rename_variables<F>(&self, rename: &mut F) -> Argument
    where F: FnMut(Variable) -> Variable
  {
    match self {
      Argument::Variable(variable) => Argument::Variable(rename(*variable)),
      Argument::Call(call)         => Argument::Call(call.rename_variables(rename)),
    }
  }

  /// A helper for `fmt_aux`, to keep things DRY.
  fn fmt_tree_arguments(buffer: &mut String, children: &[Argument], child_prefix: &String) {
    for (i, next) in children.iter().enumerate() {
      if i != children.len() - 1 {
        buffer.push('\n');
        buffer.push_str(
          next.fmt_aux(
            &format!("{}{}", child_prefix, "├── "),
            &format!("{}{}", child_prefix, "│   ")
          ).as_str()
        );
      } else {
        buffer.push('\n');
        buffer.push_str(
          next.fmt_aux(
            &format!("{}{}", child_prefix, "└── "),
            &format!("{}{}", child_prefix, "    ")
          ).as_str()
        );
      }
    };
  }

  fn fmt_aux(&self, prefix: &String, child_prefix: &String) -> String {
    match self {

      Argument::Variable(Variable::Constant(k)) => format!("{}Constant<{}>", prefix, k),

      Argument::Variable(variable) => format!("{}Variable<{}>", prefix, variable),

      Argument::Call(call) => {
        let mut buffer = format!("{}Call<{}>", prefix, call.name);
        Self::fmt_tree_arguments(&mut buffer, &call.arguments, child_prefix);
        buffer
      }

    }
  }
}

// endregion Argument and FunctionCall

// region CallIter declarations and definitions

#[derive(Debug)]
pub struct CallIter<'c> {
  calls: VecDeque<&'c FunctionCall>, // A queue of calls yet to be visited.
}

impl<'c> CallIter<'c> {
  pub fn new(start: &'c FunctionCall) -> CallIter<'c> {
    CallIter {
      calls: VecDeque::from(vec![start])
    }
  }
}

/// Iterates over the calls in the argument tree breadth first.
impl<'c> Iterator for CallIter<'c> {
  type Item = &'c FunctionCall;

  fn next(&mut self) -> Option<Self::Item> {
    let call = self.calls.pop_front()?;
    self.calls.extend(
      call.arguments.iter().filter_map(|argument| match argument {
        Argument::Call(nested) => Some(nested),
        Argument::Variable(_)  => None
      })
    );
    Some(call)
  }
}

// endregion CallIter

#[cfg(test)]
mod tests {
  use super::*;

  fn composition() -> FunctionCall {
    // (AND,(Smaller_Equal_Than,x1,x2),(NOT,(EQUAL,x2,x1)))
    FunctionCall::new("AND", vec![
      Argument::call("Smaller_Equal_Than", vec![
        Argument::variable(Variable::Input(1)),
        Argument::variable(Variable::Input(2)),
      ]),
      Argument::call("NOT", vec![
        Argument::call("EQUAL", vec![
          Argument::variable(Variable::Input(2)),
          Argument::variable(Variable::Input(1)),
        ]),
      ]),
    ])
  }

  #[test]
  fn displays_in_composition_syntax() {
    assert_eq!(composition().to_string(), "(AND,(Smaller_Equal_Than,x1,x2),(NOT,(EQUAL,x2,x1)))");
  }

  #[test]
  fn iterates_breadth_first() {
    let call = composition();
    let names: Vec<&str> = call.iter().map(|c| &*c.name).collect();
    assert_eq!(names, vec!["AND", "Smaller_Equal_Than", "NOT", "EQUAL"]);
    assert_eq!(call.depth(), 3);
  }

  #[test]
  fn renames_every_variable_in_the_tree() {
    let renamed = composition().rename_variables(&mut |v| match v {
      Variable::Input(n) => Variable::Work(n + 10),
      other              => other
    });
    assert_eq!(renamed.to_string(), "(AND,(Smaller_Equal_Than,z11,z12),(NOT,(EQUAL,z12,z11)))");
    assert_eq!(
      renamed.variables(),
      vec![Variable::Work(11), Variable::Work(12), Variable::Work(12), Variable::Work(11)]
    );
  }

  #[test]
  fn tree_string_draws_one_node_per_line() {
    let call = FunctionCall::new("NOT", vec![
      Argument::call("EQUAL", vec![Argument::variable(Variable::Input(1)), Argument::constant(3)])
    ]);
    let expected = "Call<NOT>\n└── Call<EQUAL>\n    ├── Variable<x1>\n    └── Constant<3>";
    assert_eq!(call.tree_string(), expected);
  }
}
