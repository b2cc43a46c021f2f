//! Variables of the S language. A `Variable` is a pure value naming a storage cell; the storage
//! itself lives in an execution frame.

use std::fmt::{Display, Formatter};

/// Every variable holds a natural number.
pub type Value = u64;

pub type VariableNumberType = u32;

/**
  The derived ordering is significant: `y` sorts before the inputs, which sort before the work
  variables, so a final variable state lists as `y, x1, x2, …, z1, z2, …`.
*/
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Variable {
  /// The single designated output variable, `y`.
  Result,
  /// An input variable `xN`. Inputs count from 1.
  Input(VariableNumberType),
  /// A work variable `zN`. Work variables count from 1.
  Work(VariableNumberType),
  /// A literal that may appear wherever a function argument reads a variable.
  Constant(Value),
}

impl Variable {
  /// The input variable that receives the argument at 0-based position `idx`.
  pub fn from_input_idx(idx: usize) -> Variable {
    Variable::Input((idx + 1) as VariableNumberType)
  }

  pub fn is_result(&self) -> bool {
    matches!(self, Variable::Result)
  }

  pub fn is_input(&self) -> bool {
    matches!(self, Variable::Input(_))
  }

  pub fn is_work(&self) -> bool {
    matches!(self, Variable::Work(_))
  }

  pub fn is_constant(&self) -> bool {
    matches!(self, Variable::Constant(_))
  }

  /// Only constants are read-only.
  pub fn is_writable(&self) -> bool {
    !self.is_constant()
  }

  /// Inputs and work variables are numbered from 1; `x0` and `z0` do not exist.
  pub fn is_well_formed(&self) -> bool {
    match self {
      | Variable::Input(n)
      | Variable::Work(n) => *n >= 1,
      _                   => true
    }
  }
}

impl Display for Variable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Variable::Result      => write!(f, "y"),
      Variable::Input(n)    => write!(f, "x{}", n),
      Variable::Work(n)     => write!(f, "z{}", n),
      Variable::Constant(k) => write!(f, "{}", k),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ordering_lists_result_then_inputs_then_work() {
    let mut variables = vec![
      Variable::Work(2),
      Variable::Input(3),
      Variable::Result,
      Variable::Work(1),
      Variable::Input(1),
    ];
    variables.sort();
    let names: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
    assert_eq!(names, vec!["y", "x1", "x3", "z1", "z2"]);
  }

  #[test]
  fn zero_numbered_variables_are_malformed() {
    assert!(!Variable::Input(0).is_well_formed());
    assert!(!Variable::Work(0).is_well_formed());
    assert!(Variable::Constant(0).is_well_formed());
    assert!(Variable::from_input_idx(0).is_well_formed());
    assert_eq!(Variable::from_input_idx(1), Variable::Input(2));
  }
}
