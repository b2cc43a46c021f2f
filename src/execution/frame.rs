//! Variable storage for a single run of an instruction sequence.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::variable::{Value, Variable};

/**
  A frame maps variables to their values. A variable that was never written reads as 0, and a
  `Variable::Constant` reads as its own value. Every call gets a fresh frame, so a callee can
  never observe or disturb its caller's variables.
*/
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
  values: BTreeMap<Variable, Value>,
}

impl Frame {

  pub fn new() -> Frame {
    Frame {
      values: BTreeMap::new()
    }
  }

  /// A frame with `inputs` bound to `x1`, `x2`, … in order.
  pub fn with_inputs(inputs: &[Value]) -> Frame {
    let mut frame = Frame::new();
    for (idx, value) in inputs.iter().enumerate() {
      frame.values.insert(Variable::from_input_idx(idx), *value);
    }
    frame
  }

  /// Makes `variables` show up in the final state, reading 0 unless already set.
  pub fn declare<I>(&mut self, variables: I)
    where I: IntoIterator<Item = Variable>
  {
    for variable in variables.into_iter().filter(|v| !v.is_constant()) {
      self.values.entry(variable).or_insert(0);
    }
  }

  pub fn get(&self, variable: Variable) -> Value {
    match variable {
      Variable::Constant(k) => k,
      _                     => self.values.get(&variable).cloned().unwrap_or(0)
    }
  }

  /// Writes to a constant are ignored; executors refuse sequences that attempt them.
  pub fn set(&mut self, variable: Variable, value: Value) {
    if !variable.is_constant() {
      self.values.insert(variable, value);
    }
  }

  pub fn increment(&mut self, variable: Variable) {
    self.set(variable, self.get(variable).saturating_add(1));
  }

  /// Natural-number decrement: 0 stays 0.
  pub fn decrement(&mut self, variable: Variable) {
    self.set(variable, self.get(variable).saturating_sub(1));
  }

  pub fn result(&self) -> Value {
    self.get(Variable::Result)
  }

  /// Every stored variable in variable order: `y`, the inputs, then the work variables.
  pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Value)> {
    self.values.iter()
  }

  pub fn into_values(self) -> BTreeMap<Variable, Value> {
    self.values
  }
}

impl Display for Frame {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let listing: Vec<String> = self.values
                                   .iter()
                                   .map(|(variable, value)| format!("{} = {}", variable, value))
                                   .collect();
    write!(f, "{}", listing.join(", "))
  }
}
