//! The static cycle-cost model.
//!
//! A basic or non-call synthetic instruction costs its table constant. A call costs its overhead,
//! plus the cost of evaluating each argument (a bare variable is free, a nested call costs what a
//! `QUOTE` of it would), plus the cost of the invoked function's whole body.

use std::collections::HashMap;

use string_cache::DefaultAtom;

use crate::error::{Error, Result, Scope};
use crate::function::FunctionRegistry;
use crate::instruction::{Argument, FunctionCall, Instruction, Operation};

pub type Cycles = u64;

/**
  Computes static costs against a function registry. Body costs are memoized, so a `CostModel`
  can be reused across every instruction of a sequence. Cyclic call graphs are reported as
  `Error::RecursiveFunction` rather than followed.
*/
pub struct CostModel<'f> {
  functions   : &'f FunctionRegistry,
  body_costs  : HashMap<DefaultAtom, Cycles>,
  in_progress : Vec<DefaultAtom>, // The chain of bodies whose cost is being computed.
}

impl<'f> CostModel<'f> {

  pub fn new(functions: &'f FunctionRegistry) -> CostModel<'f> {
    CostModel {
      functions,
      body_costs  : HashMap::new(),
      in_progress : Vec::new(),
    }
  }

  /// The cost of `instruction`, found at 1-based `position` of `scope`.
  pub fn instruction_cost(&mut self, instruction: &Instruction, scope: &Scope, position: usize)
    -> Result<Cycles>
  {
    let operation = instruction.operation();
    match instruction.call() {
      Some(call) => self.call_cost(call, operation.cycles(), scope, position),
      None       => Ok(operation.cycles()),
    }
  }

  /// The costs of every instruction in `instructions`, in order.
  pub fn sequence_costs(&mut self, instructions: &[Instruction], scope: &Scope)
    -> Result<Vec<Cycles>>
  {
    instructions.iter()
                .enumerate()
                .map(|(idx, instruction)| self.instruction_cost(instruction, scope, idx + 1))
                .collect()
  }

  /// Overhead, then every argument, then the callee's body.
  fn call_cost(&mut self, call: &FunctionCall, overhead: Cycles, scope: &Scope, position: usize)
    -> Result<Cycles>
  {
    let mut total = overhead;
    for argument in call.arguments.iter() {
      if let Argument::Call(nested) = argument {
        let nested_cost = self.call_cost(nested, Operation::Quote.cycles(), scope, position)?;
        total = total.saturating_add(nested_cost);
      }
    }
    let body_cost = self.body_cost(&call.name, scope, position)?;
    Ok(total.saturating_add(body_cost))
  }

  /// The summed cost of every instruction in the body of the function `name`.
  pub fn body_cost(&mut self, name: &DefaultAtom, scope: &Scope, position: usize) -> Result<Cycles> {
    if let Some(cost) = self.body_costs.get(name) {
      return Ok(*cost);
    }

    if let Some(start) = self.in_progress.iter().position(|caller| caller == name) {
      let mut chain: Vec<DefaultAtom> = self.in_progress[start..].to_vec();
      chain.push(name.clone());
      return Err(Error::RecursiveFunction { chain });
    }

    let functions = self.functions;
    let function = functions.lookup(name, scope, position)?;
    let body_scope = Scope::Function(name.clone());

    self.in_progress.push(name.clone());
    let mut total: Cycles = 0;
    for (idx, instruction) in function.body.iter().enumerate() {
      match self.instruction_cost(instruction, &body_scope, idx + 1) {
        Ok(cost) => {
          total = total.saturating_add(cost);
        }
        Err(error) => {
          self.in_progress.pop();
          return Err(error);
        }
      }
    }
    self.in_progress.pop();

    self.body_costs.insert(name.clone(), total);
    Ok(total)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::function::Function;
  use crate::label::Label;
  use crate::variable::Variable;

  // NOT(x1) = 1 - x1, with a static body cost of 2 + 1.
  fn not_function() -> Function {
    Function::new("NOT", Some("1 - x1"), vec![
      Instruction::jump_not_zero(Variable::Input(1), Label::Exit),
      Instruction::increase(Variable::Result),
    ])
  }

  #[test]
  fn table_costs_for_plain_instructions() {
    let registry = FunctionRegistry::new();
    let mut model = CostModel::new(&registry);
    let cost = model.instruction_cost(
      &Instruction::assign(Variable::Result, Variable::Input(1)), &Scope::Program, 1
    );
    assert_eq!(cost, Ok(4));
    assert_eq!(
      model.instruction_cost(&Instruction::neutral(Variable::Result), &Scope::Program, 2),
      Ok(0)
    );
  }

  #[test]
  fn call_cost_adds_overhead_arguments_and_body() {
    let mut registry = FunctionRegistry::new();
    registry.insert(not_function());
    let mut model = CostModel::new(&registry);

    // (NOT,x1): 5 + 0 + 3
    let flat = Instruction::quote(
      Variable::Result,
      FunctionCall::new("NOT", vec![Argument::variable(Variable::Input(1))])
    );
    assert_eq!(model.instruction_cost(&flat, &Scope::Program, 1), Ok(8));

    // IF y == (NOT,(NOT,x1)) GOTO EXIT: 6 + (5 + 3) + 3
    let nested = Instruction::jump_equal_function(
      Variable::Result,
      FunctionCall::new("NOT", vec![Argument::call("NOT", vec![Argument::variable(Variable::Input(1))])]),
      Label::Exit
    );
    assert_eq!(model.instruction_cost(&nested, &Scope::Program, 1), Ok(17));
  }

  #[test]
  fn unknown_and_recursive_functions_are_errors() {
    let mut registry = FunctionRegistry::new();
    registry.insert(Function::new("LOOP", None, vec![
      Instruction::quote(Variable::Result, FunctionCall::new("LOOP", vec![]))
    ]));
    let mut model = CostModel::new(&registry);

    let missing = Instruction::quote(Variable::Result, FunctionCall::new("MISSING", vec![]));
    assert_eq!(
      model.instruction_cost(&missing, &Scope::Program, 3),
      Err(Error::UnknownFunction { name: DefaultAtom::from("MISSING"), scope: Scope::Program, position: 3 })
    );

    let looping = Instruction::quote(Variable::Result, FunctionCall::new("LOOP", vec![]));
    assert_eq!(
      model.instruction_cost(&looping, &Scope::Program, 1),
      Err(Error::RecursiveFunction { chain: vec![DefaultAtom::from("LOOP"), DefaultAtom::from("LOOP")] })
    );
  }
}
