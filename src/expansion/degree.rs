//! Expansion degree: how many passes an instruction needs before only basic instructions remain.

use std::collections::HashMap;

use string_cache::DefaultAtom;

use crate::error::{Error, Result, Scope};
use crate::function::FunctionRegistry;
use crate::instruction::{Argument, Command, FunctionCall, Instruction};

/**
  Computes degrees without materializing any expansion. The degree of an instruction is one more
  than the largest degree among the instructions its template produces, which for the fixed
  templates is a constant (or depends only on whether two operands coincide) and for calls is

  ```text
      quote(F, args)    = 1 + max(2, degree(F), quote degrees of nested argument calls)
      jump_equal(F, …)  = 1 + max(quote(F, args), 3)
  ```

  where `degree(F)` is the largest degree in F's body. Function degrees are memoized.
*/
pub struct DegreeModel<'f> {
  functions        : &'f FunctionRegistry,
  function_degrees : HashMap<DefaultAtom, usize>,
  in_progress      : Vec<DefaultAtom>,
}

impl<'f> DegreeModel<'f> {

  pub fn new(functions: &'f FunctionRegistry) -> DegreeModel<'f> {
    DegreeModel {
      functions,
      function_degrees : HashMap::new(),
      in_progress      : Vec::new(),
    }
  }

  /// The maximum degree over `instructions`, which is the number of passes to the fixed point.
  pub fn sequence_degree(&mut self, instructions: &[Instruction], scope: &Scope) -> Result<usize> {
    let mut degree = 0;
    for (idx, instruction) in instructions.iter().enumerate() {
      degree = degree.max(self.instruction_degree(instruction, scope, idx + 1)?);
    }
    Ok(degree)
  }

  pub fn instruction_degree(&mut self, instruction: &Instruction, scope: &Scope, position: usize)
    -> Result<usize>
  {
    let degree =
      match &instruction.command {
        | Command::Increase(_)
        | Command::Decrease(_)
        | Command::Neutral(_)
        | Command::JumpNotZero { .. }                 => 0,

        | Command::ZeroVariable(_)
        | Command::GotoLabel { .. }                   => 1,

        Command::AssignVariable { variable, source } if variable == source => 1,
        | Command::AssignVariable { .. }
        | Command::AssignConstant { .. }
        | Command::JumpZero { .. }                    => 2,

        Command::JumpEqualVariable { variable, other, .. } if variable == other => 2,
        | Command::JumpEqualVariable { .. }
        | Command::JumpEqualConstant { .. }           => 3,

        Command::Quote { call, .. } => self.quote_degree(call, scope, position)?,

        Command::JumpEqualFunction { call, .. } => {
          1 + self.quote_degree(call, scope, position)?.max(3)
        }
      };
    Ok(degree)
  }

  fn quote_degree(&mut self, call: &FunctionCall, scope: &Scope, position: usize) -> Result<usize> {
    let mut inner = 2usize.max(self.function_degree(&call.name, scope, position)?);
    for argument in call.arguments.iter() {
      if let Argument::Call(nested) = argument {
        inner = inner.max(self.quote_degree(nested, scope, position)?);
      }
    }
    Ok(1 + inner)
  }

  /// The largest degree of any instruction in the body of `name`.
  pub fn function_degree(&mut self, name: &DefaultAtom, scope: &Scope, position: usize) -> Result<usize> {
    if let Some(degree) = self.function_degrees.get(name) {
      return Ok(*degree);
    }

    if let Some(start) = self.in_progress.iter().position(|caller| caller == name) {
      let mut chain: Vec<DefaultAtom> = self.in_progress[start..].to_vec();
      chain.push(name.clone());
      return Err(Error::RecursiveFunction { chain });
    }

    let functions = self.functions;
    let function = functions.lookup(name, scope, position)?;

    self.in_progress.push(name.clone());
    let degree = self.sequence_degree(&function.body, &function.scope());
    self.in_progress.pop();

    let degree = degree?;
    self.function_degrees.insert(name.clone(), degree);
    Ok(degree)
  }
}
