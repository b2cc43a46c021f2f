/*!
  The program container. A `Program` owns its top-level instructions and its function registry,
  and is the entry point for every front end: validate and load it, ask for its degree, expand
  it, or run it.
*/

mod validation;

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;
use tracing::{debug, info, warn};

use crate::architecture::Architecture;
use crate::error::{Error, LoadError, Result, Scope};
use crate::execution::{Executor, RunOutcome};
use crate::expansion::{self, DegreeModel, ExpansionResult};
use crate::function::{Function, FunctionRegistry};
use crate::instruction::{CostModel, Cycles, Instruction};
use crate::variable::{Value, Variable};

pub use validation::{validate, ValidationOutcome};

/// The run-time configuration of a single run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunRequest {
  /// The program is expanded to this degree before it runs.
  pub degree       : usize,
  /// Bound to `x1`, `x2`, … in order.
  pub inputs       : Vec<Value>,
  pub architecture : Architecture,
}

impl RunRequest {
  /// A degree-0 run on the most capable architecture.
  pub fn new(inputs: Vec<Value>) -> RunRequest {
    RunRequest {
      degree       : 0,
      inputs,
      architecture : Architecture::default()
    }
  }

  pub fn at_degree(mut self, degree: usize) -> RunRequest {
    self.degree = degree;
    self
  }

  pub fn on(mut self, architecture: Architecture) -> RunRequest {
    self.architecture = architecture;
    self
  }
}

#[derive(Clone, Debug)]
pub struct Program {
  name         : String,
  instructions : Vec<Instruction>,
  functions    : FunctionRegistry,
}

impl Program {

  pub fn new(name: &str) -> Program {
    Program {
      name         : name.to_string(),
      instructions : Vec::new(),
      functions    : FunctionRegistry::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn instructions(&self) -> &[Instruction] {
    &self.instructions
  }

  pub fn functions(&self) -> &FunctionRegistry {
    &self.functions
  }

  pub fn push_instruction(&mut self, instruction: Instruction) {
    self.instructions.push(instruction);
  }

  /// Appends every instruction of `instructions`, builder style.
  pub fn with_instructions<I>(mut self, instructions: I) -> Program
    where I: IntoIterator<Item = Instruction>
  {
    self.instructions.extend(instructions);
    self
  }

  /// Registers `function`, replacing and returning any function of the same name.
  pub fn define_function(&mut self, function: Function) -> Option<Function> {
    let replaced = self.functions.insert(function);
    if let Some(previous) = &replaced {
      warn!(program = %self.name, function = %previous.name, "function redefined");
    }
    replaced
  }

  pub fn with_function(mut self, function: Function) -> Program {
    self.define_function(function);
    self
  }

  // region Validation and loading

  pub fn validate(&self) -> ValidationOutcome {
    validate(&self.instructions, &self.functions)
  }

  /// Finalizes the program, or returns every issue `validate` found.
  pub fn load(self) -> std::result::Result<Program, LoadError> {
    let outcome = self.validate();
    match outcome.is_valid() {
      true => {
        info!(
          program = %self.name,
          instructions = self.instructions.len(),
          functions = self.functions.len(),
          "program loaded"
        );
        Ok(self)
      }
      false => {
        debug!(program = %self.name, issues = outcome.issues.len(), "program failed validation");
        Err(LoadError {
          program : self.name,
          issues  : outcome.issues
        })
      }
    }
  }

  // endregion

  // region Queries

  /// Every input variable the program reads, in order, including those inside argument trees.
  pub fn input_variables(&self) -> Vec<Variable> {
    let inputs: BTreeSet<Variable> =
      self.instructions
          .iter()
          .flat_map(|instruction| instruction.variables())
          .filter(|variable| variable.is_input())
          .collect();
    inputs.into_iter().collect()
  }

  /// Every registered function the program calls, directly or through other functions.
  pub fn functions_used(&self) -> Vec<DefaultAtom> {
    self.functions.reachable_from(&self.instructions)
  }

  pub fn max_degree(&self) -> Result<usize> {
    expansion::max_degree(&self.instructions, &self.functions, &Scope::Program)
  }

  /// The maximum degree of the body of the function `name`.
  pub fn function_degree(&self, name: &str) -> Result<usize> {
    DegreeModel::new(&self.functions).function_degree(&DefaultAtom::from(name), &Scope::Program, 0)
  }

  /// The static cost of each top-level instruction, in order.
  pub fn instruction_costs(&self) -> Result<Vec<Cycles>> {
    CostModel::new(&self.functions).sequence_costs(&self.instructions, &Scope::Program)
  }

  pub fn required_architecture(&self) -> Architecture {
    Architecture::required_for(&self.instructions)
  }

  // endregion

  // region Expansion and execution

  pub fn expand_to_degree(&self, degree: usize) -> Result<ExpansionResult> {
    expansion::expand_to_degree(&self.instructions, &self.functions, &Scope::Program, degree)
  }

  pub fn expand_function_to_degree(&self, name: &str, degree: usize) -> Result<ExpansionResult> {
    expansion::expand_function_to_degree(&self.functions, name, degree)
  }

  /// An executor for the unexpanded program.
  pub fn executor(&self) -> Result<Executor<'_>> {
    Executor::new(&self.instructions, &self.functions)
  }

  /// Expands to the requested degree, checks the architecture can run the result, and runs it.
  pub fn run(&self, request: &RunRequest) -> Result<RunOutcome> {
    let expansion = self.expand_to_degree(request.degree)?;

    if let Some((position, operation)) = request.architecture.first_unsupported(expansion.instructions()) {
      return Err(Error::UnsupportedInstruction {
        operation,
        architecture: request.architecture,
        position
      });
    }

    info!(
      program = %self.name,
      degree = expansion.degree(),
      architecture = %request.architecture,
      inputs = ?request.inputs,
      "run started"
    );
    let outcome = Executor::new(expansion.instructions(), &self.functions)?.run(&request.inputs)?;
    info!(
      program = %self.name,
      result = outcome.result,
      cycles = outcome.cycles,
      "run finished"
    );
    Ok(outcome)
  }

  // endregion
}

impl Display for Program {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "Program {}", self.name)?;
    for (idx, instruction) in self.instructions.iter().enumerate() {
      writeln!(f, "#{:<3} ({}) {}", idx + 1, instruction.operation().class_letter(), instruction)?;
    }
    for function in self.functions.functions() {
      writeln!(f, "Function {}", function)?;
      for (idx, instruction) in function.body.iter().enumerate() {
        writeln!(f, "  #{:<3} ({}) {}", idx + 1, instruction.operation().class_letter(), instruction)?;
      }
    }
    Ok(())
  }
}
