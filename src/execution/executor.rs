//! The interpreter: runs any instruction sequence, expanded or not, against a function registry.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use tracing::{debug, trace};

use crate::error::{Error, Result, Scope};
use crate::function::{Function, FunctionRegistry};
use crate::instruction::{Command, CostModel, Cycles, Instruction};
use crate::label::{Label, LabelTable};
use crate::variable::{Value, Variable};

use super::call::evaluate_call;
use super::frame::Frame;
use super::trace::make_machine_table;

/// What an executed instruction tells the machine to do next.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Signal {
  Fallthrough,
  Halt,
  JumpTo(Label),
}

impl Signal {
  /// A jump to `EXIT` is a halt.
  fn jump(target: &Label) -> Signal {
    match target {
      Label::Exit => Signal::Halt,
      label       => Signal::JumpTo(label.clone())
    }
  }
}

/// What a single call to `Execution::step` did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepReport {
  /// 1-based row of the executed instruction.
  pub position : usize,
  pub signal   : Signal,
  /// Cycles charged for the instruction.
  pub cycles   : Cycles,
  pub halted   : bool,
}

/// The answer and final machine state of a completed run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunOutcome {
  pub result    : Value,
  /// Every variable the sequence references plus the seeded inputs, in variable order.
  pub variables : BTreeMap<Variable, Value>,
  pub cycles    : Cycles,
  pub steps     : usize,
}

/**
  An executor is an instruction sequence prepared for running: its label table is built and
  its operands checked. It can be run any number of times; each run gets its own `Execution`.

  Every step is charged the instruction's static cost before it executes, and a call's static
  cost includes the whole callee body. A call into a recursive function therefore fails with
  `RecursiveFunction` even when the recursion would terminate.
*/
#[derive(Debug)]
pub struct Executor<'p> {
  instructions : &'p [Instruction],
  functions    : &'p FunctionRegistry,
  labels       : LabelTable,
  scope        : Scope,
}

impl<'p> Executor<'p> {

  pub fn new(instructions: &'p [Instruction], functions: &'p FunctionRegistry) -> Result<Executor<'p>> {
    Executor::with_scope(instructions, functions, Scope::Program)
  }

  pub fn for_function(function: &'p Function, functions: &'p FunctionRegistry) -> Result<Executor<'p>> {
    Executor::with_scope(&function.body, functions, function.scope())
  }

  fn with_scope(instructions: &'p [Instruction], functions: &'p FunctionRegistry, scope: Scope)
    -> Result<Executor<'p>>
  {
    let labels = LabelTable::build(instructions, &scope)?;

    for (idx, instruction) in instructions.iter().enumerate() {
      if let Some(variable) = instruction.command.written_variable() {
        if !variable.is_writable() {
          return Err(Error::InvalidTarget { variable, scope, position: idx + 1 });
        }
      }
    }

    Ok(Executor {
      instructions,
      functions,
      labels,
      scope
    })
  }

  pub fn instructions(&self) -> &[Instruction] {
    self.instructions
  }

  pub fn scope(&self) -> &Scope {
    &self.scope
  }

  /// Prepares a run with `inputs` bound to `x1`, `x2`, … without executing anything.
  pub fn start(&self, inputs: &[Value]) -> Execution<'_> {
    let mut frame = Frame::with_inputs(inputs);
    frame.declare(std::iter::once(Variable::Result));
    frame.declare(self.instructions.iter().flat_map(|instruction| instruction.variables()));

    Execution {
      executor : self,
      frame,
      costs    : CostModel::new(self.functions),
      pointer  : 0,
      cycles   : 0,
      steps    : 0,
      halted   : self.instructions.is_empty(),
    }
  }

  /// Runs to completion. A program that never halts never returns.
  pub fn run(&self, inputs: &[Value]) -> Result<RunOutcome> {
    debug!(scope = %self.scope, ?inputs, "run started");
    let outcome = self.start(inputs).run()?;
    debug!(
      scope = %self.scope,
      result = outcome.result,
      cycles = outcome.cycles,
      steps = outcome.steps,
      "run finished"
    );
    Ok(outcome)
  }
}

/// A run in progress. Drive it with `step` for single-stepping, or `run` to finish it.
pub struct Execution<'e> {
  executor : &'e Executor<'e>,
  frame    : Frame,
  costs    : CostModel<'e>,
  pointer  : usize, // 0-based row of the next instruction
  cycles   : Cycles,
  steps    : usize,
  halted   : bool,
}

impl<'e> Execution<'e> {

  /**
    Executes the instruction at the pointer, charging its static cost. Returns `None` once the
    run has halted, either on `EXIT` or by falling off the end of the sequence. A jump to a label
    that is not attached to any instruction aborts the run.
  */
  pub fn step(&mut self) -> Result<Option<StepReport>> {
    if self.halted {
      return Ok(None);
    }

    let executor = self.executor;
    let instruction = match executor.instructions.get(self.pointer) {
      Some(instruction) => instruction,
      None => {
        self.halted = true;
        return Ok(None);
      }
    };
    let position = self.pointer + 1;

    let cost   = self.costs.instruction_cost(instruction, &executor.scope, position)?;
    let signal = execute_instruction(instruction, &mut self.frame, executor.functions, &executor.scope, position)?;

    self.cycles = self.cycles.saturating_add(cost);
    self.steps += 1;

    match &signal {
      Signal::Fallthrough => {
        self.pointer += 1;
      }
      Signal::Halt => {
        self.halted = true;
      }
      Signal::JumpTo(label) => {
        match executor.labels.position(label) {
          Some(target) => {
            self.pointer = target;
          }
          None => {
            return Err(Error::UnresolvedLabel {
              label    : label.clone(),
              scope    : executor.scope.clone(),
              position
            });
          }
        }
      }
    }
    if self.pointer >= executor.instructions.len() {
      self.halted = true;
    }

    trace!(
      scope = %executor.scope,
      position,
      instruction = %instruction,
      ?signal,
      cycles = self.cycles,
      "step"
    );
    #[cfg(feature = "trace_computation")]
    println!("{}", self);

    Ok(Some(StepReport {
      position,
      signal,
      cycles: cost,
      halted: self.halted
    }))
  }

  /// Steps until the run halts.
  pub fn run(mut self) -> Result<RunOutcome> {
    while self.step()?.is_some() {}
    Ok(self.into_outcome())
  }

  pub fn into_outcome(self) -> RunOutcome {
    RunOutcome {
      result    : self.frame.result(),
      cycles    : self.cycles,
      steps     : self.steps,
      variables : self.frame.into_values(),
    }
  }

  pub fn frame(&self) -> &Frame {
    &self.frame
  }

  /// 1-based row of the instruction the next `step` will execute.
  pub fn position(&self) -> usize {
    self.pointer + 1
  }

  pub fn cycles(&self) -> Cycles {
    self.cycles
  }

  pub fn steps(&self) -> usize {
    self.steps
  }

  pub fn is_halted(&self) -> bool {
    self.halted
  }
}

impl<'e> Display for Execution<'e> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let status = match self.halted {
      true  => "Halted.",
      false => "Running."
    };
    let table = make_machine_table(
      format!("{} ({} cycles)", self.executor.scope, self.cycles),
      self.executor.instructions,
      self.pointer,
      &self.frame
    );
    write!(f, "{}\tSteps: {}\n{}", status, self.steps, table)
  }
}

/// Applies one instruction to `frame`.
fn execute_instruction(
    instruction : &Instruction,
    frame       : &mut Frame,
    functions   : &FunctionRegistry,
    scope       : &Scope,
    position    : usize
  ) -> Result<Signal>
{
  let signal =
    match &instruction.command {

      Command::Increase(variable) => {
        frame.increment(*variable);
        Signal::Fallthrough
      }

      Command::Decrease(variable) => {
        frame.decrement(*variable);
        Signal::Fallthrough
      }

      Command::Neutral(_) => Signal::Fallthrough,

      Command::JumpNotZero { variable, target } => {
        match frame.get(*variable) != 0 {
          true  => Signal::jump(target),
          false => Signal::Fallthrough
        }
      }

      Command::ZeroVariable(variable) => {
        frame.set(*variable, 0);
        Signal::Fallthrough
      }

      Command::AssignConstant { variable, constant } => {
        frame.set(*variable, *constant);
        Signal::Fallthrough
      }

      Command::AssignVariable { variable, source } => {
        frame.set(*variable, frame.get(*source));
        Signal::Fallthrough
      }

      Command::GotoLabel { target } => Signal::jump(target),

      Command::JumpZero { variable, target } => {
        match frame.get(*variable) == 0 {
          true  => Signal::jump(target),
          false => Signal::Fallthrough
        }
      }

      Command::JumpEqualConstant { variable, constant, target } => {
        match frame.get(*variable) == *constant {
          true  => Signal::jump(target),
          false => Signal::Fallthrough
        }
      }

      Command::JumpEqualVariable { variable, other, target } => {
        match frame.get(*variable) == frame.get(*other) {
          true  => Signal::jump(target),
          false => Signal::Fallthrough
        }
      }

      Command::Quote { variable, call } => {
        let value = evaluate_call(call, frame, functions, scope, position)?;
        frame.set(*variable, value);
        Signal::Fallthrough
      }

      Command::JumpEqualFunction { variable, call, target } => {
        let value = evaluate_call(call, frame, functions, scope, position)?;
        match frame.get(*variable) == value {
          true  => Signal::jump(target),
          false => Signal::Fallthrough
        }
      }

    };
  Ok(signal)
}
