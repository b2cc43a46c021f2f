/*!
  An emulator for the S language, a minimal register-machine language.

  Programs are built from four *basic* instructions and a larger set of *synthetic* ones, each of
  which is defined by a one-step expansion into simpler instructions, plus user-defined functions
  that can be composed as expression trees. The crate

    * validates and represents programs (`program`),
    * expands synthetic instructions one degree at a time down to basic instructions, tracking the
      instruction each expanded instruction came from (`expansion`),
    * computes the cycle cost of any instruction, function calls included (`instruction::CostModel`),
    * runs any instruction sequence directly, expanded or not (`execution`).
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;
extern crate strum;

pub mod architecture;
pub mod error;
pub mod execution;
pub mod expansion;
pub mod function;
pub mod instruction;
pub mod label;
pub mod program;
pub mod variable;

pub use architecture::Architecture;
pub use error::{Error, LoadError, Result, Scope};
pub use execution::{Execution, Executor, Frame, RunOutcome, Signal, StepReport};
pub use expansion::ExpansionResult;
pub use function::{Function, FunctionRegistry};
pub use instruction::{Argument, Command, FunctionCall, Instruction, Operation};
pub use label::Label;
pub use program::{Program, RunRequest, ValidationOutcome};
pub use variable::{Value, Variable};
