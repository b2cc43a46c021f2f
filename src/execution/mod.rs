/*!
  Direct execution of instruction sequences.

  The machine state is a `Frame` of variable values, an instruction pointer, and a cycle
  counter. Each step executes the instruction at the pointer and acts on the `Signal` it
  produces: fall through to the next row, halt, or jump to the row a label is attached to. Running
  off the end of the sequence is an implicit halt.

  Synthetic instructions, including function calls, are executed as what they mean rather than
  by expanding them, so the same interpreter runs a sequence at any degree. Function calls run the
  callee's body in a fresh frame; see `call::evaluate_call`.
*/

mod call;
mod executor;
mod frame;
mod trace;

pub use call::evaluate_call;
pub use executor::{Execution, Executor, RunOutcome, Signal, StepReport};
pub use frame::Frame;
pub use trace::{make_instruction_table, make_machine_table, make_variable_table, TABLE_DISPLAY_FORMAT};
