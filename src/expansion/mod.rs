/*!
  Macro expansion of synthetic instructions.

  The pipeline for a requested degree `d` is this:
  ```text
  degree-0 sequence -> [`ExpansionResult::identity`] ->⋯

      ┌──────────────── d times, or until no synthetic instruction is left ───────────────┐
  ⋯->*│*-> one pass: basic instructions carried through, synthetic ones -> [`Expander`] ->*│*->⋯
      └───────────────────────────────────────────────────────────────────────────────────┘

  ⋯-> `ExpansionResult`
  ```
  A single `NameSession` is threaded through every pass, so the result for degree `d` is a prefix
  of the work done for degree `d + 1` and fresh names never collide.
*/

mod degree;
mod names;
mod result;
mod template;

use tracing::debug;

use crate::error::{Result, Scope};
use crate::function::FunctionRegistry;
use crate::instruction::Instruction;

pub use degree::DegreeModel;
pub use names::NameSession;
pub use result::{ExpansionResult, NodeId};
pub use template::Expander;

/**
  Expands `instructions` to `degree`. Requesting more passes than the sequence needs returns the
  fixed point; no pass is ever applied to a sequence that is already fully basic.
*/
pub fn expand_to_degree(
    instructions : &[Instruction],
    functions    : &FunctionRegistry,
    scope        : &Scope,
    degree       : usize
  ) -> Result<ExpansionResult>
{
  let mut result   = ExpansionResult::identity(instructions);
  let mut expander = Expander::new(functions, NameSession::for_instructions(instructions));

  while result.degree() < degree && !result.is_fully_basic() {
    result.apply_pass(|instruction, position| expander.expand(instruction, scope, position))?;
    debug!(
      %scope,
      degree = result.degree(),
      length = result.len(),
      synthetic = result.synthetic_count(),
      "expansion pass complete"
    );
  }

  Ok(result)
}

/// The number of passes `instructions` needs before it contains only basic instructions.
pub fn max_degree(instructions: &[Instruction], functions: &FunctionRegistry, scope: &Scope)
  -> Result<usize>
{
  DegreeModel::new(functions).sequence_degree(instructions, scope)
}

/// Expands the body of the function `name` on its own, as if it were a program.
pub fn expand_function_to_degree(functions: &FunctionRegistry, name: &str, degree: usize)
  -> Result<ExpansionResult>
{
  let function = functions.lookup(&name.into(), &Scope::Program, 0)?;
  expand_to_degree(&function.body, functions, &function.scope(), degree)
}
