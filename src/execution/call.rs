//! Direct evaluation of function calls, without expanding them first.

use tracing::trace;

use crate::error::{Result, Scope};
use crate::function::FunctionRegistry;
use crate::instruction::{Argument, FunctionCall};
use crate::variable::Value;

use super::executor::Executor;
use super::frame::Frame;

/**
  Evaluates `call` against the caller's `frame`. Arguments are evaluated bottom-up, left to right:
  a variable argument reads the caller's frame, a nested call recurses into this same procedure.
  The callee's body then runs in a fresh frame with the argument values bound to `x1`, `x2`, …,
  and its `y` is the value of the call. `scope` and `position` locate the calling instruction for
  error reporting.
*/
pub fn evaluate_call(
    call      : &FunctionCall,
    frame     : &Frame,
    functions : &FunctionRegistry,
    scope     : &Scope,
    position  : usize
  ) -> Result<Value>
{
  let mut arguments: Vec<Value> = Vec::with_capacity(call.arguments.len());
  for argument in call.arguments.iter() {
    let value =
      match argument {
        Argument::Variable(variable) => frame.get(*variable),
        Argument::Call(nested)       => evaluate_call(nested, frame, functions, scope, position)?,
      };
    arguments.push(value);
  }

  let function = functions.lookup(&call.name, scope, position)?;
  let outcome  = Executor::for_function(function, functions)?.run(&arguments)?;

  trace!(function = %call.name, ?arguments, result = outcome.result, "call evaluated");
  Ok(outcome.result)
}
