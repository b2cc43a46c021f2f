//! Shared fixtures: a small library of functions and the programs the integration tests run.
#![allow(dead_code)]

use semulator::{Argument, Function, FunctionCall, Instruction, Label, Program, Variable};

pub const X1: Variable = Variable::Input(1);
pub const X2: Variable = Variable::Input(2);
pub const Y: Variable  = Variable::Result;

pub fn not() -> Function {
  Function::new("NOT", Some("1 - x1"), vec![
    Instruction::jump_not_zero(X1, Label::Exit),
    Instruction::increase(Y),
  ])
}

pub fn equal() -> Function {
  Function::new("EQUAL", Some("x1 == x2"), vec![
    Instruction::jump_equal_variable(X1, X2, Label::named("L1")),
    Instruction::goto(Label::Exit),
    Instruction::increase(Y).labeled(Label::named("L1")),
  ])
}

pub fn and() -> Function {
  Function::new("AND", Some("x1 * x2"), vec![
    Instruction::jump_zero(X1, Label::Exit),
    Instruction::jump_zero(X2, Label::Exit),
    Instruction::increase(Y),
  ])
}

pub fn smaller_equal_than() -> Function {
  Function::new("Smaller_Equal_Than", Some("x1 <= x2"), vec![
    Instruction::jump_zero(X1, Label::named("L2")).labeled(Label::named("L1")),
    Instruction::jump_zero(X2, Label::Exit),
    Instruction::decrease(X1),
    Instruction::decrease(X2),
    Instruction::goto(Label::named("L1")),
    Instruction::increase(Y).labeled(Label::named("L2")),
  ])
}

pub fn minus() -> Function {
  Function::new("Minus", Some("x1 - x2"), vec![
    Instruction::assign(Y, X1),
    Instruction::jump_zero(X2, Label::Exit).labeled(Label::named("L1")),
    Instruction::decrease(Y),
    Instruction::decrease(X2),
    Instruction::goto(Label::named("L1")),
  ])
}

pub fn successor() -> Function {
  Function::new("Successor", Some("x1 + 1"), vec![
    Instruction::assign(Y, X1),
    Instruction::increase(Y),
  ])
}

pub fn library() -> Vec<Function> {
  vec![not(), equal(), and(), smaller_equal_than(), minus(), successor()]
}

/// `program` with every library function defined.
pub fn with_library(mut program: Program) -> Program {
  for function in library() {
    program.define_function(function);
  }
  program
}

/// `(AND,(Smaller_Equal_Than,x1,x2),(NOT,(EQUAL,x2,x1)))`, which is `x1 < x2`.
pub fn strictly_smaller_call() -> FunctionCall {
  FunctionCall::new("AND", vec![
    Argument::call("Smaller_Equal_Than", vec![Argument::variable(X1), Argument::variable(X2)]),
    Argument::call("NOT", vec![
      Argument::call("EQUAL", vec![Argument::variable(X2), Argument::variable(X1)]),
    ]),
  ])
}

pub fn strictly_smaller() -> Program {
  with_library(Program::new("strictly-smaller"))
    .with_instructions(vec![Instruction::quote(Y, strictly_smaller_call())])
    .load()
    .expect("fixture program is valid")
}

/// `y <- x1; y <- y + 1`
pub fn increment() -> Program {
  Program::new("increment")
    .with_instructions(vec![
      Instruction::assign(Y, X1),
      Instruction::increase(Y),
    ])
    .load()
    .expect("fixture program is valid")
}

/// Adds `x2` to `x1` with basic instructions only, leaving the sum in `y`.
pub fn basic_addition() -> Program {
  Program::new("basic-addition")
    .with_instructions(vec![
      Instruction::jump_not_zero(X1, Label::named("A")),
      Instruction::increase(Variable::Work(1)),
      Instruction::jump_not_zero(Variable::Work(1), Label::named("B")),
      Instruction::decrease(X1).labeled(Label::named("A")),
      Instruction::increase(Y),
      Instruction::jump_not_zero(X1, Label::named("A")),
      Instruction::jump_not_zero(X2, Label::named("C")).labeled(Label::named("B")),
      Instruction::increase(Variable::Work(1)),
      Instruction::jump_not_zero(Variable::Work(1), Label::Exit),
      Instruction::decrease(X2).labeled(Label::named("C")),
      Instruction::increase(Y),
      Instruction::jump_not_zero(X2, Label::named("C")),
    ])
    .load()
    .expect("fixture program is valid")
}
