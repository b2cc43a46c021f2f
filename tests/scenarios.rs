mod common;

use common::*;
use semulator::{
  Architecture, Argument, Error, FunctionCall, Instruction, Label, Operation, Program, RunRequest,
  Scope, Variable
};

#[test]
fn increment_computes_successor_at_every_degree() {
  let program = increment();
  let max = program.max_degree().unwrap();
  assert_eq!(max, 2);
  for degree in 0..=max {
    let outcome = program.run(&RunRequest::new(vec![4]).at_degree(degree)).unwrap();
    assert_eq!(outcome.result, 5, "degree {}", degree);
  }
}

#[test]
fn composed_functions_agree_direct_and_expanded() {
  let program = strictly_smaller();

  let direct = program.run(&RunRequest::new(vec![2, 5])).unwrap();
  assert_eq!(direct.result, 1);

  let max = program.max_degree().unwrap();
  let expansion = program.expand_to_degree(max).unwrap();
  assert!(expansion.is_fully_basic());
  assert_eq!(expansion.required_architecture(), Architecture::I);

  let expanded = program.run(&RunRequest::new(vec![2, 5]).at_degree(max).on(Architecture::I)).unwrap();
  assert_eq!(expanded.result, direct.result);

  for (x1, x2) in &[(5, 2), (3, 3), (0, 1), (0, 0)] {
    let expected = (x1 < x2) as u64;
    let inputs = vec![*x1, *x2];
    assert_eq!(program.run(&RunRequest::new(inputs.clone())).unwrap().result, expected);
    assert_eq!(program.run(&RunRequest::new(inputs).at_degree(max)).unwrap().result, expected);
  }
}

#[test]
fn basic_programs_have_degree_zero_and_never_change() {
  let program = basic_addition();
  assert_eq!(program.max_degree(), Ok(0));
  for degree in &[0, 1, 7] {
    let expansion = program.expand_to_degree(*degree).unwrap();
    assert_eq!(expansion.instructions(), program.instructions());
    assert_eq!(expansion.degree(), 0);
  }

  let outcome = program.run(&RunRequest::new(vec![3, 4]).on(Architecture::I)).unwrap();
  assert_eq!(outcome.result, 7);
  // Cycles agree at any degree when there is nothing to expand. Programs with calls are not
  // compared: a direct run charges each call its static cost (see DESIGN.md, direct-run cycles).
  let again = program.run(&RunRequest::new(vec![3, 4]).at_degree(3)).unwrap();
  assert_eq!(again.cycles, outcome.cycles);
}

#[test]
fn jump_equal_function_branches_on_the_call_result() {
  // IF x2 == (Minus,x1,(Successor,x2)) GOTO L1; y <- 7; GOTO EXIT; [L1] y <- 1
  let program = with_library(Program::new("minus-test"))
    .with_instructions(vec![
      Instruction::jump_equal_function(
        X2,
        FunctionCall::new("Minus", vec![
          Argument::variable(X1),
          Argument::call("Successor", vec![Argument::variable(X2)]),
        ]),
        Label::named("L1")
      ),
      Instruction::assign_constant(Y, 7),
      Instruction::goto(Label::Exit),
      Instruction::assign_constant(Y, 1).labeled(Label::named("L1")),
    ])
    .load()
    .unwrap();

  let max = program.max_degree().unwrap();
  for degree in &[0, 1, max] {
    // 7 - (3 + 1) == 3
    let taken = program.run(&RunRequest::new(vec![7, 3]).at_degree(*degree)).unwrap();
    assert_eq!(taken.result, 1);
    let not_taken = program.run(&RunRequest::new(vec![7, 2]).at_degree(*degree)).unwrap();
    assert_eq!(not_taken.result, 7);
  }
}

#[test]
fn direct_runs_charge_static_call_costs() {
  let program = with_library(Program::new("not"))
    .with_instructions(vec![
      Instruction::quote(Y, FunctionCall::new("NOT", vec![Argument::variable(X1)])),
    ])
    .load()
    .unwrap();
  let outcome = program.run(&RunRequest::new(vec![0])).unwrap();
  assert_eq!(outcome.result, 1);
  // QUOTE overhead 5, NOT body 2 + 1.
  assert_eq!(outcome.cycles, 8);
  assert_eq!(outcome.steps, 1);
}

#[test]
fn final_state_lists_every_variable_in_order() {
  let outcome = increment().run(&RunRequest::new(vec![4, 9])).unwrap();
  let listed: Vec<(Variable, u64)> = outcome.variables.into_iter().collect();
  assert_eq!(listed, vec![(Y, 5), (X1, 4), (X2, 9)]);
}

#[test]
fn load_reports_every_issue() {
  let program = Program::new("broken")
    .with_instructions(vec![
      Instruction::goto(Label::named("NOWHERE")),
      Instruction::quote(Y, FunctionCall::new("MISSING", vec![])),
    ]);
  let error = program.load().unwrap_err();
  assert_eq!(error.issues, vec![
    Error::UnresolvedLabel { label: Label::named("NOWHERE"), scope: Scope::Program, position: 1 },
    Error::UnknownFunction { name: "MISSING".into(), scope: Scope::Program, position: 2 },
  ]);
  assert_eq!(error.to_string(), "program `broken` failed validation with 2 issue(s)");
}

#[test]
fn recursive_functions_are_rejected_at_load() {
  let program = with_library(Program::new("recursive"))
    .with_function(semulator::Function::new("LOOP", None, vec![
      Instruction::quote(Y, FunctionCall::new("LOOP", vec![Argument::variable(X1)])),
    ]))
    .with_instructions(vec![Instruction::increase(Y)]);
  let error = program.load().unwrap_err();
  assert_eq!(
    error.issues,
    vec![Error::RecursiveFunction { chain: vec!["LOOP".into(), "LOOP".into()] }]
  );
}

#[test]
fn unloaded_programs_surface_errors_where_they_occur() {
  // Never validated: the unknown call is only a problem once it is reached.
  let program = Program::new("lazy")
    .with_instructions(vec![
      Instruction::jump_zero(X1, Label::Exit),
      Instruction::quote(Y, FunctionCall::new("MISSING", vec![])),
    ]);
  let executor = program.executor().unwrap();
  assert_eq!(executor.run(&[0]).map(|o| o.result), Ok(0));
  assert_eq!(
    executor.run(&[1]),
    Err(Error::UnknownFunction { name: "MISSING".into(), scope: Scope::Program, position: 2 })
  );
}

#[test]
fn architecture_gates_runs() {
  let program = strictly_smaller();
  let request = RunRequest::new(vec![1, 2]).on(Architecture::III);
  assert_eq!(
    program.run(&request),
    Err(Error::UnsupportedInstruction {
      operation    : Operation::Quote,
      architecture : Architecture::III,
      position     : 1
    })
  );
  // Three passes unfold the three levels of call nesting.
  assert_eq!(program.run(&request.at_degree(3)).map(|o| o.result), Ok(1));
}

#[test]
fn expansion_fails_cleanly_when_fresh_names_run_out() {
  let last_work = Variable::Work(u32::MAX);
  let program = Program::new("crowded")
    .with_instructions(vec![
      Instruction::increase(last_work),
      Instruction::assign(Y, X1),
    ])
    .load()
    .unwrap();
  assert_eq!(program.run(&RunRequest::new(vec![3])).map(|o| o.result), Ok(3));
  assert_eq!(
    program.expand_to_degree(2).map(|e| e.len()),
    Err(Error::NamesExhausted { kind: "work variable" })
  );

  let program = Program::new("crowded-labels")
    .with_instructions(vec![
      Instruction::increase(Y).labeled(Label::numbered(usize::MAX)),
      Instruction::zero(Y),
    ])
    .load()
    .unwrap();
  assert_eq!(
    program.run(&RunRequest::new(vec![]).at_degree(1)).map(|o| o.result),
    Err(Error::NamesExhausted { kind: "label" })
  );
}

#[test]
fn unloaded_calls_into_recursive_functions_cannot_be_costed() {
  // COUNTDOWN(x1) halts for every input, but its static cost would include itself.
  let countdown = semulator::Function::new("COUNTDOWN", None, vec![
    Instruction::jump_zero(X1, Label::Exit),
    Instruction::assign(Variable::Work(1), X1),
    Instruction::decrease(Variable::Work(1)),
    Instruction::quote(Y, FunctionCall::new("COUNTDOWN", vec![Argument::variable(Variable::Work(1))])),
  ]);
  let program = Program::new("countdown")
    .with_function(countdown)
    .with_instructions(vec![
      Instruction::quote(Y, FunctionCall::new("COUNTDOWN", vec![Argument::variable(X1)])),
    ]);
  assert_eq!(
    program.run(&RunRequest::new(vec![2])).map(|o| o.result),
    Err(Error::RecursiveFunction { chain: vec!["COUNTDOWN".into(), "COUNTDOWN".into()] })
  );
}
