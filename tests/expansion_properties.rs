mod common;

use proptest::prelude::*;

use common::*;
use semulator::{Argument, FunctionCall, Instruction, Label, Program, RunRequest, Variable};

fn variable() -> BoxedStrategy<Variable> {
  prop_oneof![
    Just(Variable::Result),
    Just(Variable::Input(1)),
    Just(Variable::Input(2)),
    Just(Variable::Work(1)),
    Just(Variable::Work(2)),
  ].boxed()
}

/// Only forward jumps, so every generated program halts.
fn target() -> BoxedStrategy<Label> {
  prop_oneof![Just(Label::Exit), Just(Label::named("END"))].boxed()
}

fn leaf() -> BoxedStrategy<Argument> {
  prop_oneof![
    variable().prop_map(Argument::Variable),
    (0u64..3).prop_map(Argument::constant),
  ].boxed()
}

fn call() -> BoxedStrategy<FunctionCall> {
  prop_oneof![
    leaf().prop_map(|a| FunctionCall::new("NOT", vec![a])),
    (leaf(), leaf()).prop_map(|(a, b)| FunctionCall::new("Minus", vec![a, b])),
    (leaf(), leaf()).prop_map(|(a, b)| FunctionCall::new("Smaller_Equal_Than", vec![a, b])),
    (leaf(), leaf()).prop_map(|(a, b)| {
      FunctionCall::new("AND", vec![Argument::call("NOT", vec![a]), Argument::call("Successor", vec![b])])
    }),
  ].boxed()
}

fn instruction() -> BoxedStrategy<Instruction> {
  prop_oneof![
    variable().prop_map(Instruction::increase),
    variable().prop_map(Instruction::decrease),
    variable().prop_map(Instruction::zero),
    (variable(), 0u64..4).prop_map(|(v, k)| Instruction::assign_constant(v, k)),
    (variable(), variable()).prop_map(|(v, source)| Instruction::assign(v, source)),
    (variable(), target()).prop_map(|(v, t)| Instruction::jump_zero(v, t)),
    (variable(), 0u64..3, target()).prop_map(|(v, k, t)| Instruction::jump_equal_constant(v, k, t)),
    (variable(), variable(), target()).prop_map(|(v, other, t)| Instruction::jump_equal_variable(v, other, t)),
    (variable(), call()).prop_map(|(v, c)| Instruction::quote(v, c)),
    (variable(), call(), target()).prop_map(|(v, c, t)| Instruction::jump_equal_function(v, c, t)),
  ].boxed()
}

fn program() -> BoxedStrategy<Program> {
  prop::collection::vec(instruction(), 1..7)
    .prop_map(|mut instructions| {
      instructions.push(Instruction::neutral(Variable::Result).labeled(Label::named("END")));
      with_library(Program::new("generated"))
        .with_instructions(instructions)
        .load()
        .expect("generated programs are valid")
    })
    .boxed()
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  /// Expansion never changes the answer, at any degree.
  #[test]
  fn expansion_preserves_results(program in program(), x1 in 0u64..5, x2 in 0u64..5) {
    let direct = program.run(&RunRequest::new(vec![x1, x2])).unwrap();
    let max = program.max_degree().unwrap();
    for degree in 1..=max {
      let expanded = program.run(&RunRequest::new(vec![x1, x2]).at_degree(degree)).unwrap();
      prop_assert_eq!(expanded.result, direct.result, "degree {}", degree);
    }
  }

  /// The maximum degree is exactly where the last synthetic instruction disappears, and
  /// expanding further changes nothing.
  #[test]
  fn max_degree_is_a_stable_fixed_point(program in program(), extra in 1usize..4) {
    let max = program.max_degree().unwrap();
    let fixed = program.expand_to_degree(max).unwrap();
    prop_assert!(fixed.is_fully_basic());
    if max > 0 {
      prop_assert!(!program.expand_to_degree(max - 1).unwrap().is_fully_basic());
    }
    prop_assert_eq!(program.expand_to_degree(max + extra).unwrap(), fixed);
  }

  #[test]
  fn degree_zero_is_the_program(program in program()) {
    let expansion = program.expand_to_degree(0).unwrap();
    prop_assert_eq!(expansion.instructions(), program.instructions());
    let rows: Vec<Vec<usize>> = (1..=program.instructions().len()).map(|p| vec![p]).collect();
    prop_assert_eq!(expansion.rows(), rows);
  }

  /// Every creation chain ends at the original row the instruction is attributed to.
  #[test]
  fn provenance_leads_back_to_the_program(program in program(), degree in 0usize..5) {
    let expansion = program.expand_to_degree(degree).unwrap();
    for position in 1..=expansion.len() {
      let chain = expansion.creation_chain(position);
      let root = chain.last().unwrap();
      let row = expansion.origin_row(position).unwrap();
      prop_assert_eq!(*root, &program.instructions()[row]);
      prop_assert!(chain.len() <= expansion.degree() + 1);
    }
    let grouped: usize = expansion.rows().iter().map(|positions| positions.len()).sum();
    prop_assert_eq!(grouped, expansion.len());
  }
}

proptest! {
  #[test]
  fn strictly_smaller_compares_inputs(x1 in 0u64..8, x2 in 0u64..8) {
    let program = strictly_smaller();
    let expected = (x1 < x2) as u64;
    let max = program.max_degree().unwrap();
    prop_assert_eq!(program.run(&RunRequest::new(vec![x1, x2])).unwrap().result, expected);
    prop_assert_eq!(program.run(&RunRequest::new(vec![x1, x2]).at_degree(max)).unwrap().result, expected);
  }
}
