//! Demonstration driver: builds a program that composes functions, then runs it directly and
//! after expanding it to its maximum degree. Set `RUST_LOG=semulator=debug` to watch the passes.

use tracing_subscriber::{fmt, EnvFilter};

use semulator::{
  Architecture, Argument, Function, FunctionCall, Instruction, Label, Program, RunRequest, Variable
};

fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,semulator=info"));

  fmt()
    .with_env_filter(filter)
    .with_target(false)
    .init();
}

fn functions() -> Vec<Function> {
  let x1 = Variable::Input(1);
  let x2 = Variable::Input(2);
  let y  = Variable::Result;

  vec![
    Function::new("NOT", Some("1 - x1"), vec![
      Instruction::jump_not_zero(x1, Label::Exit),
      Instruction::increase(y),
    ]),
    Function::new("EQUAL", Some("x1 == x2"), vec![
      Instruction::jump_equal_variable(x1, x2, Label::named("L1")),
      Instruction::goto(Label::Exit),
      Instruction::increase(y).labeled(Label::named("L1")),
    ]),
    Function::new("AND", Some("x1 * x2"), vec![
      Instruction::jump_zero(x1, Label::Exit),
      Instruction::jump_zero(x2, Label::Exit),
      Instruction::increase(y),
    ]),
    Function::new("Smaller_Equal_Than", Some("x1 <= x2"), vec![
      Instruction::jump_zero(x1, Label::named("L2")).labeled(Label::named("L1")),
      Instruction::jump_zero(x2, Label::Exit),
      Instruction::decrease(x1),
      Instruction::decrease(x2),
      Instruction::goto(Label::named("L1")),
      Instruction::increase(y).labeled(Label::named("L2")),
    ]),
  ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  init_logging();

  #[cfg(feature = "trace_computation")]
  println!("Computation Tracing ENABLED");

  // y <- (AND,(Smaller_Equal_Than,x1,x2),(NOT,(EQUAL,x2,x1)))
  let composition = FunctionCall::new("AND", vec![
    Argument::call("Smaller_Equal_Than", vec![
      Argument::variable(Variable::Input(1)),
      Argument::variable(Variable::Input(2)),
    ]),
    Argument::call("NOT", vec![
      Argument::call("EQUAL", vec![
        Argument::variable(Variable::Input(2)),
        Argument::variable(Variable::Input(1)),
      ]),
    ]),
  ]);

  let mut program = Program::new("strictly-smaller");
  for function in functions() {
    program.define_function(function);
  }
  program.push_instruction(Instruction::quote(Variable::Result, composition.clone()));
  let program = program.load()?;

  println!("{}", program);
  println!("Argument tree:\n{}\n", composition.tree_string());

  let inputs = vec![2, 5];
  let direct = program.run(&RunRequest::new(inputs.clone()))?;
  println!("Direct run:   y = {} in {} cycles ({} steps)", direct.result, direct.cycles, direct.steps);

  let max_degree = program.max_degree()?;
  let expansion = program.expand_to_degree(max_degree)?;
  println!("Maximum degree {}, expanded to {} basic instructions", max_degree, expansion.len());

  let expanded = program.run(&RunRequest::new(inputs).at_degree(max_degree).on(Architecture::I))?;
  println!("Expanded run: y = {} in {} cycles ({} steps)", expanded.result, expanded.cycles, expanded.steps);

  let degree_one = program.expand_to_degree(1)?;
  println!("\n{}", degree_one);

  Ok(())
}
