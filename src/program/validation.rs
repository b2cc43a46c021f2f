//! Structural checks run before a program is loaded.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;

use crate::error::{Error, Scope};
use crate::function::FunctionRegistry;
use crate::instruction::{Argument, Command, Instruction};
use crate::label::Label;
use crate::variable::Variable;

/// Everything `validate` found wrong. An empty outcome means the program can be loaded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationOutcome {
  pub issues: Vec<Error>,
}

impl ValidationOutcome {
  pub fn is_valid(&self) -> bool {
    self.issues.is_empty()
  }
}

impl Display for ValidationOutcome {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if self.issues.is_empty() {
      return write!(f, "valid");
    }
    for issue in self.issues.iter() {
      writeln!(f, "{}", issue)?;
    }
    Ok(())
  }
}

/**
  Checks the top-level `instructions` and every registered function body, in that order and then
  in function-name order, and finally the call graph as a whole. All issues are collected rather
  than stopping at the first.
*/
pub fn validate(instructions: &[Instruction], functions: &FunctionRegistry) -> ValidationOutcome {
  let mut outcome = ValidationOutcome::default();

  validate_scope(instructions, &Scope::Program, functions, &mut outcome.issues);
  for function in functions.functions() {
    validate_scope(&function.body, &function.scope(), functions, &mut outcome.issues);
  }

  if let Some(chain) = functions.find_recursion() {
    outcome.issues.push(Error::RecursiveFunction { chain });
  }
  outcome
}

fn validate_scope(
    instructions : &[Instruction],
    scope        : &Scope,
    functions    : &FunctionRegistry,
    issues       : &mut Vec<Error>
  )
{
  // Attached labels, each with the row it was first seen on.
  let mut attached: HashMap<&Label, usize> = HashMap::new();
  for (idx, instruction) in instructions.iter().enumerate() {
    if !instruction.label.is_named() {
      continue;
    }
    match attached.get(&instruction.label) {
      Some(first) => {
        issues.push(Error::DuplicateLabel {
          label  : instruction.label.clone(),
          scope  : scope.clone(),
          first  : *first,
          second : idx + 1,
        });
      }
      None => {
        attached.insert(&instruction.label, idx + 1);
      }
    }
  }

  for (idx, instruction) in instructions.iter().enumerate() {
    let position = idx + 1;

    if let Some(target) = instruction.target() {
      if !target.is_exit() && !attached.contains_key(target) {
        issues.push(Error::UnresolvedLabel {
          label: target.clone(),
          scope: scope.clone(),
          position
        });
      }
    }

    for variable in operands(&instruction.command) {
      if variable.is_constant() || !variable.is_well_formed() {
        issues.push(Error::InvalidTarget {
          variable,
          scope: scope.clone(),
          position
        });
      }
    }

    if let Some(call) = instruction.call() {
      if !functions.contains(&call.name) {
        issues.push(Error::UnknownFunction {
          name  : call.name.clone(),
          scope : scope.clone(),
          position
        });
      }
      validate_arguments(&call.arguments, scope, position, functions, issues);
    }
  }
}

/// Checks every argument of a call tree, nested calls included.
fn validate_arguments(
    arguments : &[Argument],
    scope     : &Scope,
    position  : usize,
    functions : &FunctionRegistry,
    issues    : &mut Vec<Error>
  )
{
  let mut reported: HashSet<DefaultAtom> = HashSet::new();
  for argument in arguments.iter() {
    match argument {

      Argument::Variable(variable) => {
        if !variable.is_well_formed() {
          issues.push(Error::MalformedArgumentTree {
            scope  : scope.clone(),
            position,
            reason : format!("`{}` is not a variable", variable)
          });
        }
      }

      Argument::Call(nested) => {
        if !functions.contains(&nested.name) && reported.insert(nested.name.clone()) {
          issues.push(Error::MalformedArgumentTree {
            scope  : scope.clone(),
            position,
            reason : format!("argument calls unknown function `{}`", nested.name)
          });
        }
        validate_arguments(&nested.arguments, scope, position, functions, issues);
      }

    }
  }
}

/// The variables an instruction names directly, outside any argument tree.
fn operands(command: &Command) -> Vec<Variable> {
  let mut operands: Vec<Variable> = command.variable().into_iter().collect();
  match command {
    Command::AssignVariable { source, .. }   => operands.push(*source),
    Command::JumpEqualVariable { other, .. } => operands.push(*other),
    _                                        => {}
  }
  operands
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::function::Function;
  use crate::instruction::FunctionCall;

  #[test]
  fn collects_every_issue_across_scopes() {
    let mut functions = FunctionRegistry::new();
    functions.insert(Function::new("BAD", None, vec![
      Instruction::goto(Label::named("MISSING")),
    ]));

    let instructions = vec![
      Instruction::increase(Variable::Result).labeled(Label::named("A")),
      Instruction::increase(Variable::Result).labeled(Label::named("A")),
      Instruction::assign(Variable::Result, Variable::Constant(2)),
      Instruction::quote(Variable::Result, FunctionCall::new("NOPE", vec![
        Argument::variable(Variable::Input(0)),
        Argument::call("ALSO_NOPE", vec![]),
      ])),
    ];

    let outcome = validate(&instructions, &functions);
    assert!(!outcome.is_valid());
    assert_eq!(outcome.issues, vec![
      Error::DuplicateLabel { label: Label::named("A"), scope: Scope::Program, first: 1, second: 2 },
      Error::InvalidTarget { variable: Variable::Constant(2), scope: Scope::Program, position: 3 },
      Error::UnknownFunction { name: "NOPE".into(), scope: Scope::Program, position: 4 },
      Error::MalformedArgumentTree {
        scope    : Scope::Program,
        position : 4,
        reason   : "`x0` is not a variable".to_string()
      },
      Error::MalformedArgumentTree {
        scope    : Scope::Program,
        position : 4,
        reason   : "argument calls unknown function `ALSO_NOPE`".to_string()
      },
      Error::UnresolvedLabel {
        label    : Label::named("MISSING"),
        scope    : Scope::Function("BAD".into()),
        position : 1
      },
    ]);
  }

  #[test]
  fn exit_and_constants_in_arguments_are_fine() {
    let mut functions = FunctionRegistry::new();
    functions.insert(Function::new("ID", None, vec![
      Instruction::assign(Variable::Result, Variable::Input(1)),
    ]));
    let instructions = vec![
      Instruction::jump_equal_function(
        Variable::Input(1),
        FunctionCall::new("ID", vec![Argument::constant(3)]),
        Label::Exit
      ),
    ];
    assert!(validate(&instructions, &functions).is_valid());
  }

  #[test]
  fn recursion_is_an_issue() {
    let mut functions = FunctionRegistry::new();
    functions.insert(Function::new("F", None, vec![
      Instruction::quote(Variable::Result, FunctionCall::new("F", vec![Argument::variable(Variable::Input(1))])),
    ]));
    let outcome = validate(&[], &functions);
    assert_eq!(
      outcome.issues,
      vec![Error::RecursiveFunction { chain: vec!["F".into(), "F".into()] }]
    );
  }
}
