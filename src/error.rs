//! Errors raised while validating, expanding, or executing a program.

use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;
use thiserror::Error;

use crate::architecture::Architecture;
use crate::instruction::Operation;
use crate::label::Label;
use crate::variable::Variable;

pub type Result<T> = std::result::Result<T, Error>;

/// The instruction sequence an error was found in: the top-level program or a function body.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Scope {
  Program,
  Function(DefaultAtom),
}

impl Display for Scope {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Scope::Program        => write!(f, "program"),
      Scope::Function(name) => write!(f, "function `{}`", name),
    }
  }
}

/// Positions are 1-based, matching instruction rows as a user sees them.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
  #[error("{scope}, instruction {position}: jump target `{label}` is not attached to any instruction")]
  UnresolvedLabel { label: Label, scope: Scope, position: usize },

  #[error("{scope}: label `{label}` is attached to more than one instruction (rows {first} and {second})")]
  DuplicateLabel { label: Label, scope: Scope, first: usize, second: usize },

  #[error("{scope}, instruction {position}: call to unknown function `{name}`")]
  UnknownFunction { name: DefaultAtom, scope: Scope, position: usize },

  #[error("{scope}, instruction {position}: malformed function argument: {reason}")]
  MalformedArgumentTree { scope: Scope, position: usize, reason: String },

  #[error("{scope}, instruction {position}: `{variable}` cannot be an instruction operand")]
  InvalidTarget { variable: Variable, scope: Scope, position: usize },

  #[error("recursive function call chain: {}", format_chain(.chain))]
  RecursiveFunction { chain: Vec<DefaultAtom> },

  #[error("no {kind} is left above the highest one the sequence already uses")]
  NamesExhausted { kind: &'static str },

  #[error("instruction {position}: {operation} is not supported by architecture {architecture}")]
  UnsupportedInstruction { operation: Operation, architecture: Architecture, position: usize },
}

fn format_chain(chain: &[DefaultAtom]) -> String {
  chain.iter().map(|name| name.to_string()).collect::<Vec<String>>().join(" -> ")
}

/// Every issue `validate()` found, returned by a failed `load()`.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("program `{program}` failed validation with {} issue(s)", .issues.len())]
pub struct LoadError {
  pub program: String,
  pub issues: Vec<Error>,
}
