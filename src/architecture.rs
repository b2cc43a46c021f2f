//! Architecture tiers: how much of the instruction set a machine understands.

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

use crate::instruction::{Instruction, Operation};

/**
  The four tiers are ordered. A higher tier supports every operation a lower one does, so the
  derived ordering doubles as the "is at least as capable as" relation.
*/
#[derive(
  StrumDisplay, EnumString, EnumIter,
  Clone,        Copy,       Eq,       PartialEq, Ord, PartialOrd, Debug, Hash
)]
pub enum Architecture {
  I,   // INCREASE, DECREASE, NEUTRAL, JUMP_NOT_ZERO
  II,  // + ZERO_VARIABLE, CONSTANT_ASSIGNMENT, GOTO_LABEL
  III, // + ASSIGNMENT, JUMP_ZERO, JUMP_EQUAL_CONSTANT, JUMP_EQUAL_VARIABLE
  IV,  // + QUOTE, JUMP_EQUAL_FUNCTION
}

impl Architecture {

  /// The smallest tier that supports `operation`.
  pub fn minimum_for(operation: Operation) -> Architecture {
    match operation {
      | Operation::Increase
      | Operation::Decrease
      | Operation::Neutral
      | Operation::JumpNotZero       => Architecture::I,

      | Operation::ZeroVariable
      | Operation::AssignConstant
      | Operation::GotoLabel         => Architecture::II,

      | Operation::AssignVariable
      | Operation::JumpZero
      | Operation::JumpEqualConstant
      | Operation::JumpEqualVariable => Architecture::III,

      | Operation::Quote
      | Operation::JumpEqualFunction => Architecture::IV,
    }
  }

  /// The smallest tier able to run every instruction of `instructions`.
  pub fn required_for(instructions: &[Instruction]) -> Architecture {
    instructions.iter()
                .map(|instruction| Architecture::minimum_for(instruction.operation()))
                .max()
                .unwrap_or(Architecture::I)
  }

  /// Credits a run on this tier costs.
  pub fn credit_cost(&self) -> u64 {
    match self {
      Architecture::I   => 5,
      Architecture::II  => 100,
      Architecture::III => 500,
      Architecture::IV  => 1000,
    }
  }

  pub fn supports(&self, operation: Operation) -> bool {
    Architecture::minimum_for(operation) <= *self
  }

  /// The 1-based position and operation of the first instruction this tier cannot run.
  pub fn first_unsupported(&self, instructions: &[Instruction]) -> Option<(usize, Operation)> {
    instructions.iter()
                .map(|instruction| instruction.operation())
                .enumerate()
                .find(|(_, operation)| !self.supports(*operation))
                .map(|(idx, operation)| (idx + 1, operation))
  }
}

impl Default for Architecture {
  fn default() -> Architecture {
    Architecture::IV
  }
}
