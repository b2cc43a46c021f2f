/*!
  The instruction model of the S language.

  There are two classes of instructions. The four *basic* instructions (increase, decrease,
  neutral, and jump-if-not-zero) are the primitives every program eventually reduces to. Every
  other instruction is *synthetic*: it is defined by a one-step expansion template into basic
  and/or synthetic instructions (see `crate::expansion`).

  An instruction is stored as an attached `Label` plus a `Command`, a closed sum type with one
  variant per operation carrying that operation's operands. The operation itself, the bare tag
  without operands, is an `Operation`, which carries the per-kind data: its textual name, its
  cycle cost, and whether it is basic.
*/

mod argument;
mod cost;

use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::label::Label;
use crate::variable::{Value, Variable};

pub use argument::{Argument, CallIter, FunctionCall};
pub use cost::{CostModel, Cycles};

/**
  Opcodes of the S language.

  As in C, enum values are represented by consecutive natural numbers and can be treated as
  numeric types. Therefore, we group the basic opcodes before the synthetic ones so that
  whether an operation is basic can be determined with a trivial comparison. Consequently, the
  order the opcodes are listed below is significant. Order-dependencies:
      ```
      Operation::is_basic()
      Operation::is_call()
      ```
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u8)]
pub enum Operation {
  // Basic opcodes //
  #[strum(serialize = "INCREASE")]
  Increase,            // V <- V + 1
  #[strum(serialize = "DECREASE")]
  Decrease,            // V <- V - 1
  #[strum(serialize = "NEUTRAL")]
  Neutral,             // V <- V
  #[strum(serialize = "JUMP_NOT_ZERO")]
  JumpNotZero,         // IF V != 0 GOTO L
  // Opcode 4

  // Synthetic opcodes //
  #[strum(serialize = "ZERO_VARIABLE")]
  ZeroVariable,        // V <- 0
  #[strum(serialize = "CONSTANT_ASSIGNMENT")]
  AssignConstant,      // V <- K
  #[strum(serialize = "ASSIGNMENT")]
  AssignVariable,      // V <- V'
  #[strum(serialize = "GOTO_LABEL")]
  GotoLabel,           // GOTO L
  #[strum(serialize = "JUMP_ZERO")]
  JumpZero,            // IF V == 0 GOTO L
  #[strum(serialize = "JUMP_EQUAL_CONSTANT")]
  JumpEqualConstant,   // IF V == K GOTO L
  #[strum(serialize = "JUMP_EQUAL_VARIABLE")]
  JumpEqualVariable,   // IF V == V' GOTO L
  // Opcode 11

  // Function call opcodes //
  #[strum(serialize = "QUOTE")]
  Quote,               // V <- (F, a_1, …, a_n)
  #[strum(serialize = "JUMP_EQUAL_FUNCTION")]
  JumpEqualFunction,   // IF V == (F, a_1, …, a_n) GOTO L
}

pub const FIRST_SYNTHETIC_OPCODE: u8 = 4u8;
pub const FIRST_CALL_OPCODE: u8 = 11u8;

impl Operation {

  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn is_basic(&self) -> bool {
    self.code() < FIRST_SYNTHETIC_OPCODE
  }

  pub fn is_synthetic(&self) -> bool {
    !self.is_basic()
  }

  pub fn is_call(&self) -> bool {
    self.code() >= FIRST_CALL_OPCODE
  }

  /// `B` for basic or `S` for synthetic, the way instruction listings mark the class.
  pub fn class_letter(&self) -> char {
    match self.is_basic() {
      true  => 'B',
      false => 'S'
    }
  }

  /**
    The fixed cost, in cycles, of executing the operation. For the two call operations this is
    only the call overhead; the full cost of a call also includes its arguments and the
    invoked function's body (see `CostModel`).
  */
  pub fn cycles(&self) -> Cycles {
    match self {
      Operation::Increase          => 1,
      Operation::Decrease          => 1,
      Operation::Neutral           => 0,
      Operation::JumpNotZero       => 2,
      Operation::ZeroVariable      => 1,
      Operation::AssignConstant    => 2,
      Operation::AssignVariable    => 4,
      Operation::GotoLabel         => 1,
      Operation::JumpZero          => 2,
      Operation::JumpEqualConstant => 2,
      Operation::JumpEqualVariable => 2,
      Operation::Quote             => 5,
      Operation::JumpEqualFunction => 6,
    }
  }
}

/// The operands of an instruction, one variant per `Operation`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Command {
  Increase(Variable),
  Decrease(Variable),
  Neutral(Variable),
  JumpNotZero       { variable: Variable, target: Label },
  ZeroVariable(Variable),
  AssignConstant    { variable: Variable, constant: Value },
  AssignVariable    { variable: Variable, source: Variable },
  GotoLabel         { target: Label },
  JumpZero          { variable: Variable, target: Label },
  JumpEqualConstant { variable: Variable, constant: Value, target: Label },
  JumpEqualVariable { variable: Variable, other: Variable, target: Label },
  Quote             { variable: Variable, call: FunctionCall },
  JumpEqualFunction { variable: Variable, call: FunctionCall, target: Label },
}

impl Command {

  pub fn operation(&self) -> Operation {
    match self {
      Command::Increase(_)              => Operation::Increase,
      Command::Decrease(_)              => Operation::Decrease,
      Command::Neutral(_)               => Operation::Neutral,
      Command::JumpNotZero { .. }       => Operation::JumpNotZero,
      Command::ZeroVariable(_)          => Operation::ZeroVariable,
      Command::AssignConstant { .. }    => Operation::AssignConstant,
      Command::AssignVariable { .. }    => Operation::AssignVariable,
      Command::GotoLabel { .. }         => Operation::GotoLabel,
      Command::JumpZero { .. }          => Operation::JumpZero,
      Command::JumpEqualConstant { .. } => Operation::JumpEqualConstant,
      Command::JumpEqualVariable { .. } => Operation::JumpEqualVariable,
      Command::Quote { .. }             => Operation::Quote,
      Command::JumpEqualFunction { .. } => Operation::JumpEqualFunction,
    }
  }

  /// The variable the instruction is about. `GOTO` is the only instruction without one.
  pub fn variable(&self) -> Option<Variable> {
    match self {
      | Command::Increase(variable)
      | Command::Decrease(variable)
      | Command::Neutral(variable)
      | Command::ZeroVariable(variable)
      | Command::JumpNotZero { variable, .. }
      | Command::AssignConstant { variable, .. }
      | Command::AssignVariable { variable, .. }
      | Command::JumpZero { variable, .. }
      | Command::JumpEqualConstant { variable, .. }
      | Command::JumpEqualVariable { variable, .. }
      | Command::Quote { variable, .. }
      | Command::JumpEqualFunction { variable, .. } => Some(*variable),
      Command::GotoLabel { .. }                      => None,
    }
  }

  /// The variable the instruction writes, if any. Jumps only read their variable.
  pub fn written_variable(&self) -> Option<Variable> {
    match self {
      | Command::Increase(variable)
      | Command::Decrease(variable)
      | Command::Neutral(variable)
      | Command::ZeroVariable(variable)
      | Command::AssignConstant { variable, .. }
      | Command::AssignVariable { variable, .. }
      | Command::Quote { variable, .. } => Some(*variable),
      _                                  => None,
    }
  }

  /// The label a jump instruction may transfer control to.
  pub fn target(&self) -> Option<&Label> {
    match self {
      | Command::JumpNotZero { target, .. }
      | Command::GotoLabel { target }
      | Command::JumpZero { target, .. }
      | Command::JumpEqualConstant { target, .. }
      | Command::JumpEqualVariable { target, .. }
      | Command::JumpEqualFunction { target, .. } => Some(target),
      _                                            => None,
    }
  }

  pub fn call(&self) -> Option<&FunctionCall> {
    match self {
      | Command::Quote { call, .. }
      | Command::JumpEqualFunction { call, .. } => Some(call),
      _                                          => None,
    }
  }

  /// Every variable the instruction mentions, including those inside argument trees.
  pub fn variables(&self) -> Vec<Variable> {
    let mut variables: Vec<Variable> = self.variable().into_iter().collect();
    match self {
      Command::AssignVariable { source, .. }   => variables.push(*source),
      Command::JumpEqualVariable { other, .. } => variables.push(*other),
      | Command::Quote { call, .. }
      | Command::JumpEqualFunction { call, .. } => variables.extend(call.variables()),
      _                                          => {}
    }
    variables
  }

  /**
    Rebuilds the command with every variable passed through `rename_variable` and every jump
    target passed through `rename_label`. Constants inside argument trees are passed through
    `rename_variable` as well; it is up to the caller to leave them alone.
  */
  pub fn rename<V, L>(&self, rename_variable: &mut V, rename_label: &mut L) -> Command
    where V: FnMut(Variable) -> Variable,
          L: FnMut(&Label) -> Label
  {
    match self {
      Command::Increase(v)     => Command::Increase(rename_variable(*v)),
      Command::Decrease(v)     => Command::Decrease(rename_variable(*v)),
      Command::Neutral(v)      => Command::Neutral(rename_variable(*v)),
      Command::ZeroVariable(v) => Command::ZeroVariable(rename_variable(*v)),

      Command::JumpNotZero { variable, target } => Command::JumpNotZero {
        variable : rename_variable(*variable),
        target   : rename_label(target),
      },

      Command::AssignConstant { variable, constant } => Command::AssignConstant {
        variable : rename_variable(*variable),
        constant : *constant,
      },

      Command::AssignVariable { variable, source } => Command::AssignVariable {
        variable : rename_variable(*variable),
        source   : rename_variable(*source),
      },

      Command::GotoLabel { target } => Command::GotoLabel { target: rename_label(target) },

      Command::JumpZero { variable, target } => Command::JumpZero {
        variable : rename_variable(*variable),
        target   : rename_label(target),
      },

      Command::JumpEqualConstant { variable, constant, target } => Command::JumpEqualConstant {
        variable : rename_variable(*variable),
        constant : *constant,
        target   : rename_label(target),
      },

      Command::JumpEqualVariable { variable, other, target } => Command::JumpEqualVariable {
        variable : rename_variable(*variable),
        other    : rename_variable(*other),
        target   : rename_label(target),
      },

      Command::Quote { variable, call } => Command::Quote {
        variable : rename_variable(*variable),
        call     : call.rename_variables(rename_variable),
      },

      Command::JumpEqualFunction { variable, call, target } => Command::JumpEqualFunction {
        variable : rename_variable(*variable),
        call     : call.rename_variables(rename_variable),
        target   : rename_label(target),
      },
    }
  }
}

impl Display for Command {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Command::Increase(v)     => write!(f, "{} <- {} + 1", v, v),
      Command::Decrease(v)     => write!(f, "{} <- {} - 1", v, v),
      Command::Neutral(v)      => write!(f, "{} <- {}", v, v),
      Command::ZeroVariable(v) => write!(f, "{} <- 0", v),

      Command::JumpNotZero { variable, target } => {
        write!(f, "IF {} != 0 GOTO {}", variable, target)
      }
      Command::AssignConstant { variable, constant } => write!(f, "{} <- {}", variable, constant),
      Command::AssignVariable { variable, source }   => write!(f, "{} <- {}", variable, source),
      Command::GotoLabel { target }                  => write!(f, "GOTO {}", target),
      Command::JumpZero { variable, target }         => {
        write!(f, "IF {} == 0 GOTO {}", variable, target)
      }
      Command::JumpEqualConstant { variable, constant, target } => {
        write!(f, "IF {} == {} GOTO {}", variable, constant, target)
      }
      Command::JumpEqualVariable { variable, other, target } => {
        write!(f, "IF {} == {} GOTO {}", variable, other, target)
      }
      Command::Quote { variable, call } => write!(f, "{} <- {}", variable, call),
      Command::JumpEqualFunction { variable, call, target } => {
        write!(f, "IF {} == {} GOTO {}", variable, call, target)
      }
    }
  }
}

/// A `Command` together with the label attached to it, if any.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
  pub label   : Label,
  pub command : Command,
}

impl Instruction {

  pub fn new(command: Command) -> Instruction {
    Instruction {
      label: Label::Empty,
      command
    }
  }

  /// Attaches `label` to the instruction, replacing any label it had.
  pub fn labeled(mut self, label: Label) -> Instruction {
    self.label = label;
    self
  }

  // region Constructors, one per operation

  pub fn increase(variable: Variable) -> Instruction {
    Instruction::new(Command::Increase(variable))
  }

  pub fn decrease(variable: Variable) -> Instruction {
    Instruction::new(Command::Decrease(variable))
  }

  pub fn neutral(variable: Variable) -> Instruction {
    Instruction::new(Command::Neutral(variable))
  }

  pub fn jump_not_zero(variable: Variable, target: Label) -> Instruction {
    Instruction::new(Command::JumpNotZero { variable, target })
  }

  pub fn zero(variable: Variable) -> Instruction {
    Instruction::new(Command::ZeroVariable(variable))
  }

  pub fn assign_constant(variable: Variable, constant: Value) -> Instruction {
    Instruction::new(Command::AssignConstant { variable, constant })
  }

  pub fn assign(variable: Variable, source: Variable) -> Instruction {
    Instruction::new(Command::AssignVariable { variable, source })
  }

  pub fn goto(target: Label) -> Instruction {
    Instruction::new(Command::GotoLabel { target })
  }

  pub fn jump_zero(variable: Variable, target: Label) -> Instruction {
    Instruction::new(Command::JumpZero { variable, target })
  }

  pub fn jump_equal_constant(variable: Variable, constant: Value, target: Label) -> Instruction {
    Instruction::new(Command::JumpEqualConstant { variable, constant, target })
  }

  pub fn jump_equal_variable(variable: Variable, other: Variable, target: Label) -> Instruction {
    Instruction::new(Command::JumpEqualVariable { variable, other, target })
  }

  pub fn quote(variable: Variable, call: FunctionCall) -> Instruction {
    Instruction::new(Command::Quote { variable, call })
  }

  pub fn jump_equal_function(variable: Variable, call: FunctionCall, target: Label) -> Instruction {
    Instruction::new(Command::JumpEqualFunction { variable, call, target })
  }

  // endregion

  pub fn operation(&self) -> Operation {
    self.command.operation()
  }

  pub fn is_basic(&self) -> bool {
    self.operation().is_basic()
  }

  pub fn is_synthetic(&self) -> bool {
    self.operation().is_synthetic()
  }

  pub fn variable(&self) -> Option<Variable> {
    self.command.variable()
  }

  pub fn target(&self) -> Option<&Label> {
    self.command.target()
  }

  pub fn call(&self) -> Option<&FunctionCall> {
    self.command.call()
  }

  pub fn variables(&self) -> Vec<Variable> {
    self.command.variables()
  }

  /// Rebuilds the instruction, renaming its attached label along with its operands.
  pub fn rename<V, L>(&self, rename_variable: &mut V, rename_label: &mut L) -> Instruction
    where V: FnMut(Variable) -> Variable,
          L: FnMut(&Label) -> Label
  {
    Instruction {
      label   : rename_label(&self.label),
      command : self.command.rename(rename_variable, rename_label),
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match &self.label {
      Label::Empty => write!(f, "{}", self.command),
      label        => write!(f, "[{}] {}", label, self.command),
    }
  }
}
