//! Fresh work variables and labels for a single expansion.

use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::label::Label;
use crate::variable::{Variable, VariableNumberType};

/**
  Hands out work variables and labels that appear nowhere in the sequence the session was seeded
  with, nor in anything the session has already handed out. One session lives for the whole of an
  `expand_to_degree` call, across every pass, so no two templates, however nested, share a name.
*/
#[derive(Clone, Debug)]
pub struct NameSession {
  // `None` once the numbering has run past the largest representable name.
  next_work  : Option<VariableNumberType>,
  next_label : Option<usize>,
}

impl NameSession {

  /// Starts numbering above every `zN` and every `LN` label already used by `instructions`.
  pub fn for_instructions(instructions: &[Instruction]) -> NameSession {
    let mut session = NameSession {
      next_work  : Some(1),
      next_label : Some(1)
    };

    for instruction in instructions.iter() {
      for variable in instruction.variables() {
        if let Variable::Work(n) = variable {
          session.next_work = above(session.next_work, n.checked_add(1));
        }
      }
      for label in std::iter::once(&instruction.label).chain(instruction.target()) {
        if let Some(n) = label_number(label) {
          session.next_label = above(session.next_label, n.checked_add(1));
        }
      }
    }
    session
  }

  pub fn fresh_work(&mut self) -> Result<Variable> {
    let n = self.next_work.ok_or(Error::NamesExhausted { kind: "work variable" })?;
    self.next_work = n.checked_add(1);
    Ok(Variable::Work(n))
  }

  pub fn fresh_label(&mut self) -> Result<Label> {
    let n = self.next_label.ok_or(Error::NamesExhausted { kind: "label" })?;
    self.next_label = n.checked_add(1);
    Ok(Label::numbered(n))
  }
}

fn above<T: Ord>(current: Option<T>, candidate: Option<T>) -> Option<T> {
  match (current, candidate) {
    (Some(current), Some(candidate)) => Some(current.max(candidate)),
    _                                => None
  }
}

/// The `N` of a label named `LN`.
fn label_number(label: &Label) -> Option<usize> {
  match label {
    Label::Named(name) => {
      let digits = name.strip_prefix('L')?;
      match digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        true  => None,
        false => digits.parse::<usize>().ok()
      }
    }
    _ => None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fresh_names_avoid_the_seed() {
    let instructions = vec![
      Instruction::increase(Variable::Work(4)).labeled(Label::named("L2")),
      Instruction::jump_not_zero(Variable::Work(1), Label::named("L9")),
      Instruction::goto(Label::named("LOOP")),
    ];
    let mut session = NameSession::for_instructions(&instructions);
    assert_eq!(session.fresh_work(), Ok(Variable::Work(5)));
    assert_eq!(session.fresh_work(), Ok(Variable::Work(6)));
    assert_eq!(session.fresh_label(), Ok(Label::numbered(10)));
    assert_eq!(session.fresh_label(), Ok(Label::numbered(11)));
  }

  #[test]
  fn numbering_stops_at_the_largest_name() {
    let instructions = vec![
      Instruction::increase(Variable::Work(VariableNumberType::MAX))
        .labeled(Label::numbered(usize::MAX)),
    ];
    let mut session = NameSession::for_instructions(&instructions);
    assert_eq!(session.fresh_work(), Err(Error::NamesExhausted { kind: "work variable" }));
    assert_eq!(session.fresh_label(), Err(Error::NamesExhausted { kind: "label" }));

    let mut session = NameSession::for_instructions(&[
      Instruction::increase(Variable::Work(VariableNumberType::MAX - 1)),
    ]);
    assert_eq!(session.fresh_work(), Ok(Variable::Work(VariableNumberType::MAX)));
    assert_eq!(session.fresh_work(), Err(Error::NamesExhausted { kind: "work variable" }));
  }

  #[test]
  fn only_l_followed_by_digits_counts() {
    assert_eq!(label_number(&Label::named("L17")), Some(17));
    assert_eq!(label_number(&Label::named("L")), None);
    assert_eq!(label_number(&Label::named("LOOP")), None);
    assert_eq!(label_number(&Label::named("L+1")), None);
    assert_eq!(label_number(&Label::Exit), None);
  }
}
