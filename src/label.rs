//! Labels and the label table that resolves a jump target to an instruction position.

use std::fmt::{Display, Formatter};

use bimap::BiMap;
use string_cache::DefaultAtom;

use crate::error::{Error, Result, Scope};
use crate::instruction::Instruction;

/**
  A `Label` either names a jump target or is one of two sentinels. As with all strings in this
  codebase, the name of a `Label::Named` is interned, so clones are cheap.
*/
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Label {
  /// No explicit jump: fall through to the next instruction.
  Empty,
  /// Halt the program now.
  Exit,
  Named(DefaultAtom),
}

impl Label {
  pub fn named(name: &str) -> Label {
    Label::Named(DefaultAtom::from(name))
  }

  /// The label `L<number>`, the form used for freshly generated labels.
  pub fn numbered(number: usize) -> Label {
    Label::Named(DefaultAtom::from(format!("L{}", number)))
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, Label::Empty)
  }

  pub fn is_exit(&self) -> bool {
    matches!(self, Label::Exit)
  }

  /// A label that must be attached to some instruction in scope when used as a jump target.
  pub fn is_named(&self) -> bool {
    matches!(self, Label::Named(_))
  }
}

impl Default for Label {
  fn default() -> Label {
    Label::Empty
  }
}

impl Display for Label {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Label::Empty       => Ok(()),
      Label::Exit        => write!(f, "EXIT"),
      Label::Named(name) => write!(f, "{}", name),
    }
  }
}

/**
  A label table is a mapping between each named label of an instruction sequence and the 0-based
  position of the instruction it is attached to. A label table is really just a convenience
  wrapper around a BiMap, which also gives us "which label sits on this row" for free.
*/
#[derive(Debug)]
pub struct LabelTable {
  table: BiMap<Label, usize>
}

impl LabelTable {

  pub fn new() -> LabelTable {
    LabelTable {
      table: BiMap::new()
    }
  }

  /// Builds the table for `instructions`, failing if a label is attached to two instructions.
  pub fn build(instructions: &[Instruction], scope: &Scope) -> Result<LabelTable> {
    let mut table = LabelTable::new();
    for (position, instruction) in instructions.iter().enumerate() {
      if !instruction.label.is_named() {
        continue;
      }
      if let Err((label, _)) = table.insert(instruction.label.clone(), position) {
        // `insert` only fails on the left side because every position is distinct.
        let first = table.position(&label).unwrap_or(position);
        return Err(Error::DuplicateLabel {
          label,
          scope  : scope.clone(),
          first  : first + 1,
          second : position + 1,
        });
      }
    }
    Ok(table)
  }

  pub fn position(&self, label: &Label) -> Option<usize> {
    self.table.get_by_left(label).cloned()
  }

  pub fn label_at(&self, position: usize) -> Option<&Label> {
    self.table.get_by_right(&position)
  }

  pub fn contains(&self, label: &Label) -> bool {
    self.table.contains_left(label)
  }

  pub fn insert(&mut self, label: Label, position: usize) -> std::result::Result<(), (Label, usize)> {
    self.table.insert_no_overwrite(label, position)
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }
}
