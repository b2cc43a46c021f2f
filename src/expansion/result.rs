/*!
  The immutable snapshot produced by expanding a sequence to some degree, together with the
  provenance forest linking every instruction back to the row of the original sequence it came
  from.

  Every instruction occurrence ever produced lives in an arena of nodes and is identified by its
  `NodeId`. A node records the node it was expanded from, so the creation chain of an instruction
  is a walk over indices. Basic instructions are carried through a pass as the same node; only
  replaced instructions get children.
*/

use std::fmt::{Display, Formatter};

use prettytable::Table;

use crate::architecture::Architecture;
use crate::error::Result;
use crate::execution::TABLE_DISPLAY_FORMAT;
use crate::instruction::Instruction;

pub type NodeId = usize;

#[derive(Clone, Debug, Eq, PartialEq)]
struct Node {
  instruction : Instruction,
  parent      : Option<NodeId>,
  origin_row  : usize, // 0-based row of the degree-0 ancestor
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExpansionResult {
  nodes        : Vec<Node>,
  sequence     : Vec<NodeId>,      // The snapshot, in order.
  instructions : Vec<Instruction>, // `sequence` resolved, so it can be handed out as a slice.
  degree       : usize,
}

impl ExpansionResult {

  /// The degree-0 snapshot: every instruction is its own root.
  pub fn identity(instructions: &[Instruction]) -> ExpansionResult {
    let nodes: Vec<Node> =
      instructions.iter()
                  .enumerate()
                  .map(|(row, instruction)| Node {
                    instruction : instruction.clone(),
                    parent      : None,
                    origin_row  : row
                  })
                  .collect();
    ExpansionResult {
      sequence     : (0..nodes.len()).collect(),
      instructions : instructions.to_vec(),
      nodes,
      degree       : 0,
    }
  }

  /**
    Performs one expansion pass. `expand` receives each instruction of the current snapshot with
    its 1-based position and returns its replacement, or `None` to carry it through unchanged.
  */
  pub(crate) fn apply_pass<F>(&mut self, mut expand: F) -> Result<()>
    where F: FnMut(&Instruction, usize) -> Result<Option<Vec<Instruction>>>
  {
    let mut sequence: Vec<NodeId> = Vec::with_capacity(self.sequence.len());

    for (idx, &id) in self.sequence.iter().enumerate() {
      match expand(&self.nodes[id].instruction, idx + 1)? {
        None => sequence.push(id),
        Some(replacement) => {
          let origin_row = self.nodes[id].origin_row;
          for instruction in replacement {
            sequence.push(self.nodes.len());
            self.nodes.push(Node {
              instruction,
              parent: Some(id),
              origin_row
            });
          }
        }
      }
    }

    self.instructions = sequence.iter().map(|&id| self.nodes[id].instruction.clone()).collect();
    self.sequence = sequence;
    self.degree += 1;
    Ok(())
  }

  /// The number of passes that produced this snapshot.
  pub fn degree(&self) -> usize {
    self.degree
  }

  pub fn instructions(&self) -> &[Instruction] {
    &self.instructions
  }

  pub fn len(&self) -> usize {
    self.sequence.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sequence.is_empty()
  }

  pub fn synthetic_count(&self) -> usize {
    self.instructions.iter().filter(|i| i.is_synthetic()).count()
  }

  /// True once no further pass would change anything.
  pub fn is_fully_basic(&self) -> bool {
    self.synthetic_count() == 0
  }

  pub fn required_architecture(&self) -> Architecture {
    Architecture::required_for(&self.instructions)
  }

  // region Provenance queries. Positions are 1-based.

  /// The instruction at `position`.
  pub fn get(&self, position: usize) -> Option<&Instruction> {
    self.node_at(position).map(|id| &self.nodes[id].instruction)
  }

  pub fn node_at(&self, position: usize) -> Option<NodeId> {
    position.checked_sub(1).and_then(|idx| self.sequence.get(idx)).cloned()
  }

  /// The 1-based position of `node` in the snapshot, if it is part of the snapshot.
  pub fn position_of(&self, node: NodeId) -> Option<usize> {
    self.sequence.iter().position(|&id| id == node).map(|idx| idx + 1)
  }

  /// The 0-based index of the original row the instruction at `position` descends from.
  pub fn origin_row(&self, position: usize) -> Option<usize> {
    self.node_at(position).map(|id| self.nodes[id].origin_row)
  }

  /// The instruction that the instruction at `position` was expanded from.
  pub fn parent(&self, position: usize) -> Option<&Instruction> {
    let id = self.node_at(position)?;
    self.nodes[id].parent.map(|parent| &self.nodes[parent].instruction)
  }

  /**
    The instruction at `position` followed by each of its ancestors, ending with the degree-0
    instruction it descends from. Parents always precede their children in the arena, so the
    walk terminates.
  */
  pub fn creation_chain(&self, position: usize) -> Vec<&Instruction> {
    let mut chain = Vec::new();
    let mut cursor = self.node_at(position);
    while let Some(id) = cursor {
      chain.push(&self.nodes[id].instruction);
      cursor = self.nodes[id].parent;
    }
    chain
  }

  /// Positions of the snapshot grouped by originating row: `rows()[r]` lists, in order, the
  /// positions of everything row `r` of the degree-0 sequence expanded into.
  pub fn rows(&self) -> Vec<Vec<usize>> {
    let row_count = self.nodes.iter().filter(|node| node.parent.is_none()).count();
    let mut rows: Vec<Vec<usize>> = vec![Vec::new(); row_count];
    for (idx, &id) in self.sequence.iter().enumerate() {
      rows[self.nodes[id].origin_row].push(idx + 1);
    }
    rows
  }

  // endregion

  fn make_listing_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"#", ub->"", ubl->"Label", ubl->"Instruction", ubl->"Created from"]);

    for (idx, instruction) in self.instructions.iter().enumerate() {
      let ancestors: Vec<String> =
        self.creation_chain(idx + 1)
            .iter()
            .skip(1)
            .map(|ancestor| ancestor.to_string())
            .collect();
      table.add_row(row![
        r->(idx + 1),
        format!("({})", instruction.operation().class_letter()),
        format!("{}", instruction.label),
        format!("{}", instruction.command),
        ancestors.join(" <<< ")
      ]);
    }
    table
  }
}

impl Display for ExpansionResult {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "Degree {}: {} instruction(s), {} synthetic\n{}",
      self.degree,
      self.len(),
      self.synthetic_count(),
      self.make_listing_table()
    )
  }
}
