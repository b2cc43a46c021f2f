//! Table renderings of machine state, shared by `Display` impls and computation tracing.

use std::fmt::Display;

use prettytable::{format as TableFormat, Table};

use crate::instruction::Instruction;

use super::frame::Frame;

lazy_static! {
  pub static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/// Lists `instructions` by 1-based row, marking the row at 0-based `highlight`.
pub fn make_instruction_table(instructions: &[Instruction], highlight: usize) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Row", ubl->"Instruction"]);

  for (i, instruction) in instructions.iter().enumerate() {
    match i == highlight {

      true  => {
        table.add_row(row![r->format!("* --> {}", i + 1), format!("{}", instruction)]);
      }

      false => {
        table.add_row(row![r->format!("{}", i + 1), format!("{}", instruction)]);
      }

    } // end match on highlight
  } // end for
  table
}

pub fn make_variable_table(frame: &Frame) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Variable", ubl->"Value"]);

  for (variable, value) in frame.iter() {
    table.add_row(row![r->format!("{} =", variable), format!("{}", value)]);
  }
  table
}

/// Both tables side by side under a heading.
pub fn make_machine_table<T: Display>(
    heading      : T,
    instructions : &[Instruction],
    pointer      : usize,
    frame        : &Frame
  ) -> Table
{
  let instruction_table = make_instruction_table(instructions, pointer);
  let variable_table    = make_variable_table(frame);

  let mut combined_table = table!([instruction_table, variable_table]);

  combined_table.set_titles(row![ub->heading, ub->"Variables"]);
  combined_table.set_format(*TABLE_DISPLAY_FORMAT);
  combined_table
}
