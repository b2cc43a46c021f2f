/*!
  One-step expansion templates.

  Each synthetic instruction is replaced by a short sequence of basic and/or simpler synthetic
  instructions. In every template the first produced instruction carries the label of the
  instruction it replaces, so jumps into the replaced instruction land at the start of its
  expansion. `A`, `B`, `C` below are fresh labels and `z…` are fresh work variables.

  Function calls are expanded by splicing a renamed copy of the function's body in place of the
  call:
  ```text
  [l] z_1 <- a_1           ⋯ one assignment per argument
      ⋮
      z_y <- 0             ⋯ every other variable of the body starts at zero
      ⋮
      <renamed body>       ⋯ x_i -> z_i, labels -> fresh labels, EXIT -> E
  [E] V <- z_y
  ```
*/

use std::collections::{BTreeSet, HashMap};

use crate::error::{Result, Scope};
use crate::function::FunctionRegistry;
use crate::instruction::{Argument, Command, FunctionCall, Instruction};
use crate::label::Label;
use crate::variable::{Value, Variable};

use super::names::NameSession;

/// Instantiates templates against a function registry, drawing fresh names from one session.
pub struct Expander<'f> {
  functions : &'f FunctionRegistry,
  names     : NameSession,
}

impl<'f> Expander<'f> {

  pub fn new(functions: &'f FunctionRegistry, names: NameSession) -> Expander<'f> {
    Expander {
      functions,
      names
    }
  }

  /**
    The one-step expansion of `instruction`, or `None` if it is basic. `position` is the
    instruction's 1-based row in the sequence being expanded and is only used to report a call to
    an unknown function.
  */
  pub fn expand(&mut self, instruction: &Instruction, scope: &Scope, position: usize)
    -> Result<Option<Vec<Instruction>>>
  {
    let label = instruction.label.clone();
    let expansion =
      match &instruction.command {

        | Command::Increase(_)
        | Command::Decrease(_)
        | Command::Neutral(_)
        | Command::JumpNotZero { .. } => {
          return Ok(None);
        }

        Command::ZeroVariable(variable) => self.zero_variable(label, *variable)?,

        Command::GotoLabel { target } => self.goto_label(label, target)?,

        Command::AssignConstant { variable, constant } => {
          self.assign_constant(label, *variable, *constant)
        }

        Command::AssignVariable { variable, source } => self.assign(label, *variable, *source)?,

        Command::JumpZero { variable, target } => self.jump_zero(label, *variable, target)?,

        Command::JumpEqualConstant { variable, constant, target } => {
          self.jump_equal_constant(label, *variable, *constant, target)?
        }

        Command::JumpEqualVariable { variable, other, target } => {
          self.jump_equal_variable(label, *variable, *other, target)?
        }

        Command::Quote { variable, call } => {
          self.quote(label, *variable, call, scope, position)?
        }

        Command::JumpEqualFunction { variable, call, target } => {
          let result = self.names.fresh_work()?;
          vec![
            Instruction::quote(result, call.clone()).labeled(label),
            Instruction::jump_equal_variable(*variable, result, target.clone()),
          ]
        }

      };

    Ok(Some(expansion))
  }

  // region Non-call templates

  // [l] V <- V - 1
  //     IF V != 0 GOTO l
  fn zero_variable(&mut self, label: Label, variable: Variable) -> Result<Vec<Instruction>> {
    let target = match label.is_empty() {
      true  => self.names.fresh_label()?,
      false => label
    };
    Ok(vec![
      Instruction::decrease(variable).labeled(target.clone()),
      Instruction::jump_not_zero(variable, target),
    ])
  }

  // [l] z <- z + 1
  //     IF z != 0 GOTO L
  fn goto_label(&mut self, label: Label, target: &Label) -> Result<Vec<Instruction>> {
    let counter = self.names.fresh_work()?;
    Ok(vec![
      Instruction::increase(counter).labeled(label),
      Instruction::jump_not_zero(counter, target.clone()),
    ])
  }

  // [l] V <- 0
  //     V <- V + 1      ⋯ K times
  fn assign_constant(&mut self, label: Label, variable: Variable, constant: Value) -> Vec<Instruction> {
    let mut expansion = vec![Instruction::zero(variable).labeled(label)];
    for _ in 0..constant {
      expansion.push(Instruction::increase(variable));
    }
    expansion
  }

  /*
    [l] V <- 0
        IF V' != 0 GOTO A
        GOTO C
    [A] V' <- V' - 1
        z <- z + 1
        IF V' != 0 GOTO A
    [B] z <- z - 1
        V <- V + 1
        V' <- V' + 1
        IF z != 0 GOTO B
    [C] V <- V
  */
  fn assign(&mut self, label: Label, variable: Variable, source: Variable) -> Result<Vec<Instruction>> {
    if variable == source {
      return Ok(vec![Instruction::neutral(variable).labeled(label)]);
    }

    let a = self.names.fresh_label()?;
    let b = self.names.fresh_label()?;
    let c = self.names.fresh_label()?;
    let z = self.names.fresh_work()?;

    Ok(vec![
      Instruction::zero(variable).labeled(label),
      Instruction::jump_not_zero(source, a.clone()),
      Instruction::goto(c.clone()),
      Instruction::decrease(source).labeled(a.clone()),
      Instruction::increase(z),
      Instruction::jump_not_zero(source, a),
      Instruction::decrease(z).labeled(b.clone()),
      Instruction::increase(variable),
      Instruction::increase(source),
      Instruction::jump_not_zero(z, b),
      Instruction::neutral(variable).labeled(c),
    ])
  }

  // [l] IF V != 0 GOTO A
  //     GOTO L
  // [A] V <- V
  fn jump_zero(&mut self, label: Label, variable: Variable, target: &Label) -> Result<Vec<Instruction>> {
    let a = self.names.fresh_label()?;
    Ok(vec![
      Instruction::jump_not_zero(variable, a.clone()).labeled(label),
      Instruction::goto(target.clone()),
      Instruction::neutral(variable).labeled(a),
    ])
  }

  /*
    [l] z <- V
        IF z == 0 GOTO A  ⎫
        z <- z - 1        ⎭ K times
        IF z != 0 GOTO A
        GOTO L
    [A] V <- V
  */
  fn jump_equal_constant(&mut self, label: Label, variable: Variable, constant: Value, target: &Label)
    -> Result<Vec<Instruction>>
  {
    let a = self.names.fresh_label()?;
    let z = self.names.fresh_work()?;

    let mut expansion = vec![Instruction::assign(z, variable).labeled(label)];
    for _ in 0..constant {
      expansion.push(Instruction::jump_zero(z, a.clone()));
      expansion.push(Instruction::decrease(z));
    }
    expansion.push(Instruction::jump_not_zero(z, a.clone()));
    expansion.push(Instruction::goto(target.clone()));
    expansion.push(Instruction::neutral(variable).labeled(a));
    Ok(expansion)
  }

  /*
    [l] z1 <- V
        z2 <- V'
    [B] IF z1 == 0 GOTO C
        IF z2 == 0 GOTO A
        z1 <- z1 - 1
        z2 <- z2 - 1
        GOTO B
    [C] IF z2 == 0 GOTO L
    [A] V <- V
  */
  fn jump_equal_variable(&mut self, label: Label, variable: Variable, other: Variable, target: &Label)
    -> Result<Vec<Instruction>>
  {
    if variable == other {
      return Ok(vec![Instruction::goto(target.clone()).labeled(label)]);
    }

    let a  = self.names.fresh_label()?;
    let b  = self.names.fresh_label()?;
    let c  = self.names.fresh_label()?;
    let z1 = self.names.fresh_work()?;
    let z2 = self.names.fresh_work()?;

    Ok(vec![
      Instruction::assign(z1, variable).labeled(label),
      Instruction::assign(z2, other),
      Instruction::jump_zero(z1, c.clone()).labeled(b.clone()),
      Instruction::jump_zero(z2, a.clone()),
      Instruction::decrease(z1),
      Instruction::decrease(z2),
      Instruction::goto(b),
      Instruction::jump_zero(z2, target.clone()).labeled(c),
      Instruction::neutral(variable).labeled(a),
    ])
  }

  // endregion

  /// Splices a renamed copy of the called function's body in place of `V <- (F, a_1, …, a_n)`.
  fn quote(&mut self, label: Label, variable: Variable, call: &FunctionCall, scope: &Scope, position: usize)
    -> Result<Vec<Instruction>>
  {
    let functions = self.functions;
    let function = functions.lookup(&call.name, scope, position)?;

    let mut expansion: Vec<Instruction> = Vec::new();
    let mut renamed: HashMap<Variable, Variable> = HashMap::new();

    // Argument holders. Input `x_i` of the body becomes `z_i`.
    for (idx, argument) in call.arguments.iter().enumerate() {
      let holder = self.names.fresh_work()?;
      renamed.insert(Variable::from_input_idx(idx), holder);
      expansion.push(
        match argument {
          Argument::Variable(Variable::Constant(k)) => Instruction::assign_constant(holder, *k),
          Argument::Variable(source)                => Instruction::assign(holder, *source),
          Argument::Call(nested)                    => Instruction::quote(holder, nested.clone()),
        }
      );
    }

    // Every other variable of the body, in variable order, gets a zeroed fresh work variable.
    let body_variables: BTreeSet<Variable> =
      function.body
              .iter()
              .flat_map(|instruction| instruction.variables())
              .chain(std::iter::once(Variable::Result))
              .filter(|v| !v.is_constant())
              .collect();
    for body_variable in body_variables {
      if renamed.contains_key(&body_variable) {
        continue;
      }
      let fresh = self.names.fresh_work()?;
      renamed.insert(body_variable, fresh);
      expansion.push(Instruction::zero(fresh));
    }

    let end_label = self.names.fresh_label()?;
    let mut relabeled: HashMap<Label, Label> = HashMap::new();
    for instruction in function.body.iter() {
      if instruction.label.is_named() && !relabeled.contains_key(&instruction.label) {
        relabeled.insert(instruction.label.clone(), self.names.fresh_label()?);
      }
    }

    let result_holder = renamed.get(&Variable::Result).cloned().unwrap_or(Variable::Result);
    for instruction in function.body.iter() {
      expansion.push(instruction.rename(
        &mut |v| renamed.get(&v).cloned().unwrap_or(v),
        &mut |l| match l {
          Label::Exit  => end_label.clone(),
          Label::Empty => Label::Empty,
          named        => relabeled.get(named).cloned().unwrap_or_else(|| named.clone())
        }
      ));
    }
    expansion.push(Instruction::assign(variable, result_holder).labeled(end_label));

    // The call's own label goes on the first instruction of the splice.
    if let Some(first) = expansion.first_mut() {
      first.label = label;
    }
    Ok(expansion)
  }
}
