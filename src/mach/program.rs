use super::{Address, LabelId, Layout, Opcode};
use crate::error;
use crate::lang::{Error, LineNumber};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Label {
    pub name: String,
    pub addr: Option<Address>,
    /// First line that jumps here, for reporting undefined labels.
    pub used_at: Option<LineNumber>,
}

/// ## Compiled program
///
/// The op sequence is an arena: an op's address is its index.
/// Jump sites are patched in place once their targets are known.

#[derive(Debug, Default)]
pub struct Program {
    ops: Vec<Opcode>,
    lines: Vec<LineNumber>,
    labels: Vec<Label>,
    label_ids: HashMap<String, LabelId>,
    layout: Layout,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[Opcode] {
        &self.ops
    }

    pub fn op(&self, addr: Address) -> Option<&Opcode> {
        self.ops.get(addr)
    }

    /// Source line an op was compiled from.
    pub fn line(&self, addr: Address) -> Option<LineNumber> {
        self.lines.get(addr).copied()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn push(&mut self, op: Opcode, line: LineNumber) -> Address {
        self.ops.push(op);
        self.lines.push(line);
        self.ops.len() - 1
    }

    pub fn append(&mut self, code: Vec<Opcode>, line: LineNumber) {
        self.lines.extend(std::iter::repeat(line).take(code.len()));
        self.ops.extend(code);
    }

    /// Points the branch at `site` to `target`.
    pub fn patch(&mut self, site: Address, target: Address) -> Result<()> {
        match self.ops.get_mut(site).map(|op| op.set_target(target)) {
            Some(true) => Ok(()),
            _ => Err(error!(InternalError; format!("NOTHING TO PATCH AT {}", site))),
        }
    }

    /// Finds or creates the label table entry for `name`.
    pub fn label_ref(&mut self, name: &str, line: LineNumber) -> LabelId {
        let id = self.label_id(name);
        let label = &mut self.labels[id];
        if label.used_at.is_none() {
            label.used_at = Some(line);
        }
        id
    }

    fn label_id(&mut self, name: &str) -> LabelId {
        if let Some(id) = self.label_ids.get(name) {
            return *id;
        }
        let id = self.labels.len();
        self.labels.push(Label {
            name: name.to_string(),
            addr: None,
            used_at: None,
        });
        self.label_ids.insert(name.to_string(), id);
        id
    }

    /// Labels the next op to be emitted.
    pub fn define_label(&mut self, name: &str) -> Result<()> {
        let addr = self.ops.len();
        let id = self.label_id(name);
        let label = &mut self.labels[id];
        if label.addr.is_some() {
            return Err(error!(DuplicateLabel; name));
        }
        label.addr = Some(addr);
        Ok(())
    }

    pub fn label_addr(&self, id: LabelId) -> Option<Address> {
        self.labels.get(id).and_then(|label| label.addr)
    }

    /// Every label that is jumped to must be defined somewhere.
    pub fn link(&self) -> Result<()> {
        for label in &self.labels {
            if label.addr.is_none() {
                let e = error!(LabelNotDefined; &label.name);
                return Err(match label.used_at {
                    Some(line) => e.in_line_number(line),
                    None => e,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backpatch() {
        let mut p = Program::new();
        let site = p.push(Opcode::Jump(0), 1);
        p.push(Opcode::End, 2);
        p.patch(site, p.len()).unwrap();
        assert_eq!(p.op(site), Some(&Opcode::Jump(2)));
        assert!(p.patch(1, 0).is_err());
        assert!(p.patch(9, 0).is_err());
    }

    #[test]
    fn test_backpatch_conditional() {
        let mut p = Program::new();
        let site = p.push(Opcode::IfNot(0), 1);
        p.push(Opcode::End, 1);
        p.patch(site, 1).unwrap();
        assert_eq!(p.ops(), &[Opcode::IfNot(1), Opcode::End]);
    }

    #[test]
    fn test_forward_label() {
        let mut p = Program::new();
        let id = p.label_ref("later", 1);
        p.push(Opcode::Goto(id), 1);
        assert_eq!(p.link().unwrap_err().to_string(), "LABEL NOT DEFINED; later at line 1");
        p.define_label("later").unwrap();
        assert_eq!(p.label_addr(id), Some(1));
        assert!(p.link().is_ok());
        assert_eq!(
            p.define_label("later").unwrap_err().to_string(),
            "DUPLICATE LABEL; later"
        );
    }
}
