use super::Program;
use std::collections::BTreeMap;

/// ## Disassembly
///
/// One op per row: address, source line, op. Labels are shown on
/// their own row ahead of the op they name.
impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut labels: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for label in self.labels() {
            if let Some(addr) = label.addr {
                labels.entry(addr).or_default().push(&label.name);
            }
        }
        for (addr, op) in self.ops().iter().enumerate() {
            if let Some(names) = labels.get(&addr) {
                for name in names {
                    writeln!(f, "{}:", name)?;
                }
            }
            let line = self.line(addr).unwrap_or(0);
            writeln!(f, "{:>6} {:>5}  {}", addr, line, op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::mach::{Opcode, Program};

    #[test]
    fn test_listing() {
        let mut p = Program::new();
        p.define_label("top").unwrap();
        p.push(Opcode::Jump(0), 3);
        assert_eq!(p.to_string(), "top:\n     0     3  JUMP(0)\n");
    }
}
