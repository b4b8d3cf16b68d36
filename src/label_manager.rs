//! Planning pass: walks the parsed code section once to compute every
//! label's machine address (accounting for mnemonics that expand to two
//! words) and to record forward jump references that the binary generator
//! must patch after the emit pass.

use std::collections::HashMap;

use crate::ast::{CodeLine, Operand};
use crate::config::{self, MnemonicClass};
use crate::errors::AssemblyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub label_name: String,
    pub instruction_index: usize,
}

#[derive(Debug, Default)]
pub struct LabelManager {
    labels: HashMap<String, usize>,
    unresolved: Vec<UnresolvedReference>,
}

impl LabelManager {
    /// Runs the planning pass over `code_lines`, which must already be
    /// parsed (and, if `--load-data` is active, must already include the
    /// synthesized initialization instructions prepended to the stream).
    pub fn plan(code_lines: &[CodeLine]) -> Result<LabelManager, AssemblyError> {
        let mut labels = HashMap::new();
        let mut unresolved = Vec::new();
        let mut machine_pos = 0usize;

        for code_line in code_lines {
            match code_line {
                CodeLine::Label { name, line } => {
                    // The parser's `identifier` rule already enforces
                    // `[A-Za-z_][A-Za-z0-9_]*`, so no further validation of
                    // the name's shape is needed here.
                    if labels.contains_key(name) {
                        return Err(AssemblyError::LabelError {
                            line: *line,
                            reason: format!("label '{name}' is already defined"),
                        });
                    }
                    labels.insert(name.clone(), machine_pos);
                }
                CodeLine::Instruction(instr) => {
                    let class = config::classify(&instr.mnemonic).ok_or_else(|| {
                        AssemblyError::InvalidInstruction {
                            line: instr.line,
                            reason: format!("unknown mnemonic '{}'", instr.mnemonic),
                        }
                    })?;

                    if class == MnemonicClass::Jump {
                        if let Some(Operand::Symbol(name)) = instr.operands.first() {
                            if !labels.contains_key(name) {
                                unresolved.push(UnresolvedReference {
                                    label_name: name.clone(),
                                    instruction_index: machine_pos,
                                });
                            }
                        }
                    }

                    machine_pos += config::word_count(&instr.mnemonic);
                }
            }
        }

        Ok(LabelManager { labels, unresolved })
    }

    pub fn address_of(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Instruction;

    fn instr(mnemonic: &str, operands: Vec<Operand>, line: usize) -> CodeLine {
        CodeLine::Instruction(Instruction { mnemonic: mnemonic.to_string(), operands, line })
    }

    #[test]
    fn labels_point_at_their_following_instruction() {
        let lines = vec![
            CodeLine::Label { name: "start".to_string(), line: 1 },
            instr("NOP", vec![], 2),
        ];
        let labels = LabelManager::plan(&lines).unwrap();
        assert_eq!(labels.address_of("start"), Some(0));
    }

    #[test]
    fn expanding_mnemonics_shift_subsequent_labels() {
        let lines = vec![
            instr("POP", vec![Operand::Register(crate::ast::Register::A)], 1),
            CodeLine::Label { name: "target".to_string(), line: 2 },
            instr("NOP", vec![], 3),
        ];
        let labels = LabelManager::plan(&lines).unwrap();
        assert_eq!(labels.address_of("target"), Some(2));
    }

    #[test]
    fn forward_jump_is_recorded_as_unresolved() {
        let lines = vec![
            instr("JMP", vec![Operand::Symbol("end".to_string())], 1),
            CodeLine::Label { name: "end".to_string(), line: 2 },
        ];
        let labels = LabelManager::plan(&lines).unwrap();
        assert_eq!(
            labels.unresolved(),
            &[UnresolvedReference { label_name: "end".to_string(), instruction_index: 0 }]
        );
    }

    #[test]
    fn backward_jump_is_not_recorded_as_unresolved() {
        let lines = vec![
            CodeLine::Label { name: "top".to_string(), line: 1 },
            instr("JMP", vec![Operand::Symbol("top".to_string())], 2),
        ];
        let labels = LabelManager::plan(&lines).unwrap();
        assert!(labels.unresolved().is_empty());
    }

    #[test]
    fn duplicate_label_is_an_error() {
        let lines = vec![
            CodeLine::Label { name: "l".to_string(), line: 1 },
            instr("NOP", vec![], 2),
            CodeLine::Label { name: "l".to_string(), line: 3 },
        ];
        let err = LabelManager::plan(&lines).unwrap_err();
        assert!(matches!(err, AssemblyError::LabelError { line: 3, .. }));
    }

    #[test]
    fn unknown_mnemonic_is_an_error() {
        let lines = vec![instr("FROB", vec![], 1)];
        let err = LabelManager::plan(&lines).unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidInstruction { line: 1, .. }));
    }
}
