//! Drives the encoder over the parsed code section and performs the label
//! fix-up pass: patching the low literal-field bits of every forward jump
//! reference once every label's final address is known.

use crate::ast::{CodeLine, Instruction};
use crate::config::Config;
use crate::errors::AssemblyError;
use crate::instruction_processor;
use crate::label_manager::LabelManager;
use crate::literal;
use crate::memory::Memory;

pub fn generate(
    code_lines: &[CodeLine],
    config: &Config,
    memory: &Memory,
    label_manager: &LabelManager,
) -> Result<Vec<String>, AssemblyError> {
    let mut binary: Vec<String> = Vec::new();
    let mut machine_pos = 0usize;

    for code_line in code_lines {
        match code_line {
            CodeLine::Label { name, line } => {
                let expected = label_manager.address_of(name).ok_or_else(|| AssemblyError::LabelError {
                    line: *line,
                    reason: format!("label '{name}' was not recorded during the planning pass"),
                })?;
                if expected != machine_pos {
                    return Err(AssemblyError::LabelError {
                        line: *line,
                        reason: format!(
                            "label '{name}' address disagreement between planning ({expected}) and emit ({machine_pos}) passes"
                        ),
                    });
                }
            }
            CodeLine::Instruction(instr) => {
                let words = instruction_processor::encode(instr, config, memory, label_manager)?;
                for word in &words {
                    trace_word(word, config, instr, machine_pos);
                }
                machine_pos += words.len();
                binary.extend(words);
            }
        }
    }

    for reference in label_manager.unresolved() {
        let target = label_manager.address_of(&reference.label_name).ok_or_else(|| {
            AssemblyError::LabelError {
                line: 0,
                reason: format!("reference to undefined label '{}'", reference.label_name),
            }
        })?;

        let idx = reference.instruction_index;
        let word = binary.get(idx).ok_or_else(|| AssemblyError::LabelError {
            line: 0,
            reason: format!("fix-up index {idx} is out of range for the emitted binary"),
        })?;

        let prefix_len = config.word_bits - config.literal_bits;
        let prefix = &word[..prefix_len];
        let literal_bits = literal::format_bits(target as i64, config.literal_bits, 0)?;
        binary[idx] = format!("{prefix}{literal_bits}");
    }

    Ok(binary)
}

/// Emits a structured `debug`-level trace of one encoded word: its decoded
/// mnemonic, operand-type names, and literal value, alongside the source
/// instruction it came from.
fn trace_word(word: &str, config: &Config, instr: &Instruction, machine_pos: usize) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let opcode = &word[..config.opcode_bits];
    let mnemonic_name = config
        .mnemonics
        .iter()
        .find(|(_, info)| info.opcode == opcode)
        .map(|(name, _)| name.as_str())
        .unwrap_or("?");

    let type_field = &word[config.opcode_bits..config.opcode_bits + config.operand_type_bits];
    let mut params = Vec::new();
    for chunk in type_field.as_bytes().chunks(3) {
        let chunk_str = std::str::from_utf8(chunk).unwrap_or("");
        if chunk_str == "000" || chunk_str.is_empty() {
            continue;
        }
        params.push(
            config
                .type_codes_inverse
                .get(chunk_str)
                .cloned()
                .unwrap_or_else(|| format!("unknown({chunk_str})")),
        );
    }

    let literal_str = &word[config.opcode_bits + config.operand_type_bits..];
    let literal_value = i64::from_str_radix(literal_str, 2).unwrap_or(0);

    tracing::debug!(
        address = machine_pos,
        source_line = instr.line,
        source = %format!("{} {:?}", instr.mnemonic, instr.operands),
        decoded = mnemonic_name,
        params = ?params,
        literal = literal_value,
        "emitted word"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operand;

    const SETUP: &str = r#"{
        "config": {
            "tamañoPalabra": 36,
            "instrucciones": {"bits": 6},
            "tipos": {"bits": 6},
            "literals": {"bits": 24}
        },
        "instrucciones": {
            "NOP": {"opcode": "000000"},
            "JMP": {"opcode": "010000"}
        },
        "tipos": {
            "A": "001", "B": "010", "(A)": "101", "(B)": "110", "(dir)": "011", "lit": "100"
        }
    }"#;

    fn instr(mnemonic: &str, operands: Vec<Operand>, line: usize) -> CodeLine {
        CodeLine::Instruction(Instruction { mnemonic: mnemonic.to_string(), operands, line })
    }

    #[test]
    fn forward_jump_is_patched_after_emit() {
        let config = Config::from_json(SETUP).unwrap();
        let memory = Memory::new();
        let lines = vec![
            instr("JMP", vec![Operand::Symbol("end".to_string())], 1),
            instr("NOP", vec![], 2),
            CodeLine::Label { name: "end".to_string(), line: 3 },
            instr("NOP", vec![], 4),
        ];
        let labels = LabelManager::plan(&lines).unwrap();
        let binary = generate(&lines, &config, &memory, &labels).unwrap();
        assert_eq!(binary.len(), 3);
        assert_eq!(i64::from_str_radix(&binary[0][12..], 2).unwrap(), 2);
    }

    #[test]
    fn backward_jump_resolves_during_emit_without_fixup() {
        let config = Config::from_json(SETUP).unwrap();
        let memory = Memory::new();
        let lines = vec![
            CodeLine::Label { name: "top".to_string(), line: 1 },
            instr("NOP", vec![], 2),
            instr("JMP", vec![Operand::Symbol("top".to_string())], 3),
        ];
        let labels = LabelManager::plan(&lines).unwrap();
        let binary = generate(&lines, &config, &memory, &labels).unwrap();
        assert_eq!(i64::from_str_radix(&binary[1][12..], 2).unwrap(), 0);
    }
}
