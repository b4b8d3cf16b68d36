//! Encodes a single parsed instruction into one or two `W`-bit machine words,
//! consulting Config for opcodes/operand-type codes, Memory for data
//! addresses, and LabelManager for resolved jump targets.

use crate::ast::{DirectTarget, Instruction, Operand, Register};
use crate::config::{self, Config, MnemonicClass};
use crate::errors::AssemblyError;
use crate::label_manager::LabelManager;
use crate::literal;
use crate::memory::Memory;

/// Encodes `instr` into its machine words. Returns one word for every class
/// except `Expanding`, which always returns exactly two.
pub fn encode(
    instr: &Instruction,
    config: &Config,
    memory: &Memory,
    label_manager: &LabelManager,
) -> Result<Vec<String>, AssemblyError> {
    let mnemonic = instr.mnemonic.to_ascii_uppercase();
    let class = config::classify(&mnemonic).ok_or_else(|| AssemblyError::InvalidInstruction {
        line: instr.line,
        reason: format!("unknown mnemonic '{}'", instr.mnemonic),
    })?;

    match class {
        MnemonicClass::NoOperand => {
            require_operand_count(&mnemonic, &instr.operands, 0, instr.line)?;
            Ok(vec![encode_no_operand(&mnemonic, config, instr.line)?])
        }
        MnemonicClass::Jump => {
            let operand = single_operand(&instr.operands, &mnemonic, instr.line)?;
            Ok(vec![encode_jump(&mnemonic, operand, config, label_manager, instr.line)?])
        }
        MnemonicClass::Single => {
            let operand = single_operand(&instr.operands, &mnemonic, instr.line)?;
            validate_single_operand(&mnemonic, operand, instr.line)?;
            let literal_override = step_override(&mnemonic, operand);
            Ok(vec![encode_operand_based(
                &mnemonic,
                std::slice::from_ref(operand),
                config,
                memory,
                instr.line,
                literal_override,
            )?])
        }
        MnemonicClass::Flexible => {
            if instr.operands.is_empty() || instr.operands.len() > 2 {
                return Err(AssemblyError::InvalidInstruction {
                    line: instr.line,
                    reason: format!("'{mnemonic}' takes one or two operands"),
                });
            }
            Ok(vec![encode_operand_based(
                &mnemonic,
                &instr.operands,
                config,
                memory,
                instr.line,
                None,
            )?])
        }
        MnemonicClass::Binary => {
            require_operand_count(&mnemonic, &instr.operands, 2, instr.line)?;
            Ok(vec![encode_operand_based(
                &mnemonic,
                &instr.operands,
                config,
                memory,
                instr.line,
                None,
            )?])
        }
        MnemonicClass::Expanding => encode_expanding(&mnemonic, instr, config, memory),
    }
}

fn require_operand_count(
    mnemonic: &str,
    operands: &[Operand],
    expected: usize,
    line: usize,
) -> Result<(), AssemblyError> {
    if operands.len() != expected {
        return Err(AssemblyError::InvalidInstruction {
            line,
            reason: format!("'{mnemonic}' requires exactly {expected} operand(s), got {}", operands.len()),
        });
    }
    Ok(())
}

fn single_operand<'a>(
    operands: &'a [Operand],
    mnemonic: &str,
    line: usize,
) -> Result<&'a Operand, AssemblyError> {
    if operands.len() != 1 {
        return Err(AssemblyError::InvalidInstruction {
            line,
            reason: format!("'{mnemonic}' requires exactly one operand"),
        });
    }
    Ok(&operands[0])
}

fn validate_single_operand(mnemonic: &str, operand: &Operand, line: usize) -> Result<(), AssemblyError> {
    let ok = match mnemonic {
        "INC" => config::is_valid_inc_operand(operand),
        "DEC" => config::is_valid_dec_operand(operand),
        _ => true,
    };
    if !ok {
        return Err(AssemblyError::InvalidOperand {
            line,
            reason: format!("'{operand:?}' is not a valid operand for '{mnemonic}'"),
        });
    }
    Ok(())
}

/// `INC`/`DEC` of the accumulator step by a fixed literal of 1; every other
/// operand shape falls through to the ordinary literal-field rules.
fn step_override(mnemonic: &str, operand: &Operand) -> Option<i64> {
    if (mnemonic == "INC" || mnemonic == "DEC") && matches!(operand, Operand::Register(Register::A)) {
        Some(1)
    } else {
        None
    }
}

fn encode_no_operand(mnemonic: &str, config: &Config, line: usize) -> Result<String, AssemblyError> {
    let opcode = mnemonic_opcode(mnemonic, config, line)?;
    let rest = "0".repeat(config.word_bits - config.opcode_bits);
    checked_word(format!("{opcode}{rest}"), config, line)
}

fn encode_jump(
    mnemonic: &str,
    operand: &Operand,
    config: &Config,
    label_manager: &LabelManager,
    line: usize,
) -> Result<String, AssemblyError> {
    let opcode = mnemonic_opcode(mnemonic, config, line)?;
    let target = match operand {
        Operand::Symbol(name) => label_manager.address_of(name).unwrap_or(0) as i64,
        Operand::Immediate(value) => *value,
        other => {
            return Err(AssemblyError::InvalidOperand {
                line,
                reason: format!("jump target must be a label or a numeric address, got {other:?}"),
            });
        }
    };
    let type_field = "0".repeat(config.operand_type_bits);
    let literal_bits = literal::format_bits(target, config.literal_bits, line)?;
    checked_word(format!("{opcode}{type_field}{literal_bits}"), config, line)
}

/// Shared encoder for the `Single`, `Flexible`, `Binary`, and expanding-part
/// shapes: packs up to two operand-type codes into the type field and
/// resolves a single literal value among the operands that carry one.
fn encode_operand_based(
    mnemonic: &str,
    operands: &[Operand],
    config: &Config,
    memory: &Memory,
    line: usize,
    literal_override: Option<i64>,
) -> Result<String, AssemblyError> {
    let opcode = mnemonic_opcode(mnemonic, config, line)?;

    for operand in operands {
        if let Operand::Symbol(name) = operand {
            return Err(AssemblyError::InvalidOperand {
                line,
                reason: format!(
                    "'{name}' is a bare identifier; direct addressing requires parentheses, e.g. '({name})'"
                ),
            });
        }
    }

    let mut type_field = String::new();
    for operand in operands.iter().take(2) {
        let code = config.type_code(operand).ok_or_else(|| AssemblyError::InvalidOperand {
            line,
            reason: format!("operand {operand:?} has no configured operand-type code"),
        })?;
        type_field.push_str(&code);
    }
    while type_field.len() < config.operand_type_bits {
        type_field.push('0');
    }

    let literal_value = match literal_override {
        Some(value) => value,
        None => {
            let literal_candidates: Vec<&Operand> = operands
                .iter()
                .filter(|op| matches!(op, Operand::Direct(_) | Operand::Immediate(_)))
                .collect();
            match literal_candidates.len() {
                0 => 0,
                1 => literal_for_operand(literal_candidates[0], memory, line)?,
                _ => {
                    return Err(AssemblyError::InvalidOperand {
                        line,
                        reason: format!("'{mnemonic}' cannot have two literal/address operands"),
                    });
                }
            }
        }
    };
    let literal_bits = literal::format_bits(literal_value, config.literal_bits, line)?;
    checked_word(format!("{opcode}{type_field}{literal_bits}"), config, line)
}

fn encode_expanding(
    mnemonic: &str,
    instr: &Instruction,
    config: &Config,
    memory: &Memory,
) -> Result<Vec<String>, AssemblyError> {
    let parts = config::expansion_parts(mnemonic).expect("classified as Expanding");
    match mnemonic {
        "POP" => {
            let operand = single_operand(&instr.operands, mnemonic, instr.line)?;
            if !config::is_valid_pop_operand(operand) {
                return Err(AssemblyError::InvalidOperand {
                    line: instr.line,
                    reason: "POP requires a single register operand (A or B)".to_string(),
                });
            }
            let word1 = encode_operand_based(
                parts[0],
                std::slice::from_ref(operand),
                config,
                memory,
                instr.line,
                None,
            )?;
            let word2 = encode_no_operand(parts[1], config, instr.line)?;
            Ok(vec![word1, word2])
        }
        "RET" => {
            require_operand_count(mnemonic, &instr.operands, 0, instr.line)?;
            let word1 = encode_no_operand(parts[0], config, instr.line)?;
            let word2 = encode_no_operand(parts[1], config, instr.line)?;
            Ok(vec![word1, word2])
        }
        other => unreachable!("only POP/RET are classified as Expanding, got {other}"),
    }
}

fn literal_for_operand(operand: &Operand, memory: &Memory, line: usize) -> Result<i64, AssemblyError> {
    match operand {
        Operand::Direct(DirectTarget::Name(name)) => memory
            .address_of(name)
            .map(|addr| addr as i64)
            .ok_or_else(|| AssemblyError::MemoryError {
                line,
                reason: format!("reference to undeclared data name '{name}'"),
            }),
        Operand::Direct(DirectTarget::Numeric(value)) => Ok(*value),
        Operand::Immediate(value) => Ok(*value),
        Operand::Indirect(_) | Operand::Register(_) => Ok(0),
        Operand::Symbol(name) => memory
            .address_of(name)
            .map(|addr| addr as i64)
            .ok_or_else(|| AssemblyError::InvalidOperand {
                line,
                reason: format!("unresolved symbol '{name}'"),
            }),
    }
}

fn mnemonic_opcode<'a>(mnemonic: &str, config: &'a Config, line: usize) -> Result<&'a str, AssemblyError> {
    config
        .mnemonic(mnemonic)
        .map(|info| info.opcode.as_str())
        .ok_or_else(|| AssemblyError::InvalidInstruction {
            line,
            reason: format!("mnemonic '{mnemonic}' is not present in the loaded configuration"),
        })
}

/// The encoder must never produce a word of the wrong length; this can only
/// happen from a Config/encoder mismatch, not from user input, so it is
/// reported with line 0 rather than the instruction's source line.
fn checked_word(word: String, config: &Config, line: usize) -> Result<String, AssemblyError> {
    if word.len() != config.word_bits {
        return Err(AssemblyError::InvalidInstruction {
            line: 0,
            reason: format!(
                "encoder produced a {}-bit word for line {line} but configuration expects {} bits",
                word.len(),
                config.word_bits
            ),
        });
    }
    Ok(word)
}
