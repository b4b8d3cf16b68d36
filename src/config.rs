//! Configuration schema loaded from an external JSON setup file: word/field
//! widths, the mnemonic→opcode table, and the operand-type→code table. Also
//! carries the mnemonic classification map and the INC/DEC/POP operand-shape
//! constraints, both fixed properties of this instruction set rather than
//! data loaded from JSON.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::ast::{DirectTarget, Operand, Register};
use crate::errors::AssemblyError;
use crate::file_reader::FileReader;

#[derive(Debug, Deserialize)]
struct BitsField {
    bits: usize,
}

#[derive(Debug, Deserialize)]
struct RawConfigSection {
    #[serde(rename = "tamañoPalabra")]
    word_bits: usize,
    instrucciones: BitsField,
    tipos: BitsField,
    literals: BitsField,
}

#[derive(Debug, Deserialize)]
struct RawInstruction {
    opcode: String,
    #[serde(default)]
    formato: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawSetup {
    config: RawConfigSection,
    instrucciones: HashMap<String, RawInstruction>,
    tipos: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct MnemonicInfo {
    pub opcode: String,
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicClass {
    NoOperand,
    Jump,
    Single,
    Flexible,
    Binary,
    Expanding,
}

const NO_OPERAND: &[&str] = &["NOP", "RET1", "RET2"];
const JUMP: &[&str] = &[
    "JMP", "JEQ", "JNE", "JGT", "JGE", "JLT", "JLE", "JCR", "CALL",
];
const SINGLE: &[&str] = &["PUSH", "INC", "DEC"];
const FLEXIBLE: &[&str] = &["NOT", "SHL", "SHR"];
const BINARY: &[&str] = &["ADD", "SUB", "AND", "OR", "XOR", "MOV", "CMP"];
const EXPANDING: &[&str] = &["POP", "RET"];

/// The single source of truth for how many machine words a mnemonic occupies
/// and how it should be dispatched, shared by the label planning pass and the
/// instruction encoder.
pub fn classify(mnemonic: &str) -> Option<MnemonicClass> {
    let upper = mnemonic.to_ascii_uppercase();
    let m = upper.as_str();
    if NO_OPERAND.contains(&m) {
        Some(MnemonicClass::NoOperand)
    } else if JUMP.contains(&m) {
        Some(MnemonicClass::Jump)
    } else if SINGLE.contains(&m) {
        Some(MnemonicClass::Single)
    } else if FLEXIBLE.contains(&m) {
        Some(MnemonicClass::Flexible)
    } else if BINARY.contains(&m) {
        Some(MnemonicClass::Binary)
    } else if EXPANDING.contains(&m) {
        Some(MnemonicClass::Expanding)
    } else {
        None
    }
}

/// Returns the two sub-mnemonics an expanding mnemonic is encoded as, in
/// emission order.
pub fn expansion_parts(mnemonic: &str) -> Option<[&'static str; 2]> {
    match mnemonic.to_ascii_uppercase().as_str() {
        "POP" => Some(["POP1", "POP2"]),
        "RET" => Some(["RET1", "RET2"]),
        _ => None,
    }
}

/// Number of machine words `mnemonic` occupies, per the shared classification.
pub fn word_count(mnemonic: &str) -> usize {
    match classify(mnemonic) {
        Some(MnemonicClass::Expanding) => 2,
        _ => 1,
    }
}

#[derive(Debug)]
pub struct Config {
    pub word_bits: usize,
    pub opcode_bits: usize,
    pub operand_type_bits: usize,
    pub literal_bits: usize,
    pub mnemonics: HashMap<String, MnemonicInfo>,
    pub type_codes: HashMap<String, String>,
    pub type_codes_inverse: HashMap<String, String>,
}

impl Config {
    pub fn load(path: &Path, reader: &impl FileReader) -> Result<Config, AssemblyError> {
        let text = reader
            .read_to_string(path)
            .map_err(|e| AssemblyError::ConfigError {
                reason: format!("could not read setup file '{}': {e}", path.display()),
            })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Config, AssemblyError> {
        let raw: RawSetup = serde_json::from_str(text).map_err(|e| AssemblyError::ConfigError {
            reason: format!("invalid setup JSON: {e}"),
        })?;

        let word_bits = raw.config.word_bits;
        let opcode_bits = raw.config.instrucciones.bits;
        let operand_type_bits = raw.config.tipos.bits;
        let literal_bits = raw.config.literals.bits;

        if opcode_bits + operand_type_bits + literal_bits != word_bits {
            return Err(AssemblyError::ConfigError {
                reason: format!(
                    "field widths do not sum to word width: {opcode_bits} + {operand_type_bits} + {literal_bits} != {word_bits}"
                ),
            });
        }

        let mut mnemonics = HashMap::new();
        for (name, info) in raw.instrucciones {
            if info.opcode.len() != opcode_bits {
                return Err(AssemblyError::ConfigError {
                    reason: format!(
                        "opcode for '{name}' has length {} but opcode field is {opcode_bits} bits",
                        info.opcode.len()
                    ),
                });
            }
            mnemonics.insert(
                name,
                MnemonicInfo {
                    opcode: info.opcode,
                    formats: info.formato,
                },
            );
        }

        let mut type_codes = HashMap::new();
        let mut type_codes_inverse = HashMap::new();
        for (name, code) in raw.tipos {
            if code.len() != 3 {
                return Err(AssemblyError::ConfigError {
                    reason: format!("operand-type code for '{name}' must be 3 bits, got '{code}'"),
                });
            }
            type_codes_inverse.insert(code.clone(), name.clone());
            type_codes.insert(name, code);
        }

        Ok(Config {
            word_bits,
            opcode_bits,
            operand_type_bits,
            literal_bits,
            mnemonics,
            type_codes,
            type_codes_inverse,
        })
    }

    pub fn mnemonic(&self, name: &str) -> Option<&MnemonicInfo> {
        self.mnemonics.get(&name.to_ascii_uppercase())
    }

    pub fn type_code(&self, operand: &Operand) -> Option<String> {
        let name = match operand {
            Operand::Register(Register::A) => "A",
            Operand::Register(Register::B) => "B",
            Operand::Indirect(Register::A) => "(A)",
            Operand::Indirect(Register::B) => "(B)",
            Operand::Direct(_) => "(dir)",
            Operand::Immediate(_) => "lit",
            // Spec defines direct addressing only via the parenthesized form;
            // a bare identifier has no operand-type code of its own here.
            Operand::Symbol(_) => return None,
        };
        self.type_codes.get(name).cloned()
    }

    pub fn max_literal_value(&self) -> i64 {
        (1i64 << self.literal_bits) - 1
    }
}

/// The explicit, Config-adjacent list of operand shapes `INC` accepts: the
/// two registers, register-indirect through `B`, and any direct-addressing
/// form (numeric or DATA name).
pub fn is_valid_inc_operand(operand: &Operand) -> bool {
    matches!(
        operand,
        Operand::Register(Register::A)
            | Operand::Register(Register::B)
            | Operand::Indirect(Register::B)
            | Operand::Direct(DirectTarget::Numeric(_))
            | Operand::Direct(DirectTarget::Name(_))
    )
}

/// `DEC` accepts only the accumulator.
pub fn is_valid_dec_operand(operand: &Operand) -> bool {
    matches!(operand, Operand::Register(Register::A))
}

/// `POP` accepts exactly one of the two registers.
pub fn is_valid_pop_operand(operand: &Operand) -> bool {
    matches!(operand, Operand::Register(Register::A) | Operand::Register(Register::B))
}
