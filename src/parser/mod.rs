/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

mod ast_builder;

use pest::Parser;
use pest_derive::Parser;

use crate::ast::CodeLine;
use crate::errors::AssemblyError;

#[derive(Parser)]
#[grammar = "./grammar.pest"]
struct AsmParser;

/// Parses one already-normalized code-section line (as produced by
/// `file_processor::process`) into a label or an instruction.
pub fn parse_code_line(text: &str, line: usize) -> Result<CodeLine, AssemblyError> {
    let mut pairs = AsmParser::parse(Rule::line, text).map_err(|e| AssemblyError::SyntaxError {
        line,
        reason: e.to_string(),
    })?;
    let line_pair = pairs.next().expect("line rule always produces one pair");
    ast_builder::build_code_line(line_pair, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DirectTarget, Operand, Register};

    #[test]
    fn parses_label() {
        let result = parse_code_line("loop:", 1).unwrap();
        assert_eq!(result, CodeLine::Label { name: "loop".to_string(), line: 1 });
    }

    #[test]
    fn parses_no_operand_instruction() {
        let result = parse_code_line("NOP", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => {
                assert_eq!(instr.mnemonic, "NOP");
                assert!(instr.operands.is_empty());
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn parses_binary_register_operands() {
        let result = parse_code_line("MOV A, B", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => {
                assert_eq!(instr.mnemonic, "MOV");
                assert_eq!(
                    instr.operands,
                    vec![Operand::Register(Register::A), Operand::Register(Register::B)]
                );
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn parses_immediate_literal() {
        let result = parse_code_line("MOV A, 5", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => {
                assert_eq!(instr.operands[1], Operand::Immediate(5));
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn parses_hex_and_binary_literals() {
        let hex = parse_code_line("MOV A, 10h", 1).unwrap();
        let bin = parse_code_line("MOV A, 10b", 1).unwrap();
        match (hex, bin) {
            (CodeLine::Instruction(a), CodeLine::Instruction(b)) => {
                assert_eq!(a.operands[1], Operand::Immediate(16));
                assert_eq!(b.operands[1], Operand::Immediate(2));
            }
            _ => panic!("expected instructions"),
        }
    }

    #[test]
    fn parses_char_literal() {
        let result = parse_code_line("MOV A, 'A'", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => assert_eq!(instr.operands[1], Operand::Immediate(65)),
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn parses_register_indirect() {
        let result = parse_code_line("MOV A, (B)", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => {
                assert_eq!(instr.operands[1], Operand::Indirect(Register::B));
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn parses_direct_addressing_by_name() {
        let result = parse_code_line("MOV A, (count)", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => {
                assert_eq!(
                    instr.operands[1],
                    Operand::Direct(DirectTarget::Name("count".to_string()))
                );
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn parses_direct_addressing_by_number() {
        let result = parse_code_line("INC (5)", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => {
                assert_eq!(instr.operands[0], Operand::Direct(DirectTarget::Numeric(5)));
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn parses_jump_target_as_symbol() {
        let result = parse_code_line("JMP done", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => {
                assert_eq!(instr.operands[0], Operand::Symbol("done".to_string()));
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn rejects_malformed_line() {
        assert!(parse_code_line("MOV ,,", 1).is_err());
    }

    #[test]
    fn parses_multi_character_label_starting_with_a_register_letter() {
        let result = parse_code_line("Begin:", 1).unwrap();
        assert_eq!(result, CodeLine::Label { name: "Begin".to_string(), line: 1 });
    }

    #[test]
    fn parses_jump_to_a_label_starting_with_a_register_letter() {
        let result = parse_code_line("JMP Begin", 1).unwrap();
        match result {
            CodeLine::Instruction(instr) => {
                assert_eq!(instr.operands[0], Operand::Symbol("Begin".to_string()));
            }
            _ => panic!("expected instruction"),
        }
    }
}
