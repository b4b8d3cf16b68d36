use pest::iterators::Pair;

use super::Rule;
use crate::ast::{CodeLine, DirectTarget, Instruction, Operand, Register};
use crate::errors::AssemblyError;
use crate::literal;

pub fn build_code_line(line_pair: Pair<Rule>, line: usize) -> Result<CodeLine, AssemblyError> {
    let inner = line_pair.into_inner().next().expect("line has exactly one body rule");
    match inner.as_rule() {
        Rule::label => {
            let name = inner
                .into_inner()
                .next()
                .expect("label carries an identifier")
                .as_str()
                .to_string();
            Ok(CodeLine::Label { name, line })
        }
        Rule::instruction => {
            let mut parts = inner.into_inner();
            let mnemonic = parts
                .next()
                .expect("instruction carries a mnemonic")
                .as_str()
                .to_string();
            let mut operands = Vec::new();
            for operand_pair in parts {
                operands.push(build_operand(operand_pair, line)?);
            }
            Ok(CodeLine::Instruction(Instruction { mnemonic, operands, line }))
        }
        other => unreachable!("unexpected top-level rule {other:?}"),
    }
}

fn build_operand(pair: Pair<Rule>, line: usize) -> Result<Operand, AssemblyError> {
    let inner = pair.into_inner().next().expect("operand wraps exactly one shape");
    match inner.as_rule() {
        Rule::indirect => {
            let reg = inner
                .into_inner()
                .next()
                .expect("indirect wraps a register")
                .as_str();
            Ok(Operand::Indirect(parse_register(reg)))
        }
        Rule::direct => {
            let target = inner.into_inner().next().expect("direct wraps its target");
            match target.as_rule() {
                Rule::immediate => {
                    let value = literal::parse_value(target.as_str(), line)?;
                    Ok(Operand::Direct(DirectTarget::Numeric(value)))
                }
                Rule::identifier => {
                    Ok(Operand::Direct(DirectTarget::Name(target.as_str().to_string())))
                }
                other => unreachable!("unexpected direct target rule {other:?}"),
            }
        }
        Rule::register => Ok(Operand::Register(parse_register(inner.as_str()))),
        Rule::immediate => {
            let value = literal::parse_value(inner.as_str(), line)?;
            Ok(Operand::Immediate(value))
        }
        Rule::identifier => Ok(Operand::Symbol(inner.as_str().to_string())),
        other => unreachable!("unexpected operand rule {other:?}"),
    }
}

fn parse_register(text: &str) -> Register {
    match text {
        "A" => Register::A,
        "B" => Register::B,
        other => unreachable!("register rule only matches A/B, got {other}"),
    }
}
