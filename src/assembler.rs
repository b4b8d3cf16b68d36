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

//! Thin orchestrator wiring FileProcessor, Memory, LabelManager,
//! InstructionProcessor, and BinaryGenerator into the two-pass assembly
//! pipeline.

use std::path::Path;

use crate::ast::{CodeLine, DirectTarget, Instruction, Operand, Register};
use crate::binary_generator;
use crate::config::Config;
use crate::errors::AssemblyError;
use crate::file_processor;
use crate::file_reader::FileReader;
use crate::label_manager::LabelManager;
use crate::memory::Memory;
use crate::parser;

/// Assembles `source` against `config`, returning one `W`-bit binary word
/// per line, in machine-address order. When `load_data` is set, a synthetic
/// `MOV A,<v>` / `MOV (addr),A` pair is prepended for every DATA cell,
/// ahead of the planning pass, so they occupy real machine addresses and
/// shift every subsequent label the same way hand-written instructions would.
pub fn assemble(source: &str, config: &Config, load_data: bool) -> Result<Vec<String>, AssemblyError> {
    let processed = file_processor::process(source)?;
    let memory = Memory::build(&processed.data_lines)?;

    let mut code_lines: Vec<CodeLine> = Vec::new();
    if load_data {
        code_lines.extend(synthesize_load_data(&memory));
    }
    for (text, line) in &processed.code_lines {
        code_lines.push(parser::parse_code_line(text, *line)?);
    }

    let label_manager = LabelManager::plan(&code_lines)?;
    binary_generator::generate(&code_lines, config, &memory, &label_manager)
}

/// Reads `source_path` through `reader` and assembles it.
pub fn assemble_file<F: FileReader>(
    source_path: &Path,
    config: &Config,
    load_data: bool,
    reader: &F,
) -> Result<Vec<String>, AssemblyError> {
    let source = reader.read_to_string(source_path).map_err(|e| AssemblyError::SyntaxError {
        line: 0,
        reason: format!("could not read source file '{}': {e}", source_path.display()),
    })?;
    assemble(&source, config, load_data)
}

fn synthesize_load_data(memory: &Memory) -> Vec<CodeLine> {
    memory
        .cells()
        .iter()
        .flat_map(|cell| {
            [
                CodeLine::Instruction(Instruction {
                    mnemonic: "MOV".to_string(),
                    operands: vec![
                        Operand::Register(Register::A),
                        Operand::Immediate(cell.word_value),
                    ],
                    line: 0,
                }),
                CodeLine::Instruction(Instruction {
                    mnemonic: "MOV".to_string(),
                    operands: vec![
                        Operand::Direct(DirectTarget::Numeric(cell.address as i64)),
                        Operand::Register(Register::A),
                    ],
                    line: 0,
                }),
            ]
        })
        .collect()
}
