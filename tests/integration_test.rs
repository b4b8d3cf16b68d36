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

use basys3_asm::assembler::assemble_file;
use basys3_asm::config::Config;
use basys3_asm::errors::AssemblyError;
use basys3_asm::file_reader::MockFileReader;
use std::path::Path;

const SETUP: &str = r#"{
    "config": {
        "tamañoPalabra": 36,
        "instrucciones": {"bits": 6},
        "tipos": {"bits": 6},
        "literals": {"bits": 24}
    },
    "instrucciones": {
        "NOP": {"opcode": "000000"},
        "MOV": {"opcode": "000001"},
        "ADD": {"opcode": "000010"},
        "SUB": {"opcode": "000011"},
        "JMP": {"opcode": "010000"},
        "JEQ": {"opcode": "010001"},
        "CALL": {"opcode": "010010"},
        "PUSH": {"opcode": "000100"},
        "INC": {"opcode": "000101"},
        "DEC": {"opcode": "000110"},
        "POP1": {"opcode": "000111"},
        "POP2": {"opcode": "001000"},
        "RET1": {"opcode": "001001"},
        "RET2": {"opcode": "001010"}
    },
    "tipos": {
        "A": "001", "B": "010", "(A)": "101", "(B)": "110", "(dir)": "011", "lit": "100"
    }
}"#;

fn config() -> Config {
    Config::from_json(SETUP).unwrap()
}

#[test]
fn assembles_a_minimal_program_from_disk() {
    let mut reader = MockFileReader::default();
    reader.add_file("test.asm", "CODE:\nNOP\n");

    let binary = assemble_file(Path::new("test.asm"), &config(), false, &reader).unwrap();

    assert_eq!(binary, vec!["0".repeat(36)]);
}

#[test]
fn resolves_a_forward_jump_across_a_label() {
    let mut reader = MockFileReader::default();
    reader.add_file("test.asm", "CODE:\nJMP end\nNOP\nend:\nNOP\n");

    let binary = assemble_file(Path::new("test.asm"), &config(), false, &reader).unwrap();

    assert_eq!(binary.len(), 3);
    assert_eq!(i64::from_str_radix(&binary[0][12..], 2).unwrap(), 2);
}

#[test]
fn resolves_direct_addressing_against_the_data_section() {
    let mut reader = MockFileReader::default();
    reader.add_file(
        "test.asm",
        "DATA:\nfirst 10\nsecond 20\nCODE:\nMOV A, (first)\nADD A, (second)\n",
    );

    let binary = assemble_file(Path::new("test.asm"), &config(), false, &reader).unwrap();

    assert_eq!(binary.len(), 2);
    assert_eq!(i64::from_str_radix(&binary[0][12..], 2).unwrap(), 0);
    assert_eq!(i64::from_str_radix(&binary[1][12..], 2).unwrap(), 1);
}

#[test]
fn expanding_mnemonics_occupy_two_words_and_shift_later_labels() {
    let mut reader = MockFileReader::default();
    reader.add_file("test.asm", "CODE:\nPUSH A\ntop:\nPOP A\nJMP top\n");

    let binary = assemble_file(Path::new("test.asm"), &config(), false, &reader).unwrap();

    // PUSH (1 word) + POP (2 words) + JMP (1 word) == 4.
    assert_eq!(binary.len(), 4);
    assert_eq!(i64::from_str_radix(&binary[3][12..], 2).unwrap(), 1);
}

#[test]
fn load_data_flag_synthesizes_initializer_instructions() {
    let mut reader = MockFileReader::default();
    reader.add_file("test.asm", "DATA:\ncounter 9\nCODE:\ntarget:\nNOP\n");

    let binary = assemble_file(Path::new("test.asm"), &config(), true, &reader).unwrap();

    // Two synthetic MOV words ahead of the real NOP.
    assert_eq!(binary.len(), 3);
    assert!(binary[2].starts_with("000000"));
}

#[test]
fn missing_source_file_is_reported_as_an_error() {
    let reader = MockFileReader::default();

    let err = assemble_file(Path::new("missing.asm"), &config(), false, &reader).unwrap_err();

    assert!(matches!(err, AssemblyError::SyntaxError { line: 0, .. }));
}

#[test]
fn duplicate_label_across_the_whole_file_is_rejected() {
    let mut reader = MockFileReader::default();
    reader.add_file("test.asm", "CODE:\nstart:\nNOP\nstart:\nNOP\n");

    let err = assemble_file(Path::new("test.asm"), &config(), false, &reader).unwrap_err();

    assert!(matches!(err, AssemblyError::LabelError { .. }));
}
