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

//! Parsed representation of a single code-section line, produced by the parser
//! and consumed by the label manager and instruction processor.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    B,
}

impl Register {
    pub fn as_str(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::B => "B",
        }
    }
}

/// The target of a direct-addressing operand `(X)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectTarget {
    Numeric(i64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Bare register, e.g. `A`.
    Register(Register),
    /// Register-indirect, e.g. `(A)`.
    Indirect(Register),
    /// Direct addressing through a numeric literal or a DATA name, e.g. `(5)`, `(count)`.
    Direct(DirectTarget),
    /// A bare numeric or character literal used as an immediate value.
    Immediate(i64),
    /// A bare identifier that is neither a register nor a known operand shape;
    /// resolved later as a label (jump targets) or rejected as unknown.
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub operands: Vec<Operand>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeLine {
    Label { name: String, line: usize },
    Instruction(Instruction),
}
