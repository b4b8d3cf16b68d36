//! Data-section layout: assigns each declared name a base address and stores
//! its decoded value(s), dispatching on the value token's shape (scalar
//! number, char literal, quoted string, or array).

use std::collections::HashMap;

use crate::errors::AssemblyError;
use crate::literal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Scalar,
    Char,
    String,
    Array,
}

#[derive(Debug, Clone)]
pub struct DataEntry {
    pub name: String,
    pub kind: DataKind,
    pub base_address: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryCell {
    pub address: usize,
    pub word_value: i64,
}

#[derive(Debug, Default)]
pub struct Memory {
    cells: Vec<MemoryCell>,
    entries: HashMap<String, DataEntry>,
    next_address: usize,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the raw `(text, line_number)` pairs that make up the DATA
    /// section (after `FileProcessor` has stripped comments and whitespace)
    /// and builds the address map.
    pub fn build(data_lines: &[(String, usize)]) -> Result<Memory, AssemblyError> {
        let mut memory = Memory::new();
        let mut current_array: Option<String> = None;

        for (text, line) in data_lines {
            let line = *line;
            let mut parts = text.splitn(2, char::is_whitespace);
            let first = parts.next().unwrap_or("").trim();
            let rest = parts.next().map(str::trim);

            match rest {
                None => {
                    // Single-token continuation line: appends to the open array.
                    let name = current_array.clone().ok_or_else(|| AssemblyError::MemoryError {
                        line,
                        reason: format!(
                            "data value '{first}' has no preceding array declaration"
                        ),
                    })?;
                    let value = literal::parse_value(first, line)?;
                    memory.push_cell(value);
                    let entry = memory.entries.get_mut(&name).expect("array entry tracked");
                    entry.length += 1;
                    entry.kind = DataKind::Array;
                }
                Some(value_token) => {
                    let name = first.to_string();
                    if memory.entries.contains_key(&name) {
                        return Err(AssemblyError::MemoryError {
                            line,
                            reason: format!("duplicate data name '{name}'"),
                        });
                    }

                    if value_token.len() >= 2
                        && value_token.starts_with('"')
                        && value_token.ends_with('"')
                    {
                        let base = memory.next_address;
                        let content = &value_token[1..value_token.len() - 1];
                        let mut length = 0;
                        for c in content.chars() {
                            if !c.is_ascii() {
                                return Err(AssemblyError::MemoryError {
                                    line,
                                    reason: format!("string for '{name}' contains non-ASCII character '{c}'"),
                                });
                            }
                            memory.push_cell(c as i64);
                            length += 1;
                        }
                        memory.push_cell(0);
                        length += 1;
                        memory.entries.insert(
                            name.clone(),
                            DataEntry { name, kind: DataKind::String, base_address: base, length },
                        );
                        current_array = None;
                    } else if literal::is_char_literal(value_token) {
                        let base = memory.next_address;
                        let value = literal::parse_value(value_token, line)?;
                        memory.push_cell(value);
                        memory.entries.insert(
                            name.clone(),
                            DataEntry { name, kind: DataKind::Char, base_address: base, length: 1 },
                        );
                        current_array = None;
                    } else {
                        let base = memory.next_address;
                        let value = literal::parse_value(value_token, line)?;
                        memory.push_cell(value);
                        memory.entries.insert(
                            name.clone(),
                            DataEntry {
                                name: name.clone(),
                                kind: DataKind::Scalar,
                                base_address: base,
                                length: 1,
                            },
                        );
                        current_array = Some(name);
                    }
                }
            }
        }

        Ok(memory)
    }

    fn push_cell(&mut self, value: i64) {
        self.cells.push(MemoryCell { address: self.next_address, word_value: value });
        self.next_address += 1;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&DataEntry> {
        self.entries.get(name)
    }

    pub fn address_of(&self, name: &str) -> Option<usize> {
        self.entries.get(name).map(|e| e.base_address)
    }

    pub fn cells(&self) -> &[MemoryCell] {
        &self.cells
    }
}
