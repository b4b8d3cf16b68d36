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

pub mod assembler;
pub mod ast;
pub mod binary_generator;
pub mod config;
pub mod errors;
pub mod file_processor;
pub mod file_reader;
pub mod instruction_processor;
pub mod label_manager;
pub mod literal;
pub mod memory;
pub mod parser;
pub mod rom_writer;

extern crate pest;
extern crate pest_derive;
