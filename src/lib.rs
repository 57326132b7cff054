//! Scopegen - Scope-Aware Random Program Generator
//!
//! Scopegen emits random but lexically consistent source snippets: variable
//! declarations, assignments and nested `if` / `if-else` blocks in which every
//! referenced identifier is declared before use, with a value of its declared
//! type, and is only referenced while its block is still open. The output is
//! meant as test input for tools that consume source code (parsers, linters,
//! fuzz targets).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          GENERATOR                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Program driver  →  Statements  →  Values / Conditions       │
//! │        ↑                 │                 │                 │
//! │        └── branch bodies ┘        Scope stack + Primitives   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scopegen::generator::Generator;
//! use scopegen::GeneratorConfig;
//!
//! let config = GeneratorConfig::default().with_seed(42).with_max_indent_level(4);
//! let mut generator = Generator::new(config)?;
//! let program = generator.generate(Some(256))?;
//! println!("{}", program.code);
//! # Ok::<(), scopegen::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`generator`] - Scope stack, primitives, statements and the program driver
//! - [`config`] - Generator configuration and its defaults
//! - [`error`] - Error type

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod generator;

pub use config::GeneratorConfig;
pub use error::{Error, Result};

/// Generate one program with the default configuration
///
/// `None` uses the default size budget. Each call draws a fresh seed.
///
/// # Errors
///
/// Only fails if an internal generation contract is broken.
pub fn generate_program(size_budget: Option<usize>) -> Result<String> {
    generator::Generator::new(GeneratorConfig::default())?.generate_program(size_budget)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::GeneratorConfig;
    pub use crate::generator::{
        GeneratedProgram, GenerationStats, Generator, Statement, VariableType,
    };
    pub use crate::{generate_program, Error, Result};
}
