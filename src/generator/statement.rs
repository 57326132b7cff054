//! Statement generation
//!
//! Declarations, assignments and conditionals, each produced against the
//! generator's current scope stack. Conditionals recurse into the program
//! driver for their branch bodies.

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::primitives::is_reserved;
use super::value::{generate_condition, generate_value, Condition, Value, VariableType};
use super::Generator;
use crate::{Error, Result};

/// The three statement shapes the driver chooses between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `let name = value`
    Declaration,
    /// `name = value`
    Assignment,
    /// `if (...) { ... }` with optional else
    Conditional,
}

impl StatementKind {
    /// Every statement kind
    pub const ALL: [Self; 3] = [Self::Declaration, Self::Assignment, Self::Conditional];
}

impl Distribution<StatementKind> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> StatementKind {
        StatementKind::ALL[rng.gen_range(0..StatementKind::ALL.len())]
    }
}

/// Shape of a conditional statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionalKind {
    /// Single branch
    If,
    /// Two branches, each in its own scope
    IfElse,
}

impl Distribution<ConditionalKind> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ConditionalKind {
        if rng.gen_bool(0.5) {
            ConditionalKind::If
        } else {
            ConditionalKind::IfElse
        }
    }
}

/// A run of statements together with the text they were rendered to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Statements in emission order
    pub statements: Vec<Statement>,
    /// Rendered text, one indented line per top-level statement
    pub code: String,
}

/// One generated statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Introduces `name` in the innermost scope
    Declaration {
        /// New variable
        name: String,
        /// Initial value, whose type is the variable's type
        value: Value,
    },
    /// Stores a new value into a visible variable
    Assignment {
        /// Target variable
        name: String,
        /// New value of the variable's type
        value: Value,
    },
    /// Conditional whose branches were generated in child scopes
    Conditional {
        /// Guard expression
        condition: Condition,
        /// Then-branch body
        then_body: Block,
        /// Else-branch body, for if/else
        else_body: Option<Block>,
    },
    /// Conditional suppressed by the nesting bound
    Empty,
}

impl Statement {
    /// Render the statement without its leading indentation
    ///
    /// `prefix` is the indentation of the line the statement starts on; it is
    /// repeated before each closing brace. Branch bodies carry their own
    /// deeper indentation.
    #[must_use]
    pub fn to_source(&self, prefix: &str) -> String {
        match self {
            Self::Declaration { name, value } => format!("let {name} = {value}"),
            Self::Assignment { name, value } => format!("{name} = {value}"),
            Self::Conditional {
                condition,
                then_body,
                else_body,
            } => {
                let mut out = format!("if ({condition}) {{\n{}{prefix}}}", then_body.code);
                if let Some(else_body) = else_body {
                    out.push_str(&format!(" else {{\n{}{prefix}}}", else_body.code));
                }
                out
            }
            Self::Empty => String::new(),
        }
    }
}

impl Generator {
    /// Declare a fresh variable of type `ty` in the innermost scope
    ///
    /// Candidate names that are reserved words or already bound in the
    /// innermost scope are redrawn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdentifierExhausted`] once `max_identifier_attempts`
    /// candidates have been rejected.
    pub fn generate_declaration(&mut self, ty: VariableType) -> Result<Statement> {
        let max_attempts = self.config.max_identifier_attempts;
        for attempt in 1..=max_attempts {
            let name = self
                .random
                .identifier(Some(self.config.max_identifier_length));
            if is_reserved(&name) || !self.scopes.declare(name.clone(), ty) {
                continue;
            }

            if attempt > 1 {
                self.stats.identifier_retries += attempt - 1;
                tracing::debug!(attempt, %name, "unique identifier found after retries");
            }
            self.stats.declarations += 1;
            let value = generate_value(ty, &mut self.random, &self.config);
            return Ok(Statement::Declaration { name, value });
        }
        self.stats.identifier_retries += max_attempts;
        tracing::debug!(attempts = max_attempts, "identifier space exhausted");
        Err(Error::IdentifierExhausted {
            attempts: max_attempts,
        })
    }

    /// Assign a new value to a visible variable
    ///
    /// With nothing in scope this becomes a declaration of a random type.
    ///
    /// # Errors
    ///
    /// Propagates declaration errors from the fallback path.
    pub fn generate_assignment(&mut self) -> Result<Statement> {
        match self.scopes.lookup(None, &mut self.random) {
            Some(binding) => {
                let value = generate_value(binding.ty, &mut self.random, &self.config);
                self.stats.assignments += 1;
                Ok(Statement::Assignment {
                    name: binding.name,
                    value,
                })
            }
            None => {
                let ty: VariableType = self.random.gen();
                self.generate_declaration(ty)
            }
        }
    }

    /// Generate an `if` or `if/else` statement
    ///
    /// Returns [`Statement::Empty`] when the scope stack is already
    /// `max_indent_level` deep.
    ///
    /// # Errors
    ///
    /// Propagates errors from generating the branch bodies.
    pub fn generate_conditional(&mut self, kind: ConditionalKind) -> Result<Statement> {
        let depth = self.scopes.depth();
        if depth >= self.config.max_indent_level {
            self.stats.suppressed_conditionals += 1;
            tracing::debug!(depth, "conditional suppressed at nesting bound");
            return Ok(Statement::Empty);
        }

        let condition = generate_condition(&self.scopes, &mut self.random, &self.config);
        let then_body = self.generate_branch()?;
        let else_body = match kind {
            ConditionalKind::If => None,
            ConditionalKind::IfElse => Some(self.generate_branch()?),
        };

        match kind {
            ConditionalKind::If => self.stats.if_statements += 1,
            ConditionalKind::IfElse => self.stats.if_else_statements += 1,
        }
        Ok(Statement::Conditional {
            condition,
            then_body,
            else_body,
        })
    }

    /// Generate one branch body inside its own child scope
    fn generate_branch(&mut self) -> Result<Block> {
        self.scopes.push();
        self.stats.scope_pushes += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.scopes.depth());

        let body = self.generate_block(self.config.block_size_budget);

        self.scopes.pop()?;
        self.stats.scope_pops += 1;
        body
    }
}
