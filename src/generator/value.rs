//! Literal values and conditions

use std::fmt;

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::primitives::RandomSource;
use super::scope::ScopeStack;
use crate::config::GeneratorConfig;

/// Type of a generated variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Non-negative integer
    Number,
    /// Double-quoted letters
    String,
    /// `true` or `false`
    Boolean,
}

impl VariableType {
    /// Every variable type, in declaration order
    pub const ALL: [Self; 3] = [Self::Number, Self::String, Self::Boolean];

    /// Get all variable types
    #[must_use]
    pub fn all() -> &'static [Self] {
        &Self::ALL
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

impl Distribution<VariableType> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> VariableType {
        VariableType::ALL[rng.gen_range(0..VariableType::ALL.len())]
    }
}

/// A literal value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Integer literal
    Number(u64),
    /// String literal payload, without quotes
    String(String),
    /// Boolean literal
    Boolean(bool),
}

impl Value {
    /// Type of this literal
    #[must_use]
    pub fn ty(&self) -> VariableType {
        match self {
            Self::Number(_) => VariableType::Number,
            Self::String(_) => VariableType::String,
            Self::Boolean(_) => VariableType::Boolean,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtE,
    /// `>=`
    GtE,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNotEq,
}

impl CompareOp {
    /// Every comparison operator
    pub const ALL: [Self; 6] = [
        Self::Lt,
        Self::Gt,
        Self::LtE,
        Self::GtE,
        Self::StrictEq,
        Self::StrictNotEq,
    ];

    /// Get all comparison operators
    #[must_use]
    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Source text of the operator
    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtE => "<=",
            Self::GtE => ">=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
        }
    }
}

impl Distribution<CompareOp> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CompareOp {
        CompareOp::ALL[rng.gen_range(0..CompareOp::ALL.len())]
    }
}

/// Boolean-context expression guarding a conditional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// `name op value`, with `value` of the variable's type
    Compare {
        /// Referenced variable
        name: String,
        /// Comparator
        op: CompareOp,
        /// Right-hand literal
        value: Value,
    },
    /// Bare boolean literal, used when nothing is in scope
    Literal(bool),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { name, op, value } => write!(f, "{name} {} {value}", op.to_str()),
            Self::Literal(b) => write!(f, "{b}"),
        }
    }
}

/// Random literal of type `ty`
pub fn generate_value(
    ty: VariableType,
    source: &mut RandomSource,
    config: &GeneratorConfig,
) -> Value {
    match ty {
        VariableType::Number => Value::Number(source.int(Some(config.max_int))),
        VariableType::String => {
            Value::String(source.identifier(Some(config.max_identifier_length)))
        }
        VariableType::Boolean => Value::Boolean(source.boolean()),
    }
}

/// Random condition over a visible variable, or a boolean literal if none is visible
pub fn generate_condition(
    scopes: &ScopeStack,
    source: &mut RandomSource,
    config: &GeneratorConfig,
) -> Condition {
    match scopes.lookup(None, source) {
        Some(binding) => {
            let value = generate_value(binding.ty, source, config);
            Condition::Compare {
                name: binding.name,
                op: source.gen(),
                value,
            }
        }
        None => Condition::Literal(source.boolean()),
    }
}
