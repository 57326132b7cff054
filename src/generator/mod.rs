//! Scope-aware program generation engine
//!
//! [`Generator`] owns every piece of mutable state a run needs: the
//! configuration, a seeded random source, the lexical scope stack and the
//! statistics counters. Nothing is global, so independent generators can run
//! side by side in one process.
//!
//! The driver ([`Generator::generate_block`]) emits statements until its size
//! budget is reached. Conditionals call back into the driver with the smaller
//! block budget after pushing a child scope, and stop nesting once the scope
//! stack reaches `max_indent_level`.

mod primitives;
mod scope;
mod statement;
mod value;

pub use primitives::{is_reserved, RandomSource, ALPHABET, RESERVED_WORDS};
pub use scope::{Binding, Scope, ScopeStack};
pub use statement::{Block, ConditionalKind, Statement, StatementKind};
pub use value::{generate_condition, generate_value, CompareOp, Condition, Value, VariableType};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::{Error, Result};

/// Counters collected over one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Declarations emitted, including assignment fallbacks
    pub declarations: usize,
    /// Assignments emitted
    pub assignments: usize,
    /// Single-branch conditionals emitted
    pub if_statements: usize,
    /// Two-branch conditionals emitted
    pub if_else_statements: usize,
    /// Conditionals dropped by the nesting bound
    pub suppressed_conditionals: usize,
    /// Child scopes opened
    pub scope_pushes: usize,
    /// Child scopes closed
    pub scope_pops: usize,
    /// Identifier candidates rejected, including those of an exhausted declaration
    pub identifier_retries: usize,
    /// Deepest scope stack seen
    pub max_depth: usize,
}

impl GenerationStats {
    /// Conditionals of either shape
    #[must_use]
    pub fn conditionals(&self) -> usize {
        self.if_statements + self.if_else_statements
    }

    /// Statements of every kind, suppressed conditionals included
    #[must_use]
    pub fn total_statements(&self) -> usize {
        self.declarations + self.assignments + self.conditionals() + self.suppressed_conditionals
    }

    /// Fold another run's counters into this one
    pub fn merge(&mut self, other: &Self) {
        self.declarations += other.declarations;
        self.assignments += other.assignments;
        self.if_statements += other.if_statements;
        self.if_else_statements += other.if_else_statements;
        self.suppressed_conditionals += other.suppressed_conditionals;
        self.scope_pushes += other.scope_pushes;
        self.scope_pops += other.scope_pops;
        self.identifier_retries += other.identifier_retries;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Result of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProgram {
    /// Program text, newline terminated
    pub code: String,
    /// Top-level statements, with nested branch bodies
    pub statements: Vec<Statement>,
    /// Counters for this run
    pub stats: GenerationStats,
    /// Seed that replays this program as the first run of a fresh generator
    /// with the same config
    pub seed: u64,
}

/// Random program generator
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    random: RandomSource,
    scopes: ScopeStack,
    stats: GenerationStats,
    seed: u64,
    /// Source of per-run seeds after the first run
    seeds: RandomSource,
    runs: usize,
}

impl Generator {
    /// Create a generator from a validated config
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the config fails validation.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self::seeded(config, seed))
    }

    /// Create a generator with the default config and the given seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::seeded(GeneratorConfig::default().with_seed(seed), seed)
    }

    fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            random: RandomSource::from_seed(seed),
            scopes: ScopeStack::new(),
            stats: GenerationStats::default(),
            seed,
            seeds: RandomSource::from_seed(seed),
            runs: 0,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Seed the generator was created with, which is also the seed of its
    /// first run
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current scope stack
    #[must_use]
    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    /// Mutable access to the scope stack, for seeding bindings before
    /// generating individual statements
    pub fn scopes_mut(&mut self) -> &mut ScopeStack {
        &mut self.scopes
    }

    /// Counters accumulated since the last run started
    #[must_use]
    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Generate a complete program
    ///
    /// The scope stack and counters are reset first, so no bindings leak in
    /// from earlier runs. `None` uses the configured `size_budget`. At least
    /// one statement is emitted even for a zero budget.
    ///
    /// The first run uses the generator's seed. Later runs draw a fresh seed
    /// from a separate stream and reseed the random source with it, so every
    /// [`GeneratedProgram::seed`] replays its program on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if an internal contract is broken: identifier
    /// exhaustion, a root-scope pop, or an unbalanced scope stack.
    pub fn generate(&mut self, size_budget: Option<usize>) -> Result<GeneratedProgram> {
        let size_budget = size_budget.unwrap_or(self.config.size_budget);
        let run_seed = if self.runs == 0 {
            self.seed
        } else {
            self.seeds.gen::<u64>()
        };
        self.runs += 1;
        let _span = tracing::info_span!("generate_program", size_budget, seed = run_seed).entered();

        self.random = RandomSource::from_seed(run_seed);
        self.scopes.reset();
        self.stats = GenerationStats {
            max_depth: 1,
            ..GenerationStats::default()
        };

        let block = self.generate_block(size_budget)?;
        if self.scopes.depth() != 1 || self.stats.scope_pushes != self.stats.scope_pops {
            return Err(Error::UnbalancedScopes {
                depth: self.scopes.depth(),
            });
        }

        tracing::debug!(
            bytes = block.code.len(),
            statements = self.stats.total_statements(),
            max_depth = self.stats.max_depth,
            "program generated"
        );
        Ok(GeneratedProgram {
            code: block.code,
            statements: block.statements,
            stats: self.stats.clone(),
            seed: run_seed,
        })
    }

    /// Generate a complete program and return only its text
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    pub fn generate_program(&mut self, size_budget: Option<usize>) -> Result<String> {
        self.generate(size_budget).map(|program| program.code)
    }

    /// Generate `count` independent programs from this generator's stream
    ///
    /// # Errors
    ///
    /// Stops at the first failing run and returns its error.
    pub fn generate_batch(
        &mut self,
        count: usize,
        size_budget: Option<usize>,
    ) -> Result<Vec<GeneratedProgram>> {
        (0..count).map(|_| self.generate(size_budget)).collect()
    }

    /// Emit statements at the current depth until `size_budget` bytes are written
    ///
    /// The budget is checked after each statement, so the block always holds
    /// at least one line and may overshoot the budget by its last statement.
    ///
    /// # Errors
    ///
    /// Propagates statement generation errors.
    pub fn generate_block(&mut self, size_budget: usize) -> Result<Block> {
        let mut block = Block::default();
        loop {
            let prefix = self.indentation();
            let statement = match self.random.gen::<StatementKind>() {
                StatementKind::Declaration => {
                    let ty: VariableType = self.random.gen();
                    self.generate_declaration(ty)?
                }
                StatementKind::Assignment => self.generate_assignment()?,
                StatementKind::Conditional => {
                    let kind: ConditionalKind = self.random.gen();
                    self.generate_conditional(kind)?
                }
            };

            block.code.push_str(&prefix);
            block.code.push_str(&statement.to_source(&prefix));
            block.code.push('\n');
            block.statements.push(statement);

            if block.code.len() >= size_budget {
                return Ok(block);
            }
        }
    }

    /// Indentation for a line at the current scope depth
    fn indentation(&self) -> String {
        self.config.indent.repeat(self.scopes.depth() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GeneratorConfig::default().with_max_indent_level(0);
        assert!(matches!(Generator::new(config), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_new_records_configured_seed() {
        let gen = Generator::new(GeneratorConfig::default().with_seed(11)).unwrap();
        assert_eq!(gen.seed(), 11);
        assert_eq!(Generator::with_seed(11).seed(), 11);
    }

    #[test]
    fn test_generate_meets_budget() {
        let mut gen = Generator::with_seed(42);
        let program = gen.generate(Some(300)).unwrap();
        assert!(program.code.len() >= 300);
        assert!(program.code.ends_with('\n'));
        assert!(program.code.lines().count() >= program.statements.len());
    }

    #[test]
    fn test_generate_uses_config_budget() {
        let config = GeneratorConfig::default().with_seed(3).with_size_budget(200);
        let mut gen = Generator::new(config).unwrap();
        let code = gen.generate_program(None).unwrap();
        assert!(code.len() >= 200);
    }

    #[test]
    fn test_zero_budget_emits_one_statement() {
        let mut gen = Generator::with_seed(5);
        let program = gen.generate(Some(0)).unwrap();
        assert_eq!(program.statements.len(), 1);
        assert!(program.code.ends_with('\n'));
    }

    #[test]
    fn test_zero_budget_declaration_line() {
        // Seeds vary the first statement kind; find one that declares.
        let program = (0..64)
            .map(|seed| Generator::with_seed(seed).generate(Some(0)).unwrap())
            .find(|p| matches!(p.statements[0], Statement::Declaration { .. }))
            .unwrap();
        assert!(program.code.starts_with("let "));
        assert_eq!(program.code.matches('\n').count(), 1);
    }

    #[test]
    fn test_scope_stack_balanced_after_run() {
        let mut gen = Generator::with_seed(8);
        let program = gen.generate(Some(2000)).unwrap();
        assert_eq!(gen.scopes().depth(), 1);
        assert_eq!(program.stats.scope_pushes, program.stats.scope_pops);
    }

    #[test]
    fn test_reset_between_runs() {
        let mut gen = Generator::with_seed(13);
        gen.generate(Some(500)).unwrap();
        let second = gen.generate(Some(0)).unwrap();
        // A fresh run starts with an empty stack, so an assignment must
        // fall back to a declaration.
        if let Statement::Assignment { name, .. } = &second.statements[0] {
            panic!("assignment to {name} leaked from a previous run");
        }
    }

    #[test]
    fn test_same_seed_same_program() {
        let a = Generator::with_seed(1234).generate_program(None).unwrap();
        let b = Generator::with_seed(1234).generate_program(None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_program() {
        let a = Generator::with_seed(1).generate_program(None).unwrap();
        let b = Generator::with_seed(2).generate_program(None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_max_depth_respected() {
        let config = GeneratorConfig::default().with_seed(21).with_max_indent_level(2);
        let mut gen = Generator::new(config).unwrap();
        let program = gen.generate(Some(3000)).unwrap();
        assert!(program.stats.max_depth <= 2);
        for line in program.code.lines() {
            let indent = line.len() - line.trim_start().len();
            assert!(indent <= 2, "line nested too deep: {line:?}");
        }
    }

    #[test]
    fn test_max_indent_level_one_disables_conditionals() {
        let config = GeneratorConfig::default().with_seed(4).with_max_indent_level(1);
        let mut gen = Generator::new(config).unwrap();
        let program = gen.generate(Some(1000)).unwrap();
        assert!(!program.code.contains("if ("));
        assert_eq!(program.stats.conditionals(), 0);
        assert_eq!(program.stats.scope_pushes, 0);
    }

    #[test]
    fn test_generate_batch() {
        let mut gen = Generator::with_seed(99);
        let programs = gen.generate_batch(5, Some(100)).unwrap();
        assert_eq!(programs.len(), 5);
        assert!(programs.iter().all(|p| p.code.len() >= 100));
        assert_eq!(programs[0].seed, 99);
        let seeds: std::collections::BTreeSet<u64> = programs.iter().map(|p| p.seed).collect();
        assert_eq!(seeds.len(), 5);
    }

    #[test]
    fn test_batch_seed_replays_program() {
        let programs = Generator::with_seed(99).generate_batch(4, Some(100)).unwrap();
        for program in &programs {
            let replay = Generator::with_seed(program.seed).generate(Some(100)).unwrap();
            assert_eq!(replay.code, program.code, "seed {}", program.seed);
            assert_eq!(replay.statements, program.statements);
        }
    }

    #[test]
    fn test_repeated_runs_are_reproducible() {
        let mut a = Generator::with_seed(17);
        let mut b = Generator::with_seed(17);
        a.generate(Some(300)).unwrap();
        b.generate(Some(10)).unwrap();
        // Run seeds come from their own stream, so the first run's size does
        // not shift the second run.
        assert_eq!(a.generate(Some(200)).unwrap(), b.generate(Some(200)).unwrap());
    }

    #[test]
    fn test_stats_merge() {
        let mut total = GenerationStats::default();
        let run = GenerationStats {
            declarations: 2,
            assignments: 1,
            if_statements: 1,
            max_depth: 3,
            ..GenerationStats::default()
        };
        total.merge(&run);
        total.merge(&run);
        assert_eq!(total.declarations, 4);
        assert_eq!(total.conditionals(), 2);
        assert_eq!(total.total_statements(), 8);
        assert_eq!(total.max_depth, 3);
    }

    #[test]
    fn test_program_serializes() {
        let program = Generator::with_seed(6).generate(Some(50)).unwrap();
        let json = serde_json::to_string(&program).unwrap();
        assert!(json.contains("\"code\""));
        assert!(json.contains("\"seed\":6"));
    }
}
