//! Text-in, text-out pipelines over the core term language
//!
//! ```text
//! text -> tokens -> Expression -> (reduce) -> Expression -> de Bruijn -> bits
//! ```

use tracing::debug;

use crate::blc::{self, Term};
use crate::bruijn::{to_bruijn, FreeVariables};
use crate::error::Result;
use crate::interpreter::{interpret, Reduction, DEFAULT_MAX_STEPS};
use crate::parser::parse_text;

/// Pipeline settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    max_steps: usize,
    free_variables: FreeVariables,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Step bound of 100, closed terms only
    pub fn new() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            free_variables: FreeVariables::Reject,
        }
    }

    /// Set the reduction step bound
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the policy for free variables in de Bruijn conversion
    pub fn free_variables(mut self, policy: FreeVariables) -> Self {
        self.free_variables = policy;
        self
    }

    /// Parse and reduce, keeping the step count
    pub fn reduce(&self, program: &str) -> Result<Reduction> {
        let expr = parse_text(program)?;
        debug!(size = expr.size(), max_steps = self.max_steps, "reducing");
        interpret(expr, self.max_steps)
    }

    /// Reduced term in canonical text form. Stopping at the step bound is
    /// not reported here; use [`Evaluator::reduce`] to tell.
    pub fn evaluate(&self, program: &str) -> Result<String> {
        Ok(self.reduce(program)?.term.to_string())
    }

    /// De Bruijn form of the term as written (no reduction)
    pub fn to_bruijn(&self, program: &str) -> Result<Term> {
        let expr = parse_text(program)?;
        to_bruijn(&expr, self.free_variables)
    }

    /// De Bruijn text rendering, e.g. `λ.λ.2`
    pub fn bruijn(&self, program: &str) -> Result<String> {
        Ok(self.to_bruijn(program)?.to_string())
    }

    /// BLC bit string of the term as written (no reduction)
    pub fn bruijn_binary(&self, program: &str) -> Result<String> {
        blc::to_binary(&self.to_bruijn(program)?)
    }
}
