use crate::{
    env::{Environment, UnboundPolicy},
    eval::{self, EvalError},
    lex::{Lexer, Token, PRINT},
    CalcNumber,
};

/// Settings for a single session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub unbound: UnboundPolicy,
    /// Shown before reading each line of interactive input.
    pub prompt: String,
    /// Printed in front of every result.
    pub result_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            unbound: UnboundPolicy::default(),
            prompt: "> ".to_string(),
            result_prefix: "= ".to_string(),
        }
    }
}

/// What a single turn of the session loop produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A statement was evaluated.
    Value(CalcNumber),

    /// A statement failed and the input was skipped up to the next separator.
    Failed(EvalError),

    /// The quit marker was read.
    Quit,

    /// The input ran out.
    EndOfInput,
}

impl Step {
    /// Whether the session is over after this step.
    pub fn is_final(&self) -> bool {
        matches!(self, Step::Quit | Step::EndOfInput)
    }
}

/// A lexer and the variables it evaluates against.
///
/// Sessions share nothing, so any number of them can run side by side.
#[derive(Debug, Clone)]
pub struct Session<I: Iterator<Item = char>> {
    lexer: Lexer<I>,
    environment: Environment,
    config: SessionConfig,
}

impl<I: Iterator<Item = char>> Session<I> {
    pub fn new(source: impl IntoIterator<Item = char, IntoIter = I>) -> Self {
        Self::with_config(source, SessionConfig::default())
    }

    pub fn with_config(
        source: impl IntoIterator<Item = char, IntoIter = I>,
        config: SessionConfig,
    ) -> Self {
        Self {
            lexer: Lexer::new(source),
            environment: Environment::with_policy(config.unbound),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn lexer(&self) -> &Lexer<I> {
        &self.lexer
    }

    /// Evaluates the next statement without any separator handling or recovery.
    pub fn evaluate_one_statement(&mut self) -> Result<CalcNumber, EvalError> {
        eval::evaluate_one_statement(&mut self.lexer, &mut self.environment)
    }

    /// Runs one turn of the loop.
    ///
    /// Recoverable errors are returned as `Step::Failed` after the rest of the failed statement has been
    /// discarded. Only fatal errors are returned as `Err`.
    pub fn step(&mut self) -> Result<Step, EvalError> {
        match self.statement() {
            Ok(step) => Ok(step),
            Err(error) if error.is_recoverable() => {
                tracing::warn!(%error, "skipping to the next statement");
                self.lexer.ignore(PRINT);
                Ok(Step::Failed(error))
            }
            Err(error) => {
                tracing::error!(%error, "session aborted");
                Err(error)
            }
        }
    }

    /// Steps until the quit marker or the end of the input, handing every step to `on_step`.
    pub fn run(&mut self, mut on_step: impl FnMut(&Step)) -> Result<(), EvalError> {
        loop {
            let step = self.step()?;
            on_step(&step);
            if step.is_final() {
                return Ok(());
            }
        }
    }

    fn statement(&mut self) -> Result<Step, EvalError> {
        let mut token = self.lexer.get()?;
        while token == Token::Print {
            token = self.lexer.get()?;
        }

        match token {
            Token::Quit => Ok(Step::Quit),
            Token::EndOfInput => Ok(Step::EndOfInput),
            token => {
                self.lexer.putback(token)?;
                self.evaluate_one_statement().map(Step::Value)
            }
        }
    }
}
