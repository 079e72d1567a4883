use crate::{
    env::Environment,
    lex::{LexError, Lexer, PushbackOverflow, Token},
    CalcNumber,
};

/// Evaluates the expression at the front of `lexer`.
///
/// Stops in front of the first token that can't continue the expression (usually the statement
/// separator), which is left pushed back. Assignments take effect as soon as they are evaluated and are
/// kept even when a later part of the statement fails.
pub fn evaluate_one_statement<I: Iterator<Item = char>>(
    lexer: &mut Lexer<I>,
    environment: &mut Environment,
) -> Evaluation {
    Evaluator {
        lexer,
        environment,
        depth: 0,
    }
    .expression()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("')' expected")]
    ExpectedRightParen,

    #[error("Primary expected")]
    ExpectedPrimary,

    #[error("Expression nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Divide by zero")]
    DivideByZero,

    #[error("Modulus requires integer operands")]
    NonIntegralModulus,

    #[error("Variable \"{0}\" is not defined.")]
    UndefinedVariable(String),

    #[error(transparent)]
    PushbackOverflow(#[from] PushbackOverflow),
}

impl EvalError {
    /// Whether the session can carry on with the next statement after this error.
    /// Only a broken pushback invariant is fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EvalError::PushbackOverflow(_))
    }
}

pub type Evaluation = Result<CalcNumber, EvalError>;

/// The deepest nesting of parentheses and assignments a statement may use.
pub const MAX_DEPTH: usize = 256;

/// The grammar, one method per production:
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := primary (('*' | '/' | '%') primary)*
/// primary    := ('-' | '+')* ('(' expression ')' | number | name '=' expression | name)
/// ```
struct Evaluator<'s, I: Iterator<Item = char>> {
    lexer: &'s mut Lexer<I>,
    environment: &'s mut Environment,
    /// How many parenthesized or assigned subexpressions enclose the current one.
    depth: usize,
}

impl<'s, I: Iterator<Item = char>> Evaluator<'s, I> {
    fn expression(&mut self) -> Evaluation {
        let mut left = self.term()?;

        loop {
            match self.lexer.get()? {
                Token::Plus => left += self.term()?,
                Token::Minus => left -= self.term()?,
                token => {
                    self.lexer.putback(token)?;
                    return Ok(left);
                }
            }
        }
    }

    fn term(&mut self) -> Evaluation {
        let mut left = self.primary()?;

        loop {
            match self.lexer.get()? {
                Token::Star => left *= self.primary()?,
                Token::Slash => {
                    let divisor = self.primary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivideByZero);
                    }
                    left /= divisor;
                }
                Token::Percent => {
                    let divisor = self.primary()?;
                    left = modulus(left, divisor)?;
                }
                token => {
                    self.lexer.putback(token)?;
                    return Ok(left);
                }
            }
        }
    }

    fn primary(&mut self) -> Evaluation {
        // Signs are folded in a loop so that long chains of them don't recurse
        let mut negate = false;
        let token = loop {
            match self.lexer.get()? {
                Token::Minus => negate = !negate,
                Token::Plus => {}
                token => break token,
            }
        };

        let value = match token {
            Token::LeftParen => {
                let value = self.nested()?;
                match self.lexer.get()? {
                    Token::RightParen => value,
                    token => return self.reject(token, SyntaxError::ExpectedRightParen),
                }
            }
            Token::Number(value) => value,
            Token::Name(identifier) => match self.lexer.get()? {
                Token::Equal => {
                    let value = self.nested()?;
                    self.environment.assign(identifier, value);
                    value
                }
                token => {
                    self.lexer.putback(token)?;
                    self.environment
                        .lookup(&identifier)
                        .ok_or(EvalError::UndefinedVariable(identifier))?
                }
            },
            token => return self.reject(token, SyntaxError::ExpectedPrimary),
        };

        Ok(if negate { -value } else { value })
    }

    /// Evaluates an expression one nesting level further down, failing once `MAX_DEPTH` is reached
    /// instead of running out of stack.
    fn nested(&mut self) -> Evaluation {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::TooDeep.into());
        }

        self.depth += 1;
        let value = self.expression();
        self.depth -= 1;
        value
    }

    /// Fails with `error`, handing the offending token back so that recovery can see it.
    /// Without this a rejected separator would be lost and recovery would swallow the next statement.
    fn reject(&mut self, token: Token, error: SyntaxError) -> Evaluation {
        self.lexer.putback(token)?;
        Err(error.into())
    }
}

/// Remainder of two integral values, truncating towards zero like the `%` of the integer types.
/// The `f64` remainder is exact, so there is no range limit on the operands.
fn modulus(left: CalcNumber, right: CalcNumber) -> Evaluation {
    if right == 0.0 {
        return Err(EvalError::DivideByZero);
    }

    if left.fract() != 0.0 || right.fract() != 0.0 {
        return Err(EvalError::NonIntegralModulus);
    }

    Ok(left % right)
}
