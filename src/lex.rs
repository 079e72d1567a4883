use std::{fmt::Display, iter::Peekable};

use crate::CalcNumber;

/// The statement separator, also used to resynchronize after an error.
pub const PRINT: char = ';';

/// The character that ends a session.
pub const QUIT: char = 'q';

/// Turns a stream of characters into tokens, one at a time.
///
/// Reading blocks for as long as the underlying iterator does, so an interactive source only has to
/// produce more characters when the grammar actually asks for another token.
#[derive(Debug, Clone)]
pub struct Lexer<I: Iterator<Item = char>> {
    source: Peekable<I>,
    // INVARIANT: holds at most one token, see `putback`
    buffer: Option<Token>,
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(source: impl IntoIterator<Item = char, IntoIter = I>) -> Self {
        Lexer {
            source: source.into_iter().peekable(),
            buffer: None,
        }
    }

    /// Returns the pushed back token if there is one, otherwise reads the next token from the source.
    pub fn get(&mut self) -> Result<Token, LexError> {
        if let Some(token) = self.buffer.take() {
            return Ok(token);
        }

        while self.source.next_if(|c| c.is_whitespace()).is_some() {}

        let token = match self.source.next() {
            Some(c) => self.process_char(c)?,
            None => Token::EndOfInput,
        };
        tracing::trace!(%token, "lexed");

        Ok(token)
    }

    /// Stores `token` so that it is delivered again by the next `get`.
    pub fn putback(&mut self, token: Token) -> Result<(), PushbackOverflow> {
        if self.buffer.is_some() {
            return Err(PushbackOverflow(token));
        }
        self.buffer = Some(token);
        Ok(())
    }

    /// Discards input up to and including the next `c`.
    ///
    /// A pending token is dropped unless it is `c` itself, in which case nothing else is consumed.
    /// The remaining input is scanned as raw characters so that garbage between here and `c` can't
    /// raise another lexing error.
    pub fn ignore(&mut self, c: char) {
        if let Some(token) = self.buffer.take() {
            if token.symbol() == Some(c) {
                return;
            }
        }

        for next in self.source.by_ref() {
            if next == c {
                return;
            }
        }
    }

    /// Whether a token is waiting in the pushback slot.
    pub fn has_pending(&self) -> bool {
        self.buffer.is_some()
    }

    fn process_char(&mut self, c: char) -> Result<Token, LexError> {
        match c {
            '(' => Ok(Token::LeftParen),
            ')' => Ok(Token::RightParen),
            '+' => Ok(Token::Plus),
            '-' => Ok(Token::Minus),
            '*' => Ok(Token::Star),
            '/' => Ok(Token::Slash),
            '%' => Ok(Token::Percent),
            '=' => Ok(Token::Equal),
            PRINT => Ok(Token::Print),
            // Checked before names, so no name can start with it
            QUIT => Ok(Token::Quit),

            c if c == '.' || c.is_ascii_digit() => self.lex_number(c),

            c if c.is_ascii_alphabetic() => {
                let mut identifier = String::from(c);
                while let Some(c) = self.source.next_if(Self::is_valid_for_identifier) {
                    identifier.push(c);
                }
                Ok(Token::Name(identifier))
            }

            _ => Err(LexError::BadToken(c)),
        }
    }

    /// Reads `digits [. digits] [(e|E) [+|-] digits]`, requiring at least one mantissa digit.
    fn lex_number(&mut self, first: char) -> Result<Token, LexError> {
        let mut text = String::from(first);

        let mut digits = usize::from(first.is_ascii_digit()) + self.consume_digits(&mut text);
        if first != '.' {
            if let Some(dot) = self.source.next_if_eq(&'.') {
                text.push(dot);
                digits += self.consume_digits(&mut text);
            }
        }

        if digits == 0 {
            return Err(LexError::MalformedNumber(text));
        }

        if let Some(e) = self.source.next_if(|c| matches!(c, 'e' | 'E')) {
            text.push(e);
            if let Some(sign) = self.source.next_if(|c| matches!(c, '+' | '-')) {
                text.push(sign);
            }
            if self.consume_digits(&mut text) == 0 {
                return Err(LexError::MalformedNumber(text));
            }
        }

        match text.parse::<CalcNumber>() {
            Ok(number) => Ok(Token::Number(number)),
            Err(_) => Err(LexError::MalformedNumber(text)),
        }
    }

    fn consume_digits(&mut self, text: &mut String) -> usize {
        let mut count = 0;
        while let Some(digit) = self.source.next_if(char::is_ascii_digit) {
            text.push(digit);
            count += 1;
        }
        count
    }

    fn is_valid_for_identifier(c: &char) -> bool {
        c.is_ascii_alphanumeric() || *c == '_'
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // One character
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    /// Ends a statement.
    Print,
    Quit,
    // Literals
    Number(CalcNumber),
    Name(String),
    /// The character source has nothing left to give.
    EndOfInput,
}

impl Token {
    /// The character this token was lexed from, if it is a single character symbol.
    pub fn symbol(&self) -> Option<char> {
        match self {
            Token::LeftParen => Some('('),
            Token::RightParen => Some(')'),
            Token::Plus => Some('+'),
            Token::Minus => Some('-'),
            Token::Star => Some('*'),
            Token::Slash => Some('/'),
            Token::Percent => Some('%'),
            Token::Equal => Some('='),
            Token::Print => Some(PRINT),
            Token::Quit => Some(QUIT),
            Token::Number(_) | Token::Name(_) | Token::EndOfInput => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self, self.symbol()) {
            (_, Some(c)) => write!(f, "{}", c),
            (Token::Number(n), None) => write!(f, "{}", n),
            (Token::Name(identifier), None) => write!(f, "{}", identifier),
            (_, None) => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Bad token \"{0}\".")]
    BadToken(char),

    #[error("Malformed number literal \"{0}\".")]
    MalformedNumber(String),
}

/// A token was pushed back while another one was still pending.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot push back \"{0}\", the pushback buffer is already full.")]
pub struct PushbackOverflow(pub Token);
