// ABOUTME: Recursive descent parser for dice expressions.
// ABOUTME: Converts token streams into an AST with standard arithmetic precedence.

use crate::ast::{Expr, Op, RollSpec, Sign};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};
use crate::limits::Limits;

/// Parser for dice expressions.
///
/// ```text
/// expr   := term ( ('+' | '-') term )*
/// term   := factor ( ('*' | '/') factor )*
/// factor := ('+' | '-') factor | INTEGER | ROLL | '(' expr ')'
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
    max_depth: usize,
    operators: usize,
    max_operators: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str) -> Result<Self> {
        Self::with_limits(input, &Limits::default())
    }

    /// Create a parser that enforces the nesting depth in `limits`.
    pub fn with_limits(input: &'a str, limits: &Limits) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            depth: 0,
            max_depth: limits.max_depth,
            operators: 0,
            max_operators: limits.max_operators,
        })
    }

    /// Parse the input into an expression.
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.expression()?;
        if self.current != Token::Eof {
            return Err(Error::Expected {
                expected: "operator or end of input".to_string(),
                found: describe(&self.current),
            });
        }
        Ok(expr)
    }

    fn advance(&mut self) -> Result<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current == expected {
            self.advance()?;
            Ok(())
        } else {
            Err(Error::Expected {
                expected: describe(&expected),
                found: describe(&self.current),
            })
        }
    }

    /// Run `f` one nesting level deeper, failing past the configured depth.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(Error::NestingLimit(self.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Count one binary operator against the expression's budget.
    ///
    /// Operator chains fold into a left-deep tree, so this also bounds how far
    /// evaluation and drop recurse.
    fn count_operator(&mut self) -> Result<()> {
        if self.operators >= self.max_operators {
            return Err(Error::OperatorLimit(self.max_operators));
        }
        self.operators += 1;
        Ok(())
    }

    /// Parse an expression (handles + and -).
    fn expression(&mut self) -> Result<Expr> {
        let mut left = self.term()?;

        loop {
            let op = match self.current {
                Token::Plus => Op::Add,
                Token::Minus => Op::Sub,
                _ => break,
            };
            self.count_operator()?;
            self.advance()?;
            let right = self.term()?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse a term (handles * and /).
    fn term(&mut self) -> Result<Expr> {
        let mut left = self.factor()?;

        loop {
            let op = match self.current {
                Token::Star => Op::Mul,
                Token::Slash => Op::Div,
                _ => break,
            };
            self.count_operator()?;
            self.advance()?;
            let right = self.factor()?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse a factor (signed factor, number, roll, or parenthesized expression).
    fn factor(&mut self) -> Result<Expr> {
        match &self.current {
            Token::Plus | Token::Minus => {
                let op = if self.current == Token::Plus {
                    Sign::Plus
                } else {
                    Sign::Minus
                };
                self.advance()?;
                let expr = self.nested(|p| p.factor())?;
                Ok(Expr::Unary {
                    op,
                    expr: Box::new(expr),
                })
            }
            Token::Integer(n) => {
                let n = *n;
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::Roll(notation) => {
                let spec = RollSpec::parse(notation)?;
                self.advance()?;
                Ok(Expr::Roll(spec))
            }
            Token::LParen => {
                self.advance()?;
                let expr = self.nested(|p| p.expression())?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Eof => Err(Error::UnexpectedEof),
            _ => Err(Error::Expected {
                expected: "number, dice roll, or '('".to_string(),
                found: describe(&self.current),
            }),
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Integer(n) => format!("number {}", n),
        Token::Roll(notation) => format!("roll '{}'", notation),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}

/// Parse a dice expression string into an expression.
pub fn parse(input: &str) -> Result<Expr> {
    Parser::new(input)?.parse()
}

/// Parse a dice expression string, enforcing `limits`.
pub fn parse_with_limits(input: &str, limits: &Limits) -> Result<Expr> {
    Parser::with_limits(input, limits)?.parse()
}
