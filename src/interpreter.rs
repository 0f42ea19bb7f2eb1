use std::cell::RefCell;
use std::io::{self, Write};
use std::mem;
use std::rc::Rc;

use log::{debug, info};
use thiserror::Error;

use crate::ast::{Expr, Stmt};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::token::{Token, TokenType};
use crate::value::Value;

#[derive(Error, Debug)]
pub enum InterpretError {
    /// A language-level failure; the message goes to the output sink.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// The output sink itself failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenient alias for interpreter results.
pub type IResult<T> = Result<T, InterpretError>;

/// Tree‑walking evaluator.  Owns the global frame, which outlives every
/// program it runs, so bindings carry over between calls to
/// [`Interpreter::interpret`].
#[derive(Debug)]
pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        Self {
            environment: Rc::clone(&globals),
            globals,
        }
    }

    /// The session-wide global frame.
    pub fn globals(&self) -> Rc<RefCell<Environment>> {
        Rc::clone(&self.globals)
    }

    /// Executes statements in order, stopping at the first error.
    pub fn interpret(&mut self, statements: &[Stmt], out: &mut dyn Write) -> IResult<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            self.execute(stmt, out)?;
        }

        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt, out: &mut dyn Write) -> IResult<()> {
        match stmt {
            Stmt::Expression(expr) => {
                debug!("Evaluating expression statement");
                self.evaluate(expr)?;
                Ok(())
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(out, "{}", value)?;
                debug!("Printed value: {}", value);
                Ok(())
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(())
            }

            Stmt::Assign { name, value } => {
                self.assign(name, value)?;
                Ok(())
            }

            Stmt::Block(statements) => {
                let frame = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, frame, out)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    debug!("Condition is truthy; executing then branch");
                    self.execute(then_branch, out)
                } else {
                    debug!("Condition is falsy; executing else branch");
                    self.execute(else_branch, out)
                }
            }

            Stmt::NoOp => Ok(()),
        }
    }

    /// Runs `statements` in `frame`, then reinstates the previous frame
    /// whether or not a statement failed.
    fn execute_block(
        &mut self,
        statements: &[Stmt],
        frame: Environment,
        out: &mut dyn Write,
    ) -> IResult<()> {
        debug!("Entering block with {} statements", statements.len());

        let previous = mem::replace(&mut self.environment, Rc::new(RefCell::new(frame)));

        let result = statements
            .iter()
            .try_for_each(|stmt| self.execute(stmt, out));

        self.environment = previous;

        debug!("Exited block");
        result
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> IResult<Value> {
        let value = match expr {
            Expr::Literal(value) => value.clone(),

            Expr::Grouping(inner) => self.evaluate(inner)?,

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;

                match operator.token_type {
                    TokenType::BANG => right.invert(),
                    _ => right.negate()?,
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(left, operator, right)?
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                let decided = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if decided {
                    left
                } else {
                    self.evaluate(right)?
                }
            }

            Expr::Variable(name) => self.environment.borrow().get(&name.lexeme)?,

            Expr::Assign { name, value } => self.assign(name, value)?,
        };

        debug!("Expression evaluated to: {}", value);
        Ok(value)
    }

    /// Shared by the assignment expression and statement.
    fn assign(&mut self, name: &Token, value: &Expr) -> IResult<Value> {
        let value = self.evaluate(value)?;

        self.environment
            .borrow_mut()
            .assign(&name.lexeme, value.clone())?;

        debug!("Assigned value {} to '{}'", value, name.lexeme);
        Ok(value)
    }
}

fn binary(left: Value, operator: &Token, right: Value) -> Result<Value, RuntimeError> {
    let op: &str = &operator.lexeme;

    match operator.token_type {
        TokenType::PLUS => left.plus(right),
        TokenType::MINUS => left.minus(right),
        TokenType::STAR => left.times(right),
        TokenType::SLASH => left.divide(right),
        TokenType::GREATER => left.compare(op, &right, |a, b| a > b),
        TokenType::GREATER_EQUAL => left.compare(op, &right, |a, b| a >= b),
        TokenType::LESS => left.compare(op, &right, |a, b| a < b),
        TokenType::LESS_EQUAL => left.compare(op, &right, |a, b| a <= b),
        TokenType::BANG_EQUAL => Ok(Value::Bool(!left.is_equal(&right))),
        _ => Ok(Value::Bool(left.is_equal(&right))),
    }
}
