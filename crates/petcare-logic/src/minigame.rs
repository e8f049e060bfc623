//! Arithmetic quiz mini-game.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Operator::Add, Operator::Subtract, Operator::Multiply];

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
        }
    }

    pub fn apply(self, a: i32, b: i32) -> i32 {
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
        }
    }
}

/// `a op b` with both operands in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathQuestion {
    pub a: i32,
    pub b: i32,
    pub op: Operator,
}

impl MathQuestion {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let a = rng.gen_range(1..=10);
        let b = rng.gen_range(1..=10);
        let op = Operator::ALL[rng.gen_range(0..Operator::ALL.len())];
        Self { a, b, op }
    }

    pub fn answer(&self) -> i32 {
        self.op.apply(self.a, self.b)
    }

    pub fn check(&self, answer: i32) -> bool {
        answer == self.answer()
    }
}

impl std::fmt::Display for MathQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "What is {} {} {}?", self.a, self.op.symbol(), self.b)
    }
}
