//! Bytecode for the stack evaluator.

use crate::functions::{BinaryOp, UnaryOp};

/// One step of a compiled program.
///
/// Operands are taken from the top of the stack and the result is pushed
/// back. Arithmetic goes through [`UnaryOp::apply`] and [`BinaryOp::apply`],
/// the same functions the interpreter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Instruction {
    /// Push `constants[i]`
    LoadConst(u32),
    /// Push `params[i]`
    LoadParam(u32),
    /// Replace the top of the stack with `op(top)`
    Unary(UnaryOp),
    /// Pop `b`, replace `a` with `op(a, b)`
    Binary(BinaryOp),
    /// Copy the top of the stack into cache slot `i` without popping
    StoreCached(u32),
    /// Push cache slot `i`
    LoadCached(u32),
}

impl Instruction {
    /// Net change of the stack depth
    #[cfg(test)]
    pub(crate) const fn stack_effect(self) -> isize {
        match self {
            Instruction::LoadConst(_) | Instruction::LoadParam(_) | Instruction::LoadCached(_) => 1,
            Instruction::Unary(_) | Instruction::StoreCached(_) => 0,
            Instruction::Binary(_) => -1,
        }
    }
}
