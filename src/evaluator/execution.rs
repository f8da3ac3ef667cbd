//! Stack machine for compiled programs.
//!
//! Programs whose stack and cache fit the inline buffers run without heap
//! allocation. The compiler guarantees every pop is preceded by a push;
//! should that ever fail the result is `NaN` rather than a panic.

use super::compiler::Program;
use super::instruction::Instruction;
use smallvec::SmallVec;

/// Inline stack capacity; deeper programs spill to the heap
pub(crate) const INLINE_STACK_SIZE: usize = 32;

const INLINE_CACHE_SIZE: usize = 16;

pub(crate) type Stack = SmallVec<[f64; INLINE_STACK_SIZE]>;

impl Program {
    /// Run the program and return the final stack, bottom first.
    ///
    /// `params` must hold one value per parameter slot.
    pub(crate) fn execute(&self, params: &[f64]) -> Stack {
        let mut stack = Stack::with_capacity(self.stack_size);
        let mut cache: SmallVec<[f64; INLINE_CACHE_SIZE]> = SmallVec::from_elem(0.0, self.cache_size);

        for instruction in &self.instructions {
            match *instruction {
                Instruction::LoadConst(c) => {
                    stack.push(self.constants.get(c as usize).copied().unwrap_or(f64::NAN));
                }
                Instruction::LoadParam(p) => {
                    stack.push(params.get(p as usize).copied().unwrap_or(f64::NAN));
                }
                Instruction::Unary(op) => {
                    if let Some(top) = stack.last_mut() {
                        *top = op.apply(*top);
                    }
                }
                Instruction::Binary(op) => {
                    let b = stack.pop().unwrap_or(f64::NAN);
                    match stack.last_mut() {
                        Some(a) => *a = op.apply(*a, b),
                        None => stack.push(f64::NAN),
                    }
                }
                Instruction::StoreCached(slot) => {
                    if let (Some(&top), Some(entry)) = (stack.last(), cache.get_mut(slot as usize)) {
                        *entry = top;
                    }
                }
                Instruction::LoadCached(slot) => {
                    stack.push(cache.get(slot as usize).copied().unwrap_or(f64::NAN));
                }
            }
        }
        debug_assert!(stack.len() <= self.stack_size.max(1));
        stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{BinaryOp, UnaryOp};

    #[test]
    fn test_execute_by_hand() {
        // sin(p0) * 2 + sin(p0)
        let program = Program {
            instructions: vec![
                Instruction::LoadParam(0),
                Instruction::Unary(UnaryOp::Sin),
                Instruction::StoreCached(0),
                Instruction::LoadConst(0),
                Instruction::Binary(BinaryOp::Mul),
                Instruction::LoadCached(0),
                Instruction::Binary(BinaryOp::Add),
            ],
            constants: vec![2.0],
            stack_size: 2,
            cache_size: 1,
        };
        let stack = program.execute(&[0.5]);
        assert_eq!(stack.as_slice(), &[0.5_f64.sin() * 2.0 + 0.5_f64.sin()]);
    }

    #[test]
    fn test_deep_stack_spills() {
        let n = INLINE_STACK_SIZE + 8;
        let mut instructions = vec![Instruction::LoadConst(0); n];
        instructions.extend(std::iter::repeat_n(Instruction::Binary(BinaryOp::Add), n - 1));
        let program = Program {
            instructions,
            constants: vec![1.5],
            stack_size: n,
            cache_size: 0,
        };
        assert_eq!(program.execute(&[]).as_slice(), &[1.5 * n as f64]);
    }
}
