//! Expression compiler for the bytecode evaluator.
//!
//! A single pass over the tree emits [`Instruction`]s while tracking the
//! stack depth, a constant pool deduplicated by bit pattern and a cache of
//! repeated expensive subtrees (CSE). No arithmetic rewriting happens here:
//! the program computes exactly what [`Expr::eval`] computes.

use super::instruction::Instruction;
use crate::error::ExprError;
use crate::functions::{BinaryOp, UnaryOp};
use crate::traits::is_integer;
use crate::{Expr, ExprKind};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Deepest stack a compiled program may use
pub const MAX_STACK_DEPTH: usize = 1024;

/// Compiled program and its metadata
#[derive(Debug, Clone)]
pub(crate) struct Program {
    pub instructions: Vec<Instruction>,
    pub constants: Vec<f64>,
    pub stack_size: usize,
    pub cache_size: usize,
}

pub(crate) struct Compiler<'a> {
    instructions: Vec<Instruction>,
    params: &'a [String],
    current_stack: usize,
    max_stack: usize,
    /// Structurally equal subtrees share a cache slot
    cse_cache: FxHashMap<Expr, u32>,
    cache_size: u32,
    constants: Vec<f64>,
    const_map: FxHashMap<u64, u32>,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(params: &'a [String]) -> Self {
        Self {
            instructions: Vec::with_capacity(64),
            params,
            current_stack: 0,
            max_stack: 0,
            cse_cache: FxHashMap::default(),
            cache_size: 0,
            constants: Vec::new(),
            const_map: FxHashMap::default(),
        }
    }

    /// Pool index of `value`, shared by constants with the same bits
    fn add_const(&mut self, value: f64) -> u32 {
        match self.const_map.entry(value.to_bits()) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => {
                let idx = index(self.constants.len());
                self.constants.push(value);
                v.insert(idx);
                idx
            }
        }
    }

    fn push(&mut self) -> Result<(), ExprError> {
        self.current_stack += 1;
        if self.current_stack > MAX_STACK_DEPTH {
            return Err(ExprError::StackOverflow {
                depth: self.current_stack,
                limit: MAX_STACK_DEPTH,
            });
        }
        self.max_stack = self.max_stack.max(self.current_stack);
        Ok(())
    }

    fn pop(&mut self) {
        self.current_stack = self.current_stack.saturating_sub(1);
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub(crate) fn into_program(self) -> Program {
        Program {
            instructions: self.instructions,
            constants: self.constants,
            stack_size: self.max_stack,
            cache_size: self.cache_size as usize,
        }
    }

    /// Whether a repeated occurrence is worth a cache slot.
    ///
    /// Transcendental calls, logarithms and non-integer powers are cached;
    /// cheap arithmetic is recomputed.
    fn is_expensive(expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::Unary { op, .. } => !matches!(
                op,
                UnaryOp::Negate | UnaryOp::Abs | UnaryOp::Sign | UnaryOp::Square | UnaryOp::Cube
            ),
            ExprKind::Binary { op, right, .. } => match op {
                BinaryOp::Log => true,
                BinaryOp::Pow => right.as_number(true).is_none_or(|n| !is_integer(n)),
                _ => false,
            },
            _ => false,
        }
    }

    /// Emit code that leaves the value of a scalar `expr` on the stack
    pub(crate) fn compile_expr(&mut self, expr: &Expr) -> Result<(), ExprError> {
        match &expr.kind {
            ExprKind::Constant(value) | ExprKind::NamedConstant { value, .. } => {
                let idx = self.add_const(*value);
                self.emit(Instruction::LoadConst(idx));
                return self.push();
            }
            ExprKind::Variable(name) => {
                let Some(position) = self.params.iter().position(|p| p == name.as_ref()) else {
                    return Err(ExprError::UnresolvedSymbol(name.to_string()));
                };
                self.emit(Instruction::LoadParam(index(position)));
                return self.push();
            }
            ExprKind::Array(_) => {
                return Err(ExprError::dimension(format!(
                    "array '{expr}' used as a scalar operand"
                )));
            }
            ExprKind::Assign { value, .. } => return self.compile_expr(value),
            _ => {}
        }

        let cache_this = Self::is_expensive(expr);
        if cache_this && let Some(&slot) = self.cse_cache.get(expr) {
            self.emit(Instruction::LoadCached(slot));
            return self.push();
        }

        match &expr.kind {
            ExprKind::Unary { op, arg } => {
                self.compile_expr(arg)?;
                self.emit(Instruction::Unary(*op));
            }
            ExprKind::Binary { op, left, right } => {
                self.compile_expr(left)?;
                self.compile_expr(right)?;
                self.emit(Instruction::Binary(*op));
                self.pop();
            }
            _ => {}
        }

        if cache_this {
            let slot = self.cache_size;
            self.cache_size += 1;
            self.emit(Instruction::StoreCached(slot));
            self.cse_cache.insert(expr.clone(), slot);
        }
        Ok(())
    }
}

/// Pool and slot indices are bounded by `MAX_STACK_DEPTH` and the tree size
fn index(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
