//! # Micro BASIC
//!
//! A line-numbered BASIC for machines with almost no memory.
//!
//! Programs are entered as numbered text lines, kept in a fixed-capacity
//! line store, and executed directly from their stored text on every
//! visit. There is no AST and no bytecode; the whole interpreter is a
//! tokenizer with one-token lookahead, a recursive-descent expression
//! evaluator, and a statement dispatcher driving a program counter over
//! the line store.
//!
//! Begin by opening a terminal and running the executable:
//! ```text
//! MICRO BASIC 0.1.0
//! 2560 BYTES FREE
//! READY.
//! ```
//!
//! All values are 16-bit signed integers and arithmetic wraps around,
//! exactly as it did on the hardware this dialect grew up on.

pub mod lang;
pub mod mach;
pub mod term;
