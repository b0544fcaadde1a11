/*!
# Language Module

Lexical analysis for the BASIC dialect: the token vocabulary, the
stateful tokenizer with one-token lookahead, and the error type shared
by every component.

*/

#[macro_use]
mod error;
mod lex;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::Lexer;
pub use token::Operator;
pub use token::Token;
pub use token::Word;

/// Value type for everything the interpreter computes: variables,
/// literals, peek/poke addresses, line numbers. Arithmetic on it wraps.
pub type Int = i16;

/// A line number, or `None` for a statement executed in immediate mode.
pub type LineNumber = Option<Int>;

/// Byte range of a token within its source line, for error reporting.
pub type Column = std::ops::Range<usize>;

/// A numeric literal longer than this many digits is a tokenizer error.
pub const MAX_NUMBER_LEN: usize = 6;

/// String literal payloads are truncated to this many bytes.
pub const MAX_STRING_LEN: usize = 40;
