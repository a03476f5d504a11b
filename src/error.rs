/// Parsing errors.
///
/// The parser reports exactly one of these: the first position of the source
/// it could not read, with a short excerpt of what follows.
pub mod parse_error;
/// Runtime errors.
///
/// Contains every error that can be raised during evaluation. Runtime errors
/// are also values of the language and carry the span of the node that
/// produced them.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
