/// Builtin numeric functions.
///
/// The `Math`-style functions (`sin`, `hypot`, `imul`, ...) together with
/// `lerp` and `toHm`.
pub mod builtin;

/// Builtin tensor functions.
///
/// Constructors (`T`, `I`, `toVec`) and the helpers `len` and `dot`.
pub mod tensor;

/// The output builtins `print`, `graph` and `plot`.
///
/// They do not render anything; they append records for a renderer to
/// consume after the run.
pub mod output;

/// The builtin table and function call evaluation.
pub mod core;
