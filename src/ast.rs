use std::fmt;

use crate::error::ParseError;

/// A half-open byte range `[start, end)` into the source text.
///
/// Every node of the tree carries one. The parser guarantees that a parent's
/// span covers the spans of all of its children, which is what lets an editor
/// highlight a node by slicing the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end:   usize,
}

impl Span {
    /// Creates a span from two byte offsets.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the smallest span covering both `self` and `other`.
    ///
    /// # Example
    /// ```
    /// use tensorpad::ast::Span;
    ///
    /// let joined = Span::new(4, 6).to(Span::new(0, 2));
    /// assert_eq!(joined, Span::new(0, 6));
    /// ```
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self { start: self.start.min(other.start),
               end:   self.end.max(other.end), }
    }

    /// Returns `true` when `other` lies entirely inside `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes at all.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Slices `source` with this span. Out-of-range spans produce `""`.
    #[must_use]
    pub fn text(self, source: &str) -> &str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// The language's builtin constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    /// `PI`
    Pi,
    /// `E`
    E,
    /// `PHI`, the golden ratio.
    Phi,
}

impl Constant {
    /// Maps an identifier to a builtin constant, if it names one.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PI" => Some(Self::Pi),
            "E" => Some(Self::E),
            "PHI" => Some(Self::Phi),
            _ => None,
        }
    }

    /// The numeric value of the constant.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
            Self::Phi => 1.618_033_988_749,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pi => "PI",
            Self::E => "E",
            Self::Phi => "PHI",
        };
        write!(f, "{name}")
    }
}

/// A positioned node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What the node is, together with its children.
    pub kind: NodeKind,
    /// Where the node came from in the source.
    pub span: Span,
}

/// The different syntactic constructs of the language.
///
/// Operator sequences of one precedence level are stored flat in a
/// [`NodeKind::Chain`] and evaluated left to right. A chain with a single
/// operand is never built; the parser returns the operand itself.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A numeric literal, including clock literals such as `7:30pm`.
    Number(f64),
    /// A string literal with escapes already resolved.
    String(String),
    /// A bare identifier.
    Identifier(String),
    /// One of `PI`, `E`, `PHI`.
    BuiltinConstant(Constant),
    /// A prefix operator applied to an atom.
    Unary {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Node>,
    },
    /// `a op b op c ...` at a single precedence level.
    Chain {
        /// The leftmost operand.
        first: Box<Node>,
        /// Each following operator with its right operand.
        rest:  Vec<(BinaryOperator, Node)>,
    },
    /// `name(args...)`. Also used as the target of a function definition.
    FunctionCall {
        /// Name of the called function.
        name:      String,
        /// Span of the name alone.
        name_span: Span,
        /// Argument expressions.
        args:      Vec<Node>,
    },
    /// `target op value` for `:=`, `=`, `+=` and `-=`.
    Assignment {
        /// The lvalue: identifier, indexation or function signature.
        target: Box<Node>,
        /// Which assignment form was used.
        op:     AssignOperator,
        /// The right-hand side.
        value:  Box<Node>,
    },
    /// `condition ? if_true : if_false`
    Ternary {
        /// The condition, compared against `0.5`.
        condition: Box<Node>,
        /// Taken when the condition is at least `0.5`.
        if_true:   Box<Node>,
        /// Taken otherwise.
        if_false:  Box<Node>,
    },
    /// `[row, row, ...]`
    Tensor {
        /// The elements, each a number or an equally shaped tensor.
        rows: Vec<Node>,
    },
    /// `for init, ...; condition; step, ... { body }`
    ForLoop {
        /// Assignments evaluated once before the first iteration.
        initializers: Vec<Node>,
        /// Checked before every iteration.
        condition:    Box<Node>,
        /// Assignments evaluated after every iteration.
        steps:        Vec<Node>,
        /// The loop body, always a [`NodeKind::Block`].
        body:         Box<Node>,
    },
    /// `{ statement; statement ... }`
    Block {
        /// The statements, in source order.
        statements: Vec<Statement>,
    },
    /// `<item, item, ...>`
    List {
        /// The item expressions.
        items: Vec<Node>,
    },
    /// `expr[index][index]...`
    Indexation {
        /// The indexed expression.
        target:  Box<Node>,
        /// One selector per bracket pair.
        indexes: Vec<Node>,
    },
}

impl Node {
    /// Creates a node.
    #[must_use]
    pub const fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The node kind's name, as shown to highlighters and in debug output.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Number(_) => "Number",
            NodeKind::String(_) => "String",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::BuiltinConstant(_) => "BuiltinConstant",
            NodeKind::Unary { .. } => "UnaryExpr",
            NodeKind::Chain { .. } => "Chain",
            NodeKind::FunctionCall { .. } => "FunctionCall",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::Ternary { .. } => "Ternary",
            NodeKind::Tensor { .. } => "Tensor",
            NodeKind::ForLoop { .. } => "ForLoop",
            NodeKind::Block { .. } => "Block",
            NodeKind::List { .. } => "List",
            NodeKind::Indexation { .. } => "Indexation",
        }
    }

    /// The ordered names of this node's child fields.
    ///
    /// An empty slice marks a leaf, which a highlighter renders by copying the
    /// source slice verbatim.
    #[must_use]
    pub const fn child_keys(&self) -> &'static [&'static str] {
        match &self.kind {
            NodeKind::Number(_)
            | NodeKind::String(_)
            | NodeKind::Identifier(_)
            | NodeKind::BuiltinConstant(_) => &[],
            NodeKind::Unary { .. } => &["op", "expr"],
            NodeKind::Chain { .. } => &["termsAndOps"],
            NodeKind::FunctionCall { .. } => &["name", "args"],
            NodeKind::Assignment { .. } => &["lhs", "rhs"],
            NodeKind::Ternary { .. } => &["conditional", "ifTrue", "else"],
            NodeKind::Tensor { .. } => &["rows"],
            NodeKind::ForLoop { .. } => &["initializers", "loopCondition", "iterators", "loopBody"],
            NodeKind::Block { .. } => &["body"],
            NodeKind::List { .. } => &["items"],
            NodeKind::Indexation { .. } => &["expr", "indexes"],
        }
    }

    /// Whether the node has no child fields.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.child_keys().is_empty()
    }

    /// All direct child nodes in source order.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match &self.kind {
            NodeKind::Number(_)
            | NodeKind::String(_)
            | NodeKind::Identifier(_)
            | NodeKind::BuiltinConstant(_) => Vec::new(),
            NodeKind::Unary { operand, .. } => vec![&**operand],
            NodeKind::Chain { first, rest } => {
                std::iter::once(&**first).chain(rest.iter().map(|(_, node)| node))
                                         .collect()
            },
            NodeKind::FunctionCall { args, .. } => args.iter().collect(),
            NodeKind::Assignment { target, value, .. } => vec![&**target, &**value],
            NodeKind::Ternary { condition,
                                if_true,
                                if_false, } => vec![&**condition, &**if_true, &**if_false],
            NodeKind::Tensor { rows } => rows.iter().collect(),
            NodeKind::ForLoop { initializers,
                                condition,
                                steps,
                                body, } => initializers.iter()
                                                       .chain(std::iter::once(&**condition))
                                                       .chain(steps.iter())
                                                       .chain(std::iter::once(&**body))
                                                       .collect(),
            NodeKind::Block { statements } => statements.iter().map(|s| &s.node).collect(),
            NodeKind::List { items } => items.iter().collect(),
            NodeKind::Indexation { target, indexes } => {
                std::iter::once(&**target).chain(indexes.iter()).collect()
            },
        }
    }

    /// Returns the identifier name if the node is a bare identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// A top-level or block-level statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The statement's expression.
    pub node: Node,
    /// `false` when a trailing `;` suppressed the inline display.
    pub show: bool,
    /// 0-based source line the statement starts on.
    pub line: usize,
}

/// The result of parsing a whole source text.
///
/// Parsing never fails outright: whatever could be read is kept in
/// `statements`, and the first unreadable position is reported in
/// `parse_error`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Statements parsed before the first error, or all of them.
    pub statements:  Vec<Statement>,
    /// Set when part of the source could not be parsed.
    pub parse_error: Option<ParseError>,
}

/// Binary operators, as they appear inside a [`NodeKind::Chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Remainder (`%`)
    Mod,
    /// Exponentiation (`^`)
    Pow,
    /// Dot product or matrix multiplication (`**`)
    MatMul,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal within `1e-10` (`==`)
    Equal,
}

impl BinaryOperator {
    /// Whether the operator compares its operands and yields `1` or `0`.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual | Self::Equal)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, MatMul, Mod, Mul, Pow, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "^",
            MatMul => "**",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
        };
        write!(f, "{operator}")
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Numeric negation (`-`)
    Negate,
    /// Identity (`+`)
    Plus,
    /// Transpose (`~`)
    Transpose,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Plus => "+",
            Self::Transpose => "~",
        };
        write!(f, "{operator}")
    }
}

/// The four assignment forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOperator {
    /// `:=` introduces a new binding in the innermost scope.
    Declare,
    /// `=` overwrites the nearest existing binding.
    Set,
    /// `+=` reads, adds and writes back.
    Increment,
    /// `-=` reads, subtracts and writes back.
    Decrement,
}

impl AssignOperator {
    /// The binary operator a compound assignment desugars to.
    #[must_use]
    pub const fn binary(self) -> Option<BinaryOperator> {
        match self {
            Self::Increment => Some(BinaryOperator::Add),
            Self::Decrement => Some(BinaryOperator::Sub),
            Self::Declare | Self::Set => None,
        }
    }
}

impl fmt::Display for AssignOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Declare => ":=",
            Self::Set => "=",
            Self::Increment => "+=",
            Self::Decrement => "-=",
        };
        write!(f, "{operator}")
    }
}
