//! Operator definitions shared by the lexer and the evaluator.

/// Binary operators of inline expressions.
///
/// The language has no precedence: operators apply strictly left to right,
/// so the only classification needed is which family an operator belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
}

impl BinaryOp {
    /// Returns the canonical source-level symbol for this operator.
    ///
    /// `<<`, `>>` and `is` are spellings of `Lt`, `Gt` and `Eq`; the canonical
    /// symbol is what error messages show.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<<",
            Self::LtEq => "<=",
            Self::Gt => ">>",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
        }
    }

    /// Comparisons yield a boolean and may carry a conditional assignment.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    /// `+ - * / %` operate on numbers.
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod)
    }
}
