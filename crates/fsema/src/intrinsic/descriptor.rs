//! Intrinsic descriptors

use super::Param;
use super::fold::Fold;

/// Descriptor table an intrinsic comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Elemental operator: every argument unified to one promoted type
    Operator,
    Function,
    Subroutine,
}

/// Argument classes of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSpec {
    /// One class shared by every argument
    Uniform(Param),
    /// Class per position; positions past the end accept anything
    Positional(&'static [Param]),
}

impl ArgSpec {
    pub fn param(&self, index: usize) -> Param {
        match self {
            ArgSpec::Uniform(param) => *param,
            ArgSpec::Positional(params) => params.get(index).copied().unwrap_or(Param::Any),
        }
    }
}

/// Result type computed from the arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCallback {
    /// CHAR / ACHAR: one character of the kind named by argument 2
    Char,
    /// ICHAR: integer of the kind named by argument 2
    Ichar,
    /// TRANSFER: the type of the mold
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnRule {
    /// Subroutines return nothing
    None,
    Param(Param),
    Callback(ReturnCallback),
}

/// Static description of one intrinsic procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrinsicDescriptor {
    /// Canonical spelling
    pub name: &'static str,
    pub family: Family,
    pub arg_min: usize,
    /// Zero means unbounded
    pub arg_max: usize,
    pub args: ArgSpec,
    pub returns: ReturnRule,
    pub fold: Option<Fold>,
}

impl IntrinsicDescriptor {
    pub(super) const fn op(
        name: &'static str,
        arg_min: usize,
        arg_max: usize,
        returns: Param,
        arg: Param,
        fold: Option<Fold>,
    ) -> Self {
        Self {
            name,
            family: Family::Operator,
            arg_min,
            arg_max,
            args: ArgSpec::Uniform(arg),
            returns: ReturnRule::Param(returns),
            fold,
        }
    }

    pub(super) const fn func(
        name: &'static str,
        arg_min: usize,
        arg_max: usize,
        returns: ReturnRule,
        args: &'static [Param],
        fold: Option<Fold>,
    ) -> Self {
        Self {
            name,
            family: Family::Function,
            arg_min,
            arg_max,
            args: ArgSpec::Positional(args),
            returns,
            fold,
        }
    }

    pub(super) const fn subr(
        name: &'static str,
        arg_min: usize,
        arg_max: usize,
        args: &'static [Param],
    ) -> Self {
        Self {
            name,
            family: Family::Subroutine,
            arg_min,
            arg_max,
            args: ArgSpec::Positional(args),
            returns: ReturnRule::None,
            fold: None,
        }
    }

    pub fn is_subroutine(&self) -> bool {
        self.family == Family::Subroutine
    }

    /// Whether folding converts the argument to the result type
    pub fn is_cast(&self) -> bool {
        self.fold == Some(Fold::Cast)
    }
}
