//! Static intrinsic tables

use super::descriptor::{IntrinsicDescriptor as D, ReturnCallback, ReturnRule};
use super::fold::Fold;
use super::Param as P;

/// Fortran 90 intrinsic names that may not be used for user procedures
pub(super) static RESERVED: &[&str] = &[
    "AdjustL",
    "AdjustR",
    "All",
    "Allocated",
    "Any",
    "Associated",
    "Ceiling",
    "Count",
    "CShift",
    "Digits",
    "Dot_Product",
    "EOShift",
    "Epsilon",
    "Exponent",
    "Floor",
    "Fraction",
    "Huge",
    "Kind",
    "LBound",
    "Logical",
    "MatMul",
    "MaxExponent",
    "MaxLoc",
    "MaxVal",
    "Merge",
    "MinExponent",
    "MinLoc",
    "MinVal",
    "Modulo",
    "Nearest",
    "Pack",
    "Precision",
    "Present",
    "Product",
    "Radix",
    "Random_Number",
    "Random_Seed",
    "Range",
    "Repeat",
    "Reshape",
    "RRSpacing",
    "Scale",
    "Scan",
    "Selected_Int_Kind",
    "Selected_Real_Kind",
    "Set_Exponent",
    "Shape",
    "Spacing",
    "Spread",
    "Sum",
    "Tiny",
    "Transfer",
    "Transpose",
    "Trim",
    "UBound",
    "Unpack",
    "Verify",
];

const CAST: Option<Fold> = Some(Fold::Cast);

#[rustfmt::skip]
pub(super) static OPERATORS: &[D] = &[
    // Casts
    D::op("INT",    1, 1, P::DEF_INTEGER,        P::Any,                CAST),
    D::op("IFIX",   1, 1, P::DEF_INTEGER,        P::DEF_REAL,           CAST),
    D::op("IDINT",  1, 1, P::DEF_INTEGER,        P::DEF_DOUBLE,         CAST),
    D::op("HFIX",   1, 1, P::DEF_HALF_INTEGER,   P::Any,                CAST),
    D::op("INT1",   1, 1, P::INTEGER_1,          P::Any,                CAST),
    D::op("INT2",   1, 1, P::INTEGER_2,          P::Any,                CAST),
    D::op("INT4",   1, 1, P::INTEGER_4,          P::Any,                CAST),
    D::op("INTC",   1, 1, P::INTEGER_2,          P::Any,                CAST),
    D::op("JFIX",   1, 1, P::INTEGER_4,          P::Any,                CAST),
    D::op("REAL",   1, 1, P::DEF_REAL,           P::Any,                CAST),
    D::op("FLOAT",  1, 1, P::DEF_REAL,           P::DEF_INTEGER,        CAST),
    D::op("SNGL",   1, 1, P::DEF_REAL,           P::DEF_DOUBLE,         CAST),
    D::op("DREAL",  1, 1, P::DEF_DOUBLE,         P::DEF_DOUBLE_COMPLEX, CAST),
    D::op("DBLE",   1, 1, P::DEF_DOUBLE,         P::Any,                CAST),
    D::op("DFLOAT", 1, 1, P::DEF_DOUBLE,         P::Any,                CAST),
    D::op("CMPLX",  1, 2, P::DEF_COMPLEX,        P::Any,                CAST),
    D::op("DCMPLX", 1, 2, P::DEF_DOUBLE_COMPLEX, P::Any,                CAST),

    // Truncation
    D::op("AINT", 1, 1, P::Same, P::REAL,       None),
    D::op("DINT", 1, 1, P::Same, P::DEF_DOUBLE, None),

    // Rounding
    D::op("ANINT",  1, 1, P::Same,        P::REAL,       None),
    D::op("DNINT",  1, 1, P::Same,        P::DEF_DOUBLE, None),
    D::op("NINT",   1, 1, P::DEF_INTEGER, P::REAL,       None),
    D::op("IDNINT", 1, 1, P::DEF_INTEGER, P::DEF_DOUBLE, None),

    D::op("ABS",  1, 1, P::Scalar,   P::Any,         Some(Fold::Abs)),
    D::op("IABS", 1, 1, P::Same,     P::DEF_INTEGER, Some(Fold::Abs)),
    D::op("DABS", 1, 1, P::Same,     P::DEF_DOUBLE,  Some(Fold::Abs)),
    D::op("CABS", 1, 1, P::DEF_REAL, P::DEF_COMPLEX, Some(Fold::Abs)),

    D::op("MOD",    2, 2, P::Same, P::Scalar,   Some(Fold::Mod)),
    D::op("AMOD",   2, 2, P::Same, P::DEF_REAL,   Some(Fold::Mod)),
    D::op("DMOD",   2, 2, P::Same, P::DEF_DOUBLE, Some(Fold::Mod)),
    D::op("MODULO", 2, 2, P::Same, P::Scalar,   Some(Fold::Modulo)),

    D::op("FLOOR",   1, 1, P::Same, P::REAL, None),
    D::op("CEILING", 1, 1, P::Same, P::REAL, None),

    // Transfer of sign
    D::op("SIGN",  2, 2, P::Same, P::Scalar,      Some(Fold::Sign)),
    D::op("ISIGN", 2, 2, P::Same, P::DEF_INTEGER, Some(Fold::Sign)),
    D::op("DSIGN", 2, 2, P::Same, P::DEF_DOUBLE,  Some(Fold::Sign)),

    // Positive difference
    D::op("DIM",  2, 2, P::Same, P::Scalar,      Some(Fold::Dim)),
    D::op("IDIM", 2, 2, P::Same, P::DEF_INTEGER, Some(Fold::Dim)),
    D::op("DDIM", 2, 2, P::Same, P::DEF_DOUBLE,  Some(Fold::Dim)),

    // Inner product
    D::op("DPROD", 2, 2, P::DEF_DOUBLE, P::DEF_REAL, None),

    D::op("MAX",   2, 0, P::Same,        P::Scalar,      Some(Fold::Max)),
    D::op("MAX0",  2, 0, P::Same,        P::DEF_INTEGER, Some(Fold::Max)),
    D::op("AMAX1", 2, 0, P::Same,        P::DEF_REAL,    Some(Fold::Max)),
    D::op("DMAX1", 2, 0, P::Same,        P::DEF_DOUBLE,  Some(Fold::Max)),
    D::op("AMAX0", 2, 0, P::DEF_REAL,    P::DEF_INTEGER, Some(Fold::Max)),
    D::op("MAX1",  2, 0, P::DEF_INTEGER, P::DEF_REAL,    Some(Fold::Max)),
    D::op("MIN",   2, 0, P::Same,        P::Scalar,      Some(Fold::Min)),
    D::op("MIN0",  2, 0, P::Same,        P::DEF_INTEGER, Some(Fold::Min)),
    D::op("AMIN1", 2, 0, P::Same,        P::DEF_REAL,    Some(Fold::Min)),
    D::op("DMIN1", 2, 0, P::Same,        P::DEF_DOUBLE,  Some(Fold::Min)),
    D::op("AMIN0", 2, 0, P::DEF_REAL,    P::DEF_INTEGER, Some(Fold::Min)),
    D::op("MIN1",  2, 0, P::DEF_INTEGER, P::DEF_REAL,    Some(Fold::Min)),

    D::op("CONJG", 1, 1, P::Scalar, P::COMPLEX, None),

    D::op("SQRT",  1, 1, P::Same, P::Any,         None),
    D::op("DSQRT", 1, 1, P::Same, P::DEF_DOUBLE,  None),
    D::op("CSQRT", 1, 1, P::Same, P::DEF_COMPLEX, None),

    D::op("EXP",  1, 1, P::Same, P::Any, None),
    D::op("DEXP", 1, 1, P::Same, P::Any, None),
    D::op("CEXP", 1, 1, P::Same, P::Any, None),

    D::op("LOG",  1, 1, P::Same, P::Any,         None),
    D::op("ALOG", 1, 1, P::Same, P::DEF_REAL,    None),
    D::op("DLOG", 1, 1, P::Same, P::DEF_DOUBLE,  None),
    D::op("CLOG", 1, 1, P::Same, P::DEF_COMPLEX, None),

    D::op("LOG10",  1, 1, P::Same, P::Any,        None),
    D::op("ALOG10", 1, 1, P::Same, P::DEF_REAL,   None),
    D::op("DLOG10", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("SIN",  1, 1, P::Same, P::Any,         None),
    D::op("DSIN", 1, 1, P::Same, P::DEF_DOUBLE,  None),
    D::op("CSIN", 1, 1, P::Same, P::DEF_COMPLEX, None),

    D::op("COS",  1, 1, P::Same, P::Any,         None),
    D::op("DCOS", 1, 1, P::Same, P::DEF_DOUBLE,  None),
    D::op("CCOS", 1, 1, P::Same, P::DEF_COMPLEX, None),

    D::op("TAN",  1, 1, P::Same, P::Any,        None),
    D::op("DTAN", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("ASIN",  1, 1, P::Same, P::Any,        None),
    D::op("DASIN", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("ACOS",  1, 1, P::Same, P::Any,        None),
    D::op("DACOS", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("ATAN",   1, 2, P::Same, P::Any,        None),
    D::op("DATAN",  1, 2, P::Same, P::DEF_DOUBLE, None),
    D::op("ATAN2",  2, 2, P::Same, P::Any,        None),
    D::op("DATAN2", 2, 2, P::Same, P::DEF_DOUBLE, None),

    D::op("SINH",  1, 1, P::Same, P::Any,        None),
    D::op("DSINH", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("COSH",  1, 1, P::Same, P::Any,        None),
    D::op("DCOSH", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("TANH",  1, 1, P::Same, P::Any,        None),
    D::op("DTANH", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("ASINH",  1, 1, P::Same, P::Any,        None),
    D::op("DASINH", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("ACOSH",  1, 1, P::Same, P::Any,        None),
    D::op("DACOSH", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("ATANH",  1, 1, P::Same, P::Any,        None),
    D::op("DATANH", 1, 1, P::Same, P::DEF_DOUBLE, None),

    D::op("IAND", 2, 2, P::Same, P::INTEGER, Some(Fold::Iand)),
    D::op("IEOR", 2, 2, P::Same, P::INTEGER, Some(Fold::Ieor)),
    D::op("IOR",  2, 2, P::Same, P::INTEGER, Some(Fold::Ior)),
    D::op("NOT",  1, 1, P::Same, P::INTEGER, Some(Fold::Not)),
];

const fn ret(param: P) -> ReturnRule {
    ReturnRule::Param(param)
}

#[rustfmt::skip]
pub(super) static FUNCTIONS: &[D] = &[
    D::func("MClock",  0, 0, ret(P::INTEGER_1), &[], None),
    D::func("MClock8", 0, 0, ret(P::INTEGER_2), &[], None),
    D::func("FDate",   0, 0, ret(P::CHARACTER), &[], None),
    D::func("Second",  0, 0, ret(P::DEF_REAL),  &[], None),

    D::func("Loc",      1, 1, ret(P::DEF_INTEGER), &[P::Any],           None),
    D::func("IRand",    0, 1, ret(P::DEF_INTEGER), &[P::INTEGER],       None),
    D::func("LnBlnk",   1, 1, ret(P::DEF_INTEGER), &[P::CHARACTER],     None),
    D::func("IsaTty",   1, 1, ret(P::LOGICAL),     &[P::INTEGER],       None),
    D::func("Len",      1, 1, ret(P::DEF_INTEGER), &[P::CHARACTER],     Some(Fold::Len)),
    D::func("AImag",    1, 1, ret(P::REAL),        &[P::DEF_COMPLEX],   None),
    D::func("Len_Trim", 1, 1, ret(P::DEF_INTEGER), &[P::CHARACTER],     None),
    D::func("BesJ0",    1, 1, ret(P::REAL),        &[P::REAL],          None),
    D::func("BesJ1",    1, 1, ret(P::REAL),        &[P::REAL],          None),
    D::func("BesJN",    1, 1, ret(P::DEF_INTEGER), &[P::REAL],          None),
    D::func("BesY0",    1, 1, ret(P::REAL),        &[P::REAL],          None),
    D::func("BesY1",    1, 1, ret(P::REAL),        &[P::REAL],          None),
    D::func("CTime",    1, 1, ret(P::CHARACTER),   &[P::INTEGER],       None),
    D::func("DErF",     1, 1, ret(P::DEF_DOUBLE),  &[P::DEF_DOUBLE],    None),
    D::func("DErFC",    1, 1, ret(P::DEF_DOUBLE),  &[P::DEF_DOUBLE],    None),
    D::func("ErF",      1, 1, ret(P::REAL),        &[P::REAL],          None),
    D::func("ErFC",     1, 1, ret(P::REAL),        &[P::REAL],          None),
    D::func("ETime",    1, 1, ret(P::DEF_REAL),    &[P::DEF_REAL_A2],   None),
    D::func("FTell",    1, 1, ret(P::DEF_INTEGER), &[P::INTEGER],       None),
    D::func("GetCWD",   1, 1, ret(P::DEF_INTEGER), &[P::CHARACTER_OUT], None),
    D::func("HostNm",   1, 1, ret(P::DEF_INTEGER), &[P::CHARACTER_OUT], None),
    D::func("TtyNam",   1, 1, ret(P::CHARACTER),   &[P::INTEGER],       None),

    D::func("Stat",   2, 2, ret(P::DEF_INTEGER), &[P::CHARACTER, P::INTEGER_A13_OUT], None),
    D::func("LStat",  2, 2, ret(P::DEF_INTEGER), &[P::CHARACTER, P::INTEGER_A13_OUT], None),
    D::func("FStat",  2, 2, ret(P::DEF_INTEGER), &[P::INTEGER,   P::INTEGER_A13_OUT], None),
    D::func("Access", 2, 2, ret(P::DEF_INTEGER), &[P::CHARACTER, P::CHARACTER],       None),
    D::func("LGe",    2, 2, ret(P::LOGICAL),     &[P::CHARACTER, P::CHARACTER],       None),
    D::func("LGt",    2, 2, ret(P::LOGICAL),     &[P::CHARACTER, P::CHARACTER],       None),
    D::func("LLe",    2, 2, ret(P::LOGICAL),     &[P::CHARACTER, P::CHARACTER],       None),
    D::func("LLt",    2, 2, ret(P::LOGICAL),     &[P::CHARACTER, P::CHARACTER],       None),
    D::func("LShift", 2, 2, ret(P::DEF_INTEGER), &[P::INTEGER,   P::INTEGER],         None),
    D::func("IShft",  2, 2, ret(P::DEF_INTEGER), &[P::INTEGER,   P::INTEGER],         None),
    D::func("BesYN",  2, 2, ret(P::REAL),        &[P::INTEGER,   P::REAL],            None),
    D::func("BTest",  2, 2, ret(P::LOGICAL),     &[P::INTEGER,   P::INTEGER],         None),

    D::func("IShftC", 3, 3, ret(P::INTEGER), &[P::INTEGER, P::INTEGER, P::INTEGER], None),

    D::func("Char",  1, 2, ReturnRule::Callback(ReturnCallback::Char),
        &[P::INTEGER, P::INTEGER], Some(Fold::Char)),
    D::func("AChar", 1, 2, ReturnRule::Callback(ReturnCallback::Char),
        &[P::INTEGER, P::INTEGER], Some(Fold::Char)),
    D::func("IChar", 1, 2, ReturnRule::Callback(ReturnCallback::Ichar),
        &[P::CHARACTER_1, P::INTEGER], Some(Fold::Ichar)),

    D::func("Transfer", 2, 3, ReturnRule::Callback(ReturnCallback::Transfer),
        &[P::Any, P::Any, P::INTEGER], Some(Fold::Transfer)),
];

#[rustfmt::skip]
pub(super) static SUBROUTINES: &[D] = &[
    D::subr("ITime",  1, 1, &[P::INTEGER_A3_OUT]),
    D::subr("FDate",  1, 1, &[P::CHARACTER_OUT]),
    D::subr("Second", 1, 1, &[P::REAL_OUT]),

    D::subr("ChDir",  1, 2, &[P::CHARACTER,       P::INTEGER_OUT]),
    D::subr("LTime",  2, 2, &[P::INTEGER,         P::CHARACTER_OUT]),
    D::subr("CTime",  2, 2, &[P::INTEGER,         P::CHARACTER_OUT]),
    D::subr("DTime",  2, 2, &[P::DEF_REAL_A2_OUT, P::REAL_OUT]),
    D::subr("ETime",  2, 2, &[P::DEF_REAL_A2_OUT, P::REAL_OUT]),
    D::subr("FGet",   1, 2, &[P::CHARACTER_OUT,   P::INTEGER_OUT]),
    D::subr("FPut",   1, 2, &[P::CHARACTER,       P::INTEGER_OUT]),
    D::subr("FTell",  2, 2, &[P::INTEGER,         P::INTEGER_OUT]),
    D::subr("GetCWD", 1, 2, &[P::CHARACTER_OUT,   P::INTEGER_OUT]),
    D::subr("HostNm", 1, 2, &[P::CHARACTER_OUT,   P::INTEGER_OUT]),
    D::subr("System", 1, 2, &[P::CHARACTER,       P::INTEGER_OUT]),
    D::subr("TtyNam", 2, 2, &[P::INTEGER,         P::CHARACTER_OUT]),
    D::subr("UMask",  1, 2, &[P::INTEGER,         P::INTEGER_OUT]),
    D::subr("Unlink", 1, 2, &[P::CHARACTER,       P::INTEGER_OUT]),

    D::subr("ChMod",  2, 3, &[P::CHARACTER, P::CHARACTER,       P::INTEGER_OUT]),
    D::subr("SymLnk", 2, 3, &[P::CHARACTER, P::CHARACTER,       P::INTEGER_OUT]),
    D::subr("Kill",   2, 3, &[P::INTEGER,   P::INTEGER,         P::INTEGER_OUT]),
    D::subr("Stat",   2, 3, &[P::CHARACTER, P::INTEGER_A13_OUT, P::INTEGER_OUT]),
    D::subr("FStat",  2, 3, &[P::INTEGER,   P::INTEGER_A13_OUT, P::INTEGER_OUT]),
    D::subr("LStat",  2, 3, &[P::CHARACTER, P::INTEGER_A13_OUT, P::INTEGER_OUT]),
    D::subr("Alarm",  2, 3, &[P::INTEGER,   P::INTEGER_A13,     P::INTEGER_OUT]),
    D::subr("FGetC",  2, 3, &[P::INTEGER,   P::CHARACTER_OUT,   P::INTEGER_OUT]),
    D::subr("FPutC",  2, 3, &[P::INTEGER,   P::CHARACTER,       P::INTEGER_OUT]),
    D::subr("Link",   2, 3, &[P::CHARACTER, P::CHARACTER,       P::INTEGER_OUT]),
    D::subr("Rename", 2, 3, &[P::CHARACTER, P::CHARACTER,       P::INTEGER_OUT]),
];
