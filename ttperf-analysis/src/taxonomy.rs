//! Operation taxonomy classification
//!
//! The TT-Metal eltwise operation catalog is a fixed tree of categories and
//! subcategories. Classification walks an explicit ordered precedence list,
//! so an operation name listed in more than one subcategory always resolves
//! to the same category, independent of any map iteration order.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed category set of the operation taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Unary,
    UnaryInplace,
    BinaryArithmetic,
    BinaryComparison,
    BinaryLogical,
    BinaryInplace,
    Ternary,
    Reduction,
    Complex,
    UnaryBackward,
    BinaryBackward,
    TernaryBackward,
    ReductionBackward,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 13] = [
        Category::Unary,
        Category::UnaryInplace,
        Category::BinaryArithmetic,
        Category::BinaryComparison,
        Category::BinaryLogical,
        Category::BinaryInplace,
        Category::Ternary,
        Category::Reduction,
        Category::Complex,
        Category::UnaryBackward,
        Category::BinaryBackward,
        Category::TernaryBackward,
        Category::ReductionBackward,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unary => "Unary",
            Category::UnaryInplace => "Unary Inplace",
            Category::BinaryArithmetic => "Binary Arithmetic",
            Category::BinaryComparison => "Binary Comparison",
            Category::BinaryLogical => "Binary Logical",
            Category::BinaryInplace => "Binary Inplace",
            Category::Ternary => "Ternary",
            Category::Reduction => "Reduction",
            Category::Complex => "Complex",
            Category::UnaryBackward => "Unary Backward",
            Category::BinaryBackward => "Binary Backward",
            Category::TernaryBackward => "Ternary Backward",
            Category::ReductionBackward => "Reduction Backward",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const UNARY_BACKWARD: &[&str] = &[
    "abs_bw", "acos_bw", "acosh_bw", "asin_bw", "asinh_bw", "atan_bw", "atanh_bw", "ceil_bw",
    "cos_bw", "cosh_bw", "deg2rad_bw", "digamma_bw", "erf_bw", "erfc_bw", "erfinv_bw", "exp_bw",
    "exp2_bw", "expm1_bw", "floor_bw", "frac_bw", "gelu_bw", "hardsigmoid_bw", "hardswish_bw",
    "i0_bw", "lgamma_bw", "log_bw", "log_sigmoid_bw", "log1p_bw", "log10_bw", "log2_bw",
    "logit_bw", "multigammaln_bw", "neg_bw", "rad2deg_bw", "reciprocal_bw", "relu_bw", "relu6_bw",
    "round_bw", "rsqrt_bw", "selu_bw", "sigmoid_bw", "sign_bw", "silu_bw", "sin_bw", "sinh_bw",
    "softsign_bw", "sqrt_bw", "square_bw", "tan_bw", "tanh_bw", "tanhshrink_bw", "trunc_bw",
    "fill_bw", "fill_zero_bw", "hardshrink_bw", "softshrink_bw",
];

const BINARY_BACKWARD: &[&str] = &[
    "add_bw", "atan2_bw", "bias_gelu_bw", "div_bw", "fmod_bw", "hypot_bw", "ldexp_bw",
    "logaddexp_bw", "logaddexp2_bw", "max_bw", "min_bw", "mul_bw", "remainder_bw", "rsub_bw",
    "squared_difference_bw", "sub_bw", "xlogy_bw", "pow_bw", "addalpha_bw", "subalpha_bw",
];

const TERNARY_BACKWARD: &[&str] = &["addcdiv_bw", "addcmul_bw", "lerp_bw", "where_bw"];

const REDUCTION_BACKWARD: &[&str] = &["sum_bw", "mean_bw", "var_bw", "std_bw", "prod_bw"];

const COMPLEX_UNARY: &[&str] = &["complex_abs", "complex_recip"];

const COMPLEX_TENSOR_CREATION: &[&str] =
    &["complex_tensor", "real", "imag", "angle", "conj", "polar"];

const REDUCTION: &[&str] = &[
    "argmax", "max", "min", "mean", "sum", "prod", "var", "std", "cumsum", "cumprod",
];

const TERNARY: &[&str] = &["addcdiv", "addcmul", "where", "mac", "lerp"];

const BINARY_ARITHMETIC: &[&str] = &[
    "add", "subtract", "multiply", "divide", "mul", "sub", "rpow", "rdiv", "assign",
];

const BINARY_ARITHMETIC_INPLACE: &[&str] = &[
    "add_", "subtract_", "multiply_", "divide_", "mul_", "sub_", "div_", "rsub_",
];

const BINARY_COMPARISON: &[&str] = &["gt", "lt", "eq", "ne", "ge", "le"];

const BINARY_COMPARISON_INPLACE: &[&str] = &["gt_", "lt_", "eq_", "ne_", "ge_", "le_"];

const BINARY_LOGICAL: &[&str] = &["logical_and", "logical_or", "logical_xor", "ldexp", "xlogy"];

const BINARY_LOGICAL_INPLACE: &[&str] = &[
    "logical_and_", "logical_or_", "logical_xor_", "ldexp_", "logaddexp_",
];

const BINARY_BITWISE: &[&str] = &["bitwise_and", "bitwise_or", "bitwise_xor"];

const BINARY_MATHEMATICAL: &[&str] = &[
    "atan2", "hypot", "logaddexp", "logaddexp2", "maximum", "minimum", "pow", "fmod", "remainder",
    "nextafter", "bias_gelu", "polyval",
];

const BINARY_MATHEMATICAL_INPLACE: &[&str] =
    &["bias_gelu_", "logaddexp2_", "squared_difference_"];

const BINARY_ADVANCED: &[&str] = &[
    "addalpha", "subalpha", "squared_difference", "absolute_difference", "isclose",
    "round_binary", "clip_binary",
];

const UNARY_INPLACE: &[&str] = &["logical_not_"];

const UNARY_BASIC: &[&str] = &[
    "abs", "acos", "asin", "asinh", "atan", "atanh", "cos", "acosh", "erfinv", "exp2", "expm1",
    "gez", "gtz", "i0", "i1", "isfinite", "isinf", "isnan", "isneginf", "isposinf", "lez", "log",
    "log10", "log2", "log1p", "logical_not", "ltz", "neg", "nez", "reciprocal", "relu", "relu6",
    "sign", "signbit", "silu", "sin", "sqrt", "square", "tan", "bitwise_not", "floor", "ceil",
    "trunc", "eqz", "mish", "tanhshrink", "deg2rad", "rad2deg", "identity",
];

const UNARY_FAST_APPROXIMATE: &[&str] = &[
    "exp", "erf", "erfc", "gelu", "rsqrt", "sigmoid", "sigmoid_accurate",
];

const UNARY_WITH_PARAMS: &[&str] = &[
    "elu", "heaviside", "leaky_relu", "relu_max", "relu_min", "fill", "glu", "reglu", "geglu",
    "swiglu", "clip", "clamp", "threshold",
];

const UNARY_COMPOSITE_SPECIAL: &[&str] = &[
    "softplus", "tanh", "log_sigmoid", "unary_chain", "cbrt", "cosh", "digamma", "lgamma",
    "multigammaln", "polygamma", "sinh", "softsign", "swish", "frac", "hardswish", "hardsigmoid",
    "hardtanh", "selu", "tril", "triu", "round", "logit", "prelu", "softshrink", "hardshrink",
];

const UNARY_HARDWARE_SPECIFIC: &[&str] = &["var_hw", "std_hw"];

/// One node of the precedence list: a named subcategory, its member
/// operations, and the category that membership resolves to.
#[derive(Debug, Clone, Copy)]
pub struct TaxonomyNode {
    pub subcategory: &'static str,
    pub operations: &'static [&'static str],
    pub category: Category,
}

/// The ordered lookup list. Backward subcategories come first so that names
/// like `max_bw` never resolve through the reduction group; complex,
/// reduction, and ternary precede the binary subcategories; unary groups
/// are checked last.
pub static PRECEDENCE: Lazy<Vec<TaxonomyNode>> = Lazy::new(|| {
    let node = |subcategory, operations, category| TaxonomyNode {
        subcategory,
        operations,
        category,
    };
    vec![
        node("unary_backward", UNARY_BACKWARD, Category::UnaryBackward),
        node("binary_backward", BINARY_BACKWARD, Category::BinaryBackward),
        node("ternary_backward", TERNARY_BACKWARD, Category::TernaryBackward),
        node("reduction_backward", REDUCTION_BACKWARD, Category::ReductionBackward),
        node("complex_unary", COMPLEX_UNARY, Category::Complex),
        node("complex_tensor_creation", COMPLEX_TENSOR_CREATION, Category::Complex),
        node("reduction", REDUCTION, Category::Reduction),
        node("ternary", TERNARY, Category::Ternary),
        node("arithmetic", BINARY_ARITHMETIC, Category::BinaryArithmetic),
        node("arithmetic_inplace", BINARY_ARITHMETIC_INPLACE, Category::BinaryInplace),
        node("comparison", BINARY_COMPARISON, Category::BinaryComparison),
        node("comparison_inplace", BINARY_COMPARISON_INPLACE, Category::BinaryInplace),
        node("logical", BINARY_LOGICAL, Category::BinaryLogical),
        node("logical_inplace", BINARY_LOGICAL_INPLACE, Category::BinaryInplace),
        node("bitwise", BINARY_BITWISE, Category::BinaryLogical),
        node("mathematical", BINARY_MATHEMATICAL, Category::BinaryArithmetic),
        node("mathematical_inplace", BINARY_MATHEMATICAL_INPLACE, Category::BinaryInplace),
        node("advanced", BINARY_ADVANCED, Category::BinaryArithmetic),
        node("unary_inplace", UNARY_INPLACE, Category::UnaryInplace),
        node("basic", UNARY_BASIC, Category::Unary),
        node("fast_approximate", UNARY_FAST_APPROXIMATE, Category::Unary),
        node("with_params", UNARY_WITH_PARAMS, Category::Unary),
        node("composite_special", UNARY_COMPOSITE_SPECIAL, Category::Unary),
        node("hardware_specific", UNARY_HARDWARE_SPECIFIC, Category::Unary),
    ]
});

/// Map an operation name to its category.
///
/// Names are matched case-insensitively against the precedence list. An
/// unknown name falls back to [`Category::Unary`]; that is the documented
/// default for new or uncataloged operations, not an error.
pub fn classify(name: &str) -> Category {
    let lowered = name.to_lowercase();
    for node in PRECEDENCE.iter() {
        if node.operations.contains(&lowered.as_str()) {
            return node.category;
        }
    }
    Category::Unary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_deterministic() {
        for node in PRECEDENCE.iter() {
            for op in node.operations {
                let first = classify(op);
                for _ in 0..3 {
                    assert_eq!(classify(op), first, "unstable classification for {op}");
                }
            }
        }
    }

    #[test]
    fn backward_groups_take_precedence() {
        assert_eq!(classify("max"), Category::Reduction);
        assert_eq!(classify("max_bw"), Category::BinaryBackward);
        assert_eq!(classify("sum"), Category::Reduction);
        assert_eq!(classify("sum_bw"), Category::ReductionBackward);
        assert_eq!(classify("where"), Category::Ternary);
        assert_eq!(classify("where_bw"), Category::TernaryBackward);
        assert_eq!(classify("gelu"), Category::Unary);
        assert_eq!(classify("gelu_bw"), Category::UnaryBackward);
    }

    #[test]
    fn binary_subcategory_remapping() {
        assert_eq!(classify("bitwise_and"), Category::BinaryLogical);
        assert_eq!(classify("atan2"), Category::BinaryArithmetic);
        assert_eq!(classify("bias_gelu_"), Category::BinaryInplace);
        assert_eq!(classify("isclose"), Category::BinaryArithmetic);
        assert_eq!(classify("eq_"), Category::BinaryInplace);
        assert_eq!(classify("logical_xor_"), Category::BinaryInplace);
    }

    #[test]
    fn reduction_precedes_binary_groups() {
        // `maximum`/`minimum` are binary; the bare reduction names must not
        // be shadowed by them or vice versa.
        assert_eq!(classify("maximum"), Category::BinaryArithmetic);
        assert_eq!(classify("minimum"), Category::BinaryArithmetic);
        assert_eq!(classify("mean"), Category::Reduction);
        assert_eq!(classify("std"), Category::Reduction);
        assert_eq!(classify("std_hw"), Category::Unary);
    }

    #[test]
    fn unary_inplace_checked_before_unary() {
        assert_eq!(classify("logical_not"), Category::Unary);
        assert_eq!(classify("logical_not_"), Category::UnaryInplace);
    }

    #[test]
    fn unknown_names_default_to_unary() {
        assert_eq!(classify("celu"), Category::Unary);
        assert_eq!(classify("totally_new_op"), Category::Unary);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("ADD"), Category::BinaryArithmetic);
        assert_eq!(classify("Complex_Abs"), Category::Complex);
    }
}
