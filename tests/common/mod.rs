#![allow(dead_code)]

pub use prodline_test_utils::builders;
pub use prodline_test_utils::reference;
pub use prodline_test_utils::{init_tracing, with_timeout};

/// Five-machine plant with two levels and three leaves, in line format.
///
/// ```text
///        1
///      /   \
///     2     3 (leaf "XYZ")
///    / \
///   4   5
/// "ABCD" "HELLO"
/// ```
pub const TWO_LEVEL_PLANT: &str = "\
5
2
1 2 3 4 5
6
2 1 enhance
3 1 reverse
4 2 split
5 2 trim
XYZ
ABCD
HELLO
";

/// Expected report for [`TWO_LEVEL_PLANT`].
pub const TWO_LEVEL_REPORT: &str = "\
AABELLLZYX
ABCOY
2-5-2
3-4-2
4-9-2
5-2-2";
