//! DoS prevention constants.
//!
//! There are no yield points mid-parse, so bounding total work is the
//! caller's job. Nesting depth is the one thing capped here.

/// Maximum nesting depth for block containers (blockquotes, future lists).
/// The start phase stops opening new containers past this depth.
pub const MAX_BLOCK_NESTING: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_BLOCK_NESTING >= 16) };
        const { assert!(MAX_BLOCK_NESTING <= 64) };
    }
}
