//! Type hierarchy walking for member enumeration.
//!
//! The walker produces the ordered ancestor chain the factory scans level by level:
//! the inspected type itself and every base up to the root, most-derived first, no
//! duplicates, no gaps. The position of a declaring type in this chain is the rank
//! used by the final sort, which is what places members declared closest to the
//! inspected type before inherited ones.

use std::collections::HashSet;

use crate::runtime::{token::Token, typesystem::TypeRc};

/// The ordered ancestor chain of a type, most-derived first.
///
/// A dead or unset base link ends the chain; a token seen twice ends it as well, so a
/// cyclic base graph in a hostile image degrades to a truncated chain instead of a
/// hang. There is no error path, matching the walker's contract of trusting the
/// mirrored image.
pub fn ancestor_chain(ty: &TypeRc) -> Vec<TypeRc> {
    let mut seen: HashSet<Token> = HashSet::new();
    let mut chain: Vec<TypeRc> = Vec::new();

    let mut current = Some(ty.clone());
    while let Some(level) = current {
        if !seen.insert(level.token) {
            break;
        }
        current = level.base();
        chain.push(level);
    }

    chain
}

/// The rank of a declaring type within a chain: 0 is most derived; a type not in the
/// chain ranks after everything that is.
#[must_use]
pub fn rank_of(chain: &[TypeRc], token: Token) -> usize {
    chain
        .iter()
        .position(|level| level.token == token)
        .unwrap_or(chain.len())
}
