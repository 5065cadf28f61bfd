// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FPaths = Vec<FPath>;

/// A general-purpose counting type.
pub type Count = u64;

/// A line of text printed by an atop command.
pub type AtopLine = str;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// allocator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The global allocator chosen at compile-time by feature flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AllocatorChosen {
    System,
    Jemalloc,
    Mimalloc,
}

impl fmt::Display for AllocatorChosen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocatorChosen::System => write!(f, "system"),
            AllocatorChosen::Jemalloc => write!(f, "jemalloc"),
            AllocatorChosen::Mimalloc => write!(f, "mimalloc"),
        }
    }
}
