/// Builder that compiles a pattern dictionary into the double array.
pub mod builder;
/// Searcher over the compiled automaton.
pub mod searcher;
/// Slot allocator for the double array.
pub(crate) mod slots;

pub use builder::{from_dict_file, Builder};
pub use searcher::Searcher;

/// Slots are grown one block per byte alphabet.
pub(crate) const BLOCK_SIZE: usize = 256;

/// `check` value of a slot that is not a live state.
pub(crate) const VACANT: u32 = u32::MAX;
