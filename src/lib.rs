//! # libaho
//!
//! A fast multi-pattern string-matching library built on an
//! [Aho-Corasick](https://en.wikipedia.org/wiki/Aho%E2%80%93Corasick_algorithm)
//! automaton stored as a double-array trie.
//!
//! A dictionary of byte patterns is compiled once into three flat integer
//! arrays; transitions are computed arithmetically (`base[state] + byte`),
//! so lookups touch no pointers and the compiled searcher is a plain,
//! freely shareable value.
//!
//! ## Features
//!
//! - **Generic over the value type**: every pattern carries an arbitrary
//!   owned value of type `V`, surfaced on matches
//! - **Compact**: slot storage grows one 256-entry block at a time, packed
//!   by a free-list allocator that keeps the array dense
//! - **Fast**: O(query length) exact and prefix lookups; a single forward
//!   pass over the text for substring coverage
//! - **Thread-safe**: [`Searcher`](aho::Searcher) is immutable after build
//!   and `Send + Sync` whenever `V` is
//!
//! ## Quick Start
//!
//! ```
//! use libaho::aho::Builder;
//!
//! let mut builder = Builder::new();
//! builder.add("he", 0).add("she", 1).add("his", 2).add("hers", 3);
//! let searcher = builder.build();
//!
//! assert_eq!(searcher.exact("she"), Some(&1));
//! assert!(searcher.prefix("her"));
//! assert_eq!(searcher.cover("ushers"), vec![&1, &0, &3]);
//! ```
//!
//! Patterns are raw byte sequences: pass UTF-8 text and get byte-offset
//! semantics for free.
//!
//! ```
//! use libaho::aho::Builder;
//!
//! let mut builder = Builder::new();
//! builder.add("犹豫就会败北", "hesitation is defeat");
//! let searcher = builder.build();
//!
//! assert!(searcher.prefix("犹豫"));
//! assert!(searcher.exact("犹豫就会败北").is_some());
//! ```

#![warn(missing_docs)]

/// The Aho-Corasick automaton: builder, slot allocator, and searcher.
pub mod aho;
