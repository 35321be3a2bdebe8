use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::searcher::Searcher;
use super::slots::SlotAllocator;
use super::{BLOCK_SIZE, VACANT};

/// A builder that compiles a pattern dictionary into a [`Searcher`].
///
/// Patterns are non-empty byte sequences; the byte `0x00` is reserved as the
/// internal end-of-word sentinel and must not occur in any pattern. Each
/// pattern carries an owned value of type `V` that the searcher hands back
/// on matches.
///
/// Patterns may be added in any order; the builder sorts them itself. Adding
/// the same pattern twice keeps the value of the earliest `add` and drops
/// the rest with a warning.
///
/// # Examples
///
/// ```
/// use libaho::aho::Builder;
///
/// let mut builder = Builder::new();
/// builder.add("hello", 0).add("world", 1);
/// let searcher = builder.build();
/// assert_eq!(searcher.exact("hello"), Some(&0));
/// ```
pub struct Builder<V> {
    patterns: Vec<SmallVec<[u8; 32]>>,
    pattern_values: Vec<Option<V>>,
    /// Permutation of pattern indices in sorted order, filled by `build`.
    order: Vec<u32>,

    base: Vec<u32>,
    check: Vec<u32>,
    suffix_link: Vec<u32>,
    values: Vec<Option<V>>,
    slots: SlotAllocator,
}

/// A state together with the sorted pattern subrange that runs through it.
#[derive(Clone, Copy)]
struct LevelRange {
    state: u32,
    begin: usize,
    end: usize,
}

impl<V> Builder<V> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            pattern_values: Vec::new(),
            order: Vec::new(),
            base: Vec::new(),
            check: Vec::new(),
            suffix_link: Vec::new(),
            values: Vec::new(),
            slots: SlotAllocator::new(),
        }
    }

    /// Adds a pattern and its value to the dictionary.
    ///
    /// Accepts anything viewable as bytes: `&str`, `String`, `&[u8]`,
    /// `Vec<u8>`, or byte arrays.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty or contains the byte `0x00`.
    pub fn add(&mut self, pattern: impl AsRef<[u8]>, value: V) -> &mut Self {
        let pattern = pattern.as_ref();
        assert!(!pattern.is_empty(), "patterns must not be empty");
        assert!(
            !pattern.contains(&0),
            "patterns must not contain the reserved byte 0x00"
        );
        self.patterns.push(SmallVec::from_slice(pattern));
        self.pattern_values.push(Some(value));
        self
    }

    /// Compiles the dictionary and returns the immutable [`Searcher`].
    ///
    /// Sorts the patterns, lays out the trie in the double array, wires the
    /// failure links, and moves the finished arrays into the searcher.
    pub fn build(mut self) -> Searcher<V> {
        let count = self.patterns.len();
        let mut order: Vec<u32> = (0..count as u32).collect();
        // Stable, so equal patterns keep insertion order and the earliest
        // value wins when duplicates collapse.
        order.sort_by(|&a, &b| self.patterns[a as usize].cmp(&self.patterns[b as usize]));
        self.order = order;

        // Index 0 of the value table is the "no value" sentinel.
        self.values.push(None);
        self.slots.extend_block();
        self.base.resize(BLOCK_SIZE, 0);
        self.check.resize(BLOCK_SIZE, VACANT);
        self.suffix_link.resize(BLOCK_SIZE, 0);

        self.build_level(0, count, 0, 0);
        self.build_suffix_links();
        debug!(
            patterns = count,
            distinct = self.values.len() - 1,
            slots = self.base.len(),
            "compiled pattern dictionary"
        );
        Searcher::new(self.base, self.check, self.suffix_link, self.values)
    }

    /// Byte of the `i`-th sorted pattern at `depth`; the sentinel `0` once
    /// the pattern has ended.
    fn byte_at(&self, sorted_index: usize, depth: usize) -> u8 {
        let pattern = &self.patterns[self.order[sorted_index] as usize];
        pattern.get(depth).copied().unwrap_or(0)
    }

    /// Splits the sorted range `[begin, end)` by its byte at `depth`.
    ///
    /// Returns the distinct labels in increasing order and the subrange
    /// boundaries; `bounds` has one more entry than `labels`, so label `i`
    /// spans `bounds[i]..bounds[i + 1]`.
    fn partition(
        &self,
        begin: usize,
        end: usize,
        depth: usize,
    ) -> (SmallVec<[u8; 32]>, SmallVec<[usize; 33]>) {
        let mut labels: SmallVec<[u8; 32]> = SmallVec::new();
        let mut bounds: SmallVec<[usize; 33]> = SmallVec::new();
        for i in begin..end {
            let c = self.byte_at(i, depth);
            if labels.last() != Some(&c) {
                if labels.last().is_some_and(|&last| last > c) {
                    panic!("sorted pattern order violated during construction");
                }
                labels.push(c);
                bounds.push(i);
            }
        }
        bounds.push(end);
        (labels, bounds)
    }

    /// Reserves a base for `labels` and grows the arrays to match the
    /// allocator's capacity.
    fn allocate_base(&mut self, labels: &[u8]) -> u32 {
        let base = self.slots.find_free_base(labels);
        let cap = self.slots.capacity();
        if cap > self.base.len() {
            self.base.resize(cap, 0);
            self.check.resize(cap, VACANT);
            self.suffix_link.resize(cap, 0);
        }
        base as u32
    }

    /// Installs all outgoing transitions of `state`, whose sorted pattern
    /// range `[begin, end)` shares a prefix of length `depth`, then recurses
    /// into each non-terminal child.
    fn build_level(&mut self, begin: usize, end: usize, depth: usize, state: u32) {
        let (labels, bounds) = self.partition(begin, end, depth);
        if labels.is_empty() {
            return;
        }

        let base = self.allocate_base(&labels);
        self.base[state as usize] = base;
        for &l in &labels {
            self.check[(base + u32::from(l)) as usize] = state;
        }

        for (i, &l) in labels.iter().enumerate() {
            let child = base + u32::from(l);
            if l == 0 {
                // Terminal slot: its base becomes the value-table index.
                let pattern_index = self.order[bounds[i]] as usize;
                self.base[child as usize] = self.values.len() as u32;
                let value = self.pattern_values[pattern_index].take();
                self.values.push(value);
                let dropped = bounds[i + 1] - bounds[i] - 1;
                if dropped > 0 {
                    warn!(
                        pattern = %String::from_utf8_lossy(&self.patterns[pattern_index]),
                        dropped,
                        "duplicate pattern; keeping the first value"
                    );
                }
            } else {
                self.build_level(bounds[i], bounds[i + 1], depth + 1, child);
            }
        }
    }

    /// Wires failure links breadth-first by depth.
    ///
    /// Instead of materializing child lists, each level re-derives its label
    /// partition from the sorted patterns, exactly as `build_level` did.
    /// Processing shallower states first guarantees that every suffix link a
    /// walk consults is already final.
    fn build_suffix_links(&mut self) {
        let mut depth = 0;
        let mut level = vec![LevelRange {
            state: 0,
            begin: 0,
            end: self.patterns.len(),
        }];
        while !level.is_empty() {
            let mut next_level = Vec::new();
            for range in &level {
                let (labels, bounds) = self.partition(range.begin, range.end, depth);
                let base = self.base[range.state as usize];
                for (i, &l) in labels.iter().enumerate() {
                    let child = base + u32::from(l);
                    if range.state != 0 {
                        self.link_suffix(range.state, child, l);
                    }
                    if l != 0 {
                        next_level.push(LevelRange {
                            state: child,
                            begin: bounds[i],
                            end: bounds[i + 1],
                        });
                    }
                }
            }
            depth += 1;
            level = next_level;
        }
    }

    /// Sets `suffix_link[child]` by walking the parent's failure chain until
    /// some state has an `label`-transition; root if none does.
    fn link_suffix(&mut self, state: u32, child: u32, label: u8) {
        let mut suffix = self.suffix_link[state as usize];
        loop {
            let target = self.base[suffix as usize] + u32::from(label);
            if self.check[target as usize] == suffix {
                self.suffix_link[child as usize] = target;
                break;
            }
            if suffix == 0 {
                break;
            }
            suffix = self.suffix_link[suffix as usize];
        }
    }
}

impl<V> Default for Builder<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a [`Searcher`] from a dictionary file, one pattern per line.
///
/// Lines are trimmed; empty lines and lines starting with `#` are skipped.
/// Each remaining line becomes a pattern whose value is the line itself.
///
/// # Examples
///
/// ```no_run
/// let searcher = libaho::aho::from_dict_file("dictionary.txt").unwrap();
/// assert!(searcher.cover("some text").len() <= searcher.num_patterns());
/// ```
pub fn from_dict_file(path: impl AsRef<Path>) -> io::Result<Searcher<String>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut builder = Builder::new();

    // Calling read_line repeatedly reuses one buffer instead of allocating
    // a fresh string per line.
    let mut buf = String::with_capacity(80);
    loop {
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        let line = buf.trim();
        if !line.is_empty() && !is_comment(line) {
            builder.add(line, line.to_string());
        }
        buf.clear();
    }
    Ok(builder.build())
}

/// Returns true if this line is a comment.
fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}
