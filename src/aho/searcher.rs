use hashbrown::HashSet;

/// The compiled, immutable pattern-matching automaton.
///
/// Produced by [`Builder::build`](super::Builder::build). All operations are
/// read-only, so a searcher can be shared freely across threads (it is
/// `Send + Sync` whenever the value type is).
///
/// States are slots in three parallel arrays; the transition from state `s`
/// on byte `c` leads to `base[s] + c` and is valid iff that slot's `check`
/// entry points back at `s`. Failure links let [`cover`](Searcher::cover)
/// fall back to the longest live suffix instead of restarting at the root.
pub struct Searcher<V> {
    pub(crate) base: Vec<u32>,
    pub(crate) check: Vec<u32>,
    pub(crate) suffix_link: Vec<u32>,
    pub(crate) values: Vec<Option<V>>,
}

impl<V> Searcher<V> {
    pub(crate) fn new(
        base: Vec<u32>,
        check: Vec<u32>,
        suffix_link: Vec<u32>,
        values: Vec<Option<V>>,
    ) -> Self {
        Self {
            base,
            check,
            suffix_link,
            values,
        }
    }

    /// Follows `word` byte by byte from the root.
    ///
    /// Returns the reached state, or `None` as soon as a byte has no
    /// transition.
    fn prefix_walk(&self, word: &[u8]) -> Option<u32> {
        let mut state = 0u32;
        for &c in word {
            let next = self.base[state as usize] + u32::from(c);
            if next as usize >= self.check.len() || self.check[next as usize] != state {
                return None;
            }
            state = next;
        }
        Some(state)
    }

    /// Looks up `word` as a whole pattern and returns its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use libaho::aho::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.add("hello", "greeting");
    /// let searcher = builder.build();
    /// assert_eq!(searcher.exact("hello"), Some(&"greeting"));
    /// assert_eq!(searcher.exact("hell"), None);
    /// ```
    pub fn exact(&self, word: impl AsRef<[u8]>) -> Option<&V> {
        let state = self.prefix_walk(word.as_ref())?;
        // A stored pattern ends in a terminal child on the sentinel label 0,
        // whose base holds the value-table index.
        let terminal = self.base[state as usize];
        if (terminal as usize) < self.check.len() && self.check[terminal as usize] == state {
            self.values[self.base[terminal as usize] as usize].as_ref()
        } else {
            None
        }
    }

    /// Returns true if `word` is a live trie path: a stored pattern or a
    /// prefix of one.
    ///
    /// ```
    /// use libaho::aho::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.add("world", ());
    /// let searcher = builder.build();
    /// assert!(searcher.prefix("wor"));
    /// assert!(searcher.prefix("world"));
    /// assert!(!searcher.prefix("worlds"));
    /// ```
    pub fn prefix(&self, word: impl AsRef<[u8]>) -> bool {
        self.prefix_walk(word.as_ref()).is_some()
    }

    /// Reports the values of all dictionary patterns occurring in `text` as
    /// substrings.
    ///
    /// The scan is a single forward pass. At each position the automaton
    /// advances along the deepest live suffix; the emit walk then follows
    /// the failure chain outward so shorter patterns ending at the same
    /// position are found too. Each distinct pattern is reported at most
    /// once, at its first occurrence; values appear in text order, deepest
    /// match first within one position.
    ///
    /// # Examples
    ///
    /// ```
    /// use libaho::aho::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.add("he", 0).add("she", 1).add("his", 2).add("hers", 3);
    /// let searcher = builder.build();
    /// assert_eq!(searcher.cover("ushers"), vec![&1, &0, &3]);
    /// ```
    pub fn cover(&self, text: impl AsRef<[u8]>) -> Vec<&V> {
        let mut out = Vec::new();
        let mut seen: HashSet<u32> = HashSet::new();
        let mut state = 0u32;
        for &c in text.as_ref() {
            // Advance: take the transition, or fall back along failure
            // links; at the root a missing edge just stays put.
            loop {
                let next = self.base[state as usize] + u32::from(c);
                if (next as usize) < self.check.len() && self.check[next as usize] == state {
                    state = next;
                    break;
                }
                if state == 0 {
                    break;
                }
                state = self.suffix_link[state as usize];
            }

            // Emit: report every pattern ending here. The seen set both
            // stops the walk at previously visited states (root included)
            // and deduplicates reports across the whole text.
            let mut cursor = state;
            while seen.insert(cursor) {
                let terminal = self.base[cursor as usize];
                if (terminal as usize) < self.check.len()
                    && self.check[terminal as usize] == cursor
                {
                    if let Some(value) = self.values[self.base[terminal as usize] as usize].as_ref()
                    {
                        out.push(value);
                    }
                }
                cursor = self.suffix_link[cursor as usize];
            }
        }
        out
    }

    /// Returns the number of slots in the double array, counting unused
    /// ones.
    pub fn num_slots(&self) -> usize {
        self.base.len()
    }

    /// Returns the number of distinct patterns in the dictionary.
    pub fn num_patterns(&self) -> usize {
        self.values.len() - 1
    }
}

impl<V> std::fmt::Debug for Searcher<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("num_patterns", &self.num_patterns())
            .field("num_slots", &self.num_slots())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aho::Builder;

    fn searcher_of(words: &[&str]) -> Searcher<String> {
        let mut builder = Builder::new();
        for w in words {
            builder.add(w, (*w).to_string());
        }
        builder.build()
    }

    fn sorted_covers(searcher: &Searcher<String>, text: &str) -> Vec<String> {
        let mut found: Vec<String> = searcher.cover(text).into_iter().cloned().collect();
        found.sort();
        found
    }

    #[test]
    fn exact_and_prefix_basics() {
        let searcher = searcher_of(&["hello", "world"]);

        assert_eq!(searcher.exact("hello"), Some(&"hello".to_string()));
        assert_eq!(searcher.exact("world"), Some(&"world".to_string()));
        assert_eq!(searcher.exact("helm"), None);
        assert_eq!(searcher.exact("hell"), None);

        assert!(searcher.prefix("hell"));
        assert!(searcher.prefix("w"));
        assert!(!searcher.prefix("helm"));
        assert!(!searcher.prefix("wa"));
    }

    #[test]
    fn multibyte_patterns_match_bytewise() {
        let searcher = searcher_of(&["犹豫就会败北"]);
        assert_eq!(searcher.exact("犹豫就会败北"), Some(&"犹豫就会败北".to_string()));
        assert!(searcher.prefix("犹豫"));
        assert!(!searcher.prefix("败北"));
    }

    #[test]
    fn cover_finds_every_embedded_pattern() {
        let words = [
            "abash",
            "abashed",
            "unabashed",
            "atomical",
            "atomically",
            "anatomical",
            "anatomically",
        ];
        let searcher = searcher_of(&words);
        let found = sorted_covers(&searcher, "unabashed x anatomically");
        let mut expected: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn cover_with_interleaved_noise() {
        let words = ["床前", "月光", "明月", "地上", "霜", "是"];
        let searcher = searcher_of(&words);
        let found = sorted_covers(&searcher, "床前明月光x，a疑是地上霜");
        assert_eq!(found.len(), words.len());
    }

    #[test]
    fn nested_patterns_all_reported() {
        let searcher = searcher_of(&["a", "ab", "abc"]);
        let found = sorted_covers(&searcher, "abc");
        assert_eq!(found, vec!["a".to_string(), "ab".to_string(), "abc".to_string()]);
    }

    #[test]
    fn classic_ushers_example() {
        let searcher = searcher_of(&["he", "she", "his", "hers"]);
        let found = sorted_covers(&searcher, "ushers");
        assert_eq!(
            found,
            vec!["he".to_string(), "hers".to_string(), "she".to_string()]
        );
    }

    #[test]
    fn cover_emission_order_is_deepest_first_in_text_order() {
        let searcher = searcher_of(&["he", "she", "hers"]);
        let found: Vec<&String> = searcher.cover("ushers");
        assert_eq!(found, vec![&"she".to_string(), &"he".to_string(), &"hers".to_string()]);
    }

    #[test]
    fn repeated_occurrences_are_reported_once() {
        let searcher = searcher_of(&["ab"]);
        assert_eq!(searcher.cover("ab ab ab").len(), 1);
    }

    #[test]
    fn empty_text_yields_nothing() {
        let searcher = searcher_of(&["abc"]);
        assert!(searcher.cover("").is_empty());
    }

    #[test]
    fn text_shorter_than_any_pattern_yields_nothing() {
        let searcher = searcher_of(&["abcdef", "bcdefg"]);
        assert!(searcher.cover("abc").is_empty());
    }

    #[test]
    fn single_pattern_dictionary() {
        let searcher = searcher_of(&["lonely"]);
        assert_eq!(searcher.exact("lonely"), Some(&"lonely".to_string()));
        assert_eq!(searcher.cover("a lonely word").len(), 1);
        assert!(searcher.cover("no match here").is_empty());
    }

    #[test]
    fn proper_suffix_pattern_is_found_inside_the_longer_one() {
        let searcher = searcher_of(&["bcd", "abcde"]);
        let found = sorted_covers(&searcher, "abcde");
        assert_eq!(found, vec!["abcde".to_string(), "bcd".to_string()]);
    }

    #[test]
    fn text_with_nul_bytes_matches_nothing_spurious() {
        let mut builder = Builder::new();
        builder.add("ab", 0u32);
        let searcher = builder.build();
        let text = [b'x', 0, b'a', b'b', 0, b'y'];
        let found = searcher.cover(text);
        assert_eq!(found, vec![&0u32]);
    }

    #[test]
    fn values_are_per_pattern() {
        let mut builder = Builder::new();
        builder.add("alpha", 10u64).add("beta", 20).add("gamma", 30);
        let searcher = builder.build();
        assert_eq!(searcher.exact("beta"), Some(&20));
        let mut found: Vec<u64> = searcher.cover("gamma rays, alpha decay").into_iter().copied().collect();
        found.sort_unstable();
        assert_eq!(found, vec![10, 30]);
    }

    #[test]
    fn debug_is_a_summary() {
        let searcher = searcher_of(&["one", "two"]);
        let rendered = format!("{searcher:?}");
        assert!(rendered.contains("num_patterns"));
        assert!(rendered.contains("2"));
    }

    #[test]
    fn searcher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Searcher<String>>();
    }
}
