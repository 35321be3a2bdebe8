//! Example: compiling a small dictionary and querying it three ways.
//!
//! Builds a searcher over a handful of words, then shows exact lookup,
//! prefix probing, and substring coverage of a text. A tracing subscriber
//! is installed so builder diagnostics (e.g. dropped duplicates) are
//! visible on stderr.
//!
//! Run with: cargo run --example cover

use libaho::aho::Builder;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let words = ["he", "she", "his", "hers", "hero", "she"];
    let mut builder = Builder::new();
    for w in words {
        builder.add(w, w);
    }
    let searcher = builder.build();
    println!("compiled: {searcher:?}");

    // Exact lookup
    println!("\nExact lookup:");
    for word in ["he", "her", "hers", "hero", "heroes"] {
        match searcher.exact(word) {
            Some(v) => println!("  {word}: yes ({v})"),
            None => println!("  {word}: no"),
        }
    }

    // Prefix probing
    println!("\nPrefix probing:");
    for prefix in ["h", "her", "sh", "shi", "x"] {
        let hit = if searcher.prefix(prefix) { "yes" } else { "no" };
        println!("  {prefix}*: {hit}");
    }

    // Substring coverage
    let text = "ushers cheer their hero";
    println!("\nPatterns covered by {text:?}:");
    for v in searcher.cover(text) {
        println!("  {v}");
    }
}
