//! A small benchmarking CLI, mirroring the original `tests.c` harness:
//! reads newline-delimited words from a file, times an insert pass and a
//! lookup pass, and reports the tree's memory footprint. An optional second
//! argument also runs a timed removal pass.
//!
//! This binary's only contract with the library is its four public
//! operations (`new`, `put`, `get`, `remove`); it carries none of the core
//! tree logic itself.

use std::fs;
use std::process::ExitCode;
use std::time::Instant;

use radixart::AdaptiveRadixTree;

fn read_words(path: &str) -> Vec<Vec<u8>> {
    let contents = fs::read(path).unwrap_or_else(|e| {
        eprintln!("wordbench: could not read {path}: {e}");
        std::process::exit(1);
    });
    contents
        .split(|&b| b == b'\n')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_vec())
        .collect()
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: wordbench <wordlist> [lookup-key]");
        return ExitCode::FAILURE;
    }

    let words = read_words(&args[1]);
    let mut tree: AdaptiveRadixTree<Vec<u8>> = AdaptiveRadixTree::new();

    let start = Instant::now();
    for word in &words {
        if word.len() > 255 {
            continue;
        }
        let mut val = word.clone();
        val.extend_from_slice(b"-val");
        tree.put(word, val);
    }
    let insert_elapsed = start.elapsed();
    println!("Inserted {} words.", words.len());
    println!("Memory: {} bytes.", tree.memory_bytes());
    println!("Insert pass finished in {:?}.", insert_elapsed);

    let start = Instant::now();
    let mut found = 0usize;
    for word in &words {
        if tree.get(word).is_some() {
            found += 1;
        }
    }
    let get_elapsed = start.elapsed();
    println!("Retrieved {found} words.");
    println!("Get pass finished in {:?}.", get_elapsed);

    if let Some(key) = args.get(2) {
        let start = Instant::now();
        let mut removed = 0usize;
        for word in &words {
            if tree.remove(word) {
                removed += 1;
            }
        }
        let remove_elapsed = start.elapsed();
        println!("Removed {removed} words.");
        println!("Remove pass finished in {:?}.", remove_elapsed);
        println!("Memory after removal: {} bytes.", tree.memory_bytes());

        match tree.get(key.as_bytes()) {
            Some(v) => println!("{}: {}", key, String::from_utf8_lossy(v)),
            None => println!("{key}: not found"),
        }
    }

    ExitCode::SUCCESS
}
