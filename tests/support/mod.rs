#![allow(dead_code)]

use std::collections::{BTreeSet, VecDeque};

use cfg_ll1::{Grammar, Symbol, Token};

pub fn t(name: &str) -> Symbol {
    Symbol::terminal(name)
}

pub fn nt(name: &str) -> Symbol {
    Symbol::nonterminal(name)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One token per character, positioned by index.
pub fn tokens(input: &str) -> Vec<Token> {
    input
        .chars()
        .enumerate()
        .map(|(i, c)| Token::new(c.to_string(), i))
        .collect()
}

/// Brute-force enumeration of the grammar's language, restricted to
/// sentences of at most `max_len` terminals. Expands leftmost nonterminals
/// breadth-first, pruning sentential forms that grow past the window.
pub fn language_upto(grammar: &Grammar, max_len: usize) -> BTreeSet<String> {
    let mut sentences = BTreeSet::new();
    let mut visited: BTreeSet<Vec<Symbol>> = BTreeSet::new();
    let mut queue: VecDeque<Vec<Symbol>> = VecDeque::new();

    let start = vec![nt(grammar.start())];
    visited.insert(start.clone());
    queue.push_back(start);

    let mut budget = 200_000usize;
    while let Some(form) = queue.pop_front() {
        assert!(budget > 0, "language enumeration budget exhausted");
        budget -= 1;

        let leftmost = form.iter().position(Symbol::is_nonterminal);
        let at = match leftmost {
            None => {
                if form.len() <= max_len {
                    sentences.insert(form.iter().map(Symbol::to_string).collect());
                }
                continue;
            }
            Some(at) => at,
        };
        let name = form[at].name().unwrap().to_string();
        for body in grammar.alternatives(&name) {
            let mut next = form[..at].to_vec();
            next.extend(body.iter().cloned());
            next.extend(form[at + 1..].iter().cloned());

            let terminal_count = next.iter().filter(|sym| sym.is_terminal()).count();
            if terminal_count > max_len || next.len() > max_len + 8 {
                continue;
            }
            if visited.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }
    sentences
}

/// Asserts that no two alternatives of any nonterminal share a leading
/// symbol.
pub fn assert_left_factored(grammar: &Grammar) {
    for name in grammar.nonterminals() {
        let alts = grammar.alternatives(name);
        for (i, a) in alts.iter().enumerate() {
            for b in &alts[i + 1..] {
                if let (Some(x), Some(y)) = (a.first(), b.first()) {
                    assert_ne!(
                        x, y,
                        "two alternatives of {} share the leading symbol {}",
                        name, x
                    );
                }
            }
        }
    }
}
