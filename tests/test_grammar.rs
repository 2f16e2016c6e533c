mod support;

use cfg_ll1::{Grammar, GrammarError, Symbol};

use support::{nt, t};

#[test]
fn builds_and_normalizes_epsilon() {
    let grammar = Grammar::builder()
        .terminals(["a", "b"])
        .start("S")
        .rule("S")
        .rhs([t("a"), nt("S"), t("b")])
        .rhs([Symbol::Epsilon])
        .build()
        .unwrap();

    assert_eq!(grammar.start(), "S");
    assert_eq!(grammar.alternatives("S").len(), 2);
    assert!(grammar.alternatives("S")[1].is_empty());
    assert!(grammar.has_epsilon_productions());
    assert_eq!(grammar.epsilon_producers(), vec!["S"]);
}

#[test]
fn rejects_undefined_nonterminal() {
    let result = Grammar::builder()
        .terminal("a")
        .start("S")
        .rule("S")
        .rhs([nt("B")])
        .build();

    assert_eq!(
        result.unwrap_err(),
        GrammarError::UndefinedSymbol {
            head: "S".to_string(),
            symbol: nt("B"),
        }
    );
}

#[test]
fn rejects_undefined_terminal() {
    let result = Grammar::builder()
        .terminal("a")
        .start("S")
        .rule("S")
        .rhs([t("x")])
        .build();

    assert!(matches!(
        result,
        Err(GrammarError::UndefinedSymbol { .. })
    ));
}

#[test]
fn rejects_terminal_nonterminal_overlap() {
    let result = Grammar::builder()
        .terminal("a")
        .start("S")
        .rule("S")
        .rhs([t("a")])
        .rule("a")
        .rhs([t("a")])
        .build();

    assert_eq!(
        result.unwrap_err(),
        GrammarError::SymbolKindOverlap {
            name: "a".to_string()
        }
    );
}

#[test]
fn rejects_epsilon_mixed_with_symbols() {
    let result = Grammar::builder()
        .terminal("a")
        .start("S")
        .rule("S")
        .rhs([Symbol::Epsilon, t("a")])
        .build();

    assert_eq!(
        result.unwrap_err(),
        GrammarError::MisplacedEpsilon {
            head: "S".to_string()
        }
    );
}

#[test]
fn rejects_missing_start() {
    let result = Grammar::builder()
        .terminal("a")
        .rule("S")
        .rhs([t("a")])
        .build();

    assert_eq!(result.unwrap_err(), GrammarError::MissingStart);
}

#[test]
fn rejects_duplicate_bodies() {
    let result = Grammar::builder()
        .terminal("a")
        .start("S")
        .rule("S")
        .rhs([t("a")])
        .rhs([t("a")])
        .build();

    assert!(matches!(
        result,
        Err(GrammarError::DuplicateProduction { .. })
    ));
}

#[test]
fn permits_dead_nonterminals() {
    let grammar = Grammar::builder()
        .terminal("a")
        .start("S")
        .nonterminal("D")
        .rule("S")
        .rhs([t("a")])
        .build()
        .unwrap();

    assert!(grammar.is_nonterminal("D"));
    assert!(grammar.alternatives("D").is_empty());
}

#[test]
fn displays_start_symbol_first() {
    let grammar = Grammar::builder()
        .terminals(["a", "b"])
        .rule("A")
        .rhs([t("b")])
        .start("S")
        .rule("S")
        .rhs([t("a"), nt("S"), t("b")])
        .rhs([Symbol::Epsilon])
        .build()
        .unwrap();

    let printed = grammar.to_string();
    let mut lines = printed.lines();
    assert_eq!(lines.next(), Some("S -> a S b | ε"));
    assert_eq!(lines.next(), Some("A -> b"));
}

#[test]
fn production_iteration_follows_declaration_order() {
    let grammar = Grammar::builder()
        .terminals(["a", "b"])
        .start("S")
        .rule("S")
        .rhs([nt("A"), t("b")])
        .rule("A")
        .rhs([t("a")])
        .build()
        .unwrap();

    let heads: Vec<&str> = grammar.productions().map(|prod| prod.head).collect();
    assert_eq!(heads, vec!["S", "A"]);
    assert_eq!(grammar.num_productions(), 2);
}
