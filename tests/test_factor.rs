mod support;

use cfg_ll1::factor::{left_factor, left_factor_bounded};
use cfg_ll1::predict::PredictionTable;
use cfg_ll1::{Grammar, TransformError};

use support::{assert_left_factored, language_upto, nt, t};

#[test]
fn factors_shared_leading_terminal() {
    // S -> a B | a C
    let grammar = Grammar::builder()
        .terminals(["a", "b", "c"])
        .start("S")
        .rule("S")
        .rhs([t("a"), nt("B")])
        .rhs([t("a"), nt("C")])
        .rule("B")
        .rhs([t("b")])
        .rule("C")
        .rhs([t("c")])
        .build()
        .unwrap();

    assert!(PredictionTable::build(&grammar).is_err());

    let (factored, provenance) = left_factor(&grammar).unwrap();

    assert_left_factored(&factored);
    assert_eq!(factored.alternatives("S"), [vec![t("a"), nt("S'")]]);
    assert_eq!(factored.alternatives("S'"), [vec![nt("B")], vec![nt("C")]]);
    assert_eq!(provenance.origin_of("S'"), Some("S"));
    assert_eq!(language_upto(&grammar, 4), language_upto(&factored, 4));
    assert!(PredictionTable::build(&factored).is_ok());
}

#[test]
fn empty_suffix_becomes_epsilon_alternative() {
    // S -> a b | a
    let grammar = Grammar::builder()
        .terminals(["a", "b"])
        .start("S")
        .rule("S")
        .rhs([t("a"), t("b")])
        .rhs([t("a")])
        .build()
        .unwrap();

    let (factored, _) = left_factor(&grammar).unwrap();

    assert_eq!(factored.alternatives("S"), [vec![t("a"), nt("S'")]]);
    assert_eq!(factored.alternatives("S'"), [vec![t("b")], vec![]]);
    assert_eq!(language_upto(&grammar, 3), language_upto(&factored, 3));
}

#[test]
fn takes_the_longest_common_prefix() {
    // S -> a b c | a b d
    let grammar = Grammar::builder()
        .terminals(["a", "b", "c", "d"])
        .start("S")
        .rule("S")
        .rhs([t("a"), t("b"), t("c")])
        .rhs([t("a"), t("b"), t("d")])
        .build()
        .unwrap();

    let (factored, _) = left_factor(&grammar).unwrap();

    assert_eq!(factored.alternatives("S"), [vec![t("a"), t("b"), nt("S'")]]);
    assert_eq!(factored.alternatives("S'"), [vec![t("c")], vec![t("d")]]);
}

#[test]
fn factored_grammars_pass_through() {
    let grammar = Grammar::builder()
        .terminals(["a", "b"])
        .start("S")
        .rule("S")
        .rhs([t("a"), nt("A")])
        .rhs([t("b")])
        .rule("A")
        .rhs([t("b")])
        .build()
        .unwrap();

    let (factored, provenance) = left_factor(&grammar).unwrap();
    assert_eq!(factored, grammar);
    assert!(provenance.is_empty());
}

#[test]
fn cascading_factorization_terminates() {
    // Factoring S introduces a suffix nonterminal that itself needs
    // factoring.
    let grammar = Grammar::builder()
        .terminals(["a", "b", "c", "d"])
        .start("S")
        .rule("S")
        .rhs([t("a"), t("b"), t("c")])
        .rhs([t("a"), t("b"), t("d")])
        .rhs([t("a"), t("c")])
        .build()
        .unwrap();

    let (factored, _) = left_factor(&grammar).unwrap();
    assert_left_factored(&factored);
    assert_eq!(language_upto(&grammar, 4), language_upto(&factored, 4));
}

#[test]
fn zero_bound_reports_nontermination() {
    let grammar = Grammar::builder()
        .terminals(["a", "b"])
        .start("S")
        .rule("S")
        .rhs([t("a"), t("b")])
        .rhs([t("a")])
        .build()
        .unwrap();

    assert!(matches!(
        left_factor_bounded(&grammar, 0),
        Err(TransformError::NonTerminatingFactorization { bound: 0, .. })
    ));
}
