mod support;

use cfg_ll1::pipeline::build_predictive_parser;
use cfg_ll1::predict::PredictionTable;
use cfg_ll1::{Diagnostic, Grammar, Lookahead, ParseError, Parser, Production, Symbol};

use support::{nt, t, tokens};

fn matched_parens() -> Grammar {
    // S -> a S b | ε
    Grammar::builder()
        .terminals(["a", "b"])
        .start("S")
        .rule("S")
        .rhs([t("a"), nt("S"), t("b")])
        .rhs([Symbol::Epsilon])
        .build()
        .unwrap()
}

fn production(head: &str, body: Vec<Symbol>) -> Production {
    Production {
        head: head.to_string(),
        body,
    }
}

#[test]
fn accepts_and_traces_the_leftmost_derivation() {
    let grammar = matched_parens();
    let table = PredictionTable::build(&grammar).unwrap();
    let parser = Parser::new(&table);

    let trace = parser.parse(&tokens("aabb")).unwrap();
    assert_eq!(
        trace,
        vec![
            production("S", vec![t("a"), nt("S"), t("b")]),
            production("S", vec![t("a"), nt("S"), t("b")]),
            production("S", vec![]),
        ]
    );
}

#[test]
fn accepts_the_empty_input() {
    let grammar = matched_parens();
    let table = PredictionTable::build(&grammar).unwrap();
    let parser = Parser::new(&table);

    let trace = parser.parse(&[]).unwrap();
    assert_eq!(trace, vec![production("S", vec![])]);
}

#[test]
fn reports_a_mismatch_past_the_end_of_input() {
    let grammar = matched_parens();
    let table = PredictionTable::build(&grammar).unwrap();
    let parser = Parser::new(&table);

    assert_eq!(
        parser.parse(&tokens("aab")),
        Err(ParseError::UnexpectedToken {
            expected: "b".to_string(),
            found: Lookahead::End,
            position: 3,
        })
    );
}

#[test]
fn reports_trailing_input() {
    let grammar = matched_parens();
    let table = PredictionTable::build(&grammar).unwrap();
    let parser = Parser::new(&table);

    // The nullable start derives ε on lookahead `b`, leaving the input
    // unconsumed.
    assert_eq!(
        parser.parse(&tokens("ba")),
        Err(ParseError::TrailingInput { position: 0 })
    );
}

#[test]
fn reports_missing_table_cells_with_expectations() {
    let grammar = matched_parens();
    let table = PredictionTable::build(&grammar).unwrap();
    let parser = Parser::new(&table);

    assert_eq!(
        parser.parse(&tokens("c")),
        Err(ParseError::NoApplicableProduction {
            nonterminal: "S".to_string(),
            found: Lookahead::terminal("c"),
            position: 0,
            expected: vec![
                Lookahead::terminal("a"),
                Lookahead::terminal("b"),
                Lookahead::End,
            ],
        })
    );
}

#[test]
fn expansion_cap_stops_runaway_derivations() {
    let grammar = matched_parens();
    let table = PredictionTable::build(&grammar).unwrap();
    let parser = Parser::new(&table).with_expansion_limit(0);

    assert_eq!(
        parser.parse(&tokens("ab")),
        Err(ParseError::ExpansionLimitExceeded {
            nonterminal: "S".to_string(),
            position: 0,
        })
    );
}

#[test]
fn pipeline_remediates_left_recursion_end_to_end() {
    support::init_logging();
    // E -> E + a | a
    let grammar = Grammar::builder()
        .terminals(["+", "a"])
        .start("E")
        .rule("E")
        .rhs([nt("E"), t("+"), t("a")])
        .rhs([t("a")])
        .build()
        .unwrap();

    let output = build_predictive_parser(&grammar).unwrap();

    assert!(output.diagnostics.contains(&Diagnostic::LeftRecursion {
        nonterminals: vec!["E".to_string()],
        approximate: false,
    }));
    support::assert_left_factored(&output.grammar);
    // Every introduced nonterminal traces back to the original E.
    for (fresh, _) in output.provenance.iter() {
        assert_eq!(output.provenance.resolve(fresh), "E");
    }

    let parser = Parser::new(&output.table);
    assert!(parser.parse(&tokens("a+a+a")).is_ok());
    assert!(parser.parse(&tokens("a")).is_ok());
    assert!(parser.parse(&tokens("+a")).is_err());
}
