//! Definitions of the context-free grammar type and its productions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter;

use crate::diagnostic::GrammarError;
use crate::symbol::Symbol;

/// A production body. Epsilon productions are stored as empty bodies.
pub type Body = Vec<Symbol>;

/// Immutable representation of a context-free grammar.
///
/// A grammar is built once, through [`GrammarBuilder`], and never mutated;
/// every transformation in this crate returns a new `Grammar` value.
/// Nonterminals keep their declaration order, which doubles as the
/// deterministic total order used by the transformations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grammar {
    start: String,
    terminals: BTreeSet<String>,
    nonterminals: Vec<String>,
    index: BTreeMap<String, usize>,
    alternatives: Vec<Vec<Body>>,
}

/// Standard owned production representation, used in derivation traces
/// and error reports.
#[derive(Clone, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Production {
    /// The production's head nonterminal.
    pub head: String,
    /// The production's body symbols. Empty for an epsilon production.
    pub body: Vec<Symbol>,
}

/// Borrowed view of a production.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProductionRef<'a> {
    /// The production's head nonterminal.
    pub head: &'a str,
    /// The production's body symbols.
    pub body: &'a [Symbol],
}

impl ProductionRef<'_> {
    /// Copies this production into an owned value.
    pub fn to_production(self) -> Production {
        Production {
            head: self.head.to_string(),
            body: self.body.to_vec(),
        }
    }
}

/// Records where freshly introduced nonterminals came from.
///
/// Every transformation returns a `Provenance` mapping each nonterminal it
/// introduced back to the symbol it was derived from. Maps from consecutive
/// stages may be merged, and [`fn resolve`] follows chains through merged
/// maps back to an original symbol.
///
/// [`fn resolve`]: Provenance::resolve
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Provenance {
    map: BTreeMap<String, String>,
}

impl Provenance {
    /// Creates an empty provenance map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fresh symbol and its origin.
    pub fn record(&mut self, fresh: impl Into<String>, origin: impl Into<String>) {
        self.map.insert(fresh.into(), origin.into());
    }

    /// Returns the direct origin of a symbol, if it was introduced by a
    /// transformation.
    pub fn origin_of(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Follows origin links until an original symbol is reached.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        while let Some(origin) = self.map.get(current) {
            current = origin;
        }
        current
    }

    /// Absorbs the provenance of a later transformation stage.
    pub fn merge(&mut self, later: Provenance) {
        self.map.extend(later.map);
    }

    /// Iterates over `(fresh, origin)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Checks whether no fresh symbols were recorded.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Grammar {
    /// Starts building a grammar.
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    pub(crate) fn from_parts(
        start: String,
        terminals: BTreeSet<String>,
        nonterminals: Vec<String>,
        alternatives: Vec<Vec<Body>>,
    ) -> Self {
        debug_assert_eq!(nonterminals.len(), alternatives.len());
        debug_assert!(nonterminals.contains(&start));
        let index = nonterminals
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Grammar {
            start,
            terminals,
            nonterminals,
            index,
            alternatives,
        }
    }

    /// Returns the start symbol's name.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Iterates over terminal names.
    pub fn terminals(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(String::as_str)
    }

    /// Iterates over nonterminal names in declaration order.
    pub fn nonterminals(&self) -> impl Iterator<Item = &str> {
        self.nonterminals.iter().map(String::as_str)
    }

    /// Returns the number of nonterminals.
    pub fn num_nonterminals(&self) -> usize {
        self.nonterminals.len()
    }

    /// Returns the declaration-order index of a nonterminal.
    pub fn nonterminal_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Checks whether the given name is a declared terminal.
    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminals.contains(name)
    }

    /// Checks whether the given name is a declared nonterminal.
    pub fn is_nonterminal(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the alternative bodies of a nonterminal, in declaration
    /// order. Unknown names have no alternatives.
    pub fn alternatives(&self, nonterminal: &str) -> &[Body] {
        self.index
            .get(nonterminal)
            .map(|&i| &self.alternatives[i][..])
            .unwrap_or(&[])
    }

    /// Iterates over all productions, grouped by head in declaration order.
    pub fn productions(&self) -> impl Iterator<Item = ProductionRef<'_>> {
        self.nonterminals
            .iter()
            .zip(self.alternatives.iter())
            .flat_map(|(head, alts)| {
                alts.iter().map(move |body| ProductionRef {
                    head,
                    body: &body[..],
                })
            })
    }

    /// Returns the total number of productions.
    pub fn num_productions(&self) -> usize {
        self.alternatives.iter().map(Vec::len).sum()
    }

    /// Returns the total number of symbols across all bodies.
    pub fn num_body_symbols(&self) -> usize {
        self.alternatives
            .iter()
            .flat_map(|alts| alts.iter().map(Vec::len))
            .sum()
    }

    /// Checks whether any nonterminal has an epsilon production.
    pub fn has_epsilon_productions(&self) -> bool {
        self.alternatives
            .iter()
            .any(|alts| alts.iter().any(Vec::is_empty))
    }

    /// Names of nonterminals with at least one epsilon production.
    pub fn epsilon_producers(&self) -> Vec<&str> {
        self.nonterminals
            .iter()
            .zip(self.alternatives.iter())
            .filter(|(_, alts)| alts.iter().any(|body| body.is_empty()))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// All declared names, terminal and nonterminal. Fresh-name generation
    /// starts from this set.
    pub(crate) fn declared_names(&self) -> BTreeSet<String> {
        let mut names = self.terminals.clone();
        names.extend(self.nonterminals.iter().cloned());
        names
    }

    pub(crate) fn terminal_names(&self) -> BTreeSet<String> {
        self.terminals.clone()
    }
}

/// Derives a fresh nonterminal name from `base` by appending `'` until the
/// name is unused, and reserves it in `used`.
pub(crate) fn fresh_name(base: &str, used: &mut BTreeSet<String>) -> String {
    let mut name = format!("{}'", base);
    while used.contains(&name) {
        name.push('\'');
    }
    used.insert(name.clone());
    name
}

/// Removes duplicate bodies, keeping first occurrences.
pub(crate) fn dedup_bodies(bodies: &mut Vec<Body>) {
    let mut seen = BTreeSet::new();
    bodies.retain(|body| seen.insert(body.clone()));
}

impl fmt::Display for Grammar {
    /// Formats the grammar with one nonterminal per line, the start symbol
    /// first:
    ///
    /// ```text
    /// S -> a S b | ε
    /// A -> a
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start_first = iter::once(self.start.as_str())
            .chain(self.nonterminals().filter(|&name| name != self.start));
        for name in start_first {
            write!(f, "{} ->", name)?;
            for (i, body) in self.alternatives(name).iter().enumerate() {
                if i > 0 {
                    write!(f, " |")?;
                }
                if body.is_empty() {
                    write!(f, " ε")?;
                } else {
                    for sym in body {
                        write!(f, " {}", sym)?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.head)?;
        if self.body.is_empty() {
            write!(f, " ε")?;
        } else {
            for sym in &self.body {
                write!(f, " {}", sym)?;
            }
        }
        Ok(())
    }
}

/// Builder for grammars, in the usual rule-chaining style.
///
/// ```
/// use cfg_ll1::grammar::Grammar;
/// use cfg_ll1::symbol::Symbol;
///
/// let t = Symbol::terminal;
/// let nt = Symbol::nonterminal;
/// let grammar = Grammar::builder()
///     .terminals(["a", "b"])
///     .start("S")
///     .rule("S")
///     .rhs([t("a"), nt("S"), t("b")])
///     .rhs([Symbol::Epsilon])
///     .build()
///     .unwrap();
/// assert_eq!(grammar.alternatives("S").len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GrammarBuilder {
    start: Option<String>,
    terminals: BTreeSet<String>,
    nonterminals: Vec<String>,
    index: BTreeMap<String, usize>,
    alternatives: Vec<Vec<Body>>,
}

/// Builder state with a current head; created by [`GrammarBuilder::rule`].
#[derive(Clone, Debug)]
pub struct RuleBuilder {
    inner: GrammarBuilder,
    lhs: usize,
}

impl GrammarBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the start symbol. Also declares it as a nonterminal.
    pub fn start(mut self, name: &str) -> Self {
        self.declare(name);
        self.start = Some(name.to_string());
        self
    }

    /// Declares a terminal.
    pub fn terminal(mut self, name: &str) -> Self {
        self.terminals.insert(name.to_string());
        self
    }

    /// Declares several terminals.
    pub fn terminals<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.terminals.extend(names.into_iter().map(String::from));
        self
    }

    /// Declares a nonterminal without giving it productions. Useful for
    /// dead nonterminals, which diagnostics will flag.
    pub fn nonterminal(mut self, name: &str) -> Self {
        self.declare(name);
        self
    }

    fn declare(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.nonterminals.len();
        self.nonterminals.push(name.to_string());
        self.index.insert(name.to_string(), i);
        self.alternatives.push(vec![]);
        i
    }

    /// Starts adding productions for the given head.
    pub fn rule(mut self, lhs: &str) -> RuleBuilder {
        let lhs = self.declare(lhs);
        RuleBuilder { inner: self, lhs }
    }

    /// Validates the declarations and produces a grammar.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let start = self.start.ok_or(GrammarError::MissingStart)?;
        if let Some(name) = self
            .nonterminals
            .iter()
            .find(|name| self.terminals.contains(*name))
        {
            return Err(GrammarError::SymbolKindOverlap { name: name.clone() });
        }
        let mut alternatives = Vec::with_capacity(self.alternatives.len());
        for (head, alts) in self.nonterminals.iter().zip(self.alternatives) {
            let mut checked: Vec<Body> = Vec::with_capacity(alts.len());
            for body in alts {
                let body = normalize_epsilon(head, body)?;
                for sym in &body {
                    let defined = match sym {
                        Symbol::Terminal(name) => self.terminals.contains(name),
                        Symbol::NonTerminal(name) => self.index.contains_key(name),
                        Symbol::Epsilon => false,
                    };
                    if !defined {
                        return Err(GrammarError::UndefinedSymbol {
                            head: head.clone(),
                            symbol: sym.clone(),
                        });
                    }
                }
                if checked.contains(&body) {
                    return Err(GrammarError::DuplicateProduction {
                        production: Production {
                            head: head.clone(),
                            body,
                        },
                    });
                }
                checked.push(body);
            }
            alternatives.push(checked);
        }
        log::trace!(
            "built grammar: start={}, {} nonterminals, {} terminals",
            start,
            self.nonterminals.len(),
            self.terminals.len()
        );
        Ok(Grammar::from_parts(
            start,
            self.terminals,
            self.nonterminals,
            alternatives,
        ))
    }
}

/// Epsilon is only valid as the sole element of a body; such bodies are
/// normalized to empty sequences.
fn normalize_epsilon(head: &str, body: Body) -> Result<Body, GrammarError> {
    if !body.iter().any(|sym| *sym == Symbol::Epsilon) {
        return Ok(body);
    }
    if body.len() == 1 {
        return Ok(vec![]);
    }
    Err(GrammarError::MisplacedEpsilon {
        head: head.to_string(),
    })
}

impl RuleBuilder {
    /// Adds an alternative body for the current head.
    pub fn rhs(mut self, body: impl IntoIterator<Item = Symbol>) -> Self {
        self.inner.alternatives[self.lhs].push(body.into_iter().collect());
        self
    }

    /// Switches to a different head.
    pub fn rule(self, lhs: &str) -> RuleBuilder {
        self.inner.rule(lhs)
    }

    /// Declares the start symbol.
    pub fn start(self, name: &str) -> GrammarBuilder {
        self.inner.start(name)
    }

    /// Finishes the grammar.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        self.inner.build()
    }
}
