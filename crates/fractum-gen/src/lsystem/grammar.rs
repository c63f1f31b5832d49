//! Grammar definition: axiom, production rules, and turtle parameters.

use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Heading used when the grammar header omits it, in degrees (straight up).
pub const DEFAULT_INITIAL_HEADING: f64 = 90.0;

/// Distance the turtle advances per `F`/`G` unless overridden.
pub const DEFAULT_STEP_LENGTH: f64 = 10.0;

/// Errors raised while loading a grammar or interpreting an expanded string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrammarError {
    /// The text has no header line, or a header with no rule lines after it.
    #[error("grammar needs a header line and at least one rule, found {found} significant line(s)")]
    TooFewLines { found: usize },

    /// The header line carries an axiom but no turn angle.
    #[error("line {line}: header is missing the turn angle")]
    MissingAngle { line: usize },

    /// A numeric header field failed to parse.
    #[error("line {line}: {field} `{value}` is not a number")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// The header line has more than `axiom angle [heading]`.
    #[error("line {line}: unexpected header field `{extra}`")]
    MalformedHeader { line: usize, extra: String },

    /// A rule line is not of the form `symbol -> replacement`.
    #[error("line {line}: malformed rule `{text}`")]
    MalformedRule { line: usize, text: String },

    /// A `]` was reached with no saved turtle state to restore.
    #[error("unbalanced `]` at symbol {position}")]
    UnbalancedBracket { position: usize },
}

/// An L-system grammar together with the parameters of its turtle interpretation.
///
/// Symbols without a rule are inert: expansion copies them forward and the
/// turtle ignores them unless they are one of `F G + - [ ]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grammar {
    axiom: String,
    rules: HashMap<char, String>,
    turn_angle: f64,
    initial_heading: f64,
    step_length: f64,
}

impl Grammar {
    /// Create a grammar with no rules, the default heading, and the default step length.
    pub fn new(axiom: impl Into<String>, turn_angle: f64) -> Self {
        Self {
            axiom: axiom.into(),
            rules: HashMap::new(),
            turn_angle,
            initial_heading: DEFAULT_INITIAL_HEADING,
            step_length: DEFAULT_STEP_LENGTH,
        }
    }

    /// Add (or replace) the production for `symbol`.
    pub fn with_rule(mut self, symbol: char, replacement: impl Into<String>) -> Self {
        self.rules.insert(symbol, replacement.into());
        self
    }

    /// Set the heading the turtle starts with, in degrees.
    pub fn with_initial_heading(mut self, degrees: f64) -> Self {
        self.initial_heading = degrees;
        self
    }

    /// Set the distance covered by each `F`/`G`.
    pub fn with_step_length(mut self, step_length: f64) -> Self {
        self.step_length = step_length;
        self
    }

    /// Parse the line-oriented grammar text format.
    ///
    /// Blank lines and lines starting with `#` are skipped. The first remaining
    /// line is `axiom turn_angle [initial_heading]`; every following line is
    /// `symbol -> replacement`, split on the first `->`.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] describing the first malformed line, or
    /// [`GrammarError::TooFewLines`] when there is no rule line.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .collect();

        if lines.len() < 2 {
            return Err(GrammarError::TooFewLines { found: lines.len() });
        }

        let (header_line, header) = lines[0];
        let mut grammar = parse_header(header_line, header)?;

        for &(line, text) in &lines[1..] {
            let (symbol, replacement) = parse_rule(line, text)?;
            if grammar.rules.contains_key(&symbol) {
                tracing::warn!(line, %symbol, "duplicate rule replaces earlier production");
            }
            grammar.rules.insert(symbol, replacement);
        }

        Ok(grammar)
    }

    /// Build one of the bundled grammars.
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::KochCurve => Grammar::new("F", 60.0)
                .with_rule('F', "F+F--F+F")
                .with_initial_heading(0.0)
                .with_step_length(5.0),
            Preset::SierpinskiTriangle => Grammar::new("F-G-G", 120.0)
                .with_rule('F', "F-G+F+G-F")
                .with_rule('G', "GG")
                .with_initial_heading(0.0)
                .with_step_length(4.0),
            Preset::SierpinskiCarpet => Grammar::new("F", 90.0)
                .with_rule('F', "F+F-F-FF-F-F-fF")
                .with_initial_heading(0.0)
                .with_step_length(3.0),
        }
    }

    /// The start string.
    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    /// The replacement for `symbol`, if it has a production.
    pub fn rule(&self, symbol: char) -> Option<&str> {
        self.rules.get(&symbol).map(String::as_str)
    }

    /// Number of productions.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Base turn angle for `+`/`-`, in degrees.
    pub fn turn_angle(&self) -> f64 {
        self.turn_angle
    }

    /// Starting heading, in degrees.
    pub fn initial_heading(&self) -> f64 {
        self.initial_heading
    }

    /// Distance per `F`/`G`.
    pub fn step_length(&self) -> f64 {
        self.step_length
    }
}

fn parse_header(line: usize, header: &str) -> Result<Grammar, GrammarError> {
    let mut fields = header.split_whitespace();

    // The header is non-empty after trimming, so there is always an axiom.
    let axiom = fields.next().unwrap_or_default();
    let angle = fields.next().ok_or(GrammarError::MissingAngle { line })?;
    let turn_angle = parse_number(line, "turn angle", angle)?;

    let mut grammar = Grammar::new(axiom, turn_angle);
    if let Some(heading) = fields.next() {
        grammar.initial_heading = parse_number(line, "initial heading", heading)?;
    }
    if let Some(extra) = fields.next() {
        return Err(GrammarError::MalformedHeader {
            line,
            extra: extra.to_string(),
        });
    }

    Ok(grammar)
}

/// Parse a finite number; `NaN` and infinities are rejected like any other bad token.
fn parse_number(line: usize, field: &'static str, value: &str) -> Result<f64, GrammarError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| GrammarError::InvalidNumber {
            line,
            field,
            value: value.to_string(),
        })
}

fn parse_rule(line: usize, text: &str) -> Result<(char, String), GrammarError> {
    let malformed = || GrammarError::MalformedRule {
        line,
        text: text.to_string(),
    };

    let (key, replacement) = text.split_once("->").ok_or_else(malformed)?;
    let mut chars = key.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok((symbol, replacement.trim().to_string())),
        _ => Err(malformed()),
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Writes the grammar back in the text format accepted by [`Grammar::parse`].
///
/// Rules are emitted sorted by symbol. The step length is not part of the
/// text format and is not written.
impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} {}",
            self.axiom, self.turn_angle, self.initial_heading
        )?;
        let mut rules: Vec<_> = self.rules.iter().collect();
        rules.sort_by_key(|(symbol, _)| **symbol);
        for (symbol, replacement) in rules {
            writeln!(f, "{symbol} -> {replacement}")?;
        }
        Ok(())
    }
}

/// Grammars bundled with the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Triadic Koch curve.
    KochCurve,
    /// Sierpinski triangle drawn with two edge symbols.
    SierpinskiTriangle,
    /// Sierpinski carpet.
    SierpinskiCarpet,
}

impl Preset {
    /// Every bundled preset.
    pub const ALL: [Preset; 3] = [
        Preset::KochCurve,
        Preset::SierpinskiTriangle,
        Preset::SierpinskiCarpet,
    ];

    /// Stable snake_case name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Preset::KochCurve => "koch_curve",
            Preset::SierpinskiTriangle => "sierpinski_triangle",
            Preset::SierpinskiCarpet => "sierpinski_carpet",
        }
    }

    /// Look up a preset by its [`Preset::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}
