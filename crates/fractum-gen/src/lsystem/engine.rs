//! String expansion and geometric characterization for a loaded grammar.

use glam::DVec2;

use super::grammar::{Grammar, GrammarError};
use super::turtle::{self, Bounds, Segment, TurtlePath};
use crate::random::RandomStream;

/// Expands a [`Grammar`] and measures the turtle geometry of the result.
///
/// `randomness` controls both stochastic effects: during expansion each
/// symbol with a rule is rewritten only when a fresh draw exceeds it, and
/// during interpretation each turn is scaled by `1 + uniform(-r, r)`.
pub struct LSystem {
    grammar: Grammar,
    randomness: f64,
    stream: RandomStream,
}

impl LSystem {
    /// Create an engine with zero randomness.
    pub fn new(grammar: Grammar, stream: RandomStream) -> Self {
        Self {
            grammar,
            randomness: 0.0,
            stream,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn randomness(&self) -> f64 {
        self.randomness
    }

    /// Set the rewrite-skip probability and turn jitter amplitude.
    ///
    /// Values outside `[0, 1]` are stored as given: below zero always rewrites,
    /// above one never rewrites, and turn jitter uses the magnitude.
    pub fn set_randomness(&mut self, randomness: f64) {
        if !(0.0..=1.0).contains(&randomness) {
            tracing::warn!(randomness, "randomness outside [0, 1]");
        }
        self.randomness = randomness;
    }

    /// Apply the rules `iterations` times, starting from the axiom.
    ///
    /// Each pass reads the previous string and builds a new one. With
    /// `randomness <= 0` no draws are taken and the result depends only on
    /// `iterations`.
    pub fn expand(&mut self, iterations: u32) -> String {
        let mut current = self.grammar.axiom().to_string();

        for pass in 0..iterations {
            let mut next = String::with_capacity(current.len() * 2);
            for symbol in current.chars() {
                match self.grammar.rule(symbol) {
                    Some(replacement) if rewrite(&mut self.stream, self.randomness) => {
                        next.push_str(replacement)
                    }
                    _ => next.push(symbol),
                }
            }
            tracing::trace!(pass, len = next.len(), "expansion pass");
            current = next;
        }

        tracing::debug!(
            iterations,
            len = current.len(),
            randomness = self.randomness,
            "expanded L-system"
        );
        current
    }

    /// Bounding box of every point the turtle visits while interpreting `symbols`.
    ///
    /// The box starts at the origin, so it contains `(0, 0)` even for strings
    /// that never move. Turn jitter is drawn here independently of any other
    /// walk, so with non-zero randomness a renderer re-walking the string will
    /// not trace exactly this box; use [`LSystem::trace`] when they must agree.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnbalancedBracket`] if a `]` has no matching `[`.
    pub fn compute_bounds(&mut self, symbols: &str) -> Result<Bounds, GrammarError> {
        let randomness = self.randomness.abs();
        let stream = &mut self.stream;
        let mut bounds = Bounds::at(DVec2::ZERO);

        turtle::walk(
            symbols,
            &self.grammar,
            |angle| jittered(stream, angle, randomness),
            |_, end| bounds.include(end),
        )?;

        Ok(bounds)
    }

    /// Walk `symbols` once, returning the drawn segments and their exact bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnbalancedBracket`] if a `]` has no matching `[`.
    pub fn trace(&mut self, symbols: &str) -> Result<TurtlePath, GrammarError> {
        let randomness = self.randomness.abs();
        let stream = &mut self.stream;
        let mut segments = Vec::new();
        let mut bounds = Bounds::at(DVec2::ZERO);

        turtle::walk(
            symbols,
            &self.grammar,
            |angle| jittered(stream, angle, randomness),
            |start, end| {
                bounds.include(end);
                segments.push(Segment { start, end });
            },
        )?;

        Ok(TurtlePath { segments, bounds })
    }
}

fn rewrite(stream: &mut RandomStream, randomness: f64) -> bool {
    if randomness <= 0.0 {
        true
    } else if randomness >= 1.0 {
        false
    } else {
        stream.unit() > randomness
    }
}

fn jittered(stream: &mut RandomStream, angle: f64, randomness: f64) -> f64 {
    if randomness == 0.0 {
        angle
    } else {
        angle * (1.0 + stream.uniform(-randomness, randomness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsystem::Preset;

    const EPSILON: f64 = 1e-9;

    fn koch() -> LSystem {
        let grammar = Grammar::parse("F 60\nF -> F+F--F+F").unwrap();
        LSystem::new(grammar, RandomStream::seeded(42))
    }

    #[test]
    fn test_zero_iterations_is_axiom() {
        assert_eq!(koch().expand(0), "F");
    }

    #[test]
    fn test_koch_expansion() {
        let mut lsys = koch();
        assert_eq!(lsys.expand(1), "F+F--F+F");
        assert_eq!(
            lsys.expand(2),
            "F+F--F+F+F+F--F+F--F+F--F+F+F+F--F+F"
        );
    }

    #[test]
    fn test_expansion_deterministic_without_randomness() {
        let mut lsys = koch();
        let first = lsys.expand(4);
        let second = lsys.expand(4);
        assert_eq!(first, second, "randomness = 0 must make expand a pure function of n");
        assert_eq!(first.matches('F').count(), 4usize.pow(4));
    }

    #[test]
    fn test_full_randomness_never_rewrites() {
        let mut lsys = koch();
        lsys.set_randomness(1.0);
        assert_eq!(lsys.expand(5), "F");
    }

    #[test]
    fn test_out_of_range_randomness_tolerated() {
        let mut lsys = koch();
        lsys.set_randomness(-0.5);
        assert_eq!(lsys.expand(1), "F+F--F+F");
        lsys.set_randomness(3.0);
        assert_eq!(lsys.expand(3), "F");
    }

    #[test]
    fn test_partial_randomness_skips_some_rewrites() {
        let mut lsys = koch();
        lsys.set_randomness(0.5);
        let full_len = koch().expand(4).len();
        let lengths: Vec<usize> = (0..10).map(|_| lsys.expand(4).len()).collect();
        assert!(
            lengths.iter().all(|&len| len < full_len),
            "randomness 0.5 should skip at least one rewrite at depth 4: {lengths:?}"
        );
        assert!(lengths.iter().all(|&len| len >= 1));
    }

    #[test]
    fn test_same_seed_same_stochastic_expansion() {
        let mut a = koch();
        let mut b = koch();
        a.set_randomness(0.3);
        b.set_randomness(0.3);
        assert_eq!(a.expand(4), b.expand(4));
    }

    #[test]
    fn test_unknown_symbols_copied_forward() {
        let grammar = Grammar::parse("XFY 90\nF -> FF").unwrap();
        let mut lsys = LSystem::new(grammar, RandomStream::seeded(1));
        assert_eq!(lsys.expand(2), "XFFFFY");
    }

    #[test]
    fn test_bounds_of_straight_line() {
        let grammar = Grammar::new("FFF", 90.0).with_step_length(2.0);
        let mut lsys = LSystem::new(grammar, RandomStream::seeded(1));
        let bounds = lsys.compute_bounds("FFF").unwrap();
        assert!(bounds.min.length() < EPSILON);
        assert!((bounds.max - DVec2::new(0.0, 6.0)).length() < EPSILON);
    }

    #[test]
    fn test_bounds_of_empty_string_is_origin() {
        let mut lsys = koch();
        let bounds = lsys.compute_bounds("+-XY").unwrap();
        assert_eq!(bounds, Bounds::at(DVec2::ZERO));
    }

    #[test]
    fn test_bounds_contain_origin_when_path_moves_away() {
        let grammar = Grammar::new("F", 90.0).with_initial_heading(45.0);
        let mut lsys = LSystem::new(grammar, RandomStream::seeded(1));
        let bounds = lsys.compute_bounds("FFFF").unwrap();
        assert!(bounds.contains(DVec2::ZERO));
        assert!(bounds.width() > 0.0 && bounds.height() > 0.0);
    }

    #[test]
    fn test_bounds_reject_unbalanced_bracket() {
        let mut lsys = koch();
        assert_eq!(
            lsys.compute_bounds("F+F]"),
            Err(GrammarError::UnbalancedBracket { position: 3 })
        );
    }

    #[test]
    fn test_koch_bounds_without_jitter() {
        let mut lsys = LSystem::new(
            Grammar::preset(Preset::KochCurve).with_step_length(1.0),
            RandomStream::seeded(0),
        );
        let expanded = lsys.expand(1);
        let bounds = lsys.compute_bounds(&expanded).unwrap();
        // F+F--F+F from heading 0 spans three units with a sqrt(3)/2 peak.
        assert!((bounds.max.x - 3.0).abs() < EPSILON, "got {bounds:?}");
        assert!((bounds.max.y - 3f64.sqrt() / 2.0).abs() < EPSILON, "got {bounds:?}");
        assert!(bounds.min.y.abs() < EPSILON);
    }

    #[test]
    fn test_trace_bounds_cover_every_segment() {
        let mut lsys = LSystem::new(Grammar::preset(Preset::KochCurve), RandomStream::seeded(9));
        lsys.set_randomness(0.2);
        let expanded = lsys.expand(3);
        let path = lsys.trace(&expanded).unwrap();
        assert_eq!(path.segments.len(), expanded.matches('F').count());
        for segment in &path.segments {
            assert!(path.bounds.contains(segment.start));
            assert!(path.bounds.contains(segment.end));
        }
    }

    #[test]
    fn test_jitter_changes_geometry() {
        let mut lsys = LSystem::new(Grammar::preset(Preset::KochCurve), RandomStream::seeded(5));
        let expanded = lsys.expand(3);
        let exact = lsys.compute_bounds(&expanded).unwrap();
        lsys.set_randomness(0.5);
        let jittered = lsys.compute_bounds(&expanded).unwrap();
        assert_ne!(exact, jittered, "turn jitter should perturb the bounds");
    }
}
