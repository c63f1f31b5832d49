//! Turtle interpretation of expanded strings.
//!
//! `F` and `G` move forward drawing a line, `+` turns counter-clockwise, `-`
//! turns clockwise, `[` saves the turtle state and `]` restores it. Every
//! other symbol is ignored.

use glam::DVec2;

use super::grammar::{Grammar, GrammarError};
use crate::random::{det_cos, det_sin};

/// Axis-aligned bounding box of visited turtle positions.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// A degenerate box holding only `point`.
    pub fn at(point: DVec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow the box to contain `point`.
    pub fn include(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Largest uniform scale that fits the box inside a `width × height` viewport.
    ///
    /// A zero-extent axis does not constrain the scale; a box that is a single
    /// point yields `1.0`.
    pub fn fit_scale(&self, width: f64, height: f64) -> f64 {
        let sx = (self.width() > 0.0).then(|| width / self.width());
        let sy = (self.height() > 0.0).then(|| height / self.height());
        match (sx, sy) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        }
    }
}

/// One drawn line of a turtle path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

/// The lines drawn by a single turtle walk and the box enclosing them.
#[derive(Clone, Debug, PartialEq)]
pub struct TurtlePath {
    pub segments: Vec<Segment>,
    /// Starts at the origin, so it always contains `(0, 0)`.
    pub bounds: Bounds,
}

#[derive(Clone, Copy, Debug)]
struct TurtleState {
    position: DVec2,
    /// Degrees, counter-clockwise from +x.
    heading: f64,
}

/// Walk `symbols` from the origin, calling `on_move(start, end)` for each step.
///
/// `turn` maps the grammar's base angle to the angle actually applied, which
/// lets callers inject jitter. It is called once per `+`/`-`.
pub(crate) fn walk(
    symbols: &str,
    grammar: &Grammar,
    mut turn: impl FnMut(f64) -> f64,
    mut on_move: impl FnMut(DVec2, DVec2),
) -> Result<(), GrammarError> {
    let mut state = TurtleState {
        position: DVec2::ZERO,
        heading: grammar.initial_heading(),
    };
    let mut stack: Vec<TurtleState> = Vec::new();

    for (position, symbol) in symbols.chars().enumerate() {
        match symbol {
            'F' | 'G' => {
                let radians = state.heading.to_radians();
                let direction = DVec2::new(det_cos(radians), det_sin(radians));
                let end = state.position + direction * grammar.step_length();
                on_move(state.position, end);
                state.position = end;
            }
            '+' => state.heading += turn(grammar.turn_angle()),
            '-' => state.heading -= turn(grammar.turn_angle()),
            '[' => stack.push(state),
            ']' => {
                state = stack
                    .pop()
                    .ok_or(GrammarError::UnbalancedBracket { position })?;
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn square() -> Grammar {
        Grammar::new("F", 90.0).with_initial_heading(0.0).with_step_length(1.0)
    }

    fn collect(symbols: &str, grammar: &Grammar) -> Result<Vec<Segment>, GrammarError> {
        let mut segments = Vec::new();
        walk(symbols, grammar, |a| a, |start, end| {
            segments.push(Segment { start, end })
        })?;
        Ok(segments)
    }

    #[test]
    fn test_square_returns_to_origin() {
        let segments = collect("F+F+F+F", &square()).unwrap();
        assert_eq!(segments.len(), 4);
        let last = segments.last().unwrap().end;
        assert!(last.length() < EPSILON, "Square should close, ended at {last}");
        assert!((segments[1].end - DVec2::new(1.0, 1.0)).length() < EPSILON);
    }

    #[test]
    fn test_minus_turns_clockwise() {
        let segments = collect("-F", &square()).unwrap();
        assert!((segments[0].end - DVec2::new(0.0, -1.0)).length() < EPSILON);
    }

    #[test]
    fn test_default_heading_points_up() {
        let grammar = Grammar::new("F", 90.0).with_step_length(2.0);
        let segments = collect("F", &grammar).unwrap();
        assert!((segments[0].end - DVec2::new(0.0, 2.0)).length() < EPSILON);
    }

    #[test]
    fn test_brackets_restore_state() {
        let segments = collect("[+F]F", &square()).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].start, DVec2::ZERO, "']' must restore the saved position");
        assert!((segments[1].end - DVec2::new(1.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_unknown_symbols_ignored() {
        let segments = collect("XfYF", &square()).unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_empty_stack_pop_is_error() {
        assert_eq!(
            collect("F]F", &square()),
            Err(GrammarError::UnbalancedBracket { position: 1 })
        );
    }

    #[test]
    fn test_unclosed_bracket_is_fine() {
        assert!(collect("[F", &square()).is_ok());
    }

    #[test]
    fn test_bounds_include_and_contains() {
        let mut bounds = Bounds::at(DVec2::ZERO);
        bounds.include(DVec2::new(2.0, -1.0));
        bounds.include(DVec2::new(-1.0, 3.0));
        assert_eq!(bounds.min, DVec2::new(-1.0, -1.0));
        assert_eq!(bounds.max, DVec2::new(2.0, 3.0));
        assert_eq!(bounds.width(), 3.0);
        assert_eq!(bounds.height(), 4.0);
        assert_eq!(bounds.center(), DVec2::new(0.5, 1.0));
        assert!(bounds.contains(DVec2::new(0.0, 0.0)));
        assert!(!bounds.contains(DVec2::new(2.5, 0.0)));
    }

    #[test]
    fn test_fit_scale() {
        let mut bounds = Bounds::at(DVec2::ZERO);
        bounds.include(DVec2::new(10.0, 5.0));
        assert_eq!(bounds.fit_scale(100.0, 100.0), 10.0);

        let flat = Bounds {
            min: DVec2::ZERO,
            max: DVec2::new(4.0, 0.0),
        };
        assert_eq!(flat.fit_scale(100.0, 50.0), 25.0);
        assert_eq!(Bounds::at(DVec2::ZERO).fit_scale(100.0, 50.0), 1.0);
    }
}
