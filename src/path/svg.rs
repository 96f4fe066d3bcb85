//! SVG path data: writing and reading the `M L H V Q C Z` subset.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Path, PathCommand};
use crate::error::{InkgeoError, PathParseError};
use crate::math::rounding::{to_rounded_string, to_string_of_same_precision};
use crate::math::{vec2, Point2, Vec2};

/// A command letter followed by everything up to the next command letter.
/// `e` and `E` belong to numbers.
static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-DF-Za-df-z])([^A-DF-Za-df-z]*)").unwrap_or_else(|_| unreachable!())
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").unwrap_or_else(|_| unreachable!())
});

/// Paths whose top-left corner is at least this far from both axes are
/// written with relative commands where that is shorter.
const RELATIVE_OUTPUT_THRESHOLD: f64 = 10.0;

/// Appends `x,y` to `out`, leaving out separators a leading `-` makes redundant.
fn push_pair(out: &mut String, x: &str, y: &str) {
    let after_letter = out.ends_with(|c: char| c.is_ascii_alphabetic());
    if !after_letter && !x.starts_with('-') {
        out.push(' ');
    }
    out.push_str(x);
    if !y.starts_with('-') {
        out.push(',');
    }
    out.push_str(y);
}

fn absolute_spelling(letter: char, points: &[Point2]) -> String {
    let mut out = String::from(letter);
    for point in points {
        push_pair(&mut out, &to_rounded_string(point.x), &to_rounded_string(point.y));
    }
    out
}

fn relative_spelling(letter: char, points: &[Point2], previous: Point2) -> String {
    let previous_x = to_rounded_string(previous.x);
    let previous_y = to_rounded_string(previous.y);
    let mut out = String::from(letter.to_ascii_lowercase());
    for point in points {
        let x = to_string_of_same_precision(point.x - previous.x, &[&to_rounded_string(point.x), &previous_x]);
        let y = to_string_of_same_precision(point.y - previous.y, &[&to_rounded_string(point.y), &previous_y]);
        push_pair(&mut out, &x, &y);
    }
    out
}

impl Path {
    /// SVG path data for this path, computed once and cached.
    ///
    /// Relative commands are only considered for paths far from the origin.
    #[must_use]
    pub fn to_svg_string(&self) -> &str {
        self.cached_string.get_or_init(|| {
            let top_left = self.bbox.top_left();
            let use_relative = top_left.x.abs() > RELATIVE_OUTPUT_THRESHOLD
                && top_left.y.abs() > RELATIVE_OUTPUT_THRESHOLD;
            self.to_string_with_options(use_relative)
        })
    }

    /// SVG path data. With `use_relative`, each command is written in
    /// whichever of its absolute and relative forms is shorter.
    ///
    /// Moves and lines that go nowhere are left out.
    #[must_use]
    pub fn to_string_with_options(&self, use_relative: bool) -> String {
        let mut result = absolute_spelling('M', &[self.start_point]);
        let mut previous = self.start_point;

        for part in &self.parts {
            let letter = match part {
                PathCommand::MoveTo(_) => 'M',
                PathCommand::LineTo(_) => 'L',
                PathCommand::QuadraticBezierTo { .. } => 'Q',
                PathCommand::CubicBezierTo { .. } => 'C',
            };
            let points = part.points();
            let relative = relative_spelling(letter, &points, previous);
            previous = part.end_point();

            if relative == "l0,0" || relative == "m0,0" {
                continue;
            }
            let absolute = absolute_spelling(letter, &points);
            if use_relative && relative.len() < absolute.len() {
                result.push_str(&relative);
            } else {
                result.push_str(&absolute);
            }
        }
        result
    }

    /// Reads SVG path data.
    ///
    /// `H`/`V` become lines and `Z` becomes a line back to the start of the
    /// current subpath. The first `M` sets the start point; data that starts
    /// with any other command starts at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`InkgeoError::PathParse`] for arcs, `S`/`T` shorthands and other
    /// unknown letters, for argument lists of the wrong length, and for text
    /// that is not a number or a separator.
    pub fn from_string(text: &str) -> crate::Result<Self> {
        let mut reader = PathDataReader::default();
        let mut consumed = 0;

        for captures in COMMAND.captures_iter(text) {
            let (Some(whole), Some(letter), Some(arguments)) = (captures.get(0), captures.get(1), captures.get(2))
            else {
                continue;
            };
            check_blank(text, consumed, whole.start())?;
            consumed = whole.end();

            let Some(command) = letter.as_str().chars().next() else {
                continue;
            };
            let values = parse_numbers(arguments.as_str())?;
            reader.apply(command, &values)?;
        }
        check_blank(text, consumed, text.len())?;

        let path = reader.finish();
        debug!(commands = path.parts.len(), "parsed path data");
        Ok(path)
    }
}

impl FromStr for Path {
    type Err = InkgeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

fn check_blank(text: &str, start: usize, end: usize) -> Result<(), PathParseError> {
    match text[start..end].char_indices().find(|(_, c)| !c.is_whitespace()) {
        Some((offset, found)) => Err(PathParseError::UnexpectedCharacter {
            found,
            offset: start + offset,
        }),
        None => Ok(()),
    }
}

fn check_separator(gap: &str) -> Result<(), PathParseError> {
    let is_separator = |c: char| c.is_whitespace() || c == ',';
    if gap.chars().all(is_separator) {
        Ok(())
    } else {
        Err(PathParseError::InvalidNumber {
            token: gap.trim_matches(is_separator).to_owned(),
        })
    }
}

fn parse_numbers(arguments: &str) -> Result<Vec<f64>, PathParseError> {
    let mut values = Vec::new();
    let mut last_end = 0;
    for number in NUMBER.find_iter(arguments) {
        check_separator(&arguments[last_end..number.start()])?;
        let value = number.as_str().parse::<f64>().map_err(|_| PathParseError::InvalidNumber {
            token: number.as_str().to_owned(),
        })?;
        values.push(value);
        last_end = number.end();
    }
    check_separator(&arguments[last_end..])?;
    Ok(values)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Move,
    Line,
    Horizontal,
    Vertical,
    Quadratic,
    Cubic,
    Close,
}

impl Verb {
    fn from_letter(letter: char) -> Option<Self> {
        Some(match letter.to_ascii_uppercase() {
            'M' => Self::Move,
            'L' => Self::Line,
            'H' => Self::Horizontal,
            'V' => Self::Vertical,
            'Q' => Self::Quadratic,
            'C' => Self::Cubic,
            'Z' => Self::Close,
            _ => return None,
        })
    }

    /// Numbers consumed by one application of the command.
    fn arity(self) -> usize {
        match self {
            Self::Close => 0,
            Self::Horizontal | Self::Vertical => 1,
            Self::Move | Self::Line => 2,
            Self::Quadratic => 4,
            Self::Cubic => 6,
        }
    }
}

/// Position tracking while reading path data.
#[derive(Debug, Default)]
struct PathDataReader {
    start_point: Option<Point2>,
    subpath_start: Point2,
    current: Point2,
    parts: Vec<PathCommand>,
}

impl PathDataReader {
    fn apply(&mut self, command: char, values: &[f64]) -> Result<(), PathParseError> {
        let verb = Verb::from_letter(command).ok_or(PathParseError::UnknownCommand { command })?;
        let relative = command.is_ascii_lowercase();
        let arity = verb.arity();

        if verb == Verb::Close {
            if !values.is_empty() {
                return Err(PathParseError::ArgumentCount {
                    command,
                    count: values.len(),
                    expected_multiple: arity,
                });
            }
            self.push(PathCommand::LineTo(self.subpath_start));
            return Ok(());
        }
        if values.is_empty() || values.len() % arity != 0 {
            return Err(PathParseError::ArgumentCount {
                command,
                count: values.len(),
                expected_multiple: arity,
            });
        }

        for (i, group) in values.chunks_exact(arity).enumerate() {
            let origin = if relative { self.current } else { Vec2::ZERO };
            let point = |k: usize| origin + vec2(group[2 * k], group[2 * k + 1]);
            match verb {
                Verb::Move if i == 0 => self.move_to(point(0)),
                Verb::Move | Verb::Line => self.push(PathCommand::LineTo(point(0))),
                Verb::Horizontal => {
                    let x = if relative { self.current.x + group[0] } else { group[0] };
                    self.push(PathCommand::LineTo(vec2(x, self.current.y)));
                }
                Verb::Vertical => {
                    let y = if relative { self.current.y + group[0] } else { group[0] };
                    self.push(PathCommand::LineTo(vec2(self.current.x, y)));
                }
                Verb::Quadratic => self.push(PathCommand::QuadraticBezierTo {
                    control_point: point(0),
                    end_point: point(1),
                }),
                Verb::Cubic => self.push(PathCommand::CubicBezierTo {
                    control_point1: point(0),
                    control_point2: point(1),
                    end_point: point(2),
                }),
                Verb::Close => {}
            }
        }
        Ok(())
    }

    fn move_to(&mut self, point: Point2) {
        if self.start_point.is_none() && self.parts.is_empty() {
            self.start_point = Some(point);
        } else {
            self.parts.push(PathCommand::MoveTo(point));
        }
        self.subpath_start = point;
        self.current = point;
    }

    fn push(&mut self, command: PathCommand) {
        if self.start_point.is_none() {
            self.start_point = Some(self.current);
        }
        self.current = command.end_point();
        self.parts.push(command);
    }

    fn finish(self) -> Path {
        Path::new(self.start_point.unwrap_or(Vec2::ZERO), self.parts)
    }
}
