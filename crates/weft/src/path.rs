//! The path mini-language shared by every driver.
//!
//! Upstream layout describes line work either as a compact command string
//! (`"M 0 0 L 10 10 Z"`) or as a pre-structured segment list. Drivers never
//! interpret that data themselves; they call [`decode`] and work with
//! [`PathCommand`] values, so malformed data is caught in one place before
//! any surface is touched.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point;

/// A single decoded path command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Move to a point (starts a new subpath).
    MoveTo(Point),
    /// Line to a point.
    LineTo(Point),
    /// Close the current subpath.
    Close,
}

/// How [`decode`] treats command-string tokens it does not recognize.
///
/// Lenient skipping keeps output compatible with upstream producers that
/// emit opcodes this renderer has no use for; strict mode is for catching
/// those producers in the act.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenPolicy {
    #[default]
    Lenient,
    Strict,
}

/// Path data as it arrives from upstream layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathData {
    /// A whitespace separated command string, e.g. `"M 0 0 L 10 10 Z"`.
    Commands(String),
    /// A structured segment list. The first segment always starts the path;
    /// later segments continue it as line work unless flagged.
    Segments(Vec<PathSegment>),
}

impl PathData {
    /// True when there is nothing to draw at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Commands(cmds) => cmds.split_whitespace().next().is_none(),
            Self::Segments(segments) => segments.is_empty(),
        }
    }
}

impl From<&str> for PathData {
    fn from(cmds: &str) -> Self {
        Self::Commands(cmds.to_string())
    }
}

impl From<String> for PathData {
    fn from(cmds: String) -> Self {
        Self::Commands(cmds)
    }
}

impl From<Vec<PathSegment>> for PathData {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self::Segments(segments)
    }
}

/// One entry of the structured form of [`PathData`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub x: f32,
    pub y: f32,
    /// Starts a new subpath instead of continuing the current one.
    #[serde(default)]
    pub move_to: bool,
}

impl PathSegment {
    /// A segment that continues the current subpath.
    pub fn line(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            move_to: false,
        }
    }

    /// A segment that starts a new subpath.
    pub fn start(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            move_to: true,
        }
    }
}

/// Errors produced while decoding path data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("`{opcode}` at token {index} is missing an operand")]
    MissingOperand { opcode: char, index: usize },

    #[error("`{opcode}` at token {index} has non-numeric operand `{operand}`")]
    InvalidOperand {
        opcode: char,
        index: usize,
        operand: String,
    },

    #[error("unrecognized token `{token}` at index {index}")]
    UnknownToken { token: String, index: usize },

    #[error("`{opcode}` at token {index} appears before any `M`")]
    NoCurrentSubpath { opcode: char, index: usize },
}

/// Decodes path data into drawable commands.
///
/// Command strings are tokenized on whitespace. `M` and `L` consume exactly
/// two numeric operands; `Z` consumes none. A missing or non-numeric operand
/// is an error rather than silent garbage, and a drawable command before the
/// first `M` is rejected so every decoded path starts with a moveto.
/// Unrecognized tokens are skipped or rejected according to `policy`.
///
/// The segment-list form cannot fail: the first segment is always treated as
/// a moveto, the rest as linetos unless flagged.
pub fn decode(data: &PathData, policy: TokenPolicy) -> Result<Vec<PathCommand>, PathError> {
    match data {
        PathData::Commands(cmds) => decode_commands(cmds, policy),
        PathData::Segments(segments) => Ok(decode_segments(segments)),
    }
}

/// Serializes decoded commands back into the canonical command string.
pub fn encode(commands: &[PathCommand]) -> String {
    let parts: Vec<String> = commands
        .iter()
        .map(|command| match command {
            PathCommand::MoveTo(p) => format!("M {} {}", p.x(), p.y()),
            PathCommand::LineTo(p) => format!("L {} {}", p.x(), p.y()),
            PathCommand::Close => "Z".to_string(),
        })
        .collect();
    parts.join(" ")
}

fn decode_commands(cmds: &str, policy: TokenPolicy) -> Result<Vec<PathCommand>, PathError> {
    let mut decoded = Vec::new();
    let mut tokens = cmds.split_whitespace().enumerate();
    let mut has_subpath = false;

    while let Some((index, token)) = tokens.next() {
        match token {
            "M" => {
                let point = operand_pair('M', index, &mut tokens)?;
                has_subpath = true;
                decoded.push(PathCommand::MoveTo(point));
            }
            "L" => {
                if !has_subpath {
                    return Err(PathError::NoCurrentSubpath { opcode: 'L', index });
                }
                let point = operand_pair('L', index, &mut tokens)?;
                decoded.push(PathCommand::LineTo(point));
            }
            "Z" => {
                if !has_subpath {
                    return Err(PathError::NoCurrentSubpath { opcode: 'Z', index });
                }
                decoded.push(PathCommand::Close);
            }
            unknown => match policy {
                TokenPolicy::Strict => {
                    return Err(PathError::UnknownToken {
                        token: unknown.to_string(),
                        index,
                    });
                }
                TokenPolicy::Lenient => {
                    debug!(token = unknown, index = index; "skipping unrecognized path token");
                }
            },
        }
    }

    Ok(decoded)
}

fn decode_segments(segments: &[PathSegment]) -> Vec<PathCommand> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let point = Point::new(segment.x, segment.y);
            if i == 0 || segment.move_to {
                PathCommand::MoveTo(point)
            } else {
                PathCommand::LineTo(point)
            }
        })
        .collect()
}

fn operand_pair<'a>(
    opcode: char,
    index: usize,
    tokens: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<Point, PathError> {
    let x = operand(opcode, index, tokens)?;
    let y = operand(opcode, index, tokens)?;
    Ok(Point::new(x, y))
}

fn operand<'a>(
    opcode: char,
    index: usize,
    tokens: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<f32, PathError> {
    let Some((_, raw)) = tokens.next() else {
        return Err(PathError::MissingOperand { opcode, index });
    };
    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PathError::InvalidOperand {
            opcode,
            index,
            operand: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic_commands() {
        let data = PathData::from("M 0 0 L 10 10 Z");
        let commands = decode(&data, TokenPolicy::Lenient).unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 10.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_decode_negative_and_fractional_operands() {
        let data = PathData::from("M -1.5 2.25 L 0.5 -3");
        let commands = decode(&data, TokenPolicy::Lenient).unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(Point::new(-1.5, 2.25)),
                PathCommand::LineTo(Point::new(0.5, -3.0)),
            ]
        );
    }

    #[test]
    fn test_decode_skips_unknown_tokens() {
        let data = PathData::from("M 0 0 Q 5 5 L 10 10");
        let commands = decode(&data, TokenPolicy::Lenient).unwrap();
        // `Q` and what follows it are plain tokens; only `Q` itself is
        // unknown, so `5` and `5` are also skipped as unknowns.
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 10.0)),
            ]
        );
    }

    #[test]
    fn test_decode_strict_rejects_unknown_tokens() {
        let data = PathData::from("M 0 0 Q 5 5");
        let err = decode(&data, TokenPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            PathError::UnknownToken {
                token: "Q".to_string(),
                index: 3,
            }
        );
    }

    #[test]
    fn test_decode_missing_operand() {
        let data = PathData::from("M 5");
        let err = decode(&data, TokenPolicy::Lenient).unwrap_err();
        assert_eq!(
            err,
            PathError::MissingOperand {
                opcode: 'M',
                index: 0,
            }
        );
    }

    #[test]
    fn test_decode_invalid_operand() {
        let data = PathData::from("M 5 banana");
        let err = decode(&data, TokenPolicy::Lenient).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidOperand {
                opcode: 'M',
                index: 0,
                operand: "banana".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_rejects_non_finite_operand() {
        let data = PathData::from("M 5 NaN");
        assert!(decode(&data, TokenPolicy::Lenient).is_err());

        let data = PathData::from("M inf 0");
        assert!(decode(&data, TokenPolicy::Lenient).is_err());
    }

    #[test]
    fn test_decode_line_before_moveto() {
        let data = PathData::from("L 1 2");
        let err = decode(&data, TokenPolicy::Lenient).unwrap_err();
        assert_eq!(
            err,
            PathError::NoCurrentSubpath {
                opcode: 'L',
                index: 0,
            }
        );
    }

    #[test]
    fn test_decode_close_before_moveto() {
        let data = PathData::from("Z");
        let err = decode(&data, TokenPolicy::Lenient).unwrap_err();
        assert_eq!(
            err,
            PathError::NoCurrentSubpath {
                opcode: 'Z',
                index: 0,
            }
        );
    }

    #[test]
    fn test_decode_segments_forces_leading_moveto() {
        let data = PathData::from(vec![
            PathSegment::line(1.0, 2.0),
            PathSegment::line(3.0, 4.0),
            PathSegment::start(5.0, 6.0),
            PathSegment::line(7.0, 8.0),
        ]);
        let commands = decode(&data, TokenPolicy::Strict).unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(Point::new(1.0, 2.0)),
                PathCommand::LineTo(Point::new(3.0, 4.0)),
                PathCommand::MoveTo(Point::new(5.0, 6.0)),
                PathCommand::LineTo(Point::new(7.0, 8.0)),
            ]
        );
    }

    #[test]
    fn test_path_data_is_empty() {
        assert!(PathData::from("").is_empty());
        assert!(PathData::from("   \t  ").is_empty());
        assert!(PathData::from(Vec::new()).is_empty());

        assert!(!PathData::from("M 0 0").is_empty());
        assert!(!PathData::from(vec![PathSegment::line(0.0, 0.0)]).is_empty());
    }

    #[test]
    fn test_encode_canonical_form() {
        let commands = vec![
            PathCommand::MoveTo(Point::new(0.0, 0.5)),
            PathCommand::LineTo(Point::new(10.0, 10.0)),
            PathCommand::Close,
        ];
        assert_eq!(encode(&commands), "M 0 0.5 L 10 10 Z");
    }

    #[test]
    fn test_path_data_serde_forms() {
        let string_form: PathData = serde_json::from_str("\"M 0 0 L 1 1\"").unwrap();
        assert_eq!(string_form, PathData::from("M 0 0 L 1 1"));

        let segment_form: PathData =
            serde_json::from_str(r#"[{"x": 1.0, "y": 2.0}, {"x": 3.0, "y": 4.0, "move_to": true}]"#)
                .unwrap();
        assert_eq!(
            segment_form,
            PathData::from(vec![PathSegment::line(1.0, 2.0), PathSegment::start(3.0, 4.0)])
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn commands_strategy() -> impl Strategy<Value = Vec<PathCommand>> {
        let tail = prop_oneof![
            point_strategy().prop_map(PathCommand::MoveTo),
            point_strategy().prop_map(PathCommand::LineTo),
            Just(PathCommand::Close),
        ];
        (
            point_strategy().prop_map(PathCommand::MoveTo),
            proptest::collection::vec(tail, 0..12),
        )
            .prop_map(|(first, rest)| {
                let mut commands = vec![first];
                commands.extend(rest);
                commands
            })
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        /// Encoding then decoding any well-formed command list is lossless,
        /// even under the strict token policy.
        #[test]
        fn encode_decode_round_trip(commands in commands_strategy()) {
            let encoded = encode(&commands);
            let decoded = decode(&PathData::from(encoded), TokenPolicy::Strict).unwrap();
            prop_assert_eq!(decoded, commands);
        }
    }
}
