//! SVG-style path strings for stroke geometry.
//!
//! Older records store a stroke as `"M10,10 L20,20 L30,25"` instead of a list
//! of points. Only move-to and line-to commands occur in such paths; both the
//! absolute (`M`/`L`) and relative (`m`/`l`) forms are accepted, and extra
//! coordinate pairs after a command repeat it as a line-to.

use doc_model::Point;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("path must start with a move-to command")]
    MissingMoveTo,
    #[error("unsupported path command {0:?} at offset {1}")]
    UnsupportedCommand(char, usize),
    #[error("invalid number {0:?} at offset {1}")]
    InvalidNumber(String, usize),
    #[error("coordinate pair is missing its y value")]
    DanglingCoordinate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f32),
}

/// Encode points as an absolute move-to/line-to path
pub fn encode(points: &[Point]) -> String {
    let mut out = String::new();
    for (index, point) in points.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        let command = if index == 0 { 'M' } else { 'L' };
        // Writing into a String cannot fail
        let _ = write!(out, "{command}{},{}", point.x, point.y);
    }
    out
}

/// Decode a move-to/line-to path into absolute points
pub fn decode(path: &str) -> Result<Vec<Point>, PathError> {
    let tokens = tokenize(path)?;
    let mut points = Vec::new();
    let mut command: Option<char> = None;
    let mut pending_x: Option<f32> = None;
    let mut cursor = Point::default();

    for token in tokens {
        match token {
            Token::Command(next) => {
                if pending_x.is_some() {
                    return Err(PathError::DanglingCoordinate);
                }
                if command.is_none() && !matches!(next, 'M' | 'm') {
                    return Err(PathError::MissingMoveTo);
                }
                command = Some(next);
            }
            Token::Number(value) => {
                let Some(active) = command else {
                    return Err(PathError::MissingMoveTo);
                };
                let Some(x) = pending_x.take() else {
                    pending_x = Some(value);
                    continue;
                };

                let point = match active {
                    'm' | 'l' => cursor.offset(x, value),
                    _ => Point::new(x, value),
                };
                points.push(point);
                cursor = point;

                // Pairs following a move-to are implicit line-tos
                command = Some(match active {
                    'M' => 'L',
                    'm' => 'l',
                    other => other,
                });
            }
        }
    }

    if pending_x.is_some() {
        return Err(PathError::DanglingCoordinate);
    }
    Ok(points)
}

fn tokenize(path: &str) -> Result<Vec<Token>, PathError> {
    let mut tokens = Vec::new();
    let bytes = path.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        let c = bytes[index] as char;
        if c.is_ascii_whitespace() || c == ',' {
            index += 1;
        } else if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            match c {
                'M' | 'm' | 'L' | 'l' => tokens.push(Token::Command(c)),
                other => return Err(PathError::UnsupportedCommand(other, index)),
            }
            index += 1;
        } else {
            let start = index;
            index = scan_number(bytes, index);
            if index == start {
                return Err(PathError::InvalidNumber(c.to_string(), start));
            }
            let text = &path[start..index];
            let value = text
                .parse::<f32>()
                .map_err(|_| PathError::InvalidNumber(text.to_owned(), start))?;
            tokens.push(Token::Number(value));
        }
    }

    Ok(tokens)
}

/// Offset one past the number starting at `start`
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut index = start;
    if matches!(bytes.get(index), Some(b'+' | b'-')) {
        index += 1;
    }
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(index) {
        match b {
            b'0'..=b'9' => index += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                index += 1;
            }
            _ => break,
        }
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        let mut exponent = index + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        if matches!(bytes.get(exponent), Some(b'0'..=b'9')) {
            index = exponent;
            while matches!(bytes.get(index), Some(b'0'..=b'9')) {
                index += 1;
            }
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_whole_coordinates_without_fraction() {
        let points = [Point::new(10.0, 10.0), Point::new(20.5, 20.0)];
        assert_eq!(encode(&points), "M10,10 L20.5,20");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn decodes_comma_and_space_separated_pairs() {
        let expected = vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)];
        assert_eq!(decode("M10,10 L20,20"), Ok(expected.clone()));
        assert_eq!(decode("M 10 10 L 20 20"), Ok(expected.clone()));
        assert_eq!(decode("M10,10L20,20"), Ok(expected));
    }

    #[test]
    fn repeated_pairs_continue_as_line_to() {
        let points = decode("M0,0 5,5 10,0").unwrap();
        assert_eq!(points, vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn relative_commands_accumulate() {
        let points = decode("m10,10 l5,0 0,5").unwrap();
        let expected = [Point::new(10.0, 10.0), Point::new(15.0, 10.0), Point::new(15.0, 15.0)];
        assert_eq!(points, expected);
    }

    #[test]
    fn decodes_negative_and_exponent_numbers() {
        let points = decode("M-1.5,2e1 L3.25,-4").unwrap();
        assert_eq!(points, vec![Point::new(-1.5, 20.0), Point::new(3.25, -4.0)]);
    }

    #[test]
    fn rejects_malformed_paths() {
        assert_eq!(decode("L10,10"), Err(PathError::MissingMoveTo));
        assert_eq!(decode("10,10"), Err(PathError::MissingMoveTo));
        assert_eq!(decode("M10,10 L20"), Err(PathError::DanglingCoordinate));
        assert_eq!(decode("M10,10 C1,1 2,2 3,3"), Err(PathError::UnsupportedCommand('C', 7)));
        assert!(matches!(decode("M10,10 L#,2"), Err(PathError::InvalidNumber(_, _))));
    }

    #[test]
    fn decoding_encoded_points_returns_them() {
        let points = vec![Point::new(1.0, 2.0), Point::new(3.5, 4.25), Point::new(-6.0, 0.0)];
        assert_eq!(decode(&encode(&points)), Ok(points));
    }
}
