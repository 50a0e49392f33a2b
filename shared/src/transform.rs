use crate::error::FitError;

/// Uniform scale plus translation, the only part of a CSS transform the
/// scroll engine cares about. Offsets are in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Projects back to CSS. `translate` comes first so the translation stays
    /// in screen pixels, matching what `parse_transform` reads.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            round3(self.offset_x),
            round3(self.offset_y),
            round3(self.scale)
        )
    }
}

fn round3(v: f64) -> f64 {
    let r = (v * 1000.0).round() / 1000.0;
    // Avoid printing "-0".
    if r == 0.0 { 0.0 } else { r }
}

/// Parses a computed or inline CSS transform.
///
/// Accepts `none`, `matrix(...)`, `matrix3d(...)`, or a list of
/// translate/scale functions. Anything else is an error; callers are expected
/// to fall back to [`AffineTransform::IDENTITY`].
pub fn parse_transform(raw: &str) -> Result<AffineTransform, FitError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(AffineTransform::IDENTITY);
    }

    let unreadable = || FitError::UnreadableTransform(trimmed.to_string());
    let functions = split_functions(trimmed).ok_or_else(unreadable)?;

    let transform = match functions.as_slice() {
        [("matrix", args)] => {
            let v = parse_numbers(args, 6).ok_or_else(unreadable)?;
            AffineTransform {
                scale: v[0],
                offset_x: v[4],
                offset_y: v[5],
            }
        }
        [("matrix3d", args)] => {
            let v = parse_numbers(args, 16).ok_or_else(unreadable)?;
            AffineTransform {
                scale: v[0],
                offset_x: v[12],
                offset_y: v[13],
            }
        }
        _ => decompose(&functions).ok_or_else(unreadable)?,
    };

    if !transform.scale.is_finite()
        || transform.scale <= 0.0
        || !transform.offset_x.is_finite()
        || !transform.offset_y.is_finite()
    {
        return Err(unreadable());
    }
    Ok(transform)
}

/// Splits `a(1, 2) b(3)` into `[("a", "1, 2"), ("b", "3")]`.
fn split_functions(input: &str) -> Option<Vec<(&str, &str)>> {
    let mut out = Vec::new();
    let mut rest = input;
    while !rest.trim_start().is_empty() {
        rest = rest.trim_start();
        let open = rest.find('(')?;
        let close = rest.find(')')?;
        if close < open {
            return None;
        }
        let name = rest[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        out.push((name, &rest[open + 1..close]));
        rest = &rest[close + 1..];
    }
    if out.is_empty() { None } else { Some(out) }
}

fn parse_numbers(args: &str, expected: usize) -> Option<Vec<f64>> {
    let values = args
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    (values.len() == expected).then_some(values)
}

/// Parses a length in px (the unit may be omitted; `0` often is).
fn parse_length(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    raw.strip_suffix("px").unwrap_or(raw).trim().parse().ok()
}

fn lengths(args: &str) -> Option<Vec<f64>> {
    args.split(',').map(parse_length).collect()
}

/// Folds the function list left to right. A translation is applied in the
/// space scaled by everything before it, so it counts `t.scale` times on screen.
fn decompose(functions: &[(&str, &str)]) -> Option<AffineTransform> {
    let mut t = AffineTransform::IDENTITY;
    for (name, args) in functions {
        let (dx, dy) = match name.to_ascii_lowercase().as_str() {
            "translate" => match lengths(args)?.as_slice() {
                [x] => (*x, 0.0),
                [x, y] => (*x, *y),
                _ => return None,
            },
            "translatex" => (parse_length(args)?, 0.0),
            "translatey" => (0.0, parse_length(args)?),
            "translate3d" => match lengths(args)?.as_slice() {
                [x, y, _z] => (*x, *y),
                _ => return None,
            },
            "scale" => {
                match parse_scale_args(args)?.as_slice() {
                    [s] | [s, _] => t.scale *= s,
                    _ => return None,
                }
                continue;
            }
            "scalex" => {
                t.scale *= parse_scale_args(args)?.first()?;
                continue;
            }
            "scale3d" => {
                match parse_scale_args(args)?.as_slice() {
                    [sx, _, _] => t.scale *= sx,
                    _ => return None,
                }
                continue;
            }
            _ => return None,
        };
        t.offset_x += dx * t.scale;
        t.offset_y += dy * t.scale;
    }
    Some(t)
}

fn parse_scale_args(args: &str) -> Option<Vec<f64>> {
    args.split(',').map(|p| p.trim().parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    #[test]
    fn none_and_empty_are_identity() {
        assert_eq!(parse_transform("none").unwrap(), AffineTransform::IDENTITY);
        assert_eq!(parse_transform("").unwrap(), AffineTransform::IDENTITY);
        assert_eq!(parse_transform("  NONE ").unwrap(), AffineTransform::IDENTITY);
    }

    #[test]
    fn reads_2d_matrix() {
        let t = parse_transform("matrix(1.5, 0, 0, 1.5, -120, 42.5)").unwrap();
        assert_close(t.scale, 1.5);
        assert_close(t.offset_x, -120.0);
        assert_close(t.offset_y, 42.5);
    }

    #[test]
    fn reads_3d_matrix() {
        let t = parse_transform(
            "matrix3d(2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1, 0, 30, -15, 0, 1)",
        )
        .unwrap();
        assert_close(t.scale, 2.0);
        assert_close(t.offset_x, 30.0);
        assert_close(t.offset_y, -15.0);
    }

    #[test]
    fn reads_decomposed_functions() {
        let t = parse_transform("translate(10px, -20px) scale(1.25)").unwrap();
        assert_close(t.scale, 1.25);
        assert_close(t.offset_x, 10.0);
        assert_close(t.offset_y, -20.0);

        let t = parse_transform("translateX(5px) translateY(7px) translateX(5px)").unwrap();
        assert_close(t.offset_x, 10.0);
        assert_close(t.offset_y, 7.0);
        assert_close(t.scale, 1.0);

        let t = parse_transform("translate3d(3px, 4px, 0) scale3d(2, 2, 1)").unwrap();
        assert_close(t.offset_x, 3.0);
        assert_close(t.offset_y, 4.0);
        assert_close(t.scale, 2.0);
    }

    #[test]
    fn translation_after_scale_is_scaled() {
        let t = parse_transform("scale(2) translate(10px, 0px)").unwrap();
        assert_close(t.scale, 2.0);
        assert_close(t.offset_x, 20.0);
        assert_close(t.offset_y, 0.0);

        let t = parse_transform("translateX(4px) scale(1.5) translateY(-10px) scale(2)").unwrap();
        assert_close(t.scale, 3.0);
        assert_close(t.offset_x, 4.0);
        assert_close(t.offset_y, -15.0);
    }

    #[test]
    fn calc_lengths_are_rejected_not_truncated() {
        // The first `)` closes the function, leaving a dangling `calc(` argument
        // and a stray `)` that no function name precedes.
        for raw in [
            "translate(calc(10px + 5px), 0px)",
            "translateX(calc(100% - 20px))",
        ] {
            assert!(
                matches!(parse_transform(raw), Err(FitError::UnreadableTransform(_))),
                "expected `{raw}` to be rejected"
            );
        }
        assert_eq!(
            parse_transform("translateX(calc(100% - 20px))").unwrap_or_default(),
            AffineTransform::IDENTITY
        );
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in [
            "matrix(1, 0, 0)",
            "matrix(a, b, c, d, e, f)",
            "rotate(45deg)",
            "translate(50%, 10px)",
            "scale(0)",
            "scale(-1)",
            "matrix(1, 0, 0, 1, 0",
            "garbage",
        ] {
            assert!(
                matches!(parse_transform(raw), Err(FitError::UnreadableTransform(_))),
                "expected `{raw}` to be rejected"
            );
        }
    }

    #[test]
    fn css_projection_reads_back() {
        let t = AffineTransform {
            scale: 1.2,
            offset_x: -36.5,
            offset_y: 12.0,
        };
        assert_eq!(t.to_css(), "translate(-36.5px, 12px) scale(1.2)");
        assert_eq!(parse_transform(&t.to_css()).unwrap(), t);
    }

    #[test]
    fn css_projection_never_prints_negative_zero() {
        let t = AffineTransform {
            scale: 1.0,
            offset_x: -0.0001,
            offset_y: 0.0,
        };
        assert_eq!(t.to_css(), "translate(0px, 0px) scale(1)");
    }
}
