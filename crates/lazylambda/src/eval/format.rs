//! Format specifications: `format(value, spec)` and `str.format`
//!
//! Supported spec grammar: `[[fill]align][sign][width][,][.precision][type]`
//! with align one of `<` `>` `^` and type one of `s d f F e E g % x X o b`.

use crate::value::Kwargs;
use crate::{EvalError, Value};

#[derive(Debug, Default)]
struct Spec {
    fill: Option<char>,
    align: Option<char>,
    sign: Option<char>,
    width: usize,
    thousands: bool,
    precision: Option<usize>,
    kind: Option<char>,
}

fn invalid(spec: &str) -> EvalError {
    EvalError::ValueError(format!("invalid format specifier '{}'", spec))
}

fn parse_spec(spec: &str) -> Result<Spec, EvalError> {
    let chars: Vec<char> = spec.chars().collect();
    let mut parsed = Spec::default();
    let mut pos = 0;

    let is_align = |c: char| matches!(c, '<' | '>' | '^');
    if chars.len() >= 2 && is_align(chars[1]) {
        parsed.fill = Some(chars[0]);
        parsed.align = Some(chars[1]);
        pos = 2;
    } else if chars.first().copied().is_some_and(is_align) {
        parsed.align = Some(chars[0]);
        pos = 1;
    }

    if let Some(&c @ ('+' | '-' | ' ')) = chars.get(pos) {
        parsed.sign = Some(c);
        pos += 1;
    }

    let digits_end = |from: usize| {
        chars[from..]
            .iter()
            .position(|c| !c.is_ascii_digit())
            .map_or(chars.len(), |offset| from + offset)
    };

    let end = digits_end(pos);
    if end > pos {
        let width: String = chars[pos..end].iter().collect();
        parsed.width = width.parse().map_err(|_| invalid(spec))?;
        pos = end;
    }

    if chars.get(pos) == Some(&',') {
        parsed.thousands = true;
        pos += 1;
    }

    if chars.get(pos) == Some(&'.') {
        let end = digits_end(pos + 1);
        if end == pos + 1 {
            return Err(invalid(spec));
        }
        let precision: String = chars[pos + 1..end].iter().collect();
        parsed.precision = Some(precision.parse().map_err(|_| invalid(spec))?);
        pos = end;
    }

    match chars.get(pos) {
        None => {}
        Some(&c) if "sdfFeEg%xXob".contains(c) && pos + 1 == chars.len() => {
            parsed.kind = Some(c);
        }
        Some(_) => return Err(invalid(spec)),
    }

    Ok(parsed)
}

/// Format one value according to `spec`.
///
/// # Errors
///
/// `ValueError` for malformed specs or a type code that does not apply to
/// the value.
pub fn format_value(value: &Value, spec: &str) -> Result<String, EvalError> {
    let parsed = parse_spec(spec)?;
    let unknown_code = |code: char| {
        EvalError::ValueError(format!(
            "unknown format code '{}' for object of type '{}'",
            code,
            value.type_name()
        ))
    };

    let (body, numeric) = match (parsed.kind, value) {
        (None | Some('s'), Value::Str(s)) => {
            let text = match parsed.precision {
                Some(p) => s.chars().take(p).collect(),
                None => s.to_string(),
            };
            (text, false)
        }
        (Some('s'), other) => (other.to_string(), false),

        (None, Value::Bool(_)) => (value.to_string(), false),
        (None | Some('d'), Value::Int(_) | Value::Bool(_)) => {
            let n = value.as_i64().unwrap_or_default();
            let digits = group(n.unsigned_abs().to_string(), parsed.thousands);
            (signed(digits, n < 0, parsed.sign), true)
        }
        (Some(code @ ('x' | 'X' | 'o' | 'b')), Value::Int(_) | Value::Bool(_)) => {
            let n = value.as_i64().unwrap_or_default();
            let magnitude = n.unsigned_abs();
            let digits = match code {
                'x' => format!("{:x}", magnitude),
                'X' => format!("{:X}", magnitude),
                'o' => format!("{:o}", magnitude),
                _ => format!("{:b}", magnitude),
            };
            (signed(digits, n < 0, parsed.sign), true)
        }

        (kind, Value::Int(_) | Value::Bool(_) | Value::Float(_)) => {
            let x = value.as_f64().unwrap_or_default();
            let negative = x.is_sign_negative() && x != 0.0;
            let magnitude = x.abs();
            let digits = match kind {
                Some('f' | 'F') => fixed(magnitude, parsed.precision.unwrap_or(6), parsed.thousands),
                Some('%') => format!(
                    "{}%",
                    fixed(magnitude * 100.0, parsed.precision.unwrap_or(6), parsed.thousands)
                ),
                Some(code @ ('e' | 'E')) => {
                    let text = exponential(magnitude, parsed.precision.unwrap_or(6));
                    if code == 'E' {
                        text.to_uppercase()
                    } else {
                        text
                    }
                }
                Some('g') => general(magnitude, parsed.precision.unwrap_or(6)),
                None => match parsed.precision {
                    Some(p) => general(magnitude, p),
                    None => Value::Float(magnitude).repr(),
                },
                Some(code) => return Err(unknown_code(code)),
            };
            (signed(digits, negative, parsed.sign), true)
        }

        (None, other) => (other.to_string(), false),
        (Some(code), _) => return Err(unknown_code(code)),
    };

    Ok(pad(body, &parsed, numeric))
}

fn signed(digits: String, negative: bool, sign: Option<char>) -> String {
    match (negative, sign) {
        (true, _) => format!("-{}", digits),
        (false, Some('+')) => format!("+{}", digits),
        (false, Some(' ')) => format!(" {}", digits),
        _ => digits,
    }
}

fn group(digits: String, thousands: bool) -> String {
    if !thousands {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn fixed(x: f64, precision: usize, thousands: bool) -> String {
    let text = format!("{:.*}", precision, x);
    match text.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group(int_part.to_string(), thousands), frac),
        None => group(text, thousands),
    }
}

fn exponential(x: f64, precision: usize) -> String {
    let text = format!("{:.*e}", precision, x);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or_default();
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => text,
    }
}

fn general(x: f64, precision: usize) -> String {
    if !x.is_finite() {
        return Value::Float(x).repr();
    }
    let precision = precision.max(1);
    if x == 0.0 {
        return "0".to_string();
    }
    let exp = x.log10().floor() as i64;
    let significant = i64::try_from(precision).unwrap_or(i64::MAX);
    let text = if exp < -4 || exp >= significant {
        exponential(x, precision - 1)
    } else {
        let decimals = usize::try_from(significant - 1 - exp).unwrap_or(0);
        format!("{:.*}", decimals, x)
    };
    strip_zeros(text)
}

fn strip_zeros(text: String) -> String {
    let (mantissa, exp) = match text.split_once('e') {
        Some((m, e)) => (m.to_string(), format!("e{}", e)),
        None => (text, String::new()),
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        mantissa
    };
    format!("{}{}", mantissa, exp)
}

fn pad(body: String, spec: &Spec, numeric: bool) -> String {
    let len = body.chars().count();
    if len >= spec.width {
        return body;
    }
    let fill = spec.fill.unwrap_or(' ');
    let missing = spec.width - len;
    let align = spec.align.unwrap_or(if numeric { '>' } else { '<' });
    let (left, right) = match align {
        '>' => (missing, 0),
        '^' => (missing / 2, missing - missing / 2),
        _ => (0, missing),
    };
    let repeat = |n: usize| std::iter::repeat(fill).take(n).collect::<String>();
    format!("{}{}{}", repeat(left), body, repeat(right))
}

/// Substitute `{}` / `{0}` / `{name}` fields of `template`.
///
/// Fields may carry a `!r` or `!s` conversion and a `:spec`; `{{` and `}}`
/// are literal braces.
///
/// # Errors
///
/// `ValueError` for unbalanced braces, `IndexError`/`KeyError` for missing
/// arguments, and any error from [`format_value`].
pub fn format_template(template: &str, args: &[Value], kwargs: &Kwargs) -> Result<String, EvalError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_auto = 0;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(EvalError::ValueError(
                    "single '}' encountered in format string".to_string(),
                ))
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => field.push(c),
                        None => {
                            return Err(EvalError::ValueError(
                                "single '{' encountered in format string".to_string(),
                            ))
                        }
                    }
                }
                out.push_str(&format_field(&field, args, kwargs, &mut next_auto)?);
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

fn format_field(
    field: &str,
    args: &[Value],
    kwargs: &Kwargs,
    next_auto: &mut usize,
) -> Result<String, EvalError> {
    let (head, spec) = field.split_once(':').unwrap_or((field, ""));
    let (name, conversion) = match head.split_once('!') {
        Some((name, conversion)) => (name, Some(conversion)),
        None => (head, None),
    };

    let value = if name.is_empty() {
        let index = *next_auto;
        *next_auto += 1;
        positional(args, index)?
    } else if let Ok(index) = name.parse::<usize>() {
        positional(args, index)?
    } else {
        kwargs
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::KeyError(format!("'{}'", name)))?
    };

    let value = match conversion {
        None => value,
        Some("r") => Value::string(value.repr()),
        Some("s") => Value::string(value.to_string()),
        Some(other) => {
            return Err(EvalError::ValueError(format!(
                "unknown conversion specifier {}",
                other
            )))
        }
    };
    format_value(&value, spec)
}

fn positional(args: &[Value], index: usize) -> Result<Value, EvalError> {
    args.get(index)
        .cloned()
        .ok_or_else(|| EvalError::IndexError("replacement".to_string()))
}
