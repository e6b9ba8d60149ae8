//! Literal reader for command line tokens.
//!
//! Accepts the literal subset of the host annotation language: numbers,
//! strings, `True`/`False`/`None`, and list/tuple/dict/set displays nested up
//! to [`MAX_DEPTH`] levels. A bare comma separated sequence at the top level is
//! a tuple. Produces a raw [`Value`] for the coercion engine.
//!
//! ```text
//! token ──read_literal──▶ Value (raw shape) ──coerce──▶ Value (declared shape)
//! ```

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, one_of},
    combinator::{all_consuming, cut, opt, recognize},
    error::{ContextError, ErrorKind, ParseError as NomParseError, context},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};
use sigcli_types::{Dict, LiteralError, Value};

/// Deepest container nesting accepted in a single token.
pub const MAX_DEPTH: usize = 200;

// ============================================================================
// Public API
// ============================================================================

/// Read a complete token as a literal.
pub fn read_literal(input: &str) -> Result<Value, LiteralError> {
    let parsed = all_consuming(delimited(
        multispace0::<_, nom::error::VerboseError<&str>>,
        top_level,
        multispace0,
    ))(input);

    match parsed {
        Ok((_, value)) => Ok(value),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(LiteralError::new(
            input,
            nom::error::convert_error(input, e).trim_end().to_string(),
        )),
        Err(nom::Err::Incomplete(_)) => Err(LiteralError::new(input, "incomplete input")),
    }
}

// ============================================================================
// Internal Parsers
// ============================================================================

/// `1, 2` and `1,` are tuples; a single item without a comma is itself.
fn top_level<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Value, E> {
    let (rest, (mut items, trailing_comma)) = sequence(input, 0)?;
    match items.len() {
        0 => expression(input, 0),
        1 if !trailing_comma => Ok((rest, items.remove(0))),
        _ => Ok((rest, Value::Tuple(items))),
    }
}

/// One literal. `depth` counts the containers enclosing it.
fn expression<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    depth: usize,
) -> IResult<&'a str, Value, E> {
    let (input, _) = multispace0(input)?;
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(E::add_context(
            input,
            "nesting too deep",
            E::from_error_kind(input, ErrorKind::TooLarge),
        )));
    }
    alt((
        strings,
        radix_number,
        decimal_number,
        empty_set,
        keyword,
        |i| list_display(i, depth + 1),
        |i| parenthesized(i, depth + 1),
        |i| braced(i, depth + 1),
    ))(input)
}

/// One or more adjacent string literals, concatenated.
fn strings<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Value, E> {
    let (input, first) = string_literal(input)?;
    let (input, rest) = many0(preceded(multispace0, string_literal))(input)?;
    let mut text = first;
    for part in rest {
        text.push_str(&part);
    }
    Ok((input, Value::Str(text)))
}

fn string_literal<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, String, E> {
    let quote = ["'''", "\"\"\"", "'", "\""]
        .into_iter()
        .find(|q| input.starts_with(q))
        .ok_or_else(|| nom::Err::Error(E::from_error_kind(input, ErrorKind::Char)))?;
    let triple = quote.len() == 3;
    let body = &input[quote.len()..];
    let unterminated = || nom::Err::Failure(E::from_error_kind(input, ErrorKind::Char));

    let mut out = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if body[i..].starts_with(quote) {
            return Ok((&body[i + quote.len()..], out));
        }
        match c {
            '\\' => {
                let (_, escaped) = chars.next().ok_or_else(unterminated)?;
                match escaped {
                    '\n' => {}
                    '\\' => out.push('\\'),
                    '\'' => out.push('\''),
                    '"' => out.push('"'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    '0'..='7' => {
                        let mut code = escaped.to_digit(8).unwrap_or_default();
                        for _ in 0..2 {
                            let Some(digit) = chars.peek().and_then(|(_, d)| d.to_digit(8)) else {
                                break;
                            };
                            code = code * 8 + digit;
                            chars.next();
                        }
                        let decoded = char::from_u32(code).ok_or_else(|| {
                            nom::Err::Failure(E::from_error_kind(input, ErrorKind::Escaped))
                        })?;
                        out.push(decoded);
                    }
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0c}'),
                    'v' => out.push('\u{0b}'),
                    'x' | 'u' | 'U' => {
                        let width = match escaped {
                            'x' => 2,
                            'u' => 4,
                            _ => 8,
                        };
                        let digits: String = chars.by_ref().take(width).map(|(_, d)| d).collect();
                        let decoded = (digits.len() == width)
                            .then(|| u32::from_str_radix(&digits, 16).ok())
                            .flatten()
                            .and_then(char::from_u32)
                            .ok_or_else(|| {
                                nom::Err::Failure(E::from_error_kind(input, ErrorKind::Escaped))
                            })?;
                        out.push(decoded);
                    }
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            '\n' if !triple => return Err(unterminated()),
            c => out.push(c),
        }
    }
    Err(unterminated())
}

fn digits<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while1(|c: char| c.is_ascii_digit() || c == '_')(input)
}

/// Underscores may only separate two digits.
fn valid_underscores(text: &str, is_digit: impl Fn(char) -> bool) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.iter().enumerate().all(|(i, c)| {
        *c != '_'
            || (i > 0 && i + 1 < chars.len() && is_digit(chars[i - 1]) && is_digit(chars[i + 1]))
    })
}

fn radix_number<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Value, E> {
    let (rest, (sign, _, prefix, body)) = tuple((
        opt(one_of("+-")),
        char('0'),
        one_of("xXoObB"),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)?;

    let radix = match prefix {
        'x' | 'X' => 16,
        'o' | 'O' => 8,
        _ => 2,
    };
    let trimmed = body.strip_prefix('_').unwrap_or(body);
    let invalid = || nom::Err::Failure(E::from_error_kind(input, ErrorKind::Digit));
    if !valid_underscores(trimmed, |c| c.is_digit(radix)) {
        return Err(invalid());
    }
    let magnitude = u64::from_str_radix(&trimmed.replace('_', ""), radix).map_err(|_| invalid())?;
    let value = signed(magnitude, sign == Some('-'))
        .ok_or_else(|| nom::Err::Failure(E::from_error_kind(input, ErrorKind::TooLarge)))?;
    Ok((rest, Value::Int(value)))
}

fn signed(magnitude: u64, negative: bool) -> Option<i64> {
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

fn decimal_number<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Value, E> {
    let (rest, text) = recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digits, opt(pair(char('.'), opt(digits))))),
            recognize(pair(char('.'), digits)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digits))),
    )))(input)?;

    let invalid = || nom::Err::Failure(E::from_error_kind(input, ErrorKind::Digit));
    if !valid_underscores(text, |c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let cleaned = text.replace('_', "");

    if cleaned.contains(['.', 'e', 'E']) {
        let value: f64 = cleaned.parse().map_err(|_| invalid())?;
        return Ok((rest, Value::Float(value)));
    }

    let unsigned = cleaned.trim_start_matches(['+', '-']);
    if unsigned.len() > 1 && unsigned.starts_with('0') && unsigned.chars().any(|c| c != '0') {
        return Err(invalid());
    }
    let magnitude: u64 = unsigned
        .parse()
        .map_err(|_| nom::Err::Failure(E::from_error_kind(input, ErrorKind::TooLarge)))?;
    let value = signed(magnitude, cleaned.starts_with('-'))
        .ok_or_else(|| nom::Err::Failure(E::from_error_kind(input, ErrorKind::TooLarge)))?;
    Ok((rest, Value::Int(value)))
}

fn keyword<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Value, E> {
    let (rest, word) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    match word {
        "True" => Ok((rest, Value::Bool(true))),
        "False" => Ok((rest, Value::Bool(false))),
        "None" => Ok((rest, Value::None)),
        _ => Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Tag))),
    }
}

/// `set()` is the only spelling of an empty set.
fn empty_set<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Value, E> {
    let (rest, _) = tuple((tag("set"), multispace0, char('('), multispace0, char(')')))(input)?;
    Ok((rest, Value::set([])))
}

/// Comma separated expressions with an optional trailing comma. Returns the
/// items and whether the last thing consumed was a comma.
fn sequence<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    depth: usize,
) -> IResult<&'a str, (Vec<Value>, bool), E> {
    let mut items = Vec::new();
    let mut trailing_comma = false;
    let mut rest = input;
    loop {
        match expression::<E>(rest, depth) {
            Ok((r, item)) => {
                items.push(item);
                trailing_comma = false;
                rest = r;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
        let (r, _) = multispace0(rest)?;
        match char::<_, E>(',')(r) {
            Ok((r, _)) => {
                trailing_comma = true;
                rest = r;
            }
            Err(nom::Err::Error(_)) => {
                rest = r;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    let (rest, _) = multispace0(rest)?;
    Ok((rest, (items, trailing_comma)))
}

fn list_display<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    depth: usize,
) -> IResult<&'a str, Value, E> {
    let (input, _) = char('[')(input)?;
    let (input, (items, _)) = sequence(input, depth)?;
    let (input, _) = cut(context("closing bracket", char(']')))(input)?;
    Ok((input, Value::List(items)))
}

/// A tuple display, or a parenthesised expression when there is exactly one
/// item and no trailing comma.
fn parenthesized<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    depth: usize,
) -> IResult<&'a str, Value, E> {
    let (input, _) = char('(')(input)?;
    let (input, (mut items, trailing_comma)) = sequence(input, depth)?;
    let (input, _) = cut(context("closing parenthesis", char(')')))(input)?;
    if items.len() == 1 && !trailing_comma {
        return Ok((input, items.remove(0)));
    }
    Ok((input, Value::Tuple(items)))
}

/// `{}` is an empty dict; otherwise the first item decides dict or set.
fn braced<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    depth: usize,
) -> IResult<&'a str, Value, E> {
    let (input, _) = char('{')(input)?;
    let (input, _) = multispace0(input)?;
    if let Ok((rest, _)) = char::<_, E>('}')(input) {
        return Ok((rest, Value::Dict(Dict::new())));
    }

    let (after_first, first) = cut(|i| expression(i, depth))(input)?;
    let (after_first, _) = multispace0(after_first)?;

    if char::<_, E>(':')(after_first).is_err() {
        let (rest, (more, _)) = match char::<_, E>(',')(after_first) {
            Ok((r, _)) => sequence(r, depth)?,
            Err(_) => (after_first, (Vec::new(), false)),
        };
        let (rest, _) = cut(context("closing brace", char('}')))(rest)?;
        let mut items = vec![first];
        items.extend(more);
        return Ok((rest, Value::set(items)));
    }

    let mut dict = Dict::new();
    let mut key = first;
    let mut rest = after_first;
    loop {
        let (r, _) = cut(context("colon", char(':')))(rest)?;
        let (r, value) = cut(|i| expression(i, depth))(r)?;
        dict.insert(key, value);
        let (r, _) = multispace0(r)?;
        let Ok((r, _)) = char::<_, E>(',')(r) else {
            rest = r;
            break;
        };
        match expression::<E>(r, depth) {
            Ok((r, next_key)) => {
                let (r, _) = multispace0(r)?;
                key = next_key;
                rest = r;
            }
            Err(nom::Err::Error(_)) => {
                let (r, _) = multispace0(r)?;
                rest = r;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    let (rest, _) = cut(context("closing brace", char('}')))(rest)?;
    Ok((rest, Value::Dict(dict)))
}
