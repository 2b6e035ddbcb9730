//! Property-input parsing for the properties panel.
//!
//! Built on `winnow` 0.7. Each value has a strict `try_parse_*` form that
//! returns `None` on malformed input and a lenient `parse_*` form that
//! coerces garbage to zero the way a numeric text field does.

use crate::model::{Length, Sides};
use winnow::ascii::{Caseless, space1};
use winnow::combinator::{alt, opt, separated, terminated};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

// ─── Grammar ─────────────────────────────────────────────────────────────

fn number(input: &mut &str) -> ModalResult<f64> {
    (
        opt(one_of(['-', '+'])),
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.'),
    )
        .take()
        .try_map(str::parse::<f64>)
        .parse_next(input)
}

fn pixels(input: &mut &str) -> ModalResult<f64> {
    terminated(number, opt(Caseless("px"))).parse_next(input)
}

fn length(input: &mut &str) -> ModalResult<Length> {
    alt((
        Caseless("auto").value(Length::Auto),
        terminated(number, '%').map(Length::Percent),
        pixels.map(Length::Pixels),
    ))
    .parse_next(input)
}

fn sides(input: &mut &str) -> ModalResult<Sides> {
    let values: Vec<f64> = separated(1..=4, pixels, space1).parse_next(input)?;
    Ok(match values.as_slice() {
        [all] => Sides::uniform(*all),
        [v, h] => Sides::symmetric(*v, *h),
        [t, h, b] => Sides::new(*t, *h, *b, *h),
        [t, r, b, l, ..] => Sides::new(*t, *r, *b, *l),
        [] => Sides::default(),
    })
}

// ─── Strict entry points ─────────────────────────────────────────────────

/// A whole-string number, optionally suffixed with `px`.
pub fn try_parse_number(s: &str) -> Option<f64> {
    pixels.parse(s.trim()).ok()
}

/// `240`, `240px`, `50%`, or `auto`.
pub fn try_parse_length(s: &str) -> Option<Length> {
    length.parse(s.trim()).ok()
}

/// One to four space-separated values, CSS shorthand order
/// (`10`, `10 20`, `10 20 30`, `10 20 30 40`).
pub fn try_parse_sides(s: &str) -> Option<Sides> {
    sides.parse(s.trim()).ok()
}

// ─── Lenient entry points ────────────────────────────────────────────────

/// Leading number of `s`, ignoring trailing text; `0` if there is none.
pub fn parse_number(s: &str) -> f64 {
    let mut rest = s.trim_start();
    number.parse_next(&mut rest).unwrap_or(0.0)
}

/// Like [`try_parse_length`], but falls back to pixels of the leading number.
pub fn parse_length(s: &str) -> Length {
    try_parse_length(s).unwrap_or_else(|| Length::Pixels(parse_number(s)))
}

/// Like [`try_parse_sides`], but falls back to a uniform leading number.
pub fn parse_sides(s: &str) -> Sides {
    try_parse_sides(s).unwrap_or_else(|| Sides::uniform(parse_number(s)))
}
