//! Quote-aware scanning helpers for statement rewrites.
//!
//! Quoted text is `'...'` or `"..."` with backslash escapes. By the time
//! these run, backtick identifiers have already become double-quoted.

use std::ops::ControlFlow;

/// Visit every byte outside of `'...'` and `"..."` literals.
pub(super) fn walk_unquoted(s: &str, mut visit: impl FnMut(usize, u8) -> ControlFlow<()>) {
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in s.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }
        if b == b'\'' || b == b'"' {
            quote = Some(b);
            continue;
        }
        if visit(i, b).is_break() {
            return;
        }
    }
}

/// Apply `rewrite` to each stretch of `s` outside quotes.
///
/// Quoted text, delimiters included, is copied unchanged. An unterminated
/// quote protects everything up to the end of input.
pub(super) fn map_unquoted(s: &str, mut rewrite: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start = 0;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in s.as_bytes().iter().enumerate() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == q {
                    out.push_str(&s[start..=i]);
                    start = i + 1;
                    quote = None;
                }
            }
            None if b == b'\'' || b == b'"' => {
                out.push_str(&rewrite(&s[start..i]));
                start = i;
                quote = Some(b);
            }
            None => {}
        }
    }

    match quote {
        Some(_) => out.push_str(&s[start..]),
        None => out.push_str(&rewrite(&s[start..])),
    }
    out
}

/// Per-byte flag: `true` where the byte is outside quotes.
pub(super) fn unquoted_mask(s: &str) -> Vec<bool> {
    let mut mask = vec![false; s.len()];
    walk_unquoted(s, |i, _| {
        mask[i] = true;
        ControlFlow::Continue(())
    });
    mask
}

/// Offset in `s` of the `)` closing a list whose `(` immediately precedes `s`.
pub(super) fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut close = None;

    walk_unquoted(s, |i, b| {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    return ControlFlow::Break(());
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    });

    close
}
