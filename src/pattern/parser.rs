//! Разбор исходного текста шаблона в последовательность узлов.
//!
//! Шаблон проверяется целиком на этапе разбора, поэтому матчер получает
//! уже корректную программу.

use super::class::{ByteSet, SetItem, Single};
use crate::error::PatternError;

/// Предел числа захватов в одном шаблоне.
pub const MAX_CAPTURES: usize = 32;

/// Символы, при отсутствии которых шаблон ищется как обычная подстрока.
const SPECIALS: &[u8] = b"^$*+?.([%-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// ровно один
    One,
    /// `?`
    Optional,
    /// `*`, жадно
    ZeroOrMore,
    /// `+`, жадно
    OneOrMore,
    /// `-`, лениво
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Single(Single, Quantifier),
    /// `(`: начало захвата с данным номером
    Open(usize),
    /// `)`: конец захвата
    Close(usize),
    /// `()`: захват позиции
    Position(usize),
    /// `%bxy`
    Balance(u8, u8),
    /// `%f[set]`
    Frontier(ByteSet),
    /// `%1`..`%9`
    BackRef(usize),
    /// `$` в конце шаблона
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Шаблон начинается с `^`
    pub anchored: bool,
    pub nodes: Vec<Node>,
    pub captures: usize,
    /// Байты шаблона без спецсимволов, если он является простой подстрокой
    pub literal: Option<Vec<u8>>,
}

pub fn parse(src: &[u8]) -> Result<Program, PatternError> {
    // Шаблон без спецсимволов ищется как подстрока и не разбирается,
    // поэтому одиночная `)` в нём остаётся обычным байтом.
    if !src.iter().any(|b| SPECIALS.contains(b)) {
        return Ok(Program {
            anchored: false,
            nodes: Vec::new(),
            captures: 0,
            literal: Some(src.to_vec()),
        });
    }

    let anchored = src.first() == Some(&b'^');
    let mut i = usize::from(anchored);
    let mut nodes = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut closed: Vec<bool> = Vec::new();

    while i < src.len() {
        match src[i] {
            b'(' => {
                if closed.len() >= MAX_CAPTURES {
                    return Err(PatternError::TooManyCaptures);
                }
                let index = closed.len();
                if src.get(i + 1) == Some(&b')') {
                    nodes.push(Node::Position(index));
                    closed.push(true);
                    i += 2;
                } else {
                    nodes.push(Node::Open(index));
                    open.push(index);
                    closed.push(false);
                    i += 1;
                }
                continue;
            }
            b')' => {
                let index = open.pop().ok_or(PatternError::UnmatchedCaptureClose)?;
                closed[index] = true;
                nodes.push(Node::Close(index));
                i += 1;
                continue;
            }
            b'$' if i + 1 == src.len() => {
                nodes.push(Node::End);
                i += 1;
                continue;
            }
            b'%' => match src.get(i + 1) {
                None => return Err(PatternError::TrailingEscape),
                Some(b'b') => {
                    let (Some(&first), Some(&last)) = (src.get(i + 2), src.get(i + 3)) else {
                        return Err(PatternError::MissingBalanceArgs);
                    };
                    nodes.push(Node::Balance(first, last));
                    i += 4;
                    continue;
                }
                Some(b'f') => {
                    i += 2;
                    if src.get(i) != Some(&b'[') {
                        return Err(PatternError::MissingFrontierSet);
                    }
                    let close = class_end(src, i)?;
                    nodes.push(Node::Frontier(parse_set(src, i, close)));
                    i = close + 1;
                    continue;
                }
                Some(&digit) if digit.is_ascii_digit() => {
                    let number = usize::from(digit - b'0');
                    match number.checked_sub(1) {
                        Some(index) if closed.get(index) == Some(&true) => {
                            nodes.push(Node::BackRef(index));
                        }
                        _ => return Err(PatternError::InvalidCaptureIndex(number)),
                    }
                    i += 2;
                    continue;
                }
                Some(_) => {}
            },
            _ => {}
        }

        let (single, next) = parse_single(src, i)?;
        let quantifier = match src.get(next) {
            Some(b'?') => Quantifier::Optional,
            Some(b'*') => Quantifier::ZeroOrMore,
            Some(b'+') => Quantifier::OneOrMore,
            Some(b'-') => Quantifier::Lazy,
            _ => Quantifier::One,
        };
        i = if quantifier == Quantifier::One {
            next
        } else {
            next + 1
        };
        nodes.push(Node::Single(single, quantifier));
    }

    if !open.is_empty() {
        return Err(PatternError::UnfinishedCapture);
    }

    Ok(Program {
        anchored,
        nodes,
        captures: closed.len(),
        literal: None,
    })
}

fn parse_single(
    src: &[u8],
    i: usize,
) -> Result<(Single, usize), PatternError> {
    match src[i] {
        b'.' => Ok((Single::Any, i + 1)),
        b'%' => {
            let escaped = *src.get(i + 1).ok_or(PatternError::TrailingEscape)?;
            Ok((Single::escaped(escaped), i + 2))
        }
        b'[' => {
            let close = class_end(src, i)?;
            Ok((Single::Set(parse_set(src, i, close)), close + 1))
        }
        b => Ok((Single::Byte(b), i + 1)),
    }
}

/// Находит закрывающую `]` набора, начинающегося в `open`.
///
/// Первый элемент набора потребляется безусловно, так что `[]]` означает
/// набор из одной `]`, а `%]` экранирует скобку.
fn class_end(
    src: &[u8],
    open: usize,
) -> Result<usize, PatternError> {
    let mut p = open + 1;
    if src.get(p) == Some(&b'^') {
        p += 1;
    }
    loop {
        let Some(&c) = src.get(p) else {
            return Err(PatternError::MissingBracket);
        };
        p += 1;
        if c == b'%' && p < src.len() {
            p += 1;
        }
        if src.get(p) == Some(&b']') {
            return Ok(p);
        }
    }
}

fn parse_set(
    src: &[u8],
    open: usize,
    close: usize,
) -> ByteSet {
    let mut j = open + 1;
    let negated = src.get(j) == Some(&b'^');
    if negated {
        j += 1;
    }

    let mut items = Vec::new();
    while j < close {
        let c = src[j];
        if c == b'%' && j + 1 < close {
            items.push(match Single::escaped(src[j + 1]) {
                Single::Class { class, negated } => SetItem::Class { class, negated },
                _ => SetItem::Byte(src[j + 1]),
            });
            j += 2;
        } else if src.get(j + 1) == Some(&b'-') && j + 2 < close {
            items.push(SetItem::Range(c, src[j + 2]));
            j += 3;
        } else {
            items.push(SetItem::Byte(c));
            j += 1;
        }
    }

    ByteSet { negated, items }
}
