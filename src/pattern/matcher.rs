//! Сопоставление с возвратами (backtracking) по разобранной программе.

use std::ops::Range;

use super::parser::{Node, Program, Quantifier};
use crate::error::PatternError;

/// Предел глубины рекурсии сопоставления.
pub const MAX_DEPTH: usize = 200;

/// Значение захвата после успешного сопоставления.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Диапазон байтов темы, захваченный `(...)`
    Span(Range<usize>),
    /// Позиция, захваченная `()`
    Position(usize),
}

/// Найденное совпадение: байтовый диапазон и захваты по порядку.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub range: Range<usize>,
    pub captures: Vec<Capture>,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Unset,
    Open(usize),
    Span(usize, usize),
    Position(usize),
}

struct State<'a> {
    subject: &'a [u8],
    nodes: &'a [Node],
    slots: Vec<Slot>,
    require_end: bool,
    depth: usize,
}

/// Ищет первое совпадение.
///
/// При `full == true` совпадение обязано начинаться в 0 и покрывать всю
/// тему целиком.
pub fn find(
    program: &Program,
    subject: &[u8],
    full: bool,
) -> Result<Option<Match>, PatternError> {
    if let Some(literal) = &program.literal {
        let start = if full {
            (subject == literal.as_slice()).then_some(0)
        } else {
            memchr::memmem::find(subject, literal)
        };
        return Ok(start.map(|start| Match {
            range: start..start + literal.len(),
            captures: Vec::new(),
        }));
    }

    let mut state = State {
        subject,
        nodes: &program.nodes,
        slots: vec![Slot::Unset; program.captures],
        require_end: full,
        depth: 0,
    };
    let last_start = if program.anchored || full {
        0
    } else {
        subject.len()
    };

    for start in 0..=last_start {
        if let Some(end) = state.run(start, 0)? {
            return Ok(Some(Match {
                range: start..end,
                captures: state.captures(),
            }));
        }
    }
    Ok(None)
}

impl State<'_> {
    fn run(
        &mut self,
        s: usize,
        n: usize,
    ) -> Result<Option<usize>, PatternError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            self.depth -= 1;
            return Err(PatternError::TooComplex);
        }
        let result = self.step(s, n);
        self.depth -= 1;
        result
    }

    fn step(
        &mut self,
        mut s: usize,
        mut n: usize,
    ) -> Result<Option<usize>, PatternError> {
        let subject = self.subject;
        let nodes = self.nodes;

        loop {
            let Some(node) = nodes.get(n) else {
                let done = !self.require_end || s == subject.len();
                return Ok(done.then_some(s));
            };

            match node {
                Node::Single(single, quantifier) => {
                    let hit = |at: usize| subject.get(at).is_some_and(|&b| single.matches(b));
                    match quantifier {
                        Quantifier::One => {
                            if !hit(s) {
                                return Ok(None);
                            }
                            s += 1;
                            n += 1;
                        }
                        Quantifier::Optional => {
                            if hit(s) {
                                if let Some(end) = self.run(s + 1, n + 1)? {
                                    return Ok(Some(end));
                                }
                            }
                            n += 1;
                        }
                        Quantifier::ZeroOrMore | Quantifier::OneOrMore => {
                            let min = usize::from(*quantifier == Quantifier::OneOrMore);
                            let mut count = 0;
                            while hit(s + count) {
                                count += 1;
                            }
                            if count < min {
                                return Ok(None);
                            }
                            loop {
                                if let Some(end) = self.run(s + count, n + 1)? {
                                    return Ok(Some(end));
                                }
                                if count == min {
                                    return Ok(None);
                                }
                                count -= 1;
                            }
                        }
                        Quantifier::Lazy => {
                            let mut at = s;
                            loop {
                                if let Some(end) = self.run(at, n + 1)? {
                                    return Ok(Some(end));
                                }
                                if !hit(at) {
                                    return Ok(None);
                                }
                                at += 1;
                            }
                        }
                    }
                }
                Node::Open(index) => return self.with_slot(*index, Slot::Open(s), s, n),
                Node::Position(index) => return self.with_slot(*index, Slot::Position(s), s, n),
                Node::Close(index) => {
                    let Slot::Open(start) = self.slots[*index] else {
                        return Err(PatternError::UnmatchedCaptureClose);
                    };
                    return self.with_slot(*index, Slot::Span(start, s), s, n);
                }
                Node::Balance(open, close) => match balance(subject, s, *open, *close) {
                    Some(end) => {
                        s = end;
                        n += 1;
                    }
                    None => return Ok(None),
                },
                Node::Frontier(set) => {
                    let prev = if s == 0 { 0 } else { subject[s - 1] };
                    let current = subject.get(s).copied().unwrap_or(0);
                    if set.contains(prev) || !set.contains(current) {
                        return Ok(None);
                    }
                    n += 1;
                }
                Node::BackRef(index) => {
                    // Ссылка на позиционный захват `()` никогда не совпадает.
                    let Slot::Span(from, to) = self.slots[*index] else {
                        return Ok(None);
                    };
                    let captured = &subject[from..to];
                    if !subject[s..].starts_with(captured) {
                        return Ok(None);
                    }
                    s += captured.len();
                    n += 1;
                }
                Node::End => return Ok((s == subject.len()).then_some(s)),
            }
        }
    }

    /// Выставляет слот захвата и продолжает сопоставление; при неудаче
    /// возвращает слоту прежнее значение.
    fn with_slot(
        &mut self,
        index: usize,
        slot: Slot,
        s: usize,
        n: usize,
    ) -> Result<Option<usize>, PatternError> {
        let previous = std::mem::replace(&mut self.slots[index], slot);
        let result = self.run(s, n + 1)?;
        if result.is_none() {
            self.slots[index] = previous;
        }
        Ok(result)
    }

    fn captures(&self) -> Vec<Capture> {
        self.slots
            .iter()
            .filter_map(|slot| match *slot {
                Slot::Span(from, to) => Some(Capture::Span(from..to)),
                Slot::Position(at) => Some(Capture::Position(at)),
                Slot::Unset | Slot::Open(_) => None,
            })
            .collect()
    }
}

/// `%bxy`: от `open` до парной ей `close`.
fn balance(
    subject: &[u8],
    s: usize,
    open: u8,
    close: u8,
) -> Option<usize> {
    if subject.get(s) != Some(&open) {
        return None;
    }
    let mut depth = 1usize;
    for (i, &b) in subject.iter().enumerate().skip(s + 1) {
        if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        } else if b == open {
            depth += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::pattern::parser::parse;

    fn span(
        pattern: &str,
        subject: &str,
    ) -> Option<Range<usize>> {
        let program = parse(pattern.as_bytes()).unwrap();
        find(&program, subject.as_bytes(), false)
            .unwrap()
            .map(|m| m.range)
    }

    #[rstest]
    #[case("Stop", "Sequencer|Transport|Stop", Some(20..24))]
    #[case("Stop", "Sequencer|Transport|Play", None)]
    #[case("%w+", "||Play|", Some(2..6))]
    #[case("^Seq", "Sequencer", Some(0..3))]
    #[case("^Transport", "Sequencer|Transport", None)]
    #[case("Play$", "Sequencer|Transport|Play", Some(20..24))]
    #[case("Play$", "Sequencer|Transport|PlayHead", None)]
    #[case("a.-b", "xaxxbxxb", Some(1..5))]
    #[case("a.*b", "xaxxbxxb", Some(1..8))]
    #[case("colou?r", "my color", Some(3..8))]
    #[case("[%d]+", "Beat 128", Some(5..8))]
    #[case("[^|]+$", "Mixer|Channel|Volume", Some(14..20))]
    #[case("", "anything", Some(0..0))]
    #[case("x*", "abc", Some(0..0))]
    fn test_find_span(
        #[case] pattern: &str,
        #[case] subject: &str,
        #[case] expected: Option<Range<usize>>,
    ) {
        assert_eq!(span(pattern, subject), expected);
    }

    #[test]
    fn test_balance() {
        assert_eq!(span("%b()", "f(a(b)c)d"), Some(1..8));
        assert_eq!(span("%b()", "f(a(b"), None);
    }

    /// Тест проверяет границу `%f`: слово "Play" отдельно, но не внутри
    /// "Playlist".
    #[test]
    fn test_frontier() {
        assert_eq!(span("%f[%w]Play%f[%W]", "Transport|Play"), Some(10..14));
        assert_eq!(span("%f[%w]Play%f[%W]", "Transport|Playlist"), None);
    }

    #[test]
    fn test_captures_and_backref() {
        let program = parse(b"(%w+)|()%1").unwrap();
        let found = find(&program, b"echo|echo", false).unwrap().unwrap();
        assert_eq!(found.range, 0..9);
        assert_eq!(
            found.captures,
            vec![Capture::Span(0..4), Capture::Position(5)]
        );
        assert!(find(&program, b"echo|ping", false).unwrap().is_none());
    }

    #[test]
    fn test_backref_to_position_never_matches() {
        let program = parse(b"()%1").unwrap();
        assert!(find(&program, b"anything", false).unwrap().is_none());
        assert!(find(&program, b"", false).unwrap().is_none());
    }

    /// Тест проверяет режим полного совпадения: захваты и `-` должны
    /// дотянуться до конца темы.
    #[test]
    fn test_full_match() {
        let program = parse(b"Sequencer|Transport|%w-").unwrap();
        let found = find(&program, b"Sequencer|Transport|Play", true)
            .unwrap()
            .unwrap();
        assert_eq!(found.range, 0..24);
        assert!(find(&program, b"xSequencer|Transport|Play", true)
            .unwrap()
            .is_none());
        assert!(find(&program, b"Sequencer|Transport|Play|Now", true)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_full_match_literal() {
        let program = parse(b"Stop").unwrap();
        assert!(find(&program, b"Stop", true).unwrap().is_some());
        assert!(find(&program, b"Transport|Stop", true).unwrap().is_none());
    }

    #[test]
    fn test_too_complex() {
        let pattern = "a?".repeat(MAX_DEPTH + 1);
        let program = parse(pattern.as_bytes()).unwrap();
        let subject = "a".repeat(MAX_DEPTH + 1);
        assert_eq!(
            find(&program, subject.as_bytes(), false).unwrap_err(),
            PatternError::TooComplex
        );
    }
}
