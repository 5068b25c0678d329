//! Одиночные элементы шаблона: то, что сопоставляется ровно с одним байтом.

/// Класс символов `%a`, `%d`, `%w`, ... в локали "C".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Alpha,
    Control,
    Digit,
    Graph,
    Lower,
    Punct,
    Space,
    Upper,
    Alnum,
    HexDigit,
}

impl CharClass {
    /// Разбирает букву класса. Заглавная буква означает дополнение класса.
    pub fn from_letter(letter: u8) -> Option<(CharClass, bool)> {
        let class = match letter.to_ascii_lowercase() {
            b'a' => CharClass::Alpha,
            b'c' => CharClass::Control,
            b'd' => CharClass::Digit,
            b'g' => CharClass::Graph,
            b'l' => CharClass::Lower,
            b'p' => CharClass::Punct,
            b's' => CharClass::Space,
            b'u' => CharClass::Upper,
            b'w' => CharClass::Alnum,
            b'x' => CharClass::HexDigit,
            _ => return None,
        };
        Some((class, letter.is_ascii_uppercase()))
    }

    pub fn contains(
        self,
        b: u8,
    ) -> bool {
        match self {
            CharClass::Alpha => b.is_ascii_alphabetic(),
            CharClass::Control => b.is_ascii_control(),
            CharClass::Digit => b.is_ascii_digit(),
            CharClass::Graph => b.is_ascii_graphic(),
            CharClass::Lower => b.is_ascii_lowercase(),
            CharClass::Punct => b.is_ascii_punctuation(),
            // isspace() из C включает \v, в отличие от is_ascii_whitespace
            CharClass::Space => matches!(b, b' ' | b'\t'..=b'\r'),
            CharClass::Upper => b.is_ascii_uppercase(),
            CharClass::Alnum => b.is_ascii_alphanumeric(),
            CharClass::HexDigit => b.is_ascii_hexdigit(),
        }
    }
}

/// Элемент набора `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetItem {
    Byte(u8),
    Range(u8, u8),
    Class { class: CharClass, negated: bool },
}

impl SetItem {
    fn contains(
        &self,
        b: u8,
    ) -> bool {
        match *self {
            SetItem::Byte(c) => c == b,
            SetItem::Range(lo, hi) => lo <= b && b <= hi,
            SetItem::Class { class, negated } => class.contains(b) != negated,
        }
    }
}

/// Набор `[...]` или `[^...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSet {
    pub negated: bool,
    pub items: Vec<SetItem>,
}

impl ByteSet {
    pub fn contains(
        &self,
        b: u8,
    ) -> bool {
        self.items.iter().any(|item| item.contains(b)) != self.negated
    }
}

/// Одиночный элемент шаблона.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Single {
    /// `.`
    Any,
    /// Обычный или экранированный через `%` байт
    Byte(u8),
    /// `%a`, `%W`, ...
    Class { class: CharClass, negated: bool },
    /// `[...]`
    Set(ByteSet),
}

impl Single {
    /// Элемент для `%x`: класс, если `x` является буквой класса, иначе сам байт.
    pub fn escaped(b: u8) -> Single {
        match CharClass::from_letter(b) {
            Some((class, negated)) => Single::Class { class, negated },
            None => Single::Byte(b),
        }
    }

    pub fn matches(
        &self,
        b: u8,
    ) -> bool {
        match self {
            Single::Any => true,
            Single::Byte(c) => *c == b,
            Single::Class { class, negated } => class.contains(b) != *negated,
            Single::Set(set) => set.contains(b),
        }
    }
}
