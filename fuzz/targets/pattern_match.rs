#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use panelbus::{MatchMode, Pattern, PatternError, TopicMatcher};

#[derive(Debug, Arbitrary)]
enum FuzzMode {
    Partial,
    Anchored,
    Glob,
}

impl From<FuzzMode> for MatchMode {
    fn from(mode: FuzzMode) -> Self {
        match mode {
            FuzzMode::Partial => MatchMode::Partial,
            FuzzMode::Anchored => MatchMode::Anchored,
            FuzzMode::Glob => MatchMode::Glob,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    pattern: String,
    topic: String,
    mode: FuzzMode,
}

fuzz_target!(|input: FuzzInput| {
    // Ни компиляция, ни сопоставление не должны паниковать.
    if let Ok(matcher) = TopicMatcher::compile(&input.pattern, MatchMode::from(input.mode)) {
        match matcher.matches(&input.topic) {
            Ok(_) | Err(PatternError::TooComplex) => {}
            Err(err) => panic!("unexpected match error {err:?} for {:?}", input.pattern),
        }
    }

    // Найденный диапазон всегда лежит внутри темы.
    if let Ok(pattern) = Pattern::new(&input.pattern) {
        if let Ok(Some(found)) = pattern.find(&input.topic) {
            assert!(found.range.start <= found.range.end);
            assert!(found.range.end <= input.topic.len());
        }
    }
});
