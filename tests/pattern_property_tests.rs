use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use serde_json::Value;

use panelbus::{subscriber_fn, Bus, Pattern};

/// Экранирует всё, кроме букв и цифр, через `%`.
fn escape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() * 2);
    for c in literal.chars() {
        if !c.is_ascii_alphanumeric() {
            out.push('%');
        }
        out.push(c);
    }
    out
}

fn token() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "x", "y", "%w", "%d", "%a+", "[xy]", "%w*", ".", "x?", "y-", "[^|]",
    ])
}

proptest! {
    #[test]
    fn prop_literal_pattern_is_substring_search(
        pattern in "[A-Za-z0-9|]{0,6}",
        topic in "[A-Za-z0-9|]{0,24}",
    ) {
        let compiled = Pattern::new(&pattern).unwrap();
        prop_assert!(compiled.is_literal());
        prop_assert_eq!(compiled.is_match(&topic).unwrap(), topic.contains(pattern.as_str()));
        prop_assert_eq!(compiled.is_full_match(&topic).unwrap(), topic == pattern);
    }
}

proptest! {
    #[test]
    fn prop_escaped_pattern_matches_literally(
        literal in "[ -~]{1,6}",
        prefix in "[ -~]{0,8}",
        suffix in "[ -~]{0,8}",
    ) {
        let compiled = Pattern::new(&escape(&literal)).unwrap();
        let topic = format!("{prefix}{literal}{suffix}");
        let found = compiled.find(&topic).unwrap();
        prop_assert!(found.is_some());

        let expected = topic.find(literal.as_str()).unwrap();
        prop_assert_eq!(found.unwrap().range, expected..expected + literal.len());
    }
}

proptest! {
    #[test]
    fn prop_full_match_implies_partial_match(
        tokens in prop::collection::vec(token(), 1..6),
        topic in "[xy0-9|]{0,10}",
    ) {
        let compiled = Pattern::new(&tokens.concat()).unwrap();
        let partial = compiled.find(&topic).unwrap();
        let full = compiled.find_full(&topic).unwrap();

        if let Some(full) = &full {
            prop_assert_eq!(full.range.clone(), 0..topic.len());
            prop_assert!(partial.is_some());
        }
        if let Some(partial) = partial {
            prop_assert!(partial.range.start <= partial.range.end);
            prop_assert!(partial.range.end <= topic.len());
        }
    }
}

proptest! {
    #[test]
    fn prop_delivery_follows_registration_order(
        registrations in prop::collection::vec(
            (prop::sample::select(vec!["Transport", "Mixer", "Play", "|", ""]), 0usize..4),
            0..20,
        ),
        topic in prop::sample::select(vec![
            "Sequencer|Transport|Play",
            "Mixer|Volume",
            "Sequencer|PlayHead|CurrentBeat",
            "Idle",
        ]),
    ) {
        let bus = Bus::new();
        let log: Arc<Mutex<Vec<usize>>> = Arc::default();
        let subscribers: Vec<_> = (0..4)
            .map(|i| {
                let log = log.clone();
                subscriber_fn(format!("S{i}"), move |_, _| {
                    log.lock().unwrap().push(i);
                    Ok(())
                })
            })
            .collect();

        for (pattern, index) in &registrations {
            bus.register(*pattern, &subscribers[*index]);
        }
        bus.publish(topic, &Value::Null);

        let expected: Vec<usize> = registrations
            .iter()
            .filter(|(pattern, _)| topic.contains(pattern))
            .map(|(_, index)| *index)
            .collect();
        prop_assert_eq!(log.lock().unwrap().clone(), expected);
    }
}
