//! Translation pipeline tests against in-memory collaborators
//!
//! Run with: cargo test --test translation_pipeline

#[path = "helpers/fakes.rs"]
mod fakes;

use std::sync::Arc;

use proptest::prelude::*;
use signbridge::{
    tokenize, HeuristicEntityDetector, TranslationError, TranslationService,
};

use fakes::{scenario_parts, scenario_service, service, FakeDetector, FakeMatcher, FakeStore};

use signbridge::TranslationKind::{Fingerspell, Skipped, Video};

const SCENARIO: &str = "Hello John, welcome to New York";

#[test]
fn test_scenario_sentence() {
    let result = scenario_service().translate(SCENARIO).unwrap();

    assert_eq!(
        result.kinds(),
        vec![Video, Fingerspell, Video, Skipped, Fingerspell, Fingerspell]
    );
    assert_eq!(result.video_count(), 2);
    assert_eq!(result.fingerspell_count(), 3);
    assert_eq!(result.skipped_count(), 1);
    assert_eq!(result.original_text(), SCENARIO);

    let hello = &result.items()[0];
    assert_eq!(hello.original_word, "Hello");
    assert_eq!(hello.matched_word.as_deref(), Some("hello"));
    assert_eq!(hello.url.as_deref(), Some("/signs/hello.mp4"));
    assert_eq!(hello.similarity, Some(1.0));

    let john = &result.items()[1];
    assert_eq!(john.letters, Some(vec!['j', 'o', 'h', 'n']));
    assert_eq!(john.matched_word, None);
    assert_eq!(john.url, None);
}

#[test]
fn test_scenario_with_heuristic_detector() {
    let (matcher, _, store) = scenario_parts();
    let service = TranslationService::new(
        matcher,
        Arc::new(HeuristicEntityDetector::default()),
        store,
    );

    let result = service.translate(SCENARIO).unwrap();
    assert_eq!(
        result.kinds(),
        vec![Video, Fingerspell, Video, Skipped, Fingerspell, Fingerspell]
    );
}

#[test]
fn test_semantic_match_uses_vocabulary_video() {
    let matcher = Arc::new(FakeMatcher::new(&["hello"]).with_neighbour("hi", "hello", 0.83));
    let detector = Arc::new(FakeDetector::default());
    let store = Arc::new(FakeStore::new(&["hello"]));

    let result = service(&matcher, &detector, &store).translate("Hi").unwrap();
    let item = &result.items()[0];
    assert_eq!(item.kind, Video);
    assert_eq!(item.original_word, "Hi");
    assert_eq!(item.matched_word.as_deref(), Some("hello"));
    assert_eq!(item.similarity, Some(0.83));
}

#[test]
fn test_threshold_boundary() {
    let matcher = Arc::new(
        FakeMatcher::new(&["hello"])
            .with_neighbour("hey", "hello", fakes::THRESHOLD)
            .with_neighbour("yo", "hello", 0.69),
    );
    let detector = Arc::new(FakeDetector::default());
    let store = Arc::new(FakeStore::new(&["hello"]));

    let result = service(&matcher, &detector, &store).translate("hey yo").unwrap();
    assert_eq!(result.kinds(), vec![Video, Skipped]);
    assert_eq!(result.items()[1].similarity, Some(0.69));
}

#[test]
fn test_vocabulary_word_without_video_falls_through() {
    // "present" matches "gift" but the store has no gift video
    let matcher = Arc::new(FakeMatcher::new(&["gift"]).with_neighbour("present", "gift", 0.85));
    let detector = Arc::new(FakeDetector::default());
    let store = Arc::new(FakeStore::new(&[]));

    let result = service(&matcher, &detector, &store).translate("present").unwrap();
    let item = &result.items()[0];
    assert_eq!(item.kind, Skipped);
    assert_eq!(item.matched_word, None);
    assert_eq!(item.similarity, Some(0.85));
    assert_eq!(store.lookup_count(), 1);
}

#[test]
fn test_missing_video_entity_is_fingerspelled() {
    let matcher = Arc::new(FakeMatcher::new(&["paris"]));
    let detector = Arc::new(FakeDetector::new(&[("Paris", "GPE")]));
    let store = Arc::new(FakeStore::new(&[]));

    let result = service(&matcher, &detector, &store).translate("Paris").unwrap();
    let item = &result.items()[0];
    assert_eq!(item.kind, Fingerspell);
    assert_eq!(item.similarity, Some(1.0));
}

#[test]
fn test_fingerspell_letters_per_token() {
    let matcher = Arc::new(FakeMatcher::new(&["hello"]));
    let detector = Arc::new(FakeDetector::new(&[("O", "PERSON"), ("Brien", "PERSON")]));
    let store = Arc::new(FakeStore::new(&["hello"]));

    let result = service(&matcher, &detector, &store).translate("O'Brien").unwrap();
    let letters: Vec<_> = result.items().iter().map(|i| i.letters.clone()).collect();
    assert_eq!(
        letters,
        vec![Some(vec!['o']), Some(vec!['b', 'r', 'i', 'e', 'n'])]
    );
}

#[test]
fn test_ineligible_entity_label_is_skipped() {
    let matcher = Arc::new(FakeMatcher::new(&["hello"]));
    let detector = Arc::new(FakeDetector::new(&[("Tuesday", "DATE")]));
    let store = Arc::new(FakeStore::new(&["hello"]));

    let result = service(&matcher, &detector, &store).translate("Tuesday").unwrap();
    assert_eq!(result.kinds(), vec![Skipped]);
}

#[test]
fn test_entity_detector_called_once_per_call() {
    let (matcher, detector, store) = scenario_parts();
    let service = service(&matcher, &detector, &store);

    service.translate(SCENARIO).unwrap();
    assert_eq!(detector.call_count(), 1);
    assert_eq!(matcher.call_count(), 6);

    service.translate("").unwrap();
    assert_eq!(detector.call_count(), 2);
    assert_eq!(matcher.call_count(), 6);
}

#[test]
fn test_empty_and_non_alphabetic_input() {
    let service = scenario_service();
    for text in ["", "   ", "123 456!", "¿¡"] {
        let result = service.translate(text).unwrap();
        assert_eq!(result.total(), 0, "{text:?}");
        assert_eq!(result.original_text(), text);
    }
}

#[test]
fn test_idempotent() {
    let service = scenario_service();
    let first = service.translate(SCENARIO).unwrap();
    let second = service.translate(SCENARIO).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_matcher_failure_aborts() {
    let matcher = Arc::new(FakeMatcher::failing());
    let (_, detector, store) = scenario_parts();

    let err = service(&matcher, &detector, &store)
        .translate(SCENARIO)
        .unwrap_err();
    assert!(matches!(err, TranslationError::Matcher(_)));
    assert_eq!(matcher.call_count(), 1);
}

#[test]
fn test_detector_failure_aborts_before_matching() {
    let (matcher, _, store) = scenario_parts();
    let detector = Arc::new(FakeDetector::failing());

    let err = service(&matcher, &detector, &store)
        .translate(SCENARIO)
        .unwrap_err();
    assert!(matches!(err, TranslationError::Entity(_)));
    assert_eq!(matcher.call_count(), 0);
}

#[test]
fn test_store_failure_aborts() {
    let (matcher, detector, _) = scenario_parts();
    let store = Arc::new(FakeStore::failing(&["hello", "welcome"]));

    let err = service(&matcher, &detector, &store)
        .translate(SCENARIO)
        .unwrap_err();
    assert!(matches!(err, TranslationError::VideoStore(_)));
    assert!(err.to_string().contains("disk detached"));
}

#[test]
fn test_available_word_count() {
    let service = scenario_service();
    assert_eq!(service.available_word_count(), 2);
    assert_eq!(service.similarity_threshold(), fakes::THRESHOLD);
}

proptest! {
    #[test]
    fn prop_one_item_per_token(text in "[a-zA-Z0-9 ,.'!?é-]{0,80}") {
        let result = scenario_service().translate(&text).unwrap();
        prop_assert_eq!(result.total(), tokenize(&text).len());

        let originals: Vec<String> = result.items().iter().map(|i| i.original_word.clone()).collect();
        let tokens: Vec<String> = tokenize(&text).into_iter().map(|t| t.text).collect();
        prop_assert_eq!(originals, tokens);
    }

    #[test]
    fn prop_counts_match_items(text in "[a-zA-Z ,.]{0,80}") {
        let (matcher, _, store) = scenario_parts();
        let service = TranslationService::new(
            matcher,
            Arc::new(HeuristicEntityDetector::default()),
            store,
        );
        let result = service.translate(&text).unwrap();
        let count = |kind| result.items().iter().filter(|i| i.kind == kind).count();

        prop_assert_eq!(result.video_count(), count(Video));
        prop_assert_eq!(result.fingerspell_count(), count(Fingerspell));
        prop_assert_eq!(result.skipped_count(), count(Skipped));
        prop_assert_eq!(
            result.video_count() + result.fingerspell_count() + result.skipped_count(),
            result.total()
        );
    }
}
