//! Behavioral contract every similarity engine must satisfy
//!
//! The portable half is `#[ignore]`d because it needs the `entities-wasm`
//! build. Run it with:
//!
//! ```text
//! cargo build -p entities-wasm --target wasm32-unknown-unknown --release
//! cargo test -p entities-core -- --ignored
//! ```

mod common;

use entities_core::engine::{ReferenceEngine, SimilarityEngine};

const PAIRS: &[(&str, &str)] = &[
    ("kitten", "sitting"),
    ("apple", "appels"),
    ("strawbery", "strawberry"),
    ("new-york", "new-yorkers"),
    ("martha", "marhta"),
    ("dixon", "dicksonx"),
    ("", "abc"),
    ("", ""),
    ("café", "cafe"),
    ("blue berries", "blueberry"),
];

fn check_contract(engine: &dyn SimilarityEngine) {
    for (a, b) in PAIRS {
        let distance = engine.edit_distance(a, b).unwrap();
        assert_eq!(distance, engine.edit_distance(b, a).unwrap(), "{a} / {b}");
        assert_eq!(distance, strsim::levenshtein(a, b), "{a} / {b}");

        let edit = engine.edit_similarity(a, b).unwrap();
        let jw = engine.jaro_winkler_similarity(a, b).unwrap();
        assert!((0.0..=1.0).contains(&edit), "{a} / {b}: {edit}");
        assert!((0.0..=1.0).contains(&jw), "{a} / {b}: {jw}");
        assert!((edit - engine.edit_similarity(b, a).unwrap()).abs() < 1e-12);
        assert!((jw - engine.jaro_winkler_similarity(b, a).unwrap()).abs() < 1e-12);

        assert_eq!(engine.edit_distance(a, a).unwrap(), 0);
        assert_eq!(engine.edit_similarity(a, a).unwrap(), 1.0);
        assert_eq!(engine.jaro_winkler_similarity(a, a).unwrap(), 1.0);
    }

    assert_eq!(engine.edit_distance("kitten", "sitting").unwrap(), 3);
    assert_eq!(engine.edit_distance("new-york", "new-yorkers").unwrap(), 3);
}

#[test]
fn test_reference_engine_contract() {
    check_contract(&ReferenceEngine);
}

#[cfg(feature = "portable")]
mod portable {
    use super::*;
    use entities_core::engine::PortableEngine;
    use entities_core::{
        EntityDefinition, Extractor, ExtractorConfig, FuzzyLevel, ModuleSource,
    };

    fn load() -> PortableEngine {
        let path = crate::common::require_portable_module();
        PortableEngine::load(&ModuleSource::Path(path)).unwrap()
    }

    #[test]
    #[ignore = "needs entities-wasm build"]
    fn test_portable_engine_contract() {
        check_contract(&load());
    }

    #[test]
    #[ignore = "needs entities-wasm build"]
    fn test_portable_matches_reference() {
        let engine = load();
        let reference = ReferenceEngine;
        for (a, b) in PAIRS {
            assert_eq!(
                engine.edit_distance(a, b).unwrap(),
                reference.edit_distance(a, b).unwrap()
            );
            let diff = engine.edit_similarity(a, b).unwrap() - reference.edit_similarity(a, b).unwrap();
            assert!(diff.abs() <= 1e-9, "{a} / {b}");
            let diff = engine.jaro_winkler_similarity(a, b).unwrap()
                - reference.jaro_winkler_similarity(a, b).unwrap();
            assert!(diff.abs() <= 1e-9, "{a} / {b}");
        }
    }

    #[test]
    #[ignore = "needs entities-wasm build"]
    fn test_portable_extraction_matches_reference() {
        let path = crate::common::require_portable_module();
        let definitions = [
            EntityDefinition::new("fruit", FuzzyLevel::Medium)
                .value("apple", ["apple"])
                .value("strawberry", ["strawberry", "strawberries"]),
            EntityDefinition::new("company", FuzzyLevel::Strict).value("Apple Inc.", ["apple"]),
        ];
        let text = "I like appels, strawbery jam and apple stock";

        let reference = Extractor::new(&definitions, ExtractorConfig::reference()).unwrap();
        let portable = Extractor::new(
            &definitions,
            ExtractorConfig::portable(ModuleSource::Path(path)),
        )
        .unwrap();

        assert_eq!(
            portable.extract(text).unwrap(),
            reference.extract(text).unwrap()
        );
    }
}
