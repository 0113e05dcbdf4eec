use anyhow::{bail, Result};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashMap;

use super::Picker;
use crate::models::{PickKind, SelectOption};

/// Find the option a user meant by `query`: exact id, then exact name
/// ignoring case, then the best fuzzy match on names.
pub fn match_option<'a>(options: &'a [SelectOption], query: &str) -> Option<&'a SelectOption> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(option) = options.iter().find(|o| o.id == query) {
        return Some(option);
    }

    let lowered = query.to_lowercase();
    if let Some(option) = options.iter().find(|o| o.name.to_lowercase() == lowered) {
        return Some(option);
    }

    let matcher = SkimMatcherV2::default();
    let mut best_match: Option<(i64, &SelectOption)> = None;
    for option in options {
        if let Some(score) = matcher.fuzzy_match(&option.name, query) {
            // strict comparison keeps the earliest option on ties
            if best_match.map_or(true, |(best, _)| score > best) {
                best_match = Some((score, option));
            }
        }
    }

    if let Some((score, option)) = best_match {
        log::info!("'{}' matched '{}' (score {})", query, option.name, score);
    }
    best_match.map(|(_, option)| option)
}

/// Answers picker rounds from command-line presets and defers the rest to `inner`.
pub struct PresetPicker<P> {
    presets: HashMap<PickKind, String>,
    inner: P,
}

impl<P: Picker> PresetPicker<P> {
    pub fn new(inner: P) -> Self {
        PresetPicker {
            presets: HashMap::new(),
            inner,
        }
    }

    pub fn with_preset(mut self, kind: PickKind, query: Option<String>) -> Self {
        if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
            self.presets.insert(kind, query);
        }
        self
    }
}

impl<P: Picker> Picker for PresetPicker<P> {
    fn pick(&mut self, kind: PickKind, options: Vec<SelectOption>) -> Result<Option<SelectOption>> {
        let Some(query) = self.presets.get(&kind) else {
            return self.inner.pick(kind, options);
        };

        match match_option(&options, query) {
            Some(option) => Ok(Some(option.clone())),
            None => bail!("No {} matches '{}'", kind.label(), query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverPicker;

    impl Picker for NeverPicker {
        fn pick(&mut self, kind: PickKind, _: Vec<SelectOption>) -> Result<Option<SelectOption>> {
            panic!("unexpected interactive {} round", kind.label());
        }
    }

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("Marketing Plan", "11"),
            SelectOption::new("Groceries", "12"),
            SelectOption::new("groceries archive", "13"),
        ]
    }

    #[test]
    fn matches_by_id_then_name() {
        let options = options();
        assert_eq!(match_option(&options, "12").unwrap().name, "Groceries");
        assert_eq!(match_option(&options, "GROCERIES").unwrap().id, "12");
    }

    #[test]
    fn falls_back_to_fuzzy_match() {
        let options = options();
        assert_eq!(match_option(&options, "mktplan").unwrap().id, "11");
        assert!(match_option(&options, "zzz").is_none());
        assert!(match_option(&options, "  ").is_none());
    }

    #[test]
    fn preset_answers_without_prompting() {
        let mut picker =
            PresetPicker::new(NeverPicker).with_preset(PickKind::Project, Some("groceries".into()));
        let choice = picker.pick(PickKind::Project, options()).unwrap();
        assert_eq!(choice.unwrap().id, "12");
    }

    #[test]
    fn unmatched_preset_is_an_error() {
        let mut picker =
            PresetPicker::new(NeverPicker).with_preset(PickKind::Section, Some("zzz".into()));
        let err = picker.pick(PickKind::Section, options()).unwrap_err();
        assert_eq!(err.to_string(), "No section matches 'zzz'");
    }
}
