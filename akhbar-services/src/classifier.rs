//! Category Classifier
//!
//! Keyword scoring over the normalized title and description, plus
//! source-based bonuses, with an override for specialized sources and a
//! floor below which everything is `general`.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use akhbar_core::text::normalize;
use akhbar_core::{CategoryLabel, FeedItem, SourceDirectory};

use crate::keywords::KeywordTables;

/// Title keyword hit
const TITLE_HIT: i32 = 3;
/// Description keyword hit, only for keywords absent from the title
const DESCRIPTION_HIT: i32 = 1;
/// Source listed for exactly one category
const SPECIALIZED_BONUS: i32 = 10;
/// Source listed for several categories, per category
const LISTED_BONUS: i32 = 3;
const SOURCE_HINT_BONUS: i32 = 4;
const PATTERN_BONUS: i32 = 5;
/// A winning score at or below this collapses to `general`
const CONFIDENCE_FLOOR: i32 = 4;
/// A specialized runner-up within this share of the winner takes over
const RUNNER_UP_SHARE: f64 = 0.7;
/// A specialized category scoring at least this takes over
const SPECIALIZED_MIN_SCORE: i32 = 3;

/// Per-category scores for one item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreCard {
    scores: [i32; 7],
}

impl ScoreCard {
    pub fn from_scores(scores: [i32; 7]) -> Self {
        Self { scores }
    }

    pub fn get(&self, category: CategoryLabel) -> i32 {
        self.scores[category.index()]
    }

    fn add(&mut self, category: CategoryLabel, points: i32) {
        self.scores[category.index()] += points;
    }

    /// Winner, winning score, runner-up and its score.
    ///
    /// Scans in [`CategoryLabel::ALL`] order starting from `general` at 0;
    /// a new leader pushes the previous one to second place and ties keep
    /// the earlier category.
    pub fn ranking(&self) -> (CategoryLabel, i32, Option<CategoryLabel>, i32) {
        let mut best = CategoryLabel::General;
        let mut highest = 0;
        let mut second = None;
        let mut second_score = 0;

        for category in CategoryLabel::ALL {
            let score = self.get(category);
            if score > highest {
                second = Some(best);
                second_score = highest;
                best = category;
                highest = score;
            } else if score > second_score {
                second = Some(category);
                second_score = score;
            }
        }

        (best, highest, second, second_score)
    }

    /// Final label given the source's specialized category, if any
    pub fn decide(&self, specialized: Option<CategoryLabel>) -> CategoryLabel {
        let (mut best, highest, second, second_score) = self.ranking();

        if let Some(specialized) = specialized {
            let close_runner_up = second == Some(specialized)
                && f64::from(second_score) >= f64::from(highest) * RUNNER_UP_SHARE;
            if close_runner_up || self.get(specialized) >= SPECIALIZED_MIN_SCORE {
                best = specialized;
            }
        }

        if highest > CONFIDENCE_FLOOR {
            best
        } else {
            CategoryLabel::General
        }
    }
}

impl fmt::Display for ScoreCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = CategoryLabel::ALL
            .iter()
            .map(|c| format!("{}={}", c, self.get(*c)))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Deterministic keyword classifier
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    tables: Arc<KeywordTables>,
    directory: Arc<SourceDirectory>,
}

impl CategoryClassifier {
    pub fn new(tables: Arc<KeywordTables>, directory: Arc<SourceDirectory>) -> Self {
        Self { tables, directory }
    }

    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    /// Label for an item's text and source
    pub fn classify(&self, title: &str, description: &str, source_name: &str) -> CategoryLabel {
        let card = self.score(title, description, source_name);
        let label = card.decide(self.directory.specialized(source_name));
        debug!("Classified '{}' from {} as {} ({})", title, source_name, label, card);
        label
    }

    /// Label an item in place unless it already carries one
    pub fn classify_item(&self, item: &mut FeedItem) {
        if item.category.is_none() {
            item.category = Some(self.classify(&item.title, &item.description, &item.source_name));
        }
    }

    /// Raw per-category scores
    pub fn score(&self, title: &str, description: &str, source_name: &str) -> ScoreCard {
        let title = normalize(title);
        let description = normalize(description);
        let mut card = ScoreCard::default();

        for category in CategoryLabel::ALL {
            for keyword in self.tables.keywords(category) {
                if title.contains(keyword.as_str()) {
                    card.add(category, TITLE_HIT);
                } else if !description.is_empty() && description.contains(keyword.as_str()) {
                    card.add(category, DESCRIPTION_HIT);
                }
            }
        }

        if !source_name.is_empty() {
            let listed = self.directory.categories(source_name);
            match listed {
                [only] => card.add(*only, SPECIALIZED_BONUS),
                many => {
                    for category in many {
                        card.add(*category, LISTED_BONUS);
                    }
                }
            }

            let lowered = source_name.to_lowercase();
            for category in CategoryLabel::ALL {
                if self
                    .tables
                    .source_hints(category)
                    .iter()
                    .any(|hint| lowered.contains(hint.as_str()))
                {
                    card.add(category, SOURCE_HINT_BONUS);
                }
            }
        }

        for category in CategoryLabel::ALL {
            if self
                .tables
                .patterns(category)
                .iter()
                .any(|pattern| title.contains(pattern.as_str()))
            {
                card.add(category, PATTERN_BONUS);
            }
        }

        card
    }

    /// Whether any of the category's keywords occurs in the title or description
    pub fn matches_category(&self, item: &FeedItem, category: CategoryLabel) -> bool {
        let title = normalize(&item.title);
        let description = normalize(&item.description);
        self.tables
            .keywords(category)
            .iter()
            .any(|k| title.contains(k.as_str()) || description.contains(k.as_str()))
    }

    /// Whether a category item is important enough for the general view
    pub fn is_important(&self, item: &FeedItem, category: CategoryLabel) -> bool {
        let title = normalize(&item.title);
        self.tables
            .promotions(category)
            .iter()
            .any(|k| title.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordTables;
    use CategoryLabel::*;

    fn classifier_with(tables: KeywordTables, directory: SourceDirectory) -> CategoryClassifier {
        CategoryClassifier::new(Arc::new(tables), Arc::new(directory))
    }

    fn builtin() -> CategoryClassifier {
        let mut directory = SourceDirectory::new();
        directory.insert("Kooora", &[Sports]);
        directory.insert("Al Jazeera", &[General, Business, Sports]);
        classifier_with(KeywordTables::builtin(), directory)
    }

    #[test]
    fn test_title_outweighs_description() {
        let classifier = classifier_with(
            KeywordTables::empty().with_keywords(Business, &["بورصة"]),
            SourceDirectory::new(),
        );
        assert_eq!(classifier.score("بورصة", "", "").get(Business), 3);
        assert_eq!(classifier.score("خبر", "بورصة", "").get(Business), 1);
        // counted once even when present in both
        assert_eq!(classifier.score("بورصة", "بورصة", "").get(Business), 3);
    }

    #[test]
    fn test_source_bonuses() {
        let classifier = builtin();
        assert_eq!(classifier.score("", "", "Kooora").get(Sports), 10 + 4);
        let listed = classifier.score("", "", "Al Jazeera");
        assert_eq!(listed.get(General), 3);
        assert_eq!(listed.get(Business), 3);
        assert_eq!(listed.get(Sports), 3);
        assert_eq!(classifier.score("", "", "CNBC Arabia").get(Business), 4);
    }

    #[test]
    fn test_source_hints_do_not_match_inside_names() {
        let classifier = builtin();
        assert_eq!(classifier.score("", "", "AIT News").get(Technology), 4);
        assert_eq!(classifier.score("", "", "Kuwait Times").get(Technology), 0);
        assert_eq!(classifier.score("", "", "صحيفة الشمال").get(Business), 0);
    }

    #[test]
    fn test_pattern_bonus_applies_once() {
        let classifier = classifier_with(
            KeywordTables::empty().with_patterns(Sports, &["كرة القدم", "مباراة"]),
            SourceDirectory::new(),
        );
        assert_eq!(classifier.score("مباراة كرة القدم", "", "").get(Sports), 5);
    }

    #[test]
    fn test_ranking_tracks_runner_up() {
        let card = ScoreCard::from_scores([5, 0, 0, 0, 4, 0, 0]);
        assert_eq!(card.ranking(), (General, 5, Some(Sports), 4));

        let card = ScoreCard::from_scores([2, 9, 0, 0, 0, 0, 0]);
        assert_eq!(card.ranking(), (Business, 9, Some(General), 2));

        // ties keep the earlier category
        let card = ScoreCard::from_scores([0, 6, 6, 0, 0, 0, 0]);
        assert_eq!(card.ranking().0, Business);
    }

    #[test]
    fn test_specialized_override_on_close_runner_up() {
        // general=5, sports=4 from a sports-only source
        let card = ScoreCard::from_scores([5, 0, 0, 0, 4, 0, 0]);
        assert_eq!(card.decide(None), General);
        assert_eq!(card.decide(Some(Sports)), Sports);
    }

    #[test]
    fn test_specialized_override_on_own_score() {
        let card = ScoreCard::from_scores([20, 0, 0, 0, 3, 0, 0]);
        assert_eq!(card.decide(Some(Sports)), Sports);

        let card = ScoreCard::from_scores([20, 0, 0, 0, 2, 0, 0]);
        assert_eq!(card.decide(Some(Sports)), General);
    }

    #[test]
    fn test_floor_collapses_to_general() {
        for scores in [[0, 4, 0, 0, 0, 0, 0], [0, 0, 0, 0, 0, 0, 3], [0; 7]] {
            assert_eq!(ScoreCard::from_scores(scores).decide(None), General);
        }
        // an override still collapses when the winner is weak
        let card = ScoreCard::from_scores([0, 4, 0, 0, 3, 0, 0]);
        assert_eq!(card.decide(Some(Sports)), General);
        assert_eq!(ScoreCard::from_scores([0, 5, 0, 0, 0, 0, 0]).decide(None), Business);
    }

    #[test]
    fn test_specialized_source_wins_near_tie() {
        let mut directory = SourceDirectory::new();
        directory.insert("Sports Desk", &[Sports]);
        let classifier = classifier_with(
            KeywordTables::empty()
                .with_keywords(General, &["الرئيس"])
                .with_patterns(General, &["الرئيس"])
                .with_keywords(Sports, &["النادي"]),
            directory,
        );
        // general: 3 + 5, sports: 3 + 10 from the specialization
        assert_eq!(classifier.classify("الرئيس يزور النادي", "", "Sports Desk"), Sports);
        assert_eq!(classifier.classify("الرئيس يزور النادي", "", "Other"), General);
    }

    #[test]
    fn test_builtin_labels() {
        let classifier = builtin();
        assert_eq!(
            classifier.classify("المنتخب يفوز في مباراة كرة القدم", "", "Unknown"),
            Sports
        );
        assert_eq!(
            classifier.classify("ارتفاع أسعار النفط في البورصة", "", "Unknown"),
            Business
        );
        assert_eq!(
            classifier.classify("لقاح جديد ضد الفيروس", "", "Unknown"),
            Health
        );
        assert_eq!(classifier.classify("طقس معتدل", "", "Unknown"), General);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = builtin();
        let first = classifier.classify("تطبيق جديد من جوجل", "تقنية الذكاء الاصطناعي", "AIT News");
        for _ in 0..5 {
            assert_eq!(
                classifier.classify("تطبيق جديد من جوجل", "تقنية الذكاء الاصطناعي", "AIT News"),
                first
            );
        }
    }

    #[test]
    fn test_classify_item_keeps_existing_label() {
        let classifier = builtin();
        let mut item = FeedItem::new("مباراة كرة القدم", "https://a.test/1", "X").with_category(Health);
        classifier.classify_item(&mut item);
        assert_eq!(item.category, Some(Health));

        let mut item = FeedItem::new("مباراة كرة القدم", "https://a.test/1", "X");
        classifier.classify_item(&mut item);
        assert_eq!(item.category, Some(Sports));
    }

    #[test]
    fn test_matches_and_important() {
        let classifier = builtin();
        let item = FeedItem::new("انطلاق بطولة الدوري", "https://a.test/1", "X")
            .with_description("مباراة الافتتاح");
        assert!(classifier.matches_category(&item, Sports));
        assert!(!classifier.matches_category(&item, Health));
        assert!(classifier.is_important(&item, Sports));
        assert!(!classifier.is_important(&item, Business));
    }
}
