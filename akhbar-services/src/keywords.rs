//! Keyword tables for classification, deduplication and promotion
//!
//! The raw tables below are static Arabic text. [`KeywordTables::builtin`]
//! runs every entry through the normalizer once so lookups compare like
//! with like; the result is immutable and shared by `Arc`.

use akhbar_core::text::normalize;
use akhbar_core::CategoryLabel::{self, *};

// ============================================================================
// Raw tables
// ============================================================================

/// Per-category content keywords. A title hit scores 3, a description hit 1.
const CATEGORY_KEYWORDS: &[(CategoryLabel, &[&str])] = &[
    (
        General,
        &[
            "أخبار", "عاجل", "تقرير", "تصريح", "بيان", "مؤتمر", "قمة", "اجتماع", "زيارة",
            "رئيس", "وزير", "حكومة", "برلمان", "انتخابات", "سياسة", "دبلوماسية", "أزمة",
            "حرب", "سلام", "مفاوضات", "اتفاق", "معاهدة", "قرار", "محكمة", "قضاء", "حقوق",
        ],
    ),
    (
        Business,
        &[
            "اقتصاد", "أعمال", "تجارة", "شركة", "شركات", "استثمار", "بورصة", "سوق", "أسواق",
            "أسهم", "سندات", "عملة", "دولار", "يورو", "ريال", "دينار", "جنيه", "درهم", "بنك",
            "مصرف", "ائتمان", "قرض", "قروض", "تمويل", "ضرائب", "ميزانية", "أرباح", "خسائر",
            "إفلاس", "تضخم", "ركود", "صناعة", "تصدير", "استيراد", "عقارات", "بترول", "نفط",
            "غاز", "طاقة", "تعدين", "سياحة", "طيران",
        ],
    ),
    (
        Technology,
        &[
            "تكنولوجيا", "تقنية", "تقنيات", "إلكترونيات", "حاسوب", "كمبيوتر", "برمجة",
            "برمجيات", "تطبيق", "تطبيقات", "إنترنت", "هاتف", "جوال", "ذكاء اصطناعي",
            "روبوت", "أتمتة", "بيانات", "خوارزمية", "أندرويد", "آيفون", "آبل", "جوجل",
            "مايكروسوفت", "فيسبوك", "يوتيوب", "تيك توك", "واتساب", "سيبراني", "رقمي",
            "رقمية", "ابتكار", "اختراع", "شركة ناشئة",
        ],
    ),
    (
        Entertainment,
        &[
            "ترفيه", "فنون", "سينما", "فيلم", "أفلام", "مسلسل", "مسلسلات", "دراما", "كوميديا",
            "مسرح", "مسرحية", "موسيقى", "أغنية", "أغاني", "مطرب", "مطربة", "فنان", "فنانة",
            "ممثل", "ممثلة", "مشاهير", "مهرجان", "حفل", "إخراج", "مخرج", "تلفزيون", "مذيع",
            "رواية", "أدب",
        ],
    ),
    (
        Sports,
        &[
            "رياضة", "رياضات", "كرة", "تنس", "جولف", "سباحة", "سباق", "ماراثون", "فروسية",
            "مصارعة", "ملاكمة", "جودو", "كاراتيه", "جمباز", "أولمبياد", "أولمبي", "بطولة",
            "بطولات", "كأس", "دوري", "منتخب", "فريق", "نادي", "أندية", "لاعب", "لاعبين",
            "مدرب", "مباراة", "مباريات", "هدف", "أهداف", "تعادل", "ميدالية", "ذهبية",
        ],
    ),
    (
        Science,
        &[
            "علوم", "علمي", "علمية", "أبحاث", "دراسة", "دراسات", "اكتشاف", "اكتشافات", "فضاء",
            "كوكب", "كواكب", "مجرة", "فلك", "فلكي", "ناسا", "مركبة", "مسبار", "تلسكوب",
            "مختبر", "تجربة", "نظرية", "فيزياء", "كيمياء", "أحياء", "بيولوجيا", "جيولوجيا",
            "مناخ", "بيئة",
        ],
    ),
    (
        Health,
        &[
            "صحة", "صحي", "صحية", "طبي", "طبية", "مرض", "أمراض", "علاج", "دواء", "أدوية",
            "صيدلية", "مستشفى", "مستشفيات", "عيادة", "طبيب", "أطباء", "تمريض", "جراحة", "فحص",
            "تشخيص", "وقاية", "تغذية", "سمنة", "لياقة", "اكتئاب", "سكري", "ضغط الدم", "قلب",
            "سرطان", "أورام", "فيروس", "بكتيريا", "مناعة", "لقاح", "لقاحات", "تطعيم", "وباء",
        ],
    ),
];

/// Title patterns worth a flat 5 for their category when any one matches
const CATEGORY_PATTERNS: &[(CategoryLabel, &[&str])] = &[
    (
        Business,
        &[
            "سعر", "أسعار", "دولار", "بورصة", "سوق المال", "البنك المركزي", "الاقتصاد",
            "استثمار", "تمويل", "ميزانية", "أرباح", "تضخم", "نفط", "عملات", "أسهم",
        ],
    ),
    (
        Technology,
        &[
            "هاتف", "تطبيق", "ذكاء اصطناعي", "روبوت", "إنترنت", "تقنية", "تكنولوجيا", "آبل",
            "جوجل", "مايكروسوفت", "سيبراني", "برمجة", "شركة ناشئة",
        ],
    ),
    (
        Sports,
        &[
            "مباراة", "كرة القدم", "كرة السلة", "دوري", "بطولة", "منتخب", "لاعب", "مدرب",
            "نادي", "هزيمة", "تعادل", "ميدالية", "أولمبياد", "كأس",
        ],
    ),
    (
        Entertainment,
        &[
            "فيلم", "مسلسل", "أغنية", "فنان", "فنانة", "ممثل", "ممثلة", "مطرب", "حفل",
            "مهرجان", "سينما", "مسرح", "موسيقى",
        ],
    ),
    (
        Science,
        &[
            "دراسة", "اكتشاف", "علماء", "فضاء", "كوكب", "ناسا", "ظاهرة", "تجربة", "نظرية",
            "مجرة", "تلسكوب", "مناخ", "احتباس حراري",
        ],
    ),
    (
        Health,
        &[
            "صحة", "مرض", "علاج", "دواء", "لقاح", "فيروس", "وباء", "طبيب", "مستشفى", "جراحة",
            "سرطان", "سكري", "ضغط الدم",
        ],
    ),
];

/// Lowercase source-name fragments worth 4 for their category
const SOURCE_HINTS: &[(CategoryLabel, &[&str])] = &[
    (
        Business,
        &["cnbc", "bloomberg", "اقتصاد", "business", "المال", "eqtisad", "argaam", "mubasher"],
    ),
    (Technology, &["tech", "تكنولوجيا", "تقنية", "ait news", "digital"]),
    (Sports, &["sport", "رياضة", "كرة", "kooora", "goal", "yalla", "bein"]),
    (
        Entertainment,
        &["entertainment", "ترفيه", "فن", "cinema", "fann", "مسرح", "موسيقى"],
    ),
    (Science, &["science", "علوم", "علمي", "nature", "scientific"]),
    (Health, &["health", "صحة", "طب", "tibbi", "webteb", "sehati"]),
];

/// High-signal topical terms; two shared between titles mark a duplicate
const TOPIC_KEYWORDS: &[&str] = &[
    "الأمم المتحدة",
    "غزة",
    "إطلاق النار",
    "الشرق الأوسط",
    "فلسطين",
    "إسرائيل",
    "ليبيا",
    "طرابلس",
    "بنغازي",
    "مصراتة",
    "الدبيبة",
    "حفتر",
    "النفط",
    "زلزال",
    "المنطقة",
];

/// Title terms that promote a category item into the general view
const IMPORTANT_PROMOTIONS: &[(CategoryLabel, &[&str])] = &[
    (Business, &["اقتصاد", "مال", "سوق", "بورصة"]),
    (Sports, &["كأس العالم", "أولمبياد", "بطولة", "دوري"]),
    (Technology, &["ذكاء اصطناعي", "تقنية جديدة", "ابتكار"]),
    (Health, &["وباء", "فيروس", "لقاح"]),
];

// ============================================================================
// Normalized tables
// ============================================================================

/// Immutable lookup tables, normalized once at construction
#[derive(Debug, Clone, Default)]
pub struct KeywordTables {
    keywords: [Vec<String>; 7],
    patterns: [Vec<String>; 7],
    source_hints: [Vec<String>; 7],
    promotions: [Vec<String>; 7],
    topic_keywords: Vec<String>,
}

impl KeywordTables {
    /// Tables with nothing in them
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in Arabic tables
    pub fn builtin() -> Self {
        let mut tables = Self::empty();
        for (category, words) in CATEGORY_KEYWORDS {
            tables = tables.with_keywords(*category, words);
        }
        for (category, words) in CATEGORY_PATTERNS {
            tables = tables.with_patterns(*category, words);
        }
        for (category, hints) in SOURCE_HINTS {
            tables = tables.with_source_hints(*category, hints);
        }
        for (category, words) in IMPORTANT_PROMOTIONS {
            tables = tables.with_promotions(*category, words);
        }
        tables.with_topic_keywords(TOPIC_KEYWORDS)
    }

    pub fn with_keywords(mut self, category: CategoryLabel, words: &[&str]) -> Self {
        self.keywords[category.index()].extend(normalized(words));
        self
    }

    pub fn with_patterns(mut self, category: CategoryLabel, words: &[&str]) -> Self {
        self.patterns[category.index()].extend(normalized(words));
        self
    }

    /// Source hints match the lowercased source name, not its normalized form
    pub fn with_source_hints(mut self, category: CategoryLabel, hints: &[&str]) -> Self {
        self.source_hints[category.index()].extend(hints.iter().map(|h| h.to_lowercase()));
        self
    }

    pub fn with_promotions(mut self, category: CategoryLabel, words: &[&str]) -> Self {
        self.promotions[category.index()].extend(normalized(words));
        self
    }

    pub fn with_topic_keywords(mut self, words: &[&str]) -> Self {
        self.topic_keywords.extend(normalized(words));
        self
    }

    pub fn keywords(&self, category: CategoryLabel) -> &[String] {
        &self.keywords[category.index()]
    }

    pub fn patterns(&self, category: CategoryLabel) -> &[String] {
        &self.patterns[category.index()]
    }

    pub fn source_hints(&self, category: CategoryLabel) -> &[String] {
        &self.source_hints[category.index()]
    }

    pub fn promotions(&self, category: CategoryLabel) -> &[String] {
        &self.promotions[category.index()]
    }

    pub fn topic_keywords(&self) -> &[String] {
        &self.topic_keywords
    }
}

fn normalized<'a>(words: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    words
        .iter()
        .map(|w| normalize(w))
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_normalized() {
        let tables = KeywordTables::builtin();
        for category in CategoryLabel::ALL {
            for word in tables.keywords(category) {
                assert_eq!(word, &normalize(word));
            }
        }
        assert!(tables.topic_keywords().contains(&"الامم المتحده".to_string()));
        assert!(tables.topic_keywords().contains(&"المنطقه".to_string()));
    }

    #[test]
    fn test_general_has_no_patterns_or_hints() {
        let tables = KeywordTables::builtin();
        assert!(tables.patterns(General).is_empty());
        assert!(tables.source_hints(General).is_empty());
        assert!(!tables.keywords(General).is_empty());
    }

    #[test]
    fn test_keywords_are_longer_than_two_letters() {
        let tables = KeywordTables::builtin();
        for category in CategoryLabel::ALL {
            for word in tables.keywords(category) {
                assert!(word.chars().count() > 2, "{} too short", word);
            }
        }
    }

    #[test]
    fn test_source_hints_are_lowercased() {
        let tables = KeywordTables::empty().with_source_hints(Business, &["CNBC"]);
        assert_eq!(tables.source_hints(Business), &["cnbc".to_string()]);
    }
}
