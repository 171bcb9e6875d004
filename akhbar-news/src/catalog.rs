//! Curated Arabic news sources
//!
//! The default priority groups, the per-category dedicated feeds, the
//! alternate-URL table consulted when a feed fails, and the directory of
//! source specializations used by the classifier.

use akhbar_core::CategoryLabel::{self, *};
use akhbar_core::{GroupKind, SourceDirectory, SourceGroup, SourceSpec};

use crate::google_news::{breaking_search_url, site_search_url};

/// Categories each known source publishes. One entry means the source is
/// authoritative for that category.
const SOURCE_CATEGORIES: &[(&str, &[CategoryLabel])] = &[
    // Specialized
    ("CNBC Arabia", &[Business]),
    ("Bloomberg", &[Business]),
    ("Al Eqtisadiah", &[Business]),
    ("Argaam", &[Business]),
    ("Mubasher", &[Business]),
    ("AIT News", &[Technology]),
    ("Tech World", &[Technology]),
    ("Tech Arabic", &[Technology]),
    ("Kooora", &[Sports]),
    ("FilGoal", &[Sports]),
    ("Yalla Kora", &[Sports]),
    ("beIN Sports", &[Sports]),
    ("El Cinema", &[Entertainment]),
    ("Fann", &[Entertainment]),
    ("ET Arabic", &[Entertainment]),
    ("Scientific American Arabic", &[Science]),
    ("Nature Arabic", &[Science]),
    ("Al Tibbi", &[Health]),
    ("Sehati", &[Health]),
    ("Health Arabic", &[Health]),
    // Multi-category
    ("Al Jazeera", &[General, Business, Technology, Sports, Health]),
    ("BBC Arabic", &[General, Technology, Health, Science, Business]),
    ("CNN Arabic", &[General, Business, Technology, Entertainment]),
    ("RT Arabic", &[General, Science, Technology, Business]),
    ("France 24", &[General, Entertainment, Business, Sports]),
    ("DW Arabic", &[General, Science, Health, Technology]),
    ("Sky News Arabia", &[General, Business, Sports, Technology]),
    ("Al Arabiya", &[General, Business, Sports, Entertainment]),
    (
        "Google News",
        &[General, Business, Technology, Entertainment, Sports, Science, Health],
    ),
    ("Asharq Al-Awsat", &[General, Business, Entertainment]),
    ("Al Khaleej", &[General, Business, Sports]),
    ("Al Bayan", &[General, Business, Sports, Health]),
    ("Al Ittihad", &[General, Sports, Business]),
    ("Al Riyadh", &[General, Business, Entertainment]),
    ("Al Watan", &[General, Business, Sports]),
    ("Al Ahram", &[General, Business, Sports, Entertainment]),
    ("SPA", &[General, Business]),
    ("WAM", &[General, Business]),
    ("KUNA", &[General, Business]),
    ("PETRA", &[General]),
    ("QNA", &[General, Business, Sports]),
];

/// Exact feed URL → alternate tried once when it fails
const ALTERNATE_FEEDS: &[(&str, &str)] = &[
    (
        "https://www.aljazeera.net/aljazeerarss/a7c186be-1baa-4bd4-9d80-a84db769f779/73d0e1b0-2fd0-49cf-bd1e-af3901414abe",
        "https://news.google.com/rss/search?q=site:aljazeera.net+%D8%B9%D8%A7%D8%AC%D9%84&hl=ar&gl=EG&ceid=EG:ar",
    ),
    (
        "https://www.alarabiya.net/feed/rss2/ar/arab-and-world",
        "https://www.alarabiya.net/tools/rss/ar.xml",
    ),
    (
        "https://www.alarabiya.net/tools/rss/ar.xml",
        "https://news.google.com/rss/search?q=site:alarabiya.net&hl=ar&gl=EG&ceid=EG:ar",
    ),
    (
        "https://www.skynewsarabia.com/web/rss/1",
        "https://news.google.com/rss/search?q=site:skynewsarabia.com&hl=ar&gl=EG&ceid=EG:ar",
    ),
    (
        "https://www.skynewsarabia.com/web/rss/95.xml",
        "https://news.google.com/rss/search?q=site:skynewsarabia.com&hl=ar&gl=EG&ceid=EG:ar",
    ),
    (
        "https://www.almasryalyoum.com/rss/rssfeeds",
        "https://news.google.com/rss/search?q=site:almasryalyoum.com&hl=ar&gl=EG&ceid=EG:ar",
    ),
    (
        "https://arabic.cnn.com/api/v1/rss/breaking-news/rss.xml",
        "https://arabic.cnn.com/api/v1/rss/rss.xml",
    ),
    (
        "https://www.kooora.com/rss",
        "https://news.google.com/rss/search?q=site:kooora.com&hl=ar&gl=EG&ceid=EG:ar",
    ),
    (
        "https://www.alriyadh.com/rss",
        "https://news.google.com/rss/search?q=site:alriyadh.com&hl=ar&gl=EG&ceid=EG:ar",
    ),
    (
        "https://www.alkhaleej.ae/rss",
        "https://news.google.com/rss/search?q=site:alkhaleej.ae&hl=ar&gl=EG&ceid=EG:ar",
    ),
    (
        "https://gate.ahram.org.eg/rss.aspx",
        "https://news.google.com/rss/search?q=site:gate.ahram.org.eg&hl=ar&gl=EG&ceid=EG:ar",
    ),
];

const GOOGLE_NEWS_HOME: &str = "https://news.google.com/rss?hl=ar&gl=EG&ceid=EG:ar";
const GOOGLE_NEWS_WORLD: &str =
    "https://news.google.com/rss/headlines/section/topic/WORLD?hl=ar&gl=EG&ceid=EG:ar";

/// Categories listed for a known source name
fn categories_of(name: &str) -> &'static [CategoryLabel] {
    SOURCE_CATEGORIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, cats)| *cats)
        .unwrap_or(&[General])
}

fn source(name: &str, url: &str, base: &str) -> SourceSpec {
    SourceSpec::new(name, url, categories_of(name)).with_base_url(base)
}

/// Alternate URL for an exact feed URL
pub fn alternate_url(url: &str) -> Option<&'static str> {
    ALTERNATE_FEEDS
        .iter()
        .find(|(from, _)| *from == url)
        .map(|(_, to)| *to)
}

fn breaking_group() -> SourceGroup {
    let breaking = |name: &str, host: &str, display: &str| {
        SourceSpec::new(name, &breaking_search_url(host), &[General]).breaking(display)
    };
    SourceGroup::new(
        GroupKind::Breaking,
        vec![
            breaking("Al Jazeera Mubasher", "aljazeera.net", "الجزيرة مباشر"),
            breaking("Al Arabiya Breaking", "alarabiya.net", "العربية عاجل"),
            breaking("SPA Breaking", "spa.gov.sa", "واس عاجل"),
            breaking("WAM Breaking", "wam.ae", "وام عاجل"),
            breaking("KUNA Breaking", "kuna.net.kw", "كونا عاجل"),
            breaking("QNA Breaking", "qna.org.qa", "قنا عاجل"),
        ],
    )
}

fn reliable_group() -> SourceGroup {
    SourceGroup::new(
        GroupKind::Reliable,
        vec![
            source("BBC Arabic", "https://feeds.bbci.co.uk/arabic/rss.xml", "https://www.bbc.com"),
            SourceSpec::new(
                "BBC Arabic Middle East",
                "https://feeds.bbci.co.uk/arabic/middleeast/rss.xml",
                &[General],
            )
            .with_base_url("https://www.bbc.com"),
            source("CNN Arabic", "https://arabic.cnn.com/api/v1/rss/rss.xml", "https://arabic.cnn.com"),
            source("RT Arabic", "https://arabic.rt.com/rss/", "https://arabic.rt.com"),
            source("DW Arabic", "https://rss.dw.com/xml/rss-ar-all", "https://www.dw.com"),
            source("France 24", "https://www.france24.com/ar/rss", "https://www.france24.com"),
            source("Google News", GOOGLE_NEWS_HOME, "https://news.google.com"),
            SourceSpec::new("Google News - World", GOOGLE_NEWS_WORLD, &[General])
                .with_base_url("https://news.google.com"),
        ],
    )
}

fn supplementary_group() -> SourceGroup {
    SourceGroup::new(
        GroupKind::Supplementary,
        vec![
            source(
                "Al Jazeera",
                "https://www.aljazeera.net/aljazeerarss/a7c186be-1baa-4bd4-9d80-a84db769f779/73d0e1b0-2fd0-49cf-bd1e-af3901414abe",
                "https://www.aljazeera.net",
            ),
            source("Al Arabiya", "https://www.alarabiya.net/tools/rss/ar.xml", "https://www.alarabiya.net"),
            source(
                "Sky News Arabia",
                "https://www.skynewsarabia.com/web/rss/95.xml",
                "https://www.skynewsarabia.com",
            ),
            source("Asharq Al-Awsat", "https://aawsat.com/feed", "https://aawsat.com"),
            source("Al Arab", "https://alarab.co.uk/feed", "https://alarab.co.uk"),
            source("Al Quds Al Arabi", "https://www.alquds.co.uk/feed/", "https://www.alquds.co.uk"),
            source("CNBC Arabia", "https://www.cnbcarabia.com/rss", "https://www.cnbcarabia.com"),
            source("Kooora", &site_search_url("kooora.com"), "https://www.kooora.com"),
            source(
                "Al Masry Al Youm",
                &site_search_url("almasryalyoum.com"),
                "https://www.almasryalyoum.com",
            ),
        ],
    )
}

fn backup_group() -> SourceGroup {
    SourceGroup::new(
        GroupKind::Backup,
        vec![
            source("SPA", "https://www.spa.gov.sa/rss.php", "https://www.spa.gov.sa"),
            source("WAM", "https://www.wam.ae/ar/feeds/rss", "https://www.wam.ae"),
            source("QNA", "https://www.qna.org.qa/RSS?language=ar", "https://www.qna.org.qa"),
            source("KUNA", "https://www.kuna.net.kw/rss.aspx?language=ar", "https://www.kuna.net.kw"),
            source("PETRA", "https://www.petra.gov.jo/RSS.aspx?lang=ar", "https://www.petra.gov.jo"),
            source("Al Khaleej", "https://www.alkhaleej.ae/rss", "https://www.alkhaleej.ae"),
            source("Al Bayan", "https://www.albayan.ae/rss", "https://www.albayan.ae"),
            source("Al Ittihad", "https://www.alittihad.ae/rss", "https://www.alittihad.ae"),
            source("Al Riyadh", "https://www.alriyadh.com/rss", "https://www.alriyadh.com"),
            source("Al Watan", "https://www.alwatan.com.sa/rss", "https://www.alwatan.com.sa"),
            source("FilGoal", "https://www.filgoal.com/rss", "https://www.filgoal.com"),
            source("Yalla Kora", "https://www.yallakora.com/rss", "https://www.yallakora.com"),
            source("AIT News", "https://aitnews.com/feed/", "https://aitnews.com"),
        ],
    )
}

/// Default priority groups in fetch order
pub fn curated_groups() -> Vec<SourceGroup> {
    vec![breaking_group(), reliable_group(), supplementary_group(), backup_group()]
}

/// Feeds dedicated to one category. Items they return keep that label.
pub fn category_sources(category: CategoryLabel) -> Vec<SourceSpec> {
    let dedicated = |name: &str, url: &str, base: &str| {
        SourceSpec::new(name, url, &[category]).with_base_url(base)
    };
    let bbc = "https://www.bbc.com";
    let cnn = "https://arabic.cnn.com";
    let rt = "https://arabic.rt.com";
    let arabiya = "https://www.alarabiya.net";
    let sky = "https://www.skynewsarabia.com";
    let dw = "https://www.dw.com";

    match category {
        General => vec![
            dedicated("Google News - World", GOOGLE_NEWS_WORLD, "https://news.google.com"),
            dedicated("BBC Arabic Middle East", "https://feeds.bbci.co.uk/arabic/middleeast/rss.xml", bbc),
        ],
        Business => vec![
            dedicated("BBC Arabic Business", "https://feeds.bbci.co.uk/arabic/business/rss.xml", bbc),
            dedicated("CNN Arabic Business", "https://arabic.cnn.com/api/v1/rss/business/rss.xml", cnn),
            dedicated("RT Arabic Business", "https://arabic.rt.com/business/rss/", rt),
            dedicated("Al Arabiya Aswaq", "https://www.alarabiya.net/tools/rss/ar/aswaq.xml", arabiya),
            dedicated("Sky News Arabia Business", "https://www.skynewsarabia.com/web/rss/114.xml", sky),
            dedicated("DW Arabic Economy", "https://rss.dw.com/xml/rss-ar-eco", dw),
            dedicated("CNBC Arabia", "https://www.cnbcarabia.com/rss", "https://www.cnbcarabia.com"),
        ],
        Technology => vec![
            dedicated("BBC Arabic Tech", "https://feeds.bbci.co.uk/arabic/scienceandtech/rss.xml", bbc),
            dedicated("CNN Arabic Tech", "https://arabic.cnn.com/api/v1/rss/tech/rss.xml", cnn),
            dedicated("RT Arabic Technology", "https://arabic.rt.com/technology/rss/", rt),
            dedicated("Al Arabiya Technology", "https://www.alarabiya.net/tools/rss/ar/technology.xml", arabiya),
            dedicated("AIT News", "https://aitnews.com/feed/", "https://aitnews.com"),
        ],
        Entertainment => vec![
            dedicated("BBC Arabic Culture", "https://feeds.bbci.co.uk/arabic/artandculture/rss.xml", bbc),
            dedicated("CNN Arabic Entertainment", "https://arabic.cnn.com/api/v1/rss/entertainment/rss.xml", cnn),
            dedicated("Sky News Arabia Entertainment", "https://www.skynewsarabia.com/web/rss/112.xml", sky),
            dedicated("DW Arabic Culture", "https://rss.dw.com/xml/rss-ar-cul", dw),
        ],
        Sports => vec![
            dedicated("BBC Arabic Sports", "https://feeds.bbci.co.uk/arabic/sports/rss.xml", bbc),
            dedicated("CNN Arabic Sport", "https://arabic.cnn.com/api/v1/rss/sport/rss.xml", cnn),
            dedicated("RT Arabic Sport", "https://arabic.rt.com/sport/rss/", rt),
            dedicated("Al Arabiya Sport", "https://www.alarabiya.net/tools/rss/ar/sport.xml", arabiya),
            dedicated("Sky News Arabia Sports", "https://www.skynewsarabia.com/web/rss/110.xml", sky),
            dedicated("DW Arabic Sports", "https://rss.dw.com/xml/rss-ar-sports", dw),
            dedicated("FilGoal", "https://www.filgoal.com/rss", "https://www.filgoal.com"),
            dedicated("Yalla Kora", "https://www.yallakora.com/rss", "https://www.yallakora.com"),
        ],
        Science => vec![
            dedicated("BBC Arabic Science", "https://feeds.bbci.co.uk/arabic/scienceandtech/rss.xml", bbc),
            dedicated("RT Arabic Science", "https://arabic.rt.com/science/rss/", rt),
            dedicated("DW Arabic Science", "https://rss.dw.com/xml/rss-ar-sci", dw),
            dedicated("Sky News Arabia Science", "https://www.skynewsarabia.com/web/rss/115.xml", sky),
        ],
        Health => vec![
            dedicated("BBC Arabic Health", "https://feeds.bbci.co.uk/arabic/topics/health/rss.xml", bbc),
            dedicated("CNN Arabic Health", "https://arabic.cnn.com/api/v1/rss/health/rss.xml", cnn),
            dedicated("RT Arabic Health", "https://arabic.rt.com/health/rss/", rt),
            dedicated(
                "Al Arabiya Health",
                "https://www.alarabiya.net/tools/rss/ar/medicine-and-health.xml",
                arabiya,
            ),
            dedicated("Sky News Arabia Health", "https://www.skynewsarabia.com/web/rss/116.xml", sky),
        ],
    }
}

/// Specialization directory for every known source
pub fn source_directory() -> SourceDirectory {
    let mut directory = SourceDirectory::new();
    for (name, categories) in SOURCE_CATEGORIES {
        directory.insert(name, categories);
    }
    directory.extend_from_groups(&curated_groups());
    directory
}
