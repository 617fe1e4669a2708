//! Keyword-based category inference
//!
//! A task's category is decided once, when the task is created, by looking
//! for known keywords in its title and description.

/// Label used when no keyword matches
pub const FALLBACK_CATEGORY: &str = "Other";

/// Ordered (label, keywords) table. The first entry with a hit wins, so a
/// text mentioning both a meeting and groceries is filed under "Work".
///
/// No keyword may contain a keyword of an earlier entry, or it could never
/// match its own label.
const CATEGORY_TABLE: &[(&str, &[&str])] = &[
    (
        "Work",
        &[
            "работа", "проект", "документ", "отчет", "встреча", "звонок", "project",
            "document", "report", "meeting", "office",
        ],
    ),
    (
        "Study",
        &[
            "учеба", "задание", "курс", "книга", "читать", "учить", "study", "homework",
            "course", "lecture", "exam",
        ],
    ),
    (
        "Shopping",
        &[
            "купить", "магазин", "список", "продукты", "заказать", "buy", "groceries",
            "purchase",
        ],
    ),
    (
        "Health",
        &[
            "спорт", "тренировка", "врач", "лекарство", "здоровье", "workout", "doctor",
            "medicine", "health", "gym",
        ],
    ),
    (
        "Home",
        &[
            "уборка", "ремонт", "готовка", "стирка", "дом", "квартира", "cleaning", "repair",
            "cooking", "laundry", "apartment",
        ],
    ),
];

/// Infer a category label from a task's title and description.
///
/// Matching is a case-insensitive substring search over
/// `"{title} {description}"`. Returns [`FALLBACK_CATEGORY`] when nothing matches.
pub fn categorize(title: &str, description: &str) -> &'static str {
    let text = format!("{} {}", title, description).to_lowercase();

    CATEGORY_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(label, _)| *label)
        .unwrap_or(FALLBACK_CATEGORY)
}
