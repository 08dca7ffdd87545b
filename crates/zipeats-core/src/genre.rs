//! Rule-based cuisine genre classifier.
//!
//! Classification runs in strict priority order and the first rule that
//! matches wins:
//!
//! 1. Name keywords, scanned in [`NAME_KEYWORDS`] declaration order as
//!    substrings of the lower-cased name.
//! 2. Provider category tags, in the order the provider listed them, looked up
//!    exactly in [`CATEGORY_GENRES`].
//! 3. Takeaway/delivery tags map to [`Genre::FastFood`].
//! 4. `cafe`/`bakery` tags map to [`Genre::Cafe`].
//! 5. `bar`/`pub` tags, or `bar`/`tavern` in the name, map to [`Genre::Bar`].
//! 6. Everything else is [`Genre::Restaurant`].
//!
//! Keyword entries overlap (`"taco"` precedes `"taco bell"`, `"pizza"`
//! precedes `"pizza hut"`), so the table order is part of the contract.

use serde::{Deserialize, Serialize};

/// Coarse cuisine label attached to every restaurant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    Mexican,
    Italian,
    Pizza,
    Chinese,
    Japanese,
    FastFood,
    Steak,
    Bbq,
    Seafood,
    Indian,
    Thai,
    American,
    French,
    Mediterranean,
    Greek,
    Korean,
    Vietnamese,
    MiddleEastern,
    Latin,
    Caribbean,
    SoulFood,
    Southern,
    Cajun,
    Cafe,
    Bar,
    #[default]
    Restaurant,
}

impl Genre {
    pub const ALL: [Genre; 26] = [
        Genre::Mexican,
        Genre::Italian,
        Genre::Pizza,
        Genre::Chinese,
        Genre::Japanese,
        Genre::FastFood,
        Genre::Steak,
        Genre::Bbq,
        Genre::Seafood,
        Genre::Indian,
        Genre::Thai,
        Genre::American,
        Genre::French,
        Genre::Mediterranean,
        Genre::Greek,
        Genre::Korean,
        Genre::Vietnamese,
        Genre::MiddleEastern,
        Genre::Latin,
        Genre::Caribbean,
        Genre::SoulFood,
        Genre::Southern,
        Genre::Cajun,
        Genre::Cafe,
        Genre::Bar,
        Genre::Restaurant,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Mexican => "mexican",
            Genre::Italian => "italian",
            Genre::Pizza => "pizza",
            Genre::Chinese => "chinese",
            Genre::Japanese => "japanese",
            Genre::FastFood => "fast-food",
            Genre::Steak => "steak",
            Genre::Bbq => "bbq",
            Genre::Seafood => "seafood",
            Genre::Indian => "indian",
            Genre::Thai => "thai",
            Genre::American => "american",
            Genre::French => "french",
            Genre::Mediterranean => "mediterranean",
            Genre::Greek => "greek",
            Genre::Korean => "korean",
            Genre::Vietnamese => "vietnamese",
            Genre::MiddleEastern => "middle-eastern",
            Genre::Latin => "latin",
            Genre::Caribbean => "caribbean",
            Genre::SoulFood => "soul-food",
            Genre::Southern => "southern",
            Genre::Cajun => "cajun",
            Genre::Cafe => "cafe",
            Genre::Bar => "bar",
            Genre::Restaurant => "restaurant",
        }
    }

    /// Looks up a genre by its wire label (e.g. `"fast-food"`).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Genre> {
        Genre::ALL.into_iter().find(|g| g.as_str() == label)
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name substrings in priority order. Matching is case-insensitive and the
/// first entry found anywhere in the name wins.
pub const NAME_KEYWORDS: &[(&str, Genre)] = &[
    // Mexican
    ("mexican", Genre::Mexican),
    ("taco", Genre::Mexican),
    ("burrito", Genre::Mexican),
    ("quesadilla", Genre::Mexican),
    ("enchilada", Genre::Mexican),
    ("chipotle", Genre::Mexican),
    ("el ", Genre::Mexican),
    ("la ", Genre::Mexican),
    ("cantina", Genre::Mexican),
    // Italian
    ("italian", Genre::Italian),
    ("pizza", Genre::Pizza),
    ("pasta", Genre::Italian),
    ("trattoria", Genre::Italian),
    ("ristorante", Genre::Italian),
    ("olive garden", Genre::Italian),
    // Chinese
    ("chinese", Genre::Chinese),
    ("panda express", Genre::Chinese),
    ("dim sum", Genre::Chinese),
    ("wok", Genre::Chinese),
    ("pf chang", Genre::Chinese),
    // Japanese
    ("japanese", Genre::Japanese),
    ("sushi", Genre::Japanese),
    ("ramen", Genre::Japanese),
    ("teriyaki", Genre::Japanese),
    ("hibachi", Genre::Japanese),
    // Fast food
    ("mcdonald", Genre::FastFood),
    ("burger", Genre::FastFood),
    ("burger king", Genre::FastFood),
    ("wendy", Genre::FastFood),
    ("taco bell", Genre::FastFood),
    ("subway", Genre::FastFood),
    ("kfc", Genre::FastFood),
    ("kentucky fried", Genre::FastFood),
    ("dunkin", Genre::FastFood),
    ("domino", Genre::FastFood),
    ("papa john", Genre::FastFood),
    ("little caesar", Genre::FastFood),
    ("pizza hut", Genre::FastFood),
    // Steak
    ("steak", Genre::Steak),
    ("steakhouse", Genre::Steak),
    ("outback", Genre::Steak),
    ("texas roadhouse", Genre::Steak),
    ("longhorn", Genre::Steak),
    // BBQ
    ("barbecue", Genre::Bbq),
    ("bbq", Genre::Bbq),
    ("bar-b-q", Genre::Bbq),
    ("barbeque", Genre::Bbq),
    ("smokehouse", Genre::Bbq),
    // Seafood
    ("seafood", Genre::Seafood),
    ("fish", Genre::Seafood),
    ("red lobster", Genre::Seafood),
    ("bonefish", Genre::Seafood),
    // Indian
    ("indian", Genre::Indian),
    ("curry", Genre::Indian),
    ("tandoor", Genre::Indian),
    ("naan", Genre::Indian),
    // Thai
    ("thai", Genre::Thai),
    ("pad", Genre::Thai),
    // American
    ("diner", Genre::American),
    ("grill", Genre::American),
    ("applebees", Genre::American),
    ("chili", Genre::American),
    ("tgi friday", Genre::American),
    // French
    ("french", Genre::French),
    ("bistro", Genre::French),
    ("brasserie", Genre::French),
];

/// Exact provider category identifiers with a dedicated genre.
pub const CATEGORY_GENRES: &[(&str, Genre)] = &[
    ("mexican_restaurant", Genre::Mexican),
    ("italian_restaurant", Genre::Italian),
    ("chinese_restaurant", Genre::Chinese),
    ("japanese_restaurant", Genre::Japanese),
    ("indian_restaurant", Genre::Indian),
    ("thai_restaurant", Genre::Thai),
    ("french_restaurant", Genre::French),
    ("seafood_restaurant", Genre::Seafood),
    ("steak_house", Genre::Steak),
    ("barbecue_restaurant", Genre::Bbq),
    ("pizza_restaurant", Genre::Pizza),
    ("american_restaurant", Genre::American),
    ("mediterranean_restaurant", Genre::Mediterranean),
    ("greek_restaurant", Genre::Greek),
    ("korean_restaurant", Genre::Korean),
    ("vietnamese_restaurant", Genre::Vietnamese),
    ("middle_eastern_restaurant", Genre::MiddleEastern),
    ("latin_american_restaurant", Genre::Latin),
    ("caribbean_restaurant", Genre::Caribbean),
    ("soul_food_restaurant", Genre::SoulFood),
    ("southern_restaurant", Genre::Southern),
    ("cajun_restaurant", Genre::Cajun),
    ("tex_mex_restaurant", Genre::Mexican),
    ("sushi_restaurant", Genre::Japanese),
    ("ramen_restaurant", Genre::Japanese),
    ("burger_restaurant", Genre::FastFood),
    ("sandwich_shop", Genre::FastFood),
    ("fast_food_restaurant", Genre::FastFood),
];

const TAKEAWAY_TAGS: &[&str] = &["meal_takeaway", "meal_delivery"];
const CAFE_TAGS: &[&str] = &["cafe", "bakery"];
const BAR_TAGS: &[&str] = &["bar", "pub"];
const BAR_NAME_HINTS: &[&str] = &["bar", "tavern"];

/// Assigns a genre to a place from its display name and provider category tags.
///
/// Total and deterministic: every input yields a genre, defaulting to
/// [`Genre::Restaurant`].
#[must_use]
pub fn classify<S: AsRef<str>>(name: &str, category_tags: &[S]) -> Genre {
    let name = name.to_lowercase();

    if let Some(genre) = NAME_KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(*keyword))
        .map(|(_, genre)| *genre)
    {
        return genre;
    }

    let tags: Vec<String> = category_tags
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect();

    if let Some(genre) = tags.iter().find_map(|tag| category_genre(tag)) {
        return genre;
    }

    let has_tag = |wanted: &[&str]| tags.iter().any(|t| wanted.contains(&t.as_str()));

    if has_tag(TAKEAWAY_TAGS) {
        return Genre::FastFood;
    }

    if has_tag(CAFE_TAGS) {
        return Genre::Cafe;
    }

    if has_tag(BAR_TAGS) || BAR_NAME_HINTS.iter().any(|hint| name.contains(hint)) {
        return Genre::Bar;
    }

    Genre::Restaurant
}

fn category_genre(tag: &str) -> Option<Genre> {
    CATEGORY_GENRES
        .iter()
        .find(|(category, _)| *category == tag)
        .map(|(_, genre)| *genre)
}

#[cfg(test)]
#[path = "genre_test.rs"]
mod tests;
