//! English inflection for content-type names.
//!
//! Only the final camelCase word is inflected (`blogPost` -> `blogPosts`). Both directions are
//! idempotent: pluralizing a plural and singularizing a singular return the input.

/// Nouns with a single form.
const UNCOUNTABLE: &[&str] = &[
    "advice",
    "aircraft",
    "analytics",
    "audio",
    "content",
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "furniture",
    "homework",
    "information",
    "jeans",
    "knowledge",
    "luggage",
    "media",
    "metadata",
    "money",
    "music",
    "news",
    "personnel",
    "police",
    "research",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "staff",
    "traffic",
];

/// `(singular, plural)` pairs no suffix rule gets right.
const IRREGULAR: &[(&str, &str)] = &[
    ("alumnus", "alumni"),
    ("appendix", "appendices"),
    ("bonus", "bonuses"),
    ("bus", "buses"),
    ("cactus", "cacti"),
    ("calf", "calves"),
    ("campus", "campuses"),
    ("census", "censuses"),
    ("child", "children"),
    ("chorus", "choruses"),
    ("circus", "circuses"),
    ("cookie", "cookies"),
    ("criterion", "criteria"),
    ("echo", "echoes"),
    ("elf", "elves"),
    ("focus", "foci"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("hero", "heroes"),
    ("index", "indices"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("loaf", "loaves"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("movie", "movies"),
    ("nexus", "nexuses"),
    ("octopus", "octopuses"),
    ("ox", "oxen"),
    ("person", "people"),
    ("phenomenon", "phenomena"),
    ("potato", "potatoes"),
    ("prospectus", "prospectuses"),
    ("quiz", "quizzes"),
    ("radius", "radii"),
    ("shelf", "shelves"),
    ("status", "statuses"),
    ("syllabus", "syllabi"),
    ("thief", "thieves"),
    ("tomato", "tomatoes"),
    ("tooth", "teeth"),
    ("vertex", "vertices"),
    ("virus", "viruses"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

/// Stems whose plural swaps `-sis` for `-ses`.
const SIS_STEMS: &[&str] = &[
    "analy", "ba", "cri", "diagno", "empha", "hypothe", "oa", "parenthe", "progno", "synop", "the",
];

/// Returns the plural form of `word`, leaving plurals untouched.
#[must_use]
pub fn pluralize(word: &str) -> String {
    inflect_last_word(word, |w| {
        let singular = singular_raw(w);
        if singular != w && plural_raw(&singular) == w { w.to_owned() } else { plural_raw(w) }
    })
}

/// Returns the singular form of `word`, leaving singulars untouched.
#[must_use]
pub fn singularize(word: &str) -> String {
    inflect_last_word(word, |w| {
        let singular = singular_raw(w);
        if plural_raw(&singular) == w { singular } else { w.to_owned() }
    })
}

/// `true` when singular and plural forms coincide.
#[must_use]
pub fn is_uncountable(word: &str) -> bool {
    let (_, last) = split_last_word(word);
    UNCOUNTABLE.contains(&last.to_lowercase().as_str())
}

/// Applies `inflect` to the lowercased last camelCase word, restoring its leading capital.
fn inflect_last_word(word: &str, inflect: impl Fn(&str) -> String) -> String {
    let (head, last) = split_last_word(word);
    if last.is_empty() {
        return word.to_owned();
    }

    let lower = last.to_lowercase();
    let inflected = inflect(&lower);

    let capitalized = last.chars().next().is_some_and(char::is_uppercase);
    let mut out = String::with_capacity(head.len() + inflected.len());
    out.push_str(head);
    if capitalized {
        let mut chars = inflected.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    } else {
        out.push_str(&inflected);
    }
    out
}

/// Splits `blogPost` into `("blog", "Post")`; a word without inner capitals is all tail.
fn split_last_word(word: &str) -> (&str, &str) {
    let start = word
        .char_indices()
        .skip(1)
        .filter(|(_, c)| c.is_uppercase())
        .map(|(idx, _)| idx)
        .last()
        .unwrap_or(0);
    word.split_at(start)
}

fn plural_raw(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_owned();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return (*plural).to_owned();
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
        return word.to_owned();
    }

    if let Some(stem) = word.strip_suffix("sis") {
        return format!("{stem}ses");
    }
    if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(|c| !is_vowel(c))
    {
        return format!("{stem}ies");
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn singular_raw(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_owned();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
        return (*singular).to_owned();
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == word) {
        return word.to_owned();
    }

    if let Some(stem) = word.strip_suffix("ses")
        && SIS_STEMS.contains(&stem)
    {
        return format!("{stem}sis");
    }
    if let Some(stem) = word.strip_suffix("ies")
        && stem.len() > 1
    {
        return format!("{stem}y");
    }
    for suffix in ["sses", "xes", "zzes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_owned();
        }
    }
    if word.ends_with("ss") || word.ends_with("is") {
        return word.to_owned();
    }
    word.strip_suffix('s').map_or_else(|| word.to_owned(), ToOwned::to_owned)
}

const fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
