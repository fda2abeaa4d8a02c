//! Keyword heuristics over file names.

use async_trait::async_trait;

use locker_entity::Category;
use locker_entity::categorization::{CategorySuggestion, FolderDecision, SuggestionSource};

use crate::{Categorizer, FolderCandidate};

/// Keywords per category, in priority order for ties.
const RULES: &[(Category, &[&str])] = &[
    (
        Category::Financial,
        &[
            "bank", "statement", "invoice", "receipt", "tax", "taxes", "1099", "budget", "loan",
            "credit", "debit", "bill", "account", "payment", "refund",
        ],
    ),
    (
        Category::Medical,
        &[
            "medical", "prescription", "lab", "health", "doctor", "hospital", "vaccine",
            "vaccination", "xray", "x ray", "mri", "blood", "clinic", "dental", "diagnosis",
        ],
    ),
    (
        Category::Legal,
        &[
            "contract", "agreement", "will", "court", "legal", "nda", "affidavit", "attorney",
            "power of attorney", "testament", "judgment", "settlement",
        ],
    ),
    (
        Category::Education,
        &[
            "diploma", "transcript", "certificate", "degree", "resume", "cv", "school",
            "university", "college", "course", "grade", "report card",
        ],
    ),
    (
        Category::Identity,
        &[
            "passport", "id", "license", "licence", "birth", "ssn", "social security",
            "identity", "driver", "national id",
        ],
    ),
    (
        Category::Insurance,
        &["insurance", "policy", "claim", "coverage", "premium", "insurer"],
    ),
    (
        Category::Property,
        &[
            "deed", "lease", "mortgage", "property", "rent", "rental", "title", "hoa", "tenancy",
            "landlord",
        ],
    ),
    (
        Category::Employment,
        &[
            "payslip", "paystub", "salary", "offer", "employment", "w2", "employer", "payroll",
            "contract of employment", "reference",
        ],
    ),
    (
        Category::Travel,
        &[
            "ticket", "boarding", "itinerary", "visa", "flight", "hotel", "booking",
            "reservation", "trip", "travel",
        ],
    ),
    (
        Category::Personal,
        &["photo", "letter", "journal", "personal", "diary", "family", "wedding"],
    ),
];

/// Normalize a file name to ` word word ` form: extension dropped,
/// lowercased, non-alphanumerics as single spaces.
fn normalize(filename: &str) -> String {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };
    let words: Vec<String> = stem
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let w = w.to_ascii_lowercase();
            match w.strip_suffix('s') {
                Some(singular) if singular.len() >= 3 && !singular.ends_with('s') => {
                    singular.to_string()
                }
                _ => w,
            }
        })
        .collect();
    format!(" {} ", words.join(" "))
}

fn hits(normalized: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|kw| normalized.contains(normalize(kw).as_str()))
        .count()
}

fn confidence_for(hits: usize) -> f32 {
    match hits {
        0 => 0.3,
        1 => 0.7,
        2 => 0.8,
        _ => 0.9,
    }
}

/// Deterministic keyword matcher. Also the fallback of every other
/// categorizer.
#[derive(Debug, Clone, Default)]
pub struct HeuristicCategorizer;

impl HeuristicCategorizer {
    /// Creates a heuristic categorizer.
    pub fn new() -> Self {
        Self
    }

    /// Suggest a category without any I/O.
    pub fn categorize(&self, filename: &str) -> CategorySuggestion {
        let normalized = normalize(filename);
        let best = RULES
            .iter()
            .map(|(category, keywords)| (category, hits(&normalized, keywords)))
            .filter(|(_, count)| *count > 0)
            .fold(None::<(&Category, usize)>, |best, candidate| match best {
                Some((_, top)) if top >= candidate.1 => best,
                _ => Some(candidate),
            });

        match best {
            Some((category, count)) => CategorySuggestion::new(
                category.clone(),
                confidence_for(count),
                format!("File name matches {count} {category} keyword(s)"),
                SuggestionSource::Heuristic,
            ),
            None => CategorySuggestion::new(
                Category::Other,
                confidence_for(0),
                "No category keywords in file name",
                SuggestionSource::Heuristic,
            ),
        }
    }

    /// Pick a folder without any I/O. Existing folders win when their name
    /// or keywords appear in the file name; otherwise a folder named after
    /// the suggested category is proposed.
    pub fn choose_folder(&self, filename: &str, folders: &[FolderCandidate]) -> FolderDecision {
        let normalized = normalize(filename);
        let best = folders
            .iter()
            .map(|folder| {
                let name = normalize(&folder.name);
                let mut count = usize::from(!name.trim().is_empty() && normalized.contains(&name));
                count += folder
                    .keywords
                    .iter()
                    .map(|kw| normalize(kw))
                    .filter(|kw| !kw.trim().is_empty() && normalized.contains(kw.as_str()))
                    .count();
                (folder, count)
            })
            .filter(|(_, count)| *count > 0)
            .fold(None::<(&FolderCandidate, usize)>, |best, candidate| match best {
                Some((_, top)) if top >= candidate.1 => best,
                _ => Some(candidate),
            });

        if let Some((folder, count)) = best {
            return FolderDecision::new(
                folder.name.clone(),
                false,
                confidence_for(count),
                format!("File name matches folder '{}'", folder.name),
                SuggestionSource::Heuristic,
            );
        }

        let suggestion = self.categorize(filename);
        let proposed = folder_title(&suggestion.category);
        match folders
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(&proposed))
        {
            Some(existing) => FolderDecision::new(
                existing.name.clone(),
                false,
                suggestion.confidence,
                suggestion.reasoning,
                SuggestionSource::Heuristic,
            ),
            None => FolderDecision::new(
                proposed,
                true,
                suggestion.confidence,
                suggestion.reasoning,
                SuggestionSource::Heuristic,
            ),
        }
    }
}

/// Folder name proposed for a category, e.g. `Financial`.
pub fn folder_title(category: &Category) -> String {
    if category.is_other() {
        return "Miscellaneous".to_string();
    }
    let token = category.as_str().replace(['_', '-'], " ");
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Miscellaneous".to_string(),
    }
}

#[async_trait]
impl Categorizer for HeuristicCategorizer {
    async fn suggest_category(&self, filename: &str) -> CategorySuggestion {
        self.categorize(filename)
    }

    async fn suggest_folder(&self, filename: &str, folders: &[FolderCandidate]) -> FolderDecision {
        self.choose_folder(filename, folders)
    }
}
