use once_cell::sync::Lazy;

use crate::models::UserProfile;

/// Free-text query plus required subject tags, both optional.
#[derive(Debug, Clone, Default)]
pub struct TutorFilter {
    pub query: String,
    pub subjects: Vec<String>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Linear scan of the tutor list. The query must match the first name,
/// last name, or a subject name (case-insensitive substring); every
/// required tag must appear among the tutor's subjects (case-insensitive
/// exact match). An empty filter returns the list unchanged.
pub fn filter_tutors(tutors: &[UserProfile], filter: &TutorFilter) -> Vec<UserProfile> {
    tutors
        .iter()
        .filter(|tutor| {
            let matches_query = filter.query.is_empty()
                || contains_ignore_case(&tutor.first_name, &filter.query)
                || contains_ignore_case(&tutor.last_name, &filter.query)
                || tutor
                    .subjects
                    .iter()
                    .any(|subject| contains_ignore_case(&subject.name, &filter.query));

            let matches_subjects = filter.subjects.iter().all(|wanted| {
                tutor
                    .subjects
                    .iter()
                    .any(|subject| subject.name.eq_ignore_ascii_case(wanted))
            });

            matches_query && matches_subjects
        })
        .cloned()
        .collect()
}

/// One entry of the static subject catalog on the explore page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSubject {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub static SUBJECT_CATALOG: Lazy<Vec<CatalogSubject>> = Lazy::new(|| {
    vec![
        CatalogSubject {
            icon: "📚",
            title: "Mathematics",
            description: "Calculus, Linear Algebra, Statistics, Trigonometry, Geometry, Discrete Mathematics, Number Theory, Real Analysis",
        },
        CatalogSubject {
            icon: "⚛️",
            title: "Physics",
            description: "Mechanics, Thermodynamics, Electromagnetism, Quantum Physics, Optics, Nuclear Physics, Relativity",
        },
        CatalogSubject {
            icon: "🧪",
            title: "Chemistry",
            description: "Organic Chemistry, Inorganic Chemistry, Physical Chemistry, Biochemistry, Analytical Chemistry, Polymers",
        },
        CatalogSubject {
            icon: "🧬",
            title: "Biology",
            description: "Molecular Biology, Genetics, Ecology, Physiology, Microbiology, Evolution, Botany, Zoology",
        },
        CatalogSubject {
            icon: "💻",
            title: "Computer Science",
            description: "Programming, Data Structures, Algorithms, Web Development, Database Systems, Machine Learning, Cybersecurity",
        },
        CatalogSubject {
            icon: "📝",
            title: "English",
            description: "Literature Analysis, Creative Writing, Grammar, Composition, Academic Writing, Public Speaking",
        },
        CatalogSubject {
            icon: "🏛️",
            title: "History",
            description: "World History, Ancient Civilizations, Modern History, Political History, Social History, Art History",
        },
        CatalogSubject {
            icon: "📊",
            title: "Economics",
            description: "Microeconomics, Macroeconomics, International Trade, Financial Economics, Development Economics, Econometrics",
        },
    ]
});

/// Catalog entries whose title, or any word of their description, starts
/// with the term (case-insensitive). An empty term returns the whole
/// catalog.
pub fn search_catalog(term: &str) -> Vec<&'static CatalogSubject> {
    if term.is_empty() {
        return SUBJECT_CATALOG.iter().collect();
    }

    let term = term.to_lowercase();
    SUBJECT_CATALOG
        .iter()
        .filter(|subject| {
            let title_match = subject.title.to_lowercase().starts_with(&term);
            let description_match = subject
                .description
                .to_lowercase()
                .split(|c: char| c.is_whitespace() || c == ',')
                .any(|word| word.starts_with(&term));

            title_match || description_match
        })
        .collect()
}
