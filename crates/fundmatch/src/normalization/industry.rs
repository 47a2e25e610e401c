use std::collections::BTreeSet;

use super::{clean_text, mentions_any};

struct Sector {
    name: &'static str,
    label: &'static str,
    keywords: &'static [&'static str],
}

const SECTORS: &[Sector] = &[
    Sector {
        name: "digital",
        label: "Digital & ICT",
        keywords: &["digital", "ict", "software", "information technology", "artificial intelligence", "ai", "it", "data", "cyber", "internet", "saas"],
    },
    Sector {
        name: "sustainability",
        label: "Sustainability & Climate",
        keywords: &["sustainab", "green", "climate", "environment", "renewable", "eco", "circular", "energy", "cleantech", "emission", "umwelt", "klima"],
    },
    Sector {
        name: "health",
        label: "Health & Life Sciences",
        keywords: &["health", "life science", "biotech", "pharma", "medical", "medtech", "gesundheit"],
    },
    Sector {
        name: "manufacturing",
        label: "Manufacturing & Industry",
        keywords: &["manufactur", "production", "industry 4.0", "industrial", "factory", "produktion"],
    },
    Sector {
        name: "creative",
        label: "Creative Industries",
        keywords: &["creative", "culture", "cultural", "design", "media", "film", "music", "kreativ"],
    },
    Sector {
        name: "agriculture",
        label: "Agriculture & Food",
        keywords: &["agricultur", "agri", "food", "farming", "forestry", "landwirtschaft"],
    },
    Sector {
        name: "mobility",
        label: "Mobility & Logistics",
        keywords: &["mobility", "mobilität", "transport", "automotive", "logistic", "aviation"],
    },
    Sector {
        name: "tourism",
        label: "Tourism",
        keywords: &["tourism", "tourismus", "hospitality"],
    },
    Sector {
        name: "education",
        label: "Education",
        keywords: &["education", "edtech", "training", "bildung", "learning"],
    },
    Sector {
        name: "social",
        label: "Social Impact",
        keywords: &["social", "inclusion", "community"],
    },
    Sector {
        name: "export",
        label: "Export & Internationalisation",
        keywords: &["export", "internationali", "foreign market", "trade"],
    },
];

/// Display label for a canonical sector name.
pub fn industry_label(sector: &str) -> Option<&'static str> {
    SECTORS
        .iter()
        .find(|candidate| candidate.name == sector)
        .map(|candidate| candidate.label)
}

/// Canonical sectors plus any free-text terms the synonym table did not recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIndustry {
    pub sectors: BTreeSet<&'static str>,
    pub terms: Vec<String>,
}

pub fn normalize_industry(raw: &str) -> Option<NormalizedIndustry> {
    let mut sectors = BTreeSet::new();
    let mut terms = Vec::new();

    for part in raw.split([';', ',', '/', '|']) {
        let text = clean_text(part);
        if text.is_empty() {
            continue;
        }

        let matched: Vec<&'static str> = SECTORS
            .iter()
            .filter(|sector| text == sector.name || mentions_any(&text, sector.keywords))
            .map(|sector| sector.name)
            .collect();

        if matched.is_empty() {
            terms.push(text);
        } else {
            sectors.extend(matched);
        }
    }

    if sectors.is_empty() && terms.is_empty() {
        None
    } else {
        Some(NormalizedIndustry { sectors, terms })
    }
}

pub fn match_industry(user: Option<&NormalizedIndustry>, program: Option<&NormalizedIndustry>) -> bool {
    let (Some(user), Some(program)) = (user, program) else {
        return true;
    };

    if user.sectors.intersection(&program.sectors).next().is_some() {
        return true;
    }

    user.terms.iter().any(|term| {
        program
            .terms
            .iter()
            .any(|other| other.contains(term.as_str()) || term.contains(other.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_collapse_to_sectors() {
        let program = normalize_industry("Software; Renewable Energy").expect("sectors");
        assert!(program.sectors.contains("digital"));
        assert!(program.sectors.contains("sustainability"));
        assert!(program.terms.is_empty());

        let user = normalize_industry("digital").expect("sector");
        assert!(match_industry(Some(&user), Some(&program)));
    }

    #[test]
    fn different_sectors_do_not_match() {
        let user = normalize_industry("health");
        let program = normalize_industry("Tourism, Hospitality");
        assert!(!match_industry(user.as_ref(), program.as_ref()));
    }

    #[test]
    fn unknown_terms_fall_back_to_substring_matching() {
        let user = normalize_industry("quantum");
        let program = normalize_industry("Quantum computing");
        assert_eq!(program.as_ref().map(|p| p.terms.len()), Some(1));
        assert!(match_industry(user.as_ref(), program.as_ref()));
        assert_eq!(normalize_industry(" ; "), None);
    }

    #[test]
    fn labels_exist_for_known_sectors() {
        assert_eq!(industry_label("health"), Some("Health & Life Sciences"));
        assert_eq!(industry_label("space"), None);
    }
}
