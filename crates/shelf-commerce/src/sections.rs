//! Storefront section classifier.
//!
//! Splits a browse result into overlapping display buckets. Each bucket is
//! computed independently from the same input and capped at
//! [`SectionRules::limit`] entries.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

/// Cap applied to every bucket.
pub const SECTION_LIMIT: usize = 8;

/// Cards shown per section before the overflow note.
pub const SECTION_PREVIEW: usize = 4;

/// The storefront buckets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    /// Titles from well-known series.
    PopularSeries,
    /// Largest absolute price reduction first.
    Bestsellers,
    /// Books by allow-listed authors.
    TopAuthors,
    /// Cheapest first.
    BudgetPicks,
    /// Books that did not come from the seed catalog.
    NewlyAdded,
}

/// Icon shown beside a section title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionIcon {
    Sparkles,
    Trophy,
    Star,
    Trending,
    Clock,
}

impl SectionIcon {
    /// Terminal glyph for the icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            SectionIcon::Sparkles => "\u{2728}",
            SectionIcon::Trophy => "\u{1f3c6}",
            SectionIcon::Star => "\u{2b50}",
            SectionIcon::Trending => "\u{1f4c8}",
            SectionIcon::Clock => "\u{1f552}",
        }
    }
}

/// Visual emphasis of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SectionVariant {
    #[default]
    Default,
    Featured,
    New,
}

/// Presentation record for a [`SectionKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionInfo {
    pub title: &'static str,
    pub icon: SectionIcon,
    pub variant: SectionVariant,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::PopularSeries,
        SectionKind::Bestsellers,
        SectionKind::TopAuthors,
        SectionKind::BudgetPicks,
        SectionKind::NewlyAdded,
    ];

    pub fn info(&self) -> SectionInfo {
        match self {
            SectionKind::PopularSeries => SectionInfo {
                title: "Popular Series",
                icon: SectionIcon::Sparkles,
                variant: SectionVariant::Featured,
            },
            SectionKind::Bestsellers => SectionInfo {
                title: "Bestsellers",
                icon: SectionIcon::Trophy,
                variant: SectionVariant::Featured,
            },
            SectionKind::TopAuthors => SectionInfo {
                title: "Top Authors",
                icon: SectionIcon::Star,
                variant: SectionVariant::Default,
            },
            SectionKind::BudgetPicks => SectionInfo {
                title: "Budget Picks",
                icon: SectionIcon::Trending,
                variant: SectionVariant::Default,
            },
            SectionKind::NewlyAdded => SectionInfo {
                title: "Newly Added",
                icon: SectionIcon::Clock,
                variant: SectionVariant::New,
            },
        }
    }
}

/// Tunable inputs to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRules {
    /// Series names matched as title substrings, case-insensitively.
    pub series: Vec<String>,
    /// Author names matched exactly, case-insensitively.
    pub authors: Vec<String>,
    pub limit: usize,
}

impl Default for SectionRules {
    fn default() -> Self {
        Self {
            series: ["Harry Potter", "Toy Story", "Cars"]
                .map(String::from)
                .to_vec(),
            authors: [
                "J.K. Rowling",
                "Agatha Christie",
                "Stephen King",
                "Nicholas Sparks",
                "Margaret Atwood",
            ]
            .map(String::from)
            .to_vec(),
            limit: SECTION_LIMIT,
        }
    }
}

/// One classified bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub entries: Vec<CatalogEntry>,
}

impl Section {
    pub fn info(&self) -> SectionInfo {
        self.kind.info()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries shown as cards.
    pub fn preview(&self) -> &[CatalogEntry] {
        &self.entries[..self.entries.len().min(SECTION_PREVIEW)]
    }

    /// Entries not shown as cards.
    pub fn overflow(&self) -> usize {
        self.entries.len().saturating_sub(SECTION_PREVIEW)
    }

    /// Note shown under the cards, if anything overflowed.
    pub fn overflow_note(&self) -> Option<String> {
        match self.overflow() {
            0 => None,
            n => Some(format!("+{n} more books in this section")),
        }
    }
}

/// Compute every bucket for `entries`. Empty buckets are kept.
pub fn classify(entries: &[CatalogEntry], rules: &SectionRules) -> Vec<Section> {
    SectionKind::ALL
        .into_iter()
        .map(|kind| Section {
            kind,
            entries: bucket(kind, entries, rules),
        })
        .collect()
}

/// Buckets worth rendering: those with at least one entry.
pub fn visible_sections(entries: &[CatalogEntry], rules: &SectionRules) -> Vec<Section> {
    classify(entries, rules)
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect()
}

fn bucket(kind: SectionKind, entries: &[CatalogEntry], rules: &SectionRules) -> Vec<CatalogEntry> {
    let mut picked: Vec<CatalogEntry> = match kind {
        SectionKind::PopularSeries => {
            let series: Vec<String> = rules.series.iter().map(|s| s.to_lowercase()).collect();
            entries
                .iter()
                .filter(|e| {
                    let title = e.book.title.to_lowercase();
                    series.iter().any(|s| !s.is_empty() && title.contains(s))
                })
                .cloned()
                .collect()
        }
        SectionKind::Bestsellers => {
            let mut picked = entries.to_vec();
            picked.sort_by(|a, b| b.book.reduction().cmp(&a.book.reduction()));
            picked
        }
        SectionKind::TopAuthors => entries
            .iter()
            .filter(|e| {
                let author = e.book.author.trim();
                rules.authors.iter().any(|a| a.eq_ignore_ascii_case(author))
            })
            .cloned()
            .collect(),
        SectionKind::BudgetPicks => {
            let mut picked = entries.to_vec();
            picked.sort_by_key(|e| e.book.price);
            picked
        }
        SectionKind::NewlyAdded => entries.iter().filter(|e| !e.is_seed()).cloned().collect(),
    };
    picked.truncate(rules.limit);
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Origin};
    use crate::price::Price;

    fn section(sections: &[Section], kind: SectionKind) -> Vec<&str> {
        sections
            .iter()
            .find(|s| s.kind == kind)
            .unwrap()
            .entries
            .iter()
            .map(|e| e.book.id.as_str())
            .collect()
    }

    #[test]
    fn test_seed_buckets() {
        let catalog = Catalog::seed_only();
        let sections = classify(catalog.entries(), &SectionRules::default());
        assert_eq!(sections.len(), 5);

        assert_eq!(section(&sections, SectionKind::PopularSeries), vec!["1", "2", "3", "9"]);
        // 10 saves 350, 9 saves 300, then the 200s in input order.
        assert_eq!(
            section(&sections, SectionKind::Bestsellers),
            vec!["10", "9", "1", "4", "6", "7", "3", "5"]
        );
        assert_eq!(
            section(&sections, SectionKind::TopAuthors),
            vec!["1", "4", "5", "6", "8", "9", "10"]
        );
        assert_eq!(section(&sections, SectionKind::BudgetPicks)[0], "2");
        assert!(section(&sections, SectionKind::NewlyAdded).is_empty());
    }

    #[test]
    fn test_bestsellers_rank_undiscounted_books() {
        let entries: Vec<CatalogEntry> = Catalog::seed_only()
            .entries()
            .iter()
            .cloned()
            .map(|mut e| {
                e.book.old_price = e.book.price;
                e.origin = Origin::Listing;
                e
            })
            .collect();

        let sections = classify(&entries, &SectionRules::default());
        let bestsellers = section(&sections, SectionKind::Bestsellers);
        // All reductions tie at zero, so input order is kept.
        assert_eq!(bestsellers, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    }

    #[test]
    fn test_buckets_are_capped() {
        let catalog = Catalog::seed_only();
        let rules = SectionRules {
            limit: 3,
            ..Default::default()
        };
        for s in classify(catalog.entries(), &rules) {
            assert!(s.entries.len() <= 3);
        }
    }

    #[test]
    fn test_newly_added_uses_origin() {
        let mut entries = Catalog::seed_only().entries().to_vec();
        let mut extra = entries[0].clone();
        extra.book.id = "admin-1".into();
        extra.book.price = Price::new(10);
        extra.origin = Origin::Admin;
        entries.push(extra);

        let sections = classify(&entries, &SectionRules::default());
        assert_eq!(section(&sections, SectionKind::NewlyAdded), vec!["admin-1"]);
        assert_eq!(section(&sections, SectionKind::BudgetPicks)[0], "admin-1");
    }

    #[test]
    fn test_classify_leaves_input_alone() {
        let entries = Catalog::seed_only().entries().to_vec();
        let before = entries.clone();
        let _ = classify(&entries, &SectionRules::default());
        assert_eq!(entries, before);
    }

    #[test]
    fn test_preview_and_overflow_note() {
        let catalog = Catalog::seed_only();
        let sections = visible_sections(catalog.entries(), &SectionRules::default());
        assert_eq!(sections.len(), 4);

        let budget = sections
            .iter()
            .find(|s| s.kind == SectionKind::BudgetPicks)
            .unwrap();
        assert_eq!(budget.preview().len(), 4);
        assert_eq!(
            budget.overflow_note().as_deref(),
            Some("+4 more books in this section")
        );
    }

    #[test]
    fn test_info_is_total() {
        for kind in SectionKind::ALL {
            assert!(!kind.info().title.is_empty());
        }
        assert_eq!(SectionKind::NewlyAdded.info().icon, SectionIcon::Clock);
    }
}
