//! Boundary contract with the shared protocol workbook.
//!
//! A collaborating component reads the workbook and hands over raw cell
//! strings; nothing here parses xlsx. This module only pins down *where*
//! each BJIC dropdown list lives and how a raw cell turns into options.

/// Sheet holding the BJIC dropdown lists.
pub const SHEET_NAME: &str = "BJIC Case";

/// Zero-based column the option cells sit in.
pub const OPTION_COLUMN: usize = 3;

/// The workbook-sourced dropdown lists, each pinned to its sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookList {
    Franchise,
    StudyPurpose,
    PackagingConfiguration,
    ActiveIngredients,
    RegulatoryClassification,
    IntendedMarket,
    ManufacturingSite,
    PackingSite,
    TestingSite,
}

impl WorkbookList {
    pub const ALL: [WorkbookList; 9] = [
        WorkbookList::Franchise,
        WorkbookList::StudyPurpose,
        WorkbookList::PackagingConfiguration,
        WorkbookList::ActiveIngredients,
        WorkbookList::RegulatoryClassification,
        WorkbookList::IntendedMarket,
        WorkbookList::ManufacturingSite,
        WorkbookList::PackingSite,
        WorkbookList::TestingSite,
    ];

    /// Zero-based row of the list's option cell.
    pub fn row(&self) -> usize {
        match self {
            WorkbookList::Franchise => 4,
            WorkbookList::StudyPurpose => 5,
            WorkbookList::PackagingConfiguration => 11,
            WorkbookList::ActiveIngredients => 13,
            WorkbookList::RegulatoryClassification => 15,
            WorkbookList::IntendedMarket => 16,
            WorkbookList::ManufacturingSite => 18,
            WorkbookList::PackingSite => 19,
            WorkbookList::TestingSite => 21,
        }
    }
}

/// Split a raw option cell into entries: newline-separated groups, then
/// comma-separated values, trimmed, blanks dropped.
pub fn parse_option_cell(raw: &str) -> Vec<String> {
    raw.lines()
        .flat_map(|group| group.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_splits_on_newlines_and_commas() {
        let raw = "Crest, Oral-B\nProHealth,Other";
        assert_eq!(
            parse_option_cell(raw),
            vec!["Crest", "Oral-B", "ProHealth", "Other"]
        );
    }

    #[test]
    fn blank_entries_are_dropped() {
        assert_eq!(parse_option_cell("  ,\n, NaF ,, "), vec!["NaF"]);
        assert!(parse_option_cell("").is_empty());
    }

    #[test]
    fn every_list_has_a_distinct_row() {
        let mut rows: Vec<usize> = WorkbookList::ALL.iter().map(|l| l.row()).collect();
        rows.sort_unstable();
        rows.dedup();
        assert_eq!(rows.len(), WorkbookList::ALL.len());
    }
}
