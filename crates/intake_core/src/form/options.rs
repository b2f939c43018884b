//! Built-in dropdown option lists for the MBIC/RIC branch of the form.
//! The BJIC branch sources most of these from the shared workbook instead
//! (see [`crate::form::workbook`]).

/// Fixed business unit on the BJIC branch.
pub const BJIC_BUSINESS_UNIT: &str = "Oral Care";

/// Dose forms offered on the BJIC branch.
pub const BJIC_DOSE_FORMS: &[&str] = &["Dentifrice"];

pub const BUSINESS_UNITS: &[&str] = &["OC", "PHC", "Other"];

pub fn franchises_for(business_unit: &str) -> &'static [&'static str] {
    match business_unit {
        "OC" => &["Crest", "Oral-B", "ProHealth", "Other"],
        "PHC" => &["Vicks", "Pepto", "Metamucil", "Nervive", "Other"],
        _ => &["Other"],
    }
}

pub const STUDY_PURPOSES: &[&str] = &[
    "Pre-market",
    "Pre-market for GC",
    "Pre-market for ROW",
    "Confirmatory",
];

pub const PACKAGING_CONFIGURATIONS: &[&str] = &[
    "0.85 oz PBL",
    "4.1 oz PBL",
    "15ml HDPE",
    "75ml HDPE",
    "170ml HDPE",
    "20g ABL",
    "40g ABL",
    "90g ABL",
    "120g ABL",
    "750 ml Bottles",
    "1000 ml Bottles",
    "4 oz Bottles",
    "8 oz Bottles",
    "12 oz Bottles",
    "Other",
];

pub const ACTIVE_INGREDIENTS: &[&str] = &[
    "NaF", "SnF2", "NaF/SnF2", "MFP", "BSS", "APAP", "DEX", "DOX", "CPM", "DPH", "Other",
];

pub const DOSE_FORMS: &[&str] = &[
    "Dentifrice",
    "Rinse",
    "Strips",
    "Liquid",
    "Tablet",
    "Caplet",
    "Liquicap",
    "Lozenge",
    "Spray",
    "Cream",
    "Ointment",
    "Gummy",
    "Other",
];

pub const REGULATORY_CLASSIFICATIONS: &[&str] = &[
    "Household Product",
    "Cosmetic",
    "Drug",
    "Dietary Supplement",
    "Food",
    "Medical Device",
    "Other",
];

pub const INTENDED_MARKETS: &[&str] = &[
    "Greater China",
    "US",
    "Canada",
    "EU",
    "EMEA",
    "AMA",
    "LA",
    "Other",
];

/// Manufacturing and packing share the same site list.
pub const MANUFACTURING_SITES: &[&str] = &[
    "P&G Beijing Innovation Center (BJIC), China",
    "P&G XQ plant",
    "P&G HP plant",
    "P&G Reading Innovation Centre (RIC), UK",
    "P&G Gross-Gerau, Germany",
    "P&G Mason Business Innovation Center, Mason, OH.",
    "P&G GBO-BS, Iowa City",
    "P&G GBO-Swing Road",
    "P&G Naucalpan",
    "Phoenix",
    "BestCo",
    "Trillium",
    "Other",
];

pub const PLACEMENT_SITES: &[&str] = &[
    "P&G Beijing Innovation Center (BJIC), China",
    "P&G Mason Business Innovation Center, Mason, OH.",
    "P&G Reading Innovation Centre (RIC), UK",
    "Others",
];

pub const TESTING_SITES: &[&str] = &[
    "P&G BJIC (Analytical lab, MCO lab, Sensory lab and HOPE lab)",
    "P&G Mason Business Innovation Center, Mason, OH.",
    "P&G Reading Innovation Centre (RIC), UK",
    "Others",
];
