use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Site;

/// Final output of the intake: field name to entered value, ready for
/// downstream document templating (which is not this system's job).
pub type Replacements = BTreeMap<String, String>;

const AUTO_POPULATED: &str = "[Auto populated text here]";

fn auto_populated() -> String {
    AUTO_POPULATED.to_string()
}

/// One multi-select answer: choices picked from the offered list plus
/// comma-separated free-text additions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultiSelect {
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub custom: String,
}

impl MultiSelect {
    /// Selected options first, then the free-text values in entry order.
    pub fn combined(&self) -> Vec<String> {
        let mut values = self.selected.clone();
        values.extend(
            self.custom
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        );
        values
    }

    pub fn joined(&self) -> String {
        self.combined().join(", ")
    }
}

/// A completed intake form. Deserialized from the answers file the operator
/// fills in; section texts B through H default to their auto-populated
/// placeholders when left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSubmission {
    pub site: Site,
    pub business_unit: String,
    pub franchise: String,
    pub study_purpose: String,
    #[serde(default)]
    pub protocol_number_nexus: String,
    #[serde(default)]
    pub protocol_number_enovia: String,
    #[serde(default)]
    pub product_name_formula: String,
    #[serde(default)]
    pub packaging_configuration: MultiSelect,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub active_ingredients: MultiSelect,
    #[serde(default)]
    pub product_dose_form: MultiSelect,
    #[serde(default)]
    pub regulatory_classification: MultiSelect,
    #[serde(default)]
    pub intended_market: MultiSelect,
    /// Overrides the site's pre-filled Background text when present.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub manufacturing_site: MultiSelect,
    #[serde(default)]
    pub packing_site: MultiSelect,
    #[serde(default)]
    pub placement_site: MultiSelect,
    #[serde(default)]
    pub testing_site: MultiSelect,
    /// Overrides the site's pre-filled DESIGN text when present.
    #[serde(default)]
    pub design: Option<String>,
    #[serde(default = "auto_populated")]
    pub product_manufacturing_information: String,
    #[serde(default = "auto_populated")]
    pub container_closure_system: String,
    #[serde(default = "auto_populated")]
    pub excursions_and_other_studies: String,
    #[serde(default = "auto_populated")]
    pub acceptance_criteria: String,
    #[serde(default = "auto_populated")]
    pub evaluation_of_data: String,
    #[serde(default = "auto_populated")]
    pub anticipated_reports: String,
    #[serde(default = "auto_populated")]
    pub test_methods_and_specifications: String,
}

impl FormSubmission {
    /// Assemble the flat replacements mapping. Key names are fixed; they are
    /// the placeholders the downstream template knows about.
    pub fn replacements(&self) -> Replacements {
        let mut map = Replacements::new();
        let mut put = |key: &str, value: String| {
            map.insert(key.to_string(), value);
        };

        put("Protocol_Development_Site", self.site.label().to_string());
        put("Business_Unit", self.business_unit.clone());
        put("Franchise", self.franchise.clone());
        put("Study_Purpose", self.study_purpose.clone());
        put(
            "Stability_Protocol_Number_Nexus",
            self.protocol_number_nexus.clone(),
        );
        put(
            "Stability_Protocol_Number_Enovia",
            self.protocol_number_enovia.clone(),
        );
        put("Product_Name_Formula", self.product_name_formula.clone());
        put(
            "Packaging_Configuration",
            self.packaging_configuration.joined(),
        );
        put("Project_Name", self.project_name.clone());
        put("Active_Ingredients", self.active_ingredients.joined());
        put("Product_Dose_Form", self.product_dose_form.joined());
        put(
            "Regulatory_Classification",
            self.regulatory_classification.joined(),
        );
        put("Intended_Market", self.intended_market.joined());
        put(
            "Background",
            self.background
                .clone()
                .unwrap_or_else(|| self.site.background().to_string()),
        );
        put("Manufacturing_Site", self.manufacturing_site.joined());
        put("Packing_Site", self.packing_site.joined());
        put("Placement_Site", self.placement_site.joined());
        put("Testing_Site", self.testing_site.joined());
        put(
            "A_DESIGN",
            self.design
                .clone()
                .unwrap_or_else(|| self.site.design().to_string()),
        );
        put(
            "B_PRODUCT_MANUFACTURING_INFORMATION",
            self.product_manufacturing_information.clone(),
        );
        put(
            "C_CONTAINER_CLOSURE_SYSTEM",
            self.container_closure_system.clone(),
        );
        put(
            "D_EXCURSIONS_AND_OTHER_STUDIES",
            self.excursions_and_other_studies.clone(),
        );
        put("E_ACCEPTANCE_CRITERIA", self.acceptance_criteria.clone());
        put("F_EVALUATION_OF_DATA", self.evaluation_of_data.clone());
        put("G_ANTICIPATED_REPORTS", self.anticipated_reports.clone());
        put(
            "H_TEST_METHODS_AND_SPECIFICATIONS",
            self.test_methods_and_specifications.clone(),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_submission() -> FormSubmission {
        let toml = r#"
            site = "MBIC"
            business_unit = "OC"
            franchise = "Crest"
            study_purpose = "Pre-market"
        "#;
        toml::from_str(toml).expect("minimal answers file")
    }

    const EXPECTED_KEYS: &[&str] = &[
        "Protocol_Development_Site",
        "Business_Unit",
        "Franchise",
        "Study_Purpose",
        "Stability_Protocol_Number_Nexus",
        "Stability_Protocol_Number_Enovia",
        "Product_Name_Formula",
        "Packaging_Configuration",
        "Project_Name",
        "Active_Ingredients",
        "Product_Dose_Form",
        "Regulatory_Classification",
        "Intended_Market",
        "Background",
        "Manufacturing_Site",
        "Packing_Site",
        "Placement_Site",
        "Testing_Site",
        "A_DESIGN",
        "B_PRODUCT_MANUFACTURING_INFORMATION",
        "C_CONTAINER_CLOSURE_SYSTEM",
        "D_EXCURSIONS_AND_OTHER_STUDIES",
        "E_ACCEPTANCE_CRITERIA",
        "F_EVALUATION_OF_DATA",
        "G_ANTICIPATED_REPORTS",
        "H_TEST_METHODS_AND_SPECIFICATIONS",
    ];

    #[test]
    fn replacements_cover_the_full_template_key_set() {
        let map = minimal_submission().replacements();
        assert_eq!(map.len(), EXPECTED_KEYS.len());
        for key in EXPECTED_KEYS {
            assert!(map.contains_key(*key), "missing key {key}");
        }
    }

    #[test]
    fn multiselect_combines_selection_and_free_text() {
        let answer = MultiSelect {
            selected: vec!["NaF".to_string(), "SnF2".to_string()],
            custom: " Zinc Citrate , , Stannous Chloride ".to_string(),
        };
        assert_eq!(
            answer.joined(),
            "NaF, SnF2, Zinc Citrate, Stannous Chloride"
        );
    }

    #[test]
    fn prefilled_texts_fall_back_to_the_site() {
        let submission = minimal_submission();
        let map = submission.replacements();
        assert_eq!(map["Background"], "MBIC Background Text");
        assert_eq!(map["A_DESIGN"], "MBIC DESIGN Text");
        assert_eq!(map["B_PRODUCT_MANUFACTURING_INFORMATION"], AUTO_POPULATED);
    }

    #[test]
    fn explicit_texts_win_over_prefills() {
        let mut submission = minimal_submission();
        submission.background = Some("custom background".to_string());
        submission.design = Some("custom design".to_string());
        let map = submission.replacements();
        assert_eq!(map["Background"], "custom background");
        assert_eq!(map["A_DESIGN"], "custom design");
    }

    #[test]
    fn replacements_serialize_to_stable_json() {
        let json = serde_json::to_string(&minimal_submission().replacements()).expect("json");
        assert!(json.starts_with("{\"A_DESIGN\""));
        assert!(json.contains("\"Protocol_Development_Site\":\"MBIC\""));
    }
}
