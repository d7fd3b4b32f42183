//! Embedded eCQM measure lookup.

use std::sync::LazyLock;

use serde::Deserialize;

/// One electronic clinical quality measure known to QPP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureConfig {
    /// Version-specific eMeasure GUID used in QRDA documents.
    pub e_measure_uuid: String,
    /// CMS eMeasure identifier, e.g. `CMS165v5`.
    pub e_measure_id: String,
    /// QPP measure identifier written to the output.
    pub measure_id: String,
    pub title: String,
}

#[allow(clippy::expect_used)] // Embedded data, validated by tests
static MEASURES: LazyLock<Vec<MeasureConfig>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../data/measures-data.json"))
        .expect("embedded measures data is valid JSON")
});

/// All known measures.
#[must_use]
pub fn all() -> &'static [MeasureConfig] {
    &MEASURES
}

/// Find a measure by its eMeasure GUID, ignoring case.
#[must_use]
pub fn find_by_uuid(uuid: &str) -> Option<&'static MeasureConfig> {
    let uuid = uuid.trim();
    MEASURES
        .iter()
        .find(|m| m.e_measure_uuid.eq_ignore_ascii_case(uuid))
}

/// Map an eMeasure GUID to its QPP measure id; unknown GUIDs pass through.
///
/// # Examples
/// ```
/// use qpp_converter::measures::measure_id_for;
///
/// assert_eq!(measure_id_for("40280381-51f0-825b-0152-22b98cff181a"), "236");
/// assert_eq!(measure_id_for("unknown"), "unknown");
/// ```
#[must_use]
pub fn measure_id_for(uuid: &str) -> &str {
    find_by_uuid(uuid).map_or(uuid, |m| m.measure_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_data_loads() {
        assert!(!all().is_empty());
        for measure in all() {
            assert!(!measure.measure_id.is_empty(), "{} has no id", measure.title);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let measure = find_by_uuid("40280381-51F0-825B-0152-22B98CFF181A").unwrap();
        assert_eq!(measure.e_measure_id, "CMS165v5");
    }
}
