//! Template identifiers recognised in QRDA III documents.

use std::fmt;

/// Symbolic name for a recognised document-section schema.
///
/// Each variant is bound to the standardized `templateId/@root` string used in
/// QRDA Category III documents. Three variants are synthetic: [`TemplateId::NpiTinId`]
/// holds one performer's identifiers, [`TemplateId::Default`] is the registry key
/// for the fallback decoder and [`TemplateId::Placeholder`] stands in for a
/// document root that no decoder claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateId {
    /// QRDA Category III report root.
    ClinicalDocument,
    /// eCQM measure section (CMS).
    MeasureSection,
    /// Improvement activity section.
    IaSection,
    /// Advancing care information section.
    AciSection,
    /// Reporting parameters act carrying the performance period.
    ReportingParametersAct,
    /// Measure reference and results (CMS v2).
    MeasureReferenceResultsCmsV2,
    /// Measure data population segment (CMS v2).
    MeasureDataCmsV2,
    /// Aggregate count observation.
    AciAggregateCount,
    /// ACI numerator/denominator type measure.
    AciProportionMeasure,
    /// ACI numerator data.
    AciProportionNumerator,
    /// ACI denominator data.
    AciProportionDenominator,
    /// Improvement activity performed measure reference and results.
    IaMeasure,
    /// Measure performed observation.
    MeasurePerformed,
    /// NPI/TIN pair of one performer.
    NpiTinId,
    /// Fallback handler key.
    Default,
    /// Synthetic container node.
    Placeholder,
}

impl TemplateId {
    /// Every identifier, in declaration order.
    pub const ALL: [TemplateId; 16] = [
        Self::ClinicalDocument,
        Self::MeasureSection,
        Self::IaSection,
        Self::AciSection,
        Self::ReportingParametersAct,
        Self::MeasureReferenceResultsCmsV2,
        Self::MeasureDataCmsV2,
        Self::AciAggregateCount,
        Self::AciProportionMeasure,
        Self::AciProportionNumerator,
        Self::AciProportionDenominator,
        Self::IaMeasure,
        Self::MeasurePerformed,
        Self::NpiTinId,
        Self::Default,
        Self::Placeholder,
    ];

    /// The standardized identifier string.
    #[must_use]
    pub fn root(&self) -> &'static str {
        match self {
            Self::ClinicalDocument => "2.16.840.1.113883.10.20.27.1.1",
            Self::MeasureSection => "2.16.840.1.113883.10.20.27.2.3",
            Self::IaSection => "2.16.840.1.113883.10.20.27.2.4",
            Self::AciSection => "2.16.840.1.113883.10.20.27.2.5",
            Self::ReportingParametersAct => "2.16.840.1.113883.10.20.17.3.8",
            Self::MeasureReferenceResultsCmsV2 => "2.16.840.1.113883.10.20.27.3.17",
            Self::MeasureDataCmsV2 => "2.16.840.1.113883.10.20.27.3.16",
            Self::AciAggregateCount => "2.16.840.1.113883.10.20.27.3.3",
            Self::AciProportionMeasure => "2.16.840.1.113883.10.20.27.3.28",
            Self::AciProportionNumerator => "2.16.840.1.113883.10.20.27.3.31",
            Self::AciProportionDenominator => "2.16.840.1.113883.10.20.27.3.32",
            Self::IaMeasure => "2.16.840.1.113883.10.20.27.3.33",
            Self::MeasurePerformed => "2.16.840.1.113883.10.20.27.3.27",
            Self::NpiTinId => "npi-tin-id",
            Self::Default => "default",
            Self::Placeholder => "placeholder",
        }
    }

    /// Human readable name, used as the source identifier in error reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClinicalDocument => "Clinical Document",
            Self::MeasureSection => "Measure Section",
            Self::IaSection => "IA Section",
            Self::AciSection => "ACI Section",
            Self::ReportingParametersAct => "Reporting Parameters Act",
            Self::MeasureReferenceResultsCmsV2 => "Measure Reference Results",
            Self::MeasureDataCmsV2 => "Measure Data",
            Self::AciAggregateCount => "Aggregate Count",
            Self::AciProportionMeasure => "ACI Proportion Measure",
            Self::AciProportionNumerator => "ACI Proportion Numerator",
            Self::AciProportionDenominator => "ACI Proportion Denominator",
            Self::IaMeasure => "IA Measure",
            Self::MeasurePerformed => "Measure Performed",
            Self::NpiTinId => "NPI/TIN",
            Self::Default => "Default",
            Self::Placeholder => "Placeholder",
        }
    }

    /// Look up the identifier bound to a `templateId/@root` string.
    ///
    /// The synthetic identifiers never match document content.
    ///
    /// # Examples
    /// ```
    /// use qpp_converter::model::TemplateId;
    ///
    /// assert_eq!(
    ///     TemplateId::find_by_root("2.16.840.1.113883.10.20.27.3.3"),
    ///     Some(TemplateId::AciAggregateCount)
    /// );
    /// assert_eq!(TemplateId::find_by_root("default"), None);
    /// ```
    #[must_use]
    pub fn find_by_root(root: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|id| !id.is_synthetic())
            .find(|id| id.root() == root.trim())
    }

    /// Whether this identifier only exists inside the converter.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::NpiTinId | Self::Default | Self::Placeholder)
    }

    /// Whether this identifier marks a measurement-set section.
    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self, Self::MeasureSection | Self::IaSection | Self::AciSection)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
