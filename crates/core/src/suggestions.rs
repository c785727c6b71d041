//! Recommended documents per property type.
//!
//! Drives the upload prompts: the suggested list is fixed and ordered, and
//! the missing list keeps that order.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::Document;
use crate::taxonomy::{DocumentType, PropertyType};

const HOUSE_SUGGESTIONS: &[DocumentType] = &[
    DocumentType::TitleDeed,
    DocumentType::LandRegistryCertificate,
    DocumentType::EnergyCertificate,
    DocumentType::ImiProof,
    DocumentType::PropertyTaxRecord,
    DocumentType::HabitationLicense,
    DocumentType::TechnicalHousingSheet,
    DocumentType::HomeInsurance,
];

const APARTMENT_SUGGESTIONS: &[DocumentType] = &[
    DocumentType::TitleDeed,
    DocumentType::LandRegistryCertificate,
    DocumentType::EnergyCertificate,
    DocumentType::ImiProof,
    DocumentType::PropertyTaxRecord,
    DocumentType::HabitationLicense,
    DocumentType::CondominiumRegulation,
    DocumentType::HomeInsurance,
];

const LAND_SUGGESTIONS: &[DocumentType] = &[
    DocumentType::TitleDeed,
    DocumentType::LandRegistryCertificate,
    DocumentType::PropertyTaxRecord,
    DocumentType::ImiProof,
    DocumentType::TopographicSurvey,
    DocumentType::UrbanPlanningInfo,
];

const BUILDING_SUGGESTIONS: &[DocumentType] = &[
    DocumentType::CondominiumMinutes,
    DocumentType::CommonAreaInsurance,
    DocumentType::MaintenanceContract,
    DocumentType::CondominiumRegulation,
    DocumentType::LandRegistryCertificate,
    DocumentType::ElevatorInspection,
    DocumentType::FireSafetyCertificate,
];

const UNIT_SUGGESTIONS: &[DocumentType] = &[
    DocumentType::TitleDeed,
    DocumentType::LandRegistryCertificate,
    DocumentType::EnergyCertificate,
    DocumentType::ImiProof,
    DocumentType::PropertyTaxRecord,
    DocumentType::HabitationLicense,
];

/// Ordered list of document types recommended for a property type.
pub fn suggested_document_types(property_type: PropertyType) -> &'static [DocumentType] {
    match property_type {
        PropertyType::House => HOUSE_SUGGESTIONS,
        PropertyType::Apartment => APARTMENT_SUGGESTIONS,
        PropertyType::Land => LAND_SUGGESTIONS,
        PropertyType::Building => BUILDING_SUGGESTIONS,
        PropertyType::Unit => UNIT_SUGGESTIONS,
    }
}

/// Suggested types not yet covered by `existing`, in suggestion order.
///
/// Documents with an unrecognised type cover nothing. An empty result means
/// every suggested document is present.
pub fn missing_suggestions(property_type: PropertyType, existing: &[Document]) -> Vec<DocumentType> {
    let present: HashSet<DocumentType> = existing.iter().filter_map(|d| d.document_type).collect();
    suggested_document_types(property_type)
        .iter()
        .copied()
        .filter(|t| !present.contains(t))
        .collect()
}

/// How many suggested documents a property already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuggestionCoverage {
    pub present: usize,
    pub total: usize,
    pub percent: u8,
}

impl SuggestionCoverage {
    pub fn is_complete(&self) -> bool {
        self.present == self.total
    }
}

/// Coverage of the suggested list for the upload prompt header.
///
/// A type with no suggestions counts as fully covered.
pub fn suggestion_coverage(property_type: PropertyType, existing: &[Document]) -> SuggestionCoverage {
    let total = suggested_document_types(property_type).len();
    let present = total - missing_suggestions(property_type, existing).len();
    let percent = if total == 0 {
        100
    } else {
        ((present as f64 / total as f64) * 100.0).round() as u8
    };
    SuggestionCoverage {
        present,
        total,
        percent,
    }
}
