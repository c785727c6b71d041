//! Property, document, and permission-level taxonomy.
//!
//! Each enum carries its numeric wire code, a canonical lowercase key, and a
//! display label. Parsing goes through static alias tables built once on
//! first use, so `"2"`, `"apartment"`, and `"Apartamento "` all resolve to
//! [`PropertyType::Apartment`].

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Label returned for document codes that have no mapping.
pub const FALLBACK_DOCUMENT_LABEL: &str = "Document";

// ---------------------------------------------------------------------------
// Property types
// ---------------------------------------------------------------------------

/// Kind of real-estate asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyType {
    House = 1,
    Apartment = 2,
    Land = 3,
    Building = 4,
    Unit = 5,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        Self::House,
        Self::Apartment,
        Self::Land,
        Self::Building,
        Self::Unit,
    ];

    /// Numeric wire code.
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Canonical lowercase key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Land => "land",
            Self::Building => "building",
            Self::Unit => "unit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
            Self::Land => "Land",
            Self::Building => "Building",
            Self::Unit => "Unit",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PROPERTY_TYPE_ALIASES: &[(&str, PropertyType)] = &[
    ("casa", PropertyType::House),
    ("moradia", PropertyType::House),
    ("vivenda", PropertyType::House),
    ("apartamento", PropertyType::Apartment),
    ("terreno", PropertyType::Land),
    ("lote", PropertyType::Land),
    ("predio", PropertyType::Building),
    ("prédio", PropertyType::Building),
    ("edificio", PropertyType::Building),
    ("edifício", PropertyType::Building),
    ("fracao", PropertyType::Unit),
    ("fração", PropertyType::Unit),
    ("unidade", PropertyType::Unit),
];

static PROPERTY_TYPE_LOOKUP: LazyLock<HashMap<String, PropertyType>> = LazyLock::new(|| {
    build_lookup(
        PropertyType::ALL
            .into_iter()
            .map(|t| (t, t.as_str(), t.code())),
        PROPERTY_TYPE_ALIASES,
    )
});

/// Display label for a property type.
pub fn label_for_property_type(property_type: PropertyType) -> &'static str {
    property_type.label()
}

/// Canonical key for a property type.
pub fn property_type_to_string(property_type: PropertyType) -> &'static str {
    property_type.as_str()
}

/// Parse a property type from its key, a Portuguese alias, or its numeric code.
///
/// Returns `None` for anything unrecognised.
pub fn property_type_from_string(input: &str) -> Option<PropertyType> {
    PROPERTY_TYPE_LOOKUP.get(&normalize(input)).copied()
}

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

/// Legal, fiscal, or technical document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentType {
    LandRegistryCertificate = 1,
    PropertyTaxRecord = 2,
    TitleDeed = 3,
    EnergyCertificate = 4,
    HabitationLicense = 5,
    TechnicalHousingSheet = 6,
    ImiProof = 7,
    FloorPlan = 8,
    CondominiumMinutes = 9,
    CondominiumRegulation = 10,
    CommonAreaInsurance = 11,
    MaintenanceContract = 12,
    HomeInsurance = 13,
    LeaseAgreement = 14,
    PromissoryContract = 15,
    MortgageContract = 16,
    ConstructionLicense = 17,
    ElevatorInspection = 18,
    GasInspection = 19,
    ElectricalInspection = 20,
    FireSafetyCertificate = 21,
    TopographicSurvey = 22,
    UrbanPlanningInfo = 23,
    UtilityBill = 24,
    Other = 25,
}

/// Static metadata for one [`DocumentType`].
#[derive(Debug)]
pub struct DocumentTypeInfo {
    pub kind: DocumentType,
    pub key: &'static str,
    pub label: &'static str,
    pub aliases: &'static [&'static str],
}

/// Indexed by `code - 1`.
pub const DOCUMENT_TYPES: &[DocumentTypeInfo] = &[
    DocumentTypeInfo {
        kind: DocumentType::LandRegistryCertificate,
        key: "land_registry_certificate",
        label: "Permanent Land Registry Certificate",
        aliases: &["certidao_permanente", "certidão permanente", "certidao permanente", "registo predial"],
    },
    DocumentTypeInfo {
        kind: DocumentType::PropertyTaxRecord,
        key: "property_tax_record",
        label: "Property Tax Record",
        aliases: &["caderneta_predial", "caderneta predial"],
    },
    DocumentTypeInfo {
        kind: DocumentType::TitleDeed,
        key: "title_deed",
        label: "Title Deed",
        aliases: &["escritura"],
    },
    DocumentTypeInfo {
        kind: DocumentType::EnergyCertificate,
        key: "energy_certificate",
        label: "Energy Certificate",
        aliases: &["certificado_energetico", "certificado energético", "certificado energetico"],
    },
    DocumentTypeInfo {
        kind: DocumentType::HabitationLicense,
        key: "habitation_license",
        label: "Habitation License",
        aliases: &["licenca_utilizacao", "licença de utilização", "licenca de utilizacao"],
    },
    DocumentTypeInfo {
        kind: DocumentType::TechnicalHousingSheet,
        key: "technical_housing_sheet",
        label: "Technical Housing Sheet",
        aliases: &["ficha_tecnica", "ficha técnica da habitação", "ficha tecnica"],
    },
    DocumentTypeInfo {
        kind: DocumentType::ImiProof,
        key: "imi_proof",
        label: "IMI Payment Proof",
        aliases: &["comprovativo_imi", "imi"],
    },
    DocumentTypeInfo {
        kind: DocumentType::FloorPlan,
        key: "floor_plan",
        label: "Floor Plan",
        aliases: &["planta", "plantas"],
    },
    DocumentTypeInfo {
        kind: DocumentType::CondominiumMinutes,
        key: "condominium_minutes",
        label: "Condominium Minutes",
        aliases: &["atas_condominio", "atas do condomínio", "ata"],
    },
    DocumentTypeInfo {
        kind: DocumentType::CondominiumRegulation,
        key: "condominium_regulation",
        label: "Condominium Regulation",
        aliases: &["regulamento_condominio", "regulamento do condomínio"],
    },
    DocumentTypeInfo {
        kind: DocumentType::CommonAreaInsurance,
        key: "common_area_insurance",
        label: "Common Area Insurance",
        aliases: &["seguro_partes_comuns", "seguro das partes comuns"],
    },
    DocumentTypeInfo {
        kind: DocumentType::MaintenanceContract,
        key: "maintenance_contract",
        label: "Maintenance Contract",
        aliases: &["contrato_manutencao", "contrato de manutenção"],
    },
    DocumentTypeInfo {
        kind: DocumentType::HomeInsurance,
        key: "home_insurance",
        label: "Home Insurance",
        aliases: &["seguro_multirriscos", "seguro multirriscos", "seguro habitação"],
    },
    DocumentTypeInfo {
        kind: DocumentType::LeaseAgreement,
        key: "lease_agreement",
        label: "Lease Agreement",
        aliases: &["contrato_arrendamento", "contrato de arrendamento"],
    },
    DocumentTypeInfo {
        kind: DocumentType::PromissoryContract,
        key: "promissory_contract",
        label: "Promissory Purchase Contract",
        aliases: &["cpcv", "contrato_promessa"],
    },
    DocumentTypeInfo {
        kind: DocumentType::MortgageContract,
        key: "mortgage_contract",
        label: "Mortgage Contract",
        aliases: &["contrato_credito", "crédito habitação", "credito habitacao"],
    },
    DocumentTypeInfo {
        kind: DocumentType::ConstructionLicense,
        key: "construction_license",
        label: "Construction License",
        aliases: &["licenca_construcao", "licença de construção"],
    },
    DocumentTypeInfo {
        kind: DocumentType::ElevatorInspection,
        key: "elevator_inspection",
        label: "Elevator Inspection",
        aliases: &["inspecao_elevador", "inspeção de elevadores"],
    },
    DocumentTypeInfo {
        kind: DocumentType::GasInspection,
        key: "gas_inspection",
        label: "Gas Inspection Certificate",
        aliases: &["inspecao_gas", "certificado de gás"],
    },
    DocumentTypeInfo {
        kind: DocumentType::ElectricalInspection,
        key: "electrical_inspection",
        label: "Electrical Inspection Certificate",
        aliases: &["certificado_eletrico", "certificado elétrico"],
    },
    DocumentTypeInfo {
        kind: DocumentType::FireSafetyCertificate,
        key: "fire_safety_certificate",
        label: "Fire Safety Certificate",
        aliases: &["seguranca_incendio", "segurança contra incêndio"],
    },
    DocumentTypeInfo {
        kind: DocumentType::TopographicSurvey,
        key: "topographic_survey",
        label: "Topographic Survey",
        aliases: &["levantamento_topografico", "levantamento topográfico"],
    },
    DocumentTypeInfo {
        kind: DocumentType::UrbanPlanningInfo,
        key: "urban_planning_info",
        label: "Urban Planning Information",
        aliases: &["informacao_previa", "pip"],
    },
    DocumentTypeInfo {
        kind: DocumentType::UtilityBill,
        key: "utility_bill",
        label: "Utility Bill",
        aliases: &["fatura", "fatura_servicos"],
    },
    DocumentTypeInfo {
        kind: DocumentType::Other,
        key: "other",
        label: "Other Document",
        aliases: &["outro", "outros"],
    },
];

impl DocumentType {
    pub fn all() -> impl Iterator<Item = DocumentType> {
        DOCUMENT_TYPES.iter().map(|info| info.kind)
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        let index = usize::try_from(code.checked_sub(1)?).ok()?;
        DOCUMENT_TYPES.get(index).map(|info| info.kind)
    }

    pub fn info(self) -> &'static DocumentTypeInfo {
        // Discriminants are contiguous from 1, matching table order.
        &DOCUMENT_TYPES[self as usize - 1]
    }

    pub fn as_str(self) -> &'static str {
        self.info().key
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static DOCUMENT_TYPE_LOOKUP: LazyLock<HashMap<String, DocumentType>> = LazyLock::new(|| {
    let aliases: Vec<(&str, DocumentType)> = DOCUMENT_TYPES
        .iter()
        .flat_map(|info| info.aliases.iter().map(move |alias| (*alias, info.kind)))
        .collect();
    build_lookup(
        DOCUMENT_TYPES.iter().map(|info| (info.kind, info.key, info.kind.code())),
        &aliases,
    )
});

/// Display label for a document type.
pub fn label_for_document_type(document_type: DocumentType) -> &'static str {
    document_type.label()
}

/// Display label for a raw numeric document code.
///
/// Unmapped codes get [`FALLBACK_DOCUMENT_LABEL`].
pub fn label_for_document_code(code: i64) -> &'static str {
    DocumentType::from_code(code)
        .map(DocumentType::label)
        .unwrap_or(FALLBACK_DOCUMENT_LABEL)
}

/// Label for an optional document type, as carried by tolerant DTOs.
pub fn label_for_optional_document_type(document_type: Option<DocumentType>) -> &'static str {
    document_type
        .map(DocumentType::label)
        .unwrap_or(FALLBACK_DOCUMENT_LABEL)
}

/// Canonical key for a document type.
pub fn document_type_to_string(document_type: DocumentType) -> &'static str {
    document_type.as_str()
}

/// Parse a document type from its key, a Portuguese alias, or its numeric code.
pub fn document_type_from_string(input: &str) -> Option<DocumentType> {
    DOCUMENT_TYPE_LOOKUP.get(&normalize(input)).copied()
}

// ---------------------------------------------------------------------------
// Permission levels
// ---------------------------------------------------------------------------

/// Access level granted to a non-owner on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionLevel {
    Read = 1,
    Admin = 2,
    Temporary = 3,
}

impl PermissionLevel {
    pub const ALL: [PermissionLevel; 3] = [Self::Read, Self::Admin, Self::Temporary];

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Admin => "admin",
            Self::Temporary => "temporary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Read => "Read only",
            Self::Admin => "Administrator",
            Self::Temporary => "Temporary access",
        }
    }

    /// Privilege rank used to pick the strongest of several grants.
    ///
    /// `Temporary` reads like `Read`, so it ranks just above it and below
    /// `Admin`.
    pub fn rank(self) -> u8 {
        match self {
            Self::Read => 1,
            Self::Temporary => 2,
            Self::Admin => 3,
        }
    }

    pub fn grants_read(self) -> bool {
        true
    }

    pub fn grants_edit(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PERMISSION_LEVEL_ALIASES: &[(&str, PermissionLevel)] = &[
    ("leitura", PermissionLevel::Read),
    ("administrador", PermissionLevel::Admin),
    ("temporario", PermissionLevel::Temporary),
    ("temporário", PermissionLevel::Temporary),
];

static PERMISSION_LEVEL_LOOKUP: LazyLock<HashMap<String, PermissionLevel>> =
    LazyLock::new(|| {
        build_lookup(
            PermissionLevel::ALL
                .into_iter()
                .map(|l| (l, l.as_str(), l.code())),
            PERMISSION_LEVEL_ALIASES,
        )
    });

/// Parse a permission level from its key, a Portuguese alias, or its code.
pub fn permission_level_from_string(input: &str) -> Option<PermissionLevel> {
    PERMISSION_LEVEL_LOOKUP.get(&normalize(input)).copied()
}

// ---------------------------------------------------------------------------
// Lookup construction
// ---------------------------------------------------------------------------

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Build an alias map holding the canonical key, the numeric code string,
/// and every extra alias for each value.
fn build_lookup<T: Copy>(
    canonical: impl Iterator<Item = (T, &'static str, i64)>,
    aliases: &[(&str, T)],
) -> HashMap<String, T> {
    let mut map = HashMap::new();
    for (value, key, code) in canonical {
        map.insert(key.to_string(), value);
        map.insert(code.to_string(), value);
    }
    for (alias, value) in aliases {
        map.insert(normalize(alias), *value);
    }
    map
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

/// Enum values arrive either as numeric codes or as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEnumValue {
    Code(i64),
    Text(String),
}

macro_rules! alias_serde {
    ($ty:ty, $parse:path, $what:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = RawEnumValue::deserialize(deserializer)?;
                let parsed = match &raw {
                    RawEnumValue::Code(code) => <$ty>::from_code(*code),
                    RawEnumValue::Text(text) => $parse(text),
                };
                parsed.ok_or_else(|| de::Error::custom(format!("unknown {}: {:?}", $what, raw)))
            }
        }
    };
}

alias_serde!(PropertyType, property_type_from_string, "property type");
alias_serde!(DocumentType, document_type_from_string, "document type");
alias_serde!(PermissionLevel, permission_level_from_string, "permission level");

/// Deserialize an optional document type, mapping unknown codes to `None`
/// instead of failing the whole payload.
pub fn deserialize_lenient_document_type<'de, D>(
    deserializer: D,
) -> Result<Option<DocumentType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawEnumValue>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw {
        RawEnumValue::Code(code) => DocumentType::from_code(code),
        RawEnumValue::Text(text) => document_type_from_string(&text),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
