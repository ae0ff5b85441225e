//! Column names shared by the loader, the wrangle steps and the CLI.
//!
//! Raw names come straight from `properties_2017` and the joined lookup tables.
//! Readable names are the ones assigned by the rename step; extended features are
//! always derived after renaming, so they are expressed against readable names.

// Raw store columns.
pub const PARCEL_ID: &str = "parcelid";
pub const ID: &str = "id";
pub const FIPS: &str = "fips";
pub const LAND_USE_TYPE_ID: &str = "propertylandusetypeid";
pub const BEDROOM_COUNT: &str = "bedroomcnt";
pub const BATHROOM_COUNT: &str = "bathroomcnt";
pub const UNIT_COUNT: &str = "unitcnt";
pub const FINISHED_SQUARE_FEET: &str = "calculatedfinishedsquarefeet";
pub const LOT_SIZE_SQUARE_FEET: &str = "lotsizesquarefeet";
pub const BUILDING_QUALITY_TYPE_ID: &str = "buildingqualitytypeid";
pub const HEATING_SYSTEM_DESC: &str = "heatingorsystemdesc";
pub const TAX_VALUE_DOLLARS: &str = "taxvaluedollarcnt";
pub const STRUCTURE_TAX_VALUE_DOLLARS: &str = "structuretaxvaluedollarcnt";
pub const LAND_TAX_VALUE_DOLLARS: &str = "landtaxvaluedollarcnt";
pub const TAX_AMOUNT: &str = "taxamount";
pub const YEAR_BUILT: &str = "yearbuilt";
pub const REGION_ID_CITY: &str = "regionidcity";
pub const LOG_ERROR: &str = "logerror";
pub const TRANSACTION_DATE: &str = "transactiondate";

// Derived in every profile.
pub const COUNTY: &str = "county";

// Readable names assigned by the rename step.
pub const TAX_VALUE: &str = "tax_value";
pub const BEDROOMS: &str = "bedrooms";
pub const BATHROOMS: &str = "bathrooms";
pub const SQUARE_FEET: &str = "square_feet";
pub const LOT_SIZE: &str = "lot_size";
pub const BUILDING_QUALITY: &str = "buildingquality";
pub const AGE: &str = "age";

// Extended profile features.
pub const AGE_BIN: &str = "age_bin";
pub const TAX_RATE: &str = "taxrate";
pub const ACRES: &str = "acres";
pub const ACRES_BIN: &str = "acres_bin";
pub const TAX_VALUE_BIN: &str = "tax_value_bin";
pub const LAND_TAX_VALUE_BIN: &str = "land_tax_value_bin";
pub const SQFT_BIN: &str = "sqft_bin";
pub const STRUCTURE_DOLLAR_PER_SQFT: &str = "structure_dollar_per_sqft";
pub const STRUCTURE_DOLLAR_SQFT_BIN: &str = "structure_dollar_sqft_bin";
pub const LAND_DOLLAR_PER_SQFT: &str = "land_dollar_per_sqft";
pub const LOT_DOLLAR_SQFT_BIN: &str = "lot_dollar_sqft_bin";
pub const BATH_BED_RATIO: &str = "bath_bed_ratio";
pub const COLA: &str = "cola";

/// Extended feature columns in the order they are appended.
pub const EXTENDED_COLUMNS: &[&str] = &[
    AGE_BIN,
    TAX_RATE,
    ACRES,
    ACRES_BIN,
    TAX_VALUE_BIN,
    LAND_TAX_VALUE_BIN,
    SQFT_BIN,
    STRUCTURE_DOLLAR_PER_SQFT,
    STRUCTURE_DOLLAR_SQFT_BIN,
    LAND_DOLLAR_PER_SQFT,
    LOT_DOLLAR_SQFT_BIN,
    BATH_BED_RATIO,
    COLA,
];

/// Columns that duplicate other fields, carry raw codes, or hold free text.
pub const REDUNDANT_COLUMNS: &[&str] = &[
    ID,
    "calculatedbathnbr",
    "finishedsquarefeet12",
    "fullbathcnt",
    "heatingorsystemtypeid",
    "propertycountylandusecode",
    LAND_USE_TYPE_ID,
    "propertyzoningdesc",
    "censustractandblock",
    "rawcensustractandblock",
    "propertylandusedesc",
];

/// Raw-to-readable renames applied once cleaning is complete.
pub const READABLE_RENAMES: &[(&str, &str)] = &[
    (TAX_VALUE_DOLLARS, TAX_VALUE),
    (BEDROOM_COUNT, BEDROOMS),
    (BATHROOM_COUNT, BATHROOMS),
    (FINISHED_SQUARE_FEET, SQUARE_FEET),
    (LOT_SIZE_SQUARE_FEET, LOT_SIZE),
    (BUILDING_QUALITY_TYPE_ID, BUILDING_QUALITY),
    (YEAR_BUILT, AGE),
];

/// Columns removed before modeling: identifiers and text, raw dimensions,
/// bucket labels and ratios. Absent columns are skipped, so one list covers
/// both wrangle profiles.
pub const DEFAULT_TIDY_DROP: &[&str] = &[
    PARCEL_ID,
    TRANSACTION_DATE,
    HEATING_SYSTEM_DESC,
    COUNTY,
    FIPS,
    REGION_ID_CITY,
    "regionidcounty",
    "regionidzip",
    "assessmentyear",
    "latitude",
    "longitude",
    "roomcnt",
    UNIT_COUNT,
    SQUARE_FEET,
    LOT_SIZE,
    ACRES,
    AGE_BIN,
    ACRES_BIN,
    TAX_VALUE_BIN,
    LAND_TAX_VALUE_BIN,
    SQFT_BIN,
    STRUCTURE_DOLLAR_SQFT_BIN,
    LOT_DOLLAR_SQFT_BIN,
    BATH_BED_RATIO,
];
