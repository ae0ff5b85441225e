//! Raw store rows through wrangle, tidy, split and scale.

use polars::prelude::*;
use zillow_model::columns::{DEFAULT_TIDY_DROP, EXTENDED_COLUMNS};
use zillow_model::{Profile, PruneThresholds, SplitOptions, WrangleOptions};
use zillow_transform::frame::{numeric_values, string_values};
use zillow_transform::{
    WrangleError, prune_missing, run_wrangle, scale_partitions, split_data, tidy, wrangle_zillow,
};

/// One property as the acquisition query returns it.
#[derive(Clone)]
struct RawRow {
    parcel: f64,
    fips: Option<f64>,
    land_use: f64,
    bedrooms: f64,
    bathrooms: f64,
    units: Option<f64>,
    square_feet: f64,
    lot_size: Option<f64>,
    quality: Option<f64>,
    heating: Option<&'static str>,
    year_built: f64,
    tax_value: f64,
    structure_value: f64,
    land_value: f64,
    tax_amount: f64,
    city: f64,
    logerror: f64,
    pool: Option<f64>,
}

impl Default for RawRow {
    fn default() -> Self {
        Self {
            parcel: 1.0,
            fips: Some(6037.0),
            land_use: 261.0,
            bedrooms: 3.0,
            bathrooms: 2.0,
            units: Some(1.0),
            square_feet: 1200.0,
            lot_size: Some(8000.0),
            quality: Some(6.0),
            heating: Some("Central"),
            year_built: 1990.0,
            tax_value: 400_000.0,
            structure_value: 150_000.0,
            land_value: 250_000.0,
            tax_amount: 5000.0,
            city: 12447.0,
            logerror: 0.025,
            pool: None,
        }
    }
}

fn column_of<T>(rows: &[RawRow], name: &str, f: impl Fn(&RawRow) -> T) -> Column
where
    Series: NamedFrom<Vec<T>, [T]>,
{
    Series::new(name.into(), rows.iter().map(f).collect::<Vec<T>>()).into_column()
}

fn raw_frame(rows: &[RawRow]) -> DataFrame {
    DataFrame::new(vec![
        column_of(rows, "id", |r| r.parcel),
        column_of(rows, "parcelid", |r| r.parcel),
        column_of(rows, "bathroomcnt", |r| r.bathrooms),
        column_of(rows, "bedroomcnt", |r| r.bedrooms),
        column_of(rows, "buildingqualitytypeid", |r| r.quality),
        column_of(rows, "calculatedbathnbr", |r| r.bathrooms),
        column_of(rows, "calculatedfinishedsquarefeet", |r| r.square_feet),
        column_of(rows, "finishedsquarefeet12", |r| r.square_feet),
        column_of(rows, "fips", |r| r.fips),
        column_of(rows, "fullbathcnt", |r| r.bathrooms),
        column_of(rows, "heatingorsystemtypeid", |r| r.heating.map(|_| 2.0)),
        column_of(rows, "latitude", |r| 34_000_000.0 + r.parcel),
        column_of(rows, "longitude", |r| -118_000_000.0 - r.parcel),
        column_of(rows, "lotsizesquarefeet", |r| r.lot_size),
        column_of(rows, "poolcnt", |r| r.pool),
        column_of(rows, "propertycountylandusecode", |_| "0100"),
        column_of(rows, "propertylandusetypeid", |r| r.land_use),
        column_of(rows, "propertyzoningdesc", |_| "LAR1"),
        column_of(rows, "rawcensustractandblock", |_| 60_371_066.46),
        column_of(rows, "regionidcity", |r| r.city),
        column_of(rows, "unitcnt", |r| r.units),
        column_of(rows, "yearbuilt", |r| r.year_built),
        column_of(rows, "structuretaxvaluedollarcnt", |r| r.structure_value),
        column_of(rows, "taxvaluedollarcnt", |r| r.tax_value),
        column_of(rows, "landtaxvaluedollarcnt", |r| r.land_value),
        column_of(rows, "taxamount", |r| r.tax_amount),
        column_of(rows, "censustractandblock", |_| 60_371_066_461_001.0),
        column_of(rows, "logerror", |r| r.logerror),
        column_of(rows, "transactiondate", |_| "2017-01-01"),
        column_of(rows, "heatingorsystemdesc", |r| r.heating),
        column_of(rows, "propertylandusedesc", |_| "Single Family Residential"),
    ])
    .unwrap()
}

fn scenario_rows() -> Vec<RawRow> {
    vec![
        RawRow::default(),
        RawRow {
            parcel: 2.0,
            bathrooms: 0.0,
            ..RawRow::default()
        },
        RawRow {
            parcel: 3.0,
            land_use: 246.0,
            ..RawRow::default()
        },
        RawRow {
            parcel: 4.0,
            tax_value: 6_000_000.0,
            pool: Some(1.0),
            ..RawRow::default()
        },
        RawRow {
            parcel: 5.0,
            fips: Some(6059.0),
            heating: None,
            quality: None,
            lot_size: None,
            units: None,
            city: 3101.0,
            ..RawRow::default()
        },
    ]
}

fn row_for_parcel(df: &DataFrame, parcel: f64) -> usize {
    numeric_values(df, "parcelid")
        .unwrap()
        .iter()
        .position(|value| *value == Some(parcel))
        .expect("parcel survives")
}

#[test]
fn typical_home_survives_extended_profile() {
    let options = WrangleOptions::default().with_profile(Profile::Extended);
    let df = wrangle_zillow(raw_frame(&scenario_rows()), &options).unwrap();

    let parcels: Vec<Option<f64>> = numeric_values(&df, "parcelid").unwrap();
    assert_eq!(parcels, vec![Some(1.0), Some(5.0)]);

    let row = row_for_parcel(&df, 1.0);
    assert_eq!(string_values(&df, "county").unwrap()[row].as_deref(), Some("Los_Angeles"));
    assert_eq!(numeric_values(&df, "age").unwrap()[row], Some(27.0));
    let rate = numeric_values(&df, "taxrate").unwrap()[row].unwrap();
    assert!((rate - 1.25).abs() < 1e-9);
    let acres = numeric_values(&df, "acres").unwrap()[row].unwrap();
    assert!((acres - 0.1837).abs() < 1e-4);
    assert_eq!(numeric_values(&df, "cola").unwrap()[row], Some(1.0));

    for name in EXTENDED_COLUMNS {
        assert!(df.column(name).is_ok(), "missing {name}");
    }
}

fn step_rows(outcome: &zillow_transform::WrangleOutcome, step: &str) -> (usize, usize) {
    let report = outcome
        .steps
        .iter()
        .find(|report| report.step == step)
        .expect("step ran");
    (report.rows_in, report.rows_out)
}

#[test]
fn extended_purge_and_bounds_remove_degenerate_homes() {
    let rows = vec![
        RawRow::default(),
        // zero lot size: land dollars per square foot divides by zero
        RawRow {
            parcel: 11.0,
            lot_size: Some(0.0),
            ..RawRow::default()
        },
        // 147 years old: past the last age bucket
        RawRow {
            parcel: 12.0,
            year_built: 1870.0,
            ..RawRow::default()
        },
        // land value above the last land-value bucket
        RawRow {
            parcel: 13.0,
            land_value: 1_200_000.0,
            ..RawRow::default()
        },
        // eight bedrooms: complete, but outside the bedroom bound
        RawRow {
            parcel: 14.0,
            bedrooms: 8.0,
            ..RawRow::default()
        },
        // 12.5% tax rate: outside the tax-rate bound
        RawRow {
            parcel: 15.0,
            tax_amount: 50_000.0,
            ..RawRow::default()
        },
    ];
    let mut df = raw_frame(&rows);
    let options = WrangleOptions::default().with_profile(Profile::Extended);
    let outcome = run_wrangle(&mut df, &options).unwrap();

    assert_eq!(numeric_values(&df, "parcelid").unwrap(), vec![Some(1.0)]);
    assert!(outcome.skipped_steps.is_empty());
    assert_eq!(step_rows(&outcome, "derive_extended_features"), (6, 6));
    assert_eq!(step_rows(&outcome, "purge_derived_nulls"), (6, 3));
    assert_eq!(step_rows(&outcome, "apply_final_bounds"), (3, 1));
}

#[test]
fn minimal_profile_imputes_and_renames() {
    let df = wrangle_zillow(raw_frame(&scenario_rows()), &WrangleOptions::default()).unwrap();
    assert_eq!(df.height(), 2);

    let orange = row_for_parcel(&df, 5.0);
    assert_eq!(string_values(&df, "county").unwrap()[orange].as_deref(), Some("Orange"));
    assert_eq!(
        string_values(&df, "heatingorsystemdesc").unwrap()[orange].as_deref(),
        Some("None")
    );
    assert_eq!(numeric_values(&df, "lot_size").unwrap()[orange], Some(7313.0));
    assert_eq!(numeric_values(&df, "buildingquality").unwrap()[orange], Some(6.0));
    assert_eq!(numeric_values(&df, "unitcnt").unwrap()[orange], Some(1.0));
    assert_eq!(numeric_values(&df, "tax_value").unwrap()[orange], Some(400_000.0));

    assert!(df.column("taxrate").is_err());
    assert!(df.column("poolcnt").is_err());
    assert!(df.column("propertylandusetypeid").is_err());
    assert!(df.column("taxvaluedollarcnt").is_err());
}

#[test]
fn outcome_reports_each_step() {
    let mut df = raw_frame(&scenario_rows());
    let outcome = run_wrangle(&mut df, &WrangleOptions::default()).unwrap();

    assert_eq!(outcome.steps.len(), 11);
    assert_eq!(outcome.skipped_steps.len(), 3);
    let livable = outcome
        .steps
        .iter()
        .find(|report| report.step == "filter_livable")
        .unwrap();
    assert_eq!((livable.rows_in, livable.rows_out), (4, 3));

    let prune = outcome.prune.expect("prune ran");
    assert_eq!(prune.dropped_columns, vec!["poolcnt".to_string()]);
}

#[test]
fn zero_bathrooms_are_removed_whatever_else_holds() {
    let df = wrangle_zillow(raw_frame(&scenario_rows()), &WrangleOptions::default()).unwrap();
    let parcels = numeric_values(&df, "parcelid").unwrap();
    assert!(!parcels.contains(&Some(2.0)));
}

#[test]
fn missing_fips_is_fatal() {
    let rows = vec![RawRow {
        fips: None,
        ..RawRow::default()
    }];
    let err = wrangle_zillow(raw_frame(&rows), &WrangleOptions::default()).unwrap_err();
    assert!(matches!(err, WrangleError::InvalidValue { ref column, .. } if column == "fips"));
}

#[test]
fn sixty_percent_missing_column_dropped_forty_retained() {
    let sixty: Vec<Option<f64>> = (0..10).map(|i| (i >= 6).then_some(1.0)).collect();
    let forty: Vec<Option<f64>> = (0..10).map(|i| (i >= 4).then_some(1.0)).collect();
    let full: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let mut df = df!("sparse" => sixty, "patchy" => forty, "full" => full).unwrap();

    let outcome = prune_missing(&mut df, PruneThresholds::default()).unwrap();
    assert_eq!(outcome.dropped_columns, vec!["sparse".to_string()]);
    assert!(df.column("patchy").is_ok());
}

fn varied_rows(count: usize) -> Vec<RawRow> {
    (0..count)
        .map(|i| {
            let step = i as f64;
            RawRow {
                parcel: 1000.0 + step,
                fips: Some([6037.0, 6059.0, 6111.0][i % 3]),
                bedrooms: 1.0 + (i % 5) as f64,
                bathrooms: 1.0 + (i % 4) as f64,
                square_feet: 800.0 + 37.0 * step,
                lot_size: Some(4000.0 + 113.0 * step),
                quality: Some(4.0 + (i % 6) as f64),
                year_built: 1950.0 + (i % 60) as f64,
                tax_value: 200_000.0 + 7_919.0 * step,
                structure_value: 90_000.0 + 3_001.0 * step,
                land_value: 110_000.0 + 4_918.0 * step,
                tax_amount: 2_600.0 + 97.0 * step,
                logerror: (step - 30.0) / 1000.0,
                ..RawRow::default()
            }
        })
        .collect()
}

#[test]
fn wrangled_table_splits_and_scales() {
    let mut df = wrangle_zillow(raw_frame(&varied_rows(60)), &WrangleOptions::default()).unwrap();
    assert_eq!(df.height(), 60);
    tidy(&mut df, DEFAULT_TIDY_DROP).unwrap();

    let split = split_data(&df, &SplitOptions::default()).unwrap();
    assert_eq!(split.test.len(), 12);
    assert_eq!(split.validate.len(), 14);
    assert_eq!(split.train.len(), 34);

    let scaled = scale_partitions(
        &split.train.features,
        &split.validate.features,
        &split.test.features,
    )
    .unwrap();
    assert_eq!(
        scaled.train.get_column_names_owned(),
        split.train.features.get_column_names_owned()
    );
    for column in scaled.train.get_columns() {
        let values: Vec<f64> = column.f64().unwrap().into_iter().flatten().collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 0.0, "{}", column.name());
        assert!(max == 1.0 || max == 0.0, "{}", column.name());
    }
}
