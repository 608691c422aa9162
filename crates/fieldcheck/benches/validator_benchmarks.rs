//! Validator performance benchmarks.
//!
//! Measures the value predicates, field splitting, and the row validation
//! engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fieldcheck::input::DataTable;
use fieldcheck::validation::validate_single_edtf_date;
use fieldcheck::{
    compare_strings, split_geolocation_string, split_typed_relation_string,
    validate_edtf_value, validate_language_code, validate_latlong_value, Cardinality, Config,
    FieldDefinition, FieldDefinitions, FieldType, ValidationEngine,
};

/// Sample EDTF values, valid and invalid.
const EDTF_SAMPLES: &[&str] = &[
    "2020-10-28",
    "1985-04-12T23:20:30",
    "1964/2008",
    "2004-06/2006-08",
    "[1667,1668,1670..1672]",
    "[..1760-12-03]",
    "1984?",
    "2004-06~",
    "2004-06-11%",
    "1900-13-01",
    "1900-02-31",
    "19000",
    "[1667,1668",
];

/// Sample coordinate pairs.
const LATLONG_SAMPLES: &[&str] = &[
    "+90.0, -127.554334",
    "49.16667, -123.93333",
    "\\+48.43333,-123.36667",
    "+90.1 -100.111",
    "045, 180",
    "-123.36667",
];

/// Benchmark single value predicates.
fn bench_value_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_validation");

    group.bench_function("edtf_batch", |b| {
        b.iter(|| {
            for sample in EDTF_SAMPLES {
                let _ = black_box(validate_edtf_value(sample));
            }
        })
    });

    group.bench_function("edtf_single_date", |b| {
        b.iter(|| black_box(validate_single_edtf_date("2004-06-11%")))
    });

    group.bench_function("latlong_batch", |b| {
        b.iter(|| {
            for sample in LATLONG_SAMPLES {
                black_box(validate_latlong_value(sample));
            }
        })
    });

    group.bench_function("language_code", |b| {
        b.iter(|| black_box(validate_language_code("zh-hant")))
    });

    group.bench_function("compare_strings", |b| {
        b.iter(|| black_box(compare_strings("Art  Historian", "art historian.")))
    });

    group.finish();
}

/// Benchmark splitting fields with growing numbers of subvalues.
fn bench_split_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_scaling");

    for count in [1, 10, 100].iter() {
        let geolocations = vec!["49.16667,-123.93333"; *count].join("|");
        let relations = vec!["relators:art:30"; *count].join("|");

        group.bench_with_input(BenchmarkId::new("geolocation", count), &geolocations, |b, field| {
            b.iter(|| black_box(split_geolocation_string(field, "|").unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("typed_relation", count), &relations, |b, field| {
            b.iter(|| black_box(split_typed_relation_string(field, "|", "node").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the validation engine over tables of growing size.
fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation_engine");
    let config = Config::default();
    let engine = ValidationEngine::new();

    let fields: FieldDefinitions = [
        ("title", FieldDefinition::new(FieldType::String).with_max_length(255)),
        (
            "field_coordinates",
            FieldDefinition::new(FieldType::Geolocation).with_cardinality(Cardinality::Unlimited),
        ),
        (
            "field_edtf_date",
            FieldDefinition::new(FieldType::Edtf).with_cardinality(Cardinality::Limited(2)),
        ),
        (
            "field_linked_agent",
            FieldDefinition::new(FieldType::TypedRelation)
                .with_cardinality(Cardinality::Unlimited)
                .with_target_type("taxonomy_term"),
        ),
    ]
    .into_iter()
    .map(|(name, def)| (name.to_string(), def))
    .collect();

    for rows in [100, 1_000].iter() {
        let table = DataTable::new(
            [
                "id",
                "title",
                "langcode",
                "created",
                "field_coordinates",
                "field_edtf_date",
                "field_linked_agent",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            (0..*rows)
                .map(|row| {
                    vec![
                        format!("{row:06}"),
                        format!("Title {row}"),
                        "en".to_string(),
                        "2020-11-15T23:49:22+00:00".to_string(),
                        "49.16667,-123.93333|+48.43333,-123.36667".to_string(),
                        "1964/2008|2020-10-28".to_string(),
                        "relators:art:30|relators:pht:31".to_string(),
                    ]
                })
                .collect(),
            b',',
        );

        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(engine.validate(table, &fields, &config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_value_validation, bench_split_scaling, bench_engine);
criterion_main!(benches);
