use sqlite_rowmap::prelude::*;

record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Partial {
        a: i32,
        untouched: String,
        b: String,
    }
}

impl Default for Partial {
    fn default() -> Self {
        Self {
            a: -1,
            untouched: "keep".into(),
            b: String::new(),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct Reading {
    sensor: String,
    value: f64,
    note: Option<String>,
    samples: Option<i64>,
}

impl_record!(Reading { sensor, value, note, samples });

#[test]
fn only_matching_fields_are_written() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;
    let stmt = db.prepare("SELECT 'x' AS b, 42 AS a, 'ignored' AS extra", ())?;
    let mut rec = Partial::default();

    let decoded = stmt.next_row(|row| {
        assert_eq!(row.column_names(), ["b", "a", "extra"]);
        assert_eq!(row.decode(&mut rec)?, 2);
        let snapshot = rec.clone();
        // decoding the same row again changes nothing
        assert_eq!(row.decode(&mut rec)?, 2);
        assert_eq!(rec, snapshot);
        Ok(())
    })?;
    assert!(decoded.is_some());
    assert_eq!(
        rec,
        Partial {
            a: 42,
            untouched: "keep".into(),
            b: "x".into(),
        }
    );
    Ok(())
}

#[test]
fn first_column_wins_when_names_repeat() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;
    let mut rec = Partial::default();
    db.prepare("SELECT 1 AS a, 2 AS a, 'y' AS b", ())?
        .pull(&mut rec)?;
    assert_eq!(rec.a, 1);
    assert_eq!(rec.b, "y");
    Ok(())
}

#[test]
fn names_match_exactly() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;
    let mut rec = Partial::default();
    db.prepare("SELECT 5 AS A, 'z' AS b_", ())?.pull(&mut rec)?;
    assert_eq!(rec, Partial::default());
    Ok(())
}

#[test]
fn field_kind_selects_the_accessor() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;

    record! {
        #[derive(Debug, Default)]
        struct Mixed {
            truncated: i32,
            parsed: i64,
            widened: f64,
            printed: String,
            narrow: f32,
        }
    }

    let mut rec = Mixed::default();
    db.prepare(
        "SELECT 7.9 AS truncated, '12 apples' AS parsed, 3 AS widened, 42 AS printed, '1.5' AS narrow",
        (),
    )?
    .pull(&mut rec)?;
    assert_eq!(rec.truncated, 7);
    assert_eq!(rec.parsed, 12);
    assert!((rec.widened - 3.0).abs() < f64::EPSILON);
    assert_eq!(rec.printed, "42");
    assert!((rec.narrow - 1.5).abs() < f32::EPSILON);
    Ok(())
}

#[test]
fn null_into_plain_field_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;
    let mut rec = Partial::default();
    let err = db
        .prepare("SELECT NULL AS a", ())?
        .pull(&mut rec)
        .unwrap_err();
    match err {
        RowMapError::UnexpectedNull { column, kind } => {
            assert_eq!(column, "a");
            assert_eq!(kind, ScalarKind::Int);
        }
        other => panic!("expected UnexpectedNull, got {other:?}"),
    }
    assert_eq!(rec.a, -1);
    Ok(())
}

#[test]
fn optional_fields_take_null() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;
    db.execute(
        "CREATE TABLE readings (sensor TEXT, value REAL, note TEXT, samples INTEGER)",
        (),
    )?;
    db.execute(
        "INSERT INTO readings VALUES ('t1', 20.5, NULL, 3), ('t2', 19.0, 'recalibrated', NULL)",
        (),
    )?;

    let rows: Vec<Reading> = db
        .prepare("SELECT * FROM readings ORDER BY sensor", ())?
        .collect()?;
    assert_eq!(
        rows,
        vec![
            Reading {
                sensor: "t1".into(),
                value: 20.5,
                note: None,
                samples: Some(3),
            },
            Reading {
                sensor: "t2".into(),
                value: 19.0,
                note: Some("recalibrated".into()),
                samples: None,
            },
        ]
    );
    Ok(())
}

#[test]
fn decode_accepts_trait_objects() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;
    let mut rec = Partial::default();
    let target: &mut dyn Record = &mut rec;
    db.prepare("SELECT 9 AS a", ())?.pull(target)?;
    assert_eq!(rec.a, 9);
    Ok(())
}

#[test]
fn real_into_text_matches_engine_rendering() -> Result<(), Box<dyn std::error::Error>> {
    record! {
        #[derive(Debug, Default)]
        struct Rendered {
            x: String,
            shown: String,
        }
    }

    let db = Database::open_in_memory()?;
    for literal in ["1e20", "1.0/3", "0.1", "100.0", "-2.5e-7", "123456789.125"] {
        let sql = format!("SELECT {literal} AS x, CAST({literal} AS TEXT) AS shown");
        let mut rec = Rendered::default();
        db.prepare(&sql, ())?.pull(&mut rec)?;
        assert!(!rec.x.is_empty(), "{literal}");
        assert_eq!(rec.x, rec.shown, "{literal}");
    }

    // a bound double takes the same path as a column literal
    let mut rec = Rendered::default();
    db.prepare("SELECT ?1 AS x, CAST(?1 AS TEXT) AS shown", (1e20_f64,))?
        .pull(&mut rec)?;
    assert_eq!(rec.x, rec.shown);

    let projected = db
        .prepare("SELECT 1.0/3 AS x, CAST(1.0/3 AS TEXT) AS shown", ())?
        .pull_typed(&shape![x: String, shown: String])?;
    assert_eq!(projected.get("x"), projected.get("shown"));
    Ok(())
}
