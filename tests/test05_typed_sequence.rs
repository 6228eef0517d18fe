use sqlite_rowmap::prelude::*;

fn rows_ab() -> Result<Database, RowMapError> {
    let db = Database::open_in_memory()?;
    db.execute("CREATE TABLE t (a INTEGER, b TEXT, c REAL)", ())?;
    db.execute(
        "INSERT INTO t (a, b, c) VALUES (1, 'one', 0.5), (2, NULL, 1.5)",
        (),
    )?;
    Ok(db)
}

#[test]
fn projection_keeps_only_named_fields() -> Result<(), Box<dyn std::error::Error>> {
    let db = rows_ab()?;
    let stmt = db.prepare("SELECT a, b FROM t ORDER BY a", ())?;
    let specs = shape![a: i32];
    let rows: Vec<DynRecord> = stmt.typed_sequence(&specs).collect::<Result<_, _>>()?;

    assert_eq!(rows.len(), 2);
    let values: Vec<Option<&ScalarValue>> = rows.iter().map(|r| r.get("a")).collect();
    assert_eq!(
        values,
        [Some(&ScalarValue::Int(1)), Some(&ScalarValue::Int(2))]
    );
    assert!(rows.iter().all(|r| r.len() == 1 && r.get("b").is_none()));
    Ok(())
}

#[test]
fn null_columns_become_json_null() -> Result<(), Box<dyn std::error::Error>> {
    let db = rows_ab()?;
    let stmt = db.prepare("SELECT a, b, c FROM t ORDER BY a", ())?;
    let specs = shape![a: i64, b: String, c: f64];

    let mut lines = Vec::new();
    stmt.typed_sequence(&specs)
        .for_each_row(|row| lines.push(serde_json::to_string(&row).unwrap()))?;
    assert_eq!(
        lines,
        [
            r#"{"a":1,"b":"one","c":0.5}"#,
            r#"{"a":2,"b":null,"c":1.5}"#,
        ]
    );
    Ok(())
}

#[test]
fn each_row_starts_from_zero_values() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;
    let stmt = db.prepare(
        "SELECT 5 AS n, 'x' AS s UNION ALL SELECT 6 AS n, NULL AS s",
        (),
    )?;
    let specs = vec![
        FieldSpec::new("n", ScalarKind::Int64),
        FieldSpec::new("s", ScalarKind::Text),
        FieldSpec::new("missing", ScalarKind::Double),
    ];
    let mut rows = stmt.typed_sequence(&specs);
    assert_eq!(rows.column_names(), ["n", "s"]);

    let first = rows.next().transpose()?.expect("first row");
    assert_eq!(first.get("s").and_then(ScalarValue::as_text), Some("x"));
    assert_eq!(first.get("missing"), Some(&ScalarValue::Double(0.0)));

    let second = rows.next().transpose()?.expect("second row");
    assert_eq!(second.get("n").and_then(ScalarValue::as_i64), Some(6));
    assert!(second.is_null("s"));
    assert!(rows.next().is_none());
    Ok(())
}

#[test]
fn pull_typed_reads_one_row() -> Result<(), Box<dyn std::error::Error>> {
    let db = rows_ab()?;
    let specs: Vec<FieldSpec> = ["c:double", "a:int"]
        .into_iter()
        .map(str::parse)
        .collect::<Result<_, _>>()?;
    let row = db
        .prepare("SELECT a, c FROM t WHERE a = ?1", (2,))?
        .pull_typed(&specs)?;
    assert_eq!(row.names().collect::<Vec<_>>(), ["c", "a"]);
    assert_eq!(row.get("c").and_then(ScalarValue::as_f64), Some(1.5));
    assert_eq!(row.get("a"), Some(&ScalarValue::Int(2)));

    let err = db
        .prepare("SELECT a FROM t WHERE a = 99", ())?
        .pull_typed(&specs)
        .unwrap_err();
    assert!(matches!(err, RowMapError::RuntimeError(_)));
    Ok(())
}

#[test]
fn typed_and_declared_records_agree() -> Result<(), Box<dyn std::error::Error>> {
    record! {
        #[derive(Debug, Default)]
        struct Row { a: i32, c: f64 }
    }

    let db = rows_ab()?;
    let declared: Vec<Row> = db.prepare("SELECT a, c FROM t ORDER BY a", ())?.collect()?;
    let stmt = db.prepare("SELECT a, c FROM t ORDER BY a", ())?;
    let dynamic: Vec<DynRecord> = stmt
        .typed_sequence(&shape![a: i32, c: f64])
        .collect::<Result<_, _>>()?;

    assert_eq!(declared.len(), dynamic.len());
    for (d, t) in declared.iter().zip(&dynamic) {
        assert_eq!(t.get("a").and_then(ScalarValue::as_i64), Some(i64::from(d.a)));
        assert_eq!(t.get("c").and_then(ScalarValue::as_f64), Some(d.c));
    }
    Ok(())
}
