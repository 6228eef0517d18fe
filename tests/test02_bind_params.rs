use sqlite_rowmap::prelude::*;
use sqlite_rowmap::BindParams;

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Echo {
        i: i32,
        big: i64,
        d: f64,
        f: f32,
        s: String,
    }
}

fn memory_db() -> Database {
    Database::open_in_memory().expect("in-memory database")
}

#[test]
fn tuple_params_bind_in_declaration_order() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory_db();
    let mut echo = Echo::default();
    db.prepare(
        "SELECT ?1 AS i, ?2 AS big, ?3 AS d, ?4 AS f, ?5 AS s",
        (7_i32, 9_000_000_000_i64, 2.5_f64, 0.25_f32, "five"),
    )?
    .pull(&mut echo)?;

    assert_eq!(
        echo,
        Echo {
            i: 7,
            big: 9_000_000_000,
            d: 2.5,
            f: 0.25,
            s: "five".into(),
        }
    );
    Ok(())
}

#[test]
fn anonymous_placeholders_follow_argument_order() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory_db();
    let mut echo = Echo::default();
    db.prepare("SELECT ? AS s, ? AS i", ("first", 2))?
        .pull(&mut echo)?;
    assert_eq!(echo.s, "first");
    assert_eq!(echo.i, 2);
    Ok(())
}

#[test]
fn slices_vecs_and_trait_objects_bind() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory_db();
    db.execute("CREATE TABLE nums (n INTEGER, label TEXT)", ())?;
    for (n, label) in [(1, "one"), (2, "two"), (3, "three")] {
        db.execute("INSERT INTO nums (n, label) VALUES (?1, ?2)", (n, label))?;
    }

    record! {
        #[derive(Debug, Default)]
        struct Num { n: i64, label: String }
    }

    let bounds = vec![2_i64, 3];
    let found: Vec<Num> = db
        .prepare("SELECT n, label FROM nums WHERE n BETWEEN ?1 AND ?2 ORDER BY n", &bounds)?
        .collect()?;
    assert_eq!(found.iter().map(|r| r.n).collect::<Vec<_>>(), vec![2, 3]);

    let label = String::from("one");
    let mixed: [&dyn BindParam; 2] = [&1_i64, &label];
    assert_eq!(BindParams::len(&mixed), 2);
    let found: Vec<Num> = db
        .prepare("SELECT n, label FROM nums WHERE n = ?1 AND label = ?2", &mixed[..])?
        .collect()?;
    assert_eq!(found.len(), 1);

    let runtime = vec![ParamValue::Text("three".into())];
    let mut num = Num::default();
    db.prepare("SELECT n, label FROM nums WHERE label = ?1", runtime)?
        .pull(&mut num)?;
    assert_eq!(num.n, 3);
    Ok(())
}

#[test]
fn extra_argument_fails_with_its_position() {
    let db = memory_db();
    let err = db.prepare("SELECT ?1 AS i", (1, 2)).unwrap_err();
    assert!(matches!(err, RowMapError::BindError { position: 2, .. }), "{err:?}");
    assert_eq!(err.bind_position(), Some(2));
    assert!(err.to_string().contains("parameter 2"));
}

#[test]
fn invalid_sql_fails_at_prepare() {
    let db = memory_db();
    let err = db.prepare("SELEC nothing", ()).unwrap_err();
    match err {
        RowMapError::PrepareError(message) => assert!(message.contains("syntax error"), "{message}"),
        other => panic!("expected PrepareError, got {other:?}"),
    }
}

#[test]
fn text_with_embedded_nul_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory_db();
    db.execute("CREATE TABLE blobs (s TEXT)", ())?;
    let original = "ab\0cd\0";
    assert_eq!(original.len(), 6);
    db.execute("INSERT INTO blobs (s) VALUES (?1)", (original,))?;

    let mut echo = Echo::default();
    db.prepare("SELECT s FROM blobs", ())?.pull(&mut echo)?;
    assert_eq!(echo.s.len(), 6);
    assert_eq!(echo.s, original);
    Ok(())
}

#[test]
fn prepare_does_not_execute() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory_db();
    db.execute("CREATE TABLE log (v INTEGER)", ())?;
    let stmt = db.prepare("INSERT INTO log (v) VALUES (?1)", (1,))?;
    assert_eq!(stmt.parameter_count(), 1);
    drop(stmt);

    record! {
        #[derive(Default)]
        struct Count { n: i64 }
    }
    let mut count = Count::default();
    db.prepare("SELECT COUNT(*) AS n FROM log", ())?
        .pull(&mut count)?;
    assert_eq!(count.n, 0);

    // stepping the insert runs it; it yields no rows
    let stmt = db.prepare("INSERT INTO log (v) VALUES (?1)", (1,))?;
    stmt.for_each(|_: Count| panic!("insert produced a row"))?;
    db.prepare("SELECT COUNT(*) AS n FROM log", ())?
        .pull(&mut count)?;
    assert_eq!(count.n, 1);
    Ok(())
}
