use rusqlite::{params, Connection, OptionalExtension, ToSql};

use crate::db::DatabaseError;
use crate::models::{FieldValue, NewPatient, Patient, PatientUpdate};

const PATIENT_COLUMNS: &str =
    "pid, pname, gender, age, contactnum, gmail, address, bloodgroup, weight, height, created_at";

fn row_to_patient(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        pid: row.get(0)?,
        pname: row.get(1)?,
        gender: row.get(2)?,
        age: row.get(3)?,
        contactnum: row.get(4)?,
        gmail: row.get(5)?,
        address: row.get(6)?,
        bloodgroup: row.get(7)?,
        weight: row.get(8)?,
        height: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Insert a new patient row. The caller has already run the presence checks,
/// so all fields are Some. Returns the store-generated insert id.
pub fn insert_patient(conn: &Connection, new: &NewPatient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patient (pid, pname, gender, age, contactnum, gmail,
                              address, bloodgroup, weight, height)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            new.pid,
            new.pname,
            new.gender,
            new.age,
            new.contactnum,
            new.gmail,
            new.address,
            new.bloodgroup,
            new.weight,
            new.height,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All patients, most recent first. `created_at` has one-second resolution,
/// so rowid breaks ties deterministically.
pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patient ORDER BY created_at DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map([], row_to_patient)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Look a patient up by pid. `pid` is the primary key; LIMIT 1 encodes the
/// first-row-wins tie-break the contract asks for.
pub fn get_patient(conn: &Connection, pid: &str) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patient WHERE pid = ?1 LIMIT 1"),
            params![pid],
            row_to_patient,
        )
        .optional()?;
    Ok(patient)
}

/// Apply a partial update to the row with the given pid, touching only the
/// supplied columns. Existence check and update share one transaction, so a
/// concurrent delete cannot slip between them.
///
/// Returns `None` when no row matches, otherwise the affected-row count.
pub fn update_patient(
    conn: &mut Connection,
    pid: &str,
    update: &PatientUpdate,
) -> Result<Option<usize>, DatabaseError> {
    let changes = update.changes();
    if changes.is_empty() {
        // The handler validates first; guard here so a direct caller cannot
        // build a SET clause with no columns.
        return Err(DatabaseError::ConstraintViolation(
            "update requires at least one field".into(),
        ));
    }

    let tx = conn.transaction()?;

    let exists: bool = tx
        .query_row(
            "SELECT 1 FROM patient WHERE pid = ?1 LIMIT 1",
            params![pid],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if !exists {
        return Ok(None);
    }

    let clauses: Vec<String> = changes
        .iter()
        .enumerate()
        .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE patient SET {} WHERE pid = ?{}",
        clauses.join(", "),
        changes.len() + 1
    );

    let owned: Vec<Box<dyn ToSql>> = changes
        .iter()
        .map(|(_, v)| match v {
            FieldValue::Text(s) => Box::new(s.clone()) as Box<dyn ToSql>,
            FieldValue::Int(n) => Box::new(*n) as Box<dyn ToSql>,
            FieldValue::Real(n) => Box::new(*n) as Box<dyn ToSql>,
        })
        .collect();
    let mut sql_params: Vec<&dyn ToSql> = owned.iter().map(Box::as_ref).collect();
    sql_params.push(&pid);

    let affected = tx.execute(&sql, sql_params.as_slice())?;
    tx.commit()?;

    Ok(Some(affected))
}

/// Delete the row with the given pid, returning the pre-deletion snapshot.
/// Lookup and delete share one transaction.
///
/// Returns `None` when no row matches.
pub fn delete_patient(
    conn: &mut Connection,
    pid: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let tx = conn.transaction()?;

    let snapshot = tx
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patient WHERE pid = ?1 LIMIT 1"),
            params![pid],
            row_to_patient,
        )
        .optional()?;

    let Some(snapshot) = snapshot else {
        return Ok(None);
    };

    tx.execute("DELETE FROM patient WHERE pid = ?1", params![pid])?;
    tx.commit()?;

    Ok(Some(snapshot))
}

/// All patients whose name contains the fragment, name ascending. SQLite's
/// LIKE is ASCII case-insensitive by default, which is the store collation
/// the contract defers to.
pub fn search_patients_by_name(
    conn: &Connection,
    fragment: &str,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patient WHERE pname LIKE ?1 ORDER BY pname ASC"
    ))?;
    let pattern = format!("%{fragment}%");
    let rows = stmt.query_map(params![pattern], row_to_patient)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
