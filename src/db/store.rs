//! SQLite-backed hospital records store
//!
//! One connection behind a mutex; each public method holds the lock for its
//! whole duration, so every operation is atomic with respect to the others.
//! Multi-statement writes additionally run inside a SQLite transaction.

use crate::models::{Assistant, Doctor, Patient, PatientAssistant, Treatment};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info, warn};

/// Pragmas only meaningful for file-backed databases
const FILE_PRAGMAS_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
"#;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS doctor (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS patient (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    doctor_id INTEGER NOT NULL REFERENCES doctor(id)
);

CREATE TABLE IF NOT EXISTS assistant (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

-- No UNIQUE(patient_id, assistant_id): repeated assignments are kept
CREATE TABLE IF NOT EXISTS patient_assistant (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patient(id),
    assistant_id INTEGER NOT NULL REFERENCES assistant(id)
);

CREATE TABLE IF NOT EXISTS treatment (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    patient_id INTEGER NOT NULL REFERENCES patient(id),
    doctor_id INTEGER NOT NULL REFERENCES doctor(id),
    assistant_id INTEGER REFERENCES assistant(id)
);

CREATE INDEX IF NOT EXISTS idx_patient_doctor ON patient(doctor_id);
CREATE INDEX IF NOT EXISTS idx_treatment_patient ON treatment(patient_id);
CREATE INDEX IF NOT EXISTS idx_patient_assistant_patient ON patient_assistant(patient_id);
"#;

/// Store behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Turn on SQLite foreign-key enforcement. Off by default: dangling
    /// doctor/patient/assistant references are accepted.
    pub enforce_foreign_keys: bool,
}

/// Hospital records storage
pub struct HospitalDb {
    conn: Mutex<Connection>,
}

impl HospitalDb {
    /// Open (or create) a database file and apply the schema
    pub fn open(db_path: &str, options: StoreOptions) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX; // We handle our own locking

        let conn = Connection::open_with_flags(db_path, flags)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        conn.execute_batch(FILE_PRAGMAS_SQL)
            .context("Failed to apply database pragmas")?;

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap_or_default();
        if journal_mode.to_lowercase() != "wal" {
            warn!("WAL mode not active, journal_mode = {}", journal_mode);
        }

        let db = Self::from_connection(conn, options)?;
        info!(
            path = db_path,
            foreign_keys = options.enforce_foreign_keys,
            "Hospital database initialized"
        );
        Ok(db)
    }

    /// Private in-memory database, used by tests
    pub fn in_memory(options: StoreOptions) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn, options)
    }

    fn from_connection(conn: Connection, options: StoreOptions) -> Result<Self> {
        let fk_pragma = if options.enforce_foreign_keys {
            "PRAGMA foreign_keys = ON;"
        } else {
            "PRAGMA foreign_keys = OFF;"
        };
        conn.execute_batch(fk_pragma)
            .context("Failed to set foreign key enforcement")?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // ===== Doctors =====

    pub fn create_doctor(&self, name: &str) -> Result<Doctor> {
        let conn = self.conn.lock();
        conn.execute("INSERT INTO doctor (name) VALUES (?1)", params![name])
            .context("Failed to insert doctor")?;
        let id = conn.last_insert_rowid();

        debug!(id, "Doctor created");
        Ok(Doctor {
            id,
            name: name.to_string(),
        })
    }

    pub fn get_doctor(&self, id: i64) -> Result<Option<Doctor>> {
        let conn = self.conn.lock();
        let doctor = conn
            .query_row(
                "SELECT id, name FROM doctor WHERE id = ?1",
                params![id],
                Self::row_to_doctor,
            )
            .optional()?;
        Ok(doctor)
    }

    pub fn list_doctors(&self) -> Result<Vec<Doctor>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT id, name FROM doctor ORDER BY id")?;
        let doctors = stmt
            .query_map([], Self::row_to_doctor)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(doctors)
    }

    fn row_to_doctor(row: &rusqlite::Row) -> rusqlite::Result<Doctor> {
        Ok(Doctor {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    // ===== Patients =====

    pub fn create_patient(&self, name: &str, doctor_id: i64) -> Result<Patient> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO patient (name, doctor_id) VALUES (?1, ?2)",
            params![name, doctor_id],
        )
        .context("Failed to insert patient")?;
        let id = conn.last_insert_rowid();

        debug!(id, doctor_id, "Patient created");
        Ok(Patient {
            id,
            name: name.to_string(),
            doctor_id,
        })
    }

    pub fn get_patient(&self, id: i64) -> Result<Option<Patient>> {
        let conn = self.conn.lock();
        let patient = conn
            .query_row(
                "SELECT id, name, doctor_id FROM patient WHERE id = ?1",
                params![id],
                Self::row_to_patient,
            )
            .optional()?;
        Ok(patient)
    }

    pub fn list_patients(&self) -> Result<Vec<Patient>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT id, name, doctor_id FROM patient ORDER BY id")?;
        let patients = stmt
            .query_map([], Self::row_to_patient)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(patients)
    }

    /// Every doctor and every patient, read under one lock so the two lists
    /// describe the same moment.
    pub fn doctors_with_patients(&self) -> Result<(Vec<Doctor>, Vec<Patient>)> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare_cached("SELECT id, name FROM doctor ORDER BY id")?;
        let doctors = stmt
            .query_map([], Self::row_to_doctor)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare_cached("SELECT id, name, doctor_id FROM patient ORDER BY id")?;
        let patients = stmt
            .query_map([], Self::row_to_patient)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((doctors, patients))
    }

    fn row_to_patient(row: &rusqlite::Row) -> rusqlite::Result<Patient> {
        Ok(Patient {
            id: row.get(0)?,
            name: row.get(1)?,
            doctor_id: row.get(2)?,
        })
    }

    // ===== Assistants =====

    pub fn create_assistant(&self, name: &str) -> Result<Assistant> {
        let conn = self.conn.lock();
        conn.execute("INSERT INTO assistant (name) VALUES (?1)", params![name])
            .context("Failed to insert assistant")?;
        let id = conn.last_insert_rowid();

        debug!(id, "Assistant created");
        Ok(Assistant {
            id,
            name: name.to_string(),
        })
    }

    pub fn get_assistant(&self, id: i64) -> Result<Option<Assistant>> {
        let conn = self.conn.lock();
        let assistant = conn
            .query_row(
                "SELECT id, name FROM assistant WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Assistant {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(assistant)
    }

    // ===== Assignments =====

    /// Link a patient to an assistant. Returns `None`, writing nothing, when
    /// either side does not exist.
    pub fn assign_assistant(
        &self,
        patient_id: i64,
        assistant_id: i64,
    ) -> Result<Option<PatientAssistant>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let patient_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM patient WHERE id = ?1)",
            params![patient_id],
            |row| row.get(0),
        )?;
        let assistant_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM assistant WHERE id = ?1)",
            params![assistant_id],
            |row| row.get(0),
        )?;

        if !patient_exists || !assistant_exists {
            debug!(
                patient_id,
                assistant_id, patient_exists, assistant_exists, "Assignment target missing"
            );
            return Ok(None);
        }

        tx.execute(
            "INSERT INTO patient_assistant (patient_id, assistant_id) VALUES (?1, ?2)",
            params![patient_id, assistant_id],
        )
        .context("Failed to insert assignment")?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(id, patient_id, assistant_id, "Assistant assigned");
        Ok(Some(PatientAssistant {
            id,
            patient_id,
            assistant_id,
        }))
    }

    /// Assignment rows for a patient, oldest first
    pub fn assignments_for_patient(&self, patient_id: i64) -> Result<Vec<PatientAssistant>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT id, patient_id, assistant_id FROM patient_assistant
             WHERE patient_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![patient_id], |row| {
                Ok(PatientAssistant {
                    id: row.get(0)?,
                    patient_id: row.get(1)?,
                    assistant_id: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_assignments(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM patient_assistant", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    // ===== Treatments =====

    pub fn create_treatment(
        &self,
        description: &str,
        patient_id: i64,
        doctor_id: i64,
        assistant_id: Option<i64>,
    ) -> Result<Treatment> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO treatment (description, patient_id, doctor_id, assistant_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![description, patient_id, doctor_id, assistant_id],
        )
        .context("Failed to insert treatment")?;
        let id = conn.last_insert_rowid();

        debug!(id, patient_id, doctor_id, ?assistant_id, "Treatment created");
        Ok(Treatment {
            id,
            description: description.to_string(),
            patient_id,
            doctor_id,
            assistant_id,
        })
    }

    pub fn get_treatment(&self, id: i64) -> Result<Option<Treatment>> {
        let conn = self.conn.lock();
        let treatment = conn
            .query_row(
                "SELECT id, description, patient_id, doctor_id, assistant_id
                 FROM treatment WHERE id = ?1",
                params![id],
                Self::row_to_treatment,
            )
            .optional()?;
        Ok(treatment)
    }

    /// Treatments referencing a patient, in creation order
    pub fn treatments_for_patient(&self, patient_id: i64) -> Result<Vec<Treatment>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT id, description, patient_id, doctor_id, assistant_id
             FROM treatment WHERE patient_id = ?1 ORDER BY id",
        )?;
        let treatments = stmt
            .query_map(params![patient_id], Self::row_to_treatment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(treatments)
    }

    fn row_to_treatment(row: &rusqlite::Row) -> rusqlite::Result<Treatment> {
        Ok(Treatment {
            id: row.get(0)?,
            description: row.get(1)?,
            patient_id: row.get(2)?,
            doctor_id: row.get(3)?,
            assistant_id: row.get(4)?,
        })
    }
}
