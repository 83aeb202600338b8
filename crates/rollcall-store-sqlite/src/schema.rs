//! SQL schema for the Rollcall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS lectures (
    lecture_id     TEXT PRIMARY KEY,
    subject        TEXT NOT NULL,
    syllabus_topic TEXT,
    class_year     TEXT NOT NULL,
    division       TEXT NOT NULL,
    schedule_kind  TEXT NOT NULL,   -- 'weekly' | 'once'
    day_of_week    TEXT,            -- 'mon'..'sun' when weekly
    lecture_date   TEXT,            -- YYYY-MM-DD when once
    start_time     TEXT NOT NULL,   -- HH:MM:SS
    end_time       TEXT NOT NULL,
    teacher_id     TEXT NOT NULL,
    substitute_id  TEXT,
    -- Denormalised hint only; the displayed status is derived from
    -- attendance_records on every read.
    status         TEXT NOT NULL DEFAULT 'scheduled',
    created_at     TEXT NOT NULL,
    CHECK (schedule_kind IN ('weekly', 'once')),
    CHECK (status IN ('scheduled', 'completed'))
);

CREATE TABLE IF NOT EXISTS students (
    student_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    class_year TEXT NOT NULL,
    division   TEXT NOT NULL,
    department TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

-- At most one row per (lecture, student) per occurrence window. The window
-- is supplied per call, so the upsert in SqliteStore::mark enforces it.
CREATE TABLE IF NOT EXISTS attendance_records (
    record_id  TEXT PRIMARY KEY,
    lecture_id TEXT NOT NULL REFERENCES lectures(lecture_id),
    student_id TEXT NOT NULL REFERENCES students(student_id),
    status     TEXT NOT NULL,
    marked_by  TEXT NOT NULL,
    created_at TEXT NOT NULL,       -- fixed-width RFC 3339 UTC
    updated_at TEXT NOT NULL,
    CHECK (status IN ('present', 'absent', 'late'))
);

CREATE INDEX IF NOT EXISTS attendance_lecture_created_idx
    ON attendance_records(lecture_id, created_at);
CREATE INDEX IF NOT EXISTS attendance_pair_idx
    ON attendance_records(lecture_id, student_id);
CREATE INDEX IF NOT EXISTS students_class_idx
    ON students(class_year, division);

PRAGMA user_version = 1;
";
