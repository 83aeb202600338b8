//! Students: static directory data used to build rosters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub student_id: Uuid,
  pub name:       String,
  pub class_year: String,
  pub division:   String,
  pub department: String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::AttendanceStore::add_student`].
#[derive(Debug, Clone)]
pub struct NewStudent {
  pub name:       String,
  pub class_year: String,
  pub division:   String,
  pub department: String,
}

impl NewStudent {
  pub fn new(
    name: impl Into<String>,
    class_year: impl Into<String>,
    division: impl Into<String>,
  ) -> Self {
    Self {
      name:       name.into(),
      class_year: class_year.into(),
      division:   division.into(),
      department: String::new(),
    }
  }
}
