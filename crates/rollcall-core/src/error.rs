//! Error types for `rollcall-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("class label {label:?} does not match lecture class {expected:?}")]
  ClassMismatch { label: String, expected: String },

  #[error("student {student_id} is not enrolled in the class of lecture {lecture_id}")]
  NotEnrolled { student_id: Uuid, lecture_id: Uuid },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
