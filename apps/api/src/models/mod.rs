pub mod applicant;

pub use applicant::{Applicant, JobTarget};
