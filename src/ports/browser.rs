use crate::domain::AppError;

/// Port opening URLs for the operator.
pub trait Browser {
    fn open(&self, url: &str) -> Result<(), AppError>;
}
