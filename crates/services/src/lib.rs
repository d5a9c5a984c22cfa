#![forbid(unsafe_code)]

pub mod app_services;
pub mod assessment_store;
pub mod error;
pub mod overview;

pub use app_services::AppServices;
pub use assessment_store::AssessmentStore;
pub use error::{AppServicesError, StoreError};
pub use overview::{AssessmentOverview, CategoryDetail, CategoryOverview, QuestionView};
