mod band;
mod ids;
mod level;
mod response;
mod score;
mod state;

pub use band::MaturityBand;
pub use ids::{CategoryId, IdError, QuestionId};
pub use level::{LevelError, MaturityLevel};
pub use response::QuestionResponse;
pub use score::CategoryScore;
pub use state::{AssessmentError, AssessmentState, ResponseUpdate};
