mod cohort;
mod user;

pub use cohort::CohortCommands;
pub use user::UserCommands;
