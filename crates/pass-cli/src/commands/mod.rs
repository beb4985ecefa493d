pub mod assessment;
pub mod calc;
pub mod cohort;
pub mod dispatch;
pub mod history;
pub mod shared;
pub mod user;
