pub mod challenges;
pub mod notes;
pub mod queries;
