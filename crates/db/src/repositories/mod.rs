//! Query access to the database, one repository struct per table.

mod challenge_repo;
mod criterion_repo;
mod evaluation_repo;
mod repository_repo;

pub use challenge_repo::ChallengeRepo;
pub use criterion_repo::CriterionRepo;
pub use evaluation_repo::EvaluationRepo;
pub use repository_repo::RepositoryRepo;
