mod contest_repository;

pub use contest_repository::SeaOrmContestStore;
