pub mod seaorm;

pub use seaorm::SeaOrmAlumniRepository;
