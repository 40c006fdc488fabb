pub mod errors;
pub mod db;
pub mod jurusan;
pub mod alumni;

#[cfg(test)]
mod tests;
