pub mod doctor;
pub mod export;
pub mod import;
pub mod inspect;
pub mod recall;
pub mod remember;
pub mod stats;
