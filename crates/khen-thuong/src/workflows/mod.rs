pub mod awards;
