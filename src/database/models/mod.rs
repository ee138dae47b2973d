pub mod income;
