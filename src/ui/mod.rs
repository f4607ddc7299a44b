pub mod calculator;
pub mod charts;
pub mod panels;
