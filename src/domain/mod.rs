pub mod classification;
pub mod ticket;
