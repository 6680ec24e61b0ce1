pub mod answer;
pub mod results;
pub mod survey;
pub mod user;
