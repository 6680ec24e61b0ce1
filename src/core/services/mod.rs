pub mod completion;
pub mod results;
pub mod submission;
pub mod survey;

#[cfg(test)]
pub(crate) mod testing;
