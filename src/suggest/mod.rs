mod random;
mod suggester;

pub use random::RandomSuggester;
pub use suggester::MoveSuggester;
