pub mod evaluator;
pub mod player;
pub mod search;

pub use evaluator::HeuristicEvaluator;
pub use player::AiPlayer;
pub use search::Searcher;
