//! Track resolution: normalization, scoring, candidate search and assisted
//! disambiguation, composed by [`MatchResolver`].

pub mod disambiguate;
pub mod normalize;
pub mod resolver;
pub mod score;
pub mod search;

pub use disambiguate::{AssistantChoice, Disambiguator};
pub use normalize::TitleForms;
pub use resolver::{MatchOutcome, MatchResolver, Resolution, Stage};
pub use search::CandidateSearcher;
