pub mod artifact;
pub mod codepoint;
pub mod compile;
pub mod merge;
pub mod phonetic;
pub mod pipeline;
pub mod settings;
pub mod shuangpin;
