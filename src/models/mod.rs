pub mod game;
pub mod player;
pub mod word;

pub use game::{
    // Database models
    GameResult, LeaderboardEntry, NewGameResult,
    // Grid types
    Grid, PlacedWord, Position,
};
pub use player::{GameSetting, Player};
pub use word::{NewWord, Word, WordDirection, WordEntry};
