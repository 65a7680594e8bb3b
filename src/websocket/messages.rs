use serde::{Deserialize, Serialize};

use crate::{
    game::{GameOutcome, SessionState},
    models::{Grid, Player, Position},
};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Register {
        employee_id: String,
        name: String,
    },
    StartGame,
    ResetGame,
    /// Throw the finished session away and deal a new one
    NewGame,
    BeginSelection {
        cell: Position,
    },
    ExtendSelection {
        cell: Position,
    },
    EndSelection,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Registered {
        player: Player,
    },
    /// The current grid. Word positions stay hidden until found.
    Puzzle {
        grid: Grid,
        size: usize,
        /// Words to find; `word_count` is their length
        words: Vec<String>,
        word_count: usize,
        /// Words that did not fit and are not part of this puzzle
        unplaced_words: Vec<String>,
        timer_duration: u32,
        state: SessionState,
    },
    GameStarted {
        time_remaining: u32,
    },
    SelectionUpdated {
        cells: Vec<Position>,
    },
    WordFound {
        word: String,
        positions: Vec<Position>,
        found: usize,
        total: usize,
    },
    NoMatch,
    TimerTick {
        remaining: u32,
    },
    GameOver {
        outcome: GameOutcome,
    },
    ResultSaved,
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"extend_selection","cell":{"row":2,"col":5}}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::ExtendSelection { cell } if cell == Position::new(2, 5)
        ));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"end_selection"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::EndSelection));
    }

    #[test]
    fn test_register_fields_camel_case() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"register","employeeId":"E1","name":"Sam"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Register { employee_id, .. } if employee_id == "E1"
        ));
    }

    #[test]
    fn test_puzzle_lists_words_without_positions() {
        let msg = ServerMessage::Puzzle {
            grid: Grid::from_rows(vec![vec!['C', 'A'], vec!['T', 'X']]),
            size: 2,
            words: vec!["CAT".to_string()],
            word_count: 1,
            unplaced_words: vec!["IMPROVEMENT".to_string()],
            timer_duration: 60,
            state: SessionState::Idle,
        };
        let json = serde_json::to_value(msg).unwrap();
        assert_eq!(json["type"], "puzzle");
        assert_eq!(json["words"], serde_json::json!(["CAT"]));
        assert_eq!(json["wordCount"], 1);
        assert_eq!(json["unplacedWords"], serde_json::json!(["IMPROVEMENT"]));
        assert_eq!(json["timerDuration"], 60);
        assert!(json.get("positions").is_none());
    }

    #[test]
    fn test_server_message_tagged() {
        let json = serde_json::to_value(ServerMessage::TimerTick { remaining: 9 }).unwrap();
        assert_eq!(json["type"], "timer_tick");
        assert_eq!(json["remaining"], 9);
    }
}
