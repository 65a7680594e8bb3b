use crate::{
    game::{GameOutcome, GameSession, GridGenerator, SessionEvent},
    models::{NewGameResult, WordEntry},
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use dashmap::mapref::entry::Entry;
use futures::{sink::SinkExt, stream::StreamExt};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, Interval},
};
use uuid::Uuid;

/// How often the play clock advances
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// WebSocket upgrade handler for the play protocol
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    let mut conn = match PlayConnection::open(state, tx.clone()).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Failed to set up game session: {}", e);
            let _ = tx
                .send(ServerMessage::Error {
                    message: "Failed to load puzzle".to_string(),
                })
                .await;
            drop(tx);
            let _ = send_task.await;
            return;
        }
    };
    tracing::info!("WebSocket connection {} established", conn.id);

    // Gestures and clock ticks are handled one at a time, so the session is never shared
    loop {
        tokio::select! {
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) = conn.handle(client_msg).await {
                            tracing::debug!("Rejected message on {}: {}", conn.id, e);
                            conn.send(ServerMessage::Error {
                                message: e.to_string(),
                            })
                            .await;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        conn.send(ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        })
                        .await;
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Client disconnected: {}", conn.id);
                    break;
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on {}: {}", conn.id, e);
                    break;
                }
                Some(Ok(_)) => {}
            },
            _ = next_tick(&mut conn.timer) => conn.on_tick().await,
            _ = &mut send_task => break,
        }
    }

    conn.release_player();
    send_task.abort();

    tracing::info!("WebSocket connection {} closed", conn.id);
}

/// Resolves on the next clock tick, or never when no game is running
async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Build a session from the current word list and timer setting
async fn new_session(state: &AppState) -> anyhow::Result<GameSession> {
    let words: Vec<WordEntry> = state
        .store
        .list_words()
        .await?
        .iter()
        .map(WordEntry::from)
        .collect();
    let timer_duration = state.store.timer_duration().await?;
    let generator = GridGenerator::new(state.config.game.grid_size)?
        .with_max_attempts(state.config.game.placement_attempts);

    Ok(GameSession::new(generator, words, timer_duration))
}

/// One socket's game: owns the session and its clock
struct PlayConnection {
    id: Uuid,
    state: Arc<AppState>,
    tx: mpsc::Sender<ServerMessage>,
    session: GameSession,
    timer: Option<Interval>,
}

impl PlayConnection {
    async fn open(state: Arc<AppState>, tx: mpsc::Sender<ServerMessage>) -> anyhow::Result<Self> {
        let session = new_session(&state).await?;
        let conn = Self {
            id: Uuid::new_v4(),
            state,
            tx,
            session,
            timer: None,
        };
        conn.send_puzzle().await;
        Ok(conn)
    }

    async fn send(&self, msg: ServerMessage) {
        if self.tx.send(msg).await.is_err() {
            tracing::debug!("Dropped message for closed connection {}", self.id);
        }
    }

    async fn send_puzzle(&self) {
        let grid = self.session.grid().clone();
        let words = self.session.findable_words();
        self.send(ServerMessage::Puzzle {
            size: grid.size(),
            grid,
            word_count: words.len(),
            words,
            unplaced_words: self.session.unplaced_words().to_vec(),
            timer_duration: self.session.timer_duration(),
            state: self.session.state(),
        })
        .await;
    }

    async fn handle(&mut self, msg: ClientMessage) -> anyhow::Result<()> {
        match msg {
            ClientMessage::Register { employee_id, name } => {
                let employee_id = employee_id.trim();
                let name = name.trim();
                if employee_id.is_empty() || name.is_empty() {
                    anyhow::bail!("Employee ID and name are required");
                }

                let player = self.state.store.register_player(employee_id, name).await?;
                let claimed = match self.state.active_players.entry(player.id) {
                    Entry::Occupied(holder) if *holder.get() != self.id => {
                        anyhow::bail!("{} is already playing in another window", player.employee_id);
                    }
                    Entry::Occupied(_) => false,
                    Entry::Vacant(slot) => {
                        slot.insert(self.id);
                        true
                    }
                };

                if let Err(e) = self.session.register_player(player.clone()) {
                    if claimed {
                        self.state.active_players.remove(&player.id);
                    }
                    return Err(e.into());
                }
                self.release_players_except(player.id);
                tracing::info!(
                    "Player {} ({}) joined on {}",
                    player.name,
                    player.employee_id,
                    self.id
                );
                self.send(ServerMessage::Registered { player }).await;
            }
            ClientMessage::StartGame => {
                self.session.start()?;
                self.timer = Some(interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL));
                self.send_puzzle().await;
                self.send(ServerMessage::GameStarted {
                    time_remaining: self.session.remaining(),
                })
                .await;
            }
            ClientMessage::ResetGame => {
                self.session.reset()?;
                self.timer = None;
                self.send_puzzle().await;
            }
            ClientMessage::NewGame => {
                tracing::info!(
                    "Replacing session {} ({:?}) on {}",
                    self.session.id(),
                    self.session.state(),
                    self.id
                );
                self.release_player();
                self.session = new_session(&self.state).await?;
                self.timer = None;
                self.send_puzzle().await;
            }
            ClientMessage::BeginSelection { cell } => {
                self.session.begin_selection(cell)?;
                self.send_selection().await;
            }
            ClientMessage::ExtendSelection { cell } => {
                if self.session.extend_selection(cell)? {
                    self.send_selection().await;
                }
            }
            ClientMessage::EndSelection => {
                let events = self.session.end_selection()?;
                self.send_selection().await;
                self.dispatch(events).await;
            }
        }

        Ok(())
    }

    async fn on_tick(&mut self) {
        let events = self.session.tick();
        self.dispatch(events).await;
    }

    async fn send_selection(&self) {
        self.send(ServerMessage::SelectionUpdated {
            cells: self.session.matcher().selection().to_vec(),
        })
        .await;
    }

    async fn dispatch(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            let msg = match event {
                SessionEvent::WordFound {
                    word,
                    positions,
                    found,
                    total,
                } => ServerMessage::WordFound {
                    word,
                    positions,
                    found,
                    total,
                },
                SessionEvent::NoMatch => ServerMessage::NoMatch,
                SessionEvent::Tick { remaining } => ServerMessage::TimerTick { remaining },
                SessionEvent::Completed(outcome) => {
                    self.timer = None;
                    self.send(ServerMessage::GameOver {
                        outcome: outcome.clone(),
                    })
                    .await;
                    self.submit(outcome);
                    continue;
                }
            };
            self.send(msg).await;
        }
    }

    /// Record the result in the background. The outcome is already final, so a
    /// failure here is only reported.
    fn submit(&self, outcome: GameOutcome) {
        let store = self.state.store.clone();
        let tx = self.tx.clone();
        let conn_id = self.id;

        tokio::spawn(async move {
            match store.submit_result(NewGameResult::from(&outcome)).await {
                Ok(result) => {
                    tracing::info!("Saved result {} for connection {}", result.id, conn_id);
                    let _ = tx.send(ServerMessage::ResultSaved).await;
                }
                Err(e) => {
                    tracing::error!("Failed to save result for connection {}: {}", conn_id, e);
                    let _ = tx
                        .send(ServerMessage::Error {
                            message: format!("Failed to submit game result: {}", e),
                        })
                        .await;
                }
            }
        });
    }

    /// Let the registered player join from another connection
    fn release_player(&self) {
        let conn_id = self.id;
        self.state
            .active_players
            .retain(|_, holder| *holder != conn_id);
    }

    fn release_players_except(&self, player_id: i32) {
        let conn_id = self.id;
        self.state
            .active_players
            .retain(|id, holder| *holder != conn_id || *id == player_id);
    }
}
