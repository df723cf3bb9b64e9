//! Terminal front end: one chat screen with up to four conversation panes.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use futures::StreamExt;
use ratatui::{backend::Backend, layout::Rect, Terminal};
use tracing::{error, info, warn};

use panechat::adapters::{EchoEngine, InMemoryConversationStore, JsonFileTrade};
use panechat::adapters::mock::InMemoryFolders;
use panechat::app::ChatApp;
use panechat::models::ConversationId;
use panechat::startup::{init_file_logging, ChatConfig};
use panechat::terminal::{setup_panic_hook, TerminalManager};
use panechat::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Notice expiry tick.
const TICK: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("panechat {}", VERSION);
        return Ok(());
    }

    color_eyre::install()?;
    let config = ChatConfig::from_env()?;
    if let Err(e) = init_file_logging(&config) {
        eprintln!("Logging disabled: {}", e.user_message());
    }

    // Optional first argument: conversation to open
    let intent = std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .map(ConversationId::from);

    setup_panic_hook();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config, intent))
}

async fn run(config: ChatConfig, intent: Option<ConversationId>) -> Result<()> {
    info!("Starting panechat {}", VERSION);

    let store = InMemoryConversationStore::new();
    let engine = EchoEngine::new(Arc::new(store.clone()), config.chat_llm.clone());
    let trade = JsonFileTrade::new(config.export_dir.clone(), Arc::new(store.clone()))
        .with_import_file(config.import_file.clone());

    let mut app = ChatApp::new(config, Arc::new(store.clone()), Arc::new(engine))
        .with_folders(Arc::new(InMemoryFolders::new()))
        .with_trade(Arc::new(trade));
    app.open_initial_conversation(intent);

    let mut manager = TerminalManager::new()?;
    if !manager.keyboard_enhanced() {
        warn!("Terminal lacks keyboard enhancements; Ctrl+Shift shortcuts may not arrive");
    }

    let result = run_app(manager.terminal(), &mut app).await;
    manager.restore()?;

    if let Err(e) = &result {
        error!("Chat loop failed: {}", e);
    }
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut ChatApp) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut event_stream = EventStream::new();
    let Some(mut message_rx) = app.take_message_receiver() else {
        return Ok(());
    };
    let mut tick = tokio::time::interval(TICK);

    loop {
        terminal.draw(|f| ui::render(f, app))?;
        if app.should_quit {
            info!("Quitting");
            return Ok(());
        }

        tokio::select! {
            _ = tick.tick() => {
                app.notices.expire(Utc::now());
            }

            Some(msg) = message_rx.recv() => {
                app.handle_message(msg);
            }

            event_result = event_stream.next() => {
                match event_result {
                    Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                        app.handle_key_event(key);
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                            let size = terminal.size()?;
                            let areas = ui::screen_areas(Rect::new(0, 0, size.width, size.height));
                            let count = app.panes().len();
                            if let Some(idx) = ui::pane_at(areas.panes, count, mouse.column, mouse.row) {
                                app.click_pane(idx, mouse.modifiers.contains(KeyModifiers::ALT));
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal event error: {}", e);
                    }
                    None => return Ok(()),
                }
            }
        }
    }
}
